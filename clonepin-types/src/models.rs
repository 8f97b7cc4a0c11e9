use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Custom serde module for DateTime to ensure RFC3339 string format
mod datetime_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = date.to_rfc3339();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<DateTime<Utc>>().map_err(serde::de::Error::custom)
    }
}

/// Directed edge: `follower_id` follows `following_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub id: i64,
    pub follower_id: i64,
    pub following_id: i64,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub pin_id: i64,
    pub user_id: i64,
    pub text: String,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    /// Set for replies; `None` for top-level comments.
    #[serde(default)]
    pub parent_comment_id: Option<i64>,
}

impl Comment {
    pub fn is_reply(&self) -> bool {
        self.parent_comment_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_follow_serializes_rfc3339() {
        let follow = Follow {
            id: 1,
            follower_id: 2,
            following_id: 3,
            created_at: Utc.with_ymd_and_hms(2025, 12, 21, 9, 37, 29).unwrap(),
        };

        let json = serde_json::to_value(&follow).unwrap();
        assert_eq!(json["created_at"], "2025-12-21T09:37:29+00:00");
        assert_eq!(json["follower_id"], 2);
    }

    #[test]
    fn test_comment_without_parent_deserializes() {
        let json = r#"{
            "id": 7,
            "pin_id": 1,
            "user_id": 2,
            "text": "nice pin",
            "created_at": "2025-12-21T09:37:29Z"
        }"#;

        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.parent_comment_id, None);
        assert!(!comment.is_reply());
    }
}
