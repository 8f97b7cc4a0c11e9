use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::migrate::ScriptSource;

pub const DEFAULT_DATABASE_PATH: &str = "clonepinterest.db";
const CONFIG_FILE_NAME: &str = "settings.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    pub path: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Migration {
    /// External DDL batch for the parent-comment migration. The bundled
    /// batch is used when unset.
    #[serde(default)]
    pub parent_comment_script: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: Database,
    #[serde(default)]
    pub migration: Migration,
}

impl Settings {
    /// Defaults, then `settings.toml` in the working directory, then
    /// `DATABASE_PATH` / `PARENT_COMMENT_SCRIPT` from the environment.
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(Path::new(CONFIG_FILE_NAME), |key| std::env::var(key).ok())
    }

    /// Load from an explicit config file and variable lookup.
    pub fn load<F>(config_file: &Path, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Config::builder().set_default("database.path", DEFAULT_DATABASE_PATH)?;

        if config_file.exists() {
            builder = builder.add_source(File::from(config_file.to_path_buf()).required(false));
        }

        if let Some(db_path) = env("DATABASE_PATH") {
            builder = builder.set_override("database.path", db_path)?;
        }
        if let Some(script) = env("PARENT_COMMENT_SCRIPT") {
            builder = builder.set_override("migration.parent_comment_script", script)?;
        }

        let s = builder.build()?;
        s.try_deserialize()
    }

    /// Apply command-line overrides, which win over every other source.
    pub fn with_overrides(mut self, database: Option<String>, script: Option<String>) -> Self {
        if let Some(path) = database {
            self.database.path = path;
        }
        if let Some(script) = script {
            self.migration.parent_comment_script = Some(script);
        }
        self
    }

    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.database.path)
    }

    pub fn script_source(&self) -> ScriptSource {
        ScriptSource::from_option(self.migration.parent_comment_script.as_ref().map(PathBuf::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let temp_dir = TempDir::new().unwrap();

        let settings = Settings::load(&temp_dir.path().join("settings.toml"), no_env).unwrap();

        assert_eq!(settings.database.path, "clonepinterest.db");
        assert_eq!(settings.migration.parent_comment_script, None);
        assert_eq!(settings.script_source(), ScriptSource::Bundled);
    }

    #[test]
    fn test_file_then_env_precedence() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("settings.toml");
        std::fs::write(
            &config_file,
            "[database]\npath = \"from_file.db\"\n\n[migration]\nparent_comment_script = \"file.sql\"\n",
        )
        .unwrap();

        let settings = Settings::load(&config_file, no_env).unwrap();
        assert_eq!(settings.database.path, "from_file.db");
        assert_eq!(
            settings.script_source(),
            ScriptSource::File(PathBuf::from("file.sql"))
        );

        let settings = Settings::load(&config_file, |key| match key {
            "DATABASE_PATH" => Some("from_env.db".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(settings.database.path, "from_env.db");
        assert_eq!(
            settings.migration.parent_comment_script.as_deref(),
            Some("file.sql")
        );
    }

    #[test]
    fn test_cli_overrides_win() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load(&temp_dir.path().join("settings.toml"), |key| match key {
            "DATABASE_PATH" => Some("from_env.db".to_string()),
            _ => None,
        })
        .unwrap()
        .with_overrides(Some("cli.db".to_string()), Some("cli.sql".to_string()));

        assert_eq!(settings.database_path(), PathBuf::from("cli.db"));
        assert_eq!(
            settings.script_source(),
            ScriptSource::File(PathBuf::from("cli.sql"))
        );
    }

    #[test]
    fn test_overrides_none_keep_values() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load(&temp_dir.path().join("settings.toml"), no_env)
            .unwrap()
            .with_overrides(None, None);

        assert_eq!(settings.database.path, "clonepinterest.db");
    }
}
