pub mod models;
pub mod timestamp;

pub use models::*;
pub use timestamp::{format_timestamp, parse_timestamp, truncate_to_ticks};
