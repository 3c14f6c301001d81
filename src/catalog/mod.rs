mod matcher;
mod platforms;

pub use matcher::{match_platforms, triggers, PlatformMatches};
pub use platforms::{Category, PlatformRecord};
