use thiserror::Error;

#[derive(Debug, Error)]
pub enum RewindError {
    #[error("invalid date format '{0}': use MM/DD/YYYY or YYYY-MM-DD")]
    MalformedDate(String),

    #[error("not a calendar date: {0}")]
    InvalidCalendarDate(String),

    #[error("unknown timezone '{0}': expected an IANA name such as America/Chicago")]
    UnknownTimezone(String),

    #[error("invalid deadline time '{0}': expected HH:MM (24-hour)")]
    InvalidDeadlineTime(String),

    #[error("{time} on {date} does not exist in {timezone} (skipped by a clock change)")]
    NonexistentLocalTime {
        date: String,
        time: String,
        timezone: String,
    },

    #[error("grace period of {0} minutes is out of range")]
    GraceOutOfRange(i64),

    #[error("git is not installed or not on PATH")]
    GitNotFound,

    #[error("failed to run git: {0}")]
    GitSpawn(String),

    #[error("git {args} failed: {stderr}")]
    GitFailed { args: String, stderr: String },

    #[error("malformed commit timestamp: {0}")]
    MalformedTimestamp(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, RewindError>;
