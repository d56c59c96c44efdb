use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimerError {
    /// A preset was rejected at `start`; the session was left untouched.
    #[error("invalid timer configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TimerError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TimerError>;
