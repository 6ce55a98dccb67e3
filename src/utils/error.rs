use thiserror::Error;

#[derive(Error, Debug)]
pub enum UsersError {
    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream {url} responded with status {status}")]
    UpstreamStatus { status: u16, url: String },

    #[error("Request was cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Upstream,
    Cancellation,
    Configuration,
    System,
}

impl UsersError {
    /// HTTP status reported by the upstream, if the failure carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            UsersError::UpstreamStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, UsersError::Cancelled)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, UsersError::Transport(e) if e.is_timeout())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            UsersError::Transport(_) | UsersError::UpstreamStatus { .. } => ErrorCategory::Upstream,
            UsersError::Cancelled => ErrorCategory::Cancellation,
            UsersError::UrlError(_)
            | UsersError::ConfigError { .. }
            | UsersError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            UsersError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            UsersError::Transport(_) if self.is_timeout() => {
                "The users service timed out".to_string()
            }
            UsersError::Transport(_) => "The users service could not be reached".to_string(),
            UsersError::UpstreamStatus { status, .. } => {
                format!("The users service responded with status {}", status)
            }
            UsersError::Cancelled => "The request was cancelled".to_string(),
            UsersError::IoError(e) => format!("I/O failure: {}", e),
            UsersError::UrlError(_)
            | UsersError::ConfigError { .. }
            | UsersError::InvalidConfigValueError { .. } => {
                format!("Invalid configuration: {}", self)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Upstream => "Check that the upstream base URL and paths are reachable",
            ErrorCategory::Cancellation => "Retry the request",
            ErrorCategory::Configuration => {
                "Check the configuration file and command line overrides"
            }
            ErrorCategory::System => "Check file permissions and that the bind address is free",
        }
    }
}

pub type Result<T> = std::result::Result<T, UsersError>;
