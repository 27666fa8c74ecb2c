use thiserror::Error;

#[derive(Error, Debug)]
pub enum TradeError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation error on '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Incorrect username or password")]
    AuthenticationFailed,

    #[error("Authentication credentials were not provided")]
    NotAuthenticated,

    #[error("You do not have permission to perform this action")]
    PermissionDenied,

    #[error("Password hashing failed: {message}")]
    PasswordHashError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    NotFound,
    Auth,
    Config,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TradeError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Validation { .. } | Self::Conflict { .. } => ErrorCategory::Input,
            Self::AuthenticationFailed | Self::NotAuthenticated | Self::PermissionDenied => {
                ErrorCategory::Auth
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Config
            }
            Self::IoError(_) | Self::SerializationError(_) | Self::PasswordHashError { .. } => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::NotFound => ErrorSeverity::Low,
            ErrorCategory::Auth => ErrorSeverity::Medium,
            ErrorCategory::Config => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的簡短訊息，不含內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::IoError(_) => "Could not read or write the data directory".to_string(),
            Self::SerializationError(_) => "Stored data could not be decoded".to_string(),
            Self::PasswordHashError { .. } => "The password could not be processed".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "Check the identifier or name and try again",
            Self::Validation { .. } => "Correct the highlighted field and resubmit",
            Self::Conflict { .. } => "Choose a different, unused value",
            Self::AuthenticationFailed => "Verify the username and password",
            Self::NotAuthenticated => "Log in and send the session token as a Bearer header",
            Self::PermissionDenied => "Use a staff account for back-office operations",
            Self::IoError(_) => "Make sure the data path exists and is writable",
            Self::SerializationError(_) => "Restore the data files from a backup or remove them",
            Self::PasswordHashError { .. } => "Retry the request; report it if it keeps failing",
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Review the configuration file and CLI flags"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, TradeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_and_severity() {
        let err = TradeError::not_found("node", "Ghost");
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.to_string(), "node not found: Ghost");

        let err = TradeError::IoError(std::io::Error::other("disk"));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(!err.user_friendly_message().contains("disk"));
    }
}
