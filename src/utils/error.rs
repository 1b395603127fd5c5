use thiserror::Error;

#[derive(Error, Debug)]
pub enum GuardError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Config validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Required field '{field}' is missing")]
    MissingField { field: String },

    #[error("Unknown checkpoint: {id}")]
    UnknownCheckpoint { id: String },

    #[error("Scan source error: {message}")]
    SourceError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Patrol,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GuardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GuardError::ConfigError { .. }
            | GuardError::ConfigValidationError { .. }
            | GuardError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            GuardError::MissingField { .. } | GuardError::SourceError { .. } => {
                ErrorCategory::Input
            }
            GuardError::UnknownCheckpoint { .. } => ErrorCategory::Patrol,
            GuardError::IoError(_)
            | GuardError::SerializationError(_)
            | GuardError::CsvError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // the guard stays on the form and corrects the entry
            ErrorCategory::Input | ErrorCategory::Patrol => ErrorSeverity::Low,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => match self {
                GuardError::IoError(_) => ErrorSeverity::Critical,
                _ => ErrorSeverity::Medium,
            },
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            GuardError::MissingField { field } => {
                format!("Missing Fields: {} is required.", field.replace('_', " "))
            }
            GuardError::UnknownCheckpoint { id } => {
                format!("Checkpoint '{}' is not part of this patrol.", id)
            }
            GuardError::ConfigError { .. }
            | GuardError::ConfigValidationError { .. }
            | GuardError::InvalidConfigValueError { .. } => {
                format!("The configuration could not be used: {}", self)
            }
            GuardError::SourceError { message } => {
                format!("The scanner stopped delivering payloads: {}", message)
            }
            GuardError::IoError(e) => format!("A file could not be read or written: {}", e),
            GuardError::SerializationError(_) | GuardError::CsvError(_) => {
                "The entry log could not be exported.".to_string()
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the TOML file: tag_prefix must be non-empty and checkpoint ids unique"
            }
            ErrorCategory::Input => "Complete the missing fields manually or scan again",
            ErrorCategory::Patrol => "Verify the tag belongs to the active patrol route",
            ErrorCategory::Io => "Check that the input and export paths exist and are writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, GuardError>;
