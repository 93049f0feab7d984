use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Storage error on {entity}: {message}")]
    StorageError { entity: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Configuration,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MigrationError {
    pub fn storage(entity: &str, message: impl Into<String>) -> Self {
        MigrationError::StorageError {
            entity: entity.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            MigrationError::IoError(_) => ErrorCategory::Io,
            MigrationError::SerializationError(_)
            | MigrationError::CsvError(_)
            | MigrationError::ProcessingError { .. } => ErrorCategory::Data,
            MigrationError::ConfigError { .. }
            | MigrationError::ConfigValidationError { .. }
            | MigrationError::InvalidConfigValueError { .. }
            | MigrationError::MissingConfigError { .. } => ErrorCategory::Configuration,
            MigrationError::StorageError { .. } => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Medium,
            // 儲存層錯誤代表整個遷移必須中止
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MigrationError::IoError(_) => "Check that the snapshot file exists and the output directory is writable",
            MigrationError::SerializationError(_) => "Make sure the snapshot is a valid JSON database export",
            MigrationError::CsvError(_) => "Check the output directory and retry the report export",
            MigrationError::ConfigError { .. }
            | MigrationError::ConfigValidationError { .. }
            | MigrationError::InvalidConfigValueError { .. }
            | MigrationError::MissingConfigError { .. } => "Review the command line flags or the TOML configuration file",
            MigrationError::StorageError { .. } => "The target tables already hold conflicting rows; restore the snapshot taken before the upgrade and rerun",
            MigrationError::ProcessingError { .. } => "Inspect the legacy plugin configuration rows for malformed data",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MigrationError::IoError(e) => format!("Could not read or write a file: {}", e),
            MigrationError::SerializationError(e) => format!("The snapshot could not be parsed: {}", e),
            MigrationError::StorageError { entity, message } => {
                format!("Writing {} failed, nothing was migrated: {}", entity, message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MigrationError>;
