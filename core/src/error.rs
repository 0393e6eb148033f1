//! Error types for spreadsheet and ROBOT operations

use thiserror::Error;

/// Main error type for ontosheets operations
#[derive(Error, Debug)]
pub enum OntoError {
    /// A spreadsheet could not be opened or parsed
    #[error("Not able to parse file '{path}': {reason}")]
    LoadError {
        /// Path of the file that failed to load
        path: String,
        /// Reason reported by the reader
        reason: String,
    },

    /// Headers that resolve to no column mapping (strict mode only)
    #[error("Headers not mapped for '{source_name}': {headers:?}")]
    UnmappedHeaders {
        /// Sheet or file the headers came from
        source_name: String,
        /// Offending header texts
        headers: Vec<String>,
    },

    /// An entity name referenced by a relation fact is not known
    #[error("Entity '{name}' not found")]
    EntityNotFound {
        /// Normalized name that failed to resolve
        name: String,
        /// Where the reference came from
        context: Option<String>,
    },

    /// CSV reading or writing errors
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Workbook writing errors
    #[error("Workbook error: {0}")]
    WorkbookError(String),

    /// External command could not be started
    #[error("Failed to execute '{command}': {reason}")]
    CommandError {
        /// The command line that was attempted
        command: String,
        /// Reason for failure
        reason: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result type alias for ontosheets operations
pub type Result<T> = std::result::Result<T, OntoError>;

impl OntoError {
    /// Create a new load error for a file
    #[must_use]
    pub fn load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LoadError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new entity lookup error
    #[must_use]
    pub fn entity_not_found(name: impl Into<String>) -> Self {
        Self::EntityNotFound {
            name: name.into(),
            context: None,
        }
    }

    /// Create a new entity lookup error with the referencing context
    #[must_use]
    pub fn entity_not_found_in(name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::EntityNotFound {
            name: name.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new CSV error
    #[must_use]
    pub fn csv(message: impl Into<String>) -> Self {
        Self::CsvError(message.into())
    }

    /// Create a new workbook error
    #[must_use]
    pub fn workbook(message: impl Into<String>) -> Self {
        Self::WorkbookError(message.into())
    }

    /// Create a new command error
    #[must_use]
    pub fn command(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CommandError {
            command: command.into(),
            reason: reason.into(),
        }
    }

    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create a serialization error
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError(message.into())
    }
}

impl From<serde_yaml::Error> for OntoError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = OntoError::load("classes.xlsx", "zip header missing");
        match err {
            OntoError::LoadError { path, .. } => assert_eq!(path, "classes.xlsx"),
            _ => panic!("Wrong error type"),
        }

        let err = OntoError::entity_not_found_in("foo", "lucidchart fact");
        match err {
            OntoError::EntityNotFound { context, .. } => {
                assert_eq!(context.as_deref(), Some("lucidchart fact"));
            }
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = OntoError::load("classes.xlsx", "File not found");
        let display = err.to_string();
        assert!(display.contains("classes.xlsx"));
        assert!(display.contains("File not found"));

        let err = OntoError::UnmappedHeaders {
            source_name: "classes.xlsx".to_string(),
            headers: vec!["Mystery".to_string()],
        };
        assert!(err.to_string().contains("Mystery"));
    }

    #[test]
    fn test_error_conversions() {
        let yaml_err = serde_yaml::from_str::<Vec<String>>("{ not: [a list").unwrap_err();
        let err: OntoError = yaml_err.into();
        assert!(matches!(err, OntoError::SerializationError(_)));
    }
}
