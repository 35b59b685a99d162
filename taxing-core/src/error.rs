//! Unified error handling
//!
//! Structured error types with context, recovery suggestions and proper error chaining

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type PortalResult<T> = Result<T, PortalError>;

/// Error context carried by most variants for debugging and support
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Additional metadata
    pub metadata: std::collections::HashMap<String, String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            metadata: std::collections::HashMap::new(),
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Main error type for the portal
#[derive(Error, Debug)]
pub enum PortalError {
    /// The backend answered with a non-success status
    #[error("Backend error ({status}): {message}")]
    Backend {
        status: u16,
        message: String,
        /// `detail` field parsed from the backend's error body, if any
        detail: Option<String>,
        context: ErrorContext,
    },

    /// The backend could not be reached or its body could not be decoded
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Session error: {message}")]
    Session {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },
}

impl PortalError {
    /// Build a backend error from a status code and optional `detail`
    pub fn backend(status: u16, detail: Option<String>, component: &str) -> Self {
        let message = detail
            .clone()
            .unwrap_or_else(|| format!("request failed with status {}", status));
        PortalError::Backend {
            status,
            message,
            detail,
            context: ErrorContext::new(component),
        }
    }

    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            PortalError::Backend { context, .. } => Some(context),
            PortalError::Network { context, .. } => Some(context),
            PortalError::Session { context, .. } => Some(context),
            PortalError::Config { context, .. } => Some(context),
            PortalError::Validation { context, .. } => Some(context),
            PortalError::Internal { context, .. } => Some(context),
            _ => None,
        }
    }

    /// HTTP status reported by the backend, if this is a backend error
    pub fn status(&self) -> Option<u16> {
        match self {
            PortalError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `detail` reported by the backend, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            PortalError::Backend { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            PortalError::Internal { .. } => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Internal error occurred"
                );
            }
            PortalError::Config { .. } | PortalError::Validation { .. } => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Configuration or validation error"
                );
            }
            PortalError::Network { .. } | PortalError::Backend { .. } => {
                warn!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    status = ?self.status(),
                    error = %self,
                    "Backend request failed"
                );
            }
            _ => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Error occurred"
                );
            }
        }
    }
}

#[macro_export]
macro_rules! config_error {
    ($msg:expr, $component:expr) => {
        $crate::PortalError::Config {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check your configuration file")
                .with_suggestion("Run 'taxing config --init' to create default config"),
        }
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr, $field:expr, $component:expr) => {
        $crate::PortalError::Validation {
            message: $msg.to_string(),
            field: Some($field.to_string()),
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check the field value and format"),
        }
    };
}

#[macro_export]
macro_rules! session_error {
    ($msg:expr, $component:expr) => {
        $crate::PortalError::Session {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component),
        }
    };
    ($msg:expr, $component:expr, $source:expr) => {
        $crate::PortalError::Session {
            message: $msg.to_string(),
            source: Some(Box::new($source)),
            context: $crate::ErrorContext::new($component),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_prefers_detail_as_message() {
        let err = PortalError::backend(401, Some("Invalid credentials".to_string()), "test");
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.detail(), Some("Invalid credentials"));
        assert_eq!(err.to_string(), "Backend error (401): Invalid credentials");
    }

    #[test]
    fn backend_error_without_detail() {
        let err = PortalError::backend(500, None, "test");
        assert_eq!(err.detail(), None);
        assert!(err.to_string().contains("status 500"));
        assert!(err.context().is_some());
    }

    #[test]
    fn io_errors_have_no_context() {
        let err: PortalError = std::io::Error::other("boom").into();
        assert!(err.context().is_none());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn validation_macro_records_field() {
        let err = validation_error!("Port cannot be 0", "server.port", "config");
        match err {
            PortalError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("server.port")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
