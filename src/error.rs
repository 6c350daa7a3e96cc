//! Error types for secure-api
//!
//! All modules use `SecureApiResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for secure-api operations
pub type SecureApiResult<T> = Result<T, SecureApiError>;

/// All errors that can occur in secure-api
#[derive(Error, Debug)]
pub enum SecureApiError {
    // Local cache errors
    #[error("Failed to read credential cache {path}: {source}")]
    CacheRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write credential cache {path}: {source}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Remote store errors
    #[error("AWS CLI not found while running {operation} for {name}")]
    AwsCliNotFound { operation: String, name: String },

    #[error("AWS credentials not configured for {operation} on {name}")]
    AwsNotConfigured { operation: String, name: String },

    #[error("{operation} failed for {name}: {reason}")]
    RemoteAccess {
        operation: String,
        name: String,
        reason: String,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Provisioning errors
    #[error("At least one HTTP method is required")]
    NoMethods,

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl SecureApiError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a remote access error for a named remote call
    pub fn remote(
        operation: impl Into<String>,
        name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::RemoteAccess {
            operation: operation.into(),
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Check if the error came from talking to the remote secret store
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::RemoteAccess { .. }
                | Self::AwsNotConfigured { .. }
                | Self::AwsCliNotFound { .. }
        )
    }

    /// Check if the error came from the local credential cache
    pub fn is_cache(&self) -> bool {
        matches!(self, Self::CacheRead { .. } | Self::CacheWrite { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::AwsCliNotFound { .. } => {
                Some("Install the AWS CLI v2 (https://aws.amazon.com/cli/) and make sure `aws` is on PATH")
            }
            Self::AwsNotConfigured { .. } => {
                Some("Run: aws configure (or set AWS_PROFILE / aws.profile)")
            }
            Self::RemoteAccess { .. } => {
                Some("Check AWS credentials, region and ssm/secretsmanager permissions")
            }
            Self::CacheRead { .. } | Self::CacheWrite { .. } => {
                Some("Check permissions on the cache directory, or pass --cache-root")
            }
            Self::NoMethods => Some("Pass at least one --method"),
            _ => None,
        }
    }
}
