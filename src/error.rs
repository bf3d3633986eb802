/// Error types for jarvis
///
/// This module defines all possible errors that can occur in the application.
/// Uses thiserror for ergonomic error handling.
///
/// Note that the command pipeline itself never surfaces these to the user:
/// capability failures are turned into `Lookup::Failed` or an apology string
/// at the point of call. These errors are for startup, stores and the CLI.

use thiserror::Error;

/// Main error type for jarvis operations
#[derive(Error, Debug)]
pub enum JarvisError {
    /// I/O errors (file operations, spawned processes, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP transport errors from any remote capability
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error (missing credentials, bad values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// An external capability answered with something unusable
    #[error("Capability error: {0}")]
    Capability(String),

    /// Operation is not available on this platform
    #[error("Unsupported on this platform: {0}")]
    Unsupported(String),

    /// Text-to-speech failed
    #[error("Speech error: {0}")]
    Speech(String),
}

/// Result type alias for jarvis operations
pub type Result<T> = std::result::Result<T, JarvisError>;

/// Convert JarvisError to a user-friendly error message
impl JarvisError {
    pub fn user_message(&self) -> String {
        match self {
            JarvisError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            JarvisError::Serialization(e) => {
                format!("Data format error: {}", e)
            }
            JarvisError::Http(e) => {
                format!("Network request failed. Details: {}", e)
            }
            JarvisError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
            JarvisError::Capability(msg) => {
                format!("External service failed: {}", msg)
            }
            JarvisError::Unsupported(what) => {
                format!("'{}' is not supported on this system", what)
            }
            JarvisError::Speech(msg) => {
                format!("Could not speak the response: {}", msg)
            }
        }
    }
}
