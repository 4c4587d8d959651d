//! Error metadata shared by the pipeline error types
//!
//! The concrete error enums live next to the code that raises them
//! (`photoprep-processing`). This module only defines how an error describes
//! itself to whoever surfaces it to a user.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like undecodable uploads
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error reporting - defines how an error should be presented
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "FILE_TOO_LARGE")
    fn error_code(&self) -> &'static str;

    /// User-facing message naming the specific condition
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// One-line summary for logs and CLI output: `CODE: message`.
pub fn summarize(err: &dyn ErrorMetadata) -> String {
    format!("{}: {}", err.error_code(), err.client_message())
}
