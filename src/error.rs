//! Error types for the persona bootloader
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-friendly messages with suggestions
//! - Exit codes for CLI

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for bootloader operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,

    // Precondition errors (3xx)
    ProposalMissing = 300,
    ApprovalNotGranted = 301,
    CredentialMissing = 302,

    // Remote service errors (4xx)
    RemoteUnreachable = 400,
    RemoteStatus = 401,
    RemoteMalformed = 402,
    InstallFailed = 403,

    // Template errors (5xx)
    TemplateNotFound = 500,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E100")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI (maps to 1-125 range)
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10, // Config errors
            200..=299 => 20, // IO errors
            300..=399 => 30, // Precondition errors
            400..=499 => 40, // Remote errors
            500..=599 => 50, // Template errors
            900..=999 => 90, // Internal errors
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for the bootloader
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Settings file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Settings parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Settings validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    /// File read error
    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File write error
    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // Precondition Errors
    // ─────────────────────────────────────────────────────────────

    /// Apply was requested before a proposal was written
    #[error("Install proposal not found: {path}")]
    ProposalMissing { path: PathBuf },

    /// The personalization document does not approve the install
    #[error("approve_install is not true in {path}")]
    ApprovalNotGranted { path: PathBuf },

    /// The credential environment variable is unset or empty
    #[error("{var} not found in the environment")]
    CredentialMissing { var: String },

    // ─────────────────────────────────────────────────────────────
    // Remote Service Errors
    // ─────────────────────────────────────────────────────────────

    /// The request never produced a response
    #[error("Failed to reach {url}: {message}")]
    RemoteUnreachable { url: String, message: String },

    /// The service answered with a non-success status
    #[error("{url} returned {status}: {body}")]
    RemoteStatus { url: String, status: u16, body: String },

    /// The service answered with a body we could not interpret
    #[error("Malformed response from {url}: {message}")]
    RemoteMalformed { url: String, message: String },

    /// The install summary reported failure
    #[error("Install failed: {message}")]
    InstallFailed {
        message: String,
        raw_output: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────
    // Template Errors
    // ─────────────────────────────────────────────────────────────

    /// Neither the template directory nor the bundled set has this template
    #[error("Template not found: {name}")]
    TemplateNotFound { name: String },

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    // ─────────────────────────────────────────────────────────────
    // Error Classification
    // ─────────────────────────────────────────────────────────────

    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,

            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,

            Error::ProposalMissing { .. } => ErrorCode::ProposalMissing,
            Error::ApprovalNotGranted { .. } => ErrorCode::ApprovalNotGranted,
            Error::CredentialMissing { .. } => ErrorCode::CredentialMissing,

            Error::RemoteUnreachable { .. } => ErrorCode::RemoteUnreachable,
            Error::RemoteStatus { .. } => ErrorCode::RemoteStatus,
            Error::RemoteMalformed { .. } => ErrorCode::RemoteMalformed,
            Error::InstallFailed { .. } => ErrorCode::InstallFailed,

            Error::TemplateNotFound { .. } => ErrorCode::TemplateNotFound,

            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    // ─────────────────────────────────────────────────────────────
    // User-Friendly Messages
    // ─────────────────────────────────────────────────────────────

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Check the --config path, or omit it to use the built-in defaults."
            ),
            Error::ConfigParse { .. } => Some(
                "Check your bootloader.toml syntax."
            ),
            Error::ConfigValidation { .. } => Some(
                "Review the configuration file and fix the invalid values."
            ),

            Error::ProposalMissing { .. } => Some(
                "Run with --scan first, review INSTALL_PROPOSAL.md, then run --apply."
            ),
            Error::ApprovalNotGranted { .. } => Some(
                "Set 'approve_install: true' in templates/personalize.md once you have reviewed the proposal."
            ),
            Error::CredentialMissing { .. } => Some(
                "Run inside the hosted workspace, or export the token variable before --apply. Use --dry-run to preview without it."
            ),

            Error::RemoteUnreachable { .. } => Some(
                "Check your network connection and the remote.base_url setting."
            ),
            Error::RemoteStatus { .. } => Some(
                "The service rejected the request. Verify the credential is current."
            ),
            Error::RemoteMalformed { .. } => Some(
                "The service answered in an unexpected shape. Re-run with -v to see the raw response."
            ),
            Error::InstallFailed { .. } => Some(
                "Nothing was retried. Inspect the reported error, fix the cause, and run --apply again."
            ),

            Error::TemplateNotFound { .. } => Some(
                "Restore the file under templates/ or reinstall the bootloader."
            ),

            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let code = self.code();
        let suggestion = self.suggestion();

        let mut output = format!(
            "\x1b[31mError [{}]\x1b[0m: {}\n",
            code.as_str(),
            self
        );

        if let Error::InstallFailed { raw_output: Some(raw), .. } = self {
            output.push_str(&format!("\nRaw service output:\n{}\n", raw));
        }

        if let Some(hint) = suggestion {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors (for ergonomic error creation)
// ─────────────────────────────────────────────────────────────────

impl Error {
    /// Create a config validation error
    pub fn config_validation(message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a config validation error with field name
    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a read error for a path
    pub fn io_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::IoRead {
            path: path.into(),
            source,
        }
    }

    /// Create a write error for a path
    pub fn io_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::IoWrite {
            path: path.into(),
            source,
        }
    }

    /// Create a remote malformed-response error
    pub fn remote_malformed(url: impl Into<String>, message: impl Into<String>) -> Self {
        Error::RemoteMalformed {
            url: url.into(),
            message: message.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
