#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;

#[cfg(feature = "reqwest")]
pub mod reqwest;

use std::fmt;

/// Result type with custom Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error information
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct Error {
    /// Type of error and additional information
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub error_type: ErrorType,

    /// Where this error occurred
    pub location: String,
}

/// Possible error types
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorType {
    /// This error was not labeled :(
    LabelMe,

    // ? Submission related errors
    FailedValidation {
        error: String,
    },
    SubmissionInProgress,

    // ? Issue related errors
    UnknownIssue,

    // ? Session related errors
    NotAuthenticated,
    NotPrivileged,

    // ? Transport errors
    NetworkError,
    RequestTimedOut,
    RequestFailed {
        status: u16,
    },
    InvalidResponse,

    // ? File related errors
    ImageProcessingFailed,

    // ? General errors
    InternalError,
    NotFound,
    NoEffect,
}

impl ErrorType {
    /// Whether retrying the same request later could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ErrorType::NetworkError | ErrorType::RequestTimedOut => true,
            ErrorType::RequestFailed { status } => *status >= 500,
            _ => false,
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorType::LabelMe => write!(f, "Unlabeled error"),
            ErrorType::FailedValidation { error } => write!(f, "Missing or invalid: {error}"),
            ErrorType::SubmissionInProgress => write!(f, "A submission is already in progress"),
            ErrorType::UnknownIssue => write!(f, "Issue not found"),
            ErrorType::NotAuthenticated => write!(f, "Authentication required"),
            ErrorType::NotPrivileged => write!(f, "Admin access required"),
            ErrorType::NetworkError => write!(f, "Could not reach the server"),
            ErrorType::RequestTimedOut => write!(f, "The server took too long to respond"),
            ErrorType::RequestFailed { status } => write!(f, "Request failed with status {status}"),
            ErrorType::InvalidResponse => write!(f, "The server sent an unexpected response"),
            ErrorType::ImageProcessingFailed => write!(f, "Failed to process image"),
            ErrorType::InternalError => write!(f, "Internal error"),
            ErrorType::NotFound => write!(f, "Not found"),
            ErrorType::NoEffect => write!(f, "Nothing changed"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.error_type, self.location)
    }
}

impl std::error::Error for Error {}

#[macro_export]
macro_rules! create_error {
    ( $error: ident $( $tt:tt )? ) => {
        $crate::Error {
            error_type: $crate::ErrorType::$error $( $tt )?,
            location: format!("{}:{}:{}", file!(), line!(), column!()),
        }
    };
}
