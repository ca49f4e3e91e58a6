//! Typed per-source failure kinds
//!
//! Every way a single source can fail maps onto one variant here. Failures
//! stay scoped to their source: the pipeline reports them per outcome and
//! never lets one source's error abort its siblings.

use std::io;
use thiserror::Error;

/// Failure of a single content source.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("source not found: {path}")]
    NotFound { path: String },

    #[error("permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("decode failure: {message}")]
    Decode { message: String },

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("server returned HTTP {code}")]
    HttpStatus { code: u16 },

    #[error("response decode failure: {message}")]
    ResponseDecode { message: String },

    #[error("invalid header spec: '{entry}' (expected key:value)")]
    InvalidHeaderSpec { entry: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl SourceError {
    /// Classify an I/O error raised while opening or reading a file.
    pub fn from_io(path: &str, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound {
                path: path.to_string(),
            },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_string(),
            },
            _ => Self::Io(err),
        }
    }

    /// Classify a reqwest error from the request/response cycle.
    ///
    /// Timeouts and connect failures (refused, DNS) get their own kinds so
    /// callers can tell them apart; builder errors (e.g. a header value the
    /// transport rejects) are not network faults and keep their own kind;
    /// anything else from the body is a decode failure since the request
    /// itself already went through.
    pub fn from_reqwest(timeout_secs: u64, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                seconds: timeout_secs,
            }
        } else if err.is_builder() {
            Self::InvalidHeaderSpec {
                entry: err.to_string(),
            }
        } else if err.is_connect() || err.is_request() {
            Self::ConnectionFailed {
                message: err.to_string(),
            }
        } else if err.is_body() || err.is_decode() {
            Self::ResponseDecode {
                message: err.to_string(),
            }
        } else {
            Self::ConnectionFailed {
                message: err.to_string(),
            }
        }
    }

    /// Classify an I/O error raised while streaming a response body.
    pub fn from_body_read(timeout_secs: u64, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Self::Timeout {
                seconds: timeout_secs,
            },
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::UnexpectedEof => Self::ConnectionFailed {
                message: err.to_string(),
            },
            _ => Self::Io(err),
        }
    }

    /// Short machine-friendly name for the failure kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not-found",
            Self::PermissionDenied { .. } => "permission-denied",
            Self::Decode { .. } => "decode-error",
            Self::Timeout { .. } => "timeout",
            Self::ConnectionFailed { .. } => "connection-failed",
            Self::HttpStatus { .. } => "http-status",
            Self::ResponseDecode { .. } => "response-decode-error",
            Self::InvalidHeaderSpec { .. } => "invalid-header-spec",
            Self::Io(_) => "io-error",
        }
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;
