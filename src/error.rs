//! Error handling for the admin console client

use std::fmt;
use thiserror::Error;

/// Unified error type for the admin console client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Local I/O errors (token persistence)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Non-2xx response from the admin API
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// The bearer token was missing, expired or rejected
    #[error("Unauthorized: {}", .0.as_deref().unwrap_or("session is not valid"))]
    Unauthorized(Option<String>),

    /// Input rejected before reaching the network
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication flow errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation not offered by a resource
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new unsupported-operation error
    pub fn unsupported<T: fmt::Display>(msg: T) -> Self {
        Error::Unsupported(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// Classify the error for presentation
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Http(_) => ErrorKind::Transport,
            Error::Api { .. } => ErrorKind::Server,
            Error::Unauthorized(_) => ErrorKind::Unauthorized,
            Error::Validation(_) => ErrorKind::Validation,
            _ => ErrorKind::Client,
        }
    }

    /// The `message` field returned by the server, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Api { message, .. } => message.as_deref(),
            Error::Unauthorized(message) => message.as_deref(),
            _ => None,
        }
    }

    /// Whether the session should be dropped because of this error
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized(_))
    }
}

/// Coarse error taxonomy surfaced to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected locally before any request was sent
    Validation,
    /// No response was received
    Transport,
    /// The server answered with a non-2xx status
    Server,
    /// The server rejected the bearer token
    Unauthorized,
    /// Local failures (decoding, persistence, configuration)
    Client,
}

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A user-facing notification produced by a manager operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,

    /// Error classification, present for error notices
    pub kind: Option<ErrorKind>,

    /// Text shown to the operator
    pub message: String,
}

impl Notice {
    /// A success notice
    pub fn success<T: Into<String>>(message: T) -> Self {
        Self {
            level: NoticeLevel::Success,
            kind: None,
            message: message.into(),
        }
    }

    /// A client-side warning that never reached the network
    pub fn warning<T: Into<String>>(message: T) -> Self {
        Self {
            level: NoticeLevel::Warning,
            kind: Some(ErrorKind::Validation),
            message: message.into(),
        }
    }

    /// An error notice carrying the server message, or `fallback` when there is none
    pub fn from_error(error: &Error, fallback: &str) -> Self {
        let message = error
            .server_message()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
            .to_string();

        Self {
            level: NoticeLevel::Error,
            kind: Some(error.kind()),
            message,
        }
    }

    /// Success notice using the server message, or `fallback`
    pub fn from_message(message: Option<String>, fallback: &str) -> Self {
        match message {
            Some(m) if !m.trim().is_empty() => Self::success(m),
            _ => Self::success(fallback),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }

    /// Title shown above the message
    pub fn title(&self) -> &'static str {
        match self.level {
            NoticeLevel::Success => "Success!",
            NoticeLevel::Warning => "Warning!",
            NoticeLevel::Error => "Error!",
        }
    }
}

/// Presentation-layer sink for notices
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Notifier that forwards notices to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Success => log::info!("{} {}", notice.title(), notice.message),
            NoticeLevel::Warning => log::warn!("{} {}", notice.title(), notice.message),
            NoticeLevel::Error => log::error!("{} {}", notice.title(), notice.message),
        }
    }
}
