//! Error types for Campus Content
//!
//! This module defines all custom error types used throughout the crate.
//! Fetch errors never escape a view: they are stored as the view's failed state
//! and rendered as an error panel with a localized message.

use crate::i18n::{self, Locale, UiText};
use thiserror::Error;

/// Main application error type encompassing all error categories
#[derive(Error, Debug)]
pub enum AppError {
    /// Fetching a resource failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Locale errors
    #[error(transparent)]
    Locale(#[from] LocaleError),

    /// Unknown resource name
    #[error("Unknown resource: {0}")]
    UnknownResource(String),
}

/// Failure of a single resource request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport failure (DNS, connection refused, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a non-2xx status
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// Body is not valid JSON
    #[error("Could not decode response: {0}")]
    Decode(String),

    /// Backend answered `{"success": false, ...}`
    #[error("Request rejected by backend: {0}")]
    Rejected(String),

    /// Request could not be turned into a URL
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl FetchError {
    /// Create a user-friendly error message in the given locale
    pub fn user_message(&self, locale: Locale) -> String {
        match self {
            FetchError::Network(_) => i18n::text(locale, UiText::NetworkError).to_string(),
            FetchError::Http { status } => {
                format!("{} ({})", i18n::text(locale, UiText::HttpError), status)
            }
            FetchError::Decode(_) => i18n::text(locale, UiText::DecodeError).to_string(),
            FetchError::Rejected(reason) if !reason.is_empty() => {
                format!("{}: {}", i18n::text(locale, UiText::Rejected), reason)
            }
            FetchError::Rejected(_) => i18n::text(locale, UiText::Rejected).to_string(),
            FetchError::InvalidRequest(_) => i18n::text(locale, UiText::InvalidRequest).to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            FetchError::Http {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if err.is_builder() {
            FetchError::InvalidRequest(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Configuration related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error loading configuration file
    #[error("Could not load configuration: {0}")]
    LoadError(String),

    /// Error saving configuration
    #[error("Could not save configuration: {0}")]
    SaveError(String),

    /// Error parsing configuration
    #[error("Invalid configuration format: {0}")]
    ParseError(String),

    /// Invalid configuration value
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    /// Configuration directory error
    #[error("Could not access configuration directory")]
    DirectoryError,
}

/// Locale errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    /// Language code outside the supported set
    #[error("Unsupported locale: {0}")]
    Unsupported(String),
}

/// Result type alias for operations that can fail with AppError
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for resource requests
pub type FetchResult<T> = Result<T, FetchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
