//! Error types for the library layer.

use std::fmt;

/// Shown when the transport fails before the backend answers.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Check your internet connection.";

/// Errors produced by the library layer, wrapping upstream API errors
/// and adding input validation failures.
#[derive(Debug)]
pub enum CatalogError {
    /// An error from the underlying API client.
    Api(ecovolt_api::Error),
    /// A category key that is not part of the catalog.
    UnknownCategory(String),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl CatalogError {
    /// Reduces the error to the single message a storefront shows next to its retry button.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ecovolt_api::Error::Network(_)) => NETWORK_ERROR_MESSAGE.to_string(),
            Self::Api(ecovolt_api::Error::HttpStatus { message, .. }) => message.clone(),
            Self::Api(ecovolt_api::Error::Server { message }) => message.clone(),
            Self::Api(other) => other.to_string(),
            Self::UnknownCategory(key) => format!("Unknown product category '{}'", key),
            Self::InvalidInput(msg) => msg.clone(),
        }
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::UnknownCategory(key) => write!(f, "Unknown product category: {}", key),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ecovolt_api::Error> for CatalogError {
    fn from(e: ecovolt_api::Error) -> Self {
        Self::Api(e)
    }
}
