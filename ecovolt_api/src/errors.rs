//! Error types for the API client.

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request could not be sent or the response could not be read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The API returned a non-success status.
    #[error("Request failed with status {status}: {message}")]
    HttpStatus { status: u16, message: String },
    /// The API answered 2xx but reported failure or sent a malformed payload.
    #[error("Server error: {message}")]
    Server { message: String },
    /// A newer request superseded this one before it completed.
    #[error("Request cancelled")]
    Cancelled,
    /// The base URL and path did not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl Error {
    /// Returns true for the silent supersession case, which callers never surface.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}
