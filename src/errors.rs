/*!
 * Error types for the doctrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Authentication rejected by the provider
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),
}

/// Errors that can occur when reading or writing office documents
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The package container could not be opened or written
    #[error("Package error: {0}")]
    Package(String),

    /// A required part is missing from the package
    #[error("Missing document part: {0}")]
    MissingPart(String),

    /// A part failed to parse as XML
    #[error("XML error: {0}")]
    Xml(String),

    /// The output file could not be produced
    #[error("Failed to save document: {0}")]
    Save(String),
}

impl From<std::io::Error> for DocumentError {
    fn from(error: std::io::Error) -> Self {
        DocumentError::Package(error.to_string())
    }
}

impl From<zip::result::ZipError> for DocumentError {
    fn from(error: zip::result::ZipError) -> Self {
        DocumentError::Package(error.to_string())
    }
}

impl From<roxmltree::Error> for DocumentError {
    fn from(error: roxmltree::Error) -> Self {
        DocumentError::Xml(error.to_string())
    }
}

impl From<quick_xml::Error> for DocumentError {
    fn from(error: quick_xml::Error) -> Self {
        DocumentError::Save(error.to_string())
    }
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the underlying provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Glossary file could not be read or parsed
    #[error("Glossary error: {0}")]
    Glossary(String),

    /// Configuration problem detected at translation time
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system error
    #[error("File error: {0}")]
    File(String),

    /// Document processing error
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Translation error
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Provider error
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        AppError::File(error.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Unknown(error.to_string())
    }
}
