//! Error types for document generation and delivery.
//!
//! One `DocumentError` covers every failure of a run: parsing the deal
//! values, rendering templates, touching the output directory and handing
//! the result to the archive or mail transport.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the deal documents library.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Contract date is not a valid `YYYY-MM-DD` date.
    #[error("Invalid date format: '{0}'. Expected YYYY-MM-DD (e.g., 2024-03-05)")]
    InvalidDate(String),

    /// IO error while reading templates or writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading or writing a zip container (docx or archive) failed.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A template could not be rendered.
    #[error("Failed to render template {template}: {message}")]
    TemplateRender { template: String, message: String },

    /// A template required for this run does not exist.
    #[error("Template not found: {}", .0.display())]
    MissingTemplate(PathBuf),

    /// The output directory of a run does not exist.
    #[error("Output directory not found: {}", .0.display())]
    MissingOutputDir(PathBuf),

    /// Nothing to deliver.
    #[error("No files to zip in the outputs folder")]
    EmptyOutput,

    /// Recipient or sender address could not be parsed.
    #[error("Invalid email address '{address}': {message}")]
    InvalidAddress { address: String, message: String },

    /// The outgoing message could not be built.
    #[error("Failed to build email: {0}")]
    MailBuild(String),

    /// The mail transport rejected or failed to deliver the message.
    #[error("Failed to send email: {0}")]
    Transport(String),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;
