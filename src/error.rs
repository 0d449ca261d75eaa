//! Structured error types for the invoice renderer.
//!
//! Five variants cover the real failure sources: reading the input file,
//! parsing it, validating its sections, converting numeric fields, and
//! composing or writing the PDF. Every pipeline stage returns these; only
//! the binary turns them into an exit code.

use std::path::PathBuf;

use thiserror::Error;

/// The unified error type returned by all public API functions.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// The input document could not be read.
    #[error("Could not find the input file '{}'", path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input document is not well-formed TOML.
    #[error("Could not parse the TOML file '{}'. Please check its syntax.\nDetails: {source}", path.display())]
    InputParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A required section is absent or empty.
    #[error("{0}")]
    Validation(String),

    /// A quantity, rate or tax rate is not a number.
    #[error("Invalid number for '{field}': {value}")]
    NumericParse { field: String, value: String },

    /// Layout, PDF generation or output failed.
    #[error("An unexpected error occurred during PDF generation: {0}")]
    Render(String),
}

impl InvoiceError {
    pub(crate) fn numeric(field: impl Into<String>, value: impl Into<String>) -> Self {
        InvoiceError::NumericParse {
            field: field.into(),
            value: value.into(),
        }
    }
}
