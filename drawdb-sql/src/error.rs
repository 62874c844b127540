//! Error types for drawdb-sql
//!
//! These cover calls that are rejected as a whole. Problems confined to a
//! single statement or entity are reported as [`Diagnostic`]s instead.

use thiserror::Error;

use crate::diagnostic::Diagnostic;

/// Result type alias for drawdb-sql operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that reject an import, export or conversion call
#[derive(Error, Debug)]
pub enum Error {
    #[error("No statements to import")]
    EmptyInput,

    #[error("No schema objects could be imported ({} diagnostics)", .diagnostics.len())]
    NothingImported { diagnostics: Vec<Diagnostic> },

    #[error("Strict mode: conversion produced {} diagnostics", .diagnostics.len())]
    Strict { diagnostics: Vec<Diagnostic> },

    #[error("Unknown SQL dialect: {0}")]
    UnknownDialect(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}
