//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Store / network
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration failed: {0}")]
    Migration(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Push gateway rejected the request: {0}")]
    Gateway(String),

    #[error("{source} ({sent} of {total} batch(es) already sent)")]
    PartialSend {
        sent: usize,
        total: usize,
        source: Box<AppError>,
    },

    // ---------------------------
    // Lookup / authentication
    // ---------------------------
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid credentials for {0}")]
    InvalidCredential(String),

    #[error("Operation not allowed: {0}")]
    Unauthorized(String),

    #[error("Already exists: {0}")]
    Duplicate(String),

    // ---------------------------
    // Certificates
    // ---------------------------
    #[error("Malformed certificate payload: {0}")]
    MalformedPayload(String),

    #[error("Unsupported certificate type: {0}")]
    UnsupportedType(String),

    #[error("No member record matches certificate ID {0}")]
    RecordNotFound(String),

    // ---------------------------
    // Input validation
    // ---------------------------
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
