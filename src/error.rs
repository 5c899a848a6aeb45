// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for the listing editor

use thiserror::Error;

/// Result type alias for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Editor error types
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid form catalog: {}", .0.join("; "))]
    Catalog(Vec<String>),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    Server(String),
}
