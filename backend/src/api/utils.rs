//! API utility functions
//!
//! Contains helper functions used by API handlers for query validation
//! and response header construction.

use crate::error::AppError;
use crate::services::paths::validate_filename;
use axum::http::HeaderValue;
use mime_guess::mime;

/// Require a query parameter to be present
///
/// # Arguments
/// * `name` - Parameter name, used in the error message
/// * `value` - Parameter value from the query string
///
/// # Returns
/// * `Ok(&str)` - The parameter value
/// * `Err(AppError)` - If the parameter is missing
pub fn require_param<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str, AppError> {
    value.ok_or_else(|| AppError::Validation(format!("query parameter '{}' is required", name)))
}

/// Require and validate the `filename` query parameter
pub fn require_filename(value: Option<&str>) -> Result<&str, AppError> {
    validate_filename(require_param("filename", value)?)
}

/// Parse the `pagenumber` query parameter
///
/// # Returns
/// * `Ok(u32)` - The page number
/// * `Err(AppError)` - If the parameter is missing or not a non-negative integer
pub fn parse_page_number(value: Option<&str>) -> Result<u32, AppError> {
    let raw = require_param("pagenumber", value)?;
    raw.parse().map_err(|_| {
        AppError::Validation(format!(
            "pagenumber must be a non-negative integer, got '{}'",
            raw
        ))
    })
}

/// `Content-Type` for a file, guessed from its extension
///
/// Textual types carry `charset=utf-8`; unknown extensions fall back to
/// `application/octet-stream`.
pub fn content_type_for(filename: &str) -> Result<HeaderValue, AppError> {
    let guessed = mime_guess::from_path(filename).first_or_octet_stream();
    let textual = guessed.type_() == mime::TEXT
        || matches!(guessed.essence_str(), "application/json" | "application/javascript");
    let value = if textual {
        format!("{}; charset=utf-8", guessed.essence_str())
    } else {
        guessed.essence_str().to_string()
    };

    HeaderValue::from_str(&value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid MIME type {}: {}", value, e)))
}

/// Build a `Content-Disposition` header suggesting a download filename
pub fn attachment(filename: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(&format!("attachment; filename={}", filename)).map_err(|_| {
        AppError::InvalidPath(format!(
            "filename cannot be used in a header: {}",
            filename
        ))
    })
}
