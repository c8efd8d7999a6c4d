//! Service layer for business logic
//!
//! This module contains service abstractions that separate business logic
//! from HTTP handlers, making the code more modular and testable.

pub mod files;
pub mod paths;
pub mod pdf;

#[cfg(all(test, unix))]
pub mod test_utils;

pub use files::{ByteStream, FileService, LocalFileService};
pub use pdf::{PdfRenderer, RenderError};
