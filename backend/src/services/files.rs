//! File system service
//!
//! Provides the file operations the utility API delegates to: directory
//! listing, file streaming, and PDF page counting and rasterization.

use crate::error::AppError;
use crate::services::pdf::PdfRenderer;
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

/// Lazily-read byte stream forwarded to an HTTP response body
pub type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// File operations consumed by the utility API
///
/// Directories passed in are already resolved against their root; filenames
/// are single path components.
#[async_trait]
pub trait FileService: Send + Sync {
    /// Rasterize one page of a PDF to a PNG byte stream
    async fn convert_pdf_page(
        &self,
        dir: &Path,
        filename: &str,
        page: u32,
    ) -> Result<ByteStream, AppError>;

    /// List the regular files in a directory
    async fn list_filenames(&self, dir: &Path) -> Result<Vec<String>, AppError>;

    /// List the subdirectories of a directory
    async fn list_directories(&self, dir: &Path) -> Result<Vec<String>, AppError>;

    /// Count the pages of a PDF
    async fn count_pages(&self, dir: &Path, filename: &str) -> Result<u32, AppError>;

    /// Open a file as a byte stream
    async fn open_file_stream(&self, dir: &Path, filename: &str) -> Result<ByteStream, AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Directory,
}

/// Local file system implementation of [`FileService`]
#[derive(Debug, Clone)]
pub struct LocalFileService {
    renderer: PdfRenderer,
}

impl LocalFileService {
    /// Create a file service that renders PDFs with the given renderer
    pub fn new(renderer: PdfRenderer) -> Self {
        Self { renderer }
    }

    /// Check that `dir/filename` exists and is a regular file
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - Path of the file
    /// * `Err(AppError)` - If the file is missing or cannot be accessed
    async fn existing_file(dir: &Path, filename: &str) -> Result<PathBuf, AppError> {
        let path = dir.join(filename);
        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| io_error(&path, e))?;

        if !metadata.is_file() {
            return Err(AppError::FileNotFound(format!(
                "Not a file: {}",
                path.display()
            )));
        }

        Ok(path)
    }

    /// List entries of one kind in a directory, sorted by name
    async fn list_entries(dir: &Path, kind: EntryKind) -> Result<Vec<String>, AppError> {
        let metadata = fs::metadata(dir).await.map_err(|e| io_error(dir, e))?;
        if !metadata.is_dir() {
            return Err(AppError::NotADirectory(format!(
                "Path is not a directory: {}",
                dir.display()
            )));
        }

        let mut entries = fs::read_dir(dir).await.map_err(|e| {
            AppError::PermissionDenied(format!(
                "Failed to read directory: {} - {}",
                dir.display(),
                e
            ))
        })?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            AppError::PermissionDenied(format!(
                "Failed to read directory entry: {} - {}",
                dir.display(),
                e
            ))
        })? {
            // Follow symlinks so linked files and folders are listed as their targets
            let Ok(metadata) = fs::metadata(entry.path()).await else {
                continue;
            };
            let matches = match kind {
                EntryKind::File => metadata.is_file(),
                EntryKind::Directory => metadata.is_dir(),
            };
            if !matches {
                continue;
            }

            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => debug!(name = ?name, "Skipping non UTF-8 entry"),
            }
        }

        names.sort();
        debug!(dir = %dir.display(), kind = ?kind, count = names.len(), "Listed directory");
        Ok(names)
    }
}

#[async_trait]
impl FileService for LocalFileService {
    async fn convert_pdf_page(
        &self,
        dir: &Path,
        filename: &str,
        page: u32,
    ) -> Result<ByteStream, AppError> {
        let path = Self::existing_file(dir, filename).await?;

        let pages = self.renderer.page_count(&path).await?;
        if page == 0 || page > pages {
            return Err(AppError::FileNotFound(format!(
                "Page {} not found in {} ({} pages)",
                page, filename, pages
            )));
        }

        let png = self.renderer.render_page(&path, page).await?;
        Ok(Box::pin(tokio_stream::once(Ok::<_, io::Error>(Bytes::from(png)))))
    }

    async fn list_filenames(&self, dir: &Path) -> Result<Vec<String>, AppError> {
        Self::list_entries(dir, EntryKind::File).await
    }

    async fn list_directories(&self, dir: &Path) -> Result<Vec<String>, AppError> {
        Self::list_entries(dir, EntryKind::Directory).await
    }

    async fn count_pages(&self, dir: &Path, filename: &str) -> Result<u32, AppError> {
        let path = Self::existing_file(dir, filename).await?;
        Ok(self.renderer.page_count(&path).await?)
    }

    async fn open_file_stream(&self, dir: &Path, filename: &str) -> Result<ByteStream, AppError> {
        let path = Self::existing_file(dir, filename).await?;
        let file = fs::File::open(&path)
            .await
            .map_err(|e| io_error(&path, e))?;

        info!(path = %path.display(), "Streaming file");
        Ok(Box::pin(ReaderStream::new(file)))
    }
}

/// Map an I/O error on `path` to the matching application error
fn io_error(path: &Path, e: io::Error) -> AppError {
    match e.kind() {
        io::ErrorKind::NotFound => {
            AppError::FileNotFound(format!("Path does not exist: {}", path.display()))
        }
        io::ErrorKind::PermissionDenied => {
            AppError::PermissionDenied(format!("Cannot access: {}", path.display()))
        }
        _ => AppError::Internal(anyhow::anyhow!("I/O error on {}: {}", path.display(), e)),
    }
}
