//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::path::PathBuf;

/// Default root for PDF lookups
pub const DEFAULT_PDF_ROOT: &str = "resources/pdfs/";
/// Default root for image lookups
pub const DEFAULT_IMAGE_ROOT: &str = "resources/images/";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Resource root directories
    pub resources: ResourceConfig,
    /// PDF renderer configuration
    pub render: RenderConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Resource root directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceConfig {
    /// Root directory holding PDFs
    pub pdf_root: PathBuf,
    /// Root directory holding images
    pub image_root: PathBuf,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            pdf_root: PathBuf::from(DEFAULT_PDF_ROOT),
            image_root: PathBuf::from(DEFAULT_IMAGE_ROOT),
        }
    }
}

/// PDF renderer configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Program used to rasterize pages (poppler `pdftoppm`)
    pub pdftoppm: String,
    /// Program used to inspect documents (poppler `pdfinfo`)
    pub pdfinfo: String,
    /// Rasterization resolution
    pub dpi: u32,
    /// Timeout for a single renderer invocation (in seconds)
    pub timeout_secs: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            pdftoppm: "pdftoppm".to_string(),
            pdfinfo: "pdfinfo".to_string(),
            dpi: 150,
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let render_defaults = RenderConfig::default();
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            resources: ResourceConfig {
                pdf_root: env::var("PDF_ROOT")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_PDF_ROOT)),
                image_root: env::var("IMAGE_ROOT")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_IMAGE_ROOT)),
            },
            render: RenderConfig {
                pdftoppm: env::var("PDFTOPPM_PATH").unwrap_or(render_defaults.pdftoppm),
                pdfinfo: env::var("PDFINFO_PATH").unwrap_or(render_defaults.pdfinfo),
                dpi: env::var("RENDER_DPI")
                    .ok()
                    .and_then(|d| d.parse().ok())
                    .unwrap_or(render_defaults.dpi),
                timeout_secs: env::var("RENDER_TIMEOUT_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(render_defaults.timeout_secs),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
