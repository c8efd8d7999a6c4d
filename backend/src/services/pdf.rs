//! PDF renderer backed by the poppler command line tools
//!
//! Page counts come from `pdfinfo`, page rasterization from `pdftoppm`.
//! Both run as child processes under a timeout.

use crate::config::RenderConfig;
use std::path::Path;
use std::process::Output;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, info};

/// PNG file signature
const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Errors that can occur while inspecting or rasterizing a PDF
#[derive(Error, Debug)]
pub enum RenderError {
    /// Renderer exited with a non-zero exit code
    #[error("Renderer failed: {0}")]
    ProcessFailed(String),

    /// Renderer exceeded the timeout limit
    #[error("Renderer timed out after {0} seconds")]
    Timeout(u64),

    /// Failed to spawn the renderer (e.g., not installed)
    #[error("Failed to spawn renderer: {0}")]
    SpawnFailed(#[from] std::io::Error),

    /// Renderer produced output that could not be interpreted
    #[error("Unexpected renderer output: {0}")]
    InvalidOutput(String),
}

/// Rasterizes PDF pages and reports page counts
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    pdftoppm: String,
    pdfinfo: String,
    dpi: u32,
    timeout: Duration,
}

impl PdfRenderer {
    /// Create a renderer from configuration
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            pdftoppm: config.pdftoppm.clone(),
            pdfinfo: config.pdfinfo.clone(),
            dpi: config.dpi,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Count the pages of the PDF at `path`
    pub async fn page_count(&self, path: &Path) -> Result<u32, RenderError> {
        let mut cmd = Command::new(&self.pdfinfo);
        cmd.arg(path);

        let output = self.run(cmd, &self.pdfinfo).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let pages = parse_page_count(&stdout)?;

        debug!(path = %path.display(), pages, "Counted PDF pages");
        Ok(pages)
    }

    /// Rasterize a single 1-based page of the PDF at `path` to PNG bytes
    pub async fn render_page(&self, path: &Path, page: u32) -> Result<Vec<u8>, RenderError> {
        let page_arg = page.to_string();
        let mut cmd = Command::new(&self.pdftoppm);
        cmd.arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-f")
            .arg(&page_arg)
            .arg("-l")
            .arg(&page_arg)
            .arg("-singlefile")
            .arg(path);

        let output = self.run(cmd, &self.pdftoppm).await?;
        if !output.stdout.starts_with(PNG_SIGNATURE) {
            return Err(RenderError::InvalidOutput(format!(
                "{} did not produce a PNG image ({} bytes)",
                self.pdftoppm,
                output.stdout.len()
            )));
        }

        info!(
            path = %path.display(),
            page,
            bytes = output.stdout.len(),
            "Rendered PDF page"
        );
        Ok(output.stdout)
    }

    async fn run(&self, mut cmd: Command, program: &str) -> Result<Output, RenderError> {
        cmd.kill_on_drop(true);
        debug!(program, "Spawning renderer");

        match timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) if output.status.success() => Ok(output),
            Ok(Ok(output)) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let exit_code = output.status.code().unwrap_or(-1);
                error!(program, exit_code, stderr = %stderr, "Renderer failed");
                Err(RenderError::ProcessFailed(format!(
                    "{} exited with code {}: {}",
                    program,
                    exit_code,
                    stderr.trim()
                )))
            }
            Ok(Err(e)) => {
                error!(program, error = %e, "Failed to spawn renderer");
                Err(RenderError::SpawnFailed(e))
            }
            Err(_) => {
                error!(
                    program,
                    timeout_secs = self.timeout.as_secs(),
                    "Renderer timed out"
                );
                Err(RenderError::Timeout(self.timeout.as_secs()))
            }
        }
    }
}

/// Extract the page count from `pdfinfo` output
///
/// Document metadata (Title, Subject, Keywords) is printed before the page
/// count and may itself contain a `Pages:` line, so the last one wins.
pub fn parse_page_count(info: &str) -> Result<u32, RenderError> {
    info.lines()
        .filter_map(|line| line.strip_prefix("Pages:"))
        .last()
        .ok_or_else(|| RenderError::InvalidOutput("missing 'Pages:' line".to_string()))?
        .trim()
        .parse()
        .map_err(|e| RenderError::InvalidOutput(format!("invalid page count: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const PDFINFO_OUTPUT: &str = "Title:           Quarterly report\n\
        Producer:        LibreOffice 7.3\n\
        Tagged:          no\n\
        Pages:           12\n\
        Encrypted:       no\n\
        Page size:       595.304 x 841.89 pts (A4)\n";

    fn renderer_with(pdftoppm: &str, pdfinfo: &str, timeout_secs: u64) -> PdfRenderer {
        PdfRenderer::new(&RenderConfig {
            pdftoppm: pdftoppm.to_string(),
            pdfinfo: pdfinfo.to_string(),
            dpi: 72,
            timeout_secs,
        })
    }

    #[test]
    fn test_parse_page_count() {
        assert_eq!(parse_page_count(PDFINFO_OUTPUT).unwrap(), 12);
    }

    #[test]
    fn test_parse_page_count_ignores_metadata_lines() {
        // A Title containing a newline can smuggle in an earlier "Pages:" line
        let info = "Title:          x\nPages: 999\nProducer:       y\nPages:          3\nEncrypted:      no\n";
        assert_eq!(parse_page_count(info).unwrap(), 3);
    }

    #[test]
    fn test_parse_page_count_missing_line() {
        let result = parse_page_count("Title: nothing here\n");
        assert!(matches!(result, Err(RenderError::InvalidOutput(_))));
    }

    #[test]
    fn test_parse_page_count_garbage() {
        let result = parse_page_count("Pages: many\n");
        assert!(matches!(result, Err(RenderError::InvalidOutput(_))));
    }

    #[tokio::test]
    #[serial]
    async fn test_missing_program_is_spawn_failure() {
        let renderer = renderer_with(
            "nonexistent-pdftoppm-12345",
            "nonexistent-pdfinfo-12345",
            5,
        );
        let result = renderer.page_count(Path::new("whatever.pdf")).await;
        assert!(matches!(result, Err(RenderError::SpawnFailed(_))));

        let result = renderer.render_page(Path::new("whatever.pdf"), 1).await;
        assert!(matches!(result, Err(RenderError::SpawnFailed(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    #[serial]
    async fn test_non_zero_exit_is_process_failure() {
        // `false` ignores its arguments and exits with 1
        let renderer = renderer_with("false", "false", 5);
        let result = renderer.page_count(Path::new("doc.pdf")).await;
        assert!(matches!(result, Err(RenderError::ProcessFailed(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    #[serial]
    async fn test_non_png_output_rejected() {
        // `echo` succeeds but prints its arguments instead of an image
        let renderer = renderer_with("echo", "echo", 5);
        let result = renderer.render_page(Path::new("doc.pdf"), 1).await;
        assert!(matches!(result, Err(RenderError::InvalidOutput(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    #[serial]
    async fn test_page_count_from_pdfinfo() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = crate::services::test_utils::fake_poppler(temp_dir.path(), 2);

        let renderer = PdfRenderer::new(&config);
        let pages = renderer
            .page_count(Path::new("doc.pdf"))
            .await
            .expect("Should count pages");
        assert_eq!(pages, 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    #[serial]
    async fn test_render_page_returns_png() {
        use crate::services::test_utils::{fake_poppler, FAKE_PNG};

        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let renderer = PdfRenderer::new(&fake_poppler(temp_dir.path(), 2));

        let png = renderer
            .render_page(Path::new("doc.pdf"), 2)
            .await
            .expect("Should render page");
        assert_eq!(png, FAKE_PNG.to_vec());
    }

    #[cfg(unix)]
    #[tokio::test]
    #[serial]
    async fn test_slow_renderer_times_out() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let slow = crate::services::test_utils::write_script(temp_dir.path(), "slow", "sleep 5");
        let slow = slow.to_string_lossy().to_string();

        let renderer = renderer_with(&slow, &slow, 1);
        let started = std::time::Instant::now();
        let result = renderer.page_count(Path::new("doc.pdf")).await;

        assert!(matches!(result, Err(RenderError::Timeout(1))));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_renderer_from_config() {
        let renderer = PdfRenderer::new(&RenderConfig::default());
        assert_eq!(renderer.pdftoppm, "pdftoppm");
        assert_eq!(renderer.pdfinfo, "pdfinfo");
        assert_eq!(renderer.timeout, Duration::from_secs(30));
    }
}
