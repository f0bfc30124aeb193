use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output};

use tempfile::TempDir;

use resume_core::{BackendError, OcrBackend};

/// Whether `name` resolves to an executable on `PATH`.
pub fn check_binary(name: &str) -> bool {
    Command::new("which")
        .arg(name)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn check_status(
    result: std::io::Result<ExitStatus>,
    tool: &str,
    message: &str,
) -> Result<(), BackendError> {
    match result {
        Ok(s) if s.success() => Ok(()),
        Ok(_) => Err(BackendError::ExtractionError(message.to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(BackendError::Unavailable(tool.to_string()))
        }
        Err(e) => Err(BackendError::Io(e)),
    }
}

fn read_stdout(
    result: std::io::Result<Output>,
    tool: &str,
    message: &str,
) -> Result<String, BackendError> {
    match result {
        Ok(output) if output.status.success() => {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        }
        Ok(output) => Err(BackendError::ExtractionError(format!(
            "{}: {}",
            message,
            String::from_utf8_lossy(&output.stderr).trim()
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(BackendError::Unavailable(tool.to_string()))
        }
        Err(e) => Err(BackendError::Io(e)),
    }
}

/// Optical recognition through the `pdftoppm` and `tesseract` command-line
/// tools.
///
/// Pages are rasterized into a temporary directory that is removed when the
/// call returns, successful or not.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    language: String,
    dpi: u32,
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            dpi: 300,
        }
    }
}

impl TesseractOcr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tesseract language code, e.g. `"eng"` or `"eng+deu"`.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    fn rasterize(&self, pdf: &Path, dir: &Path) -> Result<Vec<PathBuf>, BackendError> {
        let status = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(pdf)
            .arg(dir.join("page"))
            .status();
        check_status(
            status,
            "pdftoppm (install poppler-utils)",
            "pdftoppm failed to rasterize PDF",
        )?;

        // pdftoppm zero-pads page numbers, so lexical order is page order.
        let mut images: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "png"))
            .collect();
        images.sort();
        Ok(images)
    }

    fn recognize(&self, image: &Path) -> Result<String, BackendError> {
        let output = Command::new("tesseract")
            .arg(image)
            .arg("stdout")
            .args(["-l", &self.language])
            .output();
        read_stdout(output, "tesseract (install tesseract-ocr)", "tesseract failed")
    }
}

impl OcrBackend for TesseractOcr {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        check_binary("tesseract") && check_binary("pdftoppm")
    }

    fn availability_hint(&self) -> String {
        let missing: Vec<&str> = ["tesseract", "pdftoppm"]
            .into_iter()
            .filter(|tool| !check_binary(tool))
            .collect();
        if missing.is_empty() {
            "tesseract and pdftoppm found on PATH".to_string()
        } else {
            format!(
                "missing on PATH: {} (install tesseract-ocr and poppler-utils)",
                missing.join(", ")
            )
        }
    }

    fn ocr_pages(&self, path: &Path) -> Result<Vec<String>, BackendError> {
        let temp_dir = TempDir::new()?;
        let images = self.rasterize(path, temp_dir.path())?;
        if images.is_empty() {
            return Err(BackendError::ExtractionError(
                "no page images produced".to_string(),
            ));
        }

        let mut pages = Vec::with_capacity(images.len());
        for (i, image) in images.iter().enumerate() {
            match self.recognize(image) {
                Ok(text) => pages.push(text.trim().to_string()),
                Err(e) => {
                    tracing::warn!(page = i + 1, error = %e, "OCR failed for page");
                    pages.push(String::new());
                }
            }
        }
        Ok(pages)
    }
}
