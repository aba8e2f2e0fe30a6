use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Converts a legacy `.doc` into a `.docx` the rest of the pipeline can
/// read. The conversion tooling is an integration decision; swap the
/// implementation if LibreOffice is not available on the host.
pub trait DocToDocxConverter {
    fn convert(&self, doc: &Path) -> Result<PathBuf>;
}

/// Headless LibreOffice conversion, writing the `.docx` next to the input.
#[derive(Debug, Clone)]
pub struct LibreOfficeConverter {
    program: String,
}

impl LibreOfficeConverter {
    pub fn new() -> Self {
        Self {
            program: "libreoffice".to_string(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl Default for LibreOfficeConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocToDocxConverter for LibreOfficeConverter {
    fn convert(&self, doc: &Path) -> Result<PathBuf> {
        let out_dir = doc.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));

        let output = Command::new(&self.program)
            .arg("--headless")
            .arg("--convert-to")
            .arg("docx")
            .arg("--outdir")
            .arg(out_dir)
            .arg(doc)
            .output()
            .with_context(|| format!("failed to invoke {}; is LibreOffice installed?", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("doc conversion failed: {stderr}");
        }

        let converted = doc.with_extension("docx");
        if !converted.exists() {
            anyhow::bail!("converted file not found: {}", converted.display());
        }
        Ok(converted)
    }
}
