use anyhow::{Context, Result};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Command;

use crate::core::geometry::Quad;
use crate::ocr::{RecognizedLine, TextRecognizer};

/// Wire format of one detected line coming back from the bridge script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedToken {
    pub text: String,
    pub quad: [[f32; 2]; 4],
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

fn default_confidence() -> f32 {
    0.5
}

#[derive(Debug, Clone, Deserialize)]
struct ReadResponse {
    text: String,
}

/// Bridge to the Python OCR stack (printed-text detection plus handwriting
/// recognition). Each call writes the image to a scratch PNG, invokes the
/// script with a `detect` or `read` mode, and parses JSON from stdout.
#[derive(Debug, Clone)]
pub struct OcrBridge {
    python: String,
    script: PathBuf,
}

impl OcrBridge {
    pub fn new(script: PathBuf) -> Self {
        Self {
            python: "python3".to_string(),
            script,
        }
    }

    pub fn with_python(mut self, python: impl Into<String>) -> Self {
        self.python = python.into();
        self
    }

    fn run(&self, mode: &str, image: &RgbImage) -> Result<String> {
        let scratch = tempfile::Builder::new()
            .prefix("ngayky_ocr_")
            .suffix(".png")
            .tempfile()
            .context("failed to create scratch image for the OCR bridge")?;
        image
            .save_with_format(scratch.path(), image::ImageFormat::Png)
            .context("failed to write scratch image for the OCR bridge")?;

        let output = Command::new(&self.python)
            .arg(&self.script)
            .arg(mode)
            .arg("--image")
            .arg(scratch.path())
            .output()
            .with_context(|| "failed to invoke the python OCR bridge")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("OCR bridge {mode} failed: {stderr}");
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl TextRecognizer for OcrBridge {
    fn detect_lines(&self, image: &RgbImage) -> Result<Vec<RecognizedLine>> {
        let stdout = self.run("detect", image)?;
        let tokens: Vec<DetectedToken> =
            serde_json::from_str(&stdout).context("failed to parse OCR detection JSON")?;
        Ok(tokens
            .into_iter()
            .map(|token| RecognizedLine {
                text: token.text,
                region: Quad(token.quad),
            })
            .collect())
    }

    fn read_line(&self, line: &RgbImage) -> Result<String> {
        let stdout = self.run("read", line)?;
        let response: ReadResponse =
            serde_json::from_str(&stdout).context("failed to parse OCR read JSON")?;
        Ok(response.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_tokens_default_their_confidence() {
        let tokens: Vec<DetectedToken> = serde_json::from_str(
            r#"[{"text": "Ngày ký: 01/02/2024", "quad": [[0,0],[10,0],[10,2],[0,2]]}]"#,
        )
        .unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].confidence, 0.5);
        assert_eq!(tokens[0].quad[1], [10.0, 0.0]);
    }
}
