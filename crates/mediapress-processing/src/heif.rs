//! HEIF decode seam.
//!
//! HEIC/HEIF decoding is an external capability: the pipeline only owns the
//! call contract (raw bytes in, decoded bitmap out). The default
//! implementation shells out to a converter tool through a temp file: `sips`
//! on macOS (built-in), an ImageMagick-compatible `convert` elsewhere.

use anyhow::{Context, Result};
use async_trait::async_trait;
use image::DynamicImage;
use tokio::process::Command;

/// External HEIC/HEIF decode capability.
#[async_trait]
pub trait HeifDecoder: Send + Sync {
    /// Decode HEIC/HEIF bytes into a bitmap.
    async fn decode(&self, data: &[u8]) -> Result<DynamicImage>;
}

/// Decoder backed by a command-line converter tool.
pub struct CommandHeifDecoder {
    tool_path: String,
}

impl CommandHeifDecoder {
    pub fn new(tool_path: impl Into<String>) -> Self {
        Self {
            tool_path: tool_path.into(),
        }
    }
}

impl Default for CommandHeifDecoder {
    fn default() -> Self {
        Self::new("convert")
    }
}

#[async_trait]
impl HeifDecoder for CommandHeifDecoder {
    async fn decode(&self, data: &[u8]) -> Result<DynamicImage> {
        let dir = tempfile::tempdir().context("Failed to create temp directory")?;
        let input = dir.path().join("input.heic");
        let output = dir.path().join("output.png");

        tokio::fs::write(&input, data)
            .await
            .context("Failed to write HEIC temp file")?;

        let status = if cfg!(target_os = "macos") {
            // sips is built into macOS, no extra dependencies
            Command::new("sips")
                .arg("-s")
                .arg("format")
                .arg("png")
                .arg(&input)
                .arg("--out")
                .arg(&output)
                .status()
                .await
                .context("Failed to execute sips command")?
        } else {
            Command::new(&self.tool_path)
                .arg(&input)
                .arg(&output)
                .status()
                .await
                .with_context(|| format!("Failed to execute {} command", self.tool_path))?
        };

        if !status.success() {
            anyhow::bail!("HEIC converter exited with status: {}", status);
        }

        let png = tokio::fs::read(&output)
            .await
            .context("Failed to read converted output")?;

        let img = tokio::task::spawn_blocking(move || image::load_from_memory(&png))
            .await
            .context("Decode task panicked")?
            .context("Failed to decode converted image")?;

        tracing::debug!(
            width = img.width(),
            height = img.height(),
            "HEIC decode successful"
        );

        Ok(img)
    }
}
