//! Video thumbnail capture.
//!
//! Given a video URL, probe its duration, seek to the lesser of one second
//! or the duration, grab a single frame, and encode it as a JPEG data URL.
//! Capture is strictly best-effort: any failure (missing tools, network,
//! decode) yields an empty thumbnail and never blocks record creation.
//!
//! The heavy lifting is delegated to ffmpeg/ffprobe, which must be on the
//! path (or configured explicitly) for capture to succeed.

use std::path::PathBuf;
use std::process::Stdio;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::ThumbnailConfig;
use crate::error::{Error, Result};

/// Seek target: one second in, or the start for clips shorter than that.
fn seek_seconds(duration: f64) -> f64 {
    duration.clamp(0.0, 1.0)
}

/// Parse the duration line printed by ffprobe.
fn parse_duration(output: &str) -> Option<f64> {
    let value: f64 = output.trim().parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}

/// Best-effort video frame grabber.
#[derive(Debug, Clone)]
pub struct Thumbnailer {
    enabled: bool,
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    jpeg_quality: u8,
}

impl Thumbnailer {
    /// Build a thumbnailer from configuration.
    #[must_use]
    pub fn from_config(config: &ThumbnailConfig) -> Self {
        Self {
            enabled: config.enabled,
            ffmpeg: config.ffmpeg_path.clone(),
            ffprobe: config.ffprobe_path.clone(),
            jpeg_quality: config.jpeg_quality,
        }
    }

    /// Capture a thumbnail for the given video URL.
    ///
    /// Returns a `data:image/jpeg;base64,...` URL, or an empty string when
    /// capture is disabled, the URL is empty, or anything goes wrong.
    pub async fn capture(&self, video_url: &str) -> String {
        if !self.enabled || video_url.is_empty() {
            return String::new();
        }

        match self.try_capture(video_url).await {
            Ok(data_url) => data_url,
            Err(e) => {
                warn!("could not generate thumbnail for {video_url}: {e}");
                String::new()
            }
        }
    }

    async fn try_capture(&self, video_url: &str) -> Result<String> {
        let duration = self.probe_duration(video_url).await?;
        let seek = seek_seconds(duration);
        debug!("capturing frame at {seek:.2}s of {duration:.2}s");

        let output = Command::new(&self.ffmpeg)
            .args([
                "-v",
                "error",
                "-ss",
                &format!("{seek:.3}"),
                "-i",
                video_url,
                "-frames:v",
                "1",
                "-f",
                "image2pipe",
                "-c:v",
                "mjpeg",
                "-q:v",
                &self.jpeg_quality.to_string(),
                "pipe:1",
            ])
            .stdin(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::thumbnail(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        if output.stdout.is_empty() {
            return Err(Error::thumbnail("ffmpeg produced no frame"));
        }

        Ok(format!(
            "data:image/jpeg;base64,{}",
            STANDARD.encode(&output.stdout)
        ))
    }

    async fn probe_duration(&self, video_url: &str) -> Result<f64> {
        let output = Command::new(&self.ffprobe)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "csv=p=0",
                video_url,
            ])
            .stdin(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::thumbnail(format!(
                "ffprobe exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        parse_duration(&String::from_utf8_lossy(&output.stdout))
            .ok_or_else(|| Error::thumbnail("ffprobe reported no usable duration"))
    }
}
