//! Primary-monitor capture via xcap.
use async_trait::async_trait;

use crate::errors::{JarvisError, JarvisResult};
use crate::perception::traits::ScreenCapture;
use crate::perception::types::Screenshot;

#[derive(Debug, Default, Clone, Copy)]
pub struct XcapCapture;

impl XcapCapture {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ScreenCapture for XcapCapture {
    async fn capture(&self) -> JarvisResult<Screenshot> {
        tokio::task::spawn_blocking(capture_primary_sync)
            .await
            .map_err(|e| JarvisError::Perception(format!("join: {e}")))?
    }
}

fn capture_primary_sync() -> JarvisResult<Screenshot> {
    let monitors = xcap::Monitor::all()
        .map_err(|e| JarvisError::Perception(format!("enumerate monitors: {e}")))?;
    let monitor = monitors
        .iter()
        .find(|m| m.is_primary())
        .or_else(|| monitors.first())
        .ok_or_else(|| JarvisError::Perception("no monitor available".into()))?;

    let raw = monitor
        .capture_image()
        .map_err(|e| JarvisError::Perception(format!("capture: {e}")))?;

    // Rebuild through raw bytes so the image crate version used by xcap does not matter.
    let (w, h) = (raw.width(), raw.height());
    let rgba = image::RgbaImage::from_raw(w, h, raw.into_raw())
        .ok_or_else(|| JarvisError::Perception("capture buffer size mismatch".into()))?;
    let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();

    tracing::debug!(width = w, height = h, "screen captured");
    Ok(Screenshot::new(rgb))
}
