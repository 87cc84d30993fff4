use async_trait::async_trait;

use crate::errors::JarvisResult;
use crate::perception::types::{DetectedRegion, Screenshot, UIElement};

/// Source of the current screen raster.
#[async_trait]
pub trait ScreenCapture: Send + Sync {
    async fn capture(&self) -> JarvisResult<Screenshot>;
}

/// Turns a screen capture into UI-element candidates.
///
/// Order and count are not stable across calls. Internal faults produce an
/// empty list, never an error.
#[async_trait]
pub trait PerceptionProvider: Send + Sync {
    async fn analyze(&self, screenshot: &Screenshot) -> Vec<UIElement>;
}

/// OCR-like text-region detector.
#[async_trait]
pub trait TextRegionDetector: Send + Sync {
    async fn detect(&self, screenshot: &Screenshot) -> JarvisResult<Vec<DetectedRegion>>;
}

/// Assigns an element type tag to a cropped region. CPU-bound; called from a
/// blocking thread.
pub trait ElementClassifier: Send + Sync {
    fn classify(&self, region: &image::RgbImage) -> JarvisResult<String>;
}
