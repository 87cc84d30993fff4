//! Perception pipeline: text-region detection, clickable-region detection and
//! element classification combined into the production `PerceptionProvider`.
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{JarvisError, JarvisResult};
use crate::perception::clickable::ClickableRegionDetector;
use crate::perception::traits::{ElementClassifier, PerceptionProvider, TextRegionDetector};
use crate::perception::types::{DetectedRegion, Screenshot, UIElement};

pub struct LayoutAnalyzer {
    text_detector: Arc<dyn TextRegionDetector>,
    clickable: ClickableRegionDetector,
    classifier: Arc<dyn ElementClassifier>,
}

impl LayoutAnalyzer {
    pub fn new(
        text_detector: Arc<dyn TextRegionDetector>,
        clickable: ClickableRegionDetector,
        classifier: Arc<dyn ElementClassifier>,
    ) -> Self {
        Self {
            text_detector,
            clickable,
            classifier,
        }
    }

    /// Full pipeline with errors surfaced:
    ///
    /// 1. Text regions (OCR).
    /// 2. Clickable regions (edge components, on a blocking thread).
    /// 3. Union of both lists, text first; overlaps are kept.
    /// 4. Each region cropped and classified.
    pub async fn try_analyze(&self, screenshot: &Screenshot) -> JarvisResult<Vec<UIElement>> {
        let text_regions = self.text_detector.detect(screenshot).await?;

        let shot = screenshot.clone();
        let detector = self.clickable.clone();
        let clickable_regions = tokio::task::spawn_blocking(move || detector.detect(shot.image()))
            .await
            .map_err(|e| JarvisError::Perception(format!("join: {e}")))?;

        tracing::debug!(
            text = text_regions.len(),
            clickable = clickable_regions.len(),
            "regions detected"
        );

        let regions: Vec<DetectedRegion> = text_regions.into_iter().chain(clickable_regions).collect();

        let shot = screenshot.clone();
        let classifier = self.classifier.clone();
        tokio::task::spawn_blocking(move || classify_all(&shot, regions, classifier.as_ref()))
            .await
            .map_err(|e| JarvisError::Perception(format!("join: {e}")))?
    }
}

#[async_trait]
impl PerceptionProvider for LayoutAnalyzer {
    async fn analyze(&self, screenshot: &Screenshot) -> Vec<UIElement> {
        match self.try_analyze(screenshot).await {
            Ok(elements) => {
                tracing::debug!(count = elements.len(), "UI elements perceived");
                elements
            }
            Err(e) => {
                tracing::warn!(error = %e, "perception failed, reporting no elements");
                Vec::new()
            }
        }
    }
}

fn classify_all(
    screenshot: &Screenshot,
    regions: Vec<DetectedRegion>,
    classifier: &dyn ElementClassifier,
) -> JarvisResult<Vec<UIElement>> {
    let image = screenshot.image();
    let (w, h) = image.dimensions();

    regions
        .into_iter()
        .filter_map(|region| {
            // Regions entirely off-frame have nothing to classify.
            let (x, y, cw, ch) = region.bounds.clamp_to(w, h)?;
            let roi = image::imageops::crop_imm(image, x, y, cw, ch).to_image();
            Some(classifier.classify(&roi).map(|element_type| UIElement {
                bounds: region.bounds,
                element_type,
                text_content: region.text,
                confidence: region.confidence,
                semantic_tags: Vec::new(),
            }))
        })
        .collect()
}
