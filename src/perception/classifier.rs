//! Element-type classification of cropped regions.
//!
//! `OnnxLayoutClassifier` runs an image-classification ONNX model (NCHW,
//! 224×224, RGB in [0, 1]) and maps the arg-max logit onto a label list.
//! `FixedClassifier` tags every region with one label.
use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;

use crate::errors::{JarvisError, JarvisResult};
use crate::perception::traits::ElementClassifier;

const INPUT_SIZE: u32 = 224;

#[derive(Debug, Clone)]
pub struct FixedClassifier {
    label: String,
}

impl FixedClassifier {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl ElementClassifier for FixedClassifier {
    fn classify(&self, _region: &image::RgbImage) -> JarvisResult<String> {
        Ok(self.label.clone())
    }
}

pub struct OnnxLayoutClassifier {
    session: Mutex<Session>,
    labels: Vec<String>,
}

impl OnnxLayoutClassifier {
    /// Try to construct a classifier. Returns `None` if the model is missing or fails to load.
    pub fn try_new(model_path: &Path, labels: Vec<String>) -> Option<Self> {
        if !model_path.exists() {
            tracing::warn!(path = %model_path.display(), "layout classifier model not found");
            return None;
        }
        match Self::build(model_path, labels) {
            Ok(classifier) => {
                tracing::info!(path = %model_path.display(), "layout classifier loaded");
                Some(classifier)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load layout classifier");
                None
            }
        }
    }

    fn build(model_path: &Path, labels: Vec<String>) -> JarvisResult<Self> {
        if labels.is_empty() {
            return Err(JarvisError::Perception("classifier needs at least one label".into()));
        }
        let session = Session::builder()
            .map_err(|e| JarvisError::Perception(format!("ort session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| JarvisError::Perception(format!("ort opt-level: {e}")))?
            .commit_from_file(model_path)
            .map_err(|e| JarvisError::Perception(format!("ort load model: {e}")))?;

        Ok(Self {
            session: Mutex::new(session),
            labels,
        })
    }
}

impl ElementClassifier for OnnxLayoutClassifier {
    fn classify(&self, region: &image::RgbImage) -> JarvisResult<String> {
        let input = Tensor::from_array(preprocess(region))
            .map_err(|e| JarvisError::Perception(format!("ort tensor: {e}")))?;

        let logits: Vec<f32> = {
            let mut session = self
                .session
                .lock()
                .map_err(|_| JarvisError::Perception("classifier session poisoned".into()))?;
            let outputs = session
                .run(ort::inputs![input])
                .map_err(|e| JarvisError::Perception(format!("ort run: {e}")))?;
            let view = outputs[0]
                .try_extract_array::<f32>()
                .map_err(|e| JarvisError::Perception(format!("extract tensor: {e}")))?;
            let logits = view.iter().copied().collect();
            logits
        };

        let class = argmax(&logits)
            .ok_or_else(|| JarvisError::Perception("classifier produced no logits".into()))?;
        self.labels
            .get(class)
            .cloned()
            .ok_or_else(|| JarvisError::Perception(format!("class {class} has no label")))
    }
}

/// Resize to the model input and convert HWC → NCHW in [0, 1].
fn preprocess(region: &image::RgbImage) -> Array4<f32> {
    let sz = INPUT_SIZE;
    let resized = image::imageops::resize(region, sz, sz, image::imageops::FilterType::Triangle);
    let mut tensor = Array4::<f32>::zeros((1, 3, sz as usize, sz as usize));
    for (x, y, p) in resized.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = p[c] as f32 / 255.0;
        }
    }
    tensor
}

fn argmax(values: &[f32]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best: Option<(usize, f32)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Label set matching the ten-class layout model.
pub fn default_layout_labels() -> Vec<String> {
    vec![
        "button", "textfield", "menu", "icon", "checkbox", "link", "tab", "image", "text",
        "container",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
