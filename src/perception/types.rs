use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::workflow::types::ScreenPoint;

/// Pixel rectangle, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Integer-truncated centre; this is where clicks land.
    pub fn center(&self) -> ScreenPoint {
        ScreenPoint {
            x: self.x + self.width / 2,
            y: self.y + self.height / 2,
        }
    }

    /// Intersection with a `w`×`h` image, as unsigned crop parameters.
    pub fn clamp_to(&self, w: u32, h: u32) -> Option<(u32, u32, u32, u32)> {
        let x1 = self.x.max(0) as i64;
        let y1 = self.y.max(0) as i64;
        let x2 = (self.x as i64 + self.width as i64).min(w as i64);
        let y2 = (self.y as i64 + self.height as i64).min(h as i64);
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some((x1 as u32, y1 as u32, (x2 - x1) as u32, (y2 - y1) as u32))
    }
}

/// A perceived candidate region. Produced fresh on every capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UIElement {
    pub bounds: Bounds,
    /// Free-form tag, e.g. "button", "textfield".
    pub element_type: String,
    /// Extracted text, possibly empty.
    pub text_content: String,
    /// Backend certainty in 0.0–1.0.
    pub confidence: f32,
    #[serde(default)]
    pub semantic_tags: Vec<String>,
}

impl UIElement {
    /// `"{element_type} {text_content}"`, trimmed. This is the string the matcher embeds.
    pub fn match_text(&self) -> String {
        format!("{} {}", self.element_type, self.text_content)
            .trim()
            .to_string()
    }
}

/// A detector hit before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedRegion {
    pub bounds: Bounds,
    pub text: String,
    pub confidence: f32,
}

/// RGB raster of the current screen. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Screenshot {
    image: Arc<image::RgbImage>,
}

impl Screenshot {
    pub fn new(image: image::RgbImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    pub fn image(&self) -> &image::RgbImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
