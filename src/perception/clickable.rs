//! Geometric clickable-region detector.
//!
//! Builds a binary edge map from luminance gradients, groups edge pixels into
//! 8-connected components and reports each component's bounding box. Only
//! boxes wider than 50 px and taller than 20 px qualify.
use image::RgbImage;

use crate::perception::types::{Bounds, DetectedRegion};

pub const MIN_CLICKABLE_WIDTH: i32 = 50;
pub const MIN_CLICKABLE_HEIGHT: i32 = 20;
pub const CLICKABLE_CONFIDENCE: f32 = 0.8;

#[derive(Debug, Clone)]
pub struct ClickableRegionDetector {
    edge_threshold: u8,
}

impl Default for ClickableRegionDetector {
    fn default() -> Self {
        Self::new(24)
    }
}

impl ClickableRegionDetector {
    pub fn new(edge_threshold: u8) -> Self {
        Self { edge_threshold }
    }

    pub fn detect(&self, image: &RgbImage) -> Vec<DetectedRegion> {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return Vec::new();
        }
        let edges = self.edge_map(image);
        let regions: Vec<DetectedRegion> = connected_boxes(&edges, w as usize, h as usize)
            .into_iter()
            .filter(|b| b.width > MIN_CLICKABLE_WIDTH && b.height > MIN_CLICKABLE_HEIGHT)
            .map(|bounds| DetectedRegion {
                bounds,
                text: String::new(),
                confidence: CLICKABLE_CONFIDENCE,
            })
            .collect();
        tracing::debug!(count = regions.len(), "clickable regions");
        regions
    }

    /// A pixel is an edge when the luminance step to its right or lower
    /// neighbour exceeds the threshold.
    fn edge_map(&self, image: &RgbImage) -> Vec<bool> {
        let gray = image::DynamicImage::ImageRgb8(image.clone()).to_luma8();
        let (w, h) = gray.dimensions();
        let (w, h) = (w as usize, h as usize);
        let px = gray.as_raw();
        let t = self.edge_threshold as i16;

        let mut edges = vec![false; w * h];
        for y in 0..h {
            for x in 0..w {
                let v = px[y * w + x] as i16;
                let right = if x + 1 < w { (px[y * w + x + 1] as i16 - v).abs() } else { 0 };
                let down = if y + 1 < h { (px[(y + 1) * w + x] as i16 - v).abs() } else { 0 };
                edges[y * w + x] = right > t || down > t;
            }
        }
        edges
    }
}

/// Regions enclosed by 8-connected components of `mask`, in scan order of
/// their first pixel.
fn connected_boxes(mask: &[bool], w: usize, h: usize) -> Vec<Bounds> {
    let mut visited = vec![false; mask.len()];
    let mut boxes = Vec::new();
    let mut stack = Vec::new();

    for start in 0..mask.len() {
        if !mask[start] || visited[start] {
            continue;
        }
        visited[start] = true;
        stack.push(start);
        let (mut x1, mut y1, mut x2, mut y2) = (usize::MAX, usize::MAX, 0usize, 0usize);

        while let Some(idx) = stack.pop() {
            let (x, y) = (idx % w, idx / w);
            x1 = x1.min(x);
            y1 = y1.min(y);
            x2 = x2.max(x);
            y2 = y2.max(y);

            for dy in -1i64..=1 {
                for dx in -1i64..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = x as i64 + dx;
                    let ny = y as i64 + dy;
                    if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                        continue;
                    }
                    let n = ny as usize * w + nx as usize;
                    if mask[n] && !visited[n] {
                        visited[n] = true;
                        stack.push(n);
                    }
                }
            }
        }

        // An edge pixel sits just before the transition it marks, so the
        // region starts one past the leading edge and ends on the trailing one.
        boxes.push(Bounds::new(
            x1 as i32 + 1,
            y1 as i32 + 1,
            (x2 - x1) as i32,
            (y2 - y1) as i32,
        ));
    }
    boxes
}
