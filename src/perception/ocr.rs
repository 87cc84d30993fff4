//! Text-region detection backends.
//!
//! `TesseractDetector` pipes a PNG of the screen through the `tesseract` CLI
//! (TSV output) and merges word boxes into line regions.
use std::collections::BTreeMap;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::errors::{JarvisError, JarvisResult};
use crate::perception::traits::TextRegionDetector;
use crate::perception::types::{Bounds, DetectedRegion, Screenshot};

/// Detector that never finds text. Used when OCR is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTextDetector;

#[async_trait]
impl TextRegionDetector for NoTextDetector {
    async fn detect(&self, _screenshot: &Screenshot) -> JarvisResult<Vec<DetectedRegion>> {
        Ok(Vec::new())
    }
}

pub struct TesseractDetector {
    binary: String,
}

impl TesseractDetector {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl TextRegionDetector for TesseractDetector {
    async fn detect(&self, screenshot: &Screenshot) -> JarvisResult<Vec<DetectedRegion>> {
        let mut png = Vec::new();
        screenshot
            .image()
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| JarvisError::Perception(format!("PNG encode: {e}")))?;

        let mut child = tokio::process::Command::new(&self.binary)
            .args(["stdin", "stdout", "--psm", "11", "tsv"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| JarvisError::Perception(format!("spawn {}: {e}", self.binary)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&png).await?;
            // closing stdin lets tesseract start
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(JarvisError::Perception(format!(
                "tesseract exited with {}",
                output.status
            )));
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        let regions = parse_tsv(&tsv);
        tracing::debug!(count = regions.len(), "text regions");
        Ok(regions)
    }
}

/// Groups word rows (level 5) of a tesseract TSV by (block, paragraph, line)
/// into one region per line; confidence is the mean word confidence in 0–1.
pub fn parse_tsv(tsv: &str) -> Vec<DetectedRegion> {
    struct Line {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        words: Vec<String>,
        conf_sum: f32,
    }

    let mut lines: BTreeMap<(u32, u32, u32, u32), Line> = BTreeMap::new();

    for row in tsv.lines().skip(1) {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < 12 || cols[0] != "5" {
            continue;
        }
        let text = cols[11].trim();
        let conf: f32 = cols[10].trim().parse().unwrap_or(-1.0);
        if text.is_empty() || conf < 0.0 {
            continue;
        }
        let num = |i: usize| cols[i].trim().parse::<i32>().ok();
        let (Some(left), Some(top), Some(width), Some(height)) = (num(6), num(7), num(8), num(9)) else {
            continue;
        };
        let key = |i: usize| cols[i].trim().parse::<u32>().unwrap_or(0);
        let line = lines
            .entry((key(1), key(2), key(3), key(4)))
            .or_insert_with(|| Line {
                x1: i32::MAX,
                y1: i32::MAX,
                x2: i32::MIN,
                y2: i32::MIN,
                words: Vec::new(),
                conf_sum: 0.0,
            });
        line.x1 = line.x1.min(left);
        line.y1 = line.y1.min(top);
        line.x2 = line.x2.max(left + width);
        line.y2 = line.y2.max(top + height);
        line.words.push(text.to_string());
        line.conf_sum += conf;
    }

    lines
        .into_values()
        .map(|l| DetectedRegion {
            bounds: Bounds::new(l.x1, l.y1, l.x2 - l.x1, l.y2 - l.y1),
            confidence: (l.conf_sum / l.words.len() as f32 / 100.0).clamp(0.0, 1.0),
            text: l.words.join(" "),
        })
        .collect()
}
