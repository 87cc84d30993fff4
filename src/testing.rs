//! Test doubles for every collaborator seam.
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::{JarvisError, JarvisResult};
use crate::executor::input::ActuationProvider;
use crate::llm::provider::LlmProvider;
use crate::llm::types::GenerationOptions;
use crate::matching::encoder::TextEncoder;
use crate::matching::matcher::SemanticMatcher;
use crate::perception::traits::{PerceptionProvider, ScreenCapture, TextRegionDetector};
use crate::perception::types::{DetectedRegion, Screenshot, UIElement};

// ── LLM ────────────────────────────────────────────────────────────────────

pub struct FakeLlm {
    reply: String,
    calls: AtomicUsize,
    last_prompt: Mutex<String>,
}

impl FakeLlm {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(String::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> String {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for FakeLlm {
    fn name(&self) -> &str {
        "fake"
    }

    async fn complete(&self, prompt: &str, _options: &GenerationOptions) -> JarvisResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = prompt.to_string();
        Ok(self.reply.clone())
    }
}

// ── Perception ─────────────────────────────────────────────────────────────

enum CaptureMode {
    Blank,
    Failing,
    Hanging,
}

pub struct FakeCapture {
    mode: CaptureMode,
    calls: AtomicUsize,
}

impl FakeCapture {
    /// Always returns a small blank screen.
    pub fn new() -> Self {
        Self::with_mode(CaptureMode::Blank)
    }

    pub fn failing() -> Self {
        Self::with_mode(CaptureMode::Failing)
    }

    /// Never completes.
    pub fn hanging() -> Self {
        Self::with_mode(CaptureMode::Hanging)
    }

    fn with_mode(mode: CaptureMode) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScreenCapture for FakeCapture {
    async fn capture(&self) -> JarvisResult<Screenshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            CaptureMode::Blank => Ok(Screenshot::new(image::RgbImage::new(64, 48))),
            CaptureMode::Failing => Err(JarvisError::Perception("no display".into())),
            CaptureMode::Hanging => std::future::pending().await,
        }
    }
}

/// Returns the same candidates on every call.
pub struct ScriptedPerception {
    elements: Vec<UIElement>,
    calls: AtomicUsize,
}

impl ScriptedPerception {
    pub fn new(elements: Vec<UIElement>) -> Self {
        Self {
            elements,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PerceptionProvider for ScriptedPerception {
    async fn analyze(&self, _screenshot: &Screenshot) -> Vec<UIElement> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.elements.clone()
    }
}

pub struct ScriptedTextDetector {
    regions: Vec<DetectedRegion>,
}

impl ScriptedTextDetector {
    pub fn new(regions: Vec<DetectedRegion>) -> Self {
        Self { regions }
    }
}

#[async_trait]
impl TextRegionDetector for ScriptedTextDetector {
    async fn detect(&self, _screenshot: &Screenshot) -> JarvisResult<Vec<DetectedRegion>> {
        Ok(self.regions.clone())
    }
}

pub struct FailingTextDetector;

#[async_trait]
impl TextRegionDetector for FailingTextDetector {
    async fn detect(&self, _screenshot: &Screenshot) -> JarvisResult<Vec<DetectedRegion>> {
        Err(JarvisError::Perception("ocr backend crashed".into()))
    }
}

// ── Matching ───────────────────────────────────────────────────────────────

/// Scores by `(description, element text)` pair first, then by element text
/// alone; anything else scores 0.
pub struct ScriptedMatcher {
    by_text: HashMap<String, f32>,
    by_pair: HashMap<(String, String), f32>,
    calls: AtomicUsize,
}

impl ScriptedMatcher {
    pub fn new() -> Self {
        Self {
            by_text: HashMap::new(),
            by_pair: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, element_text: &str, score: f32) -> Self {
        self.by_text.insert(element_text.to_string(), score);
        self
    }

    pub fn with_pair(mut self, description: &str, element_text: &str, score: f32) -> Self {
        self.by_pair
            .insert((description.to_string(), element_text.to_string()), score);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SemanticMatcher for ScriptedMatcher {
    async fn score(&self, description: &str, element: &UIElement) -> f32 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = (description.to_string(), element.text_content.clone());
        self.by_pair
            .get(&key)
            .or_else(|| self.by_text.get(&element.text_content))
            .copied()
            .unwrap_or(0.0)
    }
}

/// Takes a minute per score, like an embedding service that stopped answering.
pub struct SlowMatcher {
    calls: AtomicUsize,
}

impl SlowMatcher {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SemanticMatcher for SlowMatcher {
    async fn score(&self, _description: &str, _element: &UIElement) -> f32 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        1.0
    }
}

/// Fixed string → vector table; unknown strings are an error.
pub struct TableEncoder {
    table: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
}

impl TableEncoder {
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.table.insert(text.to_string(), vector);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextEncoder for TableEncoder {
    async fn encode(&self, text: &str) -> JarvisResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.table
            .get(text)
            .cloned()
            .ok_or_else(|| JarvisError::Matching(format!("unknown text: {text}")))
    }
}

pub struct FailingEncoder;

#[async_trait]
impl TextEncoder for FailingEncoder {
    async fn encode(&self, _text: &str) -> JarvisResult<Vec<f32>> {
        Err(JarvisError::Matching("encoder offline".into()))
    }
}

// ── Actuation ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actuation {
    Click(i32, i32),
    Type(String),
    Enter,
    Scroll(i32, i32, i32),
}

#[derive(Clone, Copy)]
enum ActuatorMode {
    Succeed,
    Fail,
    Hang,
}

/// Records every call; the result depends on the mode.
pub struct RecordingActuator {
    mode: ActuatorMode,
    log: Mutex<Vec<Actuation>>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::with_mode(ActuatorMode::Succeed)
    }

    pub fn failing() -> Self {
        Self::with_mode(ActuatorMode::Fail)
    }

    pub fn hanging() -> Self {
        Self::with_mode(ActuatorMode::Hang)
    }

    fn with_mode(mode: ActuatorMode) -> Self {
        Self {
            mode,
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn log(&self) -> Vec<Actuation> {
        self.log.lock().unwrap().clone()
    }

    async fn perform(&self, action: Actuation) -> bool {
        self.log.lock().unwrap().push(action);
        match self.mode {
            ActuatorMode::Succeed => true,
            ActuatorMode::Fail => false,
            ActuatorMode::Hang => std::future::pending().await,
        }
    }
}

#[async_trait]
impl ActuationProvider for RecordingActuator {
    async fn click(&self, x: i32, y: i32) -> bool {
        self.perform(Actuation::Click(x, y)).await
    }

    async fn type_text(&self, text: &str) -> bool {
        self.perform(Actuation::Type(text.to_string())).await
    }

    async fn press_enter(&self) -> bool {
        self.perform(Actuation::Enter).await
    }

    async fn scroll(&self, x: i32, y: i32, lines: i32) -> bool {
        self.perform(Actuation::Scroll(x, y, lines)).await
    }
}
