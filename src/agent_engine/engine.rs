use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::agent_engine::event_bus::EventBus;
use crate::agent_engine::history::RunHistory;
use crate::agent_engine::state::{ExecutionEvent, StepState};
use crate::errors::{ExecutionError, JarvisError};
use crate::executor::input::ActuationProvider;
use crate::matching::matcher::SemanticMatcher;
use crate::matching::resolve::resolve_element;
use crate::perception::traits::{PerceptionProvider, ScreenCapture};
use crate::perception::types::UIElement;
use crate::workflow::types::{ActionType, Plan, ScreenPoint, WorkflowStep};
use crate::workflow::{PlanGenerator, PlanSource};

/// Lines scrolled when a scroll step carries no usable count.
pub const DEFAULT_SCROLL_LINES: i32 = 3;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Pause after a successful non-wait step, before the next step starts.
    pub settle_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(500),
        }
    }
}

/// Closed-loop executor: instruction → plan → per step (capture → perceive →
/// resolve → act).
///
/// Steps run strictly in order. The first failed step aborts the plan;
/// actions already performed are not undone.
pub struct ExecutionEngine {
    planner: PlanGenerator,
    capture: Arc<dyn ScreenCapture>,
    perception: Arc<dyn PerceptionProvider>,
    matcher: Arc<dyn SemanticMatcher>,
    actuator: Arc<dyn ActuationProvider>,
    config: EngineConfig,
    /// The physical screen and input devices. Held for a whole plan.
    device: Arc<Mutex<()>>,
    events: EventBus,
    history: Option<RunHistory>,
}

impl ExecutionEngine {
    pub fn new(
        planner: PlanGenerator,
        capture: Arc<dyn ScreenCapture>,
        perception: Arc<dyn PerceptionProvider>,
        matcher: Arc<dyn SemanticMatcher>,
        actuator: Arc<dyn ActuationProvider>,
    ) -> Self {
        Self {
            planner,
            capture,
            perception,
            matcher,
            actuator,
            config: EngineConfig::default(),
            device: Arc::new(Mutex::new(())),
            events: EventBus::new(),
            history: None,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_history(mut self, history: RunHistory) -> Self {
        self.history = Some(history);
        self
    }

    /// Share the device lock with other engines driving the same screen.
    pub fn with_device_lock(mut self, device: Arc<Mutex<()>>) -> Self {
        self.device = device;
        self
    }

    pub fn planner(&self) -> &PlanGenerator {
        &self.planner
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn history(&self) -> Option<&RunHistory> {
        self.history.as_ref()
    }

    /// Produce the plan for an instruction without executing anything.
    pub async fn plan(&self, instruction: &str) -> (Plan, PlanSource) {
        self.planner.generate(instruction).await
    }

    /// Plan the instruction, then execute it. A plan with no steps fails
    /// before any perception or actuation.
    pub async fn execute_instruction(&self, instruction: &str) -> Result<(), ExecutionError> {
        tracing::info!(instruction = %instruction, "instruction received");
        let (plan, source) = self.planner.generate(instruction).await;

        self.events.publish(ExecutionEvent::PlanReady {
            source,
            steps: plan.iter().map(WorkflowStep::summary).collect(),
        });

        if plan.is_empty() {
            let err = ExecutionError::Generation {
                reason: "no plan could be produced for the instruction".into(),
            };
            tracing::warn!(instruction = %instruction, "{err}");
            self.record(instruction, None, None, err.kind(), Some(err.to_string()));
            self.finish(Err(&err));
            return Err(err);
        }

        self.record(
            instruction,
            None,
            None,
            "plan",
            Some(format!("{} steps from {:?}", plan.len(), source)),
        );
        self.run_plan(instruction, &plan).await
    }

    /// Execute every step in order. `Ok` iff every step reached `Done`.
    pub async fn execute_plan(&self, plan: &Plan) -> Result<(), ExecutionError> {
        self.run_plan("", plan).await
    }

    async fn run_plan(&self, instruction: &str, plan: &Plan) -> Result<(), ExecutionError> {
        let _device = self.device.lock().await;
        tracing::info!(steps = plan.len(), "executing plan");

        for (index, step) in plan.iter().enumerate() {
            self.events.publish(ExecutionEvent::StepStarted {
                index,
                action: step.action_type,
                summary: step.summary(),
            });
            tracing::info!(step = index, action = %step.action_type, target = %step.target_description, "step started");

            match self.run_step(index, step).await {
                Ok(()) => {
                    self.events.publish(ExecutionEvent::StepDone { index });
                    self.record(instruction, Some(index), Some(step), "done", None);
                }
                Err(err) => {
                    tracing::warn!(step = index, kind = err.kind(), "{err}");
                    self.events.publish(ExecutionEvent::StepFailed {
                        index,
                        reason: err.to_string(),
                    });
                    self.record(instruction, Some(index), Some(step), err.kind(), Some(err.to_string()));
                    self.finish(Err(&err));
                    return Err(err);
                }
            }

            let more_steps = index + 1 < plan.len();
            if more_steps && step.action_type != ActionType::Wait && !self.config.settle_delay.is_zero() {
                tracing::debug!(ms = self.config.settle_delay.as_millis() as u64, "settling");
                tokio::time::sleep(self.config.settle_delay).await;
            }
        }

        tracing::info!("plan completed");
        self.finish(Ok(()));
        Ok(())
    }

    /// Drives one step through its state machine until it is terminal.
    async fn run_step(&self, index: usize, step: &WorkflowStep) -> Result<(), ExecutionError> {
        let mut state = StepState::Pending;
        let mut candidates: Vec<UIElement> = Vec::new();
        let mut deadline = Instant::now() + step_deadline(step);

        loop {
            tracing::debug!(step = index, state = state.name(), "step state");
            self.events.publish(ExecutionEvent::StateChanged {
                index,
                state: state.name(),
            });

            state = match state {
                // ── Pending: choose the path ──────────────────────────────
                StepState::Pending => match (step.action_type, step.coordinates) {
                    (ActionType::Wait, _) => StepState::Sleeping,
                    (_, Some(point)) => StepState::Acting { point },
                    (_, None) => StepState::Capturing,
                },

                // ── Sleeping: wait steps only ─────────────────────────────
                StepState::Sleeping => {
                    tracing::info!(step = index, secs = step.timeout_seconds, "waiting");
                    tokio::time::sleep(Duration::from_secs(step.timeout_seconds)).await;
                    StepState::Done
                }

                // ── Capturing: fresh screen, fresh candidates ─────────────
                StepState::Capturing => {
                    // capture, perception and matching share one deadline
                    deadline = Instant::now() + step_deadline(step);
                    candidates = self.perceive(index, step, deadline).await;
                    StepState::Matching {
                        candidates: candidates.len(),
                    }
                }

                // ── Matching: resolve the target description ──────────────
                StepState::Matching { .. } => {
                    let resolving = resolve_element(self.matcher.as_ref(), &step.target_description, &candidates);
                    match tokio::time::timeout_at(deadline, resolving).await {
                        Err(_) => {
                            tracing::warn!(step = index, secs = step.timeout_seconds, "matching deadline exceeded");
                            StepState::Failed(ExecutionError::Resolution {
                                step: index,
                                target: step.target_description.clone(),
                            })
                        }
                        Ok(Some(m)) => {
                            let point = m.element.bounds.center();
                            tracing::info!(
                                step = index,
                                score = m.score,
                                element = %m.element.match_text(),
                                x = point.x,
                                y = point.y,
                                "target matched"
                            );
                            StepState::Acting { point }
                        }
                        Ok(None) => StepState::Failed(ExecutionError::Resolution {
                            step: index,
                            target: step.target_description.clone(),
                        }),
                    }
                }

                // ── Acting: one actuation call ────────────────────────────
                StepState::Acting { point } => match self.act(index, step, point).await {
                    Ok(()) => StepState::Done,
                    Err(e) => StepState::Failed(e),
                },

                StepState::Done => return Ok(()),
                StepState::Failed(err) => return Err(err),
            };
        }
    }

    /// Capture + perception under the step deadline. Every fault here ends
    /// up as an empty candidate list.
    async fn perceive(&self, index: usize, step: &WorkflowStep, deadline: Instant) -> Vec<UIElement> {
        let work = async {
            let screenshot = self.capture.capture().await?;
            Ok::<_, JarvisError>(self.perception.analyze(&screenshot).await)
        };

        match tokio::time::timeout_at(deadline, work).await {
            Ok(Ok(elements)) => {
                tracing::debug!(step = index, count = elements.len(), "candidates perceived");
                elements
            }
            Ok(Err(e)) => {
                tracing::warn!(step = index, error = %e, "screen capture failed");
                Vec::new()
            }
            Err(_) => {
                tracing::warn!(step = index, secs = step.timeout_seconds, "perception deadline exceeded");
                Vec::new()
            }
        }
    }

    async fn act(&self, index: usize, step: &WorkflowStep, point: ScreenPoint) -> Result<(), ExecutionError> {
        let call = async {
            match step.action_type {
                ActionType::Click => self.actuator.click(point.x, point.y).await,
                ActionType::Type => {
                    self.actuator
                        .type_text(step.value.as_deref().unwrap_or_default())
                        .await
                }
                ActionType::Enter => self.actuator.press_enter().await,
                ActionType::Scroll => {
                    self.actuator
                        .scroll(point.x, point.y, scroll_lines(step))
                        .await
                }
                ActionType::Wait => true,
            }
        };

        let reason = match tokio::time::timeout(step_deadline(step), call).await {
            Ok(true) => return Ok(()),
            Ok(false) => "input injection reported failure".to_string(),
            Err(_) => format!("no response within {}s", step.timeout_seconds),
        };
        Err(ExecutionError::Actuation {
            step: index,
            action: step.action_type.to_string(),
            reason,
        })
    }

    fn finish(&self, outcome: Result<(), &ExecutionError>) {
        self.events.publish(ExecutionEvent::Finished {
            success: outcome.is_ok(),
            reason: outcome.err().map(ToString::to_string),
        });
    }

    fn record(
        &self,
        instruction: &str,
        index: Option<usize>,
        step: Option<&WorkflowStep>,
        outcome: &str,
        detail: Option<String>,
    ) {
        let Some(history) = &self.history else {
            return;
        };
        let mut entry = history.entry(instruction, outcome);
        entry.step = index;
        entry.action = step.map(|s| s.action_type.to_string());
        entry.target = step.map(|s| s.target_description.clone());
        entry.detail = detail;
        history.record(&entry);
    }
}

/// Per-call deadline for non-wait steps. A zero timeout still allows one second.
fn step_deadline(step: &WorkflowStep) -> Duration {
    Duration::from_secs(step.timeout_seconds.max(1))
}

fn scroll_lines(step: &WorkflowStep) -> i32 {
    step.value
        .as_deref()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_SCROLL_LINES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perception::types::Bounds;
    use crate::testing::{Actuation, FakeCapture, RecordingActuator, ScriptedMatcher, ScriptedPerception, SlowMatcher};
    use crate::workflow::library::WorkflowLibrary;

    fn element(text: &str, x: i32, y: i32, w: i32, h: i32) -> UIElement {
        UIElement {
            bounds: Bounds::new(x, y, w, h),
            element_type: "button".into(),
            text_content: text.into(),
            confidence: 0.9,
            semantic_tags: vec![],
        }
    }

    struct Rig {
        capture: Arc<FakeCapture>,
        perception: Arc<ScriptedPerception>,
        matcher: Arc<ScriptedMatcher>,
        actuator: Arc<RecordingActuator>,
    }

    impl Rig {
        fn new(elements: Vec<UIElement>, matcher: ScriptedMatcher) -> Self {
            Self {
                capture: Arc::new(FakeCapture::new()),
                perception: Arc::new(ScriptedPerception::new(elements)),
                matcher: Arc::new(matcher),
                actuator: Arc::new(RecordingActuator::new()),
            }
        }

        fn engine_with(&self, planner: PlanGenerator) -> ExecutionEngine {
            ExecutionEngine::new(
                planner,
                self.capture.clone(),
                self.perception.clone(),
                self.matcher.clone(),
                self.actuator.clone(),
            )
        }

        fn engine(&self) -> ExecutionEngine {
            self.engine_with(PlanGenerator::new(WorkflowLibrary::new(), None))
        }
    }

    fn plan(steps: Vec<WorkflowStep>) -> Plan {
        Plan::new(steps).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn wait_step_touches_no_collaborator() {
        let rig = Rig::new(vec![element("Play", 0, 0, 100, 40)], ScriptedMatcher::new());
        let started = tokio::time::Instant::now();

        rig.engine()
            .execute_plan(&plan(vec![WorkflowStep::wait("let it load", 2)]))
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_secs(2));
        assert_eq!(rig.capture.calls(), 0);
        assert_eq!(rig.perception.calls(), 0);
        assert_eq!(rig.matcher.calls(), 0);
        assert!(rig.actuator.log().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn click_lands_on_matched_element_center() {
        let rig = Rig::new(
            vec![element("Cancel", 0, 0, 100, 40), element("Play", 200, 100, 81, 41)],
            ScriptedMatcher::new().with("Play", 0.93),
        );

        rig.engine()
            .execute_plan(&plan(vec![WorkflowStep::click("play button")]))
            .await
            .unwrap();

        assert_eq!(rig.actuator.log(), vec![Actuation::Click(240, 120)]);
        assert_eq!(rig.capture.calls(), 1);
        assert_eq!(rig.matcher.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn halts_at_first_unresolved_step() {
        let rig = Rig::new(
            vec![element("Play", 0, 0, 100, 40), element("Search", 0, 100, 100, 40)],
            ScriptedMatcher::new().with_pair("play button", "Play", 0.9),
        );

        let err = rig
            .engine()
            .execute_plan(&plan(vec![
                WorkflowStep::click("play button"),
                WorkflowStep::click("settings gear"),
                WorkflowStep::type_text("search box", "jazz"),
            ]))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ExecutionError::Resolution {
                step: 1,
                target: "settings gear".into()
            }
        );
        assert_eq!(rig.actuator.log(), vec![Actuation::Click(50, 20)]);
        assert_eq!(rig.perception.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn no_elements_means_resolution_failure() {
        let rig = Rig::new(vec![], ScriptedMatcher::new().with("Play", 1.0));

        let err = rig
            .engine()
            .execute_plan(&plan(vec![WorkflowStep::enter("search box")]))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "resolution_failure");
        assert_eq!(rig.matcher.calls(), 0);
        assert!(rig.actuator.log().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn coordinates_bypass_perception() {
        let rig = Rig::new(vec![], ScriptedMatcher::new());

        rig.engine()
            .execute_plan(&plan(vec![
                WorkflowStep::click("anything").at(10, 20),
                WorkflowStep::scroll("results", -5).at(50, 60),
            ]))
            .await
            .unwrap();

        assert_eq!(rig.capture.calls(), 0);
        assert_eq!(rig.perception.calls(), 0);
        assert_eq!(
            rig.actuator.log(),
            vec![Actuation::Click(10, 20), Actuation::Scroll(50, 60, -5)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn actuation_failure_aborts_plan() {
        let rig = Rig {
            actuator: Arc::new(RecordingActuator::failing()),
            ..Rig::new(vec![], ScriptedMatcher::new())
        };

        let err = rig
            .engine()
            .execute_plan(&plan(vec![
                WorkflowStep::click("ok").at(1, 1),
                WorkflowStep::enter("field").at(2, 2),
            ]))
            .await
            .unwrap_err();

        assert!(matches!(err, ExecutionError::Actuation { step: 0, .. }));
        assert_eq!(rig.actuator.log().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_actuation_hits_deadline() {
        let rig = Rig {
            actuator: Arc::new(RecordingActuator::hanging()),
            ..Rig::new(vec![], ScriptedMatcher::new())
        };

        let err = rig
            .engine()
            .execute_plan(&plan(vec![WorkflowStep::click("ok").at(1, 1).with_timeout(2)]))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ExecutionError::Actuation {
                step: 0,
                action: "click".into(),
                reason: "no response within 2s".into()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn hung_capture_counts_as_no_elements() {
        let rig = Rig {
            capture: Arc::new(FakeCapture::hanging()),
            ..Rig::new(vec![element("Play", 0, 0, 100, 40)], ScriptedMatcher::new().with("Play", 1.0))
        };

        let err = rig
            .engine()
            .execute_plan(&plan(vec![WorkflowStep::click("play").with_timeout(3)]))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "resolution_failure");
        assert_eq!(rig.perception.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_matching_hits_step_deadline() {
        let rig = Rig::new(
            (0..10).map(|i| element("OK", i * 50, 0, 40, 20)).collect(),
            ScriptedMatcher::new(),
        );
        let matcher = Arc::new(SlowMatcher::new());
        let engine = ExecutionEngine::new(
            PlanGenerator::new(WorkflowLibrary::new(), None),
            rig.capture.clone(),
            rig.perception.clone(),
            matcher.clone(),
            rig.actuator.clone(),
        );
        let started = tokio::time::Instant::now();

        let err = engine
            .execute_plan(&plan(vec![WorkflowStep::click("ok").with_timeout(2)]))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ExecutionError::Resolution {
                step: 0,
                target: "ok".into()
            }
        );
        assert!(started.elapsed() < Duration::from_secs(3));
        assert_eq!(matcher.calls(), 1);
        assert!(rig.actuator.log().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_capture_counts_as_no_elements() {
        let rig = Rig {
            capture: Arc::new(FakeCapture::failing()),
            ..Rig::new(vec![element("Play", 0, 0, 100, 40)], ScriptedMatcher::new().with("Play", 1.0))
        };

        let err = rig
            .engine()
            .execute_plan(&plan(vec![WorkflowStep::click("play")]))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "resolution_failure");
    }

    #[tokio::test(start_paused = true)]
    async fn settle_delay_only_between_steps() {
        let rig = Rig::new(vec![], ScriptedMatcher::new());
        let engine = rig.engine();

        let started = tokio::time::Instant::now();
        engine
            .execute_plan(&plan(vec![WorkflowStep::click("a").at(1, 1)]))
            .await
            .unwrap();
        assert!(started.elapsed() < Duration::from_millis(500));

        let started = tokio::time::Instant::now();
        engine
            .execute_plan(&plan(vec![
                WorkflowStep::click("a").at(1, 1),
                WorkflowStep::click("b").at(2, 2),
            ]))
            .await
            .unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(500));
        assert!(elapsed < Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn empty_plan_succeeds_without_perception() {
        let rig = Rig::new(vec![], ScriptedMatcher::new());
        rig.engine().execute_plan(&Plan::empty()).await.unwrap();
        assert_eq!(rig.capture.calls(), 0);
    }

    #[tokio::test]
    async fn instruction_without_plan_is_generation_failure() {
        let rig = Rig::new(vec![element("Play", 0, 0, 100, 40)], ScriptedMatcher::new());

        let err = rig.engine().execute_instruction("do something odd").await.unwrap_err();

        assert_eq!(err.kind(), "generation_failure");
        assert_eq!(rig.capture.calls(), 0);
        assert_eq!(rig.perception.calls(), 0);
        assert!(rig.actuator.log().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn instruction_runs_library_plan_and_reports_progress() {
        let rig = Rig::new(
            vec![element("Body", 0, 200, 400, 300)],
            ScriptedMatcher::new().with("Body", 0.95),
        );
        let mut library = WorkflowLibrary::new();
        library.insert(
            "write a note",
            plan(vec![
                WorkflowStep::click("Notes").at(5, 5),
                WorkflowStep::type_text("note body", "hello"),
            ]),
        );
        let engine = rig.engine_with(PlanGenerator::new(library, None));
        let mut events = engine.events().subscribe();

        engine.execute_instruction("Please write a note").await.unwrap();

        assert_eq!(
            rig.actuator.log(),
            vec![Actuation::Click(5, 5), Actuation::Type("hello".into())]
        );

        let mut seen = Vec::new();
        while let Ok(event) = events.try_recv() {
            seen.push(event);
        }
        assert!(matches!(
            seen.first(),
            Some(ExecutionEvent::PlanReady {
                source: PlanSource::Library,
                ..
            })
        ));
        assert_eq!(
            seen.last(),
            Some(&ExecutionEvent::Finished {
                success: true,
                reason: None
            })
        );
        let states: Vec<&str> = seen
            .iter()
            .filter_map(|e| match e {
                ExecutionEvent::StateChanged { index: 1, state } => Some(*state),
                _ => None,
            })
            .collect();
        assert_eq!(states, vec!["pending", "capturing", "matching", "acting", "done"]);
    }

    #[tokio::test(start_paused = true)]
    async fn outcomes_are_written_to_history() {
        let dir = tempfile::tempdir().unwrap();
        let rig = Rig::new(
            vec![element("Play", 0, 0, 100, 40)],
            ScriptedMatcher::new().with_pair("play", "Play", 0.9),
        );
        let engine = rig.engine().with_history(RunHistory::at(dir.path()));

        let _ = engine
            .execute_plan(&plan(vec![WorkflowStep::click("play"), WorkflowStep::click("stop")]))
            .await;

        let entries = engine.history().unwrap().read_all().unwrap();
        let outcomes: Vec<&str> = entries.iter().map(|e| e.outcome.as_str()).collect();
        assert_eq!(outcomes, vec!["done", "resolution_failure"]);
        assert_eq!(entries[1].step, Some(1));
        assert_eq!(entries[1].target.as_deref(), Some("stop"));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_plans_do_not_interleave() {
        let rig = Rig::new(vec![], ScriptedMatcher::new());
        let engine = Arc::new(rig.engine());

        let a = plan(vec![WorkflowStep::click("a").at(1, 1), WorkflowStep::click("a").at(1, 1)]);
        let b = plan(vec![WorkflowStep::click("b").at(2, 2), WorkflowStep::click("b").at(2, 2)]);

        let (ra, rb) = tokio::join!(engine.execute_plan(&a), engine.execute_plan(&b));
        ra.unwrap();
        rb.unwrap();

        let log = rig.actuator.log();
        assert_eq!(log.len(), 4);
        assert_eq!(log[0], log[1]);
        assert_eq!(log[2], log[3]);
        assert_ne!(log[1], log[2]);
    }

    #[tokio::test(start_paused = true)]
    async fn engines_sharing_a_device_lock_take_turns() {
        let rig = Rig::new(vec![], ScriptedMatcher::new());
        let device = Arc::new(Mutex::new(()));
        let first = rig.engine().with_device_lock(device.clone());
        let second = rig.engine().with_device_lock(device);

        let a = plan(vec![WorkflowStep::click("a").at(1, 1), WorkflowStep::click("a").at(1, 1)]);
        let b = plan(vec![WorkflowStep::click("b").at(2, 2), WorkflowStep::click("b").at(2, 2)]);

        let (ra, rb) = tokio::join!(first.execute_plan(&a), second.execute_plan(&b));
        ra.unwrap();
        rb.unwrap();

        let log = rig.actuator.log();
        assert_eq!(log.len(), 4);
        assert_eq!(log[0], log[1]);
        assert_eq!(log[2], log[3]);
        assert_ne!(log[1], log[2]);
    }
}
