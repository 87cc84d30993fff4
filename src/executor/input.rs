// Physical input simulation.
use async_trait::async_trait;
use enigo::{Axis, Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};

use crate::errors::{JarvisError, JarvisResult};

/// Injects input into the OS. Every call reports plain success; faults are
/// logged and reported as `false`, never raised.
#[async_trait]
pub trait ActuationProvider: Send + Sync {
    /// Move the pointer to absolute (x, y) and left-click.
    async fn click(&self, x: i32, y: i32) -> bool;
    /// Type into whatever has focus. Empty text is a successful no-op.
    async fn type_text(&self, text: &str) -> bool;
    async fn press_enter(&self) -> bool;
    /// Move to (x, y) and scroll vertically; positive `lines` scrolls down.
    async fn scroll(&self, x: i32, y: i32, lines: i32) -> bool;
}

/// enigo-backed actuator. A fresh `Enigo` connection is opened per call on a
/// blocking thread, so the actuator itself is trivially `Send + Sync`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnigoActuator;

impl EnigoActuator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActuationProvider for EnigoActuator {
    async fn click(&self, x: i32, y: i32) -> bool {
        tracing::info!(x, y, "click");
        run_input("click", move |enigo| {
            enigo.move_mouse(x, y, Coordinate::Abs).map_err(fault)?;
            enigo.button(Button::Left, Direction::Click).map_err(fault)
        })
        .await
    }

    async fn type_text(&self, text: &str) -> bool {
        if text.is_empty() {
            return true;
        }
        tracing::info!(chars = text.chars().count(), "type text");
        let text = text.to_string();
        run_input("type", move |enigo| enigo.text(&text).map_err(fault)).await
    }

    async fn press_enter(&self) -> bool {
        tracing::info!("press enter");
        run_input("enter", |enigo| enigo.key(Key::Return, Direction::Click).map_err(fault)).await
    }

    async fn scroll(&self, x: i32, y: i32, lines: i32) -> bool {
        tracing::info!(x, y, lines, "scroll");
        run_input("scroll", move |enigo| {
            enigo.move_mouse(x, y, Coordinate::Abs).map_err(fault)?;
            enigo.scroll(lines, Axis::Vertical).map_err(fault)
        })
        .await
    }
}

fn fault(e: impl std::fmt::Debug) -> JarvisError {
    JarvisError::Executor(format!("{e:?}"))
}

async fn run_input<F>(op: &'static str, f: F) -> bool
where
    F: FnOnce(&mut Enigo) -> JarvisResult<()> + Send + 'static,
{
    let joined = tokio::task::spawn_blocking(move || {
        let mut enigo = Enigo::new(&Settings::default())
            .map_err(|e| JarvisError::Executor(format!("enigo init: {e:?}")))?;
        f(&mut enigo)
    })
    .await;

    match joined {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::warn!(op, error = %e, "input injection failed");
            false
        }
        Err(e) => {
            tracing::warn!(op, error = %e, "input task panicked");
            false
        }
    }
}
