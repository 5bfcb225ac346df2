//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as `TerminalDriver` but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`codeweek_app::Runtime`] orchestration code runs in both production and
//! simulation.
//!
//! Input is scripted through a [`SimHandle`], and every render is recorded as
//! a clone of the [`App`] so tests can assert on exactly what a user would
//! have seen.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use codeweek_app::{App, AppEvent, Driver, KeyInput};
use tokio::sync::mpsc;

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// State shared between the driver and its handle.
#[derive(Default)]
struct Recorded {
    renders: Vec<App>,
    fail_renders: bool,
    stopped: bool,
}

fn lock(state: &Mutex<Recorded>) -> MutexGuard<'_, Recorded> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Simulation driver for deterministic testing.
///
/// Implements [`Driver`] trait so the same [`codeweek_app::Runtime`]
/// orchestration code runs in both production TUI and simulation tests.
pub struct SimDriver {
    events: mpsc::UnboundedReceiver<AppEvent>,
    state: Arc<Mutex<Recorded>>,
}

/// Test-side handle of a [`SimDriver`].
///
/// Dropping the handle (or calling [`finish`](Self::finish)) ends the input
/// stream, which stops the runtime.
#[derive(Clone)]
pub struct SimHandle {
    events: mpsc::UnboundedSender<AppEvent>,
    state: Arc<Mutex<Recorded>>,
}

impl SimDriver {
    /// Create a driver and the handle that scripts it.
    pub fn new() -> (Self, SimHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let state = Arc::new(Mutex::new(Recorded::default()));
        (Self { events: rx, state: Arc::clone(&state) }, SimHandle { events: tx, state })
    }
}

impl SimHandle {
    /// Inject an `AppEvent` for processing.
    pub fn inject(&self, event: AppEvent) {
        let _ = self.events.send(event);
    }

    /// Inject a single key press.
    pub fn key(&self, key: KeyInput) {
        self.inject(AppEvent::Key(key));
    }

    /// Type `text` one character at a time.
    pub fn type_text(&self, text: &str) {
        for c in text.chars() {
            self.key(KeyInput::Char(c));
        }
    }

    /// End the input stream.
    pub fn finish(self) {
        drop(self.events);
    }

    /// Make every following render fail.
    pub fn fail_renders(&self) {
        lock(&self.state).fail_renders = true;
    }

    /// Every App state rendered so far.
    pub fn renders(&self) -> Vec<App> {
        lock(&self.state).renders.clone()
    }

    /// Number of renders so far.
    pub fn render_count(&self) -> usize {
        lock(&self.state).renders.len()
    }

    /// Most recent render.
    pub fn last_render(&self) -> Option<App> {
        lock(&self.state).renders.last().cloned()
    }

    /// Whether the runtime has stopped the driver.
    pub fn is_stopped(&self) -> bool {
        lock(&self.state).stopped
    }

    /// Wait until a render satisfies `predicate`, polling every 5ms.
    ///
    /// Returns that render, or `None` after `timeout`.
    pub async fn wait_for_render<F>(&self, timeout: Duration, predicate: F) -> Option<App>
    where
        F: Fn(&App) -> bool,
    {
        let poll = async {
            loop {
                if let Some(app) = lock(&self.state).renders.iter().rev().find(|a| predicate(a)) {
                    return app.clone();
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };
        tokio::time::timeout(timeout, poll).await.ok()
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        Ok(self.events.recv().await)
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        let mut state = lock(&self.state);
        if state.fail_renders {
            return Err(SimDriverError("render failed".to_string()));
        }
        state.renders.push(app.clone());
        Ok(())
    }

    fn stop(&mut self) {
        lock(&self.state).stopped = true;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn render_records_app_state() {
        let (mut driver, handle) = SimDriver::new();
        let mut app = App::new("alice");
        driver.render(&app).unwrap();

        app.handle(AppEvent::Key(KeyInput::Char('x')));
        driver.render(&app).unwrap();

        let renders = handle.renders();
        assert_eq!(renders.len(), 2);
        assert_eq!(renders[0].char_count(), 0);
        assert_eq!(renders[1].char_count(), 1);
    }

    #[test]
    fn failing_renders_are_not_recorded() {
        let (mut driver, handle) = SimDriver::new();
        handle.fail_renders();

        assert!(driver.render(&App::new("")).is_err());
        assert_eq!(handle.render_count(), 0);
    }

    #[tokio::test]
    async fn finishing_handle_ends_input() {
        let (mut driver, handle) = SimDriver::new();
        handle.key(KeyInput::Tab);
        handle.finish();

        assert_eq!(driver.poll_event().await.unwrap(), Some(AppEvent::Key(KeyInput::Tab)));
        assert_eq!(driver.poll_event().await.unwrap(), None);
    }
}
