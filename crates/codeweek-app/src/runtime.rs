//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: UI state machine
//! - [`Bridge`]: client bridge and live subscription
//! - [`Driver`]: Platform-specific I/O
//! - [`SettingsStore`]: persisted display name

use codeweek_client::{ChatClient, transport::Transport};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{App, AppAction, AppEvent, Bridge, Driver, SettingsStore};

/// Next thing the loop has to react to.
enum Wake {
    Input(Option<AppEvent>),
    Feed(AppEvent),
}

/// Generic runtime that orchestrates App, Bridge, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `T`: Transport the chat client talks through
pub struct Runtime<D, T>
where
    D: Driver,
    T: Transport,
{
    driver: D,
    app: App,
    bridge: Bridge<T>,
    settings: SettingsStore,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl<D, T> Runtime<D, T>
where
    D: Driver,
    T: Transport,
{
    /// Create a runtime. The name field starts with the stored display name.
    pub fn new(driver: D, client: ChatClient<T>, settings: SettingsStore) -> Self {
        let app = App::new(settings.name());
        let bridge = Bridge::new(client);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self { driver, app, bridge, settings, events_tx, events_rx }
    }

    /// Run the main event loop until the App quits or input ends.
    ///
    /// This is the core orchestration loop that:
    /// 1. Starts the live subscription
    /// 2. Waits for either driver input or a subscription event
    /// 3. Processes actions and events between App and Bridge
    ///
    /// The subscription is canceled before the driver is stopped, so no
    /// update is delivered after `run` returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        let subscription = self.bridge.subscribe(self.events_tx.clone());
        let result = self.event_loop().await;

        subscription.cancel();
        self.driver.stop();
        result
    }

    async fn event_loop(&mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;

        loop {
            let wake = tokio::select! {
                input = self.driver.poll_event() => Wake::Input(input?),
                Some(event) = self.events_rx.recv() => Wake::Feed(event),
            };

            let event = match wake {
                Wake::Input(Some(event)) | Wake::Feed(event) => event,
                Wake::Input(None) => {
                    debug!("input closed");
                    return Ok(());
                },
            };

            let actions = self.app.handle(event);
            if self.process_actions(actions).await? {
                return Ok(());
            }
        }
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    async fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Quit => return Ok(true),
                    AppAction::PersistName { name } => {
                        if let Err(e) = self.settings.set_name(&name) {
                            warn!(error = %e, "failed to save display name");
                            let event = AppEvent::Error { message: e.to_string() };
                            pending_actions.extend(self.app.handle(event));
                        }
                    },

                    // Client operations go through the bridge
                    AppAction::SendMessage { .. } | AppAction::DeleteMessage { .. } => {
                        let events = self.bridge.process_app_action(action).await;
                        for event in events {
                            pending_actions.extend(self.app.handle(event));
                        }
                    },
                }
            }
        }
        Ok(false)
    }

    /// Get a reference to the App.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the App.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Persisted settings.
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }
}
