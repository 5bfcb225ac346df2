//! Application layer for the Codeweek chat client
//!
//! Pure state machines and generic runtime for UI and client orchestration,
//! enabling deterministic simulation testing with the same code that runs in
//! production.
//!
//! # Components
//!
//! - [`App`]: UI state machine (text fields, focus, message list, selection)
//! - [`Bridge`]: Client bridge (translates App actions to chat client calls)
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver
//! - [`SettingsStore`]: Persisted display name

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod bridge;
mod driver;
mod event;
mod input;
pub mod render;
mod runtime;
mod settings;
mod state;

pub use action::AppAction;
pub use app::App;
pub use bridge::Bridge;
pub use driver::Driver;
pub use event::AppEvent;
pub use input::{Edit, KeyInput, TextInput};
pub use runtime::Runtime;
pub use settings::{
    SETTINGS_DIRECTORY_NAME, SETTINGS_FILE_NAME, Settings, SettingsError, SettingsStore,
};
pub use state::{FeedState, Focus};
