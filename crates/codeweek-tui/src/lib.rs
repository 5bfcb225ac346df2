//! Terminal UI for the Codeweek chat board
//!
//! A thin shell over [`codeweek_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`codeweek_app::Runtime`].
//!
//! This crate only handles terminal rendering, backend selection and process
//! setup.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod backend;
pub mod logging;
pub mod terminal;
pub mod ui;

pub use backend::Backend;
pub use codeweek_app::{App, AppAction, AppEvent, Bridge, Driver, KeyInput, Runtime};
pub use terminal::{TerminalDriver, TerminalError};
