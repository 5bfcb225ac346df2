//! Deterministic simulation harness for Codeweek testing.
//!
//! In-memory implementations of the Transport and Driver traits, so the chat
//! client and the application runtime can be exercised end to end without a
//! network or a terminal.
//!
//! - [`SimBackend`]: seeded in-memory GraphQL backend with fault injection
//! - [`SimDriver`]: scripted input and recorded renders

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod sim_backend;
pub mod sim_driver;

pub use sim_backend::{DEFAULT_AUTHOR, SimBackend};
pub use sim_driver::{SimDriver, SimDriverError, SimHandle};
