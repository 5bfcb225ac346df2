//! Application input events.
//!
//! This module defines [`AppEvent`], the complete set of inputs that drive
//! the [`crate::App`] state machine.
//!
//! Events originate from two sources:
//! - User interaction (keyboard, resize) and periodic ticks from the driver.
//! - Chat client results and subscription pushes, forwarded by the bridge.

use codeweek_proto::{Message, MessageId};

use crate::KeyInput;

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Periodic tick.
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Full message set for the channel, replacing whatever was shown.
    SnapshotReceived(Vec<Message>),

    /// A send completed.
    MessageSent {
        /// Identifier of the new message.
        id: MessageId,
    },

    /// A delete completed.
    MessageDeleted {
        /// Identifier that was requested.
        id: MessageId,
        /// Whether a record was actually removed.
        removed: bool,
    },

    /// The live feed ended and will not resume.
    FeedFailed {
        /// Error description.
        message: String,
    },

    /// An operation failed.
    Error {
        /// Error description.
        message: String,
    },
}
