//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use codeweek_proto::MessageId;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Post a message to the channel.
    SendMessage {
        /// Display name, sent as-is even when blank.
        author: String,
        /// Message text.
        content: String,
    },

    /// Delete a message.
    DeleteMessage {
        /// Identifier of the message that was selected.
        id: MessageId,
    },

    /// Store the display name.
    PersistName {
        /// Current contents of the name field.
        name: String,
    },
}
