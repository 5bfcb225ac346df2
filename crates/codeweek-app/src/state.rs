//! Observable application state types.
//!
//! These are the view-model pieces of [`crate::App`] that frontends read to
//! decide what to draw.

/// Which widget receives key input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    /// New-message field.
    #[default]
    Message,
    /// Display-name field.
    Name,
    /// Message list.
    List,
}

impl Focus {
    /// Next widget in `Message → Name → List` order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Message => Self::Name,
            Self::Name => Self::List,
            Self::List => Self::Message,
        }
    }
}

/// Health of the live message feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FeedState {
    /// Subscribed, no snapshot yet.
    #[default]
    Connecting,
    /// At least one snapshot received.
    Live,
    /// Feed ended. No reconnect is attempted.
    Failed {
        /// Why the feed ended.
        reason: String,
    },
}
