//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the interactive
//! state of the chat screen completely decoupled from I/O.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Holds the latest message snapshot, replaced wholesale on every push.
//! - Owns the name and message fields and which widget has focus.
//! - Tracks the list selection by message identifier, never by position, so a
//!   push that reorders or removes rows cannot retarget a delete.
//! - Keeps a transient status line and the feed health for the status bar.

use codeweek_proto::{Message, MessageId};

use crate::{
    AppAction, AppEvent, FeedState, Focus, KeyInput,
    input::{Edit, TextInput},
};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies, fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Latest snapshot of the channel, in backend order.
    messages: Vec<Message>,
    /// Selected message. `None` if nothing is selected.
    selected: Option<MessageId>,
    /// Display-name field.
    name: TextInput,
    /// New-message field.
    message: TextInput,
    /// Widget receiving key input.
    focus: Focus,
    /// Live feed health.
    feed: FeedState,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl App {
    /// Create an App with the stored display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            selected: None,
            name: TextInput::with_text(name),
            message: TextInput::default(),
            focus: Focus::default(),
            feed: FeedState::default(),
            terminal_size: (80, 24),
            status_message: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => vec![],
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::SnapshotReceived(messages) => {
                self.messages = messages;
                if let Some(id) = self.selected
                    && !self.messages.iter().any(|m| m.id == id)
                {
                    self.selected = None;
                }
                self.feed = FeedState::Live;
                vec![AppAction::Render]
            },
            AppEvent::MessageSent { .. } => {
                self.status_message = Some("Message sent".to_string());
                vec![AppAction::Render]
            },
            AppEvent::MessageDeleted { removed, .. } => {
                self.status_message = Some(if removed {
                    "Message deleted".to_string()
                } else {
                    "Message was already deleted".to_string()
                });
                vec![AppAction::Render]
            },
            AppEvent::FeedFailed { message } => {
                self.status_message = Some(format!("Live updates stopped: {message}"));
                self.feed = FeedState::Failed { reason: message };
                vec![AppAction::Render]
            },
            AppEvent::Error { message } => {
                self.status_message = Some(format!("Error: {message}"));
                vec![AppAction::Render]
            },
        }
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Esc => return vec![AppAction::Quit],
            KeyInput::Tab => {
                self.focus = self.focus.next();
                return vec![AppAction::Render];
            },
            _ => {},
        }

        match self.focus {
            Focus::Message => {
                if key == KeyInput::Enter {
                    return self.send();
                }
                render_if_edited(self.message.handle_key(key))
            },
            Focus::Name => {
                if key == KeyInput::Enter {
                    self.focus = Focus::Message;
                    return vec![AppAction::Render];
                }
                match self.name.handle_key(key) {
                    Edit::Changed => vec![
                        AppAction::PersistName { name: self.name.text().to_string() },
                        AppAction::Render,
                    ],
                    edit => render_if_edited(edit),
                }
            },
            Focus::List => match key {
                KeyInput::Up => self.move_selection(Step::Up),
                KeyInput::Down => self.move_selection(Step::Down),
                KeyInput::Home => self.move_selection(Step::First),
                KeyInput::End => self.move_selection(Step::Last),
                KeyInput::Enter | KeyInput::Delete => self.delete_selected(),
                _ => vec![],
            },
        }
    }

    /// Send the message field and clear it. Blank input sends nothing.
    fn send(&mut self) -> Vec<AppAction> {
        if self.message.is_empty() {
            return vec![];
        }
        let content = self.message.take();
        vec![
            AppAction::SendMessage { author: self.name.text().to_string(), content },
            AppAction::Render,
        ]
    }

    fn delete_selected(&mut self) -> Vec<AppAction> {
        match self.selected {
            Some(id) => vec![AppAction::DeleteMessage { id }, AppAction::Render],
            None => {
                self.status_message = Some("No message selected".to_string());
                vec![AppAction::Render]
            },
        }
    }

    fn move_selection(&mut self, step: Step) -> Vec<AppAction> {
        let Some(last) = self.messages.len().checked_sub(1) else {
            return vec![];
        };
        let target = match (step, self.selected_index()) {
            (Step::First, _) | (Step::Down, None) => 0,
            (Step::Last, _) | (Step::Up, None) => last,
            (Step::Up, Some(i)) => i.saturating_sub(1),
            (Step::Down, Some(i)) => (i + 1).min(last),
        };
        self.selected = self.messages.get(target).map(|m| m.id);
        vec![AppAction::Render]
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Messages in the current snapshot.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Selected message identifier. `None` if nothing is selected.
    pub fn selected(&self) -> Option<MessageId> {
        self.selected
    }

    /// Position of the selected message in the current snapshot.
    pub fn selected_index(&self) -> Option<usize> {
        let id = self.selected?;
        self.messages.iter().position(|m| m.id == id)
    }

    /// Display-name field.
    pub fn name(&self) -> &TextInput {
        &self.name
    }

    /// New-message field.
    pub fn message_input(&self) -> &TextInput {
        &self.message
    }

    /// Widget receiving key input.
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Live feed health.
    pub fn feed_state(&self) -> &FeedState {
        &self.feed
    }

    /// Characters in the message field.
    pub fn char_count(&self) -> usize {
        self.message.char_count()
    }

    /// Messages in the current snapshot.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Up,
    Down,
    First,
    Last,
}

fn render_if_edited(edit: Edit) -> Vec<AppAction> {
    match edit {
        Edit::Ignored => vec![],
        Edit::Moved | Edit::Changed => vec![AppAction::Render],
    }
}
