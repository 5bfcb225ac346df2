//! Message list
//!
//! Displays the channel snapshot, newest at the bottom, with the selection
//! highlighted while the list has focus.

use chrono::Local;
use codeweek_app::{App, Focus, render::{format_line, message_count_label}};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use super::border_style;

const BORDER_SIZE: u16 = 2;

/// Render the message list.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" {} ", message_count_label(app.message_count()));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, Focus::List))
        .title(title);

    let items: Vec<ListItem> = if app.messages().is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No messages yet",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        app.messages().iter().map(|msg| ListItem::new(format_line(msg, &Local))).collect()
    };

    // Without a selection, keep the newest messages in view.
    let visible_height = usize::from(area.height.saturating_sub(BORDER_SIZE));
    let skip = items.len().saturating_sub(visible_height);
    let mut state = ListState::default().with_offset(skip).with_selected(app.selected_index());

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut state);
}
