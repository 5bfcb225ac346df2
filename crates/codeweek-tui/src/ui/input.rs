//! Text fields
//!
//! Name and message inputs, with the cursor placed in whichever has focus.

use codeweek_app::{App, Focus, TextInput, render::character_count_label};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

use super::border_style;

const TEXT_OFFSET: u16 = 1; // inside left and top border
const RIGHT_PADDING: u16 = 1; // inside right border

/// Render the display-name field.
pub fn render_name(frame: &mut Frame, app: &App, area: Rect) {
    render_field(frame, app, Focus::Name, " Name ".to_string(), app.name(), area);
}

/// Render the message field, titled with its character count.
pub fn render_message(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" {} ", character_count_label(app.char_count()));
    render_field(frame, app, Focus::Message, title, app.message_input(), area);
}

fn render_field(
    frame: &mut Frame,
    app: &App,
    widget: Focus,
    title: String,
    input: &TextInput,
    area: Rect,
) {
    let block =
        Block::default().borders(Borders::ALL).border_style(border_style(app, widget)).title(title);

    let available_width = area.width.saturating_sub(TEXT_OFFSET + RIGHT_PADDING);
    let cursor = u16::try_from(input.cursor()).unwrap_or(u16::MAX);
    let scroll = cursor.saturating_sub(available_width.saturating_sub(1));

    let paragraph = Paragraph::new(input.text())
        .style(Style::default().fg(Color::White))
        .scroll((0, scroll))
        .block(block);

    frame.render_widget(paragraph, area);

    if app.focus() == widget {
        let cursor_x = area.x.saturating_add(TEXT_OFFSET).saturating_add(cursor - scroll);
        let cursor_y = area.y.saturating_add(TEXT_OFFSET);
        let max_x = area.x.saturating_add(area.width).saturating_sub(RIGHT_PADDING + 1);
        frame.set_cursor_position((cursor_x.min(max_x), cursor_y));
    }
}
