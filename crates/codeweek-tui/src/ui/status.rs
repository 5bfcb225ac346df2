//! Status bar
//!
//! Displays live feed health and the latest transient status.

use codeweek_app::{App, FeedState};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let feed_status = match app.feed_state() {
        FeedState::Connecting => Span::styled("Connecting...", Style::default().fg(Color::Yellow)),
        FeedState::Live => Span::styled(
            "Live",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        FeedState::Failed { .. } => Span::styled(
            "Offline",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    };

    let status = app.status_message().map_or_else(String::new, |message| format!(" | {message}"));

    let status_line = Line::from(vec![
        Span::raw(" "),
        feed_status,
        Span::styled(status, Style::default().fg(Color::White)),
        Span::styled(" | Tab: focus  Esc: quit", Style::default().fg(Color::Gray)),
    ]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use codeweek_app::AppEvent;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn status_line(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        terminal.draw(|frame| render(frame, app, frame.area())).unwrap();
        let line: String =
            terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect();
        line.trim().to_string()
    }

    #[test]
    fn connecting() {
        insta::assert_snapshot!(status_line(&App::new("")), @"Connecting... | Tab: focus  Esc: quit");
    }

    #[test]
    fn live_with_status() {
        let mut app = App::new("");
        app.handle(AppEvent::SnapshotReceived(Vec::new()));
        app.handle(AppEvent::Error { message: "send failed: request timed out".to_string() });
        insta::assert_snapshot!(
            status_line(&app),
            @"Live | Error: send failed: request timed out | Tab: focus  Esc: quit"
        );
    }
}
