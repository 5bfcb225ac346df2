//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! returning widget trees.

mod input;
mod messages;
mod status;

use codeweek_app::{App, Focus};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
};

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    const LIST_MIN_HEIGHT: u16 = 3;
    const FIELD_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(LIST_MIN_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [list_area, name_area, message_area, status_area] = chunks.as_ref() else {
        return;
    };

    messages::render(frame, app, *list_area);
    input::render_name(frame, app, *name_area);
    input::render_message(frame, app, *message_area);
    status::render(frame, app, *status_area);
}

/// Border style of a widget, highlighted while it has focus.
fn border_style(app: &App, widget: Focus) -> Style {
    if app.focus() == widget {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use codeweek_app::{AppEvent, KeyInput};
    use codeweek_proto::{Message, MessageId, codec::decode_timestamp};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn message(n: u128, author: &str, content: &str) -> Message {
        Message {
            id: MessageId::from_uuid(uuid::Uuid::from_u128(n)),
            created: decode_timestamp("2019-10-12T14:03:21").unwrap(),
            channel: "main".to_string(),
            author: author.to_string(),
            content: content.to_string(),
        }
    }

    fn draw(app: &App) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(60, 14)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let width = usize::from(buffer.area.width);
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect()
    }

    fn screen_contains(lines: &[String], needle: &str) -> bool {
        lines.iter().any(|line| line.contains(needle))
    }

    #[test]
    fn empty_board() {
        let lines = draw(&App::new("alice"));
        assert!(screen_contains(&lines, "0 messages"));
        assert!(screen_contains(&lines, "0 characters"));
        assert!(screen_contains(&lines, "alice"));
        assert!(screen_contains(&lines, "Connecting"));
    }

    #[test]
    fn messages_and_counters() {
        let mut app = App::new("bob");
        app.handle(AppEvent::SnapshotReceived(vec![
            message(1, "alice", "hello"),
            message(2, "", "who said that"),
        ]));
        for c in "typing".chars() {
            app.handle(AppEvent::Key(KeyInput::Char(c)));
        }

        let lines = draw(&app);
        assert!(screen_contains(&lines, "2 messages"));
        assert!(screen_contains(&lines, "6 characters"));
        assert!(screen_contains(&lines, "alice: hello"));
        assert!(screen_contains(&lines, "<Unknown>: who said that"));
        assert!(screen_contains(&lines, "typing"));
        assert!(screen_contains(&lines, "Live"));
    }

    #[test]
    fn selection_is_marked() {
        let mut app = App::new("bob");
        app.handle(AppEvent::SnapshotReceived(vec![
            message(1, "alice", "first"),
            message(2, "carol", "second"),
        ]));
        app.handle(AppEvent::Key(KeyInput::Tab));
        app.handle(AppEvent::Key(KeyInput::Tab));
        app.handle(AppEvent::Key(KeyInput::End));

        let lines = draw(&app);
        let marked: Vec<_> = lines.iter().filter(|line| line.contains("> ")).collect();
        assert_eq!(marked.len(), 1);
        assert!(marked[0].contains("carol: second"));
    }

    #[test]
    fn feed_failure_in_status_bar() {
        let mut app = App::new("bob");
        app.handle(AppEvent::FeedFailed { message: "subscription closed by peer".to_string() });

        let lines = draw(&app);
        assert!(screen_contains(&lines, "Offline"));
        assert!(screen_contains(&lines, "Live updates stopped"));
    }
}
