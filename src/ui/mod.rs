mod characters;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;
use crate::pagination::{FetchState, Phase};

/// Header, status bar and the list's top/bottom borders.
const CHROME_ROWS: u16 = 4;

/// Rows available to the card list for a terminal of the given height.
pub fn list_rows(terminal_height: u16) -> usize {
    terminal_height.saturating_sub(CHROME_ROWS) as usize
}

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, chunks[0]);
    characters::render(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![Span::styled(
        "Rick and Morty list of characters",
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )]))
    .alignment(ratatui::layout::Alignment::Center)
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(notice) = &app.notice {
        Line::from(vec![Span::styled(
            notice.clone(),
            Style::default().fg(Color::Yellow),
        )])
    } else {
        let phase = app.pagination.phase();
        let state = match app.pagination.fetch_state() {
            FetchState::Fetching { page } => format!("{} (page {})", phase, page),
            FetchState::Idle => phase.to_string(),
        };
        let help = match phase {
            Phase::Error => "r: retry | R: reload | q: quit",
            _ => "j/k/g/G: nav | Ctrl+d/u: page | o: open image | y: yank url | R: reload | q: quit",
        };
        let color = match phase {
            Phase::Error => Color::Red,
            Phase::Loading | Phase::LoadingMore => Color::Yellow,
            _ => Color::Green,
        };
        Line::from(vec![
            Span::styled(format!("{} ", state), Style::default().fg(color)),
            Span::styled(
                format!("[{} cards] ", app.card_count()),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(help, Style::default().fg(Color::Gray)),
        ])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::mpsc;

    use super::test_support::draw;
    use super::*;
    use crate::action::Action;
    use crate::source::fake::FakeSource;

    #[test]
    fn list_rows_subtracts_chrome() {
        assert_eq!(list_rows(24), 20);
        assert_eq!(list_rows(3), 0);
    }

    #[test]
    fn header_and_status_are_drawn() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let app = App::new(Arc::new(FakeSource::new()), 5, tx);
        let screen = draw(&app, 100, 10);
        assert!(screen[0].contains("Rick and Morty list of characters"));
        assert!(screen[9].contains("Empty"));
        assert!(screen[9].contains("[0 cards]"));
    }

    #[test]
    fn notice_replaces_help() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(Arc::new(FakeSource::new()), 5, tx);
        app.update(Action::Error("Clipboard error: no display".into()));
        let screen = draw(&app, 100, 10);
        assert!(screen[9].contains("Clipboard error: no display"));
    }
}
