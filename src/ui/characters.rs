use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    // Any failed fetch takes over the whole view, loaded pages included.
    if let Some(error) = app.pagination.error() {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Error ");
        let message = Paragraph::new(error.to_string())
            .block(block)
            .wrap(Wrap { trim: false })
            .style(Style::default().fg(Color::Red));
        frame.render_widget(message, area);
        return;
    }

    let w = area.width.saturating_sub(2) as usize;
    let fixed = 38; // #id(6) + space(1) + name(30) + space(1)
    let flex = w.saturating_sub(fixed).max(10);

    let mut items: Vec<ListItem> = app
        .pagination
        .cards(app.cards_per_page)
        .into_iter()
        .enumerate()
        .map(|(i, character)| {
            let style = if i == app.selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Green)
            };

            let name = if character.name.chars().count() > 30 {
                let cut: String = character.name.chars().take(27).collect();
                format!("{}...", cut)
            } else {
                character.name.clone()
            };

            let image_len = character.image.chars().count();
            let image = if image_len > flex {
                let tail: String = character
                    .image
                    .chars()
                    .skip(image_len - flex.saturating_sub(3))
                    .collect();
                format!("...{}", tail)
            } else {
                character.image.clone()
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("#{:<5}", character.id),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(" "),
                Span::styled(format!("{:<30}", name), style),
                Span::raw(" "),
                Span::styled(image, Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    // Sentinel: the row after the last card.
    let sentinel = if app.pagination.is_fetching() {
        Span::styled("loading...", Style::default().fg(Color::Yellow))
    } else {
        Span::raw("")
    };
    items.push(ListItem::new(Line::from(sentinel)));

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Characters ({}) ", app.card_count())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default().with_offset(app.offset);
    // Selecting a row above the offset would scroll the sentinel away.
    if app.card_count() > 0 && app.selected >= app.offset {
        state.select(Some(app.selected));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::mpsc;

    use crate::action::Action;
    use crate::app::App;
    use crate::error::AppError;
    use crate::source::fake::{page, FakeSource};
    use crate::ui::test_support::draw;

    const NEXT: Option<&str> = Some("https://rickandmortyapi.com/api/character/?page=2");

    fn app() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        App::new(Arc::new(FakeSource::new()), 5, tx)
    }

    fn count(screen: &[String], needle: &str) -> usize {
        screen.iter().filter(|line| line.contains(needle)).count()
    }

    #[test]
    fn first_page_renders_five_cards_without_loading() {
        let mut app = app();
        app.pagination.fetch_next_page();
        app.pagination.complete(Ok(page(1, 20, NEXT)));

        let screen = draw(&app, 120, 30);
        assert_eq!(count(&screen, "Character "), 5);
        assert!(screen.iter().any(|l| l.contains("#5 ")));
        assert!(!screen.iter().any(|l| l.contains("#6 ")));
        assert_eq!(count(&screen, "loading..."), 0);
    }

    #[test]
    fn sentinel_shows_loading_while_fetching() {
        let mut app = app();
        app.pagination.fetch_next_page();
        app.pagination.complete(Ok(page(1, 20, NEXT)));
        app.pagination.fetch_next_page();

        let screen = draw(&app, 120, 30);
        assert_eq!(count(&screen, "loading..."), 1);
        assert_eq!(count(&screen, "Character "), 5);
    }

    #[test]
    fn short_pages_render_all_their_characters() {
        let mut app = app();
        app.pagination.fetch_next_page();
        app.pagination.complete(Ok(page(1, 20, NEXT)));
        app.pagination.fetch_next_page();
        app.pagination.complete(Ok(page(21, 2, None)));

        let screen = draw(&app, 120, 30);
        assert_eq!(count(&screen, "Character "), 7);
        assert!(screen.iter().any(|l| l.contains("Characters (7)")));
    }

    #[test]
    fn failure_before_any_page_shows_only_the_error() {
        let mut app = app();
        app.pagination.fetch_next_page();
        app.pagination
            .complete(Err(AppError::Fetch("Network Error".into())));

        let screen = draw(&app, 120, 30);
        assert_eq!(count(&screen, "Network Error"), 1);
        assert_eq!(count(&screen, "Character "), 0);
        assert_eq!(count(&screen, "loading..."), 0);
    }

    #[test]
    fn later_failure_replaces_loaded_cards() {
        let mut app = app();
        app.pagination.fetch_next_page();
        app.pagination.complete(Ok(page(1, 20, NEXT)));
        app.pagination.fetch_next_page();
        app.pagination
            .complete(Err(AppError::Fetch("Request failed with status code 502".into())));

        let screen = draw(&app, 120, 30);
        assert_eq!(count(&screen, "Request failed with status code 502"), 1);
        assert_eq!(count(&screen, "Character "), 0);
    }

    #[tokio::test]
    async fn list_scrolls_with_offset() {
        let mut app = app();
        app.pagination.fetch_next_page();
        app.pagination.complete(Ok(page(1, 20, NEXT)));
        app.update(Action::Resize(3));
        app.update(Action::GoToBottom);
        assert_eq!(app.offset, 3);

        let screen = draw(&app, 120, 7);
        assert!(!screen.iter().any(|l| l.contains("#1 ")));
        assert!(screen.iter().any(|l| l.contains("#4 ")));
        assert!(screen.iter().any(|l| l.contains("#5 ")));
    }

    #[tokio::test]
    async fn single_row_on_the_sentinel_shows_loading() {
        let mut app = app();
        app.pagination.fetch_next_page();
        app.pagination.complete(Ok(page(1, 20, NEXT)));
        app.update(Action::Resize(1));
        app.update(Action::GoToBottom);
        assert!(app.pagination.is_fetching());

        let screen = draw(&app, 120, 5);
        assert_eq!(count(&screen, "loading..."), 1);
        assert!(!screen.iter().any(|l| l.contains("#5 ")));
    }
}
