use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::action::Action;
use crate::error::{AppError, Result};
use crate::event::Event;
use crate::pagination::Pagination;
use crate::source::PageSource;
use crate::types::Character;
use crate::ui;
use crate::visibility::{ListViewport, Trigger};

pub struct App {
    pub pagination: Pagination,
    pub cards_per_page: usize,
    pub selected: usize,
    pub offset: usize,
    pub rows: usize,
    pub notice: Option<String>,
    pub should_quit: bool,
    trigger: Trigger,
    load_id: u64,
    source: Arc<dyn PageSource>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        source: Arc<dyn PageSource>,
        cards_per_page: usize,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            pagination: Pagination::new(),
            cards_per_page,
            selected: 0,
            offset: 0,
            rows: 0,
            notice: None,
            should_quit: false,
            trigger: Trigger::new(),
            load_id: 0,
            source,
            action_tx,
        }
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::Start,
            Event::Tick => Action::Sync,
            Event::Resize(height) => Action::Resize(ui::list_rows(height)),
            Event::Key(key) => self.handle_key(key),
            Event::Render => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('d') if ctrl => Action::PageDown,
            KeyCode::Char('u') if ctrl => Action::PageUp,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::Char('g') | KeyCode::Home => Action::GoToTop,
            KeyCode::Char('G') | KeyCode::End => Action::GoToBottom,
            KeyCode::Char('r') => Action::Retry,
            KeyCode::Char('R') => Action::Reload,
            KeyCode::Char('o') => Action::OpenInBrowser,
            KeyCode::Char('y') => Action::YankUrl,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        if matches!(
            action,
            Action::ScrollUp
                | Action::ScrollDown
                | Action::PageUp
                | Action::PageDown
                | Action::GoToTop
                | Action::GoToBottom
        ) {
            self.notice = None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::ScrollUp => {
                // From the sentinel row, stepping up lands on the last card.
                if self.selected >= self.offset {
                    self.selected = self.selected.saturating_sub(1);
                }
                self.follow_selection();
            }
            Action::ScrollDown => {
                self.select(self.selected + 1);
            }
            Action::PageUp => {
                self.selected = self.selected.saturating_sub(self.page_size());
                self.follow_selection();
            }
            Action::PageDown => {
                self.select(self.selected + self.page_size());
            }
            Action::GoToTop => {
                self.selected = 0;
                self.follow_selection();
            }
            Action::GoToBottom => {
                self.select(usize::MAX);
            }

            Action::Start => {
                if let Some(page) = self.pagination.fetch_next_page() {
                    self.spawn_fetch(page);
                }
            }
            Action::PageLoaded { page, load_id } => {
                if load_id != self.load_id {
                    tracing::debug!(load_id, current = self.load_id, "dropping stale page");
                    return;
                }
                self.pagination.complete(Ok(*page));
                if self.selected < self.offset {
                    self.selected = self.offset.min(self.card_count().saturating_sub(1));
                }
            }
            Action::PageFailed { error, load_id } => {
                if load_id != self.load_id {
                    tracing::debug!(load_id, current = self.load_id, "dropping stale failure");
                    return;
                }
                self.pagination.complete(Err(error));
            }
            Action::Retry => {
                if self.pagination.error().is_some() {
                    if let Some(page) = self.pagination.retry() {
                        tracing::info!(page, "retrying after error");
                        self.spawn_fetch(page);
                    }
                }
            }
            Action::Reload => {
                self.load_id += 1;
                self.pagination = Pagination::new();
                self.trigger.reset();
                self.selected = 0;
                self.offset = 0;
                self.notice = None;
                if let Some(page) = self.pagination.fetch_next_page() {
                    self.spawn_fetch(page);
                }
            }

            Action::Resize(rows) => {
                self.rows = rows;
                let max_offset = (self.card_count() + 1).saturating_sub(self.rows);
                self.offset = self.offset.min(max_offset);
                self.follow_selection();
            }
            Action::Sync => {}

            Action::OpenInBrowser => {
                if let Some(url) = self.selected_character().map(|c| c.image.clone()) {
                    if let Err(e) = open::that(&url) {
                        self.update(AppError::from(e).into());
                        return;
                    }
                    self.notice = Some(format!("Opened {}", url));
                }
            }
            Action::YankUrl => {
                if let Some(url) = self.selected_character().map(|c| c.image.clone()) {
                    match yank(&url) {
                        Ok(()) => self.notice = Some(format!("Copied {}", url)),
                        Err(e) => {
                            self.update(e.into());
                            return;
                        }
                    }
                }
            }

            Action::Error(msg) => {
                self.notice = Some(msg);
            }
            Action::None => {}
        }

        self.sync_visibility();
    }

    pub fn card_count(&self) -> usize {
        self.pagination.card_count(self.cards_per_page)
    }

    pub fn selected_character(&self) -> Option<&Character> {
        self.pagination
            .cards(self.cards_per_page)
            .get(self.selected)
            .copied()
    }

    /// Where the list currently sits on screen, sentinel included.
    pub fn viewport(&self) -> ListViewport {
        ListViewport {
            offset: self.offset,
            rows: self.rows,
            sentinel_row: self.card_count(),
            sentinel_shown: self.pagination.error().is_none(),
        }
    }

    fn page_size(&self) -> usize {
        self.rows.saturating_sub(1).max(1)
    }

    fn select(&mut self, index: usize) {
        let count = self.card_count();
        let last = count.saturating_sub(1);
        self.selected = index.min(last);
        self.follow_selection();
        // A single row has no room for look-ahead, so moving past the last
        // card scrolls onto the sentinel itself.
        if self.rows == 1 && count > 0 && index > last {
            self.offset = count;
        }
    }

    /// Scroll so the selection and the row below it stay on screen; the row
    /// below the last card is the sentinel. With one row only the selection
    /// fits.
    fn follow_selection(&mut self) {
        if self.rows == 0 {
            return;
        }
        let lookahead = if self.rows > 1 {
            self.selected + 1
        } else {
            self.selected
        };
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if lookahead >= self.offset + self.rows {
            self.offset = lookahead + 1 - self.rows;
        }
    }

    fn sync_visibility(&mut self) {
        let viewport = self.viewport();
        if let Some(page) = self.trigger.observe(&viewport, &mut self.pagination) {
            self.spawn_fetch(page);
        }
    }

    fn spawn_fetch(&self, page: u32) {
        let tx = self.action_tx.clone();
        let source = Arc::clone(&self.source);
        let load_id = self.load_id;
        tracing::debug!(page, load_id, source = source.name(), "spawning fetch");
        tokio::spawn(async move {
            let action = match source.fetch_page(page).await {
                Ok(fetched) => Action::PageLoaded {
                    page: Box::new(fetched),
                    load_id,
                },
                Err(error) => Action::PageFailed { error, load_id },
            };
            // The receiver is gone once the app has shut down.
            tx.send(action).ok();
        });
    }
}

fn yank(text: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| AppError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| AppError::Clipboard(e.to_string()))
}
