use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone)]
pub enum Event {
    Init,
    Tick,
    Render,
    Key(KeyEvent),
    /// New terminal height; the list only cares about rows.
    Resize(u16),
}

impl Event {
    /// Map a raw terminal event onto the ones the app reacts to: key presses
    /// and height changes. Releases, repeats, mouse and focus are dropped.
    pub fn from_terminal(evt: CrosstermEvent) -> Option<Self> {
        match evt {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
            CrosstermEvent::Resize(_, height) => Some(Event::Resize(height)),
            _ => None,
        }
    }

    pub fn is_quit(&self) -> bool {
        matches!(
            self,
            Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            })
        )
    }
}
