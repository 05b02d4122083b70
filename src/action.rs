use crate::error::AppError;
use crate::types::Page;

#[derive(Debug)]
pub enum Action {
    Quit,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,

    // Pagination
    Start,
    PageLoaded { page: Box<Page>, load_id: u64 },
    PageFailed { error: AppError, load_id: u64 },
    Retry,
    Reload,

    // Viewport
    Resize(usize),
    Sync,

    // Selection
    OpenInBrowser,
    YankUrl,

    Error(String),
    None,
}

impl From<AppError> for Action {
    fn from(err: AppError) -> Self {
        Action::Error(err.to_string())
    }
}
