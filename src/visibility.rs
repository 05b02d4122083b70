use crate::pagination::Pagination;

/// Reports whether the sentinel at the end of the list is on screen.
pub trait Observer {
    fn is_intersecting(&self) -> bool;
}

/// The card list as laid out in the terminal: `rows` visible rows starting at
/// `offset`, with the sentinel drawn on `sentinel_row` (the row after the
/// last card) when `sentinel_shown` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListViewport {
    pub offset: usize,
    pub rows: usize,
    pub sentinel_row: usize,
    pub sentinel_shown: bool,
}

impl Observer for ListViewport {
    fn is_intersecting(&self) -> bool {
        self.sentinel_shown
            && self.sentinel_row >= self.offset
            && self.sentinel_row < self.offset + self.rows
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Deps {
    in_view: bool,
    has_next: bool,
    fetching: bool,
}

/// Turns sentinel visibility into next-page requests.
///
/// Two paths feed the accumulator: an edge callback when the sentinel
/// becomes visible, and an effect that re-runs whenever visibility,
/// `has_next_page` or the fetch flag change, so a fetch finishing while the
/// sentinel is still on screen immediately queues the following page.
#[derive(Debug, Default)]
pub struct Trigger {
    in_view: bool,
    last_deps: Option<Deps>,
}

impl Trigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-read the observer and return the page number to fetch, if any.
    ///
    /// The dependency snapshot is taken after any fetch this call issued, so
    /// the completion of that fetch always reads as a change.
    pub fn observe(&mut self, observer: &dyn Observer, pagination: &mut Pagination) -> Option<u32> {
        let now = observer.is_intersecting();
        let mut request = None;
        if now != self.in_view {
            self.in_view = now;
            request = Self::on_change(now, pagination);
        }
        if request.is_none() {
            request = self.effect(pagination);
        }
        self.last_deps = Some(self.snapshot(pagination));
        request
    }

    fn on_change(in_view: bool, pagination: &mut Pagination) -> Option<u32> {
        if in_view && pagination.has_next_page() && !pagination.is_fetching() {
            pagination.fetch_next_page()
        } else {
            None
        }
    }

    fn effect(&self, pagination: &mut Pagination) -> Option<u32> {
        let deps = self.snapshot(pagination);
        if self.last_deps == Some(deps) {
            return None;
        }

        if deps.in_view && deps.has_next && !deps.fetching {
            pagination.fetch_next_page()
        } else {
            None
        }
    }

    fn snapshot(&self, pagination: &Pagination) -> Deps {
        Deps {
            in_view: self.in_view,
            has_next: pagination.has_next_page(),
            fetching: pagination.is_fetching(),
        }
    }

    /// Forget everything observed so far, as for a freshly mounted view.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
