//! Layout helpers — split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Sidebar width in columns; the image list takes the rest.
const SIDEBAR_WIDTH: u16 = 30;

/// Primary screen layout: folder sidebar on the left, filter bar above the
/// image list on the right, status bar along the bottom.
pub struct AppLayout {
    pub sidebar_area: Rect,
    pub filter_area: Rect,
    pub images_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // panes
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let sidebar_width = SIDEBAR_WIDTH.min(area.width / 3);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(10)])
            .split(rows[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // breadcrumbs + filters
                Constraint::Min(1),
            ])
            .split(cols[1]);

        Self {
            sidebar_area: cols[0],
            filter_area: right[0],
            images_area: right[1],
            status_area: rows[1],
        }
    }
}
