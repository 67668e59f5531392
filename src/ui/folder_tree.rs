//! Sidebar widget: the folder tree as an indented, collapsible list with a
//! synthetic root row on top.

use std::collections::HashSet;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, StatefulWidget, Widget},
};

use crate::core::folders::FolderEntry;

use super::cursor::ListCursor;
use super::theme::Theme;

/// The folder tree widget, created fresh each frame.
pub struct FolderTreeWidget<'a> {
    rows: &'a [FolderEntry],
    expanded: &'a HashSet<String>,
    /// Path of the folder currently listed in the image pane.
    current: &'a str,
    focused: bool,
    block: Option<Block<'a>>,
}

impl<'a> FolderTreeWidget<'a> {
    pub fn new(rows: &'a [FolderEntry], expanded: &'a HashSet<String>, current: &'a str) -> Self {
        Self {
            rows,
            expanded,
            current,
            focused: false,
            block: None,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn row_line(&self, row: &FolderEntry, is_selected: bool) -> Line<'static> {
        let indent = "  ".repeat(row.depth);
        let icon = if row.path.is_empty() {
            "◆ "
        } else if !row.has_children {
            "  "
        } else if self.expanded.contains(&row.path) {
            "▼ "
        } else {
            "▶ "
        };
        let style = if is_selected {
            if self.focused {
                Theme::selected_style()
            } else {
                Theme::selected_unfocused_style()
            }
        } else if row.path == self.current {
            Theme::current_folder_style()
        } else if row.path.is_empty() {
            Theme::root_style()
        } else {
            Theme::folder_style()
        };
        Line::from(vec![
            Span::raw(indent),
            Span::styled(format!("{icon}{}", row.name), style),
        ])
    }
}

impl<'a> StatefulWidget for FolderTreeWidget<'a> {
    type State = ListCursor;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        state.clamp(self.rows.len());
        state.clamp_scroll(inner.height as usize);

        let visible = self
            .rows
            .iter()
            .enumerate()
            .skip(state.offset)
            .take(inner.height as usize);

        for (i, (row_idx, row)) in visible.enumerate() {
            let line = self.row_line(row, row_idx == state.selected);
            buf.set_line(inner.x, inner.y + i as u16, &line, inner.width);
        }
    }
}
