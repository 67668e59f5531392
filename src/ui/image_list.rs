//! Image pane: the filtered listing as aligned rows of name, size,
//! dimensions and date.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Color,
    text::{Line, Span},
    widgets::{Block, Paragraph, StatefulWidget, Widget},
};

use crate::core::model::ImageRecord;

use super::cursor::ListCursor;
use super::theme::Theme;

const SIZE_COL: usize = 12;
const DIMS_COL: usize = 11;
const DATE_COL: usize = 18;

pub struct ImageListWidget<'a> {
    images: &'a [ImageRecord],
    /// Unfiltered count, to tell "empty folder" from "nothing matches".
    total: usize,
    loading: bool,
    focused: bool,
    block: Option<Block<'a>>,
}

impl<'a> ImageListWidget<'a> {
    pub fn new(images: &'a [ImageRecord], total: usize) -> Self {
        Self {
            images,
            total,
            loading: false,
            focused: false,
            block: None,
        }
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn empty_message(&self) -> &'static str {
        if self.loading {
            "Loading…"
        } else if self.total == 0 {
            "No images in this folder"
        } else {
            "No images match the current filters"
        }
    }
}

/// One listing row, columns padded to fixed widths.
fn row_line(record: &ImageRecord, width: usize, is_selected: bool, focused: bool) -> Line<'static> {
    let dims = record
        .dimensions()
        .map(|(w, h)| format!("{w}×{h}"))
        .unwrap_or_else(|| "—".into());
    let name_width = width.saturating_sub(SIZE_COL + DIMS_COL + DATE_COL + 1).max(8);
    let name = truncate(&record.name, name_width);

    let (name_style, meta_style) = match (is_selected, focused) {
        (true, true) => (Theme::selected_style(), Theme::selected_style()),
        (true, false) => (Theme::selected_unfocused_style(), Theme::selected_unfocused_style()),
        _ => (Theme::file_style(), Theme::meta_style()),
    };

    Line::from(vec![
        Span::styled(format!(" {name:<name_width$}"), name_style),
        Span::styled(format!("{:>SIZE_COL$}", record.size_label()), meta_style),
        Span::styled(format!("{dims:>DIMS_COL$}"), meta_style),
        Span::styled(format!("{:>DATE_COL$}", short_date(record)), meta_style),
    ])
}

fn short_date(record: &ImageRecord) -> String {
    record
        .modified()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "—".into())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

impl<'a> StatefulWidget for ImageListWidget<'a> {
    type State = ListCursor;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.images.is_empty() {
            state.reset();
            let msg = self.empty_message();
            let y = inner.y + inner.height / 2;
            Paragraph::new(Line::from(Span::styled(msg, Theme::meta_style())))
                .centered()
                .render(Rect::new(inner.x, y, inner.width, 1), buf);
            return;
        }

        state.clamp(self.images.len());
        state.clamp_scroll(inner.height as usize);

        let row_width = inner.width.saturating_sub(1) as usize;
        let visible = self
            .images
            .iter()
            .enumerate()
            .skip(state.offset)
            .take(inner.height as usize);
        for (i, (idx, record)) in visible.enumerate() {
            let line = row_line(record, row_width, idx == state.selected, self.focused);
            buf.set_line(inner.x, inner.y + i as u16, &line, inner.width.saturating_sub(1));
        }

        render_scrollbar(inner, self.images.len(), state.offset, inner.height as usize, buf);
    }
}

fn render_scrollbar(area: Rect, total: usize, offset: usize, visible: usize, buf: &mut Buffer) {
    if total <= visible || area.height < 2 || area.width == 0 {
        return;
    }
    let x = area.x + area.width.saturating_sub(1);
    let h = area.height as f64;
    let thumb_sz = ((visible as f64 / total as f64) * h).ceil().max(1.0) as u16;
    let max_off = total.saturating_sub(visible) as f64;
    let thumb_pos = if max_off > 0.0 {
        ((offset as f64 / max_off) * (h - thumb_sz as f64)).round() as u16
    } else {
        0
    };

    for row in 0..area.height {
        let is_thumb = row >= thumb_pos && row < thumb_pos + thumb_sz;
        let (ch, fg) = if is_thumb {
            ('█', Color::LightBlue)
        } else {
            ('│', Color::DarkGray)
        };
        if let Some(cell) = buf.cell_mut(Position::new(x, area.y + row)) {
            cell.set_char(ch).set_fg(fg);
        }
    }
}
