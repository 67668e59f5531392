//! Popup overlay widgets: text prompts, the upload destination picker and
//! the image-details card.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::app::state::{FolderPicker, Prompt, PromptKind};
use crate::core::model::ImageRecord;
use crate::ui::theme::Theme;

fn popup_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray))
}

// ───────────────────────────────────────── prompt popup ──────

/// Single-line text input.
pub struct PromptPopup<'a> {
    pub prompt: &'a Prompt,
    /// Extra line above the input (e.g. the upload destination).
    pub context: Option<String>,
}

impl<'a> PromptPopup<'a> {
    fn shown_input(&self) -> String {
        if self.prompt.kind.is_secret() {
            "•".repeat(self.prompt.input.chars().count())
        } else {
            self.prompt.input.clone()
        }
    }
}

impl<'a> Widget for PromptPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_fixed(60, 7, area);
        Clear.render(popup, buf);

        let block = popup_block(self.prompt.kind.title());
        let inner = block.inner(popup);
        block.render(popup, buf);

        let dim = Style::default().fg(Color::DarkGray);
        let hint = match self.prompt.kind {
            PromptKind::FilterName => "  Filters as you type  Enter/Esc: close",
            PromptKind::UploadPath => "  Files or folders, space-separated  Enter: next",
            _ => "  Enter: confirm  Esc: cancel",
        };

        // Keep the tail of long input visible.
        let field_width = inner.width.saturating_sub(4) as usize;
        let shown = self.shown_input();
        let skip = shown.chars().count().saturating_sub(field_width);
        let visible: String = shown.chars().skip(skip).collect();

        let lines = vec![
            Line::from(Span::styled(
                format!("  {}", self.context.unwrap_or_default()),
                dim,
            )),
            Line::raw(""),
            Line::from(vec![
                Span::styled(" ▸ ", Theme::command_input_style()),
                Span::styled(visible, Theme::command_input_style()),
                Span::styled("▏", Theme::command_input_style()),
            ]),
            Line::raw(""),
            Line::from(Span::styled(hint, dim)),
        ];
        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── folder picker ─────

/// Destination list for uploads started at the root.
pub struct FolderPickerPopup<'a> {
    pub picker: &'a mut FolderPicker,
    pub file_count: usize,
}

impl Widget for FolderPickerPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = self.picker.entries.len() as u16;
        let popup = centered_fixed(50, rows.clamp(3, 14) + 6, area);
        Clear.render(popup, buf);

        let block = popup_block(" Select Destination Folder ");
        let inner = block.inner(popup);
        block.render(popup, buf);
        if inner.height < 4 {
            return;
        }

        let dim = Style::default().fg(Color::DarkGray);
        let noun = if self.file_count == 1 { "file" } else { "files" };
        buf.set_line(
            inner.x,
            inner.y,
            &Line::from(Span::styled(format!("  Upload {} {noun} into:", self.file_count), dim)),
            inner.width,
        );

        let list_height = (inner.height - 3) as usize;
        let cursor = &mut self.picker.cursor;
        cursor.clamp(self.picker.entries.len());
        cursor.clamp_scroll(list_height);
        let visible = self
            .picker
            .entries
            .iter()
            .enumerate()
            .skip(cursor.offset)
            .take(list_height);
        for (row, (index, entry)) in visible.enumerate() {
            let style = if index == cursor.selected {
                Theme::selected_style()
            } else {
                Theme::folder_style()
            };
            let text = format!("  {}{}", "  ".repeat(entry.depth), entry.name);
            buf.set_line(
                inner.x,
                inner.y + 2 + row as u16,
                &Line::from(Span::styled(text, style)),
                inner.width,
            );
        }

        buf.set_line(
            inner.x,
            inner.y + inner.height - 1,
            &Line::from(Span::styled("  ↑/↓: choose  Enter: upload here  Esc: cancel", dim)),
            inner.width,
        );
    }
}

// ───────────────────────────────────────── info popup ────────

/// Details of one image.
pub struct InfoPopup<'a> {
    pub record: &'a ImageRecord,
}

impl<'a> InfoPopup<'a> {
    fn rows(&self) -> Vec<(&'static str, String)> {
        let r = self.record;
        let folder = if r.folder().is_empty() {
            "Root".to_string()
        } else {
            r.folder().to_string()
        };
        vec![
            ("Name", r.name.clone()),
            ("Folder", folder),
            ("Path", r.path.clone()),
            ("Type", r.extension().map(|e| e.to_uppercase()).unwrap_or_else(|| "—".into())),
            ("Size", format!("{} ({} bytes)", r.size_label(), r.size)),
            (
                "Dimensions",
                r.dimensions()
                    .map(|(w, h)| format!("{w} × {h} px"))
                    .unwrap_or_else(|| "unknown".into()),
            ),
            ("Modified", r.date_label()),
        ]
    }
}

impl<'a> Widget for InfoPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = self.rows();
        let popup = centered_fixed(64, rows.len() as u16 + 5, area);
        Clear.render(popup, buf);

        let block = popup_block(" Image Info ");
        let inner = block.inner(popup);
        block.render(popup, buf);

        let label_style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        let value_style = Style::default().fg(Color::Yellow);
        let mut lines = vec![Line::raw("")];
        for (label, value) in rows {
            lines.push(Line::from(vec![
                Span::styled(format!("  {label:<12}"), label_style),
                Span::styled(value, value_style),
            ]));
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  Esc: close",
            Style::default().fg(Color::DarkGray),
        )));
        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── helpers ───────────

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}
