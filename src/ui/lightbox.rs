//! Full-screen image lightbox overlay.
//!
//! Renders the current image centred on the terminal with navigation
//! arrows, a position indicator (e.g. "3 / 7"), the zoom level, and a
//! footer with the image's details.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::app::state::Lightbox;

use super::halfblocks;

/// The lightbox overlay widget.
pub struct LightboxWidget<'a> {
    pub lightbox: &'a Lightbox,
}

impl<'a> LightboxWidget<'a> {
    /// Compute the overlay area (centred, 90% of terminal).
    fn overlay_area(terminal: Rect) -> Rect {
        let margin_x = (terminal.width as f32 * 0.05).round() as u16;
        let margin_y = (terminal.height as f32 * 0.05).round() as u16;
        Rect::new(
            terminal.x + margin_x,
            terminal.y + margin_y,
            terminal.width.saturating_sub(margin_x * 2).max(20u16.min(terminal.width)),
            terminal.height.saturating_sub(margin_y * 2).max(8u16.min(terminal.height)),
        )
    }

    fn title(&self) -> String {
        let viewer = &self.lightbox.viewer;
        let (pos, total) = viewer.position();
        format!(" {} — {pos}/{total} ", viewer.current().name)
    }

    fn footer(&self) -> Line<'static> {
        let record = self.lightbox.viewer.current();
        let dims = record
            .dimensions()
            .map(|(w, h)| format!("{w}×{h} · "))
            .unwrap_or_default();
        Line::from(vec![
            Span::styled(
                format!(" {dims}{} · {} ", record.size_label(), record.date_label()),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                "  ←/→ navigate  +/- zoom  wasd pan  0 reset  i info  Esc close ",
                Style::default().fg(Color::DarkGray),
            ),
        ])
    }
}

fn centred_message(text: String, style: Style, inner: Rect, buf: &mut Buffer) {
    let y = inner.y + inner.height / 2;
    Paragraph::new(Line::from(Span::styled(text, style)))
        .centered()
        .render(Rect::new(inner.x, y, inner.width, 1), buf);
}

impl<'a> Widget for LightboxWidget<'a> {
    fn render(self, terminal_area: Rect, buf: &mut Buffer) {
        let area = Self::overlay_area(terminal_area);
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::LightBlue))
            .title(Span::styled(
                self.title(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width < 6 || inner.height < 2 {
            return;
        }

        let zoom = &self.lightbox.zoom;
        if zoom.is_zoomed() {
            let label = format!(" ×{:.1} ", zoom.scale());
            let width = label.chars().count() as u16;
            let rect = Rect::new(area.x + area.width.saturating_sub(width + 2), area.y, width, 1);
            Paragraph::new(Line::from(Span::styled(
                label,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )))
            .render(rect, buf);
        }

        // Navigation arrows on the left/right edges (vertically centred).
        let viewer = &self.lightbox.viewer;
        let arrow_y = area.y + area.height / 2;
        let arrow_style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        if viewer.has_previous() {
            Paragraph::new(Line::from(Span::styled(" ◀", arrow_style)))
                .render(Rect::new(area.x, arrow_y, 3, 1), buf);
        }
        if viewer.has_next() {
            Paragraph::new(Line::from(Span::styled("▶ ", arrow_style)))
                .render(Rect::new(area.x + area.width.saturating_sub(3), arrow_y, 3, 1), buf);
        }

        let img_area = Rect::new(
            inner.x.saturating_add(2),
            inner.y,
            inner.width.saturating_sub(4),
            inner.height.saturating_sub(1), // leave 1 row for footer
        );
        match (&self.lightbox.image, &self.lightbox.error) {
            (Some(img), _) => {
                let window = zoom.visible_window(img.width(), img.height());
                halfblocks::render_image(img, window, img_area, buf);
            }
            (None, Some(err)) => centred_message(
                format!("Could not load image: {err}"),
                Style::default().fg(Color::LightRed),
                img_area,
                buf,
            ),
            (None, None) => centred_message(
                "Loading…".into(),
                Style::default().fg(Color::DarkGray),
                img_area,
                buf,
            ),
        }

        let footer_y = inner.y + inner.height.saturating_sub(1);
        Paragraph::new(self.footer()).render(Rect::new(inner.x, footer_y, inner.width, 1), buf);
    }
}
