//! Spinner drawn over the top border of the image pane while a listing
//! or upload is outstanding.

use ratatui::{buffer::Buffer, layout::Rect, text::Span, widgets::Widget};

use super::theme::Theme;

const FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub struct BusyIndicator<'a> {
    pub visible: bool,
    /// UI tick count; picks the frame.
    pub tick: u64,
    pub label: &'a str,
}

impl BusyIndicator<'_> {
    fn text(&self) -> String {
        let frame = FRAMES[(self.tick % FRAMES.len() as u64) as usize];
        format!(" {frame} {}… ", self.label)
    }
}

impl Widget for BusyIndicator<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.visible || area.height == 0 {
            return;
        }
        let text = self.text();
        let width = text.chars().count() as u16;
        // Needs room for both corners and a little title space.
        if width + 4 > area.width {
            return;
        }
        let x = area.right() - width - 2;
        buf.set_span(x, area.y, &Span::styled(text, Theme::busy_style()), width);
    }
}
