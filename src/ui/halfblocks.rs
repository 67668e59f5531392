//! Half-block image rendering: each terminal cell shows two vertically
//! stacked pixels using `▀` with the top pixel as foreground and the bottom
//! pixel as background.

use image::imageops::{self, FilterType};
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Color,
};

use crate::core::zoom::Window;

/// Draw the `window` crop of `img`, scaled to fit `area` with its aspect
/// ratio preserved and centred.
pub fn render_image(img: &image::RgbaImage, window: Window, area: Rect, buf: &mut Buffer) {
    if area.width == 0 || area.height == 0 || window.width == 0 || window.height == 0 {
        return;
    }
    if window.x + window.width > img.width() || window.y + window.height > img.height() {
        return;
    }

    // Available pixel budget: each column = 1 px wide, each row = 2 px tall.
    let max_px_w = area.width as f64;
    let max_px_h = (area.height as f64) * 2.0;

    let src_w = window.width as f64;
    let src_h = window.height as f64;

    let scale = (max_px_w / src_w).min(max_px_h / src_h);
    let fit_w = (src_w * scale).round().clamp(1.0, max_px_w) as u32;
    let fit_h = (src_h * scale).round().clamp(1.0, max_px_h) as u32;

    let crop = imageops::crop_imm(img, window.x, window.y, window.width, window.height).to_image();
    let filter = if scale > 1.0 {
        FilterType::Nearest
    } else {
        FilterType::Triangle
    };
    let rgba = imageops::resize(&crop, fit_w, fit_h, filter);
    let (iw, ih) = (rgba.width(), rgba.height());

    let col_offset = area.width.saturating_sub(iw as u16) / 2;
    let row_offset = area.height.saturating_sub(ih.div_ceil(2) as u16) / 2;

    for row in 0..area.height - row_offset {
        let yt = (row as u32) * 2;
        let yb = yt + 1;
        if yt >= ih {
            break;
        }
        for col in 0..iw.min(area.width as u32) {
            let t = rgba.get_pixel(col, yt);
            let fg = Color::Rgb(t[0], t[1], t[2]);
            let bg = if yb < ih {
                let b = rgba.get_pixel(col, yb);
                Color::Rgb(b[0], b[1], b[2])
            } else {
                Color::Reset
            };
            let pos = Position::new(area.x + col_offset + col as u16, area.y + row_offset + row);
            if let Some(cell) = buf.cell_mut(pos) {
                cell.set_char('▀').set_fg(fg).set_bg(bg);
            }
        }
    }
}
