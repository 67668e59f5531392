//! Colour palette and text styles used across the UI.
//!
//! Two palettes exist, dark and light.  The active one is process-wide and
//! switched with [`Theme::set_mode`]; every style function reads it.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use ratatui::style::{Color, Modifier, Style};

use crate::app::state::NoticeKind;

/// Which palette is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        })
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(ThemeMode::Dark),
            "light" => Ok(ThemeMode::Light),
            other => Err(format!("unknown theme '{other}' (expected dark or light)")),
        }
    }
}

struct Palette {
    folder: Color,
    root: Color,
    current: Color,
    text: Color,
    dim: Color,
    highlight_bg: Color,
    accent: Color,
    idle: Color,
    focus: Color,
    title: Color,
    bar_bg: Color,
    bar_fg: Color,
    success: Color,
    error: Color,
    busy: Color,
}

const DARK: Palette = Palette {
    folder: Color::Cyan,
    root: Color::Yellow,
    current: Color::LightGreen,
    text: Color::White,
    dim: Color::DarkGray,
    highlight_bg: Color::DarkGray,
    accent: Color::Yellow,
    idle: Color::Gray,
    focus: Color::LightBlue,
    title: Color::Green,
    bar_bg: Color::DarkGray,
    bar_fg: Color::White,
    success: Color::LightGreen,
    error: Color::LightRed,
    busy: Color::LightYellow,
};

const LIGHT: Palette = Palette {
    folder: Color::Blue,
    root: Color::Magenta,
    current: Color::Green,
    text: Color::Black,
    dim: Color::Gray,
    highlight_bg: Color::Gray,
    accent: Color::Red,
    idle: Color::DarkGray,
    focus: Color::Blue,
    title: Color::Blue,
    bar_bg: Color::Gray,
    bar_fg: Color::Black,
    success: Color::Green,
    error: Color::Red,
    busy: Color::Magenta,
};

static LIGHT_MODE: AtomicBool = AtomicBool::new(false);

fn palette() -> &'static Palette {
    if LIGHT_MODE.load(Ordering::Relaxed) {
        &LIGHT
    } else {
        &DARK
    }
}

/// Every colour the client draws with.
pub struct Theme;

impl Theme {
    pub fn set_mode(mode: ThemeMode) {
        LIGHT_MODE.store(mode == ThemeMode::Light, Ordering::Relaxed);
    }

    pub fn mode() -> ThemeMode {
        if LIGHT_MODE.load(Ordering::Relaxed) {
            ThemeMode::Light
        } else {
            ThemeMode::Dark
        }
    }

    // ── sidebar ────────────────────────────────────────────────
    pub fn folder_style() -> Style {
        Style::new().fg(palette().folder).add_modifier(Modifier::BOLD)
    }

    pub fn root_style() -> Style {
        Style::new().fg(palette().root).add_modifier(Modifier::BOLD)
    }

    /// The folder whose images are on screen.
    pub fn current_folder_style() -> Style {
        Style::new().fg(palette().current).add_modifier(Modifier::BOLD)
    }

    // ── image list ─────────────────────────────────────────────
    pub fn file_style() -> Style {
        Style::new().fg(palette().text)
    }

    pub fn meta_style() -> Style {
        Style::new().fg(palette().dim)
    }

    pub fn selected_style() -> Style {
        Style::new().bg(palette().highlight_bg).add_modifier(Modifier::BOLD)
    }

    /// Selected row in the pane that does not have focus.
    pub fn selected_unfocused_style() -> Style {
        Style::new().add_modifier(Modifier::REVERSED | Modifier::DIM)
    }

    // ── filter bar ─────────────────────────────────────────────
    pub fn filter_active_style() -> Style {
        Style::new().fg(palette().accent).add_modifier(Modifier::BOLD)
    }

    pub fn filter_idle_style() -> Style {
        Style::new().fg(palette().idle)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::new().fg(palette().idle)
    }

    pub fn focused_border_style() -> Style {
        Style::new().fg(palette().focus)
    }

    pub fn title_style() -> Style {
        Style::new().fg(palette().title).add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        let p = palette();
        Style::new().bg(p.bar_bg).fg(p.bar_fg)
    }

    pub fn notice_style(kind: NoticeKind) -> Style {
        let p = palette();
        let fg = match kind {
            NoticeKind::Info => p.bar_fg,
            NoticeKind::Success => p.success,
            NoticeKind::Error => p.error,
        };
        Style::new().bg(p.bar_bg).fg(fg).add_modifier(Modifier::BOLD)
    }

    pub fn command_input_style() -> Style {
        Style::new().fg(palette().accent)
    }

    pub fn busy_style() -> Style {
        Style::new().fg(palette().busy).add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_names_parse_and_print() {
        assert_eq!("Light".parse::<ThemeMode>(), Ok(ThemeMode::Light));
        assert_eq!(" dark ".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
        assert!("sepia".parse::<ThemeMode>().is_err());
        assert_eq!(ThemeMode::Light.to_string(), "light");
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
    }

    #[test]
    fn palettes_differ_where_contrast_matters() {
        assert_ne!(DARK.text, LIGHT.text);
        assert_ne!(DARK.bar_fg, LIGHT.bar_fg);
        assert_ne!(DARK.accent, LIGHT.accent);
    }
}
