//! User configuration — server address, request timeout, theme, keybindings.
//!
//! Stored as a plain `key = value` file at
//! `$XDG_CONFIG_HOME/gallery-tui/config.toml` (default
//! `~/.config/gallery-tui/config.toml`).  Unknown keys and unparsable
//! values are skipped so an old file never stops the client from starting.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ui::theme::ThemeMode;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const TIMEOUT_RANGE: (u64, u64) = (1, 300);

// ───────────────────────────────────────── actions ───────────

/// Every rebindable gallery-view action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    Expand,
    Collapse,
    SwitchPane,
    Open,
    ParentFolder,
    ShowInfo,
    FilterName,
    CycleSize,
    CycleAge,
    ClearFilters,
    CreateFolder,
    Upload,
    Refresh,
    ToggleTheme,
    Quit,
}

struct ActionSpec {
    action: Action,
    key: &'static str,
    label: &'static str,
    defaults: &'static [&'static str],
}

/// Config key, UI label and default keys per action, in file order.
const ACTIONS: &[ActionSpec] = &[
    ActionSpec { action: Action::MoveUp, key: "move_up", label: "Move Up", defaults: &["Up", "k"] },
    ActionSpec { action: Action::MoveDown, key: "move_down", label: "Move Down", defaults: &["Down", "j"] },
    ActionSpec { action: Action::Expand, key: "expand", label: "Expand Folder", defaults: &["Right", "l"] },
    ActionSpec { action: Action::Collapse, key: "collapse", label: "Collapse Folder", defaults: &["Left", "h"] },
    ActionSpec { action: Action::SwitchPane, key: "switch_pane", label: "Switch Pane", defaults: &["Tab"] },
    ActionSpec { action: Action::Open, key: "open", label: "Open", defaults: &["Enter"] },
    ActionSpec { action: Action::ParentFolder, key: "parent_folder", label: "Parent Folder", defaults: &["Backspace"] },
    ActionSpec { action: Action::ShowInfo, key: "show_info", label: "Image Info", defaults: &["i"] },
    ActionSpec { action: Action::FilterName, key: "filter_name", label: "Filter by Name", defaults: &["/"] },
    ActionSpec { action: Action::CycleSize, key: "cycle_size", label: "Filter by Size", defaults: &["s"] },
    ActionSpec { action: Action::CycleAge, key: "cycle_age", label: "Filter by Date", defaults: &["d"] },
    ActionSpec { action: Action::ClearFilters, key: "clear_filters", label: "Clear Filters", defaults: &["c"] },
    ActionSpec { action: Action::CreateFolder, key: "create_folder", label: "New Folder", defaults: &["n"] },
    ActionSpec { action: Action::Upload, key: "upload", label: "Upload", defaults: &["u"] },
    ActionSpec { action: Action::Refresh, key: "refresh", label: "Refresh", defaults: &["r"] },
    ActionSpec { action: Action::ToggleTheme, key: "toggle_theme", label: "Toggle Theme", defaults: &["t"] },
    ActionSpec { action: Action::Quit, key: "quit", label: "Quit", defaults: &["q"] },
];

impl Action {
    fn spec(self) -> &'static ActionSpec {
        // Every variant has a row; the fallback is unreachable.
        ACTIONS.iter().find(|s| s.action == self).unwrap_or(&ACTIONS[0])
    }

    pub fn all() -> impl Iterator<Item = Action> {
        ACTIONS.iter().map(|s| s.action)
    }

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        self.spec().label
    }

    fn config_key(self) -> &'static str {
        self.spec().key
    }

    fn from_config_key(key: &str) -> Option<Self> {
        ACTIONS.iter().find(|s| s.key == key).map(|s| s.action)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// Code, canonical file name, short UI label, extra spellings accepted
/// when parsing.
type NamedKey = (KeyCode, &'static str, &'static str, &'static [&'static str]);

const NAMED_KEYS: &[NamedKey] = &[
    (KeyCode::Up, "Up", "↑", &[]),
    (KeyCode::Down, "Down", "↓", &[]),
    (KeyCode::Left, "Left", "←", &[]),
    (KeyCode::Right, "Right", "→", &[]),
    (KeyCode::Enter, "Enter", "Enter", &["return"]),
    (KeyCode::Esc, "Esc", "Esc", &["escape"]),
    (KeyCode::Tab, "Tab", "Tab", &[]),
    (KeyCode::Backspace, "Backspace", "Bksp", &["bksp"]),
    (KeyCode::Delete, "Delete", "Del", &["del"]),
    (KeyCode::Home, "Home", "Home", &[]),
    (KeyCode::End, "End", "End", &[]),
    (KeyCode::PageUp, "PageUp", "PgUp", &["pgup"]),
    (KeyCode::PageDown, "PageDown", "PgDn", &["pgdn"]),
    (KeyCode::Char(' '), "Space", "Space", &[]),
];

const MODIFIERS: &[(KeyModifiers, &str)] = &[
    (KeyModifiers::CONTROL, "Ctrl"),
    (KeyModifiers::ALT, "Alt"),
    (KeyModifiers::SHIFT, "Shift"),
];

/// One key plus modifiers, written `Ctrl+r`, `Alt+Up`, `q`, `F5`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Whether `event` triggers this binding.  SHIFT is not compared for
    /// character keys, whose case already carries it.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mut mask = KeyModifiers::CONTROL | KeyModifiers::ALT;
        if !matches!(event.code, KeyCode::Char(_)) {
            mask |= KeyModifiers::SHIFT;
        }
        self.code == event.code && self.modifiers & mask == event.modifiers & mask
    }

    /// Compact form for the status bar (`↑`, `Ctrl+r`).
    pub fn label(&self) -> String {
        self.render(|named| named.2)
    }

    fn render(&self, pick: impl Fn(&NamedKey) -> &'static str) -> String {
        let mut out: String = MODIFIERS
            .iter()
            .filter(|(m, _)| self.modifiers.contains(*m))
            .map(|(_, name)| format!("{name}+"))
            .collect();
        match NAMED_KEYS.iter().find(|n| n.0 == self.code) {
            Some(named) => out.push_str(pick(named)),
            None => match self.code {
                KeyCode::Char(c) => out.push(c),
                KeyCode::F(n) => out.push_str(&format!("F{n}")),
                other => out.push_str(&format!("{other:?}")),
            },
        }
        out
    }
}

impl fmt::Display for KeyBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(|named| named.1))
    }
}

impl FromStr for KeyBind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // A lone `+` is the plus key, not a separator.
        let (prefix, key) = match s.rsplit_once('+') {
            Some((prefix, "")) => (prefix.trim_end_matches('+'), "+"),
            Some((prefix, key)) => (prefix, key),
            None => ("", s),
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in prefix.split('+').filter(|p| !p.is_empty()) {
            let (m, _) = MODIFIERS
                .iter()
                .find(|(_, name)| name.eq_ignore_ascii_case(part))
                .ok_or_else(|| format!("unknown modifier '{part}'"))?;
            modifiers |= *m;
        }

        let lower = key.to_ascii_lowercase();
        let named = NAMED_KEYS
            .iter()
            .find(|(_, name, _, aliases)| name.eq_ignore_ascii_case(key) || aliases.contains(&lower.as_str()));
        let code = if let Some(named) = named {
            named.0
        } else if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            KeyCode::F(n)
        } else {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                // Case is kept: `N` and `n` are different bindings.
                (Some(c), None) => KeyCode::Char(c),
                _ => return Err(format!("unknown key '{key}'")),
            }
        };
        Ok(KeyBind { code, modifiers })
    }
}

fn parse_binds(value: &str) -> Vec<KeyBind> {
    value
        .split(',')
        .filter_map(|part| part.trim().trim_matches('"').parse().ok())
        .collect()
}

// ───────────────────────────────────────── config ────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Base URL of the gallery server.
    pub server_url: String,
    pub request_timeout_secs: u64,
    pub theme: ThemeMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            theme: ThemeMode::default(),
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        ACTIONS
            .iter()
            .map(|spec| (spec.action, parse_binds(&spec.defaults.join(","))))
            .collect()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The action bound to `event`.  If several match, the binding with
    /// the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .flat_map(|(action, binds)| binds.iter().map(move |b| (*action, b)))
            .filter(|(_, bind)| bind.matches(event))
            .max_by_key(|(_, bind)| bind.modifiers.bits().count_ones())
            .map(|(action, _)| action)
    }

    /// First binding of `action`, for hints.
    pub fn short_binding(&self, action: Action) -> String {
        self.bindings
            .get(&action)
            .and_then(|binds| binds.first())
            .map_or_else(|| "?".into(), KeyBind::label)
    }

    /// Status-bar hint built from the current bindings.
    pub fn status_bar_hint(&self) -> String {
        const HINTED: [Action; 7] = [
            Action::Open,
            Action::FilterName,
            Action::CycleSize,
            Action::CycleAge,
            Action::CreateFolder,
            Action::Upload,
            Action::Quit,
        ];
        HINTED
            .iter()
            .map(|&a| format!("{}: {}", self.short_binding(a), a.label().to_lowercase()))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    // ── persistence ─────────────────────────────────────────────

    /// Read the config file; a missing or unreadable file gives defaults.
    pub fn load() -> Self {
        std::fs::read_to_string(config_path())
            .map(|text| Self::parse(&text))
            .unwrap_or_default()
    }

    /// Write the config file and return its path.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = config_path();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(path)
    }

    fn parse(text: &str) -> Self {
        let mut config = Self::default();
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with('['))
            .filter_map(|l| l.split_once('='))
            .map(|(k, v)| (k.trim(), v.trim()));

        for (key, value) in entries {
            match key {
                "server_url" => {
                    let url = value.trim_matches('"');
                    if !url.is_empty() {
                        config.server_url = url.to_string();
                    }
                }
                "theme" => {
                    if let Ok(mode) = value.trim_matches('"').parse() {
                        config.theme = mode;
                    }
                }
                "request_timeout_secs" => {
                    if let Ok(secs) = value.parse::<u64>() {
                        config.request_timeout_secs = secs.clamp(TIMEOUT_RANGE.0, TIMEOUT_RANGE.1);
                    }
                }
                _ => {
                    let Some(action) = Action::from_config_key(key) else {
                        continue;
                    };
                    let binds = parse_binds(value);
                    if !binds.is_empty() {
                        config.bindings.insert(action, binds);
                    }
                }
            }
        }
        config
    }

    fn serialise(&self) -> String {
        let mut out = format!(
            "# {name} configuration\n\
             \n\
             server_url = \"{url}\"\n\
             request_timeout_secs = {timeout}\n\
             theme = {theme}\n\
             \n\
             # Key bindings: action = Key1, Key2\n\
             # Modifiers are prefixes (Ctrl+, Alt+, Shift+). Named keys: Up Down\n\
             # Left Right Enter Esc Tab Backspace Delete Home End PageUp PageDown\n\
             # Space F1-F12.\n",
            name = env!("CARGO_PKG_NAME"),
            url = self.server_url,
            timeout = self.request_timeout_secs,
            theme = self.theme,
        );
        for action in Action::all() {
            let Some(binds) = self.bindings.get(&action) else {
                continue;
            };
            let keys: Vec<String> = binds.iter().map(ToString::to_string).collect();
            out.push_str(&format!("{} = {}\n", action.config_key(), keys.join(", ")));
        }
        out
    }
}

fn config_path() -> PathBuf {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(env!("CARGO_PKG_NAME")).join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn every_action_has_default_keys() {
        let defaults = AppConfig::default_bindings();
        for action in Action::all() {
            assert!(!defaults[&action].is_empty(), "{action:?}");
        }
        assert_eq!(Action::all().count(), 17);
    }

    #[test]
    fn keybind_parsing() {
        let bind: KeyBind = "Ctrl+Alt+Up".parse().unwrap();
        assert_eq!(bind.code, KeyCode::Up);
        assert_eq!(bind.modifiers, KeyModifiers::CONTROL | KeyModifiers::ALT);
        assert_eq!("pgdn".parse::<KeyBind>().unwrap().code, KeyCode::PageDown);
        assert_eq!("F5".parse::<KeyBind>().unwrap().code, KeyCode::F(5));
        assert_eq!("N".parse::<KeyBind>().unwrap().code, KeyCode::Char('N'));
        assert_eq!("+".parse::<KeyBind>().unwrap().code, KeyCode::Char('+'));
        assert_eq!(
            "Ctrl++".parse::<KeyBind>().unwrap(),
            KeyBind::new(KeyCode::Char('+'), KeyModifiers::CONTROL)
        );
        assert!("Hyper+x".parse::<KeyBind>().is_err());
        assert!("nonsense".parse::<KeyBind>().is_err());
    }

    #[test]
    fn labels_and_file_form_differ_for_named_keys() {
        let bind = KeyBind::new(KeyCode::Backspace, KeyModifiers::SHIFT);
        assert_eq!(bind.to_string(), "Shift+Backspace");
        assert_eq!(bind.label(), "Shift+Bksp");
    }

    #[test]
    fn parse_overrides_server_and_bindings() {
        let config = AppConfig::parse(
            "# comment\nserver_url = \"http://photos.lan:8080\"\nrequest_timeout_secs = 9000\nupload = Ctrl+u, U\nbogus = x\ntheme = purple\n",
        );
        assert_eq!(config.server_url, "http://photos.lan:8080");
        assert_eq!(config.request_timeout_secs, 300);
        assert_eq!(config.theme, ThemeMode::Dark);
        assert_eq!(
            config.bindings[&Action::Upload],
            vec![
                KeyBind::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
                KeyBind::new(KeyCode::Char('U'), KeyModifiers::NONE),
            ]
        );
        assert_eq!(config.bindings[&Action::Quit], AppConfig::default_bindings()[&Action::Quit]);
    }

    #[test]
    fn serialise_round_trips_through_parse() {
        let mut config = AppConfig::default();
        config.server_url = "https://gallery.example".into();
        config.request_timeout_secs = 12;
        config.theme = ThemeMode::Light;
        config
            .bindings
            .insert(Action::Refresh, vec![KeyBind::new(KeyCode::F(5), KeyModifiers::NONE)]);
        let reparsed = AppConfig::parse(&config.serialise());
        assert_eq!(reparsed.server_url, config.server_url);
        assert_eq!(reparsed.request_timeout_secs, 12);
        assert_eq!(reparsed.bindings, config.bindings);
        assert_eq!(reparsed, config);
    }

    #[test]
    fn match_key_prefers_more_modifiers() {
        let mut config = AppConfig::default();
        config
            .bindings
            .insert(Action::Refresh, vec![KeyBind::new(KeyCode::Char('r'), KeyModifiers::CONTROL)]);
        config
            .bindings
            .insert(Action::Upload, vec![KeyBind::new(KeyCode::Char('r'), KeyModifiers::NONE)]);
        assert_eq!(
            config.match_key(key(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(Action::Refresh)
        );
        assert_eq!(
            config.match_key(key(KeyCode::Char('r'), KeyModifiers::NONE)),
            Some(Action::Upload)
        );
        assert_eq!(config.match_key(key(KeyCode::Char('/'), KeyModifiers::SHIFT)), Some(Action::FilterName));
    }

    #[test]
    fn status_hint_uses_current_bindings() {
        let hint = AppConfig::default().status_bar_hint();
        assert!(hint.contains("Enter: open"));
        assert!(hint.contains("q: quit"));
    }
}
