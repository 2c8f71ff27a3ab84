//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Bindings map a `(modifiers, code)` pair to a [`KeyAction`]. A config file
//! only overrides or adds bindings; defaults are always loaded first.

use std::collections::HashMap;
use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use crate::error::{Context, Result};

/// Semantic keyboard actions available in normal mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Quit,
    /// Open the add-item form.
    AddItem,
    /// Prompt for the name of an item to remove.
    RemoveItem,
    /// Open the sort criterion menu.
    OpenSortMenu,
    /// Prompt for a name to binary search.
    StartSearch,
    OpenHelp,
    ToggleKeybindsPane,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Ignore,
}

impl KeyAction {
    pub const ALL: [KeyAction; 12] = [
        KeyAction::Quit,
        KeyAction::AddItem,
        KeyAction::RemoveItem,
        KeyAction::OpenSortMenu,
        KeyAction::StartSearch,
        KeyAction::OpenHelp,
        KeyAction::ToggleKeybindsPane,
        KeyAction::MoveUp,
        KeyAction::MoveDown,
        KeyAction::PageUp,
        KeyAction::PageDown,
        KeyAction::Ignore,
    ];

    pub fn name(self) -> &'static str {
        match self {
            KeyAction::Quit => "Quit",
            KeyAction::AddItem => "AddItem",
            KeyAction::RemoveItem => "RemoveItem",
            KeyAction::OpenSortMenu => "OpenSortMenu",
            KeyAction::StartSearch => "StartSearch",
            KeyAction::OpenHelp => "OpenHelp",
            KeyAction::ToggleKeybindsPane => "ToggleKeybindsPane",
            KeyAction::MoveUp => "MoveUp",
            KeyAction::MoveDown => "MoveDown",
            KeyAction::PageUp => "PageUp",
            KeyAction::PageDown => "PageDown",
            KeyAction::Ignore => "Ignore",
        }
    }

    /// Human readable label for help and the keybindings pane.
    pub fn description(self) -> &'static str {
        match self {
            KeyAction::Quit => "Quit",
            KeyAction::AddItem => "Add item",
            KeyAction::RemoveItem => "Remove item",
            KeyAction::OpenSortMenu => "Sort items",
            KeyAction::StartSearch => "Search by name",
            KeyAction::OpenHelp => "Help",
            KeyAction::ToggleKeybindsPane => "Toggle keybindings",
            KeyAction::MoveUp => "Move up",
            KeyAction::MoveDown => "Move down",
            KeyAction::PageUp => "Page up",
            KeyAction::PageDown => "Page down",
            KeyAction::Ignore => "Ignore",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|a| a.name() == s)
    }
}

#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let bindings = [
            ((M::NONE, Char('q')), KeyAction::Quit),
            ((M::CONTROL, Char('c')), KeyAction::Quit),
            ((M::NONE, Esc), KeyAction::Ignore),
            ((M::NONE, Char('a')), KeyAction::AddItem),
            ((M::NONE, Char('n')), KeyAction::AddItem),
            ((M::NONE, Delete), KeyAction::RemoveItem),
            ((M::NONE, Char('d')), KeyAction::RemoveItem),
            ((M::NONE, Char('s')), KeyAction::OpenSortMenu),
            ((M::NONE, Char('/')), KeyAction::StartSearch),
            ((M::NONE, Char('?')), KeyAction::OpenHelp),
            ((M::NONE, Up), KeyAction::MoveUp),
            ((M::NONE, Down), KeyAction::MoveDown),
            ((M::NONE, Char('k')), KeyAction::MoveUp),
            ((M::NONE, Char('j')), KeyAction::MoveDown),
            ((M::NONE, PageUp), KeyAction::PageUp),
            ((M::NONE, PageDown), KeyAction::PageDown),
            // Terminals disagree on whether Shift+k carries the SHIFT bit.
            ((M::NONE, Char('K')), KeyAction::ToggleKeybindsPane),
            ((M::SHIFT, Char('K')), KeyAction::ToggleKeybindsPane),
        ]
        .into_iter()
        .collect();
        Self { bindings }
    }

    /// Load `path`, or write the defaults there if it does not exist yet.
    pub fn load_or_init(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path).unwrap_or_else(|e| {
                warn!(error = %e, "falling back to default keybindings");
                Self::default()
            });
        }
        let km = Self::default();
        if let Err(e) = km.write_file(path) {
            warn!(error = %e, "could not write default keybindings");
        }
        km
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).with_ctx(|| format!("read {}", path.display()))?;
        Ok(Self::parse(&contents))
    }

    /// Parse `Action = KeySpec` lines on top of the defaults.
    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else { continue };
            match (KeyAction::parse(lhs), parse_key(rhs)) {
                (Some(action), Some(key)) => {
                    map.bindings.insert(key, action);
                }
                _ => warn!(line, "ignoring keybinding"),
            }
        }
        map
    }

    pub fn to_config(&self) -> String {
        let mut buf = String::new();
        buf.push_str("# backpack-tui keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+q, Shift+K, Enter, Esc, Tab, Up, Down, PageUp, PageDown, Delete, /, ?\n\n");
        let mut all = self.all_bindings();
        all.sort_by_key(|((mods, code), action)| (action.name(), Self::format_key(*mods, *code)));
        for ((mods, code), action) in all {
            buf.push_str(&format!("{} = {}\n", action.name(), Self::format_key(mods, code)));
        }
        buf
    }

    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_config()).with_ctx(|| format!("write {}", path.display()))
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    pub fn all_bindings(&self) -> Vec<((KeyModifiers, KeyCode), KeyAction)> {
        self.bindings.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Keys bound to `action`, formatted and sorted.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((m, c), _)| Self::format_key(*m, *c))
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Format a key like "Ctrl+q", "Shift+K" or "PageDown".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        let base = match code {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Delete => "Delete".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::Up => "Up".into(),
            KeyCode::Down => "Down".into(),
            KeyCode::PageUp => "PageUp".into(),
            KeyCode::PageDown => "PageDown".into(),
            other => format!("{other:?}"),
        };
        let mut out = String::new();
        if mods.contains(KeyModifiers::CONTROL) {
            out.push_str("Ctrl+");
        }
        if mods.contains(KeyModifiers::SHIFT) {
            out.push_str("Shift+");
        }
        out.push_str(&base);
        out
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    let mut rest = spec.trim();
    let mut mods = KeyModifiers::NONE;
    loop {
        if let Some(r) = rest.strip_prefix("Ctrl+") {
            mods |= KeyModifiers::CONTROL;
            rest = r;
        } else if let Some(r) = rest.strip_prefix("Shift+") {
            mods |= KeyModifiers::SHIFT;
            rest = r;
        } else {
            break;
        }
    }
    let code = match rest {
        "Enter" => KeyCode::Enter,
        "Delete" => KeyCode::Delete,
        "Esc" | "Escape" => KeyCode::Esc,
        "Tab" => KeyCode::Tab,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(mods: KeyModifiers, code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn defaults_cover_menu_actions() {
        let km = Keymap::default();
        assert_eq!(km.resolve(&key(KeyModifiers::NONE, KeyCode::Char('a'))), Some(KeyAction::AddItem));
        assert_eq!(km.resolve(&key(KeyModifiers::NONE, KeyCode::Char('s'))), Some(KeyAction::OpenSortMenu));
        assert_eq!(km.resolve(&key(KeyModifiers::NONE, KeyCode::Char('/'))), Some(KeyAction::StartSearch));
        assert_eq!(km.resolve(&key(KeyModifiers::CONTROL, KeyCode::Char('c'))), Some(KeyAction::Quit));
        assert_eq!(km.resolve(&key(KeyModifiers::NONE, KeyCode::Char('z'))), None);
    }

    #[test]
    fn parse_overrides_and_skips_garbage() {
        let km = Keymap::parse("# comment\nOpenSortMenu = o\nQuit = Ctrl+x\nNope = y\nAddItem = TooLong\n");
        assert_eq!(km.resolve(&key(KeyModifiers::NONE, KeyCode::Char('o'))), Some(KeyAction::OpenSortMenu));
        assert_eq!(km.resolve(&key(KeyModifiers::CONTROL, KeyCode::Char('x'))), Some(KeyAction::Quit));
        assert_eq!(km.resolve(&key(KeyModifiers::NONE, KeyCode::Char('y'))), None);
        // Defaults survive.
        assert_eq!(km.resolve(&key(KeyModifiers::NONE, KeyCode::Char('s'))), Some(KeyAction::OpenSortMenu));
    }

    #[test]
    fn config_round_trips() {
        let km = Keymap::default();
        let reparsed = Keymap::parse(&km.to_config());
        let mut a = km.all_bindings();
        let mut b = reparsed.all_bindings();
        a.sort_by_key(|(k, v)| (format!("{k:?}"), v.name()));
        b.sort_by_key(|(k, v)| (format!("{k:?}"), v.name()));
        assert_eq!(a, b);
    }

    #[test]
    fn keys_for_lists_all_bindings() {
        let km = Keymap::default();
        assert_eq!(km.keys_for(KeyAction::RemoveItem), ["Delete", "d"]);
        assert_eq!(km.keys_for(KeyAction::Quit), ["Ctrl+c", "q"]);
        assert_eq!(km.keys_for(KeyAction::ToggleKeybindsPane), ["K", "Shift+K"]);
    }

    #[test]
    fn shift_bindings_survive_the_config_file() {
        let km = Keymap::default();
        let config = km.to_config();
        let toggles: Vec<_> = config.lines().filter(|l| l.starts_with("ToggleKeybindsPane")).collect();
        assert_eq!(toggles, ["ToggleKeybindsPane = K", "ToggleKeybindsPane = Shift+K"]);

        let reparsed = Keymap::parse(&config);
        assert_eq!(
            reparsed.resolve(&key(KeyModifiers::SHIFT, KeyCode::Char('K'))),
            Some(KeyAction::ToggleKeybindsPane)
        );

        let km = Keymap::parse("AddItem = Ctrl+Shift+A\nQuit = Shift+Q\n");
        assert_eq!(
            km.resolve(&key(KeyModifiers::CONTROL | KeyModifiers::SHIFT, KeyCode::Char('A'))),
            Some(KeyAction::AddItem)
        );
        assert_eq!(km.resolve(&key(KeyModifiers::SHIFT, KeyCode::Char('Q'))), Some(KeyAction::Quit));
        assert_eq!(
            Keymap::format_key(KeyModifiers::CONTROL | KeyModifiers::SHIFT, KeyCode::Char('A')),
            "Ctrl+Shift+A"
        );
        // A dangling modifier is not a key.
        assert_eq!(Keymap::parse("Quit = Shift+\n").all_bindings().len(), Keymap::default().all_bindings().len());
    }
}
