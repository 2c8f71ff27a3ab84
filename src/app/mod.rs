//! Application state types and entry glue.
//!
//! Holds the backpack [`Inventory`] together with the UI state around it
//! (selection, open dialog, theme, keymap) and re-exports the event loop as
//! `run`.
//!
pub mod keymap;
pub mod update;

use std::path::{Path, PathBuf};

use ratatui::style::Color;
use tracing::{debug, warn};

use crate::error::{Context, Result};
use crate::inventory::Inventory;
use crate::sort::SortKey;
use keymap::Keymap;

pub const THEME_FILE: &str = "theme.conf";
pub const KEYBINDS_FILE: &str = "keybinds.conf";

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Modal,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
}

/// Built-in palettes selectable from the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ThemeName {
    Dark,
    Mocha,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
        }
    }

    /// Catppuccin Mocha, the default.
    pub fn mocha() -> Self {
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),
            muted: Color::Rgb(0x7f, 0x84, 0x9c),
            title: Color::Rgb(0xcb, 0xa6, 0xf7),
            border: Color::Rgb(0x58, 0x5b, 0x70),
            header_bg: Color::Rgb(0x31, 0x32, 0x44),
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf),
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a),
        }
    }

    pub fn named(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self::dark(),
            ThemeName::Mocha => Self::mocha(),
        }
    }

    fn slots(&mut self) -> [(&'static str, &mut Color); 10] {
        [
            ("text", &mut self.text),
            ("muted", &mut self.muted),
            ("title", &mut self.title),
            ("border", &mut self.border),
            ("header_bg", &mut self.header_bg),
            ("header_fg", &mut self.header_fg),
            ("status_bg", &mut self.status_bg),
            ("status_fg", &mut self.status_fg),
            ("highlight_fg", &mut self.highlight_fg),
            ("highlight_bg", &mut self.highlight_bg),
        ]
    }

    /// Parse `key = color` lines on top of `mocha`. Unknown keys and
    /// unparsable colors are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut theme = Self::mocha();
        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else { continue };
            let (key, val) = (key.trim(), val.trim());
            let Some(color) = parse_color(val) else {
                debug!(key, val, "ignoring theme entry");
                continue;
            };
            if let Some((_, slot)) = theme.slots().into_iter().find(|(k, _)| *k == key) {
                *slot = color;
            }
        }
        theme
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).with_ctx(|| format!("read {}", path.display()))?;
        Ok(Self::parse(&contents))
    }

    pub fn to_config(&self) -> String {
        let mut buf = String::from("# backpack-tui theme\n# Colors: #RRGGBB, a name (cyan, darkgray, ...), index:N or 'reset'\n\n");
        let mut copy = *self;
        for (key, color) in copy.slots() {
            buf.push_str(&format!("{key} = {}\n", color_to_str(*color)));
        }
        buf
    }

    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_config()).with_ctx(|| format!("write {}", path.display()))
    }

    /// Load the theme file, writing the default one first if it is missing.
    pub fn load_or_init(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path).unwrap_or_else(|e| {
                warn!(error = %e, "falling back to default theme");
                Self::mocha()
            });
        }
        let theme = Self::mocha();
        if let Err(e) = theme.write_file(path) {
            warn!(error = %e, "could not write default theme");
        }
        theme
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

/// Named terminal colors, written to and read from the theme file by name.
const NAMED_COLORS: [(&str, Color); 16] = [
    ("black", Color::Black),
    ("red", Color::Red),
    ("green", Color::Green),
    ("yellow", Color::Yellow),
    ("blue", Color::Blue),
    ("magenta", Color::Magenta),
    ("cyan", Color::Cyan),
    ("gray", Color::Gray),
    ("darkgray", Color::DarkGray),
    ("lightred", Color::LightRed),
    ("lightgreen", Color::LightGreen),
    ("lightyellow", Color::LightYellow),
    ("lightblue", Color::LightBlue),
    ("lightmagenta", Color::LightMagenta),
    ("lightcyan", Color::LightCyan),
    ("white", Color::White),
];

/// Parse `#RRGGBB`, `RRGGBB`, a color name, `index:N` or `reset`.
fn parse_color(s: &str) -> Option<Color> {
    let lower = s.trim().to_ascii_lowercase();
    if lower == "reset" {
        return Some(Color::Reset);
    }
    if let Some((_, color)) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
        return Some(*color);
    }
    if let Some(idx) = lower.strip_prefix("index:") {
        return idx.trim().parse().ok().map(Color::Indexed);
    }
    let hex = lower.strip_prefix('#').unwrap_or(&lower);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn color_to_str(c: Color) -> String {
    match c {
        Color::Rgb(r, g, b) => format!("#{r:02X}{g:02X}{b:02X}"),
        Color::Indexed(i) => format!("index:{i}"),
        Color::Reset => "reset".into(),
        named => NAMED_COLORS
            .iter()
            .find(|(_, color)| *color == named)
            .map(|(name, _)| (*name).to_string())
            .unwrap_or_else(|| "reset".into()),
    }
}

/// Fields of the add-item form, in tab order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Type,
    Quantity,
    Priority,
    Submit,
}

impl FormField {
    pub const ORDER: [FormField; 5] = [
        FormField::Name,
        FormField::Type,
        FormField::Quantity,
        FormField::Priority,
        FormField::Submit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Type => "Type",
            FormField::Quantity => "Quantity",
            FormField::Priority => "Priority (1-5)",
            FormField::Submit => "Add",
        }
    }
}

/// Raw text typed into the add-item form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemForm {
    pub selected: usize,
    pub name: String,
    pub kind: String,
    pub quantity: String,
    pub priority: String,
    pub error: Option<String>,
}

impl ItemForm {
    pub fn field(&self) -> FormField {
        FormField::ORDER[self.selected.min(FormField::ORDER.len() - 1)]
    }

    pub fn value_mut(&mut self) -> Option<&mut String> {
        match self.field() {
            FormField::Name => Some(&mut self.name),
            FormField::Type => Some(&mut self.kind),
            FormField::Quantity => Some(&mut self.quantity),
            FormField::Priority => Some(&mut self.priority),
            FormField::Submit => None,
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Type => &self.kind,
            FormField::Quantity => &self.quantity,
            FormField::Priority => &self.priority,
            FormField::Submit => "",
        }
    }

    /// Validate the typed values into `(name, type, quantity, priority)`.
    pub fn parse(&self) -> std::result::Result<(String, String, u32, i64), String> {
        let name = self.name.trim();
        let kind = self.kind.trim();
        if name.is_empty() {
            return Err("name must not be empty".into());
        }
        if kind.is_empty() {
            return Err("type must not be empty".into());
        }
        let quantity = self
            .quantity
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("quantity '{}' is not a non-negative number", self.quantity.trim()))?;
        let priority = self
            .priority
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("priority '{}' is not a number", self.priority.trim()))?;
        Ok((name.to_string(), kind.to_string(), quantity, priority))
    }
}

/// Dialog currently shown on top of the item table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    AddItem(ItemForm),
    RemoveInput { name: String },
    SortMenu { selected: usize },
    SearchInput { query: String },
    Info { message: String },
    Help { scroll: u16 },
}

pub struct AppState {
    pub inventory: Inventory,
    pub selected_index: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    pub theme: Theme,
    pub keymap: Keymap,
    pub modal: Option<ModalState>,
    pub show_keybinds: bool,
    /// Key used by the last sort, shown in the header.
    pub last_sort: Option<SortKey>,
    /// Comparisons of the last sort or search, shown in the status bar.
    pub last_comparisons: Option<usize>,
    pub status: String,
}

impl AppState {
    pub fn new(theme: Theme, keymap: Keymap) -> Self {
        Self {
            inventory: Inventory::new(),
            selected_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            theme,
            keymap,
            modal: None,
            show_keybinds: false,
            last_sort: None,
            last_comparisons: None,
            status: String::from("backpack is empty; press 'a' to add an item"),
        }
    }

    /// Build the state from the config directory, creating default theme and
    /// keybinding files there when they are missing.
    pub fn from_config_dir(dir: &Path, theme_override: Option<ThemeName>) -> Self {
        let theme = match theme_override {
            Some(name) => Theme::named(name),
            None => Theme::load_or_init(config_path(dir, THEME_FILE)),
        };
        let keymap = Keymap::load_or_init(config_path(dir, KEYBINDS_FILE));
        Self::new(theme, keymap)
    }

    pub fn open_modal(&mut self, modal: ModalState) {
        self.modal = Some(modal);
        self.input_mode = InputMode::Modal;
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }

    /// Report a message in an Info dialog and in the status bar.
    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.status = message.clone();
        self.open_modal(ModalState::Info { message });
    }

    /// Keep the selection inside the item list after it shrinks.
    pub fn clamp_selection(&mut self) {
        self.selected_index = self.selected_index.min(self.inventory.len().saturating_sub(1));
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Theme::default(), Keymap::default())
    }
}

pub fn config_path(dir: &Path, file: &str) -> PathBuf {
    dir.join(file)
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_parse_overrides_known_keys_only() {
        let t = Theme::parse("# c\ntitle = #112233\nbogus = #000000\nborder=reset\ntext = nope\n");
        assert_eq!(t.title, Color::Rgb(0x11, 0x22, 0x33));
        assert_eq!(t.border, Color::Reset);
        assert_eq!(t.text, Theme::mocha().text);
    }

    #[test]
    fn theme_config_round_trips() {
        for t in [Theme::mocha(), Theme::dark()] {
            assert_eq!(Theme::parse(&t.to_config()), t);
        }
    }

    #[test]
    fn named_and_indexed_colors_keep_their_identity() {
        for c in [Color::Cyan, Color::DarkGray, Color::Gray, Color::Black, Color::Indexed(42), Color::Reset] {
            assert_eq!(parse_color(&color_to_str(c)), Some(c));
        }
        assert_eq!(color_to_str(Color::DarkGray), "darkgray");
        assert_eq!(parse_color(" Cyan "), Some(Color::Cyan));
        assert_eq!(parse_color("index:x"), None);
    }

    #[test]
    fn form_parse_trims_and_validates() {
        let mut form = ItemForm {
            name: "  Medkit ".into(),
            kind: "Heal".into(),
            quantity: "2".into(),
            priority: "6".into(),
            ..Default::default()
        };
        assert_eq!(form.parse(), Ok(("Medkit".into(), "Heal".into(), 2, 6)));

        form.quantity = "-1".into();
        assert!(form.parse().unwrap_err().contains("quantity"));
        form.quantity = "1".into();
        form.name = "   ".into();
        assert!(form.parse().unwrap_err().contains("name"));
    }

    #[test]
    fn form_field_cursor_saturates_at_submit() {
        let mut form = ItemForm::default();
        form.selected = 99;
        assert_eq!(form.field(), FormField::Submit);
        assert!(form.value_mut().is_none());
    }
}
