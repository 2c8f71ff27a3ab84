use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::Backend;
use tracing::{debug, info};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, ItemForm, ModalState};
use crate::sort::SortKey;
use crate::ui;

/// Whether the event loop should keep going after a key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: AppState) -> Result<()> {
    info!("event loop started");
    loop {
        terminal.draw(|f| ui::render(f, &mut app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && handle_key(&mut app, key) == Flow::Quit
        {
            break;
        }
    }
    info!(items = app.inventory.len(), "event loop finished");
    Ok(())
}

/// Apply one key press to the state.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Flow {
    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::Modal => {
            handle_modal_key(app, key);
            Flow::Continue
        }
    }
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) -> Flow {
    let Some(action) = app.keymap.resolve(&key) else {
        return Flow::Continue;
    };
    debug!(action = action.name(), "key action");
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::AddItem => {
            if app.inventory.is_full() {
                app.info(crate::error::InventoryError::Full.to_string());
            } else {
                app.open_modal(ModalState::AddItem(ItemForm::default()));
            }
        }
        KeyAction::RemoveItem => {
            let name = app
                .inventory
                .get(app.selected_index)
                .map(|it| it.name.clone())
                .unwrap_or_default();
            app.open_modal(ModalState::RemoveInput { name });
        }
        KeyAction::OpenSortMenu => app.open_modal(ModalState::SortMenu { selected: 0 }),
        KeyAction::StartSearch => app.open_modal(ModalState::SearchInput { query: String::new() }),
        KeyAction::OpenHelp => app.open_modal(ModalState::Help { scroll: 0 }),
        KeyAction::ToggleKeybindsPane => app.show_keybinds = !app.show_keybinds,
        KeyAction::MoveUp => app.selected_index = app.selected_index.saturating_sub(1),
        KeyAction::MoveDown => {
            if app.selected_index + 1 < app.inventory.len() {
                app.selected_index += 1;
            }
        }
        KeyAction::PageUp => app.selected_index = app.selected_index.saturating_sub(app.rows_per_page),
        KeyAction::PageDown => {
            app.selected_index += app.rows_per_page;
            app.clamp_selection();
        }
        KeyAction::Ignore => {}
    }
    Flow::Continue
}

fn handle_modal_key(app: &mut AppState, key: KeyEvent) {
    let Some(modal) = app.modal.take() else {
        app.input_mode = InputMode::Normal;
        return;
    };
    if key.code == KeyCode::Esc {
        app.close_modal();
        return;
    }
    match modal {
        ModalState::AddItem(form) => handle_form_key(app, form, key.code),
        ModalState::RemoveInput { name } => match edit_text(name, key.code) {
            Edit::Typing(name) => app.modal = Some(ModalState::RemoveInput { name }),
            Edit::Submit(name) => remove_item(app, name.trim()),
        },
        ModalState::SearchInput { query } => match edit_text(query, key.code) {
            Edit::Typing(query) => app.modal = Some(ModalState::SearchInput { query }),
            Edit::Submit(query) => search_item(app, query.trim()),
        },
        ModalState::SortMenu { selected } => match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                app.modal = Some(ModalState::SortMenu { selected: selected.saturating_sub(1) });
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let selected = (selected + 1).min(SortKey::ALL.len() - 1);
                app.modal = Some(ModalState::SortMenu { selected });
            }
            KeyCode::Enter => sort_items(app, selected as u8 + 1),
            KeyCode::Char(c @ '0'..='9') => sort_items(app, c as u8 - b'0'),
            _ => app.modal = Some(ModalState::SortMenu { selected }),
        },
        ModalState::Help { scroll } => match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.modal = Some(ModalState::Help { scroll: scroll.saturating_sub(1) }),
            KeyCode::Down | KeyCode::Char('j') => app.modal = Some(ModalState::Help { scroll: scroll.saturating_add(1) }),
            _ => app.close_modal(),
        },
        ModalState::Info { .. } => app.close_modal(),
    }
}

enum Edit {
    Typing(String),
    Submit(String),
}

fn edit_text(mut value: String, code: KeyCode) -> Edit {
    match code {
        KeyCode::Enter => return Edit::Submit(value),
        KeyCode::Backspace => {
            value.pop();
        }
        KeyCode::Char(c) => value.push(c),
        _ => {}
    }
    Edit::Typing(value)
}

fn handle_form_key(app: &mut AppState, mut form: ItemForm, code: KeyCode) {
    let last = crate::app::FormField::ORDER.len() - 1;
    match code {
        KeyCode::Up | KeyCode::BackTab => form.selected = form.selected.saturating_sub(1),
        KeyCode::Down | KeyCode::Tab => form.selected = (form.selected + 1).min(last),
        KeyCode::Enter if form.selected < last => form.selected += 1,
        KeyCode::Enter => match form.parse() {
            Ok((name, kind, quantity, priority)) => {
                insert_item(app, name, kind, quantity, priority);
                return;
            }
            Err(msg) => {
                debug!(error = %msg, "add form rejected");
                form.error = Some(msg);
            }
        },
        KeyCode::Backspace => {
            if let Some(v) = form.value_mut() {
                v.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(v) = form.value_mut() {
                v.push(c);
            }
        }
        _ => {}
    }
    app.modal = Some(ModalState::AddItem(form));
}

fn insert_item(app: &mut AppState, name: String, kind: String, quantity: u32, priority: i64) {
    app.close_modal();
    match app.inventory.insert(name.clone(), kind, quantity, priority) {
        Ok(id) => {
            // The list order is no longer the result of the last sort.
            app.last_sort = None;
            app.selected_index = app.inventory.len() - 1;
            app.status = format!("added '{name}' (id {id})");
        }
        Err(e) => app.info(e.to_string()),
    }
}

fn remove_item(app: &mut AppState, name: &str) {
    app.close_modal();
    match app.inventory.remove(name) {
        Ok(item) => {
            app.last_sort = None;
            app.clamp_selection();
            app.status = format!("removed '{}' (id {})", item.name, item.id);
        }
        Err(e) => app.info(e.to_string()),
    }
}

fn sort_items(app: &mut AppState, choice: u8) {
    app.close_modal();
    match SortKey::try_from(choice) {
        Ok(key) => {
            let comparisons = app.inventory.sort(key);
            app.last_sort = Some(key);
            app.last_comparisons = Some(comparisons);
            app.selected_index = 0;
            app.status = format!("sorted by {key}: {comparisons} comparisons");
        }
        Err(e) => app.info(e.to_string()),
    }
}

fn search_item(app: &mut AppState, target: &str) {
    app.close_modal();
    match app.inventory.search_index_by_name(target) {
        Ok((index, comparisons)) => {
            app.last_comparisons = Some(comparisons);
            app.selected_index = index;
            let item = &app.inventory.list()[index];
            let message = format!(
                "Found '{}'\nType: {}\nQuantity: {}\nPriority: {}\n\n{} comparisons",
                item.name, item.kind, item.quantity, item.priority, comparisons
            );
            app.info(message);
        }
        Err(e @ crate::error::InventoryError::NotFound(_)) => {
            app.last_comparisons = Some(app.inventory.comparisons());
            app.info(format!("{e} ({} comparisons)", app.inventory.comparisons()));
        }
        Err(e) => app.info(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(app: &mut AppState, code: KeyCode) -> Flow {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut AppState, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn add(app: &mut AppState, name: &str, kind: &str, qty: &str, prio: &str) {
        press(app, KeyCode::Char('a'));
        for value in [name, kind, qty, prio] {
            type_str(app, value);
            press(app, KeyCode::Enter);
        }
        press(app, KeyCode::Enter);
    }

    #[test]
    fn add_form_inserts_item() {
        let mut app = AppState::default();
        add(&mut app, "Medkit", "Heal", "2", "6");
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.inventory.len(), 1);
        assert_eq!(app.inventory.list()[0].priority, 5);
    }

    #[test]
    fn add_form_keeps_invalid_input_open() {
        let mut app = AppState::default();
        add(&mut app, "Rope", "Tool", "many", "1");
        assert!(app.inventory.is_empty());
        match &app.modal {
            Some(ModalState::AddItem(form)) => assert!(form.error.as_deref().unwrap_or("").contains("quantity")),
            other => panic!("expected add form, got {other:?}"),
        }
        press(&mut app, KeyCode::Esc);
        assert!(app.modal.is_none());
    }

    #[test]
    fn search_before_sort_reports_precondition() {
        let mut app = AppState::default();
        add(&mut app, "Axe", "Weapon", "1", "1");
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "Axe");
        press(&mut app, KeyCode::Enter);
        match &app.modal {
            Some(ModalState::Info { message }) => assert!(message.contains("not sorted")),
            other => panic!("expected info, got {other:?}"),
        }
    }

    #[test]
    fn sort_menu_then_search_selects_hit() {
        let mut app = AppState::default();
        add(&mut app, "Rope", "Tool", "1", "2");
        add(&mut app, "Axe", "Weapon", "1", "1");
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.last_sort, Some(SortKey::Name));
        assert!(app.inventory.is_sorted_by_name());

        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "Rope");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.selected_index, 1);
        assert!(matches!(&app.modal, Some(ModalState::Info { message }) if message.contains("Found 'Rope'")));
    }

    #[test]
    fn search_selects_the_row_it_found_among_duplicates() {
        let mut app = AppState::default();
        for name in ["Rope", "Axe", "Rope", "Map"] {
            add(&mut app, name, "Tool", "1", "2");
        }
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "Rope");
        press(&mut app, KeyCode::Enter);

        let (index, _) = app.inventory.search_index_by_name("Rope").unwrap();
        assert_eq!(app.selected_index, index);
        assert_eq!(app.inventory.list()[app.selected_index].name, "Rope");
    }

    #[test]
    fn add_and_remove_forget_the_last_sort() {
        let mut app = AppState::default();
        add(&mut app, "Rope", "Tool", "1", "2");
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.last_sort, Some(SortKey::Name));

        add(&mut app, "Axe", "Weapon", "1", "1");
        assert_eq!(app.last_sort, None);
        assert!(!app.inventory.is_sorted_by_name());

        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.last_sort, Some(SortKey::Type));
        press(&mut app, KeyCode::Delete);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.inventory.len(), 1);
        assert_eq!(app.last_sort, None);

        // A failed removal leaves it alone.
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Delete);
        type_str(&mut app, "zz");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.last_sort, Some(SortKey::Name));
    }

    #[test]
    fn sort_menu_rejects_unknown_digit() {
        let mut app = AppState::default();
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Char('7'));
        assert!(matches!(&app.modal, Some(ModalState::Info { message }) if message.contains("invalid sort criterion")));
    }

    #[test]
    fn remove_prefills_selected_name() {
        let mut app = AppState::default();
        add(&mut app, "Axe", "Weapon", "1", "1");
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.modal, Some(ModalState::RemoveInput { name: "Axe".into() }));
        press(&mut app, KeyCode::Enter);
        assert!(app.inventory.is_empty());
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn quit_key_stops_loop() {
        let mut app = AppState::default();
        assert_eq!(press(&mut app, KeyCode::Char('x')), Flow::Continue);
        assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Quit);
    }
}
