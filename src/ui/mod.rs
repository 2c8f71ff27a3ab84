//! Rendering entry point.
//!
//! Lays out the header, the item table with its details panel (or the
//! keybindings pane), the status bar, and any open dialog on top.
pub mod components;
pub mod items;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, ModalState};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(root[1]);

    render_header(f, root[0], app);

    items::render_items_table(f, body[0], app);
    if app.show_keybinds {
        components::render_keybinds_panel(f, body[1], app);
    } else {
        items::render_item_details(f, body[1], app);
    }

    components::render_status_bar(f, root[2], app);

    if app.modal.is_some() {
        render_modal(f, f.area(), app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let order = if app.inventory.is_sorted_by_name() {
        "sorted by name (search ready)".to_string()
    } else if let Some(key) = app.last_sort {
        format!("sorted by {key} (sort by name to search)")
    } else {
        "unsorted".to_string()
    };
    let p = Paragraph::new(format!(
        "items: {}/{}  {order}  a: add  d: remove  s: sort  /: search  ?: help  q: quit",
        app.inventory.len(),
        app.inventory.capacity(),
    ))
    .block(
        Block::default()
            .title("backpack")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, area);
}

fn render_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(state) = app.modal.as_ref() else { return };
    match state {
        ModalState::AddItem(form) => items::render_add_form(f, area, app, form),
        ModalState::RemoveInput { name } => {
            items::render_text_prompt(f, area, app, "Remove item", "Name of the item to remove:", name)
        }
        ModalState::SearchInput { query } => {
            items::render_text_prompt(f, area, app, "Binary search", "Exact name to find:", query)
        }
        ModalState::SortMenu { selected } => items::render_sort_menu(f, area, app, *selected),
        ModalState::Info { message } => components::render_info_modal(f, area, app, message),
        ModalState::Help { scroll } => components::render_help_modal(f, area, app, *scroll),
    }
}
