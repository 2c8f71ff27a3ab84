//! Item screen rendering and item dialogs.
//!
//! Contains the item table, the details panel, the add-item form and the
//! remove/search/sort dialogs.
//!
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};

use crate::app::{AppState, FormField, ItemForm};
use crate::sort::SortKey;
use crate::ui::components::centered_rect;

/// Render the item table and keep pagination in sync with the area height.
pub fn render_items_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let items = app.inventory.list();
    let start = (app.selected_index / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(items.len());
    let slice = items.get(start..end).unwrap_or_default();

    let rows = slice.iter().enumerate().map(|(i, it)| {
        let style = if start + i == app.selected_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(it.id.to_string()),
            Cell::from(it.name.clone()),
            Cell::from(it.kind.clone()),
            Cell::from(it.quantity.to_string()),
            Cell::from(it.priority.to_string()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(4),
        Constraint::Percentage(40),
        Constraint::Percentage(30),
        Constraint::Length(6),
        Constraint::Length(8),
    ];
    let header = Row::new(vec!["ID", "NAME", "TYPE", "QTY", "PRIORITY"]).style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title("Items")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);
    f.render_widget(table, area);
}

pub fn render_item_details(f: &mut Frame, area: Rect, app: &AppState) {
    let text = match app.inventory.get(app.selected_index) {
        Some(it) => format!(
            "Id: {}\nName: {}\nType: {}\nQuantity: {}\nPriority: {}",
            it.id, it.name, it.kind, it.quantity, it.priority
        ),
        None => "No items yet.".to_string(),
    };
    let p = Paragraph::new(text).style(Style::default().fg(app.theme.text)).block(
        Block::default()
            .title("Details")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}

pub fn render_add_form(f: &mut Frame, area: Rect, app: &AppState, form: &ItemForm) {
    let rect = centered_rect(56, 11, area);
    let mut lines = Vec::with_capacity(FormField::ORDER.len() + 2);
    for (idx, field) in FormField::ORDER.iter().enumerate() {
        let marker = if idx == form.selected { "▶" } else { " " };
        if *field == FormField::Submit {
            lines.push(format!("{marker} [{}]", field.label()));
        } else {
            lines.push(format!("{marker} {:<15} {}", format!("{}:", field.label()), form.value(*field)));
        }
    }
    if let Some(err) = &form.error {
        lines.push(String::new());
        lines.push(format!("! {err}"));
    }
    let p = Paragraph::new(lines.join("\n")).block(
        Block::default()
            .title("New item (Enter: next, Esc: cancel)")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Single-line text prompt used by the remove and search dialogs.
pub fn render_text_prompt(f: &mut Frame, area: Rect, app: &AppState, title: &str, label: &str, value: &str) {
    let rect = centered_rect(50, 6, area);
    let p = Paragraph::new(format!("{label}\n{value}_")).block(
        Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_sort_menu(f: &mut Frame, area: Rect, app: &AppState, selected: usize) {
    let rect = centered_rect(40, 7, area);
    let mut text = String::new();
    for (idx, key) in SortKey::ALL.iter().enumerate() {
        let marker = if idx == selected { "▶" } else { " " };
        let note = match key {
            SortKey::Priority => " (highest first)",
            _ => "",
        };
        text.push_str(&format!("{marker} {}. {key}{note}\n", idx + 1));
    }
    let p = Paragraph::new(text).block(
        Block::default()
            .title("Sort by")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
