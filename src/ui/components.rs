//! Shared UI components (status bar, keybindings pane, generic dialogs).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode};

/// Render the bottom status bar with mode, sort state and the last message.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Modal => "DIALOG",
    };
    let comparisons = app
        .last_comparisons
        .map(|c| format!("  comparisons:{c}"))
        .unwrap_or_default();
    let msg = format!(
        "mode: {mode}  items:{}/{}  sorted_by_name:{}{comparisons}  | {}",
        app.inventory.len(),
        app.inventory.capacity(),
        app.inventory.is_sorted_by_name(),
        app.status,
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Render the keybindings pane from the active keymap.
pub fn render_keybinds_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .title("Keybindings")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);

    let label_w = KeyAction::ALL
        .iter()
        .map(|a| a.description().len())
        .max()
        .unwrap_or(0);
    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        "Actions:",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for action in KeyAction::ALL {
        if action == KeyAction::Ignore {
            continue;
        }
        let keys = app.keymap.keys_for(action);
        if keys.is_empty() {
            continue;
        }
        lines.push(Line::from(vec![
            Span::raw(format!("  {:>label_w$} │ ", action.description())),
            Span::styled(keys.join(", "), Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "In dialogs:",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for (label, value) in [("Cancel", "Esc"), ("Confirm / next field", "Enter"), ("Pick sort key", "1, 2, 3")] {
        lines.push(Line::from(vec![
            Span::raw(format!("  {label:>label_w$} │ ")),
            Span::styled(value, Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(block, area);
    f.render_widget(p, inner);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render a generic informational dialog; any key closes it.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, message: &str) {
    let width = 50u16.min(area.width.saturating_sub(4)).max(30);
    let text_lines = message.lines().count() as u16;
    let wrapped = message.len() as u16 / width.saturating_sub(4).max(10);
    let height = (text_lines + wrapped + 3).min(area.height.saturating_sub(2)).max(5);
    let rect = centered_rect(width, height, area);
    let p = Paragraph::new(message.to_string())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Info")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Render the help dialog; Up/Down scroll, other keys close it.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 72u16.min(area.width.saturating_sub(4)).max(40);
    let height = 20u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let key = |action: KeyAction| app.keymap.keys_for(action).join(" / ");
    let italic = Style::default().add_modifier(Modifier::ITALIC);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("Backpack", bold)),
        Line::raw(""),
        Line::from(vec![Span::raw("Add item: "), Span::styled(key(KeyAction::AddItem), italic)]),
        Line::raw("  Name, type, quantity and priority. Priority is clamped to 1-5."),
        Line::from(vec![Span::raw("Remove item: "), Span::styled(key(KeyAction::RemoveItem), italic)]),
        Line::raw("  Removes the first item with exactly that name."),
        Line::from(vec![Span::raw("Sort: "), Span::styled(key(KeyAction::OpenSortMenu), italic)]),
        Line::raw("  Insertion sort by name, type, or priority (highest first)."),
        Line::from(vec![Span::raw("Search by name: "), Span::styled(key(KeyAction::StartSearch), italic)]),
        Line::raw("  Binary search; only available right after sorting by name."),
        Line::raw("  Adding or removing an item requires sorting again."),
        Line::raw(""),
        Line::from(vec![
            Span::raw("Move: "),
            Span::styled(format!("{} / {}", key(KeyAction::MoveUp), key(KeyAction::MoveDown)), italic),
        ]),
        Line::from(vec![Span::raw("Keybindings pane: "), Span::styled(key(KeyAction::ToggleKeybindsPane), italic)]),
        Line::from(vec![Span::raw("Quit: "), Span::styled(key(KeyAction::Quit), italic)]),
        Line::raw(""),
        Line::from(vec![Span::raw("Close help: "), Span::styled("any other key", italic)]),
    ];

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_clamped_to_area() {
        let area = Rect { x: 0, y: 0, width: 20, height: 10 };
        let r = centered_rect(40, 4, area);
        assert_eq!((r.x, r.y, r.width, r.height), (0, 3, 20, 4));
    }
}
