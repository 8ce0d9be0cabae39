use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::tui::app::{note_label, App, NotesFocus};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::week;

pub fn render_notes_view(f: &mut Frame, area: Rect, app: &App) {
    let [blocks_area, items_area] =
        Layout::horizontal([Constraint::Percentage(30), Constraint::Percentage(70)]).areas(area);
    render_block_list(f, blocks_area, app);
    render_items(f, items_area, app);
}

fn focus_style(app: &App, focused: bool) -> Style {
    let active_theme = app.config.get_active_theme();
    if focused {
        Style::default().fg(parse_color(&active_theme.accent))
    } else {
        Style::default().fg(parse_color(&active_theme.fg))
    }
}

fn render_block_list(f: &mut Frame, area: Rect, app: &App) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);

    let blocks = app.planner.blocks();
    let items: Vec<ListItem> = blocks
        .iter()
        .map(|block| ListItem::new(format!("{} ({})", block.title, block.items.len())))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(app, app.notes.focus == NotesFocus::Blocks))
        .title(format!("Blocks ({})", blocks.len()));

    if blocks.is_empty() {
        let hint = format!(
            "No blocks yet. Press {} to create one.",
            crate::utils::format_key_binding_for_display(&app.config.key_bindings.new_block)
        );
        let paragraph = Paragraph::new(hint)
            .block(block)
            .style(Style::default().fg(fg_color).bg(bg_color))
            .wrap(ratatui::widgets::Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .style(Style::default().fg(fg_color).bg(bg_color))
        .highlight_style(
            Style::default()
                .fg(get_contrast_text_color(highlight_bg))
                .bg(highlight_bg),
        );
    let mut state = ListState::default();
    state.select(Some(app.notes.selected_block));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_items(f: &mut Frame, area: Rect, app: &App) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let accent = parse_color(&active_theme.accent);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let focused = app.notes.focus == NotesFocus::Items;

    let title = app
        .selected_block()
        .map(|b| b.title.clone())
        .unwrap_or_else(|| "Notes".to_string());
    let notes = app.selected_items();

    let items: Vec<ListItem> = notes
        .iter()
        .map(|note| {
            let mut lines = vec![Line::from(vec![
                Span::styled(note_label(note), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("  {}", week::format_timestamp(note.ts, app.locale)),
                    Style::default().fg(accent),
                ),
            ])];
            // Preview the body when the title is shown separately
            if !note.title.trim().is_empty() {
                if let Some(first) = note.text.lines().next() {
                    lines.push(Line::from(format!("  {}", first)));
                }
            }
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(app, focused))
                .title(format!("{} ({})", title, notes.len())),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .highlight_style(
            Style::default()
                .fg(get_contrast_text_color(highlight_bg))
                .bg(highlight_bg),
        );

    let mut state = ListState::default();
    if focused && !notes.is_empty() {
        state.select(Some(app.notes.selected_item));
    }
    f.render_stateful_widget(list, area, &mut state);
}
