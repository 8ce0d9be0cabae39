use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::tui::app::{App, Mode, NotesFocus, Tab};
use crate::tui::widgets::{
    color::parse_color,
    confirm_delete::render_confirm_delete,
    help::render_help,
    note_blocks::render_notes_view,
    note_editor::render_note_editor,
    prompt::render_prompt,
    status_bar::render_status_bar,
    tabs::render_tabs,
    task_form::render_task_form,
    week_grid::render_week_view,
};
use crate::tui::Layout;
use crate::utils::format_key_binding_for_display as key;

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    let active_theme = app.config.get_active_theme();
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("Planner")
        .title_alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(parse_color(&active_theme.fg))
                .bg(parse_color(&active_theme.bg)),
        );
    f.render_widget(outer_block, f.area());

    render_tabs(f, layout.tabs_area, app.ui.current_tab, &app.config);

    match app.ui.current_tab {
        Tab::Week => render_week_view(f, layout.main_area, app),
        Tab::Notes => render_notes_view(f, layout.main_area, app),
    }

    // Overlays render after the normal content
    let area = layout.main_area;
    match app.ui.mode {
        Mode::TaskForm => {
            if let Some(form) = app.form.task.as_mut() {
                render_task_form(f, area, form, &app.config);
            }
        }
        Mode::NoteEditor => {
            let words_per_line = app.planner.words_per_line();
            if let Some(note) = app.form.note.as_mut() {
                render_note_editor(f, area, note, words_per_line, &app.config);
            }
        }
        Mode::BlockTitle => {
            if let Some(prompt) = app.form.block.as_mut() {
                let title = if prompt.renaming.is_some() { "Rename block" } else { "New block title (optional)" };
                render_prompt(f, area, title, &mut prompt.editor, &app.config);
            }
        }
        Mode::JumpToDate => {
            render_prompt(f, area, "Jump to date (YYYY-MM-DD)", &mut app.week.jump, &app.config);
        }
        Mode::Help => render_help(f, area, &app.config),
        Mode::View | Mode::Search => {}
    }

    if let Some(ref pending) = app.modals.pending_delete {
        render_confirm_delete(f, area, pending, app.modals.delete_modal_selection, &app.config);
    }

    let hints = key_hints(app);
    render_status_bar(f, layout.status_area, app.status.message.as_deref(), &hints, &app.config);
}

/// Key hints for the status bar, depending on what has focus
pub fn key_hints(app: &App) -> Vec<String> {
    let kb = &app.config.key_bindings;
    if app.modals.pending_delete.is_some() {
        return vec!["Enter: Confirm".into(), "y: Delete".into(), "n/Esc: Cancel".into()];
    }
    match app.ui.mode {
        Mode::Search => vec!["Type to filter".into(), "Enter: Keep".into(), "Esc: Clear".into()],
        Mode::JumpToDate | Mode::BlockTitle => vec!["Enter: Apply".into(), "Esc: Cancel".into()],
        Mode::TaskForm | Mode::NoteEditor => vec![
            format!("{}: Save", key(&kb.save)),
            "Tab: Next field".into(),
            "Esc: Cancel".into(),
        ],
        Mode::Help => vec![format!("{}/Esc: Close help", key(&kb.help))],
        Mode::View => match app.ui.current_tab {
            Tab::Week => vec![
                format!("{}: New", key(&kb.new)),
                format!("{}: Edit", key(&kb.edit)),
                format!("{}: Done", key(&kb.toggle_complete)),
                format!("{}: Delete", key(&kb.delete)),
                format!("{}/{}: Week", key(&kb.prev_week), key(&kb.next_week)),
                format!("{}: Today", key(&kb.today)),
                format!("{}: Search", key(&kb.search)),
                format!("{}: Help", key(&kb.help)),
                format!("{}: Quit", key(&kb.quit)),
            ],
            Tab::Notes => {
                let mut hints = vec![
                    format!("{}: New block", key(&kb.new_block)),
                    format!("{}: Rename", key(&kb.rename_block)),
                    format!("{}: New note", key(&kb.new)),
                ];
                if app.notes.focus == NotesFocus::Items {
                    hints.push(format!("{}: Open", key(&kb.edit)));
                }
                hints.push(format!("{}: Delete", key(&kb.delete)));
                hints.push(format!("{}: Help", key(&kb.help)));
                hints.push(format!("{}: Quit", key(&kb.quit)));
                hints
            }
        },
    }
}
