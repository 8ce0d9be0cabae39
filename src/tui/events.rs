use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, size as terminal_size};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;

use crate::config::KeyBindings;
use crate::tui::app::{App, Mode, NoteField, NotesFocus, Tab, TaskField};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::tui::widgets::editor::Editor;
use crate::utils::{parse_key_binding, ParsedKeyBinding};

/// Guard that ensures terminal state is restored even on panic.
/// If the terminal is left in raw mode or on the alternate screen the
/// user's shell is unusable.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Restore terminal state on normal exit. Drop does nothing afterwards.
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Already on a cleanup path, errors are ignored
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

/// Key bindings from the config, parsed once at startup
pub struct KeyMap {
    pub quit: ParsedKeyBinding,
    pub new: ParsedKeyBinding,
    pub edit: ParsedKeyBinding,
    pub save: ParsedKeyBinding,
    pub delete: ParsedKeyBinding,
    pub search: ParsedKeyBinding,
    pub toggle_complete: ParsedKeyBinding,
    pub prev_week: ParsedKeyBinding,
    pub next_week: ParsedKeyBinding,
    pub today: ParsedKeyBinding,
    pub jump_to_date: ParsedKeyBinding,
    pub new_block: ParsedKeyBinding,
    pub rename_block: ParsedKeyBinding,
    pub help: ParsedKeyBinding,
    pub tab_1: ParsedKeyBinding,
    pub tab_2: ParsedKeyBinding,
}

impl KeyMap {
    pub fn from_config(bindings: &KeyBindings) -> Result<Self, TuiError> {
        let parse = |name: &str, value: &str| {
            parse_key_binding(value).map_err(|e| TuiError::KeyBindingError(format!("{}: {}", name, e)))
        };
        Ok(Self {
            quit: parse("quit", &bindings.quit)?,
            new: parse("new", &bindings.new)?,
            edit: parse("edit", &bindings.edit)?,
            save: parse("save", &bindings.save)?,
            delete: parse("delete", &bindings.delete)?,
            search: parse("search", &bindings.search)?,
            toggle_complete: parse("toggle_complete", &bindings.toggle_complete)?,
            prev_week: parse("prev_week", &bindings.prev_week)?,
            next_week: parse("next_week", &bindings.next_week)?,
            today: parse("today", &bindings.today)?,
            jump_to_date: parse("jump_to_date", &bindings.jump_to_date)?,
            new_block: parse("new_block", &bindings.new_block)?,
            rename_block: parse("rename_block", &bindings.rename_block)?,
            help: parse("help", &bindings.help)?,
            tab_1: parse("tab_1", &bindings.tab_1)?,
            tab_2: parse("tab_2", &bindings.tab_2)?,
        })
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Check size before entering the alternate screen so the error is readable
    let (width, height) = terminal_size()?;
    let min_width_with_border = Layout::MIN_WIDTH + 2;
    let min_height_with_border = Layout::MIN_HEIGHT + 2;
    if width < min_width_with_border || height < min_height_with_border {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width_with_border, min_height_with_border
        )));
    }

    let keys = KeyMap::from_config(&app.config.key_bindings)?;

    let mut guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    tracing::info!("tui started");

    loop {
        app.check_status_message_timeout();

        terminal.draw(|f| {
            let layout = Layout::calculate(f.area());
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        // Only process Press events to avoid duplicate processing on Windows
        if event::poll(std::time::Duration::from_millis(16))? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press && handle_key_event(&mut app, &keys, key_event)? {
                    break;
                }
            }
        }
    }

    guard.restore()?;
    tracing::info!("tui stopped");
    Ok(())
}

/// Returns `Ok(true)` when the app should quit
fn handle_key_event(app: &mut App, keys: &KeyMap, key_event: KeyEvent) -> Result<bool, TuiError> {
    if key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    if app.modals.pending_delete.is_some() {
        handle_delete_confirmation_modal(app, key_event);
        return Ok(false);
    }

    match app.ui.mode {
        Mode::Help => handle_help_mode(app, keys, key_event),
        Mode::Search => handle_search_mode(app, key_event),
        Mode::JumpToDate => handle_jump_mode(app, key_event),
        Mode::TaskForm => handle_task_form(app, keys, key_event),
        Mode::BlockTitle => handle_block_prompt(app, key_event),
        Mode::NoteEditor => handle_note_editor(app, keys, key_event),
        Mode::View => return handle_global_key_bindings(app, keys, key_event),
    }
    Ok(false)
}

fn handle_delete_confirmation_modal(app: &mut App, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
            app.modals.delete_modal_selection = 1 - app.modals.delete_modal_selection.min(1);
        }
        KeyCode::Enter => app.confirm_delete(),
        KeyCode::Char('y') => {
            app.modals.delete_modal_selection = 0;
            app.confirm_delete();
        }
        KeyCode::Esc | KeyCode::Char('n') => app.cancel_delete(),
        _ => {}
    }
}

fn handle_help_mode(app: &mut App, keys: &KeyMap, key_event: KeyEvent) {
    if key_event.code == KeyCode::Esc || keys.help.matches(key_event) || keys.quit.matches(key_event) {
        app.ui.mode = Mode::View;
    }
}

fn handle_search_mode(app: &mut App, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Esc => app.exit_search_mode(false),
        KeyCode::Enter => app.exit_search_mode(true),
        KeyCode::Backspace => app.remove_from_search(),
        KeyCode::Char(ch) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => app.add_to_search(ch),
        _ => {}
    }
}

fn handle_jump_mode(app: &mut App, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Esc => app.ui.mode = Mode::View,
        KeyCode::Enter => app.apply_jump(),
        _ => {
            handle_editor_key(&mut app.week.jump, key_event, false);
        }
    }
}

fn handle_block_prompt(app: &mut App, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Esc => app.close_block_prompt(),
        KeyCode::Enter => app.save_block_prompt(),
        _ => {
            if let Some(prompt) = app.form.block.as_mut() {
                handle_editor_key(&mut prompt.editor, key_event, false);
            }
        }
    }
}

fn handle_task_form(app: &mut App, keys: &KeyMap, key_event: KeyEvent) {
    if keys.save.matches(key_event) {
        app.save_task_form();
        return;
    }
    let Some(form) = app.form.task.as_mut() else {
        app.ui.mode = Mode::View;
        return;
    };
    let multi_line = form.current_field == TaskField::Notes;

    match key_event.code {
        KeyCode::Esc => app.close_task_form(),
        KeyCode::Tab => form.navigate(true),
        KeyCode::BackTab => form.navigate(false),
        KeyCode::Enter if !multi_line => form.navigate(true),
        KeyCode::Down if !multi_line => form.navigate(true),
        KeyCode::Up if !multi_line => form.navigate(false),
        _ if form.current_field == TaskField::Priority => match key_event.code {
            KeyCode::Left => form.priority = form.priority.cycle_down(),
            KeyCode::Right | KeyCode::Char(' ') => form.priority = form.priority.cycle_up(),
            KeyCode::Char('1') => form.priority = crate::models::Priority::Low,
            KeyCode::Char('2') => form.priority = crate::models::Priority::Medium,
            KeyCode::Char('3') => form.priority = crate::models::Priority::High,
            _ => {}
        },
        _ => {
            if let Some(editor) = form.current_editor() {
                handle_editor_key(editor, key_event, multi_line);
            }
        }
    }
}

fn handle_note_editor(app: &mut App, keys: &KeyMap, key_event: KeyEvent) {
    if keys.save.matches(key_event) {
        app.save_note_editor();
        return;
    }
    let Some(note) = app.form.note.as_mut() else {
        app.ui.mode = Mode::View;
        return;
    };

    match key_event.code {
        KeyCode::Esc => app.close_note_editor(),
        KeyCode::Tab | KeyCode::BackTab => note.toggle_field(),
        KeyCode::Enter if note.current_field == NoteField::Title => note.toggle_field(),
        KeyCode::Enter => app.note_editor_insert_char('\n'),
        KeyCode::Backspace => app.note_editor_delete(false),
        KeyCode::Delete => app.note_editor_delete(true),
        KeyCode::Char(ch) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            app.note_editor_insert_char(ch)
        }
        _ => {
            handle_editor_key(note.current_editor(), key_event, true);
        }
    }
}

fn handle_global_key_bindings(app: &mut App, keys: &KeyMap, key_event: KeyEvent) -> Result<bool, TuiError> {
    if keys.quit.matches(key_event) {
        return Ok(true);
    }
    if keys.help.matches(key_event) {
        app.ui.mode = Mode::Help;
        return Ok(false);
    }
    if keys.tab_1.matches(key_event) {
        app.switch_tab(Tab::Week);
        return Ok(false);
    }
    if keys.tab_2.matches(key_event) {
        app.switch_tab(Tab::Notes);
        return Ok(false);
    }
    if keys.delete.matches(key_event) {
        app.request_delete();
        return Ok(false);
    }

    match app.ui.current_tab {
        Tab::Week => handle_week_keys(app, keys, key_event),
        Tab::Notes => handle_notes_keys(app, keys, key_event),
    }
    Ok(false)
}

fn handle_week_keys(app: &mut App, keys: &KeyMap, key_event: KeyEvent) {
    if keys.prev_week.matches(key_event) {
        app.shift_week(-1);
    } else if keys.next_week.matches(key_event) {
        app.shift_week(1);
    } else if keys.today.matches(key_event) {
        app.go_to_today();
    } else if keys.jump_to_date.matches(key_event) {
        app.enter_jump_mode();
    } else if keys.search.matches(key_event) {
        app.enter_search_mode();
    } else if keys.new.matches(key_event) {
        app.open_new_task_form();
    } else if keys.edit.matches(key_event) || key_event.code == KeyCode::Enter {
        app.open_edit_task_form();
    } else if keys.toggle_complete.matches(key_event) {
        app.toggle_selected_task();
    } else {
        match key_event.code {
            KeyCode::Left => app.move_day(-1),
            KeyCode::Right => app.move_day(1),
            KeyCode::Up => app.move_task_selection(-1),
            KeyCode::Down => app.move_task_selection(1),
            _ => {}
        }
    }
}

fn handle_notes_keys(app: &mut App, keys: &KeyMap, key_event: KeyEvent) {
    if keys.new_block.matches(key_event) {
        app.open_new_block_prompt();
    } else if keys.rename_block.matches(key_event) {
        app.open_rename_block_prompt();
    } else if keys.new.matches(key_event) {
        app.open_new_note();
    } else if keys.edit.matches(key_event) || key_event.code == KeyCode::Enter {
        match app.notes.focus {
            NotesFocus::Blocks => app.toggle_notes_focus(),
            NotesFocus::Items => app.open_selected_note(),
        }
    } else {
        match (key_event.code, app.notes.focus) {
            (KeyCode::Tab | KeyCode::Left | KeyCode::Right, _) => app.toggle_notes_focus(),
            (KeyCode::Esc, NotesFocus::Items) => app.toggle_notes_focus(),
            (KeyCode::Up, NotesFocus::Blocks) => app.move_block_selection(-1),
            (KeyCode::Down, NotesFocus::Blocks) => app.move_block_selection(1),
            (KeyCode::Up, NotesFocus::Items) => app.move_item_selection(-1),
            (KeyCode::Down, NotesFocus::Items) => app.move_item_selection(1),
            _ => {}
        }
    }
}

/// Cursor movement and plain editing shared by every text field.
/// Returns false when the key was not an editing key.
fn handle_editor_key(editor: &mut Editor, key_event: KeyEvent, multi_line: bool) -> bool {
    match key_event.code {
        KeyCode::Left => editor.move_cursor_left(),
        KeyCode::Right => editor.move_cursor_right(),
        KeyCode::Up if multi_line => editor.move_cursor_up(),
        KeyCode::Down if multi_line => editor.move_cursor_down(),
        KeyCode::Home => editor.move_cursor_home(),
        KeyCode::End => editor.move_cursor_end(),
        KeyCode::Backspace => editor.delete_char(),
        KeyCode::Delete => editor.delete_forward(),
        KeyCode::Enter if multi_line => editor.insert_newline(),
        KeyCode::Char(ch) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => editor.insert_char(ch),
        _ => return false,
    }
    true
}
