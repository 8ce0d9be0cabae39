use chrono::{Datelike, NaiveDate};
use std::time::Instant;

use crate::models::{NoteBlock, NoteItem, Priority, Task};
use crate::notes::sorted_items;
use crate::planner::{Action, Outcome, Planner};
use crate::reflow;
use crate::tasks::{self, DayColumn, TaskDraft};
use crate::tui::widgets::editor::Editor;
use crate::week::{self, Locale};
use crate::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Week,
    Notes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Search,
    JumpToDate,
    TaskForm,
    BlockTitle,
    NoteEditor,
    Help,
}

/// Which list has focus on the Notes tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotesFocus {
    Blocks,
    Items,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Title,
    Date,
    Time,
    Priority,
    Notes,
}

impl TaskField {
    const ORDER: [TaskField; 5] = [
        TaskField::Title,
        TaskField::Date,
        TaskField::Time,
        TaskField::Priority,
        TaskField::Notes,
    ];

    fn step(self, forward: bool) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        let len = Self::ORDER.len();
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        Self::ORDER[next]
    }
}

#[derive(Debug, Clone)]
pub struct TaskForm {
    pub current_field: TaskField,
    pub title: Editor,
    pub date: Editor,
    pub time: Editor,
    pub priority: Priority,
    pub notes: Editor,
    pub editing_id: Option<String>, // None for new tasks
}

impl TaskForm {
    pub fn from_draft(draft: &TaskDraft) -> Self {
        Self {
            current_field: TaskField::Title,
            title: Editor::from_string(&draft.title),
            date: Editor::from_string(&draft.date),
            time: Editor::from_string(&draft.time),
            priority: draft.priority,
            notes: Editor::from_string(&draft.notes),
            editing_id: draft.id.clone(),
        }
    }

    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            id: self.editing_id.clone(),
            title: self.title.to_string(),
            date: self.date.to_string(),
            time: self.time.to_string(),
            priority: self.priority,
            notes: self.notes.to_string(),
        }
    }

    /// Editor behind the focused field; the priority field has none
    pub fn current_editor(&mut self) -> Option<&mut Editor> {
        match self.current_field {
            TaskField::Title => Some(&mut self.title),
            TaskField::Date => Some(&mut self.date),
            TaskField::Time => Some(&mut self.time),
            TaskField::Priority => None,
            TaskField::Notes => Some(&mut self.notes),
        }
    }

    pub fn navigate(&mut self, forward: bool) {
        self.current_field = self.current_field.step(forward);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
    Title,
    Text,
}

/// Note being written (no `note_id`) or edited
#[derive(Debug, Clone)]
pub struct NoteEditor {
    pub block_id: String,
    pub note_id: Option<String>,
    pub title: Editor,
    pub text: Editor,
    pub current_field: NoteField,
}

impl NoteEditor {
    pub fn current_editor(&mut self) -> &mut Editor {
        match self.current_field {
            NoteField::Title => &mut self.title,
            NoteField::Text => &mut self.text,
        }
    }

    /// New notes only carry text
    pub fn toggle_field(&mut self) {
        if self.note_id.is_none() {
            return;
        }
        self.current_field = match self.current_field {
            NoteField::Title => NoteField::Text,
            NoteField::Text => NoteField::Title,
        };
    }
}

/// Title prompt for creating (`renaming: None`) or renaming a block
#[derive(Debug, Clone)]
pub struct BlockPrompt {
    pub editor: Editor,
    pub renaming: Option<String>,
}

/// Entity waiting for delete confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingDelete {
    Task { id: String, title: String },
    Block { id: String, title: String },
    Note { block_id: String, note_id: String, title: String },
}

impl PendingDelete {
    pub fn kind(&self) -> &'static str {
        match self {
            PendingDelete::Task { .. } => "task",
            PendingDelete::Block { .. } => "block",
            PendingDelete::Note { .. } => "note",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PendingDelete::Task { title, .. }
            | PendingDelete::Block { title, .. }
            | PendingDelete::Note { title, .. } => title,
        }
    }

    fn into_action(self) -> Action {
        match self {
            PendingDelete::Task { id, .. } => Action::DeleteTask { id },
            PendingDelete::Block { id, .. } => Action::DeleteBlock { id },
            PendingDelete::Note { block_id, note_id, .. } => Action::DeleteNote { block_id, note_id },
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub current_tab: Tab,
    pub mode: Mode,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            current_tab: Tab::Week,
            mode: Mode::View,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeekState {
    /// Any date inside the displayed week
    pub anchor: NaiveDate,
    pub selected_day: usize, // 0 = Monday
    pub selected_task: usize,
    pub search: String,
    pub jump: Editor,
}

impl WeekState {
    fn at(date: NaiveDate) -> Self {
        Self {
            anchor: date,
            selected_day: date.weekday().num_days_from_monday() as usize,
            selected_task: 0,
            search: String::new(),
            jump: Editor::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotesState {
    pub selected_block: usize,
    pub selected_item: usize,
    pub focus: NotesFocus,
}

impl Default for NotesState {
    fn default() -> Self {
        Self {
            selected_block: 0,
            selected_item: 0,
            focus: NotesFocus::Blocks,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub task: Option<TaskForm>,
    pub note: Option<NoteEditor>,
    pub block: Option<BlockPrompt>,
}

#[derive(Debug, Clone)]
pub struct ModalState {
    pub pending_delete: Option<PendingDelete>,
    pub delete_modal_selection: usize, // 0 = Delete, 1 = Cancel
}

impl Default for ModalState {
    fn default() -> Self {
        Self {
            pending_delete: None,
            delete_modal_selection: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

pub struct App {
    pub config: Config,
    pub planner: Planner,
    pub locale: Locale,

    pub ui: UiState,
    pub week: WeekState,
    pub notes: NotesState,
    pub form: FormState,
    pub modals: ModalState,
    pub status: StatusState,
}

impl App {
    pub fn new(config: Config, planner: Planner) -> Self {
        Self::starting_at(config, planner, week::today())
    }

    /// App showing the week of `date` with that day selected
    pub fn starting_at(config: Config, planner: Planner, date: NaiveDate) -> Self {
        let locale = config.locale();
        Self {
            config,
            planner,
            locale,
            ui: UiState::default(),
            week: WeekState::at(date),
            notes: NotesState::default(),
            form: FormState::default(),
            modals: ModalState::default(),
            status: StatusState::default(),
        }
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status.message = Some(message.into());
        self.status.message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
    }

    /// Check if status message should be auto-cleared (after 3 seconds)
    pub fn check_status_message_timeout(&mut self) {
        const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 3;
        if let Some(time) = self.status.message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_TIMEOUT_SECS {
                self.clear_status_message();
            }
        }
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.ui.current_tab = tab;
        self.ui.mode = Mode::View;
    }

    /// Run an action through the planner. Errors land in the status bar.
    fn apply(&mut self, action: Action) -> Option<Outcome> {
        match self.planner.dispatch(action) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::warn!(error = %e, "action failed");
                self.set_status_message(e.to_string());
                None
            }
        }
    }

    // ---- Week tab ----

    pub fn week_range(&self) -> (NaiveDate, NaiveDate) {
        week::week_interval(self.week.anchor)
    }

    pub fn week_label(&self) -> String {
        let (start, end) = self.week_range();
        week::format_week_label(start, end, self.locale)
    }

    pub fn week_task_count(&self) -> usize {
        let (start, end) = self.week_range();
        tasks::count_in_week(self.planner.tasks(), &self.week.search, start, end)
    }

    pub fn columns(&self) -> Vec<DayColumn> {
        tasks::week_columns(self.planner.tasks(), &self.week.search, self.week_range().0)
    }

    pub fn completed(&self) -> Vec<Task> {
        tasks::completed_tasks(self.planner.tasks())
    }

    pub fn selected_date(&self) -> NaiveDate {
        week::add_days(self.week_range().0, self.week.selected_day as i64)
    }

    pub fn selected_task(&self) -> Option<Task> {
        self.columns()
            .into_iter()
            .nth(self.week.selected_day)
            .and_then(|column| column.tasks.into_iter().nth(self.week.selected_task))
    }

    fn selected_column_len(&self) -> usize {
        self.columns()
            .get(self.week.selected_day)
            .map(|c| c.tasks.len())
            .unwrap_or(0)
    }

    fn clamp_task_selection(&mut self) {
        let len = self.selected_column_len();
        self.week.selected_task = self.week.selected_task.min(len.saturating_sub(1));
    }

    pub fn shift_week(&mut self, weeks: i64) {
        self.week.anchor = week::add_days(self.week.anchor, weeks * 7);
        self.clamp_task_selection();
    }

    pub fn go_to_date(&mut self, date: NaiveDate) {
        self.week.anchor = date;
        self.week.selected_day = date.weekday().num_days_from_monday() as usize;
        self.week.selected_task = 0;
    }

    pub fn go_to_today(&mut self) {
        self.go_to_date(week::today());
    }

    /// Move the day cursor, crossing into the adjacent week at the edges
    pub fn move_day(&mut self, delta: i64) {
        let target = week::add_days(self.selected_date(), delta);
        self.week.anchor = target;
        self.week.selected_day = target.weekday().num_days_from_monday() as usize;
        self.clamp_task_selection();
    }

    pub fn move_task_selection(&mut self, delta: i64) {
        let len = self.selected_column_len();
        if len == 0 {
            self.week.selected_task = 0;
            return;
        }
        let next = (self.week.selected_task as i64 + delta).clamp(0, len as i64 - 1);
        self.week.selected_task = next as usize;
    }

    fn select_task(&mut self, task: &Task) {
        if let Ok(date) = week::parse_ymd(&task.date) {
            self.go_to_date(date);
        }
        if let Some(idx) = self
            .columns()
            .get(self.week.selected_day)
            .and_then(|c| c.tasks.iter().position(|t| t.id == task.id))
        {
            self.week.selected_task = idx;
        }
    }

    pub fn enter_search_mode(&mut self) {
        self.ui.mode = Mode::Search;
    }

    pub fn add_to_search(&mut self, ch: char) {
        self.week.search.push(ch);
        self.week.selected_task = 0;
    }

    pub fn remove_from_search(&mut self) {
        self.week.search.pop();
        self.week.selected_task = 0;
    }

    /// Leave search mode, keeping the query or clearing it
    pub fn exit_search_mode(&mut self, keep_query: bool) {
        if !keep_query {
            self.week.search.clear();
        }
        self.ui.mode = Mode::View;
        self.clamp_task_selection();
    }

    pub fn enter_jump_mode(&mut self) {
        self.week.jump = Editor::from_string(&week::to_ymd(self.selected_date()));
        self.ui.mode = Mode::JumpToDate;
    }

    pub fn apply_jump(&mut self) {
        let raw = self.week.jump.to_string();
        match week::parse_ymd(raw.trim()) {
            Ok(date) => {
                self.go_to_date(date);
                self.ui.mode = Mode::View;
            }
            Err(_) => self.set_status_message(format!("Invalid date '{}' (expected YYYY-MM-DD)", raw.trim())),
        }
    }

    pub fn open_new_task_form(&mut self) {
        let draft = TaskDraft::for_date(self.selected_date());
        self.form.task = Some(TaskForm::from_draft(&draft));
        self.ui.mode = Mode::TaskForm;
    }

    pub fn open_edit_task_form(&mut self) {
        match self.selected_task() {
            Some(task) => {
                self.form.task = Some(TaskForm::from_draft(&TaskDraft::from_task(&task)));
                self.ui.mode = Mode::TaskForm;
            }
            None => self.set_status_message("No task selected"),
        }
    }

    pub fn close_task_form(&mut self) {
        self.form.task = None;
        self.ui.mode = Mode::View;
    }

    /// Save the open form. Validation errors keep the form open.
    pub fn save_task_form(&mut self) {
        let Some(draft) = self.form.task.as_ref().map(TaskForm::to_draft) else {
            return;
        };
        let editing = draft.id.is_some();
        if let Some(Outcome::TaskSaved(task)) = self.apply(Action::SaveTask(draft)) {
            self.close_task_form();
            self.select_task(&task);
            self.set_status_message(if editing { "Task updated" } else { "Task created" });
        }
    }

    pub fn toggle_selected_task(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let value = !task.completed;
        if let Some(Outcome::TaskToggled { .. }) =
            self.apply(Action::ToggleComplete { id: task.id, value })
        {
            self.set_status_message(if value { "Task completed" } else { "Task reopened" });
        }
    }

    // ---- Notes tab ----

    pub fn selected_block(&self) -> Option<&NoteBlock> {
        self.planner.blocks().get(self.notes.selected_block)
    }

    /// Items of the selected block, newest first
    pub fn selected_items(&self) -> Vec<&NoteItem> {
        self.selected_block().map(sorted_items).unwrap_or_default()
    }

    pub fn selected_note(&self) -> Option<&NoteItem> {
        self.selected_items().get(self.notes.selected_item).copied()
    }

    pub fn move_block_selection(&mut self, delta: i64) {
        let len = self.planner.blocks().len();
        if len == 0 {
            return;
        }
        let next = (self.notes.selected_block as i64 + delta).clamp(0, len as i64 - 1);
        self.notes.selected_block = next as usize;
        self.notes.selected_item = 0;
    }

    pub fn move_item_selection(&mut self, delta: i64) {
        let len = self.selected_items().len();
        if len == 0 {
            return;
        }
        let next = (self.notes.selected_item as i64 + delta).clamp(0, len as i64 - 1);
        self.notes.selected_item = next as usize;
    }

    pub fn toggle_notes_focus(&mut self) {
        self.notes.focus = match self.notes.focus {
            NotesFocus::Blocks if !self.selected_items().is_empty() => NotesFocus::Items,
            _ => NotesFocus::Blocks,
        };
    }

    fn clamp_notes_selection(&mut self) {
        let blocks = self.planner.blocks().len();
        self.notes.selected_block = self.notes.selected_block.min(blocks.saturating_sub(1));
        let items = self.selected_items().len();
        self.notes.selected_item = self.notes.selected_item.min(items.saturating_sub(1));
        if items == 0 {
            self.notes.focus = NotesFocus::Blocks;
        }
    }

    pub fn open_new_block_prompt(&mut self) {
        self.form.block = Some(BlockPrompt {
            editor: Editor::new(),
            renaming: None,
        });
        self.ui.mode = Mode::BlockTitle;
    }

    pub fn open_rename_block_prompt(&mut self) {
        let Some(block) = self.selected_block() else {
            self.set_status_message("No block selected");
            return;
        };
        self.form.block = Some(BlockPrompt {
            editor: Editor::from_string(&block.title),
            renaming: Some(block.id.clone()),
        });
        self.ui.mode = Mode::BlockTitle;
    }

    pub fn close_block_prompt(&mut self) {
        self.form.block = None;
        self.ui.mode = Mode::View;
    }

    pub fn save_block_prompt(&mut self) {
        let Some(prompt) = self.form.block.take() else {
            return;
        };
        let title = prompt.editor.to_string();
        let action = match prompt.renaming {
            Some(id) => Action::RenameBlock { id, title },
            None => {
                let title = Some(title.trim().to_string()).filter(|t| !t.is_empty());
                Action::CreateBlock { title }
            }
        };
        match self.apply(action) {
            Some(Outcome::BlockCreated(block)) => {
                self.notes.selected_block = self.planner.blocks().len().saturating_sub(1);
                self.notes.selected_item = 0;
                self.notes.focus = NotesFocus::Blocks;
                self.set_status_message(format!("Block '{}' created", block.title));
            }
            Some(Outcome::BlockRenamed { title, .. }) => {
                self.set_status_message(format!("Block renamed to '{}'", title));
            }
            _ => {}
        }
        self.ui.mode = Mode::View;
    }

    pub fn open_new_note(&mut self) {
        let Some(block_id) = self.selected_block().map(|b| b.id.clone()) else {
            self.set_status_message("Create a block first");
            return;
        };
        self.form.note = Some(NoteEditor {
            block_id,
            note_id: None,
            title: Editor::new(),
            text: Editor::new(),
            current_field: NoteField::Text,
        });
        self.ui.mode = Mode::NoteEditor;
    }

    pub fn open_selected_note(&mut self) {
        let Some(block_id) = self.selected_block().map(|b| b.id.clone()) else {
            return;
        };
        let Some(note) = self.selected_note() else {
            self.set_status_message("No note selected");
            return;
        };
        self.form.note = Some(NoteEditor {
            block_id,
            note_id: Some(note.id.clone()),
            title: Editor::from_string(&note.title),
            text: Editor::from_string(&note.text),
            current_field: NoteField::Text,
        });
        self.ui.mode = Mode::NoteEditor;
    }

    pub fn close_note_editor(&mut self) {
        self.form.note = None;
        self.ui.mode = Mode::View;
    }

    /// Type into the note editor. Text is re-wrapped after each word character.
    pub fn note_editor_insert_char(&mut self, ch: char) {
        let words_per_line = self.planner.words_per_line();
        let Some(note) = self.form.note.as_mut() else {
            return;
        };
        let field = note.current_field;
        let editor = note.current_editor();
        editor.insert_char(ch);
        if field == NoteField::Text && !ch.is_whitespace() {
            apply_live_reflow(editor, words_per_line);
        }
    }

    /// Backspace (`forward == false`) or Delete in the note editor. Text is
    /// re-wrapped unless the cursor ends up right after whitespace.
    pub fn note_editor_delete(&mut self, forward: bool) {
        let words_per_line = self.planner.words_per_line();
        let Some(note) = self.form.note.as_mut() else {
            return;
        };
        let field = note.current_field;
        let editor = note.current_editor();
        if forward {
            editor.delete_forward();
        } else {
            editor.delete_char();
        }
        if field != NoteField::Text {
            return;
        }
        let cursor = editor.cursor_offset();
        let after_space = cursor > 0
            && editor
                .to_string()
                .chars()
                .nth(cursor - 1)
                .is_some_and(char::is_whitespace);
        if !after_space {
            apply_live_reflow(editor, words_per_line);
        }
    }

    pub fn save_note_editor(&mut self) {
        let Some(note) = self.form.note.as_ref() else {
            return;
        };
        let block_id = note.block_id.clone();
        let text = note.text.to_string();
        let action = match note.note_id.clone() {
            Some(note_id) => Action::UpdateNote {
                block_id,
                note_id,
                title: note.title.to_string(),
                text,
            },
            None => {
                if text.trim().is_empty() {
                    self.set_status_message("Note is empty");
                    return;
                }
                let text = reflow::reflow(&text, self.planner.words_per_line());
                Action::AddNote { block_id, text }
            }
        };
        match self.apply(action) {
            Some(Outcome::NoteAdded { .. }) => {
                self.close_note_editor();
                self.notes.selected_item = 0;
                self.set_status_message("Note added");
            }
            Some(Outcome::NoteUpdated { .. }) => {
                self.close_note_editor();
                self.notes.selected_item = 0;
                self.set_status_message("Note saved");
            }
            Some(_) => {
                self.close_note_editor();
                self.clamp_notes_selection();
            }
            None => {}
        }
    }

    // ---- Delete confirmation ----

    /// Ask to delete whatever is selected on the current tab
    pub fn request_delete(&mut self) {
        let pending = match self.ui.current_tab {
            Tab::Week => self.selected_task().map(|t| PendingDelete::Task {
                id: t.id,
                title: t.title,
            }),
            Tab::Notes => match self.notes.focus {
                NotesFocus::Blocks => self.selected_block().map(|b| PendingDelete::Block {
                    id: b.id.clone(),
                    title: b.title.clone(),
                }),
                NotesFocus::Items => {
                    let block_id = self.selected_block().map(|b| b.id.clone());
                    block_id.zip(self.selected_note()).map(|(block_id, n)| PendingDelete::Note {
                        block_id,
                        note_id: n.id.clone(),
                        title: note_label(n),
                    })
                }
            },
        };
        match pending {
            Some(pending) => {
                self.modals.pending_delete = Some(pending);
                self.modals.delete_modal_selection = 0;
            }
            None => self.set_status_message("Nothing selected"),
        }
    }

    pub fn cancel_delete(&mut self) {
        self.modals.pending_delete = None;
    }

    pub fn confirm_delete(&mut self) {
        let Some(pending) = self.modals.pending_delete.take() else {
            return;
        };
        if self.modals.delete_modal_selection != 0 {
            return;
        }
        let kind = pending.kind();
        if let Some(outcome) = self.apply(pending.into_action()) {
            if outcome != Outcome::Unchanged {
                self.set_status_message(format!("Deleted {}", kind));
            }
        }
        self.clamp_task_selection();
        self.clamp_notes_selection();
    }
}

/// Display title of a note, falling back to the start of its text
pub fn note_label(note: &NoteItem) -> String {
    if !note.title.trim().is_empty() {
        return note.title.clone();
    }
    let first_line = note.text.lines().next().unwrap_or("");
    let preview: String = first_line.chars().take(40).collect();
    if preview.chars().count() < first_line.chars().count() {
        format!("{}…", preview)
    } else {
        preview
    }
}

/// Re-wrap the editor contents in place, keeping the cursor near the edit
pub fn apply_live_reflow(editor: &mut Editor, words_per_line: usize) {
    let text = editor.to_string();
    if let Some((wrapped, cursor)) = reflow::reflow_live(&text, editor.cursor_offset(), words_per_line) {
        editor.set_text(&wrapped);
        editor.set_cursor_offset(cursor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    fn app() -> App {
        let planner = Planner::load(Database::open_in_memory().unwrap()).with_words_per_line(3);
        let thursday = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        App::starting_at(Config::default(), planner, thursday)
    }

    fn type_text(editor: &mut Editor, text: &str) {
        for ch in text.chars() {
            editor.insert_char(ch);
        }
    }

    #[test]
    fn starts_on_the_given_day() {
        let app = app();
        assert_eq!(app.week.selected_day, 3);
        assert_eq!(
            app.week_range().0,
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
        );
    }

    #[test]
    fn moving_past_sunday_enters_next_week() {
        let mut app = app();
        app.move_day(4);
        assert_eq!(app.selected_date(), NaiveDate::from_ymd_opt(2024, 3, 18).unwrap());
        assert_eq!(app.week.selected_day, 0);
        assert_eq!(app.week_range().0, NaiveDate::from_ymd_opt(2024, 3, 18).unwrap());
    }

    #[test]
    fn empty_title_keeps_form_open() {
        let mut app = app();
        app.open_new_task_form();
        app.save_task_form();
        assert_eq!(app.ui.mode, Mode::TaskForm);
        assert!(app.form.task.is_some());
        assert_eq!(app.status.message.as_deref(), Some("Title is required"));
        assert!(app.planner.tasks().is_empty());
    }

    #[test]
    fn saved_task_lands_on_selected_day_and_is_selected() {
        let mut app = app();
        app.open_new_task_form();
        if let Some(form) = app.form.task.as_mut() {
            type_text(&mut form.title, "Dentista");
        }
        app.save_task_form();
        assert_eq!(app.ui.mode, Mode::View);
        let task = app.selected_task().unwrap();
        assert_eq!(task.title, "Dentista");
        assert_eq!(task.date, "2024-03-14");

        app.toggle_selected_task();
        assert!(app.selected_task().unwrap().completed);
        assert_eq!(app.completed().len(), 1);
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut app = app();
        app.open_new_task_form();
        if let Some(form) = app.form.task.as_mut() {
            type_text(&mut form.title, "x");
        }
        app.save_task_form();

        app.request_delete();
        app.modals.delete_modal_selection = 1;
        app.confirm_delete();
        assert_eq!(app.planner.tasks().len(), 1);

        app.request_delete();
        app.confirm_delete();
        assert!(app.planner.tasks().is_empty());
        assert!(app.modals.pending_delete.is_none());
    }

    #[test]
    fn typing_a_note_reflows_on_word_characters() {
        let mut app = app();
        app.open_new_block_prompt();
        app.save_block_prompt();
        assert_eq!(app.selected_block().unwrap().title, "Novo bloco");

        app.open_new_note();
        for ch in "um dois tres quatro".chars() {
            app.note_editor_insert_char(ch);
        }
        let text = app.form.note.as_ref().unwrap().text.to_string();
        assert_eq!(text, "um dois tres\nquatro");

        app.save_note_editor();
        assert_eq!(app.ui.mode, Mode::View);
        assert_eq!(app.selected_note().unwrap().text, "um dois tres\nquatro");
    }

    #[test]
    fn deleting_a_word_rebalances_note_lines() {
        let mut app = app();
        app.open_new_block_prompt();
        app.save_block_prompt();
        app.open_new_note();
        if let Some(note) = app.form.note.as_mut() {
            note.text = Editor::from_string("um dois tres\nquatro cinco");
            note.text.set_cursor_offset(7);
        }
        // Remove "dois" and the space before it
        for _ in 0..5 {
            app.note_editor_delete(false);
        }
        let text = app.form.note.as_ref().unwrap().text.to_string();
        assert_eq!(text, "um tres quatro\ncinco");
    }

    #[test]
    fn deleting_back_to_a_space_keeps_the_space() {
        let mut app = app();
        app.open_new_block_prompt();
        app.save_block_prompt();
        app.open_new_note();
        for ch in "um do".chars() {
            app.note_editor_insert_char(ch);
        }
        app.note_editor_delete(false);
        app.note_editor_delete(false);
        assert_eq!(app.form.note.as_ref().unwrap().text.to_string(), "um ");
    }

    #[test]
    fn live_reflow_keeps_cursor_at_end_when_typing_at_end() {
        let mut editor = Editor::from_string("a b c");
        apply_live_reflow(&mut editor, 2);
        assert_eq!(editor.to_string(), "a b\nc");
        assert_eq!(editor.cursor_offset(), 5);
    }

    #[test]
    fn renaming_to_blank_uses_untitled() {
        let mut app = app();
        app.open_new_block_prompt();
        app.save_block_prompt();
        app.open_rename_block_prompt();
        if let Some(prompt) = app.form.block.as_mut() {
            prompt.editor.set_text("   ");
        }
        app.save_block_prompt();
        assert_eq!(app.selected_block().unwrap().title, "Sem título");
    }

    #[test]
    fn note_label_falls_back_to_text() {
        let note = NoteItem::new("first line\nsecond".into(), 0);
        assert_eq!(note_label(&note), "first line");
    }
}
