use thiserror::Error;

use crate::database::{Database, DatabaseError};
use crate::models::{NoteBlock, NoteItem, Task};
use crate::notes::NoteStore;
use crate::reflow::DEFAULT_WORDS_PER_LINE;
use crate::tasks::{TaskDraft, TaskStore};
use crate::week;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Title is required")]
    EmptyTitle,
    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("Invalid time '{0}' (expected HH:MM)")]
    InvalidTime(String),
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
}

/// Every state change the planner accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SaveTask(TaskDraft),
    DeleteTask { id: String },
    ToggleComplete { id: String, value: bool },
    CreateBlock { title: Option<String> },
    RenameBlock { id: String, title: String },
    DeleteBlock { id: String },
    AddNote { block_id: String, text: String },
    UpdateNote { block_id: String, note_id: String, title: String, text: String },
    DeleteNote { block_id: String, note_id: String },
}

/// What a dispatched action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    TaskSaved(Task),
    TaskDeleted(String),
    TaskToggled { id: String, completed: bool },
    BlockCreated(NoteBlock),
    BlockRenamed { id: String, title: String },
    BlockDeleted(String),
    NoteAdded { block_id: String, note: NoteItem },
    NoteUpdated { block_id: String, note: NoteItem },
    NoteDeleted { block_id: String, note_id: String },
    /// The target did not exist or the input was empty; nothing was written
    Unchanged,
}

/// Application state: both collections plus the store they persist to.
/// Every successful mutation rewrites the affected collection in full.
pub struct Planner {
    database: Database,
    tasks: TaskStore,
    notes: NoteStore,
    words_per_line: usize,
}

impl Planner {
    /// Load both collections from `database`
    pub fn load(database: Database) -> Self {
        let tasks = TaskStore::new(database.load_tasks());
        let notes = NoteStore::new(database.load_note_blocks());
        tracing::info!(
            tasks = tasks.tasks().len(),
            blocks = notes.blocks().len(),
            "planner loaded"
        );
        Self {
            database,
            tasks,
            notes,
            words_per_line: DEFAULT_WORDS_PER_LINE,
        }
    }

    pub fn with_words_per_line(mut self, words_per_line: usize) -> Self {
        self.words_per_line = words_per_line.max(1);
        self
    }

    pub fn words_per_line(&self) -> usize {
        self.words_per_line
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn blocks(&self) -> &[NoteBlock] {
        self.notes.blocks()
    }

    pub fn block(&self, id: &str) -> Option<&NoteBlock> {
        self.notes.get(id)
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Apply an action and persist the collection it touched
    pub fn dispatch(&mut self, action: Action) -> Result<Outcome, PlannerError> {
        tracing::debug!(?action, "dispatch");
        let outcome = match action {
            Action::SaveTask(draft) => {
                let task = self.tasks.save_draft(draft)?.clone();
                Outcome::TaskSaved(task)
            }
            Action::DeleteTask { id } => {
                if self.tasks.delete(&id) {
                    Outcome::TaskDeleted(id)
                } else {
                    Outcome::Unchanged
                }
            }
            Action::ToggleComplete { id, value } => {
                if self.tasks.toggle_complete(&id, value) {
                    Outcome::TaskToggled { id, completed: value }
                } else {
                    Outcome::Unchanged
                }
            }
            Action::CreateBlock { title } => {
                let block = self
                    .notes
                    .create_block(title.as_deref(), week::now_millis())
                    .clone();
                Outcome::BlockCreated(block)
            }
            Action::RenameBlock { id, title } => {
                if self.notes.rename_block(&id, &title) {
                    let title = self.notes.get(&id).map(|b| b.title.clone()).unwrap_or_default();
                    Outcome::BlockRenamed { id, title }
                } else {
                    Outcome::Unchanged
                }
            }
            Action::DeleteBlock { id } => {
                if self.notes.delete_block(&id) {
                    Outcome::BlockDeleted(id)
                } else {
                    Outcome::Unchanged
                }
            }
            Action::AddNote { block_id, text } => {
                match self.notes.add_note(&block_id, &text, week::now_millis()) {
                    Some(note) => Outcome::NoteAdded { note: note.clone(), block_id },
                    None => Outcome::Unchanged,
                }
            }
            Action::UpdateNote { block_id, note_id, title, text } => {
                let updated = self.notes.update_note(
                    &block_id,
                    &note_id,
                    &title,
                    &text,
                    self.words_per_line,
                    week::now_millis(),
                );
                match updated {
                    Some(note) => Outcome::NoteUpdated { note: note.clone(), block_id },
                    None => Outcome::Unchanged,
                }
            }
            Action::DeleteNote { block_id, note_id } => {
                if self.notes.delete_note(&block_id, &note_id) {
                    Outcome::NoteDeleted { block_id, note_id }
                } else {
                    Outcome::Unchanged
                }
            }
        };

        self.persist(&outcome)?;
        Ok(outcome)
    }

    fn persist(&self, outcome: &Outcome) -> Result<(), PlannerError> {
        match outcome {
            Outcome::Unchanged => {}
            Outcome::TaskSaved(_) | Outcome::TaskDeleted(_) | Outcome::TaskToggled { .. } => {
                self.database.save_tasks(self.tasks.tasks())?;
                tracing::info!(?outcome, "tasks saved");
            }
            _ => {
                self.database.save_note_blocks(self.notes.blocks())?;
                tracing::info!(?outcome, "note blocks saved");
            }
        }
        Ok(())
    }
}
