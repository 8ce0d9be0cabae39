use clap::{Parser, Subcommand};
use std::io::Write;
use thiserror::Error;

use crate::models::{NoteBlock, Priority};
use crate::notes::sorted_items;
use crate::planner::{Action, Outcome, Planner, PlannerError};
use crate::reflow;
use crate::tasks::{self, TaskDraft};
use crate::week::{self, Locale};

#[derive(Parser)]
#[command(name = "planner")]
#[command(about = "Weekly planner with note blocks - a terminal application")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    /// Theme to use for this run
    #[arg(long)]
    pub theme: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Print the week containing a date
    Week {
        /// Any date in the week (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Only tasks whose title or notes contain this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Quickly add a new task
    AddTask {
        /// Task title
        title: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Time (HH:MM)
        #[arg(long)]
        time: Option<String>,
        /// Priority: 1 (low), 2 (medium) or 3 (high)
        #[arg(long, default_value_t = 1)]
        priority: u8,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Mark a task as completed
    Done {
        /// Task id
        id: String,
        /// Mark as not completed instead
        #[arg(long)]
        undo: bool,
    },
    /// Delete a task
    DeleteTask {
        /// Task id
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// List note blocks and their notes
    Blocks,
    /// Create a note block
    AddBlock {
        /// Block title, defaults to "Novo bloco"
        title: Option<String>,
    },
    /// Add a note to a block
    AddNote {
        /// Block id or title
        block: String,
        /// Note text
        text: String,
    },
    /// Delete a note block and all of its notes
    DeleteBlock {
        /// Block id
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    PlannerError(#[from] PlannerError),
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
    #[error("Invalid priority: {0}")]
    InvalidPriority(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Output error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Handle the week command
pub fn handle_week(
    planner: &Planner,
    date: Option<String>,
    search: Option<String>,
    locale: Locale,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let base = match date {
        Some(raw) => week::parse_ymd(&raw)
            .map_err(|e| CliError::DateParseError(format!("Invalid date format '{}': {}", raw, e)))?,
        None => week::today(),
    };
    let query = search.unwrap_or_default();
    let (start, end) = week::week_interval(base);
    let count = tasks::count_in_week(planner.tasks(), &query, start, end);

    writeln!(out, "{}  ({} task{})", week::format_week_label(start, end, locale), count, if count == 1 { "" } else { "s" })?;
    let now = chrono::Local::now().naive_local();
    for column in tasks::week_columns(planner.tasks(), &query, start) {
        writeln!(
            out,
            "{} {}",
            week::weekday_label(column.date, locale),
            week::format_day_month(column.date, locale)
        )?;
        for task in &column.tasks {
            let check = if task.completed { "[x]" } else { "[ ]" };
            let time = task.time.as_deref().unwrap_or("--:--");
            let overdue = if !task.completed && tasks::is_overdue(task, now) { " (overdue)" } else { "" };
            writeln!(
                out,
                "  {} {} {:<5} {}{}  [{}]",
                check,
                time,
                task.priority.label(),
                task.title,
                overdue,
                task.id
            )?;
        }
    }
    Ok(())
}

/// Handle the add-task command
pub fn handle_add_task(
    planner: &mut Planner,
    title: String,
    date: Option<String>,
    time: Option<String>,
    priority: u8,
    notes: Option<String>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let priority = Priority::try_from(priority).map_err(CliError::InvalidPriority)?;
    let draft = TaskDraft {
        id: None,
        title,
        date: date.unwrap_or_else(|| week::to_ymd(week::today())),
        time: time.unwrap_or_default(),
        priority,
        notes: notes.unwrap_or_default(),
    };
    if let Outcome::TaskSaved(task) = planner.dispatch(Action::SaveTask(draft))? {
        writeln!(out, "Task created successfully (ID: {})", task.id)?;
    }
    Ok(())
}

/// Handle the done command
pub fn handle_done(planner: &mut Planner, id: String, undo: bool, out: &mut impl Write) -> Result<(), CliError> {
    match planner.dispatch(Action::ToggleComplete { id: id.clone(), value: !undo })? {
        Outcome::TaskToggled { completed, .. } => {
            let state = if completed { "completed" } else { "not completed" };
            writeln!(out, "Task {} marked {}", id, state)?;
            Ok(())
        }
        _ => Err(CliError::NotFound(format!("task {}", id))),
    }
}

/// Handle the delete-task command. Without `yes` nothing is deleted.
pub fn handle_delete_task(planner: &mut Planner, id: String, yes: bool, out: &mut impl Write) -> Result<(), CliError> {
    let Some(task) = planner.task(&id) else {
        return Err(CliError::NotFound(format!("task {}", id)));
    };
    if !yes {
        writeln!(out, "Not deleting task '{}' without --yes", task.title)?;
        return Ok(());
    }
    planner.dispatch(Action::DeleteTask { id: id.clone() })?;
    writeln!(out, "Task {} deleted", id)?;
    Ok(())
}

/// Handle the blocks command
pub fn handle_blocks(planner: &Planner, locale: Locale, out: &mut impl Write) -> Result<(), CliError> {
    if planner.blocks().is_empty() {
        writeln!(out, "No note blocks")?;
    }
    for block in planner.blocks() {
        writeln!(out, "{}  [{}]  {} note(s)", block.title, block.id, block.items.len())?;
        for note in sorted_items(block) {
            let heading = if note.title.is_empty() { "-" } else { note.title.as_str() };
            writeln!(out, "  {} ({})", heading, week::format_timestamp(note.ts, locale))?;
            for line in note.text.lines() {
                writeln!(out, "    {}", line)?;
            }
        }
    }
    Ok(())
}

/// Handle the add-block command
pub fn handle_add_block(planner: &mut Planner, title: Option<String>, out: &mut impl Write) -> Result<(), CliError> {
    if let Outcome::BlockCreated(block) = planner.dispatch(Action::CreateBlock { title })? {
        writeln!(out, "Block '{}' created (ID: {})", block.title, block.id)?;
    }
    Ok(())
}

/// Handle the add-note command. Text is wrapped like the note editor does.
pub fn handle_add_note(planner: &mut Planner, block: String, text: String, out: &mut impl Write) -> Result<(), CliError> {
    let block_id = find_block(planner.blocks(), &block)
        .map(|b| b.id.clone())
        .ok_or_else(|| CliError::NotFound(format!("block {}", block)))?;
    let text = reflow::reflow(&text, planner.words_per_line());
    match planner.dispatch(Action::AddNote { block_id, text })? {
        Outcome::NoteAdded { note, .. } => writeln!(out, "Note added (ID: {})", note.id)?,
        _ => writeln!(out, "Nothing to add: note text is empty")?,
    }
    Ok(())
}

/// Handle the delete-block command. Without `yes` nothing is deleted.
pub fn handle_delete_block(planner: &mut Planner, id: String, yes: bool, out: &mut impl Write) -> Result<(), CliError> {
    let Some(block) = planner.block(&id) else {
        return Err(CliError::NotFound(format!("block {}", id)));
    };
    if !yes {
        writeln!(
            out,
            "Not deleting block '{}' and its {} note(s) without --yes",
            block.title,
            block.items.len()
        )?;
        return Ok(());
    }
    planner.dispatch(Action::DeleteBlock { id: id.clone() })?;
    writeln!(out, "Block {} deleted", id)?;
    Ok(())
}

/// Block by id, falling back to the first block with that exact title
fn find_block<'a>(blocks: &'a [NoteBlock], key: &str) -> Option<&'a NoteBlock> {
    blocks
        .iter()
        .find(|b| b.id == key)
        .or_else(|| blocks.iter().find(|b| b.title == key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    fn planner() -> Planner {
        Planner::load(Database::open_in_memory().unwrap())
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    fn add(planner: &mut Planner, title: &str, date: &str, time: Option<&str>, priority: u8) {
        let mut sink = Vec::new();
        handle_add_task(
            planner,
            title.to_string(),
            Some(date.to_string()),
            time.map(str::to_string),
            priority,
            None,
            &mut sink,
        )
        .unwrap();
    }

    #[test]
    fn week_prints_sorted_days() {
        let mut p = planner();
        add(&mut p, "Later", "2024-03-14", None, 3);
        add(&mut p, "Early", "2024-03-14", Some("08:00"), 1);
        add(&mut p, "Other week", "2024-03-20", None, 1);

        let mut buf = Vec::new();
        handle_week(&p, Some("2024-03-11".into()), None, Locale::PtBr, &mut buf).unwrap();
        let text = output(buf);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("11–17 mar. 2024  (2 tasks)"));
        assert_eq!(lines[1], "Seg 11/03");
        assert!(text.contains("Qui 14/03\n  [ ] 08:00 Baixa Early"));
        assert!(text.find("Early").unwrap() < text.find("Later").unwrap());
        assert!(!text.contains("Other week"));
    }

    #[test]
    fn week_rejects_dates_outside_the_plain_format() {
        let p = planner();
        for raw in ["+262142-12-31", "2024-3-5"] {
            let mut buf = Vec::new();
            let err = handle_week(&p, Some(raw.into()), None, Locale::PtBr, &mut buf).unwrap_err();
            assert!(matches!(err, CliError::DateParseError(_)));
            assert!(buf.is_empty());
        }
    }

    #[test]
    fn invalid_priority_is_rejected() {
        let mut p = planner();
        let err = handle_add_task(&mut p, "x".into(), None, None, 7, None, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::InvalidPriority(_)));
        assert!(p.tasks().is_empty());
    }

    #[test]
    fn delete_without_yes_is_declined() {
        let mut p = planner();
        add(&mut p, "Keep me", "2024-03-14", None, 1);
        let id = p.tasks()[0].id.clone();

        let mut buf = Vec::new();
        handle_delete_task(&mut p, id.clone(), false, &mut buf).unwrap();
        assert!(output(buf).contains("without --yes"));
        assert_eq!(p.tasks().len(), 1);

        handle_delete_task(&mut p, id, true, &mut Vec::new()).unwrap();
        assert!(p.tasks().is_empty());
    }

    #[test]
    fn done_and_undo() {
        let mut p = planner();
        add(&mut p, "x", "2024-03-14", None, 1);
        let id = p.tasks()[0].id.clone();
        handle_done(&mut p, id.clone(), false, &mut Vec::new()).unwrap();
        assert!(p.tasks()[0].completed);
        handle_done(&mut p, id, true, &mut Vec::new()).unwrap();
        assert!(!p.tasks()[0].completed);

        let err = handle_done(&mut p, "id_missing".into(), false, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::NotFound(_)));
    }

    #[test]
    fn add_note_by_block_title_wraps_text() {
        let mut p = planner().with_words_per_line(2);
        handle_add_block(&mut p, Some("Ideias".into()), &mut Vec::new()).unwrap();
        handle_add_note(&mut p, "Ideias".into(), "a b c".into(), &mut Vec::new()).unwrap();
        assert_eq!(p.blocks()[0].items[0].text, "a b\nc");

        let err = handle_add_note(&mut p, "Nope".into(), "x".into(), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::NotFound(_)));
    }

    #[test]
    fn delete_block_needs_confirmation() {
        let mut p = planner();
        handle_add_block(&mut p, None, &mut Vec::new()).unwrap();
        let id = p.blocks()[0].id.clone();
        assert_eq!(p.blocks()[0].title, "Novo bloco");

        handle_delete_block(&mut p, id.clone(), false, &mut Vec::new()).unwrap();
        assert_eq!(p.blocks().len(), 1);
        handle_delete_block(&mut p, id, true, &mut Vec::new()).unwrap();
        assert!(p.blocks().is_empty());
    }
}
