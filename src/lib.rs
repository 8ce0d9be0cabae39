pub mod cli;
pub mod config;
pub mod database;
pub mod models;
pub mod notes;
pub mod planner;
pub mod reflow;
pub mod tasks;
pub mod tui;
pub mod utils;
pub mod week;

pub use config::Config;
pub use database::Database;
pub use models::{NoteBlock, NoteItem, Priority, Task};
pub use planner::{Action, Outcome, Planner, PlannerError};
pub use utils::Profile;
