use clap::Parser;
use color_eyre::Result;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use planner::cli::{self, Cli, Commands};
use planner::tui::{run_event_loop, App};
use planner::{Config, Database, Planner, Profile};

/// Initialize tracing. The TUI owns the terminal, so it logs to a file;
/// CLI commands log to stderr and keep stdout for their output.
fn init_tracing(log_file: Option<&Path>) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "planner=info".into()),
    );

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => tracing_subscriber::registry()
                    .with(filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_ansi(false)
                            .with_writer(Mutex::new(file)),
                    )
                    .init(),
                // Nowhere to log without corrupting the screen
                Err(_) => tracing_subscriber::registry()
                    .with(filter)
                    .with(tracing_subscriber::fmt::layer().with_writer(std::io::sink))
                    .init(),
            }
        }
        None => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };
    let mut config = match cli.config.as_deref() {
        Some(path) => Config::load_from_path(Path::new(path))?,
        None => Config::load_with_profile(profile)?,
    };
    if let Some(theme) = cli.theme.as_deref() {
        config.set_theme(theme)?;
    }

    let command = cli.command.unwrap_or(Commands::Tui);
    let log_path = config.get_log_path();
    let is_tui = matches!(command, Commands::Tui);
    init_tracing(is_tui.then_some(log_path.as_path()));

    let db_path = config.get_database_path();
    let db = Database::new(
        db_path
            .to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database path contains invalid UTF-8"))?,
    )?;
    let mut planner = Planner::load(db).with_words_per_line(config.words_per_line);
    let locale = config.locale();
    let mut out = std::io::stdout();

    match command {
        Commands::Tui => {
            run_event_loop(App::new(config, planner))?;
        }
        Commands::Week { date, search } => {
            cli::handle_week(&planner, date, search, locale, &mut out)?;
        }
        Commands::AddTask { title, date, time, priority, notes } => {
            cli::handle_add_task(&mut planner, title, date, time, priority, notes, &mut out)?;
        }
        Commands::Done { id, undo } => {
            cli::handle_done(&mut planner, id, undo, &mut out)?;
        }
        Commands::DeleteTask { id, yes } => {
            cli::handle_delete_task(&mut planner, id, yes, &mut out)?;
        }
        Commands::Blocks => {
            cli::handle_blocks(&planner, locale, &mut out)?;
        }
        Commands::AddBlock { title } => {
            cli::handle_add_block(&mut planner, title, &mut out)?;
        }
        Commands::AddNote { block, text } => {
            cli::handle_add_note(&mut planner, block, text, &mut out)?;
        }
        Commands::DeleteBlock { id, yes } => {
            cli::handle_delete_block(&mut planner, id, yes, &mut out)?;
        }
    }

    Ok(())
}
