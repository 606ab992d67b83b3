//! Cadence CLI
//!
//! Terminal front end for the adaptive flashcard engine: study a catalog,
//! inspect progress, reset a library, preview reminders.

mod config;
mod store;
mod study;

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::{Color, Colorize};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use cadence_core::{
    Capabilities, LibraryKey, ReminderPolicy, ReminderRating, SessionController,
    SessionRepository, StoredSession,
};

use crate::config::LoadedCatalog;
use crate::store::FileRepository;

/// Cadence - adaptive flashcards in the terminal
#[derive(Parser)]
#[command(name = "cadence")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Study flashcards with mastery-based spaced repetition")]
#[command(long_about = "Cadence tracks a mastery level per card, brings weak cards back sooner than strong ones, and moves from multiple-choice to typed answers as cards are learned.\n\nProgress is saved per user and library and resumes exactly where it stopped.")]
struct Cli {
    /// Data directory (defaults to $CADENCE_DATA_DIR, then the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Learner id
    #[arg(long, global = true, default_value = "default")]
    user: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Study a catalog, resuming saved progress
    Study {
        /// Catalog JSON file
        #[arg(long)]
        catalog: PathBuf,
        /// Library id (defaults to the catalog's id or file name)
        #[arg(long)]
        library: Option<String>,
        /// Only ask multiple-choice questions
        #[arg(long, conflicts_with = "no_multiple_choice")]
        no_typed: bool,
        /// Only ask typed questions
        #[arg(long)]
        no_multiple_choice: bool,
        /// Stop after this many answers
        #[arg(long)]
        max_questions: Option<u64>,
        /// Engine params JSON file (new sessions only)
        #[arg(long)]
        params: Option<PathBuf>,
    },

    /// Show progress for a catalog
    Stats {
        /// Catalog JSON file
        #[arg(long)]
        catalog: PathBuf,
        /// Library id (defaults to the catalog's id or file name)
        #[arg(long)]
        library: Option<String>,
    },

    /// Forget saved progress for a library
    Reset {
        /// Library id
        #[arg(long)]
        library: String,
    },

    /// Show the reminder a difficulty rating would place
    Remind {
        /// Card id
        #[arg(long)]
        card: String,
        /// very-hard, hard, again or normal
        #[arg(long)]
        rating: ReminderRating,
        /// Print the reminder as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // stdout belongs to the study prompt
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let data_dir = config::resolve_data_dir(cli.data_dir, std::env::var_os(config::DATA_DIR_ENV))?;

    match cli.command {
        Commands::Study {
            catalog,
            library,
            no_typed,
            no_multiple_choice,
            max_questions,
            params,
        } => {
            let capabilities = Capabilities {
                allow_typed: !no_typed,
                allow_multiple_choice: !no_multiple_choice,
                ..Capabilities::default()
            };
            let loaded = config::load_catalog(&catalog)?;
            let key = library_key(&cli.user, library, &loaded);
            let params = config::load_params(params.as_deref(), &data_dir)?;
            run_study(&data_dir, key, loaded, params, capabilities, max_questions)
        }
        Commands::Stats { catalog, library } => {
            let loaded = config::load_catalog(&catalog)?;
            let key = library_key(&cli.user, library, &loaded);
            run_stats(&data_dir, key, loaded)
        }
        Commands::Reset { library } => run_reset(&data_dir, LibraryKey::new(cli.user, library)),
        Commands::Remind { card, rating, json } => run_remind(card, rating, json),
    }
}

fn library_key(user: &str, library: Option<String>, loaded: &LoadedCatalog) -> LibraryKey {
    LibraryKey::new(user, library.unwrap_or_else(|| loaded.library_id.clone()))
}

fn repository(data_dir: &Path) -> FileRepository {
    FileRepository::new(data_dir.join("sessions"))
}

/// Run study command
fn run_study(
    data_dir: &Path,
    key: LibraryKey,
    loaded: LoadedCatalog,
    params: cadence_core::EngineParams,
    capabilities: Capabilities,
    max_questions: Option<u64>,
) -> anyhow::Result<()> {
    let repo = repository(data_dir);
    let previous = repo
        .load(&key)
        .with_context(|| format!("Failed to load saved progress for {key}"))?;

    let mut session = match &previous {
        Some(stored) => {
            info!(library = %key, "Resuming saved session");
            SessionController::resume(loaded.catalog, stored.session.clone(), capabilities)?
        }
        None => SessionController::new(loaded.catalog, params, capabilities)?,
    };
    let session_count = previous.as_ref().map_or(0, |s| s.summary.session_count) + 1;

    println!("{}", format!("=== Studying {} ===", key.library_id).cyan().bold());
    println!("{}", format!("Type {} to stop.", study::QUIT_COMMAND).dimmed());

    session.start()?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    let report = study::run(&mut session, &mut input, &mut out, max_questions)?;
    session.finish();

    let stored = StoredSession {
        session: session.snapshot()?,
        summary: session.summary(session_count, Utc::now()),
    };
    repo.save(&key, &stored)
        .with_context(|| format!("Failed to save progress for {key}"))?;

    println!();
    println!(
        "{}: {}/{} correct this run",
        "Session".white().bold(),
        report.correct,
        report.answered
    );
    print_summary(&stored)?;
    Ok(())
}

/// Run stats command
fn run_stats(data_dir: &Path, key: LibraryKey, loaded: LoadedCatalog) -> anyhow::Result<()> {
    let repo = repository(data_dir);
    let Some(stored) = repo.load(&key)? else {
        println!("{}", format!("No saved progress for {key}.").dimmed());
        println!("{}: {}", "Cards".white().bold(), loaded.catalog.len());
        return Ok(());
    };

    let session = SessionController::resume(loaded.catalog, stored.session.clone(), Capabilities::default())?;
    let detailed = session.progress_detailed();
    // the catalog may have changed since the last save
    let current = StoredSession {
        summary: session.summary(stored.summary.session_count, stored.summary.last_accessed),
        ..stored
    };

    println!("{}", format!("=== Progress: {key} ===").cyan().bold());
    println!();
    print_summary(&current)?;

    println!();
    println!("{}", "=== Mastery Levels ===".yellow().bold());
    let max_mastery = session.params().max_mastery;
    for (level, bucket) in detailed.mastery_levels.iter().rev() {
        println!("{}", mastery_row(*level, bucket.count, detailed.total, max_mastery));
    }
    let started = session.card_progress().iter().filter(|c| c.mastery > 0).count();
    println!(
        "{}",
        mastery_row(0, detailed.total - started, detailed.total, max_mastery)
    );

    Ok(())
}

/// Run reset command
fn run_reset(data_dir: &Path, key: LibraryKey) -> anyhow::Result<()> {
    if repository(data_dir).delete(&key)? {
        println!("{}", format!("Progress for {key} deleted.").green());
    } else {
        println!("{}", format!("No saved progress for {key}.").dimmed());
    }
    Ok(())
}

/// Run remind command
fn run_remind(card: String, rating: ReminderRating, json: bool) -> anyhow::Result<()> {
    let now = Utc::now();
    let reminder = ReminderPolicy::default().schedule(card, rating, now);

    if json {
        println!("{}", serde_json::to_string_pretty(&reminder)?);
        return Ok(());
    }

    println!("{}", "=== Reminder ===".cyan().bold());
    println!("{}: {}", "Card".white().bold(), reminder.card_id);
    println!("{}: {}", "Rating".white().bold(), reminder.rating);
    println!("{}: {}", "At".white().bold(), reminder.at.format("%Y-%m-%d %H:%M UTC"));
    println!("{}: {} min", "Duration".white().bold(), reminder.duration_minutes);
    println!("{}: {}", "Status".white().bold(), reminder.status(now));
    Ok(())
}

fn print_summary(stored: &StoredSession) -> anyhow::Result<()> {
    let summary = &stored.summary;
    let mut out = BufWriter::new(io::stdout());
    writeln!(out, "{}: {}", "Cards".white().bold(), summary.total)?;
    writeln!(out, "{}: {} ({:.1}%)", "Mastered".white().bold(), summary.mastered, summary.percent_mastered)?;
    writeln!(out, "{}: {}", "Learning".white().bold(), summary.learning)?;
    writeln!(out, "{}: {}", "Due".white().bold(), summary.due)?;
    writeln!(out, "{}: {:.1}%", "Accuracy".white().bold(), summary.accuracy_overall * 100.0)?;
    writeln!(out, "{}: {}", "Sessions".white().bold(), summary.session_count)?;
    writeln!(
        out,
        "{}: {}",
        "Last Studied".white().bold(),
        summary.last_accessed.format("%Y-%m-%d %H:%M:%S")
    )?;
    out.flush()?;
    Ok(())
}

const MASTERY_BAR_WIDTH: usize = 24;

/// One histogram row: level, bar, card count and share of the catalog.
///
/// Mastered levels are green, the upper half yellow, the rest red and
/// level 0 (unseen or lapsed to the floor) plain.
fn mastery_row(level: u32, count: usize, total: usize, max_mastery: u32) -> String {
    let (filled, share) = match total {
        0 => (0, 0.0),
        _ => (
            (count * MASTERY_BAR_WIDTH / total).min(MASTERY_BAR_WIDTH),
            count as f64 * 100.0 / total as f64,
        ),
    };
    let bar = format!("{}{}", "=".repeat(filled), " ".repeat(MASTERY_BAR_WIDTH - filled));
    let color = match level {
        0 => Color::White,
        l if l >= max_mastery => Color::Green,
        l if l * 2 > max_mastery => Color::Yellow,
        _ => Color::Red,
    };
    format!("  L{level} |{}| {count:>4} {share:>5.1}%", bar.color(color))
}
