//! Command-line reader over a DayGrid snapshot database.
//!
//! # Responsibility
//! - Print day and month views of the stored events.
//! - Write month exports to stdout or a file.
//!
//! # Invariants
//! - The CLI never mutates the snapshot.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use daygrid_core::db::open_db;
use daygrid_core::{
    core_version, export_file_name, export_projection, init_console_logging, month_grid,
    query_day, CalendarMonth, DayQuery, Event, EventCollection, ExportFormat,
    SnapshotRepository, SqliteSnapshotRepository,
};
use log::info;
use std::error::Error;
use std::path::{Path, PathBuf};

const DEFAULT_DB_FILE: &str = "daygrid_events.sqlite3";
const DB_PATH_ENV: &str = "DAYGRID_DB_PATH";

#[derive(Parser)]
#[command(name = "daygrid")]
#[command(about = "Inspect and export DayGrid calendar events")]
struct Cli {
    /// Snapshot database (defaults to $DAYGRID_DB_PATH, then ./daygrid_events.sqlite3)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log level written to stderr
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the events of one day
    Day {
        /// Day to show (YYYY-MM-DD)
        date: String,

        /// Only events whose name or description contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show every day of a month with its events
    Month {
        /// Month to show (YYYY-MM)
        month: String,
    },
    /// Export the events of a month
    Export {
        /// Month to export (YYYY-MM)
        month: String,

        /// json or csv
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Write to this file; a directory gets the default export file name
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print the core version
    Version,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_console_logging(&cli.log_level)?;

    match cli.command {
        Commands::Version => {
            println!("daygrid_core version={}", core_version());
            Ok(())
        }
        Commands::Day { date, search } => {
            let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
                .map_err(|err| format!("invalid date `{date}`: {err}"))?;
            let events = load_events(&resolve_db_path(cli.db))?;
            print_day(&events, day, search);
            Ok(())
        }
        Commands::Month { month } => {
            let month = CalendarMonth::parse(&month)?;
            let events = load_events(&resolve_db_path(cli.db))?;
            print_month(&events, month);
            Ok(())
        }
        Commands::Export { month, format, out } => {
            let month = CalendarMonth::parse(&month)?;
            let format = format.parse::<ExportFormat>()?;
            let events = load_events(&resolve_db_path(cli.db))?;
            export(&events, month, format, out.as_deref())
        }
    }
}

fn resolve_db_path(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| {
        std::env::var(DB_PATH_ENV)
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from)
    })
    .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
}

fn load_events(path: &Path) -> Result<EventCollection, Box<dyn Error>> {
    if !path.is_file() {
        return Err(format!("snapshot database not found: {}", path.display()).into());
    }
    let conn = open_db(path)?;
    let events = SqliteSnapshotRepository::new(&conn).load_events()?;
    info!(
        "event=cli_load module=cli status=ok events={}",
        events.len()
    );
    Ok(events)
}

fn print_day(events: &EventCollection, day: NaiveDate, search: Option<String>) {
    let query = match search {
        Some(text) => DayQuery::new(day).with_text(text),
        None => DayQuery::new(day),
    };
    let hits = query_day(events, &query);
    println!("{}", day.format("%A, %B %-d, %Y"));
    if hits.is_empty() {
        println!("  (no events)");
    }
    for event in hits {
        println!("  {}", describe(event));
    }
}

fn print_month(events: &EventCollection, month: CalendarMonth) {
    println!("{}", month.title());
    for slot in month_grid(events, month) {
        if slot.events.is_empty() {
            continue;
        }
        println!("{}", slot.date.format("%a %d"));
        for event in slot.events {
            println!("  {}", describe(event));
        }
    }
}

fn describe(event: &Event) -> String {
    let when = if event.is_all_day {
        "all day".to_string()
    } else {
        format!("{}-{}", event.start_time, event.end_time)
    };
    match &event.description {
        Some(description) => format!("{when}  {}  ({description})  [{}]", event.name, event.id),
        None => format!("{when}  {}  [{}]", event.name, event.id),
    }
}

fn export(
    events: &EventCollection,
    month: CalendarMonth,
    format: ExportFormat,
    out: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let bytes = export_projection(events, month, format)?;
    match out {
        None => {
            println!("{}", String::from_utf8_lossy(&bytes));
        }
        Some(path) => {
            let target = if path.is_dir() {
                path.join(export_file_name(month, format))
            } else {
                path.to_path_buf()
            };
            std::fs::write(&target, &bytes)?;
            eprintln!("wrote {}", target.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::load_events;

    #[test]
    fn missing_database_is_an_error_and_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.sqlite3");

        let err = load_events(&path).unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(!path.exists());
    }

    #[test]
    fn existing_database_loads_its_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calendar.sqlite3");
        drop(daygrid_core::db::open_db(&path).unwrap());

        assert!(load_events(&path).unwrap().is_empty());
    }
}
