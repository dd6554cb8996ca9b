use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gymlog")]
#[command(about = "Workout ledger: daily logs, weekly summary, exports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// SQLite database file (overrides the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage gym locations
    Sede {
        #[command(subcommand)]
        action: SedeCommand,
    },
    /// Daily exercise logs
    Log {
        #[command(subcommand)]
        action: LogCommand,
    },
    /// Cardio sessions
    Cardio {
        #[command(subcommand)]
        action: CardioCommand,
    },
    /// Weekly summary
    Summary {
        #[command(subcommand)]
        action: SummaryCommand,
    },
    /// Latest session, trend and personal record
    Stats,
    /// Write an export file
    Export {
        #[command(subcommand)]
        target: ExportTarget,

        /// Plain-text report instead of JSON
        #[arg(long, global = true)]
        text: bool,

        /// Output directory (defaults to the configured export directory)
        #[arg(short, long, global = true)]
        output: Option<PathBuf>,
    },
    /// Merge an exported JSON file into the current state
    Import {
        #[arg(required = true)]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum SedeCommand {
    /// List sedes in display order
    List,
    /// Select (or create) a sede
    Use {
        name: Option<String>,

        /// Clear the selection instead
        #[arg(long, conflicts_with = "name")]
        clear: bool,
    },
    Rename {
        old: String,
        new: String,
    },
    Remove {
        name: String,

        /// Keep the logs tagged with this sede
        #[arg(long)]
        keep_logs: bool,
    },
    /// Move a sede one position
    Move {
        name: String,
        #[arg(value_enum)]
        direction: Direction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Subcommand)]
pub enum LogCommand {
    /// Record a set for the active sede
    Add {
        /// Workout day: 1-5 or the day key
        day: String,
        name: String,

        /// YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value = "")]
        series: String,
        #[arg(long, default_value = "")]
        reps: String,
        #[arg(long, default_value = "")]
        kilos: String,
        /// mm:ss or hh:mm:ss
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        calories: Option<String>,
        #[arg(long, value_enum)]
        unit: Option<Unit>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Edit fields of a daily log
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        series: Option<String>,
        #[arg(long)]
        reps: Option<String>,
        #[arg(long)]
        kilos: Option<String>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        calories: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Rm {
        id: String,
    },
    /// Promote a daily log into the summary
    Save {
        id: String,
    },
    /// Remove a log from the summary
    Unsave {
        id: String,
    },
    List {
        /// Only this workout day
        #[arg(long)]
        day: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Unit {
    Km,
    M,
}

#[derive(Subcommand)]
pub enum CardioCommand {
    /// Record a cardio session for the active sede
    Add {
        /// Workout day: 1-5 or the day key
        #[arg(long, default_value = "5")]
        day: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        speed: String,
        #[arg(long, default_value = "")]
        distance: String,
        /// KM or MTS
        #[arg(long, default_value = "KM")]
        unit: String,
        #[arg(long, default_value = "")]
        incline: String,
        #[arg(long, default_value = "")]
        time: String,
        #[arg(long, default_value = "")]
        calories: String,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum SummaryCommand {
    /// Print the summary grouped by week and day
    Show,
    /// Remove every summary log of a week
    RmWeek {
        /// Monday of the week, YYYY-MM-DD
        week_start: String,
    },
    /// Remove one day's summary logs inside a week
    RmDay {
        week_start: String,
        day: String,
    },
}

#[derive(Subcommand)]
pub enum ExportTarget {
    /// Whole state
    Full,
    /// All summary logs
    Summary,
    Week {
        week_start: String,
    },
    Day {
        week_start: String,
        day: String,
    },
}
