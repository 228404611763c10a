use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "footprint")]
#[command(about = "Snapshot, report and compare account footprint analyses")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Snapshot database file (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Show debug logging
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Save an analysis result file as a snapshot
    Save(SaveArgs),

    /// List saved snapshots, newest first
    List(ListArgs),

    /// Display the most recent snapshot or a specific one
    Report(ReportArgs),

    /// Compare two snapshots
    Compare(CompareArgs),

    /// Count accounts per category in a record list or mapping
    Categories(CategoriesArgs),

    /// Wait for the analysis of an uploaded file, then save it
    Wait(WaitArgs),

    /// Export a flagged account list from a snapshot
    ExportList(ExportListArgs),
}

#[derive(Parser)]
pub struct SaveArgs {
    /// Analysis result JSON file
    pub file: PathBuf,

    /// Snapshot label (defaults to the current time)
    #[arg(long, default_value = "")]
    pub name: String,

    /// Extra JSON kept alongside the snapshot
    #[arg(long)]
    pub meta: Option<String>,
}

#[derive(Parser)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Parser)]
pub struct ReportArgs {
    /// Show a specific snapshot by ID or unique ID prefix
    #[arg(long)]
    pub id: Option<String>,

    /// Output as JSON
    #[arg(long, default_value_t = false, conflicts_with = "csv")]
    pub json: bool,

    /// Output the summary metrics as CSV
    #[arg(long, default_value_t = false)]
    pub csv: bool,
}

#[derive(Parser)]
pub struct CompareArgs {
    /// Older snapshot ID for comparison
    #[arg(long)]
    pub from: Option<String>,

    /// Newer snapshot ID for comparison
    #[arg(long)]
    pub to: Option<String>,

    /// Number of biggest changes to show
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Parser)]
pub struct CategoriesArgs {
    /// JSON file with a record list or a category -> count mapping
    pub file: PathBuf,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Parser)]
pub struct WaitArgs {
    /// Name of the uploaded file the analysis was started for
    pub upload: String,

    /// Directory the analysis results appear in
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Maximum number of attempts
    #[arg(long)]
    pub attempts: Option<u32>,

    /// Delay between attempts (e.g. "2s", "500ms")
    #[arg(long)]
    pub interval: Option<String>,

    /// Snapshot label (defaults to the current time)
    #[arg(long, default_value = "")]
    pub name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FlaggedList {
    /// Services whose password is over a year old
    PasswordWarnings,
    /// Services without a login in two years
    Inactive,
}

#[derive(Parser)]
pub struct ExportListArgs {
    /// Snapshot ID or unique ID prefix
    pub id: String,

    /// Which list to export
    #[arg(value_enum)]
    pub list: FlaggedList,
}
