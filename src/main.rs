use clap::Parser;
use footprint::analysis::AnalysisResult;
use footprint::cli::{Cli, Command, FlaggedList};
use footprint::config::{self, Config};
use footprint::fetch::{self, FileSource, PollPolicy};
use footprint::metrics;
use footprint::report;
use footprint::store::{Snapshot, SnapshotStore, SqliteStorage};
use serde_json::Value;

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn open_store(config: &Config) -> Result<SnapshotStore<SqliteStorage>, Box<dyn std::error::Error>> {
    let storage = match &config.db_path {
        Some(path) => SqliteStorage::open(path)?,
        None => SqliteStorage::open_default()?,
    };
    Ok(SnapshotStore::new(storage))
}

fn find_snapshot(store: &SnapshotStore<SqliteStorage>, id: &str) -> Result<Snapshot, Box<dyn std::error::Error>> {
    store
        .resolve(id)
        .ok_or_else(|| format!("Snapshot '{id}' not found (or ID prefix is ambiguous)").into())
}

fn save(config: &Config, args: &footprint::cli::SaveArgs) -> CliResult {
    let analysis = AnalysisResult::from_file(&args.file)?;

    let meta = match &args.meta {
        Some(raw) => serde_json::from_str::<Value>(raw).map_err(|e| format!("Invalid --meta JSON: {e}"))?,
        None => serde_json::json!({ "source": args.file.display().to_string() }),
    };

    let mut store = open_store(config)?;
    let id = store.save(&args.name, analysis.into_raw(), Some(meta))?;
    println!("{id}");
    Ok(())
}

fn list(config: &Config, args: &footprint::cli::ListArgs) -> CliResult {
    let store = open_store(config)?;
    let snapshots = store.load_all();

    if args.json {
        println!("{}", report::json::render_list(&snapshots));
    } else {
        print!("{}", report::table::render_list(&snapshots));
    }
    Ok(())
}

fn show_report(config: &Config, args: &footprint::cli::ReportArgs) -> CliResult {
    let store = open_store(config)?;

    let snapshot = match &args.id {
        Some(id) => find_snapshot(&store, id)?,
        None => store
            .load_all()
            .into_iter()
            .next()
            .ok_or("No snapshots found. Run 'footprint save' to create one.")?,
    };

    if args.json {
        println!("{}", report::json::render_snapshot(&snapshot));
    } else if args.csv {
        let analysis = AnalysisResult::new(snapshot.metrics);
        print!("{}", report::csv::render_summary(&analysis)?);
    } else {
        print!("{}", report::table::render_report(&snapshot));
    }
    Ok(())
}

fn compare(config: &Config, args: &footprint::cli::CompareArgs) -> CliResult {
    // --from and --to only make sense together
    if args.from.is_some() != args.to.is_some() {
        return Err("Both --from and --to must be specified together.".into());
    }

    let store = open_store(config)?;

    let (older, newer) = match (&args.from, &args.to) {
        (Some(from), Some(to)) => (find_snapshot(&store, from)?, find_snapshot(&store, to)?),
        _ => store
            .latest_pair()
            .ok_or("Need at least 2 snapshots to compare. Save a few analyses first.")?,
    };

    let limit = args.limit.unwrap_or(config.top_changes);
    let comparison = report::compare(&older, &newer, limit);

    if args.json {
        println!("{}", report::json::render_comparison(&comparison));
    } else {
        print!("{}", report::table::render_comparison(&comparison));
    }
    Ok(())
}

fn categories(args: &footprint::cli::CategoriesArgs) -> CliResult {
    let content = std::fs::read_to_string(&args.file)
        .map_err(|e| format!("failed to read {}: {e}", args.file.display()))?;
    let input: Value = serde_json::from_str(&content)?;
    let counts = metrics::aggregate(&input);

    if args.json {
        println!("{}", report::json::render_categories(&counts));
    } else {
        print!("{}", report::table::render_categories(&counts));
    }
    Ok(())
}

fn wait(config: &Config, args: &footprint::cli::WaitArgs) -> CliResult {
    let dir = args.dir.clone().unwrap_or_else(|| config.results_dir.clone());
    let policy = PollPolicy {
        max_attempts: args.attempts.unwrap_or(config.poll.max_attempts),
        interval: match &args.interval {
            Some(s) => config::parse_interval(s)?,
            None => config.poll.interval,
        },
    };

    let source = FileSource::for_upload(&dir, &args.upload);
    eprintln!("Waiting for {}...", source.path().display());

    let analysis = AnalysisResult::from_value(fetch::poll_report(&source, policy)?)?;

    let mut store = open_store(config)?;
    let meta = serde_json::json!({ "upload": args.upload, "source": source.path().display().to_string() });
    let id = store.save(&args.name, analysis.into_raw(), Some(meta))?;
    println!("{id}");
    Ok(())
}

fn export_list(config: &Config, args: &footprint::cli::ExportListArgs) -> CliResult {
    let store = open_store(config)?;
    let snapshot = find_snapshot(&store, &args.id)?;
    let analysis = AnalysisResult::new(snapshot.metrics);

    let items = match args.list {
        FlaggedList::PasswordWarnings => analysis.password_hygiene_warnings(),
        FlaggedList::Inactive => analysis.inactive_accounts(),
    };

    print!("{}", report::csv::render_list(&items)?);
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match Config::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            std::process::exit(1);
        }
    };

    let result = match &cli.command {
        Command::Save(args) => save(&config, args),
        Command::List(args) => list(&config, args),
        Command::Report(args) => show_report(&config, args),
        Command::Compare(args) => compare(&config, args),
        Command::Categories(args) => categories(args),
        Command::Wait(args) => wait(&config, args),
        Command::ExportList(args) => export_list(&config, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
