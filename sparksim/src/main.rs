//! SparkSim CLI
//!
//! Estimate a distributed join job for one configuration, or score it
//! against the challenge levels.

use clap::Parser;
use sparksim::{RunReport, Session, SimReport};
use sparksim_core::{
    ClusterSize, Configuration, DatasetSize, FileFormat, JoinKey, JoinType, Level, LevelSet,
    PartitionStrategy, SimError, SkewKey, Table,
};
use tracing::{error, info, Level as LogLevel};
use tracing_subscriber::FmtSubscriber;

/// SparkSim cost model CLI
#[derive(Parser, Debug)]
#[command(name = "sparksim")]
#[command(about = "Estimate how job configuration affects a distributed join", long_about = None)]
struct Args {
    /// JSON configuration file (camelCase fields, any subset)
    #[arg(short, long)]
    config: Option<String>,

    /// Challenge level id, or "all"
    #[arg(short, long)]
    level: Option<String>,

    /// Custom level set (JSON array) instead of the built-in levels
    #[arg(long)]
    levels: Option<String>,

    /// Cluster size (Small, Medium, Large)
    #[arg(long)]
    cluster: Option<ClusterSize>,

    /// Dataset size (Small, Medium, Large)
    #[arg(long)]
    dataset: Option<DatasetSize>,

    /// Partition strategy (None, Good, Bad)
    #[arg(long)]
    partition: Option<PartitionStrategy>,

    /// File format (Parquet, CSV)
    #[arg(long)]
    format: Option<FileFormat>,

    /// Primary join table (Orders, Customers, Products)
    #[arg(long)]
    primary: Option<Table>,

    /// Secondary join table (Orders, Customers, Products)
    #[arg(long)]
    secondary: Option<Table>,

    /// Join key (customer_id, product_id, order_id)
    #[arg(long)]
    join_key: Option<JoinKey>,

    /// Join strategy (Broadcast, Shuffle)
    #[arg(short, long)]
    join: Option<JoinType>,

    /// Cache the primary table
    #[arg(long)]
    cache: Option<bool>,

    /// Adaptive query execution
    #[arg(long)]
    aqe: Option<bool>,

    /// Simulate data skew
    #[arg(long)]
    skewed: Option<bool>,

    /// Skew key (region_id, customer_id, product_id, order_id)
    #[arg(long)]
    skew_key: Option<SkewKey>,

    /// Include the unrounded cost breakdown
    #[arg(long)]
    explain: bool,

    /// Print the job DAG
    #[arg(long)]
    plan: bool,

    /// Print the on-disk file layout of each table
    #[arg(long)]
    layout: bool,

    /// Print the sample PySpark program
    #[arg(long)]
    code: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for scripting
    #[arg(long)]
    json: bool,

    /// Export the report to a JSON file
    #[arg(long)]
    export: Option<String>,
}

impl Args {
    /// Applies knob flags on top of a base configuration.
    fn apply_overrides(&self, config: &mut Configuration) {
        if let Some(v) = self.cluster {
            config.cluster_size = v;
        }
        if let Some(v) = self.dataset {
            config.dataset_size = v;
        }
        if let Some(v) = self.partition {
            config.partition_strategy = v;
        }
        if let Some(v) = self.format {
            config.file_format = v;
        }
        if let Some(v) = self.primary {
            config.join_primary = v;
        }
        if let Some(v) = self.secondary {
            config.join_secondary = v;
        }
        if let Some(v) = self.join_key {
            config.join_key = v;
        }
        if let Some(v) = self.join {
            config.join_type = v;
        }
        if let Some(v) = self.cache {
            config.use_cache = v;
        }
        if let Some(v) = self.aqe {
            config.aqe_enabled = v;
        }
        if let Some(v) = self.skewed {
            config.skewed = v;
        }
        if let Some(v) = self.skew_key {
            config.skew_key = v;
        }
    }
}

/// Resolves which levels to run. `None` in the list means free play.
fn select_levels(selector: Option<&str>, levels: &LevelSet) -> Result<Vec<Option<Level>>, SimError> {
    match selector {
        None => Ok(vec![None]),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(levels.iter().cloned().map(Some).collect()),
        Some(s) => {
            let id: u32 = s.parse().map_err(|_| SimError::unknown_level(s))?;
            Ok(vec![Some(levels.get(id)?.clone())])
        }
    }
}

fn run(args: &Args) -> Result<SimReport, SimError> {
    let levels = match &args.levels {
        Some(path) => LevelSet::from_json_file(path)?,
        None => LevelSet::builtin()?,
    };

    let base = match &args.config {
        Some(path) => Configuration::from_json_file(path)?,
        None => Configuration::default(),
    };

    let mut report = SimReport::new();

    for level in select_levels(args.level.as_deref(), &levels)? {
        let mut session = Session::new(base);
        if let Some(level) = level {
            session.select_level(level);
        }

        let mut config = *session.config();
        args.apply_overrides(&mut config);
        session.set_config(config);

        let snapshot = session.evaluate().clone();
        let mut run = RunReport::new(snapshot, session.level());
        if args.explain {
            run = run.with_breakdown();
        }
        if args.plan {
            run = run.with_plan();
        }
        if args.layout {
            run = run.with_layout();
        }
        if args.code {
            run = run.with_code();
        }

        report.add_run(run);
    }

    Ok(report)
}

fn print_run(run: &RunReport) {
    let metrics = &run.snapshot.metrics;

    match &run.level {
        Some(level) => info!("▶ {} (level {})", level.title, level.id),
        None => info!("▶ Free play"),
    }

    info!(
        "  time={}  cpu={}%  memory={}%",
        metrics.time, metrics.cpu, metrics.memory
    );
    for traffic in &metrics.network_timeline {
        info!("  {:<8} {:>9} MB", traffic.stage.name(), traffic.network_mb);
    }

    if let Some(points) = run.snapshot.score {
        match run.level.as_ref().and_then(|l| l.max_points) {
            Some(max_points) => info!("  score={} / {}", points, max_points),
            None => info!("  score={}", points),
        }
    }

    for warning in &run.warnings {
        info!("  ⚠ {}", warning);
    }

    if let Some(detail) = &run.breakdown {
        info!(
            "  join={:?} workers={} primary={} ({:.2} GB on disk) secondary={} ({:.2} GB on disk)",
            detail.join_plan,
            detail.workers,
            detail.primary.table,
            detail.primary.on_disk_gb,
            detail.secondary.table,
            detail.secondary.on_disk_gb
        );
        info!(
            "  read={:.2} shuffle={:.2} broadcast={:.2} spill={:.2} write={:.2} GB",
            detail.read_gb, detail.shuffle_gb, detail.broadcast_gb, detail.spill_gb, detail.write_gb
        );
        info!(
            "  time_units={:.3} cpu_load={:.2} memory_used={:.2}/{:.0} GB",
            detail.time_units, detail.cpu_load, detail.memory_used_gb, detail.cluster_memory_gb
        );
    }

    if let Some(plan) = &run.plan {
        info!("  plan: {}", plan);
    }

    if let Some(layout) = &run.layout {
        info!("  on disk: {:.2} GB", layout.total_on_disk_gb);
        for table in &layout.tables {
            info!(
                "  📁 {} (~{:.2} GB, {} files)",
                table.directory(),
                table.on_disk_gb,
                table.partition_count
            );
            for file in &table.files {
                info!("     {:<20} {:>8.2} GB", file.name, file.size_gb);
            }
            if let Some(warning) = &table.warning {
                info!("     ⚠ {}", warning);
            }
        }
    }

    if let Some(code) = &run.code {
        println!("{}", code);
    }
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { LogLevel::DEBUG } else { LogLevel::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let report = match run(&args) {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if args.json {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to render report: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        info!("SparkSim v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        for run in &report.runs {
            print_run(run);
        }
    }

    if let Some(path) = &args.export {
        if let Err(e) = report.write_to_file(path) {
            error!("Failed to write export: {:?}", e);
            std::process::exit(1);
        }
        info!("Exported {} runs to {}", report.runs.len(), path);
    }
}
