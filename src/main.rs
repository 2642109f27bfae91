use clap::{Parser, Subcommand};
use deploydiff::cache::PackageCache;
use deploydiff::comparison::{Comparator, ComparisonResult};
use deploydiff::configuration::project::{DEFAULT_CONFIGURATION_FILE, ProjectConfiguration};
use deploydiff::error::Error;
use log::LevelFilter;
use std::fs;
use std::path::{Path, PathBuf};

/// Compares deploy packages against a baseline and reports configuration files
#[derive(Parser)]
#[command(name = "deploydiff", version, about)]
struct Cli {
    /// Project file describing the package and its baseline
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIGURATION_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Compare(CompareCommands),
    /// Read a comparison result document and print it with all lists present
    Normalize { file: PathBuf },
}

/// Commands that load the project file and inspect packages
#[derive(Subcommand)]
enum CompareCommands {
    /// Status of the package's own file lists, against the baseline if one is configured
    Status,
    /// Status of the baseline's file lists inside the package
    Baseline,
    /// List package directories with per-entry status
    Tree {
        /// Build the whole tree from the package root down to each path
        #[arg(long)]
        expand_all: bool,
        paths: Vec<String>,
    },
}

fn init_logging() {
    let mut log_builder = env_logger::Builder::new();
    if let Ok(s) = ::std::env::var("RUST_LOG") {
        log_builder.parse_filters(&s);
    } else {
        // default to 'Info'
        log_builder.filter(None, LevelFilter::Info);
    }

    log_builder.format_timestamp_millis().init();
}

fn normalize(file: &Path) -> Result<String, Error> {
    let input = fs::read_to_string(file)?;
    let result = ComparisonResult::from_json(&input)?;
    Ok(result.to_json_pretty()?)
}

fn compare(config: &Path, command: CompareCommands) -> Result<String, Error> {
    let configuration = ProjectConfiguration::load(config)?;
    let comparator = Comparator::new(
        PackageCache::new(configuration.cache.dir.clone()),
        configuration.variables.parser()?,
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run(&configuration, &comparator, command))
}

async fn run(
    configuration: &ProjectConfiguration,
    comparator: &Comparator,
    command: CompareCommands,
) -> Result<String, Error> {
    let package = &configuration.package;
    let baseline = configuration.baseline.as_ref();
    match command {
        CompareCommands::Status => {
            let result = comparator.package_status(package, baseline).await?;
            Ok(result.to_json_pretty()?)
        }
        CompareCommands::Baseline => {
            let baseline = baseline.ok_or(Error::MissingBaseline)?;
            let result = comparator.baseline_compare(package, baseline).await?;
            Ok(result.to_json_pretty()?)
        }
        CompareCommands::Tree { expand_all, paths } => {
            let nodes = comparator
                .file_tree(package, baseline, &paths, expand_all)
                .await?;
            Ok(serde_json::to_string_pretty(&nodes)?)
        }
    }
}

fn main() -> Result<(), Error> {
    init_logging();
    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Normalize { file } => normalize(&file)?,
        Commands::Compare(command) => compare(&cli.config, command)?,
    };

    println!("{output}");
    Ok(())
}
