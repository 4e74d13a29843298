mod cli;
mod logging;
mod reporter;

use std::process;

use clap::Parser;
use cli::Cli;
use colored::*;
use dir_sorter::{Category, SortEngine, SortResult};
use dotenv::dotenv;
use reporter::CliReporter;
use tracing::{error, info, warn};

fn main() -> anyhow::Result<()> {
    // Arity errors exit here with usage, before anything touches the disk.
    let args = Cli::parse();

    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match dir_sorter::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let engine = SortEngine::new(config, &args.source_folder, &args.destination_folder);
    let reporter = CliReporter::new();
    let result = match engine.run(&reporter) {
        Ok(result) => result,
        Err(err) => {
            error!("Error: {}", err);
            process::exit(1);
        }
    };

    log_summary(&result);

    Ok(())
}

fn log_summary(result: &SortResult) {
    let summary = &result.summary;

    for (label, category) in [
        ("Images", Category::Images),
        ("Video", Category::Video),
        ("Documents", Category::Documents),
        ("Audio", Category::Audio),
        ("Archives", Category::Archives),
    ] {
        info!("{}: {:?}", label, summary.paths(category));
    }
    info!("Unknown Extensions: {:?}", summary.unknown_extensions);
    info!("Others: {:?}", summary.paths(Category::Others));
    info!("Known Extensions: {:?}", summary.known_extensions);

    for path in &summary.skipped_archives {
        warn!("Skipped {}: Not a valid zip file", path.display());
    }

    println!();
    info!(
        "Sort: {}, Prune: {}",
        format!("{:.2}s", result.sort_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.prune_duration.as_secs_f64()).green(),
    );
    info!(
        "{} files sorted, {} failed, {} ignored, {} empty directories removed",
        format!("{}", summary.total_sorted()).green(),
        format!("{}", summary.failures.len()).red(),
        format!("{}", summary.ignored).cyan(),
        format!("{}", result.pruned_dirs).cyan(),
    );
}
