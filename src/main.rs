use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process;

use geolife_clean::config::Config;
use geolife_clean::display::ReportDisplay;
use geolife_clean::logging::init_logging;
use geolife_clean::{CollectOptions, DatasetCollector};

#[derive(Parser)]
#[command(name = "geolife-clean")]
#[command(about = "Collect GeoLife trajectory logs into one cleaned, time-sorted CSV")]
#[command(version)]
struct Cli {
    /// Dataset root containing one directory per user
    root_directory: Option<PathBuf>,

    /// Output CSV path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only print the final summary
    #[arg(short, long)]
    quiet: bool,

    /// Read at most N files per user (0 reads all)
    #[arg(short, long, value_name = "N")]
    limit_files_per_owner: Option<usize>,

    /// Print the final summary as JSON
    #[arg(long)]
    json: bool,

    /// Configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => handle_error(e, cli.json),
    };
    let _log_guard = init_logging(&config.logging);

    let Some(root) = cli
        .root_directory
        .clone()
        .or_else(|| config.collection.root_directory.clone())
    else {
        handle_error(
            anyhow::anyhow!("No root directory given (pass it as an argument or set GEOLIFE_ROOT)"),
            cli.json,
        );
    };

    let mut options = CollectOptions::from_config(&config.collection, root);
    if let Some(output) = cli.output {
        options.output_destination = output;
    }
    if cli.quiet || cli.json {
        options.verbose = false;
    }
    if cli.limit_files_per_owner.is_some() {
        options.limit_files_per_owner = cli.limit_files_per_owner;
    }

    let collector = DatasetCollector::new(&config.dataset).with_display(ReportDisplay::new(cli.json));
    match collector.collect(&options) {
        Ok(_) => Ok(()),
        Err(e) => handle_error(e, cli.json),
    }
}

fn handle_error(e: anyhow::Error, json: bool) -> ! {
    if json {
        println!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
    } else {
        eprintln!("Error: {:#}", e);
    }
    process::exit(1);
}
