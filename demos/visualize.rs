//! Reads a visualization document and writes one DOT file per graph and step.
//!
//! ```bash
//! cargo run --example visualize -- input.json out/
//! dot -Tsvg -O out/*.dot
//! ```

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};

use tdvisu_rs::visualization::Visualization;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Input JSON document.
    #[arg(value_name = "FILE")]
    infile: PathBuf,

    /// Folder for the generated `.dot` files (created if missing).
    #[arg(value_name = "DIR")]
    outfolder: PathBuf,

    /// Print the snapshots to stdout instead of writing files.
    #[clap(long)]
    dry_run: bool,

    /// Log debug messages.
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let json = fs::read_to_string(&args.infile)?;
    let visualization = Visualization::from_json(&json)?;
    for rejected in visualization.rejected() {
        warn!("Graph '{}' was skipped: {}", rejected.name, rejected.error);
    }
    info!("Graphs: {}", visualization.graph_names().join(", "));

    if !args.dry_run {
        fs::create_dir_all(&args.outfolder)?;
    }

    let mut written = 0;
    for step in visualization.snapshots() {
        for (file, snapshot) in step.files() {
            if args.dry_run {
                println!("// {}.dot", file);
                println!("{}", snapshot);
            } else {
                fs::write(args.outfolder.join(format!("{}.dot", file)), snapshot.to_dot())?;
            }
            written += 1;
        }
    }

    info!(
        "Produced {} snapshots for {} steps in {:.3} s",
        written,
        visualization.timeline().len(),
        time_total.elapsed().as_secs_f64()
    );
    Ok(())
}
