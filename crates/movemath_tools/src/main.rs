//! Movemath - Development Tools

use std::path::Path;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "movemath-tools")]
#[command(about = "Development tools for movement data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate move data files
    Validate {
        /// Path to a data file or a directory of `.ron` files
        #[arg(default_value = "assets/data")]
        path: String,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { path } => {
            tracing::info!("Checking move defs and terrain types in {path}");
            match movemath_tools::validate::validate_path(Path::new(&path)) {
                Ok(reports) => {
                    for report in &reports {
                        tracing::debug!(
                            file = %report.path.display(),
                            move_defs = report.move_defs.len(),
                            terrain_types = report.terrain_types,
                            checksum = report.checksum,
                            "Move data file loaded"
                        );
                        print!("{report}");
                    }
                    let move_defs: usize = reports.iter().map(|r| r.move_defs.len()).sum();
                    tracing::info!(
                        files = reports.len(),
                        move_defs,
                        "All move defs resolved without errors"
                    );
                }
                Err(e) => {
                    tracing::error!("Move data rejected: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}
