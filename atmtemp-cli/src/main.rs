//! Command-line driver for atmospheric temperature profiles.
//!
//! ```sh
//! atmtemp-cli run atmosphere.toml
//! atmtemp-cli validate atmosphere.toml
//! atmtemp-cli defaults > atmosphere.toml
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "atmtemp-cli")]
#[command(about = "Radiative-equilibrium temperature profile of a grey atmosphere")]
#[command(version)]
struct Cli {
    /// Log solver details (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the atmosphere described by a TOML configuration file.
    Run {
        /// Path to the configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also write the optical depth of every layer.
        #[arg(long)]
        with_optical_depth: bool,
    },
    /// Validate a configuration file without solving.
    Validate {
        /// Path to the configuration file.
        config: PathBuf,
    },
    /// Print the default configuration as TOML.
    Defaults,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Run {
            config,
            output,
            with_optical_depth,
        } => {
            let run = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let profile = runner::run_model(&run)?;
            if let Some(surface) = profile.surface_temperature() {
                println!(
                    "Surface temperature: {:.2} K over {} levels",
                    surface,
                    profile.nlayer()
                );
            }

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&run.output.directory));
            let written = runner::export(
                &profile,
                &out_dir,
                with_optical_depth || run.output.save_optical_depth,
            )?;
            for path in written {
                println!("Wrote {}", path.display());
            }
            Ok(())
        }
        Commands::Validate { config } => {
            config::load_config(&config)?;
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
        Commands::Defaults => {
            print!("{}", config::Configuration::default().to_toml()?);
            Ok(())
        }
    }
}
