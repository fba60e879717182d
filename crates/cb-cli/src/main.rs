//! CLI frontend for Casebook detective cases.

mod commands;
mod render;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "casebook",
    about = "Casebook: play and check consulting-detective casebooks",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a case interactively
    Play {
        /// Case directory holding locations.json and caseIntro.json
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Engine configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate case data and report problems
    Check {
        /// Case directory holding locations.json and caseIntro.json
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Engine configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List locations grouped by district
    List {
        /// Only list this district (e.g. NW, WC)
        district: Option<String>,

        /// Case directory holding locations.json and caseIntro.json
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Engine configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show what a first visit to an address looks like
    Show {
        /// Address to preview (e.g. "22 NW")
        address: String,

        /// Print the render result as JSON
        #[arg(long)]
        json: bool,

        /// Case directory holding locations.json and caseIntro.json
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Engine configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play { dir, config } => commands::play::run(&dir, config.as_deref()),
        Commands::Check { dir, config } => commands::check::run(&dir, config.as_deref()),
        Commands::List {
            district,
            dir,
            config,
        } => commands::list::run(&dir, config.as_deref(), district.as_deref()),
        Commands::Show {
            address,
            json,
            dir,
            config,
        } => commands::show::run(&dir, config.as_deref(), &address, json),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
