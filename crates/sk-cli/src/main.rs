//! Terminal frontend for the Skein story engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sk",
    about = "Skein: play and check branching interactive fiction",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine activity to stderr (overrides SKEIN_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a story interactively
    Play {
        /// Story file (JSON)
        file: PathBuf,

        /// RNG seed for `random()` in templates (default: the story's)
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Validate a story: configuration, templates, and links
    Check {
        /// Story file (JSON)
        file: PathBuf,
    },

    /// List the passages of a story
    List {
        /// Story file (JSON)
        file: PathBuf,

        /// Only show passages with this tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Render a passage as the player would first see it
    Show {
        /// Story file (JSON)
        file: PathBuf,

        /// Passage name (default: the start passage)
        passage: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("SKEIN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Play { file, seed } => commands::play::run(&file, seed),
        Commands::Check { file } => commands::check::run(&file),
        Commands::List { file, tag } => commands::list::run(&file, tag.as_deref()),
        Commands::Show { file, passage } => commands::show::run(&file, passage.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
