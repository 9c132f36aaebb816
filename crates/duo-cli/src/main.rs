//! Terminal controller for Duo, a two-player branching story engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "duo",
    about = "Duo: play branching stories with two players",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a story, report structural problems and summarize it
    Check {
        /// Story file followed by any additional parts
        #[arg(required = true)]
        story: Vec<PathBuf>,

        /// Start node to validate against (default: the story's own)
        #[arg(long)]
        start: Option<String>,
    },

    /// Play a story in the terminal
    Play {
        /// Story file followed by any additional parts
        #[arg(required = true)]
        story: Vec<PathBuf>,

        /// Save file holding slots and unlocked endings
        #[arg(short, long, default_value = "saves.json")]
        saves: PathBuf,

        /// Turn policy: node, round-robin
        #[arg(short, long)]
        turns: Option<String>,

        /// Start node (default: the story's own)
        #[arg(long)]
        start: Option<String>,
    },

    /// Show which endings have been unlocked
    Endings {
        /// Story file followed by any additional parts
        #[arg(required = true)]
        story: Vec<PathBuf>,

        /// Save file holding slots and unlocked endings
        #[arg(short, long, default_value = "saves.json")]
        saves: PathBuf,
    },
}

fn main() {
    // RUST_LOG=info shows story loading and saves, RUST_LOG=debug every turn.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { story, start } => commands::check::run(&story, start.as_deref()),
        Commands::Play {
            story,
            saves,
            turns,
            start,
        } => commands::play::run(&story, &saves, turns.as_deref(), start.as_deref()),
        Commands::Endings { story, saves } => commands::endings::run(&story, &saves),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
