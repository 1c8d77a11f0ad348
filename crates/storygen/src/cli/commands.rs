//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use storygen::ImageSize;

/// StoryGen command-line interface.
#[derive(Parser, Debug)]
#[command(name = "storygen")]
#[command(about = "Turn a screenplay into a storyboard with Gemini", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file layered over the bundled defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Segment a script into scenes, render every scene and export the frames
    Analyze {
        /// Path to a .txt or .md screenplay
        #[arg(long, required_unless_present = "sample", conflicts_with = "sample")]
        script: Option<PathBuf>,

        /// Use the bundled three-scene sample script
        #[arg(long)]
        sample: bool,

        /// Resolution tier (1K, 2K or 4K)
        #[arg(long)]
        size: Option<ImageSize>,

        /// Directory for exported frames
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Maximum concurrent image requests
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
        workers: Option<u16>,
    },

    /// Render a single frame from a visual prompt
    Render {
        /// Visual prompt for the image model
        #[arg(short, long)]
        prompt: String,

        /// Resolution tier (1K, 2K or 4K)
        #[arg(long)]
        size: Option<ImageSize>,

        /// Output PNG file
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Talk to the script assistant
    Chat,

    /// Interactive session over one storyboard and chat panel
    Studio {
        /// Path to a .txt or .md screenplay
        #[arg(long, conflicts_with = "sample")]
        script: Option<PathBuf>,

        /// Start from the bundled sample script (the default)
        #[arg(long)]
        sample: bool,
    },
}
