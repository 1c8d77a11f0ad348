//! StoryGen CLI binary.
//!
//! This binary provides command-line access to StoryGen:
//! - Segment a screenplay, render every scene and export the frames
//! - Render a single frame from a prompt
//! - Chat with the script assistant
//! - Work interactively in the studio shell

use clap::Parser;
use storygen::{StorygenConfig, TracingOptions, init_tracing};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{
        AnalyzeArgs, Cli, Commands, ConsoleInput, run_analyze, run_chat, run_render, run_studio,
    };

    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(TracingOptions {
        verbose: cli.verbose,
        json: cli.json_logs,
    })?;

    let config = match &cli.config {
        Some(path) => StorygenConfig::from_file(path)?,
        None => StorygenConfig::load()?,
    };
    let input = ConsoleInput::new();

    // Execute the requested command
    let result = match cli.command {
        Commands::Analyze {
            script,
            sample: _,
            size,
            out,
            workers,
        } => {
            let args = AnalyzeArgs {
                script,
                size,
                out,
                workers: workers.map(usize::from),
            };
            run_analyze(config, args, input).await
        }

        Commands::Render { prompt, size, out } => {
            run_render(config, prompt, size, out, input).await
        }

        Commands::Chat => run_chat(config, input).await,

        Commands::Studio { script, sample: _ } => run_studio(config, script, input).await,
    };

    #[cfg(feature = "observability")]
    storygen::shutdown_tracing();

    result?;
    Ok(())
}
