//! One-shot storyboard generation.

use std::path::PathBuf;
use std::sync::Arc;
use storygen::{
    ImageSize, SAMPLE_SCRIPT, Scene, StorygenConfig, StorygenResult, Studio, StudioOptions,
    read_script,
};
use tracing::{info, warn};

use super::{ConsoleInput, TerminalKeyPrompt};

/// Arguments of the `analyze` command.
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    pub script: Option<PathBuf>,
    pub size: Option<ImageSize>,
    pub out: Option<PathBuf>,
    pub workers: Option<usize>,
}

/// Load the script at `path`, or the bundled sample when `path` is `None`.
pub async fn load_script(path: Option<&PathBuf>) -> StorygenResult<String> {
    match path {
        Some(path) => read_script(path).await,
        None => {
            info!("Using bundled sample script");
            Ok(SAMPLE_SCRIPT.to_string())
        }
    }
}

/// Analyze a script, render every scene and export the finished frames.
pub async fn run_analyze(
    config: StorygenConfig,
    args: AnalyzeArgs,
    input: ConsoleInput,
) -> StorygenResult<()> {
    let script = load_script(args.script.as_ref()).await?;

    let options = StudioOptions {
        size: args.size,
        max_in_flight: args.workers,
        export_dir: args.out,
    };
    let studio = Studio::open(config, Arc::new(TerminalKeyPrompt::new(input)), options).await?;
    studio.ensure_credential().await?;

    let board = studio.board();
    let batch = board.analyze(&script).await?;
    println!(
        "Segmented script into {} scenes, rendering at {}...",
        batch.len(),
        board.size()
    );
    batch.join().await;

    let scenes = board.snapshot();
    let report = studio.exporter().export_all(&scenes).await?;

    print_summary(&scenes);
    println!(
        "\nExported {} of {} frames to {}",
        report.written.len(),
        scenes.len(),
        studio.exporter().dir().display()
    );
    if !report.skipped.is_empty() {
        warn!(skipped = ?report.skipped, "Some scenes have no image");
    }
    Ok(())
}

/// Print one line per scene with its render status.
pub fn print_summary(scenes: &[Scene]) {
    for scene in scenes {
        println!("{}", scene_line(scene));
    }
}

pub fn scene_line(scene: &Scene) -> String {
    let status = match (&scene.error, scene.is_loading, scene.rendered_size) {
        (_, true, _) => "rendering".to_string(),
        (Some(error), false, _) => format!("failed: {}", error),
        (None, false, Some(size)) => format!("ready ({})", size),
        (None, false, None) => "pending".to_string(),
    };
    format!(
        "Scene {:>2} [{}] {}",
        scene.scene_number, status, scene.description
    )
}
