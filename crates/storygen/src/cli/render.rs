//! Single frame rendering.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use storygen::{
    ImageExporter, ImageRenderer, ImageSize, StorageError, StorageErrorKind, StorygenConfig,
    StorygenResult, Studio, StudioOptions,
};
use tracing::info;

use super::{ConsoleInput, TerminalKeyPrompt};

/// Render `prompt` once and write the PNG to `out`.
pub async fn run_render(
    config: StorygenConfig,
    prompt: String,
    size: Option<ImageSize>,
    out: PathBuf,
    input: ConsoleInput,
) -> StorygenResult<()> {
    let options = StudioOptions {
        size,
        ..StudioOptions::default()
    };
    let studio = Studio::open(config, Arc::new(TerminalKeyPrompt::new(input)), options).await?;
    studio.ensure_credential().await?;

    let size = studio.board().size();
    info!(%size, "Rendering frame");
    let image = studio.client().render(&prompt, size).await?;

    let (dir, file_name) = split_output(&out)?;
    let path = ImageExporter::new(dir).export_image(&file_name, &image).await?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn split_output(out: &Path) -> StorygenResult<(PathBuf, String)> {
    let file_name = out
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{} does not name a file",
                out.display()
            )))
        })?;
    let dir = match out.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, file_name.to_string()))
}
