//! Screenplay input.

use std::path::Path;
use storygen_error::{StorageError, StorageErrorKind, StorygenResult};
use tracing::{debug, instrument, warn};

/// File extensions offered for script upload.
pub const SCRIPT_EXTENSIONS: &[&str] = &["txt", "md"];

/// Three-scene screenplay preloaded for first-time use.
pub const SAMPLE_SCRIPT: &str = "SCENE 1
INT. SPACESHIP COCKPIT - NIGHT

The cockpit is bathed in the soft glow of holographic displays. COMMANDER HAWKE (40s, rugged) grips the controls. Outside, a nebula swirls in hues of violet and gold.

HAWKE
Hold on, we're going in.

The ship shudders violently.

SCENE 2
EXT. ALIEN PLANET - DAY

The ship crash lands in a dense jungle of bioluminescent flora. Smoke rises from the wreckage. Strange, multi-winged birds take flight.

SCENE 3
INT. ANCIENT RUINS - NIGHT

Hawke explores a cavernous stone temple. A floating crystal artifact pulses with blue light in the center of the room. He reaches out to touch it.";

/// Read the whole file at `path` as the script text, verbatim.
///
/// # Errors
///
/// Fails when the file cannot be read or is not valid UTF-8.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub async fn read_script(path: impl AsRef<Path>) -> StorygenResult<String> {
    let path = path.as_ref();

    let known = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SCRIPT_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)));
    if !known {
        warn!("Script file is not .txt or .md; reading it as text anyway");
    }

    let bytes = tokio::fs::read(path).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", path.display(), e)))
    })?;

    let script = String::from_utf8(bytes).map_err(|e| {
        StorageError::new(StorageErrorKind::InvalidText(format!(
            "{}: {}",
            path.display(),
            e
        )))
    })?;

    debug!(chars = script.len(), "Loaded script");
    Ok(script)
}
