//! Script input and storyboard image export for StoryGen.
//!
//! - [`read_script`] loads a screenplay from a local text or markdown file
//! - [`ImageExporter`] writes rendered frames as `storyboard-scene-<n>.png`

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod export;
mod script;

pub use export::{ExportReport, ImageExporter};
pub use script::{SAMPLE_SCRIPT, SCRIPT_EXTENSIONS, read_script};
