//! Test doubles for the storyboard and chat panel.
#![allow(dead_code)]

mod mock_analyzer;
mod mock_chat;
mod mock_renderer;
mod static_guard;

pub use mock_analyzer::{AnalyzerBehavior, MockAnalyzer};
pub use mock_chat::{ChatBehavior, MockChat};
pub use mock_renderer::{MockRenderer, RenderBehavior};
pub use static_guard::StaticGuard;

use storygen_core::SceneOutline;

/// Outline with every field set.
pub fn outline(number: i64, description: &str, prompt: &str) -> SceneOutline {
    SceneOutline {
        scene_number: Some(number),
        description: Some(description.to_string()),
        visual_prompt: Some(prompt.to_string()),
    }
}

/// The three sample scenes, one per location.
pub fn three_scenes() -> Vec<SceneOutline> {
    vec![
        outline(1, "Hawke grips the controls", "Cockpit bathed in holographic glow"),
        outline(2, "Crash landing in the jungle", "Bioluminescent jungle, smoking wreck"),
        outline(3, "Hawke reaches for the crystal", "Floating crystal pulsing blue light"),
    ]
}
