//! Mock image renderer.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storygen_core::{ImageDataUri, ImageSize};
use storygen_error::{RenderError, RenderErrorKind, StorygenResult};
use storygen_interface::ImageRenderer;

/// How the renderer answers one prompt.
#[derive(Debug, Clone)]
pub enum RenderBehavior {
    /// Succeed after `delay`
    Succeed(Duration),
    /// Fail after `delay`
    Fail(Duration),
    /// Fail the first `fail_count` calls, then succeed
    FailThenSucceed { fail_count: usize },
    /// Succeed the first `succeed_count` calls, then fail
    SucceedThenFail { succeed_count: usize },
}

#[derive(Debug, Default)]
struct RendererState {
    calls: Vec<(String, ImageSize)>,
    attempts: HashMap<String, usize>,
    in_flight: usize,
    peak: usize,
}

/// Renderer with per-prompt scripted behavior.
///
/// Images encode the prompt and size so tests can tell renders apart.
#[derive(Debug, Clone, Default)]
pub struct MockRenderer {
    behaviors: HashMap<String, RenderBehavior>,
    default_delay: Duration,
    state: Arc<Mutex<RendererState>>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every prompt without its own behavior succeeds after `delay`.
    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn with(mut self, prompt: impl Into<String>, behavior: RenderBehavior) -> Self {
        self.behaviors.insert(prompt.into(), behavior);
        self
    }

    pub fn calls(&self) -> Vec<(String, ImageSize)> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    /// Highest number of renders observed running at once.
    pub fn peak_in_flight(&self) -> usize {
        self.state.lock().unwrap().peak
    }

    /// Image the renderer produces for `prompt` at `size`.
    pub fn image_for(prompt: &str, size: ImageSize) -> ImageDataUri {
        let tag: String = format!("{}{}", prompt, size)
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        ImageDataUri::png(tag)
    }
}

#[async_trait]
impl ImageRenderer for MockRenderer {
    async fn render(&self, prompt: &str, size: ImageSize) -> StorygenResult<ImageDataUri> {
        let attempt = {
            let mut state = self.state.lock().unwrap();
            state.calls.push((prompt.to_string(), size));
            state.in_flight += 1;
            state.peak = state.peak.max(state.in_flight);
            let attempt = state.attempts.entry(prompt.to_string()).or_insert(0);
            *attempt += 1;
            *attempt
        };

        let behavior = self
            .behaviors
            .get(prompt)
            .cloned()
            .unwrap_or(RenderBehavior::Succeed(self.default_delay));

        let succeed = match behavior {
            RenderBehavior::Succeed(delay) => {
                tokio::time::sleep(delay).await;
                true
            }
            RenderBehavior::Fail(delay) => {
                tokio::time::sleep(delay).await;
                false
            }
            RenderBehavior::FailThenSucceed { fail_count } => attempt > fail_count,
            RenderBehavior::SucceedThenFail { succeed_count } => attempt <= succeed_count,
        };

        self.state.lock().unwrap().in_flight -= 1;

        if succeed {
            Ok(Self::image_for(prompt, size))
        } else {
            Err(RenderError::new(RenderErrorKind::Generation("mock endpoint failure".into())).into())
        }
    }
}
