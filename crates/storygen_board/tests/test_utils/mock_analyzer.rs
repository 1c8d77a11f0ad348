//! Mock script analyzer.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storygen_core::SceneOutline;
use storygen_error::{AnalysisError, AnalysisErrorKind, StorygenResult};
use storygen_interface::ScriptAnalyzer;

/// What the analyzer returns.
#[derive(Debug, Clone)]
pub enum AnalyzerBehavior {
    /// Return these outlines
    Success(Vec<SceneOutline>),
    /// Fail with this error kind
    Error(AnalysisErrorKind),
    /// Return these outlines after a delay
    Slow(Vec<SceneOutline>, Duration),
}

/// Analyzer returning a scripted result and counting calls.
#[derive(Debug, Clone)]
pub struct MockAnalyzer {
    behavior: AnalyzerBehavior,
    call_count: Arc<Mutex<usize>>,
}

impl MockAnalyzer {
    pub fn new(behavior: AnalyzerBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn new_success(outlines: Vec<SceneOutline>) -> Self {
        Self::new(AnalyzerBehavior::Success(outlines))
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl ScriptAnalyzer for MockAnalyzer {
    async fn analyze_script(&self, _script: &str) -> StorygenResult<Vec<SceneOutline>> {
        *self.call_count.lock().unwrap() += 1;
        match &self.behavior {
            AnalyzerBehavior::Success(outlines) => Ok(outlines.clone()),
            AnalyzerBehavior::Error(kind) => Err(AnalysisError::new(kind.clone()).into()),
            AnalyzerBehavior::Slow(outlines, delay) => {
                tokio::time::sleep(*delay).await;
                Ok(outlines.clone())
            }
        }
    }
}
