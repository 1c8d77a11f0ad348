//! Scene list state and the analyze/render flow.

use crate::{CredentialGate, RenderPool};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use storygen_core::{ImageDataUri, ImageSize, Scene, SceneId, assemble_scenes};
use storygen_error::{
    AnalysisError, AnalysisErrorKind, RenderError, RenderErrorKind, StorygenError,
    StorygenErrorKind, StorygenResult,
};
use storygen_interface::ScriptAnalyzer;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Message stored on a scene whose render failed for a non-render reason.
const GENERIC_FAILURE: &str = "Generation failed";

/// The storyboard: scenes from the last analysis and their images.
///
/// Clones share state, so completion tasks and observers all see the same
/// board.
#[derive(Clone)]
pub struct Storyboard {
    inner: Arc<BoardInner>,
}

struct BoardInner {
    analyzer: Arc<dyn ScriptAnalyzer>,
    pool: RenderPool,
    gate: CredentialGate,
    scenes: watch::Sender<Arc<Vec<Scene>>>,
    size: watch::Sender<ImageSize>,
    analyzing: AtomicBool,
    dispatches: AtomicU64,
    // Latest dispatch per scene; older completions are ignored.
    latest: Mutex<HashMap<SceneId, u64>>,
}

/// Render jobs dispatched together.
#[derive(Debug)]
pub struct RenderBatch {
    scenes: Vec<SceneId>,
    tasks: Vec<JoinHandle<()>>,
}

impl RenderBatch {
    /// Scenes covered by the batch, in dispatch order.
    pub fn scene_ids(&self) -> &[SceneId] {
        &self.scenes
    }

    /// Number of jobs.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// True when nothing was dispatched.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Wait until every job has been applied to the board.
    pub async fn join(self) {
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "Render completion task failed");
            }
        }
    }
}

/// One scene render waiting to be submitted.
struct RenderJob {
    id: SceneId,
    prompt: String,
    dispatch: u64,
}

/// Resets the in-progress flag however the analysis ends.
struct AnalyzingFlag<'a>(&'a AtomicBool);

impl Drop for AnalyzingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Storyboard {
    /// Empty storyboard rendering at `size`.
    pub fn new(
        analyzer: Arc<dyn ScriptAnalyzer>,
        pool: RenderPool,
        gate: CredentialGate,
        size: ImageSize,
    ) -> Self {
        Self {
            inner: Arc::new(BoardInner {
                analyzer,
                pool,
                gate,
                scenes: watch::Sender::new(Arc::new(Vec::new())),
                size: watch::Sender::new(size),
                analyzing: AtomicBool::new(false),
                dispatches: AtomicU64::new(0),
                latest: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Current scene list.
    pub fn snapshot(&self) -> Arc<Vec<Scene>> {
        self.inner.scenes.borrow().clone()
    }

    /// Watch the scene list.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Scene>>> {
        self.inner.scenes.subscribe()
    }

    /// Scene with `id`, if it is on the board.
    pub fn scene(&self, id: &SceneId) -> Option<Scene> {
        self.inner.scenes.borrow().iter().find(|s| &s.id == id).cloned()
    }

    /// Scene with the given number, if any.
    pub fn scene_by_number(&self, number: u32) -> Option<Scene> {
        self.inner
            .scenes
            .borrow()
            .iter()
            .find(|s| s.scene_number == number)
            .cloned()
    }

    /// Resolution used for the next dispatched image.
    pub fn size(&self) -> ImageSize {
        *self.inner.size.borrow()
    }

    /// Select the resolution for subsequent renders. In-flight jobs keep theirs.
    pub fn set_size(&self, size: ImageSize) {
        let previous = self.inner.size.send_replace(size);
        if previous != size {
            info!(from = %previous, to = %size, "Image size changed");
        }
    }

    /// True while an analysis is running.
    pub fn is_analyzing(&self) -> bool {
        self.inner.analyzing.load(Ordering::SeqCst)
    }

    /// The credential gate guarding this board.
    pub fn gate(&self) -> &CredentialGate {
        &self.inner.gate
    }

    /// Segment `script` into scenes and render every one of them.
    ///
    /// The previous scene list is cleared before the analyzer is called. On
    /// success the new scenes are published already loading, and the returned
    /// batch tracks their renders.
    ///
    /// # Errors
    ///
    /// - credential error when the gate is closed (no request is made)
    /// - [`AnalysisErrorKind::EmptyScript`] for blank input (no request is made)
    /// - [`AnalysisErrorKind::InProgress`] while another analysis runs
    /// - whatever the analyzer fails with
    #[instrument(skip(self, script), fields(chars = script.len()))]
    pub async fn analyze(&self, script: &str) -> StorygenResult<RenderBatch> {
        self.inner.gate.require()?;
        if script.trim().is_empty() {
            return Err(AnalysisError::new(AnalysisErrorKind::EmptyScript).into());
        }
        if self.inner.analyzing.swap(true, Ordering::SeqCst) {
            return Err(AnalysisError::new(AnalysisErrorKind::InProgress).into());
        }
        let _flag = AnalyzingFlag(&self.inner.analyzing);

        self.inner.scenes.send_replace(Arc::new(Vec::new()));
        self.lock_latest().clear();

        let outlines = self.inner.analyzer.analyze_script(script).await?;
        let mut scenes = assemble_scenes(outlines);
        for scene in &mut scenes {
            scene.begin_render();
        }
        info!(scenes = scenes.len(), "Storyboard assembled");

        let jobs = {
            let mut latest = self.lock_latest();
            let jobs: Vec<RenderJob> = scenes
                .iter()
                .map(|s| self.register(&mut latest, &s.id, &s.visual_prompt))
                .collect();
            self.inner.scenes.send_replace(Arc::new(scenes));
            jobs
        };

        Ok(self.dispatch(jobs))
    }

    /// Render the scene with `id` again at the current size.
    ///
    /// The scene keeps its id, number, and current image until the new one
    /// arrives; a failure leaves the old image in place.
    #[instrument(skip(self), fields(scene = %id))]
    pub async fn regenerate(&self, id: &SceneId) -> StorygenResult<RenderBatch> {
        self.inner.gate.require()?;

        // The loading flag and the new epoch land together, so an older
        // completion can never clear the flag of this render.
        let job = {
            let mut latest = self.lock_latest();
            let mut prompt = None;
            self.inner.scenes.send_if_modified(|scenes| {
                let Some(index) = scenes.iter().position(|s| &s.id == id) else {
                    return false;
                };
                let scene = &mut Arc::make_mut(scenes)[index];
                scene.begin_render();
                prompt = Some(scene.visual_prompt.clone());
                true
            });
            prompt.map(|prompt| self.register(&mut latest, id, &prompt))
        };

        let job =
            job.ok_or_else(|| RenderError::new(RenderErrorKind::UnknownScene(id.to_string())))?;
        Ok(self.dispatch(vec![job]))
    }

    /// Record a new dispatch epoch for `id`. Callers hold the `latest` lock
    /// while they publish the matching loading state.
    fn register(
        &self,
        latest: &mut HashMap<SceneId, u64>,
        id: &SceneId,
        prompt: &str,
    ) -> RenderJob {
        let dispatch = self.inner.dispatches.fetch_add(1, Ordering::SeqCst);
        latest.insert(id.clone(), dispatch);
        RenderJob {
            id: id.clone(),
            prompt: prompt.to_string(),
            dispatch,
        }
    }

    fn dispatch(&self, jobs: Vec<RenderJob>) -> RenderBatch {
        let size = self.size();
        let mut batch = RenderBatch {
            scenes: Vec::with_capacity(jobs.len()),
            tasks: Vec::with_capacity(jobs.len()),
        };

        for RenderJob {
            id,
            prompt,
            dispatch,
        } in jobs
        {
            let ticket = self.inner.pool.submit(id.clone(), prompt, size);
            let board = self.clone();
            let scene = id.clone();
            batch.tasks.push(tokio::spawn(async move {
                let size = ticket.size();
                let result = ticket.wait().await;
                board.complete(&scene, dispatch, size, result);
            }));
            batch.scenes.push(id);
        }

        debug!(jobs = batch.len(), size = %size, "Render jobs dispatched");
        batch
    }

    fn complete(
        &self,
        id: &SceneId,
        dispatch: u64,
        size: ImageSize,
        result: StorygenResult<ImageDataUri>,
    ) {
        let mut latest = self.lock_latest();
        if latest.get(id) != Some(&dispatch) {
            debug!(scene = %id, "Discarding superseded render result");
            return;
        }
        latest.remove(id);

        let applied = self.inner.scenes.send_if_modified(|scenes| {
            let Some(index) = scenes.iter().position(|s| &s.id == id) else {
                return false;
            };
            let scene = &mut Arc::make_mut(scenes)[index];
            match &result {
                Ok(image) => scene.finish_render(image.clone(), size),
                Err(e) => scene.fail_render(failure_message(e)),
            }
            true
        });
        drop(latest);

        match (&result, applied) {
            (_, false) => debug!(scene = %id, "Scene no longer on the board"),
            (Ok(_), true) => info!(scene = %id, size = %size, "Scene image ready"),
            (Err(e), true) => warn!(scene = %id, error = %e, "Scene image failed"),
        }
    }

    fn lock_latest(&self) -> std::sync::MutexGuard<'_, HashMap<SceneId, u64>> {
        self.inner.latest.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Short message for a scene card.
fn failure_message(err: &StorygenError) -> String {
    match err.kind() {
        StorygenErrorKind::Render(render) => render.kind.to_string(),
        _ => GENERIC_FAILURE.to_string(),
    }
}

impl std::fmt::Debug for Storyboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storyboard")
            .field("scenes", &self.inner.scenes.borrow().len())
            .field("size", &self.size())
            .field("analyzing", &self.is_analyzing())
            .field("pool", &self.inner.pool)
            .finish_non_exhaustive()
    }
}
