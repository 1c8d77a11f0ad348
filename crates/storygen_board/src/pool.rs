//! Bounded concurrent image rendering.

use std::sync::Arc;
use storygen_core::{ImageDataUri, ImageSize, SceneId};
use storygen_error::{RenderError, RenderErrorKind, StorygenResult};
use storygen_interface::ImageRenderer;
use tokio::sync::{Semaphore, oneshot};
use tracing::{Instrument, debug, debug_span};

/// Image requests allowed in flight when nothing else is configured.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 4;

/// Runs render jobs on the tokio runtime, at most `max_in_flight` at a time.
///
/// Each job reports through its own [`RenderTicket`]; jobs finish in any order.
#[derive(Clone)]
pub struct RenderPool {
    renderer: Arc<dyn ImageRenderer>,
    permits: Arc<Semaphore>,
    max_in_flight: usize,
}

/// Pending result of one render job.
#[derive(Debug)]
pub struct RenderTicket {
    scene: SceneId,
    size: ImageSize,
    result: oneshot::Receiver<StorygenResult<ImageDataUri>>,
}

impl RenderPool {
    /// Pool over `renderer`. A limit of zero is raised to one.
    pub fn new(renderer: Arc<dyn ImageRenderer>, max_in_flight: usize) -> Self {
        let max_in_flight = max_in_flight.max(1);
        Self {
            renderer,
            permits: Arc::new(Semaphore::new(max_in_flight)),
            max_in_flight,
        }
    }

    /// Configured concurrency limit.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Jobs currently holding a slot.
    pub fn in_flight(&self) -> usize {
        self.max_in_flight - self.permits.available_permits()
    }

    /// Queue a render of `prompt` at `size` for `scene`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, scene: SceneId, prompt: String, size: ImageSize) -> RenderTicket {
        let (tx, rx) = oneshot::channel();
        let renderer = Arc::clone(&self.renderer);
        let permits = Arc::clone(&self.permits);
        let span = debug_span!("render_job", scene = %scene, size = %size);

        tokio::spawn(
            async move {
                let result = match permits.acquire_owned().await {
                    Ok(_permit) => {
                        debug!("Render slot acquired");
                        renderer.render(&prompt, size).await
                    }
                    Err(_) => Err(RenderError::new(RenderErrorKind::WorkerDropped).into()),
                };
                if tx.send(result).is_err() {
                    debug!("Render result discarded; ticket dropped");
                }
            }
            .instrument(span),
        );

        RenderTicket {
            scene,
            size,
            result: rx,
        }
    }
}

impl std::fmt::Debug for RenderPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderPool")
            .field("max_in_flight", &self.max_in_flight)
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}

impl RenderTicket {
    /// Scene the job renders.
    pub fn scene(&self) -> &SceneId {
        &self.scene
    }

    /// Resolution tier captured at dispatch.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Wait for the job's result.
    pub async fn wait(self) -> StorygenResult<ImageDataUri> {
        self.result
            .await
            .map_err(|_| RenderError::new(RenderErrorKind::WorkerDropped))?
    }
}
