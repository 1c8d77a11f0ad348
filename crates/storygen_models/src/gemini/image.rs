//! Scene image synthesis.

use crate::gemini::GeminiClient;
use crate::gemini::dto::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ImageConfig,
};
use async_trait::async_trait;
use storygen_core::{ImageDataUri, ImageSize, STORYBOARD_ASPECT_RATIO};
use storygen_error::{
    GeminiError, GeminiErrorKind, RenderError, RenderErrorKind, StorygenError, StorygenErrorKind,
    StorygenResult,
};
use storygen_interface::ImageRenderer;
use tracing::{debug, instrument, warn};

/// Request for a single 16:9 frame of `prompt` at `size`.
pub fn image_request(prompt: &str, size: ImageSize) -> StorygenResult<GenerateContentRequest> {
    let generation_config = GenerationConfig::builder()
        .image_config(ImageConfig::new(size, STORYBOARD_ASPECT_RATIO))
        .build()
        .map_err(|e| GeminiError::new(GeminiErrorKind::Builder(e.to_string())))?;

    Ok(GenerateContentRequest::builder()
        .contents(vec![Content::user(prompt)])
        .generation_config(generation_config)
        .build()
        .map_err(|e| GeminiError::new(GeminiErrorKind::Builder(e.to_string())))?)
}

/// First inline image of the first candidate, as a PNG data URI.
pub fn extract_image(response: &GenerateContentResponse) -> Result<ImageDataUri, RenderError> {
    response
        .first_content()
        .and_then(|content| {
            content
                .parts()
                .iter()
                .filter_map(|part| part.inline_data().as_ref())
                .find(|inline| !inline.data().is_empty())
        })
        .map(|inline| ImageDataUri::png(inline.data()))
        .ok_or_else(|| RenderError::new(RenderErrorKind::NoImageData))
}

/// Collapse transport failures into a render error; keep render errors as they are.
fn as_render_error(err: StorygenError) -> StorygenError {
    match err.kind() {
        StorygenErrorKind::Render(_) => err,
        _ => RenderError::new(RenderErrorKind::Generation(err.to_string())).into(),
    }
}

#[async_trait]
impl ImageRenderer for GeminiClient {
    #[instrument(skip(self, prompt), fields(model = %self.image_model(), size = %size))]
    async fn render(&self, prompt: &str, size: ImageSize) -> StorygenResult<ImageDataUri> {
        let request = image_request(prompt, size)?;
        debug!("Requesting scene image");

        let response = self
            .generate_content(self.image_model(), &request)
            .await
            .map_err(as_render_error)?;

        extract_image(&response).map_err(|e| {
            warn!(error = %e, "Image response carried no inline data");
            e.into()
        })
    }
}
