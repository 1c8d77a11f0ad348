//! Storyboard scenes and the raw outlines they are built from.

use crate::{ImageDataUri, ImageSize};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Description substituted when the analyzer leaves it out.
pub const DEFAULT_DESCRIPTION: &str = "No description provided";

/// Visual prompt substituted when neither a prompt nor a description exists.
pub const DEFAULT_VISUAL_PROMPT: &str = "Abstract scene";

/// Opaque scene identifier, unique per analysis run.
///
/// # Examples
///
/// ```
/// use storygen_core::SceneId;
/// use uuid::Uuid;
///
/// let run = Uuid::new_v4();
/// assert_ne!(SceneId::new(run, 0), SceneId::new(run, 1));
/// assert!(SceneId::new(run, 0).as_str().starts_with("scene-"));
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SceneId(String);

impl SceneId {
    /// Build the identifier for the scene at `index` in analysis run `run`.
    pub fn new(run: Uuid, index: usize) -> Self {
        Self(format!("scene-{}-{}", run.simple(), index))
    }

    /// Identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One scene descriptor as emitted by the segmentation model.
///
/// Every field is optional here; [`Scene::from_outline`] fills the gaps.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneOutline {
    /// Scene number chosen by the model
    pub scene_number: Option<i64>,
    /// Brief description of the action
    pub description: Option<String>,
    /// Detailed prompt for the image model
    pub visual_prompt: Option<String>,
}

/// A storyboard scene and the state of its image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Stable identity across regenerations
    pub id: SceneId,
    /// Positive scene number
    pub scene_number: u32,
    /// What happens in the scene
    pub description: String,
    /// Prompt sent to the image model
    pub visual_prompt: String,
    /// Rendered frame, once available
    pub generated_image_url: Option<ImageDataUri>,
    /// Resolution tier that produced `generated_image_url`
    pub rendered_size: Option<ImageSize>,
    /// An image request is in flight
    pub is_loading: bool,
    /// Message from the last failed render
    pub error: Option<String>,
}

impl Scene {
    /// Build a scene from an analyzer outline, substituting defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use storygen_core::{Scene, SceneId, SceneOutline};
    /// use uuid::Uuid;
    ///
    /// let outline = SceneOutline {
    ///     scene_number: None,
    ///     description: Some("Hawke grips the controls".to_string()),
    ///     visual_prompt: None,
    /// };
    /// let scene = Scene::from_outline(SceneId::new(Uuid::new_v4(), 4), 4, outline);
    /// assert_eq!(scene.scene_number, 5);
    /// assert_eq!(scene.visual_prompt, "Hawke grips the controls");
    /// ```
    pub fn from_outline(id: SceneId, position: usize, outline: SceneOutline) -> Self {
        let fallback_number = u32::try_from(position + 1).unwrap_or(u32::MAX);
        let scene_number = outline
            .scene_number
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n > 0)
            .unwrap_or(fallback_number);

        let description = non_blank(outline.description);
        let visual_prompt = non_blank(outline.visual_prompt)
            .or_else(|| description.clone())
            .unwrap_or_else(|| DEFAULT_VISUAL_PROMPT.to_string());

        Self {
            id,
            scene_number,
            description: description.unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            visual_prompt,
            generated_image_url: None,
            rendered_size: None,
            is_loading: false,
            error: None,
        }
    }

    /// Mark an image request as dispatched.
    ///
    /// A previously rendered image stays visible until the new one lands.
    pub fn begin_render(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Record a successful render.
    pub fn finish_render(&mut self, image: ImageDataUri, size: ImageSize) {
        self.is_loading = false;
        self.error = None;
        self.generated_image_url = Some(image);
        self.rendered_size = Some(size);
    }

    /// Record a failed render.
    pub fn fail_render(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.is_loading = false;
        self.error = Some(if message.trim().is_empty() {
            "Generation failed".to_string()
        } else {
            message
        });
    }

    /// True once an image is available.
    pub fn has_image(&self) -> bool {
        self.generated_image_url.is_some()
    }

    /// File name used when the image is exported.
    pub fn export_file_name(&self) -> String {
        format!("storyboard-scene-{}.png", self.scene_number)
    }
}

/// Turn an ordered list of outlines into fresh scenes sharing one run id.
pub fn assemble_scenes(outlines: Vec<SceneOutline>) -> Vec<Scene> {
    let run = Uuid::new_v4();
    outlines
        .into_iter()
        .enumerate()
        .map(|(index, outline)| Scene::from_outline(SceneId::new(run, index), index, outline))
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
