//! Script segmentation with structured JSON output.

use crate::gemini::GeminiClient;
use crate::gemini::dto::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use async_trait::async_trait;
use serde_json::json;
use storygen_core::SceneOutline;
use storygen_error::{
    AnalysisError, AnalysisErrorKind, GeminiError, GeminiErrorKind, StorygenResult,
};
use storygen_interface::ScriptAnalyzer;
use tracing::{debug, info, instrument};

/// Instruction placed before the script text.
pub const ANALYSIS_PROMPT: &str = "Analyze the following movie script and break it down into key visual scenes for a storyboard. For each scene, provide a 'sceneNumber', a brief 'description' of the action, and a detailed 'visualPrompt' optimized for an AI image generator. The 'visualPrompt' should describe the composition, lighting, camera angle, and subject details vividly.";

/// Full segmentation prompt for `script`.
pub fn analysis_prompt(script: &str) -> String {
    format!("{}\n\nScript:\n{}", ANALYSIS_PROMPT, script)
}

/// Response schema: an array of scene objects with every field required.
pub fn scene_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "sceneNumber": { "type": "INTEGER" },
                "description": { "type": "STRING" },
                "visualPrompt": { "type": "STRING" }
            },
            "required": ["sceneNumber", "description", "visualPrompt"]
        }
    })
}

/// Decode a segmentation response into scene outlines.
///
/// Never returns a partial list: any structural mismatch fails the whole
/// payload, as does an empty array.
pub fn parse_outlines(response: &GenerateContentResponse) -> StorygenResult<Vec<SceneOutline>> {
    let text = response
        .text()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AnalysisError::new(AnalysisErrorKind::EmptyResponse))?;

    let outlines: Vec<SceneOutline> = serde_json::from_str(text.trim())
        .map_err(|e| AnalysisError::new(AnalysisErrorKind::Parse(e.to_string())))?;

    if outlines.is_empty() {
        return Err(AnalysisError::new(AnalysisErrorKind::Parse(
            "response contained no scenes".to_string(),
        ))
        .into());
    }

    Ok(outlines)
}

fn analysis_request(script: &str) -> StorygenResult<GenerateContentRequest> {
    let generation_config = GenerationConfig::builder()
        .response_mime_type("application/json")
        .response_schema(scene_schema())
        .build()
        .map_err(|e| GeminiError::new(GeminiErrorKind::Builder(e.to_string())))?;

    Ok(GenerateContentRequest::builder()
        .contents(vec![Content::user(analysis_prompt(script))])
        .generation_config(generation_config)
        .build()
        .map_err(|e| GeminiError::new(GeminiErrorKind::Builder(e.to_string())))?)
}

#[async_trait]
impl ScriptAnalyzer for GeminiClient {
    #[instrument(skip(self, script), fields(model = %self.analysis_model(), chars = script.len()))]
    async fn analyze_script(&self, script: &str) -> StorygenResult<Vec<SceneOutline>> {
        if script.trim().is_empty() {
            return Err(AnalysisError::new(AnalysisErrorKind::EmptyScript).into());
        }

        let request = analysis_request(script)?;
        debug!("Requesting scene segmentation");
        let response = self.generate_content(self.analysis_model(), &request).await?;
        let outlines = parse_outlines(&response)?;

        info!(scenes = outlines.len(), "Script segmented");
        Ok(outlines)
    }
}
