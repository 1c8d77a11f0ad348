//! Configuration sections and loading.

use config::{Config, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use storygen_core::ImageSize;
use storygen_error::{ConfigError, StorygenError, StorygenResult};
use tracing::{debug, instrument};

/// Bundled default configuration.
pub const DEFAULT_CONFIG: &str = include_str!("../../../storygen.toml");

/// Endpoint and credential lookup settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ApiSettings {
    /// Base URL of the Gemini REST API, without trailing slash
    base_url: String,
    /// Environment variables consulted, in order, for an API key
    key_env: Vec<String>,
}

/// Model identifiers for each capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ModelSettings {
    /// Script segmentation model
    analysis: String,
    /// Image synthesis model
    image: String,
    /// Chat assistant model
    chat: String,
}

/// Image rendering settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RenderSettings {
    /// Resolution tier selected at startup
    default_size: ImageSize,
    /// Upper bound on concurrent image requests
    max_in_flight: usize,
}

/// Chat assistant persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChatSettings {
    /// System instruction fixed for every session
    system_instruction: String,
    /// First transcript message shown to the user
    greeting: String,
}

/// Image export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ExportSettings {
    /// Directory exported frames are written to
    dir: PathBuf,
}

/// Top-level StoryGen configuration.
///
/// # Example
///
/// ```no_run
/// use storygen_config::StorygenConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StorygenConfig::load()?;
/// println!("Rendering with {}", config.models().image());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct StorygenConfig {
    /// Endpoint settings
    api: ApiSettings,
    /// Model identifiers
    models: ModelSettings,
    /// Rendering settings
    render: RenderSettings,
    /// Chat persona
    chat: ChatSettings,
    /// Export settings
    export: ExportSettings,
}

impl StorygenConfig {
    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> StorygenResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/storygen/storygen.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("storygen").required(false));

        Self::finish(builder)
    }

    /// Load bundled defaults overridden by a specific file.
    ///
    /// The file may set only the keys it cares about.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> StorygenResult<Self> {
        debug!("Loading configuration from file");

        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()));

        Self::finish(builder)
    }

    /// Bundled defaults only, ignoring any user files.
    pub fn bundled() -> StorygenResult<Self> {
        Self::finish(Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)))
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> StorygenResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| {
                StorygenError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                StorygenError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> StorygenResult<()> {
        if self.render.max_in_flight == 0 {
            return Err(ConfigError::new("render.max_in_flight must be at least 1").into());
        }
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::new("api.base_url must not be empty").into());
        }
        Ok(())
    }
}
