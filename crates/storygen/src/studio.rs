//! Wiring for a complete StoryGen session.

use std::path::PathBuf;
use std::sync::Arc;

use storygen_board::{ChatPanel, CredentialGate, RenderPool, Storyboard};
use storygen_config::StorygenConfig;
use storygen_core::ImageSize;
use storygen_error::StorygenResult;
use storygen_models::{ApiKeyGuard, CredentialStore, GeminiClient, KeyPrompt};
use storygen_storage::ImageExporter;
use tracing::{debug, info, instrument};

/// Overrides applied on top of the loaded configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudioOptions {
    /// Initial resolution tier instead of `render.default_size`
    pub size: Option<ImageSize>,
    /// Concurrent render limit instead of `render.max_in_flight`
    pub max_in_flight: Option<usize>,
    /// Export directory instead of `export.dir`
    pub export_dir: Option<PathBuf>,
}

/// A storyboard, a chat panel and an exporter sharing one credential gate
/// and one Gemini client.
#[derive(Clone)]
pub struct Studio {
    config: StorygenConfig,
    credentials: CredentialStore,
    client: GeminiClient,
    gate: CredentialGate,
    board: Storyboard,
    chat: ChatPanel,
    exporter: ImageExporter,
}

impl Studio {
    /// Build a session from `config`.
    ///
    /// The API key is read from the environment variables named in
    /// `api.key_env`; `prompt` is asked when the user selects a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    #[instrument(skip_all)]
    pub async fn open(
        config: StorygenConfig,
        prompt: Arc<dyn KeyPrompt>,
        options: StudioOptions,
    ) -> StorygenResult<Self> {
        let credentials = CredentialStore::from_env(config.api().key_env());
        let client = GeminiClient::from_config(&config, credentials.clone())?;

        let guard = ApiKeyGuard::new(credentials.clone(), prompt);
        let gate = CredentialGate::open(Arc::new(guard)).await;

        let max_in_flight = options
            .max_in_flight
            .unwrap_or(*config.render().max_in_flight());
        let size = options.size.unwrap_or(*config.render().default_size());
        let pool = RenderPool::new(Arc::new(client.clone()), max_in_flight);
        let board = Storyboard::new(Arc::new(client.clone()), pool, gate.clone(), size);

        let chat = ChatPanel::new(
            Arc::new(client.clone()),
            gate.clone(),
            config.chat().greeting().clone(),
        );

        let export_dir = options
            .export_dir
            .unwrap_or_else(|| config.export().dir().clone());
        let exporter = ImageExporter::new(export_dir);

        info!(
            credential = gate.is_open(),
            %size,
            max_in_flight,
            "Studio ready"
        );

        Ok(Self {
            config,
            credentials,
            client,
            gate,
            board,
            chat,
            exporter,
        })
    }

    /// Ask for a key only when none is present yet.
    ///
    /// # Errors
    ///
    /// Returns a credential error if the user dismisses the prompt.
    pub async fn ensure_credential(&self) -> StorygenResult<()> {
        if self.gate.is_open() {
            debug!("Credential already present");
            return Ok(());
        }
        self.gate.select().await
    }

    /// Loaded configuration.
    pub fn config(&self) -> &StorygenConfig {
        &self.config
    }

    /// Shared credential store.
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Gemini client used by every component.
    pub fn client(&self) -> &GeminiClient {
        &self.client
    }

    /// Credential gate.
    pub fn gate(&self) -> &CredentialGate {
        &self.gate
    }

    /// Storyboard state.
    pub fn board(&self) -> &Storyboard {
        &self.board
    }

    /// Chat panel state.
    pub fn chat(&self) -> &ChatPanel {
        &self.chat
    }

    /// Exporter writing to the configured directory.
    pub fn exporter(&self) -> &ImageExporter {
        &self.exporter
    }
}

impl std::fmt::Debug for Studio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Studio")
            .field("credential", &self.gate.is_open())
            .field("size", &self.board.size())
            .field("exporter", &self.exporter)
            .finish_non_exhaustive()
    }
}
