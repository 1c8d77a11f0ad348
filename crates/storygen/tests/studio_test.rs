//! Tests for session wiring that never reach the network.

use async_trait::async_trait;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use storygen::{
    CredentialErrorKind, ImageSize, KeyPrompt, SAMPLE_SCRIPT, StorygenConfig, StorygenErrorKind,
    StorygenResult, Studio, StudioOptions,
};
use tempfile::NamedTempFile;

struct CountingPrompt {
    key: Option<&'static str>,
    calls: AtomicUsize,
}

impl CountingPrompt {
    fn new(key: Option<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            key,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyPrompt for CountingPrompt {
    async fn request_key(&self) -> StorygenResult<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.key.map(str::to_string))
    }
}

/// Configuration whose key variables are never set.
fn keyless_config() -> anyhow::Result<(NamedTempFile, StorygenConfig)> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(file, "[api]")?;
    writeln!(file, "key_env = [\"STORYGEN_TEST_KEY_THAT_IS_NEVER_SET\"]")?;
    writeln!(file, "[render]")?;
    writeln!(file, "default_size = \"2K\"")?;
    writeln!(file, "max_in_flight = 2")?;
    let config = StorygenConfig::from_file(file.path())?;
    Ok((file, config))
}

#[tokio::test]
async fn test_closed_gate_blocks_every_model_operation() -> anyhow::Result<()> {
    let (_file, config) = keyless_config()?;
    let prompt = CountingPrompt::new(None);
    let studio = Studio::open(config, prompt.clone(), StudioOptions::default()).await?;

    assert!(!studio.gate().is_open());
    assert_eq!(prompt.calls(), 0);

    let err = studio.board().analyze(SAMPLE_SCRIPT).await.unwrap_err();
    assert!(err.is_credential());
    assert!(studio.board().snapshot().is_empty());

    let err = studio.chat().send("Hello").await.unwrap_err();
    assert!(err.is_credential());
    assert_eq!(studio.chat().transcript().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_dismissed_prompt_keeps_gate_closed() -> anyhow::Result<()> {
    let (_file, config) = keyless_config()?;
    let prompt = CountingPrompt::new(None);
    let studio = Studio::open(config, prompt.clone(), StudioOptions::default()).await?;

    let err = studio.ensure_credential().await.unwrap_err();
    assert!(matches!(
        err.kind(),
        StorygenErrorKind::Credential(e) if e.kind == CredentialErrorKind::Rejected
    ));
    assert_eq!(prompt.calls(), 1);
    assert!(!studio.gate().is_open());
    Ok(())
}

#[tokio::test]
async fn test_selected_key_opens_gate_once() -> anyhow::Result<()> {
    let (_file, config) = keyless_config()?;
    let prompt = CountingPrompt::new(Some("  sk-test  "));
    let studio = Studio::open(config, prompt.clone(), StudioOptions::default()).await?;

    studio.ensure_credential().await?;
    studio.ensure_credential().await?;

    assert!(studio.gate().is_open());
    assert_eq!(prompt.calls(), 1);
    let key = studio.credentials().current().expect("key stored");
    assert_eq!(key.expose(), "sk-test");
    Ok(())
}

#[tokio::test]
async fn test_configuration_and_overrides() -> anyhow::Result<()> {
    let (_file, config) = keyless_config()?;
    let studio = Studio::open(
        config.clone(),
        CountingPrompt::new(None),
        StudioOptions::default(),
    )
    .await?;
    assert_eq!(studio.board().size(), ImageSize::Size2K);
    assert_eq!(studio.exporter().dir(), config.export().dir());
    assert!(studio.chat().transcript()[0].text.starts_with("Hello!"));

    let options = StudioOptions {
        size: Some(ImageSize::Size4K),
        max_in_flight: Some(1),
        export_dir: Some(PathBuf::from("frames")),
    };
    let studio = Studio::open(config, CountingPrompt::new(None), options).await?;
    assert_eq!(studio.board().size(), ImageSize::Size4K);
    assert_eq!(studio.exporter().dir(), PathBuf::from("frames").as_path());
    Ok(())
}
