use std::io::Write;
use storygen_config::StorygenConfig;
use storygen_core::ImageSize;
use tempfile::NamedTempFile;

fn write_toml(contents: &str) -> anyhow::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    file.write_all(contents.as_bytes())?;
    Ok(file)
}

#[test]
fn partial_file_overrides_only_its_keys() -> anyhow::Result<()> {
    let file = write_toml(
        r#"
[render]
default_size = "4K"

[models]
image = "custom-image-model"
"#,
    )?;

    let config = StorygenConfig::from_file(file.path())?;

    assert_eq!(*config.render().default_size(), ImageSize::Size4K);
    assert_eq!(*config.render().max_in_flight(), 4);
    assert_eq!(config.models().image(), "custom-image-model");
    assert_eq!(config.models().analysis(), "gemini-3-pro-preview");
    Ok(())
}

#[test]
fn zero_workers_is_rejected() -> anyhow::Result<()> {
    let file = write_toml("[render]\nmax_in_flight = 0\n")?;

    let err = StorygenConfig::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("max_in_flight"));
    Ok(())
}

#[test]
fn unknown_size_tier_is_rejected() -> anyhow::Result<()> {
    let file = write_toml("[render]\ndefault_size = \"8K\"\n")?;

    assert!(StorygenConfig::from_file(file.path()).is_err());
    Ok(())
}

#[test]
fn missing_file_is_an_error() {
    assert!(StorygenConfig::from_file("/nonexistent/storygen.toml").is_err());
}
