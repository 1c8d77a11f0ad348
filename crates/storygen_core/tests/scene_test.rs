use storygen_core::{
    DEFAULT_DESCRIPTION, DEFAULT_VISUAL_PROMPT, ImageDataUri, ImageSize, Scene, SceneOutline,
    assemble_scenes,
};

fn outline(number: Option<i64>, description: Option<&str>, prompt: Option<&str>) -> SceneOutline {
    SceneOutline {
        scene_number: number,
        description: description.map(str::to_string),
        visual_prompt: prompt.map(str::to_string),
    }
}

#[test]
fn missing_fields_get_placeholders() {
    let scenes = assemble_scenes(vec![outline(None, None, None)]);

    assert_eq!(scenes[0].scene_number, 1);
    assert_eq!(scenes[0].description, DEFAULT_DESCRIPTION);
    assert_eq!(scenes[0].visual_prompt, DEFAULT_VISUAL_PROMPT);
    assert!(!scenes[0].is_loading);
    assert!(scenes[0].error.is_none());
}

#[test]
fn blank_prompt_falls_back_to_description() {
    let scenes = assemble_scenes(vec![outline(Some(2), Some("A nebula swirls"), Some("   "))]);

    assert_eq!(scenes[0].scene_number, 2);
    assert_eq!(scenes[0].visual_prompt, "A nebula swirls");
}

#[test]
fn non_positive_scene_numbers_use_position() {
    let scenes = assemble_scenes(vec![
        outline(Some(0), Some("a"), Some("a")),
        outline(Some(-4), Some("b"), Some("b")),
        outline(Some(7), Some("c"), Some("c")),
    ]);

    let numbers: Vec<u32> = scenes.iter().map(|s| s.scene_number).collect();
    assert_eq!(numbers, vec![1, 2, 7]);
}

#[test]
fn ids_are_unique_within_and_across_runs() {
    let first = assemble_scenes(vec![outline(None, None, None), outline(None, None, None)]);
    let second = assemble_scenes(vec![outline(None, None, None)]);

    assert_ne!(first[0].id, first[1].id);
    assert_ne!(first[0].id, second[0].id);
}

#[test]
fn outline_parses_camel_case_json() {
    let parsed: Vec<SceneOutline> = serde_json::from_str(
        r#"[{"sceneNumber": 3, "description": "Ruins", "visualPrompt": "Blue crystal glow"}]"#,
    )
    .unwrap();

    assert_eq!(parsed[0], outline(Some(3), Some("Ruins"), Some("Blue crystal glow")));
}

#[test]
fn render_lifecycle_keeps_identity() {
    let mut scene = assemble_scenes(vec![outline(Some(1), Some("a"), Some("a"))]).remove(0);
    let id = scene.id.clone();

    scene.begin_render();
    assert!(scene.is_loading);
    scene.fail_render("");
    assert!(!scene.is_loading);
    assert_eq!(scene.error.as_deref(), Some("Generation failed"));
    assert!(!scene.has_image());

    scene.begin_render();
    assert!(scene.error.is_none());
    scene.finish_render(ImageDataUri::png("AAAA"), ImageSize::Size2K);
    assert_eq!(scene.id, id);
    assert_eq!(scene.rendered_size, Some(ImageSize::Size2K));
    assert_eq!(scene.export_file_name(), "storyboard-scene-1.png");
}

#[test]
fn scene_serializes_with_camel_case_keys() {
    let scene: Scene = assemble_scenes(vec![outline(Some(1), Some("a"), Some("b"))]).remove(0);
    let value = serde_json::to_value(&scene).unwrap();

    assert_eq!(value["sceneNumber"], 1);
    assert_eq!(value["visualPrompt"], "b");
    assert_eq!(value["isLoading"], false);
}
