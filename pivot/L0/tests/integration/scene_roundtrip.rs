//! A danced scene survives a trip through JSON.

use approx::assert_relative_eq;
use pivot_dance::StepLoader;
use pivot_scene::{MemoryScene, Scene};
use pivot_tests::{step_file, studio_session};
use pivot_types::PivotConfig;

#[test]
fn danced_scene_reloads_with_keys_and_strips() {
    let config = PivotConfig::default();
    let (mut scene, mut session) = studio_session(&config).unwrap();
    let records = StepLoader::new()
        .parse_str(&step_file(&["both|embrace||0|0", "both|forward||0|14", "both|side||14|14"]))
        .unwrap();
    session.run(&mut scene, &records).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("danced.json");
    scene.write_json_file(&path).unwrap();
    let mut reloaded = MemoryScene::from_json_file(&path).unwrap();

    for model in ["dancer male", "dancer female"] {
        assert_eq!(
            reloaded.keyframe_count(model).unwrap(),
            scene.keyframe_count(model).unwrap()
        );
        assert_eq!(
            reloaded.object(model).unwrap().strips,
            scene.object(model).unwrap().strips
        );
    }

    scene.set_current_frame(24);
    reloaded.set_current_frame(24);
    assert_relative_eq!(
        reloaded.location("dancer female").unwrap(),
        scene.location("dancer female").unwrap(),
        epsilon = 1e-12
    );
}

#[test]
fn scene_document_is_plain_json() {
    let scene = pivot_scene::studio::mannequin_studio();
    let value: serde_json::Value = serde_json::from_str(&scene.to_json_string().unwrap()).unwrap();
    assert!(value["objects"]["mannequin"]["scale"].is_number());
    assert!(value["clips"]["step forward L to R"].is_object());
}

#[test]
fn config_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pivot.json");
    std::fs::write(&path, r#"{ "strict_rows": true, "tempo": { "beats_per_minute": 120.0 } }"#)
        .unwrap();
    let config = PivotConfig::from_json_file(&path).unwrap();
    assert!(config.strict_rows);
    assert_eq!(config.names.armature, "mannequin");
    assert_relative_eq!(config.tempo.frames_per_beat(), 0.5);
}
