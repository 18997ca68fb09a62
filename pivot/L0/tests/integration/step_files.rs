//! Step files through the tango session.

use pivot_dance::{beats_to_frames, DanceError, ErrorKind, StepLoader};
use pivot_scene::Scene;
use pivot_tests::{step_file, studio_session};
use pivot_types::{Dancer, FrameSpan, PivotConfig, Tempo};

#[test]
fn two_row_file_promotes_to_one_frame() {
    let config = PivotConfig::default();
    let (mut scene, mut session) = studio_session(&config).unwrap();
    let text = step_file(&["man|forward||0.0|1.0", "woman|forward||0.0|1.0"]);
    let records = StepLoader::from_config(&config).parse_str(&text).unwrap();

    assert_eq!(beats_to_frames(&Tempo::default(), 1.0), 0);
    session.run(&mut scene, &records).unwrap();
    for dancer in Dancer::ALL {
        let placed = session.figure(dancer).placed();
        assert_eq!(placed[1].span.len(), 1, "{dancer}");
    }
}

#[test]
fn file_on_disk_dances_both_figures() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dance.steps");
    std::fs::write(
        &path,
        step_file(&[
            "both|embrace||0|0",
            "# the walk",
            "both|forward||0|14",
            "both|side||14|14",
            "man|shift||28|14",
            "woman|stands|on left|28|14",
        ]),
    )
    .unwrap();

    let config = PivotConfig::default();
    let (mut scene, mut session) = studio_session(&config).unwrap();
    assert_eq!(session.run_file(&mut scene, &path).unwrap(), 5);

    let man: Vec<_> = session.man().placed().iter().map(|p| p.name().to_string()).collect();
    assert_eq!(
        man,
        vec![
            "default action",
            "step forward L to R",
            "step side R to L",
            "step shift L to R",
            "embrace man"
        ]
    );
    let woman = session.woman().placed();
    assert_eq!(woman[1].name(), "step forward R to L");
    assert_eq!(woman[3].name(), "stand on left foot");
    assert_eq!(woman[3].span, FrameSpan::new(24, 36));
    assert_eq!(woman.last().unwrap().span.end, 36);
    assert_eq!(scene.current_frame(), config.start_frame);
}

#[test]
fn short_rows_follow_config_policy() {
    let text = step_file(&["man|forward||0", "man|back||0|14"]);

    let lenient = StepLoader::from_config(&PivotConfig::default())
        .parse_str(&text)
        .unwrap();
    assert_eq!(lenient.len(), 1);

    let strict = PivotConfig {
        strict_rows: true,
        ..PivotConfig::default()
    };
    let err = StepLoader::from_config(&strict).parse_str(&text).unwrap_err();
    assert!(matches!(err, DanceError::FileFormat { line: 2, .. }));
}

#[test]
fn faster_tempo_gives_longer_steps() {
    let config = PivotConfig {
        tempo: Tempo::with_bpm(5.0),
        ..PivotConfig::default()
    };
    let (mut scene, mut session) = studio_session(&config).unwrap();
    let records = StepLoader::new()
        .parse_str(&step_file(&["man|forward||0|1", "man|back||1|1"]))
        .unwrap();
    session.run(&mut scene, &records).unwrap();
    assert_eq!(session.man().placed()[2].span, FrameSpan::new(12, 24));
}

#[test]
fn bad_record_leaves_partial_dance() {
    let config = PivotConfig::default();
    let (mut scene, mut session) = studio_session(&config).unwrap();
    let records = StepLoader::new()
        .parse_str(&step_file(&["both|forward||0|14", "woman|pirouette||14|14"]))
        .unwrap();
    let err = session.run(&mut scene, &records).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Resolution);
    assert_eq!(session.man().placed().len(), 2);
    assert_eq!(session.woman().placed().len(), 2);
}

#[test]
fn missing_file_is_a_file_format_error() {
    let config = PivotConfig::default();
    let (mut scene, mut session) = studio_session(&config).unwrap();
    let err = session
        .run_file(&mut scene, "/nonexistent/dance.steps")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileFormat);
}
