//! Root keys follow the steps: position is continuous across clip joins.

use approx::assert_relative_eq;
use nalgebra::{UnitQuaternion, Vector3};
use pivot_dance::{Duration, ErrorKind};
use pivot_scene::{studio, BoneSample, KeyKind, MotionClip, Scene};
use pivot_tests::studio_figure;
use pivot_types::{Dancer, FrameSpan};

#[test]
fn forward_then_side_lands_at_reference_y() {
    let (mut scene, mut man) = studio_figure(Dancer::Man).unwrap();
    man.add_motion(&mut scene, "step forward L to R", Duration::Frames(12), None)
        .unwrap();
    man.housekeeping(&mut scene).unwrap();
    man.add_motion(&mut scene, "step side R to L", Duration::Frames(12), None)
        .unwrap();
    man.housekeeping(&mut scene).unwrap();

    scene.set_current_frame(25);
    let y = scene.location("dancer male").unwrap().y;
    assert!((y - -1.007).abs() < 0.01, "y = {y}");
}

#[test]
fn root_holds_still_during_each_clip() {
    let (mut scene, mut man) = studio_figure(Dancer::Man).unwrap();
    for _ in 0..3 {
        man.add_motion(&mut scene, "back", Duration::Frames(12), None)
            .unwrap();
    }
    man.housekeeping(&mut scene).unwrap();

    let stride = 4.91 * studio::ARMATURE_SCALE;
    for (frame, steps_done) in [(1, 0.0), (12, 0.0), (13, 1.0), (24, 1.0), (25, 2.0), (36, 2.0)] {
        scene.set_current_frame(frame);
        assert_relative_eq!(
            scene.location("dancer male").unwrap().y,
            stride * steps_done,
            epsilon = 1e-9
        );
    }
}

#[test]
fn heading_turns_later_strides() {
    let (mut scene, mut man) = studio_figure(Dancer::Man).unwrap();
    scene
        .set_rotation("dancer male", Vector3::new(0.0, 0.0, std::f64::consts::FRAC_PI_2))
        .unwrap();
    scene.insert_keyframe("dancer male", KeyKind::LocRot).unwrap();

    man.add_motion(&mut scene, "forward", 12.into(), None).unwrap();
    man.add_motion(&mut scene, "shift", 12.into(), None).unwrap();
    scene.set_current_frame(13);

    let at = scene.location("dancer male").unwrap();
    assert_relative_eq!(at.x, 4.91 * studio::ARMATURE_SCALE, epsilon = 1e-9);
    assert_relative_eq!(at.y, 0.0, epsilon = 1e-9);
}

#[test]
fn turning_step_moves_in_world_frame() {
    let (mut scene, mut man) = studio_figure(Dancer::Man).unwrap();
    let quarter = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_2);
    scene.add_clip(
        MotionClip::new("step turn R to L")
            .with_key("Root", 1, BoneSample::at(Vector3::zeros()))
            .with_key(
                "Root",
                13,
                BoneSample {
                    location: Vector3::new(0.0, -studio::STRIDE, 0.0),
                    rotation: quarter,
                },
            ),
    );

    man.add_motion(&mut scene, "forward", 12.into(), None).unwrap();
    man.add_motion(&mut scene, "step turn R to L", 12.into(), None)
        .unwrap();
    man.add_motion(&mut scene, "shift", 12.into(), None).unwrap();
    man.housekeeping(&mut scene).unwrap();

    // The turn swings the position already reached, not just the heading.
    let stride = studio::STRIDE * studio::ARMATURE_SCALE;
    scene.set_current_frame(25);
    let at = scene.location("dancer male").unwrap();
    assert_relative_eq!(at, Vector3::new(stride, -stride, 0.0), epsilon = 1e-9);
    assert_relative_eq!(
        scene.rotation("dancer male").unwrap().z,
        std::f64::consts::FRAC_PI_2,
        epsilon = 1e-9
    );
}

#[test]
fn housekeeping_stretches_idle_clip() {
    let (mut scene, mut man) = studio_figure(Dancer::Man).unwrap();
    let span = man
        .add_motion(&mut scene, "step forward L to R", 12.into(), None)
        .unwrap();
    assert_eq!(span.len(), 12);
    man.housekeeping(&mut scene).unwrap();
    assert_eq!(man.placed()[0].span, FrameSpan::new(1, 13));
    assert_eq!(scene.current_frame(), 1);

    let strips = &scene.object("dancer male").unwrap().strips;
    assert_eq!(strips.len(), 2);
    assert_eq!(strips[0].span.end, 13);
}

#[test]
fn reset_clears_any_previous_dance() {
    let (mut scene, mut man) = studio_figure(Dancer::Man).unwrap();
    man.embrace(&mut scene, None).unwrap();
    for name in ["forward", "side", "stand on left foot"] {
        man.add_motion(&mut scene, name, 12.into(), None).unwrap();
    }
    man.reset(&mut scene).unwrap();

    assert_eq!(man.placed().len(), 1);
    assert_eq!(scene.keyframe_count("dancer male").unwrap(), 1);
    assert_eq!(scene.object("dancer male").unwrap().strips.len(), 1);
}

#[test]
fn unknown_step_is_a_resolution_error() {
    let (mut scene, mut woman) = studio_figure(Dancer::Woman).unwrap();
    let err = woman
        .add_motion(&mut scene, "moonwalk", Duration::Default, None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Resolution);
    assert_eq!(woman.placed().len(), 1);
}
