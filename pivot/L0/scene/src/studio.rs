//! The reference mannequin scene.
//!
//! Two dancer models share one mannequin skeleton scaled to 0.2051. Step
//! clips move the `Root` bone by whole-stride amounts in skeleton units;
//! all of them run 12 frames, from frame 1 to frame 13.

use std::f64::consts::FRAC_PI_4;

use nalgebra::{UnitQuaternion, Vector3};

use pivot_types::HostNames;

use crate::clip::{BoneSample, MotionClip};
use crate::memory::{MemoryScene, SceneObject};

/// Scale of the shared skeleton.
pub const ARMATURE_SCALE: f64 = 0.2051;

/// Forward/back stride of the `Root` bone.
pub const STRIDE: f64 = 4.91;

/// Sideways stride of the `Root` bone.
pub const SIDE_STRIDE: f64 = 2.45;

const ROOT: &str = "Root";
const STEP_FIRST: i32 = 1;
const STEP_LAST: i32 = 13;

/// Pose clips that do not move the figure.
pub const POSES: [&str; 4] = [
    "stand on left foot",
    "stand on right foot",
    "arms at sides",
    "feet together",
];

/// Reference scene with the default host names.
///
/// ```
/// use pivot_scene::{studio, Scene};
///
/// let scene = studio::mannequin_studio();
/// assert!(scene.clip("step forward L to R").is_ok());
/// assert_eq!(scene.scale("mannequin").unwrap(), studio::ARMATURE_SCALE);
/// ```
#[must_use]
pub fn mannequin_studio() -> MemoryScene {
    studio(&HostNames::default())
}

/// Reference scene using the given object and idle clip names.
#[must_use]
pub fn studio(names: &HostNames) -> MemoryScene {
    let mut scene = MemoryScene::new()
        .with_object(names.armature.clone(), SceneObject::with_scale(ARMATURE_SCALE))
        .with_object(names.models.man.clone(), SceneObject::default())
        .with_object(names.models.woman.clone(), SceneObject::default())
        .with_clip(still(&names.idle_clip, "spine"))
        .with_clip(embrace("embrace man", 1.0))
        .with_clip(embrace("embrace woman", -1.0));

    let strides = [
        ("forward", Vector3::new(0.0, -STRIDE, 0.0), Vector3::new(0.0, -STRIDE, 0.0)),
        ("back", Vector3::new(0.0, STRIDE, 0.0), Vector3::new(0.0, STRIDE, 0.0)),
        ("side", Vector3::new(SIDE_STRIDE, 0.0, 0.0), Vector3::new(-SIDE_STRIDE, 0.0, 0.0)),
        ("shift", Vector3::zeros(), Vector3::zeros()),
    ];
    for (name, left_lead, right_lead) in strides {
        scene.add_clip(step(&format!("step {name} L to R"), left_lead, "thigh.L"));
        scene.add_clip(step(&format!("step {name} R to L"), right_lead, "thigh.R"));
    }

    for pose in POSES {
        scene.add_clip(still(pose, "thigh.L"));
    }
    scene
}

fn step(name: &str, delta: Vector3<f64>, leg: &str) -> MotionClip {
    let mid = (STEP_FIRST + STEP_LAST) / 2;
    let lift = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), FRAC_PI_4);
    MotionClip::new(name)
        .with_key(ROOT, STEP_FIRST, BoneSample::at(Vector3::zeros()))
        .with_key(ROOT, mid, BoneSample::at(delta / 2.0))
        .with_key(ROOT, STEP_LAST, BoneSample::at(delta))
        .with_key(leg, STEP_FIRST, BoneSample::at(Vector3::zeros()))
        .with_key(
            leg,
            mid,
            BoneSample {
                location: Vector3::zeros(),
                rotation: lift,
            },
        )
        .with_key(leg, STEP_LAST, BoneSample::at(Vector3::zeros()))
}

fn embrace(name: &str, side: f64) -> MotionClip {
    let reach = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), side * FRAC_PI_4);
    let hold = BoneSample {
        location: Vector3::zeros(),
        rotation: reach,
    };
    MotionClip::new(name)
        .with_key(ROOT, STEP_FIRST, BoneSample::at(Vector3::zeros()))
        .with_key(ROOT, STEP_FIRST + 1, BoneSample::at(Vector3::zeros()))
        .with_key("upper_arm.L", STEP_FIRST, hold)
        .with_key("upper_arm.R", STEP_FIRST, hold)
}

fn still(name: &str, bone: &str) -> MotionClip {
    MotionClip::new(name)
        .with_key(ROOT, STEP_FIRST, BoneSample::at(Vector3::zeros()))
        .with_key(ROOT, STEP_FIRST + 1, BoneSample::at(Vector3::zeros()))
        .with_key(bone, STEP_FIRST, BoneSample::at(Vector3::zeros()))
}
