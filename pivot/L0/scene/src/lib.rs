//! Animation host access for pivot.
//!
//! The choreography engine reads clips and writes object keyframes through
//! the [`Scene`] trait. This crate defines that trait together with the
//! host-side data it traffics in:
//!
//! - [`KeyframeCurve`] - frame-ordered keys with linear/slerp evaluation
//! - [`MotionClip`] - a named set of per-bone curves
//! - [`MemoryScene`] - a complete in-memory host, serializable to JSON
//! - [`studio`] - the reference mannequin scene used by tests and the CLI
//!
//! # Example
//!
//! ```
//! use pivot_scene::{studio, KeyKind, Scene};
//!
//! let mut scene = studio::mannequin_studio();
//! scene.set_current_frame(1);
//! scene.insert_keyframe("dancer male", KeyKind::LocRot).unwrap();
//! assert_eq!(scene.keyframe_count("dancer male").unwrap(), 1);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

mod clip;
mod curve;
mod error;
mod memory;
mod scene;
pub mod studio;

pub use clip::{BoneChannel, BoneSample, MotionClip};
pub use curve::{Interpolate, KeyframeCurve};
pub use error::{DataKind, Result, SceneError};
pub use memory::{MemoryScene, SceneObject, CURVE_SUFFIX};
pub use scene::{ActionStrip, KeyKind, Scene};
