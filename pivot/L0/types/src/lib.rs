//! Core vocabulary for the pivot dance choreographer.
//!
//! This crate holds the pieces every other pivot crate agrees on:
//!
//! - [`transform`] - 4x4 affine composition of an offset and a rotation
//! - [`Foot`], [`Dancer`], [`DancerSelector`] - the step-naming vocabulary
//! - [`FrameSpan`] - an interval on a figure's action timeline
//! - [`PivotConfig`] - tempo, host names, embrace offsets and loader policy
//!
//! # Layer 0
//!
//! Nothing here talks to an animation host. The host interface lives in
//! `pivot-scene`, the choreography engine in `pivot-dance`.
//!
//! # Coordinate System
//!
//! Matrices follow nalgebra's column-vector convention: a transform `M`
//! maps a point `p` to `M * p`, and `A * B` applies `B` first.
//!
//! # Example
//!
//! ```
//! use nalgebra::{UnitQuaternion, Vector3};
//! use pivot_types::transform::{compose, translation_part};
//!
//! let m = compose(&Vector3::new(0.0, 4.91, 0.0), UnitQuaternion::identity());
//! assert!((translation_part(&m).y - 4.91).abs() < 1e-12);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod config;
mod error;
mod foot;
mod span;
pub mod transform;

pub use config::{EmbraceOffset, HostNames, PerDancer, PivotConfig, Tempo};
pub use error::{Result, TypesError};
pub use foot::{Dancer, DancerSelector, Foot};
pub use span::{Frame, FrameSpan};
pub use transform::Rotation;
