//! The animation host interface.
//!
//! The engine never stores scene data itself. Objects, clips and keyframes
//! live in the host; the engine reads and writes them through [`Scene`].
//!
//! The host keeps one current frame. Queries about an animated object answer
//! for that frame, so any lookup at a different frame goes through
//! [`Scene::with_frame`], which restores the previous frame afterwards.

use std::sync::Arc;

use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};

use pivot_types::{Frame, FrameSpan};

use crate::clip::MotionClip;
use crate::error::{DataKind, Result};

/// Which channels [`Scene::insert_keyframe`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum KeyKind {
    /// Location only.
    Loc,
    /// Rotation only.
    Rot,
    /// Location and rotation.
    #[default]
    LocRot,
}

impl KeyKind {
    /// True if location is keyed.
    #[must_use]
    pub const fn keys_location(self) -> bool {
        matches!(self, Self::Loc | Self::LocRot)
    }

    /// True if rotation is keyed.
    #[must_use]
    pub const fn keys_rotation(self) -> bool {
        matches!(self, Self::Rot | Self::LocRot)
    }
}

/// A clip bound to an interval of an object's action timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStrip {
    /// Name of the bound clip.
    pub clip: String,
    /// Frames the clip plays over.
    pub span: FrameSpan,
}

impl ActionStrip {
    /// Creates a strip.
    #[must_use]
    pub fn new(clip: impl Into<String>, span: FrameSpan) -> Self {
        Self {
            clip: clip.into(),
            span,
        }
    }
}

/// Services the choreography engine needs from an animation host.
///
/// Object rotations are XYZ Euler angles in radians. World matrices are
/// `T(location) * R(rotation) * S(scale)`.
pub trait Scene {
    /// Current frame.
    fn current_frame(&self) -> Frame;

    /// Move to `frame`, re-posing every animated object.
    fn set_current_frame(&mut self, frame: Frame);

    /// Ask the host to redraw its views. Hosts without views ignore this.
    fn request_redraw(&mut self) {}

    /// Find which library holds `name`, searching objects, clips, then curves.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no library has the name.
    fn lookup(&self, name: &str) -> Result<DataKind>;

    /// Clip by name.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such clip.
    fn clip(&self, name: &str) -> Result<Arc<MotionClip>>;

    /// All clip names.
    fn clip_names(&self) -> Vec<String>;

    /// All object names.
    fn object_names(&self) -> Vec<String>;

    /// Object location at the current frame.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown object.
    fn location(&self, object: &str) -> Result<Vector3<f64>>;

    /// Set object location at the current frame (not keyed).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown object.
    fn set_location(&mut self, object: &str, location: Vector3<f64>) -> Result<()>;

    /// Object XYZ Euler rotation at the current frame.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown object.
    fn rotation(&self, object: &str) -> Result<Vector3<f64>>;

    /// Set object XYZ Euler rotation at the current frame (not keyed).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown object.
    fn set_rotation(&mut self, object: &str, euler: Vector3<f64>) -> Result<()>;

    /// Uniform scale factor of an object.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown object.
    fn scale(&self, object: &str) -> Result<f64>;

    /// Object world matrix at the current frame.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown object.
    fn world_matrix(&self, object: &str) -> Result<Matrix4<f64>>;

    /// Replace the object's world matrix at the current frame (not keyed).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown object, or `DegenerateMatrix` if the
    /// matrix has no usable scale.
    fn set_world_matrix(&mut self, object: &str, matrix: &Matrix4<f64>) -> Result<()>;

    /// Key the object's current placement on the current frame.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown object.
    fn insert_keyframe(&mut self, object: &str, kind: KeyKind) -> Result<()>;

    /// Remove all of an object's keyframes.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown object.
    fn clear_keyframes(&mut self, object: &str) -> Result<()>;

    /// Number of keys on the object's location curve.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown object.
    fn keyframe_count(&self, object: &str) -> Result<usize>;

    /// Replace the object's action strips, playing them on `target`'s skeleton.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the object, the target or any strip's clip is unknown.
    fn bind_strips(&mut self, object: &str, target: &str, strips: &[ActionStrip]) -> Result<()>;

    /// Jump to `frame`, optionally redraw, and return the frame now current.
    fn goto_frame(&mut self, frame: Frame, redraw: bool) -> Frame {
        self.set_current_frame(frame);
        if redraw {
            self.request_redraw();
        }
        self.current_frame()
    }

    /// Run `f` with `frame` current, then restore the previous frame.
    fn with_frame<R>(&mut self, frame: Frame, f: impl FnOnce(&mut Self) -> R) -> R
    where
        Self: Sized,
    {
        let saved = self.current_frame();
        self.set_current_frame(frame);
        let out = f(self);
        self.set_current_frame(saved);
        out
    }
}
