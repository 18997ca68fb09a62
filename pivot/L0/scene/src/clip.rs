//! Motion clips: named, keyframed bone animation owned by the host.

use std::collections::BTreeMap;

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use pivot_types::{Frame, FrameSpan};

use crate::curve::KeyframeCurve;
use crate::error::{Result, SceneError};

/// Location and rotation of one bone at one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoneSample {
    /// Bone location relative to the model.
    pub location: Vector3<f64>,
    /// Bone rotation relative to the model.
    pub rotation: UnitQuaternion<f64>,
}

impl BoneSample {
    /// Sample with the given location and no rotation.
    #[must_use]
    pub fn at(location: Vector3<f64>) -> Self {
        Self {
            location,
            rotation: UnitQuaternion::identity(),
        }
    }
}

/// Keyed location and rotation of a single bone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoneChannel {
    /// Location keys.
    pub location: KeyframeCurve<Vector3<f64>>,
    /// Rotation keys.
    pub rotation: KeyframeCurve<UnitQuaternion<f64>>,
}

/// A pre-authored keyframed motion fragment, e.g. `step forward L to R`.
///
/// Clips are read-only once they are in a scene; the engine only samples
/// them.
///
/// # Example
///
/// ```
/// use nalgebra::Vector3;
/// use pivot_scene::{BoneSample, MotionClip};
///
/// let clip = MotionClip::new("step back L to R")
///     .with_key("Root", 1, BoneSample::at(Vector3::zeros()))
///     .with_key("Root", 13, BoneSample::at(Vector3::new(0.0, 4.91, 0.0)));
///
/// assert_eq!(clip.frame_numbers(), vec![1, 13]);
/// assert_eq!(clip.authored_length(), 12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionClip {
    name: String,
    channels: BTreeMap<String, BoneChannel>,
}

impl MotionClip {
    /// Creates a clip with no keys.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channels: BTreeMap::new(),
        }
    }

    /// Builder form of [`Self::insert_key`].
    #[must_use]
    pub fn with_key(mut self, bone: &str, frame: Frame, sample: BoneSample) -> Self {
        self.insert_key(bone, frame, sample);
        self
    }

    /// Keys a bone's location and rotation on `frame`.
    pub fn insert_key(&mut self, bone: &str, frame: Frame, sample: BoneSample) {
        let channel = self.channels.entry(bone.to_string()).or_default();
        channel.location.insert(frame, sample.location);
        channel.rotation.insert(frame, sample.rotation);
    }

    /// Clip name as known to the host.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the bones this clip animates.
    pub fn bones(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    /// Channel for `bone`, if keyed.
    #[must_use]
    pub fn channel(&self, bone: &str) -> Option<&BoneChannel> {
        self.channels.get(bone)
    }

    /// Every keyed frame across all bones, ascending and without repeats.
    #[must_use]
    pub fn frame_numbers(&self) -> Vec<Frame> {
        let mut frames: Vec<Frame> = self
            .channels
            .values()
            .flat_map(|c| c.location.frames().chain(c.rotation.frames()))
            .collect();
        frames.sort_unstable();
        frames.dedup();
        frames
    }

    /// First to last keyed frame, if the clip has any keys.
    #[must_use]
    pub fn frame_span(&self) -> Option<FrameSpan> {
        let frames = self.frame_numbers();
        Some(FrameSpan::new(*frames.first()?, *frames.last()?))
    }

    /// Authored length in frames (zero for an unkeyed clip).
    #[must_use]
    pub fn authored_length(&self) -> Frame {
        self.frame_span().map_or(0, |span| span.len())
    }

    /// Sample a bone at `frame`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::MissingChannel`] if the bone has no keys here.
    pub fn sample(&self, bone: &str, frame: Frame) -> Result<BoneSample> {
        let channel = self
            .channels
            .get(bone)
            .ok_or_else(|| SceneError::missing_channel(&self.name, bone))?;
        let location = channel.location.evaluate(frame).unwrap_or_else(Vector3::zeros);
        let rotation = channel
            .rotation
            .evaluate(frame)
            .unwrap_or_else(UnitQuaternion::identity);
        Ok(BoneSample { location, rotation })
    }
}
