//! Clip resolution: from a step request to a concrete motion clip.
//!
//! Step clips follow a naming grammar, `step {name} {foot} to {other foot}`,
//! and pose clips another, `stand on {left|right} foot`. A request is tried
//! against an ordered list of strategies (exact clip name, stepping grammar,
//! posing grammar) and the first clip the host actually has wins.

use std::sync::Arc;

use nalgebra::Matrix4;
use tracing::debug;

use pivot_scene::{MotionClip, Scene, SceneError};
use pivot_types::transform::compose;
use pivot_types::Foot;

use crate::error::{DanceError, Result};

/// Left/right and forward/back symmetry of step vocabulary.
const SYMMETRY: [(&str, &str); 6] = [
    ("R", "L"),
    ("L", "R"),
    ("forward", "back"),
    ("back", "forward"),
    ("side", "side"),
    ("shift", "shift"),
];

/// Short names of stepping clips.
pub const STEP_NAMES: [&str; 4] = ["forward", "back", "side", "shift"];

/// Short names of posing clips, with the clip-name prefix each expands to.
const POSE_NAMES: [(&str, &str); 1] = [("stands", "stand on ")];

/// Prefix marking clips whose legs carry the figure.
pub const MOTION_PREFIX: &str = "step ";

/// Mirrored counterpart of a short step name or foot letter.
///
/// Pose names have no left/right sense of their own and mirror to
/// themselves; their foot is flipped instead.
///
/// ```
/// use pivot_dance::step::flip;
///
/// assert_eq!(flip("forward"), Some("back"));
/// assert_eq!(flip("L"), Some("R"));
/// assert_eq!(flip("twirl"), None);
/// ```
#[must_use]
pub fn flip(name: &str) -> Option<&'static str> {
    SYMMETRY
        .iter()
        .find(|(from, _)| *from == name)
        .map(|(_, to)| *to)
        .or_else(|| POSE_NAMES.iter().find(|(n, _)| *n == name).map(|(n, _)| *n))
}

/// True if `name` is in the stepping or posing vocabulary.
#[must_use]
pub fn is_short_name(name: &str) -> bool {
    STEP_NAMES.contains(&name) || POSE_NAMES.iter().any(|(n, _)| *n == name)
}

/// A step given either by name or as a clip already resolved.
#[derive(Debug, Clone)]
pub enum StepRef {
    /// Full clip name or short step name.
    Name(String),
    /// Clip taken as is.
    Clip(Arc<MotionClip>),
}

impl From<&str> for StepRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for StepRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Arc<MotionClip>> for StepRef {
    fn from(clip: Arc<MotionClip>) -> Self {
        Self::Clip(clip)
    }
}

/// A human-facing step request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSpec {
    /// Full clip name, or short name such as `forward` or `stands`.
    pub name: String,
    /// Foot the step starts on.
    pub foot: Foot,
    /// Ask for the left/right, forward/back mirror image.
    pub mirror: bool,
    /// Free text that may name the ending foot, e.g. `on right`.
    pub qualifier: Option<String>,
}

type Strategy = fn(&StepSpec) -> Option<String>;

const STRATEGIES: [(&str, Strategy); 3] = [
    ("exact", StepSpec::exact_name),
    ("stepping", StepSpec::stepping_name),
    ("posing", StepSpec::posing_name),
];

impl StepSpec {
    /// Request for `name` leading with the left foot, unmirrored.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            foot: Foot::Left,
            mirror: false,
            qualifier: None,
        }
    }

    /// Set the leading foot.
    #[must_use]
    pub const fn with_foot(mut self, foot: Foot) -> Self {
        self.foot = foot;
        self
    }

    /// Set the mirror flag.
    #[must_use]
    pub const fn mirrored(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Set the qualifier.
    #[must_use]
    pub fn with_qualifier(mut self, qualifier: Option<&str>) -> Self {
        self.qualifier = qualifier.map(str::to_string);
        self
    }

    /// Short name and foot after the qualifier and mirroring are applied.
    ///
    /// `None` if the name is outside the step vocabulary, or the request
    /// must be mirrored but its name has no mirror.
    #[must_use]
    pub fn effective(&self) -> Option<(&'static str, Foot)> {
        if !is_short_name(&self.name) {
            return None;
        }
        let foot = self
            .qualifier
            .as_deref()
            .and_then(Foot::ending_in)
            .unwrap_or(self.foot);
        let known = flip(&self.name).and_then(flip)?;
        if self.mirror {
            Some((flip(known)?, foot.flip()))
        } else {
            Some((known, foot))
        }
    }

    fn exact_name(&self) -> Option<String> {
        Some(self.name.clone())
    }

    fn stepping_name(&self) -> Option<String> {
        let (name, foot) = self.effective()?;
        STEP_NAMES
            .contains(&name)
            .then(|| format!("{MOTION_PREFIX}{name} {foot} to {}", foot.flip()))
    }

    fn posing_name(&self) -> Option<String> {
        let (name, foot) = self.effective()?;
        POSE_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, prefix)| format!("{prefix}{} foot", foot.word()))
    }

    /// Find the clip this request names.
    ///
    /// # Errors
    ///
    /// Returns [`DanceError::Resolution`] if the name is outside the step
    /// vocabulary or no constructed clip name exists in the host.
    pub fn resolve<S: Scene + ?Sized>(&self, scene: &S) -> Result<Arc<MotionClip>> {
        let mut tried = Vec::new();
        for (strategy, build) in STRATEGIES {
            let Some(candidate) = build(self) else {
                continue;
            };
            match scene.clip(&candidate) {
                Ok(clip) => {
                    debug!(step = %self.name, strategy, clip = %candidate, "Resolved step");
                    return Ok(clip);
                }
                Err(SceneError::NotFound { .. }) => tried.push(candidate),
                Err(other) => return Err(other.into()),
            }
        }
        if self.effective().is_none() {
            return Err(DanceError::resolution(
                &self.name,
                "not a clip and not in the step vocabulary",
            ));
        }
        Err(DanceError::resolution(
            &self.name,
            format!("no clip named any of {tried:?}"),
        ))
    }
}

/// Resolve a step request to a clip.
///
/// A [`StepRef::Clip`] is returned unchanged. A name is first looked up as a
/// full clip name, then expanded as a short name: the qualifier's ending
/// foot (if any) replaces `foot`, `mirror` flips name and foot, and the
/// stepping then posing grammar builds the clip name.
///
/// # Errors
///
/// Returns [`DanceError::Resolution`] if nothing matches.
pub fn resolve<S: Scene + ?Sized>(
    scene: &S,
    step: impl Into<StepRef>,
    foot: Foot,
    mirror: bool,
    qualifier: Option<&str>,
) -> Result<Arc<MotionClip>> {
    match step.into() {
        StepRef::Clip(clip) => Ok(clip),
        StepRef::Name(name) => StepSpec::new(name)
            .with_foot(foot)
            .mirrored(mirror)
            .with_qualifier(qualifier)
            .resolve(scene),
    }
}

/// True if the clip moves the figure, i.e. its name starts with `step `.
#[must_use]
pub fn is_motion(clip: &MotionClip) -> bool {
    clip.name().starts_with(MOTION_PREFIX)
}

/// How far a clip moves `bone` between its first and last keyframes.
///
/// The translation part is `last - first`; the rotation part turns the
/// first orientation into the last.
///
/// # Errors
///
/// Returns [`SceneError::TooFewKeyframes`] for a clip with fewer than two
/// keyed frames, or [`SceneError::MissingChannel`] if `bone` is not keyed.
pub fn intrinsic_displacement(clip: &MotionClip, bone: &str) -> Result<Matrix4<f64>> {
    let frames = clip.frame_numbers();
    let (Some(&first), Some(&last)) = (frames.first(), frames.last()) else {
        return Err(too_few(clip, frames.len()));
    };
    if first == last {
        return Err(too_few(clip, frames.len()));
    }
    let from = clip.sample(bone, first)?;
    let to = clip.sample(bone, last)?;
    let turn = from.rotation.rotation_to(&to.rotation);
    Ok(compose(&(to.location - from.location), turn))
}

fn too_few(clip: &MotionClip, count: usize) -> DanceError {
    SceneError::TooFewKeyframes {
        clip: clip.name().to_string(),
        count,
    }
    .into()
}
