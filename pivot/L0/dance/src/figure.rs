//! One dancer and the clips placed on its timeline.
//!
//! A [`Figure`] keeps the ordered list of [`PlacedClip`]s for one model and
//! writes root keyframes so each step starts where the previous one left
//! the figure. The first entry is always the idle clip, stretched over the
//! whole dance by [`Figure::housekeeping`].

use std::fmt;
use std::sync::Arc;

use nalgebra::{Matrix3, Matrix4, Vector3};
use tracing::{debug, info};

use pivot_scene::{ActionStrip, KeyKind, MotionClip, Scene};
use pivot_types::transform::{compose, rotation_part, translation_part};
use pivot_types::{Dancer, Foot, Frame, FrameSpan, PivotConfig};

use crate::error::{DanceError, Result};
use crate::step::{self, StepRef};

/// Length of a placed clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Duration {
    /// The clip's own authored length.
    #[default]
    Default,
    /// An explicit number of frames.
    Frames(Frame),
}

impl From<Frame> for Duration {
    fn from(frames: Frame) -> Self {
        Self::Frames(frames)
    }
}

/// A clip bound to an interval of a figure's timeline.
#[derive(Debug, Clone)]
pub struct PlacedClip {
    /// The clip being played.
    pub clip: Arc<MotionClip>,
    /// Where it plays.
    pub span: FrameSpan,
    displacement: Option<Matrix4<f64>>,
}

impl PlacedClip {
    fn new(clip: Arc<MotionClip>, span: FrameSpan) -> Self {
        Self {
            clip,
            span,
            displacement: None,
        }
    }

    /// Clip name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.clip.name()
    }

    /// True for a stepping clip.
    #[must_use]
    pub fn is_motion(&self) -> bool {
        step::is_motion(&self.clip)
    }

    /// Root displacement cached when a motion clip was placed.
    #[must_use]
    pub const fn displacement(&self) -> Option<&Matrix4<f64>> {
        self.displacement.as_ref()
    }
}

impl From<&PlacedClip> for StepRef {
    fn from(placed: &PlacedClip) -> Self {
        Self::Clip(Arc::clone(&placed.clip))
    }
}

/// An animated dancer.
///
/// # Example
///
/// ```
/// use pivot_dance::{Duration, Figure};
/// use pivot_scene::{studio, Scene};
/// use pivot_types::{Dancer, PivotConfig};
///
/// let mut scene = studio::mannequin_studio();
/// let mut man = Figure::new(&scene, Dancer::Man, &PivotConfig::default()).unwrap();
///
/// man.reset(&mut scene).unwrap();
/// man.add_motion(&mut scene, "step forward L to R", Duration::Frames(12), None).unwrap();
/// man.add_motion(&mut scene, "step side R to L", Duration::Frames(12), None).unwrap();
/// man.housekeeping(&mut scene).unwrap();
///
/// scene.set_current_frame(25);
/// let y = scene.location("dancer male").unwrap().y;
/// assert!((y - -1.007).abs() < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct Figure {
    dancer: Dancer,
    model: String,
    armature: String,
    foot: Foot,
    placed: Vec<PlacedClip>,
    config: PivotConfig,
}

impl Figure {
    /// Figure for `dancer`, using the model and armature named in `config`.
    ///
    /// The figure starts with an empty timeline; call [`Self::reset`] before
    /// placing clips.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the model or armature is not in the scene.
    pub fn new<S: Scene + ?Sized>(scene: &S, dancer: Dancer, config: &PivotConfig) -> Result<Self> {
        let model = config.names.models.get(dancer).clone();
        let armature = config.names.armature.clone();
        scene.lookup(&model)?;
        scene.lookup(&armature)?;
        Ok(Self {
            dancer,
            model,
            armature,
            foot: *config.leading_feet.get(dancer),
            placed: Vec::new(),
            config: config.clone(),
        })
    }

    /// Figure from a nickname such as `man` or `woman`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown nickname.
    pub fn from_nickname<S: Scene + ?Sized>(
        scene: &S,
        nickname: &str,
        config: &PivotConfig,
    ) -> Result<Self> {
        Self::new(scene, nickname.parse()?, config)
    }

    /// Which dancer this is.
    #[must_use]
    pub const fn dancer(&self) -> Dancer {
        self.dancer
    }

    /// Name of the model object in the host.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Foot the next step starts on.
    #[must_use]
    pub const fn foot(&self) -> Foot {
        self.foot
    }

    /// The timeline, idle clip first.
    #[must_use]
    pub fn placed(&self) -> &[PlacedClip] {
        &self.placed
    }

    /// Largest end frame on the timeline, or 1 if nothing is placed.
    #[must_use]
    pub fn last_frame(&self) -> Frame {
        self.placed
            .iter()
            .map(|p| p.span.end)
            .fold(1, Frame::max)
    }

    /// One-line description of the figure.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} '{}': foot {}, {} clips, last frame {}",
            self.dancer.nickname(),
            self.model,
            self.foot,
            self.placed.len(),
            self.last_frame()
        )
    }

    /// Put the figure back in its initial state.
    ///
    /// Leaves only the idle clip on the timeline, moves the model to the
    /// origin unrotated, clears its keys and keys that placement on the
    /// start frame.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the idle clip or the model is missing.
    pub fn reset<S: Scene>(&mut self, scene: &mut S) -> Result<()> {
        let start = self.config.start_frame;
        let idle = scene.clip(&self.config.names.idle_clip)?;
        self.placed = vec![PlacedClip::new(idle, FrameSpan::new(start, start))];
        self.foot = *self.config.leading_feet.get(self.dancer);

        scene.clear_keyframes(&self.model)?;
        scene.goto_frame(start, false);
        scene.set_location(&self.model, Vector3::zeros())?;
        scene.set_rotation(&self.model, Vector3::zeros())?;
        scene.insert_keyframe(&self.model, KeyKind::LocRot)?;
        self.bind(scene)?;
        debug!(dancer = self.dancer.nickname(), start, "Reset figure");
        Ok(())
    }

    /// Add the figure's embrace clip under the whole dance.
    ///
    /// With a partner, also moves the figure to its embrace offset from the
    /// partner's current location and heading.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if this dancer has no embrace, or a
    /// lookup error if its clip is missing.
    pub fn embrace<S: Scene>(&mut self, scene: &mut S, partner: Option<&Self>) -> Result<()> {
        self.require_reset()?;
        let offset = self.config.embrace.get(self.dancer).clone().ok_or_else(|| {
            DanceError::configuration(format!(
                "no embrace defined for the {}",
                self.dancer.nickname()
            ))
        })?;
        let clip = scene.clip(&offset.clip)?;
        let start = self.config.start_frame;
        self.placed
            .push(PlacedClip::new(clip, FrameSpan::new(start, start)));
        let last = self.last_frame();
        if let Some(embrace) = self.placed.last_mut() {
            embrace.span.end = last;
        }

        if let Some(partner) = partner {
            let there = scene.location(&partner.model)?;
            let heading = scene.rotation(&partner.model)?;
            let mut location = scene.location(&self.model)?;
            let mut rotation = scene.rotation(&self.model)?;
            location.x = there.x + offset.dx;
            location.y = there.y + offset.dy;
            rotation.z = heading.z + offset.drot_z;
            scene.set_location(&self.model, location)?;
            scene.set_rotation(&self.model, rotation)?;
        }
        scene.insert_keyframe(&self.model, KeyKind::LocRot)?;
        self.bind(scene)?;
        info!(
            dancer = self.dancer.nickname(),
            clip = %offset.clip,
            partner = partner.map(|p| p.dancer.nickname()),
            "Embrace"
        );
        Ok(())
    }

    /// Place a clip after the last motion clip and key the root to match.
    ///
    /// The clip goes ahead of any trailing pose clips. It starts at `start`
    /// if given, else where the previous motion clip ends, else on the start
    /// frame. The model is moved in world space by the previous motion clip's
    /// root displacement, corrected for scale and heading, and keyed at the new
    /// clip's start and one frame before its end.
    ///
    /// # Errors
    ///
    /// Returns a resolution or lookup error, or a configuration error for a
    /// non-positive duration or a clip ending past the last frame.
    pub fn add_motion<S: Scene>(
        &mut self,
        scene: &mut S,
        request: impl Into<StepRef>,
        duration: Duration,
        start: Option<Frame>,
    ) -> Result<FrameSpan> {
        self.require_reset()?;
        let clip = step::resolve(&*scene, request, self.foot, false, None)?;
        let length = match duration {
            Duration::Default => clip.authored_length(),
            Duration::Frames(frames) => frames,
        };
        if length <= 0 {
            return Err(DanceError::configuration(format!(
                "clip '{}' needs a positive duration, got {length}",
                clip.name()
            )));
        }

        let mut index = self.placed.len();
        while index > 1 && !self.placed[index - 1].is_motion() {
            index -= 1;
        }
        let previous = (index > 1).then(|| &self.placed[index - 1]);
        let start = start
            .or_else(|| previous.map(|p| p.span.end))
            .unwrap_or(self.config.start_frame);
        let continuation = previous
            .and_then(PlacedClip::displacement)
            .copied()
            .unwrap_or_else(Matrix4::identity);
        let span = FrameSpan::checked_starting_at(start, length).ok_or_else(|| {
            DanceError::configuration(format!(
                "clip '{}' at frame {start} for {length} frames runs past the last frame",
                clip.name()
            ))
        })?;

        let mut placed = PlacedClip::new(Arc::clone(&clip), span);
        if placed.is_motion() {
            placed.displacement = Some(step::intrinsic_displacement(&clip, &self.config.root_bone)?);
        }
        self.placed.insert(index, placed);
        if let Some(foot) = Foot::ending_in(clip.name()) {
            self.foot = foot;
        }

        self.place(scene, &continuation, span)?;
        self.bind(scene)?;
        info!(
            dancer = self.dancer.nickname(),
            clip = clip.name(),
            start = span.start,
            end = span.end,
            index,
            "Placed clip"
        );
        Ok(span)
    }

    /// Keep the timeline consistent after a placement.
    ///
    /// Stretches the idle clip, and a trailing pose clip, to the last frame
    /// and returns the host to the start frame.
    ///
    /// # Errors
    ///
    /// Returns a configuration error before [`Self::reset`], or a lookup
    /// error from the host.
    pub fn housekeeping<S: Scene>(&mut self, scene: &mut S) -> Result<()> {
        self.require_reset()?;
        let last = self.last_frame();
        self.placed[0].span.end = last;
        if let Some(tail) = self.placed.last_mut() {
            if !tail.is_motion() {
                tail.span.end = last;
            }
        }
        self.bind(scene)?;
        scene.goto_frame(self.config.start_frame, false);
        Ok(())
    }

    /// Dance a list of short step names, alternating feet.
    ///
    /// Resets, embraces and places one clip of `frames_per_step` frames per
    /// step. A partner gets the mirrored sequence, starting on the other
    /// foot and embracing this figure.
    ///
    /// # Errors
    ///
    /// Returns the first error from resolution or placement.
    pub fn walk_sequence<S: Scene, T: AsRef<str>>(
        &mut self,
        scene: &mut S,
        starting_foot: Foot,
        steps: &[T],
        partner: Option<&mut Self>,
        frames_per_step: Frame,
    ) -> Result<()> {
        let (partner_foot, partner_steps) = mirror_steps(starting_foot, steps)?;

        self.reset(scene)?;
        self.embrace(scene, None)?;
        self.walk(scene, starting_foot, steps, frames_per_step)?;
        self.housekeeping(scene)?;

        if let Some(partner) = partner {
            partner.reset(scene)?;
            partner.embrace(scene, Some(&*self))?;
            partner.walk(scene, partner_foot, partner_steps.as_slice(), frames_per_step)?;
            partner.housekeeping(scene)?;
        }
        Ok(())
    }

    fn walk<S: Scene, T: AsRef<str>>(
        &mut self,
        scene: &mut S,
        mut foot: Foot,
        steps: &[T],
        frames_per_step: Frame,
    ) -> Result<()> {
        for name in steps {
            let clip = step::resolve(&*scene, name.as_ref(), foot, false, None)?;
            self.add_motion(scene, clip, Duration::Frames(frames_per_step), None)?;
            foot = foot.flip();
        }
        Ok(())
    }

    /// Adjust a clip's root displacement to the host.
    ///
    /// The offset is scaled by the armature scale only (the model's own
    /// scale reaches it through the world matrix) and turned into the
    /// model's heading at `frame`, or left unturned when `frame <= 0`.
    /// The rotation part passes through.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the model or armature is missing.
    pub fn correct_transform<S: Scene>(
        &self,
        scene: &mut S,
        transform: &Matrix4<f64>,
        frame: Frame,
    ) -> Result<Matrix4<f64>> {
        let armature_scale = scene.scale(&self.armature)?;
        let offset = translation_part(transform) * armature_scale;
        let orientation = if frame > 0 {
            let world = scene.with_frame(frame, |s| s.world_matrix(&self.model))?;
            rotation_part(&world)
        } else {
            Matrix3::identity()
        };
        let shift = orientation * offset;
        debug!(
            dancer = self.dancer.nickname(),
            frame,
            armature_scale,
            x = shift.x,
            y = shift.y,
            z = shift.z,
            "Corrected transform"
        );
        Ok(compose(&shift, rotation_part(transform)))
    }

    fn place<S: Scene>(
        &self,
        scene: &mut S,
        continuation: &Matrix4<f64>,
        span: FrameSpan,
    ) -> Result<()> {
        let motion = self.correct_transform(scene, continuation, span.start.saturating_sub(1))?;
        let model = self.model.as_str();
        scene.with_frame(span.start, |s| -> Result<()> {
            let current = s.world_matrix(model)?;
            s.set_world_matrix(model, &(motion * current))?;
            s.insert_keyframe(model, KeyKind::LocRot)?;
            Ok(())
        })?;
        scene.with_frame(span.end - 1, |s| s.insert_keyframe(model, KeyKind::LocRot))?;
        Ok(())
    }

    fn bind<S: Scene>(&self, scene: &mut S) -> Result<()> {
        let strips: Vec<ActionStrip> = self
            .placed
            .iter()
            .map(|p| ActionStrip::new(p.name(), p.span))
            .collect();
        scene.bind_strips(&self.model, &self.armature, &strips)?;
        Ok(())
    }

    fn require_reset(&self) -> Result<()> {
        if self.placed.is_empty() {
            return Err(DanceError::configuration(format!(
                "the {} has not been reset",
                self.dancer.nickname()
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// The partner's half of a walk: the other starting foot and every step
/// mirrored.
///
/// ```
/// use pivot_dance::mirror_steps;
/// use pivot_types::Foot;
///
/// let (foot, steps) = mirror_steps(Foot::Left, &["forward", "side"]).unwrap();
/// assert_eq!(foot, Foot::Right);
/// assert_eq!(steps, vec!["back", "side"]);
/// ```
///
/// # Errors
///
/// Returns a resolution error for a name with no mirror image.
pub fn mirror_steps<T: AsRef<str>>(
    starting_foot: Foot,
    steps: &[T],
) -> Result<(Foot, Vec<&'static str>)> {
    let mirrored = steps
        .iter()
        .map(|s| {
            let name = s.as_ref();
            step::flip(name).ok_or_else(|| DanceError::resolution(name, "step has no mirror image"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((starting_foot.flip(), mirrored))
}
