//! In-memory animation host.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use nalgebra::{Matrix4, Rotation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use pivot_types::Frame;
use pivot_types::transform::{rotation_part, translation_part};

use crate::clip::MotionClip;
use crate::curve::KeyframeCurve;
use crate::error::{DataKind, Result, SceneError};
use crate::scene::{ActionStrip, KeyKind, Scene};

/// Suffix naming an object's keyframe curve in [`Scene::lookup`].
pub const CURVE_SUFFIX: &str = ".keys";

/// A placeable object: a model or an armature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Location at the current frame.
    pub location: Vector3<f64>,
    /// Rotation at the current frame.
    pub rotation: UnitQuaternion<f64>,
    /// Uniform scale.
    pub scale: f64,
    /// Keyed locations.
    #[serde(default)]
    pub location_keys: KeyframeCurve<Vector3<f64>>,
    /// Keyed rotations.
    #[serde(default)]
    pub rotation_keys: KeyframeCurve<UnitQuaternion<f64>>,
    /// Clips bound to the object's timeline.
    #[serde(default)]
    pub strips: Vec<ActionStrip>,
    /// Skeleton the strips play on.
    #[serde(default)]
    pub strip_target: Option<String>,
}

impl Default for SceneObject {
    fn default() -> Self {
        Self::with_scale(1.0)
    }
}

impl SceneObject {
    /// Unkeyed object at the origin with the given scale.
    #[must_use]
    pub fn with_scale(scale: f64) -> Self {
        Self {
            location: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale,
            location_keys: KeyframeCurve::new(),
            rotation_keys: KeyframeCurve::new(),
            strips: Vec::new(),
            strip_target: None,
        }
    }

    /// True if either curve has keys.
    #[must_use]
    pub fn is_animated(&self) -> bool {
        !self.location_keys.is_empty() || !self.rotation_keys.is_empty()
    }

    /// World matrix: `T(location) * R(rotation) * S(scale)`.
    #[must_use]
    pub fn world_matrix(&self) -> Matrix4<f64> {
        Matrix4::new_translation(&self.location)
            * self.rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&Vector3::repeat(self.scale))
    }

    fn pose_at(&mut self, frame: Frame) {
        if let Some(location) = self.location_keys.evaluate(frame) {
            self.location = location;
        }
        if let Some(rotation) = self.rotation_keys.evaluate(frame) {
            self.rotation = rotation;
        }
    }
}

/// A scene held entirely in memory.
///
/// Behaves like an animation host: changing the current frame re-poses
/// every keyed object from its curves, and edits to an object's placement
/// last only until the next frame change unless keyed.
///
/// # Example
///
/// ```
/// use nalgebra::Vector3;
/// use pivot_scene::{KeyKind, MemoryScene, Scene, SceneObject};
///
/// let mut scene = MemoryScene::new();
/// scene.add_object("dancer", SceneObject::default());
///
/// scene.set_current_frame(1);
/// scene.insert_keyframe("dancer", KeyKind::LocRot).unwrap();
/// scene.set_current_frame(11);
/// scene.set_location("dancer", Vector3::new(10.0, 0.0, 0.0)).unwrap();
/// scene.insert_keyframe("dancer", KeyKind::LocRot).unwrap();
///
/// scene.set_current_frame(6);
/// assert!((scene.location("dancer").unwrap().x - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryScene {
    frame: Frame,
    objects: BTreeMap<String, SceneObject>,
    clips: BTreeMap<String, Arc<MotionClip>>,
    #[serde(skip)]
    redraws: usize,
}

impl MemoryScene {
    /// Empty scene at frame 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frame: 1,
            ..Default::default()
        }
    }

    /// Add or replace an object.
    pub fn add_object(&mut self, name: impl Into<String>, object: SceneObject) {
        self.objects.insert(name.into(), object);
    }

    /// Add or replace a clip.
    pub fn add_clip(&mut self, clip: MotionClip) {
        self.clips.insert(clip.name().to_string(), Arc::new(clip));
    }

    /// Builder form of [`Self::add_object`].
    #[must_use]
    pub fn with_object(mut self, name: impl Into<String>, object: SceneObject) -> Self {
        self.add_object(name, object);
        self
    }

    /// Builder form of [`Self::add_clip`].
    #[must_use]
    pub fn with_clip(mut self, clip: MotionClip) -> Self {
        self.add_clip(clip);
        self
    }

    /// Object by name.
    #[must_use]
    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.get(name)
    }

    /// Number of redraws requested so far.
    #[must_use]
    pub const fn redraw_count(&self) -> usize {
        self.redraws
    }

    /// Short multi-line description: objects with scale and key counts, then clips.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = format!(" current frame is {}\n objects:\n", self.frame);
        for (name, object) in &self.objects {
            out.push_str(&format!(
                "  '{name}' scale={} keys={} strips={}\n",
                object.scale,
                object.location_keys.len(),
                object.strips.len()
            ));
        }
        out.push_str(" clips:\n");
        for name in self.clips.keys() {
            out.push_str(&format!("  '{name}'\n"));
        }
        out
    }

    /// Decode a scene from JSON. The current frame is re-applied to all objects.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Json`] for malformed input.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut scene: Self = serde_json::from_str(json)?;
        let frame = scene.frame;
        scene.set_current_frame(frame);
        Ok(scene)
    }

    /// Read a scene from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an I/O or JSON error.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Encode the scene as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Json`] if encoding fails.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the scene to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an I/O or JSON error.
    pub fn write_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    fn get(&self, name: &str) -> Result<&SceneObject> {
        self.objects
            .get(name)
            .ok_or_else(|| SceneError::not_found(DataKind::Object, name))
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut SceneObject> {
        self.objects
            .get_mut(name)
            .ok_or_else(|| SceneError::not_found(DataKind::Object, name))
    }
}

impl Scene for MemoryScene {
    fn current_frame(&self) -> Frame {
        self.frame
    }

    fn set_current_frame(&mut self, frame: Frame) {
        self.frame = frame;
        for object in self.objects.values_mut() {
            object.pose_at(frame);
        }
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    fn lookup(&self, name: &str) -> Result<DataKind> {
        if self.objects.contains_key(name) {
            return Ok(DataKind::Object);
        }
        if self.clips.contains_key(name) {
            return Ok(DataKind::Clip);
        }
        let keyed = name
            .strip_suffix(CURVE_SUFFIX)
            .and_then(|object| self.objects.get(object))
            .is_some_and(SceneObject::is_animated);
        if keyed {
            return Ok(DataKind::Curve);
        }
        Err(SceneError::not_found_anywhere(name))
    }

    fn clip(&self, name: &str) -> Result<Arc<MotionClip>> {
        self.clips
            .get(name)
            .cloned()
            .ok_or_else(|| SceneError::not_found(DataKind::Clip, name))
    }

    fn clip_names(&self) -> Vec<String> {
        self.clips.keys().cloned().collect()
    }

    fn object_names(&self) -> Vec<String> {
        self.objects.keys().cloned().collect()
    }

    fn location(&self, object: &str) -> Result<Vector3<f64>> {
        Ok(self.get(object)?.location)
    }

    fn set_location(&mut self, object: &str, location: Vector3<f64>) -> Result<()> {
        self.get_mut(object)?.location = location;
        Ok(())
    }

    fn rotation(&self, object: &str) -> Result<Vector3<f64>> {
        let (x, y, z) = self.get(object)?.rotation.euler_angles();
        Ok(Vector3::new(x, y, z))
    }

    fn set_rotation(&mut self, object: &str, euler: Vector3<f64>) -> Result<()> {
        self.get_mut(object)?.rotation = UnitQuaternion::from_euler_angles(euler.x, euler.y, euler.z);
        Ok(())
    }

    fn scale(&self, object: &str) -> Result<f64> {
        Ok(self.get(object)?.scale)
    }

    fn world_matrix(&self, object: &str) -> Result<Matrix4<f64>> {
        Ok(self.get(object)?.world_matrix())
    }

    fn set_world_matrix(&mut self, object: &str, matrix: &Matrix4<f64>) -> Result<()> {
        let basis = rotation_part(matrix);
        let scale = basis.column(0).norm();
        if scale < 1e-12 || !scale.is_finite() {
            return Err(SceneError::DegenerateMatrix(object.to_string()));
        }
        let rotation =
            UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(basis / scale));
        let target = self.get_mut(object)?;
        target.location = translation_part(matrix);
        target.rotation = rotation;
        target.scale = scale;
        Ok(())
    }

    fn insert_keyframe(&mut self, object: &str, kind: KeyKind) -> Result<()> {
        let frame = self.frame;
        let target = self.get_mut(object)?;
        if kind.keys_location() {
            target.location_keys.insert(frame, target.location);
        }
        if kind.keys_rotation() {
            target.rotation_keys.insert(frame, target.rotation);
        }
        debug!(object, frame, ?kind, "Inserted keyframe");
        Ok(())
    }

    fn clear_keyframes(&mut self, object: &str) -> Result<()> {
        let target = self.get_mut(object)?;
        target.location_keys.clear();
        target.rotation_keys.clear();
        Ok(())
    }

    fn keyframe_count(&self, object: &str) -> Result<usize> {
        Ok(self.get(object)?.location_keys.len())
    }

    fn bind_strips(&mut self, object: &str, target: &str, strips: &[ActionStrip]) -> Result<()> {
        self.get(target)?;
        if let Some(missing) = strips.iter().find(|s| !self.clips.contains_key(&s.clip)) {
            return Err(SceneError::not_found(DataKind::Clip, missing.clip.clone()));
        }
        let owner = self.get_mut(object)?;
        owner.strips = strips.to_vec();
        owner.strip_target = Some(target.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::clip::BoneSample;
    use approx::assert_relative_eq;
    use pivot_types::FrameSpan;
    use std::f64::consts::PI;

    fn scene() -> MemoryScene {
        MemoryScene::new()
            .with_object("dancer", SceneObject::default())
            .with_object("rig", SceneObject::with_scale(0.5))
            .with_clip(
                MotionClip::new("idle")
                    .with_key("Root", 1, BoneSample::at(Vector3::zeros()))
                    .with_key("Root", 2, BoneSample::at(Vector3::zeros())),
            )
    }

    #[test]
    fn lookup_searches_all_libraries() {
        let mut scene = scene();
        assert_eq!(scene.lookup("dancer").unwrap(), DataKind::Object);
        assert_eq!(scene.lookup("idle").unwrap(), DataKind::Clip);
        assert!(scene.lookup("dancer.keys").is_err());

        scene.insert_keyframe("dancer", KeyKind::LocRot).unwrap();
        assert_eq!(scene.lookup("dancer.keys").unwrap(), DataKind::Curve);

        assert!(matches!(
            scene.lookup(""),
            Err(SceneError::NotFound { .. })
        ));
    }

    #[test]
    fn frame_change_reposes_keyed_objects() {
        let mut scene = scene();
        scene.set_current_frame(1);
        scene.insert_keyframe("dancer", KeyKind::LocRot).unwrap();
        scene.set_current_frame(11);
        scene
            .set_location("dancer", Vector3::new(0.0, -10.0, 0.0))
            .unwrap();
        scene.insert_keyframe("dancer", KeyKind::Loc).unwrap();

        scene.set_current_frame(6);
        assert_relative_eq!(scene.location("dancer").unwrap().y, -5.0);
        scene.set_current_frame(30);
        assert_relative_eq!(scene.location("dancer").unwrap().y, -10.0);
    }

    #[test]
    fn unkeyed_edits_are_lost_on_frame_change() {
        let mut scene = scene();
        scene.insert_keyframe("dancer", KeyKind::LocRot).unwrap();
        scene
            .set_location("dancer", Vector3::new(3.0, 0.0, 0.0))
            .unwrap();
        scene.set_current_frame(2);
        assert_relative_eq!(scene.location("dancer").unwrap().x, 0.0);
    }

    #[test]
    fn with_frame_restores_frame() {
        let mut scene = scene();
        scene.set_current_frame(4);
        let seen = scene.with_frame(20, |s| s.current_frame());
        assert_eq!(seen, 20);
        assert_eq!(scene.current_frame(), 4);
    }

    #[test]
    fn goto_frame_redraws() {
        let mut scene = scene();
        assert_eq!(scene.goto_frame(2, true), 2);
        assert_eq!(scene.goto_frame(3, false), 3);
        assert_eq!(scene.redraw_count(), 1);
    }

    #[test]
    fn world_matrix_round_trip() {
        let mut scene = scene();
        scene
            .set_rotation("rig", Vector3::new(0.0, 0.0, PI / 2.0))
            .unwrap();
        scene.set_location("rig", Vector3::new(1.0, 2.0, 3.0)).unwrap();
        let m = scene.world_matrix("rig").unwrap();
        assert_relative_eq!(m[(0, 1)], -0.5, epsilon = 1e-12);

        scene.set_world_matrix("dancer", &m).unwrap();
        assert_relative_eq!(scene.scale("dancer").unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(
            scene.location("dancer").unwrap(),
            Vector3::new(1.0, 2.0, 3.0)
        );
        assert_relative_eq!(scene.rotation("dancer").unwrap().z, PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_matrix_rejected() {
        let mut scene = scene();
        let err = scene
            .set_world_matrix("dancer", &Matrix4::zeros())
            .unwrap_err();
        assert!(matches!(err, SceneError::DegenerateMatrix(_)));
    }

    #[test]
    fn clear_keyframes_empties_curves() {
        let mut scene = scene();
        scene.insert_keyframe("dancer", KeyKind::LocRot).unwrap();
        assert_eq!(scene.keyframe_count("dancer").unwrap(), 1);
        scene.clear_keyframes("dancer").unwrap();
        assert_eq!(scene.keyframe_count("dancer").unwrap(), 0);
    }

    #[test]
    fn bind_strips_checks_names() {
        let mut scene = scene();
        let strips = vec![ActionStrip::new("idle", FrameSpan::new(1, 13))];
        scene.bind_strips("dancer", "rig", &strips).unwrap();
        assert_eq!(scene.object("dancer").unwrap().strips, strips);
        assert_eq!(
            scene.object("dancer").unwrap().strip_target.as_deref(),
            Some("rig")
        );

        let bad = vec![ActionStrip::new("nope", FrameSpan::new(1, 2))];
        assert!(scene.bind_strips("dancer", "rig", &bad).is_err());
        assert!(scene.bind_strips("dancer", "skeleton", &strips).is_err());
    }

    #[test]
    fn json_round_trip_keeps_keys() {
        let mut scene = scene();
        scene.insert_keyframe("dancer", KeyKind::LocRot).unwrap();
        let json = scene.to_json_string().unwrap();
        let restored = MemoryScene::from_json_str(&json).unwrap();
        assert_eq!(restored.keyframe_count("dancer").unwrap(), 1);
        assert_eq!(restored.clip_names(), vec!["idle".to_string()]);
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        scene().write_json_file(&path).unwrap();
        let restored = MemoryScene::from_json_file(&path).unwrap();
        assert_eq!(restored.object_names(), vec!["dancer", "rig"]);
    }

    #[test]
    fn summary_lists_everything() {
        let text = scene().summary();
        assert!(text.contains("'dancer'"));
        assert!(text.contains("scale=0.5"));
        assert!(text.contains("'idle'"));
    }
}
