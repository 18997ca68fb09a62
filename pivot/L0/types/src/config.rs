//! Configuration for a choreography run.
//!
//! Object names in the host, the tempo used to turn beats into frames, the
//! per-dancer embrace offsets and the step-file loader policy. Every field has a default, so a
//! JSON config only needs to name what it changes.

use std::f64::consts::PI;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TypesError};
use crate::foot::{Dancer, Foot};
use crate::span::Frame;

/// Main configuration for a choreography run.
///
/// # Example
///
/// ```
/// use pivot_types::PivotConfig;
///
/// let config = PivotConfig::from_json_str(r#"{ "tempo": { "beats_per_minute": 120.0 } }"#).unwrap();
/// assert_eq!(config.start_frame, 1);
/// assert!((config.tempo.frames_per_beat() - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PivotConfig {
    /// First frame of the dance.
    pub start_frame: Frame,
    /// Bone whose motion a step clip carries.
    pub root_bone: String,
    /// Default clip length for `walk_sequence`.
    pub frames_per_step: Frame,
    /// Beat-to-frame conversion.
    pub tempo: Tempo,
    /// Object and clip names in the host scene.
    pub names: HostNames,
    /// Embrace clip and partner-relative offset per dancer.
    pub embrace: PerDancer<Option<EmbraceOffset>>,
    /// Foot each figure leads with after a reset.
    pub leading_feet: PerDancer<Foot>,
    /// Treat short step-file rows as errors instead of dropping them.
    pub strict_rows: bool,
}

impl Default for PivotConfig {
    fn default() -> Self {
        Self {
            start_frame: 1,
            root_bone: "Root".to_string(),
            frames_per_step: 12,
            tempo: Tempo::default(),
            names: HostNames::default(),
            embrace: PerDancer {
                man: Some(EmbraceOffset::new("embrace man", 0.407_804, 1.579_339, PI)),
                woman: Some(EmbraceOffset::new("embrace woman", -0.407_804, -1.579_339, PI)),
            },
            leading_feet: PerDancer {
                man: Foot::Left,
                woman: Foot::Right,
            },
            strict_rows: false,
        }
    }
}

impl PivotConfig {
    /// Parse a JSON config over the defaults and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or [`Self::from_json_str`] fails.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.start_frame < 0 {
            return Err(TypesError::invalid_config(format!(
                "start_frame must be >= 0, got {}",
                self.start_frame
            )));
        }
        if self.frames_per_step <= 0 {
            return Err(TypesError::invalid_config(format!(
                "frames_per_step must be positive, got {}",
                self.frames_per_step
            )));
        }
        if self.root_bone.is_empty() {
            return Err(TypesError::invalid_config("root_bone must not be empty"));
        }
        self.tempo.validate()
    }
}

/// Tempo of the piece being danced.
///
/// The step file counts time in beats; `frames_per_beat` is the ratio
/// `seconds_per_minute / beats_per_minute`, truncated to whole frames by the
/// sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tempo {
    /// Numerator of the beat ratio.
    pub seconds_per_minute: f64,
    /// Beats per minute of the music.
    pub beats_per_minute: f64,
}

impl Default for Tempo {
    fn default() -> Self {
        Self {
            seconds_per_minute: 60.0,
            beats_per_minute: 70.0,
        }
    }
}

impl Tempo {
    /// Create a tempo for the given beats per minute.
    #[must_use]
    pub fn with_bpm(beats_per_minute: f64) -> Self {
        Self {
            beats_per_minute,
            ..Default::default()
        }
    }

    /// Frames per beat.
    #[must_use]
    pub fn frames_per_beat(&self) -> f64 {
        self.seconds_per_minute / self.beats_per_minute
    }

    fn validate(&self) -> Result<()> {
        if self.beats_per_minute <= 0.0 || !self.beats_per_minute.is_finite() {
            return Err(TypesError::invalid_config(format!(
                "beats_per_minute must be positive, got {}",
                self.beats_per_minute
            )));
        }
        if self.seconds_per_minute <= 0.0 || !self.seconds_per_minute.is_finite() {
            return Err(TypesError::invalid_config(format!(
                "seconds_per_minute must be positive, got {}",
                self.seconds_per_minute
            )));
        }
        Ok(())
    }
}

/// Names of the objects and clips the engine expects in the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostNames {
    /// Shared skeleton both models are bound to.
    pub armature: String,
    /// Background clip spanning the whole dance.
    pub idle_clip: String,
    /// Model object per dancer.
    pub models: PerDancer<String>,
}

impl Default for HostNames {
    fn default() -> Self {
        Self {
            armature: "mannequin".to_string(),
            idle_clip: "default action".to_string(),
            models: PerDancer {
                man: "dancer male".to_string(),
                woman: "dancer female".to_string(),
            },
        }
    }
}

/// Embrace pose clip and the offset from the partner it puts the figure at.
///
/// Only the planar part is used: `(dx, dy)` location and rotation about Z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbraceOffset {
    /// Upper-body clip holding the embrace.
    pub clip: String,
    /// X offset from the partner's location.
    pub dx: f64,
    /// Y offset from the partner's location.
    pub dy: f64,
    /// Rotation about Z relative to the partner, radians.
    pub drot_z: f64,
}

impl EmbraceOffset {
    /// Create an embrace offset.
    #[must_use]
    pub fn new(clip: impl Into<String>, dx: f64, dy: f64, drot_z: f64) -> Self {
        Self {
            clip: clip.into(),
            dx,
            dy,
            drot_z,
        }
    }
}

/// A value for each dancer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerDancer<T> {
    /// Value for the man.
    pub man: T,
    /// Value for the woman.
    pub woman: T,
}

impl<T> PerDancer<T> {
    /// Value for `dancer`.
    #[must_use]
    pub const fn get(&self, dancer: Dancer) -> &T {
        match dancer {
            Dancer::Man => &self.man,
            Dancer::Woman => &self.woman,
        }
    }

    /// Mutable value for `dancer`.
    pub fn get_mut(&mut self, dancer: Dancer) -> &mut T {
        match dancer {
            Dancer::Man => &mut self.man,
            Dancer::Woman => &mut self.woman,
        }
    }
}
