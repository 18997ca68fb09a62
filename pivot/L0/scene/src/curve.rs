//! Frame-ordered keyframe curves.

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use pivot_types::Frame;

/// Values that can be blended between two keys.
pub trait Interpolate: Clone {
    /// Blend from `self` (t = 0) to `other` (t = 1).
    fn interpolate(&self, other: &Self, t: f64) -> Self;
}

impl Interpolate for f64 {
    fn interpolate(&self, other: &Self, t: f64) -> Self {
        (other - self).mul_add(t, *self)
    }
}

impl Interpolate for Vector3<f64> {
    fn interpolate(&self, other: &Self, t: f64) -> Self {
        self.lerp(other, t)
    }
}

impl Interpolate for UnitQuaternion<f64> {
    fn interpolate(&self, other: &Self, t: f64) -> Self {
        self.try_slerp(other, t, 1.0e-9)
            .unwrap_or(if t < 0.5 { *self } else { *other })
    }
}

/// A keyframe curve: at most one value per frame, kept in frame order.
///
/// Evaluation interpolates linearly between the bracketing keys and holds
/// the first or last value outside the keyed range.
///
/// # Example
///
/// ```
/// use pivot_scene::KeyframeCurve;
///
/// let mut curve = KeyframeCurve::new();
/// curve.insert(1, 0.0);
/// curve.insert(11, 10.0);
///
/// assert_eq!(curve.evaluate(6), Some(5.0));
/// assert_eq!(curve.evaluate(40), Some(10.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeCurve<T> {
    keys: Vec<(Frame, T)>,
}

impl<T> Default for KeyframeCurve<T> {
    fn default() -> Self {
        Self { keys: Vec::new() }
    }
}

impl<T> KeyframeCurve<T> {
    /// Creates an empty curve.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when the curve has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Inserts a key, replacing any existing key on the same frame.
    pub fn insert(&mut self, frame: Frame, value: T) {
        match self.keys.binary_search_by_key(&frame, |(f, _)| *f) {
            Ok(idx) => self.keys[idx].1 = value,
            Err(idx) => self.keys.insert(idx, (frame, value)),
        }
    }

    /// Key exactly on `frame`.
    #[must_use]
    pub fn get(&self, frame: Frame) -> Option<&T> {
        self.keys
            .binary_search_by_key(&frame, |(f, _)| *f)
            .ok()
            .map(|idx| &self.keys[idx].1)
    }

    /// Keyed frame numbers in order.
    pub fn frames(&self) -> impl Iterator<Item = Frame> + '_ {
        self.keys.iter().map(|(f, _)| *f)
    }

    /// First key.
    #[must_use]
    pub fn first(&self) -> Option<&(Frame, T)> {
        self.keys.first()
    }

    /// Last key.
    #[must_use]
    pub fn last(&self) -> Option<&(Frame, T)> {
        self.keys.last()
    }

    /// Indices of the keys bracketing `frame`.
    ///
    /// Both indices are equal on an exact hit and outside the keyed range,
    /// where they point at the nearest end key. `None` for an empty curve.
    #[must_use]
    pub fn find_bracket(&self, frame: Frame) -> Option<(usize, usize)> {
        let last = self.keys.len().checked_sub(1)?;
        match self.keys.binary_search_by_key(&frame, |(f, _)| *f) {
            Ok(idx) => Some((idx, idx)),
            Err(0) => Some((0, 0)),
            Err(idx) if idx > last => Some((last, last)),
            Err(idx) => Some((idx - 1, idx)),
        }
    }

    /// Iterates over `(frame, value)` keys.
    pub fn iter(&self) -> impl Iterator<Item = &(Frame, T)> {
        self.keys.iter()
    }
}

impl<T: Interpolate> KeyframeCurve<T> {
    /// Value of the curve at `frame`, or `None` when there are no keys.
    #[must_use]
    pub fn evaluate(&self, frame: Frame) -> Option<T> {
        let (lo, hi) = self.find_bracket(frame)?;
        let (f0, v0) = &self.keys[lo];
        if lo == hi {
            return Some(v0.clone());
        }
        let (f1, v1) = &self.keys[hi];
        let t = f64::from(frame - f0) / f64::from(f1 - f0);
        Some(v0.interpolate(v1, t))
    }
}
