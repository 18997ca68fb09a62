//! 4x4 affine transforms built from an offset and a rotation.
//!
//! Root-object compensation works on homogeneous matrices because the host
//! reports object placement as a world matrix. The helpers here build such a
//! matrix from its parts and take it apart again.

use nalgebra::{
    Dim, Matrix, Matrix3, Matrix4, Rotation3, UnitQuaternion, Vector3, storage::RawStorage,
};

/// A rotation given either as a matrix or as a quaternion.
///
/// [`compose`] accepts anything convertible into this, so callers can pass
/// whichever form the host handed them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rotation {
    /// A 3x3 rotation matrix. It may carry a uniform scale, which is kept.
    Matrix(Matrix3<f64>),
    /// A unit quaternion.
    Quaternion(UnitQuaternion<f64>),
}

impl Rotation {
    /// Rotation expanded to a 3x3 matrix.
    #[must_use]
    pub fn to_matrix(&self) -> Matrix3<f64> {
        match self {
            Self::Matrix(m) => *m,
            Self::Quaternion(q) => q.to_rotation_matrix().into_inner(),
        }
    }
}

impl From<Matrix3<f64>> for Rotation {
    fn from(m: Matrix3<f64>) -> Self {
        Self::Matrix(m)
    }
}

/// Uses the upper-left 3x3 block; any translation is discarded.
impl From<Matrix4<f64>> for Rotation {
    fn from(m: Matrix4<f64>) -> Self {
        Self::Matrix(rotation_part(&m))
    }
}

impl From<Rotation3<f64>> for Rotation {
    fn from(r: Rotation3<f64>) -> Self {
        Self::Matrix(r.into_inner())
    }
}

impl From<UnitQuaternion<f64>> for Rotation {
    fn from(q: UnitQuaternion<f64>) -> Self {
        Self::Quaternion(q)
    }
}

/// Combine a rotation and an offset into one 4x4 transform.
///
/// The rotation is applied first, then the translation by `offset`:
/// `compose(t, r) * p == r * p + t`. Reversing the order would rotate the
/// offset as well and bend every animated trajectory.
///
/// ```
/// use nalgebra::{Point3, UnitQuaternion, Vector3};
/// use pivot_types::transform::compose;
///
/// let quarter = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_2);
/// let m = compose(&Vector3::new(1.0, 0.0, 0.0), quarter);
/// let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
/// assert!((p - Point3::new(1.0, 1.0, 0.0)).norm() < 1e-12);
/// ```
#[must_use]
pub fn compose(offset: &Vector3<f64>, rotation: impl Into<Rotation>) -> Matrix4<f64> {
    let rotation = rotation.into().to_matrix().to_homogeneous();
    Matrix4::new_translation(offset) * rotation
}

/// Largest absolute entry of any matrix.
///
/// Only used for tolerance comparisons, e.g. `max_abs(&(a - b)) < 1e-3`.
#[must_use]
pub fn max_abs<R, C, S>(matrix: &Matrix<f64, R, C, S>) -> f64
where
    R: Dim,
    C: Dim,
    S: RawStorage<f64, R, C>,
{
    matrix.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

/// Translation column of a homogeneous transform.
#[must_use]
pub fn translation_part(m: &Matrix4<f64>) -> Vector3<f64> {
    Vector3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)])
}

/// Upper-left 3x3 block of a homogeneous transform (rotation times scale).
#[must_use]
pub fn rotation_part(m: &Matrix4<f64>) -> Matrix3<f64> {
    Matrix3::from_fn(|r, c| m[(r, c)])
}
