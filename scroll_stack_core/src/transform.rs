// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal column-major 4×4 transform.
//!
//! Presenters that cannot take translate/scale/rotate as separate operations
//! (CSS `matrix3d()`, native layer APIs) write the composed matrix produced
//! by [`CardTransform::to_matrix`](crate::synth::CardTransform::to_matrix).
//! Only the handful of constructors that composition needs are provided.

use core::ops::Mul;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// A column-major 4×4 affine transform stored as `[[f64; 4]; 4]`.
///
/// Each inner array is one *column*, matching the argument order of CSS
/// `matrix3d()`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Transform3d {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Returns column `i` (0-based).
    ///
    /// # Panics
    ///
    /// Panics if `i >= 4`.
    #[inline]
    #[must_use]
    pub const fn col(self, i: usize) -> [f64; 4] {
        self.cols[i]
    }

    /// Creates a pure translation transform.
    #[inline]
    #[must_use]
    pub const fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Creates a 2-D uniform scale (Z is left untouched, like CSS `scale()`).
    #[inline]
    #[must_use]
    pub const fn from_uniform_scale(s: f64) -> Self {
        Self {
            cols: [
                [s, 0.0, 0.0, 0.0],
                [0.0, s, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a rotation around the Z axis, in degrees, clockwise on screen
    /// (the CSS `rotate()` convention with Y pointing down).
    #[inline]
    #[must_use]
    pub fn from_rotation_z_degrees(degrees: f64) -> Self {
        let radians = degrees.to_radians();
        #[cfg(feature = "std")]
        let (s, c) = radians.sin_cos();
        #[cfg(not(feature = "std"))]
        let (s, c) = (radians.sin(), radians.cos());
        Self {
            cols: [
                [c, s, 0.0, 0.0],
                [-s, c, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Maps the 2-D point `(x, y)` through this transform, ignoring Z.
    #[cfg(test)]
    #[must_use]
    pub(crate) fn apply_point(&self, x: f64, y: f64) -> (f64, f64) {
        let c = &self.cols;
        (
            c[0][0] * x + c[1][0] * y + c[3][0],
            c[0][1] * x + c[1][1] * y + c[3][1],
        )
    }
}

impl Default for Transform3d {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform3d {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let a = &self.cols;
        let b = &rhs.cols;
        let mut out = [[0.0_f64; 4]; 4];
        for (j, col) in out.iter_mut().enumerate() {
            for (i, v) in col.iter_mut().enumerate() {
                *v = a[0][i] * b[j][0] + a[1][i] * b[j][1] + a[2][i] * b[j][2] + a[3][i] * b[j][3];
            }
        }
        Self { cols: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < EPS && (a.1 - b.1).abs() < EPS
    }

    #[test]
    fn identity_is_neutral() {
        let t = Transform3d::from_translation(3.0, -4.0, 0.0);
        assert_eq!(Transform3d::IDENTITY * t, t);
        assert_eq!(t * Transform3d::IDENTITY, t);
        assert_eq!(Transform3d::default(), Transform3d::IDENTITY);
    }

    #[test]
    fn translate_then_scale_order() {
        // T · S: scale about the origin first, then move.
        let m = Transform3d::from_translation(0.0, 100.0, 0.0) * Transform3d::from_uniform_scale(0.5);
        assert!(close(m.apply_point(10.0, 10.0), (5.0, 105.0)));
        assert_eq!(m.col(3), [0.0, 100.0, 0.0, 1.0]);
    }

    #[test]
    fn rotation_is_clockwise_on_screen() {
        let r = Transform3d::from_rotation_z_degrees(90.0);
        // +X rotates onto +Y (downwards on screen).
        assert!(close(r.apply_point(1.0, 0.0), (0.0, 1.0)));
    }

    #[test]
    fn scale_keeps_z() {
        let s = Transform3d::from_uniform_scale(2.0);
        assert_eq!(s.col(2), [0.0, 0.0, 1.0, 0.0]);
    }

    #[cfg(feature = "std")]
    #[test]
    fn rotation_with_std_math() {
        let r = Transform3d::from_rotation_z_degrees(30.0);
        assert!(close(r.apply_point(1.0, 0.0), (0.75_f64.sqrt(), 0.5)));
    }
}
