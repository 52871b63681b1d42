/*
 * Vector Module
 *
 * The simulation works on the glam `Vec3` that nannou re-exports, so positions,
 * velocities and accelerations are plain copyable values with the usual operators
 * (add, subtract, component and scalar multiply/divide, dot, length).
 *
 * This module adds the handful of helpers the steering code needs on top of that:
 * - A normalize that maps the zero vector to itself instead of producing NaNs
 * - An angle between two vectors that refuses zero-length input
 * - Projection onto the plane perpendicular to a facing direction
 * - Planar heading helpers (motion happens in the XY plane, z is carried along)
 */

use nannou::prelude::*;

/// Vector type used throughout the simulation.
pub type Vector3 = Vec3;

// Below this squared length a vector is treated as zero
const ZERO_EPSILON_SQ: f32 = 1.0e-12;

pub trait VectorExt: Sized {
    /// Unit vector in the same direction, or the zero vector for zero input.
    fn unit(self) -> Self;

    /// Angle in radians between two vectors, `None` when either has no direction.
    fn angle_to(self, other: Self) -> Option<f32>;

    /// Remove the component along `normal`, leaving the part perpendicular to it.
    fn flatten_to_plane(self, normal: Self) -> Self;

    /// Planar heading angle (atan2 of y over x).
    fn heading(self) -> f32;

    /// Z component of the cross product of the XY parts.
    fn cross_z(self, other: Self) -> f32;

    /// Scale down to `max` if longer, otherwise unchanged.
    fn cap_length(self, max: f32) -> Self;

    fn is_zero(self) -> bool;
}

impl VectorExt for Vec3 {
    #[inline]
    fn unit(self) -> Self {
        let square = self.length_squared();
        if square <= ZERO_EPSILON_SQ || !square.is_finite() {
            return Vec3::ZERO;
        }
        self / square.sqrt()
    }

    fn angle_to(self, other: Self) -> Option<f32> {
        let magnitudes = self.length() * other.length();
        if magnitudes <= ZERO_EPSILON_SQ.sqrt() || !magnitudes.is_finite() {
            return None;
        }
        // Rounding can push the cosine just past +/-1, acos would return NaN
        let cosine = (self.dot(other) / magnitudes).clamp(-1.0, 1.0);
        Some(cosine.acos())
    }

    #[inline]
    fn flatten_to_plane(self, normal: Self) -> Self {
        let normal = normal.unit();
        self - normal * normal.dot(self)
    }

    #[inline]
    fn heading(self) -> f32 {
        self.y.atan2(self.x)
    }

    #[inline]
    fn cross_z(self, other: Self) -> f32 {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    fn cap_length(self, max: f32) -> Self {
        if self.length_squared() > max * max {
            self.unit() * max
        } else {
            self
        }
    }

    #[inline]
    fn is_zero(self) -> bool {
        self.length_squared() <= ZERO_EPSILON_SQ
    }
}

/// Unit vector in the XY plane pointing along `angle`.
#[inline]
pub fn from_heading(angle: f32) -> Vector3 {
    Vec3::new(angle.cos(), angle.sin(), 0.0)
}
