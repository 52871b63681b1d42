/*
 * Steering Module
 *
 * Pure functions that turn collected neighbour data into desired accelerations,
 * plus the accumulator that combines them.
 *
 * Every behaviour returns a vector of length at most one (seek home excepted,
 * whose strength grows with the distance past the home radius) and returns the
 * zero vector when it has nothing to say. The accumulator blends them in
 * call order into a unit heading change, so behaviours added first keep their
 * share once the budget is spent.
 */

use nannou::prelude::*;

use crate::vector::VectorExt;

/// Weight applied to both flocking behaviours before accumulation.
pub const FLOCK_WEIGHT: f32 = 0.8;

// Within this of the unit circle the accumulator is considered full
const SATURATION_EPSILON: f32 = 1.0e-6;

/// Blend `add` into `acc` and return a unit-length heading change.
///
/// `add` is scaled by the root `t` of `|acc + t * add| = 1`, clamped to `[0, 1]`,
/// and the sum is normalised. Once `acc` is on the unit circle later calls
/// change nothing.
pub fn accumulate(acc: Vec3, add: Vec3) -> Vec3 {
    let c = acc.length_squared() - 1.0;
    if c >= -SATURATION_EPSILON {
        return acc.unit();
    }
    if add.is_zero() {
        return acc;
    }

    // Positive root of |add|^2 t^2 + 2 (acc . add) t + (|acc|^2 - 1) = 0
    let a = add.length_squared();
    let b = acc.dot(add);
    let root = (b * b - a * c).sqrt();
    let t = if b >= 0.0 { -c / (b + root) } else { (root - b) / a };

    (acc + add * t.clamp(0.0, 1.0)).unit()
}

/// Steer sideways away from the nearest predicted collision.
pub fn collision_avoidance(collision: Option<Vec3>, facing: Vec3) -> Vec3 {
    match collision {
        Some(offset) if !offset.is_zero() => (-offset.flatten_to_plane(facing)).unit(),
        _ => Vec3::ZERO,
    }
}

/// Turn towards `home` once further than `home_distance` from it.
///
/// The strength is `(|home - position| - home_distance) / home_distance`.
pub fn seek_towards(position: Vec3, home: Vec3, home_distance: f32, facing: Vec3) -> Vec3 {
    let to_home = home - position;
    let distance = to_home.length();
    if distance <= home_distance || home_distance <= 0.0 {
        return Vec3::ZERO;
    }
    let strength = (distance - home_distance) / home_distance;
    to_home.flatten_to_plane(facing).unit() * strength
}

/// Align with the average velocity of the flock, relative to our own.
pub fn match_flock_velocity(average_relative_velocity: Vec3, max_acceleration: f32, facing: Vec3) -> Vec3 {
    if average_relative_velocity.is_zero() || max_acceleration <= 0.0 {
        return Vec3::ZERO;
    }
    (average_relative_velocity / max_acceleration)
        .flatten_to_plane(facing)
        .cap_length(1.0)
}

/// Move towards the centre of the flock, given the offset from us to it.
pub fn match_flock_centre(offset_to_centre: Vec3, facing: Vec3) -> Vec3 {
    if offset_to_centre.is_zero() {
        return Vec3::ZERO;
    }
    offset_to_centre.flatten_to_plane(facing).cap_length(1.0)
}
