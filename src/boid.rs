/*
 * Boid Module
 *
 * This module defines the Boid struct and its behavior.
 * Each tick a boid works out a new acceleration from what it can see:
 * 1. Collision avoidance: turn away from the nearest predicted collision
 * 2. Flocking: match the velocity and centre of nearby boids
 * 3. Homing: head back once it strays past its home distance
 * In clear path mode the collision avoidance step is replaced by velocity
 * obstacle sampling on the combined result.
 *
 * Steering only reads the world; locomotion is the only step that moves the
 * boid, and the flock reports those moves to the spatial grid.
 */

use nannou::prelude::*;

use crate::clear_path;
use crate::error::{require_finite, Result};
use crate::neighbors::{self, Neighborhood};
use crate::params::AgentParams;
use crate::spatial_grid::AgentId;
use crate::steering::{self, FLOCK_WEIGHT};
use crate::vector::VectorExt;

#[derive(Debug, Clone, PartialEq)]
pub struct Boid {
    position: Vec3,
    velocity: Vec3,
    acceleration: Vec3,
    home_location: Vec3,
    params: AgentParams,
}

impl Boid {
    pub fn new(position: Vec3, velocity: Vec3, params: AgentParams) -> Result<Self> {
        params.validate()?;
        require_finite_vector("position", position)?;
        require_finite_vector("velocity", velocity)?;
        Ok(Self {
            position,
            velocity,
            acceleration: Vec3::ZERO,
            home_location: Vec3::ZERO,
            params,
        })
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn acceleration(&self) -> Vec3 {
        self.acceleration
    }

    pub fn home_location(&self) -> Vec3 {
        self.home_location
    }

    pub fn params(&self) -> &AgentParams {
        &self.params
    }

    pub fn set_params(&mut self, params: AgentParams) -> Result<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    pub fn set_velocity(&mut self, velocity: Vec3) -> Result<()> {
        self.velocity = require_finite_vector("velocity", velocity)?;
        Ok(())
    }

    pub fn set_home_location(&mut self, home: Vec3) -> Result<()> {
        self.home_location = require_finite_vector("home_location", home)?;
        Ok(())
    }

    pub fn set_home_distance(&mut self, home_distance: f32) -> Result<()> {
        self.set_params(AgentParams {
            home_distance,
            ..self.params
        })
    }

    // Only the flock may move a boid, it has to keep the grid in step.
    // Both values are checked before either is written.
    pub(crate) fn place(&mut self, position: Vec3, velocity: Vec3) -> Result<()> {
        require_finite_vector("position", position)?;
        require_finite_vector("velocity", velocity)?;
        self.position = position;
        self.velocity = velocity;
        Ok(())
    }

    pub(crate) fn set_acceleration(&mut self, acceleration: Vec3) {
        self.acceleration = acceleration;
    }

    /// Work out this tick's acceleration without changing anything.
    ///
    /// `id` is this boid's handle in `world`, so it can skip itself. A boid
    /// whose position or velocity has overflowed cannot steer and gets an error.
    pub fn steer<N: Neighborhood + ?Sized>(&self, id: AgentId, world: &N) -> Result<Vec3> {
        require_finite_vector("position", self.position)?;
        require_finite_vector("velocity", self.velocity)?;
        let params = &self.params;
        let facing = self.velocity.unit();

        let data = neighbors::collect(id, self, world)?;
        let regions = if params.clear_path {
            clear_path::velocity_obstacle_collection(id, self, world)?
        } else {
            Vec::new()
        };

        let mut acceleration = Vec3::ZERO;

        if !params.clear_path {
            acceleration = steering::accumulate(
                acceleration,
                steering::collision_avoidance(data.nearest_collision, facing),
            );
        }

        if params.flocking {
            let relative_velocity = data.average_relative_velocity().unwrap_or(Vec3::ZERO);
            acceleration = steering::accumulate(
                acceleration,
                steering::match_flock_velocity(relative_velocity, params.max_acceleration, facing) * FLOCK_WEIGHT,
            );

            let to_centre = data
                .average_position()
                .map_or(Vec3::ZERO, |centre| centre - self.position);
            acceleration = steering::accumulate(
                acceleration,
                steering::match_flock_centre(to_centre, facing) * FLOCK_WEIGHT,
            );
        }

        acceleration = steering::accumulate(
            acceleration,
            steering::seek_towards(self.position, self.home_location, params.home_distance, facing),
        );

        // Speed is fixed, only turning is allowed
        acceleration = acceleration.flatten_to_plane(facing);

        if params.clear_path {
            acceleration = clear_path::clear_path_sampling(acceleration, self.velocity, params.max_speed, &regions);
        }

        if params.damping {
            acceleration = (acceleration + self.acceleration) / 2.0;
        }

        Ok(acceleration)
    }

    /// Integrate one step and return the position before the move.
    pub fn locomotion(&mut self, dt: f32) -> Vec3 {
        // Update velocity, then pin it to max speed
        self.velocity += self.acceleration * self.params.max_acceleration * dt;
        self.velocity = self.velocity.unit() * self.params.max_speed;

        let old_position = self.position;
        self.position += self.velocity * dt;
        old_position
    }
}

fn require_finite_vector(field: &'static str, v: Vec3) -> Result<Vec3> {
    require_finite(field, v.x)?;
    require_finite(field, v.y)?;
    require_finite(field, v.z)?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SteerError;

    #[test]
    fn construction_validates_params() {
        let params = AgentParams {
            max_speed: -1.0,
            ..AgentParams::default()
        };
        assert!(matches!(
            Boid::new(Vec3::ZERO, Vec3::X, params),
            Err(SteerError::InvalidConfiguration { field: "max_speed", .. })
        ));
        assert!(Boid::new(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::X, AgentParams::default()).is_err());
    }

    #[test]
    fn rejected_params_leave_the_boid_unchanged() {
        let mut boid = Boid::new(Vec3::ZERO, Vec3::X, AgentParams::default()).unwrap();
        assert!(boid.set_home_distance(-5.0).is_err());
        assert_eq!(boid.params().home_distance, AgentParams::default().home_distance);
    }

    #[test]
    fn locomotion_pins_speed_and_moves() {
        let params = AgentParams {
            max_speed: 2.0,
            max_acceleration: 0.5,
            ..AgentParams::default()
        };
        let mut boid = Boid::new(Vec3::ZERO, Vec3::new(0.3, 0.0, 0.0), params).unwrap();
        boid.set_acceleration(Vec3::Y);

        let old = boid.locomotion(1.0);
        assert_eq!(old, Vec3::ZERO);
        assert!((boid.velocity().length() - 2.0).abs() < 1e-5);
        assert!(boid.velocity().y > 0.0);
        assert!((boid.position() - boid.velocity()).length() < 1e-5);
    }

    #[test]
    fn rejected_placement_changes_nothing() {
        let mut boid = Boid::new(Vec3::ZERO, Vec3::X, AgentParams::default()).unwrap();
        assert!(boid.place(Vec3::new(f32::INFINITY, 0.0, 0.0), Vec3::Y).is_err());
        assert!(boid.place(Vec3::ONE, Vec3::new(0.0, f32::NAN, 0.0)).is_err());
        assert_eq!(boid.position(), Vec3::ZERO);
        assert_eq!(boid.velocity(), Vec3::X);

        boid.place(Vec3::ONE, Vec3::Y).unwrap();
        assert_eq!(boid.position(), Vec3::ONE);
        assert_eq!(boid.velocity(), Vec3::Y);
    }

    #[test]
    fn stationary_boid_without_acceleration_stays_put() {
        let mut boid = Boid::new(Vec3::new(4.0, 4.0, 0.0), Vec3::ZERO, AgentParams::default()).unwrap();
        boid.locomotion(1.0);
        assert_eq!(boid.velocity(), Vec3::ZERO);
        assert_eq!(boid.position(), Vec3::new(4.0, 4.0, 0.0));
    }
}
