/*
 * Physics Module
 *
 * Scenario setup for the flock:
 * - Restart: scatter a number of boids and obstacles at random
 * - Circle test: line the boids up on a circle, each heading for the point
 *   opposite it, with the obstacles on a smaller circle in between
 * - Placement of single entities from user input
 */

use std::f32::consts::TAU;

use nannou::prelude::*;
use rand::Rng;
use tracing::info;

use crate::boid::Boid;
use crate::error::Result;
use crate::flock::Flock;
use crate::obstacle::Obstacle;
use crate::params::{AgentParams, Placement};
use crate::spatial_grid::{AgentId, ObstacleId};
use crate::vector::{from_heading, VectorExt};

/// Half the side of the square random positions are drawn from.
pub const SPAWN_EXTENT: i32 = 100;
/// Largest random velocity component.
pub const SPAWN_VELOCITY: i32 = 3;
pub const CIRCLE_RADIUS: f32 = 80.0;
pub const OBSTACLE_CIRCLE_RADIUS: f32 = 40.0;
// Circle test boids only stop right on their target
const CIRCLE_HOME_DISTANCE: f32 = 1.0;

// Reset the flock to random positions
pub fn reset_flock<R: Rng + ?Sized>(
    flock: &mut Flock,
    agent_count: usize,
    obstacle_count: usize,
    params: &AgentParams,
    obstacle_radius: f32,
    rng: &mut R,
) -> Result<()> {
    flock.clear();
    let destination = flock.destination();

    for _ in 0..agent_count {
        let position = Vec3::new(
            rng.gen_range(-SPAWN_EXTENT..=SPAWN_EXTENT) as f32,
            rng.gen_range(-SPAWN_EXTENT..=SPAWN_EXTENT) as f32,
            0.0,
        );
        let velocity = Vec3::new(
            rng.gen_range(-SPAWN_VELOCITY..=SPAWN_VELOCITY) as f32,
            rng.gen_range(-SPAWN_VELOCITY..=SPAWN_VELOCITY) as f32,
            0.0,
        );
        let mut boid = Boid::new(position, velocity, *params)?;
        boid.set_home_location(destination)?;
        flock.add_agent(boid);
    }

    for _ in 0..obstacle_count {
        let position = Vec3::new(
            rng.gen_range(-SPAWN_EXTENT..=SPAWN_EXTENT) as f32,
            rng.gen_range(-SPAWN_EXTENT..=SPAWN_EXTENT) as f32,
            0.0,
        );
        flock.add_obstacle(Obstacle::new(position, obstacle_radius)?);
    }

    info!(agents = agent_count, obstacles = obstacle_count, "restarted flock");
    Ok(())
}

/// Arrange the existing boids on a circle heading inwards, each homing on the
/// opposite side, and move the obstacles onto an inner circle.
pub fn circle_formation(flock: &mut Flock, obstacle_radius: f32) -> Result<()> {
    let ids: Vec<AgentId> = flock.agents().map(|(id, _)| id).collect();
    let step = if ids.is_empty() { 0.0 } else { TAU / ids.len() as f32 };

    let mut angle = 0.0;
    for &id in &ids {
        let position = from_heading(angle) * CIRCLE_RADIUS;
        flock.place_agent(id, position, (-position).unit())?;
        let boid = flock.agent_mut(id)?;
        boid.set_home_distance(CIRCLE_HOME_DISTANCE)?;
        boid.set_home_location(-position)?;
        angle += step;
    }

    // Obstacles are rebuilt on the inner circle, carrying on from the last angle
    let obstacles: Vec<ObstacleId> = flock.obstacles().map(|(id, _)| id).collect();
    let obstacle_count = obstacles.len();
    let obstacle_step = if obstacle_count == 0 { 0.0 } else { TAU / obstacle_count as f32 };
    for id in obstacles {
        flock.remove_obstacle(id)?;
    }
    for _ in 0..obstacle_count {
        angle += obstacle_step;
        let position = from_heading(angle) * OBSTACLE_CIRCLE_RADIUS;
        flock.add_obstacle(Obstacle::new(position, obstacle_radius)?);
    }

    info!(agents = ids.len(), "arranged flock on a circle");
    Ok(())
}

/// Put a new entity of the selected kind at `position`, or move the destination there.
pub fn place(
    flock: &mut Flock,
    placement: Placement,
    position: Vec3,
    params: &AgentParams,
    obstacle_radius: f32,
) -> Result<()> {
    match placement {
        Placement::Actor => {
            let mut boid = Boid::new(position, Vec3::ZERO, *params)?;
            boid.set_home_location(flock.destination())?;
            flock.add_agent(boid);
        }
        Placement::Obstacle => {
            flock.add_obstacle(Obstacle::new(position, obstacle_radius)?);
        }
        Placement::Destination => flock.set_destination(position)?,
    }
    Ok(())
}
