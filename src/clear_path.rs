/*
 * Clear Path Module
 *
 * Reciprocal velocity obstacle avoidance. For every agent and obstacle within
 * avoidance distance we build a convex region of velocities that would lead to
 * a collision, then pick the most preferred candidate velocity that stays out
 * of all of them.
 *
 * Against another agent the region's apex sits halfway between both velocities,
 * so each side only takes half of the manoeuvre. Obstacles don't move out of
 * the way, so their apex is half our own velocity and their cone reaches much
 * further.
 */

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use nannou::prelude::*;

use crate::boid::Boid;
use crate::error::Result;
use crate::neighbors::Neighborhood;
use crate::shape::ConvexShape;
use crate::spatial_grid::AgentId;
use crate::vector::{from_heading, VectorExt};

/// How far the cone of an agent's velocity obstacle reaches, in avoidance distances.
pub const AGENT_CONE_SCALE: f32 = 10.0;
/// How far the cone of an obstacle's velocity obstacle reaches, in avoidance distances.
pub const OBSTACLE_CONE_SCALE: f32 = 100.0;

const SAMPLE_COUNT: usize = 6;
// Speeds tried, as tenths of max speed, from fastest down
const SCALE_STEPS: usize = 10;

/// Velocity obstacle for another agent at `offset` from us.
pub fn agent_velocity_obstacle(agent: &Boid, offset: Vec3, other_velocity: Vec3, other_radius: f32) -> Option<ConvexShape> {
    if offset.is_zero() {
        return None;
    }
    let params = agent.params();
    let apex = (agent.velocity() + other_velocity) / 2.0;
    let region = ConvexShape::new(apex)
        .with_cone_section(offset, params.radius, other_radius, params.avoidance_distance * AGENT_CONE_SCALE)
        .with_square(agent.velocity(), params.radius);
    Some(region)
}

/// Velocity obstacle for a static obstacle at `offset` from us.
pub fn obstacle_velocity_obstacle(agent: &Boid, offset: Vec3, obstacle_radius: f32) -> Option<ConvexShape> {
    if offset.is_zero() {
        return None;
    }
    let params = agent.params();
    let apex = agent.velocity() / 2.0;
    let region = ConvexShape::new(apex)
        .with_cone_section(offset, params.radius, obstacle_radius, params.avoidance_distance * OBSTACLE_CONE_SCALE)
        .with_square(agent.velocity(), params.radius);
    Some(region)
}

/// Velocity obstacles for everything within avoidance distance of agent `id`.
pub fn velocity_obstacle_collection<N: Neighborhood + ?Sized>(
    id: AgentId,
    agent: &Boid,
    world: &N,
) -> Result<Vec<ConvexShape>> {
    let avoidance = agent.params().avoidance_distance;
    let grid = world.grid();
    let range = grid.cell_range_covering(agent.position(), avoidance)?;

    let mut regions = Vec::new();

    for other_id in grid.agents_in_range(&range) {
        if other_id == id {
            continue;
        }
        let Some(other) = world.agent(other_id) else {
            continue;
        };
        let offset = other.position() - agent.position();
        if offset.length() > avoidance {
            continue;
        }
        regions.extend(agent_velocity_obstacle(agent, offset, other.velocity(), other.params().radius));
    }

    for obstacle_id in grid.obstacles_in_range(&range) {
        let Some(obstacle) = world.obstacle(obstacle_id) else {
            continue;
        };
        let offset = obstacle.position() - agent.position();
        if offset.length() > avoidance {
            continue;
        }
        regions.extend(obstacle_velocity_obstacle(agent, offset, obstacle.radius()));
    }

    Ok(regions)
}

/// Candidate velocities in order of preference, all at `max_speed`.
///
/// First the velocity the other behaviours asked for, then straight ahead, then
/// 45 and 90 degrees either side of the current heading.
pub fn candidate_velocities(target_acceleration: Vec3, velocity: Vec3, max_speed: f32) -> [Vec3; SAMPLE_COUNT] {
    let heading = velocity.heading();
    [
        (velocity + target_acceleration).unit() * max_speed,
        velocity.unit() * max_speed,
        from_heading(heading + FRAC_PI_4) * max_speed,
        from_heading(heading - FRAC_PI_4) * max_speed,
        from_heading(heading + FRAC_PI_2) * max_speed,
        from_heading(heading - FRAC_PI_2) * max_speed,
    ]
}

/// Acceleration towards the best velocity that is outside every region.
///
/// Faster speeds are tried first; within one speed the candidates keep their
/// preference order. When nothing is clear the result is zero.
pub fn clear_path_sampling(target_acceleration: Vec3, velocity: Vec3, max_speed: f32, regions: &[ConvexShape]) -> Vec3 {
    let candidates = candidate_velocities(target_acceleration, velocity, max_speed);

    for step in (1..=SCALE_STEPS).rev() {
        let scale = step as f32 / SCALE_STEPS as f32;
        let clear = candidates
            .iter()
            .map(|&candidate| candidate * scale)
            .find(|&sample| !regions.iter().any(|region| region.is_point_inside(sample)));
        if let Some(sample) = clear {
            return sample - velocity;
        }
    }

    Vec3::ZERO
}
