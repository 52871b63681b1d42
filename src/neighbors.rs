/*
 * Neighbor Collection Module
 *
 * One pass over the grid cells around an agent that gathers everything the
 * steering behaviours need:
 * - Sums of neighbour positions and relative velocities for flocking
 * - The nearest predicted collision, from agents and obstacles alike
 *
 * The collector only sees the world through the `Neighborhood` trait, so the
 * flock and the tests can both provide it.
 */

use std::f32::consts::PI;

use nannou::prelude::*;

use crate::boid::Boid;
use crate::error::Result;
use crate::obstacle::Obstacle;
use crate::spatial_grid::{AgentId, ObstacleId, SpatialGrid};
use crate::vector::VectorExt;

// Bounds on the number of predictive collision steps per neighbour
const MIN_PREDICTION_STEPS: usize = 1;
const MAX_PREDICTION_STEPS: usize = 256;

/// Read access to the agents and obstacles around an agent.
pub trait Neighborhood {
    fn grid(&self) -> &SpatialGrid;
    fn agent(&self, id: AgentId) -> Option<&Boid>;
    fn obstacle(&self, id: ObstacleId) -> Option<&Obstacle>;
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NeighborData {
    /// Sum of the absolute positions of visible neighbours within detection distance.
    pub sum_position: Vec3,
    /// Sum of `other.velocity - self.velocity` over the same neighbours.
    pub sum_relative_velocity: Vec3,
    /// Offset from the agent to the closest predicted collision.
    pub nearest_collision: Option<Vec3>,
    pub count: usize,
}

impl NeighborData {
    pub fn average_position(&self) -> Option<Vec3> {
        (self.count > 0).then(|| self.sum_position / self.count as f32)
    }

    pub fn average_relative_velocity(&self) -> Option<Vec3> {
        (self.count > 0).then(|| self.sum_relative_velocity / self.count as f32)
    }
}

/// Gather neighbour data for the agent `id`, whose current state is `agent`.
pub fn collect<N: Neighborhood + ?Sized>(id: AgentId, agent: &Boid, world: &N) -> Result<NeighborData> {
    let params = agent.params();
    let grid = world.grid();
    let range = grid.cell_range_covering(agent.position(), params.query_radius())?;

    let mut data = NeighborData::default();
    let mut closest = f32::INFINITY;

    for other_id in grid.agents_in_range(&range) {
        if other_id == id {
            continue;
        }
        let Some(other) = world.agent(other_id) else {
            continue;
        };
        collect_from_agent(agent, other, &mut data, &mut closest);
    }

    let facing = agent.velocity().unit();
    for obstacle_id in grid.obstacles_in_range(&range) {
        let Some(obstacle) = world.obstacle(obstacle_id) else {
            continue;
        };
        collect_from_obstacle(agent, facing, obstacle, &mut data, &mut closest);
    }

    Ok(data)
}

fn collect_from_agent(agent: &Boid, other: &Boid, data: &mut NeighborData, closest: &mut f32) {
    let params = agent.params();
    let offset = other.position() - agent.position();
    if offset.is_zero() {
        return;
    }

    // Blind behind. A stationary agent has no facing, so it sees all around
    if let Some(angle) = offset.angle_to(agent.velocity()) {
        if angle > PI * params.view_arc {
            return;
        }
    }

    let distance = offset.length();
    if distance < params.detection_distance {
        data.sum_position += other.position();
        data.sum_relative_velocity += other.velocity() - agent.velocity();
        data.count += 1;
    }

    if distance > params.avoidance_distance {
        return;
    }

    // Step forward in time looking for the first moment the two overlap
    let horizon = params.avoidance_distance / params.max_speed;
    let steps = ((params.avoidance_distance / params.radius).ceil() as usize)
        .clamp(MIN_PREDICTION_STEPS, MAX_PREDICTION_STEPS);
    let touching = params.radius + other.params().radius;

    for i in 0..=steps {
        let t = horizon * i as f32 / steps as f32;
        let self_future = agent.position() + agent.velocity() * t;
        let other_future = other.position() + other.velocity() * t;

        // Treat the intercept as a static obstacle seen from where we are now
        let intercept = other_future - agent.position();
        let intercept_distance = intercept.length();
        if intercept_distance >= *closest {
            continue;
        }
        if (other_future - self_future).length() <= touching {
            *closest = intercept_distance;
            data.nearest_collision = Some(intercept);
        }
    }
}

fn collect_from_obstacle(
    agent: &Boid,
    facing: Vec3,
    obstacle: &Obstacle,
    data: &mut NeighborData,
    closest: &mut f32,
) {
    let params = agent.params();
    let offset = obstacle.position() - agent.position();

    // Only the box swept ahead of the agent matters
    let forward = facing.dot(offset);
    if forward <= 0.0 || forward > params.avoidance_distance {
        return;
    }
    if (offset - facing * forward).length() > params.radius + obstacle.radius() {
        return;
    }

    let distance = offset.length();
    if distance < *closest {
        *closest = distance;
        data.nearest_collision = Some(offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::AgentParams;

    // A small neighbourhood backed by plain vectors
    struct World {
        grid: SpatialGrid,
        agents: Vec<Boid>,
        obstacles: Vec<Obstacle>,
    }

    impl World {
        fn new() -> Self {
            Self {
                grid: SpatialGrid::new(10, 10, 10.0).unwrap(),
                agents: Vec::new(),
                obstacles: Vec::new(),
            }
        }

        fn add_agent(&mut self, position: Vec3, velocity: Vec3, params: AgentParams) -> AgentId {
            let id = AgentId(self.agents.len());
            self.agents.push(Boid::new(position, velocity, params).unwrap());
            self.grid.insert_agent(id, position);
            id
        }

        fn add_obstacle(&mut self, position: Vec3, radius: f32) {
            let id = ObstacleId(self.obstacles.len());
            self.obstacles.push(Obstacle::new(position, radius).unwrap());
            self.grid.insert_obstacle(id, position);
        }

        fn collect(&self, id: AgentId) -> NeighborData {
            collect(id, &self.agents[id.index()], self).unwrap()
        }
    }

    impl Neighborhood for World {
        fn grid(&self) -> &SpatialGrid {
            &self.grid
        }

        fn agent(&self, id: AgentId) -> Option<&Boid> {
            self.agents.get(id.index())
        }

        fn obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
            self.obstacles.get(id.index())
        }
    }

    fn params() -> AgentParams {
        AgentParams {
            max_speed: 2.0,
            radius: 0.5,
            avoidance_distance: 10.0,
            detection_distance: 10.0,
            view_arc: 1.0,
            ..AgentParams::default()
        }
    }

    #[test]
    fn lone_agent_sees_nothing() {
        let mut world = World::new();
        let id = world.add_agent(Vec3::ZERO, Vec3::X, params());
        let data = world.collect(id);
        assert_eq!(data, NeighborData::default());
        assert_eq!(data.average_position(), None);
    }

    #[test]
    fn closing_agents_report_a_collision() {
        let mut world = World::new();
        let a = world.add_agent(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), params());
        world.add_agent(Vec3::new(1.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0), params());

        let data = world.collect(a);
        let collision = data.nearest_collision.unwrap();
        assert!(!collision.is_zero());
        assert_eq!(data.count, 1);
    }

    #[test]
    fn view_cone_hides_agents_behind() {
        let mut world = World::new();
        let narrow = AgentParams {
            view_arc: 0.5,
            ..params()
        };
        let a = world.add_agent(Vec3::ZERO, Vec3::X, narrow);
        world.add_agent(Vec3::new(-3.0, 0.0, 0.0), Vec3::X, params());
        assert_eq!(world.collect(a).count, 0);
    }

    #[test]
    fn stationary_agent_sees_all_around() {
        let mut world = World::new();
        let narrow = AgentParams {
            view_arc: 0.1,
            ..params()
        };
        let a = world.add_agent(Vec3::ZERO, Vec3::ZERO, narrow);
        world.add_agent(Vec3::new(-3.0, 0.0, 0.0), Vec3::Y, params());
        let data = world.collect(a);
        assert_eq!(data.count, 1);
        assert_eq!(data.average_relative_velocity(), Some(Vec3::Y));
    }

    #[test]
    fn detection_sums_are_averaged_by_count() {
        let mut world = World::new();
        let a = world.add_agent(Vec3::ZERO, Vec3::X, params());
        world.add_agent(Vec3::new(4.0, 2.0, 0.0), Vec3::X, params());
        world.add_agent(Vec3::new(4.0, -2.0, 0.0), Vec3::X, params());
        let data = world.collect(a);
        assert_eq!(data.count, 2);
        assert_eq!(data.average_position(), Some(Vec3::new(4.0, 0.0, 0.0)));
    }

    #[test]
    fn obstacle_ahead_is_a_collision() {
        let mut world = World::new();
        let a = world.add_agent(Vec3::ZERO, Vec3::X, params());
        world.add_obstacle(Vec3::new(5.0, 0.5, 0.0), 1.0);
        // Behind and off to the side are ignored
        world.add_obstacle(Vec3::new(-5.0, 0.0, 0.0), 1.0);
        world.add_obstacle(Vec3::new(3.0, 6.0, 0.0), 1.0);

        let data = world.collect(a);
        assert_eq!(data.nearest_collision, Some(Vec3::new(5.0, 0.5, 0.0)));
    }

    #[test]
    fn closer_obstacle_beats_farther_agent_collision() {
        let mut world = World::new();
        let a = world.add_agent(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), params());
        world.add_agent(Vec3::new(8.0, 0.0, 0.0), Vec3::ZERO, params());
        world.add_obstacle(Vec3::new(3.0, 0.0, 0.0), 0.5);

        let data = world.collect(a);
        assert_eq!(data.nearest_collision, Some(Vec3::new(3.0, 0.0, 0.0)));
    }
}
