/*
 * Flock Module
 *
 * The Flock owns every boid and obstacle plus the spatial grid that indexes
 * them. Boids and obstacles live in arenas addressed by stable handles; freed
 * slots are reused by later insertions.
 *
 * A tick runs in two passes:
 * 1. Steering: every boid computes its acceleration from the same snapshot
 * 2. Locomotion: every boid moves, and the grid is told about the move
 * so the order boids are visited in never biases the result.
 */

use std::time::Instant;

use nannou::prelude::*;
use tracing::{debug, info, warn};

use crate::boid::Boid;
use crate::error::{Result, SteerError};
use crate::neighbors::Neighborhood;
use crate::obstacle::Obstacle;
use crate::params::{AgentParams, GridParams};
use crate::spatial_grid::{AgentId, ObstacleId, SpatialGrid};

// Slot arena with a free list
struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> Arena<T> {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    fn insert(&mut self, value: T) -> usize {
        self.len += 1;
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(value);
                index
            }
            None => {
                self.slots.push(Some(value));
                self.slots.len() - 1
            }
        }
    }

    fn remove(&mut self, index: usize) -> Option<T> {
        let value = self.slots.get_mut(index)?.take()?;
        self.free.push(index);
        self.len -= 1;
        Some(value)
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)?.as_ref()
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)?.as_mut()
    }

    fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|value| (i, value)))
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|value| (i, value)))
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }
}

/// Summary of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickStats {
    pub agents: usize,
    /// Agents whose steering failed and fell back to zero acceleration.
    pub degenerate: usize,
    pub micros: u128,
}

pub struct Flock {
    agents: Arena<Boid>,
    obstacles: Arena<Obstacle>,
    grid: SpatialGrid,
    destination: Vec3,
    // Accelerations computed by the steering pass, reused between ticks
    steering_buffer: Vec<(AgentId, Vec3)>,
}

impl Flock {
    pub fn new(grid_params: &GridParams) -> Result<Self> {
        let grid = SpatialGrid::from_params(grid_params)?;
        info!(
            size_x = grid_params.size_x,
            size_y = grid_params.size_y,
            partition_width = grid_params.partition_width,
            "created flock"
        );
        Ok(Self {
            agents: Arena::new(),
            obstacles: Arena::new(),
            grid,
            destination: Vec3::ZERO,
            steering_buffer: Vec::new(),
        })
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len
    }

    pub fn agents(&self) -> impl Iterator<Item = (AgentId, &Boid)> {
        self.agents.iter().map(|(i, boid)| (AgentId(i), boid))
    }

    pub fn obstacles(&self) -> impl Iterator<Item = (ObstacleId, &Obstacle)> {
        self.obstacles.iter().map(|(i, obstacle)| (ObstacleId(i), obstacle))
    }

    /// Take ownership of `boid`. Its own home location is kept; call
    /// `set_destination` to send every agent to the shared destination.
    pub fn add_agent(&mut self, boid: Boid) -> AgentId {
        let position = boid.position();
        let id = AgentId(self.agents.insert(boid));
        self.grid.insert_agent(id, position);
        id
    }

    pub fn remove_agent(&mut self, id: AgentId) -> Result<Boid> {
        let boid = self.agents.remove(id.index()).ok_or(SteerError::UnknownAgent(id))?;
        self.grid.remove_agent(id, boid.position());
        Ok(boid)
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) -> ObstacleId {
        let position = obstacle.position();
        let id = ObstacleId(self.obstacles.insert(obstacle));
        self.grid.insert_obstacle(id, position);
        id
    }

    pub fn remove_obstacle(&mut self, id: ObstacleId) -> Result<Obstacle> {
        let obstacle = self
            .obstacles
            .remove(id.index())
            .ok_or(SteerError::UnknownObstacle(id))?;
        self.grid.remove_obstacle(id, obstacle.position());
        Ok(obstacle)
    }

    /// Move an agent somewhere else and give it a new velocity.
    pub fn place_agent(&mut self, id: AgentId, position: Vec3, velocity: Vec3) -> Result<()> {
        let boid = self.agents.get_mut(id.index()).ok_or(SteerError::UnknownAgent(id))?;
        let old_position = boid.position();
        boid.place(position, velocity)?;
        self.grid.notify_moved(id, old_position, position);
        Ok(())
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Result<&mut Boid> {
        self.agents.get_mut(id.index()).ok_or(SteerError::UnknownAgent(id))
    }

    /// Remove every agent and obstacle.
    pub fn clear(&mut self) {
        self.agents.clear();
        self.obstacles.clear();
        self.grid.clear();
        info!("cleared flock");
    }

    pub fn destination(&self) -> Vec3 {
        self.destination
    }

    /// Move the shared home location of every agent currently in the flock.
    pub fn set_destination(&mut self, destination: Vec3) -> Result<()> {
        for (_, boid) in self.agents.iter_mut() {
            boid.set_home_location(destination)?;
        }
        self.destination = destination;
        Ok(())
    }

    /// Push one set of settings to every agent and obstacle.
    ///
    /// Everything is validated first, so a bad value changes nothing.
    pub fn apply_settings(&mut self, params: &AgentParams, obstacle_radius: f32) -> Result<()> {
        params.validate()?;
        Obstacle::new(Vec3::ZERO, obstacle_radius)?;

        for (_, boid) in self.agents.iter_mut() {
            boid.set_params(*params)?;
        }
        for (_, obstacle) in self.obstacles.iter_mut() {
            obstacle.set_radius(obstacle_radius)?;
        }
        Ok(())
    }

    /// Advance the simulation by `dt`.
    pub fn tick(&mut self, dt: f32) -> Result<TickStats> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(SteerError::InvalidArgument(format!(
                "time step must be finite and non-negative, got {}",
                dt
            )));
        }
        let start = Instant::now();

        // Steering pass: read only
        let mut buffer = std::mem::take(&mut self.steering_buffer);
        buffer.clear();
        let mut degenerate = 0;
        let world: &Flock = self;
        for (index, boid) in world.agents.iter() {
            let id = AgentId(index);
            let acceleration = match boid.steer(id, world) {
                Ok(acceleration) if acceleration.is_finite() => acceleration,
                Ok(acceleration) => {
                    warn!(agent = index, ?acceleration, "non-finite steering result, using zero");
                    degenerate += 1;
                    Vec3::ZERO
                }
                Err(err) => {
                    warn!(agent = index, %err, "steering failed, using zero");
                    degenerate += 1;
                    Vec3::ZERO
                }
            };
            buffer.push((id, acceleration));
        }

        // Locomotion pass
        for &(id, acceleration) in &buffer {
            if let Some(boid) = self.agents.get_mut(id.index()) {
                boid.set_acceleration(acceleration);
                let old_position = boid.locomotion(dt);
                let new_position = boid.position();
                self.grid.notify_moved(id, old_position, new_position);
            }
        }
        self.steering_buffer = buffer;

        let stats = TickStats {
            agents: self.agents.len,
            degenerate,
            micros: start.elapsed().as_micros(),
        };
        debug!(agents = stats.agents, degenerate = stats.degenerate, micros = stats.micros as u64, "tick");
        Ok(stats)
    }
}

impl Neighborhood for Flock {
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
