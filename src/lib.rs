/*
 * Clear Path Boids - Module Definitions
 *
 * This file defines the module structure for the boid simulation.
 * The steering core (vector, spatial_grid, neighbors, steering, shape,
 * clear_path, boid, obstacle, flock, physics, params, error) has no window
 * dependency beyond nannou's vector type; the remaining modules make up the
 * interactive viewer around it.
 */

// Re-export key components for easier access
pub use boid::Boid;
pub use camera::Camera;
pub use debug::DebugInfo;
pub use error::{Result, SteerError};
pub use flock::{Flock, TickStats};
pub use neighbors::{NeighborData, Neighborhood};
pub use obstacle::Obstacle;
pub use params::{AgentParams, GridParams, Placement, SimulationParams};
pub use shape::{ConvexShape, Line};
pub use spatial_grid::{AgentId, CellRange, ObstacleId, SpatialGrid};
pub use vector::{Vector3, VectorExt};
pub use app::Model;

// Simulation core
pub mod boid;
pub mod clear_path;
pub mod error;
pub mod flock;
pub mod neighbors;
pub mod obstacle;
pub mod params;
pub mod physics;
pub mod shape;
pub mod spatial_grid;
pub mod steering;
pub mod vector;

// Viewer
pub mod app;
pub mod camera;
pub mod debug;
pub mod input;
pub mod renderer;
pub mod ui;

// Pixels per world unit at zoom 1
pub const WORLD_SCALE: f32 = 4.0;
// Fixed physics rate of the viewer
pub const PHYSICS_HZ: f32 = 60.0;
