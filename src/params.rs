/*
 * Simulation Parameters Module
 *
 * This module defines the tunables of the simulation:
 * - AgentParams: per-agent steering and locomotion settings, validated on the way in
 * - GridParams: dimensions of the spatial grid
 * - SimulationParams: everything the control panel edits, with change detection
 *   so the app only pushes settings to the flock when something moved
 */

use crate::error::{require_non_negative, require_positive, require_unit_interval, Result};

/// Per-agent tunables. Defaults match the control panel's initial slider values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentParams {
    pub max_acceleration: f32,
    pub max_speed: f32,
    /// Radius around the home location inside which the agent stops homing.
    pub home_distance: f32,
    /// Forward visibility half-angle as a fraction of pi.
    pub view_arc: f32,
    pub radius: f32,
    pub avoidance_distance: f32,
    pub detection_distance: f32,
    pub flocking: bool,
    /// Steer with velocity obstacles instead of the simple collision avoidance.
    pub clear_path: bool,
    pub damping: bool,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            max_acceleration: 0.1,
            max_speed: 1.0,
            home_distance: 60.0,
            view_arc: 0.5,
            radius: 2.0,
            avoidance_distance: 20.0,
            detection_distance: 11.0,
            flocking: true,
            clear_path: false,
            damping: true,
        }
    }
}

impl AgentParams {
    /// Reject values the steering code cannot work with. Nothing is clamped.
    pub fn validate(&self) -> Result<()> {
        require_positive("max_acceleration", self.max_acceleration)?;
        require_positive("max_speed", self.max_speed)?;
        // Seek home divides by this
        require_positive("home_distance", self.home_distance)?;
        require_unit_interval("view_arc", self.view_arc)?;
        require_positive("radius", self.radius)?;
        require_non_negative("avoidance_distance", self.avoidance_distance)?;
        require_non_negative("detection_distance", self.detection_distance)?;
        Ok(())
    }

    /// Radius the neighbour query has to cover.
    pub fn query_radius(&self) -> f32 {
        self.detection_distance.max(self.avoidance_distance)
    }
}

/// Dimensions of the spatial grid, centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridParams {
    pub size_x: usize,
    pub size_y: usize,
    pub partition_width: f32,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            size_x: 48,
            size_y: 48,
            partition_width: 10.0,
        }
    }
}

/// What a right click places in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    #[default]
    Actor,
    Obstacle,
    Destination,
}

impl Placement {
    pub fn hint(&self) -> &'static str {
        match self {
            Placement::Actor => "Right click places an actor",
            Placement::Obstacle => "Right click places an obstacle",
            Placement::Destination => "Right click places the destination",
        }
    }
}

// Parameters for the simulation that can be adjusted via UI
pub struct SimulationParams {
    /// Time step handed to the flock on every fixed physics step.
    pub simulation_speed: f32,
    pub agent: AgentParams,
    pub obstacle_radius: f32,
    pub initial_agents: usize,
    pub initial_obstacles: usize,
    pub draw_avoidance: bool,
    pub draw_detection: bool,
    /// Push the agent settings to every agent and obstacle each frame.
    pub update_settings: bool,
    pub placement: Placement,
    pub show_debug: bool,
    pub pause_simulation: bool,

    // Internal state for tracking changes
    previous_values: Option<ParamSnapshot>,
}

// A snapshot of parameter values used for change detection
struct ParamSnapshot {
    agent: AgentParams,
    obstacle_radius: f32,
    update_settings: bool,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            simulation_speed: 1.0,
            agent: AgentParams::default(),
            obstacle_radius: 2.0,
            initial_agents: 100,
            initial_obstacles: 10,
            draw_avoidance: false,
            draw_detection: false,
            update_settings: true,
            placement: Placement::default(),
            show_debug: true,
            pause_simulation: false,
            previous_values: None,
        }
    }
}

impl SimulationParams {
    // Take a snapshot of current parameter values for change detection
    pub fn take_snapshot(&mut self) {
        self.previous_values = Some(ParamSnapshot {
            agent: self.agent,
            obstacle_radius: self.obstacle_radius,
            update_settings: self.update_settings,
        });
    }

    /// Whether the flock needs the current settings pushed to it.
    ///
    /// True when "update settings" is on and the agent or obstacle settings
    /// changed since the last snapshot, or when "update settings" was just
    /// switched on. Without a snapshot nothing has changed.
    pub fn settings_changed(&self) -> bool {
        let Some(prev) = &self.previous_values else {
            return false;
        };
        if !self.update_settings {
            return false;
        }
        !prev.update_settings || prev.agent != self.agent || prev.obstacle_radius != self.obstacle_radius
    }

    pub fn validate(&self) -> Result<()> {
        self.agent.validate()?;
        require_non_negative("simulation_speed", self.simulation_speed)?;
        require_positive("obstacle_radius", self.obstacle_radius)?;
        Ok(())
    }

    // Get parameter ranges for UI sliders
    pub fn get_simulation_speed_range() -> std::ops::RangeInclusive<f32> {
        0.0..=1.0
    }

    pub fn get_max_acceleration_range() -> std::ops::RangeInclusive<f32> {
        0.01..=0.2
    }

    pub fn get_max_speed_range() -> std::ops::RangeInclusive<f32> {
        0.01..=1.0
    }

    pub fn get_home_distance_range() -> std::ops::RangeInclusive<f32> {
        1.0..=200.0
    }

    pub fn get_view_arc_range() -> std::ops::RangeInclusive<f32> {
        0.0..=1.0
    }

    pub fn get_radius_range() -> std::ops::RangeInclusive<f32> {
        0.1..=20.0
    }

    pub fn get_distance_range() -> std::ops::RangeInclusive<f32> {
        0.0..=100.0
    }

    pub fn get_initial_count_range() -> std::ops::RangeInclusive<usize> {
        0..=2000
    }
}
