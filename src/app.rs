/*
 * Application Module
 *
 * This module defines the main application model and logic for the viewer.
 * It handles the initialization and update of the simulation:
 * - Runs the flock on a fixed physics timestep, feeding it the speed slider
 *   as the time delta of every step
 * - Pushes changed settings from the control panel to the flock
 * - Handles the Restart and Circle Test buttons and keyboard panning
 */

use std::time::{Duration, Instant};

use nannou::prelude::*;
use nannou_egui::Egui;
use tracing::{info, warn};

use crate::camera::Camera;
use crate::debug::DebugInfo;
use crate::error::Result;
use crate::flock::Flock;
use crate::input::{mouse_moved, mouse_pressed, mouse_released, mouse_wheel, raw_window_event};
use crate::params::{GridParams, SimulationParams};
use crate::physics;
use crate::renderer::view;
use crate::ui;
use crate::PHYSICS_HZ;

// Main model for the application
pub struct Model {
    pub flock: Flock,
    pub params: SimulationParams,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    pub camera: Camera,
    pub mouse_position: Vec2,
    // Fixed timestep physics variables
    pub physics_accumulator: Duration,
    pub physics_step_size: Duration,
    pub last_update_time: Instant,
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let window_id = app
        .new_window()
        .title("Clear Path Boids")
        .size(1350, 900)
        .view(view)
        .mouse_moved(mouse_moved)
        .mouse_pressed(mouse_pressed)
        .mouse_released(mouse_released)
        .mouse_wheel(mouse_wheel)
        .raw_event(raw_window_event)
        .build()
        .expect("failed to build the main window");

    let window = app.window(window_id).expect("main window closed during setup");
    let egui = Egui::from_window(&window);

    let params = SimulationParams::default();
    let flock = Flock::new(&GridParams::default()).expect("default grid parameters are valid");

    let mut model = Model {
        flock,
        params,
        egui,
        debug_info: DebugInfo::default(),
        camera: Camera::new(),
        mouse_position: Vec2::ZERO,
        physics_accumulator: Duration::ZERO,
        physics_step_size: Duration::from_secs_f32(1.0 / PHYSICS_HZ),
        last_update_time: Instant::now(),
    };

    let result = restart(&mut model);
    report(&mut model, result);
    model
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;

    let actions = ui::update_ui(&mut model.egui, &mut model.params, &model.debug_info);

    if actions.reset_camera {
        model.camera.reset();
    }

    if actions.restart {
        let result = restart(model);
        report(model, result);
    }

    if actions.circle_test {
        // The circle test sets per-agent home distances the panel would overwrite
        model.params.update_settings = false;
        let result = physics::circle_formation(&mut model.flock, model.params.obstacle_radius);
        report(model, result);
    } else if model.params.settings_changed() {
        let result = model
            .flock
            .apply_settings(&model.params.agent, model.params.obstacle_radius);
        report(model, result);
    }

    pan_with_keys(app, &mut model.camera);

    // Accumulate real time and spend it in fixed steps
    let now = Instant::now();
    model.physics_accumulator += now.duration_since(model.last_update_time);
    model.last_update_time = now;

    let mut physics_updates_this_frame = 0;
    if model.params.pause_simulation {
        model.physics_accumulator = Duration::ZERO;
    } else {
        while model.physics_accumulator >= model.physics_step_size {
            match model.flock.tick(model.params.simulation_speed) {
                Ok(stats) => model.debug_info.last_tick = stats,
                Err(err) => {
                    report(model, Err(err));
                    model.physics_accumulator = Duration::ZERO;
                    break;
                }
            }
            model.physics_accumulator -= model.physics_step_size;
            physics_updates_this_frame += 1;
        }
    }

    model.debug_info.physics_updates_per_frame = physics_updates_this_frame;
    model.debug_info.agent_count = model.flock.agent_count();
    model.debug_info.obstacle_count = model.flock.obstacle_count();
}

// Refill the flock with the panel's initial counts and current settings
fn restart(model: &mut Model) -> Result<()> {
    model.camera.reset();
    let params = &model.params;
    params.validate()?;
    physics::reset_flock(
        &mut model.flock,
        params.initial_agents,
        params.initial_obstacles,
        &params.agent,
        params.obstacle_radius,
        &mut rand::thread_rng(),
    )
}

fn pan_with_keys(app: &App, camera: &mut Camera) {
    let mut direction = Vec2::ZERO;
    if app.keys.down.contains(&Key::Up) {
        direction.y += 1.0;
    }
    if app.keys.down.contains(&Key::Down) {
        direction.y -= 1.0;
    }
    if app.keys.down.contains(&Key::Left) {
        direction.x -= 1.0;
    }
    if app.keys.down.contains(&Key::Right) {
        direction.x += 1.0;
    }
    if direction != Vec2::ZERO {
        camera.pan(direction);
    }
}

/// Log a failed core call and keep it on screen.
pub fn report(model: &mut Model, result: Result<()>) {
    match result {
        Ok(()) => {}
        Err(err) => {
            warn!(%err, "simulation request rejected");
            model.debug_info.last_error = Some(err.to_string());
        }
    }
}

pub fn run() {
    info!("starting viewer");
    nannou::app(model).update(update).run();
}
