/*
 * UI Module
 *
 * This module builds the control panel with nannou_egui. Sliders and
 * checkboxes edit SimulationParams in place; buttons are reported back to the
 * app as UiActions. Parameter change detection is handled by SimulationParams.
 */

use nannou_egui::{egui, Egui};

use crate::debug::DebugInfo;
use crate::params::{Placement, SimulationParams};

/// Buttons pressed this frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiActions {
    pub restart: bool,
    pub circle_test: bool,
    pub reset_camera: bool,
}

pub fn update_ui(egui: &mut Egui, params: &mut SimulationParams, debug_info: &DebugInfo) -> UiActions {
    let mut actions = UiActions::default();

    // Take a snapshot of current parameter values for change detection
    params.take_snapshot();

    let ctx = egui.begin_frame();

    egui::Window::new("Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.add(
                egui::Slider::new(&mut params.simulation_speed, SimulationParams::get_simulation_speed_range())
                    .text("Simulation speed"),
            );

            ui.collapsing("Actor settings", |ui| {
                let agent = &mut params.agent;
                ui.add(
                    egui::Slider::new(&mut agent.max_acceleration, SimulationParams::get_max_acceleration_range())
                        .text("Max Acceleration"),
                );
                ui.add(egui::Slider::new(&mut agent.max_speed, SimulationParams::get_max_speed_range()).text("Max Speed"));
                ui.add(
                    egui::Slider::new(&mut agent.home_distance, SimulationParams::get_home_distance_range())
                        .text("Home Bounds"),
                );
                ui.add(egui::Slider::new(&mut agent.view_arc, SimulationParams::get_view_arc_range()).text("View Arc"));
                ui.add(egui::Slider::new(&mut agent.radius, SimulationParams::get_radius_range()).text("Radius"));
                ui.add(
                    egui::Slider::new(&mut agent.avoidance_distance, SimulationParams::get_distance_range())
                        .text("Avoidance Distance"),
                );
                ui.add(
                    egui::Slider::new(&mut agent.detection_distance, SimulationParams::get_distance_range())
                        .text("Detection Distance"),
                );
                ui.add(
                    egui::Slider::new(&mut params.obstacle_radius, SimulationParams::get_radius_range())
                        .text("Obstacle Radius"),
                );

                ui.horizontal(|ui| {
                    ui.checkbox(&mut params.agent.clear_path, "Use RVO collision avoidance");
                    ui.checkbox(&mut params.agent.flocking, "Use flocking behaviour");
                });
                ui.checkbox(&mut params.agent.damping, "Damping");
                ui.checkbox(&mut params.update_settings, "Update Actor Settings");
            });

            ui.horizontal(|ui| {
                ui.checkbox(&mut params.draw_avoidance, "Draw avoidance");
                ui.checkbox(&mut params.draw_detection, "Draw detection");
            });

            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Restart").clicked() {
                    actions.restart = true;
                }
                ui.add(
                    egui::DragValue::new(&mut params.initial_agents)
                        .clamp_range(SimulationParams::get_initial_count_range())
                        .prefix("actors: "),
                );
                ui.add(
                    egui::DragValue::new(&mut params.initial_obstacles)
                        .clamp_range(SimulationParams::get_initial_count_range())
                        .prefix("obstacles: "),
                );
            });
            if ui.button("Circle Test").clicked() {
                actions.circle_test = true;
            }

            ui.horizontal(|ui| {
                ui.selectable_value(&mut params.placement, Placement::Actor, "Place actor");
                ui.selectable_value(&mut params.placement, Placement::Obstacle, "Place obstacle");
                ui.selectable_value(&mut params.placement, Placement::Destination, "Place destination");
            });
            ui.label(params.placement.hint());

            ui.collapsing("Camera Controls", |ui| {
                ui.label("Zoom: mouse wheel");
                ui.label("Pan: arrow keys or left drag");
                if ui.button("Reset Camera").clicked() {
                    actions.reset_camera = true;
                }
            });

            ui.separator();
            ui.checkbox(&mut params.show_debug, "Show Debug Info");
            ui.checkbox(&mut params.pause_simulation, "Pause Simulation");

            if params.show_debug {
                for line in debug_info.lines() {
                    ui.label(line);
                }
            }
        });

    actions
}
