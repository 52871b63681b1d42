/*
 * Renderer Module
 *
 * This module draws the simulation:
 * - The grid boundary
 * - The destination marker
 * - Obstacles as circles and boids as triangles pointing along their velocity
 * - Optionally each boid's avoidance (red) and detection (blue) auras
 */

use nannou::prelude::*;
use tracing::warn;

use crate::app::Model;
use crate::boid::Boid;
use crate::camera::Camera;
use crate::obstacle::Obstacle;
use crate::vector::VectorExt;

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    let window_rect = app.window_rect();
    let camera = &model.camera;

    draw_boundary(&draw, model, window_rect);

    // Destination marker
    let destination = model.flock.destination();
    let marker = camera.world_to_screen(destination.truncate(), window_rect);
    draw.ellipse()
        .xy(marker)
        .radius(camera.world_length(1.5).max(3.0))
        .no_fill()
        .stroke(GREEN)
        .stroke_weight(2.0);

    for (_, obstacle) in model.flock.obstacles() {
        draw_obstacle(&draw, obstacle, camera, window_rect);
    }

    for (_, boid) in model.flock.agents() {
        if model.params.draw_avoidance || model.params.draw_detection {
            draw_auras(&draw, boid, camera, window_rect, model.params.draw_avoidance, model.params.draw_detection);
        }
        draw_boid(&draw, boid, camera, window_rect);
    }

    if let Err(err) = draw.to_frame(app, &frame) {
        warn!(?err, "failed to render the simulation");
    }

    // Draw the egui UI
    if let Err(err) = model.egui.draw_to_frame(&frame) {
        warn!(?err, "failed to render the control panel");
    }
}

// Draw the grid extent so it's clear where the out-of-bounds area starts
fn draw_boundary(draw: &Draw, model: &Model, window_rect: Rect) {
    let (bottom_left, top_right) = model.flock.grid().bounds();
    let bl = model.camera.world_to_screen(bottom_left.truncate(), window_rect);
    let tr = model.camera.world_to_screen(top_right.truncate(), window_rect);
    let world_rect = Rect::from_corners(bl, tr);

    draw.rect()
        .xy(world_rect.xy())
        .wh(world_rect.wh())
        .no_fill()
        .stroke_weight(1.0)
        .stroke(rgba(0.3, 0.3, 0.3, 1.0));
}

fn draw_obstacle(draw: &Draw, obstacle: &Obstacle, camera: &Camera, window_rect: Rect) {
    let screen_pos = camera.world_to_screen(obstacle.position().truncate(), window_rect);
    draw.ellipse()
        .xy(screen_pos)
        .radius(camera.world_length(obstacle.radius()))
        .color(rgba(0.8, 0.5, 0.2, 1.0));
}

fn draw_boid(draw: &Draw, boid: &Boid, camera: &Camera, window_rect: Rect) {
    let screen_pos = camera.world_to_screen(boid.position().truncate(), window_rect);
    let angle = boid.velocity().heading();

    // Sized by the boid's radius so collisions read correctly on screen
    let size = camera.world_length(boid.params().radius).max(2.0);
    let points = [
        pt2(size, 0.0),
        pt2(-size, size / 2.0),
        pt2(-size, -size / 2.0),
    ];

    let colour = if boid.params().clear_path {
        rgb(0.6, 0.85, 1.0)
    } else {
        rgb(0.86, 0.86, 0.86)
    };

    draw.polygon()
        .color(colour)
        .points(points)
        .xy(screen_pos)
        .rotate(angle);
}

fn draw_auras(draw: &Draw, boid: &Boid, camera: &Camera, window_rect: Rect, avoidance: bool, detection: bool) {
    let screen_pos = camera.world_to_screen(boid.position().truncate(), window_rect);
    let params = boid.params();

    if avoidance {
        draw.ellipse()
            .xy(screen_pos)
            .radius(camera.world_length(params.avoidance_distance))
            .no_fill()
            .stroke(rgba(1.0, 0.2, 0.2, 0.5))
            .stroke_weight(1.0);
    }
    if detection {
        draw.ellipse()
            .xy(screen_pos)
            .radius(camera.world_length(params.detection_distance))
            .no_fill()
            .stroke(rgba(0.2, 0.4, 1.0, 0.5))
            .stroke_weight(1.0);
    }
}
