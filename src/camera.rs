/*
 * Camera Module
 *
 * This module defines the Camera struct that handles zooming and panning
 * in the simulation. It provides coordinate transformations between
 * world space and screen space.
 */

use nannou::prelude::*;

use crate::WORLD_SCALE;

// World units panned per frame while an arrow key is held, at zoom 1
const KEY_PAN_SPEED: f32 = 1.0;

pub struct Camera {
    pub position: Vec2,
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub is_dragging: bool,
    pub last_cursor_pos: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.05,
            max_zoom: 20.0,
            is_dragging: false,
            last_cursor_pos: Vec2::ZERO,
        }
    }

    fn scale(&self) -> f32 {
        self.zoom * WORLD_SCALE
    }

    // Convert a point from world space to screen space
    pub fn world_to_screen(&self, point: Vec2, window_rect: Rect) -> Vec2 {
        (point - self.position) * self.scale() + window_rect.xy()
    }

    // Convert a point from screen space to world space
    pub fn screen_to_world(&self, point: Vec2, window_rect: Rect) -> Vec2 {
        (point - window_rect.xy()) / self.scale() + self.position
    }

    /// Length in screen pixels of a world-space distance.
    pub fn world_length(&self, length: f32) -> f32 {
        length * self.scale()
    }

    // Handle mouse wheel events for zooming
    pub fn zoom(&mut self, scroll_delta: Vec2, cursor_position: Vec2, window_rect: Rect) {
        let zoom_factor = 1.0 + scroll_delta.y * 0.1;

        // Keep the world point under the cursor fixed
        let cursor_world_before = self.screen_to_world(cursor_position, window_rect);
        self.zoom = (self.zoom * zoom_factor).clamp(self.min_zoom, self.max_zoom);
        let cursor_world_after = self.screen_to_world(cursor_position, window_rect);

        self.position += cursor_world_before - cursor_world_after;
    }

    /// Pan by a number of key presses along each axis.
    pub fn pan(&mut self, direction: Vec2) {
        self.position += direction * KEY_PAN_SPEED / self.zoom;
    }

    pub fn reset(&mut self) {
        self.position = Vec2::ZERO;
        self.zoom = 1.0;
    }

    pub fn start_drag(&mut self, position: Vec2) {
        self.last_cursor_pos = position;
        self.is_dragging = true;
    }

    // Update camera position while dragging
    pub fn drag(&mut self, position: Vec2) {
        if self.is_dragging {
            let delta = position - self.last_cursor_pos;
            if delta.length_squared() > 0.0 {
                self.position -= delta / self.scale();
                self.last_cursor_pos = position;
            }
        }
    }

    pub fn end_drag(&mut self) {
        self.is_dragging = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Rect {
        Rect::from_w_h(800.0, 600.0)
    }

    #[test]
    fn screen_and_world_transforms_invert() {
        let mut camera = Camera::new();
        camera.position = vec2(10.0, -5.0);
        camera.zoom = 2.5;
        let world = vec2(33.0, 12.0);
        let back = camera.screen_to_world(camera.world_to_screen(world, window()), window());
        assert!((back - world).length() < 1e-3);
    }

    #[test]
    fn zoom_keeps_the_cursor_point_fixed() {
        let mut camera = Camera::new();
        let cursor = vec2(120.0, -80.0);
        let before = camera.screen_to_world(cursor, window());
        camera.zoom(vec2(0.0, 3.0), cursor, window());
        let after = camera.screen_to_world(cursor, window());
        assert!((before - after).length() < 1e-3);
        assert!(camera.zoom > 1.0);
    }

    #[test]
    fn dragging_moves_against_the_cursor() {
        let mut camera = Camera::new();
        camera.start_drag(vec2(0.0, 0.0));
        camera.drag(vec2(WORLD_SCALE * 10.0, 0.0));
        camera.end_drag();
        assert!((camera.position - vec2(-10.0, 0.0)).length() < 1e-4);
        camera.drag(vec2(500.0, 0.0));
        assert!((camera.position - vec2(-10.0, 0.0)).length() < 1e-4);
    }
}
