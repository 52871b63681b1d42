/*
 * Obstacle Module
 *
 * Static circular obstacles. They never steer; agents avoid them through the
 * forward-box test and, in clear path mode, through velocity obstacles.
 */

use nannou::prelude::*;

use crate::error::{require_finite, require_positive, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    position: Vec3,
    radius: f32,
}

impl Obstacle {
    pub fn new(position: Vec3, radius: f32) -> Result<Self> {
        require_finite("obstacle_position", position.x)?;
        require_finite("obstacle_position", position.y)?;
        Ok(Self {
            position,
            radius: require_positive("obstacle_radius", radius)?,
        })
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) -> Result<()> {
        self.radius = require_positive("obstacle_radius", radius)?;
        Ok(())
    }
}
