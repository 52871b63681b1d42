/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct that contains performance metrics
 * to be displayed in the UI:
 * - FPS (frames per second) and frame time
 * - Physics steps taken this frame and the cost of the last one
 * - Agent and obstacle counts
 */

use std::time::Duration;

use crate::flock::TickStats;

#[derive(Debug, Clone, Default)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub physics_updates_per_frame: usize,
    pub last_tick: TickStats,
    pub agent_count: usize,
    pub obstacle_count: usize,
    /// Last error reported by the core, shown until the next one replaces it.
    pub last_error: Option<String>,
}

impl DebugInfo {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("FPS: {:.1}", self.fps),
            format!("Frame time: {:.2} ms", self.frame_time.as_secs_f64() * 1000.0),
            format!("Physics steps this frame: {}", self.physics_updates_per_frame),
            format!("Last tick: {} us", self.last_tick.micros),
            format!("Agents: {}", self.agent_count),
            format!("Obstacles: {}", self.obstacle_count),
        ];
        if self.last_tick.degenerate > 0 {
            lines.push(format!("Degenerate agents: {}", self.last_tick.degenerate));
        }
        if let Some(err) = &self.last_error {
            lines.push(format!("Error: {}", err));
        }
        lines
    }
}
