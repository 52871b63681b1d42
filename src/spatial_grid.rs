/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid used for neighbor lookups.
 * It divides a rectangle centred on the origin into square cells, each holding
 * the handles of the agents and obstacles whose position falls inside it, plus
 * one catch-all cell for anything outside the rectangle.
 *
 * The grid never owns agents or obstacles; the flock keeps them in arenas and
 * hands the grid stable handles. Membership is kept correct incrementally:
 * the flock reports every move and the grid re-buckets the handle only when
 * the cell actually changed.
 */

use nannou::prelude::*;

use crate::error::{require_positive, Result, SteerError};
use crate::params::GridParams;

/// Stable handle of an agent inside the flock's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub(crate) usize);

/// Stable handle of an obstacle inside the flock's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId(pub(crate) usize);

impl AgentId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl ObstacleId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which bucket a position belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKey {
    Grid(usize),
    OutOfBounds,
}

/// One bucket of the grid. Order inside the lists is irrelevant.
#[derive(Debug, Default, Clone)]
pub struct Cell {
    agents: Vec<AgentId>,
    obstacles: Vec<ObstacleId>,
}

impl Cell {
    pub fn agents(&self) -> &[AgentId] {
        &self.agents
    }

    pub fn obstacles(&self) -> &[ObstacleId] {
        &self.obstacles
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty() && self.obstacles.is_empty()
    }

    fn remove_agent(&mut self, id: AgentId) -> bool {
        match self.agents.iter().position(|&a| a == id) {
            Some(i) => {
                self.agents.swap_remove(i);
                true
            }
            None => false,
        }
    }

    fn remove_obstacle(&mut self, id: ObstacleId) -> bool {
        match self.obstacles.iter().position(|&o| o == id) {
            Some(i) => {
                self.obstacles.swap_remove(i);
                true
            }
            None => false,
        }
    }
}

/// Inclusive block of grid cells overlapping a query circle.
///
/// The block is empty when `lo > hi` on either axis, which happens when the
/// circle lies completely outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub lo_x: i64,
    pub lo_y: i64,
    pub hi_x: i64,
    pub hi_y: i64,
    /// The circle's bounding box reaches outside the grid, so the
    /// out-of-bounds cell has to be scanned too.
    pub includes_oob: bool,
}

impl CellRange {
    fn outside_only() -> Self {
        Self {
            lo_x: 0,
            lo_y: 0,
            hi_x: -1,
            hi_y: -1,
            includes_oob: true,
        }
    }

    pub fn is_grid_empty(&self) -> bool {
        self.lo_x > self.hi_x || self.lo_y > self.hi_y
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        let (x, y) = (x as i64, y as i64);
        x >= self.lo_x && x <= self.hi_x && y >= self.lo_y && y <= self.hi_y
    }

    /// Grid coordinates in the block, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let (lo_x, hi_x) = (self.lo_x, self.hi_x);
        let rows = if self.is_grid_empty() { 1..=0 } else { self.lo_y..=self.hi_y };
        rows.flat_map(move |y| (lo_x..=hi_x).map(move |x| (x as usize, y as usize)))
    }
}

pub struct SpatialGrid {
    size_x: usize,
    size_y: usize,
    partition_width: f32,
    bottom_left: Vec3,
    top_right: Vec3,
    cells: Vec<Cell>,
    oob: Cell,
    agent_count: usize,
    obstacle_count: usize,
}

impl SpatialGrid {
    pub fn new(size_x: usize, size_y: usize, partition_width: f32) -> Result<Self> {
        if size_x == 0 || size_y == 0 {
            return Err(SteerError::InvalidConfiguration {
                field: "grid_size",
                value: 0.0,
                reason: "the grid needs at least one cell on each axis",
            });
        }
        let partition_width = require_positive("partition_width", partition_width)?;

        // The grid is centred on the origin
        let extent = Vec3::new(size_x as f32 * partition_width, size_y as f32 * partition_width, 0.0);
        let bottom_left = -extent / 2.0;
        let top_right = bottom_left + extent;

        let mut cells = Vec::with_capacity(size_x * size_y);
        cells.resize_with(size_x * size_y, Cell::default);

        Ok(Self {
            size_x,
            size_y,
            partition_width,
            bottom_left,
            top_right,
            cells,
            oob: Cell::default(),
            agent_count: 0,
            obstacle_count: 0,
        })
    }

    pub fn from_params(params: &GridParams) -> Result<Self> {
        Self::new(params.size_x, params.size_y, params.partition_width)
    }

    pub fn size_x(&self) -> usize {
        self.size_x
    }

    pub fn size_y(&self) -> usize {
        self.size_y
    }

    pub fn partition_width(&self) -> f32 {
        self.partition_width
    }

    /// Bottom-left (inclusive) and top-right (exclusive) corners of the grid.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        (self.bottom_left, self.top_right)
    }

    pub fn agent_count(&self) -> usize {
        self.agent_count
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacle_count
    }

    #[inline]
    pub fn is_out_of_bounds(&self, position: Vec3) -> bool {
        // Written so that NaN coordinates fall out of bounds
        !(position.x >= self.bottom_left.x
            && position.y >= self.bottom_left.y
            && position.x < self.top_right.x
            && position.y < self.top_right.y)
    }

    // Convert world coordinates to a bucket
    #[inline]
    pub fn cell_key(&self, position: Vec3) -> CellKey {
        if self.is_out_of_bounds(position) {
            return CellKey::OutOfBounds;
        }
        let local = (position - self.bottom_left) / self.partition_width;
        // Clamp guards against rounding right at the top edge
        let x = (local.x.floor() as usize).min(self.size_x - 1);
        let y = (local.y.floor() as usize).min(self.size_y - 1);
        CellKey::Grid(y * self.size_x + x)
    }

    pub fn cell_at(&self, position: Vec3) -> &Cell {
        self.cell_by_key(self.cell_key(position))
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        if x >= self.size_x || y >= self.size_y {
            return None;
        }
        self.cells.get(y * self.size_x + x)
    }

    pub fn oob(&self) -> &Cell {
        &self.oob
    }

    fn cell_by_key(&self, key: CellKey) -> &Cell {
        match key {
            CellKey::Grid(index) => &self.cells[index],
            CellKey::OutOfBounds => &self.oob,
        }
    }

    fn cell_by_key_mut(&mut self, key: CellKey) -> &mut Cell {
        match key {
            CellKey::Grid(index) => &mut self.cells[index],
            CellKey::OutOfBounds => &mut self.oob,
        }
    }

    /// Cells whose area overlaps the bounding box of a circle.
    pub fn cell_range_covering(&self, position: Vec3, radius: f32) -> Result<CellRange> {
        if !(radius >= 0.0) || !radius.is_finite() {
            return Err(SteerError::InvalidArgument(format!(
                "query radius must be finite and non-negative, got {}",
                radius
            )));
        }
        if !position.x.is_finite() || !position.y.is_finite() {
            return Ok(CellRange::outside_only());
        }

        let min_x = position.x - radius;
        let min_y = position.y - radius;
        let max_x = position.x + radius;
        let max_y = position.y + radius;

        let includes_oob = min_x < self.bottom_left.x
            || min_y < self.bottom_left.y
            || max_x >= self.top_right.x
            || max_y >= self.top_right.y;

        // Floor semantics: a coordinate on a boundary belongs to the cell starting there
        let to_cell = |value: f32, origin: f32| ((value - origin) / self.partition_width).floor() as i64;

        Ok(CellRange {
            lo_x: to_cell(min_x, self.bottom_left.x).max(0),
            lo_y: to_cell(min_y, self.bottom_left.y).max(0),
            hi_x: to_cell(max_x, self.bottom_left.x).min(self.size_x as i64 - 1),
            hi_y: to_cell(max_y, self.bottom_left.y).min(self.size_y as i64 - 1),
            includes_oob,
        })
    }

    /// Every cell of a range, with the out-of-bounds cell last when flagged.
    pub fn cells_in_range<'a>(&'a self, range: &CellRange) -> impl Iterator<Item = &'a Cell> + 'a {
        let size_x = self.size_x;
        let grid = range.cells().map(move |(x, y)| &self.cells[y * size_x + x]);
        let oob = range.includes_oob.then_some(&self.oob);
        grid.chain(oob)
    }

    pub fn agents_in_range<'a>(&'a self, range: &CellRange) -> impl Iterator<Item = AgentId> + 'a {
        self.cells_in_range(range).flat_map(|cell| cell.agents.iter().copied())
    }

    pub fn obstacles_in_range<'a>(&'a self, range: &CellRange) -> impl Iterator<Item = ObstacleId> + 'a {
        self.cells_in_range(range).flat_map(|cell| cell.obstacles.iter().copied())
    }

    // Insert an agent handle into the cell under its position
    pub fn insert_agent(&mut self, id: AgentId, position: Vec3) {
        let key = self.cell_key(position);
        self.cell_by_key_mut(key).agents.push(id);
        self.agent_count += 1;
    }

    pub fn insert_obstacle(&mut self, id: ObstacleId, position: Vec3) {
        let key = self.cell_key(position);
        self.cell_by_key_mut(key).obstacles.push(id);
        self.obstacle_count += 1;
    }

    /// Remove an agent handle, looking in the cell under `position` first.
    /// Returns false when the handle was not registered anywhere.
    pub fn remove_agent(&mut self, id: AgentId, position: Vec3) -> bool {
        let key = self.cell_key(position);
        let removed = self.cell_by_key_mut(key).remove_agent(id)
            || self
                .cells
                .iter_mut()
                .chain(std::iter::once(&mut self.oob))
                .any(|cell| cell.remove_agent(id));
        if removed {
            self.agent_count -= 1;
        }
        removed
    }

    pub fn remove_obstacle(&mut self, id: ObstacleId, position: Vec3) -> bool {
        let key = self.cell_key(position);
        let removed = self.cell_by_key_mut(key).remove_obstacle(id)
            || self
                .cells
                .iter_mut()
                .chain(std::iter::once(&mut self.oob))
                .any(|cell| cell.remove_obstacle(id));
        if removed {
            self.obstacle_count -= 1;
        }
        removed
    }

    /// Re-bucket an agent after it moved from `old_position` to `new_position`.
    pub fn notify_moved(&mut self, id: AgentId, old_position: Vec3, new_position: Vec3) {
        let old_key = self.cell_key(old_position);
        let new_key = self.cell_key(new_position);
        if old_key == new_key {
            return;
        }

        if self.cell_by_key_mut(old_key).remove_agent(id) {
            self.cell_by_key_mut(new_key).agents.push(id);
        } else if self.remove_agent(id, old_position) {
            // The stored cell did not match the old position; fall back to a full scan
            self.insert_agent(id, new_position);
        }
    }

    // Clear the grid
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.agents.clear();
            cell.obstacles.clear();
        }
        self.oob.agents.clear();
        self.oob.obstacles.clear();
        self.agent_count = 0;
        self.obstacle_count = 0;
    }

    /// Number of cells (including out-of-bounds) holding `id`. Used to check the
    /// single-membership invariant.
    pub fn agent_membership(&self, id: AgentId) -> usize {
        self.cells
            .iter()
            .chain(std::iter::once(&self.oob))
            .map(|cell| cell.agents.iter().filter(|&&a| a == id).count())
            .sum()
    }
}
