/*
 * Convex Shape Module
 *
 * Convex regions in the XY plane, stored as a list of boundary edges sorted by
 * ascending facing angle. Walking the sorted edges from the first anchor traces
 * the boundary loop, which is what makes the Minkowski sum a merge: the sum of
 * two convex polygons has every edge of both, in angle order.
 *
 * Shapes are values. Every operation returns a new shape and edges are plain
 * `Copy` data, so no two shapes ever share a boundary list.
 *
 * Edge points are local to the shape; `position` translates the whole shape.
 */

use std::cmp::Ordering;

use nannou::prelude::*;

use crate::vector::{from_heading, VectorExt};

// Edges shorter than this carry no direction and are dropped
const MIN_EDGE_LENGTH: f32 = 1.0e-6;

/// One boundary edge: a start point, the direction it runs in and its length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub point: Vec3,
    /// Facing angle in radians.
    pub angle: f32,
    pub length: f32,
}

impl Line {
    pub fn new(point: Vec3, angle: f32, length: f32) -> Self {
        Self { point, angle, length }
    }

    #[inline]
    pub fn facing(&self) -> Vec3 {
        from_heading(self.angle)
    }

    /// Positive when `point` is to the left of the edge, negative to the right.
    #[inline]
    fn side_of(&self, point: Vec3) -> f32 {
        self.facing().cross_z(point - self.point)
    }

    fn by_angle(a: &Line, b: &Line) -> Ordering {
        a.angle.total_cmp(&b.angle)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConvexShape {
    position: Vec3,
    lines: Vec<Line>,
}

impl ConvexShape {
    /// An empty shape at `position`. It has no boundaries, so every point is inside it.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            lines: Vec::new(),
        }
    }

    pub fn with_lines(position: Vec3, mut lines: Vec<Line>) -> Self {
        lines.sort_by(Line::by_angle);
        Self { position, lines }
    }

    /// Build a shape from the corners of a convex polygon, given in order.
    pub fn from_points(points: &[Vec3], position: Vec3) -> Self {
        let Some(&last) = points.last() else {
            return Self::new(position);
        };

        let mut lines = Vec::with_capacity(points.len());
        let mut previous = last;
        for &point in points {
            let edge = point - previous;
            let length = edge.length();
            if length > MIN_EDGE_LENGTH {
                lines.push(Line::new(previous, edge.heading(), length));
            }
            previous = point;
        }
        Self::with_lines(position, lines)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether a world-space point lies on the same side of every boundary.
    ///
    /// Points exactly on a boundary line don't count against either side, so
    /// boundary points come out inside. An empty shape contains everything.
    pub fn is_point_inside(&self, point: Vec3) -> bool {
        let local = point - self.position;
        let mut left = false;
        let mut right = false;
        for line in &self.lines {
            let side = line.side_of(local);
            if side > 0.0 {
                left = true;
            } else if side < 0.0 {
                right = true;
            }
            if left && right {
                return false;
            }
        }
        true
    }

    /// Minkowski sum of two shapes, kept at this shape's position.
    pub fn minkowski_sum(&self, other: &ConvexShape) -> ConvexShape {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return Self {
                position: self.position,
                lines: other.lines.clone(),
            };
        }

        // The sum starts at the sum of both lowest-angle anchors
        let mut anchor = self.lines[0].point + other.lines[0].point;

        let mut lines: Vec<Line> = self.lines.iter().chain(other.lines.iter()).copied().collect();
        lines.sort_by(Line::by_angle);

        for line in &mut lines {
            line.point = anchor;
            anchor += line.facing() * line.length;
        }

        Self {
            position: self.position,
            lines,
        }
    }

    /// Grow the shape by a square with half-diagonal `half_diagonal`, one corner along `direction`.
    pub fn with_square(&self, direction: Vec3, half_diagonal: f32) -> ConvexShape {
        let d = direction.unit() * half_diagonal;
        if d.is_zero() {
            return self.clone();
        }
        // Counter-clockwise, like every other shape here
        let left = Vec3::new(-d.y, d.x, 0.0);
        let square = Self::from_points(&[d, left, -d, -left], Vec3::ZERO);
        self.minkowski_sum(&square)
    }

    /// Grow the shape by the cone of directions from the origin that hit an object
    /// at `relative_position`, widened by both radii and stretched by `scale`.
    ///
    /// A zero offset has no direction and leaves the shape unchanged.
    pub fn with_cone_section(
        &self,
        relative_position: Vec3,
        self_radius: f32,
        object_radius: f32,
        scale: f32,
    ) -> ConvexShape {
        let distance = relative_position.length();
        if distance <= MIN_EDGE_LENGTH {
            return self.clone();
        }

        let half_angle = ((self_radius + object_radius) / distance).min(1.0).asin();
        let middle = relative_position.heading();
        let reach = distance * scale;

        let right = from_heading(middle - half_angle) * reach;
        let left = from_heading(middle + half_angle) * reach;
        let cone = Self::from_points(&[Vec3::ZERO, right, left], Vec3::ZERO);
        self.minkowski_sum(&cone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> ConvexShape {
        ConvexShape::from_points(
            &[
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
            ],
            Vec3::ZERO,
        )
    }

    #[test]
    fn lines_are_sorted_by_angle() {
        let square = unit_square();
        assert_eq!(square.lines().len(), 4);
        assert!(square.lines().windows(2).all(|w| w[0].angle <= w[1].angle));
    }

    #[test]
    fn point_inside_and_outside() {
        let square = unit_square();
        assert!(square.is_point_inside(Vec3::ZERO));
        assert!(square.is_point_inside(Vec3::new(0.9, -0.9, 0.0)));
        assert!(!square.is_point_inside(Vec3::new(1.5, 0.0, 0.0)));
        assert!(!square.is_point_inside(Vec3::new(0.0, -3.0, 0.0)));
    }

    #[test]
    fn position_translates_the_shape() {
        let square = ConvexShape::with_lines(Vec3::new(10.0, 0.0, 0.0), unit_square().lines().to_vec());
        assert!(square.is_point_inside(Vec3::new(10.5, 0.5, 0.0)));
        assert!(!square.is_point_inside(Vec3::ZERO));
    }

    #[test]
    fn empty_shape_contains_everything() {
        let empty = ConvexShape::new(Vec3::ZERO);
        assert!(empty.is_point_inside(Vec3::new(1.0e6, -3.0, 0.0)));
    }

    #[test]
    fn minkowski_with_empty_is_identity() {
        let square = unit_square();
        assert_eq!(square.minkowski_sum(&ConvexShape::new(Vec3::ZERO)), square);

        let from_empty = ConvexShape::new(Vec3::ZERO).minkowski_sum(&square);
        assert_eq!(from_empty.lines(), square.lines());
    }

    #[test]
    fn minkowski_of_two_squares_doubles_the_extent() {
        let sum = unit_square().minkowski_sum(&unit_square());
        assert_eq!(sum.lines().len(), 8);
        assert!(sum.is_point_inside(Vec3::new(1.9, 1.9, 0.0)));
        assert!(!sum.is_point_inside(Vec3::new(2.1, 0.0, 0.0)));

        // The boundary walk closes the loop
        let last = sum.lines()[sum.lines().len() - 1];
        let end = last.point + last.facing() * last.length;
        assert!((end - sum.lines()[0].point).length() < 1e-4);
    }

    #[test]
    fn cone_covers_the_direction_of_the_object() {
        let cone = ConvexShape::new(Vec3::ZERO).with_cone_section(Vec3::new(10.0, 0.0, 0.0), 1.0, 1.0, 10.0);
        assert_eq!(cone.lines().len(), 3);
        assert!(cone.is_point_inside(Vec3::new(5.0, 0.0, 0.0)));
        assert!(cone.is_point_inside(Vec3::new(50.0, 5.0, 0.0)));
        assert!(!cone.is_point_inside(Vec3::new(-1.0, 0.0, 0.0)));
        assert!(!cone.is_point_inside(Vec3::new(5.0, 4.0, 0.0)));
    }

    #[test]
    fn square_inflates_the_cone() {
        let cone = ConvexShape::new(Vec3::ZERO).with_cone_section(Vec3::new(10.0, 0.0, 0.0), 1.0, 1.0, 10.0);
        let inflated = cone.with_square(Vec3::X, 1.0);
        assert_eq!(inflated.lines().len(), 7);
        // Just behind the apex is only covered once the square is added
        let behind = Vec3::new(-0.5, 0.0, 0.0);
        assert!(!cone.is_point_inside(behind));
        assert!(inflated.is_point_inside(behind));
    }

    #[test]
    fn zero_offset_cone_adds_nothing() {
        let shape = unit_square();
        assert_eq!(shape.with_cone_section(Vec3::ZERO, 1.0, 1.0, 10.0), shape);
    }

    #[test]
    fn repeated_point_tests_agree_on_the_boundary() {
        let square = unit_square();
        let edge = Vec3::new(1.0, 0.0, 0.0);
        let first = square.is_point_inside(edge);
        assert!((0..5).all(|_| square.is_point_inside(edge) == first));
    }
}
