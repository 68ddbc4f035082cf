//! Geometric primitives for report layout and positioning.
//!
//! This module provides the geometric types used by the radial planner and
//! the force-directed graph engine.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in canvas space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! SpeciesRing uses a coordinate system consistent with SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner at `(0, 0)`
//! - **X-axis**: Increases rightward (positive to the right)
//! - **Y-axis**: Increases downward (positive downward)
//!
//! Angles given to [`Point::from_polar`] are measured from the positive
//! x-axis. Because y grows downward, positive angles turn clockwise on screen.

/// A 2D point representing a position in canvas coordinate space.
///
/// # Examples
///
/// ```
/// # use speciesring_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Creates the point at `radius` and `angle_degrees` around `center`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use speciesring_core::geometry::Point;
    /// let center = Point::new(400.0, 400.0);
    /// let p = Point::from_polar(center, 120.0, 0.0);
    /// assert_eq!(p.x(), 520.0);
    /// assert_eq!(p.y(), 400.0);
    /// ```
    pub fn from_polar(center: Point, radius: f32, angle_degrees: f32) -> Self {
        let radians = angle_degrees.to_radians();
        Self {
            x: center.x + radius * radians.cos(),
            y: center.y + radius * radians.sin(),
        }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point to this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Multiplies both coordinates by the given factor.
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Creates a square size with equal sides.
    pub fn square(side: f32) -> Self {
        Self::new(side, side)
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns the center point of a canvas of this size.
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a zero-size bounds at a single point.
    pub fn from_point(point: Point) -> Self {
        Self {
            min_x: point.x,
            min_y: point.y,
            max_x: point.x,
            max_y: point.y,
        }
    }

    /// Returns the smallest bounds containing every point, or `None` when
    /// the iterator is empty.
    pub fn enclosing(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        points
            .into_iter()
            .map(Self::from_point)
            .reduce(|acc, bounds| acc.merge(&bounds))
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner.
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Merges two bounds into the smallest bounds containing both.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    /// A polar point lies at exactly `radius` from its center.
    fn check_polar_distance_is_radius(
        center: Point,
        radius: f32,
        angle: f32,
    ) -> Result<(), TestCaseError> {
        let p = Point::from_polar(center, radius, angle);
        let distance = p.sub_point(center).hypot();

        prop_assert!(approx_eq!(f32, distance, radius, epsilon = 0.01));
        Ok(())
    }

    /// Merged bounds contain every input point.
    fn check_enclosing_contains_points(points: Vec<Point>) -> Result<(), TestCaseError> {
        let bounds = Bounds::enclosing(points.iter().copied()).unwrap();

        for p in points {
            prop_assert!(p.x() >= bounds.min_x() && p.x() <= bounds.max_x());
            prop_assert!(p.y() >= bounds.min_y() && p.y() <= bounds.max_y());
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn polar_distance_is_radius(
            center in point_strategy(),
            radius in 0.0f32..1000.0,
            angle in 0.0f32..360.0,
        ) {
            check_polar_distance_is_radius(center, radius, angle)?;
        }

        #[test]
        fn enclosing_contains_points(points in prop::collection::vec(point_strategy(), 1..20)) {
            check_enclosing_contains_points(points)?;
        }
    }
}
