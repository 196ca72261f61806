//! Small 2D geometry helpers: vectors, points and lines.
//!
//! Independent of the set. Coordinates are `f64` and compare approximately.

use std::ops::{Add, Mul, Sub};

use thiserror::Error;

const EPSILON: f64 = 1e-9;

/// Approximate equality of two coordinates.
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlaneError {
    #[error("a line needs a non-zero direction")]
    DegenerateLine,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A line through `start` along `direction`, which is never the zero vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    start: Point,
    direction: Vector,
}

impl Vector {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// The vector rotated clockwise by a right angle.
    pub fn orthogonal(&self) -> Self {
        Self::new(self.y, -self.x)
    }

    pub fn is_orthogonal(&self, other: &Vector) -> bool {
        approx_eq(*self * *other, 0.0)
    }

    pub fn is_collinear(&self, other: &Vector) -> bool {
        approx_eq(self.x * other.y, self.y * other.x)
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.x, other.x) && approx_eq(self.y, other.y)
    }
}

impl Add for Vector {
    type Output = Vector;
    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Vector;
    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Dot product.
impl Mul for Vector {
    type Output = f64;
    fn mul(self, rhs: Vector) -> f64 {
        self.x * rhs.x + self.y * rhs.y
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;
    fn mul(self, factor: f64) -> Vector {
        Vector::new(self.x * factor, self.y * factor)
    }
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.x, other.x) && approx_eq(self.y, other.y)
    }
}

impl Sub for Point {
    type Output = Vector;
    fn sub(self, rhs: Point) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Vector> for Point {
    type Output = Point;
    fn add(self, rhs: Vector) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Vector> for Point {
    type Output = Point;
    fn sub(self, rhs: Vector) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Line {
    pub fn new(start: Point, direction: Vector) -> Result<Self, PlaneError> {
        if direction.is_zero() {
            return Err(PlaneError::DegenerateLine);
        }
        Ok(Self { start, direction })
    }

    /// The line through two distinct points.
    pub fn through(a: Point, b: Point) -> Result<Self, PlaneError> {
        Self::new(a, b - a)
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn direction(&self) -> Vector {
        self.direction
    }

    pub fn contains(&self, point: Point) -> bool {
        (point - self.start).is_collinear(&self.direction)
    }

    /// The single common point of two lines, or `None` for parallel or equal lines.
    pub fn intersection(&self, other: &Line) -> Option<Point> {
        if self.direction.is_collinear(&other.direction) {
            return None;
        }
        let (d1, d2) = (self.direction, other.direction);
        let det = d1.x * d2.y - d1.y * d2.x;
        if approx_eq(det, 0.0) {
            return None;
        }
        let offset = other.start - self.start;
        let t = (offset.x * d2.y - offset.y * d2.x) / det;
        Some(self.start + d1 * t)
    }

    /// The line through `point` perpendicular to this one.
    pub fn perpendicular(&self, point: Point) -> Line {
        Line {
            start: point,
            direction: self.direction.orthogonal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_predicates() {
        let v = Vector::new(2.0, 1.0);
        assert!(v.is_orthogonal(&v.orthogonal()));
        assert!(v.is_collinear(&(v * -3.0)));
        assert!(!v.is_collinear(&v.orthogonal()));
        assert_eq!(v + Vector::new(1.0, 1.0), Vector::new(3.0, 2.0));
        assert_eq!(v * Vector::new(1.0, 1.0), 3.0);
        assert!((v - v).is_zero());
    }

    #[test]
    fn test_degenerate_line() {
        let p = Point::new(1.0, 1.0);
        assert_eq!(Line::through(p, p), Err(PlaneError::DegenerateLine));
        assert_eq!(
            Line::new(p, Vector::zero()).unwrap_err().to_string(),
            "a line needs a non-zero direction"
        );
    }

    #[test]
    fn test_intersection() {
        let diagonal = Line::through(Point::new(0.0, 0.0), Point::new(2.0, 2.0)).unwrap();
        let anti = Line::through(Point::new(0.0, 2.0), Point::new(2.0, 0.0)).unwrap();
        let crossing = diagonal.intersection(&anti).unwrap();
        assert_eq!(crossing, Point::new(1.0, 1.0));
        assert!(diagonal.contains(crossing));
        assert!(anti.contains(crossing));

        let parallel = Line::new(Point::new(0.0, 1.0), Vector::new(1.0, 1.0)).unwrap();
        assert!(diagonal.intersection(&parallel).is_none());
        assert!(diagonal.intersection(&diagonal).is_none());
    }

    #[test]
    fn test_perpendicular() {
        let line = Line::new(Point::new(0.0, 0.0), Vector::new(1.0, 0.0)).unwrap();
        let point = Point::new(3.0, 4.0);
        let perpendicular = line.perpendicular(point);
        assert!(perpendicular.contains(point));
        assert!(perpendicular.direction().is_orthogonal(&line.direction()));
        assert_eq!(line.intersection(&perpendicular), Some(Point::new(3.0, 0.0)));
    }
}
