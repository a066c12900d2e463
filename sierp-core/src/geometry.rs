//! Geometry primitives for the fractal mesh
use nalgebra::{Point3, Rotation3, Unit, Vector3};

use crate::color::{Rgb, Shade};

/// A vertex position or a spatial offset
pub type Point = Point3<f64>;

/// Lengths below this are treated as zero when normalizing
const EPSILON: f64 = 1e-12;

/// Midpoint of the segment `a`-`b`
pub fn midpoint(a: &Point, b: &Point) -> Point {
    nalgebra::center(a, b)
}

/// Centroid of the triangle `a`, `b`, `c`
pub fn centroid(a: &Point, b: &Point, c: &Point) -> Point {
    Point::from((a.coords + b.coords + c.coords) / 3.0)
}

/// Point from cylindrical coordinates around the Y axis.
///
/// Angle 0 points along +Z and angles grow towards +X.
pub fn cylindrical(radius: f64, theta: f64, height: f64) -> Point {
    Point::new(radius * theta.sin(), height, radius * theta.cos())
}

/// Normalize `v`, returning the zero vector when `v` has no length
pub fn normalize_or_zero(v: &Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(EPSILON).unwrap_or_else(Vector3::zeros)
}

/// Rotate `v` by `angle` radians around `axis` (right-handed).
///
/// A zero-length axis leaves `v` untouched.
pub fn rotate_about_axis(v: &Vector3<f64>, axis: &Vector3<f64>, angle: f64) -> Vector3<f64> {
    match Unit::try_new(*axis, EPSILON) {
        Some(axis) => Rotation3::from_axis_angle(&axis, angle) * v,
        None => *v,
    }
}

/// A triangle face: three vertices in winding order and one shade
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Point; 3],
    pub shade: Shade,
}

impl Triangle {
    pub fn new(a: Point, b: Point, c: Point, shade: impl Into<Shade>) -> Self {
        Self {
            vertices: [a, b, c],
            shade: shade.into(),
        }
    }

    /// Flat face normal.
    ///
    /// Both edges are normalized before the cross product so the result does
    /// not depend on triangle size. Degenerate triangles yield zero.
    pub fn normal(&self) -> Vector3<f64> {
        let [a, b, c] = &self.vertices;
        let ab = normalize_or_zero(&(a - b));
        let ac = normalize_or_zero(&(a - c));
        normalize_or_zero(&ab.cross(&ac))
    }

    pub fn rgb(&self) -> Rgb {
        self.shade.rgb()
    }

    /// Swing the first vertex around the line through the other two.
    ///
    /// The hinge axis points from `vertices[from]` to `vertices[to]`, so
    /// swapping them reverses the direction of the fold.
    pub fn hinge(&mut self, from: usize, to: usize, angle: f64) {
        let [a, b, c] = self.vertices;
        let pivot = midpoint(&b, &c);
        let axis = self.vertices[to] - self.vertices[from];
        let arm = rotate_about_axis(&(a - pivot), &axis, angle);
        self.vertices[0] = pivot + arm;
    }

    fn scale(&mut self, factor: f64) {
        for v in &mut self.vertices {
            v.coords *= factor;
        }
    }
}

/// The single self-similar unit of the fractal: a flat list of triangles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Point> {
        self.triangles.iter().flat_map(|t| t.vertices.iter())
    }

    /// Scale every vertex about the origin
    pub fn scale(&mut self, factor: f64) {
        for triangle in &mut self.triangles {
            triangle.scale(factor);
        }
    }

    /// One flat normal per triangle
    pub fn normals(&self) -> Vec<Vector3<f64>> {
        self.triangles.iter().map(Triangle::normal).collect()
    }
}

impl From<Vec<Triangle>> for Mesh {
    fn from(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_cylindrical_axes() {
        assert_relative_eq!(cylindrical(1.0, 0.0, 0.0), Point::new(0.0, 0.0, 1.0));
        assert_relative_eq!(
            cylindrical(2.0, FRAC_PI_2, 3.0),
            Point::new(2.0, 3.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_rotation_is_right_handed() {
        let v = Vector3::new(0.0, 0.0, 1.0);
        let rotated = rotate_about_axis(&v, &Vector3::x(), FRAC_PI_2);
        assert_relative_eq!(rotated, Vector3::new(0.0, -1.0, 0.0), epsilon = 1e-12);

        let half_turn = rotate_about_axis(&v, &Vector3::new(0.0, 5.0, 0.0), PI);
        assert_relative_eq!(half_turn, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_about_zero_axis_is_identity() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(rotate_about_axis(&v, &Vector3::zeros(), 1.0), v);
    }

    #[test]
    fn test_normal_direction() {
        let t = Triangle::new(
            Point::origin(),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Color::Red,
        );
        assert_relative_eq!(t.normal(), Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_normal_is_zero() {
        let p = Point::new(1.0, 1.0, 1.0);
        let t = Triangle::new(p, p, Point::origin(), Color::Black);
        assert_eq!(t.normal(), Vector3::zeros());
    }

    #[test]
    fn test_midpoint_and_centroid() {
        let a = Point::new(0.0, 0.0, 0.0);
        let b = Point::new(2.0, 0.0, 0.0);
        let c = Point::new(0.0, 3.0, 0.0);
        assert_eq!(midpoint(&a, &b), Point::new(1.0, 0.0, 0.0));
        assert_relative_eq!(centroid(&a, &b, &c), Point::new(2.0 / 3.0, 1.0, 0.0));
    }
}
