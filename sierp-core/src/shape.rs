//! The flat base triangle the tetrahedron is folded from
use std::f64::consts::PI;

use crate::color::Color;
use crate::geometry::{cylindrical, midpoint, Mesh, Triangle};

/// Triangles per unit before any subdivision
pub const BASE_TRIANGLES: usize = 4;

/// Index of the stationary floor triangle within each group of four
pub const FLOOR_INDEX: usize = 3;

/// Build the unfolded unit: a triangle inscribed in the unit circle, split at
/// its edge midpoints into three corner faces and a center floor.
///
/// Each corner face lists its outer corner first so it can be hinged about
/// the edge it shares with the floor.
pub fn base_shape() -> Mesh {
    let a = cylindrical(1.0, 0.0, 0.0);
    let b = cylindrical(1.0, 2.0 * PI / 3.0, 0.0);
    let c = cylindrical(1.0, 4.0 * PI / 3.0, 0.0);

    let ab = midpoint(&a, &b);
    let bc = midpoint(&b, &c);
    let ca = midpoint(&c, &a);

    Mesh::from(vec![
        Triangle::new(a, ca, ab, Color::Red),
        Triangle::new(b, ab, bc, Color::Green),
        Triangle::new(c, bc, ca, Color::Blue),
        Triangle::new(ab, ca, bc, Color::Black),
    ])
}
