//! Hinge rotations that fold the unit up into a tetrahedron and fold the
//! inner faces of a subdivided unit into the fractal cavity
use std::f64::consts::PI;

use crate::geometry::{Mesh, Triangle};
use crate::shape::{BASE_TRIANGLES, FLOOR_INDEX};
use crate::split::{CORNER_CHILDREN, SPLIT_CHILDREN};

/// Angle a face turns through when folding from flat onto a regular
/// tetrahedron: the supplement of the dihedral angle arccos(1/3)
pub fn fold_angle() -> f64 {
    PI - (1.0f64 / 3.0).acos()
}

/// Fold the corner faces of the base shape up about their floor edges.
///
/// `fraction` 0 leaves the shape flat, 1 closes it into a tetrahedron.
pub fn fold_up(mesh: &mut Mesh, fraction: f64) {
    let angle = -fraction * fold_angle();
    for (i, triangle) in mesh.triangles.iter_mut().enumerate() {
        if i % BASE_TRIANGLES == FLOOR_INDEX {
            continue;
        }
        triangle.hinge(1, 2, angle);
    }
}

/// Sink the three inner children of every split face inwards.
///
/// `triangles` must be the output of [`split`](crate::split::split): groups
/// of six with the inner children last. `fraction` 0 leaves them flush with
/// the parent face.
pub fn fold_in(triangles: &mut [Triangle], fraction: f64) {
    let angle = fraction * fold_angle();
    for group in triangles.chunks_exact_mut(SPLIT_CHILDREN) {
        for inner in &mut group[CORNER_CHILDREN..] {
            inner.hinge(2, 1, angle);
        }
    }
}
