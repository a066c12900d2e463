//! Midpoint subdivision of faces into corner and inner children
use crate::color::Shade;
use crate::geometry::{centroid, midpoint, Triangle};

/// Children emitted per parent triangle
pub const SPLIT_CHILDREN: usize = 6;

/// Leading children of each group that keep the parent's place and shade
pub const CORNER_CHILDREN: usize = 3;

/// Subdivide every triangle into six.
///
/// For each parent `(A, B, C)` the output holds, in order, the corner
/// children `(A, AB, CA)`, `(AB, B, BC)`, `(CA, BC, C)` with the parent's
/// shade, then the inner children `(ABC, CA, AB)`, `(ABC, AB, BC)`,
/// `(ABC, BC, CA)` around the centroid. Inner children fade from the
/// parent's label towards [`Color::inner_colors`](crate::Color::inner_colors)
/// by `fraction`.
pub fn split(triangles: &[Triangle], fraction: f64) -> Vec<Triangle> {
    let mut children = Vec::with_capacity(triangles.len() * SPLIT_CHILDREN);

    for parent in triangles {
        let [a, b, c] = parent.vertices;
        let ab = midpoint(&a, &b);
        let bc = midpoint(&b, &c);
        let ca = midpoint(&c, &a);
        let abc = centroid(&a, &b, &c);

        children.push(Triangle::new(a, ab, ca, parent.shade));
        children.push(Triangle::new(ab, b, bc, parent.shade));
        children.push(Triangle::new(ca, bc, c, parent.shade));

        let from = parent.shade.label();
        let [c1, c2, c3] = from.inner_colors();
        let blend = |to| Shade::Blend {
            from,
            to,
            amount: fraction as f32,
        };
        children.push(Triangle::new(abc, ca, ab, blend(c1)));
        children.push(Triangle::new(abc, ab, bc, blend(c2)));
        children.push(Triangle::new(abc, bc, ca, blend(c3)));
    }

    children
}
