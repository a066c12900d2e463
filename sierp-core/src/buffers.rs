//! Flat per-vertex attribute buffers handed to a renderer
use crate::geometry::{Mesh, Point};

/// Components per vertex in every buffer
pub const COMPONENTS: usize = 3;

/// Parallel position, color and normal arrays. Every three consecutive
/// vertices form one triangle; there is no index buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
    pub normals: Vec<f32>,
}

impl MeshBuffers {
    /// Replicate `unit` at every offset in `offsets`.
    ///
    /// Each vertex is translated by its offset; color and normal are
    /// repeated from the triangle it belongs to.
    pub fn assemble(unit: &Mesh, offsets: &[Point]) -> Self {
        let normals = unit.normals();
        let len = offsets.len() * unit.vertex_count() * COMPONENTS;
        let mut buffers = Self {
            positions: Vec::with_capacity(len),
            colors: Vec::with_capacity(len),
            normals: Vec::with_capacity(len),
        };

        for offset in offsets {
            for (triangle, normal) in unit.triangles.iter().zip(&normals) {
                let rgb = triangle.rgb().to_array();
                let normal = normal.cast::<f32>();
                for vertex in &triangle.vertices {
                    let p = (vertex + offset.coords).cast::<f32>();
                    buffers.positions.extend_from_slice(&[p.x, p.y, p.z]);
                    buffers.normals.extend_from_slice(normal.as_slice());
                    buffers.colors.extend_from_slice(&rgb);
                }
            }
        }

        buffers
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / COMPONENTS
    }

    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, vertex: usize) -> [f32; 3] {
        component(&self.positions, vertex)
    }

    pub fn color(&self, vertex: usize) -> [f32; 3] {
        component(&self.colors, vertex)
    }

    pub fn normal(&self, vertex: usize) -> [f32; 3] {
        component(&self.normals, vertex)
    }

    /// Vertex positions of each triangle in order
    pub fn triangles(&self) -> impl Iterator<Item = [[f32; 3]; 3]> + '_ {
        (0..self.triangle_count()).map(move |t| {
            let first = t * 3;
            [
                self.position(first),
                self.position(first + 1),
                self.position(first + 2),
            ]
        })
    }
}

fn component(buffer: &[f32], vertex: usize) -> [f32; 3] {
    let start = vertex * COMPONENTS;
    [buffer[start], buffer[start + 1], buffer[start + 2]]
}
