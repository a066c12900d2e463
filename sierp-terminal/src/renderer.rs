/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Point3, Vector3};
use sierp_core::{MeshBuffers, Rgb};
use std::io::Write;

use crate::camera::OrbitCamera;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Light that never quite goes out, so back-lit faces stay visible
const AMBIENT: f32 = 0.2;

/// Lift applied to every face so black faces still show up on a dark
/// terminal
const FLOOR_TINT: f32 = 0.15;

/// Which terms go into a face's shade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingOptions {
    pub use_color: bool,
    pub use_lambert: bool,
    pub use_depth: bool,
}

impl Default for ShadingOptions {
    fn default() -> Self {
        Self {
            use_color: true,
            use_lambert: true,
            use_depth: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    character: char,
    color: Rgb,
}

const EMPTY: Cell = Cell {
    character: ' ',
    color: Rgb::new(0.0, 0.0, 0.0),
};

/// ASCII renderer that converts mesh buffers to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![EMPTY; size],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(EMPTY);
    }

    /// Number of cells covered by geometry
    pub fn coverage(&self) -> usize {
        self.cells.iter().filter(|c| c.character != ' ').count()
    }

    pub fn char_at(&self, x: usize, y: usize) -> char {
        self.cells[y * self.width + x].character
    }

    pub fn render_buffers(
        &mut self,
        buffers: &MeshBuffers,
        camera: &OrbitCamera,
        options: ShadingOptions,
    ) {
        let view_projection = camera.view_projection();
        let light = camera.eye_direction();

        for triangle in 0..buffers.triangle_count() {
            let first = triangle * 3;
            let mut screen_coords = [(0.0, 0.0, 0.0); 3];
            let mut clipped = false;
            for (corner, coords) in screen_coords.iter_mut().enumerate() {
                let [x, y, z] = buffers.position(first + corner);
                match OrbitCamera::project_to_screen(
                    &view_projection,
                    &Point3::new(x, y, z),
                    self.width as u32,
                    self.height as u32,
                ) {
                    Some(projected) => *coords = projected,
                    None => clipped = true,
                }
            }
            if clipped {
                continue;
            }

            let normal = Vector3::from(buffers.normal(first));
            let color = Rgb::from(buffers.color(first));
            self.rasterize_triangle(&screen_coords, |depth| {
                shade(color, &normal, &light, depth, options)
            });
        }
    }

    fn rasterize_triangle(
        &mut self,
        coords: &[(f32, f32, f32); 3],
        shade: impl Fn(f32) -> Cell,
    ) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    // Edge-on triangle
                    return;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.cells[idx] = shade(depth);
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                let color = to_terminal_color(cell.color);
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(cell.character))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Character and color of one face fragment
fn shade(
    color: Rgb,
    normal: &Vector3<f32>,
    light: &Vector3<f32>,
    depth: f32,
    options: ShadingOptions,
) -> Cell {
    // Faces are double sided.
    let mut brightness = if options.use_lambert {
        AMBIENT + (1.0 - AMBIENT) * normal.dot(light).abs()
    } else {
        1.0
    };
    if options.use_depth {
        // Depth runs from -1 (near) to 1 (far); fade the far half.
        brightness *= 1.0 - 0.5 * depth.clamp(0.0, 1.0);
    }

    let base = if options.use_color {
        color
    } else {
        Rgb::new(1.0, 1.0, 1.0)
    };
    let tinted = Rgb::new(
        FLOOR_TINT + (1.0 - FLOOR_TINT) * base.r,
        FLOOR_TINT + (1.0 - FLOOR_TINT) * base.g,
        FLOOR_TINT + (1.0 - FLOOR_TINT) * base.b,
    );

    let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
    let char_index = char_index.clamp(1, LUMINOSITY_RAMP.len() - 1);
    Cell {
        character: LUMINOSITY_RAMP[char_index],
        color: tinted.scaled(brightness),
    }
}

fn to_terminal_color(rgb: Rgb) -> Color {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(rgb.r),
        g: channel(rgb.g),
        b: channel(rgb.b),
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
