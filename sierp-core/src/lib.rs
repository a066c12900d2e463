//! Sierp Core Library - Sierpinski tetrahedron mesh generation
//!
//! Builds the triangle mesh of a Sierpinski tetrahedron for any point on a
//! continuous timeline: a flat triangle folds into a tetrahedron, then every
//! face repeatedly subdivides and folds its inner faces in. Output is a set of
//! flat position/color/normal buffers ready for a rendering pipeline.

pub mod buffers;
pub mod color;
pub mod fold;
pub mod generator;
pub mod geometry;
pub mod playback;
pub mod positions;
pub mod shape;
pub mod split;
pub mod stl;

// Re-export commonly used types
pub use buffers::MeshBuffers;
pub use color::{Color, Rgb, Shade};
pub use generator::{ConfigError, GenerateError, GeneratorConfig, MeshGenerator, Regime};
pub use geometry::{Mesh, Point, Triangle};
pub use playback::{Playback, PlaybackConfig};
pub use positions::PositionCache;
