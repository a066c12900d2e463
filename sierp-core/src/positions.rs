//! Offsets of the self-similar copies making up the fractal at a given depth
use std::collections::HashMap;
use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::geometry::{cylindrical, Point};

/// Apex height of a unit copy above its floor
const APEX_HEIGHT: f64 = FRAC_1_SQRT_2;

/// Angles of the three floor copies around the center
const FLOOR_ANGLES: [f64; 3] = [PI / 3.0, PI, 5.0 * PI / 3.0];

/// Offsets of all `4^depth` copies. Depths below one yield just the origin.
pub fn sub_positions(depth: i32) -> Vec<Point> {
    expand(depth, vec![Point::origin()])
}

/// Replace every base with its four children at scale `1 / 2^level`, then
/// recurse towards level one.
fn expand(level: i32, bases: Vec<Point>) -> Vec<Point> {
    if level < 1 {
        return bases;
    }

    let fraction = 1.0 / 2f64.powi(level);
    let mut children = Vec::with_capacity(bases.len() * 4);
    for base in &bases {
        children.push(base + Point::new(0.0, APEX_HEIGHT * fraction, 0.0).coords);
        for theta in FLOOR_ANGLES {
            children.push(base + cylindrical(0.5 * fraction, theta, 0.0).coords);
        }
    }

    expand(level - 1, children)
}

/// Memoized [`sub_positions`], keyed by depth.
///
/// Entries are computed once and kept for the lifetime of the cache.
/// Concurrent requests for the same missing depth compute it only once.
#[derive(Debug, Default)]
pub struct PositionCache {
    entries: RwLock<HashMap<i32, Arc<[Point]>>>,
    computations: AtomicUsize,
}

impl PositionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offsets for `depth`, computing and storing them on first request
    pub fn get(&self, depth: i32) -> Arc<[Point]> {
        // Every depth below one is the lone origin.
        let depth = depth.max(0);

        if let Some(positions) = self.entries.read().get(&depth) {
            return Arc::clone(positions);
        }

        let mut entries = self.entries.write();
        let positions = entries.entry(depth).or_insert_with(|| {
            self.computations.fetch_add(1, Ordering::Relaxed);
            log::debug!("computing sub-positions for depth {depth}");
            sub_positions(depth).into()
        });
        Arc::clone(positions)
    }

    /// How many depths have been computed so far
    pub fn computations(&self) -> usize {
        self.computations.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
