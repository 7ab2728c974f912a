//! Colormaps: functions from a normalized value to a color.
//!
//! Every colormap here is backed by a 256-entry lookup table. Tables are
//! derived state: they are rebuilt from their source (e.g. gradient knots)
//! and never written by a render.

pub mod gradient;

use std::sync::Arc;

use parking_lot::RwLock;

use crate::pixel::Pixel;

pub use gradient::{ColorInterpolation, Gradient, Knot, KnotBlend, KnotKind};

/// Number of entries in a colormap lookup table.
pub const TABLE_SIZE: usize = 256;

/// Maps `v ∈ [0, 1]` to a color.
pub trait Colormap {
    /// Color for `v`. Values outside `[0, 1]` are clamped.
    fn get_color(&self, v: f32) -> Pixel;
}

/// Table index for `v`: `round(v * 255)` clamped to `[0, 255]`.
#[inline]
pub fn table_index(v: f32) -> usize {
    if v.is_nan() {
        return 0;
    }
    (v * 255.0).round().clamp(0.0, 255.0) as usize
}

/// A colormap stored directly as a 256-entry table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayColormap {
    pub(crate) table: [Pixel; TABLE_SIZE],
}

impl ArrayColormap {
    /// All-transparent table.
    pub fn new() -> Self {
        Self {
            table: [Pixel::TRANSPARENT; TABLE_SIZE],
        }
    }

    pub fn from_table(table: [Pixel; TABLE_SIZE]) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &[Pixel; TABLE_SIZE] {
        &self.table
    }

    /// Entry at `index`, or `None` outside `[0, 255]`.
    pub fn entry(&self, index: i32) -> Option<Pixel> {
        usize::try_from(index).ok().and_then(|i| self.table.get(i).copied())
    }
}

impl Default for ArrayColormap {
    fn default() -> Self {
        Self::new()
    }
}

impl Colormap for ArrayColormap {
    fn get_color(&self, v: f32) -> Pixel {
        self.table[table_index(v)]
    }
}

/// A gradient shared between an editor and renderers.
///
/// Knot edits take the write lock and rebuild the table before releasing it;
/// renders read under the read lock (or take a [`snapshot`](Self::snapshot)),
/// so a render never observes a half-rebuilt table.
#[derive(Debug, Clone, Default)]
pub struct SharedGradient {
    inner: Arc<RwLock<Gradient>>,
}

impl SharedGradient {
    pub fn new(gradient: Gradient) -> Self {
        Self {
            inner: Arc::new(RwLock::new(gradient)),
        }
    }

    /// Mutate the gradient under the write lock.
    pub fn update<R>(&self, edit: impl FnOnce(&mut Gradient) -> R) -> R {
        let mut gradient = self.inner.write();
        edit(&mut gradient)
    }

    /// Copy the current lookup table for a render.
    pub fn snapshot(&self) -> ArrayColormap {
        self.inner.read().colormap().clone()
    }
}

impl Colormap for SharedGradient {
    fn get_color(&self, v: f32) -> Pixel {
        self.inner.read().get_color(v)
    }
}
