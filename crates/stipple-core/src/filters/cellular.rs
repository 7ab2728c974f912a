//! Jittered cellular (Worley) feature field.
//!
//! Space is divided into unit cells. Each cell holds a fixed arrangement of
//! feature points for its [`GridType`], displaced by up to `randomness` of a
//! cell. Point positions depend only on the cell coordinates and the seed, so
//! a field can be sampled anywhere in any order.

use glam::Vec2;
use nanorand::WyRand;
use serde::{Deserialize, Serialize};

use crate::noise::next_unit;

/// Mean points per cell of the [`GridType::Random`] layout.
const MEAN_POINTS: f64 = 2.5;
const MAX_POINTS: usize = 8;

/// Arrangement of feature points inside each cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridType {
    /// A Poisson-distributed number of uniformly placed points.
    Random,
    /// One point at the cell centre.
    Square,
    /// One point, offset half a cell on alternate columns.
    #[default]
    Hexagonal,
    /// Two points on the diagonal, the second weighted heavier.
    Octagonal,
    /// Two points, mirrored on alternate rows.
    Triangular,
}

/// A feature point and its distance from the sample position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feature {
    pub position: Vec2,
    pub distance: f32,
}

/// Seeded cellular field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellularField {
    pub grid: GridType,
    /// Jitter applied to regular layouts, in cells. 0 keeps them exact.
    pub randomness: f32,
    pub seed: u64,
}

impl CellularField {
    pub fn new(grid: GridType, randomness: f32, seed: u64) -> Self {
        Self {
            grid,
            randomness,
            seed,
        }
    }

    /// The two feature points closest to `p`, nearest first.
    ///
    /// If the neighbourhood holds a single point it is returned twice.
    /// Equidistant points keep the order in which cells are visited.
    pub fn nearest(&self, p: Vec2) -> [Feature; 2] {
        let far = Feature {
            position: p,
            distance: f32::INFINITY,
        };
        let mut best = [far, far];
        let (cx, cy) = (p.x.floor() as i64, p.y.floor() as i64);

        for cell_y in cy - 1..=cy + 1 {
            for cell_x in cx - 1..=cx + 1 {
                self.visit_cell(cell_x, cell_y, p, &mut best);
            }
        }
        if best[1].distance.is_infinite() {
            best[1] = best[0];
        }
        best
    }

    fn visit_cell(&self, cell_x: i64, cell_y: i64, p: Vec2, best: &mut [Feature; 2]) {
        let cell_seed = (571i64.wrapping_mul(cell_x)).wrapping_add(23i64.wrapping_mul(cell_y)) as u64;
        let mut rng = WyRand::new_seed(cell_seed ^ self.seed.rotate_left(29));
        let origin = Vec2::new(cell_x as f32, cell_y as f32);

        let count = match self.grid {
            GridType::Random => poisson_count(&mut rng),
            GridType::Square | GridType::Hexagonal => 1,
            GridType::Octagonal | GridType::Triangular => 2,
        };

        for i in 0..count {
            let (offset, weight) = match self.grid {
                GridType::Random => (
                    Vec2::new(next_unit(&mut rng) as f32, next_unit(&mut rng) as f32),
                    1.0,
                ),
                GridType::Square => (self.jitter(Vec2::splat(0.5), &mut rng), 1.0),
                GridType::Hexagonal => {
                    let py = if cell_x & 1 == 0 { 0.0 } else { 0.5 };
                    (self.jitter(Vec2::new(0.75, py), &mut rng), 1.0)
                }
                GridType::Octagonal => match i {
                    0 => (self.jitter(Vec2::splat(0.207), &mut rng), 1.0),
                    _ => (self.jitter(Vec2::splat(0.707), &mut rng), 1.6),
                },
                GridType::Triangular => {
                    let even_row = cell_y & 1 == 0;
                    let base = match (even_row, i) {
                        (true, 0) => Vec2::new(0.25, 0.35),
                        (true, _) => Vec2::new(0.75, 0.65),
                        (false, 0) => Vec2::new(0.75, 0.35),
                        (false, _) => Vec2::new(0.25, 0.65),
                    };
                    (self.jitter(base, &mut rng), 1.0)
                }
            };

            let position = origin + offset;
            let distance = ((position - p).abs() * weight).length();
            insert(best, Feature { position, distance });
        }
    }

    fn jitter(&self, base: Vec2, rng: &mut WyRand) -> Vec2 {
        if self.randomness == 0.0 {
            return base;
        }
        let dx = next_unit(rng) as f32 - 0.5;
        let dy = next_unit(rng) as f32 - 0.5;
        base + Vec2::new(dx, dy) * self.randomness
    }
}

fn insert(best: &mut [Feature; 2], feature: Feature) {
    if feature.distance < best[0].distance {
        best[1] = best[0];
        best[0] = feature;
    } else if feature.distance < best[1].distance {
        best[1] = feature;
    }
}

/// Draw a point count from a Poisson distribution, capped at [`MAX_POINTS`].
fn poisson_count(rng: &mut WyRand) -> usize {
    let r = next_unit(rng);
    let mut term = (-MEAN_POINTS).exp();
    let mut cumulative = term;
    for k in 0..MAX_POINTS {
        if r < cumulative {
            return k;
        }
        term *= MEAN_POINTS / (k + 1) as f64;
        cumulative += term;
    }
    MAX_POINTS
}
