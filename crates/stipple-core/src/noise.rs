//! Deterministic noise for displacement, cellular and sparkle filters.
//!
//! Everything here is a pure function of its inputs and an explicit seed.

use nanorand::{Rng, WyRand};

/// A smooth pseudo-random field over continuous coordinates.
///
/// Implementations must be continuous and return the same value for the same
/// input on every call.
pub trait CoherentNoise {
    /// Sample the field at `(x, y)`. Result lies in `[-1, 1]`.
    fn noise2(&self, x: f32, y: f32) -> f32;
}

/// Ken Perlin's reference permutation.
const PERM: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

const FRAC_1_SQRT_2: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Eight unit gradients around the circle.
const GRADIENTS: [[f32; 2]; 8] = [
    [1.0, 0.0],
    [-1.0, 0.0],
    [0.0, 1.0],
    [0.0, -1.0],
    [FRAC_1_SQRT_2, FRAC_1_SQRT_2],
    [-FRAC_1_SQRT_2, FRAC_1_SQRT_2],
    [FRAC_1_SQRT_2, -FRAC_1_SQRT_2],
    [-FRAC_1_SQRT_2, -FRAC_1_SQRT_2],
];

/// Unit-gradient noise peaks at √2/2; rescale to fill `[-1, 1]`.
const AMPLITUDE: f32 = std::f32::consts::SQRT_2;

#[inline]
fn perm(x: i32, seed: i32) -> u8 {
    PERM[(x.wrapping_add(seed) & 255) as usize]
}

#[inline]
fn grad(hash: u8, x: f32, y: f32) -> f32 {
    let g = GRADIENTS[(hash & 7) as usize];
    g[0] * x + g[1] * y
}

#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// 2D Perlin gradient noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Perlin {
    /// Offsets the permutation lookup; different seeds give unrelated fields.
    pub seed: i32,
}

impl Perlin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: i32) -> Self {
        Self { seed }
    }
}

impl CoherentNoise for Perlin {
    fn noise2(&self, x: f32, y: f32) -> f32 {
        let x0 = x.floor();
        let y0 = y.floor();
        // The permutation repeats every 256 cells; reducing first keeps the
        // lattice arithmetic in range for any input.
        let xi = x0.rem_euclid(256.0) as i32;
        let yi = y0.rem_euclid(256.0) as i32;
        let xf = x - x0;
        let yf = y - y0;

        let u = fade(xf);
        let v = fade(yf);

        let s = self.seed;
        let aa = perm(perm(xi, s) as i32 + yi, s);
        let ab = perm(perm(xi, s) as i32 + yi + 1, s);
        let ba = perm(perm(xi + 1, s) as i32 + yi, s);
        let bb = perm(perm(xi + 1, s) as i32 + yi + 1, s);

        let x1 = lerp(grad(aa, xf, yf), grad(ba, xf - 1.0, yf), u);
        let x2 = lerp(grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0), u);

        (lerp(x1, x2, v) * AMPLITUDE).clamp(-1.0, 1.0)
    }
}

/// Uniform sample in `[0, 1)` from the top 53 bits of a `u64`.
pub(crate) fn next_unit(rng: &mut WyRand) -> f64 {
    (rng.generate::<u64>() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Standard normal sample (Box-Muller).
pub(crate) fn next_gaussian(rng: &mut WyRand) -> f64 {
    // 1 - u lies in (0, 1], so the log is finite.
    let u1 = 1.0 - next_unit(rng);
    let u2 = next_unit(rng);
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}
