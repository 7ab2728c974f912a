//! Stateless numeric helpers shared by every filter.
//!
//! Color helpers operate on packed [`Pixel`]s and treat alpha exactly like
//! the color channels.

use std::f32::consts::PI;

use crate::pixel::Pixel;

/// Two pi, one full turn in radians.
pub const TWO_PI: f32 = 2.0 * PI;

/// Clamp `x` to `[lo, hi]`.
#[inline]
pub fn clamp(x: f32, lo: f32, hi: f32) -> f32 {
    if x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}

/// Clamp `x` to `[lo, hi]`.
#[inline]
pub fn clamp_i32(x: i32, lo: i32, hi: i32) -> i32 {
    if x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}

/// Clamp a channel value to `[0, 255]`.
#[inline]
pub fn clamp_channel(c: i32) -> u8 {
    clamp_i32(c, 0, 255) as u8
}

/// `a mod b` with the sign of `b`: the result lies in `[0, b)` for positive `b`,
/// including when `a` is negative.
#[inline]
pub fn modulo(a: i32, b: i32) -> i32 {
    let r = a % b;
    if r < 0 { r + b } else { r }
}

/// Floating-point [`modulo`].
#[inline]
pub fn modulo_f32(a: f32, b: f32) -> f32 {
    let r = a - (a / b).trunc() * b;
    // `r + b` can round up to exactly `b` for tiny negative remainders.
    if r < 0.0 { (r + b) % b } else { r }
}

/// Cubic Hermite step between thresholds `a` and `b`.
///
/// ```text
/// x < a   → 0
/// x ≥ b   → 1
/// else    → t²(3 − 2t),  t = (x − a)/(b − a)
/// ```
#[inline]
pub fn smooth_step(a: f32, b: f32, x: f32) -> f32 {
    if x < a {
        return 0.0;
    }
    if x >= b {
        return 1.0;
    }
    let t = (x - a) / (b - a);
    t * t * (3.0 - 2.0 * t)
}

/// Linear interpolation `a + t(b − a)`.
#[inline]
pub fn lerp(t: f32, a: f32, b: f32) -> f32 {
    a + t * (b - a)
}

#[inline]
fn lerp_channel(t: f32, a: u8, b: u8) -> u8 {
    let (a, b) = (a as f32, b as f32);
    clamp_channel((a + t * (b - a)) as i32)
}

/// Per-channel linear mix of two pixels. `t = 0` gives `p1`, `t = 1` gives `p2`.
///
/// Channel results truncate toward zero.
pub fn mix_colors(t: f32, p1: Pixel, p2: Pixel) -> Pixel {
    Pixel::from_argb(
        lerp_channel(t, p1.alpha(), p2.alpha()),
        lerp_channel(t, p1.red(), p2.red()),
        lerp_channel(t, p1.green(), p2.green()),
        lerp_channel(t, p1.blue(), p2.blue()),
    )
}

/// Per-channel bilinear blend of four corner pixels.
///
/// `x` weights west→east, `y` weights north→south, both in `[0, 1]`.
pub fn bilinear_interpolate(x: f32, y: f32, nw: Pixel, ne: Pixel, sw: Pixel, se: Pixel) -> Pixel {
    let cx = 1.0 - x;
    let cy = 1.0 - y;
    let (nw, ne, sw, se) = (nw.channels(), ne.channels(), sw.channels(), se.channels());

    let mut out = [0u8; 4];
    for c in 0..4 {
        let m0 = cx * nw[c] as f32 + x * ne[c] as f32;
        let m1 = cx * sw[c] as f32 + x * se[c] as f32;
        out[c] = clamp_channel((cy * m0 + y * m1) as i32);
    }
    Pixel::from_argb(out[0], out[1], out[2], out[3])
}

/// Scale the color channels by `alpha / 255`, rounding to nearest.
#[inline]
pub fn premultiply(p: Pixel) -> Pixel {
    let a = p.alpha();
    let f = a as f32 * (1.0 / 255.0);
    Pixel::from_argb(
        a,
        (p.red() as f32 * f + 0.5) as u8,
        (p.green() as f32 * f + 0.5) as u8,
        (p.blue() as f32 * f + 0.5) as u8,
    )
}

/// Undo [`premultiply`]. Pixels with alpha 0 or 255 are returned unchanged;
/// scaled channels saturate at 255.
#[inline]
pub fn unpremultiply(p: Pixel) -> Pixel {
    let a = p.alpha();
    if a == 0 || a == 255 {
        return p;
    }
    let f = 255.0 / a as f32;
    Pixel::from_argb(
        a,
        clamp_channel((p.red() as f32 * f + 0.5) as i32),
        clamp_channel((p.green() as f32 * f + 0.5) as i32),
        clamp_channel((p.blue() as f32 * f + 0.5) as i32),
    )
}

/// [`premultiply`] every pixel in place.
pub fn premultiply_slice(pixels: &mut [Pixel]) {
    for p in pixels {
        *p = premultiply(*p);
    }
}

/// [`unpremultiply`] every pixel in place.
pub fn unpremultiply_slice(pixels: &mut [Pixel]) {
    for p in pixels {
        *p = unpremultiply(*p);
    }
}
