//! Inverse-mapping resampler for geometric filters.
//!
//! # Algorithm
//! For every output pixel `(x, y)` the map yields a source coordinate `(u, v)`.
//!
//! Bilinear:
//! ```text
//! sx = floor(u),  sy = floor(v)
//! fx = u − sx,    fy = v − sy
//! out = bilinear(fx, fy, p(sx, sy), p(sx+1, sy), p(sx, sy+1), p(sx+1, sy+1))
//! ```
//! Nearest neighbour truncates `(u, v)` toward zero. Reads outside the source
//! resolve through the context's [`EdgeAction`](super::EdgeAction).

use crate::error::FilterError;
use crate::image::PixelBuffer;
use crate::math::bilinear_interpolate;
use crate::pixel::Pixel;

use super::{EdgeAction, FilterContext, Interpolation, InverseMap};

/// Resample `source` through `map`.
pub fn transform(
    map: &impl InverseMap,
    source: &PixelBuffer,
    ctx: &FilterContext,
) -> Result<PixelBuffer, FilterError> {
    source.validate()?;
    if (ctx.width, ctx.height) != (source.width, source.height) {
        return Err(FilterError::InvalidDimensions {
            width: ctx.width,
            height: ctx.height,
            len: source.pixels.len(),
        });
    }

    let (out_width, out_height) = map.output_size(source.width, source.height);
    tracing::trace!(
        out_width,
        out_height,
        interpolation = ?ctx.interpolation,
        edge_action = ?ctx.edge_action,
        "resampling through inverse map"
    );

    let mut pixels = Vec::with_capacity(out_width as usize * out_height as usize);
    for y in 0..out_height {
        for x in 0..out_width {
            let src = map.transform_inverse(x, y);
            let p = match ctx.interpolation {
                Interpolation::Bilinear => sample_bilinear(ctx, &source.pixels, src.x, src.y),
                Interpolation::NearestNeighbour => sample_nearest(ctx, &source.pixels, src.x, src.y),
            };
            pixels.push(p);
        }
    }
    PixelBuffer::new(out_width, out_height, pixels)
}

/// Bring a far-off source coordinate within one pixel of the buffer.
///
/// Past that distance all four corners resolve to the same edge pixel, so the
/// clamp leaves the sample unchanged and keeps `sx + 1` in range. Wrap reduces
/// modulo the size instead.
fn near_buffer(ctx: &FilterContext, u: f32, v: f32) -> (f32, f32) {
    let (w, h) = (ctx.width as f32, ctx.height as f32);
    match ctx.edge_action {
        EdgeAction::Wrap => (u.rem_euclid(w), v.rem_euclid(h)),
        EdgeAction::Zero | EdgeAction::Clamp | EdgeAction::RgbClamp => {
            (u.clamp(-2.0, w + 1.0), v.clamp(-2.0, h + 1.0))
        }
    }
}

fn sample_bilinear(ctx: &FilterContext, pixels: &[Pixel], u: f32, v: f32) -> Pixel {
    let (u, v) = near_buffer(ctx, u, v);
    let fx = u.floor();
    let fy = v.floor();
    let (sx, sy) = (fx as i32, fy as i32);
    let (x_weight, y_weight) = (u - fx, v - fy);
    let (w, h) = (ctx.width as i32, ctx.height as i32);

    let (nw, ne, sw, se) = if sx >= 0 && sx < w - 1 && sy >= 0 && sy < h - 1 {
        // All four corners are inside.
        let i = (sy * w + sx) as usize;
        let w = w as usize;
        (pixels[i], pixels[i + 1], pixels[i + w], pixels[i + w + 1])
    } else {
        (
            ctx.pixel(pixels, sx, sy),
            ctx.pixel(pixels, sx + 1, sy),
            ctx.pixel(pixels, sx, sy + 1),
            ctx.pixel(pixels, sx + 1, sy + 1),
        )
    };
    bilinear_interpolate(x_weight, y_weight, nw, ne, sw, se)
}

fn sample_nearest(ctx: &FilterContext, pixels: &[Pixel], u: f32, v: f32) -> Pixel {
    let (sx, sy) = (u as i32, v as i32);
    // Truncation maps (-1, 0) to 0, so the sign test uses the float.
    if u < 0.0 || v < 0.0 || sx >= ctx.width as i32 || sy >= ctx.height as i32 {
        return ctx.edge_pixel(pixels, sx, sy);
    }
    pixels[ctx.index(sx, sy)]
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::filter::EdgeAction;

    struct Identity;

    impl InverseMap for Identity {
        fn transform_inverse(&self, x: u32, y: u32) -> Vec2 {
            Vec2::new(x as f32, y as f32)
        }
    }

    struct Shift(Vec2);

    impl InverseMap for Shift {
        fn transform_inverse(&self, x: u32, y: u32) -> Vec2 {
            Vec2::new(x as f32, y as f32) + self.0
        }
    }

    struct Half;

    impl InverseMap for Half {
        fn output_size(&self, width: u32, height: u32) -> (u32, u32) {
            (width / 2, height / 2)
        }

        fn transform_inverse(&self, x: u32, y: u32) -> Vec2 {
            Vec2::new(x as f32 * 2.0, y as f32 * 2.0)
        }
    }

    fn noisy(width: u32, height: u32) -> PixelBuffer {
        let pixels = (0..width * height)
            .map(|i| Pixel(i.wrapping_mul(2_654_435_761)))
            .collect();
        PixelBuffer::new(width, height, pixels).unwrap()
    }

    fn ctx(source: &PixelBuffer, edge: EdgeAction, interpolation: Interpolation) -> FilterContext {
        FilterContext::new(source, edge, interpolation).unwrap()
    }

    #[test]
    fn test_identity_nearest_clamp_reproduces_source() {
        let source = noisy(7, 5);
        let c = ctx(&source, EdgeAction::Clamp, Interpolation::NearestNeighbour);
        assert_eq!(transform(&Identity, &source, &c).unwrap(), source);
    }

    #[test]
    fn test_identity_bilinear_reproduces_source() {
        let source = noisy(6, 4);
        for edge in [EdgeAction::Zero, EdgeAction::Clamp, EdgeAction::Wrap, EdgeAction::RgbClamp] {
            let c = ctx(&source, edge, Interpolation::Bilinear);
            assert_eq!(transform(&Identity, &source, &c).unwrap(), source, "{edge:?}");
        }
    }

    #[test]
    fn test_nearest_negative_fraction_is_off_buffer() {
        let source = PixelBuffer::filled(3, 3, Pixel::rgb(10, 20, 30)).unwrap();
        let c = ctx(&source, EdgeAction::Zero, Interpolation::NearestNeighbour);
        let out = transform(&Shift(Vec2::new(-0.5, 0.0)), &source, &c).unwrap();
        assert_eq!(out.get(0, 0), Some(Pixel::TRANSPARENT));
        assert_eq!(out.get(1, 0), Some(Pixel::rgb(10, 20, 30)));
    }

    #[test]
    fn test_rgb_clamp_drops_alpha_outside() {
        let source = PixelBuffer::filled(2, 2, Pixel::rgb(10, 20, 30)).unwrap();
        let c = ctx(&source, EdgeAction::RgbClamp, Interpolation::NearestNeighbour);
        let out = transform(&Shift(Vec2::new(5.0, 0.0)), &source, &c).unwrap();
        assert!(out.pixels.iter().all(|&p| p == Pixel::from_argb(0, 10, 20, 30)));
    }

    #[test]
    fn test_wrap_shift_rotates_rows() {
        let source = noisy(4, 2);
        let c = ctx(&source, EdgeAction::Wrap, Interpolation::NearestNeighbour);
        let out = transform(&Shift(Vec2::new(1.0, 0.0)), &source, &c).unwrap();
        assert_eq!(out.get(3, 0), source.get(0, 0));
        assert_eq!(out.get(0, 1), source.get(1, 1));
    }

    #[test]
    fn test_bilinear_half_step_averages() {
        let source = PixelBuffer::from_argb(2, 1, &[0xff00_0000, 0xff64_6464]).unwrap();
        let c = ctx(&source, EdgeAction::Clamp, Interpolation::Bilinear);
        let out = transform(&Shift(Vec2::new(0.5, 0.0)), &source, &c).unwrap();
        assert_eq!(out.get(0, 0), Some(Pixel::rgb(50, 50, 50)));
        assert_eq!(out.get(1, 0), Some(Pixel::rgb(100, 100, 100)));
    }

    #[test]
    fn test_far_off_buffer_resolves_by_edge_action() {
        let source = noisy(5, 3);
        let edges = [EdgeAction::Zero, EdgeAction::Clamp, EdgeAction::Wrap, EdgeAction::RgbClamp];
        for offset in [3e9, -3e9, f32::MAX, f32::INFINITY] {
            for edge in edges {
                for interpolation in [Interpolation::Bilinear, Interpolation::NearestNeighbour] {
                    let c = ctx(&source, edge, interpolation);
                    let out = transform(&Shift(Vec2::new(offset, 0.0)), &source, &c).unwrap();
                    assert_eq!((out.width, out.height), (5, 3));
                    for y in 0..3 {
                        let edge_x = if offset > 0.0 { 4 } else { 0 };
                        let expected = match edge {
                            EdgeAction::Zero => Pixel::TRANSPARENT,
                            EdgeAction::Clamp => source.get(edge_x, y).unwrap(),
                            EdgeAction::RgbClamp => source.get(edge_x, y).unwrap().with_alpha(0),
                            EdgeAction::Wrap => continue,
                        };
                        assert_eq!(out.get(2, y), Some(expected), "{offset} {edge:?} {interpolation:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_bilinear_wrap_matches_near_coordinates() {
        let source = noisy(4, 4);
        let c = ctx(&source, EdgeAction::Wrap, Interpolation::Bilinear);
        let near = transform(&Shift(Vec2::new(-0.5, 1.25)), &source, &c).unwrap();
        let far = transform(&Shift(Vec2::new(-0.5 + 4.0 * 64.0, 1.25 - 4.0 * 32.0)), &source, &c).unwrap();
        assert_eq!(near, far);
    }

    #[test]
    fn test_output_size_is_honoured() {
        let source = noisy(8, 6);
        let c = ctx(&source, EdgeAction::Clamp, Interpolation::NearestNeighbour);
        let out = transform(&Half, &source, &c).unwrap();
        assert_eq!((out.width, out.height), (4, 3));
        assert_eq!(out.get(1, 1), source.get(2, 2));
    }
}
