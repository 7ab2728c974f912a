//! Knot-based color gradients baked into a 256-entry table.
//!
//! A gradient holds at least four knots. The first and last are sentinel
//! tangent knots pinned at positions -1 and 256; they always copy the color of
//! their neighbour and are never sampled directly. Knots in between stay
//! sorted by position.
//!
//! # Rebuild
//! For every span between knot `i` and `i + 1` (`1 ≤ i ≤ n − 2`), each table
//! index `j` in the span gets
//! ```text
//! t     = blend_i((j − x_i) / (x_{i+1} − x_i))
//! color = interpolate_i(t, color_i, color_{i+1})
//! ```
//! The last real span also covers its end index so entry 255 is filled.

use palette::{FromColor, Hsv, Srgb};
use serde::{Deserialize, Serialize};

use super::{ArrayColormap, Colormap, TABLE_SIZE};
use crate::error::FilterError;
use crate::math::{lerp, mix_colors, modulo_f32, smooth_step};
use crate::pixel::Pixel;

/// Minimum knot count: two sentinels plus two real knots.
pub const MIN_KNOTS: usize = 4;

/// How colors are interpolated across a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorInterpolation {
    /// Straight per-channel mix.
    #[default]
    Rgb,
    /// Mix in HSB space; the end hue is pushed a full turn forward when it is
    /// not already ahead of the start hue.
    HueCw,
    /// Mix in HSB space; the start hue is pushed a full turn forward when it is
    /// not already ahead of the end hue.
    HueCcw,
}

/// Easing applied to the span parameter before color interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnotBlend {
    Linear,
    /// `smooth_step(0.15, 0.85, t)`.
    #[default]
    Spline,
    /// Rising quarter circle, `√(1 − (t − 1)²)`.
    CircleUp,
    /// Falling quarter circle, `1 − √(1 − t²)`.
    CircleDown,
    /// Hold the start color across the span.
    Constant,
}

impl KnotBlend {
    fn apply(self, t: f32) -> f32 {
        match self {
            Self::Constant => 0.0,
            Self::Linear => t,
            Self::Spline => smooth_step(0.15, 0.85, t),
            Self::CircleUp => {
                let t = t - 1.0;
                (1.0 - t * t).sqrt()
            }
            Self::CircleDown => 1.0 - (1.0 - t * t).sqrt(),
        }
    }
}

/// Interpolation behaviour of the span that starts at a knot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KnotKind {
    pub interpolation: ColorInterpolation,
    pub blend: KnotBlend,
}

impl KnotKind {
    pub const fn new(interpolation: ColorInterpolation, blend: KnotBlend) -> Self {
        Self {
            interpolation,
            blend,
        }
    }
}

/// A gradient control point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Knot {
    /// Table position in `[0, 255]` (sentinels sit at -1 and 256).
    pub position: i32,
    pub color: Pixel,
    #[serde(default)]
    pub kind: KnotKind,
}

impl Knot {
    pub const fn new(position: i32, color: Pixel, kind: KnotKind) -> Self {
        Self {
            position,
            color,
            kind,
        }
    }

    /// Spline blend with RGB interpolation.
    pub fn default_kind() -> KnotKind {
        KnotKind::default()
    }
}

/// A colormap defined by knots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gradient {
    knots: Vec<Knot>,
    map: ArrayColormap,
}

impl Gradient {
    /// Black to white with spline blending.
    pub fn new() -> Self {
        let kind = KnotKind::default();
        let mut gradient = Self {
            knots: vec![
                Knot::new(-1, Pixel::BLACK, kind),
                Knot::new(0, Pixel::BLACK, kind),
                Knot::new(255, Pixel::WHITE, kind),
                Knot::new(256, Pixel::WHITE, kind),
            ],
            map: ArrayColormap::new(),
        };
        gradient.rebuild();
        gradient
    }

    /// Build from a full knot list, sentinels included.
    ///
    /// Sentinel positions and colors are overwritten; interior knots are
    /// sorted by position.
    pub fn from_knots(knots: Vec<Knot>) -> Result<Self, FilterError> {
        if knots.len() < MIN_KNOTS {
            return Err(FilterError::invalid(
                "knots",
                format!("a gradient needs at least {MIN_KNOTS} knots, got {}", knots.len()),
            ));
        }
        let last = knots.len() - 1;
        for knot in &knots[1..last] {
            check_position(knot.position)?;
        }
        let mut gradient = Self {
            knots,
            map: ArrayColormap::new(),
        };
        gradient.sort_knots();
        gradient.rebuild();
        Ok(gradient)
    }

    /// All knots, sentinels included.
    pub fn knots(&self) -> &[Knot] {
        &self.knots
    }

    pub fn num_knots(&self) -> usize {
        self.knots.len()
    }

    /// The baked lookup table.
    pub fn colormap(&self) -> &ArrayColormap {
        &self.map
    }

    /// Insert a knot, keep the interior sorted and rebuild the table.
    ///
    /// A knot at the same position as an existing one is placed after it.
    pub fn add_knot(&mut self, position: i32, color: Pixel, kind: KnotKind) -> Result<(), FilterError> {
        check_position(position)?;
        let before_last = self.knots.len() - 1;
        self.knots.insert(before_last, Knot::new(position, color, kind));
        self.sort_knots();
        self.rebuild();
        Ok(())
    }

    /// Remove an interior knot. Fails if that would leave fewer than four.
    pub fn remove_knot(&mut self, index: usize) -> Result<Knot, FilterError> {
        self.check_interior(index)?;
        if self.knots.len() <= MIN_KNOTS {
            return Err(FilterError::invalid(
                "index",
                format!("cannot drop below {MIN_KNOTS} knots"),
            ));
        }
        let knot = self.knots.remove(index);
        self.rebuild();
        Ok(knot)
    }

    pub fn set_knot_color(&mut self, index: usize, color: Pixel) -> Result<(), FilterError> {
        self.check_interior(index)?;
        self.knots[index].color = color;
        self.rebuild();
        Ok(())
    }

    pub fn set_knot_kind(&mut self, index: usize, kind: KnotKind) -> Result<(), FilterError> {
        self.check_interior(index)?;
        self.knots[index].kind = kind;
        self.rebuild();
        Ok(())
    }

    /// Move a knot; the interior is re-sorted, so its index may change.
    pub fn set_knot_position(&mut self, index: usize, position: i32) -> Result<(), FilterError> {
        self.check_interior(index)?;
        check_position(position)?;
        self.knots[index].position = position;
        self.sort_knots();
        self.rebuild();
        Ok(())
    }

    fn check_interior(&self, index: usize) -> Result<(), FilterError> {
        if index == 0 || index >= self.knots.len() - 1 {
            return Err(FilterError::invalid(
                "index",
                format!("{index} is not an interior knot of {}", self.knots.len()),
            ));
        }
        Ok(())
    }

    /// Stable sort of knots `1..n-1` by position.
    fn sort_knots(&mut self) {
        let last = self.knots.len() - 1;
        self.knots[1..last].sort_by_key(|k| k.position);
    }

    fn rebuild(&mut self) {
        let n = self.knots.len();
        self.knots[0].position = -1;
        self.knots[n - 1].position = TABLE_SIZE as i32;
        self.knots[0].color = self.knots[1].color;
        self.knots[n - 1].color = self.knots[n - 2].color;

        let mut table = [Pixel::TRANSPARENT; TABLE_SIZE];
        // Below the first real knot the start sentinel's color holds.
        let head = self.knots[1].position.clamp(0, TABLE_SIZE as i32) as usize;
        table[..head].fill(self.knots[0].color);

        for i in 1..n - 1 {
            let start = self.knots[i];
            let end = self.knots[i + 1];
            let span_length = (end.position - start.position) as f32;
            let stop = if i == n - 2 { end.position + 1 } else { end.position };

            for j in start.position.max(0)..stop.min(TABLE_SIZE as i32) {
                let t = start.kind.blend.apply((j - start.position) as f32 / span_length);
                table[j as usize] = interpolate(start.kind.interpolation, t, start.color, end.color);
            }
        }
        self.map = ArrayColormap::from_table(table);
        tracing::trace!(knots = n, "rebuilt gradient table");
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self::new()
    }
}

impl Colormap for Gradient {
    fn get_color(&self, v: f32) -> Pixel {
        self.map.get_color(v)
    }
}

fn check_position(position: i32) -> Result<(), FilterError> {
    if !(0..TABLE_SIZE as i32).contains(&position) {
        return Err(FilterError::invalid(
            "position",
            format!("{position} is outside [0, 255]"),
        ));
    }
    Ok(())
}

fn interpolate(kind: ColorInterpolation, t: f32, from: Pixel, to: Pixel) -> Pixel {
    match kind {
        ColorInterpolation::Rgb => mix_colors(t, from, to),
        ColorInterpolation::HueCw | ColorInterpolation::HueCcw => {
            let [mut h1, s1, b1] = to_hsb(from);
            let [mut h2, s2, b2] = to_hsb(to);
            // Only one endpoint is moved, so the result is not symmetric
            // under swapping the knots.
            if kind == ColorInterpolation::HueCw {
                if h2 <= h1 {
                    h2 += 1.0;
                }
            } else if h1 <= h2 {
                h1 += 1.0;
            }
            let h = modulo_f32(lerp(t, h1, h2), 1.0);
            let s = lerp(t, s1, s2);
            let b = lerp(t, b1, b2);
            let alpha = mix_colors(t, from, to).alpha();
            from_hsb(h, s, b, alpha)
        }
    }
}

/// Hue in turns `[0, 1)`, saturation and brightness in `[0, 1]`.
fn to_hsb(p: Pixel) -> [f32; 3] {
    let rgb = Srgb::new(p.red(), p.green(), p.blue()).into_format::<f32>();
    let hsv: Hsv = Hsv::from_color(rgb);
    [
        hsv.hue.into_positive_degrees() / 360.0,
        hsv.saturation,
        hsv.value,
    ]
}

fn from_hsb(hue: f32, saturation: f32, brightness: f32, alpha: u8) -> Pixel {
    let hsv: Hsv = Hsv::new(hue * 360.0, saturation, brightness);
    let rgb: Srgb = Srgb::from_color(hsv);
    let rgb = rgb.into_format::<u8>();
    Pixel::from_argb(alpha, rgb.red, rgb.green, rgb.blue)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear(interpolation: ColorInterpolation) -> KnotKind {
        KnotKind::new(interpolation, KnotBlend::Linear)
    }

    fn two_knot(from: Pixel, to: Pixel, kind: KnotKind) -> Gradient {
        Gradient::from_knots(vec![
            Knot::new(-1, from, kind),
            Knot::new(0, from, kind),
            Knot::new(255, to, kind),
            Knot::new(256, to, kind),
        ])
        .unwrap()
    }

    #[test]
    fn test_default_gradient_black_to_white() {
        let g = Gradient::new();
        assert_eq!(g.get_color(0.0), Pixel::BLACK);
        assert_eq!(g.get_color(1.0), Pixel::WHITE);
        let mid = g.get_color(0.5);
        assert!((mid.red() as i32 - 128).abs() <= 2, "mid = {mid:?}");
        assert_eq!(mid.red(), mid.green());
        assert_eq!(mid.green(), mid.blue());
        assert_eq!(mid.alpha(), 255);
    }

    #[test]
    fn test_every_table_entry_is_filled() {
        let g = Gradient::new();
        assert!(g.colormap().table().iter().all(|p| p.alpha() == 255));
    }

    #[test]
    fn test_add_knot_roundtrip_spline_and_linear() {
        let red = Pixel::rgb(255, 0, 0);
        let green = Pixel::rgb(0, 255, 0);
        let mut g = Gradient::new();
        g.add_knot(100, red, KnotKind::default()).unwrap();
        g.add_knot(180, green, linear(ColorInterpolation::Rgb)).unwrap();
        assert_eq!(g.get_color(100.0 / 255.0), red);
        assert_eq!(g.get_color(180.0 / 255.0), green);
    }

    #[test]
    fn test_add_knot_keeps_interior_sorted() {
        let mut g = Gradient::new();
        g.add_knot(200, Pixel::rgb(1, 1, 1), KnotKind::default()).unwrap();
        g.add_knot(50, Pixel::rgb(2, 2, 2), KnotKind::default()).unwrap();
        g.add_knot(120, Pixel::rgb(3, 3, 3), KnotKind::default()).unwrap();
        let positions: Vec<i32> = g.knots().iter().map(|k| k.position).collect();
        assert_eq!(positions, vec![-1, 0, 50, 120, 200, 255, 256]);
    }

    #[test]
    fn test_tied_positions_keep_insertion_order() {
        let first = Pixel::rgb(10, 0, 0);
        let second = Pixel::rgb(20, 0, 0);
        let mut g = Gradient::new();
        g.add_knot(90, first, KnotKind::default()).unwrap();
        g.add_knot(90, second, KnotKind::default()).unwrap();
        assert_eq!(g.knots()[2].color, first);
        assert_eq!(g.knots()[3].color, second);
        // The zero-length span is skipped; index 90 starts the second knot's span.
        assert_eq!(g.get_color(90.0 / 255.0), second);
    }

    #[test]
    fn test_sentinels_copy_neighbours() {
        let mut g = Gradient::new();
        g.set_knot_color(1, Pixel::rgb(9, 9, 9)).unwrap();
        assert_eq!(g.knots()[0].color, Pixel::rgb(9, 9, 9));
        assert_eq!(g.knots()[0].position, -1);
        assert_eq!(g.knots()[3].position, 256);
    }

    #[test]
    fn test_knot_position_out_of_range_is_rejected() {
        let mut g = Gradient::new();
        assert!(matches!(
            g.add_knot(256, Pixel::WHITE, KnotKind::default()),
            Err(FilterError::InvalidParameter { name: "position", .. })
        ));
        assert!(g.add_knot(-1, Pixel::WHITE, KnotKind::default()).is_err());
        assert_eq!(g.num_knots(), 4);
    }

    #[test]
    fn test_from_knots_requires_four() {
        let knots = vec![Knot::new(0, Pixel::BLACK, KnotKind::default()); 3];
        assert!(matches!(
            Gradient::from_knots(knots),
            Err(FilterError::InvalidParameter { name: "knots", .. })
        ));
    }

    #[test]
    fn test_remove_knot_keeps_minimum() {
        let mut g = Gradient::new();
        assert!(g.remove_knot(1).is_err());
        g.add_knot(64, Pixel::rgb(255, 0, 0), KnotKind::default()).unwrap();
        let removed = g.remove_knot(2).unwrap();
        assert_eq!(removed.position, 64);
        assert_eq!(g, Gradient::new());
    }

    #[test]
    fn test_sentinel_edits_are_rejected() {
        let mut g = Gradient::new();
        assert!(g.set_knot_color(0, Pixel::WHITE).is_err());
        assert!(g.set_knot_position(3, 10).is_err());
    }

    #[test]
    fn test_set_knot_position_resorts() {
        let mut g = Gradient::new();
        g.add_knot(100, Pixel::rgb(255, 0, 0), KnotKind::default()).unwrap();
        g.set_knot_position(2, 10).unwrap();
        assert_eq!(g.knots()[2].position, 10);
        g.set_knot_position(1, 20).unwrap();
        let positions: Vec<i32> = g.knots().iter().map(|k| k.position).collect();
        assert_eq!(positions, vec![-1, 10, 20, 255, 256]);
        assert_eq!(g.get_color(0.0), Pixel::rgb(255, 0, 0));
    }

    #[test]
    fn test_constant_blend_holds_start_color() {
        let g = two_knot(
            Pixel::rgb(40, 50, 60),
            Pixel::WHITE,
            KnotKind::new(ColorInterpolation::Rgb, KnotBlend::Constant),
        );
        assert_eq!(g.get_color(0.7), Pixel::rgb(40, 50, 60));
        assert_eq!(g.get_color(1.0), Pixel::WHITE);
    }

    #[test]
    fn test_circle_blends_bend_opposite_ways() {
        let up = two_knot(
            Pixel::BLACK,
            Pixel::WHITE,
            KnotKind::new(ColorInterpolation::Rgb, KnotBlend::CircleUp),
        );
        let down = two_knot(
            Pixel::BLACK,
            Pixel::WHITE,
            KnotKind::new(ColorInterpolation::Rgb, KnotBlend::CircleDown),
        );
        assert!(up.get_color(0.25).red() > 128);
        assert!(down.get_color(0.25).red() < 20);
    }

    #[test]
    fn test_hue_cw_passes_through_green() {
        let g = two_knot(
            Pixel::rgb(255, 0, 0),
            Pixel::rgb(0, 0, 255),
            linear(ColorInterpolation::HueCw),
        );
        let mid = g.get_color(127.0 / 255.0);
        assert_eq!(mid.green(), 255, "mid = {mid:?}");
        assert!(mid.red() < 10 && mid.blue() < 10, "mid = {mid:?}");
    }

    #[test]
    fn test_hue_ccw_passes_through_magenta() {
        let g = two_knot(
            Pixel::rgb(255, 0, 0),
            Pixel::rgb(0, 0, 255),
            linear(ColorInterpolation::HueCcw),
        );
        let mid = g.get_color(127.0 / 255.0);
        assert_eq!(mid.red(), 255, "mid = {mid:?}");
        assert!(mid.blue() > 245 && mid.green() < 10, "mid = {mid:?}");
    }

    #[test]
    fn test_hue_interpolation_hits_knot_colors() {
        let g = two_knot(
            Pixel::rgb(255, 0, 0),
            Pixel::rgb(0, 0, 255),
            linear(ColorInterpolation::HueCw),
        );
        assert_eq!(g.get_color(0.0), Pixel::rgb(255, 0, 0));
        assert_eq!(g.get_color(1.0), Pixel::rgb(0, 0, 255));
    }

    #[test]
    fn test_knot_json_defaults_kind() {
        let knot: Knot = serde_json::from_str(r#"{"position": 12, "color": 4294901760}"#).unwrap();
        assert_eq!(knot.position, 12);
        assert_eq!(knot.color, Pixel::rgb(255, 0, 0));
        assert_eq!(knot.kind, KnotKind::default());
    }
}
