use image::RgbaImage;

use crate::error::{FarmError, FarmResult};
use crate::rgba::Rgba;

/// Owned RGBA pixel grid. Storage is one flat row-major buffer
/// (`index = y * width + x`) behind the accessors.
///
/// All four stamp operators are total over any integer offset: source pixels
/// whose destination falls outside the canvas are silently skipped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Canvas {
    /// Fresh transparent-black grid of the given size.
    pub fn allocate(width: u32, height: u32) -> FarmResult<Self> {
        if width == 0 || height == 0 {
            return Err(FarmError::validation(format!(
                "canvas size {width}x{height} must be positive"
            )));
        }
        Ok(Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width as usize * height as usize],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Rgba {
        assert!(x < self.width && y < self.height);
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, px: Rgba) {
        assert!(x < self.width && y < self.height);
        self.pixels[y as usize * self.width as usize + x as usize] = px;
    }

    /// Replace mode: source pixels overwrite color and alpha unconditionally.
    pub fn stamp(&mut self, source: &Canvas, x: i32, y: i32) {
        self.blend(source, x, y, |_, s| s);
    }

    /// Source-over blend in normalized space.
    pub fn stamp_alpha(&mut self, source: &Canvas, x: i32, y: i32) {
        self.blend(source, x, y, |d, s| {
            let sa = s.a_norm();
            Rgba::from_norm(
                s.r_norm() * sa + d.r_norm() * (1.0 - sa),
                s.g_norm() * sa + d.g_norm() * (1.0 - sa),
                s.b_norm() * sa + d.b_norm() * (1.0 - sa),
                sa + d.a_norm() * (1.0 - sa),
            )
        });
    }

    /// Source-over for sources whose color channels already carry their
    /// alpha; skips the extra multiply on the color side.
    pub fn stamp_premultiplied(&mut self, source: &Canvas, x: i32, y: i32) {
        self.blend(source, x, y, |d, s| {
            let sa = s.a_norm();
            Rgba::from_norm(
                s.r_norm() + d.r_norm() * (1.0 - sa),
                s.g_norm() + d.g_norm() * (1.0 - sa),
                s.b_norm() + d.b_norm() * (1.0 - sa),
                sa + d.a_norm() * (1.0 - sa),
            )
        });
    }

    /// Additive: color channels accumulate scaled by source alpha, alpha
    /// accumulates by saturating addition. Everything clamps to [0, 1].
    pub fn stamp_additive(&mut self, source: &Canvas, x: i32, y: i32) {
        self.blend(source, x, y, |d, s| {
            let sa = s.a_norm();
            Rgba::from_norm(
                d.r_norm() + s.r_norm() * sa,
                d.g_norm() + s.g_norm() * sa,
                d.b_norm() + s.b_norm() * sa,
                d.a_norm() + sa,
            )
        });
    }

    fn blend(&mut self, source: &Canvas, x: i32, y: i32, op: impl Fn(Rgba, Rgba) -> Rgba) {
        for sy in 0..source.height {
            let dy = i64::from(y) + i64::from(sy);
            if dy < 0 || dy >= i64::from(self.height) {
                continue;
            }
            for sx in 0..source.width {
                let dx = i64::from(x) + i64::from(sx);
                if dx < 0 || dx >= i64::from(self.width) {
                    continue;
                }
                let (dx, dy) = (dx as u32, dy as u32);
                let out = op(self.get(dx, dy), source.get(sx, sy));
                self.set(dx, dy, out);
            }
        }
    }

    /// Import from a raster image, exact per-pixel.
    pub fn from_image(img: &RgbaImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            pixels: img.pixels().map(|p| Rgba::from(*p)).collect(),
        }
    }

    /// Export to a raster image, exact per-pixel.
    pub fn to_image(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                img.put_pixel(x, y, self.get(x, y).into());
            }
        }
        img
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, px: Rgba) -> Canvas {
        let mut c = Canvas::allocate(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                c.set(x, y, px);
            }
        }
        c
    }

    const RED: Rgba = Rgba {
        r: 255,
        g: 0,
        b: 0,
        a: 255,
    };

    #[test]
    fn allocate_fills_transparent_black() {
        let c = Canvas::allocate(3, 2).unwrap();
        assert_eq!(c.width(), 3);
        assert_eq!(c.height(), 2);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(c.get(x, y), Rgba::TRANSPARENT);
            }
        }
    }

    #[test]
    fn allocate_rejects_zero_dimensions() {
        assert!(Canvas::allocate(0, 4).is_err());
        assert!(Canvas::allocate(4, 0).is_err());
    }

    #[test]
    fn stamp_clips_negative_offset_to_bottom_right_quadrant() {
        let mut canvas = Canvas::allocate(4, 4).unwrap();
        let glyph = solid(4, 4, RED);
        canvas.stamp(&glyph, -2, -2);
        for y in 0..4 {
            for x in 0..4 {
                let expected = if x < 2 && y < 2 { RED } else { Rgba::TRANSPARENT };
                assert_eq!(canvas.get(x, y), expected, "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn stamps_are_total_at_extreme_offsets() {
        let mut canvas = Canvas::allocate(4, 4).unwrap();
        let glyph = solid(4, 4, RED);
        let before = canvas.clone();
        for (x, y) in [
            (i32::MAX, i32::MAX),
            (i32::MIN, i32::MIN),
            (1000, -1000),
            (-4, 0),
            (0, 4),
        ] {
            canvas.stamp(&glyph, x, y);
            canvas.stamp_alpha(&glyph, x, y);
            canvas.stamp_premultiplied(&glyph, x, y);
            canvas.stamp_additive(&glyph, x, y);
        }
        assert_eq!(canvas, before);
    }

    #[test]
    fn stamp_alpha_with_opaque_source_replaces() {
        let mut canvas = solid(1, 1, Rgba::new(0, 0, 255, 255));
        canvas.stamp_alpha(&solid(1, 1, RED), 0, 0);
        assert_eq!(canvas.get(0, 0), RED);
    }

    #[test]
    fn stamp_alpha_with_transparent_source_is_noop() {
        let mut canvas = solid(1, 1, Rgba::new(0, 0, 255, 255));
        canvas.stamp_alpha(&solid(1, 1, Rgba::TRANSPARENT), 0, 0);
        assert_eq!(canvas.get(0, 0), Rgba::new(0, 0, 255, 255));
    }

    #[test]
    fn stamp_alpha_half_alpha_lerps() {
        let mut canvas = solid(1, 1, Rgba::new(0, 0, 255, 255));
        canvas.stamp_alpha(&solid(1, 1, Rgba::from_norm(1.0, 0.0, 0.0, 0.5)), 0, 0);
        let out = canvas.get(0, 0);
        // src alpha 128/255, so the lerp sits just past the midpoint
        assert!(out.r >= 127 && out.r <= 129, "r = {}", out.r);
        assert!(out.b >= 126 && out.b <= 128, "b = {}", out.b);
        assert_eq!(out.a, 255);
    }

    #[test]
    fn stamp_premultiplied_adds_source_color_directly() {
        let mut canvas = solid(1, 1, Rgba::new(0, 0, 255, 255));
        // premultiplied half-red over opaque blue
        canvas.stamp_premultiplied(&solid(1, 1, Rgba::from_norm(0.5, 0.0, 0.0, 0.5)), 0, 0);
        let out = canvas.get(0, 0);
        assert!(out.r >= 127 && out.r <= 129, "r = {}", out.r);
        assert!(out.b >= 126 && out.b <= 128, "b = {}", out.b);
        assert_eq!(out.a, 255);
    }

    #[test]
    fn stamp_additive_saturates() {
        let mut canvas = solid(1, 1, Rgba::new(0, 255, 0, 255));
        canvas.stamp_additive(&solid(1, 1, RED), 0, 0);
        assert_eq!(canvas.get(0, 0), Rgba::new(255, 255, 0, 255));
    }

    #[test]
    fn stamp_additive_accumulates_alpha() {
        let mut canvas = Canvas::allocate(1, 1).unwrap();
        let src = solid(1, 1, Rgba::from_norm(0.2, 0.0, 0.0, 0.4));
        canvas.stamp_additive(&src, 0, 0);
        canvas.stamp_additive(&src, 0, 0);
        canvas.stamp_additive(&src, 0, 0);
        let out = canvas.get(0, 0);
        assert_eq!(out.a, 255, "three 0.4 alphas saturate");
    }

    #[test]
    fn image_round_trip_is_exact() {
        let mut canvas = Canvas::allocate(3, 2).unwrap();
        canvas.set(0, 0, Rgba::new(1, 2, 3, 4));
        canvas.set(2, 1, Rgba::new(250, 251, 252, 253));
        let back = Canvas::from_image(&canvas.to_image());
        assert_eq!(back, canvas);
    }
}
