//! The two per-pixel noise passes applied to a glyph before compositing.

use rand::Rng;
use rand::rngs::SmallRng;

use crate::canvas::Canvas;
use crate::rgba::{Rgba, norm_to_byte};

/// Repaint every pixel's color channels around `base` with independent
/// uniform noise of total width `color_noise` per channel, in normalized
/// space. Alpha is left untouched.
pub fn recolor(canvas: &mut Canvas, base: Rgba, color_noise: f32, rng: &mut SmallRng) {
    let half = color_noise / 2.0;
    let (base_r, base_g, base_b) = (base.r_norm(), base.g_norm(), base.b_norm());
    for y in 0..canvas.height() {
        for x in 0..canvas.width() {
            let px = canvas.get(x, y);
            let r = base_r + rng.random_range(-half..=half);
            let g = base_g + rng.random_range(-half..=half);
            let b = base_b + rng.random_range(-half..=half);
            canvas.set(
                x,
                y,
                Rgba::new(norm_to_byte(r), norm_to_byte(g), norm_to_byte(b), px.a),
            );
        }
    }
}

/// Scale every pixel's alpha by a per-pixel noisy copy of `factor`
/// (`factor ± alpha_noise/2`, clamped to [0, 1]). Fully transparent pixels
/// stay transparent and consume no noise draw.
pub fn modulate_alpha(canvas: &mut Canvas, factor: f32, alpha_noise: f32, rng: &mut SmallRng) {
    let half = alpha_noise / 2.0;
    for y in 0..canvas.height() {
        for x in 0..canvas.width() {
            let px = canvas.get(x, y);
            if px.a == 0 {
                continue;
            }
            let noisy = (factor + rng.random_range(-half..=half)).clamp(0.0, 1.0);
            let a = norm_to_byte(px.a_norm() * noisy);
            canvas.set(x, y, Rgba::new(px.r, px.g, px.b, a));
        }
    }
}
