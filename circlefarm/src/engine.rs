use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::canvas::Canvas;
use crate::document::AnnotationDocument;
use crate::error::FarmResult;
use crate::label::Label;
use crate::palette::PaletteColor;
use crate::params::GenParams;
use crate::placement::Placement;
use crate::tint;

/// Normalized-alpha cutoff above which a composited glyph pixel belongs to
/// the ground-truth mask.
pub const VISIBILITY_THRESHOLD: f32 = 0.2;

/// Supplies background rasters of arbitrary size. Failures abort the batch.
pub trait BackgroundSource {
    fn background(&mut self, rng: &mut SmallRng) -> FarmResult<Canvas>;
}

/// Supplies square glyph rasters; the width acts as the circle diameter.
/// Failures abort the batch.
pub trait GlyphSource {
    fn glyph(&mut self, rng: &mut SmallRng) -> FarmResult<Canvas>;
}

impl<B: BackgroundSource + ?Sized> BackgroundSource for Box<B> {
    fn background(&mut self, rng: &mut SmallRng) -> FarmResult<Canvas> {
        (**self).background(rng)
    }
}

impl<G: GlyphSource + ?Sized> GlyphSource for Box<G> {
    fn glyph(&mut self, rng: &mut SmallRng) -> FarmResult<Canvas> {
        (**self).glyph(rng)
    }
}

/// One generated dataset item: the rendered canvas plus its ground truth.
/// Image and document always share dimensions and base name.
#[derive(Clone, Debug)]
pub struct Sample {
    pub base_name: String,
    pub image: Canvas,
    pub document: AnnotationDocument,
}

/// Drives canvas, palette and label model to produce one labeled image per
/// requested index.
///
/// All randomness flows through the single generator seeded at construction;
/// reproducing a batch requires the same seed and the same sequential index
/// order. Callers parallelizing across indices must construct one engine per
/// worker, each with its own seed.
pub struct PlacementEngine<B, G> {
    params: GenParams,
    backgrounds: B,
    glyphs: G,
    rng: SmallRng,
}

impl<B: BackgroundSource, G: GlyphSource> PlacementEngine<B, G> {
    /// Validates the parameter bundle up front; an invalid bundle never
    /// starts a batch.
    pub fn new(params: GenParams, backgrounds: B, glyphs: G, seed: u64) -> FarmResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            backgrounds,
            glyphs,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    pub fn params(&self) -> &GenParams {
        &self.params
    }

    /// Render the image and ground-truth document for one batch index.
    pub fn generate(&mut self, series: &str, index: u32) -> FarmResult<Sample> {
        let width = self.params.output_width;
        let height = self.params.output_height;

        let mut image = self.compose_background()?;
        let target =
            self.rng
                .random_range(self.params.target_min..=self.params.target_max) as usize;

        let mut placements: Vec<Placement> = Vec::new();
        let mut attempts = 0u32;
        while attempts < self.params.max_tries && placements.len() < target {
            attempts += 1;

            let color = PaletteColor::pick(&mut self.rng, self.params.num_colors);
            let mut glyph = self.glyphs.glyph(&mut self.rng)?;
            let radius = f64::from(glyph.width()) / 2.0;
            let (center_x, center_y) = self.sample_center(radius);

            let overlaps = placements
                .iter()
                .filter(|p| p.intersects(center_x, center_y, radius))
                .count();
            if overlaps > self.params.max_overlap as usize {
                continue;
            }

            tint::recolor(
                &mut glyph,
                color.rgba(),
                self.params.color_noise,
                &mut self.rng,
            );
            let base_alpha = self
                .rng
                .random_range(self.params.alpha_min..=self.params.alpha_max);
            tint::modulate_alpha(&mut glyph, base_alpha, self.params.alpha_noise, &mut self.rng);

            let left = (f64::from(center_x) - radius).round() as i32;
            let top = (f64::from(center_y) - radius).round() as i32;
            image.stamp_alpha(&glyph, left, top);

            let label = mask_from_glyph(&glyph, color.label(), left, top, width, height);
            placements.push(Placement {
                center_x,
                center_y,
                radius,
                label,
            });
        }

        if placements.len() < target {
            warn!(
                series,
                index,
                accepted = placements.len(),
                target,
                "attempts exhausted below target"
            );
        }
        debug!(
            series,
            index,
            attempts,
            accepted = placements.len(),
            "image composed"
        );

        let base_name = base_name(series, index, self.params.leading_zeros);
        let labels: Vec<Label> = placements.into_iter().map(|p| p.label).collect();
        let document = AnnotationDocument::new(base_name.clone(), width, height, labels);
        Ok(Sample {
            base_name,
            image,
            document,
        })
    }

    /// Allocate the output canvas and stamp a random window of a provider
    /// background into it. Oversized backgrounds are cropped by stamping at
    /// a random negative offset; undersized ones land at the origin and the
    /// rest of the canvas stays transparent.
    fn compose_background(&mut self) -> FarmResult<Canvas> {
        let background = self.backgrounds.background(&mut self.rng)?;
        let mut canvas = Canvas::allocate(self.params.output_width, self.params.output_height)?;

        let span_x = i64::from(background.width()) - i64::from(canvas.width());
        let span_y = i64::from(background.height()) - i64::from(canvas.height());
        let offset_x = if span_x > 0 {
            -self.rng.random_range(0..=span_x)
        } else {
            0
        };
        let offset_y = if span_y > 0 {
            -self.rng.random_range(0..=span_y)
        } else {
            0
        };

        canvas.stamp(&background, offset_x as i32, offset_y as i32);
        Ok(canvas)
    }

    /// Uniform center over `[radius/2, dim - radius/2]` per axis; the
    /// half-radius margin lets circles extend past the edge. Degenerate
    /// intervals (glyph wider than twice the output) collapse to the lower
    /// bound.
    fn sample_center(&mut self, radius: f64) -> (i32, i32) {
        let margin = radius / 2.0;
        let lo_x = margin.round() as i32;
        let hi_x = ((f64::from(self.params.output_width) - margin).round() as i32).max(lo_x);
        let lo_y = margin.round() as i32;
        let hi_y = ((f64::from(self.params.output_height) - margin).round() as i32).max(lo_y);
        (
            self.rng.random_range(lo_x..=hi_x),
            self.rng.random_range(lo_y..=hi_y),
        )
    }
}

/// Collect every glyph pixel whose normalized alpha exceeds the visibility
/// threshold into a label, shifted by the stamp offset and clipped to the
/// canvas bounds.
fn mask_from_glyph(
    glyph: &Canvas,
    name: &str,
    left: i32,
    top: i32,
    width: u32,
    height: u32,
) -> Label {
    let mut label = Label::new(name);
    for gy in 0..glyph.height() {
        for gx in 0..glyph.width() {
            if glyph.get(gx, gy).a_norm() <= VISIBILITY_THRESHOLD {
                continue;
            }
            let x = i64::from(left) + i64::from(gx);
            let y = i64::from(top) + i64::from(gy);
            if x >= 0 && x < i64::from(width) && y >= 0 && y < i64::from(height) {
                label.add(x as i32, y as i32);
            }
        }
    }
    label
}

/// `{series}_{index}` with the index left-padded to `digits`; wider indices
/// are kept intact, never truncated.
pub fn base_name(series: &str, index: u32, digits: usize) -> String {
    format!("{series}_{index:0digits$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rgba::Rgba;

    #[test]
    fn base_name_pads_short_indices() {
        assert_eq!(base_name("proto_cells_train", 4, 5), "proto_cells_train_00004");
        assert_eq!(base_name("s", 0, 3), "s_000");
    }

    #[test]
    fn base_name_never_truncates_wide_indices() {
        assert_eq!(base_name("s", 12345, 3), "s_12345");
        assert_eq!(base_name("s", 7, 0), "s_7");
    }

    #[test]
    fn mask_from_glyph_applies_threshold_and_clipping() {
        let mut glyph = Canvas::allocate(2, 2).unwrap();
        glyph.set(0, 0, Rgba::new(255, 255, 255, 255)); // visible
        glyph.set(1, 0, Rgba::new(255, 255, 255, 51)); // exactly 0.2, excluded
        glyph.set(0, 1, Rgba::new(255, 255, 255, 52)); // just above, included
        glyph.set(1, 1, Rgba::TRANSPARENT);

        let label = mask_from_glyph(&glyph, "Red", -1, 0, 4, 4);
        // (0,0) shifts to (-1,0): clipped away; (0,1) shifts to (-1,1): clipped
        assert!(label.pixels().is_empty());

        let label = mask_from_glyph(&glyph, "Red", 1, 1, 4, 4);
        assert_eq!(label.pixels().len(), 2);
        assert!(label.pixels().contains(1, 1));
        assert!(label.pixels().contains(1, 2));
    }
}
