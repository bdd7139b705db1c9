//! Background and glyph providers: directory-backed sprites with random
//! transforms, plus procedural fallbacks so the binary runs with no assets
//! on disk.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use rand::Rng;
use rand::rngs::SmallRng;

use circlefarm::{BackgroundSource, Canvas, FarmError, FarmResult, GlyphSource};

/// Square resize range applied to every background, in pixels per side.
const BACKGROUND_SIDE: std::ops::RangeInclusive<u32> = 500..=900;

/// Diameters the white circle sprites come in.
const SPRITE_SIZES: [u32; 6] = [36, 40, 46, 64, 70, 80];

fn scan_rasters(dir: &Path) -> FarmResult<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("png") | Some("jpg") | Some("jpeg")
            )
        })
        .collect();
    // read_dir order is platform-defined; a fixed order keeps seeded batches
    // reproducible
    files.sort();
    Ok(files)
}

/// Background photos picked from a directory, with a random quarter-turn,
/// independent flips and a random square resize per request.
pub struct DirBackgrounds {
    files: Vec<PathBuf>,
}

impl DirBackgrounds {
    pub fn scan(dir: &Path) -> FarmResult<Self> {
        let files = scan_rasters(dir)?;
        if files.is_empty() {
            return Err(FarmError::asset(format!(
                "no background images in {}",
                dir.display()
            )));
        }
        Ok(Self { files })
    }
}

impl BackgroundSource for DirBackgrounds {
    fn background(&mut self, rng: &mut SmallRng) -> FarmResult<Canvas> {
        let path = &self.files[rng.random_range(0..self.files.len())];
        let mut img = image::open(path)?.to_rgba8();

        match rng.random_range(0..4u8) {
            1 => img = imageops::rotate90(&img),
            2 => img = imageops::rotate180(&img),
            3 => img = imageops::rotate270(&img),
            _ => {}
        }
        if rng.random_bool(0.5) {
            img = imageops::flip_horizontal(&img);
        }
        if rng.random_bool(0.5) {
            img = imageops::flip_vertical(&img);
        }

        let side = rng.random_range(BACKGROUND_SIDE);
        let img = imageops::resize(&img, side, side, FilterType::Triangle);
        Ok(Canvas::from_image(&img))
    }
}

/// Circle sprites picked from a directory. Every sprite must be square; its
/// width is the circle diameter.
pub struct DirGlyphs {
    files: Vec<PathBuf>,
}

impl DirGlyphs {
    pub fn scan(dir: &Path) -> FarmResult<Self> {
        let files = scan_rasters(dir)?;
        if files.is_empty() {
            return Err(FarmError::asset(format!(
                "no circle sprites in {}",
                dir.display()
            )));
        }
        Ok(Self { files })
    }
}

impl GlyphSource for DirGlyphs {
    fn glyph(&mut self, rng: &mut SmallRng) -> FarmResult<Canvas> {
        let path = &self.files[rng.random_range(0..self.files.len())];
        let img = image::open(path)?.to_rgba8();
        if img.width() != img.height() {
            return Err(FarmError::asset(format!(
                "circle sprite '{}' is {}x{}, expected square",
                path.display(),
                img.width(),
                img.height()
            )));
        }
        Ok(Canvas::from_image(&img))
    }
}

/// Procedural stand-in for missing background assets: a tinted square with
/// translucent-looking rectangles scattered over it.
pub struct NoiseBackgrounds;

impl BackgroundSource for NoiseBackgrounds {
    fn background(&mut self, rng: &mut SmallRng) -> FarmResult<Canvas> {
        let side = rng.random_range(BACKGROUND_SIDE);
        let base = [
            rng.random_range(40..=200u8),
            rng.random_range(40..=200u8),
            rng.random_range(40..=200u8),
        ];
        let mut img = image::RgbaImage::from_pixel(
            side,
            side,
            image::Rgba([base[0], base[1], base[2], 255]),
        );

        for _ in 0..rng.random_range(12..=36) {
            let w = rng.random_range(20..=120);
            let h = rng.random_range(20..=120);
            let x = rng.random_range(0..side - w) as i32;
            let y = rng.random_range(0..side - h) as i32;
            let shade: [u8; 3] = std::array::from_fn(|i| {
                (i32::from(base[i]) + rng.random_range(-28..=28)).clamp(0, 255) as u8
            });
            draw_filled_rect_mut(
                &mut img,
                Rect::at(x, y).of_size(w, h),
                image::Rgba([shade[0], shade[1], shade[2], 255]),
            );
        }
        Ok(Canvas::from_image(&img))
    }
}

/// Procedural stand-in for missing circle sprites: a filled white opaque
/// disc on a transparent square, sized like the shipped sprite set.
pub struct DiscGlyphs;

impl GlyphSource for DiscGlyphs {
    fn glyph(&mut self, rng: &mut SmallRng) -> FarmResult<Canvas> {
        let side = SPRITE_SIZES[rng.random_range(0..SPRITE_SIZES.len())];
        let mut img =
            image::RgbaImage::from_pixel(side, side, image::Rgba([0, 0, 0, 0]));
        let center = (side / 2) as i32;
        let radius = (side / 2) as i32 - 1;
        draw_filled_circle_mut(
            &mut img,
            (center, center),
            radius,
            image::Rgba([255, 255, 255, 255]),
        );
        Ok(Canvas::from_image(&img))
    }
}
