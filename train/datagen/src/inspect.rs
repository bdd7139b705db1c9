//! Visual spot check for generated samples: rebuild the annotation masks on
//! top of the rendered image.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use circlefarm::AnnotationDocument;

use crate::files;

/// Load one sample's image and annotations, paint every annotated pixel
/// black on a copy of the image (keeping its alpha) and white on a black
/// mask image, and save both next to the sample.
pub fn inspect(root: &Path, folder: &str, base_name: &str) -> Result<()> {
    let image_path = files::local_path(root, folder, base_name, "png");
    let image = files::load_image(&image_path)?;

    let annotation_path =
        files::local_path(root, folder, &format!("{base_name}_annotations"), "json");
    let document = AnnotationDocument::from_json(&files::load_text(&annotation_path)?)?;

    let (width, height) = image.dimensions();
    let mut overlay = image.clone();
    let mut mask = image::RgbaImage::from_pixel(width, height, image::Rgba([0, 0, 0, 255]));

    for label in document.labels() {
        for (x, y) in label.pixels().iter() {
            if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
                continue;
            }
            let (x, y) = (x as u32, y as u32);
            let alpha = overlay.get_pixel(x, y).0[3];
            overlay.put_pixel(x, y, image::Rgba([0, 0, 0, alpha]));
            mask.put_pixel(x, y, image::Rgba([255, 255, 255, 255]));
        }
    }

    let overlay_path = files::save_image(&overlay, root, folder, &format!("{base_name}_overlay"))?;
    let mask_path = files::save_image(&mask, root, folder, &format!("{base_name}_mask"))?;
    info!(
        overlay = %overlay_path.display(),
        mask = %mask_path.display(),
        "wrote inspection images"
    );
    Ok(())
}
