//! Thin file layer: path building plus image/text persistence with parent
//! directory creation on save.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use image::RgbaImage;

/// `<root>/<folder>/<name>.<ext>`.
pub fn local_path(root: &Path, folder: &str, name: &str, ext: &str) -> PathBuf {
    root.join(folder).join(format!("{name}.{ext}"))
}

pub fn save_image(img: &RgbaImage, root: &Path, folder: &str, name: &str) -> Result<PathBuf> {
    let path = local_path(root, folder, name, "png");
    ensure_parent(&path)?;
    img.save(&path)
        .with_context(|| format!("save image '{}'", path.display()))?;
    Ok(path)
}

pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path)
        .with_context(|| format!("load image '{}'", path.display()))?
        .to_rgba8();
    Ok(img)
}

pub fn save_text(text: &str, root: &Path, folder: &str, name: &str, ext: &str) -> Result<PathBuf> {
    let path = local_path(root, folder, name, ext);
    ensure_parent(&path)?;
    fs::write(&path, text).with_context(|| format!("save text '{}'", path.display()))?;
    Ok(path)
}

pub fn load_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("load text '{}'", path.display()))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory '{}'", parent.display()))?;
    }
    Ok(())
}
