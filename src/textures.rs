use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::BakeError;
use crate::scene_graph::{Image, Scene};

pub const TEXTURE_DIR: &str = "textures";

pub fn texture_dir(output: &Path) -> PathBuf {
    output
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(TEXTURE_DIR)
}

/// Removes whatever is at `path` and leaves an empty directory behind.
pub fn ensure_clear_dir(path: &Path) -> std::io::Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)?;
    }
    fs::create_dir_all(path)
}

/// Image names end up as file names inside the texture folder, so they must stay a single
/// plain path component.
pub fn check_texture_name(name: &str) -> Result<(), BakeError> {
    if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        return Err(BakeError::InvalidTextureName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Base colour images used by any mesh that is attached to a node, first one wins per name.
pub fn referenced_images(scene: &Scene) -> Vec<&Image> {
    let mut kept: HashMap<&str, &Image> = HashMap::new();
    let mut images = vec![];

    let primitives = scene
        .nodes
        .iter()
        .filter_map(|node| scene.node_mesh(node))
        .flat_map(|mesh| mesh.primitives.iter());

    for primitive in primitives {
        let Some(image) = scene.base_color_image(primitive) else {
            continue;
        };
        match kept.get(image.name.as_str()).copied() {
            None => {
                kept.insert(&image.name, image);
                images.push(image);
            }
            Some(first) if !std::ptr::eq(first, image) => log::warn!(
                "another image is already called '{}', only the first one is exported",
                image.name
            ),
            Some(_) => {}
        }
    }
    images
}

/// Writes every referenced image as `<name>.png` into a freshly cleared `dir`.
pub fn export_textures(scene: &Scene, dir: &Path) -> Result<usize, BakeError> {
    let images = referenced_images(scene);
    for image in &images {
        check_texture_name(&image.name)?;
    }
    ensure_clear_dir(dir)?;

    for image in &images {
        let path = dir.join(format!("{}.png", image.name));
        log::debug!("writing {} bytes to {}", image.bytes.len(), path.display());
        fs::write(&path, &image.bytes)?;
    }

    log::info!("exported {} texture(s) to {}", images.len(), dir.display());
    Ok(images.len())
}
