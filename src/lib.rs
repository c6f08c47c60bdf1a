use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::config::BakeConfig;
use crate::error::BakeError;
use crate::resource_system::file_formats::levelfile::Level;
use crate::scene_graph::Scene;

pub mod config;
pub mod error;
pub mod gltf_utils;
pub mod level;
pub mod resource_system;
pub mod scene_graph;
pub mod textures;

/// Everything after the last `.`, included, is dropped: `Floor.001` becomes `Floor`.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) => &name[..dot],
        None => name,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BakeSummary {
    pub ref_points: usize,
    pub splines: usize,
    pub lights: usize,
    pub meshes: usize,
    pub vertices: usize,
    pub textures: usize,
}

impl BakeSummary {
    fn new(level: &Level) -> Self {
        Self {
            ref_points: level.ref_points.len(),
            splines: level.splines.len(),
            lights: level.lights.len(),
            meshes: level.meshes.len(),
            vertices: level.vertices.len(),
            textures: 0,
        }
    }
}

/// Serialises into a temporary file next to `output` and renames it into place once complete.
pub fn write_level_atomically(level: &Level, output: &Path) -> Result<(), BakeError> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut wtr = BufWriter::new(tmp.as_file_mut());
        level.write(&mut wtr)?;
        wtr.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(output).map_err(|e| e.error)?;
    Ok(())
}

pub fn bake_scene(
    scene: &Scene,
    output: &Path,
    config: &BakeConfig,
) -> Result<BakeSummary, BakeError> {
    let level = level::build_level(scene, config)?;
    write_level_atomically(&level, output)?;
    log::info!("wrote {}", output.display());

    let mut summary = BakeSummary::new(&level);
    if config.export_textures {
        summary.textures = textures::export_textures(scene, &textures::texture_dir(output))?;
    }
    Ok(summary)
}

pub fn bake_file(
    input: &Path,
    output: &Path,
    config: &BakeConfig,
) -> Result<BakeSummary, BakeError> {
    log::info!("loading {}", input.display());
    let scene = gltf_utils::load_scene(input)?;
    bake_scene(&scene, output, config)
}
