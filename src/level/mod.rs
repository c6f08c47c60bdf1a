//! Scene to level conversion.
//!
//! Every node is classified once, then each pass (reference points, splines, lights, geometry)
//! picks the nodes of its role. The result is a complete in-memory [`Level`], nothing is written
//! until it has been built.

pub mod classify;
pub mod coordinates;
pub mod geometry;
pub mod lights;
pub mod materials;
pub mod ref_points;
pub mod rotation;
pub mod splines;

use crate::config::BakeConfig;
use crate::error::BakeError;
use crate::resource_system::file_formats::levelfile::{Aabb, Level};
use crate::scene_graph::Scene;
use crate::textures;

pub fn build_level(scene: &Scene, config: &BakeConfig) -> Result<Level, BakeError> {
    // texture names are also file names, reject them before any output exists
    for image in textures::referenced_images(scene) {
        textures::check_texture_name(&image.name)?;
    }

    let roles = classify::classify(scene);

    let lights = lights::build_lights(scene, &roles)?;
    let ref_points = ref_points::build_ref_points(scene, &roles);
    let splines = splines::build_splines(scene, &roles);
    let geometry = geometry::flatten(scene, &roles)?;

    log::info!(
        "{} reference point(s), {} spline(s), {} light(s), {} mesh(es), {} vertices",
        ref_points.len(),
        splines.len(),
        lights.len(),
        geometry.meshes.len(),
        geometry.vertices.len()
    );

    Ok(Level {
        ref_points,
        splines,
        lights,
        background: config.background.to_unit(),
        ambient: config.ambient.to_unit(),
        vertices: geometry.vertices,
        aabb: Aabb::UNBOUNDED,
        meshes: geometry.meshes,
    })
}
