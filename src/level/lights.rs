use crate::error::BakeError;
use crate::level::classify::NodeRole;
use crate::level::coordinates::convert_position;
use crate::resource_system::file_formats::levelfile::{Light, LightKind};
use crate::scene_graph::{Node, Scene};

pub const LIGHT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// Pairs the n-th `Light*` node with the n-th `Direction*` node, both ordered by name.
pub fn build_lights(scene: &Scene, roles: &[NodeRole]) -> Result<Vec<Light>, BakeError> {
    let mut nodes: Vec<(&Node, NodeRole)> = scene.nodes.iter().zip(roles.iter().copied()).collect();
    nodes.sort_by(|(a, _), (b, _)| a.name.cmp(&b.name));

    let lights: Vec<&Node> = nodes
        .iter()
        .filter(|(_, role)| *role == NodeRole::Light)
        .map(|(node, _)| *node)
        .collect();
    let directions: Vec<&Node> = nodes
        .iter()
        .filter(|(_, role)| *role == NodeRole::Direction)
        .map(|(node, _)| *node)
        .collect();

    if lights.len() != directions.len() {
        return Err(BakeError::LightDirectionMismatch {
            lights: lights.len(),
            directions: directions.len(),
        });
    }

    Ok(lights
        .into_iter()
        .zip(directions)
        .map(|(light, direction)| {
            log::debug!("light '{}' aims at '{}'", light.name, direction.name);
            Light {
                kind: LightKind::Directional,
                position: convert_position(light.world_translation()),
                direction: convert_position(direction.world_translation()),
                color: LIGHT_COLOR,
            }
        })
        .collect())
}
