use glam::Vec3;

use crate::level::classify::{NodeRole, SPLINE_PREFIX};
use crate::level::coordinates::convert_position;
use crate::resource_system::file_formats::levelfile::Spline;
use crate::scene_graph::{Node, NodeId, Scene};

/// Points from the node's children, ordered by child name.
fn points_from_children(scene: &Scene, id: NodeId) -> Vec<[f32; 3]> {
    let mut children: Vec<&Node> = scene.children_of(id).map(|(_, child)| child).collect();
    children.sort_by(|a, b| a.name.cmp(&b.name));
    children
        .into_iter()
        .map(|child| convert_position(child.world_translation()))
        .collect()
}

/// Points from the raw mesh vertices offset by the node position, highest first.
/// Vertices at the same height keep their buffer order.
fn points_from_mesh(scene: &Scene, node: &Node) -> Option<Vec<[f32; 3]>> {
    let mesh = scene.node_mesh(node)?;
    let origin = node.world_translation();

    let mut vertices: Vec<Vec3> = mesh
        .primitives
        .iter()
        .flat_map(|primitive| primitive.positions.iter())
        .map(|&position| position + origin)
        .collect();
    vertices.sort_by(|a, b| b.y.total_cmp(&a.y));

    Some(vertices.into_iter().map(convert_position).collect())
}

pub fn build_spline(scene: &Scene, id: NodeId) -> Option<Spline> {
    let node = &scene.nodes[id];
    let mut points = points_from_children(scene, id);
    if points.is_empty() {
        match points_from_mesh(scene, node) {
            Some(mesh_points) => points = mesh_points,
            None => {
                log::warn!(
                    "spline '{}' has neither child nodes nor a mesh, skipping it",
                    node.name
                );
                return None;
            }
        }
    }

    Some(Spline {
        name: node
            .name
            .strip_prefix(SPLINE_PREFIX)
            .unwrap_or(&node.name)
            .to_string(),
        points,
    })
}

pub fn build_splines(scene: &Scene, roles: &[NodeRole]) -> Vec<Spline> {
    roles
        .iter()
        .enumerate()
        .filter(|(_, role)| **role == NodeRole::SplinePath)
        .filter_map(|(id, _)| build_spline(scene, id))
        .collect()
}
