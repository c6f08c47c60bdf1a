use crate::scene_graph::{NodeId, Scene};

pub const SPLINE_PREFIX: &str = "C:";
pub const LIGHT_PREFIX: &str = "Light";
pub const DIRECTION_PREFIX: &str = "Direction";
pub const REF_POINT_PREFIX: &str = "REF:";
/// Reference point sub-prefixes (after `REF:`) that carry a colour block.
pub const COLORED_REF_POINT_PREFIXES: [&str; 3] = ["FLAG", "BRIDGE", "SMALLFLAG"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefPointKind {
    /// A mesh-less node without the `REF:` prefix, written under its own name.
    Untagged,
    /// `REF:` prefixed, name written without the prefix.
    Tagged,
    /// `REF:FLAG*`, `REF:BRIDGE*`, `REF:SMALLFLAG*`: tagged plus the fixed colour block.
    Colored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    RefPoint(RefPointKind),
    SplinePath,
    Light,
    Direction,
    Renderable,
    Ignored,
}

pub fn classify_node(scene: &Scene, id: NodeId) -> NodeRole {
    let node = &scene.nodes[id];
    let name = node.name.as_str();

    if name.starts_with(SPLINE_PREFIX) {
        return NodeRole::SplinePath;
    }
    if name.starts_with(LIGHT_PREFIX) {
        return NodeRole::Light;
    }
    if name.starts_with(DIRECTION_PREFIX) {
        return NodeRole::Direction;
    }

    let under_spline = scene
        .parent_of(node)
        .is_some_and(|parent| parent.name.starts_with(SPLINE_PREFIX));
    let tag = name.strip_prefix(REF_POINT_PREFIX);
    let mesh = scene.node_mesh(node);

    if !under_spline && (mesh.is_none() || tag.is_some()) {
        let kind = match tag {
            Some(tagged) => {
                if COLORED_REF_POINT_PREFIXES
                    .iter()
                    .any(|prefix| tagged.starts_with(prefix))
                {
                    RefPointKind::Colored
                } else {
                    RefPointKind::Tagged
                }
            }
            None => RefPointKind::Untagged,
        };
        return NodeRole::RefPoint(kind);
    }

    match mesh {
        Some(mesh) if tag.is_none() && !mesh.name.starts_with(SPLINE_PREFIX) => {
            NodeRole::Renderable
        }
        _ => NodeRole::Ignored,
    }
}

/// One role per node, index-aligned with `scene.nodes`.
pub fn classify(scene: &Scene) -> Vec<NodeRole> {
    (0..scene.nodes.len())
        .map(|id| {
            let role = classify_node(scene, id);
            log::debug!("node {} '{}' -> {:?}", id, scene.nodes[id].name, role);
            role
        })
        .collect()
}
