use crate::level::classify::{NodeRole, RefPointKind, REF_POINT_PREFIX};
use crate::level::coordinates::convert_position;
use crate::level::materials::{ref_point_surface, texture_file_name};
use crate::level::rotation::to_engine_euler;
use crate::resource_system::file_formats::levelfile::RefPoint;
use crate::scene_graph::{Node, Scene};
use crate::strip_extension;

/// `REF:FLAG.002` is written as `FLAG`.
pub fn ref_point_name(node_name: &str) -> &str {
    strip_extension(node_name.strip_prefix(REF_POINT_PREFIX).unwrap_or(node_name))
}

/// The texture of the first primitive of the node's mesh, if it has a base colour image.
fn first_texture(scene: &Scene, node: &Node) -> Option<String> {
    let primitive = scene.node_mesh(node)?.primitives.first()?;
    scene
        .base_color_image(primitive)
        .map(|image| texture_file_name(&image.name))
}

pub fn build_ref_point(scene: &Scene, node: &Node, kind: RefPointKind) -> RefPoint {
    let surface = match kind {
        RefPointKind::Colored => {
            let texture = first_texture(scene, node);
            if texture.is_none() {
                log::warn!(
                    "reference point '{}' gets a colour block but has no texture",
                    node.name
                );
            }
            Some(ref_point_surface(texture))
        }
        RefPointKind::Tagged | RefPointKind::Untagged => None,
    };

    RefPoint {
        name: ref_point_name(&node.name).to_string(),
        position: convert_position(node.world_translation()),
        rotation: to_engine_euler(node.local.rotation),
        surface,
    }
}

pub fn build_ref_points(scene: &Scene, roles: &[NodeRole]) -> Vec<RefPoint> {
    scene
        .nodes
        .iter()
        .zip(roles)
        .filter_map(|(node, role)| match role {
            NodeRole::RefPoint(kind) => Some(build_ref_point(scene, node, *kind)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3, Vec4};

    use super::*;
    use crate::level::classify::classify;
    use crate::scene_graph::{Image, Material, Mesh, Primitive, Transform};

    fn flag_scene(texture: Option<&str>) -> Scene {
        let mut scene = Scene::new();
        let image = texture.map(|name| {
            scene.add_image(Image {
                name: name.to_string(),
                bytes: vec![],
            })
        });
        let material = scene.add_material(Material {
            base_color: Vec4::ONE,
            emissive: Vec4::W,
            base_color_texture: image,
        });
        let mut primitive = Primitive::triangles(vec![Vec3::ZERO; 3], vec![Vec3::Y; 3], vec![0, 1, 2]);
        primitive.material = Some(material);
        let mesh = scene.add_mesh(Mesh {
            name: "Flag".to_string(),
            primitives: vec![primitive],
        });
        scene.add_node(
            "REF:FLAG.002",
            None,
            Transform::from_translation(Vec3::new(1.0, 2.0, 3.0)),
            Some(mesh),
        );
        scene
    }

    #[test]
    fn names_lose_tag_and_suffix() {
        assert_eq!(ref_point_name("REF:FLAG.002"), "FLAG");
        assert_eq!(ref_point_name("REF:BUMPER"), "BUMPER");
        assert_eq!(ref_point_name("Start.001"), "Start");
        assert_eq!(ref_point_name("Start"), "Start");
    }

    #[test]
    fn flag_gets_checker_texture_and_colour_block() {
        let scene = flag_scene(Some("BlueChecker"));
        let points = build_ref_points(&scene, &classify(&scene));

        assert_eq!(points.len(), 1);
        let flag = &points[0];
        assert_eq!(flag.name, "FLAG");
        assert_eq!(flag.position, [50.0, 100.0, -150.0]);

        let surface = flag.surface.as_ref().unwrap();
        assert_eq!(surface.texture.as_deref(), Some("BlueChecker.bmp"));
        assert_eq!(surface.ambient, [0.9921, 0.9921, 0.9921, 1.0]);
        assert_eq!(surface.specular, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(surface.power, 10.0);
    }

    #[test]
    fn untextured_flag_still_has_colour_block() {
        let scene = flag_scene(None);
        let points = build_ref_points(&scene, &classify(&scene));
        let surface = points[0].surface.as_ref().unwrap();
        assert!(surface.texture.is_none());
    }

    #[test]
    fn plain_markers_carry_rotation_only() {
        let mut scene = Scene::new();
        let parent = scene.add_node(
            "Group",
            None,
            Transform::from_translation(Vec3::new(0.0, 1.0, 0.0)),
            None,
        );
        let local = Transform {
            translation: Vec3::new(0.0, 0.0, 1.0),
            rotation: Quat::from_rotation_z(30f32.to_radians()),
            scale: Vec3::ONE,
        };
        scene.add_node("REF:START", Some(parent), local, None);

        let points = build_ref_points(&scene, &classify(&scene));
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].name, "Group");

        let start = &points[1];
        assert_eq!(start.name, "START");
        assert_eq!(start.position, [0.0, 50.0, -50.0]);
        assert!((start.rotation.z + 30.0).abs() < 1e-3);
        assert!(start.surface.is_none());
    }
}
