use glam::{Vec2, Vec3, Vec4};

use crate::error::{BakeError, MalformedReason};
use crate::level::classify::NodeRole;
use crate::level::coordinates::{convert_normal, convert_position, convert_tex_coords};
use crate::level::materials::{resolve_surface, texture_file_name, GeomMaterial};
use crate::resource_system::file_formats::levelfile::{Aabb, Geom, Mesh, Strip, Vertex};
use crate::scene_graph::{Node, Primitive, Scene, Topology};
use crate::strip_extension;

/// Untextured geoms sample this corner of whatever the engine binds.
const UNTEXTURED_TEX_COORDS: Vec2 = Vec2::ONE;

#[derive(Debug, Default)]
pub struct FlattenedGeometry {
    pub vertices: Vec<Vertex>,
    pub meshes: Vec<Mesh>,
}

/// Checks everything the flattener indexes into and returns the triangle list.
pub fn triangles(primitive: &Primitive, textured: bool) -> Result<Vec<[u32; 3]>, MalformedReason> {
    if primitive.topology != Topology::Triangles {
        return Err(MalformedReason::NotTriangles(format!(
            "{:?}",
            primitive.topology
        )));
    }

    let vertex_count = primitive.positions.len();
    if vertex_count < 3 {
        return Err(MalformedReason::TooFewPositions(vertex_count));
    }

    match &primitive.normals {
        None => return Err(MalformedReason::MissingNormals),
        Some(normals) if normals.len() != vertex_count => {
            return Err(MalformedReason::NormalCountMismatch {
                positions: vertex_count,
                normals: normals.len(),
            })
        }
        Some(_) => {}
    }

    if textured {
        match &primitive.tex_coords {
            None => return Err(MalformedReason::MissingTexCoords),
            Some(tex_coords) if tex_coords.len() != vertex_count => {
                return Err(MalformedReason::TexCoordCountMismatch {
                    positions: vertex_count,
                    tex_coords: tex_coords.len(),
                })
            }
            Some(_) => {}
        }
    }

    let indices: Vec<u32> = match &primitive.indices {
        Some(indices) => indices.clone(),
        None => (0..vertex_count as u32).collect(),
    };
    if indices.len() % 3 != 0 {
        return Err(MalformedReason::IndexCountNotTriangular(indices.len()));
    }
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(MalformedReason::IndexOutOfRange {
            index,
            vertex_count,
        });
    }

    Ok(indices
        .chunks_exact(3)
        .map(|tri| [tri[0], tri[1], tri[2]])
        .collect())
}

fn geom_material(scene: &Scene, primitive: &Primitive) -> GeomMaterial {
    let material = scene.material(primitive);
    GeomMaterial {
        diffuse: material.base_color,
        specular: Vec4::ZERO,
        emissive: material.emissive,
        texture: scene
            .base_color_image(primitive)
            .map(|image| texture_file_name(&image.name)),
    }
}

fn flatten_primitive(
    scene: &Scene,
    node: &Node,
    primitive_index: usize,
    primitive: &Primitive,
    vertices: &mut Vec<Vertex>,
) -> Result<Geom, BakeError> {
    let material = geom_material(scene, primitive);
    let textured = material.texture.is_some();
    let triangles = triangles(primitive, textured).map_err(|reason| {
        BakeError::MalformedPrimitive {
            node: node.name.clone(),
            primitive: primitive_index,
            reason,
        }
    })?;

    // validated above
    let normals = primitive.normals.as_deref().unwrap_or_default();
    let tex_coords = primitive
        .tex_coords
        .as_deref()
        .filter(|_| textured);

    let mut strips = Vec::with_capacity(triangles.len());
    for [a, b, c] in triangles {
        let vertex_offset = i32::try_from(vertices.len()).map_err(|_| BakeError::CountOverflow {
            what: "vertex",
            count: vertices.len(),
        })?;
        strips.push(Strip {
            triangle_count: 1,
            vertex_offset,
        });

        for index in [c, b, a] {
            let index = index as usize;
            let position: Vec3 = node.world.transform_point3(primitive.positions[index]);
            let uv = tex_coords
                .map(|uvs| uvs[index])
                .unwrap_or(UNTEXTURED_TEX_COORDS);
            vertices.push(Vertex {
                position: convert_position(position),
                normal: convert_normal(normals[index]),
                tex_coords: convert_tex_coords(uv),
            });
        }
    }

    let surface = resolve_surface(&node.name, &material);
    log::debug!(
        "geom '{}' #{}: {} strip(s), texture {:?}, diffuse {:?}",
        node.name,
        primitive_index,
        strips.len(),
        surface.texture,
        surface.diffuse
    );

    Ok(Geom {
        name: strip_extension(&node.name).to_string(),
        surface,
        strips,
    })
}

/// Bakes every renderable node into one vertex pool, one mesh per node and one geom per
/// primitive. Vertices go node by node, primitive by primitive, three per triangle in C, B, A
/// order.
pub fn flatten(scene: &Scene, roles: &[NodeRole]) -> Result<FlattenedGeometry, BakeError> {
    let mut geometry = FlattenedGeometry::default();

    for (node, role) in scene.nodes.iter().zip(roles) {
        if *role != NodeRole::Renderable {
            continue;
        }
        let Some(mesh) = scene.node_mesh(node) else {
            continue;
        };

        let mut geoms = Vec::with_capacity(mesh.primitives.len());
        for (index, primitive) in mesh.primitives.iter().enumerate() {
            geoms.push(flatten_primitive(
                scene,
                node,
                index,
                primitive,
                &mut geometry.vertices,
            )?);
        }

        geometry.meshes.push(Mesh {
            aabb: Aabb::UNBOUNDED,
            geoms,
        });
    }

    Ok(geometry)
}
