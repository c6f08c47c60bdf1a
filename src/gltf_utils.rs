//! Loads a glTF document into a [`Scene`].
//!
//! Only geometry buffers are imported. Images are kept as the encoded bytes found in the file,
//! they are never decoded.

use std::fs;
use std::path::Path;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

use crate::error::BakeError;
use crate::scene_graph::{Image, Material, Mesh, Node, Primitive, Scene, Topology, Transform};

pub fn transform_to_mat4(transform: gltf::scene::Transform) -> Mat4 {
    match transform {
        gltf::scene::Transform::Matrix { matrix } => Mat4::from_cols_array_2d(&matrix),
        gltf::scene::Transform::Decomposed {
            translation,
            rotation,
            scale,
        } => Mat4::from_scale_rotation_translation(
            Vec3::from(scale),
            Quat::from_array(rotation),
            Vec3::from(translation),
        ),
    }
}

fn local_transform(transform: gltf::scene::Transform) -> Transform {
    let (translation, rotation, scale) = transform.decomposed();
    Transform {
        translation: Vec3::from(translation),
        rotation: Quat::from_array(rotation),
        scale: Vec3::from(scale),
    }
}

pub fn accumulate_world_matrices(node: &gltf::Node, parent: &Mat4, worlds: &mut [Mat4]) {
    let world = *parent * transform_to_mat4(node.transform());
    worlds[node.index()] = world;
    for child in node.children() {
        accumulate_world_matrices(&child, &world, worlds);
    }
}

fn accessor_error(accessor: &gltf::Accessor, reason: impl Into<String>) -> BakeError {
    BakeError::Accessor {
        accessor: accessor.index(),
        reason: reason.into(),
    }
}

fn buffer_slice<'a>(
    accessor: &gltf::Accessor,
    buffers: &'a [gltf::buffer::Data],
    buffer: usize,
    start: usize,
    len: usize,
) -> Result<&'a [u8], BakeError> {
    buffers
        .get(buffer)
        .and_then(|data| data.0.get(start..start + len))
        .ok_or_else(|| {
            accessor_error(
                accessor,
                format!("bytes {}..{} are outside of buffer {}", start, start + len, buffer),
            )
        })
}

/// Densely packed element bytes of an accessor, with sparse substitutions applied.
fn read_accessor_data(
    accessor: &gltf::Accessor,
    buffers: &[gltf::buffer::Data],
) -> Result<Vec<u8>, BakeError> {
    let count = accessor.count();
    let elem_size = accessor.size();

    let mut data = vec![0u8; count * elem_size];

    if let Some(view) = accessor.view() {
        let stride = view.stride().unwrap_or(elem_size);
        let start = view.offset() + accessor.offset();

        for i in 0..count {
            let src = buffer_slice(
                accessor,
                buffers,
                view.buffer().index(),
                start + i * stride,
                elem_size,
            )?;
            let dst = i * elem_size;
            data[dst..dst + elem_size].copy_from_slice(src);
        }
    } else if accessor.sparse().is_none() {
        return Err(accessor_error(
            accessor,
            "no buffer view and no sparse storage",
        ));
    }

    if let Some(sparse) = accessor.sparse() {
        let indices = sparse.indices();
        let indices_view = indices.view();
        let index_size = match indices.index_type() {
            gltf::accessor::sparse::IndexType::U8 => 1,
            gltf::accessor::sparse::IndexType::U16 => 2,
            gltf::accessor::sparse::IndexType::U32 => 4,
        };
        let indices_start = indices_view.offset() + indices.offset();
        let indices_stride = indices_view.stride().unwrap_or(index_size);

        let values = sparse.values();
        let values_view = values.view();
        let values_start = values_view.offset() + values.offset();
        let values_stride = values_view.stride().unwrap_or(elem_size);

        for i in 0..sparse.count() {
            let raw = buffer_slice(
                accessor,
                buffers,
                indices_view.buffer().index(),
                indices_start + i * indices_stride,
                index_size,
            )?;
            let index = match raw {
                [a] => *a as usize,
                [a, b] => u16::from_le_bytes([*a, *b]) as usize,
                [a, b, c, d] => u32::from_le_bytes([*a, *b, *c, *d]) as usize,
                _ => return Err(accessor_error(accessor, "malformed sparse index")),
            };
            if index >= count {
                return Err(accessor_error(
                    accessor,
                    format!("sparse index {} is out of range", index),
                ));
            }

            let src = buffer_slice(
                accessor,
                buffers,
                values_view.buffer().index(),
                values_start + i * values_stride,
                elem_size,
            )?;
            let dst = index * elem_size;
            data[dst..dst + elem_size].copy_from_slice(src);
        }
    }

    Ok(data)
}

#[inline]
fn f32_at(data: &[u8], idx: usize) -> f32 {
    bytemuck::cast::<[u8; 4], f32>([data[idx], data[idx + 1], data[idx + 2], data[idx + 3]])
}

#[inline]
fn u16_at(data: &[u8], idx: usize) -> u16 {
    bytemuck::cast::<[u8; 2], u16>([data[idx], data[idx + 1]])
}

fn expect_layout(
    accessor: &gltf::Accessor,
    data_type: gltf::accessor::DataType,
    dimensions: gltf::accessor::Dimensions,
) -> Result<(), BakeError> {
    if accessor.data_type() != data_type || accessor.dimensions() != dimensions {
        return Err(accessor_error(
            accessor,
            format!(
                "expected {:?} {:?}, found {:?} {:?}",
                dimensions,
                data_type,
                accessor.dimensions(),
                accessor.data_type()
            ),
        ));
    }
    Ok(())
}

pub fn read_vec3(
    accessor: &gltf::Accessor,
    buffers: &[gltf::buffer::Data],
) -> Result<Vec<Vec3>, BakeError> {
    expect_layout(
        accessor,
        gltf::accessor::DataType::F32,
        gltf::accessor::Dimensions::Vec3,
    )?;
    let data = read_accessor_data(accessor, buffers)?;

    Ok((0..accessor.count())
        .map(|i| {
            let idx = i * 12;
            Vec3::new(
                f32_at(&data, idx),
                f32_at(&data, idx + 4),
                f32_at(&data, idx + 8),
            )
        })
        .collect())
}

/// Float texture coordinates, or normalized unsigned byte/short ones.
pub fn read_tex_coords(
    accessor: &gltf::Accessor,
    buffers: &[gltf::buffer::Data],
) -> Result<Vec<Vec2>, BakeError> {
    use gltf::accessor::DataType;

    if accessor.dimensions() != gltf::accessor::Dimensions::Vec2 {
        return Err(accessor_error(accessor, "texture coordinates must be VEC2"));
    }
    let data = read_accessor_data(accessor, buffers)?;
    let count = accessor.count();

    match accessor.data_type() {
        DataType::F32 => Ok((0..count)
            .map(|i| Vec2::new(f32_at(&data, i * 8), f32_at(&data, i * 8 + 4)))
            .collect()),
        DataType::U8 if accessor.normalized() => Ok((0..count)
            .map(|i| Vec2::new(data[i * 2] as f32, data[i * 2 + 1] as f32) / 255.0)
            .collect()),
        DataType::U16 if accessor.normalized() => Ok((0..count)
            .map(|i| Vec2::new(u16_at(&data, i * 4) as f32, u16_at(&data, i * 4 + 2) as f32) / 65535.0)
            .collect()),
        other => Err(accessor_error(
            accessor,
            format!("unsupported texture coordinate type {:?}", other),
        )),
    }
}

pub fn read_index_buffer(
    accessor: &gltf::Accessor,
    buffers: &[gltf::buffer::Data],
) -> Result<Vec<u32>, BakeError> {
    use gltf::accessor::DataType;

    if accessor.dimensions() != gltf::accessor::Dimensions::Scalar {
        return Err(accessor_error(accessor, "indices must be SCALAR"));
    }
    let data = read_accessor_data(accessor, buffers)?;
    let count = accessor.count();

    match accessor.data_type() {
        DataType::U8 => Ok(data.iter().map(|&i| i as u32).collect()),
        DataType::U16 => Ok((0..count).map(|i| u16_at(&data, i * 2) as u32).collect()),
        DataType::U32 => Ok((0..count)
            .map(|i| {
                let idx = i * 4;
                bytemuck::cast::<[u8; 4], u32>([data[idx], data[idx + 1], data[idx + 2], data[idx + 3]])
            })
            .collect()),
        other => Err(accessor_error(
            accessor,
            format!("unsupported index type {:?}", other),
        )),
    }
}

fn topology(mode: gltf::mesh::Mode) -> Topology {
    match mode {
        gltf::mesh::Mode::Points => Topology::Points,
        gltf::mesh::Mode::Lines => Topology::Lines,
        gltf::mesh::Mode::LineLoop => Topology::LineLoop,
        gltf::mesh::Mode::LineStrip => Topology::LineStrip,
        gltf::mesh::Mode::Triangles => Topology::Triangles,
        gltf::mesh::Mode::TriangleStrip => Topology::TriangleStrip,
        gltf::mesh::Mode::TriangleFan => Topology::TriangleFan,
    }
}

fn read_primitive(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
) -> Result<Primitive, BakeError> {
    let attribute = |semantic: gltf::Semantic| {
        primitive
            .attributes()
            .find(|(s, _)| *s == semantic)
            .map(|(_, accessor)| accessor)
    };

    let positions = match attribute(gltf::Semantic::Positions) {
        Some(accessor) => read_vec3(&accessor, buffers)?,
        None => vec![],
    };
    let normals = attribute(gltf::Semantic::Normals)
        .map(|accessor| read_vec3(&accessor, buffers))
        .transpose()?;

    // only the set the base colour texture samples is ever used
    let tex_coords = primitive
        .material()
        .pbr_metallic_roughness()
        .base_color_texture()
        .and_then(|info| attribute(gltf::Semantic::TexCoords(info.tex_coord())))
        .map(|accessor| read_tex_coords(&accessor, buffers))
        .transpose()?;

    let indices = primitive
        .indices()
        .map(|accessor| read_index_buffer(&accessor, buffers))
        .transpose()?;

    Ok(Primitive {
        topology: topology(primitive.mode()),
        positions,
        normals,
        tex_coords,
        indices,
        material: primitive.material().index(),
    })
}

fn read_material(material: &gltf::Material) -> Material {
    let pbr = material.pbr_metallic_roughness();
    Material {
        base_color: Vec4::from_array(pbr.base_color_factor()),
        emissive: Vec3::from(material.emissive_factor()).extend(1.0),
        base_color_texture: pbr
            .base_color_texture()
            .map(|info| info.texture().source().index()),
    }
}

fn image_name(image: &gltf::Image) -> String {
    if let Some(name) = image.name() {
        return name.to_string();
    }
    if let gltf::image::Source::Uri { uri, .. } = image.source() {
        if !uri.starts_with("data:") {
            if let Some(stem) = Path::new(uri).file_stem().and_then(|s| s.to_str()) {
                return stem.to_string();
            }
        }
    }
    format!("image{}", image.index())
}

fn image_bytes(
    image: &gltf::Image,
    buffers: &[gltf::buffer::Data],
    base: Option<&Path>,
) -> Result<Vec<u8>, BakeError> {
    match image.source() {
        gltf::image::Source::View { view, .. } => {
            let start = view.offset();
            buffers
                .get(view.buffer().index())
                .and_then(|data| data.0.get(start..start + view.length()))
                .map(|bytes| bytes.to_vec())
                .ok_or_else(|| {
                    std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        format!("image {} points outside of its buffer", image.index()),
                    )
                    .into()
                })
        }
        gltf::image::Source::Uri { uri, .. } => {
            if let Some(rest) = uri.strip_prefix("data:") {
                let encoded = rest.split_once(',').map(|(_, data)| data).unwrap_or(rest);
                BASE64_STANDARD
                    .decode(encoded)
                    .map_err(|source| BakeError::Base64 {
                        image: image.index(),
                        source,
                    })
            } else {
                let path = match base {
                    Some(base) => base.join(uri),
                    None => Path::new(uri).to_path_buf(),
                };
                Ok(fs::read(path)?)
            }
        }
    }
}

/// Builds the scene from an already parsed document and its imported buffers.
pub fn scene_from_document(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    base: Option<&Path>,
) -> Result<Scene, BakeError> {
    let node_count = document.nodes().len();

    let mut parents = vec![None; node_count];
    for node in document.nodes() {
        for child in node.children() {
            parents[child.index()] = Some(node.index());
        }
    }

    let mut worlds = vec![Mat4::IDENTITY; node_count];
    for root in document.nodes().filter(|n| parents[n.index()].is_none()) {
        accumulate_world_matrices(&root, &Mat4::IDENTITY, &mut worlds);
    }

    let mut scene = Scene::new();

    for image in document.images() {
        scene.add_image(Image {
            name: image_name(&image),
            bytes: image_bytes(&image, buffers, base)?,
        });
    }

    for material in document.materials() {
        scene.add_material(read_material(&material));
    }

    for mesh in document.meshes() {
        let primitives = mesh
            .primitives()
            .map(|primitive| read_primitive(&primitive, buffers))
            .collect::<Result<Vec<_>, _>>()?;
        scene.add_mesh(Mesh {
            name: mesh.name().unwrap_or_default().to_string(),
            primitives,
        });
    }

    for node in document.nodes() {
        scene.nodes.push(Node {
            name: node.name().unwrap_or_default().to_string(),
            parent: parents[node.index()],
            local: local_transform(node.transform()),
            world: worlds[node.index()],
            mesh: node.mesh().map(|mesh| mesh.index()),
        });
    }

    log::debug!(
        "loaded {} node(s), {} mesh(es), {} material(s), {} image(s)",
        scene.nodes.len(),
        scene.meshes.len(),
        scene.materials.len(),
        scene.images.len()
    );

    Ok(scene)
}

pub fn load_scene(path: &Path) -> Result<Scene, BakeError> {
    let gltf::Gltf { document, blob } = gltf::Gltf::open(path)?;
    let base = path.parent();
    let buffers = gltf::import_buffers(&document, base, blob)?;
    scene_from_document(&document, &buffers, base)
}
