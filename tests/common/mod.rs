#![allow(dead_code)]

use std::io::{Cursor, Read};

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use byteorder::{LittleEndian, ReadBytesExt};
use serde_json::{json, Value};

/// One triangle at the origin, up-facing normals, u16 indices and one UV set.
pub fn triangle_buffer() -> (Vec<u8>, Value, Value) {
    let positions: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
    let normals: [[f32; 3]; 3] = [[0.0, 1.0, 0.0]; 3];
    let indices: [u16; 4] = [0, 1, 2, 0]; // last one is padding
    let tex_coords: [[f32; 2]; 3] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];

    let mut bytes = vec![];
    bytes.extend_from_slice(bytemuck::cast_slice(&positions));
    bytes.extend_from_slice(bytemuck::cast_slice(&normals));
    bytes.extend_from_slice(bytemuck::cast_slice(&indices));
    bytes.extend_from_slice(bytemuck::cast_slice(&tex_coords));
    assert_eq!(bytes.len(), 104);

    let views = json!([
        { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
        { "buffer": 0, "byteOffset": 36, "byteLength": 36 },
        { "buffer": 0, "byteOffset": 72, "byteLength": 6 },
        { "buffer": 0, "byteOffset": 80, "byteLength": 24 }
    ]);
    let accessors = json!([
        { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
          "min": [0.0, 0.0, 0.0], "max": [1.0, 0.0, 1.0] },
        { "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3" },
        { "bufferView": 2, "componentType": 5123, "count": 3, "type": "SCALAR" },
        { "bufferView": 3, "componentType": 5126, "count": 3, "type": "VEC2" }
    ]);
    (bytes, views, accessors)
}

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64_STANDARD.encode(bytes))
}

/// A complete glTF document around [`triangle_buffer`].
pub fn document(materials: Value, meshes: Value, nodes: Value, images: Value) -> String {
    let (bytes, views, accessors) = triangle_buffer();
    let roots: Vec<usize> = (0..nodes.as_array().map(|n| n.len()).unwrap_or(0)).collect();
    let child_ids: Vec<u64> = nodes
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|n| n.get("children"))
        .filter_map(|c| c.as_array())
        .flatten()
        .filter_map(|c| c.as_u64())
        .collect();
    let roots: Vec<usize> = roots
        .into_iter()
        .filter(|i| !child_ids.contains(&(*i as u64)))
        .collect();

    let textures: Vec<Value> = (0..images.as_array().map(|i| i.len()).unwrap_or(0))
        .map(|i| json!({ "source": i }))
        .collect();

    let mut root = json!({
        "asset": { "version": "2.0" },
        "buffers": [{
            "byteLength": bytes.len(),
            "uri": data_uri("application/octet-stream", &bytes)
        }],
        "bufferViews": views,
        "accessors": accessors,
        "nodes": nodes,
        "scenes": [{ "nodes": roots }],
        "scene": 0
    });
    if materials.as_array().is_some_and(|m| !m.is_empty()) {
        root["materials"] = materials;
    }
    if meshes.as_array().is_some_and(|m| !m.is_empty()) {
        root["meshes"] = meshes;
    }
    if !textures.is_empty() {
        root["images"] = images;
        root["textures"] = Value::Array(textures);
    }
    serde_json::to_string_pretty(&root).unwrap()
}

/// Reads a level file back the way the engine does.
pub struct LevelReader {
    cursor: Cursor<Vec<u8>>,
}

impl LevelReader {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            cursor: Cursor::new(bytes),
        }
    }

    pub fn i32(&mut self) -> i32 {
        self.cursor.read_i32::<LittleEndian>().unwrap()
    }

    pub fn f32(&mut self) -> f32 {
        self.cursor.read_f32::<LittleEndian>().unwrap()
    }

    pub fn floats<const N: usize>(&mut self) -> [f32; N] {
        let mut out = [0.0; N];
        for value in out.iter_mut() {
            *value = self.f32();
        }
        out
    }

    pub fn string(&mut self) -> String {
        let mut length = 0usize;
        let mut shift = 0;
        loop {
            let byte = self.cursor.read_u8().unwrap();
            length |= ((byte & 0x7f) as usize) << shift;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
        }
        let mut bytes = vec![0u8; length];
        self.cursor.read_exact(&mut bytes).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    pub fn surface(&mut self) -> SurfaceRecord {
        SurfaceRecord {
            ambient: self.floats(),
            diffuse: self.floats(),
            specular: self.floats(),
            emissive: self.floats(),
            power: self.f32(),
            has_reflection: self.i32(),
            texture: match self.i32() {
                0 => None,
                1 => Some(self.string()),
                other => panic!("bad texture flag {}", other),
            },
        }
    }

    pub fn aabb(&mut self) -> [f32; 6] {
        self.floats()
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor.position() as usize == self.cursor.get_ref().len()
    }
}

#[derive(Debug, PartialEq)]
pub struct SurfaceRecord {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub emissive: [f32; 4],
    pub power: f32,
    pub has_reflection: i32,
    pub texture: Option<String>,
}

pub const UNBOUNDED: [f32; 6] = [
    -1_000_000.0,
    -1_000_000.0,
    -1_000_000.0,
    1_000_000.0,
    1_000_000.0,
    1_000_000.0,
];
