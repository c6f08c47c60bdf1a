//! The binary level format read by the engine.
//!
//! Everything is little-endian. Counts and flags are `i32`, every other number is `f32`.
//! Strings are written like .NET's `BinaryWriter` does: the UTF-8 byte length as a 7 bit
//! variable-length integer (low bits first, high bit set on all but the last byte) followed by
//! the UTF-8 bytes without terminator.
//!
//! Sections, in order: reference points, splines, lights, background + ambient colour, vertex
//! pool, global bounding box, meshes.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use bytemuck::{Pod, Zeroable};

use crate::error::BakeError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Aabb {
    /// The engine never culls against it, so every box is written as this one.
    pub const UNBOUNDED: Aabb = Aabb {
        min: [-1_000_000.0; 3],
        max: [1_000_000.0; 3],
    };
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

/// Engine rotation in degrees, written Z, Y, X.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EulerAngles {
    pub z: f32,
    pub y: f32,
    pub x: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub emissive: [f32; 4],
    pub power: f32,
    pub has_reflection: bool,
    pub texture: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefPoint {
    pub name: String,
    pub position: [f32; 3],
    pub rotation: EulerAngles,
    pub surface: Option<Surface>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spline {
    pub name: String,
    pub points: Vec<[f32; 3]>,
}

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Directional = 0,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub position: [f32; 3],
    pub direction: [f32; 3],
    pub color: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strip {
    pub triangle_count: i32,
    pub vertex_offset: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Geom {
    pub name: String,
    pub surface: Surface,
    pub strips: Vec<Strip>,
}

// a "submesh" on the engine side
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub aabb: Aabb,
    pub geoms: Vec<Geom>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub ref_points: Vec<RefPoint>,
    pub splines: Vec<Spline>,
    pub lights: Vec<Light>,
    pub background: [f32; 3],
    pub ambient: [f32; 3],
    pub vertices: Vec<Vertex>,
    pub aabb: Aabb,
    pub meshes: Vec<Mesh>,
}

pub(crate) trait Writable {
    fn write<W: Write>(&self, wtr: &mut W) -> Result<(), BakeError>;
}

fn write_count<W: Write>(wtr: &mut W, what: &'static str, count: usize) -> Result<(), BakeError> {
    let count32 = i32::try_from(count).map_err(|_| BakeError::CountOverflow { what, count })?;
    wtr.write_i32::<LittleEndian>(count32)?;
    Ok(())
}

fn write_flag<W: Write>(wtr: &mut W, flag: bool) -> Result<(), BakeError> {
    wtr.write_i32::<LittleEndian>(flag as i32)?;
    Ok(())
}

fn write_floats<W: Write>(wtr: &mut W, values: &[f32]) -> Result<(), BakeError> {
    for value in values {
        wtr.write_f32::<LittleEndian>(*value)?;
    }
    Ok(())
}

pub(crate) fn write_string<W: Write>(wtr: &mut W, value: &str) -> Result<(), BakeError> {
    let bytes = value.as_bytes();
    if i32::try_from(bytes.len()).is_err() {
        return Err(BakeError::CountOverflow {
            what: "string byte",
            count: bytes.len(),
        });
    }
    let mut length = bytes.len() as u32;
    while length >= 0x80 {
        wtr.write_u8((length as u8) | 0x80)?;
        length >>= 7;
    }
    wtr.write_u8(length as u8)?;
    wtr.write_all(bytes)?;
    Ok(())
}

impl Writable for Aabb {
    fn write<W: Write>(&self, wtr: &mut W) -> Result<(), BakeError> {
        write_floats(wtr, &self.min)?;
        write_floats(wtr, &self.max)
    }
}

impl Writable for Vertex {
    fn write<W: Write>(&self, wtr: &mut W) -> Result<(), BakeError> {
        write_floats(wtr, &self.position)?;
        write_floats(wtr, &self.normal)?;
        write_floats(wtr, &self.tex_coords)
    }
}

impl Writable for EulerAngles {
    fn write<W: Write>(&self, wtr: &mut W) -> Result<(), BakeError> {
        write_floats(wtr, &[self.z, self.y, self.x])
    }
}

impl Writable for Surface {
    fn write<W: Write>(&self, wtr: &mut W) -> Result<(), BakeError> {
        write_floats(wtr, &self.ambient)?;
        write_floats(wtr, &self.diffuse)?;
        write_floats(wtr, &self.specular)?;
        write_floats(wtr, &self.emissive)?;
        wtr.write_f32::<LittleEndian>(self.power)?;
        write_flag(wtr, self.has_reflection)?;
        match &self.texture {
            Some(texture) => {
                write_flag(wtr, true)?;
                write_string(wtr, texture)
            }
            None => write_flag(wtr, false),
        }
    }
}

impl Writable for RefPoint {
    fn write<W: Write>(&self, wtr: &mut W) -> Result<(), BakeError> {
        write_string(wtr, &self.name)?;
        write_floats(wtr, &self.position)?;
        self.rotation.write(wtr)?;
        match &self.surface {
            Some(surface) => {
                write_flag(wtr, true)?;
                surface.write(wtr)
            }
            None => write_flag(wtr, false),
        }
    }
}

impl Writable for Spline {
    fn write<W: Write>(&self, wtr: &mut W) -> Result<(), BakeError> {
        write_string(wtr, &self.name)?;
        write_count(wtr, "spline point", self.points.len())?;
        for point in &self.points {
            write_floats(wtr, point)?;
        }
        Ok(())
    }
}

impl Writable for Light {
    fn write<W: Write>(&self, wtr: &mut W) -> Result<(), BakeError> {
        wtr.write_i32::<LittleEndian>(self.kind as i32)?;
        write_floats(wtr, &self.position)?;
        write_floats(wtr, &self.direction)?;
        write_floats(wtr, &self.color)
    }
}

impl Writable for Strip {
    fn write<W: Write>(&self, wtr: &mut W) -> Result<(), BakeError> {
        wtr.write_i32::<LittleEndian>(self.triangle_count)?;
        wtr.write_i32::<LittleEndian>(self.vertex_offset)?;
        Ok(())
    }
}

impl Writable for Geom {
    fn write<W: Write>(&self, wtr: &mut W) -> Result<(), BakeError> {
        write_string(wtr, &self.name)?;
        self.surface.write(wtr)?;
        write_count(wtr, "strip", self.strips.len())?;
        for strip in &self.strips {
            strip.write(wtr)?;
        }
        Ok(())
    }
}

impl Writable for Mesh {
    fn write<W: Write>(&self, wtr: &mut W) -> Result<(), BakeError> {
        self.aabb.write(wtr)?;
        // nested submeshes are never emitted
        wtr.write_i32::<LittleEndian>(0)?;
        write_count(wtr, "geom", self.geoms.len())?;
        for geom in &self.geoms {
            geom.write(wtr)?;
        }
        Ok(())
    }
}

impl Level {
    pub fn write<W: Write>(&self, wtr: &mut W) -> Result<(), BakeError> {
        write_count(wtr, "reference point", self.ref_points.len())?;
        for ref_point in &self.ref_points {
            ref_point.write(wtr)?;
        }

        write_count(wtr, "spline", self.splines.len())?;
        for spline in &self.splines {
            spline.write(wtr)?;
        }

        write_count(wtr, "light", self.lights.len())?;
        for light in &self.lights {
            light.write(wtr)?;
        }

        write_floats(wtr, &self.background)?;
        write_floats(wtr, &self.ambient)?;

        write_count(wtr, "vertex", self.vertices.len())?;
        for vertex in &self.vertices {
            vertex.write(wtr)?;
        }

        self.aabb.write(wtr)?;

        write_count(wtr, "mesh", self.meshes.len())?;
        for mesh in &self.meshes {
            mesh.write(wtr)?;
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, BakeError> {
        let mut bytes = vec![];
        self.write(&mut bytes)?;
        Ok(bytes)
    }
}
