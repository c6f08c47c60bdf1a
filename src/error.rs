use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BakeError {
    #[error("primitive {primitive} of node '{node}' is malformed: {reason}")]
    MalformedPrimitive {
        node: String,
        primitive: usize,
        reason: MalformedReason,
    },

    #[error(
        "found {lights} Light node(s) but {directions} Direction node(s); every light needs exactly one direction"
    )]
    LightDirectionMismatch { lights: usize, directions: usize },

    #[error("image name '{name}' cannot be used as a texture file name")]
    InvalidTextureName { name: String },

    #[error("accessor {accessor} cannot be read: {reason}")]
    Accessor { accessor: usize, reason: String },

    #[error("{what} count {count} does not fit into the level file")]
    CountOverflow { what: &'static str, count: usize },

    #[error("failed to read config {path}")]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("image {image} has an invalid data uri")]
    Base64 {
        image: usize,
        source: base64::DecodeError,
    },

    #[error(transparent)]
    Gltf(#[from] gltf::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Why a primitive can't be flattened into the vertex pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    NotTriangles(String),
    TooFewPositions(usize),
    MissingNormals,
    NormalCountMismatch { positions: usize, normals: usize },
    MissingTexCoords,
    TexCoordCountMismatch { positions: usize, tex_coords: usize },
    IndexCountNotTriangular(usize),
    IndexOutOfRange { index: u32, vertex_count: usize },
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::NotTriangles(mode) => {
                write!(f, "topology is {} instead of a triangle list", mode)
            }
            MalformedReason::TooFewPositions(count) => {
                write!(f, "only {} position(s), at least 3 are required", count)
            }
            MalformedReason::MissingNormals => write!(f, "the NORMAL attribute is missing"),
            MalformedReason::NormalCountMismatch { positions, normals } => {
                write!(f, "{} normals for {} positions", normals, positions)
            }
            MalformedReason::MissingTexCoords => write!(
                f,
                "the material has a base color texture but the primitive has no matching TEXCOORD attribute"
            ),
            MalformedReason::TexCoordCountMismatch {
                positions,
                tex_coords,
            } => write!(f, "{} texture coordinates for {} positions", tex_coords, positions),
            MalformedReason::IndexCountNotTriangular(count) => {
                write!(f, "index count {} is not a multiple of 3", count)
            }
            MalformedReason::IndexOutOfRange {
                index,
                vertex_count,
            } => write!(
                f,
                "index {} points outside of the {} vertices",
                index, vertex_count
            ),
        }
    }
}
