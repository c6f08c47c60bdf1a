use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BakeError;

/// An 8 bit per channel colour, as picked by a colour dialog.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Rgb8 = Rgb8::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Each channel mapped to `channel / 255`.
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from(value: [u8; 3]) -> Self {
        Rgb8::new(value[0], value[1], value[2])
    }
}

impl From<Rgb8> for [u8; 3] {
    fn from(value: Rgb8) -> Self {
        [value.r, value.g, value.b]
    }
}

// "r,g,b" or "#rrggbb"
impl FromStr for Rgb8 {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let string: String = s.chars().filter(|&c| !c.is_whitespace()).collect();

        if let Some(hex) = string.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(format!("expected #rrggbb, got '{}'", s));
            }
            let channel = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&hex[range], 16)
                    .map_err(|e| format!("invalid hex colour '{}': {}", s, e))
            };
            return Ok(Rgb8::new(channel(0..2)?, channel(2..4)?, channel(4..6)?));
        }

        let splits: Vec<&str> = string.split(',').collect();
        if splits.len() != 3 {
            return Err(format!(
                "comma splitting resulted in {} splits, not 3",
                splits.len()
            ));
        }

        let mut channels = [0u8; 3];
        for (channel, split) in channels.iter_mut().zip(splits) {
            *channel = split
                .parse::<u8>()
                .map_err(|e| format!("invalid channel '{}': {}", split, e))?;
        }
        Ok(Rgb8::from(channels))
    }
}

/// Everything the conversion needs besides the scene itself.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BakeConfig {
    pub background: Rgb8,
    pub ambient: Rgb8,
    pub export_textures: bool,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            background: Rgb8::BLACK,
            ambient: Rgb8::BLACK,
            export_textures: true,
        }
    }
}

impl BakeConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, BakeError> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|source| BakeError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
