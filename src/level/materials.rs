use glam::Vec4;

use crate::resource_system::file_formats::levelfile::Surface;

pub const SPECULAR_POWER: f32 = 10.0;
pub const TRANSLUCENT_PREFIX: &str = "T:";

/// Checker patterns shipped with the engine as bitmaps; every other image is a png.
pub const CHECKER_TEXTURES: [&str; 7] = [
    "BlueChecker",
    "BrightGreenChecker",
    "GreenChecker",
    "OrangeChecker",
    "PinkChecker",
    "PurpleChecker",
    "RedChecker",
];

const TRANSLUCENT: Vec4 = Vec4::new(1.0, 1.0, 1.0, 0.5);
const OPAQUE_BLACK: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);
const REF_POINT_COLOR: Vec4 = Vec4::new(0.9921, 0.9921, 0.9921, 1.0);

/// `T:` meshes that stay opaque when they don't glow.
pub const TRANSLUCENCY_EXEMPT_MESHES: [&str; 1] = ["T:GOALAREA"];
/// Textures that keep their material colours on non-glowing `T:` meshes.
pub const TRANSLUCENCY_EXEMPT_TEXTURES: [&str; 2] = ["OddArrow.png", "YellowArrow.png"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorOverride {
    MaterialDiffuse,
    MaterialEmissive,
    Fixed(Vec4),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EmissiveOverride {
    Keep,
    Replace(Vec4),
    Alpha(f32),
}

/// Colours forced onto glowing `T:` geoms with a particular texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureOverride {
    pub texture: &'static str,
    /// Written as both ambient and diffuse.
    pub color: ColorOverride,
    pub emissive: EmissiveOverride,
}

pub static EMISSIVE_TEXTURE_OVERRIDES: [TextureOverride; 5] = [
    TextureOverride {
        texture: "Decal_Start.png",
        color: ColorOverride::MaterialDiffuse,
        emissive: EmissiveOverride::Keep,
    },
    TextureOverride {
        texture: "goal.png",
        color: ColorOverride::MaterialEmissive,
        emissive: EmissiveOverride::Keep,
    },
    TextureOverride {
        texture: "goal-round.png",
        color: ColorOverride::MaterialEmissive,
        emissive: EmissiveOverride::Keep,
    },
    TextureOverride {
        texture: "Decal_Warning.png",
        color: ColorOverride::Fixed(Vec4::new(0.5882353, 0.5882353, 0.5882353, 1.0)),
        emissive: EmissiveOverride::Replace(Vec4::new(0.9921569, 0.9921569, 0.9921569, 1.0)),
    },
    TextureOverride {
        texture: "NeonArrow.png",
        color: ColorOverride::Fixed(Vec4::new(0.98823535, 1.0, 0.0, 0.75)),
        emissive: EmissiveOverride::Alpha(0.75),
    },
];

pub fn texture_override(texture: &str) -> Option<&'static TextureOverride> {
    EMISSIVE_TEXTURE_OVERRIDES
        .iter()
        .find(|rule| rule.texture == texture)
}

impl TextureOverride {
    /// Returns (ambient and diffuse colour, emissive colour).
    pub fn apply(&self, material: &GeomMaterial) -> (Vec4, Vec4) {
        let color = match self.color {
            ColorOverride::MaterialDiffuse => material.diffuse,
            ColorOverride::MaterialEmissive => material.emissive,
            ColorOverride::Fixed(color) => color,
        };
        let emissive = match self.emissive {
            EmissiveOverride::Keep => material.emissive,
            EmissiveOverride::Replace(emissive) => emissive,
            EmissiveOverride::Alpha(alpha) => material.emissive.truncate().extend(alpha),
        };
        (color, emissive)
    }
}

/// The material inputs of one geom, before any override.
#[derive(Debug, Clone, PartialEq)]
pub struct GeomMaterial {
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub emissive: Vec4,
    /// Already run through [`texture_file_name`].
    pub texture: Option<String>,
}

/// The file name the engine loads for an image, see [`CHECKER_TEXTURES`].
pub fn texture_file_name(image_name: &str) -> String {
    if image_name.ends_with(".png") || image_name.ends_with(".bmp") {
        image_name.to_string()
    } else if CHECKER_TEXTURES.contains(&image_name) {
        format!("{}.bmp", image_name)
    } else {
        format!("{}.png", image_name)
    }
}

/// Zero and opaque black both mean "does not glow".
pub fn has_emission(emissive: Vec4) -> bool {
    emissive != Vec4::ZERO && emissive != OPAQUE_BLACK
}

pub fn resolve_surface(mesh_name: &str, material: &GeomMaterial) -> Surface {
    let translucent_mesh = mesh_name.starts_with(TRANSLUCENT_PREFIX);
    let texture = material.texture.as_deref();

    let (color, emissive) = if !has_emission(material.emissive) {
        let exempt = TRANSLUCENCY_EXEMPT_MESHES.contains(&mesh_name)
            || texture.is_some_and(|t| TRANSLUCENCY_EXEMPT_TEXTURES.contains(&t));
        if translucent_mesh && !exempt {
            (TRANSLUCENT, material.emissive)
        } else {
            (material.diffuse, material.emissive)
        }
    } else {
        match texture
            .filter(|_| translucent_mesh)
            .and_then(texture_override)
        {
            Some(rule) => rule.apply(material),
            None => (material.diffuse, material.emissive),
        }
    };

    Surface {
        ambient: color.to_array(),
        diffuse: color.to_array(),
        specular: material.specular.to_array(),
        emissive: emissive.to_array(),
        power: SPECULAR_POWER,
        has_reflection: false,
        texture: material.texture.clone(),
    }
}

/// The fixed colour block of flag, bridge and small flag reference points.
pub fn ref_point_surface(texture: Option<String>) -> Surface {
    Surface {
        ambient: REF_POINT_COLOR.to_array(),
        diffuse: REF_POINT_COLOR.to_array(),
        specular: OPAQUE_BLACK.to_array(),
        emissive: OPAQUE_BLACK.to_array(),
        power: SPECULAR_POWER,
        has_reflection: false,
        texture,
    }
}
