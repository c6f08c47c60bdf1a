use glam::{Vec2, Vec3};

/// Source units are metres, the engine works in 1/50 m.
pub const POSITION_SCALE: f32 = 50.0;

/// Right-handed source to the engine's handedness, scaled to engine units.
#[inline]
pub fn convert_position(source: Vec3) -> [f32; 3] {
    [
        source.x * POSITION_SCALE,
        source.y * POSITION_SCALE,
        -source.z * POSITION_SCALE,
    ]
}

/// Same axis flip as [`convert_position`], without the scale.
#[inline]
pub fn convert_normal(source: Vec3) -> [f32; 3] {
    [source.x, source.y, -source.z]
}

#[inline]
pub fn convert_tex_coords(source: Vec2) -> [f32; 2] {
    source.to_array()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_scaled_and_flipped() {
        assert_eq!(
            convert_position(Vec3::new(1.0, -2.0, 0.5)),
            [50.0, -100.0, -25.0]
        );
        assert_eq!(convert_position(Vec3::new(0.0, 0.0, -3.0)), [0.0, 0.0, 150.0]);
    }

    #[test]
    fn normals_are_only_flipped() {
        assert_eq!(convert_normal(Vec3::new(0.0, 0.6, 0.8)), [0.0, 0.6, -0.8]);
    }

    #[test]
    fn tex_coords_pass_through() {
        assert_eq!(convert_tex_coords(Vec2::new(0.25, 0.75)), [0.25, 0.75]);
    }
}
