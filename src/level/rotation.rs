use std::f64::consts::PI;

use glam::Quat;

use crate::resource_system::file_formats::levelfile::EulerAngles;

/// How close |sin(pitch)| may get to 1 before the decomposition counts as gimbal locked.
/// Quaternions arrive as f32, so an exact 90 degree pitch lands around 1 - 3e-8.
pub const GIMBAL_LOCK_TOLERANCE: f64 = 1e-6;

#[inline]
fn degrees(radians: f64) -> f64 {
    180.0 * radians / PI
}

/// Decomposes a node's local rotation into the engine's Z, Y, X angles (degrees).
pub fn to_engine_euler(rotation: Quat) -> EulerAngles {
    // engine axes: source X and Y swap, Z flips
    let r_y = rotation.x as f64;
    let r_x = rotation.y as f64;
    let r_z = -(rotation.z as f64);
    let r_w = rotation.w as f64;

    let mut rot_y = 0.0;
    let y_denominator = 1.0 - 2.0 * (r_x * r_x + r_y * r_y);
    if y_denominator != 0.0 {
        rot_y = degrees((2.0 * (r_w * r_x + r_y * r_z)).atan2(y_denominator));
    }

    let mut rot_z = 0.0;
    let z_denominator = 1.0 - 2.0 * (r_y * r_y + r_z * r_z);
    if z_denominator != 0.0 {
        rot_z = degrees((2.0 * (r_w * r_z + r_x * r_y)).atan2(z_denominator));
    }

    let half_sin_pitch = r_w * r_y - r_z * r_x;
    let sin_pitch = 2.0 * half_sin_pitch;
    let mut rot_x = degrees(sin_pitch.asin());

    if rot_y.is_nan() || rot_x.is_nan() || sin_pitch.abs() >= 1.0 - GIMBAL_LOCK_TOLERANCE {
        rot_y = if half_sin_pitch > 0.0 { 90.0 } else { -90.0 };
        rot_x = degrees(sin_pitch.clamp(-1.0, 1.0).asin());
    }

    EulerAngles {
        z: rot_z as f32,
        y: rot_y as f32,
        x: rot_x as f32,
    }
}
