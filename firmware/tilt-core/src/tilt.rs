use core::f64::consts::PI;

/// One accelerometer reading in g.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Sample {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Tilt angle in degrees for a sensor mounted with x as the tilt axis and
/// y/z spanning the level plane. Positive when the x reading is negative.
///
/// With y = z = 0 the result is exactly ±90°, the sign following -x.
pub fn tilt_angle_deg(sample: &Sample) -> f32 {
    let x = f64::from(sample.x);
    let y = f64::from(sample.y);
    let z = f64::from(sample.z);

    let radians = libm::atan2(-x, libm::sqrt(y * y + z * z));
    (radians * 180.0 / PI) as f32
}
