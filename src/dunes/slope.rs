//! Slope angles between slab columns.

/// Angle in degrees of a rise `dh` (slabs) over a horizontal run `dd` (cells).
///
/// `aspect_ratio` converts slab height into cell widths.
#[inline]
pub fn slope_deg(dh: f32, dd: f32, aspect_ratio: f32) -> f32 {
    (dh * aspect_ratio).atan2(dd).to_degrees()
}

/// Angle of repose for dry sand, `atan(2/3)` ≈ 33.69 degrees.
#[inline]
pub fn repose_angle_deg() -> f32 {
    (2.0f32 / 3.0).atan().to_degrees()
}
