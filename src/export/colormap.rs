//! Diverging cool-warm colormap.

const COOL: [f32; 3] = [59.0, 76.0, 192.0];
const NEUTRAL: [f32; 3] = [221.0, 221.0, 221.0];
const WARM: [f32; 3] = [180.0, 4.0, 38.0];

/// Maps `t` in `[0, 1]` from blue (troughs) through grey to red (crests).
///
/// Values outside the unit interval are clamped.
pub fn coolwarm(t: f32) -> [u8; 3] {
    let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
    let (a, b, s) = if t < 0.5 {
        (COOL, NEUTRAL, t * 2.0)
    } else {
        (NEUTRAL, WARM, (t - 0.5) * 2.0)
    };
    [0, 1, 2].map(|k| (a[k] + (b[k] - a[k]) * s).round() as u8)
}
