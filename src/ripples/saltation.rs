//! Saltation pass: grains hop downwind by a height-dependent distance.

use super::RippleConfig;
use crate::lattice::HeightField;

/// Integer hop length for a cell of height `h`: `floor(max(0, l0 + b * h))`.
#[inline]
pub fn jump_length(h: f32, l0: f32, b: f32) -> usize {
    (l0 + b * h).max(0.0).floor() as usize
}

/// Moves one quantum `Q` out of every cell and drops it `jump` columns downwind.
///
/// Hop lengths are fixed from the surface as it stood before the pass. The
/// sweep visits columns left to right and rows top to bottom within a column.
pub fn saltate(field: &mut HeightField<f32>, config: &RippleConfig) {
    let nx = field.nx();
    let ny = field.ny();
    let q = config.quantum();

    let jumps: Vec<usize> = field
        .as_slice()
        .iter()
        .map(|&h| jump_length(h, config.l0, config.b))
        .collect();

    let cells = field.as_mut_slice();
    for j in 0..nx {
        for i in 0..ny {
            let src = i * nx + j;
            cells[src] -= q;
            let dest = (j + jumps[src] % nx) % nx;
            cells[i * nx + dest] += q;
        }
    }
}
