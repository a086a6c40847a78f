//! Wind-shadow test.
//!
//! A cell is sheltered when some cell upwind along its row rises above it by
//! more than the shadow angle, measured over the wrapped upwind distance.

use super::slope::slope_deg;
use super::DuneConfig;
use crate::lattice::HeightField;

/// Steepest angle (degrees) at which upwind topography in the same row rises above `cell`.
///
/// Every other column is visited at wrapped upwind distance `1..nx`. Returns
/// `None` on a single-column lattice, which has no upwind cells.
pub fn max_upwind_slope(field: &HeightField<u32>, cell: (usize, usize), aspect_ratio: f32) -> Option<f32> {
    let (i, j) = cell;
    let nx = field.nx();
    let row = field.row(i);
    let h0 = row[j] as f32;

    (1..nx)
        .map(|d| {
            let src = (j + nx - d) % nx;
            slope_deg(row[src] as f32 - h0, d as f32, aspect_ratio)
        })
        .reduce(f32::max)
}

/// True if `cell` lies in the wind shadow of upwind topography.
pub fn in_shadow(field: &HeightField<u32>, cell: (usize, usize), config: &DuneConfig) -> bool {
    max_upwind_slope(field, cell, config.slab_aspect_ratio)
        .is_some_and(|theta| theta > config.shadow_angle_deg)
}
