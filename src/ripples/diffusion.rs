//! Creep pass: weighted 8-neighbor smoothing on the torus.

use crate::lattice::{Compass, HeightField};

/// Total stencil weight: four axis neighbors at 1 plus four diagonals at 1/2.
const STENCIL_WEIGHT: f32 = 6.0;

/// Weighted neighbor sum at a cell, resolving every neighbor through wraparound.
#[inline]
fn wrapped_sum(h: &HeightField<f32>, i: usize, j: usize) -> f32 {
    Compass::ALL
        .iter()
        .map(|&dir| {
            let (ni, nj) = h.neighbor(i, j, dir);
            dir.stencil_weight() * h.get(ni, nj)
        })
        .sum()
}

/// Computes the weighted neighbor sum (`NNsum`) for every cell.
///
/// Interior cells index their neighbors directly; the border ring (first and
/// last rows and columns, corners included) goes through wrapped lookups. Both
/// paths apply the same weights.
pub fn neighbor_sums(h: &HeightField<f32>) -> Vec<f32> {
    let nx = h.nx();
    let ny = h.ny();
    let c = h.as_slice();
    let mut sums = vec![0.0f32; c.len()];

    // Interior.
    for i in 1..ny.saturating_sub(1) {
        let up = (i - 1) * nx;
        let mid = i * nx;
        let down = (i + 1) * nx;
        for j in 1..nx.saturating_sub(1) {
            sums[mid + j] = c[mid + j + 1]
                + c[mid + j - 1]
                + c[down + j]
                + c[up + j]
                + 0.5 * (c[down + j + 1] + c[down + j - 1] + c[up + j + 1] + c[up + j - 1]);
        }
    }

    // Border rows.
    for j in 0..nx {
        sums[j] = wrapped_sum(h, 0, j);
        if ny > 1 {
            sums[(ny - 1) * nx + j] = wrapped_sum(h, ny - 1, j);
        }
    }

    // Border columns (corners already handled above).
    for i in 1..ny.saturating_sub(1) {
        sums[i * nx] = wrapped_sum(h, i, 0);
        if nx > 1 {
            sums[i * nx + nx - 1] = wrapped_sum(h, i, nx - 1);
        }
    }

    sums
}

/// Applies one creep pass: `h' = h + d * (NNsum / 6 - h)`.
///
/// All neighbor sums are taken from the surface before the update.
pub fn diffuse(field: &mut HeightField<f32>, d: f32) {
    let sums = neighbor_sums(field);
    for (h, s) in field.as_mut_slice().iter_mut().zip(sums) {
        *h += d * (s / STENCIL_WEIGHT - *h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp(nx: usize, ny: usize) -> HeightField<f32> {
        let cells = (0..nx * ny)
            .map(|k| ((k * 7919) % 13) as f32 * 0.1 - 0.6)
            .collect();
        HeightField::from_vec(nx, ny, cells).unwrap()
    }

    #[test]
    fn test_sums_match_wrapped_formula_everywhere() {
        for (nx, ny) in [(6, 5), (3, 3), (2, 4), (1, 3), (5, 1), (1, 1)] {
            let h = ramp(nx, ny);
            let sums = neighbor_sums(&h);
            for (i, j) in h.coords() {
                assert_relative_eq!(sums[h.index_of(i, j)], wrapped_sum(&h, i, j), epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_corner_sum_explicit() {
        let h = ramp(4, 3);
        let g = |i: usize, j: usize| h.get(i, j);
        let expected = g(0, 1) + g(0, 3) + g(1, 0) + g(2, 0)
            + 0.5 * (g(1, 1) + g(1, 3) + g(2, 1) + g(2, 3));
        assert_relative_eq!(neighbor_sums(&h)[0], expected, epsilon = 1e-6);
    }

    #[test]
    fn test_uniform_field_is_fixed_point() {
        let mut field = HeightField::filled(7, 4, 0.42f32).unwrap();
        for _ in 0..10 {
            diffuse(&mut field, 0.25);
        }
        for &h in field.as_slice() {
            assert_relative_eq!(h, 0.42, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_output_bounded_by_neighborhood() {
        let field = ramp(8, 6);
        let mut out = field.clone();
        diffuse(&mut out, 0.25);

        for (i, j) in field.coords() {
            let mut lo = field.get(i, j);
            let mut hi = lo;
            for (_, (ni, nj)) in field.neighbors(i, j) {
                lo = lo.min(field.get(ni, nj));
                hi = hi.max(field.get(ni, nj));
            }
            let v = out.get(i, j);
            assert!(v >= lo - 1e-6 && v <= hi + 1e-6, "({i},{j}) = {v} outside [{lo}, {hi}]");
        }
    }

    #[test]
    fn test_diffusion_conserves_mass() {
        let mut field = ramp(9, 7);
        let before = field.total();
        diffuse(&mut field, 0.25);
        assert_relative_eq!(field.total(), before, epsilon = 1e-4);
    }

    #[test]
    fn test_single_spike_spreads_with_stencil_weights() {
        let mut field: HeightField<f32> = HeightField::new(5, 5).unwrap();
        field.set(2, 2, 6.0);
        diffuse(&mut field, 0.5);

        assert_relative_eq!(field.get(2, 2), 3.0, epsilon = 1e-6);
        assert_relative_eq!(field.get(2, 3), 0.5, epsilon = 1e-6);
        assert_relative_eq!(field.get(1, 2), 0.5, epsilon = 1e-6);
        assert_relative_eq!(field.get(3, 3), 0.25, epsilon = 1e-6);
        assert_relative_eq!(field.get(0, 0), 0.0, epsilon = 1e-6);
    }
}
