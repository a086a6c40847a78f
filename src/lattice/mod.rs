//! Periodic lattice shared by the ripple and dune models.
//!
//! Both models store surface height on a toroidal `nx × ny` grid. Columns run
//! along the wind axis (wind blows toward increasing column index), rows run
//! across it.

mod field;
pub mod neighbors;

pub use field::{HeightField, wrap_index};
pub use neighbors::Compass;
