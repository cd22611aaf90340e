//! File formats read and written by the fingerprinter.
//!
//! - [`store`]: the binary container holding the `"frames"` fingerprint matrix.
//! - [`dx`]: OpenDX volumetric grids for visualizing a site's occupancy.
//! - [`summary`]: per-frame, per-site occupancy counts as CSV.
//! - [`sites`]: binding-site definitions in TOML.

pub mod dx;
pub mod sites;
pub mod store;
pub mod summary;
