//! # Core Models Module
//!
//! Data structures shared by every layer of the fingerprinter.
//!
//! - [`site`] - A binding site and the voxel lattice laid over it
//! - [`layout`] - Which columns of a fingerprint matrix belong to which site
//! - [`topology`] - Per-atom bookkeeping of a trajectory and its radius table
//! - [`ids`] - Identifier types
//!
//! ```ignore
//! use occupancy_fingerprinter::core::models::site::BindingSite;
//! use nalgebra::{Point3, Vector3};
//!
//! let site = BindingSite::new(Point3::new(10.0, 10.0, 10.0), 5.0, Vector3::repeat(1.0))?;
//! assert_eq!(site.counts(), [11, 11, 11]);
//! ```

pub mod ids;
pub mod layout;
pub mod site;
pub mod topology;
