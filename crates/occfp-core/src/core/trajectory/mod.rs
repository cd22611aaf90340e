//! Frame-addressable access to molecular dynamics trajectories.
//!
//! The engine only depends on the [`Trajectory`] trait. Two adapters ship with
//! the crate: [`InMemoryTrajectory`] for coordinates already held by the caller,
//! and [`PdbTrajectory`] for multi-model PDB files.

pub mod memory;
pub mod pdb;
pub mod traits;

pub use memory::InMemoryTrajectory;
pub use pdb::PdbTrajectory;
pub use traits::{Trajectory, TrajectoryError};
