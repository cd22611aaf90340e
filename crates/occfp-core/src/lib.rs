//! # Occupancy Fingerprinter
//!
//! Computes per-frame voxel occupancy fingerprints of binding sites over a
//! molecular dynamics trajectory.
//!
//! A binding site is a sphere with a regular voxel lattice laid over its
//! bounding cube. For every frame, each voxel whose center falls inside the
//! van der Waals sphere of any atom is marked occupied. The result is a
//! `[frame, voxel]` matrix of zeros and ones, with the voxels of every site
//! concatenated in the order the sites were added.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Stateless models (`BindingSite`, `Topology`),
//!   the `Trajectory` capability and its adapters, and file I/O.
//!
//! - **[`engine`]: The Logic Core.** The voxel occupancy kernel and the frame
//!   scheduler that runs it sequentially or on a worker pool.
//!
//! - **[`workflows`]: The Public API.** The [`workflows::grid::Grid`]
//!   orchestrator that ties sites, trajectory and output together.

pub mod core;
pub mod engine;
pub mod workflows;
