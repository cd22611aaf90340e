//! # Engine Module
//!
//! Turns trajectory frames into occupancy fingerprints.
//!
//! ## Architecture
//!
//! - **Kernel** ([`kernel`]) - Voxel occupancy of one site for one frame
//! - **Scheduling** ([`fingerprint`]) - Frame dispatch over a worker pool and matrix assembly
//! - **Configuration** ([`config`]) - Output, task count and return settings
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! Frames are independent units of work. Workers share the trajectory, the
//! sites and the radius table read-only, and the matrix is assembled in frame
//! order after all workers have joined.

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod kernel;
pub mod progress;
