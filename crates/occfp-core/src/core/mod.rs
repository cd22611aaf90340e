//! # Core Module
//!
//! Stateless building blocks of the occupancy fingerprinter.
//!
//! ## Architecture
//!
//! - **Models** ([`models`]) - Binding-site geometry, matrix layout and atom topology
//! - **Trajectories** ([`trajectory`]) - The frame access trait and its adapters
//! - **File I/O** ([`io`]) - Fingerprint store, OpenDX volumes, CSV summaries and site files
//! - **Utilities** ([`utils`]) - Element tables
//!
//! Nothing in this module spawns threads or keeps global state; scheduling
//! lives in [`crate::engine`].

pub mod io;
pub mod models;
pub mod trajectory;
pub mod utils;
