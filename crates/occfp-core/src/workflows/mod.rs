//! # Workflows Module
//!
//! User-facing entry points of the fingerprinter.
//!
//! - **Grid** ([`grid`]) - Collects binding sites over a trajectory and computes,
//!   persists or returns their occupancy fingerprint.

pub mod grid;
