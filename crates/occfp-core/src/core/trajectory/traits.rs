use crate::core::models::topology::Topology;
use nalgebra::Point3;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrajectoryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("Frame {index} is out of range for a trajectory of {n_frames} frame(s)")]
    FrameOutOfRange { index: usize, n_frames: usize },
    #[error("Frame {frame} has {found} atoms but the topology has {expected}")]
    AtomCountMismatch {
        frame: usize,
        expected: usize,
        found: usize,
    },
    #[error("Trajectory contains no atoms")]
    Empty,
}

/// Read-only, index-addressable access to a molecular dynamics trajectory.
///
/// Implementations must be shareable across worker threads: the fingerprint
/// engine hands the same `&T` to every worker and asks each one for a
/// disjoint set of frames.
pub trait Trajectory: Sync {
    /// Number of frames available.
    fn n_frames(&self) -> usize;

    /// Number of atoms in every frame.
    fn n_atoms(&self) -> usize {
        self.topology().n_atoms()
    }

    /// Atom table shared by all frames.
    fn topology(&self) -> &Topology;

    /// Coordinates of every atom in frame `index`, in topology order, in Angstroms.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::FrameOutOfRange`] for an invalid index, or any
    /// error the backing store reports while producing the frame.
    fn frame(&self, index: usize) -> Result<Vec<Point3<f64>>, TrajectoryError>;
}

impl<T: Trajectory + ?Sized> Trajectory for &T {
    fn n_frames(&self) -> usize {
        (**self).n_frames()
    }

    fn n_atoms(&self) -> usize {
        (**self).n_atoms()
    }

    fn topology(&self) -> &Topology {
        (**self).topology()
    }

    fn frame(&self, index: usize) -> Result<Vec<Point3<f64>>, TrajectoryError> {
        (**self).frame(index)
    }
}
