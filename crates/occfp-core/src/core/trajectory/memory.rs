use super::traits::{Trajectory, TrajectoryError};
use crate::core::models::topology::Topology;
use nalgebra::Point3;
use std::ops::Range;

/// A trajectory held entirely in memory.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InMemoryTrajectory {
    topology: Topology,
    frames: Vec<Vec<Point3<f64>>>,
}

impl InMemoryTrajectory {
    /// Creates a trajectory after checking every frame against the topology.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::AtomCountMismatch`] for the first frame whose
    /// length differs from the topology's atom count.
    pub fn new(topology: Topology, frames: Vec<Vec<Point3<f64>>>) -> Result<Self, TrajectoryError> {
        let expected = topology.n_atoms();
        if let Some((frame, coords)) = frames
            .iter()
            .enumerate()
            .find(|(_, coords)| coords.len() != expected)
        {
            return Err(TrajectoryError::AtomCountMismatch {
                frame,
                expected,
                found: coords.len(),
            });
        }
        Ok(Self { topology, frames })
    }

    /// Copies the frames in `range` into a new trajectory with the same topology.
    ///
    /// The range is clamped to the available frames.
    pub fn slice(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.frames.len());
        let start = range.start.min(end);
        Self {
            topology: self.topology.clone(),
            frames: self.frames[start..end].to_vec(),
        }
    }

    pub fn push_frame(&mut self, coords: Vec<Point3<f64>>) -> Result<(), TrajectoryError> {
        if coords.len() != self.topology.n_atoms() {
            return Err(TrajectoryError::AtomCountMismatch {
                frame: self.frames.len(),
                expected: self.topology.n_atoms(),
                found: coords.len(),
            });
        }
        self.frames.push(coords);
        Ok(())
    }

    pub fn frames(&self) -> &[Vec<Point3<f64>>] {
        &self.frames
    }
}

impl Trajectory for InMemoryTrajectory {
    fn n_frames(&self) -> usize {
        self.frames.len()
    }

    fn topology(&self) -> &Topology {
        &self.topology
    }

    fn frame(&self, index: usize) -> Result<Vec<Point3<f64>>, TrajectoryError> {
        self.frames
            .get(index)
            .cloned()
            .ok_or(TrajectoryError::FrameOutOfRange {
                index,
                n_frames: self.frames.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::topology::TopologyAtom;

    fn two_atom_topology() -> Topology {
        Topology::new(vec![
            TopologyAtom::new(1, "C1", "LIG", 1),
            TopologyAtom::new(2, "O1", "LIG", 1),
        ])
    }

    fn frame(offset: f64) -> Vec<Point3<f64>> {
        vec![
            Point3::new(offset, 0.0, 0.0),
            Point3::new(offset + 1.2, 0.0, 0.0),
        ]
    }

    #[test]
    fn new_accepts_consistent_frames() {
        let traj =
            InMemoryTrajectory::new(two_atom_topology(), vec![frame(0.0), frame(1.0)]).unwrap();
        assert_eq!(traj.n_frames(), 2);
        assert_eq!(traj.n_atoms(), 2);
        assert_eq!(traj.frame(1).unwrap(), frame(1.0));
    }

    #[test]
    fn new_rejects_frame_with_wrong_atom_count() {
        let result = InMemoryTrajectory::new(
            two_atom_topology(),
            vec![frame(0.0), vec![Point3::origin()]],
        );
        assert!(matches!(
            result,
            Err(TrajectoryError::AtomCountMismatch {
                frame: 1,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn frame_out_of_range_is_an_error() {
        let traj = InMemoryTrajectory::new(two_atom_topology(), vec![frame(0.0)]).unwrap();
        assert!(matches!(
            traj.frame(3),
            Err(TrajectoryError::FrameOutOfRange {
                index: 3,
                n_frames: 1
            })
        ));
    }

    #[test]
    fn slice_keeps_topology_and_clamps_range() {
        let traj = InMemoryTrajectory::new(
            two_atom_topology(),
            vec![frame(0.0), frame(1.0), frame(2.0)],
        )
        .unwrap();

        let first = traj.slice(0..1);
        assert_eq!(first.n_frames(), 1);
        assert_eq!(first.topology(), traj.topology());
        assert_eq!(first.frame(0).unwrap(), frame(0.0));

        let tail = traj.slice(2..10);
        assert_eq!(tail.n_frames(), 1);
        assert_eq!(traj.slice(5..9).n_frames(), 0);
    }

    #[test]
    fn push_frame_validates_atom_count() {
        let mut traj = InMemoryTrajectory::new(two_atom_topology(), Vec::new()).unwrap();
        traj.push_frame(frame(0.0)).unwrap();
        assert!(traj.push_frame(vec![Point3::origin()]).is_err());
        assert_eq!(traj.frames().len(), 1);
    }
}
