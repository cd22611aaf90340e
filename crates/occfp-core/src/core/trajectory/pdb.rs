use super::traits::{Trajectory, TrajectoryError};
use crate::core::models::topology::{Topology, TopologyAtom};
use nalgebra::Point3;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn parse_coordinate(line: &str, start: usize, end: usize, line_num: usize) -> Result<f64, TrajectoryError> {
    let field = slice_and_trim(line, start, end);
    field.parse().map_err(|_| TrajectoryError::Parse {
        line: line_num,
        message: format!(
            "invalid coordinate in columns {}-{} (value: '{}')",
            start + 1,
            end,
            field
        ),
    })
}

/// A trajectory stored as a (possibly multi-`MODEL`) PDB file.
///
/// Each `MODEL`/`ENDMDL` block is one frame; a file without `MODEL` records is
/// a single frame. The topology is taken from the first frame and every later
/// frame must list the same number of atoms. The whole file is parsed up front.
#[derive(Debug, Clone, PartialEq)]
pub struct PdbTrajectory {
    topology: Topology,
    frames: Vec<Vec<Point3<f64>>>,
}

impl PdbTrajectory {
    pub fn read_from(reader: &mut impl BufRead) -> Result<Self, TrajectoryError> {
        let mut atoms: Vec<TopologyAtom> = Vec::new();
        let mut frames: Vec<Vec<Point3<f64>>> = Vec::new();
        let mut current: Vec<Point3<f64>> = Vec::new();
        let mut in_model = false;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let record_type = slice_and_trim(&line, 0, 6);

            match record_type {
                "MODEL" => {
                    if !current.is_empty() {
                        frames.push(std::mem::take(&mut current));
                    }
                    in_model = true;
                }
                "ENDMDL" => {
                    frames.push(std::mem::take(&mut current));
                    in_model = false;
                }
                "ATOM" | "HETATM" => {
                    if line.len() < 54 {
                        return Err(TrajectoryError::Parse {
                            line: line_num,
                            message: "ATOM/HETATM record is shorter than 54 columns".into(),
                        });
                    }
                    let position = Point3::new(
                        parse_coordinate(&line, 30, 38, line_num)?,
                        parse_coordinate(&line, 38, 46, line_num)?,
                        parse_coordinate(&line, 46, 54, line_num)?,
                    );

                    if frames.is_empty() {
                        atoms.push(parse_topology_atom(&line, line_num)?);
                    } else if current.len() >= atoms.len() {
                        return Err(TrajectoryError::AtomCountMismatch {
                            frame: frames.len(),
                            expected: atoms.len(),
                            found: current.len() + 1,
                        });
                    }
                    current.push(position);
                }
                "END" if !in_model => break,
                _ => {}
            }
        }

        if !current.is_empty() {
            frames.push(current);
        }
        if atoms.is_empty() {
            return Err(TrajectoryError::Empty);
        }
        for (index, frame) in frames.iter().enumerate() {
            if frame.len() != atoms.len() {
                return Err(TrajectoryError::AtomCountMismatch {
                    frame: index,
                    expected: atoms.len(),
                    found: frame.len(),
                });
            }
        }

        debug!(
            n_atoms = atoms.len(),
            n_frames = frames.len(),
            "Parsed PDB trajectory."
        );

        Ok(Self {
            topology: Topology::new(atoms),
            frames,
        })
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, TrajectoryError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}

fn parse_topology_atom(line: &str, line_num: usize) -> Result<TopologyAtom, TrajectoryError> {
    let serial_str = slice_and_trim(line, 6, 11);
    let serial = serial_str.parse().map_err(|_| TrajectoryError::Parse {
        line: line_num,
        message: format!("invalid atom serial in columns 7-11 (value: '{}')", serial_str),
    })?;
    let name = slice_and_trim(line, 12, 16);
    if name.is_empty() {
        return Err(TrajectoryError::Parse {
            line: line_num,
            message: "atom name in columns 13-16 is empty".into(),
        });
    }
    let residue_name = slice_and_trim(line, 17, 20);
    let residue_number = slice_and_trim(line, 22, 26).parse().unwrap_or(0);

    let mut atom = TopologyAtom::new(serial, name, residue_name, residue_number);
    atom.chain_id = slice_and_trim(line, 21, 22).chars().next().unwrap_or('A');

    let element = slice_and_trim(line, 76, 78);
    if !element.is_empty() {
        atom = atom.with_element(element);
    }
    Ok(atom)
}

impl Trajectory for PdbTrajectory {
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
    use std::io::Cursor;

    const SINGLE_MODEL: &str = "\
REMARK test structure
ATOM      1  N   GLY A   1      10.000  11.000  12.000  1.00  0.00           N
ATOM      2  CA  GLY A   1      11.000  11.000  12.000  1.00  0.00           C
HETATM    3 ZN   ZN  B 101      20.500  21.250  22.125  1.00  0.00          ZN
END
";

    const TWO_MODELS: &str = "\
MODEL        1
ATOM      1  N   GLY A   1       0.000   0.000   0.000  1.00  0.00           N
ATOM      2  CA  GLY A   1       1.000   0.000   0.000  1.00  0.00           C
ENDMDL
MODEL        2
ATOM      1  N   GLY A   1       0.500   0.000   0.000  1.00  0.00           N
ATOM      2  CA  GLY A   1       1.500   0.000   0.000  1.00  0.00           C
ENDMDL
END
";

    fn parse(text: &str) -> Result<PdbTrajectory, TrajectoryError> {
        PdbTrajectory::read_from(&mut Cursor::new(text))
    }

    #[test]
    fn single_model_file_is_one_frame() {
        let traj = parse(SINGLE_MODEL).unwrap();
        assert_eq!(traj.n_frames(), 1);
        assert_eq!(traj.n_atoms(), 3);
        assert_eq!(
            traj.frame(0).unwrap()[2],
            Point3::new(20.5, 21.25, 22.125)
        );
    }

    #[test]
    fn topology_reads_names_residues_and_elements() {
        let traj = parse(SINGLE_MODEL).unwrap();
        let atoms = traj.topology().atoms();
        assert_eq!(atoms[1].name, "CA");
        assert_eq!(atoms[1].residue_name, "GLY");
        assert_eq!(atoms[1].residue_number, 1);
        assert_eq!(atoms[1].chain_id, 'A');
        assert_eq!(atoms[1].element.as_deref(), Some("C"));
        assert_eq!(atoms[2].element.as_deref(), Some("ZN"));
        assert_eq!(atoms[2].chain_id, 'B');
        assert_eq!(traj.topology().atom_radii(), vec![1.55, 1.70, 1.39]);
    }

    #[test]
    fn element_is_inferred_when_column_is_missing() {
        let text = "ATOM      1  OG1 THR A   7       1.000   2.000   3.000\n";
        let traj = parse(text).unwrap();
        assert_eq!(traj.topology().atoms()[0].element.as_deref(), Some("O"));
    }

    #[test]
    fn models_become_frames_in_file_order() {
        let traj = parse(TWO_MODELS).unwrap();
        assert_eq!(traj.n_frames(), 2);
        assert_eq!(traj.n_atoms(), 2);
        assert_eq!(traj.frame(0).unwrap()[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(traj.frame(1).unwrap()[1], Point3::new(1.5, 0.0, 0.0));
    }

    #[test]
    fn model_with_extra_atoms_is_rejected() {
        let text = TWO_MODELS.replace(
            "ENDMDL\nEND",
            "ATOM      3  C   GLY A   1       2.000   0.000   0.000  1.00  0.00           C\nENDMDL\nEND",
        );
        assert!(matches!(
            parse(&text),
            Err(TrajectoryError::AtomCountMismatch { frame: 1, .. })
        ));
    }

    #[test]
    fn model_with_missing_atoms_is_rejected() {
        let text = "\
MODEL        1
ATOM      1  N   GLY A   1       0.000   0.000   0.000
ATOM      2  CA  GLY A   1       1.000   0.000   0.000
ENDMDL
MODEL        2
ATOM      1  N   GLY A   1       0.500   0.000   0.000
ENDMDL
";
        assert!(matches!(
            parse(text),
            Err(TrajectoryError::AtomCountMismatch {
                frame: 1,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn malformed_coordinate_reports_line_number() {
        let text = "REMARK\nATOM      1  N   GLY A   1       abc     0.000   0.000\n";
        assert!(matches!(
            parse(text),
            Err(TrajectoryError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn file_without_atoms_is_empty_error() {
        assert!(matches!(parse("REMARK nothing\nEND\n"), Err(TrajectoryError::Empty)));
    }

    #[test]
    fn read_from_path_propagates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = PdbTrajectory::read_from_path(dir.path().join("missing.pdb"));
        assert!(matches!(result, Err(TrajectoryError::Io(_))));
    }
}
