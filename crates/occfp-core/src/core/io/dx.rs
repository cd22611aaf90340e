use nalgebra::{Point3, Vector3};
use ndarray::{Array3, ArrayView3};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;

const VALUES_PER_LINE: usize = 3;
const MAX_RESERVED_ITEMS: usize = 1 << 20;

#[derive(Debug, Error)]
pub enum VolumeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Volume shape {found:?} does not match grid counts {expected:?}")]
    ShapeMismatch {
        expected: [usize; 3],
        found: Vec<usize>,
    },
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("Missing required record: {0}")]
    MissingRecord(&'static str),
}

/// A scalar volume on a regular, axis-aligned grid.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeGrid {
    pub origin: Point3<f64>,
    pub spacing: Vector3<f64>,
    /// Values indexed `[x, y, z]`.
    pub values: Array3<f64>,
}

impl VolumeGrid {
    pub fn counts(&self) -> [usize; 3] {
        let shape = self.values.shape();
        [shape[0], shape[1], shape[2]]
    }
}

/// OpenDX scalar-field files, the volumetric format read by VMD, PyMOL and Chimera.
///
/// Values are written with z varying fastest and x slowest, which is the
/// row-major order of an `[x, y, z]` array.
pub struct DxFile;

impl DxFile {
    pub fn write_to<T: Copy + Into<f64>>(
        writer: &mut impl Write,
        origin: &Point3<f64>,
        spacing: &Vector3<f64>,
        volume: ArrayView3<T>,
        comment: &str,
    ) -> Result<(), VolumeError> {
        let (nx, ny, nz) = volume.dim();
        writeln!(writer, "# {}", comment)?;
        writeln!(writer, "object 1 class gridpositions counts {} {} {}", nx, ny, nz)?;
        writeln!(writer, "origin {} {} {}", origin.x, origin.y, origin.z)?;
        writeln!(writer, "delta {} 0 0", spacing.x)?;
        writeln!(writer, "delta 0 {} 0", spacing.y)?;
        writeln!(writer, "delta 0 0 {}", spacing.z)?;
        writeln!(writer, "object 2 class gridconnections counts {} {} {}", nx, ny, nz)?;
        writeln!(
            writer,
            "object 3 class array type double rank 0 items {} data follows",
            nx * ny * nz
        )?;

        let mut count = 0;
        for &value in volume.iter() {
            let value: f64 = value.into();
            write!(writer, "{}", value)?;
            count += 1;
            if count % VALUES_PER_LINE == 0 {
                writeln!(writer)?;
            } else {
                write!(writer, " ")?;
            }
        }
        if count % VALUES_PER_LINE != 0 {
            writeln!(writer)?;
        }

        writeln!(writer, "attribute \"dep\" string \"positions\"")?;
        writeln!(writer, "object \"regular positions regular connections\" class field")?;
        writeln!(writer, "component \"positions\" value 1")?;
        writeln!(writer, "component \"connections\" value 2")?;
        writeln!(writer, "component \"data\" value 3")?;
        Ok(())
    }

    /// Writes a DX file next to `path` and renames it into place, so a failed
    /// write never leaves a truncated file behind.
    pub fn write_to_path<T: Copy + Into<f64>, P: AsRef<Path>>(
        path: P,
        origin: &Point3<f64>,
        spacing: &Vector3<f64>,
        volume: ArrayView3<T>,
        comment: &str,
    ) -> Result<(), VolumeError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            Self::write_to(&mut writer, origin, spacing, volume, comment)?;
            writer.flush()?;
        }
        tmp.persist(path).map_err(|e| VolumeError::Io(e.error))?;
        Ok(())
    }

    /// Parses a regular-grid OpenDX file.
    ///
    /// The declared item count only sizes the initial buffer up to a fixed cap;
    /// the data actually present is checked against the declared lattice.
    pub fn read_from(reader: &mut impl BufRead) -> Result<VolumeGrid, VolumeError> {
        let mut counts: Option<[usize; 3]> = None;
        let mut origin: Option<Point3<f64>> = None;
        let mut deltas: Vec<Vector3<f64>> = Vec::with_capacity(3);
        let mut expected_items: Option<usize> = None;
        let mut values: Vec<f64> = Vec::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if let Some(items) = expected_items {
                if values.len() < items {
                    for token in trimmed.split_whitespace() {
                        values.push(token.parse().map_err(|_| VolumeError::Parse {
                            line: line_num,
                            message: format!("invalid data value '{}'", token),
                        })?);
                    }
                    continue;
                }
            }

            let tokens: Vec<&str> = trimmed.split_whitespace().collect();
            match tokens.as_slice() {
                ["object", _, "class", "gridpositions", "counts", rest @ ..] => {
                    counts = Some(parse_counts(rest, line_num)?);
                }
                ["origin", rest @ ..] => {
                    let [x, y, z] = parse_triple(rest, line_num)?;
                    origin = Some(Point3::new(x, y, z));
                }
                ["delta", rest @ ..] => {
                    let [x, y, z] = parse_triple(rest, line_num)?;
                    deltas.push(Vector3::new(x, y, z));
                }
                ["object", _, "class", "array", ..] => {
                    let items = tokens
                        .iter()
                        .position(|&t| t == "items")
                        .and_then(|i| tokens.get(i + 1))
                        .and_then(|t| t.parse().ok())
                        .ok_or_else(|| VolumeError::Parse {
                            line: line_num,
                            message: "array object without an item count".into(),
                        })?;
                    expected_items = Some(items);
                    values.reserve(items.min(MAX_RESERVED_ITEMS));
                }
                _ => {}
            }
        }

        let counts = counts.ok_or(VolumeError::MissingRecord("gridpositions"))?;
        let origin = origin.ok_or(VolumeError::MissingRecord("origin"))?;
        if deltas.len() != 3 {
            return Err(VolumeError::MissingRecord("delta"));
        }
        let spacing = Vector3::new(deltas[0].x, deltas[1].y, deltas[2].z);
        let expected_items = expected_items.ok_or(VolumeError::MissingRecord("array"))?;
        let lattice_items = counts.iter().try_fold(1usize, |acc, &c| acc.checked_mul(c));
        if values.len() != expected_items || lattice_items != Some(expected_items) {
            return Err(VolumeError::ShapeMismatch {
                expected: counts,
                found: vec![values.len()],
            });
        }

        let values = Array3::from_shape_vec((counts[0], counts[1], counts[2]), values)
            .map_err(|_| VolumeError::ShapeMismatch {
                expected: counts,
                found: vec![expected_items],
            })?;
        Ok(VolumeGrid {
            origin,
            spacing,
            values,
        })
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<VolumeGrid, VolumeError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}

fn parse_counts(tokens: &[&str], line: usize) -> Result<[usize; 3], VolumeError> {
    match tokens {
        [x, y, z, ..] => {
            let parse = |t: &str| {
                t.parse::<usize>().map_err(|_| VolumeError::Parse {
                    line,
                    message: format!("invalid grid count '{}'", t),
                })
            };
            Ok([parse(x)?, parse(y)?, parse(z)?])
        }
        _ => Err(VolumeError::Parse {
            line,
            message: "expected three grid counts".into(),
        }),
    }
}

fn parse_triple(tokens: &[&str], line: usize) -> Result<[f64; 3], VolumeError> {
    match tokens {
        [x, y, z] => {
            let parse = |t: &str| {
                t.parse::<f64>().map_err(|_| VolumeError::Parse {
                    line,
                    message: format!("invalid number '{}'", t),
                })
            };
            Ok([parse(x)?, parse(y)?, parse(z)?])
        }
        _ => Err(VolumeError::Parse {
            line,
            message: format!("expected three numbers, found {}", tokens.len()),
        }),
    }
}
