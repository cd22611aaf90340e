use ndarray::{Array2, ArrayD, Ix2, IxDyn, OwnedRepr};
use ndarray_npy::{NpzReader, NpzWriter, ReadNpzError, WriteNpzError};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Name of the record holding the `[frame, voxel]` fingerprint matrix.
pub const FRAMES_RECORD: &str = "frames";

const NPY_SUFFIX: &str = ".npy";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to read array archive: {0}")]
    Read(#[from] ReadNpzError),
    #[error("Failed to write array archive: {0}")]
    Write(#[from] WriteNpzError),
    #[error("Missing record: '{0}'")]
    MissingRecord(String),
    #[error("Record '{name}' has shape {shape:?}, expected {expected} dimension(s)")]
    Shape {
        name: String,
        shape: Vec<usize>,
        expected: usize,
    },
}

/// An ordered collection of named `u8` arrays persisted as a NumPy `.npz`
/// archive, one `<name>.npy` member per record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayContainer {
    records: Vec<(String, ArrayD<u8>)>,
}

impl ArrayContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a record, keeping the position of a replaced record.
    pub fn insert(&mut self, name: &str, array: ArrayD<u8>) {
        match self.records.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = array,
            None => self.records.push((name.to_string(), array)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ArrayD<u8>> {
        self.records
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, array)| array)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W, StoreError> {
        let mut npz = NpzWriter::new(writer);
        for (name, array) in &self.records {
            npz.add_array(name.as_str(), array)?;
        }
        Ok(npz.finish()?)
    }

    /// Writes the archive to a temporary file beside `path` and renames it
    /// over `path`, creating or replacing it.
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let tmp = NamedTempFile::new_in(dir)?;
        let mut writer = self.write_to(BufWriter::new(tmp.as_file()))?;
        writer.flush()?;
        drop(writer);
        tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    /// Reads every member of an `.npz` archive. Members must hold `u8` data.
    pub fn read_from<R: Read + Seek>(reader: R) -> Result<Self, StoreError> {
        let mut npz = NpzReader::new(reader)?;
        let names = npz.names()?;
        let mut container = Self::new();
        for (index, name) in names.into_iter().enumerate() {
            let array = npz.by_index::<OwnedRepr<u8>, IxDyn>(index)?;
            let name = name.strip_suffix(NPY_SUFFIX).unwrap_or(&name).to_string();
            container.records.push((name, array));
        }
        Ok(container)
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }
}

/// Persists fingerprint matrices under the [`FRAMES_RECORD`] key.
pub struct FingerprintStore;

impl FingerprintStore {
    /// Creates or overwrites `path` with an archive holding only the
    /// `"frames"` record (`np.load(path)["frames"]` on the Python side).
    pub fn write_frames<P: AsRef<Path>>(path: P, frames: &Array2<u8>) -> Result<(), StoreError> {
        let mut container = ArrayContainer::new();
        container.insert(FRAMES_RECORD, frames.clone().into_dyn());
        container.write_to_path(path)
    }

    /// Reads the `"frames"` record back as a two-dimensional matrix.
    pub fn read_frames<P: AsRef<Path>>(path: P) -> Result<Array2<u8>, StoreError> {
        let container = ArrayContainer::read_from_path(path)?;
        let frames = container
            .get(FRAMES_RECORD)
            .ok_or_else(|| StoreError::MissingRecord(FRAMES_RECORD.to_string()))?;
        frames
            .clone()
            .into_dimensionality::<Ix2>()
            .map_err(|_| StoreError::Shape {
                name: FRAMES_RECORD.to_string(),
                shape: frames.shape().to_vec(),
                expected: 2,
            })
    }
}
