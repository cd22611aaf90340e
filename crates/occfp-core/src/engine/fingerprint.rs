use crate::core::models::site::BindingSite;
use crate::core::trajectory::Trajectory;
use crate::engine::error::EngineError;
use crate::engine::kernel;
use crate::engine::progress::{Progress, ProgressReporter};
use nalgebra::Point3;
use ndarray::Array2;
use std::ops::Range;
use tracing::{debug, instrument, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Computes the fingerprint matrix of `trajectory` sequentially.
///
/// Row `i` is frame `i`; the columns hold each site's occupancy vector in
/// site order. This is the reference computation: the orchestrated and
/// parallel paths produce exactly the same matrix.
pub fn process_trajectory<T>(
    trajectory: &T,
    sites: &[BindingSite],
    atom_radii: &[f64],
) -> Result<Array2<u8>, EngineError>
where
    T: Trajectory + ?Sized,
{
    compute(trajectory, sites, atom_radii, 1, &ProgressReporter::new())
}

/// Concatenated occupancy of every site for one frame's coordinates.
pub fn fingerprint_frame(
    sites: &[BindingSite],
    coordinates: &[Point3<f64>],
    atom_radii: &[f64],
) -> Result<Vec<u8>, EngineError> {
    let mut row = Vec::with_capacity(sites.iter().map(BindingSite::size).sum());
    for site in sites {
        row.extend(kernel::occupancy(site, coordinates, atom_radii)?);
    }
    Ok(row)
}

/// Number of workers used for `n_tasks` requested over `n_frames` frames.
///
/// Requests of one task or fewer run sequentially. Larger requests are capped
/// by the frame count and by the parallelism the host reports.
pub fn worker_count(n_tasks: i64, n_frames: usize) -> usize {
    if n_tasks <= 1 || n_frames <= 1 {
        return 1;
    }
    let available = std::thread::available_parallelism().map_or(1, |n| n.get());
    usize::try_from(n_tasks)
        .unwrap_or(usize::MAX)
        .min(n_frames)
        .min(available)
        .max(1)
}

/// Splits `0..n_frames` into `workers` contiguous ranges whose lengths differ
/// by at most one.
pub(crate) fn chunk_ranges(n_frames: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.clamp(1, n_frames.max(1));
    let base = n_frames / workers;
    let extra = n_frames % workers;
    let mut start = 0;
    (0..workers)
        .map(|i| {
            let len = base + usize::from(i < extra);
            let range = start..start + len;
            start += len;
            range
        })
        .collect()
}

/// Computes the fingerprint matrix with up to `n_tasks` workers.
///
/// The first failing frame aborts the computation; its error is returned.
#[instrument(skip_all, name = "fingerprint_engine")]
pub fn compute<T>(
    trajectory: &T,
    sites: &[BindingSite],
    atom_radii: &[f64],
    n_tasks: i64,
    reporter: &ProgressReporter,
) -> Result<Array2<u8>, EngineError>
where
    T: Trajectory + ?Sized,
{
    let n_frames = trajectory.n_frames();
    let n_atoms = trajectory.n_atoms();
    if atom_radii.len() != n_atoms {
        return Err(EngineError::RadiiMismatch {
            n_atoms,
            n_radii: atom_radii.len(),
        });
    }
    let width: usize = sites.iter().map(BindingSite::size).sum();

    let workers = worker_count(n_tasks, n_frames);
    debug!(
        requested = n_tasks,
        workers, n_frames, n_atoms, width, "Scheduling fingerprint computation."
    );

    reporter.report(Progress::FramesStart {
        total_frames: n_frames as u64,
        n_sites: sites.len(),
        voxels_per_frame: width,
    });
    let rows = if workers > 1 {
        compute_parallel(trajectory, sites, atom_radii, workers, reporter)?
    } else {
        compute_range(trajectory, sites, atom_radii, 0..n_frames, reporter)?
    };
    reporter.report(Progress::FramesFinish);

    assemble(rows, n_frames, width)
}

fn compute_range<T>(
    trajectory: &T,
    sites: &[BindingSite],
    atom_radii: &[f64],
    frames: Range<usize>,
    reporter: &ProgressReporter,
) -> Result<Vec<Vec<u8>>, EngineError>
where
    T: Trajectory + ?Sized,
{
    frames
        .map(|frame| {
            let coordinates = trajectory
                .frame(frame)
                .map_err(|source| EngineError::TrajectoryRead { frame, source })?;
            let row = fingerprint_frame(sites, &coordinates, atom_radii)?;
            let occupied = row.iter().filter(|&&v| v != 0).count() as u64;
            trace!(frame, occupied, "Frame processed.");
            reporter.report(Progress::FrameDone { occupied });
            Ok(row)
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn compute_parallel<T>(
    trajectory: &T,
    sites: &[BindingSite],
    atom_radii: &[f64],
    workers: usize,
    reporter: &ProgressReporter,
) -> Result<Vec<Vec<u8>>, EngineError>
where
    T: Trajectory + ?Sized,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| EngineError::ThreadPool(e.to_string()))?;
    let chunks = chunk_ranges(trajectory.n_frames(), workers);

    let per_chunk: Vec<Vec<Vec<u8>>> = pool.install(|| {
        chunks
            .into_par_iter()
            .map(|frames| compute_range(trajectory, sites, atom_radii, frames, reporter))
            .collect::<Result<_, _>>()
    })?;
    Ok(per_chunk.into_iter().flatten().collect())
}

#[cfg(not(feature = "parallel"))]
fn compute_parallel<T>(
    trajectory: &T,
    sites: &[BindingSite],
    atom_radii: &[f64],
    workers: usize,
    reporter: &ProgressReporter,
) -> Result<Vec<Vec<u8>>, EngineError>
where
    T: Trajectory + ?Sized,
{
    debug!(
        workers,
        "Built without the `parallel` feature; processing frames sequentially."
    );
    compute_range(trajectory, sites, atom_radii, 0..trajectory.n_frames(), reporter)
}

fn assemble(rows: Vec<Vec<u8>>, n_frames: usize, width: usize) -> Result<Array2<u8>, EngineError> {
    if rows.len() != n_frames {
        return Err(EngineError::Internal(format!(
            "expected {n_frames} fingerprint rows, got {}",
            rows.len()
        )));
    }
    let flat: Vec<u8> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_frames, width), flat)
        .map_err(|e| EngineError::Internal(format!("fingerprint rows have inconsistent width: {e}")))
}
