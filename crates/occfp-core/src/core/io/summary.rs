use crate::core::models::ids::SiteId;
use crate::core::models::layout::{FingerprintLayout, LayoutError};
use ndarray::Array2;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Occupancy statistics of one site in one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteFrameSummary {
    pub frame: usize,
    pub site: usize,
    pub occupied: usize,
    pub total: usize,
    pub fraction: f64,
}

/// Computes one summary row per frame and site, frames outermost.
pub fn summarize(
    matrix: &Array2<u8>,
    layout: &FingerprintLayout,
) -> Result<Vec<SiteFrameSummary>, LayoutError> {
    let mut per_site = Vec::with_capacity(layout.n_sites());
    for index in 0..layout.n_sites() {
        let site = SiteId(index);
        let total = layout.columns(site)?.len();
        per_site.push((total, layout.occupied_counts(matrix, site)?));
    }

    let mut rows = Vec::with_capacity(matrix.nrows() * layout.n_sites());
    for frame in 0..matrix.nrows() {
        for (site, (total, counts)) in per_site.iter().enumerate() {
            let occupied = counts[frame];
            rows.push(SiteFrameSummary {
                frame,
                site,
                occupied,
                total: *total,
                fraction: if *total == 0 {
                    0.0
                } else {
                    occupied as f64 / *total as f64
                },
            });
        }
    }
    Ok(rows)
}

pub fn write_summary_to(
    writer: impl Write,
    matrix: &Array2<u8>,
    layout: &FingerprintLayout,
) -> Result<(), SummaryError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in summarize(matrix, layout)? {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_summary<P: AsRef<Path>>(
    path: P,
    matrix: &Array2<u8>,
    layout: &FingerprintLayout,
) -> Result<(), SummaryError> {
    let file = std::fs::File::create(path)?;
    write_summary_to(file, matrix, layout)
}
