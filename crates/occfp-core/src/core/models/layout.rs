use super::ids::SiteId;
use super::site::BindingSite;
use ndarray::{Array2, Array3, ArrayView1, ArrayView2, Axis, s};
use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Unknown {0}")]
    UnknownSite(SiteId),
    #[error("Frame {index} is out of range for a matrix of {n_frames} frame(s)")]
    FrameOutOfRange { index: usize, n_frames: usize },
    #[error("Matrix has {found} voxel columns but the sites cover {expected}")]
    ColumnMismatch { expected: usize, found: usize },
}

/// Column layout of a fingerprint matrix.
///
/// Each site owns a contiguous block of `site.size()` columns; blocks appear in
/// site insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FingerprintLayout {
    blocks: Vec<Range<usize>>,
    counts: Vec<[usize; 3]>,
}

impl FingerprintLayout {
    pub fn new(sites: &[BindingSite]) -> Self {
        let mut offset = 0;
        let mut blocks = Vec::with_capacity(sites.len());
        for site in sites {
            blocks.push(offset..offset + site.size());
            offset += site.size();
        }
        Self {
            blocks,
            counts: sites.iter().map(BindingSite::counts).collect(),
        }
    }

    /// Total number of voxel columns across all sites.
    pub fn total_voxels(&self) -> usize {
        self.blocks.last().map_or(0, |b| b.end)
    }

    pub fn n_sites(&self) -> usize {
        self.blocks.len()
    }

    pub fn columns(&self, site: SiteId) -> Result<Range<usize>, LayoutError> {
        self.blocks
            .get(site.index())
            .cloned()
            .ok_or(LayoutError::UnknownSite(site))
    }

    pub fn counts(&self, site: SiteId) -> Result<[usize; 3], LayoutError> {
        self.counts
            .get(site.index())
            .copied()
            .ok_or(LayoutError::UnknownSite(site))
    }

    fn check_columns(&self, matrix: &ArrayView2<u8>) -> Result<(), LayoutError> {
        if matrix.ncols() != self.total_voxels() {
            return Err(LayoutError::ColumnMismatch {
                expected: self.total_voxels(),
                found: matrix.ncols(),
            });
        }
        Ok(())
    }

    /// The `[frame, voxel]` block belonging to one site.
    pub fn site_block<'a>(
        &self,
        matrix: &'a Array2<u8>,
        site: SiteId,
    ) -> Result<ArrayView2<'a, u8>, LayoutError> {
        self.check_columns(&matrix.view())?;
        let columns = self.columns(site)?;
        Ok(matrix.slice(s![.., columns]))
    }

    /// One frame's occupancy for one site, reshaped to the site's `counts`.
    pub fn site_volume(
        &self,
        matrix: &Array2<u8>,
        frame: usize,
        site: SiteId,
    ) -> Result<Array3<u8>, LayoutError> {
        let block = self.site_block(matrix, site)?;
        if frame >= block.nrows() {
            return Err(LayoutError::FrameOutOfRange {
                index: frame,
                n_frames: block.nrows(),
            });
        }
        reshape(block.row(frame), self.counts(site)?)
    }

    /// Fraction of frames in which each voxel of `site` is occupied.
    ///
    /// A matrix without frames yields an all-zero volume.
    pub fn site_density(&self, matrix: &Array2<u8>, site: SiteId) -> Result<Array3<f64>, LayoutError> {
        let block = self.site_block(matrix, site)?;
        let [nx, ny, nz] = self.counts(site)?;
        let n_frames = block.nrows();
        if n_frames == 0 {
            return Ok(Array3::zeros((nx, ny, nz)));
        }
        let sums = block.mapv(u32::from).sum_axis(Axis(0));
        let density: Vec<f64> = sums.iter().map(|&c| c as f64 / n_frames as f64).collect();
        let width = density.len();
        Array3::from_shape_vec((nx, ny, nz), density).map_err(|_| LayoutError::ColumnMismatch {
            expected: nx * ny * nz,
            found: width,
        })
    }

    /// Number of occupied voxels per frame for one site.
    pub fn occupied_counts(&self, matrix: &Array2<u8>, site: SiteId) -> Result<Vec<usize>, LayoutError> {
        let block = self.site_block(matrix, site)?;
        Ok(block
            .rows()
            .into_iter()
            .map(|row| row.iter().filter(|&&v| v != 0).count())
            .collect())
    }
}

fn reshape(row: ArrayView1<u8>, [nx, ny, nz]: [usize; 3]) -> Result<Array3<u8>, LayoutError> {
    Array3::from_shape_vec((nx, ny, nz), row.to_vec()).map_err(|_| LayoutError::ColumnMismatch {
        expected: nx * ny * nz,
        found: row.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};
    use ndarray::array;

    fn sites() -> Vec<BindingSite> {
        vec![
            // 2 x 2 x 1 lattice
            BindingSite::new(Point3::origin(), 0.5, Vector3::new(1.0, 1.0, 2.0)).unwrap(),
            // 1 x 1 x 3 lattice
            BindingSite::new(Point3::origin(), 1.0, Vector3::new(5.0, 5.0, 1.0)).unwrap(),
        ]
    }

    fn matrix() -> Array2<u8> {
        array![
            [1, 0, 0, 1, 0, 1, 1],
            [1, 1, 0, 0, 0, 0, 1],
        ]
    }

    #[test]
    fn blocks_follow_insertion_order() {
        let layout = FingerprintLayout::new(&sites());
        assert_eq!(layout.n_sites(), 2);
        assert_eq!(layout.total_voxels(), 7);
        assert_eq!(layout.columns(SiteId(0)), Ok(0..4));
        assert_eq!(layout.columns(SiteId(1)), Ok(4..7));
        assert_eq!(layout.counts(SiteId(1)), Ok([1, 1, 3]));
        assert_eq!(
            layout.columns(SiteId(2)),
            Err(LayoutError::UnknownSite(SiteId(2)))
        );
    }

    #[test]
    fn site_volume_reshapes_one_frame() {
        let layout = FingerprintLayout::new(&sites());
        let volume = layout.site_volume(&matrix(), 0, SiteId(0)).unwrap();
        assert_eq!(volume.shape(), &[2, 2, 1]);
        assert_eq!(volume[[0, 0, 0]], 1);
        assert_eq!(volume[[1, 1, 0]], 1);
        assert_eq!(volume[[0, 1, 0]], 0);

        let second = layout.site_volume(&matrix(), 1, SiteId(1)).unwrap();
        assert_eq!(second, array![[[0u8, 0, 1]]]);
    }

    #[test]
    fn site_volume_rejects_bad_frame() {
        let layout = FingerprintLayout::new(&sites());
        assert_eq!(
            layout.site_volume(&matrix(), 2, SiteId(0)),
            Err(LayoutError::FrameOutOfRange {
                index: 2,
                n_frames: 2
            })
        );
    }

    #[test]
    fn site_density_averages_over_frames() {
        let layout = FingerprintLayout::new(&sites());
        let density = layout.site_density(&matrix(), SiteId(0)).unwrap();
        assert_eq!(density, array![[[1.0], [0.5]], [[0.0], [0.5]]]);
    }

    #[test]
    fn site_density_of_empty_matrix_is_zero() {
        let layout = FingerprintLayout::new(&sites());
        let density = layout
            .site_density(&Array2::zeros((0, 7)), SiteId(1))
            .unwrap();
        assert_eq!(density, Array3::<f64>::zeros((1, 1, 3)));
    }

    #[test]
    fn occupied_counts_per_frame() {
        let layout = FingerprintLayout::new(&sites());
        assert_eq!(layout.occupied_counts(&matrix(), SiteId(0)), Ok(vec![2, 2]));
        assert_eq!(layout.occupied_counts(&matrix(), SiteId(1)), Ok(vec![2, 1]));
    }

    #[test]
    fn matrix_with_wrong_width_is_rejected() {
        let layout = FingerprintLayout::new(&sites());
        let bad = Array2::zeros((1, 6));
        let result = layout.site_block(&bad, SiteId(0));
        assert_eq!(
            result.map(|b| b.to_owned()),
            Err(LayoutError::ColumnMismatch {
                expected: 7,
                found: 6
            })
        );
    }
}
