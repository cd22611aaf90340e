use crate::core::models::site::BindingSite;
use crate::engine::error::EngineError;
use itertools::iproduct;
use nalgebra::Point3;
use std::ops::RangeInclusive;

/// Computes the 0/1 occupancy of every voxel of `site` for one frame.
///
/// A voxel is occupied when its center lies inside or on the van der Waals
/// sphere of at least one atom, i.e. `|v - a|² <= r²`. The result has
/// `site.size()` entries in the C order of [`BindingSite::flat_index`].
///
/// Each atom only visits the voxels of its bounding index box, widened by one
/// voxel on both sides so rounding in the index arithmetic can never exclude
/// a voxel the predicate would accept.
///
/// # Errors
///
/// Returns [`EngineError::RadiiMismatch`] if `coordinates` and `radii` differ
/// in length.
pub fn occupancy(
    site: &BindingSite,
    coordinates: &[Point3<f64>],
    radii: &[f64],
) -> Result<Vec<u8>, EngineError> {
    if coordinates.len() != radii.len() {
        return Err(EngineError::RadiiMismatch {
            n_atoms: coordinates.len(),
            n_radii: radii.len(),
        });
    }

    let mut voxels = vec![0u8; site.size()];
    for (atom, &radius) in coordinates.iter().zip(radii) {
        let Some([xs, ys, zs]) = index_box(site, atom, radius) else {
            continue;
        };
        let cutoff_sq = radius * radius;
        for (ix, iy, iz) in iproduct!(xs, ys, zs) {
            if (site.voxel_center(ix, iy, iz) - atom).norm_squared() <= cutoff_sq {
                voxels[site.flat_index(ix, iy, iz)] = 1;
            }
        }
    }
    Ok(voxels)
}

/// Inclusive voxel index ranges along x, y and z that may lie within `radius`
/// of `atom`, or `None` if the atom cannot touch the lattice.
fn index_box(
    site: &BindingSite,
    atom: &Point3<f64>,
    radius: f64,
) -> Option<[RangeInclusive<usize>; 3]> {
    if !radius.is_finite() || radius < 0.0 {
        return None;
    }
    let counts = site.counts();
    let mut ranges = [0..=0, 0..=0, 0..=0];
    for axis in 0..3 {
        let origin = site.origin()[axis];
        let spacing = site.spacing()[axis];
        let lo = ((atom[axis] - radius - origin) / spacing).floor() - 1.0;
        let hi = ((atom[axis] + radius - origin) / spacing).ceil() + 1.0;
        // NaN coordinates fail both comparisons and are skipped here.
        if !(hi >= 0.0 && lo <= (counts[axis] - 1) as f64) {
            return None;
        }
        let lo = lo.max(0.0) as usize;
        let hi = (hi as usize).min(counts[axis] - 1);
        ranges[axis] = lo..=hi;
    }
    Some(ranges)
}
