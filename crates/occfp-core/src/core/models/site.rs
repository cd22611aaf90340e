use crate::core::io::dx::{DxFile, VolumeError};
use nalgebra::{Point3, Vector3};
use ndarray::ArrayView3;
use std::path::Path;
use thiserror::Error;

/// Errors raised while validating binding-site geometry.
///
/// Geometry is checked once, when a [`BindingSite`] is constructed; a site that
/// exists is always valid.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Binding site radius must be positive (got {0})")]
    NonPositiveRadius(f64),
    #[error("Grid spacing must be positive on every axis (got {0:?})")]
    NonPositiveSpacing([f64; 3]),
    #[error("Binding site {field} contains a non-finite value")]
    NonFiniteCoordinate { field: &'static str },
    #[error("Binding site {field} must have exactly 3 components (got {len})")]
    WrongDimension { field: &'static str, len: usize },
    #[error("Lattice for radius {radius} and spacing {spacing:?} has too many voxels to address")]
    LatticeTooLarge { radius: f64, spacing: [f64; 3] },
}

/// Largest voxel count a lattice may hold; one byte per voxel must fit in a `Vec`.
const MAX_VOXELS: usize = isize::MAX as usize;

/// A spherical region of interest and the regular voxel lattice laid over it.
///
/// The lattice covers the cube of side `2 * radius` centered on `center`.
/// Along each axis it holds `floor(2 * radius / spacing) + 1` voxel centers
/// placed symmetrically around `center`, so the middle voxel sits on the
/// center whenever the count is odd.
///
/// Every derived quantity is computed once in [`BindingSite::new`] from
/// `(center, radius, spacing)` and never changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingSite {
    center: Point3<f64>,
    radius: f64,
    spacing: Vector3<f64>,
    counts: [usize; 3],
    origin: Point3<f64>,
    upper_most_corner_coordinate: Point3<f64>,
    upper_most_corner_index: [usize; 3],
    size: usize,
    grid_x: Vec<f64>,
    grid_y: Vec<f64>,
    grid_z: Vec<f64>,
}

impl BindingSite {
    /// Builds a binding site and its lattice geometry.
    ///
    /// # Arguments
    ///
    /// * `center` - Center of the spherical region, in Angstroms.
    /// * `radius` - Radius of the region; sizes the lattice.
    /// * `spacing` - Voxel edge length along x, y and z.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if the radius or any spacing component is not
    /// strictly positive, if any input is NaN or infinite, or if the lattice
    /// would hold more voxels than can be addressed.
    pub fn new(
        center: Point3<f64>,
        radius: f64,
        spacing: Vector3<f64>,
    ) -> Result<Self, GeometryError> {
        if center.iter().any(|c| !c.is_finite()) {
            return Err(GeometryError::NonFiniteCoordinate { field: "center" });
        }
        if !radius.is_finite() {
            return Err(GeometryError::NonFiniteCoordinate { field: "radius" });
        }
        if spacing.iter().any(|s| !s.is_finite()) {
            return Err(GeometryError::NonFiniteCoordinate { field: "spacing" });
        }
        if radius <= 0.0 {
            return Err(GeometryError::NonPositiveRadius(radius));
        }
        if spacing.iter().any(|&s| s <= 0.0) {
            return Err(GeometryError::NonPositiveSpacing([spacing.x, spacing.y, spacing.z]));
        }

        let too_large = || GeometryError::LatticeTooLarge {
            radius,
            spacing: [spacing.x, spacing.y, spacing.z],
        };
        let mut counts = [0usize; 3];
        for (axis, count) in counts.iter_mut().enumerate() {
            let steps = (2.0 * radius / spacing[axis]).floor();
            if !steps.is_finite() || steps >= MAX_VOXELS as f64 {
                return Err(too_large());
            }
            *count = steps as usize + 1;
        }
        let size = counts
            .iter()
            .try_fold(1usize, |acc, &c| acc.checked_mul(c))
            .filter(|&size| size <= MAX_VOXELS)
            .ok_or_else(too_large)?;
        let half_extent = Vector3::from_fn(|axis, _| (counts[axis] - 1) as f64 * spacing[axis] / 2.0);
        let origin = center - half_extent;
        let upper_most_corner_coordinate = center + half_extent;
        let upper_most_corner_index = counts.map(|c| c - 1);

        let axis_coordinates = |axis: usize| -> Vec<f64> {
            (0..counts[axis])
                .map(|i| origin[axis] + i as f64 * spacing[axis])
                .collect()
        };

        Ok(Self {
            center,
            radius,
            spacing,
            counts,
            origin,
            upper_most_corner_coordinate,
            upper_most_corner_index,
            size,
            grid_x: axis_coordinates(0),
            grid_y: axis_coordinates(1),
            grid_z: axis_coordinates(2),
        })
    }

    /// Builds a binding site from untyped slices, checking that `center` and
    /// `spacing` both have three components.
    pub fn from_slices(center: &[f64], radius: f64, spacing: &[f64]) -> Result<Self, GeometryError> {
        let center: [f64; 3] = center.try_into().map_err(|_| GeometryError::WrongDimension {
            field: "center",
            len: center.len(),
        })?;
        let spacing: [f64; 3] = spacing.try_into().map_err(|_| GeometryError::WrongDimension {
            field: "spacing",
            len: spacing.len(),
        })?;
        Self::new(Point3::from(center), radius, Vector3::from(spacing))
    }

    pub fn center(&self) -> &Point3<f64> {
        &self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn spacing(&self) -> &Vector3<f64> {
        &self.spacing
    }

    /// Number of voxels along x, y and z.
    pub fn counts(&self) -> [usize; 3] {
        self.counts
    }

    /// Coordinate of the lowest voxel center.
    pub fn origin(&self) -> &Point3<f64> {
        &self.origin
    }

    /// Coordinate of the highest voxel center.
    pub fn upper_most_corner_coordinate(&self) -> &Point3<f64> {
        &self.upper_most_corner_coordinate
    }

    /// Zero-based index of the highest voxel, `counts - 1` on every axis.
    pub fn upper_most_corner_index(&self) -> [usize; 3] {
        self.upper_most_corner_index
    }

    /// Total number of voxels in the lattice.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Voxel-center coordinates along each axis.
    pub fn grid_coordinates(&self) -> (&[f64], &[f64], &[f64]) {
        (&self.grid_x, &self.grid_y, &self.grid_z)
    }

    /// Position of voxel `(ix, iy, iz)` in a flat occupancy vector.
    ///
    /// Flat vectors are laid out in C order over `(x, y, z)`, matching
    /// `Array3::from_shape_vec(counts, flat)`.
    #[inline]
    pub fn flat_index(&self, ix: usize, iy: usize, iz: usize) -> usize {
        (ix * self.counts[1] + iy) * self.counts[2] + iz
    }

    #[inline]
    pub fn voxel_center(&self, ix: usize, iy: usize, iz: usize) -> Point3<f64> {
        Point3::new(self.grid_x[ix], self.grid_y[iy], self.grid_z[iz])
    }

    /// Writes a volume shaped like this site's lattice as an OpenDX grid file,
    /// using the site's origin and spacing as placement metadata.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::ShapeMismatch`] if `volume` is not shaped
    /// `counts`, or [`VolumeError::Io`] if the file cannot be written.
    pub fn write<T, P>(&self, path: P, volume: ArrayView3<T>) -> Result<(), VolumeError>
    where
        T: Copy + Into<f64>,
        P: AsRef<Path>,
    {
        if volume.shape() != self.counts {
            return Err(VolumeError::ShapeMismatch {
                expected: self.counts,
                found: volume.shape().to_vec(),
            });
        }
        DxFile::write_to_path(
            path,
            &self.origin,
            &self.spacing,
            volume,
            "occupancy grid written by occupancy-fingerprinter",
        )
    }
}
