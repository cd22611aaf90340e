use crate::core::io::store::FingerprintStore;
use crate::core::models::ids::SiteId;
use crate::core::models::layout::FingerprintLayout;
use crate::core::models::site::{BindingSite, GeometryError};
use crate::core::trajectory::Trajectory;
use crate::engine::config::{FingerprintConfig, FingerprintConfigBuilder};
use crate::engine::error::EngineError;
use crate::engine::fingerprint;
use crate::engine::progress::{Progress, ProgressReporter};
use nalgebra::{Point3, Vector3};
use ndarray::Array2;
use std::path::Path;
use tracing::{info, instrument, warn};

/// A set of binding sites observed over one trajectory.
///
/// The grid borrows the trajectory for its whole lifetime and caches the
/// per-atom radius table once, at construction. Sites are numbered in the
/// order they are added, starting at zero, and are never removed.
pub struct Grid<'a, T: Trajectory + ?Sized> {
    trajectory: &'a T,
    atom_radii: Vec<f64>,
    sites: Vec<BindingSite>,
}

impl<'a, T: Trajectory + ?Sized> Grid<'a, T> {
    /// Creates an empty grid using the topology's van der Waals radii.
    pub fn new(trajectory: &'a T) -> Self {
        let atom_radii = trajectory.topology().atom_radii();
        Self::from_parts(trajectory, atom_radii)
    }

    /// Like [`Grid::new`], with `default_radius` for atoms of unknown element.
    pub fn with_default_radius(trajectory: &'a T, default_radius: f64) -> Self {
        let atom_radii = trajectory
            .topology()
            .atom_radii_with_default(default_radius);
        Self::from_parts(trajectory, atom_radii)
    }

    /// Creates an empty grid with an explicit radius per atom.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RadiiMismatch`] if `atom_radii` does not have one
    /// entry per trajectory atom.
    pub fn with_atom_radii(trajectory: &'a T, atom_radii: Vec<f64>) -> Result<Self, EngineError> {
        if atom_radii.len() != trajectory.n_atoms() {
            return Err(EngineError::RadiiMismatch {
                n_atoms: trajectory.n_atoms(),
                n_radii: atom_radii.len(),
            });
        }
        Ok(Self::from_parts(trajectory, atom_radii))
    }

    fn from_parts(trajectory: &'a T, atom_radii: Vec<f64>) -> Self {
        Self {
            trajectory,
            atom_radii,
            sites: Vec::new(),
        }
    }

    /// Adds a binding site and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if the geometry is invalid; the grid is left
    /// unchanged in that case.
    pub fn add_binding_site(
        &mut self,
        center: Point3<f64>,
        radius: f64,
        spacing: Vector3<f64>,
    ) -> Result<SiteId, GeometryError> {
        let site = BindingSite::new(center, radius, spacing)?;
        Ok(self.push_site(site))
    }

    /// Adds an already constructed binding site.
    pub fn push_site(&mut self, site: BindingSite) -> SiteId {
        let id = SiteId(self.sites.len());
        self.sites.push(site);
        id
    }

    pub fn site(&self, id: SiteId) -> Option<&BindingSite> {
        self.sites.get(id.index())
    }

    pub fn sites(&self) -> &[BindingSite] {
        &self.sites
    }

    pub fn n_sites(&self) -> usize {
        self.sites.len()
    }

    pub fn atom_radii(&self) -> &[f64] {
        &self.atom_radii
    }

    pub fn trajectory(&self) -> &'a T {
        self.trajectory
    }

    /// Column layout of the matrices this grid produces.
    pub fn layout(&self) -> FingerprintLayout {
        FingerprintLayout::new(&self.sites)
    }

    /// Computes the fingerprint of every frame.
    ///
    /// # Arguments
    ///
    /// * `output` - If set, the matrix is stored there under the `"frames"` record.
    /// * `n_tasks` - Requested parallelism. Values `<= 1` run sequentially;
    ///   larger values are capped by the frame count and the host's cores.
    /// * `return_array` - Whether to return the matrix.
    ///
    /// # Return
    ///
    /// The `[n_frames, total_voxels]` matrix when `return_array` is set,
    /// otherwise `None`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TrajectoryRead`] for the first frame that fails
    /// to load, or [`EngineError::Store`] if the output cannot be written.
    pub fn cal_fingerprint(
        &self,
        output: Option<&Path>,
        n_tasks: i64,
        return_array: bool,
    ) -> Result<Option<Array2<u8>>, EngineError> {
        let mut builder = FingerprintConfigBuilder::new()
            .n_tasks(n_tasks)
            .return_array(return_array);
        if let Some(path) = output {
            builder = builder.output_path(path.to_path_buf());
        }
        self.run(&builder.build()?, &ProgressReporter::new())
    }

    /// Computes the fingerprint as configured, reporting progress to `reporter`.
    #[instrument(skip_all, name = "fingerprint_workflow")]
    pub fn run(
        &self,
        config: &FingerprintConfig,
        reporter: &ProgressReporter,
    ) -> Result<Option<Array2<u8>>, EngineError> {
        info!(
            n_frames = self.trajectory.n_frames(),
            n_sites = self.n_sites(),
            n_tasks = config.n_tasks,
            "Starting occupancy fingerprint computation."
        );
        if self.sites.is_empty() {
            warn!("No binding sites defined; the fingerprint will have no columns.");
        }
        if config.output_path.is_none() && !config.return_array {
            warn!("No output path and no returned array; the fingerprint will be discarded.");
        }

        reporter.report(Progress::PhaseStart {
            name: "Fingerprinting",
        });
        let matrix = fingerprint::compute(
            self.trajectory,
            &self.sites,
            &self.atom_radii,
            config.n_tasks,
            reporter,
        )?;
        reporter.report(Progress::PhaseFinish);

        if let Some(path) = &config.output_path {
            reporter.report(Progress::PhaseStart { name: "Saving" });
            FingerprintStore::write_frames(path, &matrix)?;
            reporter.report(Progress::PhaseFinish);
            reporter.report(Progress::Saved { path: path.clone() });
            info!(path = %path.display(), "Fingerprint matrix saved.");
        }

        info!(
            n_frames = matrix.nrows(),
            n_voxels = matrix.ncols(),
            occupied = matrix.iter().filter(|&&v| v != 0).count(),
            "Fingerprint computation complete."
        );
        Ok(config.return_array.then_some(matrix))
    }
}
