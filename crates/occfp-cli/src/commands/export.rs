use crate::cli::ExportArgs;
use crate::config;
use crate::error::{CliError, Result};
use occupancy_fingerprinter::core::{
    io::store::FingerprintStore,
    models::{ids::SiteId, layout::FingerprintLayout},
};
use tracing::info;

pub fn run(args: ExportArgs) -> Result<()> {
    let sites = config::load_sites(&args.sites)?;
    let site_id = SiteId(args.site);
    let site = sites.get(site_id.index()).ok_or_else(|| {
        CliError::Argument(format!(
            "{} does not exist; {:?} defines {} site(s)",
            site_id,
            &args.sites,
            sites.len()
        ))
    })?;

    info!("Reading fingerprint store from {:?}", &args.store);
    let matrix = FingerprintStore::read_frames(&args.store).map_err(|e| CliError::FileParsing {
        path: args.store.clone(),
        source: e.into(),
    })?;
    let layout = FingerprintLayout::new(&sites);
    let to_argument_error = |e: occupancy_fingerprinter::core::models::layout::LayoutError| {
        CliError::Argument(e.to_string())
    };
    let to_write_error = |e: occupancy_fingerprinter::core::io::dx::VolumeError| {
        CliError::FileWriting {
            path: args.output.clone(),
            source: e.into(),
        }
    };

    if let Some(frame) = args.volume.frame {
        let volume = layout
            .site_volume(&matrix, frame, site_id)
            .map_err(to_argument_error)?;
        site.write(&args.output, volume.view())
            .map_err(to_write_error)?;
        println!(
            "✓ Occupancy of {} in frame {} written to: {}",
            site_id,
            frame,
            args.output.display()
        );
    } else {
        let density = layout
            .site_density(&matrix, site_id)
            .map_err(to_argument_error)?;
        site.write(&args.output, density.view())
            .map_err(to_write_error)?;
        println!(
            "✓ Occupancy density of {} over {} frame(s) written to: {}",
            site_id,
            matrix.nrows(),
            args.output.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{ComputeArgs, VolumeSelection};
    use crate::commands::{compute, fixtures};
    use occupancy_fingerprinter::core::io::dx::DxFile;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn computed_store(dir: &Path) -> (PathBuf, PathBuf) {
        let sites = fixtures::write(dir, "sites.toml", fixtures::SITES);
        let output = dir.join("fingerprint.npz");
        compute::run(
            ComputeArgs {
                trajectory: fixtures::write(dir, "traj.pdb", fixtures::TRAJECTORY),
                sites: sites.clone(),
                output: output.clone(),
                tasks: Some(1),
                default_radius: None,
                summary: None,
                set_values: vec![],
            },
            None,
        )
        .unwrap();
        (output, sites)
    }

    fn export_args(store: PathBuf, sites: PathBuf, site: usize, output: PathBuf) -> ExportArgs {
        ExportArgs {
            store,
            sites,
            site,
            volume: VolumeSelection {
                frame: None,
                density: false,
            },
            output,
        }
    }

    #[test]
    fn exports_a_single_frame() {
        let dir = tempdir().unwrap();
        let (store, sites) = computed_store(dir.path());
        let output = dir.path().join("site1.dx");
        let mut args = export_args(store, sites, 1, output.clone());
        args.volume.frame = Some(0);

        run(args).unwrap();

        let grid = DxFile::read_from_path(&output).unwrap();
        assert_eq!(grid.counts(), [5, 5, 5]);
        assert_eq!(grid.values.iter().filter(|&&v| v == 1.0).count(), 81);
        assert_eq!(grid.values[[2, 2, 2]], 1.0);
        assert_eq!(grid.values[[0, 0, 0]], 0.0);
    }

    #[test]
    fn exports_density_over_frames() {
        let dir = tempdir().unwrap();
        let (store, sites) = computed_store(dir.path());
        let output = dir.path().join("site0_density.dx");
        let mut args = export_args(store, sites, 0, output.clone());
        args.volume.density = true;

        run(args).unwrap();

        let grid = DxFile::read_from_path(&output).unwrap();
        // The central atom is present in two of the three frames.
        assert!((grid.values[[2, 2, 2]] - 2.0 / 3.0).abs() < 1e-12);
        assert!(grid.values.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn unknown_site_is_an_argument_error() {
        let dir = tempdir().unwrap();
        let (store, sites) = computed_store(dir.path());
        let mut args = export_args(store, sites, 5, dir.path().join("x.dx"));
        args.volume.frame = Some(0);
        assert!(matches!(run(args), Err(CliError::Argument(_))));
    }

    #[test]
    fn frame_out_of_range_is_an_argument_error() {
        let dir = tempdir().unwrap();
        let (store, sites) = computed_store(dir.path());
        let mut args = export_args(store, sites, 0, dir.path().join("x.dx"));
        args.volume.frame = Some(3);
        assert!(matches!(run(args), Err(CliError::Argument(_))));
    }
}
