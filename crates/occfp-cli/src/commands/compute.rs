use crate::cli::ComputeArgs;
use crate::config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use occupancy_fingerprinter::{
    core::{
        io::summary,
        trajectory::{PdbTrajectory, Trajectory},
    },
    engine::progress::ProgressReporter,
    workflows::grid::Grid,
};
use tracing::info;

pub fn run(args: ComputeArgs, threads: Option<usize>) -> Result<()> {
    let app_config = config::build_config(&args, threads)?;

    info!("Loading trajectory from {:?}", &app_config.trajectory_path);
    let trajectory = PdbTrajectory::read_from_path(&app_config.trajectory_path).map_err(|e| {
        CliError::FileParsing {
            path: app_config.trajectory_path.clone(),
            source: e.into(),
        }
    })?;

    let mut grid = Grid::with_default_radius(&trajectory, app_config.default_radius);
    for site in app_config.sites {
        grid.push_site(site);
    }
    let layout = grid.layout();

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Fingerprinting {} site(s) over {} frame(s)...",
        grid.n_sites(),
        trajectory.n_frames()
    );
    info!("Invoking the fingerprint workflow...");
    let matrix = grid.run(&app_config.core_config, &reporter)?;

    println!(
        "✓ Fingerprint ({} frame(s) x {} voxel(s)) written to: {}",
        trajectory.n_frames(),
        layout.total_voxels(),
        args.output.display()
    );

    if let (Some(path), Some(matrix)) = (&app_config.summary_path, &matrix) {
        info!("Writing occupancy summary to {:?}", path);
        summary::write_summary(path, matrix, &layout).map_err(|e| CliError::FileWriting {
            path: path.clone(),
            source: e.into(),
        })?;
        println!("✓ Occupancy summary written to: {}", path.display());
    }

    Ok(())
}
