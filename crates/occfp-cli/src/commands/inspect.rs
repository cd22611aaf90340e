use crate::cli::InspectArgs;
use crate::config;
use crate::error::{CliError, Result};
use occupancy_fingerprinter::core::{
    io::store::{ArrayContainer, FRAMES_RECORD},
    io::summary,
    models::{layout::FingerprintLayout, site::BindingSite},
};
use ndarray::{Array2, Ix2};
use std::fmt::Write;
use tracing::info;

pub fn run(args: InspectArgs) -> Result<()> {
    info!("Reading fingerprint store from {:?}", &args.store);
    let container = ArrayContainer::read_from_path(&args.store).map_err(|e| {
        CliError::FileParsing {
            path: args.store.clone(),
            source: e.into(),
        }
    })?;
    let sites = args.sites.as_deref().map(config::load_sites).transpose()?;

    print!("{}", describe(&container, sites.as_deref())?);
    Ok(())
}

/// Renders a human-readable report of a store's records and occupancy.
fn describe(container: &ArrayContainer, sites: Option<&[BindingSite]>) -> Result<String> {
    let mut report = String::new();
    let _ = writeln!(report, "Records: {}", container.len());
    for key in container.keys() {
        if let Some(array) = container.get(key) {
            let _ = writeln!(report, "  {:<12} shape {:?}", key, array.shape());
        }
    }

    let Some(frames) = container.get(FRAMES_RECORD) else {
        let _ = writeln!(report, "No '{}' record found.", FRAMES_RECORD);
        return Ok(report);
    };
    let matrix: Array2<u8> = frames
        .clone()
        .into_dimensionality::<Ix2>()
        .map_err(|e| CliError::Argument(format!("'{}' record is not 2-D: {}", FRAMES_RECORD, e)))?;

    match sites {
        Some(sites) => {
            let layout = FingerprintLayout::new(sites);
            let rows = summary::summarize(&matrix, &layout)
                .map_err(|e| CliError::Argument(e.to_string()))?;
            let _ = writeln!(report, "frame  site  occupied/total  fraction");
            for row in rows {
                let _ = writeln!(
                    report,
                    "{:>5}  {:>4}  {:>8}/{:<5}  {:.4}",
                    row.frame, row.site, row.occupied, row.total, row.fraction
                );
            }
        }
        None => {
            let _ = writeln!(report, "frame  occupied/total");
            for (frame, row) in matrix.rows().into_iter().enumerate() {
                let occupied = row.iter().filter(|&&v| v != 0).count();
                let _ = writeln!(report, "{:>5}  {:>8}/{}", frame, occupied, row.len());
            }
        }
    }
    Ok(report)
}
