use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Occupancy Fingerprinter Developers",
    version,
    about = "occfp - Per-frame voxel occupancy fingerprints of binding sites over molecular dynamics trajectories.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Also the default task count of `compute` when none is configured.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the occupancy fingerprint of a trajectory and save it to a store file.
    Compute(ComputeArgs),
    /// Export one site of a stored fingerprint as an OpenDX volume.
    Export(ExportArgs),
    /// Describe the contents of a fingerprint store.
    Inspect(InspectArgs),
}

/// Arguments for the `compute` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ComputeArgs {
    /// Path to the trajectory (multi-model PDB).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub trajectory: PathBuf,

    /// Path to the binding-site definitions in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub sites: PathBuf,

    /// Path for the fingerprint store.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Number of parallel tasks; 0 or 1 runs sequentially.
    #[arg(short = 'n', long, value_name = "INT", allow_negative_numbers = true)]
    pub tasks: Option<i64>,

    /// Radius in Angstroms for atoms whose element has no tabulated radius.
    #[arg(long, value_name = "FLOAT")]
    pub default_radius: Option<f64>,

    /// Also write per-frame, per-site occupancy counts as CSV.
    #[arg(long, value_name = "PATH")]
    pub summary: Option<PathBuf>,

    /// Set a specific configuration value, overriding the sites file.
    /// Can be used multiple times. Example: -S fingerprint.tasks=4
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `export` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Path to the fingerprint store.
    #[arg(long, required = true, value_name = "PATH")]
    pub store: PathBuf,

    /// Path to the binding-site definitions the store was computed with.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub sites: PathBuf,

    /// Zero-based index of the site to export.
    #[arg(long, value_name = "INT")]
    pub site: usize,

    #[command(flatten)]
    pub volume: VolumeSelection,

    /// Path for the OpenDX file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,
}

/// Which volume of a site to export.
#[derive(Args, Debug, Clone, Copy)]
#[group(required = true, multiple = false)]
pub struct VolumeSelection {
    /// Export the 0/1 occupancy of a single frame.
    #[arg(long, value_name = "INT")]
    pub frame: Option<usize>,
    /// Export the fraction of frames in which each voxel is occupied.
    #[arg(long)]
    pub density: bool,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Path to the fingerprint store.
    #[arg(long, required = true, value_name = "PATH")]
    pub store: PathBuf,

    /// Binding-site definitions; when given, occupancy is broken down per site.
    #[arg(short, long, value_name = "PATH")]
    pub sites: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn compute_parses_overrides() {
        let cli = Cli::parse_from([
            "occfp", "-vv", "-j", "4", "compute", "-t", "traj.pdb", "-s", "sites.toml", "-o",
            "out.npz", "-n", "8", "-S", "fingerprint.default-radius=1.8",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.threads, Some(4));
        let Commands::Compute(args) = cli.command else {
            panic!("expected compute command");
        };
        assert_eq!(args.tasks, Some(8));
        assert_eq!(args.set_values, vec!["fingerprint.default-radius=1.8"]);
    }

    #[test]
    fn export_requires_exactly_one_volume() {
        let base = [
            "occfp", "export", "--store", "a.npz", "-s", "s.toml", "--site", "0", "-o", "a.dx",
        ];
        assert!(Cli::try_parse_from(base).is_err());

        let mut both = base.to_vec();
        both.extend(["--frame", "1", "--density"]);
        assert!(Cli::try_parse_from(both).is_err());

        let mut frame = base.to_vec();
        frame.extend(["--frame", "1"]);
        let cli = Cli::try_parse_from(frame).unwrap();
        let Commands::Export(args) = cli.command else {
            panic!("expected export command");
        };
        assert_eq!(args.volume.frame, Some(1));
        assert!(!args.volume.density);
    }
}
