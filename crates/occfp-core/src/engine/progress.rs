use std::path::PathBuf;

/// Events emitted while a fingerprint is computed.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    /// Frame processing begins; `total_frames` [`Progress::FrameDone`] events
    /// will follow, each row being `voxels_per_frame` wide across `n_sites` sites.
    FramesStart {
        total_frames: u64,
        n_sites: usize,
        voxels_per_frame: usize,
    },
    /// One frame finished with `occupied` voxels set. Under parallel execution
    /// events arrive in completion order, not frame order.
    FrameDone { occupied: u64 },
    FramesFinish,

    /// The fingerprint matrix was persisted to `path`.
    Saved { path: PathBuf },
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
