use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use occupancy_fingerprinter::engine::progress::{Progress, ProgressCallback};
use std::fmt::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;
const FRAME_TEMPLATE: &str =
    "{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} frames {fps} ({eta}) {msg}";

/// What the frame bar knows about the run it is drawing.
#[derive(Debug, Default)]
struct FrameTally {
    phase: &'static str,
    voxels_per_frame: usize,
    frames_done: u64,
    occupied: u64,
}

impl FrameTally {
    /// Mean fraction of voxels occupied over the frames seen so far.
    fn mean_occupancy(&self) -> Option<f64> {
        let total = self.frames_done * self.voxels_per_frame as u64;
        (total > 0).then(|| self.occupied as f64 / total as f64)
    }
}

struct BarState {
    bar: ProgressBar,
    tally: FrameTally,
}

/// Renders fingerprint progress on stderr: a spinner per phase and a frame
/// bar showing throughput and the running mean occupancy.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<BarState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(None, target).with_style(spinner_style());
        Self {
            state: Arc::new(Mutex::new(BarState {
                bar,
                tally: FrameTally::default(),
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();
        Box::new(move |event: Progress| {
            let Ok(mut state) = state.lock() else {
                warn!("Progress state mutex was poisoned; dropping progress event.");
                return;
            };
            state.apply(event);
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl BarState {
    fn apply(&mut self, event: Progress) {
        match event {
            Progress::PhaseStart { name } => {
                self.tally.phase = name;
                self.bar.reset();
                self.bar.set_style(spinner_style());
                self.bar.set_message(format!("{name}..."));
                self.bar
                    .enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
            }
            Progress::PhaseFinish => {
                self.bar.disable_steady_tick();
                self.bar
                    .finish_with_message(format!("✓ {}", self.tally.phase));
            }
            Progress::FramesStart {
                total_frames,
                n_sites,
                voxels_per_frame,
            } => {
                self.tally = FrameTally {
                    phase: self.tally.phase,
                    voxels_per_frame,
                    ..FrameTally::default()
                };
                self.bar.disable_steady_tick();
                self.bar.reset();
                self.bar.set_length(total_frames);
                self.bar.set_style(frame_style());
                self.bar.set_prefix(format!("{n_sites} site(s)"));
                self.bar.set_message(String::new());
            }
            Progress::FrameDone { occupied } => {
                self.tally.frames_done += 1;
                self.tally.occupied += occupied;
                if let Some(mean) = self.tally.mean_occupancy() {
                    self.bar
                        .set_message(format!("{:.1}% occupied", mean * 100.0));
                }
                self.bar.inc(1);
            }
            Progress::FramesFinish => {
                if let Some(total) = self.bar.length() {
                    self.bar.set_position(total);
                }
                self.bar.finish();
            }
            Progress::Saved { path } => {
                self.bar.println(format!("  💾 Saved {}", path.display()));
            }
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn frame_style() -> ProgressStyle {
    ProgressStyle::with_template(FRAME_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("fps", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            let _ = write!(w, "{:.1}/s", state.per_sec());
        })
        .progress_chars("##-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::thread;

    fn hidden_handler() -> CliProgressHandler {
        CliProgressHandler::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn frames_start(total_frames: u64) -> Progress {
        Progress::FramesStart {
            total_frames,
            n_sites: 2,
            voxels_per_frame: 100,
        }
    }

    #[test]
    fn mean_occupancy_needs_at_least_one_frame() {
        let mut tally = FrameTally {
            voxels_per_frame: 100,
            ..FrameTally::default()
        };
        assert_eq!(tally.mean_occupancy(), None);
        tally.frames_done = 2;
        tally.occupied = 50;
        assert_eq!(tally.mean_occupancy(), Some(0.25));
    }

    #[test]
    fn empty_lattice_has_no_mean_occupancy() {
        let tally = FrameTally {
            frames_done: 3,
            ..FrameTally::default()
        };
        assert_eq!(tally.mean_occupancy(), None);
    }

    #[test]
    fn frame_bar_tracks_sites_frames_and_occupancy() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "Fingerprinting",
        });
        callback(frames_start(4));
        {
            let state = handler.state.lock().unwrap();
            assert_eq!(state.bar.length(), Some(4));
            assert_eq!(state.bar.prefix(), "2 site(s)");
        }

        callback(Progress::FrameDone { occupied: 10 });
        callback(Progress::FrameDone { occupied: 30 });
        {
            let state = handler.state.lock().unwrap();
            assert_eq!(state.bar.position(), 2);
            assert_eq!(state.tally.occupied, 40);
            assert_eq!(state.bar.message(), "20.0% occupied");
        }

        callback(Progress::FramesFinish);
        callback(Progress::PhaseFinish);
        let state = handler.state.lock().unwrap();
        assert!(state.bar.is_finished());
        assert_eq!(state.bar.position(), 4);
        assert_eq!(state.bar.message(), "✓ Fingerprinting");
    }

    #[test]
    fn a_new_frame_pass_resets_the_tally() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        callback(frames_start(1));
        callback(Progress::FrameDone { occupied: 100 });
        callback(frames_start(3));

        let state = handler.state.lock().unwrap();
        assert_eq!(state.tally.frames_done, 0);
        assert_eq!(state.tally.occupied, 0);
        assert_eq!(state.tally.voxels_per_frame, 100);
        assert_eq!(state.bar.position(), 0);
    }

    #[test]
    fn saved_event_leaves_the_bar_state_alone() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Saving" });
        callback(Progress::PhaseFinish);
        callback(Progress::Saved {
            path: PathBuf::from("out.npz"),
        });

        let state = handler.state.lock().unwrap();
        assert!(state.bar.is_finished());
        assert_eq!(state.bar.message(), "✓ Saving");
    }

    #[test]
    fn callback_can_be_driven_from_worker_threads() {
        let handler = hidden_handler();
        let callback = Arc::new(handler.get_callback());
        callback(frames_start(8));

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let callback = Arc::clone(&callback);
                thread::spawn(move || {
                    callback(Progress::FrameDone { occupied: 5 });
                    callback(Progress::FrameDone { occupied: 5 });
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let state = handler.state.lock().unwrap();
        assert_eq!(state.bar.position(), 8);
        assert_eq!(state.tally.occupied, 40);
    }
}
