//! Fire-and-forget sink dispatch.
//!
//! Sink calls run on a dedicated worker thread fed through a bounded
//! channel, so a slow handler or tone driver never stalls the
//! scheduler's timing. Jobs are never awaited; when the queue is full
//! the newest job is dropped (best effort - the "silence all" signal
//! at the next boundary supersedes it anyway). Silencing itself
//! bypasses this worker entirely.

use crate::sink::{StepHandler, ToneOutput};
use pixelscore_core::StepBatch;
use std::sync::Arc;
use std::sync::mpsc::{self, SyncSender};
use std::thread::JoinHandle;

/// Upper bound on queued, not-yet-delivered step jobs.
pub const MAX_PENDING_STEPS: usize = 8;

/// One step's worth of sink work.
pub(crate) enum StepJob {
    /// Default sink: one tone trigger per batch entry.
    Tones {
        /// Tone capability to drive.
        tone: Arc<dyn ToneOutput>,
        /// (frequency_hz, duration_ms) per entry.
        tones: Vec<(u32, u64)>,
    },
    /// Handler override: the whole batch as four aligned sequences.
    Batch {
        /// Registered handler.
        handler: Arc<dyn StepHandler>,
        channels: Vec<usize>,
        notes: Vec<u8>,
        frequencies_hz: Vec<u32>,
        durations_ms: Vec<u64>,
    },
}

impl StepJob {
    pub(crate) fn tones(tone: Arc<dyn ToneOutput>, batch: &StepBatch) -> Self {
        StepJob::Tones {
            tone,
            tones: batch
                .entries
                .iter()
                .map(|e| (e.frequency_hz, e.duration_ms))
                .collect(),
        }
    }

    pub(crate) fn batch(handler: Arc<dyn StepHandler>, batch: &StepBatch) -> Self {
        StepJob::Batch {
            handler,
            channels: batch.entries.iter().map(|e| e.channel).collect(),
            notes: batch.entries.iter().map(|e| e.note).collect(),
            frequencies_hz: batch.entries.iter().map(|e| e.frequency_hz).collect(),
            durations_ms: batch.entries.iter().map(|e| e.duration_ms).collect(),
        }
    }

    fn run(self) {
        match self {
            StepJob::Tones { tone, tones } => {
                for (frequency_hz, duration_ms) in tones {
                    tone.play_tone(frequency_hz, duration_ms);
                }
            }
            StepJob::Batch {
                handler,
                channels,
                notes,
                frequencies_hz,
                durations_ms,
            } => {
                handler.on_step(&channels, &notes, &frequencies_hz, &durations_ms);
            }
        }
    }
}

/// Worker thread draining step jobs in submission order.
pub(crate) struct Dispatcher {
    tx: Option<SyncSender<StepJob>>,
    worker: Option<JoinHandle<()>>,
}

impl Dispatcher {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::sync_channel::<StepJob>(MAX_PENDING_STEPS);
        let worker = std::thread::spawn(move || {
            // Exits when the sender side is dropped.
            for job in rx {
                job.run();
            }
        });
        Dispatcher {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    /// Enqueue without blocking; drops the job when the queue is full.
    pub(crate) fn submit(&self, job: StepJob) {
        if let Some(tx) = &self.tx {
            let _ = tx.try_send(job);
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        // Close the channel first so the worker's iterator ends.
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingTone {
        played: Mutex<Vec<(u32, u64)>>,
    }

    impl ToneOutput for RecordingTone {
        fn play_tone(&self, frequency_hz: u32, duration_ms: u64) {
            self.played.lock().push((frequency_hz, duration_ms));
        }

        fn stop_all_tones(&self) {}
    }

    #[test]
    fn test_jobs_delivered_in_order() {
        let tone = Arc::new(RecordingTone::default());
        {
            let dispatcher = Dispatcher::new();
            for i in 0..4u32 {
                dispatcher.submit(StepJob::Tones {
                    tone: tone.clone(),
                    tones: vec![(100 + i, 10)],
                });
            }
            // Drop joins the worker, so all jobs have run afterwards.
        }
        let played = tone.played.lock();
        assert_eq!(played.as_slice(), &[(100, 10), (101, 10), (102, 10), (103, 10)]);
    }

    #[test]
    fn test_full_queue_drops_instead_of_blocking() {
        struct SlowTone;
        impl ToneOutput for SlowTone {
            fn play_tone(&self, _: u32, _: u64) {
                std::thread::sleep(Duration::from_millis(50));
            }
            fn stop_all_tones(&self) {}
        }

        let dispatcher = Dispatcher::new();
        let start = std::time::Instant::now();
        for _ in 0..(MAX_PENDING_STEPS * 4) {
            dispatcher.submit(StepJob::Tones {
                tone: Arc::new(SlowTone),
                tones: vec![(440, 1)],
            });
        }
        // Submission must not serialize behind the slow worker.
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
