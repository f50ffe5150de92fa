//! Score player and scheduler loop.
//!
//! [`ScorePlayer`] owns the live score queue, the sink configuration
//! and the playback thread. `play()` validates the queue, arms the
//! control flags and spawns the scheduler loop; control then happens
//! through the player or any [`PlaybackHandle`] clone.
//!
//! The loop advances chunk by chunk, column pair by column pair. Each
//! step merges all channels, hands the batch to the sink worker,
//! sleeps for the shortest channel duration, silences everything, and
//! only then honors pause and stop requests. Longer channels are
//! deliberately truncated at every synchronization boundary; the
//! shortest active channel sets the tempo.

use crate::control::{ControlShared, PlaybackHandle, PlaybackState};
use crate::dispatch::{Dispatcher, StepJob};
use crate::sink::{StepHandler, ToneOutput};
use crate::Result;
use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use pixelscore_core::{merge_step, PixelImage, ScoreQueue};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Ceiling on a single step's wait (10 minutes).
///
/// Duration masks can encode absurd values (a set bit at row 20 is
/// already over 17 minutes); clamping keeps a stray pixel from wedging
/// the playback thread beyond reach of `stop()`.
pub const MAX_STEP_MS: u64 = 600_000;

struct SinkConfig {
    tone: Arc<dyn ToneOutput>,
    handler: Option<Arc<dyn StepHandler>>,
}

struct PlayerShared<I> {
    queue: RwLock<ScoreQueue<I>>,
    control: Arc<ControlShared>,
    sink: RwLock<SinkConfig>,
}

/// Multi-channel score player.
///
/// Generic over the host's image type. The player is an explicit
/// caller-owned instance; create as many as needed and drop them to
/// tear playback down.
pub struct ScorePlayer<I> {
    shared: Arc<PlayerShared<I>>,
    dispatcher: Arc<Dispatcher>,
    run: Mutex<Option<JoinHandle<()>>>,
}

impl<I: PixelImage + Send + Sync + 'static> ScorePlayer<I> {
    /// Create a player emitting through `tone`.
    pub fn new(tone: Arc<dyn ToneOutput>) -> Self {
        ScorePlayer {
            shared: Arc::new(PlayerShared {
                queue: RwLock::new(ScoreQueue::new()),
                control: Arc::new(ControlShared::default()),
                sink: RwLock::new(SinkConfig { tone, handler: None }),
            }),
            dispatcher: Arc::new(Dispatcher::new()),
            run: Mutex::new(None),
        }
    }

    /// Replace the score queue.
    ///
    /// Forces any in-flight run to stop and waits for it to wind down
    /// before installing the new queue; a run already in progress never
    /// sees the replacement.
    pub fn set_image_queue(&self, queue: ScoreQueue<I>) {
        self.shared.control.request_stop();
        self.shared.control.wait_until_stopped();
        if let Some(run) = self.run.lock().take() {
            let _ = run.join();
        }
        *self.shared.queue.write() = queue;
    }

    /// Read access to the live queue.
    pub fn queue(&self) -> RwLockReadGuard<'_, ScoreQueue<I>> {
        self.shared.queue.read()
    }

    /// Write access to the live queue.
    ///
    /// The scheduler re-reads bounds from the queue at every step, so
    /// in-place edits are picked up on the next step. Holding the guard
    /// across a step boundary stalls the scheduler; the layout
    /// contract is only re-checked at the next `play()`.
    pub fn queue_mut(&self) -> RwLockWriteGuard<'_, ScoreQueue<I>> {
        self.shared.queue.write()
    }

    /// Install a batch handler, overriding the default tone sink from
    /// the next step on. `None` is a no-op and does not clear an
    /// existing handler.
    pub fn set_handler(&self, handler: Option<Arc<dyn StepHandler>>) {
        if let Some(handler) = handler {
            self.shared.sink.write().handler = Some(handler);
        }
    }

    /// Start playback.
    ///
    /// Validates the queue layout first and fails fast on a malformed
    /// one. An empty queue completes immediately as a no-op. Calling
    /// `play()` while a run is in flight (playing or paused) is a
    /// no-op.
    pub fn play(&self) -> Result<()> {
        let mut run = self.run.lock();
        if self.shared.control.is_playing() {
            return Ok(());
        }
        {
            let queue = self.shared.queue.read();
            queue.validate()?;
            if queue.is_empty() {
                return Ok(());
            }
        }
        // Reap the previous run's thread, if any.
        if let Some(previous) = run.take() {
            let _ = previous.join();
        }

        self.shared.control.begin_run();
        let shared = Arc::clone(&self.shared);
        let dispatcher = Arc::clone(&self.dispatcher);
        *run = Some(std::thread::spawn(move || {
            run_loop(&shared, &dispatcher);
        }));
        Ok(())
    }

    /// Request a stop; honored at the next step boundary, never
    /// mid-wait. Does nothing when not playing.
    pub fn stop(&self) {
        self.shared.control.request_stop();
    }

    /// Request a pause; honored after the current step's wait.
    pub fn pause(&self) {
        self.shared.control.set_pause(true);
    }

    /// Clear a pause request and wake a suspended run.
    pub fn resume(&self) {
        self.shared.control.set_pause(false);
    }

    /// True while a run is in flight (including while paused).
    pub fn is_playing(&self) -> bool {
        self.shared.control.is_playing()
    }

    /// True while a pause request is set.
    pub fn is_paused(&self) -> bool {
        self.shared.control.is_paused()
    }

    /// Combined state view.
    pub fn state(&self) -> PlaybackState {
        self.shared.control.state()
    }

    /// Cross-thread control handle, valid for the player's lifetime.
    pub fn handle(&self) -> PlaybackHandle {
        PlaybackHandle::new(Arc::clone(&self.shared.control))
    }
}

impl<I> Drop for ScorePlayer<I> {
    fn drop(&mut self) {
        self.shared.control.request_stop();
        if let Some(run) = self.run.lock().take() {
            let _ = run.join();
        }
    }
}

/// The scheduler loop. Runs on its own thread until the score is
/// consumed or a stop request is observed.
fn run_loop<I: PixelImage>(shared: &PlayerShared<I>, dispatcher: &Dispatcher) {
    let mut chunk = 0;
    'chunks: loop {
        let mut col = 0;
        loop {
            // Bounds come from the live queue so in-place edits are
            // honored on the very next step.
            let batch = {
                let queue = shared.queue.read();
                if chunk >= queue.chunk_count() {
                    break 'chunks;
                }
                if col >= queue.width() {
                    break;
                }
                merge_step(&queue, chunk, col)
            };

            let tone = {
                let sink = shared.sink.read();
                match &sink.handler {
                    Some(handler) => {
                        dispatcher.submit(StepJob::batch(Arc::clone(handler), &batch));
                    }
                    None => {
                        dispatcher.submit(StepJob::tones(Arc::clone(&sink.tone), &batch));
                    }
                }
                Arc::clone(&sink.tone)
            };

            let wait_ms = batch.wait_ms().min(MAX_STEP_MS);
            std::thread::sleep(Duration::from_millis(wait_ms));
            tone.stop_all_tones();

            // Pause first, then stop: a stop issued while paused wins.
            if shared.control.pause_point() {
                break 'chunks;
            }
            col += 2;
        }
        chunk += 1;
    }
    shared.control.finish_run();
}
