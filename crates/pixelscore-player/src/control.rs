//! Playback control state.
//!
//! Stop/pause/playing flags shared between the controller side (host
//! calls) and the scheduler loop. Single writer per role: the host
//! mutates the request flags, the loop owns the `playing` flag. A
//! condvar replaces the busy-wait poll the design started from; pause
//! is still only honored between scheduling steps, never mid-wait.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;

/// Playback state as observed from outside the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No run in flight.
    #[default]
    Stopped,
    /// Scheduler loop is advancing.
    Playing,
    /// Run in flight but suspended between steps.
    Paused,
}

#[derive(Debug, Default)]
struct Flags {
    stop: bool,
    pause: bool,
    playing: bool,
}

/// Flag storage shared by the player, its handles and the loop thread.
#[derive(Debug, Default)]
pub(crate) struct ControlShared {
    flags: Mutex<Flags>,
    wake: Condvar,
}

impl ControlShared {
    /// Arm a fresh run: clear both request flags, mark playing.
    pub(crate) fn begin_run(&self) {
        let mut flags = self.flags.lock();
        flags.stop = false;
        flags.pause = false;
        flags.playing = true;
    }

    /// Loop exit (natural or stop-requested): clear playing, wake
    /// anyone blocked in [`wait_until_stopped`](Self::wait_until_stopped).
    pub(crate) fn finish_run(&self) {
        let mut flags = self.flags.lock();
        flags.playing = false;
        self.wake.notify_all();
    }

    /// Request a cooperative stop; observed at the next step boundary.
    pub(crate) fn request_stop(&self) {
        let mut flags = self.flags.lock();
        flags.stop = true;
        self.wake.notify_all();
    }

    /// Set or clear the pause request.
    pub(crate) fn set_pause(&self, pause: bool) {
        let mut flags = self.flags.lock();
        flags.pause = pause;
        if !pause {
            self.wake.notify_all();
        }
    }

    /// Step boundary: block while paused, then report whether the loop
    /// must exit. A stop request wins over pause.
    pub(crate) fn pause_point(&self) -> bool {
        let mut flags = self.flags.lock();
        while flags.pause && !flags.stop {
            self.wake.wait(&mut flags);
        }
        flags.stop
    }

    /// Block until no run is in flight.
    pub(crate) fn wait_until_stopped(&self) {
        let mut flags = self.flags.lock();
        while flags.playing {
            self.wake.wait(&mut flags);
        }
    }

    pub(crate) fn is_playing(&self) -> bool {
        self.flags.lock().playing
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.flags.lock().pause
    }

    pub(crate) fn state(&self) -> PlaybackState {
        let flags = self.flags.lock();
        if !flags.playing {
            PlaybackState::Stopped
        } else if flags.pause {
            PlaybackState::Paused
        } else {
            PlaybackState::Playing
        }
    }
}

/// Cloneable cross-thread controller for a [`ScorePlayer`].
///
/// A handle stays valid for the player's lifetime and can drive
/// stop/pause/resume from any thread while the player itself is busy.
///
/// [`ScorePlayer`]: crate::ScorePlayer
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    shared: Arc<ControlShared>,
}

impl PlaybackHandle {
    pub(crate) fn new(shared: Arc<ControlShared>) -> Self {
        PlaybackHandle { shared }
    }

    /// Request a stop; takes effect at the next step boundary.
    pub fn stop(&self) {
        self.shared.request_stop();
    }

    /// Request a pause; takes effect after the current step's wait.
    pub fn pause(&self) {
        self.shared.set_pause(true);
    }

    /// Clear a pause request and wake a suspended loop.
    pub fn resume(&self) {
        self.shared.set_pause(false);
    }

    /// True while a run is in flight (including while paused).
    pub fn is_playing(&self) -> bool {
        self.shared.is_playing()
    }

    /// True while a pause request is set.
    pub fn is_paused(&self) -> bool {
        self.shared.is_paused()
    }

    /// Combined view of the flags.
    pub fn state(&self) -> PlaybackState {
        self.shared.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        let control = ControlShared::default();
        assert_eq!(control.state(), PlaybackState::Stopped);

        control.begin_run();
        assert_eq!(control.state(), PlaybackState::Playing);
        assert!(control.is_playing());

        control.set_pause(true);
        assert_eq!(control.state(), PlaybackState::Paused);
        assert!(control.is_paused());

        control.set_pause(false);
        assert_eq!(control.state(), PlaybackState::Playing);

        control.finish_run();
        assert_eq!(control.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_pause_point_passes_when_not_paused() {
        let control = ControlShared::default();
        control.begin_run();
        assert!(!control.pause_point());

        control.request_stop();
        assert!(control.pause_point());
    }

    #[test]
    fn test_begin_run_clears_stale_requests() {
        let control = ControlShared::default();
        control.request_stop();
        control.set_pause(true);
        control.begin_run();
        assert!(!control.pause_point());
        assert!(!control.is_paused());
    }

    #[test]
    fn test_stop_wins_over_pause() {
        let control = ControlShared::default();
        control.begin_run();
        control.set_pause(true);
        control.request_stop();
        // Must not block and must report the stop.
        assert!(control.pause_point());
    }
}
