//! Playback handles and their reclamation rules
//!
//! Every `play` request yields one [`PlaybackHandle`] owning one backend
//! channel. A handle moves `Created -> Playing -> Reclaimed`:
//!
//! - one-shots are reclaimed by a [`ReclaimTimer`] armed for the clip length
//!   (pitch is not taken into account);
//! - loops are reclaimed by a [`LoopMonitor`] on the first tick that sees
//!   their channel no longer playing, which only happens after a stop.

use super::backend::{AudioBackend, ChannelHandle};
use crate::foundation::time::Deadline;

/// Lifecycle state of a playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Channel allocated and configured, clip not started
    Created,
    /// Clip started
    Playing,
    /// Channel released; terminal
    Reclaimed,
}

/// Fires once the clip length has elapsed on the scheduler clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReclaimTimer {
    deadline: Deadline,
}

impl ReclaimTimer {
    /// Arm a timer at `now` for `clip_seconds`
    pub fn new(now: f64, clip_seconds: f64) -> Self {
        Self {
            deadline: Deadline::new(now, clip_seconds),
        }
    }

    /// Check if the timer has fired
    pub fn is_due(&self, now: f64) -> bool {
        self.deadline.is_due(now)
    }

    /// Seconds until the timer fires
    pub fn remaining(&self, now: f64) -> f64 {
        self.deadline.remaining(now)
    }
}

/// Watches a looping channel and reports when it stops producing audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopMonitor {
    channel: ChannelHandle,
}

impl LoopMonitor {
    /// Attach a monitor to `channel`
    pub fn attach(channel: ChannelHandle) -> Self {
        Self { channel }
    }

    /// Check if the monitored channel went quiet
    pub fn should_reclaim(&self, backend: &dyn AudioBackend) -> bool {
        !backend.is_playing(self.channel)
    }
}

/// How a playback ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackKind {
    /// Plays once, reclaimed by timer
    OneShot(ReclaimTimer),
    /// Repeats until its channel is stopped
    Looping(LoopMonitor),
}

/// One active emission
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    /// Catalog name the clip was resolved from
    pub sound: String,
    /// Output channel owned by this playback
    pub channel: ChannelHandle,
    /// Volume passed by the caller (before master volume)
    pub requested_volume: f32,
    /// Playback speed
    pub pitch: f32,
    kind: PlaybackKind,
    state: PlaybackState,
}

impl PlaybackHandle {
    /// Create a one-shot handle whose timer starts at `now`
    pub fn one_shot(
        sound: impl Into<String>,
        channel: ChannelHandle,
        requested_volume: f32,
        pitch: f32,
        now: f64,
        clip_seconds: f64,
    ) -> Self {
        Self {
            sound: sound.into(),
            channel,
            requested_volume,
            pitch,
            kind: PlaybackKind::OneShot(ReclaimTimer::new(now, clip_seconds)),
            state: PlaybackState::Created,
        }
    }

    /// Create a looping handle monitored on `channel`
    pub fn looping(
        sound: impl Into<String>,
        channel: ChannelHandle,
        requested_volume: f32,
        pitch: f32,
    ) -> Self {
        Self {
            sound: sound.into(),
            channel,
            requested_volume,
            pitch,
            kind: PlaybackKind::Looping(LoopMonitor::attach(channel)),
            state: PlaybackState::Created,
        }
    }

    /// Reclamation rule for this handle
    pub fn kind(&self) -> PlaybackKind {
        self.kind
    }

    /// Current lifecycle state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Check if this handle loops
    pub fn is_looping(&self) -> bool {
        matches!(self.kind, PlaybackKind::Looping(_))
    }

    /// Record that the clip started
    pub fn mark_playing(&mut self) {
        if self.state == PlaybackState::Created {
            self.state = PlaybackState::Playing;
        }
    }

    /// Record that the channel was released
    pub fn mark_reclaimed(&mut self) {
        self.state = PlaybackState::Reclaimed;
    }

    /// Check if this handle's terminating condition holds at `now`
    ///
    /// Handles that never started are always reclaimable: their channel
    /// holds no clip, so nothing would ever end them otherwise.
    pub fn should_reclaim(&self, now: f64, backend: &dyn AudioBackend) -> bool {
        match (self.state, self.kind) {
            (PlaybackState::Reclaimed | PlaybackState::Created, _) => true,
            (PlaybackState::Playing, PlaybackKind::OneShot(timer)) => timer.is_due(now),
            (PlaybackState::Playing, PlaybackKind::Looping(monitor)) => monitor.should_reclaim(backend),
        }
    }
}
