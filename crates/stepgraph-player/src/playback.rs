//! Playback controls over a replay.
//!
//! [`Playback`] owns a [`GraphPlayer`] and the [`Recording`] it replays.
//! Moving backwards is done by rebuilding the player and stepping forward
//! again, since replay state is only defined going forward.

use serde::{Deserialize, Serialize};
use stepgraph_core::{GraphEvent, Recording};
use tracing::debug;

use crate::error::ReplayError;
use crate::player::GraphPlayer;
use crate::snapshot::PlayerSnapshot;

/// Playback speed multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackSpeed {
    /// Pause playback
    Paused,
    /// 0.25x speed
    QuarterSpeed,
    /// 0.5x speed
    HalfSpeed,
    /// Normal speed (1x)
    Normal,
    /// 2x speed
    Double,
    /// 4x speed
    Quadruple,
    /// 10x speed
    TenX,
    /// One step per tick
    Maximum,
}

impl PlaybackSpeed {
    /// Get the speed multiplier.
    pub fn multiplier(&self) -> f64 {
        match self {
            PlaybackSpeed::Paused => 0.0,
            PlaybackSpeed::QuarterSpeed => 0.25,
            PlaybackSpeed::HalfSpeed => 0.5,
            PlaybackSpeed::Normal => 1.0,
            PlaybackSpeed::Double => 2.0,
            PlaybackSpeed::Quadruple => 4.0,
            PlaybackSpeed::TenX => 10.0,
            PlaybackSpeed::Maximum => f64::INFINITY,
        }
    }

    /// Milliseconds between steps at this speed.
    pub fn ms_per_step(&self, base_ms: u64) -> Option<u64> {
        match self {
            PlaybackSpeed::Paused => None,
            PlaybackSpeed::Maximum => Some(0),
            speed => Some((base_ms as f64 / speed.multiplier()) as u64),
        }
    }
}

/// Current state of playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackState {
    /// Playback is stopped at beginning
    Stopped,
    /// Playback is running forward
    Playing,
    /// Playback is paused
    Paused,
    /// Playback reached the end
    Finished,
}

/// Number of visible steps in a log: top-level events plus whole
/// subroutines.
pub fn count_steps(events: &[GraphEvent]) -> usize {
    let mut depth = 0usize;
    let mut steps = 0;
    for event in events {
        match event {
            GraphEvent::SubroutineStart { .. } => depth += 1,
            GraphEvent::SubroutineEnd => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth == 0 {
            steps += 1;
        }
    }
    if depth > 0 {
        steps += 1;
    }
    steps
}

/// Playback controller for one recording.
#[derive(Debug)]
pub struct Playback {
    recording: Recording,
    player: GraphPlayer,
    step: usize,
    total_steps: usize,
    state: PlaybackState,
    speed: PlaybackSpeed,
    base_interval_ms: u64,
    last_step_at: Option<u64>,
    loop_enabled: bool,
}

impl Playback {
    /// Create a controller positioned at the start of `recording`.
    ///
    /// `base_interval_ms` is the time between steps at normal speed.
    pub fn new(recording: Recording, base_interval_ms: u64) -> Self {
        Self {
            player: GraphPlayer::new(&recording),
            total_steps: count_steps(recording.events()),
            recording,
            step: 0,
            state: PlaybackState::Stopped,
            speed: PlaybackSpeed::Normal,
            base_interval_ms,
            last_step_at: None,
            loop_enabled: false,
        }
    }

    /// Get the current step number.
    pub fn current_step(&self) -> usize {
        self.step
    }

    /// Get the total number of steps.
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Get the current playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Get the current playback speed.
    pub fn speed(&self) -> PlaybackSpeed {
        self.speed
    }

    pub fn player(&self) -> &GraphPlayer {
        &self.player
    }

    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Renderer view of the current state.
    pub fn snapshot(&self) -> PlayerSnapshot {
        self.player.snapshot()
    }

    /// Start playback.
    pub fn play(&mut self) {
        if self.player.is_finished() {
            self.restart();
        }
        self.state = PlaybackState::Playing;
    }

    /// Pause playback.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Finished {
            self.state = PlaybackState::Paused;
        }
    }

    /// Stop playback and return to beginning.
    pub fn stop(&mut self) {
        self.restart();
        self.state = PlaybackState::Stopped;
    }

    /// Set playback speed.
    pub fn set_speed(&mut self, speed: PlaybackSpeed) {
        self.speed = speed;
        if matches!(speed, PlaybackSpeed::Paused) {
            self.pause();
        }
    }

    /// Enable or disable looping.
    pub fn set_loop(&mut self, enabled: bool) {
        self.loop_enabled = enabled;
    }

    /// Rebuild the player from the recording, back at step 0.
    pub fn restart(&mut self) {
        self.player = GraphPlayer::new(&self.recording);
        self.step = 0;
        self.last_step_at = None;
    }

    /// Advance one step. Returns `false` if already at the end.
    pub fn step(&mut self, now: u64) -> Result<bool, ReplayError> {
        if self.player.step(now)? == 0 {
            return Ok(false);
        }
        self.step += 1;
        self.last_step_at = Some(now);

        if self.player.is_finished() {
            if self.loop_enabled && self.state == PlaybackState::Playing {
                debug!(steps = self.step, "playback looping");
                self.restart();
                self.last_step_at = Some(now);
            } else {
                self.state = PlaybackState::Finished;
            }
        }
        Ok(true)
    }

    /// Called on a timer. Steps once if playing and a step interval has
    /// elapsed since the last step.
    pub fn tick(&mut self, now: u64) -> Result<bool, ReplayError> {
        if self.state != PlaybackState::Playing {
            return Ok(false);
        }
        let Some(interval) = self.speed.ms_per_step(self.base_interval_ms) else {
            return Ok(false);
        };
        let due = match self.last_step_at {
            Some(last) => now.saturating_sub(last) >= interval,
            None => true,
        };
        if due {
            self.step(now)
        } else {
            Ok(false)
        }
    }

    /// Jump to `target` steps from the start.
    pub fn seek(&mut self, target: usize, now: u64) -> Result<(), ReplayError> {
        let target = target.min(self.total_steps);
        if target < self.step {
            self.restart();
        }
        while self.step < target && !self.player.is_finished() {
            self.player.step(now)?;
            self.step += 1;
        }
        self.last_step_at = None;
        if self.player.is_finished() {
            self.state = PlaybackState::Finished;
        } else if self.state == PlaybackState::Finished {
            self.state = PlaybackState::Paused;
        }
        Ok(())
    }

    /// Calculate progress through the event log (0.0 - 1.0).
    pub fn progress(&self) -> f64 {
        if self.player.event_count() == 0 {
            0.0
        } else {
            self.player.pc() as f64 / self.player.event_count() as f64
        }
    }
}

/// Playback status for sending to frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackStatus {
    pub current_step: usize,
    pub total_steps: usize,
    pub pc: usize,
    pub event_count: usize,
    pub state: PlaybackState,
    pub speed: PlaybackSpeed,
    pub progress: f64,
    pub loop_enabled: bool,
}

impl From<&Playback> for PlaybackStatus {
    fn from(playback: &Playback) -> Self {
        Self {
            current_step: playback.step,
            total_steps: playback.total_steps,
            pc: playback.player.pc(),
            event_count: playback.player.event_count(),
            state: playback.state,
            speed: playback.speed,
            progress: playback.progress(),
            loop_enabled: playback.loop_enabled,
        }
    }
}
