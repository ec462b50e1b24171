// Sequencer - Breathing state machine driven by the tick clock
//
// Owns the configuration, the raw counters and the tick clock. Every commit
// notifies subscribers with a freshly computed projection; cue decisions are
// forwarded to the `CuePlayer` and its failures never reach the counters.

use super::clock::TickClock;
use super::cue::{AudioCueKey, CuePlayer, SilentCuePlayer};
use super::program::{Phase, SEQUENCE_TABLE, STEPS_PER_SEQUENCE, step_at};
use super::projection::Projection;
use super::state::SequencerState;
use crate::config::Configuration;
use std::time::{Duration, Instant};

/// Handle returned by `subscribe`
pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&Projection)>;

/// Outcome of advancing past an active phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepAdvance {
    Continue,
    ProgramFinished,
}

pub struct Sequencer<P: CuePlayer = SilentCuePlayer> {
    config: Configuration,
    state: SequencerState,
    clock: TickClock,
    player: P,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription_id: SubscriptionId,
}

impl Sequencer<SilentCuePlayer> {
    /// Sequencer without audio
    pub fn new(config: Configuration) -> Self {
        Self::with_player(config, SilentCuePlayer)
    }
}

impl<P: CuePlayer> Sequencer<P> {
    /// Create an idle sequencer
    pub fn with_player(config: Configuration, player: P) -> Self {
        Self {
            config: config.normalized(),
            state: SequencerState::idle(),
            clock: TickClock::default(),
            player,
            listeners: Vec::new(),
            next_subscription_id: 1,
        }
    }

    /// Replace the tick clock (used to run faster than real time)
    pub fn with_clock(mut self, clock: TickClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &SequencerState {
        &self.state
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    /// Current display projection
    pub fn projection(&self) -> Projection {
        Projection::compute(&self.state, &self.config)
    }

    /// Replace the configuration and notify subscribers
    ///
    /// Counters are clamped so a shorter phase or repeat count takes effect
    /// on the next tick.
    pub fn update_configuration(&mut self, config: Configuration) {
        self.config = config.normalized();

        let duration = self.config.duration(self.state.phase);
        if self.state.ticks_elapsed_in_phase >= duration {
            self.state.ticks_elapsed_in_phase = duration - 1;
        }
        let repeats = self.config.repeat_count();
        if self.state.repeats_completed >= repeats {
            self.state.repeats_completed = repeats - 1;
        }

        tracing::debug!(config = ?self.config, "Configuration updated");
        self.notify();
    }

    /// Start a session now
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Start a session with the clock anchored at `now`
    ///
    /// No-op while already running, so the clock is never armed twice.
    pub fn start_at(&mut self, now: Instant) {
        if self.state.is_running {
            tracing::debug!("Start ignored, sequencer already running");
            return;
        }

        self.state = SequencerState::running();
        self.clock.arm(now);
        tracing::info!(
            total_ticks = crate::sequencer::projection::total_session_ticks(&self.config),
            "Session started"
        );

        if self.config.audio_enabled
            && let Err(e) = self.player.prime()
        {
            tracing::warn!(error = %e, "Failed to prime audio output");
        }

        self.tick();
    }

    /// Stop the session, silence audio and return to the idle state
    pub fn stop(&mut self) {
        if self.state.is_running {
            tracing::info!(
                sequence = self.state.sequence_index,
                phase = %self.state.phase,
                "Session stopped"
            );
        }
        self.clock.disarm();
        self.player.stop();
        self.state = SequencerState::idle();
        self.notify();
    }

    /// Stop if running, start otherwise
    pub fn toggle(&mut self) {
        if self.state.is_running {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Deliver every tick due up to `now`; returns how many ran
    pub fn pump(&mut self, now: Instant) -> usize {
        let mut delivered = 0;
        while self.state.is_running && self.clock.take_due(now) {
            self.tick();
            delivered += 1;
        }
        delivered
    }

    /// Time until the next tick, `None` when stopped
    pub fn next_tick_in(&self, now: Instant) -> Option<Duration> {
        if !self.state.is_running {
            return None;
        }
        self.clock.time_until_next(now)
    }

    /// Advance the state machine by one tick
    pub fn tick(&mut self) {
        if !self.state.is_running {
            tracing::trace!("Tick ignored while stopped");
            return;
        }

        let previous = self.state.clone();
        let mut next = self.state.clone();

        next.ticks_elapsed_in_phase += 1;
        if next.ticks_elapsed_in_phase >= self.config.duration(next.phase) {
            next.ticks_elapsed_in_phase = 0;

            if next.phase.is_active() && self.advance_step(&mut next) == StepAdvance::ProgramFinished {
                tracing::info!("Exercise program finished");
                self.stop();
                return;
            }

            next.phase = next.phase.next();
            tracing::debug!(
                phase = %next.phase,
                sequence = next.sequence_index,
                step = next.step_index,
                repeats = next.repeats_completed,
                "Phase changed"
            );
        }

        let cue_due = Self::cue_due(&previous, &next);
        self.state = next;
        self.notify();

        if cue_due && self.config.audio_enabled {
            self.fire_cue();
        }
    }

    /// Register a listener, called on every state commit in registration order
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Projection) + 'static,
    {
        let id = self.next_subscription_id;
        self.next_subscription_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns false if the id was unknown
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() < before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    fn advance_step(&self, state: &mut SequencerState) -> StepAdvance {
        let steps = SEQUENCE_TABLE
            .get(state.sequence_index)
            .map_or(STEPS_PER_SEQUENCE, |sequence| sequence.len());

        if state.step_index + 1 < steps {
            state.step_index += 1;
            return StepAdvance::Continue;
        }

        state.step_index = 0;
        state.repeats_completed += 1;
        if state.repeats_completed < self.config.repeat_count() {
            return StepAdvance::Continue;
        }

        state.repeats_completed = 0;
        if state.sequence_index + 1 < SEQUENCE_TABLE.len() {
            state.sequence_index += 1;
            StepAdvance::Continue
        } else if self.config.loop_enabled {
            tracing::info!("Program complete, looping to the first sequence");
            state.sequence_index = 0;
            StepAdvance::Continue
        } else {
            StepAdvance::ProgramFinished
        }
    }

    // Every phase boundary changes the phase (exhale -> rest included), so a
    // cue fires once per boundary and never on the ticks in between.
    fn cue_due(previous: &SequencerState, next: &SequencerState) -> bool {
        next.phase != previous.phase
            || next.step_index != previous.step_index
            || next.sequence_index != previous.sequence_index
    }

    fn fire_cue(&mut self) {
        let Some(step) = step_at(self.state.sequence_index, self.state.step_index) else {
            return;
        };

        match AudioCueKey::for_step(step, self.state.phase) {
            Some(key) => {
                let phase_ticks = self.config.duration(self.state.phase);
                if let Err(e) = self.player.play(key, phase_ticks) {
                    tracing::warn!(cue = %key, error = %e, "Audio cue skipped");
                }
            }
            None => self.player.stop(),
        }
    }

    fn notify(&mut self) {
        let projection = self.projection();
        for (_, listener) in self.listeners.iter_mut() {
            listener(&projection);
        }
    }
}

impl<P: CuePlayer> std::fmt::Debug for Sequencer<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequencer")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("clock", &self.clock)
            .field("subscribers", &self.listeners.len())
            .finish()
    }
}

impl Default for Sequencer<SilentCuePlayer> {
    fn default() -> Self {
        Self::new(Configuration::default())
    }
}
