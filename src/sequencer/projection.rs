// Projection - Display-ready view of the sequencer
// Derived from state + configuration on every read, never cached

use super::program::{Phase, SEQUENCE_TABLE, SequenceStep, step_at};
use super::state::SequencerState;
use crate::config::Configuration;

/// Snapshot handed to display subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub is_running: bool,
    pub phase: Phase,
    pub remaining_ticks_in_phase: u32,
    pub sequence_index: usize,
    pub step_index: usize,
    /// Channel at the current position
    pub step: SequenceStep,
    pub repeats_remaining: u32,
    pub total_session_ticks: u64,
}

impl Projection {
    /// Derive the projection from raw state and configuration
    pub fn compute(state: &SequencerState, config: &Configuration) -> Self {
        Self {
            is_running: state.is_running,
            phase: state.phase,
            remaining_ticks_in_phase: config
                .duration(state.phase)
                .saturating_sub(state.ticks_elapsed_in_phase),
            sequence_index: state.sequence_index,
            step_index: state.step_index,
            step: step_at(state.sequence_index, state.step_index).unwrap_or(SequenceStep::Nose),
            repeats_remaining: config.repeat_count().saturating_sub(state.repeats_completed),
            total_session_ticks: total_session_ticks(config),
        }
    }

    /// Whether the breathing channel should be highlighted
    pub fn channel_active(&self) -> bool {
        self.is_running && self.phase != Phase::Rest
    }
}

/// Length of the whole program in ticks
pub fn total_session_ticks(config: &Configuration) -> u64 {
    config
        .timing
        .cycle_ticks()
        .saturating_mul(u64::from(config.repeat_count()))
        .saturating_mul(SEQUENCE_TABLE.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MAX_PHASE_TICKS, MAX_REPEAT_COUNT, PhaseDurations};

    #[test]
    fn test_idle_projection() {
        let config = Configuration::default();
        let projection = Projection::compute(&SequencerState::idle(), &config);

        assert!(!projection.is_running);
        assert_eq!(projection.phase, Phase::Rest);
        assert_eq!(projection.remaining_ticks_in_phase, 10);
        assert_eq!(projection.repeats_remaining, 7);
        assert_eq!(projection.step, SequenceStep::Nose);
        // 40 ticks per breath * 7 repeats * 9 sequences
        assert_eq!(projection.total_session_ticks, 2520);
    }

    #[test]
    fn test_projection_follows_configuration() {
        let mut config = Configuration::default();
        let state = SequencerState {
            phase: Phase::Hold,
            ticks_elapsed_in_phase: 2,
            sequence_index: 2,
            step_index: 1,
            repeats_completed: 3,
            is_running: true,
        };

        config.timing = PhaseDurations { rest: 1, inhale: 2, hold: 5, exhale: 4 };
        config.repeat_count_per_step = 4;
        let projection = Projection::compute(&state, &config);

        assert_eq!(projection.remaining_ticks_in_phase, 3);
        assert_eq!(projection.repeats_remaining, 1);
        assert_eq!(projection.step, SequenceStep::Mouth);
        assert_eq!(projection.total_session_ticks, 12 * 4 * 9);
        assert!(projection.channel_active());
    }

    #[test]
    fn test_projection_saturates_on_shrunk_configuration() {
        let mut config = Configuration::default();
        config.timing.rest = 2;
        config.repeat_count_per_step = 1;
        let state = SequencerState {
            ticks_elapsed_in_phase: 5,
            repeats_completed: 4,
            is_running: true,
            ..SequencerState::default()
        };

        let projection = Projection::compute(&state, &config);
        assert_eq!(projection.remaining_ticks_in_phase, 0);
        assert_eq!(projection.repeats_remaining, 0);
    }

    #[test]
    fn test_total_ticks_with_unnormalized_extremes() {
        let config = Configuration {
            timing: PhaseDurations::uniform(u32::MAX),
            repeat_count_per_step: u32::MAX,
            ..Configuration::default()
        };

        let expected = 4 * u64::from(MAX_PHASE_TICKS) * u64::from(MAX_REPEAT_COUNT) * 9;
        assert_eq!(total_session_ticks(&config), expected);
    }
}
