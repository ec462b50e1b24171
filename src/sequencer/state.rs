// Sequencer state - Raw counters advanced by the tick function

use super::program::Phase;

/// Position of the sequencer inside the exercise program
///
/// The idle state (`Default`) is all zeros with `is_running == false`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SequencerState {
    pub phase: Phase,
    pub ticks_elapsed_in_phase: u32,
    pub sequence_index: usize,
    pub step_index: usize,
    pub repeats_completed: u32,
    pub is_running: bool,
}

impl SequencerState {
    /// Fresh idle state
    pub fn idle() -> Self {
        Self::default()
    }

    /// Zeroed counters with the running flag set
    pub fn running() -> Self {
        Self {
            is_running: true,
            ..Self::default()
        }
    }

    /// True when every counter is at its initial value
    pub fn is_idle(&self) -> bool {
        *self == Self::idle()
    }
}
