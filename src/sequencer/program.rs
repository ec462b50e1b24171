// Program - Breathing phases, channels and the fixed exercise table
// The table defines the order in which nose/mouth patterns are practiced

use serde::{Deserialize, Serialize};
use std::fmt;

/// One quarter-cycle of a breath
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Rest,
    Inhale,
    Hold,
    Exhale,
}

impl Phase {
    /// All phases in cycle order
    pub const ALL: [Phase; 4] = [Phase::Rest, Phase::Inhale, Phase::Hold, Phase::Exhale];

    /// Next phase in cycle order (exhale wraps to rest)
    pub fn next(self) -> Self {
        match self {
            Phase::Rest => Phase::Inhale,
            Phase::Inhale => Phase::Hold,
            Phase::Hold => Phase::Exhale,
            Phase::Exhale => Phase::Rest,
        }
    }

    /// Inhale and exhale consume a step of the current sequence
    pub fn is_active(self) -> bool {
        matches!(self, Phase::Inhale | Phase::Exhale)
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Rest => "rest",
            Phase::Inhale => "in",
            Phase::Hold => "hold",
            Phase::Exhale => "out",
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Rest
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Breathing channel used during an active phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceStep {
    Nose,
    Mouth,
}

impl SequenceStep {
    pub fn label(self) -> &'static str {
        match self {
            SequenceStep::Nose => "nose",
            SequenceStep::Mouth => "mouth",
        }
    }
}

impl fmt::Display for SequenceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered breathing channels practiced as one pattern
pub type Sequence = &'static [SequenceStep];

use SequenceStep::{Mouth, Nose};

/// The complete exercise program, in practice order
pub const SEQUENCE_TABLE: [Sequence; 9] = [
    &[Nose, Nose],
    &[Nose, Mouth],
    &[Mouth, Mouth],
    &[Nose, Mouth],
    &[Mouth, Mouth],
    &[Nose, Nose],
    &[Mouth, Mouth],
    &[Nose, Nose],
    &[Nose, Mouth],
];

/// Number of steps in each sequence of the table
pub const STEPS_PER_SEQUENCE: usize = 2;

/// Channel at the given sequence/step position, if it exists
pub fn step_at(sequence_index: usize, step_index: usize) -> Option<SequenceStep> {
    SEQUENCE_TABLE
        .get(sequence_index)
        .and_then(|sequence| sequence.get(step_index))
        .copied()
}
