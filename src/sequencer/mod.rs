// Sequencer module
// Breathing program, tick clock, state machine and display projection

pub mod clock;
pub mod cue;
pub mod format;
pub mod machine;
pub mod program;
pub mod projection;
pub mod state;

pub use clock::{TICK_INTERVAL, TickClock};
pub use cue::{AudioCueKey, CuePlayer, SILENCE_ASSET, SilentCuePlayer};
pub use machine::{Sequencer, SubscriptionId};
pub use program::{Phase, SEQUENCE_TABLE, STEPS_PER_SEQUENCE, Sequence, SequenceStep};
pub use projection::Projection;
pub use state::SequencerState;
