// Seven Breaths - Library exports for the binary, tests and benchmarks

pub mod audio;
pub mod cli;
pub mod config;
pub mod logging;
pub mod messaging;
pub mod sequencer;
pub mod ui;

// Re-export commonly used types for convenience
pub use audio::{AudioCuePlayer, AudioError, AudioLoadState, CueBank, CueLoader};
pub use config::{Configuration, PhaseDurations, SettingsError, SettingsStore};
pub use messaging::channels::{create_command_channel, create_notification_channel};
pub use sequencer::{
    AudioCueKey, CuePlayer, Phase, Projection, SequenceStep, Sequencer, SequencerState,
    SilentCuePlayer, TickClock,
};
