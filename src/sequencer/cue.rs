// Audio cues - Which sound accompanies a channel/phase pair
// and the collaborator interface the sequencer drives

use super::program::{Phase, SequenceStep};
use std::convert::Infallible;
use std::fmt;

/// Asset name of the silent buffer used to wake the output
pub const SILENCE_ASSET: &str = "silence";

/// Identifier of a cue asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCueKey {
    NoseIn,
    NoseOut,
    MouthIn,
    MouthOut,
}

impl AudioCueKey {
    pub const ALL: [AudioCueKey; 4] = [
        AudioCueKey::NoseIn,
        AudioCueKey::NoseOut,
        AudioCueKey::MouthIn,
        AudioCueKey::MouthOut,
    ];

    /// Cue for a channel during a phase; `None` means silence
    pub fn for_step(step: SequenceStep, phase: Phase) -> Option<Self> {
        match (step, phase) {
            (SequenceStep::Nose, Phase::Inhale) => Some(AudioCueKey::NoseIn),
            (SequenceStep::Nose, Phase::Exhale) => Some(AudioCueKey::NoseOut),
            (SequenceStep::Mouth, Phase::Inhale) => Some(AudioCueKey::MouthIn),
            (SequenceStep::Mouth, Phase::Exhale) => Some(AudioCueKey::MouthOut),
            (_, Phase::Rest | Phase::Hold) => None,
        }
    }

    /// File stem of the asset
    pub fn asset_name(self) -> &'static str {
        match self {
            AudioCueKey::NoseIn => "nose-in",
            AudioCueKey::NoseOut => "nose-out",
            AudioCueKey::MouthIn => "mouth-in",
            AudioCueKey::MouthOut => "mouth-out",
        }
    }
}

impl fmt::Display for AudioCueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.asset_name())
    }
}

/// Plays cues on behalf of the sequencer
///
/// Errors are reported back to the sequencer, which logs them and carries on.
pub trait CuePlayer {
    type Error: fmt::Display;

    /// Play the cue so that it lasts `phase_ticks` ticks, replacing any current cue
    fn play(&mut self, key: AudioCueKey, phase_ticks: u32) -> Result<(), Self::Error>;

    /// Silence the current cue
    fn stop(&mut self);

    /// Called when a session starts, before the first tick
    fn prime(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Player that never makes a sound
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCuePlayer;

impl CuePlayer for SilentCuePlayer {
    type Error = Infallible;

    fn play(&mut self, _key: AudioCueKey, _phase_ticks: u32) -> Result<(), Self::Error> {
        Ok(())
    }

    fn stop(&mut self) {}
}
