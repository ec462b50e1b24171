// Configuration - Exercise timing and user preferences
// Owned by the sequencer, persisted as a flat JSON settings blob

pub mod migration;
pub mod settings;

pub use migration::{MigrationResult, SettingsMigrator};
pub use settings::{SettingsError, SettingsStore};

use crate::sequencer::program::Phase;
use serde::{Deserialize, Serialize};

/// Default length of every phase in ticks (seconds)
pub const DEFAULT_PHASE_TICKS: u32 = 10;

/// Default number of repeats of each sequence step
pub const DEFAULT_REPEAT_COUNT: u32 = 7;

/// Longest accepted phase, one hour of ticks
pub const MAX_PHASE_TICKS: u32 = 3600;

/// Largest accepted repeat count per step
pub const MAX_REPEAT_COUNT: u32 = 100;

/// Upper bound of the volume scale
pub const MAX_VOLUME: u8 = 30;

/// Default volume (middle of the scale)
pub const DEFAULT_VOLUME: u8 = 15;

/// Duration of each phase, in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDurations {
    pub rest: u32,
    pub inhale: u32,
    pub hold: u32,
    pub exhale: u32,
}

impl PhaseDurations {
    /// Same duration for every phase
    pub fn uniform(ticks: u32) -> Self {
        Self {
            rest: ticks,
            inhale: ticks,
            hold: ticks,
            exhale: ticks,
        }
    }

    /// Duration of a phase, clamped to `1..=MAX_PHASE_TICKS`
    pub fn get(&self, phase: Phase) -> u32 {
        let ticks = match phase {
            Phase::Rest => self.rest,
            Phase::Inhale => self.inhale,
            Phase::Hold => self.hold,
            Phase::Exhale => self.exhale,
        };
        ticks.clamp(1, MAX_PHASE_TICKS)
    }

    /// Set the duration of a phase (clamped to `1..=MAX_PHASE_TICKS`)
    pub fn set(&mut self, phase: Phase, ticks: u32) {
        let ticks = ticks.clamp(1, MAX_PHASE_TICKS);
        match phase {
            Phase::Rest => self.rest = ticks,
            Phase::Inhale => self.inhale = ticks,
            Phase::Hold => self.hold = ticks,
            Phase::Exhale => self.exhale = ticks,
        }
    }

    /// Length of one full breath cycle
    pub fn cycle_ticks(&self) -> u64 {
        Phase::ALL.iter().map(|&p| u64::from(self.get(p))).sum()
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self::uniform(DEFAULT_PHASE_TICKS)
    }
}

/// Exercise configuration
///
/// Field names follow the persisted settings keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub timing: PhaseDurations,
    pub repeat_count_per_step: u32,
    pub audio_enabled: bool,
    pub loop_enabled: bool,
    pub volume: u8,
}

impl Configuration {
    /// Duration of a phase in ticks
    pub fn duration(&self, phase: Phase) -> u32 {
        self.timing.get(phase)
    }

    /// Repeat count, clamped to `1..=MAX_REPEAT_COUNT`
    pub fn repeat_count(&self) -> u32 {
        self.repeat_count_per_step.clamp(1, MAX_REPEAT_COUNT)
    }

    /// Output gain derived from the 0-30 volume scale
    pub fn gain(&self) -> f32 {
        f32::from(self.volume.min(MAX_VOLUME)) / f32::from(MAX_VOLUME)
    }

    /// Clamp every field into its valid range
    pub fn normalized(mut self) -> Self {
        for phase in Phase::ALL {
            let ticks = self.timing.get(phase);
            self.timing.set(phase, ticks);
        }
        self.repeat_count_per_step = self.repeat_count();
        self.volume = self.volume.min(MAX_VOLUME);
        self
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            timing: PhaseDurations::default(),
            repeat_count_per_step: DEFAULT_REPEAT_COUNT,
            audio_enabled: true,
            loop_enabled: false,
            volume: DEFAULT_VOLUME,
        }
    }
}
