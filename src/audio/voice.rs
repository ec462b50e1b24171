// Cue voice - Resampled playback of a single cue buffer

use crate::audio::CueSample;
use crate::messaging::command::Command;
use std::sync::Arc;

/// Rate that stretches a buffer of `buffer_secs` over a phase of `phase_secs`
///
/// A 4 s asset in a 10 s phase plays at 0.4, so the cue ends with the phase.
pub fn playback_rate_for(buffer_secs: f64, phase_secs: f64) -> f64 {
    let rate = buffer_secs / phase_secs;
    if rate.is_finite() && rate > 0.0 {
        rate
    } else {
        1.0
    }
}

pub struct CueVoice {
    sample: Arc<CueSample>,
    position: f64,
    step: f64,
}

impl CueVoice {
    pub fn new(sample: Arc<CueSample>, playback_rate: f64, output_sample_rate: f32) -> Self {
        let output_rate = f64::from(output_sample_rate).max(1.0);
        let step = playback_rate * f64::from(sample.sample_rate) / output_rate;
        Self {
            sample,
            position: 0.0,
            step,
        }
    }

    pub fn name(&self) -> &str {
        &self.sample.name
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.sample.samples.len() as f64
    }

    /// Next output sample, linear interpolation between source frames
    pub fn next_sample(&mut self) -> f32 {
        if self.is_finished() {
            return 0.0;
        }

        let data = &self.sample.samples;
        let index = self.position as usize;
        let fraction = self.position.fract() as f32;

        let current = data.get(index).copied().unwrap_or(0.0);
        let next = data.get(index + 1).copied().unwrap_or(0.0);

        self.position += self.step;
        current + (next - current) * fraction
    }
}

/// At most one cue sounds at a time; a new cue replaces the previous one
pub struct CuePlayback {
    voice: Option<CueVoice>,
    output_sample_rate: f32,
}

impl CuePlayback {
    pub fn new(output_sample_rate: f32) -> Self {
        Self {
            voice: None,
            output_sample_rate,
        }
    }

    pub fn handle_command(&mut self, command: Command) {
        match command {
            Command::PlayCue {
                sample,
                playback_rate,
            } => {
                self.voice = Some(CueVoice::new(
                    sample,
                    playback_rate,
                    self.output_sample_rate,
                ));
            }
            Command::StopCue => self.voice = None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.voice.is_some()
    }

    pub fn current_cue(&self) -> Option<&str> {
        self.voice.as_ref().map(CueVoice::name)
    }

    pub fn next_sample(&mut self) -> f32 {
        let Some(voice) = self.voice.as_mut() else {
            return 0.0;
        };

        let value = voice.next_sample();
        if voice.is_finished() {
            self.voice = None;
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize, sample_rate: u32) -> Arc<CueSample> {
        let samples = (0..len).map(|i| i as f32 / len as f32).collect();
        Arc::new(CueSample::new("ramp", samples, sample_rate))
    }

    #[test]
    fn test_playback_rate_stretches_to_phase() {
        assert!((playback_rate_for(4.0, 10.0) - 0.4).abs() < 1e-12);
        assert!((playback_rate_for(10.0, 5.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_playback_rate_degenerate_inputs() {
        assert_eq!(playback_rate_for(4.0, 0.0), 1.0);
        assert_eq!(playback_rate_for(0.0, 10.0), 1.0);
        assert_eq!(playback_rate_for(f64::NAN, 10.0), 1.0);
    }

    #[test]
    fn test_voice_duration_follows_rate() {
        // 100 frames at rate 0.5 and equal sample rates -> 200 output samples
        let mut voice = CueVoice::new(ramp(100, 48_000), 0.5, 48_000.0);
        let mut produced = 0;
        while !voice.is_finished() {
            voice.next_sample();
            produced += 1;
        }
        assert_eq!(produced, 200);
    }

    #[test]
    fn test_voice_accounts_for_sample_rate_mismatch() {
        // 24 kHz source on a 48 kHz device at rate 1.0 -> twice as many samples
        let mut voice = CueVoice::new(ramp(50, 24_000), 1.0, 48_000.0);
        let mut produced = 0;
        while !voice.is_finished() {
            voice.next_sample();
            produced += 1;
        }
        assert_eq!(produced, 100);
    }

    #[test]
    fn test_voice_interpolates() {
        let sample = Arc::new(CueSample::new("two", vec![0.0, 1.0], 1000));
        let mut voice = CueVoice::new(sample, 0.5, 1000.0);
        assert_eq!(voice.next_sample(), 0.0);
        assert!((voice.next_sample() - 0.5).abs() < 1e-6);
        assert!((voice.next_sample() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_new_cue_replaces_current() {
        let mut playback = CuePlayback::new(48_000.0);
        playback.handle_command(Command::PlayCue {
            sample: Arc::new(CueSample::new("nose-in", vec![0.1; 10], 48_000)),
            playback_rate: 1.0,
        });
        playback.handle_command(Command::PlayCue {
            sample: Arc::new(CueSample::new("mouth-out", vec![0.2; 10], 48_000)),
            playback_rate: 1.0,
        });

        assert_eq!(playback.current_cue(), Some("mouth-out"));
        assert!((playback.next_sample() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_stop_silences_immediately() {
        let mut playback = CuePlayback::new(48_000.0);
        playback.handle_command(Command::PlayCue {
            sample: ramp(10, 48_000),
            playback_rate: 1.0,
        });
        playback.handle_command(Command::StopCue);

        assert!(!playback.is_playing());
        assert_eq!(playback.next_sample(), 0.0);
    }

    #[test]
    fn test_voice_released_when_finished() {
        let mut playback = CuePlayback::new(1000.0);
        playback.handle_command(Command::PlayCue {
            sample: Arc::new(CueSample::new("short", vec![0.5, 0.5], 1000)),
            playback_rate: 1.0,
        });

        playback.next_sample();
        assert!(playback.is_playing());
        playback.next_sample();
        assert!(!playback.is_playing());
    }
}
