// Audio cue player - Bridges the sequencer's cues to the audio engine

use crate::audio::AudioError;
use crate::audio::bank::CueBank;
use crate::audio::engine::AudioEngine;
use crate::audio::parameters::AtomicF32;
use crate::audio::status::DeviceStatus;
use crate::audio::voice::playback_rate_for;
use crate::messaging::channels::{
    COMMAND_CAPACITY, CommandProducer, NOTIFICATION_CAPACITY, NotificationConsumer,
    create_command_channel, create_notification_channel,
};
use crate::messaging::command::Command;
use crate::messaging::notification::Notification;
use crate::sequencer::{AudioCueKey, CuePlayer, TICK_INTERVAL};
use ringbuf::traits::{Consumer, Producer};
use std::sync::{Arc, Mutex};

/// `CuePlayer` that sends decoded cues to the real-time output
///
/// Playing fails until a bank has been installed with `set_bank`.
pub struct AudioCuePlayer {
    engine: Option<AudioEngine>,
    command_tx: Option<CommandProducer>,
    notification_rx: Option<NotificationConsumer>,
    bank: Option<Arc<CueBank>>,
    volume: AtomicF32,
}

impl AudioCuePlayer {
    /// Open the output device and start the stream
    pub fn open(device_name: Option<&str>, gain: f32) -> Result<Self, AudioError> {
        let volume = AtomicF32::new(gain);
        let (command_tx, command_rx) = create_command_channel(COMMAND_CAPACITY);
        let (notification_tx, notification_rx) = create_notification_channel(NOTIFICATION_CAPACITY);

        let engine = AudioEngine::new(
            command_rx,
            Arc::new(Mutex::new(notification_tx)),
            volume.clone(),
            device_name,
        )?;

        Ok(Self {
            engine: Some(engine),
            command_tx: Some(command_tx),
            notification_rx: Some(notification_rx),
            bank: None,
            volume,
        })
    }

    /// A player without any output; every cue fails with `NoDevice`
    pub fn disconnected() -> Self {
        Self {
            engine: None,
            command_tx: None,
            notification_rx: None,
            bank: None,
            volume: AtomicF32::default(),
        }
    }

    /// A player writing to an existing command queue instead of a device
    pub fn with_channel(command_tx: CommandProducer) -> Self {
        Self {
            command_tx: Some(command_tx),
            ..Self::disconnected()
        }
    }

    pub fn set_bank(&mut self, bank: CueBank) {
        self.bank = Some(Arc::new(bank));
    }

    pub fn is_loaded(&self) -> bool {
        self.bank.is_some()
    }

    pub fn has_output(&self) -> bool {
        self.command_tx.is_some()
    }

    pub fn device_name(&self) -> Option<&str> {
        self.engine.as_ref().map(AudioEngine::device_name)
    }

    /// State of the output stream; `Disconnected` without a device
    pub fn device_status(&self) -> DeviceStatus {
        self.engine
            .as_ref()
            .map_or(DeviceStatus::Disconnected, AudioEngine::status)
    }

    pub fn set_volume(&self, gain: f32) {
        self.volume.set(gain.clamp(0.0, 1.0));
    }

    pub fn volume(&self) -> f32 {
        self.volume.get()
    }

    /// Notifications raised by the output stream since the last call
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        match self.notification_rx.as_mut() {
            Some(rx) => rx.pop_iter().collect(),
            None => Vec::new(),
        }
    }

    fn send(&mut self, command: Command) -> Result<(), AudioError> {
        let tx = self.command_tx.as_mut().ok_or(AudioError::NoDevice)?;
        tx.try_push(command).map_err(|_| AudioError::QueueFull)
    }
}

impl CuePlayer for AudioCuePlayer {
    type Error = AudioError;

    fn play(&mut self, key: AudioCueKey, phase_ticks: u32) -> Result<(), AudioError> {
        let bank = self.bank.as_ref().ok_or(AudioError::NotLoaded)?;
        let sample = Arc::clone(bank.get(key).ok_or(AudioError::MissingCue(key))?);

        let phase_secs = f64::from(phase_ticks) * TICK_INTERVAL.as_secs_f64();
        let playback_rate = playback_rate_for(sample.duration_secs(), phase_secs);
        tracing::debug!(cue = %key, phase_ticks, playback_rate, "Playing cue");

        self.send(Command::PlayCue {
            sample,
            playback_rate,
        })
    }

    fn stop(&mut self) {
        match self.send(Command::StopCue) {
            Ok(()) | Err(AudioError::NoDevice) => {}
            Err(e) => tracing::warn!(error = %e, "Stop cue not delivered, output may keep playing"),
        }
    }

    /// Play the silent asset so the output is running before the first cue
    fn prime(&mut self) -> Result<(), AudioError> {
        let bank = self.bank.as_ref().ok_or(AudioError::NotLoaded)?;
        let sample = Arc::clone(bank.silence());
        self.send(Command::PlayCue {
            sample,
            playback_rate: 1.0,
        })
    }
}

impl std::fmt::Debug for AudioCuePlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioCuePlayer")
            .field("device", &self.device_name())
            .field("has_output", &self.has_output())
            .field("status", &self.device_status())
            .field("loaded", &self.is_loaded())
            .field("volume", &self.volume())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::CueSample;

    fn bank() -> CueBank {
        // 4 s cue buffers at 1 kHz
        let cues = AudioCueKey::ALL
            .into_iter()
            .map(|key| (key, CueSample::new(key.asset_name(), vec![0.1; 4000], 1000)));
        CueBank::from_samples(cues, CueSample::new("silence", vec![0.0; 100], 1000))
    }

    #[test]
    fn test_play_before_load_fails() {
        let (tx, _rx) = create_command_channel(4);
        let mut player = AudioCuePlayer::with_channel(tx);

        assert!(matches!(
            player.play(AudioCueKey::NoseIn, 10),
            Err(AudioError::NotLoaded)
        ));
        assert!(matches!(player.prime(), Err(AudioError::NotLoaded)));
    }

    #[test]
    fn test_play_stretches_cue_to_phase() {
        let (tx, mut rx) = create_command_channel(4);
        let mut player = AudioCuePlayer::with_channel(tx);
        player.set_bank(bank());

        player.play(AudioCueKey::MouthOut, 10).unwrap();

        match rx.try_pop() {
            Some(Command::PlayCue {
                sample,
                playback_rate,
            }) => {
                assert_eq!(sample.name, "mouth-out");
                assert!((playback_rate - 0.4).abs() < 1e-9);
            }
            other => panic!("expected PlayCue, got {:?}", other),
        }
    }

    #[test]
    fn test_prime_plays_silence_at_unit_rate() {
        let (tx, mut rx) = create_command_channel(4);
        let mut player = AudioCuePlayer::with_channel(tx);
        player.set_bank(bank());

        player.prime().unwrap();
        assert!(matches!(
            rx.try_pop(),
            Some(Command::PlayCue { sample, playback_rate }) if sample.name == "silence" && playback_rate == 1.0
        ));
    }

    #[test]
    fn test_stop_sends_stop_command() {
        let (tx, mut rx) = create_command_channel(4);
        let mut player = AudioCuePlayer::with_channel(tx);

        player.stop();
        assert!(matches!(rx.try_pop(), Some(Command::StopCue)));
    }

    #[test]
    fn test_full_queue_is_reported() {
        let (tx, _rx) = create_command_channel(1);
        let mut player = AudioCuePlayer::with_channel(tx);
        player.set_bank(bank());

        player.play(AudioCueKey::NoseIn, 10).unwrap();
        assert!(matches!(
            player.play(AudioCueKey::NoseOut, 10),
            Err(AudioError::QueueFull)
        ));
    }

    #[test]
    fn test_stop_on_full_queue_keeps_pending_commands() {
        let (tx, mut rx) = create_command_channel(1);
        let mut player = AudioCuePlayer::with_channel(tx);
        player.set_bank(bank());

        player.play(AudioCueKey::NoseIn, 10).unwrap();
        player.stop();

        assert!(matches!(rx.try_pop(), Some(Command::PlayCue { .. })));
        assert!(rx.try_pop().is_none());

        // once the callback drains the queue, stop goes through again
        player.stop();
        assert!(matches!(rx.try_pop(), Some(Command::StopCue)));
    }

    #[test]
    fn test_disconnected_player() {
        let mut player = AudioCuePlayer::disconnected();
        player.set_bank(bank());

        assert!(!player.has_output());
        assert_eq!(player.device_status(), DeviceStatus::Disconnected);
        assert!(matches!(
            player.play(AudioCueKey::NoseIn, 10),
            Err(AudioError::NoDevice)
        ));
        player.stop();
        assert!(player.drain_notifications().is_empty());
    }

    #[test]
    fn test_volume_is_clamped() {
        let player = AudioCuePlayer::disconnected();
        player.set_volume(1.5);
        assert_eq!(player.volume(), 1.0);
        player.set_volume(0.5);
        assert_eq!(player.volume(), 0.5);
    }
}
