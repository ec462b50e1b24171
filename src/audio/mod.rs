// Audio module - Cue assets, real-time output and the cue player

pub mod bank;
pub mod device;
pub mod dsp_utils;
pub mod engine;
pub mod format_conversion;
pub mod loader;
pub mod parameters;
pub mod player;
pub mod status;
pub mod voice;

pub use bank::{CueBank, CueLoader};
pub use engine::AudioEngine;
pub use loader::{CueSample, load_cue_sample};
pub use player::AudioCuePlayer;
pub use status::{AudioLoadState, DeviceStatus};

use crate::sequencer::AudioCueKey;

/// Audio error types
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("No audio output device found")]
    NoDevice,

    #[error("Audio device not found: {0}")]
    DeviceNotFound(String),

    #[error("Unsupported sample format: {0}")]
    UnsupportedSampleFormat(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFile(String),

    #[error("Missing audio asset '{name}' in {dir}")]
    MissingAsset { name: String, dir: String },

    #[error("No audio track in {0}")]
    NoTrack(String),

    #[error("Audio assets are not loaded")]
    NotLoaded,

    #[error("No buffer for cue '{0}'")]
    MissingCue(AudioCueKey),

    #[error("Audio command queue is full")]
    QueueFull,

    #[error("Asset loader stopped unexpectedly")]
    LoaderPanicked,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("FLAC error: {0}")]
    Flac(#[from] claxon::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    #[error("Stream configuration error: {0}")]
    StreamConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("Stream creation error: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Stream start error: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}
