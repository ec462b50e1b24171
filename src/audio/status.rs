// Audio status - Asset loading and output device state

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Progress of the cue asset loader
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AudioLoadState {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

impl AudioLoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AudioLoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AudioLoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for AudioLoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioLoadState::Loading => write!(f, "loading audio"),
            AudioLoadState::Ready => write!(f, "audio ready"),
            AudioLoadState::Failed(message) => write!(f, "audio unavailable: {}", message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    Disconnected = 0,
    Connected = 1,
    Error = 2,
}

impl From<u8> for DeviceStatus {
    fn from(value: u8) -> Self {
        match value {
            1 => DeviceStatus::Connected,
            2 => DeviceStatus::Error,
            _ => DeviceStatus::Disconnected,
        }
    }
}

/// Device status shared with the stream error callback
#[derive(Clone, Debug)]
pub struct AtomicDeviceStatus {
    inner: Arc<AtomicU8>,
}

impl AtomicDeviceStatus {
    pub fn new(status: DeviceStatus) -> Self {
        Self {
            inner: Arc::new(AtomicU8::new(status as u8)),
        }
    }

    pub fn get(&self) -> DeviceStatus {
        DeviceStatus::from(self.inner.load(Ordering::Relaxed))
    }

    pub fn set(&self, status: DeviceStatus) {
        self.inner.store(status as u8, Ordering::Relaxed);
    }
}

impl Default for AtomicDeviceStatus {
    fn default() -> Self {
        Self::new(DeviceStatus::Disconnected)
    }
}
