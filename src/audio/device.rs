// Output device lookup through cpal

use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Device, Host};

#[derive(Clone, Debug)]
pub struct AudioDeviceInfo {
    pub name: String,
    pub is_default: bool,
}

pub struct AudioDeviceManager {
    host: Host,
}

impl AudioDeviceManager {
    pub fn new() -> Self {
        Self {
            host: cpal::default_host(),
        }
    }

    pub fn list_output_devices(&self) -> Vec<AudioDeviceInfo> {
        let default_name = self
            .host
            .default_output_device()
            .and_then(|d| d.name().ok())
            .unwrap_or_default();

        let Ok(devices) = self.host.output_devices() else {
            return Vec::new();
        };

        devices
            .filter_map(|device| device.name().ok())
            .map(|name| AudioDeviceInfo {
                is_default: name == default_name,
                name,
            })
            .collect()
    }

    /// Named device, or the host default when `name` is None
    pub fn output_device(&self, name: Option<&str>) -> Option<Device> {
        match name {
            None => self.host.default_output_device(),
            Some(wanted) => self
                .host
                .output_devices()
                .ok()?
                .find(|device| device.name().is_ok_and(|n| n == wanted)),
        }
    }
}

impl Default for AudioDeviceManager {
    fn default() -> Self {
        Self::new()
    }
}
