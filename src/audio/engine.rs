// Audio engine - Real-time cpal output for breathing cues
//
// The device's preferred sample format (F32, I16, U16) decides the stream
// type. Cues are rendered as mono f32 and written to every output channel at
// the end of the callback.
//
// On macOS the Stream is neither Send nor Sync, so the engine stays on the
// thread that created it. Stream errors are reported through the device status
// and the notification queue; there is no automatic reconnection.

use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig};
use std::sync::{Arc, Mutex};

use crate::audio::AudioError;
use crate::audio::device::AudioDeviceManager;
use crate::audio::dsp_utils::{OnePoleSmoother, flush_denormals_to_zero, soft_clip};
use crate::audio::format_conversion::write_mono_to_interleaved_frame;
use crate::audio::parameters::AtomicF32;
use crate::audio::status::{AtomicDeviceStatus, DeviceStatus};
use crate::audio::voice::CuePlayback;
use crate::messaging::channels::{CommandConsumer, NotificationProducer};
use crate::messaging::notification::{Notification, NotificationCategory};

/// Volume smoothing, long enough to avoid clicks on slider moves
const VOLUME_SMOOTHING_MS: f32 = 10.0;

pub struct AudioEngine {
    _stream: Stream,
    device_name: String,
    status: AtomicDeviceStatus,
}

impl AudioEngine {
    /// Open `device_name` (or the default output) and start streaming
    pub fn new(
        command_rx: CommandConsumer,
        notification_tx: Arc<Mutex<NotificationProducer>>,
        volume: AtomicF32,
        device_name: Option<&str>,
    ) -> Result<Self, AudioError> {
        let device = AudioDeviceManager::new()
            .output_device(device_name)
            .ok_or_else(|| match device_name {
                Some(name) => AudioError::DeviceNotFound(name.to_string()),
                None => AudioError::NoDevice,
            })?;
        let name = device.name().unwrap_or_else(|_| "Unknown".to_string());

        let supported_config = device.default_output_config()?;
        let sample_format = supported_config.sample_format();
        let sample_rate = supported_config.sample_rate().0 as f32;
        let channels = usize::from(supported_config.channels());
        let config: StreamConfig = supported_config.into();

        tracing::info!(
            device = %name,
            sample_rate,
            channels,
            format = ?sample_format,
            "Opening audio output"
        );

        let status = AtomicDeviceStatus::new(DeviceStatus::Disconnected);
        let stream = match sample_format {
            SampleFormat::F32 => Self::build_stream::<f32>(
                &device,
                &config,
                channels,
                command_rx,
                volume.clone(),
                status.clone(),
                notification_tx,
            ),
            SampleFormat::I16 => Self::build_stream::<i16>(
                &device,
                &config,
                channels,
                command_rx,
                volume.clone(),
                status.clone(),
                notification_tx,
            ),
            SampleFormat::U16 => Self::build_stream::<u16>(
                &device,
                &config,
                channels,
                command_rx,
                volume.clone(),
                status.clone(),
                notification_tx,
            ),
            other => return Err(AudioError::UnsupportedSampleFormat(format!("{:?}", other))),
        }?;

        stream.play()?;
        status.set(DeviceStatus::Connected);

        Ok(Self {
            _stream: stream,
            device_name: name,
            status,
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Output state, flipped to `Error` by the stream error callback
    pub fn status(&self) -> DeviceStatus {
        self.status.get()
    }

    fn build_stream<T>(
        device: &Device,
        config: &StreamConfig,
        channels: usize,
        mut command_rx: CommandConsumer,
        volume: AtomicF32,
        status: AtomicDeviceStatus,
        notification_tx: Arc<Mutex<NotificationProducer>>,
    ) -> Result<Stream, AudioError>
    where
        T: SizedSample + FromSample<f32> + Send + 'static,
    {
        let sample_rate = config.sample_rate.0 as f32;
        let mut playback = CuePlayback::new(sample_rate);
        let mut smoother = OnePoleSmoother::new(volume.get(), VOLUME_SMOOTHING_MS, sample_rate);
        let channels = channels.max(1);

        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                // No allocations, no I/O, no blocking locks past this point
                while let Some(command) = ringbuf::traits::Consumer::try_pop(&mut command_rx) {
                    playback.handle_command(command);
                }

                for frame in data.chunks_mut(channels) {
                    let gain = smoother.process(volume.get());
                    let value = flush_denormals_to_zero(playback.next_sample());
                    write_mono_to_interleaved_frame(soft_clip(value * gain), frame);
                }
            },
            move |err| {
                tracing::error!(error = %err, "Audio stream error");
                status.set(DeviceStatus::Error);

                if let Ok(mut tx) = notification_tx.try_lock() {
                    let notification = Notification::error(
                        NotificationCategory::Audio,
                        format!("Audio stream error: {}", err),
                    );
                    let _ = ringbuf::traits::Producer::try_push(&mut *tx, notification);
                }
            },
            None,
        )?;

        Ok(stream)
    }
}
