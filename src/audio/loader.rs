// Cue sample loading
// Decodes wav (hound), flac (claxon) and mp3 (symphonia) into mono f32

use crate::audio::AudioError;
use crate::audio::format_conversion::{downmix_interleaved, int_to_f32};
use claxon::FlacReader;
use hound::WavReader;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decoded mono cue buffer
#[derive(Debug, Clone, PartialEq)]
pub struct CueSample {
    pub name: String,
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl CueSample {
    pub fn new(name: impl Into<String>, samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            name: name.into(),
            samples,
            sample_rate: sample_rate.max(1),
        }
    }

    /// Length of the buffer in seconds at its native rate
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Load a cue sample, picking the decoder from the file extension
pub fn load_cue_sample(path: &Path) -> Result<CueSample, AudioError> {
    let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

    let sample = match extension.to_lowercase().as_str() {
        "wav" => load_wav(path)?,
        "flac" => load_flac(path)?,
        "mp3" => load_compressed(path, "mp3")?,
        _ => return Err(AudioError::UnsupportedFile(extension.to_string())),
    };

    tracing::debug!(
        path = %path.display(),
        frames = sample.samples.len(),
        sample_rate = sample.sample_rate,
        "Decoded cue sample"
    );
    Ok(sample)
}

fn sample_name(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

fn load_wav(path: &Path) -> Result<CueSample, AudioError> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let bits = u32::from(spec.bits_per_sample);
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| int_to_f32(v, bits)))
                .collect::<Result<_, _>>()?
        }
    };

    Ok(CueSample::new(
        sample_name(path),
        downmix_interleaved(&interleaved, usize::from(spec.channels)),
        spec.sample_rate,
    ))
}

fn load_flac(path: &Path) -> Result<CueSample, AudioError> {
    let mut reader = FlacReader::open(path)?;
    let info = reader.streaminfo();

    let interleaved: Vec<f32> = reader
        .samples()
        .map(|s| s.map(|v| int_to_f32(v, info.bits_per_sample)))
        .collect::<Result<_, _>>()?;

    Ok(CueSample::new(
        sample_name(path),
        downmix_interleaved(&interleaved, info.channels as usize),
        info.sample_rate,
    ))
}

fn load_compressed(path: &Path, extension: &str) -> Result<CueSample, AudioError> {
    let file = std::fs::File::open(path)?;
    let stream = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(extension);

    let probed = symphonia::default::get_probe().format(
        &hint,
        stream,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AudioError::NoTrack(path.display().to_string()))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(44_100);

    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);
                samples.extend(downmix_interleaved(buffer.samples(), spec.channels.count()));
            }
            Err(SymphoniaError::DecodeError(reason)) => {
                tracing::warn!(path = %path.display(), reason, "Skipping corrupt packet");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(CueSample::new(sample_name(path), samples, sample_rate))
}
