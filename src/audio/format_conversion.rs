// Format conversion
//
// Decoded assets are normalised to mono f32; the output callback writes that
// mono signal into every channel of the device's native sample type.

use cpal::{FromSample, Sample};

/// Convert a signed integer sample of `bits` width to [-1.0, 1.0]
#[inline]
pub fn int_to_f32(sample: i32, bits: u32) -> f32 {
    let bits = bits.clamp(1, 32);
    let scale = (1u64 << (bits - 1)) as f32;
    (sample as f32 / scale).clamp(-1.0, 1.0)
}

/// Average interleaved frames into a mono signal
pub fn downmix_interleaved(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }

    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Write a mono f32 sample to every channel of an interleaved frame
#[inline]
pub fn write_mono_to_interleaved_frame<T>(internal_sample: f32, output_frame: &mut [T])
where
    T: Sample + FromSample<f32>,
{
    for channel_sample in output_frame.iter_mut() {
        *channel_sample = Sample::from_sample::<f32>(internal_sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_to_f32() {
        assert_eq!(int_to_f32(0, 16), 0.0);
        assert_eq!(int_to_f32(i16::MIN as i32, 16), -1.0);
        assert!((int_to_f32(i16::MAX as i32, 16) - 1.0).abs() < 0.001);
        assert!((int_to_f32(1 << 22, 24) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_downmix_stereo() {
        let mono = downmix_interleaved(&[1.0, 0.0, 0.5, 0.5, -1.0, 1.0], 2);
        assert_eq!(mono, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_downmix_mono_passthrough() {
        let mono = downmix_interleaved(&[0.1, 0.2], 1);
        assert_eq!(mono, vec![0.1, 0.2]);
    }

    #[test]
    fn test_write_mono_to_interleaved() {
        let mut output: [f32; 2] = [0.0; 2];
        write_mono_to_interleaved_frame(0.5, &mut output);
        assert_eq!(output, [0.5, 0.5]);

        let mut output_i16: [i16; 2] = [0; 2];
        write_mono_to_interleaved_frame(0.5, &mut output_i16);
        assert!(output_i16[0] > 0);
        assert_eq!(output_i16[0], output_i16[1]);
    }
}
