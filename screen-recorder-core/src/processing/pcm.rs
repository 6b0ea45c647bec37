//! Conversion of engine audio frames into the output encoding profile.

use crate::models::audio_models::{AudioEncodingProfile, AudioFrame};

/// Converts engine frames to the profile's channel layout and sample rate,
/// then to little-endian 16-bit PCM.
///
/// Holds resampling phase between calls, so one converter serves one stream.
#[derive(Debug, Clone)]
pub struct PcmConverter {
    target_sample_rate: f64,
    target_channels: u16,
    resampler: StreamResampler,
}

impl PcmConverter {
    pub fn new(profile: &AudioEncodingProfile) -> Self {
        Self {
            target_sample_rate: profile.sample_rate,
            target_channels: profile.channels,
            resampler: StreamResampler::default(),
        }
    }

    /// Conform a frame to the target layout. Returns interleaved samples.
    pub fn conform(&mut self, frame: AudioFrame<'_>) -> Vec<f32> {
        if frame.channels == 0 || frame.samples.is_empty() {
            return Vec::new();
        }

        let channels = frame.channels as usize;
        let laid_out = match (channels, self.target_channels) {
            (1, 1) | (2, 2) => frame.samples.to_vec(),
            (_, 1) => downmix_to_mono(frame.samples, channels),
            (1, _) => duplicate_mono(frame.samples),
            // More than two source channels into stereo: keep the first pair.
            (_, _) => frame
                .samples
                .chunks_exact(channels)
                .flat_map(|f| [f[0], f[1]])
                .collect(),
        };

        self.resampler.process(
            &laid_out,
            self.target_channels as usize,
            frame.sample_rate,
            self.target_sample_rate,
        )
    }

    /// Convert f32 samples `[-1.0, 1.0]` to 16-bit PCM bytes, clamping out-of-range values.
    pub fn to_int16_le(samples: &[f32]) -> Vec<u8> {
        let mut data = Vec::with_capacity(samples.len() * 2);
        for &sample in samples {
            let clamped = sample.clamp(-1.0, 1.0);
            let value = (clamped * i16::MAX as f32) as i16;
            data.extend_from_slice(&value.to_le_bytes());
        }
        data
    }
}

/// Average interleaved channels per frame.
pub fn downmix_to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    let scale = 1.0 / channels as f32;
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() * scale)
        .collect()
}

/// `[a, b]` → `[a, a, b, b]`.
pub fn duplicate_mono(samples: &[f32]) -> Vec<f32> {
    samples.iter().flat_map(|&s| [s, s]).collect()
}

/// Linear-interpolation resampler for a stream of interleaved buffers.
///
/// The read position and the last source frame carry over from one buffer
/// to the next. Splitting a stream into callbacks therefore yields the same
/// output length as one long buffer, and there is no seam at the boundary.
/// The final fraction of a frame is held back until more input arrives.
#[derive(Debug, Clone, Default)]
pub struct StreamResampler {
    source_rate: f64,
    channels: usize,
    /// Read position in source frames. Index 0 is `previous` when one is held.
    position: f64,
    previous: Vec<f32>,
}

impl StreamResampler {
    pub fn reset(&mut self) {
        self.position = 0.0;
        self.previous.clear();
    }

    /// Resample one buffer. Matching rates pass through unchanged.
    pub fn process(&mut self, samples: &[f32], channels: usize, source_rate: f64, target_rate: f64) -> Vec<f32> {
        if channels == 0 || samples.is_empty() || source_rate <= 0.0 || (source_rate - target_rate).abs() < 0.01 {
            self.reset();
            return samples.to_vec();
        }
        if source_rate != self.source_rate || channels != self.channels {
            self.reset();
            self.source_rate = source_rate;
            self.channels = channels;
        }

        let input_frames = samples.len() / channels;
        if input_frames == 0 {
            return Vec::new();
        }
        let carried = self.previous.len() / channels;
        let frame_count = carried + input_frames;
        let step = source_rate / target_rate;

        let sample_at = |index: usize, ch: usize| -> f32 {
            if index < carried {
                self.previous[ch]
            } else {
                samples[(index - carried) * channels + ch]
            }
        };

        let mut output = Vec::with_capacity(((frame_count as f64 / step) as usize + 1) * channels);
        let mut position = self.position;
        while position + 1.0 < frame_count as f64 {
            let index = position as usize;
            let fraction = (position - index as f64) as f32;
            for ch in 0..channels {
                let current = sample_at(index, ch);
                let next = sample_at(index + 1, ch);
                output.push(current * (1.0 - fraction) + next * fraction);
            }
            position += step;
        }

        self.position = position - (frame_count - 1) as f64;
        let last = (input_frames - 1) * channels;
        self.previous.clear();
        self.previous.extend_from_slice(&samples[last..last + channels]);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn profile(sample_rate: f64, channels: u16) -> AudioEncodingProfile {
        AudioEncodingProfile {
            sample_rate,
            channels,
            bit_depth: 16,
        }
    }

    #[test]
    fn matching_frame_passes_through() {
        let mut converter = PcmConverter::new(&profile(48000.0, 2));
        let samples = [0.1, 0.2, 0.3, 0.4];
        assert_eq!(converter.conform(AudioFrame::new(&samples, 48000.0, 2)), samples.to_vec());
    }

    #[test]
    fn stereo_is_downmixed_for_mono_profile() {
        let mut converter = PcmConverter::new(&profile(48000.0, 1));
        let mono = converter.conform(AudioFrame::new(&[0.2, 0.8, 0.4, 0.6], 48000.0, 2));
        assert_eq!(mono.len(), 2);
        assert_abs_diff_eq!(mono[0], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(mono[1], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn mono_is_duplicated_for_stereo_profile() {
        let mut converter = PcmConverter::new(&profile(48000.0, 2));
        let stereo = converter.conform(AudioFrame::new(&[0.1, 0.2], 48000.0, 1));
        assert_eq!(stereo, vec![0.1, 0.1, 0.2, 0.2]);
    }

    #[test]
    fn surround_keeps_front_pair() {
        let mut converter = PcmConverter::new(&profile(48000.0, 2));
        let stereo = converter.conform(AudioFrame::new(&[0.1, 0.2, 0.9, 0.9, 0.3, 0.4, 0.9, 0.9], 48000.0, 4));
        assert_eq!(stereo, vec![0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn upsamples_with_interpolation_across_buffers() {
        let mut resampler = StreamResampler::default();
        let first = resampler.process(&[0.0, 1.0], 1, 24000.0, 48000.0);
        assert_eq!(first.len(), 2);
        assert_abs_diff_eq!(first[0], 0.0, epsilon = 0.01);
        assert_abs_diff_eq!(first[1], 0.5, epsilon = 0.01);

        // The held-back frame is interpolated against the next buffer.
        let second = resampler.process(&[0.0], 1, 24000.0, 48000.0);
        assert_eq!(second.len(), 2);
        assert_abs_diff_eq!(second[0], 1.0, epsilon = 0.01);
        assert_abs_diff_eq!(second[1], 0.5, epsilon = 0.01);
    }

    #[test]
    fn downsamples_stereo_frames() {
        let samples: Vec<f32> = (0..200).map(|i| i as f32 / 200.0).collect();
        let output = StreamResampler::default().process(&samples, 2, 48000.0, 24000.0);
        assert_eq!(output.len(), 100);
    }

    #[test]
    fn chunked_stream_keeps_the_target_rate() {
        let mut converter = PcmConverter::new(&profile(48000.0, 1));
        let chunk = [0.25f32; 1024];
        let total: usize = (0..1000)
            .map(|_| converter.conform(AudioFrame::new(&chunk, 44100.0, 1)).len())
            .sum();

        // 1000 x 1024 frames at 44.1 kHz is 1_114_557.8 frames at 48 kHz.
        let expected = 1024.0 * 1000.0 * 48000.0 / 44100.0;
        assert!((total as f64 - expected).abs() <= 2.0, "got {total} frames, expected ~{expected}");
    }

    #[test]
    fn source_rate_change_restarts_the_stream() {
        let mut resampler = StreamResampler::default();
        resampler.process(&[0.5; 7], 1, 44100.0, 48000.0);
        let output = resampler.process(&[0.0, 1.0], 1, 24000.0, 48000.0);
        assert_eq!(output.len(), 2);
        assert_abs_diff_eq!(output[0], 0.0, epsilon = 0.01);
    }

    #[test]
    fn int16_conversion_clamps() {
        let pcm = PcmConverter::to_int16_le(&[0.0, 1.0, -3.0]);
        assert_eq!(pcm.len(), 6);
        assert_eq!(i16::from_le_bytes([pcm[0], pcm[1]]), 0);
        assert_eq!(i16::from_le_bytes([pcm[2], pcm[3]]), i16::MAX);
        assert_eq!(i16::from_le_bytes([pcm[4], pcm[5]]), -i16::MAX);
    }

    #[test]
    fn empty_or_channelless_frames_yield_nothing() {
        let mut converter = PcmConverter::new(&profile(48000.0, 2));
        assert!(converter.conform(AudioFrame::new(&[], 48000.0, 2)).is_empty());
        assert!(converter.conform(AudioFrame::new(&[0.5], 48000.0, 0)).is_empty());
    }
}
