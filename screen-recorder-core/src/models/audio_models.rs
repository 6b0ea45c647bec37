use serde::{Deserialize, Serialize};

/// One buffer of captured audio, as delivered by the capture engine.
///
/// Samples are interleaved `f32` in `[-1.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioFrame<'a> {
    pub samples: &'a [f32],
    pub sample_rate: f64,
    pub channels: u16,
}

impl<'a> AudioFrame<'a> {
    pub fn new(samples: &'a [f32], sample_rate: f64, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    /// Number of sample frames (samples per channel).
    pub fn frame_count(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }
}

/// Lowest output sample rate accepted by [`AudioEncodingProfile::validate`].
pub const MIN_SAMPLE_RATE: f64 = 8_000.0;

/// Highest output sample rate accepted by [`AudioEncodingProfile::validate`].
/// Keeps the WAV byte rate well inside `u32`.
pub const MAX_SAMPLE_RATE: f64 = 384_000.0;

/// Output encoding for recorded audio files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioEncodingProfile {
    /// Target sample rate in Hz (default: 48000).
    pub sample_rate: f64,

    /// Number of output channels (default: 2). Valid values: 1, 2.
    pub channels: u16,

    /// Bit depth for PCM output. Only 16 is supported.
    pub bit_depth: u16,
}

impl AudioEncodingProfile {
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            return Err(format!(
                "sample rate {} Hz outside {}..={} Hz",
                self.sample_rate, MIN_SAMPLE_RATE, MAX_SAMPLE_RATE
            ));
        }
        if self.bit_depth != 16 {
            return Err(format!("unsupported bit depth: {}", self.bit_depth));
        }
        if ![1, 2].contains(&self.channels) {
            return Err(format!("unsupported channel count: {}", self.channels));
        }
        Ok(())
    }

    pub fn bytes_per_frame(&self) -> usize {
        self.channels as usize * self.bit_depth as usize / 8
    }
}

impl Default for AudioEncodingProfile {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            channels: 2,
            bit_depth: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_count_accounts_for_channels() {
        let samples = [0.0f32; 8];
        assert_eq!(AudioFrame::new(&samples, 48000.0, 2).frame_count(), 4);
        assert_eq!(AudioFrame::new(&samples, 48000.0, 1).frame_count(), 8);
        assert_eq!(AudioFrame::new(&samples, 48000.0, 0).frame_count(), 0);
    }

    #[test]
    fn profile_validation() {
        assert!(AudioEncodingProfile::default().validate().is_ok());

        let bad_depth = AudioEncodingProfile { bit_depth: 24, ..Default::default() };
        assert!(bad_depth.validate().is_err());

        let bad_channels = AudioEncodingProfile { channels: 6, ..Default::default() };
        assert!(bad_channels.validate().is_err());

        let bad_rate = AudioEncodingProfile { sample_rate: 0.0, ..Default::default() };
        assert!(bad_rate.validate().is_err());
    }

    #[test]
    fn sample_rate_must_fit_wav_header() {
        for rate in [2.0e9, 4_294_967_296.0, f64::NAN, f64::INFINITY, 7_999.0, 384_001.0] {
            let profile = AudioEncodingProfile { sample_rate: rate, ..Default::default() };
            assert!(profile.validate().is_err(), "{rate} Hz accepted");
        }
        for rate in [MIN_SAMPLE_RATE, 44_100.0, MAX_SAMPLE_RATE] {
            let profile = AudioEncodingProfile { sample_rate: rate, ..Default::default() };
            assert!(profile.validate().is_ok(), "{rate} Hz rejected");
        }
    }

    #[test]
    fn bytes_per_frame_for_stereo_16bit() {
        assert_eq!(AudioEncodingProfile::default().bytes_per_frame(), 4);
    }
}
