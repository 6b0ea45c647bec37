//! RIFF/WAVE header layout for 16-bit PCM output.
//!
//! ```text
//! [0-3]    "RIFF"           [22-23]  channels
//! [4-7]    file size - 8    [24-27]  sample_rate
//! [8-11]   "WAVE"           [28-31]  byte_rate
//! [12-15]  "fmt "           [32-33]  block_align
//! [16-19]  16               [34-35]  bits_per_sample
//! [20-21]  1 (PCM)          [36-39]  "data"
//!                           [40-43]  data_size
//! ```

use crate::models::audio_models::AudioEncodingProfile;
use crate::models::error::RecorderError;

pub const WAV_HEADER_SIZE: usize = 44;

/// Offset of the RIFF chunk size field.
pub const RIFF_SIZE_OFFSET: u64 = 4;

/// Offset of the data chunk size field.
pub const DATA_SIZE_OFFSET: u64 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub data_size: u32,
}

impl WavHeader {
    /// Header for an empty data chunk. Fails when the profile is invalid or
    /// its byte rate does not fit the 32-bit field.
    pub fn for_profile(profile: &AudioEncodingProfile) -> Result<Self, RecorderError> {
        profile.validate().map_err(RecorderError::ConfigurationFailed)?;

        let header = Self {
            sample_rate: profile.sample_rate.round() as u32,
            channels: profile.channels,
            bits_per_sample: profile.bit_depth,
            data_size: 0,
        };
        if header.byte_rate().is_none() {
            return Err(RecorderError::ConfigurationFailed(format!(
                "byte rate overflows for {} Hz x {} channels",
                header.sample_rate, header.channels
            )));
        }
        Ok(header)
    }

    pub fn block_align(&self) -> u16 {
        self.channels.saturating_mul(self.bits_per_sample) / 8
    }

    /// `None` when the rate does not fit the header field.
    pub fn byte_rate(&self) -> Option<u32> {
        self.sample_rate.checked_mul(u32::from(self.block_align()))
    }

    /// RIFF chunk size: everything after the first 8 bytes.
    pub fn riff_size(&self) -> u32 {
        (WAV_HEADER_SIZE as u32 - 8).saturating_add(self.data_size)
    }

    pub fn encode(&self) -> [u8; WAV_HEADER_SIZE] {
        let mut header = [0u8; WAV_HEADER_SIZE];

        header[0..4].copy_from_slice(b"RIFF");
        header[4..8].copy_from_slice(&self.riff_size().to_le_bytes());
        header[8..12].copy_from_slice(b"WAVE");

        header[12..16].copy_from_slice(b"fmt ");
        header[16..20].copy_from_slice(&16u32.to_le_bytes());
        header[20..22].copy_from_slice(&1u16.to_le_bytes());
        header[22..24].copy_from_slice(&self.channels.to_le_bytes());
        header[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        header[28..32].copy_from_slice(&self.byte_rate().unwrap_or(u32::MAX).to_le_bytes());
        header[32..34].copy_from_slice(&self.block_align().to_le_bytes());
        header[34..36].copy_from_slice(&self.bits_per_sample.to_le_bytes());

        header[36..40].copy_from_slice(b"data");
        header[40..44].copy_from_slice(&self.data_size.to_le_bytes());

        header
    }
}
