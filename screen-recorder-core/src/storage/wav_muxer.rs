use std::fs::{self, File};
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::models::audio_models::{AudioEncodingProfile, AudioFrame};
use crate::models::error::RecorderError;
use crate::processing::pcm::PcmConverter;
use crate::processing::wav_format::{WavHeader, DATA_SIZE_OFFSET, RIFF_SIZE_OFFSET, WAV_HEADER_SIZE};
use crate::traits::audio_muxer::AudioMuxer;

/// Streaming 16-bit PCM WAV muxer.
///
/// ## File Format
///
/// ```text
/// [44-byte WAV header, sizes patched on finish]
/// [raw 16-bit PCM data...]
/// ```
///
/// After a write error the muxer stops reporting readiness, so later frames
/// are dropped by the owning writer instead of interleaving with a torn write.
/// The same happens once the data chunk reaches [`MAX_DATA_BYTES`]: the
/// file is kept playable rather than growing past what the 32-bit RIFF
/// size fields can describe.
pub struct WavMuxer {
    file_path: PathBuf,
    converter: PcmConverter,
    header: WavHeader,
    file: Option<BufWriter<File>>,
    data_bytes: u64,
    data_limit: u64,
    session_started: bool,
    failed: bool,
    full: bool,
}

/// Largest data chunk whose RIFF size (`36 + data`) still fits in `u32`.
pub const MAX_DATA_BYTES: u64 = u32::MAX as u64 - (WAV_HEADER_SIZE as u64 - 8);

impl WavMuxer {
    /// Create the output file and write a placeholder header.
    pub fn create(file_path: PathBuf, profile: &AudioEncodingProfile) -> Result<Self, RecorderError> {
        let header = WavHeader::for_profile(profile)?;

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| RecorderError::StorageError(format!("failed to create directory: {}", e)))?;
        }

        let file = File::create(&file_path)
            .map_err(|e| RecorderError::StorageError(format!("failed to create file: {}", e)))?;
        let mut file = BufWriter::new(file);

        file.write_all(&header.encode())
            .map_err(|e| RecorderError::StorageError(format!("failed to write header: {}", e)))?;

        Ok(Self {
            file_path,
            converter: PcmConverter::new(profile),
            header,
            file: Some(file),
            data_bytes: 0,
            data_limit: MAX_DATA_BYTES,
            session_started: false,
            failed: false,
            full: false,
        })
    }

    /// Cap the data chunk below [`MAX_DATA_BYTES`].
    pub fn with_data_limit(mut self, limit: u64) -> Self {
        self.data_limit = limit.min(MAX_DATA_BYTES);
        self
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// PCM bytes written after the header.
    pub fn data_bytes(&self) -> u64 {
        self.data_bytes
    }

    fn patch_header(file: &mut BufWriter<File>, data_bytes: u64) -> io::Result<()> {
        let data_size = u32::try_from(data_bytes).unwrap_or(u32::MAX);
        let riff_size = data_size.saturating_add(WAV_HEADER_SIZE as u32 - 8);

        file.seek(SeekFrom::Start(RIFF_SIZE_OFFSET))?;
        file.write_all(&riff_size.to_le_bytes())?;
        file.seek(SeekFrom::Start(DATA_SIZE_OFFSET))?;
        file.write_all(&data_size.to_le_bytes())?;
        file.flush()?;
        file.get_ref().sync_all()
    }
}

impl AudioMuxer for WavMuxer {
    fn start_session(&mut self) -> Result<(), RecorderError> {
        if self.file.is_none() {
            return Err(RecorderError::StorageError("file is not open".into()));
        }
        self.session_started = true;
        Ok(())
    }

    fn is_ready_for_more_data(&self) -> bool {
        self.session_started && !self.failed && !self.full && self.file.is_some()
    }

    fn append(&mut self, frame: AudioFrame<'_>) -> Result<u64, RecorderError> {
        if self.file.is_none() {
            return Err(RecorderError::StorageError("file is not open".into()));
        }

        let samples = self.converter.conform(frame);
        let pcm = PcmConverter::to_int16_le(&samples);
        if self.data_bytes + pcm.len() as u64 > self.data_limit {
            if !self.full {
                log::warn!(
                    "{} reached the WAV size limit at {} bytes; dropping further audio",
                    self.file_path.display(),
                    self.data_bytes
                );
            }
            self.full = true;
            return Err(RecorderError::StorageError("WAV size limit reached".into()));
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| RecorderError::StorageError("file is not open".into()))?;
        if let Err(e) = file.write_all(&pcm) {
            self.failed = true;
            return Err(RecorderError::StorageError(format!("write failed: {}", e)));
        }

        self.data_bytes += pcm.len() as u64;
        Ok((samples.len() / self.header.channels as usize) as u64)
    }

    fn finish(&mut self) -> Result<String, RecorderError> {
        let mut file = self
            .file
            .take()
            .ok_or_else(|| RecorderError::StorageError("file is not open".into()))?;

        Self::patch_header(&mut file, self.data_bytes)
            .map_err(|e| RecorderError::StorageError(format!("failed to finalize file: {}", e)))?;
        drop(file);

        sha256_file(&self.file_path)
    }
}

/// Compute SHA-256 hex digest of a file.
fn sha256_file(path: &Path) -> Result<String, RecorderError> {
    let mut file = File::open(path)
        .map_err(|e| RecorderError::StorageError(format!("failed to read file for checksum: {}", e)))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .map_err(|e| RecorderError::StorageError(format!("failed to read file for checksum: {}", e)))?;
    Ok(hex_encode(&hasher.finalize()))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
