use std::fs;
use std::path::{Path, PathBuf};

use crate::models::audio_models::{AudioEncodingProfile, AudioFrame};
use crate::models::recording_result::{RecordingMetadata, RecordingResult};
use crate::storage::wav_muxer::WavMuxer;
use crate::traits::audio_muxer::AudioMuxer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterPhase {
    /// The muxer could not be opened; every call is a no-op.
    Unavailable,
    Ready,
    Writing,
    Finished,
}

/// Append-only audio sink for one recording.
///
/// Failures never propagate: an open failure leaves the writer
/// non-functional, and frames the muxer is not ready for are dropped. A
/// lost frame is preferable to interrupting an active capture session.
///
/// Shared with the engine's delivery thread behind a mutex; see
/// `ScreenRecorder`.
pub struct AudioFileWriter {
    file_path: PathBuf,
    profile: AudioEncodingProfile,
    muxer: Option<Box<dyn AudioMuxer>>,
    phase: WriterPhase,
    frames_written: u64,
    frames_dropped: u64,
}

impl AudioFileWriter {
    /// Open a WAV container at `file_path`.
    pub fn new(file_path: PathBuf, profile: AudioEncodingProfile) -> Self {
        match WavMuxer::create(file_path.clone(), &profile) {
            Ok(muxer) => Self::with_muxer(file_path, profile, Box::new(muxer)),
            Err(e) => {
                log::error!("Failed to open audio file {}: {}", file_path.display(), e);
                Self {
                    file_path,
                    profile,
                    muxer: None,
                    phase: WriterPhase::Unavailable,
                    frames_written: 0,
                    frames_dropped: 0,
                }
            }
        }
    }

    pub fn with_muxer(file_path: PathBuf, profile: AudioEncodingProfile, muxer: Box<dyn AudioMuxer>) -> Self {
        Self {
            file_path,
            profile,
            muxer: Some(muxer),
            phase: WriterPhase::Ready,
            frames_written: 0,
            frames_dropped: 0,
        }
    }

    pub fn is_functional(&self) -> bool {
        self.phase != WriterPhase::Unavailable
    }

    pub fn is_writing(&self) -> bool {
        self.phase == WriterPhase::Writing
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Dropped audio, in frames at the profile's sample rate, so it is
    /// comparable with [`frames_written`](Self::frames_written).
    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped
    }

    /// Length of `frame` once resampled to the profile rate.
    fn output_frame_count(&self, frame: &AudioFrame<'_>) -> u64 {
        let source_frames = frame.frame_count() as f64;
        if frame.sample_rate <= 0.0 || !frame.sample_rate.is_finite() {
            return source_frames as u64;
        }
        (source_frames * self.profile.sample_rate / frame.sample_rate).round() as u64
    }

    /// Begin the muxing session at time zero. Call once, before any frame.
    pub fn start_writing(&mut self) {
        if self.phase != WriterPhase::Ready {
            log::warn!("start_writing ignored for {} ({:?})", self.file_path.display(), self.phase);
            return;
        }
        let Some(muxer) = self.muxer.as_mut() else {
            return;
        };
        match muxer.start_session() {
            Ok(()) => {
                log::debug!("Started writing {}", self.file_path.display());
                self.phase = WriterPhase::Writing;
            }
            Err(e) => {
                log::error!("Failed to start writing {}: {}", self.file_path.display(), e);
                self.phase = WriterPhase::Unavailable;
            }
        }
    }

    /// Append one frame if the muxer is ready for it; otherwise drop it.
    pub fn handle_audio(&mut self, frame: AudioFrame<'_>) {
        let muxer = match (self.phase, self.muxer.as_mut()) {
            (WriterPhase::Writing, Some(muxer)) if muxer.is_ready_for_more_data() => muxer,
            _ => {
                self.frames_dropped += self.output_frame_count(&frame);
                log::trace!("Dropped audio frame ({:?})", self.phase);
                return;
            }
        };

        match muxer.append(frame) {
            Ok(frames) => self.frames_written += frames,
            Err(e) => {
                self.frames_dropped += self.output_frame_count(&frame);
                log::warn!("Failed to append audio to {}: {}", self.file_path.display(), e);
            }
        }
    }

    /// Mark input finished and block until the file is finalized.
    ///
    /// Returns `None` if the writer never became functional, was never
    /// started, or has already finished.
    pub fn finish_writing(&mut self) -> Option<RecordingResult> {
        if self.phase != WriterPhase::Writing {
            log::warn!("finish_writing ignored for {} ({:?})", self.file_path.display(), self.phase);
            return None;
        }
        self.phase = WriterPhase::Finished;

        let muxer = self.muxer.as_mut()?;
        let checksum = match muxer.finish() {
            Ok(checksum) => checksum,
            Err(e) => {
                log::error!("Failed to finalize {}: {}", self.file_path.display(), e);
                return None;
            }
        };

        let metadata = RecordingMetadata::new(
            &self.file_path.to_string_lossy(),
            &checksum,
            &self.profile,
            self.frames_written,
            self.frames_dropped,
        );
        log::info!(
            "Finished writing {} ({:.2}s, {} frames dropped)",
            self.file_path.display(),
            metadata.duration_secs,
            self.frames_dropped
        );

        Some(RecordingResult {
            file_path: self.file_path.clone(),
            duration_secs: metadata.duration_secs,
            metadata,
            checksum,
        })
    }

    /// Close the file and remove it from disk.
    pub fn discard(mut self) {
        match self.phase {
            WriterPhase::Unavailable => return,
            WriterPhase::Writing => {
                self.finish_writing();
            }
            WriterPhase::Ready | WriterPhase::Finished => {}
        }
        drop(self.muxer.take());
        if let Err(e) = fs::remove_file(&self.file_path) {
            log::warn!("Failed to remove discarded recording {}: {}", self.file_path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    use approx::assert_relative_eq;

    use crate::models::error::RecorderError;

    fn temp_file_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("screen_recorder_writer_{}", name))
    }

    /// Muxer whose readiness is controlled by the test.
    struct GatedMuxer {
        ready: Arc<AtomicBool>,
        appended: Arc<AtomicUsize>,
    }

    impl AudioMuxer for GatedMuxer {
        fn start_session(&mut self) -> Result<(), RecorderError> {
            Ok(())
        }

        fn is_ready_for_more_data(&self) -> bool {
            self.ready.load(Ordering::SeqCst)
        }

        fn append(&mut self, frame: AudioFrame<'_>) -> Result<u64, RecorderError> {
            self.appended.fetch_add(1, Ordering::SeqCst);
            Ok(frame.frame_count() as u64)
        }

        fn finish(&mut self) -> Result<String, RecorderError> {
            Ok("checksum".into())
        }
    }

    #[test]
    fn writes_frames_and_reports_duration() {
        let path = temp_file_path("duration.wav");
        let mut writer = AudioFileWriter::new(path.clone(), AudioEncodingProfile::default());
        assert!(writer.is_functional());

        writer.start_writing();
        let samples = vec![0.25f32; 48000 * 2];
        writer.handle_audio(AudioFrame::new(&samples, 48000.0, 2));

        let result = writer.finish_writing().unwrap();
        assert_relative_eq!(result.duration_secs, 1.0);
        assert_eq!(result.metadata.frames_written, 48000);
        assert_eq!(fs::metadata(&path).unwrap().len(), 44 + 48000 * 4);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn frames_outside_session_are_dropped_without_touching_file() {
        let path = temp_file_path("outside_session.wav");
        let mut writer = AudioFileWriter::new(path.clone(), AudioEncodingProfile::default());

        writer.handle_audio(AudioFrame::new(&[0.5; 4], 48000.0, 2));
        assert_eq!(writer.frames_dropped(), 2);

        writer.start_writing();
        writer.handle_audio(AudioFrame::new(&[0.5; 4], 48000.0, 2));
        let result = writer.finish_writing().unwrap();
        let len_after_finish = fs::metadata(&path).unwrap().len();

        writer.handle_audio(AudioFrame::new(&[0.5; 4], 48000.0, 2));
        assert_eq!(fs::metadata(&path).unwrap().len(), len_after_finish);
        assert_eq!(len_after_finish, 44 + 8);
        assert_eq!(result.metadata.frames_dropped, 2);
        assert_eq!(writer.frames_dropped(), 4);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn drops_frames_while_muxer_is_not_ready() {
        let ready = Arc::new(AtomicBool::new(true));
        let appended = Arc::new(AtomicUsize::new(0));
        let muxer = GatedMuxer {
            ready: Arc::clone(&ready),
            appended: Arc::clone(&appended),
        };
        let mut writer =
            AudioFileWriter::with_muxer(temp_file_path("gated.wav"), AudioEncodingProfile::default(), Box::new(muxer));
        writer.start_writing();

        writer.handle_audio(AudioFrame::new(&[0.1; 2], 48000.0, 2));
        ready.store(false, Ordering::SeqCst);
        writer.handle_audio(AudioFrame::new(&[0.1; 2], 48000.0, 2));
        ready.store(true, Ordering::SeqCst);
        writer.handle_audio(AudioFrame::new(&[0.1; 2], 48000.0, 2));

        assert_eq!(appended.load(Ordering::SeqCst), 2);
        assert_eq!(writer.frames_written(), 2);
        assert_eq!(writer.frames_dropped(), 1);
    }

    #[test]
    fn open_failure_leaves_non_functional_writer() {
        // A regular file cannot serve as a parent directory.
        let blocker = temp_file_path("blocker");
        fs::write(&blocker, b"x").unwrap();
        let path = blocker.join("nested.wav");

        let mut writer = AudioFileWriter::new(path, AudioEncodingProfile::default());
        assert!(!writer.is_functional());

        writer.start_writing();
        writer.handle_audio(AudioFrame::new(&[0.5; 4], 48000.0, 2));
        assert!(writer.finish_writing().is_none());

        fs::remove_file(&blocker).ok();
    }

    #[test]
    fn second_finish_returns_none() {
        let path = temp_file_path("double_finish.wav");
        let mut writer = AudioFileWriter::new(path.clone(), AudioEncodingProfile::default());
        writer.start_writing();
        assert!(writer.finish_writing().is_some());
        assert!(writer.finish_writing().is_none());

        fs::remove_file(&path).ok();
    }

    #[test]
    fn discard_removes_file() {
        let path = temp_file_path("discarded.wav");
        let mut writer = AudioFileWriter::new(path.clone(), AudioEncodingProfile::default());
        writer.start_writing();
        writer.discard();
        assert!(!path.exists());
    }

    #[test]
    fn dropped_frames_are_counted_at_the_output_rate() {
        let path = temp_file_path("dropped_rate.wav");
        let mut writer = AudioFileWriter::new(path.clone(), AudioEncodingProfile::default());

        // 24 kHz input is doubled on its way into a 48 kHz file.
        writer.handle_audio(AudioFrame::new(&[0.5; 480], 24000.0, 1));
        assert_eq!(writer.frames_dropped(), 960);

        writer.handle_audio(AudioFrame::new(&[0.5; 441], 44100.0, 1));
        assert_eq!(writer.frames_dropped(), 960 + 480);

        writer.start_writing();
        let result = writer.finish_writing().unwrap();
        assert_eq!(result.metadata.frames_dropped, 1440);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn frames_refused_at_size_limit_are_counted_as_dropped() {
        let path = temp_file_path("size_limit.wav");
        let profile = AudioEncodingProfile::default();
        let muxer = WavMuxer::create(path.clone(), &profile).unwrap().with_data_limit(16);
        let mut writer = AudioFileWriter::with_muxer(path.clone(), profile, Box::new(muxer));
        writer.start_writing();

        for _ in 0..4 {
            writer.handle_audio(AudioFrame::new(&[0.1; 4], 48000.0, 2));
        }
        assert_eq!(writer.frames_written(), 4);
        assert_eq!(writer.frames_dropped(), 4);

        let result = writer.finish_writing().unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 44 + 16);
        assert_relative_eq!(result.duration_secs, 4.0 / 48000.0);

        fs::remove_file(&path).ok();
    }
}
