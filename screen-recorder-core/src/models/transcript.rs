use serde::{Deserialize, Serialize};

use super::error::RecorderError;

/// A transcribed span of a recording, in milliseconds from its start.
///
/// Immutable once created. Deserialization goes through [`AudioSegment::new`],
/// so an inverted span is rejected wherever it comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SegmentFields")]
pub struct AudioSegment {
    start_time_ms: u64,
    end_time_ms: u64,
    text: String,
}

impl AudioSegment {
    pub fn new(start_time_ms: u64, end_time_ms: u64, text: impl Into<String>) -> Result<Self, RecorderError> {
        if end_time_ms < start_time_ms {
            return Err(RecorderError::ConfigurationFailed(format!(
                "segment ends before it starts: {}ms < {}ms",
                end_time_ms, start_time_ms
            )));
        }
        Ok(Self {
            start_time_ms,
            end_time_ms,
            text: text.into(),
        })
    }

    pub fn start_time_ms(&self) -> u64 {
        self.start_time_ms
    }

    pub fn end_time_ms(&self) -> u64 {
        self.end_time_ms
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn contains(&self, time_ms: u64) -> bool {
        (self.start_time_ms..=self.end_time_ms).contains(&time_ms)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SegmentFields {
    start_time_ms: u64,
    end_time_ms: u64,
    text: String,
}

impl TryFrom<SegmentFields> for AudioSegment {
    type Error = RecorderError;

    fn try_from(fields: SegmentFields) -> Result<Self, Self::Error> {
        Self::new(fields.start_time_ms, fields.end_time_ms, fields.text)
    }
}

/// Ordered transcription segments attached to one recording.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TranscriptFields")]
pub struct Transcript {
    segments: Vec<AudioSegment>,
}

#[derive(Deserialize)]
struct TranscriptFields {
    segments: Vec<AudioSegment>,
}

impl TryFrom<TranscriptFields> for Transcript {
    type Error = RecorderError;

    fn try_from(fields: TranscriptFields) -> Result<Self, Self::Error> {
        Self::new(fields.segments)
    }
}

impl Transcript {
    /// Segment start times must be non-decreasing.
    pub fn new(segments: Vec<AudioSegment>) -> Result<Self, RecorderError> {
        if let Some(pair) = segments
            .windows(2)
            .find(|pair| pair[1].start_time_ms < pair[0].start_time_ms)
        {
            return Err(RecorderError::ConfigurationFailed(format!(
                "segment at {}ms is out of order after {}ms",
                pair[1].start_time_ms, pair[0].start_time_ms
            )));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[AudioSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The first segment covering `time_ms`.
    pub fn segment_at(&self, time_ms: u64) -> Option<&AudioSegment> {
        self.segments.iter().find(|s| s.contains(time_ms))
    }

    /// Segment texts joined by single spaces.
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
