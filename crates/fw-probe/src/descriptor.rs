//! Structured result of one probe pass.

use serde::{Deserialize, Serialize};

/// Everything learned about one media file from one probe pass.
///
/// All fields stay unset until a diagnostic line matches them. Once the probe
/// process exits successfully the descriptor is handed to the caller and is
/// never mutated by transcode operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    /// Duration in seconds, with decisecond resolution.
    pub duration: Option<f64>,
    /// Overall container bitrate in kbit/s.
    pub bitrate: Option<u32>,
    /// Video stream facts, if a video stream line matched.
    pub video: Option<VideoStream>,
    /// Audio stream facts, if an audio stream line matched.
    pub audio: Option<AudioStream>,
}

/// A video stream announced in the diagnostic header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoStream {
    /// Codec name as printed by the tool (e.g. "mpeg4", "h264").
    pub codec: String,
    /// Width in pixels, even after the scan finishes.
    pub width: u32,
    /// Height in pixels, even after the scan finishes.
    pub height: u32,
    /// Raw matched width divided by raw matched height.
    pub aspect_ratio: f64,
    /// Frames per second, when the stream line carried one.
    pub fps: Option<f64>,
}

/// An audio stream announced in the diagnostic header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioStream {
    pub codec: String,
    pub sample_rate: u32,
    /// Third stream field as printed (channel layout or sample format).
    pub sample_format: String,
    /// Stream bitrate in kbit/s.
    pub bitrate: Option<u32>,
}

impl MediaDescriptor {
    /// True when no line matched at all.
    pub fn is_empty(&self) -> bool {
        self.duration.is_none() && self.bitrate.is_none() && self.video.is_none() && self.audio.is_none()
    }

    /// True when the probe found a duration or at least one stream.
    pub fn has_stream_info(&self) -> bool {
        self.duration.is_some() || self.video.is_some() || self.audio.is_some()
    }

    pub fn fps(&self) -> Option<f64> {
        self.video.as_ref().and_then(|v| v.fps)
    }

    pub fn audio_sample_rate(&self) -> Option<u32> {
        self.audio.as_ref().map(|a| a.sample_rate)
    }

    /// Output resolution for the given target; see [`crate::fit_video`].
    pub fn fit_video(&self, target_width: u32, target_height: u32) -> Option<(u32, u32)> {
        crate::fit::fit_video(self, target_width, target_height)
    }

    /// Output sample rate among `rates`; see [`crate::fit_audio`].
    pub fn fit_audio(&self, rates: &[u32]) -> Option<u32> {
        crate::fit::fit_audio(self, rates)
    }
}
