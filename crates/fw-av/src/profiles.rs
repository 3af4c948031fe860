//! The fixed transcode profiles.
//!
//! Every profile turns a probed [`MediaDescriptor`] into an [`OptionList`].
//! Option names, values and order are what downstream players were tuned
//! against; change them only together with those consumers.

use fw_core::{Error, Result};
use fw_probe::MediaDescriptor;

use crate::options::OptionList;

/// Fallback frame rate when the source rate is unknown.
pub const DEFAULT_FRAME_RATE: u32 = 15;

/// Streaming target frame and ceilings.
pub const STREAMING_SIZE: (u32, u32) = (640, 480);
pub const STREAMING_MAX_BITRATE_KB: u32 = 300;
pub const STREAMING_SAMPLE_RATES: [u32; 3] = [44100, 22050, 11025];
const STREAMING_GOP: u32 = 150;

/// Length of the throwaway conversion that makes ffmpeg print its header.
pub const PROBE_SECONDS: f64 = 0.1;

/// A named, fixed set of encoder options.
#[derive(Debug, Clone, PartialEq)]
pub enum Profile {
    /// MPEG-4/AAC for handheld players.
    Mobile,
    /// FLV/MP3 sized for progressive web streaming; followed by FLV indexing.
    Streaming,
    /// MP3 audio track only.
    AudioExtract,
    /// Evenly spaced MJPEG frames.
    Thumbnails(ThumbnailPlan),
}

impl Profile {
    pub fn name(&self) -> &'static str {
        match self {
            Profile::Mobile => "mobile",
            Profile::Streaming => "streaming",
            Profile::AudioExtract => "audio-extract",
            Profile::Thumbnails(_) => "thumbnails",
        }
    }

    /// Whether the output needs the FLV metadata pass afterwards.
    pub fn needs_flv_index(&self) -> bool {
        matches!(self, Profile::Streaming)
    }

    /// Build the encoder options for `descriptor`.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedInput`] when the streaming profile is asked to
    /// size a file without a video stream.
    pub fn options(&self, descriptor: &MediaDescriptor) -> Result<OptionList> {
        let options = match self {
            Profile::Mobile => OptionList::new()
                .set("acodec", "aac")
                .set("ab", "128kb")
                .set("r", frame_rate(descriptor, None))
                .set("vcodec", "mpeg4")
                .set("mbd", 2)
                .set("flags", "+4mv+trell")
                .set("aic", 2)
                .set("cmp", 2)
                .set("subcmp", 2),

            Profile::Streaming => {
                let bitrate = descriptor
                    .bitrate
                    .map_or(STREAMING_MAX_BITRATE_KB, |b| b.min(STREAMING_MAX_BITRATE_KB));
                let (width, height) = descriptor
                    .fit_video(STREAMING_SIZE.0, STREAMING_SIZE.1)
                    .ok_or_else(|| {
                        Error::UnsupportedInput(
                            "streaming profile needs a video stream to size the output".into(),
                        )
                    })?;
                let sample_rate = descriptor
                    .fit_audio(&STREAMING_SAMPLE_RATES)
                    .unwrap_or(STREAMING_SAMPLE_RATES[0]);

                OptionList::new()
                    .set("b", format!("{bitrate}kb"))
                    .set("r", frame_rate(descriptor, Some(DEFAULT_FRAME_RATE)))
                    .set("s", format!("{width}x{height}"))
                    .set("ar", sample_rate)
                    .set("g", STREAMING_GOP)
                    .set("cmp", 2)
                    .set("subcmp", 2)
                    .set("mbd", 2)
                    .set("flags", "+aic+cbp+mv0+mv4+trell")
                    .set("vcodec", "flv")
                    .set("acodec", "mp3")
            }

            Profile::AudioExtract => OptionList::new()
                .set("acodec", "mp3")
                .set("ab", "128kb")
                .flag("vn")
                .set("mbd", 2)
                .set("cmp", 2)
                .set("subcmp", 2),

            Profile::Thumbnails(plan) => OptionList::new()
                .flag("an")
                .set("f", "mjpeg")
                .set("ss", plan.interval())
                .set("r", plan.frame_rate())
                .set("vframes", plan.frames()),
        };
        Ok(options)
    }
}

/// Options for the probe pass: 0.1 s of FLV video, no audio, into the
/// dummy output. Every ffmpeg build that prints the classic header ships the
/// FLV encoder, so the pass does not depend on stream-copy support.
pub fn probe_options() -> OptionList {
    OptionList::new()
        .set("vcodec", "flv")
        .flag("an")
        .set("t", PROBE_SECONDS)
}

/// Source fps truncated to an integer, optionally capped; 15 when unknown.
fn frame_rate(descriptor: &MediaDescriptor, cap: Option<u32>) -> u32 {
    match descriptor.fps() {
        Some(fps) => {
            let fps = match cap {
                Some(cap) => fps.min(f64::from(cap)),
                None => fps,
            };
            fps.trunc() as u32
        }
        None => DEFAULT_FRAME_RATE,
    }
}

/// Where and how many thumbnails to take.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbnailPlan {
    count: u32,
    start: f64,
    end: f64,
}

impl ThumbnailPlan {
    /// A plan over `[start, end]` seconds.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] when `count` is zero, `start` is negative, or
    /// the span is empty or not finite.
    pub fn new(count: u32, start: f64, end: f64) -> Result<Self> {
        if count == 0 {
            return Err(Error::Validation("thumbnail count must be at least 1".into()));
        }
        if !start.is_finite() || !end.is_finite() || start < 0.0 {
            return Err(Error::Validation(format!(
                "thumbnail span {start}..{end} is not a valid time range"
            )));
        }
        if end <= start {
            return Err(Error::Validation(format!(
                "thumbnail end {end} must be after start {start}"
            )));
        }
        Ok(Self { count, start, end })
    }

    /// Fill in the defaults: `start = 0`, `end = min(duration, cap)`.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedInput`] when no end is given and the duration is
    /// unknown; otherwise as [`ThumbnailPlan::new`].
    pub fn resolve(
        count: u32,
        start: Option<f64>,
        end: Option<f64>,
        duration: Option<f64>,
        cap: f64,
    ) -> Result<Self> {
        let end = match end {
            Some(end) => end,
            None => duration.map(|d| d.min(cap)).ok_or_else(|| {
                Error::UnsupportedInput(
                    "duration is unknown; pass an explicit thumbnail end point".into(),
                )
            })?,
        };
        Self::new(count, start.unwrap_or(0.0), end)
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Seconds between frames: `(end - start) / (count + 1)`.
    pub fn interval(&self) -> f64 {
        (self.end - self.start) / f64::from(self.count + 1)
    }

    /// Output frame rate: 1 for a single thumbnail, else
    /// `(count + 1) / (end - start)`.
    pub fn frame_rate(&self) -> f64 {
        if self.count == 1 {
            1.0
        } else {
            f64::from(self.count + 1) / (self.end - self.start)
        }
    }

    pub fn frames(&self) -> u32 {
        self.count + 1
    }
}
