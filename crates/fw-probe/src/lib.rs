//! # fw-probe
//!
//! Turns ffmpeg's carriage-return delimited diagnostic stream into a
//! structured [`MediaDescriptor`], and sizes transcode output from it.
//!
//! - **Descriptor** ([`MediaDescriptor`]) -- everything one probe pass learns
//!   about a file: duration, container bitrate, video and audio stream facts.
//! - **Grammar** ([`Grammar`], [`LineRule`]) -- the table of line patterns the
//!   scanner applies. New tool output shapes are added as rules.
//! - **Scanner** ([`ProbeTextScanner`]) -- feeds lines through the grammar
//!   and finalizes the descriptor.
//! - **Fit** ([`fit_video`], [`fit_audio`]) -- output resolution and sample
//!   rate selection.
//!
//! ## Quick start
//!
//! ```
//! use fw_probe::ProbeTextScanner;
//!
//! let text = "  Duration: 00:01:05.3, start: 0.000000, bitrate: 1250 kb/s\n\
//!             Stream #0.0: Video: mpeg4, yuv420p, 641x480, 25.00 tb(r)\r";
//! let descriptor = ProbeTextScanner::scan_text(text);
//! assert_eq!(descriptor.duration, Some(65.3));
//! assert_eq!(descriptor.video.as_ref().map(|v| v.width), Some(640));
//! ```

pub mod descriptor;
pub mod fit;
pub mod grammar;
pub mod scanner;

pub use descriptor::{AudioStream, MediaDescriptor, VideoStream};
pub use fit::{fit_audio, fit_video, floor_even, DOWNSCALE_AREA};
pub use grammar::{Grammar, LineRule};
pub use scanner::ProbeTextScanner;
