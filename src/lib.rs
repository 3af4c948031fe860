//! # ffwrap
//!
//! Probe media files and transcode them to a few fixed profiles by driving
//! the `ffmpeg` command-line tool.
//!
//! - [`Transcoder::probe`] runs ffmpeg briefly and scans its diagnostic
//!   header into a [`MediaDescriptor`].
//! - [`Transcoder::transcode_mobile`], [`Transcoder::transcode_streaming`],
//!   [`Transcoder::extract_audio`] and [`Transcoder::generate_thumbnails`]
//!   build the profile's options from the probe and run ffmpeg.
//!
//! Failures of the tool itself surface as [`Error::ProbeFailed`] or
//! [`Error::TranscodeFailed`], carrying the command line and ffmpeg's own
//! last message.

pub mod logging;
pub mod transcoder;

pub use transcoder::{MediaFile, Transcoder};

pub use fw_av::{OptionList, Profile, ThumbnailPlan, ToolCommand, ToolOutput, ToolRegistry};
pub use fw_core::config::{Config, ToolsConfig, TranscodeConfig};
pub use fw_core::{Error, Result};
pub use fw_probe::{AudioStream, MediaDescriptor, ProbeTextScanner, VideoStream};
pub use tokio_util::sync::CancellationToken;
