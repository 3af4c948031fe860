//! The [`Transcoder`] facade and the probed [`MediaFile`].

use std::path::{Path, PathBuf};

use fw_av::{Profile, ThumbnailPlan, ToolRegistry};
use fw_core::config::Config;
use fw_core::Result;
use fw_probe::MediaDescriptor;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// A source file together with what probing it revealed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFile {
    pub path: PathBuf,
    pub descriptor: MediaDescriptor,
}

impl MediaFile {
    pub fn new(path: impl Into<PathBuf>, descriptor: MediaDescriptor) -> Self {
        Self {
            path: path.into(),
            descriptor,
        }
    }

    pub fn duration(&self) -> Option<f64> {
        self.descriptor.duration
    }

    pub fn has_video(&self) -> bool {
        self.descriptor.video.is_some()
    }

    pub fn has_audio(&self) -> bool {
        self.descriptor.audio.is_some()
    }

    /// Output resolution for a `width` x `height` target.
    pub fn fit_video(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        self.descriptor.fit_video(width, height)
    }

    /// Output sample rate among `rates`.
    pub fn fit_audio(&self, rates: &[u32]) -> Option<u32> {
        self.descriptor.fit_audio(rates)
    }
}

/// Probes and transcodes media files with ffmpeg.
///
/// Each call owns its own child process; a `Transcoder` can be shared
/// between tasks by reference.
///
/// # Example
///
/// ```no_run
/// use ffwrap::{Config, Transcoder};
///
/// # async fn example() -> ffwrap::Result<()> {
/// let transcoder = Transcoder::new(Config::default());
/// let clip = transcoder.probe("/media/clip.avi").await?;
/// println!("{:?} seconds", clip.duration());
/// transcoder.transcode_streaming(&clip, "/media/clip.flv").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Transcoder {
    config: Config,
    tools: ToolRegistry,
    cancel: Option<CancellationToken>,
}

impl Transcoder {
    /// Build a transcoder, locating tools per `config.tools`.
    /// Configuration warnings are logged.
    pub fn new(config: Config) -> Self {
        for warning in config.validate() {
            tracing::warn!("config: {warning}");
        }
        let tools = ToolRegistry::discover(&config.tools);
        Self::with_tools(config, tools)
    }

    /// Build a transcoder around an explicit tool registry.
    pub fn with_tools(config: Config, tools: ToolRegistry) -> Self {
        Self {
            config,
            tools,
            cancel: None,
        }
    }

    /// Kill the running tool and fail with `Error::Cancelled` once `token`
    /// is cancelled. Applies to every later call.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Probe `path`.
    pub async fn probe(&self, path: impl AsRef<Path>) -> Result<MediaFile> {
        let path = path.as_ref();
        let descriptor =
            fw_av::probe(&self.tools, &self.config.transcode, path, self.cancel.as_ref()).await?;
        Ok(MediaFile::new(path, descriptor))
    }

    /// MPEG-4/AAC for handheld players.
    pub async fn transcode_mobile(
        &self,
        media: &MediaFile,
        output: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        self.run(media, &Profile::Mobile, output.as_ref(), |_| {})
            .await
    }

    /// FLV sized for web streaming, then FLV metadata indexing.
    pub async fn transcode_streaming(
        &self,
        media: &MediaFile,
        output: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        self.run(media, &Profile::Streaming, output.as_ref(), |_| {})
            .await
    }

    /// MP3 audio track only.
    pub async fn extract_audio(&self, media: &MediaFile, output: impl AsRef<Path>) -> Result<PathBuf> {
        self.run(media, &Profile::AudioExtract, output.as_ref(), |_| {})
            .await
    }

    /// `count` evenly spaced MJPEG thumbnails between `start` (default 0)
    /// and `end` (default `min(duration, thumbnail_span_cap_secs)`).
    pub async fn generate_thumbnails(
        &self,
        media: &MediaFile,
        output: impl AsRef<Path>,
        count: u32,
        start: Option<f64>,
        end: Option<f64>,
    ) -> Result<PathBuf> {
        let plan = ThumbnailPlan::resolve(
            count,
            start,
            end,
            media.duration(),
            self.config.transcode.thumbnail_span_cap_secs,
        )?;
        self.run(media, &Profile::Thumbnails(plan), output.as_ref(), |_| {})
            .await
    }

    /// Run any profile, reporting the completed fraction of the source
    /// duration to `on_progress`.
    pub async fn transcode_with_progress<F>(
        &self,
        media: &MediaFile,
        profile: &Profile,
        output: impl AsRef<Path>,
        on_progress: F,
    ) -> Result<PathBuf>
    where
        F: FnMut(f64),
    {
        self.run(media, profile, output.as_ref(), on_progress).await
    }

    async fn run<F>(
        &self,
        media: &MediaFile,
        profile: &Profile,
        output: &Path,
        on_progress: F,
    ) -> Result<PathBuf>
    where
        F: FnMut(f64),
    {
        fw_av::transcode(
            &self.tools,
            &self.config.transcode,
            &media.path,
            &media.descriptor,
            profile,
            output,
            on_progress,
            self.cancel.as_ref(),
        )
        .await
    }
}
