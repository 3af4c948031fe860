//! Probe a media file by scanning ffmpeg's diagnostic header.

use std::path::Path;

use fw_core::config::TranscodeConfig;
use fw_core::{Error, Result};
use fw_probe::{MediaDescriptor, ProbeTextScanner};
use tokio_util::sync::CancellationToken;

use crate::command::ToolCommand;
use crate::profiles::probe_options;
use crate::tools::{ToolRegistry, FFMPEG};
use crate::workspace::Workspace;

/// File name of the throwaway probe output inside the scratch workspace.
const PROBE_DUMMY: &str = "probe.avi";

/// Probe `input` and return what ffmpeg reported about it.
///
/// Runs a 0.1 s video-only FLV conversion into a scratch directory so
/// ffmpeg prints its full input header, feeding every diagnostic line through a
/// [`ProbeTextScanner`]. The scratch directory is removed before returning
/// on every path.
///
/// # Errors
///
/// - [`Error::FileNotFound`] if `input` does not exist (nothing is spawned).
/// - [`Error::ProbeFailed`] if ffmpeg exits non-zero.
/// - [`Error::UnsupportedInput`] if `require_stream_info` is set and nothing
///   was recognised.
/// - [`Error::Tool`], [`Error::TimedOut`], [`Error::Cancelled`] from the
///   process runner.
pub async fn probe(
    tools: &ToolRegistry,
    config: &TranscodeConfig,
    input: &Path,
    cancel: Option<&CancellationToken>,
) -> Result<MediaDescriptor> {
    super::ensure_exists(input).await?;
    let ffmpeg = tools.require(FFMPEG)?;

    let workspace = Workspace::new(config.temp_dir.as_deref())?;
    let dummy = workspace.temp_file(PROBE_DUMMY);

    let mut cmd = ToolCommand::new(ffmpeg.path.clone());
    cmd.timeout(config.probe_timeout());
    cmd.args(["-y", "-i"]);
    cmd.arg(input.to_string_lossy());
    cmd.args(probe_options().to_args());
    cmd.arg(dummy.to_string_lossy());

    let mut scanner = ProbeTextScanner::new();
    let result = cmd.execute_streaming(|line| scanner.feed(line), cancel).await;
    workspace.close();

    let output = result?;
    if !output.success() {
        return Err(Error::probe_failed(
            output.command_line.clone(),
            output.failure_message(),
        ));
    }

    let descriptor = scanner.finish();
    if !descriptor.has_stream_info() {
        if config.require_stream_info {
            return Err(Error::UnsupportedInput(format!(
                "{}: ffmpeg reported no duration or streams",
                input.display()
            )));
        }
        tracing::warn!("probe of {} recognised no streams", input.display());
    }

    tracing::info!(
        "probed {} in {:.2}s: duration={:?} video={} audio={}",
        input.display(),
        output.elapsed.as_secs_f64(),
        descriptor.duration,
        descriptor.video.is_some(),
        descriptor.audio.is_some(),
    );
    Ok(descriptor)
}
