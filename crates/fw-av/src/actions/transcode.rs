//! Run one transcode profile.

use std::path::{Path, PathBuf};

use fw_core::config::TranscodeConfig;
use fw_core::{Error, Result};
use fw_probe::MediaDescriptor;
use tokio_util::sync::CancellationToken;

use crate::command::ToolCommand;
use crate::profiles::Profile;
use crate::progress::progress_fraction;
use crate::tools::{ToolRegistry, FFMPEG};

/// Transcode `input` to `output` with `profile`.
///
/// The command is `ffmpeg -y -i <input> <profile options> <output>`.
/// `on_progress` receives the fraction of the probed duration reached each
/// time ffmpeg rewrites its status line. Streaming outputs are passed to
/// [`super::index_flv`] afterwards when `index_flv` is enabled.
///
/// When the run fails, is cancelled or times out, an output file that did
/// not exist before the run is removed unless `keep_failed_output` is set.
/// A pre-existing file at `output` is never deleted.
///
/// # Errors
///
/// - [`Error::FileNotFound`] if `input` does not exist (nothing is spawned).
/// - [`Error::UnsupportedInput`] if the profile cannot be built from
///   `descriptor`.
/// - [`Error::TranscodeFailed`] if ffmpeg exits non-zero.
/// - [`Error::Tool`], [`Error::TimedOut`], [`Error::Cancelled`] from the
///   process runner.
#[allow(clippy::too_many_arguments)]
pub async fn transcode<F>(
    tools: &ToolRegistry,
    config: &TranscodeConfig,
    input: &Path,
    descriptor: &MediaDescriptor,
    profile: &Profile,
    output: &Path,
    mut on_progress: F,
    cancel: Option<&CancellationToken>,
) -> Result<PathBuf>
where
    F: FnMut(f64),
{
    super::ensure_exists(input).await?;
    let options = profile.options(descriptor)?;
    let ffmpeg = tools.require(FFMPEG)?;

    tracing::info!(
        "{} transcode: {} -> {}",
        profile.name(),
        input.display(),
        output.display()
    );

    let mut cmd = ToolCommand::new(ffmpeg.path.clone());
    cmd.timeout(config.transcode_timeout());
    cmd.args(["-y", "-i"]);
    cmd.arg(input.to_string_lossy());
    cmd.args(options.to_args());
    cmd.arg(output.to_string_lossy());

    let existed_before = tokio::fs::try_exists(output).await.unwrap_or(true);
    let duration = descriptor.duration;
    let result = cmd
        .execute_streaming(
            |line| {
                if let Some(fraction) = progress_fraction(line, duration) {
                    on_progress(fraction);
                }
            },
            cancel,
        )
        .await;

    let run = match result {
        Ok(run) if run.success() => run,
        Ok(run) => {
            discard_partial(config, output, existed_before).await;
            return Err(Error::transcode_failed(
                run.command_line.clone(),
                run.failure_message(),
            ));
        }
        Err(e) => {
            if matches!(e, Error::Cancelled { .. } | Error::TimedOut { .. }) {
                discard_partial(config, output, existed_before).await;
            }
            return Err(e);
        }
    };

    if profile.needs_flv_index() && config.index_flv {
        super::index_flv(tools, output).await;
    }

    on_progress(1.0);
    tracing::info!(
        "created {} ({:.2} seconds)",
        output.display(),
        run.elapsed.as_secs_f64()
    );
    Ok(output.to_path_buf())
}

async fn discard_partial(config: &TranscodeConfig, output: &Path, existed_before: bool) {
    if config.keep_failed_output || existed_before {
        return;
    }
    match tokio::fs::remove_file(output).await {
        Ok(()) => tracing::debug!("removed partial output {}", output.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("failed to remove partial output {}: {e}", output.display()),
    }
}
