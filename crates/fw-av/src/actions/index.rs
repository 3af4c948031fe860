//! FLV metadata indexing with flvtool2.

use std::path::Path;

use crate::command::ToolCommand;
use crate::tools::{ToolRegistry, FLVTOOL};

/// Rewrite the onMetaData block of `flv` in place (`flvtool2 -U <flv>`) so
/// players can seek before the download finishes.
///
/// Best effort: returns `false` without failing the transcode when the tool
/// is missing or errors.
pub async fn index_flv(tools: &ToolRegistry, flv: &Path) -> bool {
    let Some(flvtool) = tools.get(FLVTOOL) else {
        tracing::debug!("{FLVTOOL} not installed; skipping metadata index of {}", flv.display());
        return false;
    };

    let mut cmd = ToolCommand::new(flvtool.path.clone());
    cmd.timeout(flvtool.timeout);
    cmd.arg("-U");
    cmd.arg(flv.to_string_lossy());

    match cmd.execute().await {
        Ok(_) => {
            tracing::debug!("indexed {}", flv.display());
            true
        }
        Err(e) => {
            tracing::warn!("{FLVTOOL} failed on {}: {e}", flv.display());
            false
        }
    }
}
