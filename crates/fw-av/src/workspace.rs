//! Scratch directories for probe runs.
//!
//! ffmpeg only prints a complete header when it has somewhere to write, so
//! every probe gets a private directory to hold its throwaway output. The
//! directory is removed on [`Workspace::close`] or on drop, whichever comes
//! first, including when the probe fails.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A private temporary directory for one probe.
///
/// # Example
///
/// ```no_run
/// use fw_av::Workspace;
///
/// let workspace = Workspace::new(None).unwrap();
/// let dummy = workspace.temp_file("probe.avi");
/// // ... run ffmpeg writing to `dummy` ...
/// workspace.close();
/// ```
#[derive(Debug)]
pub struct Workspace {
    temp_dir: TempDir,
}

impl Workspace {
    /// Create a workspace under `base`, or under the system temp directory.
    pub fn new(base: Option<&Path>) -> fw_core::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("ffwrap-probe-");
        let temp_dir = match base {
            Some(base) => builder.tempdir_in(base),
            None => builder.tempdir(),
        }
        .map_err(|e| fw_core::Error::tool("workspace", format!("failed to create temp dir: {e}")))?;

        Ok(Self { temp_dir })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path for a named file inside the workspace.
    pub fn temp_file(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Remove the directory and everything in it. Failures are logged, not
    /// returned: a leftover scratch directory never fails a probe.
    pub fn close(self) {
        let path = self.temp_dir.path().to_path_buf();
        if let Err(e) = self.temp_dir.close() {
            tracing::warn!("failed to remove probe workspace {}: {e}", path.display());
        }
    }
}
