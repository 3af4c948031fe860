//! Media operations: probe, profile transcodes, and FLV metadata indexing.

mod index;
mod probe;
mod transcode;

use std::path::Path;

pub use index::index_flv;
pub use probe::probe;
pub use transcode::transcode;

/// Fail with [`fw_core::Error::FileNotFound`] unless `path` exists.
/// Runs before any process is spawned.
pub(crate) async fn ensure_exists(path: &Path) -> fw_core::Result<()> {
    match tokio::fs::try_exists(path).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(fw_core::Error::file_not_found(path)),
        Err(e) => {
            tracing::debug!("cannot stat {}: {e}", path.display());
            Err(fw_core::Error::file_not_found(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn existing_path_passes() {
        let file = tempfile::NamedTempFile::new().unwrap();
        ensure_exists(file.path()).await.unwrap();
    }

    #[tokio::test]
    async fn missing_path_is_file_not_found() {
        let err = ensure_exists(Path::new("/nonexistent/clip.avi")).await.unwrap_err();
        assert!(matches!(err, fw_core::Error::FileNotFound { .. }));
    }
}
