//! Configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! tool path overrides and the transcode policy knobs. Every section defaults
//! sensibly so a completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tools: ToolsConfig,
    pub transcode: TranscodeConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Some(ref p) = self.tools.ffmpeg_path {
            if !p.exists() {
                warnings.push(format!(
                    "tools.ffmpeg_path {} does not exist; falling back to PATH",
                    p.display()
                ));
            }
        }
        if let Some(ref p) = self.tools.flvtool_path {
            if !p.exists() {
                warnings.push(format!(
                    "tools.flvtool_path {} does not exist; falling back to PATH",
                    p.display()
                ));
            }
        }

        if self.transcode.probe_timeout_secs == 0 {
            warnings.push("transcode.probe_timeout_secs is 0; every probe will time out".into());
        }
        if self.transcode.transcode_timeout_secs == 0 {
            warnings.push(
                "transcode.transcode_timeout_secs is 0; every transcode will time out".into(),
            );
        }
        if let Some(ref dir) = self.transcode.temp_dir {
            if !dir.is_dir() {
                warnings.push(format!(
                    "transcode.temp_dir {} is not a directory",
                    dir.display()
                ));
            }
        }
        if !(self.transcode.thumbnail_span_cap_secs > 0.0) {
            warnings.push("transcode.thumbnail_span_cap_secs must be positive".into());
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Paths to external CLI tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg_path: Option<PathBuf>,
    /// FLV metadata indexer run after the streaming profile.
    pub flvtool_path: Option<PathBuf>,
}

/// Probe and transcode policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeConfig {
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
    #[serde(default = "default_transcode_timeout")]
    pub transcode_timeout_secs: u64,
    /// Base directory for probe scratch directories (system temp if unset).
    pub temp_dir: Option<PathBuf>,
    /// Treat an exit-0 probe with no matched duration or stream as
    /// [`Error::UnsupportedInput`].
    pub require_stream_info: bool,
    /// Leave the partial output of a failed transcode in place.
    pub keep_failed_output: bool,
    /// Run the FLV indexer after a streaming transcode when it is installed.
    #[serde(default = "default_true")]
    pub index_flv: bool,
    /// Upper bound on the default thumbnail end point, in seconds.
    #[serde(default = "default_thumbnail_span_cap")]
    pub thumbnail_span_cap_secs: f64,
}

fn default_probe_timeout() -> u64 {
    60
}
fn default_transcode_timeout() -> u64 {
    86400
}
fn default_true() -> bool {
    true
}
fn default_thumbnail_span_cap() -> f64 {
    1800.0
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            probe_timeout_secs: default_probe_timeout(),
            transcode_timeout_secs: default_transcode_timeout(),
            temp_dir: None,
            require_stream_info: false,
            keep_failed_output: false,
            index_flv: default_true(),
            thumbnail_span_cap_secs: default_thumbnail_span_cap(),
        }
    }
}

impl TranscodeConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn transcode_timeout(&self) -> Duration {
        Duration::from_secs(self.transcode_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = Config::default();
        assert_eq!(cfg.transcode.probe_timeout_secs, 60);
        assert_eq!(cfg.transcode.transcode_timeout_secs, 86400);
        assert!(!cfg.transcode.require_stream_info);
        assert!(!cfg.transcode.keep_failed_output);
        assert!(cfg.transcode.index_flv);
        assert_eq!(cfg.transcode.thumbnail_span_cap_secs, 1800.0);
        assert!(cfg.tools.ffmpeg_path.is_none());
    }

    #[test]
    fn default_config_no_warnings() {
        let cfg = Config::default();
        let warnings = cfg.validate();
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    }

    #[test]
    fn parse_json_config() {
        let json = r#"{"transcode": {"probe_timeout_secs": 5, "keep_failed_output": true}}"#;
        let cfg = Config::from_json(json).unwrap();
        assert_eq!(cfg.transcode.probe_timeout(), Duration::from_secs(5));
        assert!(cfg.transcode.keep_failed_output);
        // Untouched fields keep their defaults.
        assert_eq!(cfg.transcode.transcode_timeout_secs, 86400);
        assert!(cfg.transcode.index_flv);
    }

    #[test]
    fn parse_empty_json_uses_defaults() {
        let cfg = Config::from_json("{}").unwrap();
        assert_eq!(cfg.transcode.probe_timeout_secs, 60);
    }

    #[test]
    fn parse_invalid_json_is_validation_error() {
        let err = Config::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn load_or_default_with_none() {
        let cfg = Config::load_or_default(None);
        assert_eq!(cfg.transcode.probe_timeout_secs, 60);
    }

    #[test]
    fn load_or_default_with_missing_file() {
        let cfg = Config::load_or_default(Some(Path::new("/nonexistent/ffwrap.json")));
        assert_eq!(cfg.transcode.probe_timeout_secs, 60);
    }

    #[test]
    fn load_or_default_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ffwrap.json");
        std::fs::write(&path, r#"{"transcode": {"require_stream_info": true}}"#).unwrap();
        let cfg = Config::load_or_default(Some(&path));
        assert!(cfg.transcode.require_stream_info);
    }

    #[test]
    fn missing_tool_override_warns() {
        let mut cfg = Config::default();
        cfg.tools.ffmpeg_path = Some(PathBuf::from("/nonexistent/ffmpeg"));
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.contains("ffmpeg_path")));
    }

    #[test]
    fn zero_timeouts_warn() {
        let mut cfg = Config::default();
        cfg.transcode.probe_timeout_secs = 0;
        cfg.transcode.transcode_timeout_secs = 0;
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 2);
    }
}
