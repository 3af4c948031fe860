//! External tool discovery.
//!
//! The [`ToolRegistry`] resolves the encoder (`ffmpeg`) and the optional FLV
//! metadata indexer (`flvtool2`) once, so actions never search `PATH`
//! themselves.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use fw_core::config::ToolsConfig;
use serde::{Deserialize, Serialize};

/// The encoder every probe and transcode runs.
pub const FFMPEG: &str = "ffmpeg";
/// Rewrites FLV metadata so players can seek; optional.
pub const FLVTOOL: &str = "flvtool2";

/// Default timeout for auxiliary tools: 5 minutes.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

const KNOWN_TOOLS: &[&str] = &[FFMPEG, FLVTOOL];

/// A resolved external tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Tool name (e.g. "ffmpeg").
    pub name: String,
    /// Resolved path to the executable.
    pub path: PathBuf,
    /// Maximum execution time for auxiliary invocations. Probe and transcode
    /// deadlines come from `TranscodeConfig` instead.
    #[serde(
        default = "default_timeout",
        with = "duration_secs",
        skip_serializing_if = "is_default_timeout"
    )]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn is_default_timeout(d: &Duration) -> bool {
    *d == DEFAULT_TIMEOUT
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}

/// Availability report for one tool, from [`ToolRegistry::check_all`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub available: bool,
    /// First line of the tool's version output.
    pub version: Option<String>,
    pub path: Option<PathBuf>,
}

/// Resolved tool locations.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolConfig>,
}

impl ToolRegistry {
    /// Resolve every known tool.
    ///
    /// An override path from [`ToolsConfig`] wins when it exists; otherwise
    /// the tool is looked up with [`which::which`]. Tools that cannot be
    /// found are left out.
    pub fn discover(tools_config: &ToolsConfig) -> Self {
        let mut registry = Self::default();

        for &name in KNOWN_TOOLS {
            let custom_path = match name {
                FFMPEG => tools_config.ffmpeg_path.as_deref(),
                FLVTOOL => tools_config.flvtool_path.as_deref(),
                _ => None,
            };

            let resolved = match custom_path {
                Some(p) if p.exists() => Some(p.to_path_buf()),
                Some(p) => {
                    tracing::warn!("{name} override {} does not exist; searching PATH", p.display());
                    which::which(name).ok()
                }
                None => which::which(name).ok(),
            };

            match resolved {
                Some(path) => {
                    tracing::debug!("found {name} at {}", path.display());
                    registry = registry.with_tool(name, path);
                }
                None => tracing::debug!("{name} not found"),
            }
        }

        registry
    }

    /// Register `name` at an explicit path, replacing any earlier entry.
    pub fn with_tool(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.tools.insert(
            name.to_string(),
            ToolConfig {
                name: name.to_string(),
                path: path.into(),
                timeout: DEFAULT_TIMEOUT,
            },
        );
        self
    }

    /// The [`ToolConfig`] for `name`, or [`fw_core::Error::Tool`] when it was
    /// not found.
    pub fn require(&self, name: &str) -> fw_core::Result<&ToolConfig> {
        self.tools.get(name).ok_or_else(|| {
            fw_core::Error::tool(name, format!("{name} not found; is it installed and in PATH?"))
        })
    }

    pub fn get(&self, name: &str) -> Option<&ToolConfig> {
        self.tools.get(name)
    }

    /// Report availability and version for every known tool.
    pub fn check_all(&self) -> Vec<ToolInfo> {
        KNOWN_TOOLS
            .iter()
            .map(|&name| match self.tools.get(name) {
                Some(cfg) => ToolInfo {
                    name: name.to_string(),
                    available: true,
                    version: detect_version(name, &cfg.path),
                    path: Some(cfg.path.clone()),
                },
                None => ToolInfo {
                    name: name.to_string(),
                    available: false,
                    version: None,
                    path: None,
                },
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ToolConfig)> {
        self.tools.iter()
    }
}

/// First line of `ffmpeg -version` / `flvtool2 -H`. ffmpeg writes it to
/// stdout; flvtool2 only has a help banner, so stderr is consulted too.
fn detect_version(name: &str, path: &Path) -> Option<String> {
    let version_arg = match name {
        FFMPEG => "-version",
        FLVTOOL => "-H",
        _ => "--version",
    };

    let output = std::process::Command::new(path)
        .arg(version_arg)
        .output()
        .ok()?;

    let first = [&output.stdout, &output.stderr]
        .into_iter()
        .flat_map(|bytes| {
            String::from_utf8_lossy(bytes)
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .next();
    first
}
