//! # fw-av
//!
//! External process side of ffwrap.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find ffmpeg and the optional
//!   flvtool2 indexer.
//! - **Command execution** ([`ToolCommand`]) -- async builder that streams
//!   `\r`-delimited diagnostics with timeout and cancellation support.
//! - **Option lists and profiles** ([`OptionList`], [`Profile`]) -- the
//!   fixed mobile, streaming, audio-extract and thumbnail option sets.
//! - **Probe scratch space** ([`Workspace`]).
//! - **Actions** ([`actions`]) -- probe, transcode, FLV indexing.

pub mod actions;
pub mod command;
pub mod options;
pub mod profiles;
pub mod progress;
pub mod tools;
pub mod workspace;

// ---- Re-exports for convenience ----

pub use command::{ToolCommand, ToolOutput};
pub use options::OptionList;
pub use profiles::{Profile, ThumbnailPlan};
pub use tools::{ToolConfig, ToolInfo, ToolRegistry};
pub use workspace::Workspace;

pub use actions::{index_flv, probe, transcode};
