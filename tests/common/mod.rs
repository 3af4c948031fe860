//! Shared test harness for integration tests.
//!
//! Provides [`FakeTool`], a `/bin/sh` script standing in for ffmpeg (or
//! flvtool2) that records its arguments, prints canned diagnostic text and
//! exits with a chosen status, and [`Harness`], which wires one into a
//! [`Transcoder`] with a private input file and scratch directory.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use ffwrap::{Config, ToolRegistry, Transcoder};
use tempfile::TempDir;

/// ffmpeg's header for a small AVI, newline separated inside one `\r` chunk,
/// followed by progress rewrites.
pub const AVI_HEADER: &str = "FFmpeg version SVN-r6338, Copyright (c) 2000-2006 Fabrice Bellard, et al.\n\
  configuration: --enable-mp3lame --enable-faac\n\
Input #0, avi, from 'clip.avi':\n\
  Duration: 00:01:05.3, start: 0.000000, bitrate: 1250 kb/s\n\
  Stream #0.0: Video: mpeg4, yuv420p, 641x481, 25.00 fps(r)\n\
  Stream #0.1: Audio: mp3, 44100 Hz, stereo, 128 kb/s\n\
Output #0, avi, to 'probe.avi':\n\
  Stream #0.0: Video: mpeg4, yuv420p, 641x481, q=2-31, 200 kb/s\n\
Stream mapping:\n\
  Stream #0.0 -> #0.0\n\
Press [q] to stop encoding\n";

/// Header of an audio-only MP3.
pub const MP3_HEADER: &str = "Input #0, mp3, from 'song.mp3':\n\
  Duration: 00:03:20.0, start: 0.000000, bitrate: 128 kb/s\n\
  Stream #0.0: Audio: mp3, 22050 Hz, mono, 64 kb/s\n\
Press [q] to stop encoding\n";

/// Progress rewrites for a 20 second source.
pub const PROGRESS: &str = "\rframe=  125 fps=125 q=2.0 size=     300kB time=00:00:05.00 bitrate= 491.5kbits/s    \
\rframe=  250 fps=125 q=2.0 size=     600kB time=00:00:10.00 bitrate= 491.5kbits/s    \
\rframe=  500 fps=125 q=2.0 Lsize=    1200kB time=00:00:20.00 bitrate= 491.5kbits/s    \n";

/// What the fake tool does when run.
#[derive(Debug, Clone)]
pub struct Behavior {
    pub stderr: String,
    pub exit_code: i32,
    /// Write a few bytes to the last argument (the output path).
    pub write_output: bool,
    /// Replace the script with `sleep` after printing, never exiting itself.
    pub hang_secs: Option<u32>,
}

impl Behavior {
    pub fn ok(stderr: &str) -> Self {
        Self {
            stderr: stderr.to_string(),
            exit_code: 0,
            write_output: true,
            hang_secs: None,
        }
    }

    pub fn fail(stderr: &str, exit_code: i32) -> Self {
        Self {
            exit_code,
            ..Self::ok(stderr)
        }
    }

    pub fn hang(stderr: &str) -> Self {
        Self {
            hang_secs: Some(30),
            ..Self::ok(stderr)
        }
    }

    pub fn without_output(mut self) -> Self {
        self.write_output = false;
        self
    }
}

/// An executable shell script installed under its tool name.
pub struct FakeTool {
    dir: TempDir,
    name: String,
}

impl FakeTool {
    pub fn install(name: &str, behavior: &Behavior) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path().display().to_string();
        fs::write(dir.path().join("stderr.txt"), &behavior.stderr).unwrap();

        let mut script = String::from("#!/bin/sh\n");
        script.push_str(&format!(": > \"{d}/ran\"\n"));
        script.push_str(&format!(
            "for arg in \"$@\"; do printf '%s\\n' \"$arg\"; done > \"{d}/args.txt\"\n"
        ));
        script.push_str("for last in \"$@\"; do :; done\n");
        if behavior.write_output {
            script.push_str("printf 'partial' > \"$last\"\n");
        }
        script.push_str(&format!("cat \"{d}/stderr.txt\" >&2\n"));
        if let Some(secs) = behavior.hang_secs {
            script.push_str(&format!("exec sleep {secs}\n"));
        }
        script.push_str(&format!("exit {}\n", behavior.exit_code));

        let path = dir.path().join(name);
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        Self {
            dir,
            name: name.to_string(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join(&self.name)
    }

    pub fn was_run(&self) -> bool {
        self.dir.path().join("ran").exists()
    }

    /// Arguments of the last run, one per element.
    pub fn recorded_args(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("args.txt"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

/// A fake ffmpeg plus a private input file, scratch dir and output dir.
pub struct Harness {
    pub work: TempDir,
    pub ffmpeg: FakeTool,
    pub input: PathBuf,
    pub config: Config,
}

impl Harness {
    pub fn new(behavior: Behavior) -> Self {
        let work = tempfile::tempdir().unwrap();
        let input = work.path().join("clip.avi");
        fs::write(&input, b"RIFF....AVI ").unwrap();
        let scratch = work.path().join("scratch");
        fs::create_dir(&scratch).unwrap();
        fs::create_dir(work.path().join("out")).unwrap();

        let mut config = Config::default();
        config.transcode.temp_dir = Some(scratch);

        Self {
            work,
            ffmpeg: FakeTool::install("ffmpeg", &behavior),
            input,
            config,
        }
    }

    pub fn tools(&self) -> ToolRegistry {
        ToolRegistry::default().with_tool("ffmpeg", self.ffmpeg.path())
    }

    pub fn transcoder(&self) -> Transcoder {
        Transcoder::with_tools(self.config.clone(), self.tools())
    }

    pub fn output(&self, name: &str) -> PathBuf {
        self.work.path().join("out").join(name)
    }

    pub fn scratch(&self) -> &Path {
        self.config.transcode.temp_dir.as_deref().unwrap()
    }

    pub fn scratch_is_empty(&self) -> bool {
        fs::read_dir(self.scratch()).unwrap().next().is_none()
    }
}
