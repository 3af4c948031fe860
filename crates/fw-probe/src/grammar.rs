//! The line grammar applied to ffmpeg's diagnostic stream.
//!
//! Each [`LineRule`] pairs a pattern with the descriptor fields it sets.
//! Rules are independent: a line may match none, one, or several of them,
//! and the extended stream forms deliberately re-match the same announcement
//! to pick up the optional trailing field.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::descriptor::{MediaDescriptor, VideoStream};

/// Field updater invoked with the captures of a matching line.
///
/// Returns `false` when the captures could not be converted (e.g. a number
/// out of range), in which case the line counts as unmatched.
pub type ApplyFn = fn(&Captures<'_>, &mut MediaDescriptor) -> bool;

/// One pattern of the grammar.
#[derive(Debug, Clone)]
pub struct LineRule {
    name: &'static str,
    pattern: Regex,
    apply: ApplyFn,
}

impl LineRule {
    pub fn new(name: &'static str, pattern: &str, apply: ApplyFn) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
            apply,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Apply this rule to `line`. The first match within the line wins.
    pub fn apply(&self, line: &str, descriptor: &mut MediaDescriptor) -> bool {
        match self.pattern.captures(line) {
            Some(caps) => (self.apply)(&caps, descriptor),
            None => false,
        }
    }
}

/// An ordered table of [`LineRule`]s.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    rules: Vec<LineRule>,
}

static STANDARD: LazyLock<Grammar> = LazyLock::new(|| {
    let rules: [(&'static str, &str, ApplyFn); 5] = [
        (
            "duration",
            r"Duration: (\d{2}):(\d{2}):(\d{2})\.(\d), start: 0\.000000, bitrate: (\d+) kb",
            apply_duration,
        ),
        (
            "video",
            r"Stream #(\S+) Video: (\w+), (\w+), (\d+)x(\d+)",
            apply_video,
        ),
        (
            "video_fps",
            r"Stream #(\S+) Video: (\w+), (\w+), (\d+)x(\d+), (\S+)",
            apply_video_fps,
        ),
        (
            "audio",
            r"Stream #(\S+) Audio: (\w+), (\d+) Hz, (\w+)",
            apply_audio,
        ),
        (
            "audio_bitrate",
            r"Stream #(\S+) Audio: (\w+), (\d+) Hz, (\w+), (\d+)",
            apply_audio_bitrate,
        ),
    ];

    Grammar {
        rules: rules
            .into_iter()
            .map(|(name, pattern, apply)| {
                LineRule::new(name, pattern, apply).expect("standard grammar patterns are valid")
            })
            .collect(),
    }
});

impl Grammar {
    /// The five-rule grammar for ffmpeg's classic header shape.
    pub fn standard() -> &'static Grammar {
        &STANDARD
    }

    /// An empty grammar to build on.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule; it runs after the existing ones.
    pub fn with_rule(mut self, rule: LineRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[LineRule] {
        &self.rules
    }

    /// Apply every rule to `line`, returning the number of rules that matched.
    pub fn apply(&self, line: &str, descriptor: &mut MediaDescriptor) -> usize {
        let mut matched = 0;
        for rule in &self.rules {
            if rule.apply(line, descriptor) {
                tracing::trace!(rule = rule.name, "probe line matched");
                matched += 1;
            }
        }
        matched
    }
}

// ---------------------------------------------------------------------------
// Field updaters
// ---------------------------------------------------------------------------

fn capture<T: std::str::FromStr>(caps: &Captures<'_>, index: usize) -> Option<T> {
    caps.get(index)?.as_str().parse().ok()
}

fn apply_duration(caps: &Captures<'_>, d: &mut MediaDescriptor) -> bool {
    let (Some(h), Some(m), Some(s), Some(ds), Some(bitrate)) = (
        capture::<u64>(caps, 1),
        capture::<u64>(caps, 2),
        capture::<u64>(caps, 3),
        capture::<u64>(caps, 4),
        capture::<u32>(caps, 5),
    ) else {
        return false;
    };
    let deciseconds = ((h * 60 + m) * 60 + s) * 10 + ds;
    d.duration = Some(deciseconds as f64 / 10.0);
    d.bitrate = Some(bitrate);
    true
}

fn apply_video(caps: &Captures<'_>, d: &mut MediaDescriptor) -> bool {
    let (Some(width), Some(height)) = (capture::<u32>(caps, 4), capture::<u32>(caps, 5)) else {
        return false;
    };
    if height == 0 {
        return false;
    }
    // Aspect ratio comes from the raw dimensions; evening happens at finish.
    let video = d.video.get_or_insert_with(VideoStream::default);
    video.codec = caps[2].to_string();
    video.width = width;
    video.height = height;
    video.aspect_ratio = f64::from(width) / f64::from(height);
    true
}

fn apply_video_fps(caps: &Captures<'_>, d: &mut MediaDescriptor) -> bool {
    let Some(video) = d.video.as_mut() else {
        return false;
    };
    match numeric_prefix(&caps[6]) {
        Some(fps) => {
            video.fps = Some(fps);
            true
        }
        None => false,
    }
}

fn apply_audio(caps: &Captures<'_>, d: &mut MediaDescriptor) -> bool {
    let Some(sample_rate) = capture::<u32>(caps, 3) else {
        return false;
    };
    let audio = d.audio.get_or_insert_with(Default::default);
    audio.codec = caps[2].to_string();
    audio.sample_rate = sample_rate;
    audio.sample_format = caps[4].to_string();
    true
}

fn apply_audio_bitrate(caps: &Captures<'_>, d: &mut MediaDescriptor) -> bool {
    let (Some(audio), Some(bitrate)) = (d.audio.as_mut(), capture::<u32>(caps, 5)) else {
        return false;
    };
    audio.bitrate = Some(bitrate);
    true
}

/// Parse the leading decimal number of `s` ("29.97," -> 29.97, "25" -> 25.0).
/// Returns `None` when `s` does not start with a digit.
pub(crate) fn numeric_prefix(s: &str) -> Option<f64> {
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        match c {
            '0'..='9' => end = i + 1,
            '.' if !seen_dot && end == i && i > 0 => seen_dot = true,
            _ => break,
        }
    }
    if end == 0 {
        return None;
    }
    s[..end].parse().ok()
}
