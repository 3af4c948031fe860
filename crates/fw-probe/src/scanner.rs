//! Accumulates a [`MediaDescriptor`] from diagnostic lines.

use crate::descriptor::MediaDescriptor;
use crate::grammar::Grammar;

/// Feeds diagnostic lines through a [`Grammar`].
///
/// Later matches overwrite earlier ones for the same field. Width and height
/// are rounded down to even values once, in [`ProbeTextScanner::finish`].
#[derive(Debug)]
pub struct ProbeTextScanner<'g> {
    grammar: &'g Grammar,
    descriptor: MediaDescriptor,
    lines_seen: usize,
    lines_matched: usize,
}

impl Default for ProbeTextScanner<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbeTextScanner<'static> {
    /// A scanner using [`Grammar::standard`].
    pub fn new() -> Self {
        Self::with_grammar(Grammar::standard())
    }

    /// Scan a complete diagnostic capture, splitting on `\r`.
    pub fn scan_text(text: &str) -> MediaDescriptor {
        let mut scanner = Self::new();
        for line in text.split('\r') {
            scanner.feed(line);
        }
        scanner.finish()
    }
}

impl<'g> ProbeTextScanner<'g> {
    pub fn with_grammar(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            descriptor: MediaDescriptor::default(),
            lines_seen: 0,
            lines_matched: 0,
        }
    }

    /// Apply the grammar to one line. Unmatched lines are ignored.
    pub fn feed(&mut self, line: &str) {
        self.lines_seen += 1;
        if self.grammar.apply(line, &mut self.descriptor) > 0 {
            self.lines_matched += 1;
        }
    }

    pub fn lines_seen(&self) -> usize {
        self.lines_seen
    }

    pub fn lines_matched(&self) -> usize {
        self.lines_matched
    }

    /// The descriptor as accumulated so far, before even rounding.
    pub fn peek(&self) -> &MediaDescriptor {
        &self.descriptor
    }

    /// Round dimensions down to even values and hand over the descriptor.
    pub fn finish(mut self) -> MediaDescriptor {
        tracing::debug!(
            seen = self.lines_seen,
            matched = self.lines_matched,
            "probe scan finished"
        );
        if let Some(video) = self.descriptor.video.as_mut() {
            video.width = crate::fit::even(video.width);
            video.height = crate::fit::even(video.height);
        }
        self.descriptor
    }
}
