//! Pseudocode line tracking.

use crate::event::{GraphEvent, Recorder};

/// Current-line pointer into a fixed list of pseudocode lines.
#[derive(Debug)]
pub struct CodeTracker {
    lines: Vec<String>,
    current_line: usize,
    recorder: Recorder,
}

impl CodeTracker {
    pub(crate) fn new(lines: Vec<String>, recorder: Recorder) -> Self {
        Self {
            lines,
            current_line: 0,
            recorder,
        }
    }

    /// Move to `line`, recording the change.
    pub fn set_line(&mut self, line: usize) -> &mut Self {
        self.recorder.record(GraphEvent::CodeWrite { line });
        self.current_line = line;
        self
    }

    /// The line currently pointed at.
    pub fn current_line(&self) -> usize {
        self.current_line
    }

    /// All pseudocode lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}
