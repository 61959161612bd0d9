//! Per-decision debug lines.
//!
//! Everything recorded here also goes to `tracing`; a recording handle
//! additionally keeps the lines so a caller can inspect them.

use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Diagnostics {
    #[default]
    Silent,
    Recording(Vec<String>),
}

impl Diagnostics {
    pub fn recording() -> Self {
        Self::Recording(Vec::new())
    }

    pub fn record(&mut self, line: &str) {
        debug!(target: "cellbot::decision", "{line}");
        if let Self::Recording(lines) = self {
            lines.push(line.to_string());
        }
    }

    pub fn lines(&self) -> &[String] {
        match self {
            Self::Silent => &[],
            Self::Recording(lines) => lines,
        }
    }
}
