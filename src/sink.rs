// src/sink.rs
//
// Where a finished table goes: shown to the user, and copied somewhere
// (clipboard in the GUI, export file in the CLI) on a best-effort basis.

use std::{io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("clipboard unavailable")]
    Unavailable,

    #[error("write {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

pub trait OutputSink {
    fn show(&mut self, csv: &str);
    fn copy(&mut self, csv: &str) -> Result<(), SinkError>;
}

/// Show, then copy. Copy failures are logged and reported as `false`;
/// what was shown stays shown.
pub fn deliver(sink: &mut dyn OutputSink, csv: &str) -> bool {
    logf!("Output: {} bytes, {} lines", csv.len(), csv.lines().count());
    sink.show(csv);
    match sink.copy(csv) {
        Ok(()) => true,
        Err(e) => {
            loge!("Output: copy failed: {e}");
            false
        }
    }
}

/// Keeps everything in memory.
#[derive(Debug, Default)]
pub struct BufferSink {
    pub shown: Option<String>,
    pub copied: Option<String>,
    pub fail_copy: bool,
}

impl OutputSink for BufferSink {
    fn show(&mut self, csv: &str) {
        self.shown = Some(s!(csv));
    }

    fn copy(&mut self, csv: &str) -> Result<(), SinkError> {
        if self.fail_copy {
            return Err(SinkError::Unavailable);
        }
        self.copied = Some(s!(csv));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_failure_does_not_hide_output() {
        let mut sink = BufferSink { fail_copy: true, ..BufferSink::default() };
        assert!(!deliver(&mut sink, "Date,Class Name,\n"));
        assert_eq!(sink.shown.as_deref(), Some("Date,Class Name,\n"));
        assert!(sink.copied.is_none());
    }
}
