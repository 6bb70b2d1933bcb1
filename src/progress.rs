// src/progress.rs
/// Lightweight progress reporting for the session fan-out.
/// Frontends (GUI/CLI) implement this to surface status to users.
pub trait Progress {
    /// Called once the number of session fetches is known.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one session's attendance has arrived.
    fn item_done(&mut self, _label: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// Counts calls; handy for tests and for summaries.
#[derive(Debug, Default)]
pub struct CountingProgress {
    pub total: usize,
    pub done: usize,
    pub finished: bool,
}

impl Progress for CountingProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }
    fn item_done(&mut self, _label: &str) {
        self.done += 1;
    }
    fn finish(&mut self) {
        self.finished = true;
    }
}
