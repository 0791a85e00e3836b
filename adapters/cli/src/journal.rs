//! In-memory sink for formatted log lines shown by the log overlay.

use std::{
    collections::VecDeque,
    io,
    sync::{Arc, Mutex, PoisonError},
};

use tracing_subscriber::fmt::MakeWriter;

/// Bounded, shareable list of log lines.
#[derive(Clone, Debug)]
pub(crate) struct EventJournal {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl EventJournal {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Recorded lines, newest first.
    pub(crate) fn entries(&self) -> Vec<String> {
        let lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        lines.iter().rev().cloned().collect()
    }

    fn record(&self, line: &str) {
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        while lines.len() >= self.capacity.max(1) {
            let _ = lines.pop_front();
        }
        lines.push_back(line.to_owned());
    }
}

/// Writer handed out per log event; its text is recorded when dropped.
#[derive(Debug)]
pub(crate) struct JournalWriter {
    journal: EventJournal,
    buffer: Vec<u8>,
}

impl io::Write for JournalWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for JournalWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.buffer);
        for line in text.lines().map(str::trim_end).filter(|line| !line.is_empty()) {
            self.journal.record(line);
        }
    }
}

impl<'a> MakeWriter<'a> for EventJournal {
    type Writer = JournalWriter;

    fn make_writer(&'a self) -> Self::Writer {
        JournalWriter {
            journal: self.clone(),
            buffer: Vec::new(),
        }
    }
}
