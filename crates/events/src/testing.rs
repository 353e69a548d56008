//! In-memory sink for tests of code that reports progress.
//!
//! Enabled by the `test-util` feature.

use crate::{Event, EventSink};
use std::sync::{Arc, Mutex, MutexGuard};

/// Keeps every rendered event in memory.
#[derive(Debug)]
pub struct RecordingSink {
    log: EventLog,
}

/// Shared view of the events a [`RecordingSink`] received.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    inner: Arc<Mutex<LogState>>,
}

#[derive(Debug, Default)]
struct LogState {
    events: Vec<Event>,
    finished: bool,
}

impl RecordingSink {
    pub fn new() -> (Self, EventLog) {
        let log = EventLog::default();
        (Self { log: log.clone() }, log)
    }
}

impl EventSink for RecordingSink {
    fn render(&mut self, event: Event) {
        self.log.lock().events.push(event);
    }

    fn finish(&mut self) {
        self.log.lock().finished = true;
    }
}

impl EventLog {
    fn lock(&self) -> MutexGuard<'_, LogState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of the events received so far, in delivery order.
    pub fn events(&self) -> Vec<Event> {
        self.lock().events.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().events.is_empty()
    }

    /// Whether the worker has stopped.
    pub fn finished(&self) -> bool {
        self.lock().finished
    }
}
