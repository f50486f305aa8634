//! Session lifecycle events
//!
//! Each backend interaction emits a `tracing` event under the
//! `sessio::events` target; subscribers play the role of an external
//! dispatcher. Every event carries the elapsed time of the operation, and
//! read/write events carry the stored byte length.

use std::time::Instant;

use sessio_storage::ReadRecord;

pub(crate) const TARGET: &str = "sessio::events";

pub(crate) struct EventTimer {
    started: Instant,
}

impl EventTimer {
    pub(crate) fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub(crate) fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

pub(crate) fn open(timer: &EventTimer) {
    tracing::debug!(
        target: TARGET,
        event = "session.open",
        elapsed_ms = timer.elapsed_ms(),
    );
}

pub(crate) fn read(timer: &EventTimer, found: Option<&ReadRecord>) {
    match found {
        Some(found) => tracing::debug!(
            target: TARGET,
            event = "session.read",
            elapsed_ms = timer.elapsed_ms(),
            length = found.length,
            start_time = %found.record.start_time,
            access_time = %found.record.access_time,
        ),
        None => tracing::debug!(
            target: TARGET,
            event = "session.read",
            elapsed_ms = timer.elapsed_ms(),
        ),
    }
}

pub(crate) fn touch(timer: &EventTimer, length: usize) {
    tracing::debug!(
        target: TARGET,
        event = "session.touch",
        elapsed_ms = timer.elapsed_ms(),
        length,
    );
}

pub(crate) fn write(timer: &EventTimer, length: usize) {
    tracing::debug!(
        target: TARGET,
        event = "session.write",
        elapsed_ms = timer.elapsed_ms(),
        length,
    );
}

pub(crate) fn destroy(timer: &EventTimer) {
    tracing::debug!(
        target: TARGET,
        event = "session.destroy",
        elapsed_ms = timer.elapsed_ms(),
    );
}
