//! Solar Progress Events
//!
//! Producers push [`Event`]s into a [`Reporter`]; one background task drains
//! them, in submission order, into an [`EventSink`] that renders or relays
//! them. Submitting never waits for the sink.

mod event;
mod reporter;
mod sink;
#[cfg(any(test, feature = "test-util"))]
mod testing;

pub use event::Event;
pub use reporter::Reporter;
pub use sink::{EventSink, LogSink, TerminalSink};
#[cfg(any(test, feature = "test-util"))]
pub use testing::{EventLog, RecordingSink};
