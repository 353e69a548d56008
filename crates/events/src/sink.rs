use crate::Event;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::info;

/// Consumer side of the progress pipeline.
///
/// Called from the reporter's worker task, one event at a time.
pub trait EventSink: Send + 'static {
    fn render(&mut self, event: Event);

    /// Called once when the worker stops.
    fn finish(&mut self) {}
}

/// Renders progress as a spinner line on the terminal.
///
/// Updates replace the spinner message, completion finishes the line and
/// status events are printed above it.
#[derive(Default)]
pub struct TerminalSink {
    bar: Option<ProgressBar>,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn bar(&mut self) -> &ProgressBar {
        self.bar.get_or_insert_with(|| {
            let bar = ProgressBar::new_spinner();
            let style = ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            bar.set_style(style);
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        })
    }
}

impl EventSink for TerminalSink {
    fn render(&mut self, event: Event) {
        match event {
            Event::ProgressUpdate { message } => self.bar().set_message(message),
            Event::ProgressComplete { message } => {
                self.bar().finish_with_message(message);
                self.bar = None;
            }
            Event::Status { message } => match &self.bar {
                Some(bar) => bar.println(message),
                None => eprintln!("{message}"),
            },
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.abandon();
        }
    }
}

/// Relays events to `tracing`, for non-interactive runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn render(&mut self, event: Event) {
        match &event {
            Event::ProgressUpdate { message } => info!(target: "solar::progress", "{message}"),
            Event::ProgressComplete { message } => {
                info!(target: "solar::progress", complete = true, "{message}")
            }
            Event::Status { message } => info!(target: "solar::status", "{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_sink_handles_every_event_kind() {
        let mut sink = TerminalSink::new();
        sink.render(Event::status("before any progress"));
        sink.render(Event::progress("(0/2) Confirming contracts"));
        sink.render(Event::status("Token confirmed"));
        assert!(sink.bar.is_some());
        sink.render(Event::complete("All contracts confirmed"));
        assert!(sink.bar.is_none());
        sink.finish();
    }
}
