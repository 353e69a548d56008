use std::fmt;

/// Notification pushed through the progress pipeline.
///
/// The pipeline only sequences events; interpreting them is up to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Event {
    /// A step of a running task
    ProgressUpdate { message: String },
    /// The running task finished
    ProgressComplete { message: String },
    /// Standalone status line from any producer
    Status { message: String },
}

impl Event {
    pub fn progress(message: impl Into<String>) -> Self {
        Event::ProgressUpdate {
            message: message.into(),
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Event::ProgressComplete {
            message: message.into(),
        }
    }

    pub fn status(message: impl Into<String>) -> Self {
        Event::Status {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Event::ProgressUpdate { message }
            | Event::ProgressComplete { message }
            | Event::Status { message } => message,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
