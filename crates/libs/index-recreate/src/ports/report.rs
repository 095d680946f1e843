use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Progress narration.
    Line,
    Info,
    Warn,
    Error,
}

/// Human readable output of a recreation.
pub trait Reporter: Send + Sync {
    fn report(&self, level: Level, message: &str);

    fn line(&self, message: &str) {
        self.report(Level::Line, message)
    }

    fn info(&self, message: &str) {
        self.report(Level::Info, message)
    }

    fn warn(&self, message: &str) {
        self.report(Level::Warn, message)
    }

    fn error(&self, message: &str) {
        self.report(Level::Error, message)
    }
}

/// Sends every report to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, level: Level, message: &str) {
        match level {
            Level::Line | Level::Info => info!("{}", message),
            Level::Warn => warn!("{}", message),
            Level::Error => error!("{}", message),
        }
    }
}
