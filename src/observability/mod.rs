//! Observability
//!
//! Structured JSON logging to stderr, typed events and search counters.
//! Observability never changes what a run computes.
//!
//! ```ignore
//! use hdgen::observability::{log_event_with_fields, Event, SearchMetrics};
//!
//! log_event_with_fields(Event::SearchBegin, &[("mode", "bnb"), ("width", "2")]);
//!
//! let metrics = SearchMetrics::new();
//! metrics.increment_separators_tried();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsSnapshot, SearchMetrics};

fn severity_of(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else {
        Severity::Info
    }
}

pub fn log_event(event: Event) {
    Logger::log(severity_of(event), event.as_str(), &[]);
}

pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_of(event), event.as_str(), fields);
}

/// Logs a per-step event at TRACE
pub fn trace_event(event: Event, fields: &[(&str, &str)]) {
    Logger::trace(event.as_str(), fields);
}
