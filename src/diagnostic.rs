//! Pluggable diagnostic sinks.
//!
//! The C sources this crate is grounded on report decode/encode activity
//! through a pair of process-global function pointers
//! (`rose_set_decode_dump_handler` et al., see `rosetest.c`'s use of
//! `facility_decode_dump`). A global function pointer has no place in a
//! library that may run several independent dialects/controllers in one
//! process, so this crate replaces it with a trait object a caller plugs
//! into a [`crate::controller::Controller`].

use crate::component::Component;
use crate::error::RoseError;

/// Receives trace events as components are decoded or encoded.
///
/// Implementations must not panic: a sink runs on every message, and a
/// panicking sink would turn an otherwise-successful decode into a crash.
pub trait DiagnosticSink {
    fn on_component(&self, _component: &Component) {}
    fn on_error(&self, _error: &RoseError) {}
}

/// Discards every event. The default when no sink is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {}

/// Forwards every event to the `log` crate, at `trace` for successful
/// components and `warn` for errors.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn on_component(&self, component: &Component) {
        log::trace!("{component:?}");
    }

    fn on_error(&self, error: &RoseError) {
        log::warn!("{error}");
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn noop_sink_accepts_every_event_without_panicking() {
        let sink = NoopSink;
        sink.on_error(&RoseError::BufferUnderrun);
    }
}
