//! The `Controller`: the entry point callers use to decode and encode
//! Facility IEs under a chosen dialect, policy, and diagnostic sink.
//!
//! Grounded on `rose.h`'s `struct rose_ctrl`, which bundles the same
//! three concerns (dialect, debug flag, and the handler function
//! pointers this crate's `diagnostic` module replaces) behind one handle
//! threaded through every `rose_encode`/`rose_decode` call.

use crate::config::{Defaults, OverflowPolicy};
use crate::dialect::Dialect;
use crate::diagnostic::{DiagnosticSink, NoopSink};
use crate::error::RoseResult;
use crate::header::Facility;

/// Bundles a dialect, overflow policy, and diagnostic sink for repeated
/// encode/decode calls.
pub struct Controller {
    dialect: Dialect,
    overflow_policy: OverflowPolicy,
    debug: bool,
    sink: Box<dyn DiagnosticSink>,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("dialect", &self.dialect)
            .field("overflow_policy", &self.overflow_policy)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl Default for Controller {
    fn default() -> Self {
        let defaults = Defaults::global();
        Controller {
            dialect: defaults.dialect,
            overflow_policy: defaults.overflow_policy,
            debug: defaults.debug,
            sink: Box::new(NoopSink),
        }
    }
}

impl Controller {
    pub fn new(dialect: Dialect) -> Self {
        Controller {
            dialect,
            ..Controller::default()
        }
    }

    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn with_overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow_policy
    }

    /// Decodes a Facility IE, tracing every component (and any failure)
    /// through this controller's diagnostic sink.
    ///
    /// `Facility::decode` itself never rejects an oversized
    /// `NetworkFacilityExtension` address (it only parses the wire
    /// format); this is where `overflow_policy` is applied to it —
    /// `Reject` fails the whole decode, `Truncate` shortens the address
    /// to its capacity bound and continues.
    pub fn decode(&self, bytes: &[u8]) -> RoseResult<Facility> {
        match Facility::decode(bytes) {
            Ok(mut facility) => {
                if let Some(nfe) = &mut facility.header.network_facility_extension {
                    match self.overflow_policy {
                        OverflowPolicy::Reject => {
                            if let Err(e) = nfe.validate() {
                                self.sink.on_error(&e);
                                return Err(e);
                            }
                        }
                        OverflowPolicy::Truncate => nfe.truncate_to_bounds(),
                    }
                }
                if self.debug {
                    for component in &facility.components {
                        self.sink.on_component(component);
                    }
                }
                Ok(facility)
            }
            Err(e) => {
                self.sink.on_error(&e);
                Err(e)
            }
        }
    }

    pub fn encode(&self, facility: &Facility) -> RoseResult<Vec<u8>> {
        match facility.encode() {
            Ok(bytes) => {
                if self.debug {
                    for component in &facility.components {
                        self.sink.on_component(component);
                    }
                }
                Ok(bytes)
            }
            Err(e) => {
                self.sink.on_error(&e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_controller_uses_global_defaults() {
        let controller = Controller::default();
        assert_eq!(controller.dialect(), Defaults::global().dialect);
    }

    #[test]
    fn decode_reports_errors_to_the_sink() {
        use std::cell::Cell;
        use std::rc::Rc;

        struct CountingSink(Rc<Cell<u32>>);
        impl DiagnosticSink for CountingSink {
            fn on_error(&self, _error: &crate::error::RoseError) {
                self.0.set(self.0.get() + 1);
            }
        }

        let count = Rc::new(Cell::new(0));
        let controller = Controller::new(Dialect::Etsi).with_sink(CountingSink(count.clone()));
        assert!(controller.decode(&[]).is_err());
        assert_eq!(count.get(), 1);
    }

    fn facility_with_oversized_nfe_address() -> crate::header::Facility {
        use crate::address::{PartyNumber, MAX_DIGITS};
        use crate::header::{FacilityExtensionHeader, NetworkFacilityExtension};
        use rasn::types::OctetString;

        let oversized = OctetString::from(vec![b'1'; MAX_DIGITS + 5]);
        crate::header::Facility {
            header: FacilityExtensionHeader {
                network_facility_extension: Some(NetworkFacilityExtension {
                    source_entity: 0,
                    source_entity_address: Some(PartyNumber::Unknown(oversized)),
                    destination_entity: 0,
                    destination_entity_address: None,
                }),
                network_protocol_profile: None,
                interpretation: None,
            },
            components: Vec::new(),
        }
    }

    #[test]
    fn reject_policy_fails_decode_on_oversized_nfe_address() {
        let bytes = facility_with_oversized_nfe_address().encode().unwrap();
        let controller = Controller::new(Dialect::Etsi).with_overflow_policy(OverflowPolicy::Reject);
        assert!(matches!(
            controller.decode(&bytes),
            Err(crate::error::RoseError::ValueOutOfRange(_))
        ));
    }

    #[test]
    fn truncate_policy_shortens_oversized_nfe_address_and_continues() {
        use crate::address::MAX_DIGITS;

        let bytes = facility_with_oversized_nfe_address().encode().unwrap();
        let controller = Controller::new(Dialect::Etsi).with_overflow_policy(OverflowPolicy::Truncate);
        let facility = controller.decode(&bytes).unwrap();
        let nfe = facility.header.network_facility_extension.unwrap();
        assert_eq!(
            nfe.source_entity_address.unwrap().digits().len(),
            MAX_DIGITS
        );
    }
}
