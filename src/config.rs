//! Process-wide defaults.
//!
//! Grounded on `settings.rs`'s `Settings::global()` / `Settings::apply()`
//! pair: a lazily-initialized global, settable once at process start,
//! falling back to a built-in default if nobody ever calls `apply`.

use std::sync::OnceLock;

use crate::dialect::Dialect;

static DEFAULTS: OnceLock<Defaults> = OnceLock::new();

/// What a decoder does when a bounded field (a forwarding list, a
/// subaddress, a Q931ie) arrives over its capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Reject the whole message with [`crate::error::RoseError::ValueOutOfRange`].
    Reject,
    /// Truncate to the bound and continue decoding.
    Truncate,
}

#[derive(Debug, Clone)]
pub struct Defaults {
    pub dialect: Dialect,
    pub overflow_policy: OverflowPolicy,
    pub debug: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            dialect: Dialect::Etsi,
            overflow_policy: OverflowPolicy::Reject,
            debug: false,
        }
    }
}

impl Defaults {
    pub fn global() -> &'static Defaults {
        DEFAULTS.get_or_init(Defaults::default)
    }

    /// Take ownership of a `Defaults` instance and store it globally.
    ///
    /// May only be called once globally.
    ///
    /// # Panics
    ///
    /// Panics if called more than once.
    pub fn apply(self) {
        if DEFAULTS.set(self).is_err() {
            panic!("Global Defaults already applied");
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_dialect_is_etsi() {
        assert_eq!(Defaults::default().dialect, Dialect::Etsi);
    }
}
