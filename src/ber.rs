//! Low-level BER tag inspection.
//!
//! `rasn` owns the actual tag/length/value machinery for every type this
//! crate derives; this module only adds the small amount of cursor
//! peeking the envelope and dialect dispatch code needs before it knows
//! which `rasn`-derived type to hand a buffer to (see `Message::from_bytes`
//! in the Z39 PDU layer this crate grew out of, which peeks the same way
//! to pick an APDU type ahead of `rasn::ber::decode`).

use crate::error::{RoseError, RoseResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Universal,
    Application,
    Context,
    Private,
}

/// A parsed tag octet (or multi-octet tag), not yet consumed from the
/// buffer it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    pub class: Class,
    pub constructed: bool,
    pub number: u32,
}

impl Tag {
    /// Parses the leading tag of `bytes` without consuming it.
    ///
    /// Multi-octet tag numbers (first octet's low 5 bits all set,
    /// continuation in base-128 afterwards) are accepted, as the BER
    /// grammar requires on input, though every production this crate
    /// implements fits in a single tag octet.
    pub fn peek(bytes: &[u8]) -> RoseResult<Self> {
        let first = *bytes.first().ok_or(RoseError::BufferUnderrun)?;
        let class = match first & 0xC0 {
            0x00 => Class::Universal,
            0x40 => Class::Application,
            0x80 => Class::Context,
            _ => Class::Private,
        };
        let constructed = first & 0x20 != 0;
        let number = if first & 0x1F == 0x1F {
            let mut n: u32 = 0;
            let mut idx = 1;
            loop {
                let byte = *bytes.get(idx).ok_or(RoseError::BufferUnderrun)?;
                n = (n << 7) | u32::from(byte & 0x7F);
                if byte & 0x80 == 0 {
                    break;
                }
                idx += 1;
            }
            n
        } else {
            u32::from(first & 0x1F)
        };
        Ok(Tag {
            class,
            constructed,
            number,
        })
    }

    /// True if this is the two-byte 0x00 0x00 end-of-contents marker that
    /// terminates an indefinite-length constructed value.
    pub fn is_end_of_contents(bytes: &[u8]) -> bool {
        bytes.len() >= 2 && bytes[0] == 0x00 && bytes[1] == 0x00
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn peeks_context_constructed_tag() {
        // [1] IMPLICIT SEQUENCE, i.e. ROSE Invoke: 0xA1
        let tag = Tag::peek(&[0xA1, 0x05]).unwrap();
        assert_eq!(tag.class, Class::Context);
        assert!(tag.constructed);
        assert_eq!(tag.number, 1);
    }

    #[test]
    fn peeks_context_primitive_tag() {
        let tag = Tag::peek(&[0x92, 0x01, 0x13]).unwrap();
        assert_eq!(tag.class, Class::Context);
        assert!(!tag.constructed);
        assert_eq!(tag.number, 18);
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(Tag::peek(&[]), Err(RoseError::BufferUnderrun)));
    }

    #[test]
    fn recognizes_end_of_contents() {
        assert!(Tag::is_end_of_contents(&[0x00, 0x00, 0xFF]));
        assert!(!Tag::is_end_of_contents(&[0x00, 0x01]));
    }
}
