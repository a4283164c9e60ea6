//! Address primitives shared by every ROSE dialect.
//!
//! Grounded on `rose.h`'s `rosePartyNumber` / `rosePartySubaddress` /
//! `roseAddress` family and the encode/decode shapes in `rose_address.c`.
//! Capacity bounds (`MAX_DIGITS`, `MAX_SUBADDRESS`, ...) are the
//! specification-defined bounds from the same header, preserved here as
//! named constants rather than re-derived, per the Design Notes on fixed-
//! capacity collections: the bound is enforced once, in `validate()`,
//! rather than scattered through every caller.

use rasn::prelude::*;
use rasn::AsnType;

use crate::error::{RoseError, RoseResult};

/// `rosePartyNumber.str` bound: up to 20 digits.
pub const MAX_DIGITS: usize = 20;
/// `rosePartySubaddress` bound: up to 20 octets, either NSAP or user-specified.
pub const MAX_SUBADDRESS: usize = 20;
/// Bearer Capability IE maximum length.
pub const Q931_MAX_BC: usize = 12;
/// High Layer Compatibility IE maximum length.
pub const Q931_MAX_HLC: usize = 5;
/// Low Layer Compatibility IE maximum length.
pub const Q931_MAX_LLC: usize = 18;
/// User-User IE maximum length (network-dependent; 131 is the larger bound).
pub const Q931_MAX_USER: usize = 131;
/// Progress Indicator(s) maximum length (Q.SIG allows up to 3 at 4 octets each).
pub const Q931_MAX_PROGRESS: usize = 3 * 4;

fn check_len(len: usize, max: usize, what: &'static str) -> RoseResult<()> {
    if len > max {
        Err(RoseError::ValueOutOfRange(what))
    } else {
        Ok(())
    }
}

/// `PartyNumber ::= CHOICE { ... }`
///
/// Plans 1 (Public) and 5 (Private) carry a type-of-number alongside the
/// digit string; the rest carry only digits. `ton` is meaningless outside
/// those two variants, which is why only they carry one.
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
#[rasn(choice)]
pub enum PartyNumber {
    #[rasn(tag(0))]
    Unknown(OctetString),
    #[rasn(tag(1))]
    Public(NetworkNumber),
    #[rasn(tag(2))]
    Nsap(OctetString),
    #[rasn(tag(3))]
    Data(OctetString),
    #[rasn(tag(4))]
    Telex(OctetString),
    #[rasn(tag(5))]
    Private(NetworkNumber),
    #[rasn(tag(8))]
    NationalStandard(OctetString),
}

/// `PublicPartyNumber` / `PrivatePartyNumber`: a type-of-number ENUMERATED
/// followed by the digit string, as a SEQUENCE implicitly tagged by the
/// enclosing `PartyNumber` choice.
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
pub struct NetworkNumber {
    pub type_of_number: u8,
    pub digits: OctetString,
}

impl PartyNumber {
    pub fn digits(&self) -> &[u8] {
        match self {
            PartyNumber::Unknown(d)
            | PartyNumber::Nsap(d)
            | PartyNumber::Data(d)
            | PartyNumber::Telex(d)
            | PartyNumber::NationalStandard(d) => d,
            PartyNumber::Public(n) | PartyNumber::Private(n) => &n.digits,
        }
    }

    /// `length == 0` means "not present" in every context that allows an
    /// absent `PartyNumber`.
    pub fn is_present(&self) -> bool {
        !self.digits().is_empty()
    }

    pub fn validate(&self) -> RoseResult<()> {
        check_len(self.digits().len(), MAX_DIGITS, "PartyNumber digits")
    }

    /// Truncates the digit string to `max` octets in place, per
    /// [`crate::config::OverflowPolicy::Truncate`].
    pub fn truncate_to(&mut self, max: usize) {
        match self {
            PartyNumber::Unknown(d)
            | PartyNumber::Nsap(d)
            | PartyNumber::Data(d)
            | PartyNumber::Telex(d)
            | PartyNumber::NationalStandard(d) => d.truncate(max),
            PartyNumber::Public(n) | PartyNumber::Private(n) => n.digits.truncate(max),
        }
    }
}

/// `NumberScreened ::= SEQUENCE { partyNumber PartyNumber, screeningIndicator ScreeningIndicator }`
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
pub struct NumberScreened {
    pub number: PartyNumber,
    pub screening_indicator: u8,
}

/// `PartySubaddress ::= CHOICE { UserSpecifiedSubaddress, NSAPSubaddress }`
///
/// The wire discriminator is the tag alone: a constructed SEQUENCE selects
/// the user-specified form, a primitive/constructed OCTET STRING selects
/// NSAP (see `rose_dec_PartySubaddress`).
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
#[rasn(choice)]
pub enum PartySubaddress {
    UserSpecified(UserSpecifiedSubaddress),
    Nsap(OctetString),
}

#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
pub struct UserSpecifiedSubaddress {
    pub information: OctetString,
    /// `TRUE` if the coding of the subaddress is BCD and has an odd digit count.
    pub odd_count: Option<bool>,
}

impl PartySubaddress {
    pub fn bytes(&self) -> &[u8] {
        match self {
            PartySubaddress::UserSpecified(u) => &u.information,
            PartySubaddress::Nsap(b) => b,
        }
    }

    pub fn is_present(&self) -> bool {
        !self.bytes().is_empty()
    }

    pub fn validate(&self) -> RoseResult<()> {
        check_len(self.bytes().len(), MAX_SUBADDRESS, "PartySubaddress")
    }

    /// Truncates the subaddress to `max` octets in place, per
    /// [`crate::config::OverflowPolicy::Truncate`].
    pub fn truncate_to(&mut self, max: usize) {
        match self {
            PartySubaddress::UserSpecified(u) => u.information.truncate(max),
            PartySubaddress::Nsap(b) => b.truncate(max),
        }
    }
}

/// `Address ::= SEQUENCE { PartyNumber, PartySubaddress OPTIONAL }`
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
pub struct Address {
    pub number: PartyNumber,
    pub subaddress: Option<PartySubaddress>,
}

impl Address {
    pub fn validate(&self) -> RoseResult<()> {
        self.number.validate()?;
        if let Some(sub) = &self.subaddress {
            sub.validate()?;
        }
        Ok(())
    }

    /// Truncates the number and subaddress to their capacity bounds in
    /// place, per [`crate::config::OverflowPolicy::Truncate`].
    pub fn truncate_to_bounds(&mut self) {
        self.number.truncate_to(MAX_DIGITS);
        if let Some(sub) = &mut self.subaddress {
            sub.truncate_to(MAX_SUBADDRESS);
        }
    }
}

/// `AddressScreened ::= SEQUENCE { PartyNumber, ScreeningIndicator, PartySubaddress OPTIONAL }`
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
pub struct AddressScreened {
    pub number: PartyNumber,
    pub subaddress: Option<PartySubaddress>,
    pub screening_indicator: u8,
}

/// `PresentedNumberUnscreened ::= CHOICE { ... }`
///
/// Only the allowed and restricted-with-number alternatives carry a
/// number; the other two are bare NULLs (presentation-restricted /
/// not-available-due-to-interworking).
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
#[rasn(choice)]
pub enum PresentedNumberUnscreened {
    #[rasn(tag(explicit(0)))]
    Allowed(PartyNumber),
    #[rasn(tag(1))]
    Restricted,
    #[rasn(tag(2))]
    NotAvailable,
    #[rasn(tag(explicit(3)))]
    RestrictedWithNumber(PartyNumber),
}

/// `PresentedNumberScreened ::= CHOICE { ... }` over `NumberScreened`.
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
#[rasn(choice)]
pub enum PresentedNumberScreened {
    #[rasn(tag(0))]
    Allowed(NumberScreened),
    #[rasn(tag(1))]
    Restricted,
    #[rasn(tag(2))]
    NotAvailable,
    #[rasn(tag(3))]
    RestrictedWithNumber(NumberScreened),
}

/// `PresentedAddressScreened ::= CHOICE { ... }` over `AddressScreened`.
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
#[rasn(choice)]
pub enum PresentedAddressScreened {
    #[rasn(tag(0))]
    Allowed(AddressScreened),
    #[rasn(tag(1))]
    Restricted,
    #[rasn(tag(2))]
    NotAvailable,
    #[rasn(tag(3))]
    RestrictedWithNumber(AddressScreened),
}

/// `GeneralizedTime ::= [UNIVERSAL 24] IMPLICIT VisibleString`
///
/// An ISO-8601 local/UTC timestamp string, 12 to 19 characters
/// (`YYYYMMDDHHMM[SS][Z|+-HHMM]`).
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
#[rasn(delegate, tag(universal, 24))]
pub struct GeneralizedTime(pub VisibleString);

impl GeneralizedTime {
    pub fn validate(&self) -> RoseResult<()> {
        let len = self.0.len();
        if (12..=19).contains(&len) {
            Ok(())
        } else {
            Err(RoseError::ValueOutOfRange("GeneralizedTime"))
        }
    }
}

/// `Q931InformationElement ::= [APPLICATION 0] IMPLICIT OCTET STRING`
///
/// Stored and reproduced byte-exact without interpretation; the core
/// never looks inside it (see the embedded-IE non-goal in §1 of the
/// full spec).
#[derive(Debug, Clone, PartialEq, Eq, Default, AsnType, Decode, Encode)]
#[rasn(delegate, tag(application, 0))]
pub struct Q931Ie(pub OctetString);

impl Q931Ie {
    pub fn validate_within(&self, max: usize) -> RoseResult<()> {
        check_len(self.0.len(), max, "Q931InformationElement")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn party_number_reports_absence_by_empty_digits() {
        let absent = PartyNumber::Unknown(OctetString::new());
        assert!(!absent.is_present());
        let present = PartyNumber::Unknown(OctetString::from_static(b"1803"));
        assert!(present.is_present());
    }

    #[test]
    fn party_number_rejects_oversized_digits() {
        let too_long = PartyNumber::Unknown(OctetString::from(vec![b'1'; MAX_DIGITS + 1]));
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn subaddress_discriminates_nsap_from_user_specified() {
        let nsap = PartySubaddress::Nsap(OctetString::from_static(b"6492"));
        assert_eq!(nsap.bytes(), b"6492");
        let user = PartySubaddress::UserSpecified(UserSpecifiedSubaddress {
            information: OctetString::from_static(b"6492"),
            odd_count: Some(true),
        });
        assert_eq!(user.bytes(), b"6492");
    }
}
