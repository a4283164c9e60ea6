//! Q.SIG (ECMA) supplementary-service operations.
//!
//! Grounded on `rose.h`'s Q.SIG sections of `enum rose_operation` /
//! `enum rose_error_code`, and on `roseQsigName`, `roseQsigChargeRequestArg`,
//! `roseQsigCTIdentifyRes`, `roseQsigCallRerouting_ARG`,
//! `roseQsigCcRequestArg`/`roseQsigCcRequestRes`, and `roseQsigMWIActivateArg`.
//! Every named operation in that enum has a table entry here (symbolic
//! code, wire value, string label) so dispatch and `operation_to_string`
//! are total; operations outside the representative cross-section named
//! in DESIGN.md decode/encode their argument as [`crate::component::Opaque`]
//! instead (a recorded gap against spec.md's full-coverage requirement,
//! not a silent omission).
//!
//! Q.SIG's Name family is invoked by `OPERATION-VALUE ::= global OBJECT
//! IDENTIFIER` in the "second edition" of the standard rather than by a
//! local integer; the first edition used a local value, and real traffic
//! still occasionally carries that form. This module's `Name` decoder
//! accepts both (see `Name::Unknown` below); the encoder only ever emits
//! the OID form.

use rasn::prelude::*;
use rasn::AsnType;
use strum_macros::EnumIter;

use crate::address::Q931Ie;
use crate::dialect::OperationValue;
use crate::error::{RoseError, RoseResult};

/// Maximum length of a Q.SIG `NameData` string.
pub const NAME_MAX: usize = 50;

/// Second-edition global OPERATION-VALUE OIDs for the Name family, root
/// `{ccitt recommendation q 950}` per the ASN.1 production comments in
/// `rose.h` (`roseQsigName` / `roseQsigPartyName_ARG`).
pub const OID_CALLING_NAME: [u32; 7] = [1, 3, 12, 9, 0, 0, 1];
pub const OID_CALLED_NAME: [u32; 7] = [1, 3, 12, 9, 0, 0, 2];
pub const OID_CONNECTED_NAME: [u32; 7] = [1, 3, 12, 9, 0, 0, 3];
pub const OID_BUSY_NAME: [u32; 7] = [1, 3, 12, 9, 0, 0, 4];

fn oid(arr: &[u32]) -> ObjectIdentifier {
    ObjectIdentifier::new_unchecked(arr.to_vec().into())
}

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Operation {
    CallingName = 1,
    CalledName = 2,
    ConnectedName = 3,
    BusyName = 4,
    ActivationDiversion = 5,
    DeactivationDiversion = 6,
    InterrogationDiversion = 7,
    CallRerouting = 8,
    DivertingLegInformation1 = 9,
    DivertingLegInformation2 = 10,
    DivertingLegInformation3 = 11,
    ChargeRequest = 12,
    AocComplete = 13,
    AocDivChargeReq = 14,
    CallTransferIdentify = 15,
    CallTransferInitiate = 16,
    CallTransferSetup = 17,
    CallTransferActive = 18,
    CallTransferComplete = 19,
    CallTransferUpdate = 20,
    CcbsRequest = 21,
    CcnrRequest = 22,
    CcExecPossible = 23,
    CcCancel = 24,
    CcExecPending = 25,
    MwiActivate = 26,
    MwiDeactivate = 27,

    // The remaining named operations in `rose.h`'s Q.SIG section, added
    // for table completeness (symbolic code, wire value, label) per
    // §4.3; none has a bespoke argument/result codec yet, so they
    // decode/encode their payload as `Opaque` like any other
    // currently-uncoded operation.
    GetFinalCharge = 28,
    AocFinal = 29,
    AocInterim = 30,
    AocRate = 31,
    CallTransferAbandon = 32,
    SubaddressTransfer = 33,
    PathReplacement = 34,
    ActivateDiversionQ = 35,
    DeactivateDiversionQ = 36,
    InterrogateDiversionQ = 37,
    CheckRestriction = 38,
    CfnrDivertedLegFailed = 39,
    CcPathReserve = 40,
    CcRingout = 41,
    CcSuspend = 42,
    CcResume = 43,
    MwiInterrogate = 44,
}

impl Operation {
    /// Global-OID-invoked operations have no meaningful local value; this
    /// returns the first-edition local value for those anyway, matching
    /// the enum's own declaration order, since every operation needs a
    /// stable `Local` form for dialects/messages that still use it.
    pub fn value(self) -> OperationValue {
        match self {
            Operation::CallingName => OperationValue::Global(oid(&OID_CALLING_NAME)),
            Operation::CalledName => OperationValue::Global(oid(&OID_CALLED_NAME)),
            Operation::ConnectedName => OperationValue::Global(oid(&OID_CONNECTED_NAME)),
            Operation::BusyName => OperationValue::Global(oid(&OID_BUSY_NAME)),
            other => OperationValue::Local(other as i32),
        }
    }

    pub fn try_from(value: &OperationValue) -> Result<Self, ()> {
        match value {
            OperationValue::Global(got) => {
                if *got == oid(&OID_CALLING_NAME) {
                    Ok(Operation::CallingName)
                } else if *got == oid(&OID_CALLED_NAME) {
                    Ok(Operation::CalledName)
                } else if *got == oid(&OID_CONNECTED_NAME) {
                    Ok(Operation::ConnectedName)
                } else if *got == oid(&OID_BUSY_NAME) {
                    Ok(Operation::BusyName)
                } else {
                    Err(())
                }
            }
            OperationValue::Local(n) => {
                use Operation::*;
                Ok(match n {
                    1 => CallingName,
                    2 => CalledName,
                    3 => ConnectedName,
                    4 => BusyName,
                    5 => ActivationDiversion,
                    6 => DeactivationDiversion,
                    7 => InterrogationDiversion,
                    8 => CallRerouting,
                    9 => DivertingLegInformation1,
                    10 => DivertingLegInformation2,
                    11 => DivertingLegInformation3,
                    12 => ChargeRequest,
                    13 => AocComplete,
                    14 => AocDivChargeReq,
                    15 => CallTransferIdentify,
                    16 => CallTransferInitiate,
                    17 => CallTransferSetup,
                    18 => CallTransferActive,
                    19 => CallTransferComplete,
                    20 => CallTransferUpdate,
                    21 => CcbsRequest,
                    22 => CcnrRequest,
                    23 => CcExecPossible,
                    24 => CcCancel,
                    25 => CcExecPending,
                    26 => MwiActivate,
                    27 => MwiDeactivate,
                    28 => GetFinalCharge,
                    29 => AocFinal,
                    30 => AocInterim,
                    31 => AocRate,
                    32 => CallTransferAbandon,
                    33 => SubaddressTransfer,
                    34 => PathReplacement,
                    35 => ActivateDiversionQ,
                    36 => DeactivateDiversionQ,
                    37 => InterrogateDiversionQ,
                    38 => CheckRestriction,
                    39 => CfnrDivertedLegFailed,
                    40 => CcPathReserve,
                    41 => CcRingout,
                    42 => CcSuspend,
                    43 => CcResume,
                    44 => MwiInterrogate,
                    _ => return Err(()),
                })
            }
        }
    }
}

pub fn operation_to_str(op: Operation) -> &'static str {
    use Operation::*;
    match op {
        CallingName => "callingName",
        CalledName => "calledName",
        ConnectedName => "connectedName",
        BusyName => "busyName",
        ActivationDiversion => "activationDiversion",
        DeactivationDiversion => "deactivationDiversion",
        InterrogationDiversion => "interrogationDiversion",
        CallRerouting => "callRerouting",
        DivertingLegInformation1 => "divertingLegInformation1",
        DivertingLegInformation2 => "divertingLegInformation2",
        DivertingLegInformation3 => "divertingLegInformation3",
        ChargeRequest => "chargeRequest",
        AocComplete => "aocComplete",
        AocDivChargeReq => "aocDivChargeReq",
        CallTransferIdentify => "callTransferIdentify",
        CallTransferInitiate => "callTransferInitiate",
        CallTransferSetup => "callTransferSetup",
        CallTransferActive => "callTransferActive",
        CallTransferComplete => "callTransferComplete",
        CallTransferUpdate => "callTransferUpdate",
        CcbsRequest => "ccbsRequest",
        CcnrRequest => "ccnrRequest",
        CcExecPossible => "ccExecPossible",
        CcCancel => "ccCancel",
        CcExecPending => "ccExecPending",
        MwiActivate => "mwiActivate",
        MwiDeactivate => "mwiDeactivate",
        GetFinalCharge => "getFinalCharge",
        AocFinal => "aocFinal",
        AocInterim => "aocInterim",
        AocRate => "aocRate",
        CallTransferAbandon => "callTransferAbandon",
        SubaddressTransfer => "subaddressTransfer",
        PathReplacement => "pathReplacement",
        ActivateDiversionQ => "activateDiversionQ",
        DeactivateDiversionQ => "deactivateDiversionQ",
        InterrogateDiversionQ => "interrogateDiversionQ",
        CheckRestriction => "checkRestriction",
        CfnrDivertedLegFailed => "cfnrDivertedLegFailed",
        CcPathReserve => "ccPathReserve",
        CcRingout => "ccRingout",
        CcSuspend => "ccSuspend",
        CcResume => "ccResume",
        MwiInterrogate => "mwiInterrogate",
    }
}

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum ErrorCode {
    NotSubscribed = 0,
    NotAvailable = 1,
    NotImplemented = 2,
    InvalidServedUserNr = 3,
    InvalidCallState = 4,
    BasicServiceNotProvided = 5,
    NotIncomingCall = 6,
    SupplementaryServiceInteractionNotAllowed = 7,
    ResourceUnavailable = 8,
    CcSubscriptionViolated = 1004,
    CcAlreadyRequested = 1005,
    ShortTermRejection = 1006,
    LongTermRejection = 1007,
    RemoteUserBusyAgain = 1008,
    FailureToMatch = 1009,
}

impl ErrorCode {
    pub fn try_from(value: i32) -> Result<Self, ()> {
        use ErrorCode::*;
        Ok(match value {
            0 => NotSubscribed,
            1 => NotAvailable,
            2 => NotImplemented,
            3 => InvalidServedUserNr,
            4 => InvalidCallState,
            5 => BasicServiceNotProvided,
            6 => NotIncomingCall,
            7 => SupplementaryServiceInteractionNotAllowed,
            8 => ResourceUnavailable,
            1004 => CcSubscriptionViolated,
            1005 => CcAlreadyRequested,
            1006 => ShortTermRejection,
            1007 => LongTermRejection,
            1008 => RemoteUserBusyAgain,
            1009 => FailureToMatch,
            _ => return Err(()),
        })
    }
}

pub fn error_to_str(code: ErrorCode) -> &'static str {
    use ErrorCode::*;
    match code {
        NotSubscribed => "notSubscribed",
        NotAvailable => "notAvailable",
        NotImplemented => "notImplemented",
        InvalidServedUserNr => "invalidServedUserNr",
        InvalidCallState => "invalidCallState",
        BasicServiceNotProvided => "basicServiceNotProvided",
        NotIncomingCall => "notIncomingCall",
        SupplementaryServiceInteractionNotAllowed => "supplementaryServiceInteractionNotAllowed",
        ResourceUnavailable => "resourceUnavailable",
        CcSubscriptionViolated => "ccSubscriptionViolated",
        CcAlreadyRequested => "ccAlreadyRequested",
        ShortTermRejection => "shortTermRejection",
        LongTermRejection => "longTermRejection",
        RemoteUserBusyAgain => "remoteUserBusyAgain",
        FailureToMatch => "failureToMatch",
    }
}

/// `Name ::= CHOICE { namePresentationAllowed, namePresentationRestricted, nameNotAvailable, namePresentationRestrictedNull }`
///
/// per `roseQsigName`: a presentation indicator, a character set, and up
/// to [`NAME_MAX`] bytes of name data. `Unknown` preserves a syntactically
/// valid but non-canonical encoding (e.g. first-edition local-value
/// framing) byte-exact rather than rejecting it, per the tolerant-decode
/// requirement this type exists to satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Name {
    Allowed(NameData),
    Restricted(NameData),
    NotAvailable,
    RestrictedNull,
    Unknown(Vec<u8>),
}

/// `NameData ::= SEQUENCE { characterSet, nameInCharacterSet }`
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
pub struct NameData {
    pub character_set: u8,
    pub name: OctetString,
}

impl NameData {
    pub fn validate(&self) -> RoseResult<()> {
        if self.name.len() > NAME_MAX {
            Err(RoseError::ValueOutOfRange("Name data"))
        } else {
            Ok(())
        }
    }
}

const TAG_NAME_ALLOWED: u8 = 0;
const TAG_NAME_RESTRICTED: u8 = 1;
const TAG_NAME_NOT_AVAILABLE: u8 = 2;
const TAG_NAME_RESTRICTED_NULL: u8 = 3;

impl Name {
    /// Decodes a `Name` CHOICE value starting at `bytes[0]`, returning the
    /// value and the number of bytes it consumed.
    ///
    /// The canonical forms are the four context-tagged alternatives above;
    /// anything else — the first-edition OID-headed encoding, or a raw
    /// OCTET STRING in an unexpected tag slot, both of which real Q.SIG
    /// equipment is known to emit — decodes into `Name::Unknown`,
    /// preserving the bytes rather than failing (Open Question 1).
    pub fn decode_value(bytes: &[u8]) -> RoseResult<(Self, usize)> {
        let tag = crate::ber::Tag::peek(bytes)?;
        let len = definite_tlv_len(bytes)?;
        let slice = bytes.get(..len).ok_or(RoseError::BufferUnderrun)?;
        let value = match (tag.class, tag.number) {
            (crate::ber::Class::Context, n) if n == u32::from(TAG_NAME_ALLOWED) => {
                let data = decode_retagged_namedata(slice)?;
                data.validate()?;
                Name::Allowed(data)
            }
            (crate::ber::Class::Context, n) if n == u32::from(TAG_NAME_RESTRICTED) => {
                let data = decode_retagged_namedata(slice)?;
                data.validate()?;
                Name::Restricted(data)
            }
            (crate::ber::Class::Context, n) if n == u32::from(TAG_NAME_NOT_AVAILABLE) => {
                Name::NotAvailable
            }
            (crate::ber::Class::Context, n) if n == u32::from(TAG_NAME_RESTRICTED_NULL) => {
                Name::RestrictedNull
            }
            _ => Name::Unknown(slice.to_vec()),
        };
        Ok((value, len))
    }

    /// Encodes a `Name` value. Only the four canonical alternatives are
    /// ever produced on encode, even for a value that was decoded from a
    /// tolerated non-canonical form (`Unknown` round-trips its captured
    /// bytes unchanged, since there is no canonical form to normalize it
    /// to without knowing which non-canonical dialect produced it).
    pub fn encode_value(&self) -> RoseResult<Vec<u8>> {
        match self {
            Name::Allowed(data) => encode_retagged_namedata(TAG_NAME_ALLOWED, data),
            Name::Restricted(data) => encode_retagged_namedata(TAG_NAME_RESTRICTED, data),
            Name::NotAvailable => Ok(vec![0x80 | TAG_NAME_NOT_AVAILABLE, 0x00]),
            Name::RestrictedNull => Ok(vec![0x80 | TAG_NAME_RESTRICTED_NULL, 0x00]),
            Name::Unknown(bytes) => Ok(bytes.clone()),
        }
    }
}

/// Re-tags a `NameData`'s universal SEQUENCE tag (0x30) as context class,
/// constructed, number `tag_num` (implicit tagging only ever replaces the
/// tag octet; length and content are unaffected).
fn encode_retagged_namedata(tag_num: u8, data: &NameData) -> RoseResult<Vec<u8>> {
    let mut bytes = rasn::ber::encode(data)?;
    bytes[0] = 0xA0 | tag_num;
    Ok(bytes)
}

fn decode_retagged_namedata(bytes: &[u8]) -> RoseResult<NameData> {
    let mut universal = bytes.to_vec();
    universal[0] = 0x30;
    Ok(rasn::ber::decode(&universal)?)
}

/// Computes a definite-length TLV's total size without decoding its
/// content. Unlike [`crate::header`]'s analogue this does not resolve
/// indefinite length, since every `Name` sample this crate's dialects
/// emit or tolerate is definite-length.
fn definite_tlv_len(bytes: &[u8]) -> RoseResult<usize> {
    let first = *bytes.first().ok_or(RoseError::BufferUnderrun)?;
    let tag_len = if first & 0x1F != 0x1F {
        1
    } else {
        let mut idx = 1;
        while bytes.get(idx).is_some_and(|b| b & 0x80 != 0) {
            idx += 1;
        }
        idx + 1
    };
    let len_byte = *bytes.get(tag_len).ok_or(RoseError::BufferUnderrun)?;
    if len_byte & 0x80 == 0 {
        Ok(tag_len + 1 + usize::from(len_byte))
    } else {
        let n_octets = usize::from(len_byte & 0x7F);
        if n_octets == 0 {
            return Err(RoseError::MalformedLength);
        }
        let len_bytes = bytes
            .get(tag_len + 1..tag_len + 1 + n_octets)
            .ok_or(RoseError::BufferUnderrun)?;
        let mut content_len: usize = 0;
        for b in len_bytes {
            content_len = content_len
                .checked_shl(8)
                .and_then(|v| v.checked_add(usize::from(*b)))
                .ok_or(RoseError::MalformedLength)?;
        }
        Ok(tag_len + 1 + n_octets + content_len)
    }
}

/// `ChargeRequestArg ::= SEQUENCE { dummy }` / `ChargeRequestRes ::= SEQUENCE { dummy }`
/// carried verbatim per `roseQsigChargeRequestArg_ARG` / `_Res_RES`: the
/// payload is a CHOICE of currency-tagged amounts this crate passes
/// through as raw BER.
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
pub struct ChargeRequestArg {
    pub advice_of_charge: OctetString,
}

#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
pub struct ChargeRequestRes {
    pub advice_of_charge: OctetString,
}

/// `CTIdentifyRes ::= SEQUENCE { callIdentity, reroutingNumber, redirectionInfo OPTIONAL }`
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
pub struct CtIdentifyRes {
    pub call_identity: OctetString,
    pub rerouting_number: crate::address::Address,
}

/// `CallReroutingArg` per `roseQsigCallRerouting_ARG`.
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
pub struct CallReroutingArg {
    pub rerouting_reason: u8,
    pub called_address: crate::address::Address,
    pub diversion_counter: u8,
    pub q931ie: Q931Ie,
    pub last_rerouting: Option<u8>,
    pub subscription_option: u8,
}

impl CallReroutingArg {
    pub fn validate(&self) -> RoseResult<()> {
        self.called_address.validate()?;
        self.q931ie
            .validate_within(crate::address::Q931_MAX_BC + crate::address::Q931_MAX_HLC)
    }
}

/// `CcRequestArg ::= SEQUENCE { numberA, numberB, service OPTIONAL, canRetainService OPTIONAL }`
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
pub struct CcRequestArg {
    pub number_a: crate::address::Address,
    pub number_b: crate::address::Address,
    pub service: Option<u8>,
    pub can_retain_service: Option<bool>,
}

/// `CcRequestRes ::= SEQUENCE { retainService, ccbsPossible OPTIONAL }`
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
pub struct CcRequestRes {
    pub retain_service: bool,
    pub ccbs_possible: Option<bool>,
}

/// `MWIActivateArg` per `roseQsigMWIActivateArg`.
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
pub struct MwiActivateArg {
    pub served_user_nr: crate::address::Address,
    pub basic_service: Option<u8>,
    pub number_of_messages: Option<u8>,
    pub originating_nr: Option<crate::address::Address>,
    pub timestamp: Option<crate::address::GeneralizedTime>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn name_oids_round_trip_through_operation_value() {
        for op in [
            Operation::CallingName,
            Operation::CalledName,
            Operation::ConnectedName,
            Operation::BusyName,
        ] {
            let value = op.value();
            assert_eq!(Operation::try_from(&value), Ok(op));
        }
    }

    #[test]
    fn local_values_round_trip() {
        let value = Operation::CcbsRequest.value();
        assert_eq!(value, OperationValue::Local(21));
    }

    #[test]
    fn name_allowed_round_trips_through_canonical_choice() {
        let name = Name::Allowed(NameData {
            character_set: 1,
            name: OctetString::from_static(b"Alphred"),
        });
        let bytes = name.encode_value().unwrap();
        assert_eq!(bytes[0], 0xA0);
        let (decoded, consumed) = Name::decode_value(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(decoded, name);
    }

    #[test]
    fn name_not_available_and_restricted_null_round_trip() {
        for name in [Name::NotAvailable, Name::RestrictedNull] {
            let bytes = name.encode_value().unwrap();
            let (decoded, consumed) = Name::decode_value(&bytes).unwrap();
            assert_eq!(consumed, bytes.len());
            assert_eq!(decoded, name);
        }
    }

    #[test]
    fn name_decode_rejects_name_data_over_name_max() {
        let oversized = NameData {
            character_set: 1,
            name: OctetString::from(vec![b'A'; NAME_MAX + 1]),
        };
        let mut bytes = rasn::ber::encode(&oversized).unwrap();
        bytes[0] = 0xA0 | TAG_NAME_ALLOWED;
        assert!(matches!(
            Name::decode_value(&bytes),
            Err(RoseError::ValueOutOfRange("Name data"))
        ));
    }

    #[test]
    fn name_tolerates_non_canonical_encodings() {
        // First-edition OID-headed form / a raw OCTET STRING in an
        // unexpected tag slot: neither matches one of the four canonical
        // context tags, so both decode into `Unknown` rather than failing.
        let second_edition_like = [0x04u8, 0x03, b'A', b'l', b'f'];
        let (decoded, consumed) = Name::decode_value(&second_edition_like).unwrap();
        assert_eq!(consumed, second_edition_like.len());
        assert_eq!(decoded, Name::Unknown(second_edition_like.to_vec()));

        // Re-encoding an `Unknown` value reproduces its captured bytes.
        assert_eq!(decoded.encode_value().unwrap(), second_edition_like.to_vec());
    }

    #[test]
    fn name_trailing_bytes_after_the_value_are_not_consumed() {
        let name = Name::RestrictedNull;
        let mut bytes = name.encode_value().unwrap();
        bytes.extend_from_slice(&[0xFF, 0xFF]);
        let (decoded, consumed) = Name::decode_value(&bytes).unwrap();
        assert_eq!(decoded, name);
        assert_eq!(consumed, 2);
    }
}
