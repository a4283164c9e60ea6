//! The ROSE component envelope: Invoke, ReturnResult, ReturnError, Reject.
//!
//! Grounded on `rose.h`'s `struct rose_msg_invoke` / `rose_msg_result` /
//! `rose_msg_error` / `rose_msg_reject` and `enum rose_component_type`,
//! and on the ASN.1 productions in the same header's comments:
//!
//! ```text
//! Component ::= CHOICE {
//!     invoke            [1] IMPLICIT Invoke,
//!     returnResult      [2] IMPLICIT ReturnResult,
//!     returnError       [3] IMPLICIT ReturnError,
//!     reject            [4] IMPLICIT Reject }
//! ```
//!
//! Unlike the Z39 PDU layer this crate grew out of, ROSE's component
//! envelope genuinely is an ASN.1 CHOICE, so it is modeled as one
//! directly with `#[rasn(choice)]` rather than hand-rolled tag peeking;
//! `rasn::ber::decode`/`encode` do the dispatch. [`crate::ber::Tag`] is
//! still used where the grammar is *not* a clean CHOICE, such as the
//! Facility IE's optional extension header fields (see `header.rs`).

use rasn::prelude::*;
use rasn::types::Any;
use rasn::AsnType;

use crate::dialect::{Dialect, ErrorCode, OperationCode, OperationValue};
use crate::error::{RoseError, RoseResult};
use crate::reject::RejectProblem;

/// A deferred, not-yet-interpreted argument/result/parameter value.
///
/// ROSE's `argument`, `result`, and `parameter` fields are all `ANY
/// DEFINED BY` the sibling operation or error code: which concrete type
/// they hold can't be known until that sibling field has been read. This
/// wraps `rasn`'s `Any` to capture the raw encoding unchanged, so callers
/// can re-decode it once they know what type to expect.
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
pub struct Opaque(pub Any);

impl Opaque {
    pub fn from_value<T: Encode>(value: &T) -> RoseResult<Self> {
        Ok(Opaque(Any::new(rasn::ber::encode(value)?)))
    }

    pub fn decode_as<T: Decode>(&self) -> RoseResult<T> {
        Ok(rasn::ber::decode(&self.0.contents)?)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0.contents
    }
}

/// `Invoke ::= SEQUENCE { invokeId, linkedId [0] IMPLICIT InvokeIdType OPTIONAL, opcode, argument OPTIONAL }`
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
pub struct InvokeComponent {
    pub invoke_id: i32,
    #[rasn(tag(0))]
    pub linked_id: Option<i32>,
    pub operation: OperationValue,
    pub argument: Option<Opaque>,
}

/// `ReturnResult ::= SEQUENCE { invokeId, result SEQUENCE { opcode, result } OPTIONAL }`
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
pub struct ReturnResultComponent {
    pub invoke_id: i32,
    pub result: Option<ResultData>,
}

#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
pub struct ResultData {
    pub operation: OperationValue,
    pub result: Opaque,
}

/// `ReturnError ::= SEQUENCE { invokeId, errcode, parameter OPTIONAL }`
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
pub struct ReturnErrorComponent {
    pub invoke_id: i32,
    pub error_code: i32,
    pub parameter: Option<Opaque>,
}

/// `Reject ::= SEQUENCE { invokeId InvokeIdType OPTIONAL, problem }`
///
/// `invokeId` is `CHOICE { INTEGER, NULL }`; `None` is the `NULL` form,
/// sent when the invoke ID itself could not be recovered.
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
pub struct RejectComponent {
    pub invoke_id: Option<i32>,
    pub problem: RejectProblem,
}

/// `Component ::= CHOICE { invoke, returnResult, returnError, reject }`
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
#[rasn(choice)]
pub enum Component {
    #[rasn(tag(1))]
    Invoke(InvokeComponent),
    #[rasn(tag(2))]
    ReturnResult(ReturnResultComponent),
    #[rasn(tag(3))]
    ReturnError(ReturnErrorComponent),
    #[rasn(tag(4))]
    Reject(RejectComponent),
}

impl Component {
    pub fn decode(bytes: &[u8]) -> RoseResult<Self> {
        let component: Component = rasn::ber::decode(bytes)?;
        component.validate_invoke_id()?;
        Ok(component)
    }

    pub fn encode(&self) -> RoseResult<Vec<u8>> {
        Ok(rasn::ber::encode(self)?)
    }

    /// `invokeId` is `int16_t` in every `rose_msg_*` struct this crate is
    /// grounded on; a value outside that range cannot have come from a
    /// real encoder and is rejected unconditionally (not subject to
    /// [`crate::config::OverflowPolicy`], which governs capacity bounds on
    /// bounded collections, not wire-format range violations).
    fn validate_invoke_id(&self) -> RoseResult<()> {
        let id = match self {
            Component::Invoke(inv) => Some(inv.invoke_id),
            Component::ReturnResult(res) => Some(res.invoke_id),
            Component::ReturnError(err) => Some(err.invoke_id),
            Component::Reject(rej) => rej.invoke_id,
        };
        if let Some(id) = id {
            if !(i32::from(i16::MIN)..=i32::from(i16::MAX)).contains(&id) {
                return Err(RoseError::ValueOutOfRange("invoke id"));
            }
        }
        Ok(())
    }

    /// Resolves this component's operation/error code against `dialect`,
    /// for callers that want the dialect-specific symbolic code rather
    /// than the raw wire value.
    pub fn operation(&self, dialect: Dialect) -> Option<OperationCode> {
        match self {
            Component::Invoke(inv) => Some(OperationCode::resolve(dialect, inv.operation.clone())),
            Component::ReturnResult(res) => res
                .result
                .as_ref()
                .map(|r| OperationCode::resolve(dialect, r.operation.clone())),
            _ => None,
        }
    }

    pub fn error(&self, dialect: Dialect) -> Option<ErrorCode> {
        match self {
            Component::ReturnError(err) => Some(ErrorCode::resolve(dialect, err.error_code)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn invoke_round_trips_through_ber() {
        let argument = Opaque::from_value(&42i32).unwrap();
        let component = Component::Invoke(InvokeComponent {
            invoke_id: 7,
            linked_id: None,
            operation: OperationValue::Local(8),
            argument: Some(argument),
        });
        let bytes = component.encode().unwrap();
        assert_eq!(bytes[0], 0xA1);
        let back = Component::decode(&bytes).unwrap();
        assert_eq!(component, back);
    }

    #[test]
    fn reject_round_trips_through_ber() {
        let component = Component::Reject(RejectComponent {
            invoke_id: Some(3),
            problem: RejectProblem::Invoke(1),
        });
        let bytes = component.encode().unwrap();
        assert_eq!(bytes[0], 0xA4);
        let back = Component::decode(&bytes).unwrap();
        assert_eq!(component, back);
    }

    #[test]
    fn decode_rejects_invoke_id_outside_int16_range() {
        let component = Component::Invoke(InvokeComponent {
            invoke_id: i32::from(i16::MAX) + 1,
            linked_id: None,
            operation: OperationValue::Local(1),
            argument: None,
        });
        let bytes = rasn::ber::encode(&component).unwrap();
        assert!(matches!(
            Component::decode(&bytes),
            Err(crate::error::RoseError::ValueOutOfRange("invoke id"))
        ));
    }

    #[test]
    fn opaque_argument_redecodes_as_concrete_type() {
        let opaque = Opaque::from_value(&"hello".to_string()).unwrap();
        let back: String = opaque.decode_as().unwrap();
        assert_eq!(back, "hello");
    }
}
