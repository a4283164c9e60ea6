//! Northern Telecom DMS-100 RLT (Release Link Trunk) operations.
//!
//! Grounded on `rose.h`'s `struct roseDms100RLTOperationInd_RES` /
//! `RLTThirdParty_ARG` and the DMS-100 entries of `enum rose_operation`.
//! DMS-100 defines no `enum rose_error_code` entries of its own in the
//! retrieved source; `ErrorCode` exists only so dialect dispatch has a
//! type to resolve into, and is never populated in practice.

use rasn::prelude::*;
use rasn::AsnType;
use strum_macros::EnumIter;

use crate::dialect::OperationValue;

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Operation {
    RltOperationInd = 1,
    RltThirdParty = 2,
}

impl Operation {
    pub fn value(self) -> OperationValue {
        OperationValue::Local(self as i32)
    }

    pub fn try_from(value: &OperationValue) -> Result<Self, ()> {
        let OperationValue::Local(n) = value else {
            return Err(());
        };
        match n {
            1 => Ok(Operation::RltOperationInd),
            2 => Ok(Operation::RltThirdParty),
            _ => Err(()),
        }
    }
}

pub fn operation_to_str(op: Operation) -> &'static str {
    match op {
        Operation::RltOperationInd => "rltOperationInd",
        Operation::RltThirdParty => "rltThirdParty",
    }
}

/// `RltOperationInd` invokes are always sent with this fixed invoke ID,
/// per the `rose.h` comment above `struct roseDms100RLTOperationInd_RES`
/// ("Must set invokeId to ROSE_DMS100_RLT_OPERATION_IND").
pub const RLT_OPERATION_IND_INVOKE_ID: u8 = 1;
/// Fixed invoke ID for `RltThirdParty`, by the same convention.
pub const RLT_THIRD_PARTY_INVOKE_ID: u8 = 2;

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum ErrorCode {
    Unsupported = 0,
}

impl ErrorCode {
    pub fn try_from(value: i32) -> Result<Self, ()> {
        match value {
            0 => Ok(ErrorCode::Unsupported),
            _ => Err(()),
        }
    }
}

pub fn error_to_str(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::Unsupported => "unsupported",
    }
}

/// `RLTOperationInd_RES ::= SEQUENCE { rlt_call_id, shared_info OPTIONAL }`
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
pub struct RltOperationIndRes {
    pub rlt_call_id: u32,
}

/// `RLTThirdParty_ARG ::= SEQUENCE { rlt_call_id, reason }`
///
/// Always carried with the fixed invoke ID
/// [`RLT_THIRD_PARTY_INVOKE_ID`], per the same `rose.h` convention as
/// `RltOperationInd`.
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
pub struct RltThirdPartyArg {
    pub rlt_call_id: u32,
    pub reason: u8,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn operation_values_round_trip() {
        for op in [Operation::RltOperationInd, Operation::RltThirdParty] {
            assert_eq!(Operation::try_from(&op.value()), Ok(op));
        }
    }
}
