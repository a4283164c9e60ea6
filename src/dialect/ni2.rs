//! National ISDN-2 (NI-2) supplementary-service operations.
//!
//! Grounded on `rose.h`'s `roseNi2InformationFollowing_ARG` /
//! `InitiateTransfer_ARG` and the NI-2 entries of `enum rose_operation`.
//! NI-2 defines no error catalogue in the retrieved source; dialect
//! dispatch always resolves its errors to [`crate::dialect::ErrorCode::Unknown`].

use rasn::prelude::*;
use rasn::AsnType;
use strum_macros::EnumIter;

use crate::dialect::OperationValue;

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Operation {
    InformationFollowing = 1,
    InitiateTransfer = 2,
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
            1 => Ok(Operation::InformationFollowing),
            2 => Ok(Operation::InitiateTransfer),
            _ => Err(()),
        }
    }
}

pub fn operation_to_str(op: Operation) -> &'static str {
    match op {
        Operation::InformationFollowing => "informationFollowing",
        Operation::InitiateTransfer => "initiateTransfer",
    }
}

/// `InformationFollowingArg ::= SEQUENCE { informationFollowing }`
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
pub struct InformationFollowingArg {
    pub information_following: bool,
}

/// `InitiateTransferArg ::= SEQUENCE { callId, transferTo Address }`
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
pub struct InitiateTransferArg {
    pub call_id: u32,
    pub transfer_to: crate::address::Address,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn operation_values_round_trip() {
        for op in [Operation::InformationFollowing, Operation::InitiateTransfer] {
            assert_eq!(Operation::try_from(&op.value()), Ok(op));
        }
    }
}
