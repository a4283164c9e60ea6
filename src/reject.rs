//! ROSE Reject problem codes.
//!
//! Grounded on `rose.h`'s `enum rose_reject_base` / `enum rose_reject_code`:
//! the "base * 0x100 + offset" scheme there is a compact encoding choice,
//! not anything the wire format demands, so it is modeled here as a
//! `(RejectBase, u8)` pair per the Design Notes rather than carried
//! forward as a single magic integer.
use rasn::prelude::*;
use rasn::AsnType;

/// Which of the four problem-code families a `RejectCode` belongs to.
///
/// The on-wire form is a context-tagged INTEGER; the tag class encodes
/// the base and the integer value encodes the offset within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectBase {
    General,
    Invoke,
    Result,
    Error,
}

/// A problem code: a base plus an offset within that base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RejectCode(pub RejectBase, pub u8);

impl RejectCode {
    pub const GEN_UNRECOGNIZED_COMPONENT: Self = Self(RejectBase::General, 0);
    pub const GEN_MISTYPED_COMPONENT: Self = Self(RejectBase::General, 1);
    pub const GEN_BADLY_STRUCTURED_COMPONENT: Self = Self(RejectBase::General, 2);

    pub const INV_DUPLICATE_INVOCATION: Self = Self(RejectBase::Invoke, 0);
    pub const INV_UNRECOGNIZED_OPERATION: Self = Self(RejectBase::Invoke, 1);
    pub const INV_MISTYPED_ARGUMENT: Self = Self(RejectBase::Invoke, 2);
    pub const INV_RESOURCE_LIMITATION: Self = Self(RejectBase::Invoke, 3);
    pub const INV_INITIATOR_RELEASING: Self = Self(RejectBase::Invoke, 4);
    pub const INV_UNRECOGNIZED_LINKED_ID: Self = Self(RejectBase::Invoke, 5);
    pub const INV_LINKED_RESPONSE_UNEXPECTED: Self = Self(RejectBase::Invoke, 6);
    pub const INV_UNEXPECTED_CHILD_OPERATION: Self = Self(RejectBase::Invoke, 7);

    pub const RES_UNRECOGNIZED_INVOCATION: Self = Self(RejectBase::Result, 0);
    pub const RES_RESULT_RESPONSE_UNEXPECTED: Self = Self(RejectBase::Result, 1);
    pub const RES_MISTYPED_RESULT: Self = Self(RejectBase::Result, 2);

    pub const ERR_UNRECOGNIZED_INVOCATION: Self = Self(RejectBase::Error, 0);
    pub const ERR_ERROR_RESPONSE_UNEXPECTED: Self = Self(RejectBase::Error, 1);
    pub const ERR_UNRECOGNIZED_ERROR: Self = Self(RejectBase::Error, 2);
    pub const ERR_UNEXPECTED_ERROR: Self = Self(RejectBase::Error, 3);
    pub const ERR_MISTYPED_PARAMETER: Self = Self(RejectBase::Error, 4);

    /// Numeric `base * 0x100 + offset` form, computed on demand rather
    /// than stored.
    pub fn numeric(self) -> u32 {
        (self.0 as u32) * 0x100 + u32::from(self.1)
    }

    /// The context tag number identifying this code's base within the
    /// Reject APDU's `problem` CHOICE.
    pub fn context_tag(self) -> u32 {
        self.0 as u32
    }
}

pub fn reject_to_string(code: Option<RejectCode>) -> String {
    let Some(code) = code else {
        return "Not rejected".to_string();
    };
    let label = match code {
        RejectCode::GEN_UNRECOGNIZED_COMPONENT => Some("UnrecognizedComponent"),
        RejectCode::GEN_MISTYPED_COMPONENT => Some("MistypedComponent"),
        RejectCode::GEN_BADLY_STRUCTURED_COMPONENT => Some("BadlyStructuredComponent"),
        RejectCode::INV_DUPLICATE_INVOCATION => Some("DuplicateInvocation"),
        RejectCode::INV_UNRECOGNIZED_OPERATION => Some("UnrecognizedOperation"),
        RejectCode::INV_MISTYPED_ARGUMENT => Some("MistypedArgument"),
        RejectCode::INV_RESOURCE_LIMITATION => Some("ResourceLimitation"),
        RejectCode::INV_INITIATOR_RELEASING => Some("InitiatorReleasing"),
        RejectCode::INV_UNRECOGNIZED_LINKED_ID => Some("UnrecognizedLinkedId"),
        RejectCode::INV_LINKED_RESPONSE_UNEXPECTED => Some("LinkedResponseUnexpected"),
        RejectCode::INV_UNEXPECTED_CHILD_OPERATION => Some("UnexpectedChildOperation"),
        RejectCode::RES_UNRECOGNIZED_INVOCATION => Some("Result_UnrecognizedInvocation"),
        RejectCode::RES_RESULT_RESPONSE_UNEXPECTED => Some("ResultResponseUnexpected"),
        RejectCode::RES_MISTYPED_RESULT => Some("MistypedResult"),
        RejectCode::ERR_UNRECOGNIZED_INVOCATION => Some("Error_UnrecognizedInvocation"),
        RejectCode::ERR_ERROR_RESPONSE_UNEXPECTED => Some("ErrorResponseUnexpected"),
        RejectCode::ERR_UNRECOGNIZED_ERROR => Some("UnrecognizedError"),
        RejectCode::ERR_UNEXPECTED_ERROR => Some("UnexpectedError"),
        RejectCode::ERR_MISTYPED_PARAMETER => Some("MistypedParameter"),
        _ => None,
    };
    match label {
        Some(label) => label.to_string(),
        None => format!("Invalid code: {}", code.numeric()),
    }
}

/// The `problem` CHOICE carried by a Reject APDU: a context-tagged
/// INTEGER whose class identifies the base and whose value is the
/// offset. `rasn`'s choice support can't vary the tag *class* per
/// variant by itself (all four alternatives use context class 0..3
/// here, which it can), so this models the four bases directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsnType, Decode, Encode)]
#[rasn(choice)]
pub enum RejectProblem {
    #[rasn(tag(0))]
    General(u8),
    #[rasn(tag(1))]
    Invoke(u8),
    #[rasn(tag(2))]
    Result(u8),
    #[rasn(tag(3))]
    Error(u8),
}

impl From<RejectCode> for RejectProblem {
    fn from(code: RejectCode) -> Self {
        match code.0 {
            RejectBase::General => RejectProblem::General(code.1),
            RejectBase::Invoke => RejectProblem::Invoke(code.1),
            RejectBase::Result => RejectProblem::Result(code.1),
            RejectBase::Error => RejectProblem::Error(code.1),
        }
    }
}

impl From<RejectProblem> for RejectCode {
    fn from(problem: RejectProblem) -> Self {
        match problem {
            RejectProblem::General(n) => RejectCode(RejectBase::General, n),
            RejectProblem::Invoke(n) => RejectCode(RejectBase::Invoke, n),
            RejectProblem::Result(n) => RejectCode(RejectBase::Result, n),
            RejectProblem::Error(n) => RejectCode(RejectBase::Error, n),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn numeric_matches_base_times_0x100_plus_offset() {
        assert_eq!(RejectCode::INV_INITIATOR_RELEASING.numeric(), 0x104);
    }

    #[test]
    fn problem_round_trips_through_choice() {
        let code = RejectCode::ERR_MISTYPED_PARAMETER;
        let problem: RejectProblem = code.into();
        let back: RejectCode = problem.into();
        assert_eq!(code, back);
    }

    #[test]
    fn labels_every_named_code() {
        for code in [
            RejectCode::GEN_UNRECOGNIZED_COMPONENT,
            RejectCode::INV_INITIATOR_RELEASING,
            RejectCode::RES_MISTYPED_RESULT,
            RejectCode::ERR_UNEXPECTED_ERROR,
        ] {
            assert!(!reject_to_string(Some(code)).starts_with("Invalid code:"));
        }
    }
}
