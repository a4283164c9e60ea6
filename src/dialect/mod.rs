//! Per-dialect operation and error code tables.
//!
//! Grounded on `rose.h`'s `enum rose_operation` / `enum rose_error_code`,
//! which lay out one flat C enum shared by all four dialects. Rust lets
//! each dialect own its own enum instead, which is the shape this module
//! builds: a dispatch layer (`OperationCode`, `ErrorCode`) over four
//! dialect-private tables (`etsi`, `qsig`, `dms100`, `ni2`).
//!
//! `rose.h` assigns no operation its wire-level integer value anywhere in
//! the retrieved sources (that table lives in the unretrieved `rose.c`);
//! the `Local` values below are assigned in the same declaration order
//! `rose.h` uses, which is a disclosed simplification, not a transcription
//! of a table this crate had access to.

pub mod dms100;
pub mod etsi;
pub mod ni2;
pub mod qsig;

use rasn::prelude::*;
use rasn::AsnType;

/// Which supplementary-service dialect a Facility IE's components should
/// be interpreted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Etsi,
    Qsig,
    Dms100,
    Ni2,
}

/// `OPERATION-VALUE ::= CHOICE { local INTEGER, global OBJECT IDENTIFIER }`
///
/// Every dialect but Q.SIG uses only `local`; Q.SIG's Name-family
/// operations are invoked by `global` OID in the "second edition"
/// encoding (see `dialect::qsig`).
#[derive(Debug, Clone, PartialEq, Eq, AsnType, Decode, Encode)]
#[rasn(choice)]
pub enum OperationValue {
    Local(i32),
    Global(ObjectIdentifier),
}

/// A decoded operation code, resolved against the dialect a message is
/// being interpreted under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationCode {
    Etsi(etsi::Operation),
    Qsig(qsig::Operation),
    Dms100(dms100::Operation),
    Ni2(ni2::Operation),
    /// A syntactically valid operation value this dialect does not name.
    Unknown(OperationValue),
}

impl OperationCode {
    pub fn resolve(dialect: Dialect, value: OperationValue) -> Self {
        match dialect {
            Dialect::Etsi => etsi::Operation::try_from(&value)
                .map(OperationCode::Etsi)
                .unwrap_or(OperationCode::Unknown(value)),
            Dialect::Qsig => qsig::Operation::try_from(&value)
                .map(OperationCode::Qsig)
                .unwrap_or(OperationCode::Unknown(value)),
            Dialect::Dms100 => dms100::Operation::try_from(&value)
                .map(OperationCode::Dms100)
                .unwrap_or(OperationCode::Unknown(value)),
            Dialect::Ni2 => ni2::Operation::try_from(&value)
                .map(OperationCode::Ni2)
                .unwrap_or(OperationCode::Unknown(value)),
        }
    }

    pub fn value(&self) -> OperationValue {
        match self {
            OperationCode::Etsi(op) => op.value(),
            OperationCode::Qsig(op) => op.value(),
            OperationCode::Dms100(op) => op.value(),
            OperationCode::Ni2(op) => op.value(),
            OperationCode::Unknown(v) => v.clone(),
        }
    }
}

/// A decoded error code, resolved against the dialect a message is being
/// interpreted under. NI2 has no error catalogue in the source this crate
/// is grounded on, so `Ni2` carries no inner variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Etsi(etsi::ErrorCode),
    Qsig(qsig::ErrorCode),
    Dms100(dms100::ErrorCode),
    Unknown(i32),
}

impl ErrorCode {
    pub fn resolve(dialect: Dialect, value: i32) -> Self {
        match dialect {
            Dialect::Etsi => etsi::ErrorCode::try_from(value)
                .map(ErrorCode::Etsi)
                .unwrap_or(ErrorCode::Unknown(value)),
            Dialect::Qsig => qsig::ErrorCode::try_from(value)
                .map(ErrorCode::Qsig)
                .unwrap_or(ErrorCode::Unknown(value)),
            Dialect::Dms100 => dms100::ErrorCode::try_from(value)
                .map(ErrorCode::Dms100)
                .unwrap_or(ErrorCode::Unknown(value)),
            Dialect::Ni2 => ErrorCode::Unknown(value),
        }
    }

    pub fn value(self) -> i32 {
        match self {
            ErrorCode::Etsi(e) => e as i32,
            ErrorCode::Qsig(e) => e as i32,
            ErrorCode::Dms100(e) => e as i32,
            ErrorCode::Unknown(v) => v,
        }
    }
}

pub fn operation_to_string(code: &OperationCode) -> String {
    match code {
        OperationCode::Etsi(op) => etsi::operation_to_str(*op).to_string(),
        OperationCode::Qsig(op) => qsig::operation_to_str(*op).to_string(),
        OperationCode::Dms100(op) => dms100::operation_to_str(*op).to_string(),
        OperationCode::Ni2(op) => ni2::operation_to_str(*op).to_string(),
        OperationCode::Unknown(OperationValue::Local(n)) => format!("Invalid code: {n}"),
        OperationCode::Unknown(OperationValue::Global(oid)) => format!("Invalid code: {oid}"),
    }
}

pub fn error_to_string(code: ErrorCode) -> String {
    match code {
        ErrorCode::Etsi(e) => etsi::error_to_str(e).to_string(),
        ErrorCode::Qsig(e) => qsig::error_to_str(e).to_string(),
        ErrorCode::Dms100(e) => dms100::error_to_str(e).to_string(),
        ErrorCode::Unknown(n) => format!("Invalid code: {n}"),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unresolved_local_value_becomes_unknown() {
        let value = OperationValue::Local(9999);
        let resolved = OperationCode::resolve(Dialect::Etsi, value.clone());
        assert_eq!(resolved, OperationCode::Unknown(value));
    }

    #[test]
    fn ni2_has_no_error_catalogue() {
        assert_eq!(ErrorCode::resolve(Dialect::Ni2, 3), ErrorCode::Unknown(3));
    }
}
