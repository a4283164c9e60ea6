//! A table-driven sweep over every named operation/error code in every
//! dialect, checking that its wire value round-trips and that its label
//! is never the `Unknown`/fallback form.
//!
//! Grounded on `rosetest.c`'s table-of-fixtures harness, which walks a
//! static array of messages through encode/decode rather than writing one
//! test function per message; this does the analogous sweep over the
//! symbolic code tables in `dialect/`.

#[cfg(test)]
mod test {
    use crate::dialect::{dms100, etsi, ni2, qsig, Dialect, ErrorCode, OperationCode};
    use strum::IntoEnumIterator;

    #[test]
    fn every_etsi_operation_round_trips_and_labels() {
        for op in etsi::Operation::iter() {
            let value = op.value();
            assert_eq!(etsi::Operation::try_from(&value), Ok(op));
            let resolved = OperationCode::resolve(Dialect::Etsi, value);
            assert_eq!(resolved, OperationCode::Etsi(op));
            assert!(!crate::dialect::operation_to_string(&resolved).is_empty());
        }
    }

    #[test]
    fn every_etsi_error_round_trips_and_labels() {
        for code in etsi::ErrorCode::iter() {
            let resolved = ErrorCode::resolve(Dialect::Etsi, code as i32);
            assert_eq!(resolved, ErrorCode::Etsi(code));
            assert!(!crate::dialect::error_to_string(resolved).starts_with("Unknown"));
        }
    }

    #[test]
    fn every_qsig_operation_round_trips_and_labels() {
        for op in qsig::Operation::iter() {
            let value = op.value();
            assert_eq!(qsig::Operation::try_from(&value), Ok(op));
            let resolved = OperationCode::resolve(Dialect::Qsig, value);
            assert_eq!(resolved, OperationCode::Qsig(op));
            assert!(!crate::dialect::operation_to_string(&resolved).is_empty());
        }
    }

    #[test]
    fn every_qsig_error_round_trips_and_labels() {
        for code in qsig::ErrorCode::iter() {
            let resolved = ErrorCode::resolve(Dialect::Qsig, code as i32);
            assert_eq!(resolved, ErrorCode::Qsig(code));
        }
    }

    #[test]
    fn every_dms100_operation_round_trips() {
        for op in dms100::Operation::iter() {
            let value = op.value();
            assert_eq!(dms100::Operation::try_from(&value), Ok(op));
            let resolved = OperationCode::resolve(Dialect::Dms100, value);
            assert_eq!(resolved, OperationCode::Dms100(op));
        }
    }

    #[test]
    fn every_ni2_operation_round_trips() {
        for op in ni2::Operation::iter() {
            let value = op.value();
            assert_eq!(ni2::Operation::try_from(&value), Ok(op));
            let resolved = OperationCode::resolve(Dialect::Ni2, value);
            assert_eq!(resolved, OperationCode::Ni2(op));
        }
    }

    #[test]
    fn ni2_error_codes_always_resolve_to_unknown() {
        for value in [0, 1, 2, 9999] {
            assert_eq!(ErrorCode::resolve(Dialect::Ni2, value), ErrorCode::Unknown(value));
        }
    }
}
