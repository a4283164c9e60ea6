//! Crate-local errors and `rasn` error wrappers.
use std::error;
use std::fmt;

pub type RoseResult<T> = Result<T, RoseError>;

/// Failures a BER decode or encode can produce.
///
/// Every internal step is check-and-return: the first failure aborts the
/// current component's decode or encode and is handed back to the caller.
/// No partial component is ever delivered.
#[derive(Debug)]
pub enum RoseError {
    /// A primitive or constructed length ran past the end of the supplied
    /// input range.
    BufferUnderrun,
    /// On encode, the supplied output buffer was too small.
    BufferOverrun,
    /// The tag at the current position did not match any alternative the
    /// grammar permits here.
    UnexpectedTag,
    /// A length encoding used a reserved form, or an end-of-contents
    /// marker turned up where the grammar does not allow one.
    MalformedLength,
    /// A constrained numeric or string value exceeded its specification
    /// bound (subaddress > 20 octets, currency name > 10 chars, a list
    /// past its array capacity, ...).
    ValueOutOfRange(&'static str),
    /// Wraps a `rasn` BER decode failure not otherwise classified above.
    Decode(rasn::error::DecodeError),
    /// Wraps a `rasn` BER encode failure not otherwise classified above.
    Encode(rasn::error::EncodeError),
}

impl error::Error for RoseError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            Self::Encode(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for RoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferUnderrun => write!(f, "buffer underrun"),
            Self::BufferOverrun => write!(f, "buffer overrun"),
            Self::UnexpectedTag => write!(f, "unexpected tag"),
            Self::MalformedLength => write!(f, "malformed length"),
            Self::ValueOutOfRange(what) => write!(f, "value out of range: {what}"),
            Self::Decode(e) => write!(f, "{e}"),
            Self::Encode(e) => write!(f, "{e}"),
        }
    }
}

impl From<rasn::error::DecodeError> for RoseError {
    fn from(e: rasn::error::DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<rasn::error::EncodeError> for RoseError {
    fn from(e: rasn::error::EncodeError) -> Self {
        Self::Encode(e)
    }
}
