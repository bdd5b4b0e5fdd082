use crate::datatype::DataType;
use std::fmt;

/// Physical segment encodings.
///
/// Opaque labels at the plan layer; the storage layer gives them meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EncodingType {
    Unencoded,
    Dictionary,
    RunLength,
    FrameOfReference,
    Lz4,
    FixedStringDictionary,
}

impl EncodingType {
    /// Whether the storage layer can encode columns of the given data type
    /// with this encoding.
    pub const fn supports(&self, datatype: DataType) -> bool {
        match self {
            Self::FrameOfReference => matches!(datatype, DataType::Int),
            Self::FixedStringDictionary => matches!(datatype, DataType::String),
            _ => true,
        }
    }
}

impl fmt::Display for EncodingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unencoded => write!(f, "Unencoded"),
            Self::Dictionary => write!(f, "Dictionary"),
            Self::RunLength => write!(f, "RunLength"),
            Self::FrameOfReference => write!(f, "FrameOfReference"),
            Self::Lz4 => write!(f, "LZ4"),
            Self::FixedStringDictionary => write!(f, "FixedStringDictionary"),
        }
    }
}
