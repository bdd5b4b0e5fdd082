use std::error::Error;
use std::fmt;

/// Broad classification of an error.
///
/// Most call sites only care about the message, but the plan layer's
/// contracts distinguish a handful of failure classes that callers are
/// expected to match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A structural contract was broken (e.g. a required input is missing).
    InvariantViolation,
    /// An expression combines data types outside the compatibility matrix.
    IncompatibleTypes,
    /// A column reference points at a node that cannot be resolved.
    UnknownColumn,
    /// Functionality that's known and deliberately unimplemented.
    NotImplemented,
    /// Catch-all.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvariantViolation => write!(f, "invariant violation"),
            Self::IncompatibleTypes => write!(f, "incompatible types"),
            Self::UnknownColumn => write!(f, "unknown column"),
            Self::NotImplemented => write!(f, "not implemented"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[derive(Debug)]
pub struct TesseraError {
    kind: ErrorKind,
    msg: String,
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl TesseraError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Internal, msg)
    }

    pub fn with_kind(kind: ErrorKind, msg: impl Into<String>) -> Self {
        TesseraError {
            kind,
            msg: msg.into(),
            source: None,
        }
    }

    pub fn invariant_violation(msg: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::InvariantViolation, msg)
    }

    pub fn incompatible_types(msg: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::IncompatibleTypes, msg)
    }

    pub fn unknown_column(msg: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::UnknownColumn, msg)
    }

    pub fn not_implemented(msg: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::NotImplemented, msg)
    }

    pub fn with_source(mut self, source: impl Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for TesseraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg)
    }
}

impl Error for TesseraError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn Error + 'static))
    }
}

pub type Result<T, E = TesseraError> = std::result::Result<T, E>;

/// Return early with a `NotImplemented` error.
#[macro_export]
macro_rules! not_implemented {
    ($($arg:tt)*) => {{
        return Err($crate::TesseraError::not_implemented(format!($($arg)*)));
    }};
}

pub trait ResultExt<T> {
    /// Wrap an error with a static context message.
    fn context(self, msg: &'static str) -> Result<T>;

    /// Wrap an error with a lazily produced context message.
    fn context_fn<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Error + Send + Sync + 'static,
{
    fn context(self, msg: &'static str) -> Result<T> {
        self.map_err(|e| TesseraError::new(msg).with_source(e))
    }

    fn context_fn<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| TesseraError::new(f()).with_source(e))
    }
}

pub trait OptionExt<T> {
    /// Unwrap an option, erroring with the name of the missing field.
    fn required(self, field: &'static str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn required(self, field: &'static str) -> Result<T> {
        match self {
            Some(v) => Ok(v),
            None => Err(TesseraError::new(format!("missing field: {field}"))),
        }
    }
}
