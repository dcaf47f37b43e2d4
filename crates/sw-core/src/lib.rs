//! Core domain values, records, and the repository seam for Secure Weather.

use thiserror::Error;

mod condition;
mod date;
mod primitives;
mod record;
pub mod wire;

pub use condition::Condition;
pub use date::RecordDate;
pub use primitives::{Humidity, Id, Password, Temperature, Username, Wind};
pub use record::{Record, RecordList};

/// Result type for domain construction and lookups.
pub type DomainResult<T> = Result<T, DomainError>;

/// Broad classification of a [`DomainError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The value was readable but falls outside its declared domain.
    Validation,
    /// The value could not be read as the expected shape at all.
    Parse,
}

/// Finer classification for validation failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationKind {
    /// Numeric or temporal value outside its bound.
    OutOfRange,
    /// A value of the wrong primitive kind, such as a string where an integer belongs.
    WrongType,
    /// A string failing its allowed-character, length or policy check.
    PatternMismatch,
    /// A list position outside `[0, len - 1]`.
    IndexOutOfRange,
}

/// Errors returned by domain validation and parsing.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// Returned when a value lies outside its declared bound.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: String,
        min: String,
        max: String,
    },
    /// Returned when a value is not of the expected primitive kind.
    #[error("{field} must be an integer, got {found}")]
    WrongType { field: &'static str, found: String },
    /// Returned when a string fails its pattern or policy.
    #[error("invalid {field}: {reason}")]
    PatternMismatch {
        field: &'static str,
        reason: &'static str,
    },
    /// Returned when a list lookup misses.
    #[error("index {index} is out of range for a list of {len} records")]
    IndexOutOfRange { index: i64, len: usize },
    /// Returned when text cannot be read as the expected shape.
    #[error("cannot read {field} from {input:?}: {reason}")]
    Parse {
        field: &'static str,
        input: String,
        reason: &'static str,
    },
}

impl DomainError {
    /// Classify the error as a validation or a parse failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse { .. } => ErrorKind::Parse,
            _ => ErrorKind::Validation,
        }
    }

    /// The validation sub-kind, or `None` for parse failures.
    pub fn validation_kind(&self) -> Option<ValidationKind> {
        match self {
            Self::OutOfRange { .. } => Some(ValidationKind::OutOfRange),
            Self::WrongType { .. } => Some(ValidationKind::WrongType),
            Self::PatternMismatch { .. } => Some(ValidationKind::PatternMismatch),
            Self::IndexOutOfRange { .. } => Some(ValidationKind::IndexOutOfRange),
            Self::Parse { .. } => None,
        }
    }

    /// `true` for out-of-range, wrong-type, pattern and index failures.
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// `true` when the input could not be read at all.
    pub fn is_parse(&self) -> bool {
        self.kind() == ErrorKind::Parse
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors returned by a [`RecordRepository`].
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The service refused the supplied credentials.
    #[error("login rejected by the record service")]
    Unauthorized,
    /// An authenticated call was made before logging in.
    #[error("not logged in to the record service")]
    NotAuthenticated,
    /// The service answered with a non-success status.
    #[error("record service returned {status}: {body}")]
    Status { status: u16, body: String },
    /// The service could not be reached or the exchange broke off.
    #[error("record service unreachable: {0}")]
    Transport(String),
    /// The service sent a record that fails domain validation.
    #[error("invalid record payload: {0}")]
    InvalidPayload(#[from] DomainError),
}

/// Remote store of weather records, scoped to one authenticated session.
pub trait RecordRepository {
    /// Open a session with the given credentials.
    fn login(&mut self, username: &Username, password: &Password) -> RepositoryResult<()>;
    /// Close the current session.
    fn logout(&mut self) -> RepositoryResult<()>;
    /// Fetch every record visible to the session.
    fn list(&self) -> RepositoryResult<Vec<Record>>;
    /// Store a new record; the service assigns its id.
    fn create(&self, record: &Record) -> RepositoryResult<()>;
    /// Delete a record by its server id.
    fn delete(&self, id: Id) -> RepositoryResult<()>;
}
