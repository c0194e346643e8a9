use std::fmt::{self, Display, Formatter};
use std::num::ParseIntError;

/// Errors reported while describing a puzzle. Violations found during the
/// search are not errors; they just prune the branch.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Error {
    /// `min_value > max_value`.
    InvalidRange,
    /// The value range needs more bits than a cell domain carries.
    RangeTooWide,
    /// A constraint referenced a cell index at or past the puzzle size.
    CellOutOfBounds(usize),
    /// A tuple or priority list had the wrong number of entries.
    WrongLength { expected: usize, actual: usize },
    /// A constraint was given nothing to work with (no cells, no tuples).
    EmptyConstraint,
    /// A coordinate string could not be parsed.
    MalformedCoordinates(String),
    /// A givens string contained a character other than `1`-`9`, `0` or `.`.
    MalformedGivens(char),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidRange => write!(f, "min_value is greater than max_value"),
            Error::RangeTooWide => write!(f, "value range is too wide for a cell domain"),
            Error::CellOutOfBounds(cell) => write!(f, "cell index {} is out of bounds", cell),
            Error::WrongLength { expected, actual } => {
                write!(f, "expected {} entries, got {}", expected, actual)
            }
            Error::EmptyConstraint => write!(f, "constraint has nothing to constrain"),
            Error::MalformedCoordinates(s) => write!(f, "malformed coordinates: {:?}", s),
            Error::MalformedGivens(ch) => write!(f, "malformed givens character: {:?}", ch),
        }
    }
}

impl std::error::Error for Error {}

impl From<ParseIntError> for Error {
    fn from(_: ParseIntError) -> Self {
        Error::MalformedCoordinates(String::from("bad number"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
