//! Error types for `SQL_ID` computation and parsing.

/// Errors raised while computing a `SQL_ID` from UTF-16 input.
///
/// `&str` input can never fail; only the UTF-16 entry points report errors,
/// and they do so before any digest state is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SqlIdError {
    /// A surrogate code unit that is not part of a high/low pair.
    #[error("unpaired surrogate 0x{unit:04X} at code unit {index}")]
    LoneSurrogate {
        /// Position of the offending code unit in the input.
        index: usize,
        /// The offending code unit.
        unit: u16,
    },
}

/// Errors raised when parsing text as a [`SqlId`](crate::SqlId).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseSqlIdError {
    /// The text is not exactly 13 characters long.
    #[error("SQL_ID must be 13 characters, got {0}")]
    Length(usize),

    /// A character outside the `SQL_ID` alphabet.
    #[error("invalid SQL_ID character '{character}' at position {position}")]
    Character {
        /// Zero-based character position.
        position: usize,
        /// The rejected character.
        character: char,
    },

    /// The leading character encodes bits beyond the 64-bit range.
    #[error("SQL_ID leading character '{0}' is out of range")]
    Overflow(char),
}
