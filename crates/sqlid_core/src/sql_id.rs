//! The `SQL_ID` value type and the functions that compute it.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::base32::{self, SQL_ID_LEN};
use crate::error::{ParseSqlIdError, SqlIdError};
use crate::md5;

/// An Oracle `SQL_ID`: 13 ASCII characters from the Base32 alphabet.
///
/// The value is `Copy` and compares equal to its textual form, so
/// `compute("select * from dual") == "a5ks9fhw2v9s1"` holds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SqlId([u8; SQL_ID_LEN]);

impl SqlId {
    /// Encodes a 64-bit fingerprint.
    pub fn from_fingerprint(fingerprint: u64) -> Self {
        Self(base32::encode(fingerprint))
    }

    /// Decodes the 64-bit fingerprint this id was derived from.
    pub fn fingerprint(&self) -> u64 {
        self.0
            .iter()
            .filter_map(|&symbol| base32::symbol_index(char::from(symbol)))
            .fold(0u64, |value, index| (value << 5) | u64::from(index))
    }

    /// The 13 ASCII bytes of this id.
    pub fn as_bytes(&self) -> &[u8; SQL_ID_LEN] {
        &self.0
    }
}

/// Computes the `SQL_ID` of a native statement text.
///
/// `native_sql` must already be in the form the database sees it, e.g. with
/// bind placeholders rewritten by the driver, and must not carry the trailing
/// `0x00` byte.
pub fn compute(native_sql: &str) -> SqlId {
    SqlId::from_fingerprint(md5::fingerprint(native_sql))
}

/// Computes the `SQL_ID` of a statement given as UTF-16 code units.
pub fn compute_utf16(native_sql: &[u16]) -> Result<SqlId, SqlIdError> {
    md5::fingerprint_utf16(native_sql).map(SqlId::from_fingerprint)
}

impl fmt::Display for SqlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &symbol in &self.0 {
            f.write_char(char::from(symbol))?;
        }
        Ok(())
    }
}

impl fmt::Debug for SqlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SqlId(\"{self}\")")
    }
}

impl FromStr for SqlId {
    type Err = ParseSqlIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        base32::decode(s).map(Self::from_fingerprint)
    }
}

impl TryFrom<String> for SqlId {
    type Error = ParseSqlIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SqlId> for String {
    fn from(id: SqlId) -> Self {
        id.to_string()
    }
}

impl PartialEq<str> for SqlId {
    fn eq(&self, other: &str) -> bool {
        self.0.as_slice() == other.as_bytes()
    }
}

impl PartialEq<&str> for SqlId {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<SqlId> for &str {
    fn eq(&self, other: &SqlId) -> bool {
        other == *self
    }
}
