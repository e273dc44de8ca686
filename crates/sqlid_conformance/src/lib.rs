//! Conformance test helpers for `SQL_ID` computation.
//!
//! Holds the reference statements with their known `SQL_ID` values and
//! helpers that run one statement through every hashing path so integration
//! tests can assert the paths agree.

#![warn(missing_docs)]

use sqlid_core::{md5, SqlId, SqlIdError};

/// A statement and the `SQL_ID` the database reports for it.
#[derive(Debug, Clone, Copy)]
pub struct Vector {
    /// Native statement text.
    pub sql: &'static str,
    /// Expected `SQL_ID`.
    pub sql_id: &'static str,
}

/// Statements with `SQL_ID` values observed on a live database.
pub const VECTORS: &[Vector] = &[
    Vector {
        sql: "SELECT * from dual where dummy = :1 ",
        sql_id: "71hmmykrsa7wp",
    },
    Vector {
        sql: "select * from dual",
        sql_id: "a5ks9fhw2v9s1",
    },
    Vector {
        sql: "SELECT /* \u{00E4} */ * from dual where dummy = :1",
        sql_id: "512k73hwcpwcx",
    },
    Vector {
        sql: "SELECT /* \u{AC00} */ * from dual where dummy = :1",
        sql_id: "bf0zf45zzqrn9",
    },
    Vector {
        sql: "SELECT /* \u{1F47D} */ * from dual where dummy = :1",
        sql_id: "0n6qcat2kzuy0",
    },
];

/// Fingerprints of one statement computed through each hashing path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResults {
    /// Packed fast path over UTF-8.
    pub fast: u64,
    /// Byte-at-a-time staging path over UTF-8.
    pub generic: u64,
    /// Packed fast path over UTF-16.
    pub utf16: Result<u64, SqlIdError>,
}

impl PathResults {
    /// Whether every path produced the same fingerprint.
    pub fn agree(&self) -> bool {
        self.fast == self.generic && self.utf16 == Ok(self.fast)
    }
}

/// Runs `sql` through every hashing path.
pub fn all_paths(sql: &str) -> PathResults {
    let units: Vec<u16> = sql.encode_utf16().collect();
    PathResults {
        fast: md5::fingerprint(sql),
        generic: md5::fingerprint_generic(sql),
        utf16: md5::fingerprint_utf16(&units),
    }
}

/// The `SQL_ID` of a statement through the byte-at-a-time path.
pub fn generic_sql_id(sql: &str) -> SqlId {
    SqlId::from_fingerprint(md5::fingerprint_generic(sql))
}

/// The first `len` code points starting at U+0000, as a string.
pub fn ascii_prefix(len: u8) -> String {
    (0..len).map(char::from).collect()
}
