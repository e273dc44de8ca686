//! Computation of Oracle `SQL_ID` values from statement text.
//!
//! A `SQL_ID` is the lower 64 bits of an MD5 digest taken over the UTF-8
//! statement text plus a trailing `0x00` byte, rendered as 13 characters of a
//! custom Base32 alphabet. This crate provides the hash engine, the encoder
//! and the [`SqlId`] value type tying them together.

#![warn(missing_docs)]

pub mod base32;
pub mod error;
pub mod md5;
pub mod sql_id;

pub use error::{ParseSqlIdError, SqlIdError};
pub use md5::{fingerprint, fingerprint_utf16, Md5};
pub use sql_id::{compute, compute_utf16, SqlId};
