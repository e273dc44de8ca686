//! Base32 encoding of 64-bit fingerprints as used for `SQL_ID`.
//!
//! The alphabet is a custom variant: digits followed by lowercase letters with
//! `e`, `i`, `l` and `o` left out. A fingerprint is treated as the low 64 bits
//! of a 65-bit number and split into 13 groups of 5 bits, most significant
//! group first. The leading group therefore only carries 4 meaningful bits.

use crate::error::ParseSqlIdError;

/// Length of an encoded `SQL_ID` in characters (and bytes).
pub const SQL_ID_LEN: usize = 13;

/// The 32 symbols, indexed by 5-bit group value.
pub const ALPHABET: &[u8; 32] = b"0123456789abcdfghjkmnpqrstuvwxyz";

/// Largest group value the leading character can take.
const MAX_LEADING: u8 = 0b1111;

const GROUP_MASK: u64 = 0b1_1111;

/// Encodes a fingerprint as 13 ASCII bytes.
pub fn encode(value: u64) -> [u8; SQL_ID_LEN] {
    let mut out = [0u8; SQL_ID_LEN];
    for (i, slot) in out.iter_mut().enumerate() {
        let shift = 5 * (SQL_ID_LEN - 1 - i);
        // the mask keeps the index below 32
        *slot = ALPHABET[((value >> shift) & GROUP_MASK) as usize];
    }
    out
}

/// Decodes 13 alphabet characters back into the fingerprint.
pub fn decode(text: &str) -> Result<u64, ParseSqlIdError> {
    let length = text.chars().count();
    if length != SQL_ID_LEN {
        return Err(ParseSqlIdError::Length(length));
    }
    let mut value = 0u64;
    for (position, character) in text.chars().enumerate() {
        let index =
            symbol_index(character).ok_or(ParseSqlIdError::Character { position, character })?;
        if position == 0 && index > MAX_LEADING {
            return Err(ParseSqlIdError::Overflow(character));
        }
        value = (value << 5) | u64::from(index);
    }
    Ok(value)
}

/// Returns the group value of `character`, or `None` if it is not in the alphabet.
pub fn symbol_index(character: char) -> Option<u8> {
    let byte = u8::try_from(character).ok()?;
    ALPHABET
        .iter()
        .position(|&symbol| symbol == byte)
        .and_then(|index| u8::try_from(index).ok())
}
