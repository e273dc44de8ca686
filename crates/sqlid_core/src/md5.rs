//! MD5 hash engine for `SQL_ID` fingerprints.
//!
//! Oracle hashes the UTF-8 statement text followed by a single `0x00` byte
//! with plain MD5 (RFC 1321) and keeps bytes 8 to 15 of the digest. The
//! engine has one compression function fed by two producers:
//!
//! - the packed producer reads sixteen words straight out of the input while
//!   a full 64-unit chunk is available and every unit in it is ASCII, so each
//!   code unit is exactly one UTF-8 byte;
//! - the buffered producer UTF-8 encodes the remaining characters into the
//!   64-byte staging buffer of [`Md5`], which also carries the terminator,
//!   the padding and the length field.
//!
//! Both producers go through [`compress`], so they cannot disagree on the
//! round logic.

use crate::error::SqlIdError;

/// Size of one MD5 chunk in bytes.
pub const CHUNK_LEN: usize = 64;

/// Byte appended to the statement text before padding.
pub const TERMINATOR: u8 = 0x00;

/// Offset in the final chunk where the 64-bit length field starts.
const LENGTH_OFFSET: usize = CHUNK_LEN - 8;

const INITIAL_STATE: [u32; 4] = [0x6745_2301, 0xefcd_ab89, 0x98ba_dcfe, 0x1032_5476];

/// Per-round left rotation amounts.
const SHIFTS: [u32; 64] = [
    7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, //
    5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20, //
    4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, //
    6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21,
];

/// `floor(2^32 * |sin(i + 1)|)` for each round.
const SINES: [u32; 64] = [
    0xd76a_a478, 0xe8c7_b756, 0x2420_70db, 0xc1bd_ceee, 0xf57c_0faf, 0x4787_c62a, 0xa830_4613,
    0xfd46_9501, 0x6980_98d8, 0x8b44_f7af, 0xffff_5bb1, 0x895c_d7be, 0x6b90_1122, 0xfd98_7193,
    0xa679_438e, 0x49b4_0821, 0xf61e_2562, 0xc040_b340, 0x265e_5a51, 0xe9b6_c7aa, 0xd62f_105d,
    0x0244_1453, 0xd8a1_e681, 0xe7d3_fbc8, 0x21e1_cde6, 0xc337_07d6, 0xf4d5_0d87, 0x455a_14ed,
    0xa9e3_e905, 0xfcef_a3f8, 0x676f_02d9, 0x8d2a_4c8a, 0xfffa_3942, 0x8771_f681, 0x6d9d_6122,
    0xfde5_380c, 0xa4be_ea44, 0x4bde_cfa9, 0xf6bb_4b60, 0xbebf_bc70, 0x289b_7ec6, 0xeaa1_27fa,
    0xd4ef_3085, 0x0488_1d05, 0xd9d4_d039, 0xe6db_99e5, 0x1fa2_7cf8, 0xc4ac_5665, 0xf429_2244,
    0x432a_ff97, 0xab94_23a7, 0xfc93_a039, 0x655b_59c3, 0x8f0c_cc92, 0xffef_f47d, 0x8584_5dd1,
    0x6fa8_7e4f, 0xfe2c_e6e0, 0xa301_4314, 0x4e08_11a1, 0xf753_7e82, 0xbd3a_f235, 0x2ad7_d2bb,
    0xeb86_d391,
];

/// Supplies the sixteen little-endian message words of one chunk.
trait WordSource {
    fn word(&self, index: usize) -> u32;
}

impl WordSource for [u8; CHUNK_LEN] {
    #[inline]
    fn word(&self, index: usize) -> u32 {
        let base = index * 4;
        u32::from_le_bytes([self[base], self[base + 1], self[base + 2], self[base + 3]])
    }
}

/// A full chunk of single-byte code units read in place, one byte per unit.
struct PackedUnits<'a, U> {
    units: &'a [U],
}

impl<U: Copy + Into<u32>> WordSource for PackedUnits<'_, U> {
    #[inline]
    fn word(&self, index: usize) -> u32 {
        let base = index * 4;
        let byte = |offset: usize| -> u32 { self.units[base + offset].into() };
        byte(0) | (byte(1) << 8) | (byte(2) << 16) | (byte(3) << 24)
    }
}

/// The MD5 compression function: folds one chunk into `state`.
fn compress<W: WordSource + ?Sized>(state: &mut [u32; 4], words: &W) {
    let [mut a, mut b, mut c, mut d] = *state;
    for round in 0..64 {
        let (mixed, index) = match round / 16 {
            0 => ((b & c) | (!b & d), round),
            1 => ((d & b) | (!d & c), (5 * round + 1) % 16),
            2 => (b ^ c ^ d, (3 * round + 5) % 16),
            _ => (c ^ (b | !d), (7 * round) % 16),
        };
        let rotated = a
            .wrapping_add(mixed)
            .wrapping_add(SINES[round])
            .wrapping_add(words.word(index))
            .rotate_left(SHIFTS[round]);
        a = d;
        d = c;
        c = b;
        b = b.wrapping_add(rotated);
    }
    state[0] = state[0].wrapping_add(a);
    state[1] = state[1].wrapping_add(b);
    state[2] = state[2].wrapping_add(c);
    state[3] = state[3].wrapping_add(d);
}

/// Streaming MD5 digest state.
///
/// Bytes are staged in a 64-byte buffer that is compressed as soon as it is
/// full, so the fill position always stays below 64 between calls.
#[derive(Clone)]
pub struct Md5 {
    state: [u32; 4],
    buffer: [u8; CHUNK_LEN],
    fill: usize,
    /// Message bytes absorbed so far, excluding padding.
    length: u64,
}

impl Default for Md5 {
    fn default() -> Self {
        Self::new()
    }
}

impl Md5 {
    /// Creates a digest in the RFC 1321 initial state.
    pub fn new() -> Self {
        Self {
            state: INITIAL_STATE,
            buffer: [0; CHUNK_LEN],
            fill: 0,
            length: 0,
        }
    }

    /// Appends one message byte.
    pub fn update_byte(&mut self, byte: u8) {
        self.push(byte);
        self.length = self.length.wrapping_add(1);
    }

    /// Appends message bytes through the staging buffer.
    pub fn update(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.update_byte(byte);
        }
    }

    /// Applies standard padding and returns the 16 digest bytes.
    pub fn finish(self) -> [u8; 16] {
        let state = self.finish_state();
        let mut out = [0u8; 16];
        for (chunk, word) in out.chunks_exact_mut(4).zip(state) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        out
    }

    /// Absorbs leading full chunks of `units` that are entirely ASCII without
    /// copying them, and returns how many units were consumed.
    ///
    /// Stops at the first chunk holding a unit of `0x80` or above, and never
    /// looks at a trailing partial chunk.
    fn absorb_ascii_chunks<U: Copy + Into<u32>>(&mut self, units: &[U]) -> usize {
        debug_assert_eq!(self.fill, 0, "packed chunks need an empty buffer");
        let mut consumed = 0;
        for chunk in units.chunks_exact(CHUNK_LEN) {
            if !chunk.iter().all(|&unit| Into::<u32>::into(unit) < 0x80) {
                break;
            }
            compress(&mut self.state, &PackedUnits { units: chunk });
            self.length = self.length.wrapping_add(CHUNK_LEN as u64);
            consumed += CHUNK_LEN;
        }
        consumed
    }

    /// Stages a byte without counting it as message length.
    fn push(&mut self, byte: u8) {
        self.buffer[self.fill] = byte;
        self.fill += 1;
        if self.fill == CHUNK_LEN {
            compress(&mut self.state, &self.buffer);
            self.fill = 0;
        }
    }

    fn finish_state(mut self) -> [u32; 4] {
        let bit_length = self.length.wrapping_mul(8);
        self.push(0x80);
        // wraps into an extra all-padding chunk when fewer than 8 bytes are left
        while self.fill != LENGTH_OFFSET {
            self.push(0);
        }
        for byte in bit_length.to_le_bytes() {
            self.push(byte);
        }
        self.state
    }

    /// Appends the terminator, pads, and keeps digest bytes 8..16.
    ///
    /// The high half is digest word C, the low half word D, each assembled
    /// little-endian from its four digest bytes.
    fn finish_fingerprint(mut self) -> u64 {
        self.update_byte(TERMINATOR);
        let [_, _, c, d] = self.finish_state();
        (u64::from(c) << 32) | u64::from(d)
    }
}

/// Computes the fingerprint of UTF-8 text.
pub fn fingerprint(text: &str) -> u64 {
    let bytes = text.as_bytes();
    let mut digest = Md5::new();
    let consumed = digest.absorb_ascii_chunks(bytes);
    digest.update(&bytes[consumed..]);
    digest.finish_fingerprint()
}

/// Computes the fingerprint of UTF-16 text.
///
/// A lone surrogate is rejected before any chunk is compressed.
pub fn fingerprint_utf16(units: &[u16]) -> Result<u64, SqlIdError> {
    validate_utf16(units)?;
    let mut digest = Md5::new();
    let consumed = digest.absorb_ascii_chunks(units);
    let mut encoded = [0u8; 4];
    for decoded in char::decode_utf16(units[consumed..].iter().copied()) {
        // validated above
        let character = decoded.unwrap_or(char::REPLACEMENT_CHARACTER);
        digest.update(character.encode_utf8(&mut encoded).as_bytes());
    }
    Ok(digest.finish_fingerprint())
}

/// Computes the fingerprint of UTF-8 text with every byte going through the
/// staging buffer. Produces the same value as [`fingerprint`].
pub fn fingerprint_generic(text: &str) -> u64 {
    let mut digest = Md5::new();
    digest.update(text.as_bytes());
    digest.finish_fingerprint()
}

/// Checks that every surrogate in `units` belongs to a high/low pair.
pub fn validate_utf16(units: &[u16]) -> Result<(), SqlIdError> {
    let mut index = 0;
    for decoded in char::decode_utf16(units.iter().copied()) {
        match decoded {
            Ok(character) => index += character.len_utf16(),
            Err(err) => {
                return Err(SqlIdError::LoneSurrogate {
                    index,
                    unit: err.unpaired_surrogate(),
                })
            }
        }
    }
    Ok(())
}
