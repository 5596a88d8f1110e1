// Chunk: docs/chunks/utf8_normalizer - Canonical UTF-8 normalization of buffer input

//! UTF-8 normalization for every byte sequence entering the buffer.
//!
//! The buffer does all of its length arithmetic on the assumption that its
//! content is canonical UTF-8: every code point stored in its unique minimal
//! encoding. Input is therefore decoded sequence by sequence and re-encoded
//! before it is written.
//!
//! Malformed input never produces an error. Bytes that cannot start a valid
//! sequence are dropped one at a time and decoding resumes at the next byte.
//! A sequence cut off by the end of the input ends the scan.

use std::borrow::Cow;

/// Result of decoding one sequence at the front of a byte slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// A code point and the number of input bytes it occupied.
    Char { ch: char, len: usize },
    /// The leading byte cannot start a sequence here; skip it.
    Invalid,
    /// The lead byte declares more continuation bytes than remain.
    Truncated,
}

/// Returns the sequence length declared by a lead byte, or `None` for
/// continuation bytes and bytes that never appear in UTF-8.
pub fn sequence_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC0..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF7 => Some(4),
        _ => None,
    }
}

/// Returns true for bytes of the form `10xxxxxx`.
#[inline]
pub fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Smallest code point that needs `len` bytes in canonical form.
pub fn min_code_point(len: usize) -> u32 {
    match len {
        1 => 0,
        2 => 0x80,
        3 => 0x800,
        _ => 0x1_0000,
    }
}

/// Decodes the sequence at the front of `input`.
///
/// Overlong sequences are structurally valid and decode to their code point;
/// re-encoding through [`normalize_step`] shortens them. Surrogates and
/// values past U+10FFFF are reported as [`Decoded::Invalid`].
pub fn decode(input: &[u8]) -> Decoded {
    let Some(&lead) = input.first() else {
        return Decoded::Truncated;
    };
    let Some(len) = sequence_len(lead) else {
        return Decoded::Invalid;
    };
    if len == 1 {
        return Decoded::Char {
            ch: char::from(lead),
            len: 1,
        };
    }

    // Continuations must be checked before the length so that a lead byte
    // followed by plain ASCII is skipped instead of ending the scan.
    let available = input.len().min(len);
    if !input[1..available].iter().all(|&b| is_continuation(b)) {
        return Decoded::Invalid;
    }
    if input.len() < len {
        return Decoded::Truncated;
    }

    let lead_bits = u32::from(lead) & (0x7F >> len);
    let code = input[1..len]
        .iter()
        .fold(lead_bits, |acc, &b| (acc << 6) | u32::from(b & 0x3F));

    match char::from_u32(code) {
        Some(ch) => Decoded::Char { ch, len },
        None => Decoded::Invalid,
    }
}

/// Normalizes one sequence from the front of `input` into `out`.
///
/// Returns `(consumed, produced)`. Dropped bytes report `(1, 0)`. The pair
/// `(0, 0)` is returned only when the input is exhausted, either because it
/// is empty or because it ends inside a sequence.
pub fn normalize_step(input: &[u8], out: &mut [u8; 4]) -> (usize, usize) {
    match decode(input) {
        Decoded::Char { ch, len } => (len, ch.encode_utf8(out).len()),
        Decoded::Invalid => (1, 0),
        Decoded::Truncated => (0, 0),
    }
}

/// Normalizes a complete byte span to canonical UTF-8.
///
/// Input that is already canonical is returned borrowed.
pub fn normalize(input: &[u8]) -> Cow<'_, str> {
    // `str` cannot hold overlong forms or surrogates, so a successful
    // conversion is already canonical.
    if let Ok(text) = std::str::from_utf8(input) {
        return Cow::Borrowed(text);
    }

    let mut output = String::with_capacity(input.len());
    let mut scratch = [0u8; 4];
    let mut pos = 0;
    let mut dropped = 0;

    while pos < input.len() {
        let (consumed, produced) = normalize_step(&input[pos..], &mut scratch);
        if consumed == 0 {
            dropped += input.len() - pos;
            break;
        }
        if produced == 0 {
            dropped += consumed;
        } else if let Ok(encoded) = std::str::from_utf8(&scratch[..produced]) {
            output.push_str(encoded);
        }
        pos += consumed;
    }

    if dropped > 0 {
        log::warn!(
            "dropped {} malformed byte(s) while normalizing {} input byte(s)",
            dropped,
            input.len()
        );
    }
    Cow::Owned(output)
}
