//! String encoder.
//!
//! Strings are built from raw random bytes. Each draw is classified as a
//! closing quote, an escape, or the lead byte of a UTF-8 sequence whose
//! continuation bytes are then synthesized inside the ranges that keep the
//! sequence well formed (no overlongs, no surrogates, nothing past U+10FFFF).
//! A draw that cannot be used, or does not fit, is simply redrawn, so nothing
//! partial is ever left in the buffer.

use core::ops::RangeInclusive;

use crate::rng::RandomEngine;

/// `""`
pub(crate) const MIN_STRING_SIZE: usize = 2;

const HIGH_SURROGATES: RangeInclusive<u16> = 0xD800..=0xDBFF;
const LOW_SURROGATES: RangeInclusive<u16> = 0xDC00..=0xDFFF;
const CONTINUATION: RangeInclusive<u8> = 0x80..=0xBF;

/// `XXXX`, what follows a `\u` for a scalar value.
const SINGLE_ESCAPE_SIZE: usize = 4;
/// `XXXX\uXXXX`, what follows the first `\u` of a surrogate pair.
const PAIR_ESCAPE_SIZE: usize = 10;

/// Writes a quoted string of at most `min(out.len(), max_size)` bytes.
///
/// Returns the number of bytes written including both quotes, or `0` if not
/// even `""` fits.
pub(crate) fn write_string(out: &mut [u8], rng: &mut RandomEngine, max_size: usize) -> usize {
    let size = out.len().min(max_size);
    if size < MIN_STRING_SIZE {
        return 0;
    }
    // The final byte is held back for the closing quote.
    let (body, _) = out.split_at_mut(size - 1);

    body[0] = b'"';
    let mut pos = 1;
    while pos < body.len() {
        let lead = rng.next_byte();
        match lead {
            b'"' => {
                body[pos] = b'"';
                return pos + 1;
            }
            b'\\' => pos += write_escape(&mut body[pos..], rng),
            _ => pos += write_sequence(&mut body[pos..], lead, rng),
        }
    }
    out[pos] = b'"';
    pos + 1
}

/// Writes `\c` for a simple escape or defers to [`write_codepoint`] for `\u`.
fn write_escape(out: &mut [u8], rng: &mut RandomEngine) -> usize {
    if out.len() < 2 {
        return 0;
    }
    let escaped = rng.next_escape_char();
    let written = if escaped == b'u' {
        match write_codepoint(&mut out[2..], rng) {
            0 => return 0,
            n => 2 + n,
        }
    } else {
        2
    };
    out[0] = b'\\';
    out[1] = escaped;
    written
}

/// Writes the hex part of a `\u` escape: `XXXX` for a scalar value, or
/// `XXXX\uXXXX` when the drawn unit is a surrogate, completed by a partner
/// drawn from the complementary range so the pair is always high then low.
///
/// Returns `0` rather than emit an unpaired surrogate.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn write_codepoint(out: &mut [u8], rng: &mut RandomEngine) -> usize {
    let unit = (rng.next_u64() & 0xFFFF) as u16;
    let draw = |rng: &mut RandomEngine, range: &RangeInclusive<u16>| {
        rng.next_ranged_int(i64::from(*range.start()), i64::from(*range.end())) as u16
    };

    let (high, low) = if HIGH_SURROGATES.contains(&unit) {
        if out.len() < PAIR_ESCAPE_SIZE {
            return 0;
        }
        (unit, draw(rng, &LOW_SURROGATES))
    } else if LOW_SURROGATES.contains(&unit) {
        if out.len() < PAIR_ESCAPE_SIZE {
            return 0;
        }
        (draw(rng, &HIGH_SURROGATES), unit)
    } else {
        if out.len() < SINGLE_ESCAPE_SIZE {
            return 0;
        }
        write_unit(&mut out[..SINGLE_ESCAPE_SIZE], unit, rng);
        return SINGLE_ESCAPE_SIZE;
    };

    write_unit(&mut out[..4], high, rng);
    out[4] = b'\\';
    out[5] = b'u';
    write_unit(&mut out[6..10], low, rng);
    PAIR_ESCAPE_SIZE
}

fn write_unit(out: &mut [u8], unit: u16, rng: &mut RandomEngine) {
    for (i, byte) in out.iter_mut().enumerate() {
        let shift = 12 - 4 * i;
        #[allow(clippy::cast_possible_truncation)]
        let nibble = ((unit >> shift) & 0xF) as u8;
        *byte = rng.hex_digit(nibble);
    }
}

/// Number of bytes in the UTF-8 sequence led by `lead`, or `None` for bytes
/// that cannot start a string character (controls, continuations, overlong
/// and out-of-range leads).
fn sequence_len(lead: u8) -> Option<usize> {
    match lead {
        0x20..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn continuation(rng: &mut RandomEngine, range: RangeInclusive<u8>) -> u8 {
    rng.next_ranged_int(i64::from(*range.start()), i64::from(*range.end())) as u8
}

/// Writes the UTF-8 sequence led by `lead`, or nothing if it does not fit.
fn write_sequence(out: &mut [u8], lead: u8, rng: &mut RandomEngine) -> usize {
    let Some(len) = sequence_len(lead) else {
        return 0;
    };
    if out.len() < len {
        return 0;
    }
    out[0] = lead;
    match len {
        2 => out[1] = continuation(rng, CONTINUATION),
        3 => {
            let first = match lead {
                0xE0 => 0xA0..=0xBF,
                0xED => 0x80..=0x9F,
                _ => CONTINUATION,
            };
            out[1] = continuation(rng, first);
            out[2] = continuation(rng, CONTINUATION);
        }
        4 => {
            let first = match lead {
                0xF0 => 0x90..=0xBF,
                0xF4 => 0x80..=0x8F,
                _ => CONTINUATION,
            };
            out[1] = continuation(rng, first);
            out[2] = continuation(rng, CONTINUATION);
            out[3] = continuation(rng, CONTINUATION);
        }
        _ => {}
    }
    len
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::tests::validate::check_escapes;

    #[rstest]
    #[case(2, 2)]
    #[case(3, 32)]
    #[case(16, 16)]
    #[case(64, 12)]
    #[case(300, 300)]
    fn strings_are_quoted_utf8(#[case] budget: usize, #[case] max_size: usize) {
        let mut rng = RandomEngine::new(budget as u64 ^ 0xABCD);
        let mut out = vec![0u8; budget];
        for _ in 0..500 {
            let n = write_string(&mut out, &mut rng, max_size);
            assert!(n >= MIN_STRING_SIZE);
            assert!(n <= budget.min(max_size));
            let text = &out[..n];
            assert_eq!(text[0], b'"');
            assert_eq!(text[n - 1], b'"');
            let inner = &text[1..n - 1];
            assert!(core::str::from_utf8(inner).is_ok(), "{inner:?}");
            assert!(inner.iter().all(|&b| b >= 0x20));
            check_escapes(inner).unwrap();
        }
    }

    #[test]
    fn string_is_valid_json() {
        let mut rng = RandomEngine::new(99);
        let mut out = [0u8; 128];
        for _ in 0..500 {
            let n = write_string(&mut out, &mut rng, 128);
            let parsed: Result<String, _> = serde_json::from_slice(&out[..n]);
            assert!(parsed.is_ok(), "{:?}", String::from_utf8_lossy(&out[..n]));
        }
    }

    #[test]
    fn one_byte_budget_fails() {
        let mut rng = RandomEngine::new(0);
        assert_eq!(write_string(&mut [0u8; 1], &mut rng, 32), 0);
        assert_eq!(write_string(&mut [0u8; 8], &mut rng, 1), 0);
    }

    #[test]
    fn surrogates_always_come_in_pairs() {
        let mut rng = RandomEngine::new(1234);
        let mut out = [0u8; 10];
        let mut pairs = 0;
        for _ in 0..20_000 {
            match write_codepoint(&mut out, &mut rng) {
                0 => unreachable!("ten bytes always fit"),
                SINGLE_ESCAPE_SIZE => {
                    let hex = core::str::from_utf8(&out[..4]).unwrap();
                    let unit = u16::from_str_radix(hex, 16).unwrap();
                    assert!(!(0xD800..=0xDFFF).contains(&unit));
                }
                PAIR_ESCAPE_SIZE => {
                    pairs += 1;
                    let high = u16::from_str_radix(core::str::from_utf8(&out[..4]).unwrap(), 16);
                    let low = u16::from_str_radix(core::str::from_utf8(&out[6..]).unwrap(), 16);
                    assert!(HIGH_SURROGATES.contains(&high.unwrap()));
                    assert_eq!(&out[4..6], b"\\u");
                    assert!(LOW_SURROGATES.contains(&low.unwrap()));
                }
                n => panic!("unexpected escape length {n}"),
            }
        }
        assert!(pairs > 0);
    }

    #[test]
    fn short_budget_never_splits_a_pair() {
        let mut rng = RandomEngine::new(77);
        let mut out = [0u8; 9];
        for _ in 0..20_000 {
            let n = write_codepoint(&mut out, &mut rng);
            assert!(n == 0 || n == SINGLE_ESCAPE_SIZE);
        }
    }

    #[rstest]
    #[case(0xE0)]
    #[case(0xED)]
    #[case(0xF0)]
    #[case(0xF4)]
    #[case(0xC2)]
    fn boundary_leads_stay_legal(#[case] lead: u8) {
        let mut rng = RandomEngine::new(u64::from(lead));
        let mut out = [0u8; 4];
        for _ in 0..2_000 {
            let n = write_sequence(&mut out, lead, &mut rng);
            assert!(core::str::from_utf8(&out[..n]).is_ok(), "{:X?}", &out[..n]);
        }
    }

    #[test]
    fn unusable_leads_are_rejected() {
        let mut rng = RandomEngine::new(0);
        let mut out = [0u8; 4];
        for lead in [0x00, 0x1F, 0x80, 0xBF, 0xC0, 0xC1, 0xF5, 0xFF] {
            assert_eq!(write_sequence(&mut out, lead, &mut rng), 0);
        }
        assert_eq!(write_sequence(&mut out[..2], 0xE1, &mut rng), 0);
    }
}
