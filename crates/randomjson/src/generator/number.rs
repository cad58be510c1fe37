//! Number encoder.
//!
//! Every number is produced by truncating a longer random rendering to the
//! byte budget, so the cut points are chosen to keep the result a legal JSON
//! number: never a lone `-`, never a `.` without a digit on both sides, and
//! never an exponent marker without a digit after it.

use crate::rng::RandomEngine;

/// `d.d` or `dEd`.
const MIN_FLOAT_SIZE: usize = 3;
/// `e` or `E` followed by one digit.
const MIN_EXPONENT_SIZE: usize = 2;

/// Decimal rendering of a `u64` without allocating.
struct Digits {
    buf: [u8; 20],
    start: usize,
}

impl Digits {
    #[allow(clippy::cast_possible_truncation)]
    fn new(mut value: u64) -> Self {
        let mut buf = [0u8; 20];
        let mut start = buf.len();
        loop {
            start -= 1;
            buf[start] = b'0' + (value % 10) as u8;
            value /= 10;
            if value == 0 {
                break;
            }
        }
        Self { buf, start }
    }

    fn as_bytes(&self) -> &[u8] {
        &self.buf[self.start..]
    }
}

/// Copies as much of `src` as fits and returns the number of bytes copied.
fn copy_truncated(out: &mut [u8], src: &[u8]) -> usize {
    let len = src.len().min(out.len());
    out[..len].copy_from_slice(&src[..len]);
    len
}

/// Writes a random integer or float into `out`, whose length is the budget.
///
/// Returns the number of bytes written, or `0` when the chosen form does not
/// fit.
pub(crate) fn write_number(out: &mut [u8], rng: &mut RandomEngine, max_exponent: u32) -> usize {
    if out.is_empty() {
        return 0;
    }
    if rng.next_bool() {
        write_integer(out, rng)
    } else {
        write_float(out, rng, max_exponent)
    }
}

#[allow(clippy::cast_possible_wrap)]
fn write_integer(out: &mut [u8], rng: &mut RandomEngine) -> usize {
    let value = rng.next_u64() as i64;
    let magnitude = Digits::new(value.unsigned_abs());
    // With a single byte the sign would be all that fits, so drop it.
    if value < 0 && out.len() > 1 {
        out[0] = b'-';
        return 1 + copy_truncated(&mut out[1..], magnitude.as_bytes());
    }
    copy_truncated(out, magnitude.as_bytes())
}

fn write_float(out: &mut [u8], rng: &mut RandomEngine, max_exponent: u32) -> usize {
    if out.len() < MIN_FLOAT_SIZE {
        return 0;
    }

    let significand = Digits::new(rng.next_u64());
    let digits = significand.as_bytes();

    let mut pos = 0;
    // A sign is only worth its byte if a full `d.d` still fits after it.
    if out.len() > MIN_FLOAT_SIZE && rng.next_bool() {
        out[0] = b'-';
        pos = 1;
    }

    // Choosing the last digit position means "no dot"; the exponent then
    // carries the float.
    let dot_index = rng.next_ranged_usize(0, digits.len() - 1);
    let mut has_dot = false;
    if dot_index + 1 < digits.len() {
        let (int_part, frac_part): (&[u8], &[u8]) = if dot_index == 0 {
            (b"0", digits)
        } else {
            digits.split_at(dot_index)
        };
        let room = out.len() - pos;
        if int_part.len() + 2 <= room {
            pos += copy_truncated(&mut out[pos..], int_part);
            out[pos] = b'.';
            pos += 1;
            pos += copy_truncated(&mut out[pos..], frac_part);
            has_dot = true;
        }
    }
    if !has_dot {
        let room = out.len() - pos - MIN_EXPONENT_SIZE;
        pos += copy_truncated(&mut out[pos..pos + room], digits);
    }

    let room = out.len() - pos;
    if !has_dot || (room >= MIN_EXPONENT_SIZE && rng.next_bool()) {
        pos += write_exponent(&mut out[pos..], rng, max_exponent, dot_index);
    }
    pos
}

/// Writes `e|E`, an optional sign, and as many exponent digits as fit.
///
/// The caller guarantees at least [`MIN_EXPONENT_SIZE`] bytes.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn write_exponent(
    out: &mut [u8],
    rng: &mut RandomEngine,
    max_exponent: u32,
    dot_index: usize,
) -> usize {
    debug_assert!(out.len() >= MIN_EXPONENT_SIZE);
    out[0] = if rng.next_bool() { b'E' } else { b'e' };
    let mut pos = 1;
    if out.len() > MIN_EXPONENT_SIZE {
        match rng.next_ranged_int(0, 2) {
            0 => {
                out[pos] = b'+';
                pos += 1;
            }
            1 => {
                out[pos] = b'-';
                pos += 1;
            }
            _ => {}
        }
    }
    let magnitude = u64::from(max_exponent).saturating_sub(dot_index as u64);
    let exponent = rng.next_ranged_int(0, magnitude as i64) as u64;
    pos + copy_truncated(&mut out[pos..], Digits::new(exponent).as_bytes())
}
