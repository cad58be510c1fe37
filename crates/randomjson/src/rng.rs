//! Counter-based pseudo-random source.
//!
//! [`RandomEngine`] is a wyhash-style mixer over a single 64-bit counter. It
//! is fast and reproducible, which is all a corpus generator needs; it is not
//! suitable for anything that must resist prediction.
//!
//! The three constants below are part of the output contract: two engines
//! seeded identically produce identical streams, on any platform and in any
//! implementation that uses the same constants.

const INCREMENT: u64 = 0x60be_e2be_e120_fc15;
const FIRST_MULTIPLIER: u128 = 0xa3b1_9535_4a39_b70d;
const SECOND_MULTIPLIER: u128 = 0x1b03_7387_12fa_d5c9;

/// Characters that may follow a backslash in a JSON string. `u` introduces a
/// four-digit codepoint escape and is handled by the caller.
pub(crate) const ESCAPE_CHARS: &[u8; 8] = b"\"\\bfnrtu";

const LOWER_HEX: &[u8; 16] = b"0123456789abcdef";
const UPPER_HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Deterministic 64-bit pseudo-random stream.
///
/// # Examples
///
/// ```rust
/// use randomjson::RandomEngine;
///
/// let mut a = RandomEngine::new(7);
/// let mut b = RandomEngine::new(7);
/// assert_eq!(a.next_u64(), b.next_u64());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomEngine {
    state: u64,
}

impl RandomEngine {
    /// Creates an engine whose counter starts at `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Resets the counter, restarting the stream for `seed`.
    pub fn seed(&mut self, seed: u64) {
        self.state = seed;
    }

    /// Advances the counter and returns the next mixed value.
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(INCREMENT);
        let product = u128::from(self.state) * FIRST_MULTIPLIER;
        let folded = ((product >> 64) ^ product) as u64;
        let product = u128::from(folded) * SECOND_MULTIPLIER;
        ((product >> 64) ^ product) as u64
    }

    /// Low bit of the next value.
    pub fn next_bool(&mut self) -> bool {
        self.next_u64() & 1 == 1
    }

    /// Low eight bits of the next value.
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_byte(&mut self) -> u8 {
        self.next_u64() as u8
    }

    /// Integer in `min..=max`.
    ///
    /// Reduction is a plain modulo, so ranges that do not divide `2^64` are
    /// very slightly biased toward their low end. When `min == max` no value
    /// is drawn from the stream.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `min > max`.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
    pub fn next_ranged_int(&mut self, min: i64, max: i64) -> i64 {
        debug_assert!(min <= max, "empty range {min}..={max}");
        if min == max {
            return min;
        }
        let span = max.wrapping_sub(min) as u64;
        let offset = match span.checked_add(1) {
            Some(width) => self.next_u64() % width,
            None => self.next_u64(),
        };
        min.wrapping_add(offset as i64)
    }

    /// `usize` in `min..=max`, built on [`Self::next_ranged_int`].
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
    pub fn next_ranged_usize(&mut self, min: usize, max: usize) -> usize {
        self.next_ranged_int(min as i64, max as i64) as usize
    }

    /// A random hexadecimal digit in random letter case.
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_hex_digit(&mut self) -> u8 {
        let nibble = (self.next_u64() & 0xF) as u8;
        self.hex_digit(nibble)
    }

    /// Renders the low four bits of `nibble` as a hex digit. Letters draw one
    /// boolean to pick their case; decimal digits draw nothing.
    pub fn hex_digit(&mut self, nibble: u8) -> u8 {
        let nibble = usize::from(nibble & 0xF);
        if nibble >= 10 && self.next_bool() {
            UPPER_HEX[nibble]
        } else {
            LOWER_HEX[nibble]
        }
    }

    /// One of `" \ b f n r t u`, the characters allowed after a backslash.
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_escape_char(&mut self) -> u8 {
        ESCAPE_CHARS[(self.next_u64() % ESCAPE_CHARS.len() as u64) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_42_conformance_vector() {
        let mut rng = RandomEngine::new(42);
        assert_eq!(rng.next_u64(), 0xa1fa_6edf_ffe1_eb52);
        assert_eq!(rng.next_u64(), 0x6e7f_9072_9a73_709c);
        assert_eq!(rng.next_u64(), 0xd910_80a1_0cf1_1cfb);
    }

    #[test]
    fn seed_zero_conformance_vector() {
        let mut rng = RandomEngine::new(0);
        assert_eq!(rng.next_u64(), 0x5c71_580f_e121_4a64);
        assert_eq!(rng.next_u64(), 0xb8e2_b01f_c242_94c8);
    }

    #[test]
    fn reseeding_restarts_the_stream() {
        let mut rng = RandomEngine::new(42);
        let first: Vec<u64> = (0..4).map(|_| rng.next_u64()).collect();
        rng.seed(42);
        let second: Vec<u64> = (0..4).map(|_| rng.next_u64()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn degenerate_range_draws_nothing() {
        let mut a = RandomEngine::new(9);
        let mut b = RandomEngine::new(9);
        assert_eq!(a.next_ranged_int(-3, -3), -3);
        assert_eq!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn ranged_values_stay_in_bounds() {
        let mut rng = RandomEngine::new(1);
        for _ in 0..10_000 {
            let v = rng.next_ranged_int(-5, 5);
            assert!((-5..=5).contains(&v));
        }
        // Full-width range must not overflow.
        let mut a = RandomEngine::new(1);
        let mut b = RandomEngine::new(1);
        #[allow(clippy::cast_possible_wrap)]
        let expected = i64::MIN.wrapping_add(b.next_u64() as i64);
        assert_eq!(a.next_ranged_int(i64::MIN, i64::MAX), expected);
    }

    #[test]
    fn hex_and_escape_alphabets() {
        let mut rng = RandomEngine::new(3);
        for _ in 0..1_000 {
            assert!(rng.next_hex_digit().is_ascii_hexdigit());
            assert!(ESCAPE_CHARS.contains(&rng.next_escape_char()));
        }
    }

    #[test]
    fn independent_engines_do_not_interfere() {
        let mut gen_a = RandomEngine::new(1);
        let mut mut_a = RandomEngine::new(2);
        let mut gen_b = RandomEngine::new(1);

        let _ = mut_a.next_u64();
        let _ = mut_a.next_u64();
        assert_eq!(gen_a.next_u64(), gen_b.next_u64());
    }
}
