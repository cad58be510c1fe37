use crate::rng::RandomEngine;

/// The four whitespace bytes JSON allows between tokens.
const WHITESPACE: [u8; 4] = [b'\t', b'\n', b'\r', b' '];

/// Overwrites all of `out` with random whitespace.
pub(crate) fn fill(out: &mut [u8], rng: &mut RandomEngine) {
    for byte in out {
        *byte = WHITESPACE[rng.next_ranged_usize(0, WHITESPACE.len() - 1)];
    }
}

/// Writes a run of `0..=min(out.len(), max)` whitespace bytes at the start of
/// `out` and returns its length.
pub(crate) fn write_run(out: &mut [u8], rng: &mut RandomEngine, max: usize) -> usize {
    let len = rng.next_ranged_usize(0, out.len().min(max));
    fill(&mut out[..len], rng);
    len
}
