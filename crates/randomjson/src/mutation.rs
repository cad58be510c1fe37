//! In-place mutation of a document buffer.
//!
//! Two modes share one random stream that is independent of generation:
//!
//! - **Structural**: from a random offset, find the next `{` or `[`, find its
//!   closer, and regenerate that whole range with the structural generator.
//!   The range keeps its length, so the buffer size never changes.
//! - **Byte**: overwrite random positions with random bytes, remembering the
//!   previous values so the pass can be undone exactly.
//!
//! The closer search balances only the opening bracket's own kind: while
//! matching a `[` it counts `[` and `]` and ignores braces. Brackets inside
//! string literals are counted too. On a generated document this finds the
//! true closer; on an already-mutated one it can pick a range that straddles
//! containers, which is acceptable input for a fuzzer.
//!
//! A regenerated container inherits the nesting depth of the bracket it
//! replaces, so the depth limit holds for the whole document, not just the
//! regenerated range.

use core::ops::Range;

use log::{trace, warn};

use crate::{
    generator::{self, Limits},
    options::{GeneratorOptions, MIN_DOCUMENT_SIZE},
    rng::RandomEngine,
};

/// A byte overwritten by the most recent byte-mutation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedByte {
    /// Offset into the buffer.
    pub position: usize,
    /// Value before the pass overwrote it.
    pub previous: u8,
}

/// What a single mutation pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// The bytes in `range` were regenerated as a fresh container.
    Structure {
        /// Regenerated span, from the opening bracket through its closer.
        range: Range<usize>,
    },
    /// `count` random positions were overwritten; see
    /// [`Document::saved_bytes`](crate::Document::saved_bytes).
    Bytes {
        /// Number of positions written, repeats included.
        count: usize,
    },
    /// Nothing was changed: the buffer was empty or no bytes were requested.
    Noop,
}

#[derive(Debug, Clone)]
pub(crate) struct Mutator {
    rng: RandomEngine,
    saved: Vec<SavedByte>,
}

impl Mutator {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: RandomEngine::new(seed),
            saved: Vec::new(),
        }
    }

    pub(crate) fn saved(&self) -> &[SavedByte] {
        &self.saved
    }

    /// Drops the saved bytes without restoring them.
    pub(crate) fn forget(&mut self) {
        self.saved.clear();
    }

    /// One pass of either mode, chosen with equal probability.
    pub(crate) fn mutate(&mut self, buf: &mut [u8], options: &GeneratorOptions) -> Mutation {
        if buf.is_empty() {
            warn!("mutation requested on an empty buffer");
            self.forget();
            return Mutation::Noop;
        }
        if self.rng.next_bool() {
            self.mutate_structure(buf, Limits::from(options))
        } else {
            self.mutate_bytes(buf, options.bytes_per_mutation)
        }
    }

    pub(crate) fn mutate_structure(&mut self, buf: &mut [u8], limits: Limits) -> Mutation {
        if buf.is_empty() {
            warn!("mutation requested on an empty buffer");
            self.forget();
            return Mutation::Noop;
        }
        let start = self.rng.next_ranged_usize(0, buf.len() - 1);
        let Some(open) = find_opener(buf, start) else {
            warn!("no bracket in a {} byte buffer, mutating its final byte", buf.len());
            return self.overwrite(buf, &[buf.len() - 1]);
        };
        let close = matching_closer(buf, open).unwrap_or(buf.len() - 1);
        let range = open..close + 1;
        if range.len() < MIN_DOCUMENT_SIZE {
            warn!("bracket at {open} has no room for a container, mutating the final byte");
            return self.overwrite(buf, &[buf.len() - 1]);
        }

        let enclosing = nesting_depth(&buf[..open]);
        let limits = Limits {
            max_depth: limits.max_depth.saturating_sub(enclosing),
            ..limits
        };
        trace!("regenerating {range:?} at depth {enclosing} (scan started at {start})");
        self.forget();
        generator::generate(&mut buf[range.clone()], &mut self.rng, limits);
        Mutation::Structure { range }
    }

    pub(crate) fn mutate_bytes(&mut self, buf: &mut [u8], count: usize) -> Mutation {
        if buf.is_empty() {
            warn!("mutation requested on an empty buffer");
        }
        if buf.is_empty() || count == 0 {
            self.forget();
            return Mutation::Noop;
        }
        let positions: Vec<usize> = (0..count)
            .map(|_| self.rng.next_ranged_usize(0, buf.len() - 1))
            .collect();
        self.overwrite(buf, &positions)
    }

    fn overwrite(&mut self, buf: &mut [u8], positions: &[usize]) -> Mutation {
        self.forget();
        for &position in positions {
            self.saved.push(SavedByte {
                position,
                previous: buf[position],
            });
            buf[position] = self.rng.next_byte();
        }
        Mutation::Bytes {
            count: positions.len(),
        }
    }

    /// Restores the bytes of the most recent byte pass. Returns `false` if
    /// there was nothing to restore.
    pub(crate) fn revert(&mut self, buf: &mut [u8]) -> bool {
        if self.saved.is_empty() {
            return false;
        }
        // Newest first, so a position hit twice ends at its original value.
        for saved in self.saved.drain(..).rev() {
            buf[saved.position] = saved.previous;
        }
        true
    }
}

/// First `{` or `[` at or after `start`, wrapping to the front of the buffer.
fn find_opener(buf: &[u8], start: usize) -> Option<usize> {
    let is_opener = |b: &u8| matches!(b, b'{' | b'[');
    buf[start..]
        .iter()
        .position(is_opener)
        .map(|i| start + i)
        .or_else(|| buf[..start].iter().position(is_opener))
}

/// Containers still open at the end of `prefix`, skipping string literals.
fn nesting_depth(prefix: &[u8]) -> usize {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for &byte in prefix {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => depth += 1,
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    depth
}

/// Closer matching the opener at `open`, counting only that bracket kind.
fn matching_closer(buf: &[u8], open: usize) -> Option<usize> {
    let opener = buf[open];
    let closer = if opener == b'{' { b'}' } else { b']' };
    let mut balance = 0usize;
    for (i, &byte) in buf.iter().enumerate().skip(open) {
        if byte == opener {
            balance += 1;
        } else if byte == closer {
            balance -= 1;
            if balance == 0 {
                return Some(i);
            }
        }
    }
    None
}
