//! Size-budgeted structural generator.
//!
//! Overview
//! - [`generate`] fills a byte slice with one closed JSON document whose
//!   length is exactly the slice length. There is no recursion: open
//!   containers live on an explicit [`ContainerStack`], and every iteration of
//!   the main loop either closes the innermost container or appends one entry
//!   to it.
//! - One byte per open container is always held in reserve for its closer.
//!   When fewer than [`FORCE_CLOSE_THRESHOLD`] bytes remain beyond that
//!   reserve, generation stops making decisions: every pending closer is
//!   written and the tail is padded with whitespace.
//! - Encoders report "did not fit" as a zero-length write. An entry that
//!   cannot be completed contributes nothing; its bytes past the committed
//!   offset are overwritten later.
//!
//! The same routine regenerates a bracketed subrange during structural
//! mutation, with the mutation stream in place of the generation stream.

mod number;
mod stack;
mod string;
mod whitespace;

use log::trace;
use stack::ContainerStack;

use crate::{options::GeneratorOptions, rng::RandomEngine};

/// Remaining space at or below which every open container is closed.
const FORCE_CLOSE_THRESHOLD: usize = 5;

/// A random close fires when the next draw falls below this, about 25%.
const CLOSE_THRESHOLD: u64 = 1 << 62;

/// `"":` plus a one-byte value.
const MIN_OBJECT_ENTRY: usize = string::MIN_STRING_SIZE + 2;

/// The subset of [`GeneratorOptions`] the generator reads.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Limits {
    pub(crate) max_number_exponent: u32,
    pub(crate) max_string_size: usize,
    pub(crate) max_whitespace_size: usize,
    pub(crate) max_depth: usize,
}

impl From<&GeneratorOptions> for Limits {
    fn from(options: &GeneratorOptions) -> Self {
        Self {
            max_number_exponent: options.max_number_exponent,
            max_string_size: options.max_string_size,
            max_whitespace_size: options.max_whitespace_size,
            max_depth: options.max_depth,
        }
    }
}

/// Kinds of value an entry can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Container,
    String,
    Number,
}

impl ValueKind {
    fn choose(rng: &mut RandomEngine) -> Self {
        match rng.next_ranged_int(0, 2) {
            0 => Self::Container,
            1 => Self::String,
            _ => Self::Number,
        }
    }
}

/// Fills `out` with one closed document of exactly `out.len()` bytes.
///
/// `out` must hold at least two bytes, the size of `{}`.
pub(crate) fn generate(out: &mut [u8], rng: &mut RandomEngine, limits: Limits) {
    debug_assert!(out.len() >= crate::MIN_DOCUMENT_SIZE);
    Generator {
        out,
        rng,
        limits,
        stack: ContainerStack::default(),
    }
    .run();
}

struct Generator<'a> {
    out: &'a mut [u8],
    rng: &'a mut RandomEngine,
    limits: Limits,
    stack: ContainerStack,
}

impl Generator<'_> {
    fn run(mut self) {
        let size = self.out.len();

        let mut offset = self.whitespace(0, size - crate::MIN_DOCUMENT_SIZE);
        offset += self.open_container(offset);

        loop {
            if self.space_left(offset) <= FORCE_CLOSE_THRESHOLD {
                self.close_all(offset);
                return;
            }

            if self.stack.depth() > 1 && self.rng.next_u64() < CLOSE_THRESHOLD {
                offset += self.close_innermost(offset);
            }

            let budget = self.space_left(offset);
            offset += match self.stack.innermost() {
                Some(b']') => self.array_entry(offset, budget),
                _ => self.object_entry(offset, budget),
            };
        }
    }

    /// Bytes available after reserving one per pending closer.
    fn space_left(&self, offset: usize) -> usize {
        self.out.len().saturating_sub(offset + self.stack.depth())
    }

    fn whitespace(&mut self, at: usize, max: usize) -> usize {
        whitespace::write_run(
            &mut self.out[at..at + max],
            self.rng,
            self.limits.max_whitespace_size,
        )
    }

    fn open_container(&mut self, at: usize) -> usize {
        let opener = if self.rng.next_bool() { b'[' } else { b'{' };
        self.out[at] = opener;
        self.stack.push(opener);
        1
    }

    fn close_innermost(&mut self, at: usize) -> usize {
        let Some(closer) = self.stack.pop() else {
            return 0;
        };
        self.out[at] = closer;
        // The closed container was an entry of its parent.
        self.stack.mark_entry();
        1
    }

    fn close_all(&mut self, mut offset: usize) {
        trace!(
            "forced closure at offset {offset} of {} with depth {}",
            self.out.len(),
            self.stack.depth()
        );
        while let Some(closer) = self.stack.pop() {
            self.out[offset] = closer;
            offset += 1;
        }
        whitespace::fill(&mut self.out[offset..], self.rng);
    }

    /// `[ws] [, ws] value`
    fn array_entry(&mut self, at: usize, budget: usize) -> usize {
        let comma = usize::from(self.stack.needs_comma());
        if budget < comma + 1 {
            return 0;
        }
        let end = at + budget;

        let mut offset = at;
        offset += self.whitespace(offset, end - offset - comma - 1);
        if comma == 1 {
            self.out[offset] = b',';
            offset += 1;
            offset += self.whitespace(offset, end - offset - 1);
        }

        match self.value(offset, end - offset) {
            0 => 0,
            n => offset + n - at,
        }
    }

    /// `[ws] [, ws] key ws : ws value`
    fn object_entry(&mut self, at: usize, budget: usize) -> usize {
        let comma = usize::from(self.stack.needs_comma());
        if budget < comma + MIN_OBJECT_ENTRY {
            return 0;
        }
        let end = at + budget;

        let mut offset = at;
        offset += self.whitespace(offset, end - offset - comma - MIN_OBJECT_ENTRY);
        if comma == 1 {
            self.out[offset] = b',';
            offset += 1;
            offset += self.whitespace(offset, end - offset - MIN_OBJECT_ENTRY);
        }

        // Leave room for the colon and a one-byte value.
        let key = string::write_string(
            &mut self.out[offset..end - 2],
            self.rng,
            self.limits.max_string_size,
        );
        if key == 0 {
            return 0;
        }
        offset += key;
        offset += self.whitespace(offset, end - offset - 2);
        self.out[offset] = b':';
        offset += 1;
        offset += self.whitespace(offset, end - offset - 1);

        match self.value(offset, end - offset) {
            0 => 0,
            n => offset + n - at,
        }
    }

    /// Writes one value in `budget` bytes. A container only writes its opener;
    /// its entries are produced by later iterations of the main loop.
    fn value(&mut self, at: usize, budget: usize) -> usize {
        if budget == 0 {
            return 0;
        }
        let written = match ValueKind::choose(self.rng) {
            ValueKind::Container => return self.nested_container(at, budget),
            ValueKind::String => string::write_string(
                &mut self.out[at..at + budget],
                self.rng,
                self.limits.max_string_size,
            ),
            ValueKind::Number => number::write_number(
                &mut self.out[at..at + budget],
                self.rng,
                self.limits.max_number_exponent,
            ),
        };
        if written > 0 {
            self.stack.mark_entry();
        }
        written
    }

    /// Opens a container as a value. The parent's comma flag is left alone
    /// until the nested container closes.
    fn nested_container(&mut self, at: usize, budget: usize) -> usize {
        // The opener needs its own reserved closer byte.
        if budget < 2 || self.stack.depth() >= self.limits.max_depth.saturating_sub(2) {
            return 0;
        }
        self.open_container(at)
    }
}
