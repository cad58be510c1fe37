//! Exact-size random JSON documents for parser fuzzing.
//!
//! A [`Document`] is a byte buffer of exactly the requested length holding one
//! closed JSON container, built from a seed by an iterative generator that
//! budgets every byte: numbers, strings with escapes and well-formed UTF-8,
//! whitespace runs, and nested containers up to a depth limit. The same seed
//! always yields the same bytes.
//!
//! Documents can then be mutated in place from a second, independent seed,
//! either by regenerating a bracketed range or by overwriting single bytes
//! (which can be undone).
//!
//! ```rust
//! use randomjson::{Document, GeneratorOptions};
//!
//! let doc = Document::new(GeneratorOptions::sized(64, 1234)).unwrap();
//! assert_eq!(doc.len(), 64);
//! assert!(matches!(doc.as_bytes().iter().find(|b| !b.is_ascii_whitespace()), Some(b'{' | b'[')));
//! ```

mod document;
mod error;
mod generator;
mod mutation;
mod options;
mod rng;

#[cfg(test)]
mod tests;

pub use document::{Document, Provenance, generate};
pub use error::{Error, Result};
pub use mutation::{Mutation, SavedByte};
pub use options::{BOM, GeneratorOptions, MIN_DOCUMENT_SIZE};
pub use rng::RandomEngine;
