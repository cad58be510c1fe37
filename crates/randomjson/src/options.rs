use std::path::PathBuf;

use crate::error::{Error, Result};

/// UTF-8 byte order mark, written ahead of the document when
/// [`GeneratorOptions::bom`] is set.
pub const BOM: &[u8; 3] = &[0xEF, 0xBB, 0xBF];

/// Smallest closed document: `{}` or `[]`.
pub const MIN_DOCUMENT_SIZE: usize = 2;

/// Configuration for generating and mutating a [`Document`](crate::Document).
///
/// Options are a plain snapshot: a `Document` copies them at construction and
/// only reads them again on [`rebuild`](crate::Document::rebuild).
///
/// # Examples
///
/// ```rust
/// use randomjson::{Document, GeneratorOptions};
///
/// let options = GeneratorOptions {
///     size: 256,
///     generation_seed: 42,
///     max_depth: 8,
///     ..Default::default()
/// };
/// let doc = Document::new(options).unwrap();
/// assert_eq!(doc.len(), 256);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GeneratorOptions {
    /// Exact length of the generated buffer in bytes, BOM included.
    ///
    /// Ignored while `source_path` is set: a loaded document is as long as its
    /// file, and this value is kept for when the path is cleared.
    ///
    /// # Default
    ///
    /// `100`
    pub size: usize,

    /// Seed of the stream that drives generation.
    ///
    /// # Default
    ///
    /// `0`
    pub generation_seed: u64,

    /// Seed of the independent stream that drives mutation passes.
    ///
    /// # Default
    ///
    /// `0`
    pub mutation_seed: u64,

    /// Load this file verbatim instead of generating.
    ///
    /// The generation seed and `size` have no effect on a loaded document.
    ///
    /// # Default
    ///
    /// `None`
    pub source_path: Option<PathBuf>,

    /// Prefix the document with a UTF-8 byte order mark.
    ///
    /// # Default
    ///
    /// `false`
    pub bom: bool,

    /// Upper bound on the magnitude of generated number exponents.
    ///
    /// # Default
    ///
    /// `400`
    pub max_number_exponent: u32,

    /// Upper bound on the encoded length of a string, quotes included.
    ///
    /// # Default
    ///
    /// `32`
    pub max_string_size: usize,

    /// Upper bound on the length of each whitespace run between tokens.
    ///
    /// # Default
    ///
    /// `4`
    pub max_whitespace_size: usize,

    /// Maximum container nesting depth, root included.
    ///
    /// # Default
    ///
    /// `64`
    pub max_depth: usize,

    /// Number of mutation passes applied right after the buffer is built.
    ///
    /// # Default
    ///
    /// `0`
    pub mutations_to_apply: usize,

    /// Zero-based indices of construction-time mutation passes to skip.
    ///
    /// A skipped pass still consumes its share of the mutation stream, so the
    /// passes after it are unchanged. This reproduces a failing sequence
    /// minus one known-bad step.
    ///
    /// # Default
    ///
    /// empty
    pub skipped_mutations: Vec<usize>,

    /// Number of bytes overwritten by one byte-mutation pass.
    ///
    /// # Default
    ///
    /// `1`
    pub bytes_per_mutation: usize,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            size: 100,
            generation_seed: 0,
            mutation_seed: 0,
            source_path: None,
            bom: false,
            max_number_exponent: 400,
            max_string_size: 32,
            max_whitespace_size: 4,
            max_depth: 64,
            mutations_to_apply: 0,
            skipped_mutations: Vec::new(),
            bytes_per_mutation: 1,
        }
    }
}

impl GeneratorOptions {
    /// Options for a generated document of `size` bytes from `seed`.
    #[must_use]
    pub fn sized(size: usize, seed: u64) -> Self {
        Self {
            size,
            generation_seed: seed,
            ..Default::default()
        }
    }

    /// Options that load `path` verbatim.
    #[must_use]
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: Some(path.into()),
            ..Default::default()
        }
    }

    /// Builder: set the document size.
    #[must_use]
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Builder: set the generation seed.
    #[must_use]
    pub fn with_generation_seed(mut self, seed: u64) -> Self {
        self.generation_seed = seed;
        self
    }

    /// Builder: set the mutation seed.
    #[must_use]
    pub fn with_mutation_seed(mut self, seed: u64) -> Self {
        self.mutation_seed = seed;
        self
    }

    /// Builder: request a byte order mark.
    #[must_use]
    pub fn with_bom(mut self, bom: bool) -> Self {
        self.bom = bom;
        self
    }

    /// Builder: set the maximum nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Builder: set the construction-time mutation count.
    #[must_use]
    pub fn with_mutations(mut self, count: usize) -> Self {
        self.mutations_to_apply = count;
        self
    }

    /// Builder: skip one construction-time mutation pass.
    #[must_use]
    pub fn skipping_mutation(mut self, index: usize) -> Self {
        self.skipped_mutations.push(index);
        self
    }

    /// Smallest `size` these options can generate.
    #[must_use]
    pub fn min_size(&self) -> usize {
        if self.bom {
            BOM.len() + MIN_DOCUMENT_SIZE
        } else {
            MIN_DOCUMENT_SIZE
        }
    }

    /// Checks the limits a generator relies on.
    ///
    /// `size` is only checked when the document is generated, not loaded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDepth`], [`Error::InvalidStringSize`], or
    /// [`Error::SizeTooSmall`] for limits that cannot produce a closed
    /// document.
    pub fn validate(&self) -> Result<()> {
        self.validate_limits()?;
        if self.source_path.is_none() {
            self.validate_size()?;
        }
        Ok(())
    }

    /// Limits shared by generation and structural mutation.
    pub(crate) fn validate_limits(&self) -> Result<()> {
        if self.max_depth < 1 {
            return Err(Error::InvalidDepth(self.max_depth));
        }
        if self.max_string_size < 2 {
            return Err(Error::InvalidStringSize(self.max_string_size));
        }
        Ok(())
    }

    pub(crate) fn validate_size(&self) -> Result<()> {
        if self.size < self.min_size() {
            return Err(Error::SizeTooSmall {
                size: self.size,
                min: self.min_size(),
            });
        }
        Ok(())
    }

    pub(crate) fn is_skipped(&self, pass: usize) -> bool {
        self.skipped_mutations.contains(&pass)
    }
}
