use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use bstr::BStr;
use log::debug;

use crate::{
    error::{Error, Result},
    generator::{self, Limits},
    mutation::{Mutation, Mutator, SavedByte},
    options::{BOM, GeneratorOptions},
    rng::RandomEngine,
};

/// Where the bytes of a [`Document`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Built by the structural generator from
    /// [`GeneratorOptions::generation_seed`].
    Generated,
    /// Taken verbatim from a file or a caller-supplied buffer.
    Loaded,
}

/// Generates a document of `options.size` bytes and returns the buffer.
///
/// `source_path` and the mutation settings are ignored; use [`Document`] to
/// load or mutate.
///
/// # Errors
///
/// Returns the limit and size errors of [`GeneratorOptions::validate`].
///
/// # Examples
///
/// ```rust
/// let bytes = randomjson::generate(&randomjson::GeneratorOptions::sized(2, 42)).unwrap();
/// assert_eq!(bytes, b"{}");
/// ```
pub fn generate(options: &GeneratorOptions) -> Result<Vec<u8>> {
    options.validate_limits()?;
    options.validate_size()?;
    Ok(generate_buffer(options))
}

fn generate_buffer(options: &GeneratorOptions) -> Vec<u8> {
    let mut buffer = vec![0u8; options.size];
    let body = if options.bom {
        buffer[..BOM.len()].copy_from_slice(BOM);
        &mut buffer[BOM.len()..]
    } else {
        &mut buffer[..]
    };
    let mut rng = RandomEngine::new(options.generation_seed);
    generator::generate(body, &mut rng, Limits::from(options));
    debug!(
        "generated {} bytes from seed {} (bom: {})",
        options.size, options.generation_seed, options.bom
    );
    buffer
}

fn load(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path).map_err(|source| Error::Load {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("loaded {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// A fixed-size JSON buffer together with the seeds and bookkeeping needed to
/// reproduce and mutate it.
///
/// The buffer length never changes after construction: every mutation works
/// in place. Configuration setters only record the new values and mark the
/// document dirty; the buffer follows them on [`rebuild`](Self::rebuild).
///
/// # Examples
///
/// ```rust
/// use randomjson::{Document, GeneratorOptions, Mutation};
///
/// let mut doc = Document::new(GeneratorOptions::sized(128, 7).with_mutation_seed(1)).unwrap();
/// let before = doc.as_bytes().to_vec();
///
/// if let Mutation::Bytes { .. } = doc.mutate_bytes(3) {
///     assert!(doc.revert_last_mutation());
/// }
/// assert_eq!(doc.as_bytes(), &before[..]);
/// ```
pub struct Document {
    options: GeneratorOptions,
    buffer: Vec<u8>,
    provenance: Provenance,
    /// Bytes handed to [`Document::from_bytes`], restored on rebuild.
    pristine: Option<Vec<u8>>,
    mutator: Mutator,
    mutation_count: usize,
    dirty: bool,
}

impl Document {
    /// Builds a document: loads `source_path` when it is set, otherwise
    /// generates `size` bytes, then applies `mutations_to_apply` passes.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`GeneratorOptions::validate`], or
    /// [`Error::Load`] when the source file cannot be read.
    pub fn new(options: GeneratorOptions) -> Result<Self> {
        Self::build(options, None)
    }

    /// Wraps `bytes` as a loaded document. `source_path` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDepth`] or [`Error::InvalidStringSize`]; the
    /// limits still apply to structural mutations.
    pub fn from_bytes(options: GeneratorOptions, bytes: impl Into<Vec<u8>>) -> Result<Self> {
        Self::build(options, Some(bytes.into()))
    }

    fn build(options: GeneratorOptions, pristine: Option<Vec<u8>>) -> Result<Self> {
        let mut doc = Self {
            mutator: Mutator::new(options.mutation_seed),
            options,
            buffer: Vec::new(),
            provenance: Provenance::Generated,
            pristine,
            mutation_count: 0,
            dirty: false,
        };
        doc.rebuild()?;
        Ok(doc)
    }

    /// Rebuilds the buffer from the current options, restarting both random
    /// streams and the mutation counter, and clears the dirty flag.
    ///
    /// # Errors
    ///
    /// As for [`Document::new`]. On error the document is left unchanged.
    pub fn rebuild(&mut self) -> Result<()> {
        let (buffer, provenance) = if let Some(bytes) = &self.pristine {
            self.options.validate_limits()?;
            (bytes.clone(), Provenance::Loaded)
        } else if let Some(path) = &self.options.source_path {
            self.options.validate_limits()?;
            (load(path)?, Provenance::Loaded)
        } else {
            self.options.validate()?;
            (generate_buffer(&self.options), Provenance::Generated)
        };

        self.buffer = buffer;
        self.provenance = provenance;
        self.mutator = Mutator::new(self.options.mutation_seed);
        self.mutation_count = 0;
        self.dirty = false;
        self.apply_initial_mutations();
        Ok(())
    }

    fn apply_initial_mutations(&mut self) {
        for pass in 0..self.options.mutations_to_apply {
            if self.options.is_skipped(pass) {
                // Same input as the real buffer, so the stream advances exactly
                // as it would have.
                let mut scratch = self.buffer.clone();
                self.mutator.mutate(&mut scratch, &self.options);
                self.mutator.forget();
                debug!("skipped mutation pass {pass}");
            } else {
                self.mutate();
            }
        }
    }

    /// Runs one structural or byte mutation pass, chosen at random.
    pub fn mutate(&mut self) -> Mutation {
        let mutation = self.mutator.mutate(&mut self.buffer, &self.options);
        self.record(mutation)
    }

    /// Regenerates one bracketed range of the buffer in place.
    pub fn mutate_structure(&mut self) -> Mutation {
        let limits = Limits::from(&self.options);
        let mutation = self.mutator.mutate_structure(&mut self.buffer, limits);
        self.record(mutation)
    }

    /// Overwrites `count` random positions with random bytes.
    pub fn mutate_bytes(&mut self, count: usize) -> Mutation {
        let mutation = self.mutator.mutate_bytes(&mut self.buffer, count);
        self.record(mutation)
    }

    fn record(&mut self, mutation: Mutation) -> Mutation {
        if mutation != Mutation::Noop {
            self.mutation_count += 1;
        }
        debug!("mutation {}: {mutation:?}", self.mutation_count);
        mutation
    }

    /// Undoes the most recent byte-mutation pass.
    ///
    /// Returns `false` when there is nothing to undo: no byte pass has run,
    /// it was already reverted, or a structural pass ran after it.
    pub fn revert_last_mutation(&mut self) -> bool {
        self.mutator.revert(&mut self.buffer)
    }

    /// Writes the buffer verbatim to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Save`] when the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, &self.buffer).map_err(|source| Error::Save {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("saved {} bytes to {}", self.buffer.len(), path.display());
        Ok(())
    }

    /// Sets the size used by the next rebuild.
    pub fn set_size(&mut self, size: usize) {
        self.configure(|options| options.size = size);
    }

    /// Sets the generation seed used by the next rebuild.
    pub fn set_generation_seed(&mut self, seed: u64) {
        self.configure(|options| options.generation_seed = seed);
    }

    /// Sets the mutation seed used by the next rebuild.
    pub fn set_mutation_seed(&mut self, seed: u64) {
        self.configure(|options| options.mutation_seed = seed);
    }

    /// Sets whether the next rebuild writes a byte order mark.
    pub fn set_bom(&mut self, bom: bool) {
        self.configure(|options| options.bom = bom);
    }

    /// Sets the nesting limit used by the next rebuild.
    pub fn set_max_depth(&mut self, depth: usize) {
        self.configure(|options| options.max_depth = depth);
    }

    /// Sets or clears the file the next rebuild loads.
    ///
    /// Loading never touches [`GeneratorOptions::size`]: after clearing the
    /// path, a rebuild generates the size that was configured before.
    pub fn set_source_path(&mut self, path: Option<PathBuf>) {
        self.configure(|options| options.source_path = path);
    }

    /// Edits any option and marks the document dirty.
    pub fn configure(&mut self, edit: impl FnOnce(&mut GeneratorOptions)) {
        edit(&mut self.options);
        self.dirty = true;
    }

    /// The buffer.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Buffer length in bytes, BOM included. For a loaded document this is
    /// the input length, whatever `options().size` says.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// `true` only for a document loaded from empty input.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Generation seed, or `None` for loaded documents. Pending edits show
    /// here before a rebuild; check [`is_dirty`](Self::is_dirty).
    #[must_use]
    pub fn generation_seed(&self) -> Option<u64> {
        match self.provenance {
            Provenance::Generated => Some(self.options.generation_seed),
            Provenance::Loaded => None,
        }
    }

    /// Seed of the mutation stream.
    #[must_use]
    pub fn mutation_seed(&self) -> u64 {
        self.options.mutation_seed
    }

    /// Passes applied since the last build, construction-time passes
    /// included and skipped passes excluded.
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.mutation_count
    }

    /// Where the bytes came from.
    #[must_use]
    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Whether the options changed since the buffer was last built.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Current options, including edits not yet applied by a rebuild.
    #[must_use]
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Bytes overwritten by the latest byte pass, oldest first.
    #[must_use]
    pub fn saved_bytes(&self) -> &[SavedByte] {
        self.mutator.saved()
    }
}

impl AsRef<[u8]> for Document {
    fn as_ref(&self) -> &[u8] {
        &self.buffer
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("provenance", &self.provenance)
            .field("len", &self.buffer.len())
            .field("generation_seed", &self.generation_seed())
            .field("mutation_seed", &self.options.mutation_seed)
            .field("mutation_count", &self.mutation_count)
            .field("dirty", &self.dirty)
            .field("buffer", &BStr::new(&self.buffer))
            .finish()
    }
}
