use std::{io, path::PathBuf};

use thiserror::Error;

/// Reasons a [`Document`](crate::Document) cannot be built, loaded, or saved.
///
/// Encoders never fail with an error; running out of room is reported as a
/// zero-length write and handled locally by the generator.
#[derive(Error, Debug)]
pub enum Error {
    /// `size` is smaller than the smallest closed document the options allow.
    #[error("document size {size} is below the minimum of {min} bytes")]
    SizeTooSmall {
        /// Requested size.
        size: usize,
        /// Smallest acceptable size for the requested options.
        min: usize,
    },
    /// `max_depth` must admit at least the root container.
    #[error("maximum depth must be at least 1, got {0}")]
    InvalidDepth(usize),
    /// `max_string_size` must fit an empty string (`""`).
    #[error("maximum string size must be at least 2, got {0}")]
    InvalidStringSize(usize),
    /// Reading the source file failed.
    #[error("failed to load {}: {source}", path.display())]
    Load {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Writing the buffer failed.
    #[error("failed to save {}: {source}", path.display())]
    Save {
        /// Path that was written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
