//! Error types for the input boundary.
//!
//! The search core assumes a well-formed `State`; everything that can be
//! malformed is rejected here, while parsing tube lines, keys or files.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons a tube description cannot be turned into a `State`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input contained no tubes at all.
    #[error("puzzle has no tubes")]
    NoTubes,

    /// The first tube has zero slots, so no tube can hold anything.
    #[error("tube capacity must be at least 1")]
    ZeroCapacity,

    /// A tube's length differs from the first tube's length.
    #[error("tube {tube} has {found} slots, expected {expected}")]
    UnequalTubes {
        tube: usize,
        expected: usize,
        found: usize,
    },

    /// A character outside the slot alphabet (`0`, `1`-`9`, `a`-`z`).
    #[error("unrecognized slot '{ch}' in tube {tube} at slot {slot}")]
    InvalidSlot { ch: char, tube: usize, slot: usize },

    /// A color sits above an empty slot; tubes fill from the bottom.
    #[error("tube {tube} has a color at slot {slot} above an empty slot")]
    FloatingColor { tube: usize, slot: usize },
}

/// Failures while loading a puzzle from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid puzzle: {0}")]
    Parse(#[from] ParseError),
}
