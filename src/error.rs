//! Error types for the untex library.

use std::io;
use thiserror::Error;

/// Result type alias for untex operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during paragraph identification.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error while resolving user-defined macros.
    #[error("Macro resolution error: {0}")]
    Macro(String),

    /// Error parsing TeX markup into an element tree.
    #[error("TeX parsing error: {0}")]
    Parse(String),

    /// The element tree is malformed relative to the assumed grammar.
    #[error("Malformed element structure: {0}")]
    Structure(String),

    /// An iterator or cursor was advanced past its bound.
    #[error("Out of bounds: {0}")]
    OutOfBounds(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// The page geometry source could not be loaded.
    #[error("Page geometry error: {0}")]
    PageGeometry(String),

    /// Error during rendering (text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}
