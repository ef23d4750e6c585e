//! Error types for carousel operations.

use thiserror::Error;

/// Result type for carousel operations.
pub type CarouselResult<T> = Result<T, CarouselError>;

/// Errors that can occur while editing a carousel.
#[derive(Debug, Error)]
pub enum CarouselError {
    /// The deck must always keep at least one slide.
    #[error("Cannot delete the last remaining slide")]
    CannotDeleteLastSlide,

    /// A deck cannot be built from an empty slide list.
    #[error("A deck needs at least one slide")]
    EmptyDeck,

    /// Slide index outside the deck.
    #[error("Slide index {index} out of range (deck has {len} slides)")]
    SlideIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Current deck length.
        len: usize,
    },

    /// Grid cell index outside the current grid layout.
    #[error("Grid cell {index} out of range ({cells} cells)")]
    GridIndexOutOfRange {
        /// Requested cell.
        index: usize,
        /// Cells in the grid layout.
        cells: usize,
    },

    /// Invalid operation on a slide.
    #[error("Invalid operation on slide: {0}")]
    InvalidOperation(String),

    /// Text input was empty or whitespace only.
    #[error("Text is empty")]
    EmptyText,

    /// Uploaded bytes are not a supported image.
    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    /// AI copy needs a product to write about.
    #[error("Please select a product first")]
    NoProductSelected,

    /// The text-generation collaborator failed or returned nothing usable.
    #[error("{0}")]
    Generation(String),

    /// Deck serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading an image or deck file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
