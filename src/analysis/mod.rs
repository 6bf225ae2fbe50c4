//! Content analysis of the art image: edge detection and background/subject labelling.

pub mod classify;
pub mod edge;

pub use classify::{classify, classify_at, PixelClass, PixelClassification};
pub use edge::has_edge;
