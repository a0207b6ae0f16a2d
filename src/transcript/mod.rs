//! Transcript and variant effect annotation consumed by the sequence generators.

pub mod annotation;
pub mod types;

pub use annotation::Annotation;
pub use types::{Transcript, VariantEffect};
