//! Dialogue text pipeline: interpolation first, then segmentation

pub mod interpolate;
pub mod segment;

pub use interpolate::{VariableSource, interpolate};
pub use segment::{segment_text, speaker_color};
