//! Style primitives shared across the extractor, planner and executor:
//! color parsing for style rules, independent of the OOXML layer.

pub mod color;

pub use color::RGBColor;
