//! Entity types - GD&T feature control frames and sketch constraints

pub mod gdt;
pub mod sketch;

pub use gdt::{DatumReference, GdtSpecification};
pub use sketch::{SketchConstraint, SketchEntity};
