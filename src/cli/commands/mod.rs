//! CLI command implementations

pub mod batch;
pub mod completions;
pub mod gdt;
pub mod params;
pub mod sketch;
