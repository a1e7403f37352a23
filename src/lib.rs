//! dint: Design Intent Toolkit
//!
//! Normalizes free-text GD&T callouts and sketch constraint phrases into
//! typed specifications, validates them, resolves parameter spaces, and
//! emits CAD automation code.

pub mod cli;
pub mod codegen;
pub mod core;
pub mod entities;
pub mod normalize;
pub mod pipeline;
