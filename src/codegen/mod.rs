//! Code generation - resolve specifications and parameter spaces into
//! target-platform code

pub mod gdt;
pub mod resolver;
pub mod sketch;
pub mod template;

pub use gdt::GdtCodeGenerator;
pub use resolver::{ParameterResolver, Resolution};
pub use sketch::SketchCodeGenerator;
pub use template::{TemplateEngine, TemplateError};

use serde::Serialize;
use thiserror::Error;

use crate::core::vocabulary::ConstraintKind;

/// Generated code plus anything the generator had to leave out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedCode {
    pub code: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// A natural-language instruction and the code that carries it out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainingPair {
    pub instruction: String,
    pub code: String,
}

/// Errors from code generators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error("Dimensional constraint '{0}' has no value")]
    MissingDimensionValue(ConstraintKind),
}
