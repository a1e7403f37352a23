//! Normalizers - free text into validated specifications

pub mod gdt;
pub mod sketch;

pub use gdt::GdtNormalizer;
pub use sketch::{DofReport, SketchConstraintNormalizer};

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::ops::Range;
use thiserror::Error;

/// What went wrong while normalizing an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeErrorKind {
    /// Nothing but whitespace
    Empty,
    /// First token is not a recognized GD&T characteristic
    UnknownCharacteristic,
    /// No numeric tolerance after the characteristic
    MissingTolerance,
    /// No sketch phrase pattern matched
    NoPatternMatched,
}

/// Normalization failure pointing at the offending part of the input
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(dint::normalize::failed))]
pub struct NormalizeError {
    kind: NormalizeErrorKind,

    message: String,

    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,
}

impl NormalizeError {
    pub(crate) fn new(
        kind: NormalizeErrorKind,
        message: impl Into<String>,
        input: &str,
        span: Range<usize>,
    ) -> Self {
        let end = span.end.min(input.len());
        let start = span.start.min(end);
        Self {
            kind,
            message: message.into(),
            src: NamedSource::new("input", input.to_string()),
            span: SourceSpan::from(start..end),
            help: generate_help(kind),
        }
    }

    pub fn kind(&self) -> NormalizeErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn generate_help(kind: NormalizeErrorKind) -> Option<String> {
    let hint = match kind {
        NormalizeErrorKind::Empty => "Provide a specification such as \"position 0.5 MMC A B C\"",
        NormalizeErrorKind::UnknownCharacteristic => {
            "Start with one of: flatness, straightness, circularity, cylindricity, \
             perpendicularity, parallelism, angularity, position, concentricity, symmetry, \
             circular_runout, total_runout, profile_of_a_line, profile_of_a_surface"
        }
        NormalizeErrorKind::MissingTolerance => {
            "Add the tolerance zone width after the characteristic, e.g. \"flatness 0.05\""
        }
        NormalizeErrorKind::NoPatternMatched => {
            "Supported forms: \"line L1 is horizontal\", \"line AB perpendicular to line CD\", \
             \"radius of arc A1 = 10\""
        }
    };
    Some(hint.to_string())
}
