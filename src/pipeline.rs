//! Batch pipeline - normalize, validate and generate many inputs at once
//!
//! One bad line never aborts a batch: its failure is recorded on its own
//! record and processing moves on.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;
use tracing::{debug, warn};

use crate::codegen::{GdtCodeGenerator, SketchCodeGenerator};
use crate::entities::gdt::GdtSpecification;
use crate::entities::sketch::SketchConstraint;
use crate::normalize::{GdtNormalizer, SketchConstraintNormalizer};

/// Which normalizer/generator pair a batch runs through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BatchKind {
    /// GD&T feature control frames
    Gdt,
    /// Sketch constraint phrases
    Sketch,
}

/// One input line with its position in the source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchInput {
    pub line: usize,
    pub text: String,
}

impl BatchInput {
    pub fn new(line: usize, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
        }
    }

    /// Split plain text into inputs, numbering lines from 1
    pub fn from_lines(contents: &str) -> Vec<Self> {
        contents
            .lines()
            .enumerate()
            .map(|(i, text)| Self::new(i + 1, text))
            .collect()
    }

    /// Blank lines and `#` comments carry no work
    pub fn is_skippable(&self) -> bool {
        let trimmed = self.text.trim();
        trimmed.is_empty() || trimmed.starts_with('#')
    }
}

/// Parsed form of an input
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParsedSpec {
    Gdt(GdtSpecification),
    Sketch(SketchConstraint),
}

/// Outcome for a single input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRecord {
    pub line: usize,
    pub input: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specification: Option<ParsedSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validation_errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchRecord {
    fn new(input: &BatchInput) -> Self {
        Self {
            line: input.line,
            input: input.text.trim().to_string(),
            ok: false,
            specification: None,
            validation_errors: Vec::new(),
            instruction: None,
            code: None,
            warnings: Vec::new(),
            error: None,
        }
    }

    fn failed(mut self, error: String) -> Self {
        warn!(line = self.line, error = %error, "batch item failed");
        self.error = Some(error);
        self.ok = false;
        self
    }
}

/// Statistics from a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    pub processed: usize,
    pub succeeded: usize,
    /// Parsed but broke one or more rules
    pub invalid: usize,
    /// Could not be parsed or generated
    pub failed: usize,
    pub skipped: usize,
}

impl BatchStats {
    pub fn record(&mut self, record: &BatchRecord) {
        self.processed += 1;
        if record.error.is_some() {
            self.failed += 1;
        } else if !record.validation_errors.is_empty() {
            self.invalid += 1;
        } else {
            self.succeeded += 1;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub records: Vec<BatchRecord>,
    pub stats: BatchStats,
}

/// Options for a batch run
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Attach a natural-language instruction to each record
    pub training_pairs: bool,
}

/// Process one input through normalizer, validator and generator
pub fn process_item(kind: BatchKind, input: &BatchInput, options: BatchOptions) -> BatchRecord {
    let mut record = BatchRecord::new(input);
    let text = input.text.trim();

    match kind {
        BatchKind::Gdt => {
            let normalizer = GdtNormalizer::new();
            let spec = match normalizer.normalize(text) {
                Ok(spec) => spec,
                Err(e) => return record.failed(e.to_string()),
            };
            let generator = GdtCodeGenerator::new();
            let generated = generator.generate(&spec);
            if options.training_pairs {
                record.instruction = Some(generator.training_pair(&spec).instruction);
            }
            record.validation_errors = normalizer.validate_specification(&spec);
            record.code = Some(generated.code);
            record.warnings = generated.warnings;
            record.specification = Some(ParsedSpec::Gdt(spec));
        }
        BatchKind::Sketch => {
            let constraint = match SketchConstraintNormalizer::new().normalize(text) {
                Ok(constraint) => constraint,
                Err(e) => return record.failed(e.to_string()),
            };
            let generator = SketchCodeGenerator::new();
            if options.training_pairs {
                match generator.training_pair(&constraint) {
                    Ok(pair) => {
                        record.instruction = Some(pair.instruction);
                        record.code = Some(pair.code);
                    }
                    Err(e) => return record.failed(e.to_string()),
                }
            } else {
                match generator.generate_constraint(&constraint) {
                    Ok(code) => record.code = Some(code),
                    Err(e) => return record.failed(e.to_string()),
                }
            }
            record.specification = Some(ParsedSpec::Sketch(constraint));
        }
    }

    record.ok = record.validation_errors.is_empty();
    debug!(line = record.line, ok = record.ok, "processed batch item");
    record
}

/// Process every input, recording failures per item
pub fn process_batch(kind: BatchKind, inputs: &[BatchInput], options: BatchOptions) -> BatchReport {
    let mut records = Vec::new();
    let stats = process_each(kind, inputs, options, |record| {
        records.push(record.clone());
        ControlFlow::Continue(())
    });
    BatchReport { records, stats }
}

/// Stream records to `sink` as they are produced
///
/// The sink can stop the run early by returning `ControlFlow::Break`; the
/// returned stats cover everything processed up to that point.
pub fn process_each<F>(kind: BatchKind, inputs: &[BatchInput], options: BatchOptions, mut sink: F) -> BatchStats
where
    F: FnMut(&BatchRecord) -> ControlFlow<()>,
{
    let mut stats = BatchStats::default();
    for input in inputs {
        if input.is_skippable() {
            stats.skipped += 1;
            continue;
        }
        let record = process_item(kind, input, options);
        stats.record(&record);
        if sink(&record).is_break() {
            debug!(line = record.line, "batch stopped early");
            break;
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gdt_batch_keeps_going_after_failure() {
        let inputs = BatchInput::from_lines(
            "# frames\nposition 0.5 MMC A B C\nroundness 0.1\n\nflatness 0.05 A\nflatness 0.02\n",
        );
        let report = process_batch(BatchKind::Gdt, &inputs, BatchOptions::default());

        assert_eq!(report.stats.processed, 4);
        assert_eq!(report.stats.skipped, 2);
        assert_eq!(report.stats.succeeded, 2);
        assert_eq!(report.stats.invalid, 1);
        assert_eq!(report.stats.failed, 1);

        let failed = &report.records[1];
        assert_eq!(failed.line, 3);
        assert!(!failed.ok);
        assert_eq!(failed.error.as_deref(), Some("Unrecognized characteristic: 'roundness'."));
        assert!(failed.code.is_none());

        let invalid = &report.records[2];
        assert!(!invalid.ok);
        assert!(invalid.error.is_none());
        assert_eq!(invalid.validation_errors.len(), 1);
        assert!(invalid.code.is_some());

        assert!(report.records[3].ok);
    }

    #[test]
    fn test_sketch_batch_with_pairs() {
        let inputs = vec![
            BatchInput::new(1, "line L1 is horizontal"),
            BatchInput::new(2, "nonsense"),
        ];
        let options = BatchOptions { training_pairs: true };
        let report = process_batch(BatchKind::Sketch, &inputs, options);

        assert_eq!(report.stats.succeeded, 1);
        assert_eq!(report.stats.failed, 1);
        assert_eq!(
            report.records[0].instruction.as_deref(),
            Some("Make line 'L1' horizontal.")
        );
        assert!(report.records[1].error.as_deref().unwrap().starts_with("Unable to parse"));
    }

    #[test]
    fn test_record_json_shape() {
        let record = process_item(
            BatchKind::Gdt,
            &BatchInput::new(7, "  position 0.5 A B C D  "),
            BatchOptions::default(),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["line"], 7);
        assert_eq!(json["input"], "position 0.5 A B C D");
        assert_eq!(json["specification"]["characteristic"], "position");
        assert_eq!(json["warnings"].as_array().unwrap().len(), 1);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_process_each_stops_on_break() {
        let inputs = BatchInput::from_lines("line L1 is horizontal
bogus phrase
line L2 is vertical
");
        let mut seen = Vec::new();
        let stats = process_each(BatchKind::Sketch, &inputs, BatchOptions::default(), |record| {
            seen.push(record.line);
            if record.ok {
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(())
            }
        });
        assert_eq!(seen, vec![1, 2]);
        assert_eq!(stats.processed, 2);
        assert_eq!(stats.failed, 1);
    }
}
