//! GD&T normalizer - parse, validate and size feature control frames
//!
//! Accepted input looks like the text of a feature control frame read
//! left to right:
//!
//! ```text
//! perpendicularity 0.1 A B
//! position 0.5 MMC A|B|C
//! position DIA 0.25 MMC A B(M) C
//! flatness 0.05
//! ```

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

use super::{NormalizeError, NormalizeErrorKind};
use crate::core::vocabulary::{
    Characteristic, GdtCategory, MaterialModifier, VocabularyError, ZoneShape,
};
use crate::entities::gdt::{DatumReference, GdtSpecification};

static DIA_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bDIA\b").expect("valid regex"));

static MODIFIER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(MMC|LMC|RFS)\b").expect("valid regex"));

static TOLERANCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d*").expect("valid regex"));

static DATUM_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[|,\s]+").expect("valid regex"));

static DATUM_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([A-Z])(?:\((M|L)\))?$").expect("valid regex"));

/// Parses and validates GD&T specification strings
#[derive(Debug, Default, Clone, Copy)]
pub struct GdtNormalizer;

impl GdtNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parse a raw GD&T string into a structured specification
    pub fn normalize(&self, raw: &str) -> Result<GdtSpecification, NormalizeError> {
        let text = raw.trim();
        let Some(first) = text.split_whitespace().next() else {
            return Err(NormalizeError::new(
                NormalizeErrorKind::Empty,
                "Empty GD&T specification",
                raw,
                0..raw.len(),
            ));
        };

        let token = first.to_lowercase().replace('-', "_");
        let characteristic = Characteristic::from_token(&token).ok_or_else(|| {
            NormalizeError::new(
                NormalizeErrorKind::UnknownCharacteristic,
                VocabularyError::Characteristic(token.clone()).to_string(),
                text,
                0..first.len(),
            )
        })?;

        // Everything after the characteristic token
        let mut rest = text[first.len()..].to_string();

        let mut zone = ZoneShape::Total;
        if DIA_PATTERN.is_match(&rest) {
            zone = ZoneShape::Cylindrical;
            rest = DIA_PATTERN.replace_all(&rest, " ").into_owned();
        }

        let mut modifier = None;
        if let Some(m) = MODIFIER_PATTERN.find(&rest) {
            // RFS normalizes to no modifier; the pattern admits nothing else
            modifier = MaterialModifier::parse_condition(m.as_str()).unwrap_or(None);
            rest.replace_range(m.range(), " ");
        }

        let Some(m) = TOLERANCE_PATTERN.find(&rest) else {
            return Err(NormalizeError::new(
                NormalizeErrorKind::MissingTolerance,
                format!("No tolerance value found in: '{}'", text),
                text,
                0..text.len(),
            ));
        };
        let tolerance_value: f64 = m.as_str().parse().map_err(|_| {
            NormalizeError::new(
                NormalizeErrorKind::MissingTolerance,
                format!("No tolerance value found in: '{}'", text),
                text,
                0..text.len(),
            )
        })?;
        rest.replace_range(m.range(), " ");

        let mut spec = GdtSpecification::new(characteristic, tolerance_value)
            .with_zone(zone)
            .with_modifier(modifier);
        spec.datum_references = extract_datums(&rest);

        debug!(input = raw, spec = %spec, "normalized GD&T specification");
        Ok(spec)
    }

    /// Check a specification against ASME Y14.5 rules
    ///
    /// Returns every violated rule; an empty list means the frame is valid.
    pub fn validate_specification(&self, spec: &GdtSpecification) -> Vec<String> {
        let mut errors = Vec::new();
        let name = spec.characteristic.as_str();
        let category = spec.characteristic.category();
        let has_datums = !spec.datum_references.is_empty();

        if spec.tolerance_value <= 0.0 {
            errors.push("Tolerance value must be positive.".to_string());
        }

        if category == GdtCategory::Form && has_datums {
            errors.push(format!("Form tolerance '{}' must not reference datums.", name));
        }

        if matches!(category, GdtCategory::Orientation | GdtCategory::Location) && !has_datums {
            errors.push(format!("'{}' requires at least one datum reference.", name));
        }

        if category == GdtCategory::Runout && !has_datums {
            errors.push(format!(
                "Runout tolerance '{}' requires at least one datum reference.",
                name
            ));
        }

        if spec.characteristic.is_rfs_only() {
            if spec.material_modifier.is_some() {
                errors.push(format!("'{}' only allows RFS (no material modifier).", name));
            }
            for datum in spec.datum_references.iter().filter(|d| d.modifier.is_some()) {
                errors.push(format!("Datum '{}' on '{}' must be RFS.", datum.label, name));
            }
        }

        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for datum in &spec.datum_references {
            if !seen.insert(datum.label) && reported.insert(datum.label) {
                errors.push(format!(
                    "Datum '{}' is referenced more than once on '{}'.",
                    datum.label, name
                ));
            }
        }

        if spec.composite {
            if let Some(refinement) = spec.refinement_tolerance {
                if refinement <= 0.0 || refinement >= spec.tolerance_value {
                    errors.push(format!(
                        "Composite refinement tolerance {} must be positive and smaller than {}.",
                        refinement, spec.tolerance_value
                    ));
                }
            }
        }

        errors
    }

    /// Virtual condition of a feature of size, or `None` at RFS
    pub fn calculate_virtual_condition(
        &self,
        spec: &GdtSpecification,
        feature_size: f64,
        is_external: bool,
    ) -> Option<f64> {
        let tol = spec.tolerance_value;
        match (spec.material_modifier?, is_external) {
            (MaterialModifier::Mmc, true) | (MaterialModifier::Lmc, false) => Some(feature_size + tol),
            (MaterialModifier::Mmc, false) | (MaterialModifier::Lmc, true) => Some(feature_size - tol),
        }
    }
}

fn extract_datums(remainder: &str) -> Vec<DatumReference> {
    let mut datums = Vec::new();
    for token in DATUM_SPLIT.split(remainder.trim()) {
        let Some(caps) = DATUM_TOKEN.captures(token) else {
            continue;
        };
        let Some(label) = caps[1].chars().next() else {
            continue;
        };
        let modifier = caps.get(2).and_then(|m| match m.as_str() {
            "M" | "m" => Some(MaterialModifier::Mmc),
            _ => Some(MaterialModifier::Lmc),
        });
        let order = u8::try_from(datums.len() + 1).unwrap_or(u8::MAX);
        datums.push(DatumReference {
            label: label.to_ascii_uppercase(),
            modifier,
            order,
        });
    }
    datums
}
