//! Sketch constraint normalizer and degrees-of-freedom check

use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

use super::{NormalizeError, NormalizeErrorKind};
use crate::core::vocabulary::{ConstraintKind, EntityKind};
use crate::entities::sketch::{SketchConstraint, SketchEntity};

/// Phrase shapes tried in order; the first that matches wins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PhraseShape {
    /// `radius of arc A1 = 10`, `distance of line L1 to line L2 = 25`
    Dimensional,
    /// `line AB perpendicular to line CD`
    Binary,
    /// `line L1 is horizontal`
    Unary,
}

const ENTITY: &str = "line|arc|circle|point|spline";

static PHRASES: LazyLock<Vec<(PhraseShape, Regex)>> = LazyLock::new(|| {
    let dimensional = format!(
        r"(?i)(?P<ctype>distance|angle|radius|diameter)\s+(?:of\s+)?(?P<e1_type>{e})\s+(?P<e1_name>\S+)\s*(?:(?:to|from)\s+(?P<e2_type>{e})\s+(?P<e2_name>\S+)\s*)?(?:=|is)?\s*(?P<value>\d+\.?\d*)",
        e = ENTITY
    );
    let binary = format!(
        r"(?i)(?P<e1_type>{e})\s+(?P<e1_name>\S+)\s+(?P<ctype>perpendicular|parallel|tangent|coincident|concentric|equal|collinear|symmetric|midpoint)\s+(?:to|with)?\s*(?P<e2_type>{e})\s+(?P<e2_name>\S+)",
        e = ENTITY
    );
    let unary = format!(
        r"(?i)(?P<e1_type>{e})\s+(?P<e1_name>\S+)\s+(?:is\s+)?(?P<ctype>horizontal|vertical|fixed)",
        e = ENTITY
    );
    vec![
        (PhraseShape::Dimensional, Regex::new(&dimensional).expect("valid regex")),
        (PhraseShape::Binary, Regex::new(&binary).expect("valid regex")),
        (PhraseShape::Unary, Regex::new(&unary).expect("valid regex")),
    ]
});

/// Result of a degrees-of-freedom check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DofReport {
    pub is_fully_defined: bool,
    pub dof_remaining: u32,
    pub dof_total: u32,
    pub dof_consumed: u32,
}

/// Parses free-form sketch constraint phrases
#[derive(Debug, Default, Clone, Copy)]
pub struct SketchConstraintNormalizer;

impl SketchConstraintNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parse a raw constraint description
    pub fn normalize(&self, raw: &str) -> Result<SketchConstraint, NormalizeError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(NormalizeError::new(
                NormalizeErrorKind::Empty,
                "Empty sketch constraint",
                raw,
                0..raw.len(),
            ));
        }

        for (shape, pattern) in PHRASES.iter() {
            if let Some(caps) = pattern.captures(text) {
                if let Some(constraint) = build_constraint(*shape, &caps) {
                    debug!(input = raw, shape = ?shape, constraint = %constraint, "normalized sketch constraint");
                    return Ok(constraint);
                }
            }
        }

        Err(NormalizeError::new(
            NormalizeErrorKind::NoPatternMatched,
            format!("Unable to parse sketch constraint: '{}'", raw),
            text,
            0..text.len(),
        ))
    }

    /// Estimate whether a set of constraints fully defines a sketch
    ///
    /// Each entity contributes two translational DOF and every constraint
    /// removes a fixed amount. Redundant or conflicting constraints are not
    /// detected.
    pub fn check_fully_defined(constraints: &[SketchConstraint], entity_count: u32) -> DofReport {
        let total = entity_count.saturating_mul(2);
        let consumed = constraints
            .iter()
            .map(|c| c.kind.dof_consumed())
            .fold(0u32, u32::saturating_add);
        let remaining = total.saturating_sub(consumed);
        DofReport {
            is_fully_defined: remaining == 0,
            dof_remaining: remaining,
            dof_total: total,
            dof_consumed: consumed,
        }
    }
}

fn entity(caps: &Captures<'_>, kind: &str, name: &str) -> Option<SketchEntity> {
    let kind: EntityKind = caps.name(kind)?.as_str().parse().ok()?;
    Some(SketchEntity::new(kind, caps.name(name)?.as_str()))
}

fn build_constraint(shape: PhraseShape, caps: &Captures<'_>) -> Option<SketchConstraint> {
    let kind: ConstraintKind = caps.name("ctype")?.as_str().parse().ok()?;
    let mut constraint = SketchConstraint::new(kind, entity(caps, "e1_type", "e1_name")?);
    match shape {
        PhraseShape::Dimensional => {
            constraint.entity2 = entity(caps, "e2_type", "e2_name");
            constraint.value = Some(caps.name("value")?.as_str().parse().ok()?);
        }
        PhraseShape::Binary => {
            constraint.entity2 = Some(entity(caps, "e2_type", "e2_name")?);
        }
        PhraseShape::Unary => {}
    }
    Some(constraint)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(raw: &str) -> SketchConstraint {
        SketchConstraintNormalizer::new().normalize(raw).unwrap()
    }

    #[test]
    fn test_unary_horizontal() {
        let c = normalize("line L1 is horizontal");
        assert_eq!(c.kind, ConstraintKind::Horizontal);
        assert_eq!(c.entity1, SketchEntity::new(EntityKind::Line, "L1"));
        assert!(c.entity2.is_none());
        assert!(c.value.is_none());

        assert_eq!(normalize("Point P1 fixed").kind, ConstraintKind::Fixed);
    }

    #[test]
    fn test_binary_relations() {
        let c = normalize("line AB perpendicular to line CD");
        assert_eq!(c.kind, ConstraintKind::Perpendicular);
        assert_eq!(c.entity2, Some(SketchEntity::new(EntityKind::Line, "CD")));

        let c = normalize("point P1 coincident with point P2");
        assert_eq!(c.kind, ConstraintKind::Coincident);
        assert_eq!(c.entity1.kind, EntityKind::Point);

        let c = normalize("ARC A1 Tangent LINE L3");
        assert_eq!(c.kind, ConstraintKind::Tangent);
        assert_eq!(c.entity2.unwrap().kind, EntityKind::Line);
    }

    #[test]
    fn test_dimensional_phrases() {
        let c = normalize("distance of line L1 to line L2 = 25.0");
        assert_eq!(c.kind, ConstraintKind::Distance);
        assert_eq!(c.entity2, Some(SketchEntity::new(EntityKind::Line, "L2")));
        assert!((c.value.unwrap() - 25.0).abs() < 1e-10);

        let c = normalize("radius of arc A1 = 10");
        assert_eq!(c.kind, ConstraintKind::Radius);
        assert!(c.entity2.is_none());
        assert!((c.value.unwrap() - 10.0).abs() < 1e-10);

        let c = normalize("diameter circle C1 is 12.5");
        assert_eq!(c.kind, ConstraintKind::Diameter);
        assert!((c.value.unwrap() - 12.5).abs() < 1e-10);
    }

    #[test]
    fn test_dimensional_wins_over_geometric() {
        let c = normalize("angle of line L1 from line L2 = 30");
        assert_eq!(c.kind, ConstraintKind::Angle);
    }

    #[test]
    fn test_unparseable_phrase() {
        let err = SketchConstraintNormalizer::new()
            .normalize("make it look nice")
            .unwrap_err();
        assert_eq!(err.kind(), NormalizeErrorKind::NoPatternMatched);
        assert_eq!(err.to_string(), "Unable to parse sketch constraint: 'make it look nice'");
    }

    #[test]
    fn test_fixed_fully_defines_single_entity() {
        let fixed = normalize("point P1 is fixed");
        let report = SketchConstraintNormalizer::check_fully_defined(&[fixed], 1);
        assert!(report.is_fully_defined);
        assert_eq!(report.dof_remaining, 0);
        assert_eq!(report.dof_total, 2);
    }

    #[test]
    fn test_dof_remaining_never_negative() {
        let constraints = vec![
            normalize("line L1 is horizontal"),
            normalize("line L1 is vertical"),
            normalize("point P1 is fixed"),
        ];
        let report = SketchConstraintNormalizer::check_fully_defined(&constraints, 1);
        assert_eq!(report.dof_consumed, 4);
        assert_eq!(report.dof_remaining, 0);
        assert!(report.is_fully_defined);

        let report = SketchConstraintNormalizer::check_fully_defined(&constraints[..1], 2);
        assert_eq!(report.dof_remaining, 3);
        assert!(!report.is_fully_defined);
    }
}
