//! Sketch code generator - relations and dimensions as C# sketch-manager calls

use super::{CodegenError, TrainingPair};
use crate::core::value::format_number;
use crate::core::vocabulary::DimensionKind;
use crate::entities::sketch::SketchConstraint;

const BANNER: &str = "// ---------------------------------------------------------\n";

/// Generates C# code for sketch constraints and dimensions
#[derive(Debug, Default, Clone, Copy)]
pub struct SketchCodeGenerator;

impl SketchCodeGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Code that applies a constraint
    ///
    /// Dimensional constraints are emitted as dimensions and must carry a
    /// value.
    pub fn generate_constraint(&self, constraint: &SketchConstraint) -> Result<String, CodegenError> {
        let relation = match (constraint.kind.sw_enum(), constraint.kind.dimension()) {
            (Some(relation), _) => relation,
            (None, Some(dimension)) => {
                let value = constraint
                    .value
                    .ok_or(CodegenError::MissingDimensionValue(constraint.kind))?;
                return Ok(self.generate_dimension(&constraint.entity1.name, dimension, value, None, None));
            }
            (None, None) => return Err(CodegenError::MissingDimensionValue(constraint.kind)),
        };

        let mut selections = vec![selection(
            &constraint.entity1.name,
            constraint.entity1.kind.select_type(),
            0,
            false,
        )];
        if let Some(other) = &constraint.entity2 {
            selections.push(selection(&other.name, other.kind.select_type(), 1, true));
        }
        if let Some(reference) = &constraint.reference_entity {
            selections.push(selection(reference, "swSelectType_e.swSelDATUMAXES", 2, true));
        }

        let (e2_kind, e2_name) = constraint
            .entity2
            .as_ref()
            .map(|e| (e.kind.as_str(), e.name.as_str()))
            .unwrap_or(("N/A", "N/A"));

        let mut code = String::from(BANNER);
        code.push_str(&format!("// Apply sketch constraint: {}\n", constraint.kind));
        code.push_str(&format!(
            "//   Entity 1: {} \"{}\"\n",
            constraint.entity1.kind, constraint.entity1.name
        ));
        code.push_str(&format!("//   Entity 2: {} \"{}\"\n", e2_kind, e2_name));
        code.push_str(BANNER);
        code.push('\n');
        code.push_str("SketchManager sketchMgr = modelDoc.SketchManager;\n");
        code.push('\n');
        code.push_str("// Select entities\n");
        for line in &selections {
            code.push_str(line);
            code.push('\n');
        }
        code.push('\n');
        code.push_str("// Apply the constraint\n");
        code.push_str(&format!("sketchMgr.AddConstraint((int){});\n", relation));
        Ok(code)
    }

    /// Code that adds a dimension, with an optional bilateral tolerance
    ///
    /// The lower tolerance is written as a magnitude; the target applies
    /// the sign itself.
    pub fn generate_dimension(
        &self,
        entity_name: &str,
        kind: DimensionKind,
        value: f64,
        tolerance_plus: Option<f64>,
        tolerance_minus: Option<f64>,
    ) -> String {
        let mut code = String::from(BANNER);
        code.push_str(&format!(
            "// Add {} dimension to \"{}\": {}\n",
            kind,
            entity_name,
            format_number(value)
        ));
        code.push_str(BANNER);
        code.push('\n');
        code.push_str("// Select the target entity\n");
        code.push_str("bool selOk = modelDoc.Extension.SelectByID2(\n");
        code.push_str(&format!("    \"{}\",\n", entity_name));
        code.push_str("    \"SKETCHSEGMENT\",\n");
        code.push_str("    0, 0, 0,\n");
        code.push_str("    false, 0, null, 0\n");
        code.push_str(");\n");
        code.push('\n');
        code.push_str("// Create the dimension\n");
        code.push_str(&format!(
            "Dimension dim = (Dimension)modelDoc.{}(0, 0, 0);\n",
            kind.sw_method()
        ));
        code.push_str("if (dim != null)\n");
        code.push_str("{\n");
        code.push_str(&format!("    dim.SystemValue = {};\n", format_number(value)));
        if let (Some(plus), Some(minus)) = (tolerance_plus, tolerance_minus) {
            code.push('\n');
            code.push_str("    // Apply bilateral tolerance\n");
            code.push_str("    DisplayDimension dispDim = (DisplayDimension)dim;\n");
            code.push_str("    DimensionTolerance tolObj = dispDim.GetTolerance();\n");
            code.push_str("    tolObj.Type = (int)swDimensionToleranceType_e.swDimTolBilateral;\n");
            code.push_str(&format!("    tolObj.MaxValue = {};\n", format_number(plus)));
            code.push_str(&format!("    tolObj.MinValue = {};\n", format_number(minus.abs())));
        }
        code.push_str("}\n");
        code.push('\n');
        code.push_str("modelDoc.ClearSelection2(true);\n");
        code
    }

    /// Instruction/code pair for the constraint
    pub fn training_pair(&self, constraint: &SketchConstraint) -> Result<TrainingPair, CodegenError> {
        let e1 = &constraint.entity1;
        let instruction = match constraint.value {
            Some(value) if constraint.is_dimensional() => {
                let mut s = format!(
                    "Add a {} of {} to {} '{}'",
                    constraint.kind,
                    format_number(value),
                    e1.kind,
                    e1.name
                );
                if let Some(e2) = &constraint.entity2 {
                    s.push_str(&format!(" relative to {} '{}'", e2.kind, e2.name));
                }
                s.push('.');
                s
            }
            _ => {
                let mut s = format!("Make {} '{}' {}", e1.kind, e1.name, constraint.kind);
                if let Some(e2) = &constraint.entity2 {
                    s.push_str(&format!(" to {} '{}'", e2.kind, e2.name));
                }
                s.push('.');
                s
            }
        };

        Ok(TrainingPair {
            instruction,
            code: self.generate_constraint(constraint)?,
        })
    }
}

fn selection(name: &str, select_type: &str, mark: u8, append: bool) -> String {
    format!(
        "modelDoc.Extension.SelectByID2(\"{}\", \"SKETCHSEGMENT\", 0, 0, 0, {}, {}, null, (int){});",
        name, append, mark, select_type
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vocabulary::{ConstraintKind, EntityKind};
    use crate::entities::sketch::SketchEntity;
    use crate::normalize::SketchConstraintNormalizer;

    fn constraint(raw: &str) -> SketchConstraint {
        SketchConstraintNormalizer::new().normalize(raw).unwrap()
    }

    #[test]
    fn test_binary_constraint_code() {
        let code = SketchCodeGenerator::new()
            .generate_constraint(&constraint("line AB perpendicular to line CD"))
            .unwrap();
        let lines: Vec<&str> = code.lines().collect();
        assert_eq!(lines[1], "// Apply sketch constraint: perpendicular");
        assert_eq!(lines[2], "//   Entity 1: line \"AB\"");
        assert_eq!(lines[3], "//   Entity 2: line \"CD\"");
        assert!(code.contains(
            "modelDoc.Extension.SelectByID2(\"AB\", \"SKETCHSEGMENT\", 0, 0, 0, false, 0, null, (int)swSelectType_e.swSelSKETCHSEGS);\n"
        ));
        assert!(code.contains(
            "modelDoc.Extension.SelectByID2(\"CD\", \"SKETCHSEGMENT\", 0, 0, 0, true, 1, null, (int)swSelectType_e.swSelSKETCHSEGS);\n"
        ));
        assert!(code.ends_with(
            "sketchMgr.AddConstraint((int)swConstraintType_e.swConstraintTypePerpendicular);\n"
        ));
    }

    #[test]
    fn test_unary_constraint_with_reference() {
        let c = SketchConstraint::new(ConstraintKind::Fixed, SketchEntity::new(EntityKind::Point, "P1"))
            .with_reference("Axis1");
        let code = SketchCodeGenerator::new().generate_constraint(&c).unwrap();
        assert!(code.contains("//   Entity 2: N/A \"N/A\"\n"));
        assert!(code.contains("(int)swSelectType_e.swSelSKETCHPOINTS);"));
        assert!(code.contains(
            "SelectByID2(\"Axis1\", \"SKETCHSEGMENT\", 0, 0, 0, true, 2, null, (int)swSelectType_e.swSelDATUMAXES);"
        ));
        assert!(code.contains("swConstraintTypeFIXED"));
    }

    #[test]
    fn test_dimensional_constraint_delegates() {
        let code = SketchCodeGenerator::new()
            .generate_constraint(&constraint("radius of arc A1 = 10"))
            .unwrap();
        assert!(code.contains("// Add radius dimension to \"A1\": 10.0\n"));
        assert!(code.contains("Dimension dim = (Dimension)modelDoc.AddRadialDimension2(0, 0, 0);\n"));
        assert!(code.contains("    dim.SystemValue = 10.0;\n"));
        assert!(!code.contains("AddConstraint"));
    }

    #[test]
    fn test_dimension_without_value_is_error() {
        let c = SketchConstraint::new(ConstraintKind::Distance, SketchEntity::new(EntityKind::Line, "L1"));
        let err = SketchCodeGenerator::new().generate_constraint(&c).unwrap_err();
        assert_eq!(err, CodegenError::MissingDimensionValue(ConstraintKind::Distance));
    }

    #[test]
    fn test_bilateral_tolerance_uses_magnitudes() {
        let code = SketchCodeGenerator::new().generate_dimension(
            "L1",
            DimensionKind::Distance,
            25.0,
            Some(0.1),
            Some(-0.05),
        );
        assert!(code.contains("modelDoc.AddDimension2(0, 0, 0)"));
        assert!(code.contains("    tolObj.MaxValue = 0.1;\n"));
        assert!(code.contains("    tolObj.MinValue = 0.05;\n"));

        let untoleranced =
            SketchCodeGenerator::new().generate_dimension("L1", DimensionKind::Angle, 30.0, Some(0.1), None);
        assert!(!untoleranced.contains("tolObj"));
        assert!(untoleranced.contains("AddAngularDimension2"));
    }

    #[test]
    fn test_training_pairs() {
        let generator = SketchCodeGenerator::new();
        let pair = generator.training_pair(&constraint("distance of line L1 to line L2 = 25")).unwrap();
        assert_eq!(pair.instruction, "Add a distance of 25.0 to line 'L1' relative to line 'L2'.");

        let pair = generator.training_pair(&constraint("point P1 coincident with point P2")).unwrap();
        assert_eq!(pair.instruction, "Make point 'P1' coincident to point 'P2'.");
        assert!(pair.code.contains("swConstraintTypeCoincident"));
    }
}
