//! GD&T code generator - feature control frames as C# `Gtol` calls

use tracing::{debug, warn};

use super::{GeneratedCode, TrainingPair};
use crate::core::value::format_number;
use crate::core::vocabulary::{MaterialModifier, ZoneShape};
use crate::entities::gdt::{DatumReference, GdtSpecification};

/// Datum slots in a single feature control frame
pub const MAX_DATUM_SLOTS: usize = 3;

/// Generates C# code that builds feature control frames
#[derive(Debug, Default, Clone, Copy)]
pub struct GdtCodeGenerator;

impl GdtCodeGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Produce the complete code block for a specification
    pub fn generate(&self, spec: &GdtSpecification) -> GeneratedCode {
        let mut warnings = Vec::new();
        let tol = format_number(spec.tolerance_value);

        let mut code = String::new();
        code.push_str("// ---------------------------------------------------------\n");
        code.push_str(&format!("// Apply {} tolerance: {}\n", spec.characteristic, tol));
        code.push_str("// ---------------------------------------------------------\n");
        code.push('\n');
        code.push_str("// Obtain the selected face / feature\n");
        code.push_str("Face2 selectedFace = (Face2)selectionMgr.GetSelectedObject6(1, -1);\n");
        code.push_str("Annotation annotation = (Annotation)selectedFace.GetAnnotation();\n");
        code.push('\n');
        code.push_str("// Create the tolerance feature\n");
        code.push_str("Gtol gtol = (Gtol)annotation.GetSpecificAnnotation();\n");
        code.push_str("if (gtol == null)\n");
        code.push_str("{\n");
        code.push_str("    gtol = (Gtol)modelDoc.InsertGtol();\n");
        code.push_str("}\n");
        code.push('\n');
        code.push_str("// Configure the feature control frame\n");
        code.push_str(&frame_row(
            0,
            spec.characteristic.sw_enum(),
            &format!("{},         // tolerance value", tol),
            spec.tolerance_zone_shape.sw_enum(),
            MaterialModifier::sw_enum(spec.material_modifier),
            "0,                              // frame index",
        ));
        code.push('\n');

        code.push_str(&datum_block(&spec.datum_references));
        code.push('\n');
        if spec.datum_references.len() > MAX_DATUM_SLOTS {
            let dropped: Vec<String> = spec.datum_references[MAX_DATUM_SLOTS..]
                .iter()
                .map(|d| d.label.to_string())
                .collect();
            warn!(dropped = ?dropped, "feature control frame has more datums than slots");
            warnings.push(format!(
                "Only {} datum slots are available; dropped datum reference(s): {}",
                MAX_DATUM_SLOTS,
                dropped.join(", ")
            ));
        }

        match (spec.composite, spec.refinement_tolerance) {
            (true, Some(refinement)) => {
                code.push_str("// Composite refinement row\n");
                code.push_str(&frame_row(
                    1,
                    spec.characteristic.sw_enum(),
                    &format!("{},    // refinement tolerance", format_number(refinement)),
                    ZoneShape::Total.sw_enum(),
                    MaterialModifier::sw_enum(None),
                    "1,                              // second frame row",
                ));
            }
            (true, None) => {
                warnings.push(
                    "Composite frame has no refinement tolerance; emitted a single-segment frame."
                        .to_string(),
                );
                code.push_str("// Single-segment feature control frame.\n");
            }
            (false, _) => code.push_str("// Single-segment feature control frame.\n"),
        }

        code.push_str("// Commit changes\n");
        code.push_str("gtol.SetDisplay(true);\n");
        code.push_str("modelDoc.EditRebuild3();\n");

        debug!(characteristic = %spec.characteristic, warnings = warnings.len(), "generated GD&T code");
        GeneratedCode { code, warnings }
    }

    /// Instruction/code pair for the specification
    pub fn training_pair(&self, spec: &GdtSpecification) -> TrainingPair {
        let modifier = spec
            .material_modifier
            .map(|m| format!(" at {}", m))
            .unwrap_or_default();
        let datums = if spec.datum_references.is_empty() {
            String::new()
        } else {
            format!(" with datum references {}", spec.datum_labels().join(", "))
        };

        TrainingPair {
            instruction: format!(
                "Apply a {} tolerance of {}{}{} to the selected feature.",
                spec.characteristic,
                format_number(spec.tolerance_value),
                modifier,
                datums
            ),
            code: self.generate(spec).code,
        }
    }
}

fn frame_row(
    row: u8,
    characteristic: &str,
    value_line: &str,
    zone: &str,
    modifier: &str,
    index_line: &str,
) -> String {
    format!(
        "gtol.SetFrameSymbol2({row}, (int){characteristic});\n\
         gtol.SetFrameValues3(\n    \
         {index_line}\n    \
         {value_line}\n    \
         (int){zone},               // zone shape\n    \
         (int){modifier}                 // material modifier\n\
         );\n"
    )
}

fn datum_block(datums: &[DatumReference]) -> String {
    if datums.is_empty() {
        return "// No datum references required for this tolerance.\n".to_string();
    }

    let mut block = String::from("// Set datum references\n");
    for datum in datums.iter().take(MAX_DATUM_SLOTS) {
        let slot = usize::from(datum.order).saturating_sub(1);
        block.push_str(&format!(
            "gtol.SetFrameDatumRef2(0, {}, \"{}\", (int){});\n",
            slot,
            datum.label,
            MaterialModifier::sw_enum(datum.modifier)
        ));
    }
    block
}
