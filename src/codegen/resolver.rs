//! Parameter resolver - parameter spaces and assignments into code
//!
//! Spaces without a template resolve through the domain-grouped C# emitter
//! ([`ParameterResolver::resolve_assignment`]); catalog entries that name a
//! template render it with the assigned and derived values.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::template::{TemplateEngine, TemplateError};
use crate::core::catalog::SpaceCatalog;
use crate::core::parameter::{
    ParameterAssignment, ParameterDefinition, ParameterError, ParameterSpace,
};
use crate::core::value::{format_number, ParamValue};
use crate::core::vocabulary::{ParameterDomain, ParameterType};

/// Outcome of resolving a named space with caller assignments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub parameter_space: String,
    pub code: String,
    /// Declared parameters and the values actually used
    pub assignments_used: BTreeMap<String, ParamValue>,
    pub validation_errors: Vec<String>,
}

impl Resolution {
    pub fn is_clean(&self) -> bool {
        self.validation_errors.is_empty()
    }
}

/// Resolves parameter spaces into code
#[derive(Debug, Default, Clone, Copy)]
pub struct ParameterResolver;

impl ParameterResolver {
    pub fn new() -> Self {
        Self
    }

    /// Emit C# for an assignment, grouped into sketch, GD&T and feature blocks
    ///
    /// Parameters without a value are skipped. A block is omitted when none
    /// of its parameters has a value.
    pub fn resolve_assignment(&self, assignment: &ParameterAssignment<'_>) -> String {
        let space = assignment.space();
        let values = assignment.values();
        let mut blocks = Vec::new();

        for (domain, emit) in [
            (ParameterDomain::Sketch, sketch_block as BlockFn),
            (ParameterDomain::Gdt, gdt_block as BlockFn),
            (ParameterDomain::Feature, feature_block as BlockFn),
        ] {
            let params = space.parameters_by_domain(domain);
            for skipped in params.iter().filter(|p| !values.contains_key(&p.name)) {
                debug!(parameter = %skipped.name, domain = %domain, "no value assigned, skipping");
            }
            if params.iter().any(|p| values.contains_key(&p.name)) {
                blocks.push(emit(&params, values));
            }
        }

        blocks.join("\n")
    }

    /// Emit an unresolved scaffold with `{{name}}` placeholders
    pub fn generate_from_space(&self, space: &ParameterSpace) -> String {
        let mut lines = vec![
            "// Generated from parameter space:".to_string(),
            format!("// {}: {}", space.name, space.description),
            "//".to_string(),
            "// Parameter values to substitute:".to_string(),
        ];
        for param in space.parameters() {
            lines.push(format!("// {} ({}): {}", param.name, param.unit, param.bounds_label()));
        }
        lines.push(String::new());
        lines.push("// Template code (replace {{ }} with actual values):".to_string());
        lines.push(String::new());

        let sketch = space.parameters_by_domain(ParameterDomain::Sketch);
        if !sketch.is_empty() {
            lines.push("ISketch sketch = part.CreateSketch();".to_string());
            lines.push(String::new());
            for param in sketch {
                let placeholder = placeholder(&param.name);
                lines.push(format!("// Dimension: {} = {}", param.name, placeholder));
                lines.push(format!("ISketchDim {}_dim = sketch.CreateDimension(...);", param.name));
                lines.push(format!("{}_dim.SetValue({});", param.name, placeholder));
                lines.push(String::new());
            }
            lines.push("sketch.Exit();".to_string());
            lines.push(String::new());
        }

        let gdt = space.parameters_by_domain(ParameterDomain::Gdt);
        if !gdt.is_empty() {
            lines.push("// GD&T Specifications".to_string());
            for param in gdt
                .iter()
                .filter(|p| p.parameter_type == ParameterType::ToleranceValue)
            {
                lines.push("IToleranceFeature2 tol = part.CreateToleranceFeature();".to_string());
                lines.push(format!("tol.Tolerance1 = {};", placeholder(&param.name)));
                lines.push(String::new());
            }
        }

        lines.join("\n")
    }

    /// Resolve a named catalog space with caller assignments
    ///
    /// Only an unknown space is an error. Unknown keys, rejected values and
    /// template failures are reported in `validation_errors` next to the
    /// best-effort code.
    pub fn resolve_request(
        &self,
        catalog: &SpaceCatalog,
        engine: &TemplateEngine,
        space_name: &str,
        assignments: &BTreeMap<String, ParamValue>,
    ) -> Result<Resolution, ParameterError> {
        let entry = catalog
            .get(space_name)
            .ok_or_else(|| catalog.space_not_found(space_name))?;
        let space = &entry.space;
        let mut errors = Vec::new();

        for key in assignments.keys() {
            if space.get_parameter(key).is_none() {
                let mut valid: Vec<&str> = space.parameters().iter().map(|p| p.name.as_str()).collect();
                valid.sort_unstable();
                errors.push(format!(
                    "Unknown parameter '{}' for space '{}'. Valid parameters: {}.",
                    key,
                    space.name,
                    valid.join(", ")
                ));
            }
        }

        let mut assignment = ParameterAssignment::new(space);
        for param in space.parameters() {
            match assignments.get(&param.name) {
                Some(value) => {
                    if let Err(e) = assignment.set(&param.name, value.clone()) {
                        errors.push(e.to_string());
                        // Fall back to the declared default
                        if let Err(e) = assignment.set(&param.name, param.default_value.clone()) {
                            errors.push(e.to_string());
                        }
                    }
                }
                None => {
                    if let Err(e) = assignment.set(&param.name, param.default_value.clone()) {
                        errors.push(e.to_string());
                    }
                }
            }
        }

        let code = match &entry.template {
            Some(template) => {
                let mut context: BTreeMap<String, String> = assignment
                    .values()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_vba_literal()))
                    .collect();
                for rule in &entry.derived {
                    match rule.evaluate(assignment.values()) {
                        Some(value) => {
                            context.insert(rule.target().to_string(), value);
                        }
                        None => debug!(rule = ?rule, "derived field not computed"),
                    }
                }
                match engine.render(template, &context) {
                    Ok(code) => code.trim_end_matches('\n').to_string(),
                    Err(e @ TemplateError::RenderError(_)) => {
                        errors.push(e.to_string());
                        String::new()
                    }
                    Err(e) => {
                        errors.push(format!("Template rendering error: {}", e));
                        String::new()
                    }
                }
            }
            None => self.resolve_assignment(&assignment),
        };

        info!(
            space = %space.name,
            assignments = assignments.len(),
            errors = errors.len(),
            "resolved parameter space"
        );

        Ok(Resolution {
            parameter_space: space.name.clone(),
            code,
            assignments_used: assignment.values().clone(),
            validation_errors: errors,
        })
    }
}

type BlockFn = fn(&[&ParameterDefinition], &BTreeMap<String, ParamValue>) -> String;

fn placeholder(name: &str) -> String {
    format!("{{{{{}}}}}", name)
}

fn sketch_block(params: &[&ParameterDefinition], values: &BTreeMap<String, ParamValue>) -> String {
    let mut lines = vec![
        "// Create sketch".to_string(),
        "ISketch sketch = part.CreateSketch();".to_string(),
        String::new(),
    ];

    for param in params {
        let Some(value) = values.get(&param.name) else {
            continue;
        };
        let dim_type = match param.parameter_type {
            ParameterType::Diameter => "DIAMETER",
            ParameterType::Length => "HORIZONTAL_DISTANCE",
            _ => continue,
        };
        let var = format!("{}_dim", param.name);
        lines.push(format!("// {}: {}{}", param.description, value, param.unit));
        lines.push(format!(
            "ISketchDim {} = sketch.CreateDimension(swSketchDimensionType_e.{});",
            var, dim_type
        ));
        lines.push(format!("{}.SetValue({});", var, value));
        if let (Some(plus), Some(minus)) = (param.tolerance_plus, param.tolerance_minus) {
            lines.push(format!(
                "{}.SetTolerance({}, {});",
                var,
                format_number(plus),
                format_number(minus)
            ));
        }
        lines.push(String::new());
    }

    lines.push("// Exit sketch".to_string());
    lines.push("sketch.Exit();".to_string());
    lines.join("\n")
}

fn gdt_block(params: &[&ParameterDefinition], values: &BTreeMap<String, ParamValue>) -> String {
    let mut lines = vec!["// GD&T Specifications".to_string(), String::new()];

    let modifier = params
        .iter()
        .find(|p| p.parameter_type == ParameterType::MaterialModifier)
        .and_then(|p| values.get(&p.name))
        .map(|v| v.to_string())
        .unwrap_or_else(|| "RFS".to_string());

    let mut counter = 0;
    for param in params
        .iter()
        .filter(|p| p.parameter_type == ParameterType::ToleranceValue)
    {
        let Some(value) = values.get(&param.name) else {
            continue;
        };
        counter += 1;
        let var = format!("tolerance{}", counter);
        lines.push(format!("IToleranceFeature2 {} = part.CreateToleranceFeature();", var));
        lines.push(format!("{}.Tolerance1 = {};", var, value));
        lines.push(format!("{}.MaterialModifier1 = (int)swMaterialModifier.{};", var, modifier));
        lines.push(String::new());
    }

    lines.join("\n")
}

fn feature_block(params: &[&ParameterDefinition], values: &BTreeMap<String, ParamValue>) -> String {
    let mut lines = vec!["// Feature Creation".to_string(), String::new()];

    for param in params
        .iter()
        .filter(|p| p.parameter_type == ParameterType::PadDepth)
    {
        let Some(value) = values.get(&param.name) else {
            continue;
        };
        lines.push(format!("// Pad depth: {}{}", value, param.unit));
        lines.push("IFeature padFeat = part.FeatureByName(\"Pad1\");".to_string());
        lines.push(String::new());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> &'static SpaceCatalog {
        SpaceCatalog::builtin().unwrap()
    }

    fn mounting_hole() -> &'static ParameterSpace {
        &catalog().get("mounting_hole").unwrap().space
    }

    fn request(pairs: &[(&str, ParamValue)]) -> BTreeMap<String, ParamValue> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_resolve_diameter_emits_dimension_and_tolerance() {
        let mut assignment = ParameterAssignment::new(mounting_hole());
        assignment.set("hole_diameter", 10.0).unwrap();

        let code = ParameterResolver::new().resolve_assignment(&assignment);
        let expected = [
            "// Create sketch",
            "ISketch sketch = part.CreateSketch();",
            "",
            "// Hole diameter: 10.0mm",
            "ISketchDim hole_diameter_dim = sketch.CreateDimension(swSketchDimensionType_e.DIAMETER);",
            "hole_diameter_dim.SetValue(10.0);",
            "hole_diameter_dim.SetTolerance(0.1, -0.1);",
            "",
            "// Exit sketch",
            "sketch.Exit();",
        ]
        .join("\n");
        assert_eq!(code, expected);
    }

    #[test]
    fn test_resolve_full_assignment_blocks() {
        let mut assignment = ParameterAssignment::with_defaults(mounting_hole()).unwrap();
        assignment.set("position_material_modifier", "MMC").unwrap();

        let code = ParameterResolver::new().resolve_assignment(&assignment);
        assert!(code.contains(
            "ISketchDim hole_x_position_dim = sketch.CreateDimension(swSketchDimensionType_e.HORIZONTAL_DISTANCE);"
        ));
        assert!(code.contains("hole_x_position_dim.SetTolerance(0.05, -0.05);"));
        assert!(code.contains("sketch.Exit();\n// GD&T Specifications\n\n"));
        assert!(code.contains("IToleranceFeature2 tolerance1 = part.CreateToleranceFeature();\n"));
        assert!(code.contains("tolerance1.Tolerance1 = 0.1;\n"));
        assert!(code.contains("tolerance1.MaterialModifier1 = (int)swMaterialModifier.MMC;"));
        assert!(!code.contains("// Feature Creation"));
    }

    #[test]
    fn test_gdt_modifier_defaults_to_rfs() {
        let mut assignment = ParameterAssignment::new(mounting_hole());
        assignment.set("position_tolerance", 0.2).unwrap();
        let code = ParameterResolver::new().resolve_assignment(&assignment);
        assert!(code.starts_with("// GD&T Specifications"));
        assert!(code.contains("(int)swMaterialModifier.RFS;"));
    }

    #[test]
    fn test_empty_assignment_emits_nothing() {
        let assignment = ParameterAssignment::new(mounting_hole());
        assert_eq!(ParameterResolver::new().resolve_assignment(&assignment), "");
    }

    #[test]
    fn test_feature_block() {
        let pad = ParameterDefinition::builder("pad", ParameterType::PadDepth, ParameterDomain::Feature, 5.0)
            .constraint(crate::core::vocabulary::ValueConstraint::Positive)
            .build()
            .unwrap();
        let space = ParameterSpace::new("pad", "").with_parameter(pad).unwrap();
        let assignment = ParameterAssignment::with_defaults(&space).unwrap();
        let code = ParameterResolver::new().resolve_assignment(&assignment);
        assert_eq!(
            code,
            "// Feature Creation\n\n// Pad depth: 5.0mm\nIFeature padFeat = part.FeatureByName(\"Pad1\");\n"
        );
    }

    #[test]
    fn test_scaffold_uses_placeholders() {
        let code = ParameterResolver::new().generate_from_space(mounting_hole());
        assert!(code.starts_with("// Generated from parameter space:\n// mounting_hole: "));
        assert!(code.contains("// hole_diameter (mm): [5.0, 50.0]"));
        assert!(code.contains("// position_material_modifier (mm): {RFS, MMC, LMC}"));
        assert!(code.contains("hole_diameter_dim.SetValue({{hole_diameter}});"));
        assert!(code.contains("tol.Tolerance1 = {{position_tolerance}};"));
        assert!(!code.contains("SetValue(10.0)"));
    }

    #[test]
    fn test_request_unknown_space() {
        let engine = TemplateEngine::new().unwrap();
        let err = ParameterResolver::new()
            .resolve_request(catalog(), &engine, "nonexistent", &BTreeMap::new())
            .unwrap_err();
        assert!(matches!(err, ParameterError::SpaceNotFound { .. }));
    }

    #[test]
    fn test_request_renders_template_with_derived_values() {
        let engine = TemplateEngine::new().unwrap();
        let resolution = ParameterResolver::new()
            .resolve_request(
                catalog(),
                &engine,
                "extrusion_depth",
                &request(&[("depth_mm", ParamValue::Number(40.0))]),
            )
            .unwrap();

        assert!(resolution.is_clean(), "{:?}", resolution.validation_errors);
        let lines: Vec<&str> = resolution.code.lines().collect();
        assert_eq!(lines[0], "' Extrusion: depth=40.0mm  direction=single  draft=0.0deg");
        assert_eq!(lines[3], "    True, False, 0, 0, 0, 0.04, 0, _");
        assert_eq!(lines[4], "    False, False, 0, 0, 0.0, 0, _");
        assert!(!resolution.code.ends_with('\n'));

        let echoed: Vec<&String> = resolution.assignments_used.keys().collect();
        assert_eq!(echoed, vec!["depth_mm", "direction", "draft_angle_deg"]);
    }

    #[test]
    fn test_request_boolean_and_int_helpers() {
        let engine = TemplateEngine::new().unwrap();
        let resolution = ParameterResolver::new()
            .resolve_request(
                catalog(),
                &engine,
                "cut_extrude",
                &request(&[("through_all", ParamValue::Bool(true))]),
            )
            .unwrap();
        assert!(resolution.code.starts_with("' Cut-Extrude: depth=10.0mm  through_all=True\n"));
        assert!(resolution.code.contains("    True, False, 0, 1, 0, 10.0 / 1000#, 0, _"));
    }

    #[test]
    fn test_request_reports_unknown_keys() {
        let engine = TemplateEngine::new().unwrap();
        let resolution = ParameterResolver::new()
            .resolve_request(
                catalog(),
                &engine,
                "fillet_feature",
                &request(&[("radius_mm", ParamValue::Number(3.0)), ("colour", "red".into())]),
            )
            .unwrap();
        assert_eq!(
            resolution.validation_errors,
            vec!["Unknown parameter 'colour' for space 'fillet_feature'. Valid parameters: radius_mm."]
        );
        assert!(resolution.code.contains("3.0 / 1000#"));
        assert!(!resolution.assignments_used.contains_key("colour"));
    }

    #[test]
    fn test_request_rejected_value_falls_back_to_default() {
        let engine = TemplateEngine::new().unwrap();
        let resolution = ParameterResolver::new()
            .resolve_request(
                catalog(),
                &engine,
                "mounting_hole",
                &request(&[("hole_diameter", ParamValue::Number(80.0))]),
            )
            .unwrap();
        assert_eq!(
            resolution.validation_errors,
            vec!["Value 80.0 violates constraint range for parameter 'hole_diameter'"]
        );
        assert_eq!(
            resolution.assignments_used.get("hole_diameter"),
            Some(&ParamValue::Number(10.0))
        );
        assert!(resolution.code.contains("hole_diameter_dim.SetValue(10.0);"));
    }

    #[test]
    fn test_template_error_is_captured() {
        let mut engine = TemplateEngine::new().unwrap();
        engine
            .add_template("spaces/fillet_feature.vba.tera", "{{ missing_value }}")
            .unwrap();
        let resolution = ParameterResolver::new()
            .resolve_request(catalog(), &engine, "fillet_feature", &BTreeMap::new())
            .unwrap();
        assert_eq!(resolution.code, "");
        assert_eq!(resolution.validation_errors.len(), 1);
        assert!(resolution.validation_errors[0].starts_with("Template rendering error: "));
    }
}
