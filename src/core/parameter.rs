//! Parameter model - declarative, self-validating parameter spaces
//!
//! A [`ParameterSpace`] is the design intent: what may vary and within which
//! limits. A [`ParameterAssignment`] binds concrete values to a space, and
//! every value is validated before it is stored.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::value::{format_number, ParamValue};
use crate::core::vocabulary::{ParameterDomain, ParameterType, ValueConstraint};

/// Errors raised by parameter definitions, spaces and assignments
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum ParameterError {
    #[error("Parameter {name}: min_value ({min}) > max_value ({max})")]
    #[diagnostic(code(dint::parameter::invalid_range))]
    InvalidRange { name: String, min: String, max: String },

    #[error("Parameter {name}: discrete constraint requires discrete_values")]
    #[diagnostic(code(dint::parameter::empty_discrete))]
    EmptyDiscreteSet { name: String },

    #[error("Parameter '{name}' not found")]
    #[diagnostic(code(dint::parameter::not_found))]
    NotFound { name: String },

    #[error("Value {value} violates constraint {constraint} for parameter '{name}'")]
    #[diagnostic(code(dint::parameter::violation))]
    ConstraintViolation {
        name: String,
        value: String,
        constraint: ValueConstraint,
    },

    #[error("Value {value} for parameter '{name}' must be numeric ({constraint})")]
    #[diagnostic(code(dint::parameter::not_numeric))]
    NotNumeric {
        name: String,
        value: String,
        constraint: ValueConstraint,
    },

    #[error("Parameter '{name}' is already defined in space '{space}'")]
    #[diagnostic(
        code(dint::parameter::duplicate),
        help("Parameter names are unique keys; rename one of the definitions.")
    )]
    Duplicate { name: String, space: String },

    #[error("Parameter space '{name}' not found. Available spaces: {available}")]
    #[diagnostic(
        code(dint::parameter::space_not_found),
        help("Run `dint params list` to see the registered spaces.")
    )]
    SpaceNotFound { name: String, available: String },
}

fn default_unit() -> String {
    "mm".to_string()
}

fn default_precision() -> u32 {
    3
}

/// Definition of one parameter in a design space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    /// Unique key within the owning space
    pub name: String,

    #[serde(rename = "type")]
    pub parameter_type: ParameterType,

    pub domain: ParameterDomain,

    pub default_value: ParamValue,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discrete_values: Option<Vec<ParamValue>>,

    #[serde(default)]
    pub constraint: ValueConstraint,

    /// Units (mm, degrees, unitless, ...)
    #[serde(default = "default_unit")]
    pub unit: String,

    /// Decimal places
    #[serde(default = "default_precision")]
    pub precision: u32,

    /// Upper bilateral tolerance (e.g. 0.1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance_plus: Option<f64>,

    /// Lower bilateral tolerance, signed (e.g. -0.1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance_minus: Option<f64>,

    #[serde(default)]
    pub description: String,

    /// Where the value lives in the model (e.g. "Hole.Sketch1.Diameter1")
    #[serde(default)]
    pub source: String,

    /// Parameters this one depends on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependent_on: Vec<String>,

    /// Features or parameters this one drives
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affects: Vec<String>,
}

impl ParameterDefinition {
    /// Start building a definition with the required fields
    pub fn builder(
        name: impl Into<String>,
        parameter_type: ParameterType,
        domain: ParameterDomain,
        default_value: impl Into<ParamValue>,
    ) -> ParameterBuilder {
        ParameterBuilder {
            def: ParameterDefinition {
                name: name.into(),
                parameter_type,
                domain,
                default_value: default_value.into(),
                min_value: None,
                max_value: None,
                discrete_values: None,
                constraint: ValueConstraint::Range,
                unit: default_unit(),
                precision: default_precision(),
                tolerance_plus: None,
                tolerance_minus: None,
                description: String::new(),
                source: String::new(),
                dependent_on: Vec::new(),
                affects: Vec::new(),
            },
        }
    }

    /// Check the definition's own invariants
    pub fn check(&self) -> Result<(), ParameterError> {
        match self.constraint {
            ValueConstraint::Range => {
                if let (Some(min), Some(max)) = (self.min_value, self.max_value) {
                    if min > max {
                        return Err(ParameterError::InvalidRange {
                            name: self.name.clone(),
                            min: format_number(min),
                            max: format_number(max),
                        });
                    }
                }
            }
            ValueConstraint::Discrete => {
                if self.discrete_values.as_ref().map_or(true, |v| v.is_empty()) {
                    return Err(ParameterError::EmptyDiscreteSet {
                        name: self.name.clone(),
                    });
                }
            }
            ValueConstraint::Positive | ValueConstraint::NonNegative | ValueConstraint::Expressed => {}
        }
        Ok(())
    }

    /// Check a value against this definition's constraint
    ///
    /// Pure: the same value always produces the same answer.
    pub fn validate_value(&self, value: &ParamValue) -> Result<(), ParameterError> {
        let violation = || ParameterError::ConstraintViolation {
            name: self.name.clone(),
            value: value.to_string(),
            constraint: self.constraint,
        };
        let numeric = || {
            value.as_f64().ok_or_else(|| ParameterError::NotNumeric {
                name: self.name.clone(),
                value: value.to_string(),
                constraint: self.constraint,
            })
        };

        match self.constraint {
            ValueConstraint::Positive => {
                if numeric()? > 0.0 {
                    Ok(())
                } else {
                    Err(violation())
                }
            }
            ValueConstraint::NonNegative => {
                if numeric()? >= 0.0 {
                    Ok(())
                } else {
                    Err(violation())
                }
            }
            ValueConstraint::Range => {
                if self.min_value.is_none() && self.max_value.is_none() {
                    return Ok(());
                }
                let v = numeric()?;
                if self.min_value.is_some_and(|min| v < min) {
                    return Err(violation());
                }
                if self.max_value.is_some_and(|max| v > max) {
                    return Err(violation());
                }
                Ok(())
            }
            ValueConstraint::Discrete => {
                let allowed = self.discrete_values.as_deref().unwrap_or_default();
                if allowed.contains(value) {
                    Ok(())
                } else {
                    Err(violation())
                }
            }
            // Expressions are opaque placeholders; nothing evaluates them.
            ValueConstraint::Expressed => Ok(()),
        }
    }

    /// Whether both bilateral tolerances are declared
    pub fn has_bilateral_tolerance(&self) -> bool {
        self.tolerance_plus.is_some() && self.tolerance_minus.is_some()
    }

    /// Human-readable domain of accepted values, e.g. `[5.0, 50.0]`
    pub fn bounds_label(&self) -> String {
        match self.constraint {
            ValueConstraint::Discrete => {
                let values: Vec<String> = self
                    .discrete_values
                    .as_deref()
                    .unwrap_or_default()
                    .iter()
                    .map(|v| v.to_string())
                    .collect();
                format!("{{{}}}", values.join(", "))
            }
            ValueConstraint::Positive => "(0, inf)".to_string(),
            ValueConstraint::NonNegative => "[0, inf)".to_string(),
            ValueConstraint::Expressed => "expression".to_string(),
            ValueConstraint::Range => {
                let min = self.min_value.map(format_number).unwrap_or_else(|| "-".to_string());
                let max = self.max_value.map(format_number).unwrap_or_else(|| "-".to_string());
                format!("[{}, {}]", min, max)
            }
        }
    }
}

/// Builder for [`ParameterDefinition`]; `build` enforces the invariants
#[derive(Debug, Clone)]
pub struct ParameterBuilder {
    def: ParameterDefinition,
}

impl ParameterBuilder {
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.def.min_value = Some(min);
        self.def.max_value = Some(max);
        self.def.constraint = ValueConstraint::Range;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.def.min_value = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.def.max_value = Some(max);
        self
    }

    pub fn discrete(mut self, values: Vec<ParamValue>) -> Self {
        self.def.discrete_values = Some(values);
        self.def.constraint = ValueConstraint::Discrete;
        self
    }

    pub fn constraint(mut self, constraint: ValueConstraint) -> Self {
        self.def.constraint = constraint;
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.def.unit = unit.into();
        self
    }

    pub fn precision(mut self, precision: u32) -> Self {
        self.def.precision = precision;
        self
    }

    pub fn tolerance(mut self, plus: f64, minus: f64) -> Self {
        self.def.tolerance_plus = Some(plus);
        self.def.tolerance_minus = Some(minus);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.def.description = description.into();
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.def.source = source.into();
        self
    }

    pub fn depends_on<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.def.dependent_on = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn affects<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.def.affects = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Result<ParameterDefinition, ParameterError> {
        self.def.check()?;
        Ok(self.def)
    }
}

/// The complete parameter space of a design
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpace {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Definitions in declaration order
    #[serde(default)]
    parameters: Vec<ParameterDefinition>,
}

impl ParameterSpace {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    /// Add a definition; duplicate names and invalid definitions are rejected
    pub fn add_parameter(&mut self, def: ParameterDefinition) -> Result<(), ParameterError> {
        def.check()?;
        if self.get_parameter(&def.name).is_some() {
            return Err(ParameterError::Duplicate {
                name: def.name,
                space: self.name.clone(),
            });
        }
        self.parameters.push(def);
        Ok(())
    }

    /// Chaining form of [`add_parameter`](Self::add_parameter)
    pub fn with_parameter(mut self, def: ParameterDefinition) -> Result<Self, ParameterError> {
        self.add_parameter(def)?;
        Ok(self)
    }

    /// Re-check every definition; used after deserializing a space
    pub fn check(&self) -> Result<(), ParameterError> {
        let mut seen = HashSet::new();
        for def in &self.parameters {
            def.check()?;
            if !seen.insert(def.name.as_str()) {
                return Err(ParameterError::Duplicate {
                    name: def.name.clone(),
                    space: self.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn get_parameter(&self, name: &str) -> Option<&ParameterDefinition> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn parameters(&self) -> &[ParameterDefinition] {
        &self.parameters
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn parameters_by_domain(&self, domain: ParameterDomain) -> Vec<&ParameterDefinition> {
        self.parameters.iter().filter(|p| p.domain == domain).collect()
    }

    pub fn parameters_by_type(&self, parameter_type: ParameterType) -> Vec<&ParameterDefinition> {
        self.parameters
            .iter()
            .filter(|p| p.parameter_type == parameter_type)
            .collect()
    }

    /// Declared defaults keyed by parameter name
    pub fn defaults(&self) -> BTreeMap<String, ParamValue> {
        self.parameters
            .iter()
            .map(|p| (p.name.clone(), p.default_value.clone()))
            .collect()
    }

    /// Parameter name -> names it depends on
    pub fn dependency_graph(&self) -> BTreeMap<String, Vec<String>> {
        self.parameters
            .iter()
            .map(|p| (p.name.clone(), p.dependent_on.clone()))
            .collect()
    }

    /// Parameter name -> parameters that declare a dependency on it
    pub fn dependents_graph(&self) -> BTreeMap<String, Vec<String>> {
        let mut graph: BTreeMap<String, Vec<String>> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), Vec::new()))
            .collect();
        for param in &self.parameters {
            for dep in &param.dependent_on {
                graph.entry(dep.clone()).or_default().push(param.name.clone());
            }
        }
        graph
    }

    /// Find one dependency cycle, if any, as the list of names along it
    ///
    /// Cycles are reported, not rejected; the graph is best-effort metadata.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            Active,
            Done,
        }

        fn visit<'a>(
            node: &'a str,
            graph: &'a BTreeMap<String, Vec<String>>,
            marks: &mut BTreeMap<&'a str, Mark>,
            path: &mut Vec<&'a str>,
        ) -> Option<Vec<String>> {
            marks.insert(node, Mark::Active);
            path.push(node);
            for next in graph.get(node).into_iter().flatten() {
                match marks.get(next.as_str()).copied().unwrap_or(Mark::Unvisited) {
                    Mark::Active => {
                        let start = path.iter().position(|n| *n == next.as_str()).unwrap_or(0);
                        let mut cycle: Vec<String> =
                            path[start..].iter().map(|n| n.to_string()).collect();
                        cycle.push(next.clone());
                        return Some(cycle);
                    }
                    Mark::Unvisited => {
                        if let Some(cycle) = visit(next, graph, marks, path) {
                            return Some(cycle);
                        }
                    }
                    Mark::Done => {}
                }
            }
            path.pop();
            marks.insert(node, Mark::Done);
            None
        }

        let graph = self.dependency_graph();
        let mut marks: BTreeMap<&str, Mark> = BTreeMap::new();
        for name in graph.keys() {
            if marks.get(name.as_str()).copied().unwrap_or(Mark::Unvisited) == Mark::Unvisited {
                let mut path = Vec::new();
                if let Some(cycle) = visit(name, &graph, &mut marks, &mut path) {
                    warn!(space = %self.name, cycle = ?cycle, "dependency cycle in parameter space");
                    return Some(cycle);
                }
            }
        }
        None
    }

    /// Validate a prospective assignment without storing anything
    pub fn validate_assignment(&self, name: &str, value: &ParamValue) -> Result<(), ParameterError> {
        let param = self
            .get_parameter(name)
            .ok_or_else(|| ParameterError::NotFound {
                name: name.to_string(),
            })?;
        param.validate_value(value)
    }
}

/// Concrete values bound to a parameter space
#[derive(Debug, Clone)]
pub struct ParameterAssignment<'s> {
    space: &'s ParameterSpace,
    values: BTreeMap<String, ParamValue>,
}

impl<'s> ParameterAssignment<'s> {
    pub fn new(space: &'s ParameterSpace) -> Self {
        Self {
            space,
            values: BTreeMap::new(),
        }
    }

    /// Seed every declared default through the validating setter
    pub fn with_defaults(space: &'s ParameterSpace) -> Result<Self, ParameterError> {
        let mut assignment = Self::new(space);
        for param in space.parameters() {
            assignment.set(&param.name, param.default_value.clone())?;
        }
        Ok(assignment)
    }

    pub fn space(&self) -> &'s ParameterSpace {
        self.space
    }

    /// Set a value; on error the assignment is left untouched
    pub fn set(&mut self, name: &str, value: impl Into<ParamValue>) -> Result<(), ParameterError> {
        let value = value.into();
        self.space.validate_assignment(name, &value)?;
        debug!(parameter = name, value = %value, "assigned parameter");
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn values(&self) -> &BTreeMap<String, ParamValue> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Export as a C# `Dictionary<string, object>` initializer
    pub fn to_csharp_dict(&self) -> String {
        let items: Vec<String> = self
            .values
            .iter()
            .map(|(name, value)| {
                let literal = match value {
                    ParamValue::Text(s) => format!("\"{}\"", s.replace('"', "\\\"")),
                    ParamValue::Bool(b) => b.to_string(),
                    ParamValue::Number(n) => format_number(*n),
                };
                format!("    [\"{}\"] = {}", name, literal)
            })
            .collect();
        format!("new Dictionary<string, object>\n{{\n{}\n}}", items.join(",\n"))
    }
}
