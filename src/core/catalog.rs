//! Space catalog - registry of named parameter spaces
//!
//! The built-in spaces ship embedded in the binary; more can be loaded from
//! YAML documents of the form `spaces: [...]`.

use miette::Diagnostic;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

use crate::core::parameter::{ParameterDefinition, ParameterError, ParameterSpace};
use crate::core::value::{format_number, ParamValue};

#[derive(Embed)]
#[folder = "catalog/"]
struct EmbeddedCatalog;

const BUILTIN_FILE: &str = "builtin.yaml";

/// Errors raised while loading or extending a catalog
#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("Failed to read {path}: {source}")]
    #[diagnostic(code(dint::catalog::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog document {origin}: {message}")]
    #[diagnostic(
        code(dint::catalog::parse),
        help("A catalog file is a YAML mapping with a `spaces:` list.")
    )]
    Parse { origin: String, message: String },

    #[error("Parameter space '{0}' is defined more than once")]
    #[diagnostic(code(dint::catalog::duplicate))]
    DuplicateSpace(String),

    #[error("In space '{space}': {source}")]
    #[diagnostic(code(dint::catalog::parameter))]
    Parameter {
        space: String,
        #[source]
        source: ParameterError,
    },

    #[error("Built-in catalog is unavailable: {0}")]
    #[diagnostic(code(dint::catalog::builtin))]
    Builtin(String),
}

/// Rule that computes a helper value from an assigned parameter
///
/// Derived values are template inputs only. They are rendered straight to
/// their textual form and never echoed back as assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum DerivedField {
    /// `to = from / 1000`
    MillimetresToMetres { from: String, to: String },
    /// `to = radians(from)`
    DegreesToRadians { from: String, to: String },
    /// `True` when the source is non-zero
    NonZeroFlag { from: String, to: String },
    /// `True` when the source equals a fixed value
    EqualsFlag {
        from: String,
        equals: ParamValue,
        to: String,
    },
    /// `1` or `0` from a boolean source
    BoolToInt { from: String, to: String },
}

impl DerivedField {
    pub fn source(&self) -> &str {
        match self {
            DerivedField::MillimetresToMetres { from, .. }
            | DerivedField::DegreesToRadians { from, .. }
            | DerivedField::NonZeroFlag { from, .. }
            | DerivedField::EqualsFlag { from, .. }
            | DerivedField::BoolToInt { from, .. } => from,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            DerivedField::MillimetresToMetres { to, .. }
            | DerivedField::DegreesToRadians { to, .. }
            | DerivedField::NonZeroFlag { to, .. }
            | DerivedField::EqualsFlag { to, .. }
            | DerivedField::BoolToInt { to, .. } => to,
        }
    }

    /// Compute the rendered helper value, or `None` if the source is
    /// missing or of the wrong type
    pub fn evaluate(&self, values: &BTreeMap<String, ParamValue>) -> Option<String> {
        let source = values.get(self.source())?;
        let flag = |b: bool| if b { "True" } else { "False" }.to_string();
        match self {
            DerivedField::MillimetresToMetres { .. } => {
                source.as_f64().map(|mm| format_number(mm / 1000.0))
            }
            DerivedField::DegreesToRadians { .. } => {
                source.as_f64().map(|deg| format_number(deg.to_radians()))
            }
            DerivedField::NonZeroFlag { .. } => source.as_f64().map(|n| flag(n != 0.0)),
            DerivedField::EqualsFlag { equals, .. } => Some(flag(source == equals)),
            DerivedField::BoolToInt { .. } => source
                .as_bool()
                .map(|b| if b { "1" } else { "0" }.to_string()),
        }
    }
}

/// A parameter space plus how to resolve it
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub space: ParameterSpace,
    /// Name of the tera template that renders this space, if any
    pub template: Option<String>,
    pub derived: Vec<DerivedField>,
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    spaces: Vec<SpaceDocument>,
}

#[derive(Debug, Deserialize)]
struct SpaceDocument {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    parameters: Vec<ParameterDefinition>,
    #[serde(default)]
    template: Option<String>,
    #[serde(default)]
    derived: Vec<DerivedField>,
}

impl SpaceDocument {
    fn into_entry(self) -> Result<CatalogEntry, CatalogError> {
        let mut space = ParameterSpace::new(self.name, self.description);
        for def in self.parameters {
            space
                .add_parameter(def)
                .map_err(|source| CatalogError::Parameter {
                    space: space.name.clone(),
                    source,
                })?;
        }
        Ok(CatalogEntry {
            space,
            template: self.template,
            derived: self.derived,
        })
    }
}

/// Ordered registry of parameter spaces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpaceCatalog {
    entries: Vec<CatalogEntry>,
}

static BUILTIN: LazyLock<Result<SpaceCatalog, String>> = LazyLock::new(|| {
    let file = EmbeddedCatalog::get(BUILTIN_FILE).ok_or_else(|| format!("missing {}", BUILTIN_FILE))?;
    let contents = std::str::from_utf8(&file.data).map_err(|e| e.to_string())?;
    SpaceCatalog::from_yaml_str(contents, BUILTIN_FILE).map_err(|e| e.to_string())
});

impl SpaceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide built-in spaces
    pub fn builtin() -> Result<&'static SpaceCatalog, CatalogError> {
        BUILTIN
            .as_ref()
            .map_err(|message| CatalogError::Builtin(message.clone()))
    }

    /// Parse a catalog document; `origin` names it in error messages
    pub fn from_yaml_str(contents: &str, origin: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument =
            serde_yml::from_str(contents).map_err(|e| CatalogError::Parse {
                origin: origin.to_string(),
                message: e.to_string(),
            })?;

        let mut catalog = SpaceCatalog::new();
        for space in doc.spaces {
            catalog.insert(space.into_entry()?)?;
        }
        Ok(catalog)
    }

    /// Load a catalog document from disk
    pub fn load_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_yaml_str(&contents, &path.display().to_string())?;
        debug!(path = %path.display(), spaces = catalog.len(), "loaded catalog file");
        Ok(catalog)
    }

    /// Register an entry; space names must be unique
    pub fn insert(&mut self, entry: CatalogEntry) -> Result<(), CatalogError> {
        if self.get(&entry.space.name).is_some() {
            return Err(CatalogError::DuplicateSpace(entry.space.name));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Move every entry of `other` into this catalog
    pub fn merge(&mut self, other: SpaceCatalog) -> Result<(), CatalogError> {
        for entry in other.entries {
            self.insert(entry)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.space.name == name)
    }

    pub fn get_space(&self, name: &str) -> Result<&ParameterSpace, ParameterError> {
        self.get(name)
            .map(|e| &e.space)
            .ok_or_else(|| self.space_not_found(name))
    }

    /// Space names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.iter().map(|e| e.space.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn space_not_found(&self, name: &str) -> ParameterError {
        ParameterError::SpaceNotFound {
            name: name.to_string(),
            available: self.names().join(", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vocabulary::ParameterDomain;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = SpaceCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 8);
        assert_eq!(
            catalog.names(),
            vec![
                "chamfer_feature",
                "circle_sketch",
                "cut_extrude",
                "extrusion_depth",
                "fillet_feature",
                "mounting_hole",
                "rectangle_sketch",
                "revolve_boss",
            ]
        );
    }

    #[test]
    fn test_mounting_hole_definition() {
        let catalog = SpaceCatalog::builtin().unwrap();
        let entry = catalog.get("mounting_hole").unwrap();
        assert!(entry.template.is_none());

        let space = &entry.space;
        assert_eq!(space.len(), 5);
        assert_eq!(space.parameters_by_domain(ParameterDomain::Sketch).len(), 3);

        let diameter = space.get_parameter("hole_diameter").unwrap();
        assert_eq!(diameter.source, "Hole.Sketch1.Diameter1");
        assert_eq!(diameter.tolerance_minus, Some(-0.1));
        assert_eq!(diameter.unit, "mm");

        let tol = space.get_parameter("position_tolerance").unwrap();
        assert_eq!(tol.dependent_on, vec!["hole_x_position", "hole_y_position"]);
        assert!(space.find_cycle().is_none());
    }

    #[test]
    fn test_templated_entries_name_their_template() {
        let catalog = SpaceCatalog::builtin().unwrap();
        for entry in catalog.iter().filter(|e| e.space.name != "mounting_hole") {
            let template = entry.template.as_deref().unwrap();
            assert_eq!(template, format!("spaces/{}.vba.tera", entry.space.name));
        }
    }

    #[test]
    fn test_derived_fields() {
        let mut values = BTreeMap::new();
        values.insert("depth_mm".to_string(), ParamValue::Number(25.0));
        values.insert("draft".to_string(), ParamValue::Number(0.0));
        values.insert("direction".to_string(), ParamValue::from("single"));
        values.insert("through_all".to_string(), ParamValue::Bool(true));

        let m = DerivedField::MillimetresToMetres {
            from: "depth_mm".into(),
            to: "depth_m".into(),
        };
        assert_eq!(m.evaluate(&values).as_deref(), Some("0.025"));

        let flag = DerivedField::NonZeroFlag {
            from: "draft".into(),
            to: "draft_on".into(),
        };
        assert_eq!(flag.evaluate(&values).as_deref(), Some("False"));

        let sd = DerivedField::EqualsFlag {
            from: "direction".into(),
            equals: "single".into(),
            to: "sd".into(),
        };
        assert_eq!(sd.evaluate(&values).as_deref(), Some("True"));

        let end = DerivedField::BoolToInt {
            from: "through_all".into(),
            to: "end_cond".into(),
        };
        assert_eq!(end.evaluate(&values).as_deref(), Some("1"));

        let rad = DerivedField::DegreesToRadians {
            from: "missing".into(),
            to: "x".into(),
        };
        assert_eq!(rad.evaluate(&values), None);
    }

    #[test]
    fn test_load_rejects_duplicate_space() {
        let yaml = r#"
spaces:
  - name: bracket
    parameters: []
  - name: bracket
    parameters: []
"#;
        let err = SpaceCatalog::from_yaml_str(yaml, "test").unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateSpace(name) if name == "bracket"));
    }

    #[test]
    fn test_load_rechecks_definitions() {
        let yaml = r#"
spaces:
  - name: bracket
    parameters:
      - name: width
        type: length
        domain: sketch
        default_value: 10
        min_value: 20
        max_value: 5
"#;
        let err = SpaceCatalog::from_yaml_str(yaml, "test").unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Parameter {
                source: ParameterError::InvalidRange { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_load_file_and_merge() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extra.yaml");
        std::fs::write(
            &path,
            "spaces:\n  - name: bracket\n    description: L bracket\n    parameters:\n      - name: width\n        type: length\n        domain: sketch\n        default_value: 40.0\n",
        )
        .unwrap();

        let extra = SpaceCatalog::load_file(&path).unwrap();
        let mut catalog = SpaceCatalog::builtin().unwrap().clone();
        catalog.merge(extra).unwrap();
        assert!(catalog.get("bracket").is_some());

        let again = SpaceCatalog::load_file(&path).unwrap();
        assert!(catalog.merge(again).is_err());
    }

    #[test]
    fn test_space_not_found_lists_available() {
        let catalog = SpaceCatalog::builtin().unwrap();
        let err = catalog.get_space("nonexistent").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Parameter space 'nonexistent' not found. Available spaces: "));
        assert!(message.contains("mounting_hole"));
    }
}
