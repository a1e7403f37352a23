//! GD&T entity - feature control frame specifications

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::value::format_number;
use crate::core::vocabulary::{AppliesTo, Characteristic, MaterialModifier, ZoneShape};

/// A single datum reference in a feature control frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatumReference {
    /// Datum letter (A-Z)
    pub label: char,

    /// Material condition on the datum; `None` is RFS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<MaterialModifier>,

    /// Slot in the datum reference frame (1 = primary)
    pub order: u8,
}

impl fmt::Display for DatumReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.modifier {
            Some(MaterialModifier::Mmc) => write!(f, "{}(M)", self.label),
            Some(MaterialModifier::Lmc) => write!(f, "{}(L)", self.label),
            None => write!(f, "{}", self.label),
        }
    }
}

/// Complete feature control frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GdtSpecification {
    pub characteristic: Characteristic,

    /// Tolerance zone width
    pub tolerance_value: f64,

    #[serde(default)]
    pub tolerance_zone_shape: ZoneShape,

    /// Datum references in frame order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub datum_references: Vec<DatumReference>,

    /// Modifier on the tolerance; `None` is RFS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_modifier: Option<MaterialModifier>,

    #[serde(default)]
    pub applies_to: AppliesTo,

    /// Two-row composite frame
    #[serde(default)]
    pub composite: bool,

    /// Second-row tolerance of a composite frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refinement_tolerance: Option<f64>,
}

impl GdtSpecification {
    pub fn new(characteristic: Characteristic, tolerance_value: f64) -> Self {
        Self {
            characteristic,
            tolerance_value,
            tolerance_zone_shape: ZoneShape::Total,
            datum_references: Vec::new(),
            material_modifier: None,
            applies_to: AppliesTo::Surface,
            composite: false,
            refinement_tolerance: None,
        }
    }

    /// Set the zone shape and the feature type it implies
    pub fn with_zone(mut self, shape: ZoneShape) -> Self {
        self.tolerance_zone_shape = shape;
        self.applies_to = AppliesTo::from(shape);
        self
    }

    pub fn with_modifier(mut self, modifier: Option<MaterialModifier>) -> Self {
        self.material_modifier = modifier;
        self
    }

    /// Append a datum in the next free slot
    pub fn with_datum(mut self, label: char, modifier: Option<MaterialModifier>) -> Self {
        let order = u8::try_from(self.datum_references.len() + 1).unwrap_or(u8::MAX);
        self.datum_references.push(DatumReference {
            label: label.to_ascii_uppercase(),
            modifier,
            order,
        });
        self
    }

    /// Make this a composite frame with the given refinement row
    pub fn with_composite(mut self, refinement: f64) -> Self {
        self.composite = true;
        self.refinement_tolerance = Some(refinement);
        self
    }

    pub fn datum_labels(&self) -> Vec<String> {
        self.datum_references.iter().map(|d| d.label.to_string()).collect()
    }
}

impl fmt::Display for GdtSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} |", self.characteristic)?;
        if self.tolerance_zone_shape == ZoneShape::Cylindrical {
            write!(f, " DIA")?;
        }
        write!(f, " {}", format_number(self.tolerance_value))?;
        if let Some(modifier) = self.material_modifier {
            write!(f, " {}", modifier)?;
        }
        for datum in &self.datum_references {
            write!(f, " | {}", datum)?;
        }
        if let (true, Some(refinement)) = (self.composite, self.refinement_tolerance) {
            write!(f, " / {}", format_number(refinement))?;
        }
        Ok(())
    }
}
