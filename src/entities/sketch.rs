//! Sketch entity - geometric and dimensional sketch constraints

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::value::format_number;
use crate::core::vocabulary::{ConstraintKind, EntityKind};

/// A named 2-D sketch entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SketchEntity {
    pub kind: EntityKind,
    pub name: String,
}

impl SketchEntity {
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl fmt::Display for SketchEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.name)
    }
}

/// A single geometric relation or dimension between sketch entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchConstraint {
    pub kind: ConstraintKind,

    pub entity1: SketchEntity,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity2: Option<SketchEntity>,

    /// Reference geometry such as an axis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_entity: Option<String>,

    /// Value of a dimensional constraint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl SketchConstraint {
    pub fn new(kind: ConstraintKind, entity1: SketchEntity) -> Self {
        Self {
            kind,
            entity1,
            entity2: None,
            reference_entity: None,
            value: None,
        }
    }

    pub fn with_entity2(mut self, entity: SketchEntity) -> Self {
        self.entity2 = Some(entity);
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference_entity = Some(reference.into());
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn is_dimensional(&self) -> bool {
        self.kind.dimension().is_some()
    }
}

impl fmt::Display for SketchConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensional() {
            write!(f, "{} of {}", self.kind, self.entity1)?;
            if let Some(other) = &self.entity2 {
                write!(f, " to {}", other)?;
            }
            if let Some(value) = self.value {
                write!(f, " = {}", format_number(value))?;
            }
            return Ok(());
        }
        match &self.entity2 {
            Some(other) => write!(f, "{} {} {}", self.entity1, self.kind, other),
            None => write!(f, "{} is {}", self.entity1, self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_display() {
        let c = SketchConstraint::new(ConstraintKind::Horizontal, SketchEntity::new(EntityKind::Line, "L1"));
        assert_eq!(c.to_string(), "line L1 is horizontal");

        let c = SketchConstraint::new(ConstraintKind::Perpendicular, SketchEntity::new(EntityKind::Line, "AB"))
            .with_entity2(SketchEntity::new(EntityKind::Line, "CD"));
        assert_eq!(c.to_string(), "line AB perpendicular line CD");

        let c = SketchConstraint::new(ConstraintKind::Radius, SketchEntity::new(EntityKind::Arc, "A1"))
            .with_value(10.0);
        assert_eq!(c.to_string(), "radius of arc A1 = 10.0");
        assert!(c.is_dimensional());
    }
}
