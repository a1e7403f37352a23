//! Domain vocabulary - closed sets of parameter, GD&T and sketch kinds
//!
//! Every lookup table that maps a kind onto target-platform text lives here
//! as an exhaustive `match`, so adding a variant is a compile error until
//! each table handles it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a vocabulary word is not recognized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VocabularyError {
    #[error("unknown parameter type: '{0}'")]
    ParameterType(String),

    #[error("unknown parameter domain: '{0}' (valid: sketch, feature, assembly, gdt, design_table)")]
    Domain(String),

    #[error("unknown value constraint: '{0}' (valid: positive, non_negative, range, discrete, expressed)")]
    ValueConstraint(String),

    #[error("Unrecognized characteristic: '{0}'.")]
    Characteristic(String),

    #[error("unknown material modifier: '{0}' (valid: MMC, LMC, RFS)")]
    MaterialModifier(String),

    #[error("unknown tolerance zone shape: '{0}' (valid: cylindrical, total)")]
    ZoneShape(String),

    #[error("unknown sketch constraint type: '{0}'")]
    ConstraintKind(String),

    #[error("unknown dimension type: '{0}' (valid: distance, angle, radius, diameter)")]
    DimensionKind(String),

    #[error("unknown sketch entity type: '{0}' (valid: line, arc, circle, point, spline)")]
    EntityKind(String),
}

// ============================================================================
// Parameter vocabulary
// ============================================================================

/// Kind of quantity a parameter describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    // Sketch dimensions
    Length,
    Angle,
    Radius,
    Diameter,

    // Sketch relations
    Coincident,
    Perpendicular,
    Parallel,
    Concentric,
    Equal,
    Tangent,
    Symmetric,

    // Feature selections
    FaceSelection,
    EdgeSelection,
    VertexSelection,
    SketchSelection,

    // Feature operations
    PadDepth,
    PocketDepth,
    PatternCount,
    PatternSpacing,
    DraftAngle,
    TaperAngle,

    // GD&T
    ToleranceValue,
    DatumReference,
    MaterialModifier,
    GeometricCharacteristic,

    // Assembly
    MateCondition,
    DegreesOfFreedom,

    // Design table
    UserVariable,
    Equation,

    Expression,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::Length => "length",
            ParameterType::Angle => "angle",
            ParameterType::Radius => "radius",
            ParameterType::Diameter => "diameter",
            ParameterType::Coincident => "coincident",
            ParameterType::Perpendicular => "perpendicular",
            ParameterType::Parallel => "parallel",
            ParameterType::Concentric => "concentric",
            ParameterType::Equal => "equal",
            ParameterType::Tangent => "tangent",
            ParameterType::Symmetric => "symmetric",
            ParameterType::FaceSelection => "face_selection",
            ParameterType::EdgeSelection => "edge_selection",
            ParameterType::VertexSelection => "vertex_selection",
            ParameterType::SketchSelection => "sketch_selection",
            ParameterType::PadDepth => "pad_depth",
            ParameterType::PocketDepth => "pocket_depth",
            ParameterType::PatternCount => "pattern_count",
            ParameterType::PatternSpacing => "pattern_spacing",
            ParameterType::DraftAngle => "draft_angle",
            ParameterType::TaperAngle => "taper_angle",
            ParameterType::ToleranceValue => "tolerance_value",
            ParameterType::DatumReference => "datum_reference",
            ParameterType::MaterialModifier => "material_modifier",
            ParameterType::GeometricCharacteristic => "geometric_characteristic",
            ParameterType::MateCondition => "mate_condition",
            ParameterType::DegreesOfFreedom => "degrees_of_freedom",
            ParameterType::UserVariable => "user_variable",
            ParameterType::Equation => "equation",
            ParameterType::Expression => "expression",
        }
    }

    pub fn all() -> &'static [ParameterType] {
        &[
            ParameterType::Length,
            ParameterType::Angle,
            ParameterType::Radius,
            ParameterType::Diameter,
            ParameterType::Coincident,
            ParameterType::Perpendicular,
            ParameterType::Parallel,
            ParameterType::Concentric,
            ParameterType::Equal,
            ParameterType::Tangent,
            ParameterType::Symmetric,
            ParameterType::FaceSelection,
            ParameterType::EdgeSelection,
            ParameterType::VertexSelection,
            ParameterType::SketchSelection,
            ParameterType::PadDepth,
            ParameterType::PocketDepth,
            ParameterType::PatternCount,
            ParameterType::PatternSpacing,
            ParameterType::DraftAngle,
            ParameterType::TaperAngle,
            ParameterType::ToleranceValue,
            ParameterType::DatumReference,
            ParameterType::MaterialModifier,
            ParameterType::GeometricCharacteristic,
            ParameterType::MateCondition,
            ParameterType::DegreesOfFreedom,
            ParameterType::UserVariable,
            ParameterType::Equation,
            ParameterType::Expression,
        ]
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ParameterType {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::all()
            .iter()
            .find(|t| t.as_str() == wanted)
            .copied()
            .ok_or_else(|| VocabularyError::ParameterType(s.to_string()))
    }
}

/// Which part of the design a parameter belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterDomain {
    Sketch,
    Feature,
    Assembly,
    Gdt,
    DesignTable,
}

impl ParameterDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterDomain::Sketch => "sketch",
            ParameterDomain::Feature => "feature",
            ParameterDomain::Assembly => "assembly",
            ParameterDomain::Gdt => "gdt",
            ParameterDomain::DesignTable => "design_table",
        }
    }
}

impl fmt::Display for ParameterDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ParameterDomain {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sketch" => Ok(ParameterDomain::Sketch),
            "feature" => Ok(ParameterDomain::Feature),
            "assembly" => Ok(ParameterDomain::Assembly),
            "gdt" => Ok(ParameterDomain::Gdt),
            "design_table" => Ok(ParameterDomain::DesignTable),
            _ => Err(VocabularyError::Domain(s.to_string())),
        }
    }
}

/// How a parameter's value is constrained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueConstraint {
    /// Strictly greater than zero
    Positive,
    /// Zero or greater
    NonNegative,
    /// Between optional min/max bounds
    #[default]
    Range,
    /// One of an explicit set of values
    Discrete,
    /// Defined by an expression; never evaluated
    Expressed,
}

impl ValueConstraint {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueConstraint::Positive => "positive",
            ValueConstraint::NonNegative => "non_negative",
            ValueConstraint::Range => "range",
            ValueConstraint::Discrete => "discrete",
            ValueConstraint::Expressed => "expressed",
        }
    }
}

impl fmt::Display for ValueConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ValueConstraint {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(ValueConstraint::Positive),
            "non_negative" => Ok(ValueConstraint::NonNegative),
            "range" => Ok(ValueConstraint::Range),
            "discrete" => Ok(ValueConstraint::Discrete),
            "expressed" => Ok(ValueConstraint::Expressed),
            _ => Err(VocabularyError::ValueConstraint(s.to_string())),
        }
    }
}

// ============================================================================
// GD&T vocabulary
// ============================================================================

/// ASME Y14.5 tolerance category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GdtCategory {
    Form,
    Orientation,
    Location,
    Runout,
    Profile,
}

impl fmt::Display for GdtCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GdtCategory::Form => write!(f, "form"),
            GdtCategory::Orientation => write!(f, "orientation"),
            GdtCategory::Location => write!(f, "location"),
            GdtCategory::Runout => write!(f, "runout"),
            GdtCategory::Profile => write!(f, "profile"),
        }
    }
}

/// The 14 geometric characteristics of ASME Y14.5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Characteristic {
    Flatness,
    Straightness,
    Circularity,
    Cylindricity,
    Perpendicularity,
    Parallelism,
    Angularity,
    Position,
    Concentricity,
    Symmetry,
    CircularRunout,
    TotalRunout,
    ProfileOfALine,
    ProfileOfASurface,
}

impl Characteristic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Characteristic::Flatness => "flatness",
            Characteristic::Straightness => "straightness",
            Characteristic::Circularity => "circularity",
            Characteristic::Cylindricity => "cylindricity",
            Characteristic::Perpendicularity => "perpendicularity",
            Characteristic::Parallelism => "parallelism",
            Characteristic::Angularity => "angularity",
            Characteristic::Position => "position",
            Characteristic::Concentricity => "concentricity",
            Characteristic::Symmetry => "symmetry",
            Characteristic::CircularRunout => "circular_runout",
            Characteristic::TotalRunout => "total_runout",
            Characteristic::ProfileOfALine => "profile_of_a_line",
            Characteristic::ProfileOfASurface => "profile_of_a_surface",
        }
    }

    pub fn all() -> &'static [Characteristic] {
        &[
            Characteristic::Flatness,
            Characteristic::Straightness,
            Characteristic::Circularity,
            Characteristic::Cylindricity,
            Characteristic::Perpendicularity,
            Characteristic::Parallelism,
            Characteristic::Angularity,
            Characteristic::Position,
            Characteristic::Concentricity,
            Characteristic::Symmetry,
            Characteristic::CircularRunout,
            Characteristic::TotalRunout,
            Characteristic::ProfileOfALine,
            Characteristic::ProfileOfASurface,
        ]
    }

    pub fn category(&self) -> GdtCategory {
        match self {
            Characteristic::Flatness
            | Characteristic::Straightness
            | Characteristic::Circularity
            | Characteristic::Cylindricity => GdtCategory::Form,
            Characteristic::Perpendicularity
            | Characteristic::Parallelism
            | Characteristic::Angularity => GdtCategory::Orientation,
            Characteristic::Position | Characteristic::Concentricity | Characteristic::Symmetry => {
                GdtCategory::Location
            }
            Characteristic::CircularRunout | Characteristic::TotalRunout => GdtCategory::Runout,
            Characteristic::ProfileOfALine | Characteristic::ProfileOfASurface => {
                GdtCategory::Profile
            }
        }
    }

    /// Concentricity and symmetry are RFS-only characteristics
    pub fn is_rfs_only(&self) -> bool {
        matches!(self, Characteristic::Concentricity | Characteristic::Symmetry)
    }

    /// `swGDTCharacteristic_e` member for this characteristic
    pub fn sw_enum(&self) -> &'static str {
        match self {
            Characteristic::Position => "swGDTCharacteristic_e.swGDTPosition",
            Characteristic::Flatness => "swGDTCharacteristic_e.swGDTFlatness",
            Characteristic::Straightness => "swGDTCharacteristic_e.swGDTStraightness",
            Characteristic::Circularity => "swGDTCharacteristic_e.swGDTCircularity",
            Characteristic::Cylindricity => "swGDTCharacteristic_e.swGDTCylindricity",
            Characteristic::Perpendicularity => "swGDTCharacteristic_e.swGDTPerpendicularity",
            Characteristic::Parallelism => "swGDTCharacteristic_e.swGDTParallelism",
            Characteristic::Angularity => "swGDTCharacteristic_e.swGDTAngularity",
            Characteristic::Concentricity => "swGDTCharacteristic_e.swGDTConcentricity",
            Characteristic::Symmetry => "swGDTCharacteristic_e.swGDTSymmetry",
            Characteristic::CircularRunout => "swGDTCharacteristic_e.swGDTCircularRunout",
            Characteristic::TotalRunout => "swGDTCharacteristic_e.swGDTTotalRunout",
            Characteristic::ProfileOfALine => "swGDTCharacteristic_e.swGDTProfileOfALine",
            Characteristic::ProfileOfASurface => "swGDTCharacteristic_e.swGDTProfileOfASurface",
        }
    }

    /// Resolve a normalized token, accepting the common aliases
    ///
    /// The token is expected to be lowercased with dashes already turned
    /// into underscores.
    pub fn from_token(token: &str) -> Option<Self> {
        let canonical = match token {
            "true_position" | "true position" | "gd&t_position" => "position",
            "perpendicular" => "perpendicularity",
            "parallel" => "parallelism",
            "circular_run_out" => "circular_runout",
            "total_run_out" => "total_runout",
            other => other,
        };
        Self::all().iter().find(|c| c.as_str() == canonical).copied()
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Characteristic {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase().replace('-', "_");
        Self::from_token(&token).ok_or_else(|| VocabularyError::Characteristic(s.to_string()))
    }
}

/// Material condition modifier; absence means RFS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MaterialModifier {
    /// Maximum Material Condition
    Mmc,
    /// Least Material Condition
    Lmc,
}

impl MaterialModifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialModifier::Mmc => "MMC",
            MaterialModifier::Lmc => "LMC",
        }
    }

    /// Parse a modifier word where `RFS` means "no modifier"
    pub fn parse_condition(s: &str) -> Result<Option<Self>, VocabularyError> {
        match s.trim().to_uppercase().as_str() {
            "MMC" | "M" => Ok(Some(MaterialModifier::Mmc)),
            "LMC" | "L" => Ok(Some(MaterialModifier::Lmc)),
            "RFS" | "" => Ok(None),
            _ => Err(VocabularyError::MaterialModifier(s.to_string())),
        }
    }

    /// `swGDTModifyingSymbol_e` member, `None` mapping to the no-symbol entry
    pub fn sw_enum(modifier: Option<Self>) -> &'static str {
        match modifier {
            Some(MaterialModifier::Mmc) => "swGDTModifyingSymbol_e.swGDTModifyingSymbolMMC",
            Some(MaterialModifier::Lmc) => "swGDTModifyingSymbol_e.swGDTModifyingSymbolLMC",
            None => "swGDTModifyingSymbol_e.swGDTModifyingSymbolNone",
        }
    }
}

impl fmt::Display for MaterialModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shape of the tolerance zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneShape {
    /// Diameter symbol present; zone is a cylinder
    Cylindrical,
    /// Two parallel planes/lines
    #[default]
    Total,
}

impl ZoneShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneShape::Cylindrical => "cylindrical",
            ZoneShape::Total => "total",
        }
    }

    pub fn sw_enum(&self) -> &'static str {
        match self {
            ZoneShape::Cylindrical => "swGDTToleranceZoneShape_e.swGDTToleranceZoneDiameter",
            ZoneShape::Total => "swGDTToleranceZoneShape_e.swGDTToleranceZoneLinear",
        }
    }
}

impl fmt::Display for ZoneShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ZoneShape {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cylindrical" | "dia" => Ok(ZoneShape::Cylindrical),
            "total" => Ok(ZoneShape::Total),
            _ => Err(VocabularyError::ZoneShape(s.to_string())),
        }
    }
}

/// Feature type a tolerance applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppliesTo {
    Axis,
    #[default]
    Surface,
}

impl From<ZoneShape> for AppliesTo {
    fn from(shape: ZoneShape) -> Self {
        match shape {
            ZoneShape::Cylindrical => AppliesTo::Axis,
            ZoneShape::Total => AppliesTo::Surface,
        }
    }
}

impl fmt::Display for AppliesTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppliesTo::Axis => write!(f, "axis"),
            AppliesTo::Surface => write!(f, "surface"),
        }
    }
}

// ============================================================================
// Sketch vocabulary
// ============================================================================

/// Dimensional constraint kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionKind {
    Distance,
    Angle,
    Radius,
    Diameter,
}

impl DimensionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DimensionKind::Distance => "distance",
            DimensionKind::Angle => "angle",
            DimensionKind::Radius => "radius",
            DimensionKind::Diameter => "diameter",
        }
    }

    /// ModelDoc method that creates this kind of dimension
    pub fn sw_method(&self) -> &'static str {
        match self {
            DimensionKind::Distance => "AddDimension2",
            DimensionKind::Angle => "AddAngularDimension2",
            DimensionKind::Radius => "AddRadialDimension2",
            DimensionKind::Diameter => "AddDiameterDimension2",
        }
    }
}

impl fmt::Display for DimensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DimensionKind {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "distance" => Ok(DimensionKind::Distance),
            "angle" => Ok(DimensionKind::Angle),
            "radius" => Ok(DimensionKind::Radius),
            "diameter" => Ok(DimensionKind::Diameter),
            _ => Err(VocabularyError::DimensionKind(s.to_string())),
        }
    }
}

/// Sketch constraint kind: 12 geometric relations plus 4 dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKind {
    Horizontal,
    Vertical,
    Fixed,
    Perpendicular,
    Parallel,
    Tangent,
    Coincident,
    Concentric,
    Equal,
    Midpoint,
    Collinear,
    Symmetric,
    Distance,
    Angle,
    Radius,
    Diameter,
}

impl ConstraintKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::Horizontal => "horizontal",
            ConstraintKind::Vertical => "vertical",
            ConstraintKind::Fixed => "fixed",
            ConstraintKind::Perpendicular => "perpendicular",
            ConstraintKind::Parallel => "parallel",
            ConstraintKind::Tangent => "tangent",
            ConstraintKind::Coincident => "coincident",
            ConstraintKind::Concentric => "concentric",
            ConstraintKind::Equal => "equal",
            ConstraintKind::Midpoint => "midpoint",
            ConstraintKind::Collinear => "collinear",
            ConstraintKind::Symmetric => "symmetric",
            ConstraintKind::Distance => "distance",
            ConstraintKind::Angle => "angle",
            ConstraintKind::Radius => "radius",
            ConstraintKind::Diameter => "diameter",
        }
    }

    pub fn all() -> &'static [ConstraintKind] {
        &[
            ConstraintKind::Horizontal,
            ConstraintKind::Vertical,
            ConstraintKind::Fixed,
            ConstraintKind::Perpendicular,
            ConstraintKind::Parallel,
            ConstraintKind::Tangent,
            ConstraintKind::Coincident,
            ConstraintKind::Concentric,
            ConstraintKind::Equal,
            ConstraintKind::Midpoint,
            ConstraintKind::Collinear,
            ConstraintKind::Symmetric,
            ConstraintKind::Distance,
            ConstraintKind::Angle,
            ConstraintKind::Radius,
            ConstraintKind::Diameter,
        ]
    }

    /// The dimension this constraint expresses, if it is dimensional
    pub fn dimension(&self) -> Option<DimensionKind> {
        match self {
            ConstraintKind::Distance => Some(DimensionKind::Distance),
            ConstraintKind::Angle => Some(DimensionKind::Angle),
            ConstraintKind::Radius => Some(DimensionKind::Radius),
            ConstraintKind::Diameter => Some(DimensionKind::Diameter),
            _ => None,
        }
    }

    /// Degrees of freedom removed by one constraint of this kind
    pub fn dof_consumed(&self) -> u32 {
        match self {
            ConstraintKind::Fixed | ConstraintKind::Coincident | ConstraintKind::Concentric => 2,
            ConstraintKind::Horizontal
            | ConstraintKind::Vertical
            | ConstraintKind::Perpendicular
            | ConstraintKind::Parallel
            | ConstraintKind::Tangent
            | ConstraintKind::Equal
            | ConstraintKind::Midpoint
            | ConstraintKind::Collinear
            | ConstraintKind::Symmetric
            | ConstraintKind::Distance
            | ConstraintKind::Angle
            | ConstraintKind::Radius
            | ConstraintKind::Diameter => 1,
        }
    }

    /// `swConstraintType_e` member; dimensional kinds have none
    pub fn sw_enum(&self) -> Option<&'static str> {
        let name = match self {
            ConstraintKind::Horizontal => "swConstraintType_e.swConstraintTypeHorizontal",
            ConstraintKind::Vertical => "swConstraintType_e.swConstraintTypeVertical",
            ConstraintKind::Perpendicular => "swConstraintType_e.swConstraintTypePerpendicular",
            ConstraintKind::Parallel => "swConstraintType_e.swConstraintTypeParallel",
            ConstraintKind::Tangent => "swConstraintType_e.swConstraintTypeTangent",
            ConstraintKind::Coincident => "swConstraintType_e.swConstraintTypeCoincident",
            ConstraintKind::Concentric => "swConstraintType_e.swConstraintTypeConcentric",
            ConstraintKind::Equal => "swConstraintType_e.swConstraintTypeEqual",
            ConstraintKind::Midpoint => "swConstraintType_e.swConstraintTypeMidPoint",
            ConstraintKind::Collinear => "swConstraintType_e.swConstraintTypeCollinear",
            ConstraintKind::Symmetric => "swConstraintType_e.swConstraintTypeSymmetric",
            ConstraintKind::Fixed => "swConstraintType_e.swConstraintTypeFIXED",
            ConstraintKind::Distance
            | ConstraintKind::Angle
            | ConstraintKind::Radius
            | ConstraintKind::Diameter => return None,
        };
        Some(name)
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConstraintKind {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::all()
            .iter()
            .find(|k| k.as_str() == wanted)
            .copied()
            .ok_or_else(|| VocabularyError::ConstraintKind(s.to_string()))
    }
}

/// Kind of 2-D sketch entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Line,
    Arc,
    Circle,
    Point,
    Spline,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Line => "line",
            EntityKind::Arc => "arc",
            EntityKind::Circle => "circle",
            EntityKind::Point => "point",
            EntityKind::Spline => "spline",
        }
    }

    /// `swSelectType_e` filter used when selecting this entity
    pub fn select_type(&self) -> &'static str {
        match self {
            EntityKind::Point => "swSelectType_e.swSelSKETCHPOINTS",
            EntityKind::Line | EntityKind::Arc | EntityKind::Circle | EntityKind::Spline => {
                "swSelectType_e.swSelSKETCHSEGS"
            }
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "line" => Ok(EntityKind::Line),
            "arc" => Ok(EntityKind::Arc),
            "circle" => Ok(EntityKind::Circle),
            "point" => Ok(EntityKind::Point),
            "spline" => Ok(EntityKind::Spline),
            _ => Err(VocabularyError::EntityKind(s.to_string())),
        }
    }
}
