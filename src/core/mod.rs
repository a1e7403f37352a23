//! Core module - vocabulary, parameter model, catalog and configuration

pub mod catalog;
pub mod config;
pub mod parameter;
pub mod value;
pub mod vocabulary;

pub use catalog::{CatalogEntry, CatalogError, DerivedField, SpaceCatalog};
pub use config::{Config, ConfigError};
pub use parameter::{
    ParameterAssignment, ParameterBuilder, ParameterDefinition, ParameterError, ParameterSpace,
};
pub use value::{format_number, ParamValue};
pub use vocabulary::{
    AppliesTo, Characteristic, ConstraintKind, DimensionKind, EntityKind, GdtCategory,
    MaterialModifier, ParameterDomain, ParameterType, ValueConstraint, VocabularyError, ZoneShape,
};
