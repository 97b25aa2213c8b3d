//! Schema aggregation over an ordered property set.
//!
//! A schema is named, built once from a [`SchemaDef`], and immutable
//! afterwards: long-lived shared configuration referenced by every
//! validation call. Validating an instance walks the properties in
//! definition order and flattens their violations into one
//! [`ValidationResult`]; property order is the only thing definition order
//! decides, and it makes error ordering deterministic.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::errors::{DefinitionError, DefinitionResult};
use crate::instance::{Instance, RESERVED_PROPERTIES};
use crate::property::Property;
use crate::result::ValidationResult;
use crate::types::SchemaDef;
use crate::validators::ValidatorRegistry;
use crate::value::Value;

const NULL: Value = Value::Null;

/// Named, immutable specification of one entity type's validated properties.
pub struct Schema {
    name: String,
    properties: Vec<Property>,
}

impl Schema {
    /// Compiles a definition with the built-in options and the model
    /// collaborator's reserved names.
    pub fn new(definition: SchemaDef) -> DefinitionResult<Self> {
        Self::with_registry(definition, &ValidatorRegistry::default(), RESERVED_PROPERTIES)
    }

    /// Compiles a definition against an explicit option registry and
    /// reserved-name set.
    ///
    /// # Errors
    ///
    /// Fails on the first reserved or duplicate property name, unrecognised
    /// option, malformed relation spec, or unsupported type. A schema that
    /// fails construction is never produced.
    pub fn with_registry(
        definition: SchemaDef,
        registry: &ValidatorRegistry,
        reserved: &[&str],
    ) -> DefinitionResult<Self> {
        let mut properties = Vec::with_capacity(definition.properties.len());
        let mut seen = HashSet::new();
        for (name, property_def) in &definition.properties {
            if !is_allowed_property_name(name, reserved) {
                return Err(DefinitionError::ReservedProperty(name.clone()));
            }
            if !seen.insert(name.clone()) {
                return Err(DefinitionError::DuplicateProperty(name.clone()));
            }
            properties.push(Property::compile(name, property_def, registry)?);
        }
        Ok(Self {
            name: definition.name,
            properties,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Properties in definition order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.name() == name)
    }

    /// Validates an instance against every property in definition order.
    ///
    /// Violations are never thrown; invalid data is a normal outcome and
    /// comes back inside the result.
    pub fn validate(&self, instance: &Instance) -> ValidationResult {
        let mut errors = Vec::new();
        for property in &self.properties {
            let value = instance.get(property.name()).unwrap_or(&NULL);
            errors.extend(property.validate(value, instance));
        }
        tracing::trace!(
            schema = %self.name,
            violations = errors.len(),
            "validated instance"
        );
        ValidationResult::new(errors)
    }

    pub fn is_valid(&self, instance: &Instance) -> bool {
        self.validate(instance).is_valid()
    }

    /// Wraps the schema for sharing across instances and validation calls.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.properties.iter().map(Property::name).collect();
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("properties", &names)
            .finish()
    }
}

/// Definition-time check: property names must not collide with the model
/// abstraction's own entry points. The reserved set is supplied by the
/// model collaborator.
pub fn is_allowed_property_name(name: &str, reserved: &[&str]) -> bool {
    !reserved.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PropertyDef;

    fn contact_def() -> SchemaDef {
        SchemaDef::new("Contact")
            .property("firstName", PropertyDef::new().presence())
            .property("email", PropertyDef::new().presence().email())
    }

    #[test]
    fn test_properties_keep_definition_order() {
        let schema = Schema::new(contact_def()).unwrap();
        let names: Vec<&str> = schema.properties().iter().map(Property::name).collect();
        assert_eq!(names, vec!["firstName", "email"]);
    }

    #[test]
    fn test_violations_follow_property_order() {
        let schema = Schema::new(contact_def()).unwrap().into_shared();
        let instance = Instance::new(schema.clone());

        let result = schema.validate(&instance);
        let paths: Vec<&str> = result.errors().iter().map(|v| v.property()).collect();
        assert_eq!(paths, vec!["firstName", "email"]);
    }

    #[test]
    fn test_missing_field_validates_as_null() {
        let schema = Schema::new(contact_def()).unwrap().into_shared();
        let mut instance = Instance::new(schema.clone());
        instance.set("firstName", "Ned");
        instance.set("email", "ned@leftorium.com");
        assert!(schema.is_valid(&instance));

        instance.unset("email");
        assert!(!schema.is_valid(&instance));
    }

    #[test]
    fn test_is_valid_matches_empty_error_list() {
        let schema = Schema::new(contact_def()).unwrap().into_shared();
        let mut instance = Instance::new(schema.clone());
        instance.set("firstName", "Ned");
        instance.set("email", "ned@leftorium.com");

        let result = schema.validate(&instance);
        assert_eq!(schema.is_valid(&instance), result.errors().is_empty());
    }

    #[test]
    fn test_reserved_property_names_are_rejected() {
        for reserved in RESERVED_PROPERTIES {
            let definition =
                SchemaDef::new("Boom").property(*reserved, PropertyDef::new().presence());
            let error = Schema::new(definition).unwrap_err();
            assert_eq!(
                error,
                DefinitionError::ReservedProperty((*reserved).to_string())
            );
        }
    }

    #[test]
    fn test_duplicate_property_names_are_rejected() {
        let definition = SchemaDef::new("Boom")
            .property("name", PropertyDef::new().presence())
            .property("name", PropertyDef::new().email());
        let error = Schema::new(definition).unwrap_err();
        assert_eq!(error, DefinitionError::DuplicateProperty("name".into()));
    }

    #[test]
    fn test_allowed_name_check_is_pure() {
        assert!(is_allowed_property_name("firstName", RESERVED_PROPERTIES));
        assert!(!is_allowed_property_name("validate", RESERVED_PROPERTIES));
        assert!(is_allowed_property_name("validate", &[]));
    }
}
