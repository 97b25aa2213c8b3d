//! In-memory registry of named schemas and the instance factory.
//!
//! The registry holds one schema per name and creates instances by schema
//! name from JSON data, recursively instantiating values of declared
//! single-relation properties. Registered schemas are immutable: a name is
//! never reassigned.

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{DefinitionError, DefinitionResult};
use crate::instance::Instance;
use crate::schema::Schema;
use crate::types::SchemaDef;
use crate::value::Value;

#[derive(Default)]
pub struct ModelRegistry {
    schemas: HashMap<String, Arc<Schema>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema under its own name.
    ///
    /// # Errors
    ///
    /// Fails if the name is already registered.
    pub fn register(&mut self, schema: Arc<Schema>) -> DefinitionResult<()> {
        if self.schemas.contains_key(schema.name()) {
            return Err(DefinitionError::DuplicateSchema(schema.name().to_string()));
        }
        tracing::debug!(schema = %schema.name(), "registered schema");
        self.schemas.insert(schema.name().to_string(), schema);
        Ok(())
    }

    /// Compiles and registers a definition in one step.
    pub fn define(&mut self, definition: SchemaDef) -> DefinitionResult<Arc<Schema>> {
        let schema = Schema::new(definition)?.into_shared();
        self.register(schema.clone())?;
        Ok(schema)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Schema>> {
        self.schemas.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn schemas(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.schemas.values()
    }

    /// Creates an instance of the named schema from a JSON map.
    ///
    /// Values of declared single-relation properties that arrive as JSON
    /// objects are recursively created as instances of the related schema;
    /// everything else converts through [`Value::from_json`]. Collection
    /// relations are left as plain data for the caller to assemble.
    pub fn create(
        &self,
        schema_name: &str,
        data: &serde_json::Value,
    ) -> DefinitionResult<Instance> {
        let schema = self
            .get(schema_name)
            .ok_or_else(|| DefinitionError::UnknownSchema(schema_name.to_string()))?;
        let mut instance = Instance::new(schema.clone());
        let Some(object) = data.as_object() else {
            return Ok(instance);
        };
        for (key, value) in object {
            match self.single_relation_of(schema, key) {
                Some(related) if value.is_object() => {
                    instance.set(key.clone(), Value::Model(self.create(related, value)?));
                }
                _ => instance.set(key.clone(), Value::from_json(value)),
            }
        }
        Ok(instance)
    }

    fn single_relation_of<'a>(&self, schema: &'a Schema, property: &str) -> Option<&'a str> {
        schema
            .property(property)
            .and_then(|property| property.relation())
            .and_then(|(name, collection)| (!collection).then_some(name))
    }
}
