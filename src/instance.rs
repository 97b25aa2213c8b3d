//! The model-object collaborator: schema-bound instances.
//!
//! An [`Instance`] is a bag of named values bound to a shared schema. The
//! engine consumes it through two narrow seams: field lookup during schema
//! validation, and the [`Validatable`] capability during relation
//! delegation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::result::ValidationResult;
use crate::schema::Schema;
use crate::value::Value;

/// Names reserved by the model abstraction itself; schema definitions must
/// not use them as property names.
pub const RESERVED_PROPERTIES: &[&str] = &[
    "validate",
    "is_valid",
    "update_property",
    "update_properties",
    "to_string",
    "to_json",
];

/// The capability a related-field value must expose for relation
/// delegation: a schema identity and a validation entry point.
pub trait Validatable {
    /// The name of the schema this entity conforms to.
    fn schema_name(&self) -> &str;
    /// Validates the entity against its own schema.
    fn validate(&self) -> ValidationResult;
}

/// A model object bound to a shared schema.
///
/// Values are assigned freely; names outside the schema may be stored but
/// are never validated. Validation never mutates the instance.
#[derive(Clone)]
pub struct Instance {
    schema: Arc<Schema>,
    values: HashMap<String, Value>,
}

impl Instance {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            values: HashMap::new(),
        }
    }

    /// Builds an instance and assigns the given property values.
    pub fn with_values(
        schema: Arc<Schema>,
        values: impl IntoIterator<Item = (String, Value)>,
    ) -> Self {
        let mut instance = Self::new(schema);
        instance.update_properties(values);
        instance
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn schema_name(&self) -> &str {
        self.schema.name()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Removes a value entirely; the property then validates as null.
    pub fn unset(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn update_property(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.set(name, value);
    }

    pub fn update_properties(&mut self, values: impl IntoIterator<Item = (String, Value)>) {
        for (name, value) in values {
            self.set(name, value);
        }
    }

    /// Validates this instance against its schema.
    pub fn validate(&self) -> ValidationResult {
        self.schema.validate(self)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_valid()
    }

    /// JSON form: declared properties in schema order, missing values
    /// skipped, nested models serialized recursively.
    pub fn to_json(&self) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        for property in self.schema.properties() {
            if let Some(value) = self.values.get(property.name()) {
                object.insert(property.name().to_string(), value.to_json());
            }
        }
        serde_json::Value::Object(object)
    }
}

impl Validatable for Instance {
    fn schema_name(&self) -> &str {
        Instance::schema_name(self)
    }

    fn validate(&self) -> ValidationResult {
        Instance::validate(self)
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<{}>", self.schema.name())
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("schema", &self.schema.name())
            .field("values", &self.values)
            .finish()
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name() && self.values == other.values
    }
}
