//! Declarative schema definition types.
//!
//! A [`SchemaDef`] is the construction surface: a name plus an ordered map
//! of property names to [`PropertyDef`]s, each an ordered map of option
//! names to [`OptionSpec`]s. Definitions are plain data; compiling one into
//! a [`Schema`](crate::schema::Schema) is where configuration errors
//! surface. `from_json` accepts the equivalent JSON document, with the one
//! restriction that `enabled` predicates are closures and only exist on the
//! typed surface.

use std::fmt;
use std::sync::Arc;

use crate::errors::{DefinitionError, DefinitionResult};
use crate::instance::Instance;

/// Predicate deciding whether a validator applies to a given instance.
///
/// Consulted against the full owning instance, not the field value, so a
/// rule can depend on sibling properties ("required only if registered").
pub type EnabledPredicate = Arc<dyn Fn(&Instance) -> bool + Send + Sync>;

/// Detailed configuration for one validator.
#[derive(Clone, Default)]
pub struct ValidatorSpec {
    /// Custom violation message.
    pub message: Option<String>,
    /// Regular expression source, for the format option.
    pub pattern: Option<String>,
    /// Conditional enablement; absent means always enabled.
    pub enabled: Option<EnabledPredicate>,
}

impl ValidatorSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn enabled_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Instance) -> bool + Send + Sync + 'static,
    {
        self.enabled = Some(Arc::new(predicate));
        self
    }
}

impl fmt::Debug for ValidatorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorSpec")
            .field("message", &self.message)
            .field("pattern", &self.pattern)
            .field("enabled", &self.enabled.as_ref().map(|_| "<predicate>"))
            .finish()
    }
}

/// One property option's configuration value.
#[derive(Clone, Debug)]
pub enum OptionSpec {
    Null,
    Flag(bool),
    Text(String),
    List(Vec<OptionSpec>),
    Spec(ValidatorSpec),
}

impl OptionSpec {
    /// Custom message carried by this spec, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            OptionSpec::Text(text) => Some(text),
            OptionSpec::Spec(spec) => spec.message.as_deref(),
            _ => None,
        }
    }

    /// Enabled predicate carried by this spec, if any.
    pub fn enabled(&self) -> Option<EnabledPredicate> {
        match self {
            OptionSpec::Spec(spec) => spec.enabled.clone(),
            _ => None,
        }
    }

    /// True when the spec turns its option off outright (`false`).
    pub fn is_disabled(&self) -> bool {
        matches!(self, OptionSpec::Flag(false))
    }
}

impl From<bool> for OptionSpec {
    fn from(flag: bool) -> Self {
        OptionSpec::Flag(flag)
    }
}

impl From<&str> for OptionSpec {
    fn from(text: &str) -> Self {
        OptionSpec::Text(text.to_string())
    }
}

impl From<String> for OptionSpec {
    fn from(text: String) -> Self {
        OptionSpec::Text(text)
    }
}

impl From<ValidatorSpec> for OptionSpec {
    fn from(spec: ValidatorSpec) -> Self {
        OptionSpec::Spec(spec)
    }
}

/// Ordered option map for one property. Options compile in insertion order,
/// which fixes the order standard validators run in.
#[derive(Clone, Debug, Default)]
pub struct PropertyDef {
    options: Vec<(String, OptionSpec)>,
}

impl PropertyDef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a raw option.
    pub fn option(mut self, name: impl Into<String>, spec: impl Into<OptionSpec>) -> Self {
        self.options.push((name.into(), spec.into()));
        self
    }

    pub fn options(&self) -> impl Iterator<Item = (&str, &OptionSpec)> {
        self.options.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Requires the field to be present and non-empty.
    pub fn presence(self) -> Self {
        self.option("presence", true)
    }

    /// Requires presence only when the predicate holds for the instance.
    pub fn presence_if<F>(self, predicate: F) -> Self
    where
        F: Fn(&Instance) -> bool + Send + Sync + 'static,
    {
        self.option("presence", ValidatorSpec::new().enabled_when(predicate))
    }

    /// Requires non-empty values to match `pattern`.
    pub fn format(self, pattern: impl Into<String>, message: impl Into<String>) -> Self {
        self.option(
            "format",
            ValidatorSpec::new().pattern(pattern).message(message),
        )
    }

    pub fn email(self) -> Self {
        self.option("email", true)
    }

    pub fn integer(self) -> Self {
        self.option("integer", true)
    }

    pub fn number(self) -> Self {
        self.option("number", true)
    }

    pub fn boolean(self) -> Self {
        self.option("boolean", true)
    }

    /// References a single instance of the named schema.
    pub fn related(self, schema: impl Into<String>) -> Self {
        self.option("schema", OptionSpec::Text(schema.into()))
    }

    /// References a homogeneous collection of the named schema.
    pub fn related_many(self, schema: impl Into<String>) -> Self {
        self.option(
            "schema",
            OptionSpec::List(vec![OptionSpec::Text(schema.into())]),
        )
    }

    /// Declares the property's type; the named option becomes the type gate.
    pub fn typed(self, type_name: impl Into<String>) -> Self {
        self.option("type", OptionSpec::Text(type_name.into()))
    }

    pub fn label(self, label: impl Into<String>) -> Self {
        self.option("label", OptionSpec::Text(label.into()))
    }

    /// Property-level custom message, consumed by the type gate.
    pub fn message(self, message: impl Into<String>) -> Self {
        self.option("message", OptionSpec::Text(message.into()))
    }
}

/// A complete schema definition: a name and ordered property definitions.
#[derive(Clone, Debug)]
pub struct SchemaDef {
    pub(crate) name: String,
    pub(crate) properties: Vec<(String, PropertyDef)>,
}

impl SchemaDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn property(mut self, name: impl Into<String>, definition: PropertyDef) -> Self {
        self.properties.push((name.into(), definition));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropertyDef)> {
        self.properties
            .iter()
            .map(|(name, definition)| (name.as_str(), definition))
    }

    /// Parses the JSON definition form:
    /// `{"name": ..., "properties": {"prop": {"option": spec, ...}, ...}}`.
    pub fn from_json(json: &serde_json::Value) -> DefinitionResult<Self> {
        let document = json.as_object().ok_or_else(|| {
            DefinitionError::MalformedDefinition("expected a JSON object".into())
        })?;
        let name = document
            .get("name")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                DefinitionError::MalformedDefinition("missing string field 'name'".into())
            })?;
        let properties = document
            .get("properties")
            .and_then(serde_json::Value::as_object)
            .ok_or_else(|| {
                DefinitionError::MalformedDefinition("missing object field 'properties'".into())
            })?;

        let mut definition = SchemaDef::new(name);
        for (property, options) in properties {
            let options = options.as_object().ok_or_else(|| {
                DefinitionError::MalformedDefinition(format!(
                    "property '{}' must map to an object",
                    property
                ))
            })?;
            let mut property_def = PropertyDef::new();
            for (option, value) in options {
                property_def =
                    property_def.option(option, option_spec_from_json(property, option, value)?);
            }
            definition = definition.property(property, property_def);
        }
        Ok(definition)
    }
}

fn option_spec_from_json(
    property: &str,
    option: &str,
    value: &serde_json::Value,
) -> DefinitionResult<OptionSpec> {
    match value {
        serde_json::Value::Null => Ok(OptionSpec::Null),
        serde_json::Value::Bool(flag) => Ok(OptionSpec::Flag(*flag)),
        serde_json::Value::String(text) => Ok(OptionSpec::Text(text.clone())),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| option_spec_from_json(property, option, item))
            .collect::<DefinitionResult<Vec<_>>>()
            .map(OptionSpec::List),
        serde_json::Value::Object(map) => {
            let mut spec = ValidatorSpec::new();
            for (key, val) in map {
                match (key.as_str(), val) {
                    ("message", serde_json::Value::String(message)) => {
                        spec.message = Some(message.clone());
                    }
                    ("pattern", serde_json::Value::String(pattern)) => {
                        spec.pattern = Some(pattern.clone());
                    }
                    _ => {
                        return Err(DefinitionError::MalformedDefinition(format!(
                            "unsupported key '{}' in '{}.{}'",
                            key, property, option
                        )))
                    }
                }
            }
            Ok(OptionSpec::Spec(spec))
        }
        serde_json::Value::Number(_) => Err(DefinitionError::MalformedDefinition(format!(
            "unsupported value for '{}.{}'",
            property, option
        ))),
    }
}
