//! Built-in validator implementations and the option-builder registry.
//!
//! Each validator is a pure rule over a [`Value`], producing zero or more
//! [`Violation`]s with the property path left empty; the owning
//! [`Property`] qualifies paths and consults enablement predicates.
//!
//! The recognised option names are an open set: a [`ValidatorRegistry`]
//! maps each name to a builder that attaches validators to a property at
//! definition time. Unrecognised names fail schema construction.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;

use crate::errors::{DefinitionError, DefinitionResult};
use crate::instance::Validatable;
use crate::property::Property;
use crate::result::Violation;
use crate::types::OptionSpec;
use crate::value::Value;

pub(crate) const DEFAULT_FORMAT_MESSAGE: &str = "is invalid";
pub(crate) const DEFAULT_EMAIL_MESSAGE: &str = "is not a valid email address";

/// A validation rule producing zero or more violations for a value.
///
/// Rules are stateless with respect to the value being checked and must be
/// shareable across concurrent validation calls.
pub trait Validate: Send + Sync {
    fn validate(&self, value: &Value) -> Vec<Violation>;
}

/// Rejects null and empty-string values. `false` is a value and passes.
#[derive(Debug, Clone)]
pub struct PresenceValidator {
    message: String,
}

impl PresenceValidator {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Validate for PresenceValidator {
    fn validate(&self, value: &Value) -> Vec<Violation> {
        if value.is_blank() {
            vec![Violation::new(&self.message)]
        } else {
            Vec::new()
        }
    }
}

/// Rejects non-empty stringified values that do not match a pattern.
///
/// Null and empty values are skipped: format complements presence, it does
/// not replace it.
#[derive(Debug, Clone)]
pub struct FormatValidator {
    pattern: Regex,
    message: String,
}

impl FormatValidator {
    pub fn new(pattern: Regex, message: impl Into<String>) -> Self {
        Self {
            pattern,
            message: message.into(),
        }
    }

    /// Compiles the pattern, rejecting invalid expressions at definition
    /// time rather than on first use.
    pub fn compile(
        property: &str,
        pattern: &str,
        message: Option<&str>,
    ) -> DefinitionResult<Self> {
        let pattern = Regex::new(pattern).map_err(|error| DefinitionError::InvalidOption {
            property: property.to_string(),
            option: "format".to_string(),
            reason: error.to_string(),
        })?;
        Ok(Self::new(pattern, message.unwrap_or(DEFAULT_FORMAT_MESSAGE)))
    }
}

impl Validate for FormatValidator {
    fn validate(&self, value: &Value) -> Vec<Violation> {
        if value.is_null() {
            return Vec::new();
        }
        let text = value.to_string();
        if !text.is_empty() && !self.pattern.is_match(&text) {
            return vec![Violation::new(&self.message)];
        }
        Vec::new()
    }
}

/// Rejects non-null values whose display string carries no `@`.
///
/// Intentionally coarse; full address validation is out of scope.
#[derive(Debug, Clone)]
pub struct EmailValidator {
    message: String,
}

impl EmailValidator {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for EmailValidator {
    fn default() -> Self {
        Self::new(DEFAULT_EMAIL_MESSAGE)
    }
}

impl Validate for EmailValidator {
    fn validate(&self, value: &Value) -> Vec<Violation> {
        if !value.is_null() && !value.to_string().contains('@') {
            return vec![Violation::new(&self.message)];
        }
        Vec::new()
    }
}

/// Rejects stringified values containing any non-digit character.
///
/// Null and empty values pass; pair with presence to require the field.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerValidator;

impl Validate for IntegerValidator {
    fn validate(&self, value: &Value) -> Vec<Violation> {
        if value.is_null() {
            return Vec::new();
        }
        if value.to_string().chars().any(|ch| !ch.is_ascii_digit()) {
            return vec![Violation::new("is not an integer")];
        }
        Vec::new()
    }
}

/// Rejects non-null values whose native type is not numeric. A
/// numeric-looking string still fails; this is a type check, not a parse.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberValidator;

impl Validate for NumberValidator {
    fn validate(&self, value: &Value) -> Vec<Violation> {
        match value {
            Value::Null | Value::Int(_) | Value::Float(_) => Vec::new(),
            _ => vec![Violation::new("Value must be a number")],
        }
    }
}

/// Rejects non-null values whose native type is not boolean.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanValidator;

impl Validate for BooleanValidator {
    fn validate(&self, value: &Value) -> Vec<Violation> {
        match value {
            Value::Null | Value::Bool(_) => Vec::new(),
            _ => vec![Violation::new("Value must be a boolean")],
        }
    }
}

/// Delegates validation of a field to another schema, for a single nested
/// instance or a homogeneous collection of them.
///
/// Recursion is unguarded: a cyclic instance graph (A holding B holding the
/// same A) recurses without bound. Cycles between schema definitions are
/// fine as long as the instance graph itself is acyclic.
#[derive(Debug, Clone)]
pub struct RelationValidator {
    schema_name: String,
    collection: bool,
}

impl RelationValidator {
    /// Builds a relation from a `schema` option spec: a non-blank name for
    /// a single relation, a one-element list holding a non-blank name for a
    /// collection. Every other shape is a definition error rendered as
    /// `<property>.schema is invalid`.
    pub fn from_spec(property: &str, spec: &OptionSpec) -> DefinitionResult<Self> {
        match spec {
            OptionSpec::Text(name) if is_valid_schema_name(name) => Ok(Self {
                schema_name: name.clone(),
                collection: false,
            }),
            OptionSpec::List(items) => match items.as_slice() {
                [OptionSpec::Text(name)] if is_valid_schema_name(name) => Ok(Self {
                    schema_name: name.clone(),
                    collection: true,
                }),
                _ => Err(DefinitionError::InvalidSchemaSpec(property.to_string())),
            },
            _ => Err(DefinitionError::InvalidSchemaSpec(property.to_string())),
        }
    }

    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    pub fn is_collection(&self) -> bool {
        self.collection
    }

    fn validate_single(&self, value: &Value) -> Vec<Violation> {
        if let Value::Model(instance) = value {
            let model: &dyn Validatable = instance;
            if model.schema_name() == self.schema_name {
                // Nested paths are relative; the owning property prepends
                // the field name.
                return model.validate().into_errors();
            }
        }
        vec![Violation::new(format!("is not a valid {}", self.schema_name))]
    }

    fn validate_collection(&self, value: &Value) -> Vec<Violation> {
        let Value::Array(elements) = value else {
            return vec![Violation::new(format!("is not a valid {}", self.schema_name))];
        };
        let mut errors = Vec::new();
        for (index, element) in elements.iter().enumerate() {
            let segment = index.to_string();
            errors.extend(
                self.validate_element(element)
                    .into_iter()
                    .map(|violation| violation.qualify(&segment)),
            );
        }
        errors
    }

    /// Distinguishes three per-element outcomes: missing, wrong schema, and
    /// anything else (delegated to the single-relation check).
    fn validate_element(&self, element: &Value) -> Vec<Violation> {
        match element {
            Value::Null => vec![Violation::new(format!("is not a {}", self.schema_name))],
            Value::Model(instance) if instance.schema_name() != self.schema_name => {
                vec![Violation::new(format!(
                    "is a {}, not a {}",
                    instance.schema_name(),
                    self.schema_name
                ))]
            }
            other => self.validate_single(other),
        }
    }
}

impl Validate for RelationValidator {
    fn validate(&self, value: &Value) -> Vec<Violation> {
        // A missing relation is valid; require it with presence.
        if value.is_null() {
            return Vec::new();
        }
        if self.collection {
            self.validate_collection(value)
        } else {
            self.validate_single(value)
        }
    }
}

fn is_valid_schema_name(name: &str) -> bool {
    !name.trim().is_empty()
}

/// Attaches validators to a property from one option's spec.
pub type OptionBuilder =
    Arc<dyn Fn(&mut Property, &OptionSpec) -> DefinitionResult<()> + Send + Sync>;

/// Registry of recognised property options.
///
/// The default registry carries the built-in set; callers may register
/// additional option names to extend the definition DSL. The registry is
/// passed into schema construction explicitly, so extensions never leak
/// between independently configured schemas.
pub struct ValidatorRegistry {
    builders: HashMap<String, OptionBuilder>,
}

impl ValidatorRegistry {
    /// An empty registry recognising no options.
    pub fn empty() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// Registers a builder for `option`, replacing any existing one.
    pub fn register<F>(&mut self, option: impl Into<String>, builder: F)
    where
        F: Fn(&mut Property, &OptionSpec) -> DefinitionResult<()> + Send + Sync + 'static,
    {
        self.builders.insert(option.into(), Arc::new(builder));
    }

    pub fn get(&self, option: &str) -> Option<&OptionBuilder> {
        self.builders.get(option)
    }

    pub fn contains(&self, option: &str) -> bool {
        self.builders.contains_key(option)
    }
}

impl Default for ValidatorRegistry {
    /// The built-in options: `presence`, `format`, `email`, `integer`,
    /// `number`, `boolean`, `schema`, `string`, `type`, `label`, `message`.
    fn default() -> Self {
        let mut registry = Self::empty();

        registry.register("presence", |property, spec| {
            if spec.is_disabled() {
                return Ok(());
            }
            property.require_presence(spec.message().map(str::to_string), spec.enabled());
            Ok(())
        });

        registry.register("format", |property, spec| {
            if spec.is_disabled() {
                return Ok(());
            }
            let (pattern, message) = match spec {
                OptionSpec::Text(pattern) => (pattern.as_str(), None),
                OptionSpec::Spec(detail) => match detail.pattern.as_deref() {
                    Some(pattern) => (pattern, detail.message.as_deref()),
                    None => {
                        return Err(DefinitionError::InvalidOption {
                            property: property.name().to_string(),
                            option: "format".to_string(),
                            reason: "a pattern is required".to_string(),
                        })
                    }
                },
                _ => {
                    return Err(DefinitionError::InvalidOption {
                        property: property.name().to_string(),
                        option: "format".to_string(),
                        reason: "expected a pattern or {pattern, message}".to_string(),
                    })
                }
            };
            let validator = FormatValidator::compile(property.name(), pattern, message)?;
            property.add_validator_when(validator, spec.enabled());
            Ok(())
        });

        registry.register("email", |property, spec| {
            if spec.is_disabled() {
                return Ok(());
            }
            let message = spec.message().unwrap_or(DEFAULT_EMAIL_MESSAGE);
            property.add_validator_when(EmailValidator::new(message), spec.enabled());
            Ok(())
        });

        registry.register("integer", |property, spec| {
            if spec.is_disabled() {
                return Ok(());
            }
            property.add_validator_when(IntegerValidator, spec.enabled());
            Ok(())
        });

        registry.register("number", |property, spec| {
            if spec.is_disabled() {
                return Ok(());
            }
            property.add_validator_when(NumberValidator, spec.enabled());
            Ok(())
        });

        registry.register("boolean", |property, spec| {
            if spec.is_disabled() {
                return Ok(());
            }
            property.add_validator_when(BooleanValidator, spec.enabled());
            Ok(())
        });

        registry.register("schema", |property, spec| {
            let relation = RelationValidator::from_spec(property.name(), spec)?;
            property.set_relation(relation.schema_name().to_string(), relation.is_collection());
            property.add_validator_when(relation, spec.enabled());
            Ok(())
        });

        // Declares a plain string property; nothing to check.
        registry.register("string", |_property, _spec| Ok(()));

        registry.register("type", |property, spec| match spec {
            OptionSpec::Text(type_name) => {
                property.set_type_name(type_name.clone());
                Ok(())
            }
            _ => Err(DefinitionError::InvalidOption {
                property: property.name().to_string(),
                option: "type".to_string(),
                reason: "expected a type name".to_string(),
            }),
        });

        registry.register("label", |property, spec| match spec {
            OptionSpec::Text(label) => {
                property.set_label(label.clone());
                Ok(())
            }
            _ => Err(DefinitionError::InvalidOption {
                property: property.name().to_string(),
                option: "label".to_string(),
                reason: "expected a string".to_string(),
            }),
        });

        registry.register("message", |property, spec| match spec {
            OptionSpec::Text(message) => {
                property.set_message(message.clone());
                Ok(())
            }
            _ => Err(DefinitionError::InvalidOption {
                property: property.name().to_string(),
                option: "message".to_string(),
                reason: "expected a string".to_string(),
            }),
        });

        registry
    }
}
