//! One named field's validator pipeline.
//!
//! A property compiles its definition into three ordered stages: an
//! optional presence check, an optional type gate, and the standard
//! validators in definition order. Presence short-circuits: type and
//! standard validators never run against an absent or empty value. Every
//! violation leaves the property with its name prepended to the path.

use std::fmt;

use crate::errors::{DefinitionError, DefinitionResult};
use crate::inflection;
use crate::instance::Instance;
use crate::result::Violation;
use crate::types::{EnabledPredicate, OptionSpec, PropertyDef, ValidatorSpec};
use crate::validators::{PresenceValidator, Validate, ValidatorRegistry};
use crate::value::Value;

/// A validation rule paired with its optional enablement predicate.
struct ConfiguredValidator {
    rule: Box<dyn Validate>,
    enabled: Option<EnabledPredicate>,
}

impl ConfiguredValidator {
    fn is_enabled(&self, instance: &Instance) -> bool {
        self.enabled
            .as_ref()
            .map_or(true, |predicate| predicate(instance))
    }
}

impl fmt::Debug for ConfiguredValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfiguredValidator")
            .field("conditional", &self.enabled.is_some())
            .finish()
    }
}

/// Presence configuration recorded during compilation; the validator itself
/// is built once the label is known.
struct PresenceConfig {
    message: Option<String>,
    enabled: Option<EnabledPredicate>,
}

/// One named field's validator pipeline within a schema.
///
/// Built once at schema-definition time and immutable afterwards, so it is
/// safe to share across concurrent validation calls.
pub struct Property {
    name: String,
    label: Option<String>,
    message: Option<String>,
    type_name: Option<String>,
    relation: Option<(String, bool)>,
    presence_config: Option<PresenceConfig>,
    presence: Option<ConfiguredValidator>,
    gate: Vec<ConfiguredValidator>,
    validators: Vec<ConfiguredValidator>,
}

impl Property {
    /// Compiles a property definition against an option registry.
    ///
    /// Every option key must name a registered builder; the first
    /// unrecognised key aborts construction. The type gate is bound here,
    /// exactly once, from the fully configured property.
    pub(crate) fn compile(
        name: &str,
        definition: &PropertyDef,
        registry: &ValidatorRegistry,
    ) -> DefinitionResult<Self> {
        let mut property = Property {
            name: name.to_string(),
            label: None,
            message: None,
            type_name: None,
            relation: None,
            presence_config: None,
            presence: None,
            gate: Vec::new(),
            validators: Vec::new(),
        };
        for (option, spec) in definition.options() {
            let builder = registry
                .get(option)
                .ok_or_else(|| DefinitionError::UnrecognisedOption(option.to_string()))?;
            builder(&mut property, spec)?;
        }
        property.finalize(registry)?;
        Ok(property)
    }

    /// Resolves the label, builds the presence validator with its default
    /// message, and binds the type gate.
    fn finalize(&mut self, registry: &ValidatorRegistry) -> DefinitionResult<()> {
        if self.label.is_none() {
            self.label = Some(inflection::title_from_camel_case(&self.name));
        }
        if let Some(config) = self.presence_config.take() {
            let message = config
                .message
                .unwrap_or_else(|| format!("{} is required", self.label()));
            self.presence = Some(ConfiguredValidator {
                rule: Box::new(PresenceValidator::new(message)),
                enabled: config.enabled,
            });
        }
        self.bind_type_gate(registry)
    }

    /// Binds the type gate from immutable configuration: the builder the
    /// type names runs once, and whatever validators it attaches become the
    /// gate. Idempotent across validation calls by construction.
    fn bind_type_gate(&mut self, registry: &ValidatorRegistry) -> DefinitionResult<()> {
        let Some(type_name) = self.type_name.clone() else {
            return Ok(());
        };
        let builder = registry
            .get(&type_name)
            .ok_or_else(|| DefinitionError::UnsupportedType(type_name.clone()))?
            .clone();
        let existing = self.validators.len();
        let spec = OptionSpec::Spec(ValidatorSpec {
            message: self.message.clone(),
            pattern: None,
            enabled: None,
        });
        builder(self, &spec)?;
        self.gate = self.validators.split_off(existing);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display label; defaults to a title-cased form of the name.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Property-level custom message, if configured.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Declared type name, if the definition carried a `type` option.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Related schema reference: `(schema name, is_collection)`.
    pub fn relation(&self) -> Option<(&str, bool)> {
        self.relation
            .as_ref()
            .map(|(name, collection)| (name.as_str(), *collection))
    }

    pub fn has_presence(&self) -> bool {
        self.presence.is_some() || self.presence_config.is_some()
    }

    // ---- builder-facing configuration surface ----

    /// Appends a standard validator.
    pub fn add_validator(&mut self, rule: impl Validate + 'static) {
        self.add_validator_when(rule, None);
    }

    /// Appends a standard validator with an optional enablement predicate.
    pub fn add_validator_when(
        &mut self,
        rule: impl Validate + 'static,
        enabled: Option<EnabledPredicate>,
    ) {
        self.validators.push(ConfiguredValidator {
            rule: Box::new(rule),
            enabled,
        });
    }

    /// Configures the presence slot. The default message is derived from
    /// the final label, so an explicit `label` option wins regardless of
    /// option order.
    pub fn require_presence(
        &mut self,
        message: Option<String>,
        enabled: Option<EnabledPredicate>,
    ) {
        self.presence_config = Some(PresenceConfig { message, enabled });
    }

    pub fn set_label(&mut self, label: String) {
        self.label = Some(label);
    }

    pub fn set_message(&mut self, message: String) {
        self.message = Some(message);
    }

    pub fn set_type_name(&mut self, type_name: String) {
        self.type_name = Some(type_name);
    }

    pub fn set_relation(&mut self, schema_name: String, collection: bool) {
        self.relation = Some((schema_name, collection));
    }

    // ---- validation ----

    /// Runs the pipeline against one field value.
    ///
    /// Presence first; any presence violation returns immediately. Then the
    /// type gate, then the standard validators in definition order. Each
    /// validator's `enabled` predicate is consulted against the full owning
    /// instance before it runs.
    pub fn validate(&self, value: &Value, instance: &Instance) -> Vec<Violation> {
        let mut errors = Vec::new();
        if let Some(presence) = &self.presence {
            errors.extend(self.apply(presence, value, instance));
        }
        if errors.is_empty() {
            for validator in self.gate.iter().chain(self.validators.iter()) {
                errors.extend(self.apply(validator, value, instance));
            }
        }
        errors
    }

    /// Runs one validator and prepends this property's name to every
    /// violation: nested relation paths become `name.rest`, direct
    /// violations become `name`.
    fn apply(
        &self,
        validator: &ConfiguredValidator,
        value: &Value,
        instance: &Instance,
    ) -> Vec<Violation> {
        if !validator.is_enabled(instance) {
            return Vec::new();
        }
        validator
            .rule
            .validate(value)
            .into_iter()
            .map(|violation| violation.qualify(&self.name))
            .collect()
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("type", &self.type_name)
            .field("relation", &self.relation)
            .field("presence", &self.presence.is_some())
            .field("validators", &self.validators.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::types::SchemaDef;
    use std::sync::Arc;

    fn compile(name: &str, definition: PropertyDef) -> Property {
        Property::compile(name, &definition, &ValidatorRegistry::default()).unwrap()
    }

    fn blank_instance() -> Instance {
        let schema = Arc::new(Schema::new(SchemaDef::new("Fixture")).unwrap());
        Instance::new(schema)
    }

    #[test]
    fn test_presence_short_circuits_everything_else() {
        let property = compile(
            "firstName",
            PropertyDef::new().presence().format("^[A-Z]", "must start with a capital"),
        );
        let instance = blank_instance();

        let violations = property.validate(&Value::from(""), &instance);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].property(), "firstName");
        assert_eq!(violations[0].message(), "First Name is required");
    }

    #[test]
    fn test_standard_validators_run_in_definition_order() {
        let property = compile(
            "code",
            PropertyDef::new()
                .format("^x", "must start with x")
                .format("y$", "must end with y"),
        );
        let instance = blank_instance();

        let violations = property.validate(&Value::from("nope"), &instance);
        let messages: Vec<&str> = violations.iter().map(|v| v.message()).collect();
        assert_eq!(messages, vec!["must start with x", "must end with y"]);
    }

    #[test]
    fn test_unrecognised_option_fails_compilation() {
        let error = Property::compile(
            "foo",
            &PropertyDef::new().option("bang", "pop"),
            &ValidatorRegistry::default(),
        )
        .unwrap_err();
        assert_eq!(error, DefinitionError::UnrecognisedOption("bang".into()));
    }

    #[test]
    fn test_type_gate_runs_before_standard_validators() {
        let property = compile(
            "email",
            PropertyDef::new()
                .format("@example", "must be at example")
                .typed("email"),
        );
        let instance = blank_instance();

        let violations = property.validate(&Value::from("oops"), &instance);
        let messages: Vec<&str> = violations.iter().map(|v| v.message()).collect();
        assert_eq!(
            messages,
            vec!["is not a valid email address", "must be at example"]
        );
    }

    #[test]
    fn test_type_gate_uses_property_message() {
        let property = compile(
            "email",
            PropertyDef::new().typed("email").message("give me an email"),
        );
        let instance = blank_instance();

        let violations = property.validate(&Value::from("oops"), &instance);
        assert_eq!(violations[0].message(), "give me an email");
    }

    #[test]
    fn test_type_gate_is_idempotent_across_calls() {
        let property = compile("email", PropertyDef::new().typed("email"));
        let instance = blank_instance();

        let first = property.validate(&Value::from("oops"), &instance);
        let second = property.validate(&Value::from("oops"), &instance);
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn test_unsupported_type_fails_compilation() {
        let error = Property::compile(
            "data",
            &PropertyDef::new().typed("file"),
            &ValidatorRegistry::default(),
        )
        .unwrap_err();
        assert_eq!(error, DefinitionError::UnsupportedType("file".into()));
    }

    #[test]
    fn test_string_type_adds_no_gate() {
        let property = compile("firstName", PropertyDef::new().typed("string").presence());
        assert_eq!(property.type_name(), Some("string"));
        let instance = blank_instance();
        assert!(property.validate(&Value::from("Ned"), &instance).is_empty());
    }

    #[test]
    fn test_label_defaults_from_name() {
        let property = compile("firstName", PropertyDef::new().presence());
        assert_eq!(property.label(), "First Name");
    }

    #[test]
    fn test_explicit_label_wins_regardless_of_order() {
        let property = compile("lastName", PropertyDef::new().presence().label("Surname"));
        assert_eq!(property.label(), "Surname");
        let instance = blank_instance();
        let violations = property.validate(&Value::Null, &instance);
        assert_eq!(violations[0].message(), "Surname is required");
    }

    #[test]
    fn test_disabled_validator_contributes_nothing() {
        let property = compile(
            "phone",
            PropertyDef::new().option(
                "presence",
                ValidatorSpec::new().enabled_when(|instance| {
                    matches!(instance.get("registered"), Some(Value::Bool(true)))
                }),
            ),
        );

        let mut instance = blank_instance();
        assert!(property.validate(&Value::Null, &instance).is_empty());

        instance.set("registered", true);
        assert_eq!(property.validate(&Value::Null, &instance).len(), 1);
    }
}
