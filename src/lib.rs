//! strictmodel - a strict, deterministic, schema-driven validation engine
//! for model objects.
//!
//! A [`Schema`] compiles a declarative definition of named properties into
//! reusable validator pipelines. Validating an [`Instance`] walks the
//! properties in definition order, recursively descends into related
//! schemas (single instances or collections), and reports every violation
//! as a dotted path (`company.contacts.1.email`) paired with a message.
//!
//! # Design principles
//!
//! - Schemas are built once and immutable; validation never mutates them
//! - Broken definitions fail fast at construction time
//! - Invalid data never throws; violations are returned as values
//! - Validation is synchronous, pure, and deterministic
//!
//! ```
//! use strictmodel::{Instance, PropertyDef, Schema, SchemaDef};
//!
//! let contact = Schema::new(
//!     SchemaDef::new("Contact")
//!         .property("firstName", PropertyDef::new().presence())
//!         .property("email", PropertyDef::new().presence().email()),
//! )?
//! .into_shared();
//!
//! let mut ned = Instance::new(contact);
//! ned.set("firstName", "Ned");
//! ned.set("email", "oops");
//!
//! let result = ned.validate();
//! assert!(!result.is_valid());
//! assert_eq!(result.errors_on("email"), vec!["is not a valid email address"]);
//! # Ok::<(), strictmodel::DefinitionError>(())
//! ```

pub mod errors;
pub mod inflection;
pub mod instance;
pub mod property;
pub mod registry;
pub mod result;
pub mod schema;
pub mod types;
pub mod validators;
pub mod value;

pub use errors::{DefinitionError, DefinitionResult};
pub use instance::{Instance, Validatable, RESERVED_PROPERTIES};
pub use property::Property;
pub use registry::ModelRegistry;
pub use result::{ValidationResult, Violation};
pub use schema::{is_allowed_property_name, Schema};
pub use types::{EnabledPredicate, OptionSpec, PropertyDef, SchemaDef, ValidatorSpec};
pub use validators::{
    BooleanValidator, EmailValidator, FormatValidator, IntegerValidator, NumberValidator,
    OptionBuilder, PresenceValidator, RelationValidator, Validate, ValidatorRegistry,
};
pub use value::Value;
