//! Validation outcome types.
//!
//! Violations are data, never errors: a missing, malformed, or wrong-schema
//! value is an expected condition and comes back inside a
//! [`ValidationResult`]. Only broken schema definitions raise
//! [`DefinitionError`](crate::errors::DefinitionError)s.

use std::fmt;

use serde::Serialize;

/// One validation failure: a dotted property path and a message.
///
/// Validators create violations with the path left empty; each enclosing
/// property (or collection index) prepends its own segment as the violation
/// propagates outward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    property: String,
    message: String,
}

impl Violation {
    /// A violation with no path yet; the owning property qualifies it.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            property: String::new(),
            message: message.into(),
        }
    }

    /// A violation at a known path.
    pub fn on(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            message: message.into(),
        }
    }

    /// Dotted property path, e.g. `company.contacts.1.email`.
    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Prepends a path segment: `email` under `contacts.1` becomes
    /// `contacts.1.email`; an unqualified violation becomes `contacts.1`.
    pub fn qualify(mut self, segment: &str) -> Self {
        self.property = if self.property.is_empty() {
            segment.to_string()
        } else {
            format!("{}.{}", segment, self.property)
        };
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.property.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.property, self.message)
        }
    }
}

/// The flattened, queryable outcome of one top-level validation call.
///
/// Created fresh per call, immutable once returned. Violation order is
/// discovery order: properties in definition order, nested violations in the
/// related schema's own order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(transparent)]
pub struct ValidationResult {
    errors: Vec<Violation>,
}

impl ValidationResult {
    pub fn new(errors: Vec<Violation>) -> Self {
        Self { errors }
    }

    /// True iff no violation was recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[Violation] {
        &self.errors
    }

    /// Messages recorded at exactly `path`, in discovery order.
    pub fn errors_on(&self, path: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|violation| violation.property() == path)
            .map(Violation::message)
            .collect()
    }

    pub fn into_errors(self) -> Vec<Violation> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify_sets_path_when_empty() {
        let violation = Violation::new("is required").qualify("firstName");
        assert_eq!(violation.property(), "firstName");
        assert_eq!(violation.message(), "is required");
    }

    #[test]
    fn test_qualify_prepends_to_existing_path() {
        let violation = Violation::on("1.email", "is required").qualify("contacts");
        assert_eq!(violation.property(), "contacts.1.email");
    }

    #[test]
    fn test_errors_on_is_exact_match() {
        let result = ValidationResult::new(vec![
            Violation::on("company.name", "Name is required"),
            Violation::on("company", "is not a valid Company"),
            Violation::on("company.name", "must be an orium!"),
        ]);
        assert_eq!(
            result.errors_on("company.name"),
            vec!["Name is required", "must be an orium!"]
        );
        assert_eq!(result.errors_on("name"), Vec::<&str>::new());
    }

    #[test]
    fn test_validity_matches_error_count() {
        assert!(ValidationResult::new(Vec::new()).is_valid());
        assert!(!ValidationResult::new(vec![Violation::new("nope")]).is_valid());
    }
}
