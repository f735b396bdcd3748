//! # Validation
//!
//! Per-field rules, grouped by step, plus the submit-time cross-field rule.
//!
//! Error taxonomy:
//!
//! - [`FieldValidationError`]: one field failed its rule.
//! - [`ValidationError`]: every failing field of one step, in field order.
//! - [`CrossFieldValidationError`]: the expected salary is below the
//!   selected role's minimum. Checked only at submit time.
//! - [`SubmitError`]: either of the two above, as returned by submit.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::catalog::OptionCatalog;
use crate::core::field::{FieldName, FieldValues, Step};

pub const MIN_NAME_LEN: usize = 2;
pub const MIN_ADDRESS_LEN: usize = 5;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

// Digits with optional leading +, spaces, dashes, dots and parentheses.
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9][0-9\s\-().]{5,19}$").expect("phone pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq)]
pub struct FieldValidationError {
    pub field: FieldName,
    pub reason: String,
}

impl fmt::Display for FieldValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.label(), self.reason)
    }
}

impl std::error::Error for FieldValidationError {}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub step: Step,
    pub fields: Vec<FieldValidationError>,
}

impl ValidationError {
    pub fn errors_by_field(&self) -> BTreeMap<FieldName, String> {
        self.fields
            .iter()
            .map(|e| (e.field, e.reason.clone()))
            .collect()
    }

    pub fn contains(&self, field: FieldName) -> bool {
        self.fields.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {} has {} invalid field(s): ",
            self.step.index(),
            self.fields.len()
        )?;
        let names: Vec<&str> = self.fields.iter().map(|e| e.field.label()).collect();
        write!(f, "{}", names.join(", "))
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossFieldRule {
    /// Expected salary must be at least the selected role's `min_salary`.
    SalaryMeetsRoleMinimum,
}

impl fmt::Display for CrossFieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrossFieldRule::SalaryMeetsRoleMinimum => write!(f, "salary meets role minimum"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrossFieldValidationError {
    pub rule: CrossFieldRule,
    /// The field the failure is displayed against.
    pub field: FieldName,
    pub role: String,
    pub required_minimum: f64,
    pub actual: f64,
}

impl fmt::Display for CrossFieldValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} must be at least {} for {} (got {})",
            self.field.label(),
            self.required_minimum,
            self.role,
            self.actual
        )
    }
}

impl std::error::Error for CrossFieldValidationError {}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitError {
    Validation(ValidationError),
    CrossField(CrossFieldValidationError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Validation(e) => write!(f, "cannot submit: {e}"),
            SubmitError::CrossField(e) => write!(f, "cannot submit: {e}"),
        }
    }
}

impl std::error::Error for SubmitError {}

impl From<ValidationError> for SubmitError {
    fn from(e: ValidationError) -> Self {
        SubmitError::Validation(e)
    }
}

impl From<CrossFieldValidationError> for SubmitError {
    fn from(e: CrossFieldValidationError) -> Self {
        SubmitError::CrossField(e)
    }
}

/// Run every rule of `step`, collecting all failures.
pub fn validate_step(
    step: Step,
    values: &FieldValues,
    catalog: &OptionCatalog,
) -> Result<(), ValidationError> {
    let fields: Vec<FieldValidationError> = step
        .fields()
        .iter()
        .filter_map(|&field| {
            check_field(field, values, catalog).map(|reason| FieldValidationError { field, reason })
        })
        .collect();

    if fields.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { step, fields })
    }
}

/// Returns the failure reason for one field, or `None` if it passes.
pub fn check_field(field: FieldName, values: &FieldValues, catalog: &OptionCatalog) -> Option<String> {
    let label = field.label();
    match field {
        FieldName::FirstName | FieldName::LastName => {
            let text = values.text(field).trim();
            if text.is_empty() {
                Some(format!("{label} is required"))
            } else if text.chars().count() < MIN_NAME_LEN {
                Some(format!("{label} must be at least {MIN_NAME_LEN} characters"))
            } else {
                None
            }
        }
        FieldName::Email => {
            let text = values.text(field).trim();
            if text.is_empty() {
                Some("Email is required".to_string())
            } else if !EMAIL_PATTERN.is_match(text) {
                Some("Enter a valid email address".to_string())
            } else {
                None
            }
        }
        FieldName::Phone => {
            let text = values.text(field).trim();
            if text.is_empty() {
                Some("Phone is required".to_string())
            } else if !PHONE_PATTERN.is_match(text) {
                Some("Enter a valid phone number".to_string())
            } else {
                None
            }
        }
        FieldName::Address => {
            if values.text(field).trim().chars().count() < MIN_ADDRESS_LEN {
                Some(format!("Address must be at least {MIN_ADDRESS_LEN} characters"))
            } else {
                None
            }
        }
        FieldName::PostalCode => {
            if values.text(field).trim().is_empty() {
                Some("Postal code is required".to_string())
            } else {
                None
            }
        }
        FieldName::Country | FieldName::Industry | FieldName::ExperienceLevel => {
            let listed = match field {
                FieldName::Country => catalog.countries(),
                FieldName::Industry => catalog.industries(),
                _ => catalog.experience_levels(),
            };
            match values.selection(field) {
                None => Some(format!("Select a {}", label.to_lowercase())),
                Some(id) if !listed.iter().any(|o| o.id == id) => {
                    Some(format!("Selected {} is not in the option list", label.to_lowercase()))
                }
                Some(_) => None,
            }
        }
        FieldName::City => check_dependent(
            values.selection(FieldName::City),
            values
                .selection(FieldName::Country)
                .map(|country| catalog.cities(country))
                .unwrap_or(&[]),
            "city",
            "country",
        ),
        FieldName::Role => check_dependent(
            values.selection(FieldName::Role),
            values
                .selection(FieldName::Industry)
                .map(|industry| catalog.roles(industry))
                .unwrap_or(&[]),
            "role",
            "industry",
        ),
        FieldName::ExpectedSalary => match values.number(field) {
            Some(n) if n.is_finite() && n > 0.0 => None,
            Some(_) => Some("Expected salary must be a positive number".to_string()),
            None => Some("Expected salary is required".to_string()),
        },
    }
}

fn check_dependent(
    selected: Option<u32>,
    allowed: &[crate::core::catalog::OptionItem],
    noun: &str,
    parent: &str,
) -> Option<String> {
    match selected {
        None => Some(format!("Select a {noun}")),
        Some(id) if !allowed.iter().any(|o| o.id == id) => {
            Some(format!("Selected {noun} is not available for this {parent}"))
        }
        Some(_) => None,
    }
}

/// Expected salary must meet the selected role's minimum.
///
/// Passes when no role or salary is selected (those are per-field failures),
/// or when the role has no minimum.
pub fn check_salary_floor(
    values: &FieldValues,
    catalog: &OptionCatalog,
) -> Result<(), CrossFieldValidationError> {
    let (Some(industry), Some(role_id), Some(salary)) = (
        values.selection(FieldName::Industry),
        values.selection(FieldName::Role),
        values.number(FieldName::ExpectedSalary),
    ) else {
        return Ok(());
    };
    let Some(role) = catalog.role(industry, role_id) else {
        return Ok(());
    };
    match role.min_salary {
        Some(minimum) if salary < minimum => Err(CrossFieldValidationError {
            rule: CrossFieldRule::SalaryMeetsRoleMinimum,
            field: FieldName::ExpectedSalary,
            role: role.name.clone(),
            required_minimum: minimum,
            actual: salary,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldValue;
    use crate::test_support::{complete_values, text};

    #[test]
    fn test_identity_step_reports_every_failure() {
        let values: FieldValues = [
            (FieldName::FirstName, text("A")),
            (FieldName::Email, text("not-an-email")),
        ]
        .into_iter()
        .collect();
        let err = validate_step(Step::Identity, &values, &OptionCatalog::builtin()).unwrap_err();
        assert_eq!(err.fields.len(), 4);
        let by_field = err.errors_by_field();
        assert!(by_field[&FieldName::FirstName].contains("at least 2"));
        assert!(by_field[&FieldName::LastName].contains("required"));
        assert!(by_field[&FieldName::Email].contains("valid email"));
        assert!(by_field[&FieldName::Phone].contains("required"));
    }

    #[test]
    fn test_complete_values_pass_every_step() {
        let catalog = OptionCatalog::builtin();
        let values = complete_values();
        for step in Step::ALL {
            assert!(validate_step(step, &values, &catalog).is_ok(), "{step:?}");
        }
    }

    #[test]
    fn test_phone_pattern_is_permissive() {
        for ok in ["+1 (555) 010-9999", "555.010.9999", "0049 30 123456"] {
            assert!(PHONE_PATTERN.is_match(ok), "{ok}");
        }
        for bad in ["call me", "12", "+", "555-CALL-NOW"] {
            assert!(!PHONE_PATTERN.is_match(bad), "{bad}");
        }
    }

    #[test]
    fn test_city_must_belong_to_country() {
        let catalog = OptionCatalog::builtin();
        let mut values = complete_values();
        // Toronto is a Canadian city, the fixture's country is the US
        values.insert(FieldName::City, FieldValue::Selection(201));
        let err = validate_step(Step::Location, &values, &catalog).unwrap_err();
        assert!(err.contains(FieldName::City));
        assert_eq!(err.fields.len(), 1);
    }

    #[test]
    fn test_unlisted_experience_level_fails() {
        let catalog = OptionCatalog::builtin();
        let mut values = complete_values();
        values.insert(FieldName::ExperienceLevel, FieldValue::Selection(99));
        let err = validate_step(Step::Role, &values, &catalog).unwrap_err();
        assert!(err.contains(FieldName::ExperienceLevel));
        assert!(err.errors_by_field()[&FieldName::ExperienceLevel].contains("not in the option list"));
    }

    #[test]
    fn test_salary_must_be_positive() {
        let catalog = OptionCatalog::builtin();
        let mut values = complete_values();
        values.insert(FieldName::ExpectedSalary, FieldValue::Number(0.0));
        let err = validate_step(Step::Role, &values, &catalog).unwrap_err();
        assert!(err.contains(FieldName::ExpectedSalary));
    }

    #[test]
    fn test_step_validation_ignores_salary_floor() {
        let catalog = OptionCatalog::builtin();
        let mut values = complete_values();
        values.insert(FieldName::ExpectedSalary, FieldValue::Number(1000.0));
        assert!(validate_step(Step::Role, &values, &catalog).is_ok());
        assert!(check_salary_floor(&values, &catalog).is_err());
    }

    #[test]
    fn test_salary_floor_message_names_minimum() {
        let catalog = OptionCatalog::builtin();
        let mut values = complete_values();
        values.insert(FieldName::ExpectedSalary, FieldValue::Number(75000.0));
        let err = check_salary_floor(&values, &catalog).unwrap_err();
        assert_eq!(err.required_minimum, 80000.0);
        assert_eq!(err.field, FieldName::ExpectedSalary);
        assert!(err.to_string().contains("80000"));
    }

    #[test]
    fn test_salary_at_minimum_passes() {
        let catalog = OptionCatalog::builtin();
        let mut values = complete_values();
        values.insert(FieldName::ExpectedSalary, FieldValue::Number(80000.0));
        assert!(check_salary_floor(&values, &catalog).is_ok());
    }
}
