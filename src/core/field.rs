//! # Fields and Steps
//!
//! The application form is a fixed set of named fields, partitioned into
//! three ordered steps:
//!
//! ```text
//! Step 1 Identity   first_name, last_name, email, phone
//! Step 2 Location   country, city, address, postal_code
//! Step 3 Role       industry, role, experience_level, expected_salary
//! ```
//!
//! A field holds at most one typed value. "Unset" is the absence of an entry
//! in `FieldValues`, never a sentinel value.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    FirstName,
    LastName,
    Email,
    Phone,
    Country,
    City,
    Address,
    PostalCode,
    Industry,
    Role,
    ExperienceLevel,
    ExpectedSalary,
}

/// The declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Selection,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Text => write!(f, "text"),
            FieldKind::Number => write!(f, "number"),
            FieldKind::Selection => write!(f, "selection"),
        }
    }
}

impl FieldName {
    pub const ALL: [FieldName; 12] = [
        FieldName::FirstName,
        FieldName::LastName,
        FieldName::Email,
        FieldName::Phone,
        FieldName::Country,
        FieldName::City,
        FieldName::Address,
        FieldName::PostalCode,
        FieldName::Industry,
        FieldName::Role,
        FieldName::ExperienceLevel,
        FieldName::ExpectedSalary,
    ];

    pub fn kind(self) -> FieldKind {
        match self {
            FieldName::Country
            | FieldName::City
            | FieldName::Industry
            | FieldName::Role
            | FieldName::ExperienceLevel => FieldKind::Selection,
            FieldName::ExpectedSalary => FieldKind::Number,
            _ => FieldKind::Text,
        }
    }

    /// Human-readable label used in validation messages and the form view.
    pub fn label(self) -> &'static str {
        match self {
            FieldName::FirstName => "First name",
            FieldName::LastName => "Last name",
            FieldName::Email => "Email",
            FieldName::Phone => "Phone",
            FieldName::Country => "Country",
            FieldName::City => "City",
            FieldName::Address => "Address",
            FieldName::PostalCode => "Postal code",
            FieldName::Industry => "Industry",
            FieldName::Role => "Role",
            FieldName::ExperienceLevel => "Experience level",
            FieldName::ExpectedSalary => "Expected salary",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A typed field value. Selections are option ids; id 0 never names an option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Selection(u32),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Number(_) => FieldKind::Number,
            FieldValue::Selection(_) => FieldKind::Selection,
        }
    }
}

/// The accumulated values of one in-progress application, across all steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValues(BTreeMap<FieldName, FieldValue>);

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: FieldName) -> Option<&FieldValue> {
        self.0.get(&field)
    }

    pub fn is_set(&self, field: FieldName) -> bool {
        self.0.contains_key(&field)
    }

    /// Text value of a field, or `""` when unset or not text.
    pub fn text(&self, field: FieldName) -> &str {
        match self.0.get(&field) {
            Some(FieldValue::Text(s)) => s,
            _ => "",
        }
    }

    pub fn number(&self, field: FieldName) -> Option<f64> {
        match self.0.get(&field) {
            Some(FieldValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn selection(&self, field: FieldName) -> Option<u32> {
        match self.0.get(&field) {
            Some(FieldValue::Selection(id)) if *id != 0 => Some(*id),
            _ => None,
        }
    }

    pub fn insert(&mut self, field: FieldName, value: FieldValue) {
        self.0.insert(field, value);
    }

    pub fn remove(&mut self, field: FieldName) -> Option<FieldValue> {
        self.0.remove(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &FieldValue)> {
        self.0.iter()
    }
}

impl FromIterator<(FieldName, FieldValue)> for FieldValues {
    fn from_iter<T: IntoIterator<Item = (FieldName, FieldValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One page of the multi-step form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Identity,
    Location,
    Role,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::Identity, Step::Location, Step::Role];

    /// 1-based position of the step.
    pub fn index(self) -> usize {
        match self {
            Step::Identity => 1,
            Step::Location => 2,
            Step::Role => 3,
        }
    }

    pub fn count() -> usize {
        Self::ALL.len()
    }

    pub fn next(self) -> Option<Step> {
        match self {
            Step::Identity => Some(Step::Location),
            Step::Location => Some(Step::Role),
            Step::Role => None,
        }
    }

    pub fn previous(self) -> Option<Step> {
        match self {
            Step::Identity => None,
            Step::Location => Some(Step::Identity),
            Step::Role => Some(Step::Location),
        }
    }

    pub fn is_final(self) -> bool {
        self.next().is_none()
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Identity => "Personal details",
            Step::Location => "Location",
            Step::Role => "Role and compensation",
        }
    }

    pub fn fields(self) -> &'static [FieldName] {
        match self {
            Step::Identity => &[
                FieldName::FirstName,
                FieldName::LastName,
                FieldName::Email,
                FieldName::Phone,
            ],
            Step::Location => &[
                FieldName::Country,
                FieldName::City,
                FieldName::Address,
                FieldName::PostalCode,
            ],
            Step::Role => &[
                FieldName::Industry,
                FieldName::Role,
                FieldName::ExperienceLevel,
                FieldName::ExpectedSalary,
            ],
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {}/{}: {}", self.index(), Step::count(), self.title())
    }
}
