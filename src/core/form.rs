//! # Form State Controller
//!
//! Owns the current step, the accumulated field values, the identifier of
//! the application being edited, and per-field error state.
//!
//! ```text
//! FormController
//! ├── catalog: Arc<OptionCatalog>    // option-set provider
//! ├── values: FieldValues            // all steps, validated or not
//! ├── step: Step                     // Identity → Location → Role
//! ├── record_id: Option<String>      // None until first save
//! ├── created_at: Option<DateTime>   // set on first save
//! └── errors: BTreeMap               // field → inline message
//! ```
//!
//! ## Dependency cascade
//!
//! Some selection fields draw their options from another field's value:
//!
//! ```text
//! country  ──► city
//! industry ──► role
//! ```
//!
//! Every change to a source recomputes the dependent's allowed options and
//! clears the dependent if its value fell out of the set. This happens inside
//! the same `&mut self` call that changed the source, so no caller can observe
//! a stale (value, options) pair. Each clear is returned as a
//! [`DependencyReset`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::core::catalog::{OptionCatalog, OptionItem};
use crate::core::field::{FieldKind, FieldName, FieldValue, FieldValues, Step};
use crate::core::record::{ApplicationRecord, RecordStatus, new_record_id};
use crate::core::validation::{self, SubmitError, ValidationError};

/// Field `dependent` draws its options from field `source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
    pub source: FieldName,
    pub dependent: FieldName,
}

pub const DEPENDENCIES: [Dependency; 2] = [
    Dependency {
        source: FieldName::Country,
        dependent: FieldName::City,
    },
    Dependency {
        source: FieldName::Industry,
        dependent: FieldName::Role,
    },
];

/// A dependent field was cleared because its source changed.
///
/// When loading a record, a selection that is no longer in the catalog is
/// cleared too; `source == field` marks that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyReset {
    pub field: FieldName,
    pub source: FieldName,
    /// The selection id that was cleared.
    pub previous: u32,
}

impl fmt::Display for DependencyReset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.source == self.field {
            return write!(f, "{} cleared: no longer in the option list", self.field.label());
        }
        write!(
            f,
            "{} cleared: not available for the selected {}",
            self.field.label(),
            self.source.label().to_lowercase()
        )
    }
}

/// A rejected `set_field` call. The form is left unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    TypeMismatch {
        field: FieldName,
        expected: FieldKind,
        found: FieldKind,
    },
    NotFinite {
        field: FieldName,
    },
    /// The field has no options to choose from right now.
    Disabled {
        field: FieldName,
    },
    UnknownOption {
        field: FieldName,
        id: u32,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::TypeMismatch {
                field,
                expected,
                found,
            } => write!(f, "{field} expects a {expected} value, got {found}"),
            FieldError::NotFinite { field } => write!(f, "{field} must be a finite number"),
            FieldError::Disabled { field } => write!(f, "{field} is not available yet"),
            FieldError::UnknownOption { field, id } => {
                write!(f, "{field}: option {id} is not one of the allowed choices")
            }
        }
    }
}

impl std::error::Error for FieldError {}

pub struct FormController {
    catalog: Arc<OptionCatalog>,
    values: FieldValues,
    step: Step,
    record_id: Option<String>,
    created_at: Option<DateTime<Utc>>,
    errors: BTreeMap<FieldName, String>,
}

impl FormController {
    pub fn new(catalog: Arc<OptionCatalog>) -> Self {
        Self {
            catalog,
            values: FieldValues::new(),
            step: Step::Identity,
            record_id: None,
            created_at: None,
            errors: BTreeMap::new(),
        }
    }

    /// Start editing an existing record. Keeps its id and creation time.
    ///
    /// Selections that no longer fit the catalog are cleared and reported:
    /// unknown top-level ids first, then dependents via the cascade.
    pub fn from_record(
        catalog: Arc<OptionCatalog>,
        record: &ApplicationRecord,
    ) -> (Self, Vec<DependencyReset>) {
        let mut form = Self::new(catalog);
        form.values = record.fields.clone();
        form.record_id = Some(record.id.clone());
        form.created_at = Some(record.created_at);

        let mut resets = Vec::new();
        let top_level = FieldName::ALL.into_iter().filter(|field| {
            field.kind() == FieldKind::Selection
                && !DEPENDENCIES.iter().any(|d| d.dependent == *field)
        });
        for field in top_level {
            if let Some(id) = form.values.selection(field)
                && !form.allowed_options(field).iter().any(|o| o.id == id)
            {
                form.values.remove(field);
                resets.push(DependencyReset {
                    field,
                    source: field,
                    previous: id,
                });
            }
        }
        for dep in DEPENDENCIES {
            resets.extend(form.cascade(dep.source));
        }
        debug!(
            "Editing record {} ({} fields, {} reset)",
            record.id,
            form.values.len(),
            resets.len()
        );
        (form, resets)
    }

    pub fn catalog(&self) -> &OptionCatalog {
        &self.catalog
    }

    pub fn current_step(&self) -> Step {
        self.step
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    pub fn errors(&self) -> &BTreeMap<FieldName, String> {
        &self.errors
    }

    pub fn error(&self, field: FieldName) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Options currently selectable for `field`.
    ///
    /// Empty for non-selection fields and for dependents whose source is unset
    /// or has no children.
    pub fn allowed_options(&self, field: FieldName) -> &[OptionItem] {
        match field {
            FieldName::Country => self.catalog.countries(),
            FieldName::Industry => self.catalog.industries(),
            FieldName::ExperienceLevel => self.catalog.experience_levels(),
            FieldName::City => match self.values.selection(FieldName::Country) {
                Some(country) => self.catalog.cities(country),
                None => &[],
            },
            FieldName::Role => match self.values.selection(FieldName::Industry) {
                Some(industry) => self.catalog.roles(industry),
                None => &[],
            },
            _ => &[],
        }
    }

    /// Text and number fields are always enabled; selections need options.
    pub fn is_enabled(&self, field: FieldName) -> bool {
        match field.kind() {
            FieldKind::Selection => !self.allowed_options(field).is_empty(),
            _ => true,
        }
    }

    /// Set a field and run the dependency cascade.
    ///
    /// `Selection(0)` and empty text clear the field. Returns every dependent
    /// field the cascade cleared.
    pub fn set_field(
        &mut self,
        field: FieldName,
        value: FieldValue,
    ) -> Result<Vec<DependencyReset>, FieldError> {
        if value.kind() != field.kind() {
            return Err(FieldError::TypeMismatch {
                field,
                expected: field.kind(),
                found: value.kind(),
            });
        }

        match &value {
            FieldValue::Selection(0) => return Ok(self.clear_field(field)),
            FieldValue::Text(s) if s.is_empty() => return Ok(self.clear_field(field)),
            FieldValue::Number(n) if !n.is_finite() => {
                return Err(FieldError::NotFinite { field });
            }
            FieldValue::Selection(id) => {
                if !self.is_enabled(field) {
                    return Err(FieldError::Disabled { field });
                }
                if !self.allowed_options(field).iter().any(|o| o.id == *id) {
                    return Err(FieldError::UnknownOption { field, id: *id });
                }
            }
            _ => {}
        }

        self.values.insert(field, value);
        self.errors.remove(&field);
        Ok(self.cascade(field))
    }

    pub fn clear_field(&mut self, field: FieldName) -> Vec<DependencyReset> {
        self.values.remove(field);
        self.errors.remove(&field);
        self.cascade(field)
    }

    /// Clear every dependent (transitively) whose value left its allowed set.
    fn cascade(&mut self, source: FieldName) -> Vec<DependencyReset> {
        let mut resets = Vec::new();
        let mut changed = vec![source];

        while let Some(current) = changed.pop() {
            for dep in DEPENDENCIES.iter().filter(|d| d.source == current) {
                let Some(selected) = self.values.selection(dep.dependent) else {
                    continue;
                };
                if self
                    .allowed_options(dep.dependent)
                    .iter()
                    .any(|o| o.id == selected)
                {
                    continue;
                }
                self.values.remove(dep.dependent);
                debug!(
                    "Cascade: {:?} cleared (was {}) after {:?} changed",
                    dep.dependent, selected, dep.source
                );
                resets.push(DependencyReset {
                    field: dep.dependent,
                    source: dep.source,
                    previous: selected,
                });
                changed.push(dep.dependent);
            }
        }

        resets
    }

    pub fn validate_step(&self, step: Step) -> Result<(), ValidationError> {
        validation::validate_step(step, &self.values, &self.catalog)
    }

    /// Move to the next step if the current one validates.
    ///
    /// On failure the step and values are untouched and the failing fields'
    /// messages are recorded as error state. On the final step a passing
    /// validation leaves the step where it is.
    pub fn advance(&mut self) -> Result<Step, ValidationError> {
        match self.validate_step(self.step) {
            Ok(()) => {
                self.clear_step_errors(self.step);
                if let Some(next) = self.step.next() {
                    debug!("Advance: {:?} -> {:?}", self.step, next);
                    self.step = next;
                }
                Ok(self.step)
            }
            Err(e) => {
                debug!("Advance blocked on {:?}: {}", self.step, e);
                self.record_errors(&e);
                Err(e)
            }
        }
    }

    /// Go back one step without validating. Values are kept.
    pub fn retreat(&mut self) -> Step {
        if let Some(previous) = self.step.previous() {
            debug!("Retreat: {:?} -> {:?}", self.step, previous);
            self.step = previous;
        }
        self.step
    }

    /// Snapshot the form as a draft, whatever its validity.
    pub fn save_draft(&mut self) -> ApplicationRecord {
        let record = self.snapshot(RecordStatus::Draft);
        info!("Draft saved: {}", record.id);
        record
    }

    /// Validate every step, then the salary floor, and emit a submitted record.
    pub fn submit(&mut self) -> Result<ApplicationRecord, SubmitError> {
        for step in Step::ALL {
            if let Err(e) = self.validate_step(step) {
                self.record_errors(&e);
                return Err(e.into());
            }
        }

        if let Err(e) = validation::check_salary_floor(&self.values, &self.catalog) {
            self.errors.insert(e.field, e.to_string());
            return Err(e.into());
        }

        self.errors.clear();
        let record = self.snapshot(RecordStatus::Submitted);
        info!("Application submitted: {}", record.id);
        Ok(record)
    }

    /// Start a fresh application.
    pub fn reset(&mut self) {
        self.values = FieldValues::new();
        self.step = Step::Identity;
        self.record_id = None;
        self.created_at = None;
        self.errors.clear();
    }

    /// Forget the record identity so the next save mints a new one.
    pub fn detach_record(&mut self) {
        self.record_id = None;
        self.created_at = None;
    }

    fn snapshot(&mut self, status: RecordStatus) -> ApplicationRecord {
        let now = Utc::now();
        let id = self.record_id.get_or_insert_with(new_record_id).clone();
        let created_at = *self.created_at.get_or_insert(now);
        ApplicationRecord {
            id,
            status,
            fields: self.values.clone(),
            created_at,
            updated_at: now,
        }
    }

    fn clear_step_errors(&mut self, step: Step) {
        for field in step.fields() {
            self.errors.remove(field);
        }
    }

    fn record_errors(&mut self, error: &ValidationError) {
        self.clear_step_errors(error.step);
        for e in &error.fields {
            self.errors.insert(e.field, e.reason.clone());
        }
    }
}
