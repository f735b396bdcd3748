//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use chrono::Utc;

use crate::core::action::{Action, update};
use crate::core::catalog::OptionCatalog;
use crate::core::field::{FieldName, FieldValue, FieldValues};
use crate::core::form::FormController;
use crate::core::listing::ListingRecord;
use crate::core::notify::{Confirmation, Notice, Notifier};
use crate::core::record::{ApplicationRecord, RecordStatus, new_record_id};
use crate::core::state::App;

/// A notifier that keeps every notice and answers confirmations with a fixed reply.
pub struct RecordingNotifier {
    pub notices: Vec<Notice>,
    pub reply: Confirmation,
}

impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }

    fn confirm(&mut self, _prompt: &str) -> Confirmation {
        self.reply
    }
}

pub fn text(s: &str) -> FieldValue {
    FieldValue::Text(s.to_string())
}

/// Values that pass every step and the salary floor (Software Engineer, 95k).
pub fn complete_values() -> FieldValues {
    [
        (FieldName::FirstName, text("Ada")),
        (FieldName::LastName, text("Lovelace")),
        (FieldName::Email, text("ada@example.com")),
        (FieldName::Phone, text("+1 555 010 9999")),
        (FieldName::Country, FieldValue::Selection(1)),
        (FieldName::City, FieldValue::Selection(101)),
        (FieldName::Address, text("12 Analytical Way")),
        (FieldName::PostalCode, text("10001")),
        (FieldName::Industry, FieldValue::Selection(1)),
        (FieldName::Role, FieldValue::Selection(11)),
        (FieldName::ExperienceLevel, FieldValue::Selection(3)),
        (FieldName::ExpectedSalary, FieldValue::Number(95000.0)),
    ]
    .into_iter()
    .collect()
}

/// A form holding `complete_values()`, still on the first step.
pub fn filled_form() -> FormController {
    let mut form = FormController::new(Arc::new(OptionCatalog::builtin()));
    let values = complete_values();
    // FieldName::ALL lists sources before their dependents
    for field in FieldName::ALL {
        if let Some(value) = values.get(field) {
            form.set_field(field, value.clone())
                .expect("fixture value is allowed");
        }
    }
    form
}

/// Enter `complete_values()` into an app through actions.
pub fn fill_form(app: &mut App) {
    let values = complete_values();
    for field in FieldName::ALL {
        if let Some(value) = values.get(field) {
            update(app, Action::SetField(field, value.clone()));
        }
    }
}

pub fn submitted_record(first: &str, last: &str, salary: f64) -> ApplicationRecord {
    let mut fields = complete_values();
    fields.insert(FieldName::FirstName, text(first));
    fields.insert(FieldName::LastName, text(last));
    fields.insert(FieldName::ExpectedSalary, FieldValue::Number(salary));
    let now = Utc::now();
    ApplicationRecord {
        id: new_record_id(),
        status: RecordStatus::Submitted,
        fields,
        created_at: now,
        updated_at: now,
    }
}

pub fn listing(applicant: &str, salary: f64, status: RecordStatus) -> ListingRecord {
    ListingRecord {
        id: new_record_id(),
        applicant: applicant.to_string(),
        email: format!("{}@example.com", applicant.to_lowercase()),
        location: String::new(),
        role: String::new(),
        expected_salary: Some(salary),
        status,
        updated_at: Utc::now(),
    }
}

pub fn test_app_confirming(reply: Confirmation) -> App {
    App::new(
        Arc::new(OptionCatalog::builtin()),
        5,
        Box::new(RecordingNotifier {
            notices: Vec::new(),
            reply,
        }),
    )
}

/// Creates a test App with a RecordingNotifier that defers confirmations.
pub fn test_app() -> App {
    test_app_confirming(Confirmation::Pending)
}
