//! # Actions
//!
//! Everything that can happen in Hireflow becomes an `Action`.
//! User picks a country? That's `Action::SetField(Country, Selection(id))`.
//! Store finished saving? That's `Action::RecordsLoaded(snapshot)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` for the adapter to carry out. No I/O
//! happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::debug;

use crate::core::field::{FieldName, FieldValue};
use crate::core::form::{DependencyReset, FormController};
use crate::core::listing::{ListingRecord, SortDirection, SortField, StatusFilter};
use crate::core::notify::{Confirmation, NoticeLevel};
use crate::core::record::ApplicationRecord;
use crate::core::state::App;
use crate::core::validation::SubmitError;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Form
    SetField(FieldName, FieldValue),
    ClearField(FieldName),
    NextStep,
    PreviousStep,
    SaveDraft,
    Submit,
    NewApplication,
    EditRecord(String),

    // Listing
    RecordsLoaded(Vec<ApplicationRecord>),
    SetFilter(StatusFilter),
    CycleFilter,
    SetSort(SortField, SortDirection),
    ToggleSort(SortField),
    SetPage(usize),
    NextPage,
    PreviousPage,

    // Deletion
    RequestDelete(String),
    ConfirmDelete,
    CancelDelete,

    Quit,
}

/// Work for the adapter after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    Persist(ApplicationRecord),
    Delete(String),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::SetField(field, value) => {
            match app.form.set_field(field, value) {
                Ok(resets) => report_resets(app, &resets),
                Err(e) => app.notify(NoticeLevel::Warning, e.to_string()),
            }
            Effect::None
        }
        Action::ClearField(field) => {
            let resets = app.form.clear_field(field);
            report_resets(app, &resets);
            Effect::None
        }
        Action::NextStep => {
            match app.form.advance() {
                Ok(step) => app.status_message = step.to_string(),
                Err(e) => {
                    let message = format!("Fix {} field(s) to continue", e.fields.len());
                    app.notify(NoticeLevel::Warning, message);
                }
            }
            Effect::None
        }
        Action::PreviousStep => {
            let step = app.form.retreat();
            app.status_message = step.to_string();
            Effect::None
        }
        Action::SaveDraft => {
            let record = app.form.save_draft();
            app.notify(NoticeLevel::Success, "Draft saved");
            Effect::Persist(record)
        }
        Action::Submit => match app.form.submit() {
            Ok(record) => {
                let name = record.applicant_name();
                app.form.reset();
                app.notify(
                    NoticeLevel::Success,
                    format!("Application submitted for {name}"),
                );
                Effect::Persist(record)
            }
            Err(SubmitError::CrossField(e)) => {
                app.notify(NoticeLevel::Failure, e.to_string());
                Effect::None
            }
            Err(SubmitError::Validation(e)) => {
                app.notify(
                    NoticeLevel::Failure,
                    format!("Step {} is incomplete", e.step.index()),
                );
                Effect::None
            }
        },
        Action::NewApplication => {
            app.form.reset();
            app.status_message = String::from("New application");
            Effect::None
        }
        Action::EditRecord(id) => {
            match app.record(&id).cloned() {
                Some(record) => {
                    let (form, resets) = FormController::from_record(app.catalog.clone(), &record);
                    let name = record.applicant_name();
                    app.form = form;
                    app.status_message = format!("Editing {name}");
                    report_resets(app, &resets);
                }
                None => app.notify(NoticeLevel::Warning, format!("Record {id} not found")),
            }
            Effect::None
        }
        Action::RecordsLoaded(records) => {
            let rows = records
                .iter()
                .map(|r| ListingRecord::from_application(r, &app.catalog))
                .collect();
            app.listing.set_records(rows);
            app.records = records;
            Effect::None
        }
        Action::SetFilter(filter) => {
            app.listing.set_filter(filter);
            Effect::None
        }
        Action::CycleFilter => {
            let next = app.listing.view().filter.next();
            app.listing.set_filter(next);
            app.status_message = format!("Filter: {next}");
            Effect::None
        }
        Action::SetSort(field, direction) => {
            app.listing.set_sort(field, direction);
            Effect::None
        }
        Action::ToggleSort(field) => {
            app.listing.toggle_sort(field);
            Effect::None
        }
        Action::SetPage(page) => {
            app.listing.set_page(page);
            Effect::None
        }
        Action::NextPage => {
            app.listing.next_page();
            Effect::None
        }
        Action::PreviousPage => {
            app.listing.previous_page();
            Effect::None
        }
        Action::RequestDelete(id) => {
            let Some(record) = app.record(&id) else {
                app.notify(NoticeLevel::Warning, format!("Record {id} not found"));
                return Effect::None;
            };
            let prompt = format!("Delete application from {}?", record.applicant_name());
            match app.notifier_mut().confirm(&prompt) {
                Confirmation::Granted => delete(app, id),
                Confirmation::Denied => {
                    app.notify(NoticeLevel::Info, "Delete cancelled");
                    Effect::None
                }
                Confirmation::Pending => {
                    app.pending_delete = Some(id);
                    app.status_message = prompt;
                    Effect::None
                }
            }
        }
        Action::ConfirmDelete => match app.pending_delete.take() {
            Some(id) => delete(app, id),
            None => Effect::None,
        },
        Action::CancelDelete => {
            if app.pending_delete.take().is_some() {
                app.notify(NoticeLevel::Info, "Delete cancelled");
            }
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn delete(app: &mut App, id: String) -> Effect {
    // Deleting the application being edited leaves the form open as a new one
    if app.form.record_id() == Some(id.as_str()) {
        app.form.detach_record();
    }
    app.notify(NoticeLevel::Success, "Application deleted");
    Effect::Delete(id)
}

fn report_resets(app: &mut App, resets: &[DependencyReset]) {
    if resets.is_empty() {
        return;
    }
    let message = resets
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    app.notify(NoticeLevel::Info, message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::Step;
    use crate::core::notify::Confirmation;
    use crate::core::record::RecordStatus;
    use crate::test_support::{fill_form, submitted_record, test_app, test_app_confirming};

    #[test]
    fn test_cascade_reset_reaches_status_line() {
        let mut app = test_app();
        update(&mut app, Action::SetField(FieldName::Country, FieldValue::Selection(1)));
        update(&mut app, Action::SetField(FieldName::City, FieldValue::Selection(101)));
        update(&mut app, Action::SetField(FieldName::Country, FieldValue::Selection(2)));
        assert!(app.status_message.contains("City cleared"));
        assert!(app.form.values().selection(FieldName::City).is_none());
    }

    #[test]
    fn test_rejected_field_is_reported() {
        let mut app = test_app();
        update(&mut app, Action::SetField(FieldName::City, FieldValue::Selection(101)));
        assert!(app.status_message.contains("not available"));
    }

    #[test]
    fn test_next_step_blocked_reports_count() {
        let mut app = test_app();
        let effect = update(&mut app, Action::NextStep);
        assert_eq!(effect, Effect::None);
        assert_eq!(app.form.current_step(), Step::Identity);
        assert_eq!(app.status_message, "Fix 4 field(s) to continue");
    }

    #[test]
    fn test_save_draft_persists() {
        let mut app = test_app();
        let effect = update(&mut app, Action::SaveDraft);
        let Effect::Persist(record) = effect else {
            panic!("expected persist effect");
        };
        assert_eq!(record.status, RecordStatus::Draft);
        assert_eq!(app.form.record_id(), Some(record.id.as_str()));
    }

    #[test]
    fn test_submit_success_resets_form() {
        let mut app = test_app();
        fill_form(&mut app);
        let effect = update(&mut app, Action::Submit);
        assert!(matches!(effect, Effect::Persist(ref r) if r.status == RecordStatus::Submitted));
        assert!(app.form.values().is_empty());
        assert!(app.status_message.starts_with("Application submitted"));
    }

    #[test]
    fn test_submit_cross_field_failure_reports_minimum() {
        let mut app = test_app();
        fill_form(&mut app);
        update(
            &mut app,
            Action::SetField(FieldName::ExpectedSalary, FieldValue::Number(75000.0)),
        );
        let effect = update(&mut app, Action::Submit);
        assert_eq!(effect, Effect::None);
        assert!(app.status_message.contains("80000"));
        assert!(!app.form.values().is_empty());
    }

    #[test]
    fn test_records_loaded_feeds_listing() {
        let mut app = test_app();
        let records = vec![
            submitted_record("A", "One", 90000.0),
            submitted_record("B", "Two", 91000.0),
        ];
        update(&mut app, Action::RecordsLoaded(records));
        assert_eq!(app.listing.derive().total_count, 2);
        assert_eq!(app.records.len(), 2);
    }

    #[test]
    fn test_edit_record_loads_form() {
        let mut app = test_app();
        let record = submitted_record("Ada", "Lovelace", 90000.0);
        let id = record.id.clone();
        update(&mut app, Action::RecordsLoaded(vec![record]));
        update(&mut app, Action::EditRecord(id.clone()));
        assert_eq!(app.form.record_id(), Some(id.as_str()));
        assert_eq!(app.form.values().text(FieldName::FirstName), "Ada");
        assert_eq!(app.status_message, "Editing Ada Lovelace");
    }

    #[test]
    fn test_delete_waits_for_confirmation() {
        let mut app = test_app_confirming(Confirmation::Pending);
        let record = submitted_record("A", "One", 90000.0);
        let id = record.id.clone();
        update(&mut app, Action::RecordsLoaded(vec![record]));

        assert_eq!(update(&mut app, Action::RequestDelete(id.clone())), Effect::None);
        assert_eq!(app.pending_delete.as_deref(), Some(id.as_str()));

        assert_eq!(update(&mut app, Action::ConfirmDelete), Effect::Delete(id));
        assert!(app.pending_delete.is_none());
    }

    #[test]
    fn test_delete_cancel() {
        let mut app = test_app_confirming(Confirmation::Pending);
        let record = submitted_record("A", "One", 90000.0);
        let id = record.id.clone();
        update(&mut app, Action::RecordsLoaded(vec![record]));
        update(&mut app, Action::RequestDelete(id));
        assert_eq!(update(&mut app, Action::CancelDelete), Effect::None);
        assert!(app.pending_delete.is_none());
        assert_eq!(update(&mut app, Action::ConfirmDelete), Effect::None);
    }

    #[test]
    fn test_denied_delete_does_nothing() {
        let mut app = test_app_confirming(Confirmation::Denied);
        let record = submitted_record("A", "One", 90000.0);
        let id = record.id.clone();
        update(&mut app, Action::RecordsLoaded(vec![record]));
        assert_eq!(update(&mut app, Action::RequestDelete(id)), Effect::None);
        assert_eq!(app.status_message, "Delete cancelled");
    }

    #[test]
    fn test_deleting_edited_record_detaches_form() {
        let mut app = test_app_confirming(Confirmation::Granted);
        let record = submitted_record("A", "One", 90000.0);
        let id = record.id.clone();
        update(&mut app, Action::RecordsLoaded(vec![record]));
        update(&mut app, Action::EditRecord(id.clone()));
        assert_eq!(update(&mut app, Action::RequestDelete(id.clone())), Effect::Delete(id));
        assert!(app.form.record_id().is_none());
        assert_eq!(app.form.values().text(FieldName::FirstName), "A");
    }

    #[test]
    fn test_cycle_filter_updates_status() {
        let mut app = test_app();
        update(&mut app, Action::CycleFilter);
        assert_eq!(app.status_message, "Filter: draft");
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
