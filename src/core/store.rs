//! # Record Store
//!
//! The persistence collaborator. The core never reads from it directly:
//! adapters apply [`Effect`]s here and feed the resulting snapshot back as
//! [`Action::RecordsLoaded`].
//!
//! Only an in-memory store is provided; records live for one session.

use std::fmt;

use chrono::{Duration, Utc};
use log::{debug, info};

use crate::core::action::{Action, Effect};
use crate::core::catalog::OptionCatalog;
use crate::core::field::{FieldName, FieldValue, FieldValues};
use crate::core::record::{ApplicationRecord, RecordStatus, new_record_id};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "no record with id {id}"),
        }
    }
}

impl std::error::Error for StoreError {}

pub trait RecordStore {
    /// Insert a new record or replace the one with the same id in place.
    fn upsert(&mut self, record: ApplicationRecord) -> Result<(), StoreError>;

    fn delete(&mut self, id: &str) -> Result<(), StoreError>;

    /// Every record, in insertion order.
    fn snapshot(&self) -> Vec<ApplicationRecord>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<ApplicationRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ApplicationRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn upsert(&mut self, record: ApplicationRecord) -> Result<(), StoreError> {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => {
                debug!("Store: updating {} ({})", record.id, record.status);
                *existing = record;
            }
            None => {
                debug!("Store: inserting {} ({})", record.id, record.status);
                self.records.push(record);
            }
        }
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        info!("Store: deleted {id}");
        Ok(())
    }

    fn snapshot(&self) -> Vec<ApplicationRecord> {
        self.records.clone()
    }
}

/// Carry out a storage effect. Returns the refresh action to feed back into
/// `update`, or `None` if the effect does not touch storage.
pub fn apply_effect(
    store: &mut dyn RecordStore,
    effect: Effect,
) -> Result<Option<Action>, StoreError> {
    match effect {
        Effect::Persist(record) => store.upsert(record)?,
        Effect::Delete(id) => store.delete(&id)?,
        Effect::None | Effect::Quit => return Ok(None),
    }
    Ok(Some(Action::RecordsLoaded(store.snapshot())))
}

/// A handful of records so the list has something to show on first launch.
pub fn demo_records(catalog: &OptionCatalog) -> Vec<ApplicationRecord> {
    let rows: [(&str, &str, u32, u32, u32, u32, f64, RecordStatus); 6] = [
        ("Maya", "Okafor", 1, 102, 1, 11, 125000.0, RecordStatus::Submitted),
        ("liam", "Chen", 2, 201, 3, 32, 78000.0, RecordStatus::Submitted),
        ("Sofia", "Brandt", 3, 301, 2, 21, 61000.0, RecordStatus::Draft),
        ("Noah", "Fischer", 3, 302, 1, 12, 69000.0, RecordStatus::Submitted),
        ("Aisha", "Rahman", 1, 104, 2, 22, 101000.0, RecordStatus::Draft),
        ("Ethan", "Moreau", 2, 203, 1, 13, 97000.0, RecordStatus::Submitted),
    ];
    let now = Utc::now();

    rows.iter()
        .enumerate()
        .filter(|(_, row)| catalog.city(row.2, row.3).is_some() && catalog.role(row.4, row.5).is_some())
        .map(|(i, &(first, last, country, city, industry, role, salary, status))| {
            let fields: FieldValues = [
                (FieldName::FirstName, FieldValue::Text(first.to_string())),
                (FieldName::LastName, FieldValue::Text(last.to_string())),
                (
                    FieldName::Email,
                    FieldValue::Text(format!("{}.{}@example.com", first, last).to_lowercase()),
                ),
                (FieldName::Phone, FieldValue::Text(format!("+1 555 010 {:04}", 1000 + i))),
                (FieldName::Country, FieldValue::Selection(country)),
                (FieldName::City, FieldValue::Selection(city)),
                (FieldName::Address, FieldValue::Text(format!("{} Market Street", 10 + i))),
                (FieldName::PostalCode, FieldValue::Text(format!("{:05}", 10000 + i * 7))),
                (FieldName::Industry, FieldValue::Selection(industry)),
                (FieldName::Role, FieldValue::Selection(role)),
                (FieldName::ExperienceLevel, FieldValue::Selection(1 + (i as u32 % 4))),
                (FieldName::ExpectedSalary, FieldValue::Number(salary)),
            ]
            .into_iter()
            .collect();
            let created_at = now - Duration::days(i as i64 + 1);
            ApplicationRecord {
                id: new_record_id(),
                status,
                fields,
                created_at,
                updated_at: created_at + Duration::hours(i as i64),
            }
        })
        .collect()
}
