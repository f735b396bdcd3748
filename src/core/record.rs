//! # Application Records
//!
//! A record is a snapshot of the form's values plus a status tag. The same
//! identifier is reused across every save of one in-progress application.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::field::{FieldName, FieldValues};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Draft,
    Submitted,
}

impl RecordStatus {
    pub fn label(self) -> &'static str {
        match self {
            RecordStatus::Draft => "draft",
            RecordStatus::Submitted => "submitted",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: String,
    pub status: RecordStatus,
    pub fields: FieldValues,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationRecord {
    /// "First Last", or "Unnamed applicant" when both are blank.
    pub fn applicant_name(&self) -> String {
        let first = self.fields.text(FieldName::FirstName).trim();
        let last = self.fields.text(FieldName::LastName).trim();
        let name = format!("{first} {last}");
        let name = name.trim();
        if name.is_empty() {
            "Unnamed applicant".to_string()
        } else {
            name.to_string()
        }
    }
}

/// Generate a new UUID v4 record ID.
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
