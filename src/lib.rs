//! Hireflow library exports for testing

use clap::ValueEnum;

use crate::core::listing::{SortField, StatusFilter};
use crate::core::record::RecordStatus;

pub mod core;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Which screen the terminal UI opens on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Screen {
    #[default]
    Form,
    Records,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ListFilter {
    #[default]
    All,
    Draft,
    Submitted,
}

impl From<ListFilter> for StatusFilter {
    fn from(filter: ListFilter) -> Self {
        match filter {
            ListFilter::All => StatusFilter::All,
            ListFilter::Draft => StatusFilter::Only(RecordStatus::Draft),
            ListFilter::Submitted => StatusFilter::Only(RecordStatus::Submitted),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SortColumn {
    Applicant,
    Email,
    Location,
    Role,
    Salary,
    Updated,
}

impl From<SortColumn> for SortField {
    fn from(column: SortColumn) -> Self {
        match column {
            SortColumn::Applicant => SortField::Applicant,
            SortColumn::Email => SortField::Email,
            SortColumn::Location => SortField::Location,
            SortColumn::Role => SortField::Role,
            SortColumn::Salary => SortField::Salary,
            SortColumn::Updated => SortField::UpdatedAt,
        }
    }
}
