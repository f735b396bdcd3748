//! # List View Engine
//!
//! Derives the visible page of a record collection from the current view
//! state. Filtering, sorting and pagination all happen in [`derive`], a pure
//! function, so the same inputs always produce the same page.
//!
//! ```text
//! records ─► filter(status) ─► stable sort(field, dir) ─► slice(page, size)
//! ```

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::catalog::OptionCatalog;
use crate::core::field::FieldName;
use crate::core::record::{ApplicationRecord, RecordStatus};

pub const DEFAULT_PAGE_SIZE: usize = 5;

/// The row projection of an application record, with ids resolved to names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingRecord {
    pub id: String,
    pub applicant: String,
    pub email: String,
    pub location: String,
    pub role: String,
    pub expected_salary: Option<f64>,
    pub status: RecordStatus,
    pub updated_at: DateTime<Utc>,
}

impl ListingRecord {
    pub fn from_application(record: &ApplicationRecord, catalog: &OptionCatalog) -> Self {
        let fields = &record.fields;
        let country = fields.selection(FieldName::Country);
        let city = country
            .zip(fields.selection(FieldName::City))
            .and_then(|(country, city)| catalog.city(country, city));
        let location = match (city, country.and_then(|c| catalog.country(c))) {
            (Some(city), Some(country)) => format!("{}, {}", city.name, country.name),
            (None, Some(country)) => country.name.clone(),
            _ => String::new(),
        };
        let role = fields
            .selection(FieldName::Industry)
            .zip(fields.selection(FieldName::Role))
            .and_then(|(industry, role)| catalog.role(industry, role))
            .map(|r| r.name.clone())
            .unwrap_or_default();

        Self {
            id: record.id.clone(),
            applicant: record.applicant_name(),
            email: fields.text(FieldName::Email).to_string(),
            location,
            role,
            expected_salary: fields.number(FieldName::ExpectedSalary),
            status: record.status,
            updated_at: record.updated_at,
        }
    }

    fn sort_key(&self, field: SortField) -> SortKey {
        match field {
            SortField::Applicant => SortKey::Text(self.applicant.to_lowercase()),
            SortField::Email => SortKey::Text(self.email.to_lowercase()),
            SortField::Location => SortKey::Text(self.location.to_lowercase()),
            SortField::Role => SortKey::Text(self.role.to_lowercase()),
            SortField::Salary => SortKey::Number(self.expected_salary),
            SortField::UpdatedAt => SortKey::Timestamp(self.updated_at),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Applicant,
    Email,
    Location,
    Role,
    Salary,
    UpdatedAt,
}

impl SortField {
    /// Column order in the records table.
    pub const ALL: [SortField; 6] = [
        SortField::Applicant,
        SortField::Email,
        SortField::Location,
        SortField::Role,
        SortField::Salary,
        SortField::UpdatedAt,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortField::Applicant => "Applicant",
            SortField::Email => "Email",
            SortField::Location => "Location",
            SortField::Role => "Role",
            SortField::Salary => "Salary",
            SortField::UpdatedAt => "Updated",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Only(RecordStatus),
}

impl StatusFilter {
    pub fn matches(self, status: RecordStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }

    /// All → Draft → Submitted → All.
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Only(RecordStatus::Draft),
            StatusFilter::Only(RecordStatus::Draft) => StatusFilter::Only(RecordStatus::Submitted),
            StatusFilter::Only(RecordStatus::Submitted) => StatusFilter::All,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => write!(f, "{status}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub filter: StatusFilter,
    pub sort: Option<SortSpec>,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            filter: StatusFilter::All,
            sort: None,
            page: 1,
            page_size: page_size.max(1),
        }
    }
}

/// The output of [`derive`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListPage<'a> {
    pub visible: Vec<&'a ListingRecord>,
    pub total_count: usize,
    pub total_pages: usize,
    pub page: usize,
}

impl ListPage<'_> {
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}

enum SortKey {
    Text(String),
    Number(Option<f64>),
    Timestamp(DateTime<Utc>),
}

/// Missing numbers order before present ones.
fn compare_keys(a: &SortKey, b: &SortKey) -> Ordering {
    match (a, b) {
        (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
        (SortKey::Number(x), SortKey::Number(y)) => match (x, y) {
            (Some(x), Some(y)) => x.total_cmp(y),
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
        },
        (SortKey::Timestamp(x), SortKey::Timestamp(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Pages needed for `count` rows; never less than 1.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Filter, stable-sort and slice `records` according to `view`.
pub fn derive<'a>(records: &'a [ListingRecord], view: &ViewState) -> ListPage<'a> {
    let mut rows: Vec<&ListingRecord> = records
        .iter()
        .filter(|r| view.filter.matches(r.status))
        .collect();

    if let Some(spec) = view.sort {
        let mut keyed: Vec<(SortKey, &ListingRecord)> =
            rows.into_iter().map(|r| (r.sort_key(spec.field), r)).collect();
        // sort_by is stable: equal keys keep collection order
        keyed.sort_by(|a, b| spec.direction.apply(compare_keys(&a.0, &b.0)));
        rows = keyed.into_iter().map(|(_, r)| r).collect();
    }

    let page_size = view.page_size.max(1);
    let total_count = rows.len();
    let total_pages = total_pages(total_count, page_size);
    let page = view.page.clamp(1, total_pages);
    let visible = rows
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    ListPage {
        visible,
        total_count,
        total_pages,
        page,
    }
}

/// A record collection plus the view state over it.
#[derive(Debug, Clone)]
pub struct ListView {
    records: Vec<ListingRecord>,
    view: ViewState,
}

impl ListView {
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            view: ViewState::new(page_size),
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    /// Replace the collection. The page is re-clamped to the new size.
    pub fn set_records(&mut self, records: Vec<ListingRecord>) {
        self.records = records;
        self.clamp_page();
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.view.filter = filter;
        self.view.page = 1;
    }

    pub fn set_sort(&mut self, field: SortField, direction: SortDirection) {
        self.view.sort = Some(SortSpec { field, direction });
    }

    /// Flip direction on the active field, otherwise sort ascending by `field`.
    pub fn toggle_sort(&mut self, field: SortField) {
        let direction = match self.view.sort {
            Some(spec) if spec.field == field => spec.direction.flipped(),
            _ => SortDirection::Asc,
        };
        self.set_sort(field, direction);
    }

    pub fn set_page(&mut self, page: usize) {
        self.view.page = page.clamp(1, self.total_pages());
    }

    pub fn next_page(&mut self) {
        self.set_page(self.view.page + 1);
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.view.page.saturating_sub(1));
    }

    pub fn total_pages(&self) -> usize {
        let count = self
            .records
            .iter()
            .filter(|r| self.view.filter.matches(r.status))
            .count();
        total_pages(count, self.view.page_size)
    }

    pub fn derive(&self) -> ListPage<'_> {
        derive(&self.records, &self.view)
    }

    fn clamp_page(&mut self) {
        let total = self.total_pages();
        if self.view.page > total {
            self.view.page = total;
        }
    }
}
