//! # Option Catalog
//!
//! Supplies the ordered option lists behind every selection field.
//! Top-level lists (countries, industries, experience levels) are flat;
//! dependent lists (cities, roles) are keyed by their parent's id.
//!
//! ```text
//! countries ──► cities[country_id]
//! industries ─► roles[industry_id]      (each role carries min_salary)
//! experience_levels
//! ```
//!
//! Data is validated once when the catalog is built. After that, lookups
//! never fail: an unknown parent id simply has no children.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionItem {
    pub id: u32,
    pub name: String,
    /// Lowest acceptable expected salary. Only meaningful for roles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_salary: Option<f64>,
}

impl OptionItem {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            min_salary: None,
        }
    }

    pub fn with_min_salary(mut self, min_salary: f64) -> Self {
        self.min_salary = Some(min_salary);
        self
    }
}

/// A row in a dependent list, as written in a catalog file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildOption {
    pub parent: u32,
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub min_salary: Option<f64>,
}

/// On-disk catalog shape (all lists optional for sparse TOML).
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub countries: Vec<OptionItem>,
    #[serde(default)]
    pub cities: Vec<ChildOption>,
    #[serde(default)]
    pub industries: Vec<OptionItem>,
    #[serde(default)]
    pub roles: Vec<ChildOption>,
    #[serde(default)]
    pub experience_levels: Vec<OptionItem>,
}

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    /// An option uses id 0, which is reserved for "unset".
    ZeroId { list: &'static str, name: String },
    DuplicateId { list: &'static str, id: u32 },
    NegativeMinimum { role: String },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(e) => write!(f, "catalog I/O error: {e}"),
            CatalogError::Parse(e) => write!(f, "catalog parse error: {e}"),
            CatalogError::ZeroId { list, name } => {
                write!(f, "{list}: option '{name}' uses reserved id 0")
            }
            CatalogError::DuplicateId { list, id } => write!(f, "{list}: duplicate id {id}"),
            CatalogError::NegativeMinimum { role } => {
                write!(f, "roles: '{role}' has a negative min_salary")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionCatalog {
    countries: Vec<OptionItem>,
    cities: HashMap<u32, Vec<OptionItem>>,
    industries: Vec<OptionItem>,
    roles: HashMap<u32, Vec<OptionItem>>,
    experience_levels: Vec<OptionItem>,
}

impl OptionCatalog {
    /// Load and validate a catalog from a TOML file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(CatalogError::Io)?;
        let catalog = Self::from_toml_str(&contents)?;
        info!("Loaded option catalog from {}", path.display());
        Ok(catalog)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(contents).map_err(CatalogError::Parse)?;
        Self::from_file(file)
    }

    /// Build a catalog from raw rows.
    ///
    /// Rejects id 0, duplicate ids within a list (or within one parent's
    /// children), and negative role minimums. Children whose parent does not
    /// exist are dropped with a warning.
    pub fn from_file(file: CatalogFile) -> Result<Self, CatalogError> {
        check_flat("countries", &file.countries)?;
        check_flat("industries", &file.industries)?;
        check_flat("experience_levels", &file.experience_levels)?;

        let country_ids: HashSet<u32> = file.countries.iter().map(|c| c.id).collect();
        let industry_ids: HashSet<u32> = file.industries.iter().map(|i| i.id).collect();

        let cities = group_children("cities", file.cities, &country_ids)?;
        let roles = group_children("roles", file.roles, &industry_ids)?;

        for role in roles.values().flatten() {
            if role.min_salary.is_some_and(|m| m < 0.0) {
                return Err(CatalogError::NegativeMinimum {
                    role: role.name.clone(),
                });
            }
        }

        debug!(
            "Catalog: {} countries, {} industries, {} experience levels",
            file.countries.len(),
            file.industries.len(),
            file.experience_levels.len()
        );

        Ok(Self {
            countries: file.countries,
            cities,
            industries: file.industries,
            roles,
            experience_levels: file.experience_levels,
        })
    }

    /// The catalog shipped with the application.
    pub fn builtin() -> Self {
        let countries = vec![
            OptionItem::new(1, "United States"),
            OptionItem::new(2, "Canada"),
            OptionItem::new(3, "Germany"),
            OptionItem::new(4, "Iceland"),
        ];
        let mut cities = HashMap::new();
        cities.insert(
            1,
            vec![
                OptionItem::new(101, "New York"),
                OptionItem::new(102, "San Francisco"),
                OptionItem::new(103, "Austin"),
                OptionItem::new(104, "Seattle"),
            ],
        );
        cities.insert(
            2,
            vec![
                OptionItem::new(201, "Toronto"),
                OptionItem::new(202, "Vancouver"),
                OptionItem::new(203, "Montreal"),
            ],
        );
        cities.insert(
            3,
            vec![OptionItem::new(301, "Berlin"), OptionItem::new(302, "Munich")],
        );

        let industries = vec![
            OptionItem::new(1, "Technology"),
            OptionItem::new(2, "Healthcare"),
            OptionItem::new(3, "Finance"),
        ];
        let mut roles = HashMap::new();
        roles.insert(
            1,
            vec![
                OptionItem::new(11, "Software Engineer").with_min_salary(80000.0),
                OptionItem::new(12, "Data Analyst").with_min_salary(65000.0),
                OptionItem::new(13, "Product Manager").with_min_salary(90000.0),
            ],
        );
        roles.insert(
            2,
            vec![
                OptionItem::new(21, "Registered Nurse").with_min_salary(55000.0),
                OptionItem::new(22, "Pharmacist").with_min_salary(95000.0),
            ],
        );
        roles.insert(
            3,
            vec![
                OptionItem::new(31, "Accountant").with_min_salary(60000.0),
                OptionItem::new(32, "Financial Analyst").with_min_salary(70000.0),
            ],
        );

        let experience_levels = vec![
            OptionItem::new(1, "Entry level"),
            OptionItem::new(2, "Mid level"),
            OptionItem::new(3, "Senior"),
            OptionItem::new(4, "Lead"),
        ];

        Self {
            countries,
            cities,
            industries,
            roles,
            experience_levels,
        }
    }

    pub fn countries(&self) -> &[OptionItem] {
        &self.countries
    }

    /// Cities of a country. Empty for an unknown country.
    pub fn cities(&self, country: u32) -> &[OptionItem] {
        self.cities.get(&country).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn industries(&self) -> &[OptionItem] {
        &self.industries
    }

    /// Roles of an industry. Empty for an unknown industry.
    pub fn roles(&self, industry: u32) -> &[OptionItem] {
        self.roles.get(&industry).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn experience_levels(&self) -> &[OptionItem] {
        &self.experience_levels
    }

    pub fn country(&self, id: u32) -> Option<&OptionItem> {
        self.countries.iter().find(|c| c.id == id)
    }

    pub fn city(&self, country: u32, id: u32) -> Option<&OptionItem> {
        self.cities(country).iter().find(|c| c.id == id)
    }

    pub fn role(&self, industry: u32, id: u32) -> Option<&OptionItem> {
        self.roles(industry).iter().find(|r| r.id == id)
    }
}

fn check_flat(list: &'static str, items: &[OptionItem]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for item in items {
        if item.id == 0 {
            return Err(CatalogError::ZeroId {
                list,
                name: item.name.clone(),
            });
        }
        if !seen.insert(item.id) {
            return Err(CatalogError::DuplicateId { list, id: item.id });
        }
    }
    Ok(())
}

fn group_children(
    list: &'static str,
    rows: Vec<ChildOption>,
    parents: &HashSet<u32>,
) -> Result<HashMap<u32, Vec<OptionItem>>, CatalogError> {
    let mut grouped: HashMap<u32, Vec<OptionItem>> = HashMap::new();
    for row in rows {
        if !parents.contains(&row.parent) {
            warn!(
                "{list}: dropping '{}' (id {}), unknown parent {}",
                row.name, row.id, row.parent
            );
            continue;
        }
        let siblings = grouped.entry(row.parent).or_default();
        if row.id == 0 {
            return Err(CatalogError::ZeroId {
                list,
                name: row.name,
            });
        }
        if siblings.iter().any(|s| s.id == row.id) {
            return Err(CatalogError::DuplicateId { list, id: row.id });
        }
        siblings.push(OptionItem {
            id: row.id,
            name: row.name,
            min_salary: row.min_salary,
        });
    }
    Ok(grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SMALL_CATALOG: &str = r#"
[[countries]]
id = 1
name = "Portugal"

[[cities]]
parent = 1
id = 10
name = "Lisbon"

[[cities]]
parent = 9
id = 90
name = "Nowhere"

[[industries]]
id = 5
name = "Energy"

[[roles]]
parent = 5
id = 51
name = "Grid Engineer"
min_salary = 72000
"#;

    #[test]
    fn test_builtin_has_country_without_cities() {
        let catalog = OptionCatalog::builtin();
        assert_eq!(catalog.cities(1).len(), 4);
        assert!(catalog.country(4).is_some());
        assert!(catalog.cities(4).is_empty());
    }

    #[test]
    fn test_unknown_parent_yields_empty_list() {
        let catalog = OptionCatalog::builtin();
        assert!(catalog.cities(999).is_empty());
        assert!(catalog.roles(0).is_empty());
    }

    #[test]
    fn test_builtin_roles_carry_minimums() {
        let catalog = OptionCatalog::builtin();
        let engineer = catalog.role(1, 11).unwrap();
        assert_eq!(engineer.min_salary, Some(80000.0));
    }

    #[test]
    fn test_toml_catalog_drops_orphans() {
        let catalog = OptionCatalog::from_toml_str(SMALL_CATALOG).unwrap();
        assert_eq!(catalog.cities(1).len(), 1);
        assert!(catalog.cities(9).is_empty());
        assert_eq!(catalog.role(5, 51).unwrap().min_salary, Some(72000.0));
        assert!(catalog.experience_levels().is_empty());
    }

    #[test]
    fn test_zero_id_rejected() {
        let err = OptionCatalog::from_toml_str(
            r#"
[[countries]]
id = 0
name = "Void"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::ZeroId { list: "countries", .. }));
    }

    #[test]
    fn test_duplicate_child_id_rejected() {
        let err = OptionCatalog::from_toml_str(
            r#"
[[industries]]
id = 1
name = "Tech"

[[roles]]
parent = 1
id = 2
name = "A"

[[roles]]
parent = 1
id = 2
name = "B"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { list: "roles", id: 2 }));
    }

    #[test]
    fn test_negative_minimum_rejected() {
        let err = OptionCatalog::from_toml_str(
            r#"
[[industries]]
id = 1
name = "Tech"

[[roles]]
parent = 1
id = 2
name = "Intern"
min_salary = -1.0
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Intern"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SMALL_CATALOG.as_bytes()).unwrap();
        let catalog = OptionCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.countries()[0].name, "Portugal");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = OptionCatalog::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
