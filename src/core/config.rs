//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.hireflow/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//!
//! Loading runs before the file logger exists, so messages are collected as
//! [`StartupNote`]s and replayed with [`replay_notes`] once it does.

use log::{Level, LevelFilter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::listing::{DEFAULT_PAGE_SIZE, SortDirection, SortField, SortSpec};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HireflowConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub catalog_file: Option<String>,
    pub seed_demo_records: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListingConfig {
    pub page_size: Option<usize>,
    pub default_sort: Option<SortField>,
    pub default_direction: Option<SortDirection>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub file: Option<String>,
    pub level: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOG_FILE: &str = "hireflow.log";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub page_size: usize,
    pub default_sort: Option<SortSpec>,
    /// None = use the built-in catalog.
    pub catalog_path: Option<PathBuf>,
    pub seed_demo_records: bool,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
}

/// Values supplied on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub page_size: Option<usize>,
    pub catalog: Option<PathBuf>,
    pub sort: Option<SortField>,
}

// ============================================================================
// Startup Notes
// ============================================================================

/// A log message produced before the logger is initialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupNote {
    pub level: Level,
    pub message: String,
}

impl StartupNote {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Emit collected notes through the `log` facade, in order.
pub fn replay_notes(notes: &[StartupNote]) {
    for note in notes {
        log::log!(note.level, "{}", note.message);
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.hireflow/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".hireflow"))
}

/// Returns the path to `~/.hireflow/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.hireflow/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `HireflowConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config(notes: &mut Vec<StartupNote>) -> Result<HireflowConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            notes.push(StartupNote::new(
                Level::Warn,
                "Could not determine home directory, using default config",
            ));
            return Ok(HireflowConfig::default());
        }
    };

    if !path.exists() {
        notes.push(StartupNote::new(
            Level::Info,
            format!("No config file found, generating default at {}", path.display()),
        ));
        generate_default_config(&path, notes);
        return Ok(HireflowConfig::default());
    }

    let config = load_config_from(&path)?;
    notes.push(StartupNote::new(
        Level::Info,
        format!("Loaded config from {}", path.display()),
    ));
    notes.push(StartupNote::new(Level::Debug, format!("Config: {:?}", config)));
    Ok(config)
}

pub fn load_config_from(path: &Path) -> Result<HireflowConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&contents).map_err(ConfigError::Parse)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path, notes: &mut Vec<StartupNote>) {
    let default_content = r#"# Hireflow Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# catalog_file = "catalog.toml"      # Option lists, path relative to ~/.hireflow/
# seed_demo_records = true           # Start with sample applications in the list

# [listing]
# page_size = 5                      # Or set HIREFLOW_PAGE_SIZE
# default_sort = "updated_at"        # applicant, email, location, role, salary, updated_at
# default_direction = "desc"         # "asc" or "desc"

# [logging]
# file = "hireflow.log"
# level = "debug"                    # Or set HIREFLOW_LOG_LEVEL
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        notes.push(StartupNote::new(
            Level::Warn,
            format!("Failed to create config directory: {}", e),
        ));
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        notes.push(StartupNote::new(
            Level::Warn,
            format!("Failed to write default config: {}", e),
        ));
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(
    config: &HireflowConfig,
    cli: &CliOverrides,
    notes: &mut Vec<StartupNote>,
) -> ResolvedConfig {
    // Page size: CLI → env → config → default, never below 1
    let page_size = cli
        .page_size
        .or_else(|| env_parse("HIREFLOW_PAGE_SIZE", notes))
        .or(config.listing.page_size)
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .max(1);

    // Catalog: CLI → env → config (relative to ~/.hireflow/) → built-in
    let catalog_path = cli
        .catalog
        .clone()
        .or_else(|| std::env::var("HIREFLOW_CATALOG").ok().map(PathBuf::from))
        .or_else(|| {
            config.general.catalog_file.as_ref().map(|file| {
                let file = PathBuf::from(file);
                match config_dir() {
                    Some(dir) if file.is_relative() => dir.join(file),
                    _ => file,
                }
            })
        });

    // Sort: CLI field wins; direction only comes from config
    let default_sort = cli
        .sort
        .or(config.listing.default_sort)
        .map(|field| SortSpec {
            field,
            direction: config.listing.default_direction.unwrap_or_default(),
        });

    let log_level = std::env::var("HIREFLOW_LOG_LEVEL")
        .ok()
        .or_else(|| config.logging.level.clone())
        .and_then(|level| match level.parse::<LevelFilter>() {
            Ok(l) => Some(l),
            Err(_) => {
                notes.push(StartupNote::new(
                    Level::Warn,
                    format!("Unknown log level '{}', using default", level),
                ));
                None
            }
        })
        .unwrap_or(DEFAULT_LOG_LEVEL);

    ResolvedConfig {
        page_size,
        default_sort,
        catalog_path,
        seed_demo_records: config.general.seed_demo_records.unwrap_or(true),
        log_file: config
            .logging
            .file
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        log_level,
    }
}

fn env_parse(key: &str, notes: &mut Vec<StartupNote>) -> Option<usize> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            notes.push(StartupNote::new(
                Level::Warn,
                format!("Ignoring {}={}: not a number", key, raw),
            ));
            None
        }
    }
}
