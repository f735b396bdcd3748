//! # Core Application Logic
//!
//! This module contains Hireflow's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • FormController       │
//!                    │  • ListView / derive()  │
//!                    │  • Action + update()    │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  Headless  │      │   Store    │
//!     │  Adapter   │      │   --list   │      │ (memory)   │
//!     │ (ratatui)  │      │   (JSON)   │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`field`]: field names, typed values, steps
//! - [`catalog`]: option lists behind the selection fields
//! - [`validation`]: per-field, per-step and cross-field rules
//! - [`form`]: the multi-step form controller and dependency cascade
//! - [`record`]: draft and submitted application records
//! - [`listing`]: filter/sort/paginate over a record collection
//! - [`store`]: the persistence collaborator
//! - [`notify`]: the notification collaborator
//! - [`state`]: the `App` struct, all application state in one place
//! - [`action`]: the `Action` enum and `update()` reducer
//! - [`config`]: settings resolution

pub mod action;
pub mod catalog;
pub mod config;
pub mod field;
pub mod form;
pub mod listing;
pub mod notify;
pub mod record;
pub mod state;
pub mod store;
pub mod validation;

// Re-export commonly used types for convenience
pub use action::{Action, Effect, update};
pub use field::{FieldName, FieldValue, FieldValues, Step};
pub use state::App;
