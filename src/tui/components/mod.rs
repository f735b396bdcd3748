//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as props:
//! - `TitleBar`: Top status bar showing screen, step and status message
//! - `ConfirmDialog`: Modal asking before a delete
//!
//! ### Stateful Components (Event-Driven)
//!
//! Follow the persistent state + transient wrapper pattern: the `*State`
//! struct lives in `TuiState`, the wrapper is created each frame with
//! borrowed state and borrowed core data.
//! - `FormView` / `FormViewState`: the current step's fields
//! - `RecordTable` / `RecordTableState`: the paginated listing
//!
//! ## Props-Based Data Flow
//!
//! Components receive core data (the form controller, the derived page) as
//! props and never mutate it. User intent leaves a component as a
//! `core::Action`, which the event loop passes to `update()`.
//!
//! ```text
//! components/
//! ├── mod.rs             (this file)
//! ├── title_bar.rs       (Top status bar)
//! ├── form_view.rs       (Multi-step form)
//! ├── record_table.rs    (Sortable, filterable, paginated table)
//! └── confirm_dialog.rs  (Delete confirmation modal)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod confirm_dialog;
pub mod form_view;
pub mod record_table;
pub use confirm_dialog::ConfirmDialog;
pub use form_view::{FormView, FormViewState};
pub use record_table::{RecordTable, RecordTableState};

use ratatui::layout::{Constraint, Layout, Rect};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate a string to fit within `max_width` terminal columns, adding "..." if needed.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let budget = max_width - 3;
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

/// Compute a centered rect using percentage of the outer rect.
pub fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
