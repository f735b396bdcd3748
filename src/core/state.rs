//! # Application State
//!
//! Core business state for Hireflow. No terminal types live here;
//! presentation state belongs to the `tui` module.
//!
//! ```text
//! App
//! ├── catalog: Arc<OptionCatalog>     // option-set provider
//! ├── form: FormController            // the application being edited
//! ├── listing: ListView               // records + filter/sort/page
//! ├── records: Vec<ApplicationRecord> // latest store snapshot
//! ├── status_message: String          // status bar text
//! ├── pending_delete: Option<String>  // id awaiting confirmation
//! └── notifier: Box<dyn Notifier>     // host notification capability
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::core::catalog::OptionCatalog;
use crate::core::config::ResolvedConfig;
use crate::core::form::FormController;
use crate::core::listing::ListView;
use crate::core::notify::{Notice, NoticeLevel, Notifier};
use crate::core::record::ApplicationRecord;

pub struct App {
    pub catalog: Arc<OptionCatalog>,
    pub form: FormController,
    pub listing: ListView,
    pub records: Vec<ApplicationRecord>,
    pub status_message: String,
    pub pending_delete: Option<String>,
    notifier: Box<dyn Notifier>,
}

impl App {
    pub fn new(catalog: Arc<OptionCatalog>, page_size: usize, notifier: Box<dyn Notifier>) -> Self {
        Self {
            form: FormController::new(catalog.clone()),
            catalog,
            listing: ListView::new(page_size),
            records: Vec::new(),
            status_message: String::from("Welcome to Hireflow!"),
            pending_delete: None,
            notifier,
        }
    }

    pub fn from_config(
        catalog: Arc<OptionCatalog>,
        config: &ResolvedConfig,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let mut app = Self::new(catalog, config.page_size, notifier);
        if let Some(spec) = config.default_sort {
            app.listing.set_sort(spec.field, spec.direction);
        }
        app
    }

    pub fn notifier_name(&self) -> &str {
        self.notifier.name()
    }

    /// Show a notice on the status line and hand it to the notifier.
    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let notice = Notice::new(level, message);
        self.status_message = notice.message.clone();
        self.notifier.notify(&notice);
    }

    pub(crate) fn notifier_mut(&mut self) -> &mut dyn Notifier {
        self.notifier.as_mut()
    }

    pub fn record(&self, id: &str) -> Option<&ApplicationRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.status_message, "Welcome to Hireflow!");
        assert!(app.records.is_empty());
        assert!(app.pending_delete.is_none());
        assert_eq!(app.listing.view().page_size, 5);
        assert_eq!(app.notifier_name(), "recording");
    }
}
