//! # TitleBar Component
//!
//! Top status bar showing where the user is and the latest notice.
//!
//! ## Conditional Formatting
//!
//! 1. **Status message**: `"Hireflow | Form: Step 2/3: Location | Draft saved"`
//! 2. **Default**: `"Hireflow | Form: Step 2/3: Location"`
//!
//! The status message is truncated first on narrow terminals so the
//! location part stays readable.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;
use crate::tui::components::truncate_to_width;

/// Top status bar component.
///
/// # Props
///
/// - `location`: the active screen, e.g. `"Form: Step 1/3: Personal details"`
/// - `status_message`: transient status from the core (may be empty)
pub struct TitleBar {
    pub location: String,
    pub status_message: String,
}

impl TitleBar {
    pub fn new(location: String, status_message: String) -> Self {
        Self {
            location,
            status_message,
        }
    }

    fn text(&self, width: usize) -> String {
        let head = format!("Hireflow | {}", self.location);
        if self.status_message.is_empty() {
            return truncate_to_width(&head, width);
        }
        let room = width.saturating_sub(head.chars().count() + 3);
        if room == 0 {
            return truncate_to_width(&head, width);
        }
        format!("{head} | {}", truncate_to_width(&self.status_message, room))
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let text = self.text(area.width as usize);
        let line = Line::from(Span::styled(
            text,
            Style::default().add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(line, area);
    }
}
