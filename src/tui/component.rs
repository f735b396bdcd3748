use ratatui::Frame;
use ratatui::layout::Rect;

use crate::tui::event::TuiEvent;

/// Something that draws itself into a region of the frame.
///
/// Props arrive as struct fields (usually borrowed core data); persistent
/// presentation state is held behind a `&mut` so the screen keeps focus and
/// selection between frames.
///
/// `render` takes `&mut self` so a stateful component can update its
/// ratatui widget state (e.g. `TableState`) while drawing.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that turns terminal events into its own higher-level events.
///
/// Screens emit `core::Action`; returning `None` means the event was consumed
/// locally (focus moved) or ignored.
pub trait EventHandler {
    type Event;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
