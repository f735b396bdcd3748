//! # Form View Component
//!
//! Renders the current step of the application form and turns keystrokes
//! into `core::Action`s. All values live in the core `FormController`; the
//! view only remembers which field has focus.
//!
//! Keys: Up/Down move focus, typing edits text fields (digits only for the
//! salary), Left/Right cycle the options of a selection field, Backspace
//! deletes or clears, Enter advances (submits on the last step), Esc goes
//! back a step.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use crate::core::action::Action;
use crate::core::field::{FieldKind, FieldName, FieldValue, Step};
use crate::core::form::FormController;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Persistent state for the form view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormViewState {
    pub focus: usize,
    /// Step the focus index refers to; focus resets when the step changes.
    pub step: Step,
}

impl Default for FormViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormViewState {
    pub fn new() -> Self {
        Self {
            focus: 0,
            step: Step::Identity,
        }
    }

    fn sync(&mut self, step: Step) {
        if self.step != step {
            self.step = step;
            self.focus = 0;
        }
        self.focus = self.focus.min(step.fields().len().saturating_sub(1));
    }

    pub fn focused_field(&self) -> FieldName {
        self.step.fields()[self.focus.min(self.step.fields().len() - 1)]
    }
}

/// Transient wrapper: persistent view state + the core form as props.
pub struct FormView<'a> {
    state: &'a mut FormViewState,
    form: &'a FormController,
}

impl<'a> FormView<'a> {
    pub fn new(state: &'a mut FormViewState, form: &'a FormController) -> Self {
        state.sync(form.current_step());
        Self { state, form }
    }

    fn edit_text(&self, field: FieldName, edit: impl FnOnce(&mut String)) -> Action {
        let mut text = self.form.values().text(field).to_string();
        edit(&mut text);
        Action::SetField(field, FieldValue::Text(text))
    }

    fn edit_number(&self, field: FieldName, edit: impl FnOnce(&mut String)) -> Action {
        let mut digits = self
            .form
            .values()
            .number(field)
            .map(format_number)
            .unwrap_or_default();
        edit(&mut digits);
        match digits.parse::<f64>() {
            Ok(n) => Action::SetField(field, FieldValue::Number(n)),
            Err(_) => Action::ClearField(field),
        }
    }

    /// Step through the allowed options. `forward` from unset picks the first.
    fn cycle_option(&self, field: FieldName, forward: bool) -> Option<Action> {
        let options = self.form.allowed_options(field);
        if options.is_empty() {
            return None;
        }
        let current = self
            .form
            .values()
            .selection(field)
            .and_then(|id| options.iter().position(|o| o.id == id));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => options.len() - 1,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(i), false) => (i + options.len() - 1) % options.len(),
        };
        Some(Action::SetField(field, FieldValue::Selection(options[next].id)))
    }

    fn display_value(&self, field: FieldName) -> (String, Style) {
        let values = self.form.values();
        let muted = Style::default().fg(Color::DarkGray);
        match field.kind() {
            FieldKind::Text => match values.text(field) {
                "" => ("".to_string(), muted),
                text => (text.to_string(), Style::default()),
            },
            FieldKind::Number => match values.number(field) {
                Some(n) => (format_number(n), Style::default()),
                None => ("".to_string(), muted),
            },
            FieldKind::Selection => {
                if !self.form.is_enabled(field) {
                    return ("(unavailable)".to_string(), muted);
                }
                let options = self.form.allowed_options(field);
                match values
                    .selection(field)
                    .and_then(|id| options.iter().find(|o| o.id == id))
                {
                    Some(option) => (format!("◀ {} ▶", option.name), Style::default()),
                    None => (format!("◀ select ({} options) ▶", options.len()), muted),
                }
            }
        }
    }
}

/// Whole numbers without a trailing ".0".
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

impl EventHandler for FormView<'_> {
    type Event = Action;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Action> {
        let field = self.state.focused_field();
        let last = self.state.step.fields().len() - 1;
        match event {
            TuiEvent::CursorUp => {
                self.state.focus = self.state.focus.saturating_sub(1);
                None
            }
            TuiEvent::CursorDown => {
                self.state.focus = (self.state.focus + 1).min(last);
                None
            }
            TuiEvent::Submit if self.form.current_step().is_final() => Some(Action::Submit),
            TuiEvent::Submit => Some(Action::NextStep),
            TuiEvent::Escape => Some(Action::PreviousStep),
            TuiEvent::CursorLeft | TuiEvent::CursorRight => {
                if field.kind() == FieldKind::Selection {
                    self.cycle_option(field, matches!(event, TuiEvent::CursorRight))
                } else {
                    None
                }
            }
            TuiEvent::InputChar(c) => match field.kind() {
                FieldKind::Text => Some(self.edit_text(field, |t| t.push(*c))),
                // Salaries are entered as whole amounts
                FieldKind::Number if c.is_ascii_digit() => {
                    Some(self.edit_number(field, |d| d.push(*c)))
                }
                FieldKind::Selection if *c == ' ' => self.cycle_option(field, true),
                _ => None,
            },
            TuiEvent::Paste(data) if field.kind() == FieldKind::Text => {
                let line = data.lines().next().unwrap_or("").to_string();
                Some(self.edit_text(field, |t| t.push_str(&line)))
            }
            TuiEvent::Backspace => match field.kind() {
                FieldKind::Text => Some(self.edit_text(field, |t| {
                    t.pop();
                })),
                FieldKind::Number => Some(self.edit_number(field, |d| {
                    d.pop();
                })),
                FieldKind::Selection => Some(Action::ClearField(field)),
            },
            _ => None,
        }
    }
}

impl Component for FormView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let step = self.form.current_step();
        let mut lines: Vec<Line> = Vec::new();

        for (i, &field) in step.fields().iter().enumerate() {
            let focused = i == self.state.focus;
            let marker = if focused { "› " } else { "  " };
            let label_style = if focused {
                Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(Color::Gray)
            };
            let (value, value_style) = self.display_value(field);

            lines.push(Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{:<18}", field.label()), label_style),
                Span::raw(" "),
                Span::styled(value, value_style),
            ]));
            if let Some(error) = self.form.error(field) {
                lines.push(Line::from(Span::styled(
                    format!("    {error}"),
                    Style::default().fg(Color::Red),
                )));
            }
            lines.push(Line::default());
        }

        let next_hint = if step.is_final() {
            " Enter Submit "
        } else {
            " Enter Next "
        };
        let help = format!("{next_hint} Esc Back  Ctrl+S Save draft ");

        let title = match self.form.record_id() {
            Some(_) => format!(" {step} (editing) "),
            None => format!(" {step} "),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title)
            .title_bottom(Line::from(help).centered())
            .padding(Padding::horizontal(1));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::OptionCatalog;
    use crate::test_support::filled_form;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn empty_form() -> FormController {
        FormController::new(Arc::new(OptionCatalog::builtin()))
    }

    #[test]
    fn test_typing_appends_to_focused_text() {
        let mut form = empty_form();
        form.set_field(FieldName::FirstName, FieldValue::Text("Ad".into()))
            .unwrap();
        let mut state = FormViewState::new();
        let action = FormView::new(&mut state, &form).handle_event(&TuiEvent::InputChar('a'));
        assert_eq!(
            action,
            Some(Action::SetField(
                FieldName::FirstName,
                FieldValue::Text("Ada".into())
            ))
        );
    }

    #[test]
    fn test_focus_moves_and_clamps() {
        let form = empty_form();
        let mut state = FormViewState::new();
        for _ in 0..10 {
            FormView::new(&mut state, &form).handle_event(&TuiEvent::CursorDown);
        }
        assert_eq!(state.focused_field(), FieldName::Phone);
        FormView::new(&mut state, &form).handle_event(&TuiEvent::CursorUp);
        assert_eq!(state.focused_field(), FieldName::Email);
    }

    #[test]
    fn test_right_picks_first_country() {
        let mut form = filled_form();
        form.advance().unwrap();
        form.clear_field(FieldName::Country);
        let mut state = FormViewState::new();
        let action = FormView::new(&mut state, &form).handle_event(&TuiEvent::CursorRight);
        assert_eq!(
            action,
            Some(Action::SetField(FieldName::Country, FieldValue::Selection(1)))
        );
    }

    #[test]
    fn test_left_wraps_to_last_city() {
        let mut form = filled_form();
        form.advance().unwrap();
        let mut state = FormViewState::new();
        let mut view = FormView::new(&mut state, &form);
        view.handle_event(&TuiEvent::CursorDown);
        // New York is first, so Left wraps to Seattle
        let action = view.handle_event(&TuiEvent::CursorLeft);
        assert_eq!(
            action,
            Some(Action::SetField(FieldName::City, FieldValue::Selection(104)))
        );
    }

    #[test]
    fn test_disabled_selection_ignores_cycling() {
        let mut form = filled_form();
        form.advance().unwrap();
        form.set_field(FieldName::Country, FieldValue::Selection(4))
            .unwrap();
        let mut state = FormViewState::new();
        let mut view = FormView::new(&mut state, &form);
        view.handle_event(&TuiEvent::CursorDown);
        assert_eq!(view.handle_event(&TuiEvent::CursorRight), None);
    }

    #[test]
    fn test_salary_digits_and_backspace() {
        let mut form = filled_form();
        form.advance().unwrap();
        form.advance().unwrap();
        let mut state = FormViewState::new();
        let mut view = FormView::new(&mut state, &form);
        for _ in 0..3 {
            view.handle_event(&TuiEvent::CursorDown);
        }
        assert_eq!(
            view.handle_event(&TuiEvent::InputChar('5')),
            Some(Action::SetField(
                FieldName::ExpectedSalary,
                FieldValue::Number(950005.0)
            ))
        );
        assert_eq!(
            view.handle_event(&TuiEvent::Backspace),
            Some(Action::SetField(
                FieldName::ExpectedSalary,
                FieldValue::Number(9500.0)
            ))
        );
        assert_eq!(view.handle_event(&TuiEvent::InputChar('k')), None);
    }

    #[test]
    fn test_salary_ignores_decimal_point() {
        let mut form = filled_form();
        form.advance().unwrap();
        form.advance().unwrap();
        form.set_field(FieldName::ExpectedSalary, FieldValue::Number(1.0))
            .unwrap();
        let mut state = FormViewState::new();
        let mut view = FormView::new(&mut state, &form);
        for _ in 0..3 {
            view.handle_event(&TuiEvent::CursorDown);
        }
        assert_eq!(view.handle_event(&TuiEvent::InputChar('.')), None);
        assert_eq!(
            view.handle_event(&TuiEvent::InputChar('5')),
            Some(Action::SetField(
                FieldName::ExpectedSalary,
                FieldValue::Number(15.0)
            ))
        );
    }

    #[test]
    fn test_enter_submits_on_final_step() {
        let mut form = filled_form();
        let mut state = FormViewState::new();
        assert_eq!(
            FormView::new(&mut state, &form).handle_event(&TuiEvent::Submit),
            Some(Action::NextStep)
        );
        form.advance().unwrap();
        form.advance().unwrap();
        assert_eq!(
            FormView::new(&mut state, &form).handle_event(&TuiEvent::Submit),
            Some(Action::Submit)
        );
    }

    #[test]
    fn test_focus_resets_on_step_change() {
        let mut form = filled_form();
        let mut state = FormViewState::new();
        FormView::new(&mut state, &form).handle_event(&TuiEvent::CursorDown);
        assert_eq!(state.focus, 1);
        form.advance().unwrap();
        FormView::new(&mut state, &form);
        assert_eq!(state.focus, 0);
        assert_eq!(state.focused_field(), FieldName::Country);
    }

    #[test]
    fn test_render_shows_errors_inline() {
        let mut form = empty_form();
        let _ = form.advance();
        let mut state = FormViewState::new();
        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| FormView::new(&mut state, &form).render(f, f.area()))
            .unwrap();
        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Step 1/3"));
        assert!(text.contains("Last name is required"));
    }
}
