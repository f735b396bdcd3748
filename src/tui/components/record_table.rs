//! # Record Table Component
//!
//! The paginated listing of saved applications. Rows come from the core's
//! derived `ListPage`; this component only tracks which visible row is
//! selected.
//!
//! Keys: Up/Down select, Left/Right change page, `f` cycles the status
//! filter, `1`-`6` sort by a column (again to flip direction), Enter or `e`
//! edits, `d` asks to delete.

use chrono::{DateTime, Local, Utc};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Padding, Paragraph, Row, Table, TableState};

use crate::core::action::Action;
use crate::core::listing::{ListPage, SortField, ViewState};
use crate::core::record::RecordStatus;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::truncate_to_width;
use crate::tui::event::TuiEvent;

/// Persistent state for the records table.
#[derive(Debug, Default)]
pub struct RecordTableState {
    /// Index into the visible rows of the current page.
    pub selected: usize,
    pub table_state: TableState,
}

impl RecordTableState {
    pub fn new() -> Self {
        Self::default()
    }

    fn sync(&mut self, visible: usize) {
        if visible == 0 {
            self.selected = 0;
            self.table_state.select(None);
        } else {
            self.selected = self.selected.min(visible - 1);
            self.table_state.select(Some(self.selected));
        }
    }
}

/// Transient wrapper around the table state and the derived page.
pub struct RecordTable<'a> {
    state: &'a mut RecordTableState,
    page: &'a ListPage<'a>,
    view: &'a ViewState,
}

impl<'a> RecordTable<'a> {
    pub fn new(state: &'a mut RecordTableState, page: &'a ListPage<'a>, view: &'a ViewState) -> Self {
        state.sync(page.visible.len());
        Self { state, page, view }
    }

    fn selected_id(&self) -> Option<String> {
        self.page
            .visible
            .get(self.state.selected)
            .map(|record| record.id.clone())
    }

    fn header_cell(&self, field: SortField, n: usize) -> Cell<'static> {
        let arrow = match self.view.sort {
            Some(spec) if spec.field == field => format!(" {}", spec.direction.arrow()),
            _ => String::new(),
        };
        Cell::from(format!("{n} {}{arrow}", field.label()))
    }
}

fn format_salary(salary: Option<f64>) -> String {
    let Some(salary) = salary else {
        return "-".to_string();
    };
    let whole = salary.round() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if whole < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Format a timestamp as "Jan 15 14:02" in local time.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%b %d %H:%M").to_string()
}

impl EventHandler for RecordTable<'_> {
    type Event = Action;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Action> {
        match event {
            TuiEvent::CursorUp => {
                self.state.selected = self.state.selected.saturating_sub(1);
                self.state.sync(self.page.visible.len());
                None
            }
            TuiEvent::CursorDown => {
                self.state.selected += 1;
                self.state.sync(self.page.visible.len());
                None
            }
            TuiEvent::CursorLeft => {
                self.state.selected = 0;
                Some(Action::PreviousPage)
            }
            TuiEvent::CursorRight => {
                self.state.selected = 0;
                Some(Action::NextPage)
            }
            TuiEvent::InputChar('f') => {
                self.state.selected = 0;
                Some(Action::CycleFilter)
            }
            TuiEvent::InputChar(c @ '1'..='6') => {
                let n = c.to_digit(10)? as usize;
                Some(Action::ToggleSort(SortField::ALL[n - 1]))
            }
            TuiEvent::Submit | TuiEvent::InputChar('e') => self.selected_id().map(Action::EditRecord),
            TuiEvent::InputChar('d') => self.selected_id().map(Action::RequestDelete),
            _ => None,
        }
    }
}

impl Component for RecordTable<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let footer = format!(
            " Page {}/{} · {} records · filter: {} ",
            self.page.page, self.page.total_pages, self.page.total_count, self.view.filter
        );
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Applications ")
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(footer).centered())
            .padding(Padding::horizontal(1));

        if self.page.is_empty() {
            let empty = Paragraph::new("No applications match this filter.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let header = Row::new(
            SortField::ALL
                .iter()
                .enumerate()
                .map(|(i, &field)| self.header_cell(field, i + 1)),
        )
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);

        let rows = self.page.visible.iter().map(|record| {
            let status_style = match record.status {
                RecordStatus::Draft => Style::default().fg(Color::Yellow),
                RecordStatus::Submitted => Style::default().fg(Color::Green),
            };
            Row::new(vec![
                Cell::from(truncate_to_width(&record.applicant, 24)),
                Cell::from(truncate_to_width(&record.email, 28)),
                Cell::from(truncate_to_width(&record.location, 22)),
                Cell::from(truncate_to_width(&record.role, 20)),
                Cell::from(format_salary(record.expected_salary)),
                Cell::from(Line::from(vec![
                    Span::raw(format_timestamp(record.updated_at)),
                    Span::raw(" "),
                    Span::styled(record.status.label(), status_style),
                ])),
            ])
        });

        let widths = [
            Constraint::Fill(2),
            Constraint::Fill(3),
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Length(12),
            Constraint::Length(24),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        frame.render_stateful_widget(table, area, &mut self.state.table_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::listing::{SortDirection, derive};
    use crate::test_support::listing;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rows() -> Vec<crate::core::listing::ListingRecord> {
        vec![
            listing("Ada", 95000.0, RecordStatus::Submitted),
            listing("Grace", 88000.0, RecordStatus::Draft),
            listing("Linus", 70000.0, RecordStatus::Submitted),
        ]
    }

    fn rendered(table: &mut RecordTable) -> String {
        let backend = TestBackend::new(120, 14);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| table.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_selection_clamps_to_visible_rows() {
        let records = rows();
        let view = ViewState::new(5);
        let page = derive(&records, &view);
        let mut state = RecordTableState::new();
        let mut table = RecordTable::new(&mut state, &page, &view);
        for _ in 0..5 {
            table.handle_event(&TuiEvent::CursorDown);
        }
        assert_eq!(
            table.handle_event(&TuiEvent::Submit),
            Some(Action::EditRecord(records[2].id.clone()))
        );
        assert_eq!(state.selected, 2);
    }

    #[test]
    fn test_delete_targets_selected_row() {
        let records = rows();
        let view = ViewState::new(5);
        let page = derive(&records, &view);
        let mut state = RecordTableState::new();
        let mut table = RecordTable::new(&mut state, &page, &view);
        table.handle_event(&TuiEvent::CursorDown);
        assert_eq!(
            table.handle_event(&TuiEvent::InputChar('d')),
            Some(Action::RequestDelete(records[1].id.clone()))
        );
    }

    #[test]
    fn test_number_keys_toggle_sort_columns() {
        let records = rows();
        let view = ViewState::new(5);
        let page = derive(&records, &view);
        let mut state = RecordTableState::new();
        let mut table = RecordTable::new(&mut state, &page, &view);
        assert_eq!(
            table.handle_event(&TuiEvent::InputChar('5')),
            Some(Action::ToggleSort(SortField::Salary))
        );
        assert_eq!(table.handle_event(&TuiEvent::InputChar('7')), None);
    }

    #[test]
    fn test_empty_page_has_no_row_actions() {
        let records = Vec::new();
        let view = ViewState::new(5);
        let page = derive(&records, &view);
        let mut state = RecordTableState::new();
        let mut table = RecordTable::new(&mut state, &page, &view);
        assert_eq!(table.handle_event(&TuiEvent::Submit), None);
        assert_eq!(table.handle_event(&TuiEvent::InputChar('d')), None);
        assert!(rendered(&mut table).contains("No applications match this filter."));
    }

    #[test]
    fn test_render_marks_sorted_column() {
        let records = rows();
        let mut view = ViewState::new(2);
        view.sort = Some(crate::core::listing::SortSpec {
            field: SortField::Salary,
            direction: SortDirection::Desc,
        });
        let page = derive(&records, &view);
        let mut state = RecordTableState::new();
        let text = rendered(&mut RecordTable::new(&mut state, &page, &view));
        assert!(text.contains("5 Salary ▼"));
        assert!(text.contains("95,000"));
        assert!(!text.contains("70,000"));
        assert!(text.contains("Page 1/2 · 3 records"));
    }

    #[test]
    fn test_format_salary_groups_thousands() {
        assert_eq!(format_salary(Some(1234567.4)), "1,234,567");
        assert_eq!(format_salary(Some(950.0)), "950");
        assert_eq!(format_salary(None), "-");
    }
}
