use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Span;

use crate::Screen;
use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{ConfirmDialog, FormView, RecordTable, TitleBar, truncate_to_width};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(1)]);
    let [title_area, main_area, help_area] = layout.areas(frame.area());

    let location = match tui.screen {
        Screen::Form => format!("Form: {}", app.form.current_step()),
        Screen::Records => format!("Records ({})", app.listing.view().filter),
    };
    TitleBar::new(location, app.status_message.clone()).render(frame, title_area);

    match tui.screen {
        Screen::Form => FormView::new(&mut tui.form_view, &app.form).render(frame, main_area),
        Screen::Records => {
            let page = app.listing.derive();
            RecordTable::new(&mut tui.table, &page, app.listing.view()).render(frame, main_area);
        }
    }

    let help = match tui.screen {
        Screen::Form => {
            "Tab Records  ↑↓ Field  ←→ Option  Ctrl+S Save  Ctrl+N New  Ctrl+C Quit"
        }
        Screen::Records => {
            "Tab Form  ↑↓ Select  ←→ Page  f Filter  1-6 Sort  e Edit  d Delete  q Quit"
        }
    };
    frame.render_widget(
        Span::styled(
            truncate_to_width(help, help_area.width as usize),
            Style::default().fg(Color::DarkGray),
        ),
        help_area,
    );

    if let Some(id) = &app.pending_delete {
        let name = app
            .record(id)
            .map(|r| r.applicant_name())
            .unwrap_or_else(|| id.clone());
        ConfirmDialog::new(format!("Delete application from {name}?"))
            .render(frame, frame.area());
    }
}
