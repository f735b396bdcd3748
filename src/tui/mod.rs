//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm. The core
//! never blocks on the user: delete confirmation is answered `Pending` by
//! [`TerminalNotifier`], the core parks the id in `App::pending_delete`, and
//! the confirm dialog turns the user's answer into `ConfirmDelete` or
//! `CancelDelete`.
//!
//! ## Redraw Strategy
//!
//! Nothing animates, so the loop sleeps up to 500ms in `poll` and only
//! redraws after an event (including terminal resize).

mod component;
mod components;
mod event;
mod ui;

use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use log::{info, warn};
use ratatui::DefaultTerminal;

use crate::Screen;
use crate::core::action::{Action, Effect, update};
use crate::core::catalog::OptionCatalog;
use crate::core::config::ResolvedConfig;
use crate::core::listing::StatusFilter;
use crate::core::notify::{Confirmation, Notice, NoticeLevel, Notifier};
use crate::core::state::App;
use crate::core::store::{self, RecordStore};
use crate::tui::component::EventHandler;
use crate::tui::components::{FormView, FormViewState, RecordTable, RecordTableState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub screen: Screen,
    // Persistent component states
    pub form_view: FormViewState,
    pub table: RecordTableState,
}

impl TuiState {
    pub fn new(screen: Screen) -> Self {
        Self {
            screen,
            form_view: FormViewState::new(),
            table: RecordTableState::new(),
        }
    }

    fn switch_screen(&mut self) {
        self.screen = match self.screen {
            Screen::Form => Screen::Records,
            Screen::Records => Screen::Form,
        };
    }
}

/// Notices go to the log (the status line shows them already); confirmations
/// are deferred to the confirm dialog.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn name(&self) -> &str {
        "terminal"
    }

    fn notify(&mut self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Warning | NoticeLevel::Failure => warn!("{}", notice.message),
            NoticeLevel::Success | NoticeLevel::Info => info!("{}", notice.message),
        }
    }

    fn confirm(&mut self, prompt: &str) -> Confirmation {
        info!("Awaiting confirmation: {prompt}");
        Confirmation::Pending
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableBracketedPaste)?;
        info!("Terminal modes enabled (bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableBracketedPaste);
    }
}

pub fn run(
    config: &ResolvedConfig,
    catalog: Arc<OptionCatalog>,
    store: &mut dyn RecordStore,
    screen: Screen,
    filter: StatusFilter,
) -> std::io::Result<()> {
    let mut app = App::from_config(catalog, config, Box::new(TerminalNotifier));
    update(&mut app, Action::RecordsLoaded(store.snapshot()));
    update(&mut app, Action::SetFilter(filter));
    let mut tui = TuiState::new(screen);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let result = event_loop(&mut terminal, &mut app, &mut tui, store);

    ratatui::restore();
    info!("Hireflow shutting down");
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    tui: &mut TuiState,
    store: &mut dyn RecordStore,
) -> std::io::Result<()> {
    let mut needs_redraw = true;
    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, app, tui))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(Duration::from_millis(500));
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Drain everything pending before the next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let Some(action) = route_event(app, tui, &event) else {
                continue;
            };
            if dispatch(app, store, action) {
                return Ok(());
            }
        }
    }
}

/// Run an action through the core and carry out its effect.
///
/// Store effects feed the fresh snapshot back as `RecordsLoaded`. Returns
/// true when the app should quit.
pub fn dispatch(app: &mut App, store: &mut dyn RecordStore, action: Action) -> bool {
    let effect = update(app, action);
    if effect == Effect::Quit {
        return true;
    }
    match store::apply_effect(store, effect) {
        Ok(Some(follow_up)) => {
            update(app, follow_up);
        }
        Ok(None) => {}
        Err(e) => {
            warn!("Store rejected effect: {e}");
            app.notify(NoticeLevel::Failure, format!("Save failed: {e}"));
        }
    }
    false
}

/// Decide which action (if any) a terminal event means on the current screen.
pub fn route_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    // Resize just needs a redraw
    if matches!(event, TuiEvent::Resize) {
        return None;
    }
    if matches!(event, TuiEvent::ForceQuit) {
        return Some(Action::Quit);
    }

    // The confirm dialog is modal
    if app.pending_delete.is_some() {
        return match event {
            TuiEvent::InputChar('y') | TuiEvent::InputChar('Y') => Some(Action::ConfirmDelete),
            TuiEvent::InputChar('n') | TuiEvent::InputChar('N') | TuiEvent::Escape => {
                Some(Action::CancelDelete)
            }
            _ => None,
        };
    }

    match event {
        TuiEvent::SwitchScreen => {
            tui.switch_screen();
            return None;
        }
        TuiEvent::SaveDraft => return Some(Action::SaveDraft),
        TuiEvent::NewApplication => {
            tui.screen = Screen::Form;
            return Some(Action::NewApplication);
        }
        _ => {}
    }

    match tui.screen {
        Screen::Form => FormView::new(&mut tui.form_view, &app.form).handle_event(event),
        Screen::Records => {
            if matches!(event, TuiEvent::InputChar('q')) {
                return Some(Action::Quit);
            }
            let page = app.listing.derive();
            let action = RecordTable::new(&mut tui.table, &page, app.listing.view()).handle_event(event);
            if matches!(action, Some(Action::EditRecord(_))) {
                tui.screen = Screen::Form;
            }
            action
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::{FieldName, Step};
    use crate::core::store::MemoryStore;
    use crate::test_support::{fill_form, submitted_record, test_app};

    fn loaded_app(store: &MemoryStore) -> App {
        let mut app = test_app();
        update(&mut app, Action::RecordsLoaded(store.snapshot()));
        app
    }

    #[test]
    fn test_tab_switches_screens() {
        let app = test_app();
        let mut tui = TuiState::new(Screen::Form);
        assert_eq!(route_event(&app, &mut tui, &TuiEvent::SwitchScreen), None);
        assert_eq!(tui.screen, Screen::Records);
        route_event(&app, &mut tui, &TuiEvent::SwitchScreen);
        assert_eq!(tui.screen, Screen::Form);
    }

    #[test]
    fn test_q_quits_only_on_records_screen() {
        let app = test_app();
        let mut tui = TuiState::new(Screen::Records);
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::InputChar('q')),
            Some(Action::Quit)
        );
        tui.screen = Screen::Form;
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::InputChar('q')),
            Some(Action::SetField(
                FieldName::FirstName,
                crate::core::field::FieldValue::Text("q".into())
            ))
        );
    }

    #[test]
    fn test_dialog_captures_keys_while_pending() {
        let store = MemoryStore::with_records(vec![submitted_record("Ada", "Lovelace", 95000.0)]);
        let mut app = loaded_app(&store);
        let id = app.records[0].id.clone();
        update(&mut app, Action::RequestDelete(id));
        let mut tui = TuiState::new(Screen::Records);

        assert_eq!(route_event(&app, &mut tui, &TuiEvent::SwitchScreen), None);
        assert_eq!(tui.screen, Screen::Records);
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::Escape),
            Some(Action::CancelDelete)
        );
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::InputChar('y')),
            Some(Action::ConfirmDelete)
        );
    }

    #[test]
    fn test_edit_from_table_switches_to_form() {
        let store = MemoryStore::with_records(vec![submitted_record("Ada", "Lovelace", 95000.0)]);
        let app = loaded_app(&store);
        let mut tui = TuiState::new(Screen::Records);
        let action = route_event(&app, &mut tui, &TuiEvent::Submit);
        assert_eq!(action, Some(Action::EditRecord(app.records[0].id.clone())));
        assert_eq!(tui.screen, Screen::Form);
    }

    #[test]
    fn test_dispatch_persists_and_reloads() {
        let mut store = MemoryStore::new();
        let mut app = test_app();
        fill_form(&mut app);

        assert!(!dispatch(&mut app, &mut store, Action::SaveDraft));
        assert_eq!(store.len(), 1);
        assert_eq!(app.records.len(), 1);
        assert_eq!(app.listing.derive().total_count, 1);

        assert!(!dispatch(&mut app, &mut store, Action::Submit));
        assert_eq!(store.len(), 1);
        assert_eq!(app.form.current_step(), Step::Identity);
    }

    #[test]
    fn test_dispatch_delete_flow() {
        let mut store =
            MemoryStore::with_records(vec![submitted_record("Ada", "Lovelace", 95000.0)]);
        let mut app = loaded_app(&store);
        let id = app.records[0].id.clone();

        dispatch(&mut app, &mut store, Action::RequestDelete(id));
        assert!(app.pending_delete.is_some());
        assert_eq!(store.len(), 1);

        dispatch(&mut app, &mut store, Action::ConfirmDelete);
        assert!(store.is_empty());
        assert!(app.records.is_empty());
        assert_eq!(app.status_message, "Application deleted");
    }

    #[test]
    fn test_dispatch_quit() {
        let mut store = MemoryStore::new();
        let mut app = test_app();
        assert!(dispatch(&mut app, &mut store, Action::Quit));
    }

    #[test]
    fn test_terminal_notifier_defers() {
        assert_eq!(TerminalNotifier.confirm("Delete?"), Confirmation::Pending);
    }
}
