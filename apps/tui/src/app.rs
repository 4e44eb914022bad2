//! Application state and input handling.
//!
//! CRUD requests are awaited inline from the key handler. Execution pages
//! load on background tasks and come back through [`App::poll_loads`].

use std::collections::HashSet;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use flowdesk_core::models::Resource;
use flowdesk_core::views::FormTarget;
use flowdesk_core::{ApiClient, UiConfig};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::components::dialog::{CONFIRM, Dialog, DialogManager};
use crate::components::form::{FormOutcome, FormPurpose, FormState};
use crate::components::interactive_table::InteractiveTable;
use crate::components::toast::ToastManager;
use crate::errors::ErrorNotice;
use crate::load_channel::{LoadMessage, create_load_channel};
use crate::navigation::{Navigation, Route};
use crate::state::{
    AgentsPage, ContentReviewPage, CrudPage, ExecutionsPage, RecordPage, StepsPage, WorkflowsPage,
};

/// Everything drawn on top of the current page.
#[derive(Debug, Default)]
pub struct Overlays {
    pub dialog_manager: DialogManager,
    pub toast_manager: ToastManager,
    /// Open create/edit or filter form
    pub form: Option<FormState>,
}

impl Overlays {
    /// Shows a failure as a toast when it is unexpected. Other failures
    /// are already on the page's error line.
    pub fn report_error(&mut self, err: &flowdesk_core::ConsoleError) {
        let notice = ErrorNotice::from(err);
        if notice.intrusive {
            self.toast_manager.error(notice.summary());
        }
    }

    fn report(&mut self, result: flowdesk_core::Result<()>, success: impl FnOnce() -> String) {
        match result {
            Ok(()) => self.toast_manager.success(success()),
            Err(e) => self.report_error(&e),
        }
    }
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    /// Whether to quit
    pub should_quit: bool,
    pub navigation: Navigation,
    pub workflows: WorkflowsPage,
    pub agents: AgentsPage,
    pub steps: StepsPage,
    pub executions: ExecutionsPage,
    pub reviews: ContentReviewPage,
    pub overlays: Overlays,
    /// Backend shown on the home page
    pub base_url: String,
    /// Pages already loaded once
    visited: HashSet<Route>,
    load_tx: UnboundedSender<LoadMessage>,
    load_rx: UnboundedReceiver<LoadMessage>,
}

impl App {
    pub fn new(client: ApiClient, ui: &UiConfig, base_url: impl Into<String>) -> Self {
        let (load_tx, load_rx) = create_load_channel();
        Self {
            should_quit: false,
            navigation: Navigation::new(),
            workflows: RecordPage::new("Workflows", client.clone(), ui),
            agents: RecordPage::new("Agents", client.clone(), ui),
            steps: StepsPage::new(client.clone(), ui),
            executions: ExecutionsPage::new(client.clone(), ui),
            reviews: ContentReviewPage::new(client, ui),
            overlays: Overlays::default(),
            base_url: base_url.into(),
            visited: HashSet::new(),
            load_tx,
            load_rx,
        }
    }

    pub fn current_route(&self) -> Route {
        self.navigation.current()
    }

    /// Switches page; a page is loaded the first time it is shown.
    pub async fn navigate(&mut self, route: Route) {
        self.navigation.set_route(route);
        if self.visited.insert(route) {
            debug!(path = route.path(), "First visit, loading page");
            self.reload().await;
        }
    }

    /// Reloads the current page.
    pub async fn reload(&mut self) {
        let result = match self.navigation.current() {
            Route::Home => Ok(()),
            Route::Workflows => self.workflows.load().await,
            Route::Agents => self.agents.load().await,
            Route::Steps => self.steps.load().await,
            Route::ContentReview => self.reviews.load().await,
            Route::Executions => {
                self.executions.request_load(&self.load_tx);
                Ok(())
            }
        };
        if let Err(e) = result {
            self.overlays.report_error(&e);
        }
    }

    /// Applies finished execution loads.
    pub fn poll_loads(&mut self) {
        while let Ok(message) = self.load_rx.try_recv() {
            let notice = message.result.as_ref().err().map(ErrorNotice::from);
            if self.executions.receive(message) {
                if let Some(notice) = notice.filter(|n| n.intrusive) {
                    self.overlays.toast_manager.error(notice.summary());
                }
            }
        }
    }

    /// Whether an execution load is still outstanding.
    pub fn is_loading(&self) -> bool {
        self.executions.view().is_loading()
    }

    /// Handles a key press.
    pub async fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Result<()> {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        if self.overlays.dialog_manager.is_open() {
            if let Some(choice) = self.overlays.dialog_manager.handle_key(key) {
                self.resolve_delete(choice == CONFIRM).await;
            }
            return Ok(());
        }

        if let Some(form) = self.overlays.form.as_mut() {
            match form.handle_key(key, modifiers) {
                FormOutcome::Continue => {}
                FormOutcome::Cancel => self.close_form(),
                FormOutcome::Save => self.submit_form().await,
            }
            return Ok(());
        }

        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(digit @ '1'..='6') => {
                if let Some(route) = Route::from_digit(digit) {
                    self.navigate(route).await;
                }
            }
            KeyCode::Tab => self.navigate(self.navigation.current().next()).await,
            KeyCode::BackTab => self.navigate(self.navigation.current().previous()).await,
            KeyCode::Char('r') => self.reload().await,
            _ => self.handle_page_key(key).await,
        }
        Ok(())
    }

    async fn handle_page_key(&mut self, key: KeyCode) {
        let overlays = &mut self.overlays;
        match self.navigation.current() {
            Route::Home => {}
            Route::Workflows => record_key(&mut self.workflows, overlays, key).await,
            Route::Agents => record_key(&mut self.agents, overlays, key).await,
            Route::Steps if key == KeyCode::Char('w') => self.steps.cycle_filter(),
            Route::Steps if key == KeyCode::Char('W') => {
                if let Err(e) = self.steps.reload_scoped().await {
                    overlays.report_error(&e);
                }
            }
            Route::Steps => record_key(&mut self.steps, overlays, key).await,
            Route::ContentReview => record_key(&mut self.reviews, overlays, key).await,
            Route::Executions => self.handle_executions_key(key),
        }
    }

    fn handle_executions_key(&mut self, key: KeyCode) {
        if table_key(self.executions.table_mut(), key) {
            return;
        }
        let view = self.executions.view_mut();
        let reload = match key {
            KeyCode::Char('[') => view.prev_page(),
            KeyCode::Char(']') => view.next_page(),
            KeyCode::Char('{') => view.first_page(),
            KeyCode::Char('}') => view.last_page(),
            KeyCode::Char('+' | '=') => view.step_page_size(true),
            KeyCode::Char('-') => view.step_page_size(false),
            KeyCode::Char('x') => {
                view.clear_filters();
                self.overlays.toast_manager.info("Filters cleared");
                true
            }
            KeyCode::Char('a') => {
                view.expand_all();
                false
            }
            KeyCode::Char('A') => {
                self.executions.collapse_all();
                false
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.executions.toggle_selected();
                false
            }
            KeyCode::Char('o') => {
                self.executions.toggle_selected_output();
                false
            }
            KeyCode::Char('f') => {
                self.overlays.form = Some(self.executions.filter_form());
                false
            }
            KeyCode::Esc => {
                self.overlays.toast_manager.dismiss_latest();
                false
            }
            _ => false,
        };
        if reload {
            self.executions.table_mut().set_selected(0);
            self.executions.request_load(&self.load_tx);
        }
    }

    fn close_form(&mut self) {
        let Some(form) = self.overlays.form.take() else {
            return;
        };
        if let FormPurpose::Record(target) = form.purpose() {
            match self.navigation.current() {
                Route::Workflows => self.workflows.list_mut().cancel(target),
                Route::Agents => self.agents.list_mut().cancel(target),
                Route::Steps => self.steps.list_mut().cancel(target),
                Route::ContentReview => self.reviews.list_mut().cancel(target),
                Route::Home | Route::Executions => {}
            }
        }
    }

    async fn submit_form(&mut self) {
        let Some(form) = self.overlays.form.take() else {
            return;
        };
        let target = match form.purpose() {
            FormPurpose::Filters => {
                match self.executions.apply_filter_form(&form) {
                    Ok(()) => self.executions.request_load(&self.load_tx),
                    Err(_) => self.overlays.form = Some(form),
                }
                return;
            }
            FormPurpose::Record(target) => target,
        };

        let result = match self.navigation.current() {
            Route::Workflows => submit(&mut self.workflows, target, &form).await,
            Route::Agents => submit(&mut self.agents, target, &form).await,
            Route::Steps => submit(&mut self.steps, target, &form).await,
            Route::ContentReview => submit(&mut self.reviews, target, &form).await,
            Route::Home | Route::Executions => Ok(String::new()),
        };
        match result {
            Ok(message) => self.overlays.toast_manager.success(message),
            Err(e) => {
                self.overlays.report_error(&e);
                self.overlays.form = Some(form);
            }
        }
    }

    async fn resolve_delete(&mut self, confirmed: bool) {
        match self.navigation.current() {
            Route::Workflows => finish_delete(&mut self.workflows, &mut self.overlays, confirmed).await,
            Route::Agents => finish_delete(&mut self.agents, &mut self.overlays, confirmed).await,
            Route::Steps => finish_delete(&mut self.steps, &mut self.overlays, confirmed).await,
            Route::ContentReview => finish_delete(&mut self.reviews, &mut self.overlays, confirmed).await,
            Route::Home | Route::Executions => {}
        }
    }

    /// Table of the current page, if it has one.
    pub fn current_table_mut(&mut self) -> Option<&mut InteractiveTable> {
        match self.navigation.current() {
            Route::Home => None,
            Route::Workflows => Some(self.workflows.table_mut()),
            Route::Agents => Some(self.agents.table_mut()),
            Route::Steps => Some(self.steps.table_mut()),
            Route::ContentReview => Some(self.reviews.table_mut()),
            Route::Executions => Some(self.executions.table_mut()),
        }
    }

    /// Handles pointer input: header boundaries can be dragged to resize columns.
    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if self.overlays.form.is_some() || self.overlays.dialog_manager.is_open() {
            return;
        }
        let Some(table) = self.current_table_mut() else {
            return;
        };
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                table.mouse_down(event.column, event.row);
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                table.mouse_drag(event.column);
            }
            MouseEventKind::Up(MouseButton::Left) => table.mouse_up(),
            MouseEventKind::ScrollDown => table.next(),
            MouseEventKind::ScrollUp => table.previous(),
            _ => {}
        }
    }
}

/// Selection and column keys shared by every table. Returns whether the key was used.
fn table_key(table: &mut InteractiveTable, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => table.previous(),
        KeyCode::Down | KeyCode::Char('j') => table.next(),
        KeyCode::Left => table.previous_column(),
        KeyCode::Right => table.next_column(),
        KeyCode::Char('<') => table.resize_selected_column(-1),
        KeyCode::Char('>') => table.resize_selected_column(1),
        _ => return false,
    }
    true
}

async fn record_key<P: CrudPage>(page: &mut P, overlays: &mut Overlays, key: KeyCode) {
    if table_key(page.table_mut(), key) {
        return;
    }
    match key {
        KeyCode::Char('e') | KeyCode::Char('n') => {
            let target = if key == KeyCode::Char('e') { FormTarget::Edit } else { FormTarget::Create };
            match page.open_form(target) {
                Ok(form) => overlays.form = Some(form),
                Err(e) if e.is_unexpected() => overlays.report_error(&e),
                Err(e) => overlays.toast_manager.warning(e.to_string()),
            }
        }
        KeyCode::Char('d') => {
            if let Some(id) = page.selected_id() {
                page.list_mut().request_delete(id);
                let noun = <P::Record as Resource>::NOUN;
                overlays.dialog_manager.show(Dialog::confirm(format!("Delete {} #{}?", noun, id), "Delete"));
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some(id) = page.selected_id() {
                if let Err(e) = page.toggle(id) {
                    overlays.report_error(&e);
                }
            }
        }
        KeyCode::Esc => {
            page.list_mut().clear_error();
            overlays.toast_manager.dismiss_latest();
        }
        _ => {}
    }
}

async fn submit<P: CrudPage>(page: &mut P, target: FormTarget, form: &FormState) -> flowdesk_core::Result<String> {
    page.submit_form(target, form).await?;
    let noun = <P::Record as Resource>::NOUN;
    Ok(match target {
        FormTarget::Edit => format!("Saved {}", noun),
        FormTarget::Create => format!("Created {}", noun),
    })
}

async fn finish_delete<P: CrudPage>(page: &mut P, overlays: &mut Overlays, confirmed: bool) {
    if !confirmed {
        page.list_mut().cancel_delete();
        return;
    }
    let id = page.list().pending_delete();
    let result = page.list_mut().confirm_delete().await;
    if result.is_ok() {
        info!(id = ?id, "Delete confirmed");
    }
    let noun = <P::Record as Resource>::NOUN;
    overlays.report(result, || format!("Deleted {}", noun));
}
