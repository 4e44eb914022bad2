//! Executions page state: the grouped view, its table and background loads.

use flowdesk_core::format;
use flowdesk_core::models::{EntityId, FieldKind, FormField, StatusTone};
use flowdesk_core::views::{ExecutionsView, FILTER_FIELDS, STATUS_OPTIONS};
use flowdesk_core::{ApiClient, Result, UiConfig, WorkflowFilter};
use ratatui::style::{Modifier, Style};
use tokio::sync::mpsc::UnboundedSender;

use crate::components::form::{FormPurpose, FormState};
use crate::components::interactive_table::{InteractiveTable, TableCell, TableLine};
use crate::load_channel::{LoadMessage, spawn_execution_load};
use crate::theme::get_theme;

const COLUMNS: &[(&str, &str, u16)] = &[
    ("id", "ID", 10),
    ("workflow", "Workflow / Step", 28),
    ("status", "Status", 10),
    ("created", "Created", 20),
    ("steps", "Steps", 8),
];

/// A selectable line of the executions table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionRow {
    Execution(EntityId),
    Step(EntityId),
}

#[derive(Debug)]
pub struct ExecutionsPage {
    view: ExecutionsView,
    table: InteractiveTable,
}

impl ExecutionsPage {
    pub fn new(client: ApiClient, ui: &UiConfig) -> Self {
        Self { view: ExecutionsView::new(client, ui), table: InteractiveTable::new(COLUMNS, ui.min_column_width) }
    }

    pub fn view(&self) -> &ExecutionsView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ExecutionsView {
        &mut self.view
    }

    pub fn table(&self) -> &InteractiveTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut InteractiveTable {
        &mut self.table
    }

    /// Starts loading the current page on a background task.
    pub fn request_load(&mut self, tx: &UnboundedSender<LoadMessage>) {
        let (ticket, query) = self.view.begin_load();
        spawn_execution_load(self.view.client().clone(), ticket, query, tx.clone());
    }

    /// Applies a finished load; stale results are dropped.
    pub fn receive(&mut self, message: LoadMessage) -> bool {
        let applied = self.view.finish_load(message.ticket, message.result);
        if applied {
            let count = self.rows().len();
            self.table.set_selectable_count(count);
        }
        applied
    }

    /// Selectable rows in display order.
    pub fn rows(&self) -> Vec<ExecutionRow> {
        let mut rows = Vec::new();
        for group in self.view.groups() {
            rows.push(ExecutionRow::Execution(group.execution.id));
            if self.view.is_expanded(group.execution.id) {
                rows.extend(group.steps.iter().map(|step| ExecutionRow::Step(step.id)));
            }
        }
        rows
    }

    pub fn selected_row(&self) -> Option<ExecutionRow> {
        self.rows().get(self.table.selected()?).copied()
    }

    /// Expands or collapses the selected execution, or the output of the selected step.
    pub fn toggle_selected(&mut self) -> bool {
        match self.selected_row() {
            Some(ExecutionRow::Execution(id)) => {
                self.view.toggle(id);
                true
            }
            Some(ExecutionRow::Step(id)) => {
                self.view.toggle_output(id);
                true
            }
            None => false,
        }
    }

    /// Toggles the full output of the selected step row.
    pub fn toggle_selected_output(&mut self) -> bool {
        match self.selected_row() {
            Some(ExecutionRow::Step(id)) => {
                self.view.toggle_output(id);
                true
            }
            _ => false,
        }
    }

    /// Collapses everything and keeps the selection on an execution row.
    pub fn collapse_all(&mut self) {
        let selected = match self.selected_row() {
            Some(ExecutionRow::Step(step_id)) => self
                .view
                .groups()
                .iter()
                .find(|group| group.steps.iter().any(|step| step.id == step_id))
                .map(|group| group.execution.id),
            Some(ExecutionRow::Execution(id)) => Some(id),
            None => None,
        };
        self.view.collapse_all();
        if let Some(id) = selected {
            if let Some(index) = self.rows().iter().position(|row| *row == ExecutionRow::Execution(id)) {
                self.table.set_selected(index);
            }
        }
    }

    /// Filter form pre-filled with the typed filters.
    pub fn filter_form(&self) -> FormState {
        let draft = self.view.draft_filters();
        let fields = FILTER_FIELDS
            .iter()
            .map(|&key| {
                let (label, kind) = match key {
                    "from" => ("From (YYYY-MM-DD or RFC3339)", FieldKind::Text),
                    "to" => ("To (YYYY-MM-DD or RFC3339)", FieldKind::Text),
                    "status" => ("Status", FieldKind::Reference { optional: true }),
                    _ => ("Workflow (id or name)", FieldKind::Text),
                };
                FormField::new(key, label, draft.get(key), kind)
            })
            .collect();
        let statuses = STATUS_OPTIONS
            .iter()
            .map(|&status| {
                let label = if status.is_empty() { "Any" } else { status };
                (status.to_string(), label.to_string())
            })
            .collect();
        FormState::new(FormPurpose::Filters, "Filter executions", fields).with_options("status", statuses)
    }

    /// Copies the form into the draft filters and applies them.
    pub fn apply_filter_form(&mut self, form: &FormState) -> Result<()> {
        for (key, value) in form.values() {
            self.view.draft_filters_mut().set(key, &value);
        }
        self.view.apply_filters()?;
        self.table.set_selected(0);
        Ok(())
    }

    /// One-line description of the applied filters.
    pub fn filter_summary(&self) -> String {
        let filters = self.view.filters();
        if filters.is_empty() {
            return "No filters".to_string();
        }
        let mut parts = Vec::new();
        if let Some(from) = filters.from_param() {
            parts.push(format!("from {}", from));
        }
        if let Some(to) = filters.to_param() {
            parts.push(format!("to {}", to));
        }
        if let Some(status) = &filters.status {
            parts.push(format!("status {}", status));
        }
        match &filters.workflow {
            Some(WorkflowFilter::Id(id)) => parts.push(format!("workflow #{}", id)),
            Some(WorkflowFilter::Name(name)) => parts.push(format!("workflow {}", name)),
            None => {}
        }
        parts.join(" • ")
    }

    /// Record, step and output lines for the table widget.
    pub fn lines(&self) -> Vec<TableLine> {
        let theme = get_theme();
        let status = |value: &str| {
            TableCell::styled(value, Style::default().fg(theme.status_color(StatusTone::of(value))))
        };
        let muted = Style::default().fg(theme.text_muted);

        let mut lines = Vec::new();
        for group in self.view.groups() {
            let execution = &group.execution;
            let expanded = self.view.is_expanded(execution.id);
            let marker = if expanded { "▾" } else { "▸" };
            let workflow = if execution.workflow.name.is_empty() {
                format::EMPTY.to_string()
            } else {
                execution.workflow.name.clone()
            };
            let created = if execution.created_at.is_empty() { &group.created_at } else { &execution.created_at };
            lines.push(TableLine::record(vec![
                TableCell::styled(format!("{} {}", marker, execution.id), Style::default().add_modifier(Modifier::BOLD)),
                workflow.into(),
                status(&execution.status),
                format::timestamp(created).into(),
                group.steps.len().to_string().into(),
            ]));

            if !expanded {
                continue;
            }
            if group.steps.is_empty() {
                lines.push(TableLine::detail("No step executions", muted));
            }
            for step in &group.steps {
                lines.push(TableLine::record(vec![
                    format!("  ↳ {}", step.id).into(),
                    format::or_dash(step.step_name()).into(),
                    status(&step.status),
                    format::timestamp(&step.created_at).into(),
                    TableCell::new(""),
                ]));
                if step.output.is_empty() {
                    continue;
                }
                let mut output = self.view.output_preview(step);
                if self.view.output_is_truncated(step) && !self.view.is_output_expanded(step.id) {
                    output.push_str("  [o] full output");
                }
                lines.push(TableLine::detail(output, muted));
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowdesk_core::{ApiConfig, views::LoadTicket};

    fn page() -> ExecutionsPage {
        let config = ApiConfig { base_url: Some("http://127.0.0.1:9".to_string()), token: None };
        let client = ApiClient::new(&config).unwrap();
        ExecutionsPage::new(client, &UiConfig::default())
    }

    fn grouped() -> flowdesk_core::models::GroupedExecutions {
        serde_json::from_value(serde_json::json!({
            "data": [
                {
                    "execution": {"id": 1, "status": "DONE", "created_at": "2024-01-01T10:00:00Z",
                                  "workflow": {"name": "Newsletter"}},
                    "steps": [
                        {"id": 10, "status": "DONE", "output": "hello", "created_at": "2024-01-01T10:00:01Z",
                         "step": {"name": "Draft"}},
                        {"id": 11, "status": "ERROR", "output": "", "created_at": "2024-01-01T10:00:02Z",
                         "step": {"name": "Send"}}
                    ]
                },
                {"execution": {"id": 2, "status": "RUNNING", "workflow": {"name": "Digest"}}, "steps": []}
            ],
            "pagination": {"totalPages": 2}
        }))
        .unwrap()
    }

    fn loaded() -> ExecutionsPage {
        let mut page = page();
        let (ticket, _): (LoadTicket, _) = page.view_mut().begin_load();
        assert!(page.receive(LoadMessage { ticket, result: Ok(grouped()) }));
        page
    }

    #[test]
    fn test_rows_follow_expansion() {
        let mut page = loaded();
        assert_eq!(page.rows(), vec![ExecutionRow::Execution(1), ExecutionRow::Execution(2)]);

        assert!(page.toggle_selected());
        let count = page.rows().len();
        page.table_mut().set_selectable_count(count);
        assert_eq!(page.rows().len(), 4);

        page.table_mut().set_selected(1);
        assert_eq!(page.selected_row(), Some(ExecutionRow::Step(10)));
        assert!(page.toggle_selected_output());
        assert!(page.view().is_output_expanded(10));

        page.collapse_all();
        assert_eq!(page.rows().len(), 2);
        assert_eq!(page.selected_row(), Some(ExecutionRow::Execution(1)));
    }

    #[test]
    fn test_output_toggle_needs_a_step_row() {
        let mut page = loaded();
        assert!(!page.toggle_selected_output());
    }

    #[test]
    fn test_filter_form_applies_and_resets_page() {
        let mut page = loaded();
        assert!(page.view_mut().next_page());

        let mut form = page.filter_form();
        form.handle_key(crossterm::event::KeyCode::Tab, crossterm::event::KeyModifiers::NONE);
        for c in "2024-01-01".chars() {
            form.handle_key(crossterm::event::KeyCode::Char(c), crossterm::event::KeyModifiers::NONE);
        }
        page.apply_filter_form(&form).unwrap();

        assert_eq!(page.view().pagination().page, 1);
        assert_eq!(page.view().query().get("to"), Some("2024-01-01T23:59:59Z"));
        assert!(page.filter_summary().contains("2024-01-01T23:59:59Z"));
    }

    #[test]
    fn test_invalid_filter_is_reported() {
        let mut page = loaded();
        let mut form = page.filter_form();
        for c in "yesterday".chars() {
            form.handle_key(crossterm::event::KeyCode::Char(c), crossterm::event::KeyModifiers::NONE);
        }
        assert!(page.apply_filter_form(&form).is_err());
        assert!(page.view().error().is_some());
        assert_eq!(page.filter_summary(), "No filters");
    }
}
