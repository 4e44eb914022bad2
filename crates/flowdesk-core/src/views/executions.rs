//! Executions page: grouped executions with filters, paging and expansion.
//!
//! Loads can be run inline with [`ExecutionsView::load`] or split with
//! [`ExecutionsView::begin_load`] / [`ExecutionsView::finish_load`] so the
//! request runs on another task. Every load carries a [`LoadTicket`]; only
//! the result of the latest ticket is applied.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::config::{PAGE_SIZES, UiConfig};
use crate::error::{ConsoleError, Result};
use crate::format;
use crate::models::{EntityId, ExecutionGroup, GroupedExecutions, StepExecution};
use crate::query::{DateBound, ExecutionFilters, ExecutionQuery, WorkflowFilter};

/// Status choices offered by the filter bar; the empty string means any status.
pub const STATUS_OPTIONS: [&str; 4] = ["", "DONE", "ERROR", "RUNNING"];

/// Sequence number of one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    /// Always at least 1
    pub total_pages: u32,
}

impl Pagination {
    pub fn can_prev(&self) -> bool {
        self.page > 1
    }

    pub fn can_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Filter bar fields as typed, before they are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDraft {
    pub from: String,
    pub to: String,
    pub status: String,
    /// Workflow id (all digits) or name
    pub workflow: String,
}

/// Keys of the editable filter bar fields, in display order.
pub const FILTER_FIELDS: [&str; 4] = ["from", "to", "status", "workflow"];

impl FilterDraft {
    pub fn get(&self, key: &str) -> &str {
        match key {
            "from" => &self.from,
            "to" => &self.to,
            "status" => &self.status,
            "workflow" => &self.workflow,
            _ => "",
        }
    }

    pub fn set(&mut self, key: &str, raw: &str) {
        let value = raw.to_string();
        match key {
            "from" => self.from = value,
            "to" => self.to = value,
            "status" => self.status = value,
            "workflow" => self.workflow = value,
            _ => {}
        }
    }

    /// Steps the status through [`STATUS_OPTIONS`].
    pub fn cycle_status(&mut self) {
        let index = STATUS_OPTIONS.iter().position(|s| *s == self.status).map_or(0, |i| i + 1);
        self.status = STATUS_OPTIONS[index % STATUS_OPTIONS.len()].to_string();
    }

    /// Parses the typed values; blank fields are left out.
    pub fn parse(&self) -> Result<ExecutionFilters> {
        let bound = |raw: &str| -> Result<Option<DateBound>> {
            let raw = raw.trim();
            if raw.is_empty() { Ok(None) } else { DateBound::parse(raw).map(Some) }
        };
        let status = self.status.trim();
        let workflow = self.workflow.trim();

        Ok(ExecutionFilters {
            from: bound(&self.from)?,
            to: bound(&self.to)?,
            status: (!status.is_empty()).then(|| status.to_string()),
            workflow: if workflow.is_empty() {
                None
            } else if let Ok(id) = workflow.parse::<EntityId>() {
                Some(WorkflowFilter::Id(id))
            } else {
                Some(WorkflowFilter::Name(workflow.to_string()))
            },
        })
    }
}

#[derive(Debug)]
pub struct ExecutionsView {
    client: ApiClient,
    groups: Vec<ExecutionGroup>,
    /// Filters used by loads
    filters: ExecutionFilters,
    /// Filters being edited; promoted by `apply_filters`
    draft_filters: FilterDraft,
    pagination: Pagination,
    /// Execution ids whose step rows are shown
    expanded: HashSet<EntityId>,
    /// Step execution ids whose full output is shown
    expanded_output: HashSet<EntityId>,
    output_preview_chars: usize,
    latest_ticket: u64,
    loading: bool,
    loaded: bool,
    error: Option<String>,
}

impl ExecutionsView {
    pub fn new(client: ApiClient, ui: &UiConfig) -> Self {
        let page_size =
            if PAGE_SIZES.contains(&ui.default_page_size) { ui.default_page_size } else { PAGE_SIZES[1] };
        Self {
            client,
            groups: Vec::new(),
            filters: ExecutionFilters::default(),
            draft_filters: FilterDraft::default(),
            pagination: Pagination { page: 1, page_size, total_pages: 1 },
            expanded: HashSet::new(),
            expanded_output: HashSet::new(),
            output_preview_chars: ui.output_preview_chars,
            latest_ticket: 0,
            loading: false,
            loaded: false,
            error: None,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn groups(&self) -> &[ExecutionGroup] {
        &self.groups
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn filters(&self) -> &ExecutionFilters {
        &self.filters
    }

    pub fn draft_filters(&self) -> &FilterDraft {
        &self.draft_filters
    }

    pub fn draft_filters_mut(&mut self) -> &mut FilterDraft {
        &mut self.draft_filters
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Query for the current filters and page.
    pub fn query(&self) -> ExecutionQuery {
        ExecutionQuery::from_filters(&self.filters, self.pagination.page, self.pagination.page_size)
    }

    // Loading

    /// Starts a load: returns its ticket and the query to send.
    pub fn begin_load(&mut self) -> (LoadTicket, ExecutionQuery) {
        self.latest_ticket += 1;
        self.loading = true;
        (LoadTicket(self.latest_ticket), self.query())
    }

    /// Applies a load result unless a newer load has started since.
    ///
    /// Returns whether the result was applied.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<GroupedExecutions>) -> bool {
        if ticket.0 != self.latest_ticket {
            warn!(ticket = ticket.0, latest = self.latest_ticket, "Discarding stale executions load");
            return false;
        }
        self.loading = false;

        match result {
            Ok(page) => {
                self.pagination.total_pages = page.pagination.total_pages.max(1);
                self.pagination.page = self.pagination.page.clamp(1, self.pagination.total_pages);
                self.groups = page.data;
                self.loaded = true;
                self.error = None;
                debug!(
                    executions = self.groups.len(),
                    page = self.pagination.page,
                    total_pages = self.pagination.total_pages,
                    "Executions loaded"
                );
            }
            Err(e) => self.record_failure(&e),
        }
        true
    }

    fn record_failure(&mut self, err: &ConsoleError) {
        warn!(error = %err, "Failed to load executions");
        self.error = Some(err.to_string());
    }

    /// Loads the current page inline.
    pub async fn load(&mut self) -> Result<()> {
        let (ticket, query) = self.begin_load();
        match self.client.grouped_executions(&query).await {
            Ok(page) => {
                self.finish_load(ticket, Ok(page));
                Ok(())
            }
            Err(e) => {
                if ticket.0 == self.latest_ticket {
                    self.loading = false;
                    self.record_failure(&e);
                }
                Err(e)
            }
        }
    }

    // Filters

    /// Promotes the draft filters and goes back to page 1.
    ///
    /// Returns an error without changing anything if a date does not parse.
    pub fn apply_filters(&mut self) -> Result<()> {
        match self.draft_filters.parse() {
            Ok(filters) => {
                self.filters = filters;
                self.pagination.page = 1;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Empties both the applied and the draft filters.
    pub fn clear_filters(&mut self) {
        self.filters = ExecutionFilters::default();
        self.draft_filters = FilterDraft::default();
        self.pagination.page = 1;
    }

    // Paging. Each returns whether the page changed and a reload is due.

    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.clamp(1, self.pagination.total_pages);
        if page == self.pagination.page {
            return false;
        }
        self.pagination.page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.pagination.can_next() && self.set_page(self.pagination.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.pagination.can_prev() && self.set_page(self.pagination.page - 1)
    }

    pub fn first_page(&mut self) -> bool {
        self.set_page(1)
    }

    pub fn last_page(&mut self) -> bool {
        self.set_page(self.pagination.total_pages)
    }

    /// Changes the page size and resets to page 1.
    pub fn set_page_size(&mut self, page_size: u32) -> bool {
        if page_size == 0 {
            return false;
        }
        self.pagination.page_size = page_size;
        self.pagination.page = 1;
        true
    }

    /// Moves to the next (or previous) entry of [`PAGE_SIZES`].
    pub fn step_page_size(&mut self, larger: bool) -> bool {
        let current = PAGE_SIZES.iter().position(|s| *s == self.pagination.page_size).unwrap_or(1);
        let next = if larger { (current + 1).min(PAGE_SIZES.len() - 1) } else { current.saturating_sub(1) };
        if next == current {
            return false;
        }
        self.set_page_size(PAGE_SIZES[next])
    }

    // Expansion

    pub fn toggle(&mut self, execution_id: EntityId) {
        if !self.expanded.remove(&execution_id) {
            self.expanded.insert(execution_id);
        }
    }

    pub fn toggle_output(&mut self, step_execution_id: EntityId) {
        if !self.expanded_output.remove(&step_execution_id) {
            self.expanded_output.insert(step_execution_id);
        }
    }

    pub fn is_expanded(&self, execution_id: EntityId) -> bool {
        self.expanded.contains(&execution_id)
    }

    pub fn is_output_expanded(&self, step_execution_id: EntityId) -> bool {
        self.expanded_output.contains(&step_execution_id)
    }

    /// Expands every execution of the loaded page.
    pub fn expand_all(&mut self) {
        self.expanded.extend(self.groups.iter().map(|g| g.execution.id));
    }

    /// Collapses every execution of the loaded page.
    pub fn collapse_all(&mut self) {
        for group in &self.groups {
            self.expanded.remove(&group.execution.id);
        }
    }

    /// Output as displayed: truncated until the step row is opened.
    pub fn output_preview(&self, step: &StepExecution) -> String {
        if self.is_output_expanded(step.id) {
            step.output.clone()
        } else {
            format::truncate(&step.output, self.output_preview_chars)
        }
    }

    /// Whether the step's output is longer than the preview.
    pub fn output_is_truncated(&self, step: &StepExecution) -> bool {
        step.output.chars().nth(self.output_preview_chars).is_some()
    }
}
