//! Record pages: the core list views paired with their table widget.
//!
//! [`CrudPage`] carries the behavior shared by the Workflows, Agents, Steps
//! and Content Review pages; each page only adds its own columns, detail
//! rows and reference pickers.

use async_trait::async_trait;
use flowdesk_core::format;
use flowdesk_core::models::{
    Agent, ContentReview, Draft, EntityId, FieldKind, Resource, StatusTone, Step, Workflow,
};
use flowdesk_core::views::{ContentReviewView, EntityListView, FormTarget, StepFilter, StepsView};
use flowdesk_core::{ApiClient, ConsoleError, Result, UiConfig};
use ratatui::style::Style;
use tracing::warn;

use crate::components::form::{FieldOption, FormPurpose, FormState};
use crate::components::interactive_table::{InteractiveTable, TableCell, TableLine};
use crate::theme::get_theme;

/// How a record type is laid out in a table.
pub trait TableModel: Resource {
    /// `(key, header, default width)` of every column.
    const COLUMNS: &'static [(&'static str, &'static str, u16)];

    fn cells(&self) -> Vec<TableCell>;
}

fn status_cell(status: &str) -> TableCell {
    let color = get_theme().status_color(StatusTone::of(status));
    TableCell::styled(status, Style::default().fg(color))
}

impl TableModel for Workflow {
    const COLUMNS: &'static [(&'static str, &'static str, u16)] =
        &[("id", "ID", 6), ("name", "Name", 24), ("description", "Description", 48)];

    fn cells(&self) -> Vec<TableCell> {
        vec![
            self.id.to_string().into(),
            self.name.clone().into(),
            format::or_dash(&self.description).into(),
        ]
    }
}

impl TableModel for Agent {
    const COLUMNS: &'static [(&'static str, &'static str, u16)] =
        &[("id", "ID", 6), ("provider", "Provider", 24), ("secret", "Secret", 16)];

    fn cells(&self) -> Vec<TableCell> {
        vec![self.id.to_string().into(), self.provider.clone().into(), self.masked_secret().into()]
    }
}

impl TableModel for Step {
    const COLUMNS: &'static [(&'static str, &'static str, u16)] = &[
        ("id", "ID", 6),
        ("name", "Name", 22),
        ("order", "Order", 6),
        ("operation", "Operation", 16),
        ("workflow", "Workflow", 18),
        ("agent", "Agent", 14),
        ("prompt", "Prompt", 8),
    ];

    fn cells(&self) -> Vec<TableCell> {
        let workflow = match &self.workflow {
            Some(workflow) if !workflow.name.is_empty() => workflow.name.clone(),
            Some(workflow) => format!("#{}", workflow.id),
            None => format::EMPTY.to_string(),
        };
        vec![
            self.id.to_string().into(),
            self.name.clone().into(),
            self.order_index.to_string().into(),
            format::or_dash(&self.operation_type).into(),
            workflow.into(),
            self.agent_label().into(),
            (if self.has_prompt() { "▸ show" } else { format::EMPTY }).into(),
        ]
    }
}

impl TableModel for ContentReview {
    const COLUMNS: &'static [(&'static str, &'static str, u16)] = &[
        ("id", "ID", 6),
        ("title", "Title", 28),
        ("status", "Status", 10),
        ("type", "Type", 12),
        ("category", "Category", 14),
        ("execution", "Execution", 10),
        ("created", "Created", 20),
    ];

    fn cells(&self) -> Vec<TableCell> {
        vec![
            self.id.to_string().into(),
            format::or_dash(&self.title).into(),
            status_cell(self.status_label()),
            format::or_dash(&self.kind).into(),
            format::or_dash(&self.category).into(),
            self.execution_id.map_or_else(|| format::EMPTY.to_string(), |id| id.to_string()).into(),
            format::review_date(&self.created).into(),
        ]
    }
}

/// Behavior shared by every record page.
#[async_trait]
pub trait CrudPage: Send {
    type Record: TableModel;

    fn title(&self) -> &'static str;
    fn list(&self) -> &EntityListView<Self::Record>;
    fn list_mut(&mut self) -> &mut EntityListView<Self::Record>;
    fn table(&self) -> &InteractiveTable;
    fn table_mut(&mut self) -> &mut InteractiveTable;

    async fn load(&mut self) -> Result<()> {
        self.list_mut().load().await
    }

    /// Rows in display order.
    fn visible(&self) -> Vec<&Self::Record> {
        self.list().rows().iter().collect()
    }

    /// Text of the expanded row under a record, if it is open.
    fn detail(&self, _record: &Self::Record) -> Option<String> {
        None
    }

    /// Opens or closes the detail row; returns whether anything changed.
    fn toggle(&mut self, _id: EntityId) -> Result<bool> {
        Ok(false)
    }

    fn start_create(&mut self) -> Result<()> {
        self.list_mut().start_create()
    }

    /// Choices for a reference field of the form.
    fn reference_options(&self, _key: &str) -> Vec<FieldOption> {
        Vec::new()
    }

    fn selected_id(&self) -> Option<EntityId> {
        let index = self.table().selected()?;
        self.visible().get(index).map(|record| record.id())
    }

    /// Record and detail lines for the table widget.
    fn lines(&self) -> Vec<TableLine> {
        let detail_style = Style::default().fg(get_theme().text_muted);
        let mut lines = Vec::new();
        for record in self.visible() {
            lines.push(TableLine::record(record.cells()));
            if let Some(text) = self.detail(record) {
                lines.push(TableLine::detail(text, detail_style));
            }
        }
        lines
    }

    /// Opens the edit or create form for the selected row.
    fn open_form(&mut self, target: FormTarget) -> Result<FormState> {
        let noun = <Self::Record as Resource>::NOUN;
        let title = match target {
            FormTarget::Edit => {
                let Some(id) = self.selected_id() else {
                    return Err(ConsoleError::validation(format!("Select a {} first", noun)));
                };
                self.list_mut().start_edit(id)?;
                format!("Edit {} #{}", noun, id)
            }
            FormTarget::Create => {
                self.start_create()?;
                format!("New {}", noun)
            }
        };

        let fields = match self.list().draft(target) {
            Some(draft) => draft.fields(),
            None => return Err(ConsoleError::validation("No form is open")),
        };
        let mut options = Vec::new();
        for field in &fields {
            if let FieldKind::Reference { optional } = field.kind {
                let mut choices = self.reference_options(field.key);
                if optional && !choices.is_empty() {
                    choices.insert(0, (String::new(), "None".to_string()));
                }
                options.push((field.key, choices));
            }
        }

        let mut form = FormState::new(FormPurpose::Record(target), title, fields);
        for (key, choices) in options {
            form = form.with_options(key, choices);
        }
        Ok(form)
    }

    /// Copies the form into the draft and saves it.
    async fn submit_form(&mut self, target: FormTarget, form: &FormState) -> Result<()> {
        for (key, value) in form.values() {
            self.list_mut().set_field(target, key, &value)?;
        }
        self.list_mut().save(target).await
    }
}

/// A page over one collection with no extras (Workflows, Agents).
#[derive(Debug)]
pub struct RecordPage<R: TableModel> {
    title: &'static str,
    list: EntityListView<R>,
    table: InteractiveTable,
}

impl<R: TableModel> RecordPage<R> {
    pub fn new(title: &'static str, client: ApiClient, ui: &UiConfig) -> Self {
        Self {
            title,
            list: EntityListView::new(client),
            table: InteractiveTable::new(R::COLUMNS, ui.min_column_width),
        }
    }
}

#[async_trait]
impl<R: TableModel> CrudPage for RecordPage<R> {
    type Record = R;

    fn title(&self) -> &'static str {
        self.title
    }

    fn list(&self) -> &EntityListView<R> {
        &self.list
    }

    fn list_mut(&mut self) -> &mut EntityListView<R> {
        &mut self.list
    }

    fn table(&self) -> &InteractiveTable {
        &self.table
    }

    fn table_mut(&mut self) -> &mut InteractiveTable {
        &mut self.table
    }
}

pub type WorkflowsPage = RecordPage<Workflow>;
pub type AgentsPage = RecordPage<Agent>;

#[derive(Debug)]
pub struct StepsPage {
    view: StepsView,
    table: InteractiveTable,
}

impl StepsPage {
    pub fn new(client: ApiClient, ui: &UiConfig) -> Self {
        Self {
            view: StepsView::new(EntityListView::new(client)),
            table: InteractiveTable::new(Step::COLUMNS, ui.min_column_width),
        }
    }

    pub fn view(&self) -> &StepsView {
        &self.view
    }

    /// Moves to the next workflow filter and resets the selection.
    pub fn cycle_filter(&mut self) {
        self.view.cycle_filter();
        self.table.set_selected(0);
    }

    /// Lists only the filtered workflow's steps, as filtered by the backend.
    /// Without a workflow filter this is a full reload.
    pub async fn reload_scoped(&mut self) -> Result<()> {
        self.table.set_selected(0);
        match self.view.filter() {
            StepFilter::Workflow(id) => self.view.load_scoped(id).await,
            StepFilter::All => self.load().await,
        }
    }
}

#[async_trait]
impl CrudPage for StepsPage {
    type Record = Step;

    fn title(&self) -> &'static str {
        "Steps"
    }

    fn list(&self) -> &EntityListView<Step> {
        self.view.list()
    }

    fn list_mut(&mut self) -> &mut EntityListView<Step> {
        self.view.list_mut()
    }

    fn table(&self) -> &InteractiveTable {
        &self.table
    }

    fn table_mut(&mut self) -> &mut InteractiveTable {
        &mut self.table
    }

    async fn load(&mut self) -> Result<()> {
        self.view.load().await?;
        if let Err(e) = self.view.load_workflows().await {
            warn!(error = %e, "Workflow options limited to those referenced by steps");
        }
        Ok(())
    }

    fn visible(&self) -> Vec<&Step> {
        self.view.visible_rows()
    }

    fn detail(&self, step: &Step) -> Option<String> {
        self.view.is_prompt_expanded(step.id).then(|| step.prompt.clone())
    }

    fn toggle(&mut self, id: EntityId) -> Result<bool> {
        self.view.toggle_prompt(id)
    }

    fn start_create(&mut self) -> Result<()> {
        self.view.start_create()
    }

    fn reference_options(&self, key: &str) -> Vec<FieldOption> {
        match key {
            "WorkflowID" => self
                .view
                .workflow_options()
                .into_iter()
                .map(|w| {
                    let label = if w.name.is_empty() { format!("#{}", w.id) } else { w.name };
                    (w.id.to_string(), label)
                })
                .collect(),
            "AgentID" => {
                self.view.agents().iter().map(|a| (a.id.to_string(), format!("{} (#{})", a.provider, a.id))).collect()
            }
            _ => Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct ContentReviewPage {
    view: ContentReviewView,
    table: InteractiveTable,
}

impl ContentReviewPage {
    pub fn new(client: ApiClient, ui: &UiConfig) -> Self {
        Self {
            view: ContentReviewView::new(EntityListView::new(client)),
            table: InteractiveTable::new(ContentReview::COLUMNS, ui.min_column_width),
        }
    }
}

#[async_trait]
impl CrudPage for ContentReviewPage {
    type Record = ContentReview;

    fn title(&self) -> &'static str {
        "Content Review"
    }

    fn list(&self) -> &EntityListView<ContentReview> {
        self.view.list()
    }

    fn list_mut(&mut self) -> &mut EntityListView<ContentReview> {
        self.view.list_mut()
    }

    fn table(&self) -> &InteractiveTable {
        &self.table
    }

    fn table_mut(&mut self) -> &mut InteractiveTable {
        &mut self.table
    }

    async fn load(&mut self) -> Result<()> {
        self.view.load().await
    }

    fn detail(&self, review: &ContentReview) -> Option<String> {
        if !self.view.is_expanded(review.id) {
            return None;
        }
        let mut parts = vec![
            format!("Description: {}", format::or_dash(&review.short_description)),
            format!("Message: {}", format::or_dash(&review.message)),
        ];
        if !review.sub_type.is_empty() || !review.sub_category.is_empty() {
            parts.push(format!(
                "Sub type: {}  Sub category: {}",
                format::or_dash(&review.sub_type),
                format::or_dash(&review.sub_category)
            ));
        }
        if !review.image_url.is_empty() {
            parts.push(format!("Image: {}", review.image_url));
        }
        if !review.image_prompt.is_empty() {
            parts.push(format!("Image prompt: {}", review.image_prompt));
        }
        Some(parts.join("\n"))
    }

    fn toggle(&mut self, id: EntityId) -> Result<bool> {
        self.view.toggle(id);
        Ok(true)
    }
}
