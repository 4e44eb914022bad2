//! Steps page: the generic list plus agents, workflow filter and prompt rows.

use std::collections::{BTreeMap, HashSet};

use tracing::warn;

use super::entity_list::EntityListView;
use crate::error::{ConsoleError, Result};
use crate::models::{Agent, EntityId, Step, StepDraft, Workflow, WorkflowRef};

/// Which steps are listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StepFilter {
    #[default]
    All,
    Workflow(EntityId),
}

#[derive(Debug)]
pub struct StepsView {
    list: EntityListView<Step>,
    /// Options of the agent picker
    agents: Vec<Agent>,
    /// Workflows fetched from `/workflows`, merged into the derived options
    known_workflows: Vec<WorkflowRef>,
    filter: StepFilter,
    /// Steps whose prompt row is open
    expanded: HashSet<EntityId>,
}

impl StepsView {
    pub fn new(list: EntityListView<Step>) -> Self {
        Self {
            list,
            agents: Vec::new(),
            known_workflows: Vec::new(),
            filter: StepFilter::All,
            expanded: HashSet::new(),
        }
    }

    pub fn list(&self) -> &EntityListView<Step> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut EntityListView<Step> {
        &mut self.list
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Loads steps and agents concurrently.
    ///
    /// Steps are applied even if the agents request fails.
    pub async fn load(&mut self) -> Result<()> {
        let client = self.list.client().clone();
        let (steps, agents) = tokio::join!(client.list::<Step>(), client.list::<Agent>());

        let steps = match steps {
            Ok(steps) => steps,
            Err(e) => return self.list.fail(e),
        };
        self.list.clear_error();
        self.list.replace_rows(steps);
        self.prune_expanded();

        match agents {
            Ok(agents) => {
                self.agents = agents;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to load agents for the step form");
                self.list.fail(e)
            }
        }
    }

    /// Fetches `/workflows` so workflows without steps can be picked too.
    pub async fn load_workflows(&mut self) -> Result<()> {
        let client = self.list.client().clone();
        match client.list::<Workflow>().await {
            Ok(workflows) => {
                self.known_workflows =
                    workflows.into_iter().map(|w| WorkflowRef { id: w.id, name: w.name }).collect();
                Ok(())
            }
            Err(e) => self.list.fail(e),
        }
    }

    /// Lists only the steps of one workflow, filtered by the backend.
    pub async fn load_scoped(&mut self, workflow_id: EntityId) -> Result<()> {
        let client = self.list.client().clone();
        match client.list_steps_by_workflow(workflow_id).await {
            Ok(steps) => {
                self.list.clear_error();
                self.list.replace_rows(steps);
                self.filter = StepFilter::Workflow(workflow_id);
                self.prune_expanded();
                Ok(())
            }
            Err(e) => self.list.fail(e),
        }
    }

    /// Distinct workflows referenced by the loaded steps plus any fetched ones, ordered by id.
    pub fn workflow_options(&self) -> Vec<WorkflowRef> {
        let mut options = BTreeMap::new();
        for workflow in &self.known_workflows {
            options.insert(workflow.id, workflow.name.clone());
        }
        for workflow in self.list.rows().iter().filter_map(|s| s.workflow.as_ref()) {
            options.insert(workflow.id, workflow.name.clone());
        }
        options.into_iter().map(|(id, name)| WorkflowRef { id, name }).collect()
    }

    pub fn filter(&self) -> StepFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: StepFilter) {
        self.filter = filter;
    }

    /// Moves the filter to the next workflow option, wrapping back to `All`.
    pub fn cycle_filter(&mut self) {
        let options = self.workflow_options();
        self.filter = match self.filter {
            StepFilter::All => options.first().map_or(StepFilter::All, |w| StepFilter::Workflow(w.id)),
            StepFilter::Workflow(current) => options
                .iter()
                .position(|w| w.id == current)
                .and_then(|index| options.get(index + 1))
                .map_or(StepFilter::All, |w| StepFilter::Workflow(w.id)),
        };
    }

    /// Label of the active filter.
    pub fn filter_label(&self) -> String {
        match self.filter {
            StepFilter::All => "All workflows".to_string(),
            StepFilter::Workflow(id) => self
                .workflow_options()
                .into_iter()
                .find(|w| w.id == id)
                .map_or_else(|| format!("Workflow {}", id), |w| w.name),
        }
    }

    /// Rows after the client-side workflow filter.
    pub fn visible_rows(&self) -> Vec<&Step> {
        self.list
            .rows()
            .iter()
            .filter(|step| match self.filter {
                StepFilter::All => true,
                StepFilter::Workflow(id) => step.workflow_id() == Some(id),
            })
            .collect()
    }

    /// Opens the create panel, preselecting the filtered workflow.
    pub fn start_create(&mut self) -> Result<()> {
        let mut draft = StepDraft::default();
        if let StepFilter::Workflow(id) = self.filter {
            draft.workflow_id = Some(id);
        }
        self.list.start_create_with(draft)
    }

    /// Agent picker label for an id typed into the form.
    pub fn agent_label(&self, id: EntityId) -> Option<&str> {
        self.agents.iter().find(|a| a.id == id).map(|a| a.provider.as_str())
    }

    /// Opens or closes the prompt row of a step. Steps without a prompt never expand.
    pub fn toggle_prompt(&mut self, id: EntityId) -> Result<bool> {
        let Some(step) = self.list.row(id) else {
            return Err(ConsoleError::validation(format!("No step with id {}", id)));
        };
        if !step.has_prompt() {
            return Ok(false);
        }
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
        Ok(true)
    }

    pub fn is_prompt_expanded(&self, id: EntityId) -> bool {
        self.expanded.contains(&id)
    }

    fn prune_expanded(&mut self) {
        let rows = self.list.rows();
        self.expanded.retain(|id| rows.iter().any(|s| s.id == *id));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::client::Method;
    use crate::client::testing::ScriptedTransport;
    use crate::views::FormTarget;

    fn steps_json() -> serde_json::Value {
        json!([
            {"id": 10, "name": "Fetch", "orderIndex": 1, "operationType": "HTTP", "prompt": "",
             "workflow": {"id": 7, "name": "Weekly"}},
            {"id": 11, "name": "Summarize", "orderIndex": 2, "operationType": "AI_CLIENT_CALL",
             "prompt": "Summarize the feed", "workflow": {"id": 2, "name": "Digest"},
             "agent": {"id": 1, "provider": "openai"}},
            {"id": 12, "name": "Post", "orderIndex": 3, "operationType": "HTTP", "prompt": null,
             "workflow": {"id": 2, "name": "Digest"}}
        ])
    }

    async fn loaded() -> (std::sync::Arc<ScriptedTransport>, StepsView) {
        let transport = ScriptedTransport::new();
        transport.respond(steps_json());
        transport.respond(json!([{"ID": 1, "Provider": "openai", "Secret": "sk"}]));
        let mut view = StepsView::new(EntityListView::new(transport.client()));
        view.load().await.unwrap();
        (transport, view)
    }

    #[tokio::test]
    async fn test_load_fetches_steps_and_agents() {
        let (transport, view) = loaded().await;
        let paths: Vec<_> = transport.requests().into_iter().map(|r| r.path).collect();
        assert!(paths.contains(&"/steps".to_string()));
        assert!(paths.contains(&"/agents".to_string()));
        assert_eq!(view.list().rows().len(), 3);
        assert_eq!(view.agent_label(1), Some("openai"));
    }

    #[tokio::test]
    async fn test_workflow_options_are_distinct_and_ordered() {
        let (transport, mut view) = loaded().await;
        let ids: Vec<_> = view.workflow_options().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![2, 7]);

        transport.respond(json!([{"ID": 4, "Name": "Empty", "Description": ""}]));
        view.load_workflows().await.unwrap();
        let ids: Vec<_> = view.workflow_options().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![2, 4, 7]);
    }

    #[tokio::test]
    async fn test_client_side_filter() {
        let (transport, mut view) = loaded().await;
        view.set_filter(StepFilter::Workflow(2));
        let names: Vec<_> = view.visible_rows().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Summarize", "Post"]);
        assert_eq!(view.filter_label(), "Digest");
        assert_eq!(transport.requests().len(), 2);

        view.cycle_filter();
        assert_eq!(view.filter(), StepFilter::Workflow(7));
        view.cycle_filter();
        assert_eq!(view.filter(), StepFilter::All);
        assert_eq!(view.visible_rows().len(), 3);
    }

    #[tokio::test]
    async fn test_scoped_load_uses_backend_filter() {
        let (transport, mut view) = loaded().await;
        transport.respond(json!([
            {"id": 10, "name": "Fetch", "workflow": {"id": 7, "name": "Weekly"}}
        ]));
        view.load_scoped(7).await.unwrap();

        assert_eq!(transport.requests().last().unwrap().path, "/steps/by-workflow/7");
        assert_eq!(view.filter(), StepFilter::Workflow(7));
        assert_eq!(view.visible_rows().len(), 1);
    }

    #[tokio::test]
    async fn test_prompt_toggle_requires_prompt() {
        let (transport, mut view) = loaded().await;
        assert!(!view.toggle_prompt(10).unwrap());
        assert!(!view.is_prompt_expanded(10));

        assert!(view.toggle_prompt(11).unwrap());
        assert!(view.is_prompt_expanded(11));
        view.toggle_prompt(11).unwrap();
        assert!(!view.is_prompt_expanded(11));
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_create_requires_name_and_workflow() {
        let (transport, mut view) = loaded().await;
        view.start_create().unwrap();
        view.list_mut().set_field(FormTarget::Create, "Name", "Notify").unwrap();

        let err = view.list_mut().save_create().await.unwrap_err();
        assert_eq!(err.to_string(), "Name and workflow are required");
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_create_preselects_filtered_workflow() {
        let (transport, mut view) = loaded().await;
        view.set_filter(StepFilter::Workflow(2));
        view.start_create().unwrap();
        view.list_mut().set_field(FormTarget::Create, "Name", "Notify").unwrap();

        transport.respond(json!({"id": 13, "name": "Notify", "orderIndex": 1,
            "operationType": "AI_CLIENT_CALL", "workflow": {"id": 2, "name": "Digest"}}));
        view.list_mut().save_create().await.unwrap();

        let body = transport.requests().pop().unwrap().body.unwrap();
        assert_eq!(body["WorkflowID"], 2);
        assert_eq!(body["OrderIndex"], 1);
        assert_eq!(body["OperationType"], "AI_CLIENT_CALL");
        assert_eq!(body["AgentID"], serde_json::Value::Null);
        assert_eq!(view.visible_rows().len(), 3);
    }

    #[tokio::test]
    async fn test_plain_update_response_keeps_workflow() {
        let (transport, mut view) = loaded().await;
        view.list_mut().start_edit(10).unwrap();
        view.list_mut().set_field(FormTarget::Edit, "Name", "Fetch all").unwrap();

        transport.respond(json!({"id": 10, "name": "Fetch all", "orderIndex": 1, "operationType": "HTTP",
            "prompt": "", "workflowId": 7, "agentId": null}));
        let mut reloaded = steps_json();
        reloaded[0]["name"] = json!("Fetch all");
        transport.respond(reloaded);
        view.list_mut().save_edit().await.unwrap();

        let methods: Vec<_> = transport.requests().into_iter().skip(2).map(|r| (r.method, r.path)).collect();
        assert_eq!(
            methods,
            vec![(Method::Put, "/steps/10".to_string()), (Method::Get, "/steps".to_string())]
        );
        let step = view.list().row(10).unwrap();
        assert_eq!(step.name, "Fetch all");
        assert_eq!(step.workflow_id(), Some(7));

        view.set_filter(StepFilter::Workflow(7));
        assert_eq!(view.visible_rows().len(), 1);
    }

    #[tokio::test]
    async fn test_plain_create_response_reloads() {
        let (transport, mut view) = loaded().await;
        view.set_filter(StepFilter::Workflow(7));
        view.start_create().unwrap();
        view.list_mut().set_field(FormTarget::Create, "Name", "Store").unwrap();

        transport.respond(json!({"id": 13, "name": "Store", "orderIndex": 1, "workflowId": 7}));
        let mut reloaded = steps_json();
        if let Some(rows) = reloaded.as_array_mut() {
            rows.push(json!({"id": 13, "name": "Store", "orderIndex": 1, "operationType": "AI_CLIENT_CALL",
                "workflow": {"id": 7, "name": "Weekly"}}));
        }
        transport.respond(reloaded);
        view.list_mut().save_create().await.unwrap();

        assert_eq!(transport.requests().last().unwrap().method, Method::Get);
        assert_eq!(view.list().row(13).unwrap().workflow_id(), Some(7));
        assert_eq!(view.visible_rows().len(), 2);
    }
}
