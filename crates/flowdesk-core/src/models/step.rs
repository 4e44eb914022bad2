//! Steps: ordered units of work inside a workflow.

use serde::{Deserialize, Serialize};

use super::{Draft, EntityId, FieldKind, FormField, Resource, null_as_default, parse_optional_id};
use crate::error::{ConsoleError, Result};

/// Operation type preselected in the create form.
pub const DEFAULT_OPERATION_TYPE: &str = "AI_CLIENT_CALL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRef {
    #[serde(alias = "ID")]
    pub id: EntityId,
    #[serde(alias = "Name", default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRef {
    #[serde(alias = "ID")]
    pub id: EntityId,
    #[serde(alias = "Provider", default, deserialize_with = "null_as_default")]
    pub provider: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(alias = "ID")]
    pub id: EntityId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_index: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub operation_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prompt: String,
    #[serde(default)]
    pub workflow: Option<WorkflowRef>,
    #[serde(default)]
    pub agent: Option<AgentRef>,
}

impl Step {
    pub fn workflow_id(&self) -> Option<EntityId> {
        self.workflow.as_ref().map(|w| w.id)
    }

    /// Agent column text.
    pub fn agent_label(&self) -> &str {
        match &self.agent {
            Some(agent) if !agent.provider.is_empty() => &agent.provider,
            _ => "-",
        }
    }

    pub fn has_prompt(&self) -> bool {
        !self.prompt.trim().is_empty()
    }
}

/// Body of `POST /steps` and `PUT /steps/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepDraft {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "OrderIndex")]
    pub order_index: i64,
    #[serde(rename = "OperationType")]
    pub operation_type: String,
    #[serde(rename = "WorkflowID")]
    pub workflow_id: Option<EntityId>,
    #[serde(rename = "AgentID")]
    pub agent_id: Option<EntityId>,
    #[serde(rename = "Prompt")]
    pub prompt: String,
}

impl Default for StepDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            order_index: 1,
            operation_type: DEFAULT_OPERATION_TYPE.to_string(),
            workflow_id: None,
            agent_id: None,
            prompt: String::new(),
        }
    }
}

fn id_text(id: Option<EntityId>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

impl Draft for StepDraft {
    fn fields(&self) -> Vec<FormField> {
        vec![
            FormField::new("Name", "Name", &self.name, FieldKind::Text),
            FormField::new("OrderIndex", "Order", self.order_index.to_string(), FieldKind::Number),
            FormField::new("OperationType", "Operation Type", &self.operation_type, FieldKind::Text),
            FormField::new(
                "WorkflowID",
                "Workflow",
                id_text(self.workflow_id),
                FieldKind::Reference { optional: false },
            ),
            FormField::new(
                "AgentID",
                "Agent (optional)",
                id_text(self.agent_id),
                FieldKind::Reference { optional: true },
            ),
            FormField::new("Prompt", "Prompt", &self.prompt, FieldKind::Multiline),
        ]
    }

    fn set_field(&mut self, key: &str, raw: &str) -> Result<()> {
        match key {
            "Name" => self.name = raw.to_string(),
            "OrderIndex" => {
                self.order_index = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConsoleError::validation("Order must be a whole number"))?;
            }
            "OperationType" => self.operation_type = raw.to_string(),
            "WorkflowID" => self.workflow_id = parse_optional_id("Workflow", raw)?,
            "AgentID" => self.agent_id = parse_optional_id("Agent", raw)?,
            "Prompt" => self.prompt = raw.to_string(),
            other => return Err(ConsoleError::validation(format!("Unknown step field: {}", other))),
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.workflow_id.is_none() {
            return Err(ConsoleError::validation("Name and workflow are required"));
        }
        Ok(())
    }
}

impl Resource for Step {
    type Draft = StepDraft;

    const PATH: &'static str = "/steps";
    const NOUN: &'static str = "step";

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_draft(&self) -> StepDraft {
        StepDraft {
            name: self.name.clone(),
            order_index: self.order_index,
            operation_type: self.operation_type.clone(),
            workflow_id: self.workflow_id(),
            agent_id: self.agent.as_ref().map(|a| a.id),
            prompt: self.prompt.clone(),
        }
    }

    /// Plain step records carry `workflowId`/`agentId` instead of the nested
    /// references, which would decode as a step with no workflow.
    fn reflects(&self, draft: &StepDraft) -> bool {
        self.workflow.as_ref().is_some_and(|w| !w.name.is_empty()) && self.to_draft() == *draft
    }
}
