//! Executions as returned by `GET /step-executions-grouped`.

use serde::{Deserialize, Serialize};

use super::{EntityId, null_as_default};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSummary {
    #[serde(alias = "Name", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(alias = "Description", default, deserialize_with = "null_as_default")]
    pub description: String,
}

/// One run of a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    pub id: EntityId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub workflow: WorkflowSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSummary {
    #[serde(rename = "Name", alias = "name", default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// One step's run inside an execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepExecution {
    pub id: EntityId,
    #[serde(default)]
    pub step_id: Option<EntityId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub output: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default)]
    pub step: Option<StepSummary>,
}

impl StepExecution {
    pub fn step_name(&self) -> &str {
        self.step.as_ref().map_or("", |s| s.name.as_str())
    }
}

/// An execution with its step executions embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionGroup {
    pub execution: Execution,
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<StepExecution>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default = "one")]
    pub total_pages: u32,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default, alias = "totalItems")]
    pub total: Option<u64>,
}

fn one() -> u32 {
    1
}

impl Default for PageInfo {
    fn default() -> Self {
        Self { total_pages: 1, page: None, page_size: None, total: None }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedExecutions {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<ExecutionGroup>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pagination: PageInfo,
}
