use serde::{Deserialize, Serialize};

use super::{Draft, EntityId, FieldKind, FormField, Resource, null_as_default};
use crate::error::{ConsoleError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(rename = "ID")]
    pub id: EntityId,
    #[serde(rename = "Name", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "Description", default, deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkflowDraft {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Description")]
    pub description: String,
}

impl Draft for WorkflowDraft {
    fn fields(&self) -> Vec<FormField> {
        vec![
            FormField::new("Name", "Name", &self.name, FieldKind::Text),
            FormField::new("Description", "Description", &self.description, FieldKind::Multiline),
        ]
    }

    fn set_field(&mut self, key: &str, raw: &str) -> Result<()> {
        match key {
            "Name" => self.name = raw.to_string(),
            "Description" => self.description = raw.to_string(),
            other => return Err(ConsoleError::validation(format!("Unknown workflow field: {}", other))),
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ConsoleError::validation("Name is required"));
        }
        Ok(())
    }
}

impl Resource for Workflow {
    type Draft = WorkflowDraft;

    const PATH: &'static str = "/workflows";
    const NOUN: &'static str = "workflow";

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_draft(&self) -> WorkflowDraft {
        WorkflowDraft { name: self.name.clone(), description: self.description.clone() }
    }
}
