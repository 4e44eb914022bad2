//! Agents: provider credentials usable by steps.

use serde::{Deserialize, Serialize};

use super::{Draft, EntityId, FieldKind, FormField, Resource, mask_secret, null_as_default};
use crate::error::{ConsoleError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    #[serde(rename = "ID")]
    pub id: EntityId,
    #[serde(rename = "Provider", default, deserialize_with = "null_as_default")]
    pub provider: String,
    #[serde(rename = "Secret", default, deserialize_with = "null_as_default")]
    pub secret: String,
}

impl Agent {
    /// Secret as shown in tables.
    pub fn masked_secret(&self) -> String {
        mask_secret(&self.secret)
    }
}

/// Body of `POST /agents` and `PUT /agents/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentDraft {
    #[serde(rename = "Provider")]
    pub provider: String,
    #[serde(rename = "Secret")]
    pub secret: String,
}

impl Draft for AgentDraft {
    fn fields(&self) -> Vec<FormField> {
        vec![
            FormField::new("Provider", "Provider", &self.provider, FieldKind::Text),
            FormField::new("Secret", "Secret", &self.secret, FieldKind::Secret),
        ]
    }

    fn set_field(&mut self, key: &str, raw: &str) -> Result<()> {
        match key {
            "Provider" => self.provider = raw.to_string(),
            "Secret" => self.secret = raw.to_string(),
            other => return Err(ConsoleError::validation(format!("Unknown agent field: {}", other))),
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.provider.trim().is_empty() {
            return Err(ConsoleError::validation("Provider is required"));
        }
        Ok(())
    }
}

impl Resource for Agent {
    type Draft = AgentDraft;

    const PATH: &'static str = "/agents";
    const NOUN: &'static str = "agent";

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_draft(&self) -> AgentDraft {
        AgentDraft { provider: self.provider.clone(), secret: self.secret.clone() }
    }
}
