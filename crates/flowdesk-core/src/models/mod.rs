//! Records exchanged with the automation backend.
//!
//! Field names follow the backend's wire format, which differs per resource
//! (PascalCase for agents and workflows, camelCase for steps, snake_case for
//! executions and content reviews).

mod agent;
mod content_review;
mod execution;
mod status;
mod step;
mod workflow;

pub use agent::{Agent, AgentDraft};
pub use content_review::{ContentReview, ContentReviewDraft};
pub use execution::{
    Execution, ExecutionGroup, GroupedExecutions, PageInfo, StepExecution, StepSummary,
    WorkflowSummary,
};
pub use status::StatusTone;
pub use step::{AgentRef, DEFAULT_OPERATION_TYPE, Step, StepDraft, WorkflowRef};
pub use workflow::{Workflow, WorkflowDraft};

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

/// Server-assigned identifier.
pub type EntityId = i64;

/// A collection exposed by the backend as `GET/POST {PATH}` and `PUT/DELETE {PATH}/{id}`.
pub trait Resource: DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
    /// Editable subset sent as the request body.
    type Draft: Draft;

    /// Collection path, e.g. `/agents`.
    const PATH: &'static str;
    /// Singular noun used in confirmations and notifications.
    const NOUN: &'static str;

    fn id(&self) -> EntityId;

    /// Seeds an edit draft from an existing record.
    fn to_draft(&self) -> Self::Draft;

    /// Whether a decoded save response can stand in for the row. When it
    /// cannot, the list is fetched again instead.
    fn reflects(&self, _draft: &Self::Draft) -> bool {
        true
    }

    /// Draft for the create panel; `None` when the collection cannot be created from the console.
    fn blank_draft() -> Option<Self::Draft> {
        Some(Self::Draft::default())
    }
}

/// Form state for one record.
pub trait Draft: Serialize + Clone + Default + fmt::Debug + Send + Sync + 'static {
    /// Editable fields in display order.
    fn fields(&self) -> Vec<FormField>;

    /// Sets a field from user input.
    fn set_field(&mut self, key: &str, raw: &str) -> Result<()>;

    /// Client-side checks run before any request is issued.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// How a form field is entered and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Never rendered in clear text.
    Secret,
    Number,
    Multiline,
    /// Foreign key chosen from a list of options.
    Reference { optional: bool },
}

/// One editable field of a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub kind: FieldKind,
}

impl FormField {
    pub fn new(key: &'static str, label: &'static str, value: impl Into<String>, kind: FieldKind) -> Self {
        Self { key, label, value: value.into(), kind }
    }

    /// Value as it may be shown on screen.
    pub fn display_value(&self) -> String {
        match self.kind {
            FieldKind::Secret => mask_secret(&self.value),
            _ => self.value.clone(),
        }
    }
}

/// Placeholder shown instead of a stored secret.
pub const SECRET_MASK: &str = "••••••••••";

/// Masks a secret for display; empty secrets stay empty.
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() { String::new() } else { SECRET_MASK.to_string() }
}

/// Treats an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parses an optional numeric id typed into a form; blank means `None`.
pub(crate) fn parse_optional_id(label: &str, raw: &str) -> Result<Option<EntityId>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<EntityId>()
        .map(Some)
        .map_err(|_| crate::error::ConsoleError::validation(format!("{} must be a number", label)))
}
