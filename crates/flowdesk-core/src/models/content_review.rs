//! Content reviews: moderation records attached to an execution's output.

use serde::{Deserialize, Serialize};

use super::{Draft, EntityId, FieldKind, FormField, Resource, null_as_default};
use crate::error::{ConsoleError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentReview {
    pub id: EntityId,
    #[serde(default)]
    pub execution_id: Option<EntityId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sub_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sub_category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_prompt: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created: String,
}

impl ContentReview {
    /// Status column text; reviews without a status are pending.
    pub fn status_label(&self) -> &str {
        if self.status.is_empty() { "PENDING" } else { &self.status }
    }
}

/// Body of `PUT /content-reviews/{id}`: the whole edited record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentReviewDraft {
    pub execution_id: Option<EntityId>,
    pub title: String,
    pub short_description: String,
    pub message: String,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub sub_type: String,
    pub category: String,
    pub sub_category: String,
    pub image_url: String,
    pub image_prompt: String,
}

impl Draft for ContentReviewDraft {
    fn fields(&self) -> Vec<FormField> {
        vec![
            FormField::new("title", "Title", &self.title, FieldKind::Text),
            FormField::new("short_description", "Short description", &self.short_description, FieldKind::Text),
            FormField::new("message", "Message", &self.message, FieldKind::Multiline),
            FormField::new("status", "Status", &self.status, FieldKind::Text),
            FormField::new("type", "Type", &self.kind, FieldKind::Text),
            FormField::new("sub_type", "Sub type", &self.sub_type, FieldKind::Text),
            FormField::new("category", "Category", &self.category, FieldKind::Text),
            FormField::new("sub_category", "Sub category", &self.sub_category, FieldKind::Text),
            FormField::new("image_url", "Image URL", &self.image_url, FieldKind::Text),
            FormField::new("image_prompt", "Image prompt", &self.image_prompt, FieldKind::Multiline),
        ]
    }

    fn set_field(&mut self, key: &str, raw: &str) -> Result<()> {
        let value = raw.to_string();
        match key {
            "title" => self.title = value,
            "short_description" => self.short_description = value,
            "message" => self.message = value,
            "status" => self.status = value,
            "type" => self.kind = value,
            "sub_type" => self.sub_type = value,
            "category" => self.category = value,
            "sub_category" => self.sub_category = value,
            "image_url" => self.image_url = value,
            "image_prompt" => self.image_prompt = value,
            other => {
                return Err(ConsoleError::validation(format!("Unknown content review field: {}", other)));
            }
        }
        Ok(())
    }
}

impl Resource for ContentReview {
    type Draft = ContentReviewDraft;

    const PATH: &'static str = "/content-reviews";
    const NOUN: &'static str = "content review";

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_draft(&self) -> ContentReviewDraft {
        ContentReviewDraft {
            execution_id: self.execution_id,
            title: self.title.clone(),
            short_description: self.short_description.clone(),
            message: self.message.clone(),
            status: self.status.clone(),
            kind: self.kind.clone(),
            sub_type: self.sub_type.clone(),
            category: self.category.clone(),
            sub_category: self.sub_category.clone(),
            image_url: self.image_url.clone(),
            image_prompt: self.image_prompt.clone(),
        }
    }

    /// Reviews are produced by executions, never created by hand.
    fn blank_draft() -> Option<ContentReviewDraft> {
        None
    }
}
