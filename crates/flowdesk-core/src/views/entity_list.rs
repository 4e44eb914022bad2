//! List page state shared by every CRUD collection.
//!
//! The view owns the loaded rows plus at most one row edit, one create panel
//! and one pending delete. Mutations are awaited inline; the last write wins.

use tracing::{info, warn};

use crate::client::ApiClient;
use crate::error::{ConsoleError, Result};
use crate::models::{Draft, EntityId, Resource};

/// Which draft a form operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    Edit,
    Create,
}

/// State of one collection page.
#[derive(Debug)]
pub struct EntityListView<R: Resource> {
    client: ApiClient,
    /// Rows in the order the backend returned them
    rows: Vec<R>,
    /// Row in edit mode with its draft
    editing: Option<(EntityId, R::Draft)>,
    /// Draft of the open create panel
    creating: Option<R::Draft>,
    /// Row awaiting delete confirmation
    pending_delete: Option<EntityId>,
    loading: bool,
    /// Whether at least one load has completed
    loaded: bool,
    /// Page-local error line
    error: Option<String>,
}

impl<R: Resource> EntityListView<R> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            rows: Vec::new(),
            editing: None,
            creating: None,
            pending_delete: None,
            loading: false,
            loaded: false,
            error: None,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn row(&self, id: EntityId) -> Option<&R> {
        self.rows.iter().find(|row| row.id() == id)
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

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Replaces the rows wholesale with an already fetched list.
    pub fn replace_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.loaded = true;
        if let Some((id, _)) = &self.editing {
            if !self.rows.iter().any(|row| row.id() == *id) {
                self.editing = None;
            }
        }
    }

    /// Records a failure on the page and hands it back to the caller.
    pub(crate) fn fail<T>(&mut self, err: ConsoleError) -> Result<T> {
        self.error = Some(err.to_string());
        Err(err)
    }

    /// Fetches the collection and replaces the rows.
    pub async fn load(&mut self) -> Result<()> {
        self.loading = true;
        let result = self.client.list::<R>().await;
        self.loading = false;

        match result {
            Ok(rows) => {
                self.error = None;
                self.replace_rows(rows);
                Ok(())
            }
            Err(e) => {
                warn!(resource = R::PATH, error = %e, "Failed to load collection");
                self.fail(e)
            }
        }
    }

    // Edit

    pub fn editing_id(&self) -> Option<EntityId> {
        self.editing.as_ref().map(|(id, _)| *id)
    }

    pub fn is_editing(&self, id: EntityId) -> bool {
        self.editing_id() == Some(id)
    }

    /// Puts one row in edit mode, replacing any other edit.
    pub fn start_edit(&mut self, id: EntityId) -> Result<()> {
        let Some(row) = self.row(id) else {
            return self.fail(ConsoleError::validation(format!("No {} with id {}", R::NOUN, id)));
        };
        let draft = row.to_draft();
        self.editing = Some((id, draft));
        self.error = None;
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.error = None;
    }

    /// PUTs the edit draft and patches the row in place.
    ///
    /// On failure the draft stays open and the rows are untouched.
    pub async fn save_edit(&mut self) -> Result<()> {
        let Some((id, draft)) = self.editing.clone() else {
            return self.fail(ConsoleError::validation("Nothing is being edited"));
        };
        if let Err(e) = draft.validate() {
            return self.fail(e);
        }

        let value = match self.client.update::<R>(id, &draft).await {
            Ok(value) => value,
            Err(e) => {
                warn!(resource = R::PATH, id, error = %e, "Update failed");
                return self.fail(e);
            }
        };

        match serde_json::from_value::<R>(value) {
            Ok(record) if record.reflects(&draft) => {
                if let Some(slot) = self.rows.iter_mut().find(|row| row.id() == id) {
                    *slot = record;
                }
            }
            _ => {
                info!(resource = R::PATH, id, "Record updated, reloading list");
                self.load().await?;
            }
        }

        info!(resource = R::PATH, id, "Record updated");
        self.editing = None;
        self.error = None;
        Ok(())
    }

    // Create

    pub fn is_creating(&self) -> bool {
        self.creating.is_some()
    }

    /// Opens the create panel with a blank draft.
    pub fn start_create(&mut self) -> Result<()> {
        match R::blank_draft() {
            Some(draft) => {
                self.creating = Some(draft);
                self.error = None;
                Ok(())
            }
            None => self.fail(ConsoleError::validation(format!("A {} cannot be created here", R::NOUN))),
        }
    }

    /// Opens the create panel with a prepared draft.
    pub fn start_create_with(&mut self, draft: R::Draft) -> Result<()> {
        if R::blank_draft().is_none() {
            return self.fail(ConsoleError::validation(format!("A {} cannot be created here", R::NOUN)));
        }
        self.creating = Some(draft);
        self.error = None;
        Ok(())
    }

    pub fn cancel_create(&mut self) {
        self.creating = None;
        self.error = None;
    }

    /// Validates and POSTs the create draft, then appends the new record.
    pub async fn save_create(&mut self) -> Result<()> {
        let Some(draft) = self.creating.clone() else {
            return self.fail(ConsoleError::validation("Nothing to create"));
        };
        if let Err(e) = draft.validate() {
            return self.fail(e);
        }

        let value = match self.client.create::<R>(&draft).await {
            Ok(value) => value,
            Err(e) => {
                warn!(resource = R::PATH, error = %e, "Create failed");
                return self.fail(e);
            }
        };

        match serde_json::from_value::<R>(value) {
            Ok(record) if record.reflects(&draft) => {
                info!(resource = R::PATH, id = record.id(), "Record created");
                self.rows.push(record);
            }
            _ => {
                info!(resource = R::PATH, "Record created, reloading list");
                self.load().await?;
            }
        }

        self.creating = None;
        self.error = None;
        Ok(())
    }

    // Forms

    pub fn draft(&self, target: FormTarget) -> Option<&R::Draft> {
        match target {
            FormTarget::Edit => self.editing.as_ref().map(|(_, draft)| draft),
            FormTarget::Create => self.creating.as_ref(),
        }
    }

    pub fn draft_mut(&mut self, target: FormTarget) -> Option<&mut R::Draft> {
        match target {
            FormTarget::Edit => self.editing.as_mut().map(|(_, draft)| draft),
            FormTarget::Create => self.creating.as_mut(),
        }
    }

    /// Sets one field of the targeted draft from user input.
    pub fn set_field(&mut self, target: FormTarget, key: &str, raw: &str) -> Result<()> {
        let result = match self.draft_mut(target) {
            Some(draft) => draft.set_field(key, raw),
            None => Err(ConsoleError::validation("No form is open")),
        };
        match result {
            Ok(()) => Ok(()),
            Err(e) => self.fail(e),
        }
    }

    pub async fn save(&mut self, target: FormTarget) -> Result<()> {
        match target {
            FormTarget::Edit => self.save_edit().await,
            FormTarget::Create => self.save_create().await,
        }
    }

    pub fn cancel(&mut self, target: FormTarget) {
        match target {
            FormTarget::Edit => self.cancel_edit(),
            FormTarget::Create => self.cancel_create(),
        }
    }

    // Delete

    pub fn pending_delete(&self) -> Option<EntityId> {
        self.pending_delete
    }

    /// Asks for confirmation before deleting; nothing is sent yet.
    pub fn request_delete(&mut self, id: EntityId) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Removes the pending row immediately, then DELETEs it.
    ///
    /// A failed DELETE puts the row back at its original index.
    pub async fn confirm_delete(&mut self) -> Result<()> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(());
        };

        let removed = self
            .rows
            .iter()
            .position(|row| row.id() == id)
            .map(|index| (index, self.rows.remove(index)));

        match self.client.delete::<R>(id).await {
            Ok(()) => {
                info!(resource = R::PATH, id, "Record deleted");
                if self.is_editing(id) {
                    self.editing = None;
                }
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!(resource = R::PATH, id, error = %e, "Delete failed, restoring row");
                if let Some((index, row)) = removed {
                    let index = index.min(self.rows.len());
                    self.rows.insert(index, row);
                }
                self.fail(e)
            }
        }
    }
}
