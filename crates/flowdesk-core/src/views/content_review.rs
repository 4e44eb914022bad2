//! Content review page: the generic list plus detail rows.

use std::collections::HashSet;

use super::entity_list::EntityListView;
use crate::error::Result;
use crate::models::{ContentReview, EntityId};

#[derive(Debug)]
pub struct ContentReviewView {
    list: EntityListView<ContentReview>,
    /// Reviews whose description and message are shown
    expanded: HashSet<EntityId>,
}

impl ContentReviewView {
    pub fn new(list: EntityListView<ContentReview>) -> Self {
        Self { list, expanded: HashSet::new() }
    }

    pub fn list(&self) -> &EntityListView<ContentReview> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut EntityListView<ContentReview> {
        &mut self.list
    }

    pub async fn load(&mut self) -> Result<()> {
        self.list.load().await?;
        let rows = self.list.rows();
        self.expanded.retain(|id| rows.iter().any(|r| r.id == *id));
        Ok(())
    }

    pub fn toggle(&mut self, id: EntityId) {
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    pub fn is_expanded(&self, id: EntityId) -> bool {
        self.expanded.contains(&id)
    }
}
