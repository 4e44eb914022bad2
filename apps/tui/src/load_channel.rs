//! Channel-based delivery of execution page loads.
//!
//! Loads run on spawned tokio tasks so paging never blocks the key handler;
//! each result travels back with the ticket it was issued under.

use flowdesk_core::ApiClient;
use flowdesk_core::ExecutionQuery;
use flowdesk_core::models::GroupedExecutions;
use flowdesk_core::views::LoadTicket;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// Result of one execution page load.
#[derive(Debug)]
pub struct LoadMessage {
    pub ticket: LoadTicket,
    pub result: flowdesk_core::Result<GroupedExecutions>,
}

/// Creates a new load channel pair (sender, receiver).
pub fn create_load_channel() -> (UnboundedSender<LoadMessage>, UnboundedReceiver<LoadMessage>) {
    mpsc::unbounded_channel()
}

/// Fetches one page in the background and reports back on `tx`.
pub fn spawn_execution_load(
    client: ApiClient,
    ticket: LoadTicket,
    query: ExecutionQuery,
    tx: UnboundedSender<LoadMessage>,
) {
    tokio::spawn(async move {
        let result = client.grouped_executions(&query).await;
        if tx.send(LoadMessage { ticket, result }).is_err() {
            debug!("Execution load finished after the UI closed");
        }
    });
}
