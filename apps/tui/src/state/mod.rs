//! Page state for the console.
//!
//! Each page pairs a core view state machine with the table widget that
//! displays it.

mod executions_page;
mod record_page;

pub use executions_page::{ExecutionRow, ExecutionsPage};
pub use record_page::{
    AgentsPage, ContentReviewPage, CrudPage, RecordPage, StepsPage, TableModel, WorkflowsPage,
};
