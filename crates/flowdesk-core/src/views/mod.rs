//! Page state machines, independent of any rendering.

mod content_review;
mod entity_list;
mod executions;
mod steps;

pub use content_review::ContentReviewView;
pub use entity_list::{EntityListView, FormTarget};
pub use executions::{
    ExecutionsView, FILTER_FIELDS, FilterDraft, LoadTicket, Pagination, STATUS_OPTIONS,
};
pub use steps::{StepFilter, StepsView};
