//! Reusable UI components for the console.
//!
//! Tables, forms, dialogs, toasts and the navigation chrome shared by
//! every page.

pub mod dialog;
pub mod form;
pub mod help_row;
pub mod interactive_table;
pub mod sidebar;
pub mod toast;

pub use dialog::{Dialog, DialogChoice, DialogManager, render_dialog};
pub use form::{FormOutcome, FormPurpose, FormState, render_form};
pub use help_row::render_help_row;
pub use interactive_table::{InteractiveTable, TableCell, TableLine};
pub use sidebar::{SIDEBAR_WIDTH, render_sidebar};
pub use toast::{Toast, ToastManager, ToastVariant, render_toasts};
