//! TUI view modules

pub mod executions;
pub mod home;
pub mod layout;
pub mod records;

pub use executions::render_executions;
pub use home::render_home;
pub use layout::GlobalLayout;
pub use records::render_record_page;

use ratatui::Frame;

use crate::app::App;
use crate::components::{render_dialog, render_form, render_help_row, render_sidebar, render_toasts};
use crate::navigation::Route;
use crate::state::CrudPage;

const GLOBAL_HINTS: &[(&str, &str)] =
    &[("1-6", "pages"), ("Tab", "next page"), ("r", "reload"), ("Esc", "dismiss"), ("q", "quit")];

/// Draws the whole screen.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let [sidebar, main, footer] = GlobalLayout::create(area);

    render_sidebar(frame, sidebar, app.current_route());
    match app.current_route() {
        Route::Home => render_home(frame, main, &app.base_url),
        Route::Workflows => render_record_page(frame, main, &mut app.workflows, None, &[]),
        Route::Agents => render_record_page(frame, main, &mut app.agents, None, &[]),
        Route::Steps => {
            let context = format!("{} (w to change)", app.steps.view().filter_label());
            render_record_page(frame, main, &mut app.steps, Some(context), &[("w", "workflow"), ("W", "server filter"), ("Enter", "prompt")])
        }
        Route::ContentReview => render_record_page(frame, main, &mut app.reviews, None, &[("Enter", "details")]),
        Route::Executions => render_executions(frame, main, &mut app.executions),
    }
    render_help_row(frame, footer, GLOBAL_HINTS);

    if let Some(form) = &app.overlays.form {
        let error = match app.current_route() {
            Route::Home => None,
            Route::Workflows => app.workflows.list().error(),
            Route::Agents => app.agents.list().error(),
            Route::Steps => app.steps.list().error(),
            Route::ContentReview => app.reviews.list().error(),
            Route::Executions => app.executions.view().error(),
        };
        render_form(frame, main, form, error);
    }
    if let Some(dialog) = app.overlays.dialog_manager.current() {
        render_dialog(frame, area, dialog);
    }
    render_toasts(frame, area, &app.overlays.toast_manager);
}
