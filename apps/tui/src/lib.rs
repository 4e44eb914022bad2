//! Flowdesk TUI - terminal console for the workflow-automation backend.
//!
//! The binary wires [`app::App`] to a crossterm terminal; everything else
//! lives here so key handling can be driven from tests.

pub mod app;
pub mod components;
pub mod config;
pub mod errors;
pub mod load_channel;
pub mod navigation;
pub mod state;
pub mod terminal;
pub mod theme;
pub mod views;

pub use app::App;
pub use navigation::Route;
