//! Flowdesk Core - REST client and view state for the Flowdesk admin console.
//!
//! This crate provides everything the console needs that is not drawing:
//! - Configuration loading (file, environment, overrides)
//! - The backend client and its wire models
//! - UI-agnostic state machines for the list, steps and executions pages
//! - Column width and drag-resize state
//!
//! # Example
//!
//! ```rust,no_run
//! use flowdesk_core::{ApiClient, ConsoleConfig, views::EntityListView, models::Agent};
//!
//! #[tokio::main]
//! async fn main() -> flowdesk_core::Result<()> {
//!     let config = ConsoleConfig::load(None)?;
//!     let client = ApiClient::new(&config.api)?;
//!     let mut agents = EntityListView::<Agent>::new(client);
//!     agents.load().await?;
//!     println!("{} agents", agents.rows().len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod columns;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod query;
pub mod views;

pub use client::{ApiClient, ApiRequest, HttpTransport, Method, Transport};
pub use columns::{ColumnWidths, DragHandle};
pub use config::{ApiConfig, ConsoleConfig, UiConfig};
pub use error::{ConsoleError, Result};
pub use query::{DateBound, ExecutionFilters, ExecutionQuery, WorkflowFilter};
