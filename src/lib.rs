//! # Catalog TUI
//!
//! A terminal catalog manager for a REST product API.
//!
//! ## Features
//! - Product and category lists fetched from the API
//! - Live title search, sort by title or price, pagination
//! - Create and edit forms backed by POST / PUT
//! - CSV export of the visible page
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine owning the record cache)
//! - Network Layer (Tokio runtime)
//!
//! The filter/sort/paginate pipeline lives in [`query`] and is pure.

pub mod constants;
pub mod config;
pub mod models;
pub mod query;
pub mod export;
pub mod ui;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use models::{Category, CategoryRef, Product, ProductDraft};
pub use query::{run_query, QueryResult, SortDir, SortKey, ViewState};
pub use config::{Cli, Config};
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
pub use app::{AppState, AppActor};
pub use network::{NetworkActor, Resource, StoreClient, StoreError};
