//! App state - pure data structure with no I/O logic

use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::app::forms::ProductForm;
use crate::config::Config;
use crate::messages::ui_events::InputMode;
use crate::messages::RenderState;
use crate::models::{Category, Product};
use crate::query::{run_query, ViewState};

/// Severity of a notification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A blocking notification shown until the user dismisses it
#[derive(Clone, Debug)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub at: DateTime<Local>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Info,
            message: message.into(),
            at: Local::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Error,
            message: message.into(),
            at: Local::now(),
        }
    }
}

/// Main application state - pure data, no I/O
pub struct AppState {
    pub api_base: String,
    pub export_dir: PathBuf,

    // Record cache, the only copy between fetches
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub catalog_loaded: bool,

    // View
    pub view: ViewState,
    pub search_input: String,
    pub selected_row: usize,
    pub input_mode: InputMode,

    // Requests
    pub is_loading: bool,
    pub next_request_id: u64,

    // Forms
    pub form: Option<ProductForm>,

    // Popups
    pub show_help: bool,
    pub notice: Option<Notice>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        AppState {
            api_base: config.api_base.clone(),
            export_dir: config.export_dir.clone(),
            products: Vec::new(),
            categories: Vec::new(),
            catalog_loaded: false,
            view: ViewState::new(config.page_size),
            search_input: String::new(),
            selected_row: 0,
            input_mode: InputMode::Table,
            is_loading: false,
            next_request_id: 1,
            form: None,
            show_help: false,
            notice: None,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Re-run the query and write the clamped page back into the view
    pub fn refresh(&mut self) {
        let result = run_query(&self.products, &self.view);
        let (page_count, visible) = (result.page_count, result.rows.len());
        self.view.clamp_to(page_count);
        self.selected_row = self.selected_row.min(visible.saturating_sub(1));
    }

    /// Records on the current page
    pub fn visible_rows(&self) -> Vec<&Product> {
        run_query(&self.products, &self.view).rows
    }

    pub fn page_count(&self) -> usize {
        run_query(&self.products, &self.view).page_count
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        let result = run_query(&self.products, &self.view);
        RenderState {
            api_base: self.api_base.clone(),
            rows: result.rows.into_iter().cloned().collect(),
            selected_row: self.selected_row,
            page: result.page,
            page_count: result.page_count,
            total_matches: result.total_matches,
            total_products: self.products.len(),
            search_input: self.search_input.clone(),
            page_size: self.view.page_size,
            sort_by: self.view.sort_by,
            sort_dir: self.view.sort_dir,
            input_mode: self.input_mode,
            is_loading: self.is_loading,
            catalog_loaded: self.catalog_loaded,
            form: self.form.clone(),
            categories: self.categories.clone(),
            show_help: self.show_help,
            notice: self.notice.clone(),
        }
    }
}
