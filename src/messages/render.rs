//! Render state - data structure sent from App layer to UI for rendering

use crate::app::forms::ProductForm;
use crate::app::state::Notice;
use crate::messages::ui_events::InputMode;
use crate::models::{Category, Product};
use crate::query::{SortDir, SortKey};

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    pub api_base: String,

    // Visible slice
    pub rows: Vec<Product>,
    pub selected_row: usize,
    pub page: usize,
    pub page_count: usize,
    pub total_matches: usize,
    pub total_products: usize,

    // View state
    pub search_input: String,
    pub page_size: usize,
    pub sort_by: Option<SortKey>,
    pub sort_dir: SortDir,

    // Modes
    pub input_mode: InputMode,
    pub is_loading: bool,
    pub catalog_loaded: bool,

    // Forms
    pub form: Option<ProductForm>,
    pub categories: Vec<Category>,

    // Popups
    pub show_help: bool,
    pub notice: Option<Notice>,
}

impl RenderState {
    /// Whether the open form's category selector has focus
    pub fn category_focused(&self) -> bool {
        self.form
            .as_ref()
            .is_some_and(|f| f.active_field == crate::app::forms::FormField::Category)
    }
}

impl Default for RenderState {
    fn default() -> Self {
        use crate::constants::{DEFAULT_API_BASE, DEFAULT_PAGE_SIZE};
        RenderState {
            api_base: String::from(DEFAULT_API_BASE),
            rows: Vec::new(),
            selected_row: 0,
            page: 1,
            page_count: 1,
            total_matches: 0,
            total_products: 0,
            search_input: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: None,
            sort_dir: SortDir::Ascending,
            input_mode: InputMode::Table,
            is_loading: true,
            catalog_loaded: false,
            form: None,
            categories: Vec::new(),
            show_help: false,
            notice: None,
        }
    }
}
