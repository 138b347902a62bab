//! Command handlers - business logic for processing UI events and responses

use crate::app::forms::{FormKind, ProductForm};
use crate::app::state::{AppState, Notice};
use crate::constants::PAGE_SIZE_OPTIONS;
use crate::export;
use crate::messages::ui_events::InputMode;
use crate::messages::{NetworkCommand, NetworkResponse, WriteOp};
use crate::models::Product;
use crate::query::SortKey;

/// Splice a server-confirmed update into the cache by id
///
/// A record the cache has never seen is prepended.
pub fn apply_update(products: &mut Vec<Product>, updated: Product) {
    match products.iter().position(|p| p.id == updated.id) {
        Some(idx) => products[idx] = updated,
        None => products.insert(0, updated),
    }
}

impl AppState {
    // ========================
    // Catalog loading
    // ========================

    pub fn begin_load(&mut self) -> Option<NetworkCommand> {
        if self.is_loading {
            return None;
        }
        self.is_loading = true;
        Some(NetworkCommand::LoadCatalog { id: self.next_id() })
    }

    /// Manual retry, only offered until the first load succeeds
    pub fn reload(&mut self) -> Option<NetworkCommand> {
        if self.catalog_loaded {
            return None;
        }
        self.begin_load()
    }

    // ========================
    // Search
    // ========================

    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
    }

    pub fn stop_search(&mut self) {
        self.input_mode = InputMode::Table;
    }

    pub fn search_char(&mut self, c: char) {
        self.search_input.push(c);
        self.apply_search();
    }

    pub fn search_backspace(&mut self) {
        self.search_input.pop();
        self.apply_search();
    }

    fn apply_search(&mut self) {
        self.view.set_search(&self.search_input);
        self.selected_row = 0;
        self.refresh();
    }

    // ========================
    // Sorting and paging
    // ========================

    pub fn toggle_sort(&mut self, key: SortKey) {
        self.view.toggle_sort(key);
        self.selected_row = 0;
        self.refresh();
    }

    pub fn cycle_page_size(&mut self) {
        let next = PAGE_SIZE_OPTIONS
            .iter()
            .copied()
            .find(|&size| size > self.view.page_size)
            .unwrap_or(PAGE_SIZE_OPTIONS[0]);
        self.set_page_size(next);
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.view.set_page_size(size);
        self.selected_row = 0;
        self.refresh();
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.view.set_page(page);
        self.selected_row = 0;
        self.refresh();
    }

    pub fn next_page(&mut self) {
        let pages = self.page_count();
        if self.view.page < pages {
            self.view.next_page(pages);
            self.selected_row = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.view.page > 1 {
            self.view.prev_page();
            self.selected_row = 0;
        }
    }

    // ========================
    // Row selection
    // ========================

    pub fn select_next(&mut self) {
        let visible = self.visible_rows().len();
        if visible > 0 {
            self.selected_row = (self.selected_row + 1).min(visible - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    // ========================
    // Forms
    // ========================

    pub fn open_detail(&mut self) {
        let form = self
            .visible_rows()
            .get(self.selected_row)
            .map(|p| ProductForm::for_product(p));
        if let Some(form) = form {
            self.form = Some(form);
            self.input_mode = InputMode::Form;
        }
    }

    pub fn open_create(&mut self) {
        self.form = Some(ProductForm::blank(&self.categories));
        self.input_mode = InputMode::Form;
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.input_mode = InputMode::Table;
    }

    /// Build the write command for the open form
    ///
    /// The form stays open and editable; submitting again sends another request.
    pub fn submit_form(&mut self) -> Option<NetworkCommand> {
        let id = self.next_id();
        let form = self.form.as_mut()?;
        form.pending += 1;
        let draft = form.to_draft();
        let cmd = match form.kind {
            FormKind::Create => NetworkCommand::CreateProduct { id, draft },
            FormKind::Edit { product_id } => NetworkCommand::UpdateProduct {
                id,
                product_id,
                draft,
            },
        };
        Some(cmd)
    }

    pub fn form_char(&mut self, c: char) {
        if let Some(form) = self.form.as_mut() {
            form.insert_char(c);
        }
    }

    pub fn form_backspace(&mut self) {
        if let Some(form) = self.form.as_mut() {
            form.backspace();
        }
    }

    pub fn form_cursor_left(&mut self) {
        if let Some(form) = self.form.as_mut() {
            form.cursor_left();
        }
    }

    pub fn form_cursor_right(&mut self) {
        if let Some(form) = self.form.as_mut() {
            form.cursor_right();
        }
    }

    pub fn next_field(&mut self) {
        if let Some(form) = self.form.as_mut() {
            form.next_field();
        }
    }

    pub fn prev_field(&mut self) {
        if let Some(form) = self.form.as_mut() {
            form.prev_field();
        }
    }

    pub fn cycle_category(&mut self, forward: bool) {
        if let Some(form) = self.form.as_mut() {
            form.cycle_category(&self.categories, forward);
        }
    }

    // ========================
    // Export
    // ========================

    pub fn export_csv(&mut self) {
        let page = self.view.page;
        let result = export::write_page(&self.export_dir, page, self.visible_rows());
        self.notice = Some(match result {
            Ok(path) => Notice::info(format!("Exported page {} to {}", page, path.display())),
            Err(e) => {
                tracing::warn!(error = %e, "Export failed");
                Notice::error(format!("Export error: {:#}", e))
            }
        });
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // ========================
    // Network responses
    // ========================

    pub fn handle_response(&mut self, response: NetworkResponse) {
        match response {
            NetworkResponse::CatalogLoaded {
                products,
                categories,
                ..
            } => {
                self.products = products;
                self.categories = categories;
                self.catalog_loaded = true;
                self.is_loading = false;
                self.refresh();
            }
            NetworkResponse::CatalogFailed { message, .. } => {
                self.is_loading = false;
                self.notice = Some(Notice::error(format!(
                    "Load error: {} (press r to retry)",
                    message
                )));
            }
            NetworkResponse::ProductCreated { product, .. } => {
                tracing::debug!(product_id = product.id, "Prepending created product");
                self.products.insert(0, product);
                if matches!(self.form.as_ref().map(|f| f.kind), Some(FormKind::Create)) {
                    self.close_form();
                }
                self.refresh();
                self.notice = Some(Notice::info("Product created"));
            }
            NetworkResponse::ProductUpdated { product, .. } => {
                let product_id = product.id;
                tracing::debug!(product_id, "Merging updated product");
                apply_update(&mut self.products, product);
                if matches!(
                    self.form.as_ref().map(|f| f.kind),
                    Some(FormKind::Edit { product_id: id }) if id == product_id
                ) {
                    self.close_form();
                }
                self.refresh();
                self.notice = Some(Notice::info("Product updated"));
            }
            NetworkResponse::WriteFailed {
                op,
                product_id,
                message,
                ..
            } => {
                if let Some(form) = self.form.as_mut() {
                    let same_workflow = match (op, form.kind) {
                        (WriteOp::Create, FormKind::Create) => true,
                        (WriteOp::Update, FormKind::Edit { product_id: editing }) => {
                            product_id == Some(editing)
                        }
                        _ => false,
                    };
                    if same_workflow {
                        form.pending = form.pending.saturating_sub(1);
                    }
                }
                self.notice = Some(Notice::error(format!("{} error: {}", op.as_str(), message)));
            }
        }
    }
}
