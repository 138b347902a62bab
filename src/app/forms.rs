//! Product create/edit forms and their field extraction

use crate::models::{Category, Product, ProductDraft};

/// Which workflow a form submits to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormKind {
    Create,
    Edit { product_id: i64 },
}

/// Form field, in tab order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Title,
    Price,
    Description,
    Category,
    Images,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Title,
        FormField::Price,
        FormField::Description,
        FormField::Category,
        FormField::Images,
    ];

    pub fn next(&self) -> FormField {
        match self {
            FormField::Title => FormField::Price,
            FormField::Price => FormField::Description,
            FormField::Description => FormField::Category,
            FormField::Category => FormField::Images,
            FormField::Images => FormField::Title,
        }
    }

    pub fn prev(&self) -> FormField {
        match self {
            FormField::Title => FormField::Images,
            FormField::Price => FormField::Title,
            FormField::Description => FormField::Price,
            FormField::Category => FormField::Description,
            FormField::Images => FormField::Category,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Price => "Price",
            FormField::Description => "Description",
            FormField::Category => "Category",
            FormField::Images => "Images (comma-separated)",
        }
    }
}

/// Editable form state, shared by create and edit
#[derive(Clone, Debug, PartialEq)]
pub struct ProductForm {
    pub kind: FormKind,
    pub title: String,
    pub price: String,
    pub description: String,
    pub category_id: Option<i64>,
    pub images: String,
    pub active_field: FormField,
    /// Byte offset into the active text field
    pub cursor: usize,
    /// Submissions sent and not yet answered
    pub pending: u32,
}

impl ProductForm {
    /// Blank create form, defaulting to the first category
    pub fn blank(categories: &[Category]) -> Self {
        ProductForm {
            kind: FormKind::Create,
            title: String::new(),
            price: String::new(),
            description: String::new(),
            category_id: categories.first().map(|c| c.id),
            images: String::new(),
            active_field: FormField::Title,
            cursor: 0,
            pending: 0,
        }
    }

    /// Detail form pre-filled from a record
    pub fn for_product(product: &Product) -> Self {
        let title = product.title.clone();
        ProductForm {
            kind: FormKind::Edit {
                product_id: product.id,
            },
            cursor: title.len(),
            title,
            price: product.price.to_string(),
            description: product.description.clone(),
            category_id: Some(product.category.id),
            images: product.images.join(","),
            active_field: FormField::Title,
            pending: 0,
        }
    }

    pub fn text(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Price => &self.price,
            FormField::Description => &self.description,
            FormField::Images => &self.images,
            FormField::Category => "",
        }
    }

    fn active_text_mut(&mut self) -> Option<&mut String> {
        match self.active_field {
            FormField::Title => Some(&mut self.title),
            FormField::Price => Some(&mut self.price),
            FormField::Description => Some(&mut self.description),
            FormField::Images => Some(&mut self.images),
            FormField::Category => None,
        }
    }

    pub fn next_field(&mut self) {
        self.focus(self.active_field.next());
    }

    pub fn prev_field(&mut self) {
        self.focus(self.active_field.prev());
    }

    fn focus(&mut self, field: FormField) {
        self.active_field = field;
        self.cursor = self.text(field).len();
    }

    pub fn insert_char(&mut self, c: char) {
        let cursor = self.cursor;
        if let Some(text) = self.active_text_mut() {
            if cursor <= text.len() {
                text.insert(cursor, c);
                self.cursor = cursor + c.len_utf8();
            }
        }
    }

    pub fn backspace(&mut self) {
        let cursor = self.cursor;
        if cursor == 0 {
            return;
        }
        if let Some(text) = self.active_text_mut() {
            let prev = text[..cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            text.remove(prev);
            self.cursor = prev;
        }
    }

    pub fn cursor_left(&mut self) {
        let text = self.text(self.active_field);
        if self.cursor > 0 {
            self.cursor = text[..self.cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn cursor_right(&mut self) {
        let text = self.text(self.active_field);
        if self.cursor < text.len() {
            self.cursor = text[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(text.len());
        }
    }

    /// Step the category selector; an unknown current id restarts at the ends
    pub fn cycle_category(&mut self, categories: &[Category], forward: bool) {
        if categories.is_empty() {
            return;
        }
        let current = self
            .category_id
            .and_then(|id| categories.iter().position(|c| c.id == id));
        let len = categories.len();
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        self.category_id = Some(categories[next].id);
    }

    pub fn category_name<'a>(&self, categories: &'a [Category]) -> Option<&'a str> {
        let id = self.category_id?;
        categories.iter().find(|c| c.id == id).map(|c| c.name.as_str())
    }

    /// Build the request body, coercing types the way a form field would
    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            title: self.title.clone(),
            price: coerce_number(&self.price),
            description: self.description.clone(),
            category_id: self.category_id.unwrap_or(0),
            images: split_images(&self.images),
        }
    }
}

/// Empty text is zero, numeric text is its value, anything else is NaN
pub fn coerce_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Comma-separated list to trimmed, non-empty tokens
pub fn split_images(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryRef;

    fn categories() -> Vec<Category> {
        vec![
            Category { id: 1, name: String::from("Clothes") },
            Category { id: 4, name: String::from("Shoes") },
            Category { id: 9, name: String::from("Misc") },
        ]
    }

    #[test]
    fn test_split_images_trims_and_drops_empty() {
        assert_eq!(
            split_images(" https://a.png , ,https://b.png,"),
            vec!["https://a.png", "https://b.png"]
        );
        assert!(split_images("").is_empty());
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number(" 12.5 "), 12.5);
        assert!(coerce_number("twelve").is_nan());
    }

    #[test]
    fn test_detail_form_prefills_and_round_trips() {
        let product = Product {
            id: 7,
            title: String::from("Shoe"),
            price: 59.0,
            description: String::from("Running"),
            category: CategoryRef { id: 4, name: String::from("Shoes") },
            images: vec![String::from("https://a.png"), String::from("https://b.png")],
        };
        let form = ProductForm::for_product(&product);
        assert_eq!(form.kind, FormKind::Edit { product_id: 7 });
        assert_eq!(form.images, "https://a.png,https://b.png");
        assert_eq!(form.category_name(&categories()), Some("Shoes"));

        let draft = form.to_draft();
        assert_eq!(draft.title, "Shoe");
        assert_eq!(draft.price, 59.0);
        assert_eq!(draft.category_id, 4);
        assert_eq!(draft.images, product.images);
    }

    #[test]
    fn test_blank_form_defaults_to_first_category() {
        let form = ProductForm::blank(&categories());
        assert_eq!(form.category_id, Some(1));
        assert_eq!(ProductForm::blank(&[]).to_draft().category_id, 0);
    }

    #[test]
    fn test_editing_active_field() {
        let mut form = ProductForm::blank(&categories());
        for c in "Hat".chars() {
            form.insert_char(c);
        }
        form.backspace();
        assert_eq!(form.title, "Ha");

        form.next_field();
        assert_eq!(form.active_field, FormField::Price);
        form.insert_char('5');
        assert_eq!(form.price, "5");

        form.next_field();
        form.next_field();
        assert_eq!(form.active_field, FormField::Category);
        form.insert_char('x');
        assert_eq!(form.to_draft().description, "");

        form.prev_field();
        assert_eq!(form.active_field, FormField::Description);
    }

    #[test]
    fn test_cursor_moves_over_multibyte_chars() {
        let mut form = ProductForm::blank(&[]);
        form.insert_char('é');
        form.insert_char('a');
        form.cursor_left();
        form.cursor_left();
        assert_eq!(form.cursor, 0);
        form.cursor_right();
        assert_eq!(form.cursor, 'é'.len_utf8());
        form.insert_char('z');
        assert_eq!(form.title, "éza");
    }

    #[test]
    fn test_cycle_category_wraps() {
        let cats = categories();
        let mut form = ProductForm::blank(&cats);
        form.cycle_category(&cats, false);
        assert_eq!(form.category_id, Some(9));
        form.cycle_category(&cats, true);
        assert_eq!(form.category_id, Some(1));

        form.category_id = Some(42);
        form.cycle_category(&cats, true);
        assert_eq!(form.category_id, Some(1));
    }
}
