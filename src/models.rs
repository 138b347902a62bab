use serde::{Deserialize, Deserializer, Serialize};

/// Category summary embedded in a product
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// A product record as returned by the store
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: CategoryRef,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
}

impl Product {
    /// First image URL, or an empty string
    pub fn thumbnail(&self) -> &str {
        self.images.first().map(String::as_str).unwrap_or("")
    }
}

/// A category, used only to populate selectors
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// Write body for create and update requests
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductDraft {
    pub title: String,
    /// NaN is sent as `null` and left for the server to reject
    pub price: f64,
    pub description: String,
    #[serde(rename = "categoryId")]
    pub category_id: i64,
    pub images: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_api_json() {
        let json = r#"{
            "id": 7,
            "title": "Classic Handbag",
            "price": 42.5,
            "description": "Leather",
            "category": {"id": 3, "name": "Bags", "image": "https://x/c.png"},
            "images": ["https://x/a.png", "https://x/b.png"],
            "creationAt": "2024-01-01T00:00:00.000Z"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, 7);
        assert_eq!(product.category.name, "Bags");
        assert_eq!(product.thumbnail(), "https://x/a.png");
    }

    #[test]
    fn test_product_missing_fields_default() {
        let json = r#"{"id": 1, "title": null, "price": 3}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.title, "");
        assert_eq!(product.price, 3.0);
        assert!(product.images.is_empty());
        assert_eq!(product.thumbnail(), "");
    }

    #[test]
    fn test_draft_serializes_category_id_and_nan_price() {
        let draft = ProductDraft {
            title: String::from("Bag"),
            price: f64::NAN,
            description: String::new(),
            category_id: 2,
            images: vec![String::from("https://x/a.png")],
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["categoryId"], 2);
        assert!(value["price"].is_null());
    }
}
