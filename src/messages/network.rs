//! Network messages - communication between App and Network layers

use crate::models::{Category, Product, ProductDraft};

/// Which write workflow a request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Create,
    Update,
}

impl WriteOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteOp::Create => "Create",
            WriteOp::Update => "Update",
        }
    }
}

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Fetch the product and category lists
    LoadCatalog { id: u64 },
    /// POST a new product
    CreateProduct { id: u64, draft: ProductDraft },
    /// PUT over an existing product
    UpdateProduct {
        id: u64,
        product_id: i64,
        draft: ProductDraft,
    },
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// Both lists fetched
    CatalogLoaded {
        id: u64,
        products: Vec<Product>,
        categories: Vec<Category>,
    },
    /// Initial fetch failed
    CatalogFailed { id: u64, message: String },
    /// Server accepted a new product
    ProductCreated { id: u64, product: Product },
    /// Server accepted an update
    ProductUpdated { id: u64, product: Product },
    /// A create or update was rejected or never reached the server
    WriteFailed {
        id: u64,
        op: WriteOp,
        /// Target record of a failed update
        product_id: Option<i64>,
        message: String,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::CatalogLoaded { id, .. } => *id,
            NetworkResponse::CatalogFailed { id, .. } => *id,
            NetworkResponse::ProductCreated { id, .. } => *id,
            NetworkResponse::ProductUpdated { id, .. } => *id,
            NetworkResponse::WriteFailed { id, .. } => *id,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            NetworkResponse::CatalogFailed { .. } | NetworkResponse::WriteFailed { .. }
        )
    }
}
