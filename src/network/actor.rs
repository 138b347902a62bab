//! Network actor - runs store requests in the Tokio async runtime

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse, WriteOp};
use crate::models::{Category, Product, ProductDraft};
use crate::network::client::{Resource, StoreClient, StoreError};

/// Network actor that processes store commands
///
/// Every command runs as its own task; nothing is cancelled or de-duplicated,
/// so overlapping writes report back in completion order.
pub struct NetworkActor {
    client: StoreClient,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(client: StoreClient, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            client,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::LoadCatalog { id }) => {
                            let client = self.client.clone();
                            let response_tx = self.response_tx.clone();
                            self.active_requests.spawn(async move {
                                tracing::info!(id, base = %client.base(), "Loading catalog");
                                let _ = response_tx.send(load_catalog(&client, id).await);
                            });
                        }

                        Some(NetworkCommand::CreateProduct { id, draft }) => {
                            let client = self.client.clone();
                            let response_tx = self.response_tx.clone();
                            self.active_requests.spawn(async move {
                                tracing::info!(id, title = %draft.title, "Creating product");
                                let _ = response_tx.send(create_product(&client, id, draft).await);
                            });
                        }

                        Some(NetworkCommand::UpdateProduct { id, product_id, draft }) => {
                            let client = self.client.clone();
                            let response_tx = self.response_tx.clone();
                            self.active_requests.spawn(async move {
                                tracing::info!(id, product_id, "Updating product");
                                let _ = response_tx.send(update_product(&client, id, product_id, draft).await);
                            });
                        }

                        Some(NetworkCommand::Shutdown) | None => {
                            self.active_requests.abort_all();
                            break;
                        }
                    }
                }

                // Reap finished tasks; results already went out on response_tx
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }
}

pub async fn load_catalog(client: &StoreClient, id: u64) -> NetworkResponse {
    let fetched: Result<(Vec<Product>, Vec<Category>), StoreError> = async {
        let products = client.list(Resource::Products).await?;
        let categories = client.list(Resource::Categories).await?;
        Ok((products, categories))
    }
    .await;

    match fetched {
        Ok((products, categories)) => {
            tracing::info!(id, products = products.len(), categories = categories.len(), "Catalog loaded");
            NetworkResponse::CatalogLoaded {
                id,
                products,
                categories,
            }
        }
        Err(e) => {
            tracing::warn!(id, error = %e, "Catalog load failed");
            NetworkResponse::CatalogFailed {
                id,
                message: e.to_string(),
            }
        }
    }
}

pub async fn create_product(client: &StoreClient, id: u64, draft: ProductDraft) -> NetworkResponse {
    match client.create::<_, Product>(Resource::Products, &draft).await {
        Ok(product) => {
            tracing::info!(id, product_id = product.id, "Product created");
            NetworkResponse::ProductCreated { id, product }
        }
        Err(e) => write_failed(id, WriteOp::Create, None, e),
    }
}

pub async fn update_product(
    client: &StoreClient,
    id: u64,
    product_id: i64,
    draft: ProductDraft,
) -> NetworkResponse {
    match client
        .update::<_, Product>(Resource::Products, product_id, &draft)
        .await
    {
        Ok(product) => {
            tracing::info!(id, product_id = product.id, "Product updated");
            NetworkResponse::ProductUpdated { id, product }
        }
        Err(e) => write_failed(id, WriteOp::Update, Some(product_id), e),
    }
}

fn write_failed(id: u64, op: WriteOp, product_id: Option<i64>, e: StoreError) -> NetworkResponse {
    tracing::warn!(id, op = op.as_str(), ?product_id, network = e.is_network(), error = %e, "Write failed");
    NetworkResponse::WriteFailed {
        id,
        op,
        product_id,
        message: e.to_string(),
    }
}
