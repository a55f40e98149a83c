use std::sync::Arc;

use tokio::{sync::Semaphore, task::JoinSet};
use tracing::instrument;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::Product,
    services::providers::ProductClient,
};

/// Resolves the similar products of a product into full records
///
/// Detail lookups fan out concurrently, bounded by `max_concurrency`, and the result keeps
/// the order of the similar-id list. Ids whose details are absent are dropped.
#[derive(Clone)]
pub struct SimilarProductsService {
    client: Arc<dyn ProductClient>,
    max_concurrency: usize,
}

impl SimilarProductsService {
    /// A `max_concurrency` of zero is treated as one.
    pub fn new(client: Arc<dyn ProductClient>, max_concurrency: usize) -> Self {
        Self {
            client,
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn from_config(client: Arc<dyn ProductClient>, config: &Config) -> Self {
        Self::new(client, config.detail_fetch_concurrency)
    }

    /// Fetches the similar ids of `product_id`, then the details of each
    ///
    /// An empty list is a valid answer; deciding whether that means "not found" is left to
    /// the caller. Dropping the returned future aborts any lookups still in flight.
    #[instrument(skip(self), fields(max_concurrency = self.max_concurrency))]
    pub async fn get_similar_products(&self, product_id: &str) -> AppResult<Vec<Product>> {
        let ids = self.client.list_similar_ids(product_id).await.map_err(|e| {
            tracing::error!(error = %e, "Similar ids lookup raised an error");
            AppError::fetch_failed(product_id)
        })?;

        if ids.is_empty() {
            tracing::info!("No similar ids returned");
            return Ok(Vec::new());
        }

        let limiter = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();

        for (slot, id) in ids.iter().cloned().enumerate() {
            let client = Arc::clone(&self.client);
            let limiter = Arc::clone(&limiter);
            tasks.spawn(async move {
                // the semaphore is never closed
                let _permit = limiter.acquire_owned().await.ok();
                let details = client.get_product_details(&id).await;
                (slot, id, details)
            });
        }

        let mut slots: Vec<Option<Product>> = Vec::with_capacity(ids.len());
        slots.resize_with(ids.len(), || None);

        while let Some(joined) = tasks.join_next().await {
            let (slot, id, details) = joined.map_err(|e| {
                tracing::error!(error = %e, "Product detail task failed");
                AppError::fetch_failed(product_id)
            })?;

            match details {
                Ok(Some(product)) => slots[slot] = Some(product),
                Ok(None) => {
                    tracing::debug!(similar_id = %id, "Dropping similar id without details")
                }
                Err(e) => {
                    tracing::error!(
                        similar_id = %id,
                        error = %e,
                        "Product detail lookup raised an error"
                    );
                    return Err(AppError::fetch_failed(product_id));
                }
            }
        }

        let products: Vec<Product> = slots.into_iter().flatten().collect();

        if products.len() < ids.len() {
            tracing::warn!(
                requested = ids.len(),
                resolved = products.len(),
                "Partial similar products resolution"
            );
        }

        tracing::info!(results = products.len(), "Similar products resolved");

        Ok(products)
    }
}
