use std::sync::Arc;

use crate::services::{ProductClient, SimilarProductsService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub similar_products: Arc<SimilarProductsService>,
}

impl AppState {
    pub fn new(similar_products: SimilarProductsService) -> Self {
        Self {
            similar_products: Arc::new(similar_products),
        }
    }

    /// Builds the aggregation service over `client`
    pub fn with_client(client: Arc<dyn ProductClient>, max_concurrency: usize) -> Self {
        Self::new(SimilarProductsService::new(client, max_concurrency))
    }
}
