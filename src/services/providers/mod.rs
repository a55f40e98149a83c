/// Upstream product catalog abstraction
///
/// The aggregation pipeline only talks to the catalog through [`ProductClient`], so the
/// HTTP implementation can be swapped for a fake in tests or another transport later.
use crate::{error::AppResult, models::Product};

pub mod http;

pub use http::{HttpProductClient, UpstreamError};

/// Read access to the upstream product catalog
///
/// Implementations absorb upstream failures: an unreachable or failing catalog shows up as
/// an empty id list or an absent product. `Err` is reserved for faults inside the client
/// itself and is treated as a broken fetch by callers.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ProductClient: Send + Sync {
    /// Ordered ids of products similar to `product_id`
    async fn list_similar_ids(&self, product_id: &str) -> AppResult<Vec<String>>;

    /// Full details of one product, `None` when the catalog has nothing usable for it
    async fn get_product_details(&self, product_id: &str) -> AppResult<Option<Product>>;
}
