pub mod providers;
pub mod retry;
pub mod similar_products;

pub use providers::{HttpProductClient, ProductClient};
pub use retry::RetryPolicy;
pub use similar_products::SimilarProductsService;
