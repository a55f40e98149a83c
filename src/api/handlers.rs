use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::Product,
};

use super::AppState;

// Request/Response types

/// Product as returned to the frontend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
    pub availability: bool,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            availability: product.available,
        }
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Similar products of a product, in upstream order
///
/// Zero resolved products is reported as not found.
pub async fn get_similar_products(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(product_id): Path<String>,
) -> AppResult<Json<Vec<ProductResponse>>> {
    if product_id.trim().is_empty() {
        return Err(AppError::BadRequest(
            "ProductId is a required field and cannot be empty.".to_string(),
        ));
    }

    tracing::info!(
        request_id = %request_id,
        product_id = %product_id,
        "Processing similar products request"
    );

    let products = state
        .similar_products
        .get_similar_products(&product_id)
        .await?;

    if products.is_empty() {
        return Err(AppError::NotFound(format!(
            "No similar products found for productId: {}",
            product_id
        )));
    }

    tracing::info!(
        request_id = %request_id,
        results = products.len(),
        "Similar products request completed"
    );

    Ok(Json(products.iter().map(ProductResponse::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_product_response_wire_shape() {
        let product = Product::new("123", "T-shirt", dec!(29.99), true);
        let json = serde_json::to_value(ProductResponse::from(&product)).unwrap();

        assert_eq!(
            json,
            json!({ "id": "123", "name": "T-shirt", "price": 29.99, "availability": true })
        );
    }

    #[test]
    fn test_product_response_keeps_every_price_digit() {
        let product = Product::new("1", "Sofa", dec!(12345678901234567.89), false);
        let body = serde_json::to_string(&ProductResponse::from(&product)).unwrap();

        assert!(body.contains(r#""price":12345678901234567.89"#));
    }
}
