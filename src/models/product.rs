use rust_decimal::Decimal;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

/// A product record as served by the upstream catalog
///
/// Fetched fresh for every request and never mutated afterwards. Only `id` and `price`
/// are required; a missing or null `name`/`availability` falls back to empty/false.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Upstream-assigned identifier
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Currency-agnostic, non-negative price, carried as an exact JSON number
    #[serde(
        serialize_with = "rust_decimal::serde::arbitrary_precision::serialize",
        deserialize_with = "non_negative_price"
    )]
    pub price: Decimal,
    #[serde(
        rename = "availability",
        default,
        deserialize_with = "null_as_default"
    )]
    pub available: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_negative_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let price = rust_decimal::serde::arbitrary_precision::deserialize(deserializer)?;
    if price < Decimal::ZERO {
        return Err(D::Error::custom(format!(
            "price must be non-negative, got {}",
            price
        )));
    }
    Ok(price)
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Decimal,
        available: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            available,
        }
    }
}
