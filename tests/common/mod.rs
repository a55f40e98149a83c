#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use reqwest::Url;
use rust_decimal_macros::dec;
use similar_products_api::{
    error::{AppError, AppResult},
    models::Product,
    services::{HttpProductClient, ProductClient, RetryPolicy},
};

/// One canned upstream reply
#[derive(Clone, Debug)]
pub struct StubResponse {
    status: StatusCode,
    body: String,
}

impl StubResponse {
    pub fn json(body: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.to_string(),
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }
}

#[derive(Clone, Default)]
struct StubState {
    scripts: Arc<Mutex<HashMap<String, VecDeque<StubResponse>>>>,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

/// Local stand-in for the upstream catalog
///
/// Each path replays its scripted responses in order and repeats the last one.
/// Unscripted paths answer 404.
pub struct StubUpstream {
    state: StubState,
    addr: SocketAddr,
}

impl StubUpstream {
    pub async fn start() -> Self {
        let state = StubState::default();
        let app = Router::new().fallback(respond).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { state, addr }
    }

    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).unwrap()
    }

    pub fn script(&self, path: &str, responses: Vec<StubResponse>) {
        self.state
            .scripts
            .lock()
            .unwrap()
            .insert(path.to_string(), responses.into());
    }

    pub fn hits(&self, path: &str) -> usize {
        self.state
            .hits
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    /// Client against this stub with `max_attempts` and a short real wait
    pub fn client(&self, max_attempts: u32) -> HttpProductClient {
        HttpProductClient::new(
            reqwest::Client::new(),
            self.base_url(),
            RetryPolicy::new(max_attempts, Duration::from_millis(5)),
        )
        .unwrap()
    }
}

async fn respond(State(state): State<StubState>, uri: Uri) -> Response {
    let path = uri.path().to_string();
    *state.hits.lock().unwrap().entry(path.clone()).or_insert(0) += 1;

    let next = {
        let mut scripts = state.scripts.lock().unwrap();
        match scripts.get_mut(&path) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        }
    };

    match next {
        Some(reply) => (
            reply.status,
            [(CONTENT_TYPE, "application/json")],
            reply.body,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub fn product(id: &str) -> Product {
    Product::new(id, format!("Product {}", id), dec!(10.99), true)
}

pub fn product_json(id: &str) -> String {
    format!(
        r#"{{"id":"{id}","name":"Product {id}","price":10.99,"availability":true}}"#,
        id = id
    )
}

/// In-memory catalog for exercising the HTTP boundary
#[derive(Default)]
pub struct StaticCatalog {
    pub similar: HashMap<String, Vec<String>>,
    pub products: HashMap<String, Product>,
    pub broken: bool,
    pub panics: bool,
    pub delay: Option<Duration>,
}

impl StaticCatalog {
    pub fn with_similar(mut self, id: &str, similar: &[&str]) -> Self {
        self.similar.insert(
            id.to_string(),
            similar.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn with_products(mut self, ids: &[&str]) -> Self {
        for id in ids {
            self.products.insert(id.to_string(), product(id));
        }
        self
    }
}

#[async_trait::async_trait]
impl ProductClient for StaticCatalog {
    async fn list_similar_ids(&self, product_id: &str) -> AppResult<Vec<String>> {
        if self.panics {
            panic!("catalog exploded");
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.broken {
            return Err(AppError::Internal("catalog state corrupted".to_string()));
        }
        Ok(self.similar.get(product_id).cloned().unwrap_or_default())
    }

    async fn get_product_details(&self, product_id: &str) -> AppResult<Option<Product>> {
        Ok(self.products.get(product_id).cloned())
    }
}
