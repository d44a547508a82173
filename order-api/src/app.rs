use std::sync::Arc;

use axum::extract::FromRef;
use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderName, HeaderValue, Method,
};
use axum::routing::{delete, get, post, put};
use axum::Router;
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};

use common_auth::{JwtVerifier, TokenSigner};

use crate::config::AppConfig;
use crate::{
    category_handlers::{create_category, list_categories},
    item_handlers::{create_item, delete_item},
    order_handlers::{
        create_order, delete_order, finish_order, list_orders, order_detail, send_order,
    },
    product_handlers::{create_product, list_products},
    user_handlers::{create_user, login_user, user_detail},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub verifier: Arc<JwtVerifier>,
    pub signer: Arc<TokenSigner>,
    pub config: Arc<AppConfig>,
}

impl FromRef<AppState> for Arc<JwtVerifier> {
    fn from_ref(state: &AppState) -> Self {
        state.verifier.clone()
    }
}

impl FromRef<AppState> for Arc<TokenSigner> {
    fn from_ref(state: &AppState) -> Self {
        state.signer.clone()
    }
}

pub async fn health() -> &'static str {
    "ok"
}

pub fn build_router(state: AppState) -> Router {
    let allowed_origins = [
        "http://localhost:3000",
        "http://localhost:3001",
        "http://localhost:5173",
    ];
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|o| o.parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            ACCEPT,
            CONTENT_TYPE,
            HeaderName::from_static("authorization"),
        ]);

    Router::new()
        .route("/healthz", get(health))
        .route("/auth/login", post(login_user))
        .route("/user", post(create_user))
        .route("/user/detalhe", get(user_detail))
        .route("/order", post(create_order).get(list_orders))
        .route("/order/detail/:id", get(order_detail))
        .route("/order/finish/:id", put(finish_order))
        .route("/order/item", post(create_item))
        .route("/order/item/:id", delete(delete_item))
        .route("/order/:id", put(send_order).delete(delete_order))
        .route("/category", post(create_category).get(list_categories))
        .route("/product", post(create_product).get(list_products))
        .with_state(state)
        .layer(cors)
}
