use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use common_auth::AuthContext;
use common_http_errors::{ApiError, ApiResult};

use crate::validate;
use crate::AppState;

const DEFAULT_BANNER_URL: &str = "https://placehold.co/400x300?text=No+Image";

#[derive(Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: String,
    pub description: String,
    #[serde(default)]
    pub banner: Option<String>,
    pub category_id: Uuid,
}

#[derive(Debug, Serialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: String,
    pub description: String,
    pub banner: String,
    pub category_id: Uuid,
}

/// Image upload itself is a collaborator concern; this API stores the
/// resulting URL, falling back to a placeholder when none is given.
fn normalize_banner(input: Option<String>) -> String {
    match input {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                DEFAULT_BANNER_URL.to_string()
            } else {
                trimmed.to_string()
            }
        }
        None => DEFAULT_BANNER_URL.to_string(),
    }
}

pub async fn create_product(
    State(state): State<AppState>,
    _auth: AuthContext,
    Json(new_product): Json<NewProduct>,
) -> ApiResult<Json<Product>> {
    let NewProduct {
        name,
        price,
        description,
        banner,
        category_id,
    } = new_product;

    validate::PRODUCT_NAME.check(&name)?;
    validate::non_empty("price", &price)?;

    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (id, name, price, description, banner, category_id)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id, name, price, description, banner, category_id",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(price)
    .bind(description)
    .bind(normalize_banner(banner))
    .bind(category_id)
    .fetch_one(&state.db)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            ApiError::validation("invalid_reference", "Referenced category does not exist.")
        }
        _ => ApiError::internal(e),
    })?;

    Ok(Json(product))
}

#[derive(Deserialize)]
pub struct ProductFilter {
    pub category_id: Uuid,
}

pub async fn list_products(
    State(state): State<AppState>,
    _auth: AuthContext,
    Query(filter): Query<ProductFilter>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT id, name, price, description, banner, category_id
         FROM products
         WHERE category_id = $1",
    )
    .bind(filter.category_id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::internal)?;

    Ok(Json(products))
}
