use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::info;
use uuid::Uuid;

use common_auth::AuthContext;
use common_http_errors::{ApiError, ApiResult};

use crate::validate;
use crate::AppState;

#[derive(Deserialize)]
pub struct NewItem {
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub amount: i32,
}

#[derive(Debug, Serialize, FromRow)]
pub struct Item {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub amount: i32,
}

pub async fn create_item(
    State(state): State<AppState>,
    _auth: AuthContext,
    Json(new_item): Json<NewItem>,
) -> ApiResult<Json<Item>> {
    let NewItem {
        order_id,
        product_id,
        amount,
    } = new_item;

    validate::positive_amount(amount)?;

    // Referential integrity is the storage layer's job; surface an FK
    // violation as a bad reference rather than a server fault.
    let item = sqlx::query_as::<_, Item>(
        "INSERT INTO items (id, order_id, product_id, amount)
         VALUES ($1, $2, $3, $4)
         RETURNING id, order_id, product_id, amount",
    )
    .bind(Uuid::new_v4())
    .bind(order_id)
    .bind(product_id)
    .bind(amount)
    .fetch_one(&state.db)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => ApiError::validation(
            "invalid_reference",
            "Referenced order or product does not exist.",
        ),
        _ => ApiError::internal(e),
    })?;

    info!(item_id = %item.id, order_id = %item.order_id, "added item to order");
    Ok(Json(item))
}

pub async fn delete_item(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Item>> {
    let item = sqlx::query_as::<_, Item>(
        "DELETE FROM items WHERE id = $1
         RETURNING id, order_id, product_id, amount",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(|| ApiError::not_found("item_not_found", "Item not found."))?;

    info!(item_id = %item.id, order_id = %item.order_id, "removed item from order");
    Ok(Json(item))
}
