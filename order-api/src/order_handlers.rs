use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::info;
use uuid::Uuid;

use common_auth::AuthContext;
use common_http_errors::{ApiError, ApiResult};

use crate::product_handlers::Product;
use crate::AppState;

#[derive(Deserialize)]
pub struct NewOrder {
    pub name: Option<String>,
    #[serde(rename = "table")]
    pub table_number: i32,
}

#[derive(Debug, Serialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub name: Option<String>,
    #[serde(rename = "table")]
    pub table_number: i32,
    pub draft: bool,
    pub status: bool,
}

pub async fn create_order(
    State(state): State<AppState>,
    _auth: AuthContext,
    Json(new_order): Json<NewOrder>,
) -> ApiResult<Json<Order>> {
    let NewOrder { name, table_number } = new_order;

    let order = sqlx::query_as::<_, Order>(
        "INSERT INTO orders (id, name, table_number)
         VALUES ($1, $2, $3)
         RETURNING id, name, table_number, draft, status",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(table_number)
    .fetch_one(&state.db)
    .await
    .map_err(ApiError::internal)?;

    info!(order_id = %order.id, table = order.table_number, "created order");
    Ok(Json(order))
}

/// The active queue: sent but not yet finished, newest id first.
pub async fn list_orders(
    State(state): State<AppState>,
    _auth: AuthContext,
) -> ApiResult<Json<Vec<Order>>> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT id, name, table_number, draft, status
         FROM orders
         WHERE draft = FALSE AND status = FALSE
         ORDER BY id DESC",
    )
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::internal)?;

    Ok(Json(orders))
}

/// Clear the draft flag, moving the order into the active queue.
///
/// A single conditional update: the missing-row case is the 404, so
/// there is no window between an existence check and the write.
pub async fn send_order(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Order>> {
    let order = sqlx::query_as::<_, Order>(
        "UPDATE orders SET draft = FALSE WHERE id = $1
         RETURNING id, name, table_number, draft, status",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(order_not_found)?;

    info!(order_id = %order.id, "order sent");
    Ok(Json(order))
}

/// Mark the order finished. Finishing a draft or an already finished
/// order is allowed; only the flags matter for the queue view.
pub async fn finish_order(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Order>> {
    let order = sqlx::query_as::<_, Order>(
        "UPDATE orders SET status = TRUE WHERE id = $1
         RETURNING id, name, table_number, draft, status",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(order_not_found)?;

    info!(order_id = %order.id, "order finished");
    Ok(Json(order))
}

/// Remove the order, returning the pre-deletion snapshot. Items go with
/// it via the FK cascade.
pub async fn delete_order(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Order>> {
    let order = sqlx::query_as::<_, Order>(
        "DELETE FROM orders WHERE id = $1
         RETURNING id, name, table_number, draft, status",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(order_not_found)?;

    info!(order_id = %order.id, "order deleted");
    Ok(Json(order))
}

#[derive(Debug, Serialize)]
pub struct ItemDetail {
    pub id: Uuid,
    pub amount: i32,
    pub order: Order,
    pub product: Product,
}

#[derive(FromRow)]
struct ItemDetailRow {
    id: Uuid,
    amount: i32,
    o_id: Uuid,
    o_name: Option<String>,
    o_table_number: i32,
    o_draft: bool,
    o_status: bool,
    p_id: Uuid,
    p_name: String,
    p_price: String,
    p_description: String,
    p_banner: String,
    p_category_id: Uuid,
}

impl From<ItemDetailRow> for ItemDetail {
    fn from(row: ItemDetailRow) -> Self {
        Self {
            id: row.id,
            amount: row.amount,
            order: Order {
                id: row.o_id,
                name: row.o_name,
                table_number: row.o_table_number,
                draft: row.o_draft,
                status: row.o_status,
            },
            product: Product {
                id: row.p_id,
                name: row.p_name,
                price: row.p_price,
                description: row.p_description,
                banner: row.p_banner,
                category_id: row.p_category_id,
            },
        }
    }
}

/// Items of an order, denormalized with their order and product for
/// display purposes.
pub async fn order_detail(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<ItemDetail>>> {
    let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::internal)?;

    if exists.is_none() {
        return Err(order_not_found());
    }

    let rows = sqlx::query_as::<_, ItemDetailRow>(
        "SELECT i.id, i.amount,
                o.id AS o_id, o.name AS o_name, o.table_number AS o_table_number,
                o.draft AS o_draft, o.status AS o_status,
                p.id AS p_id, p.name AS p_name, p.price AS p_price,
                p.description AS p_description, p.banner AS p_banner,
                p.category_id AS p_category_id
         FROM items i
         JOIN orders o ON o.id = i.order_id
         JOIN products p ON p.id = i.product_id
         WHERE i.order_id = $1",
    )
    .bind(id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::internal)?;

    Ok(Json(rows.into_iter().map(ItemDetail::from).collect()))
}

fn order_not_found() -> ApiError {
    ApiError::not_found("order_not_found", "Order not found.")
}
