use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use common_auth::AuthContext;
use common_http_errors::{ApiError, ApiResult};

use crate::validate;
use crate::AppState;

#[derive(Deserialize)]
pub struct NewCategory {
    pub name: String,
}

#[derive(Debug, Serialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

pub async fn create_category(
    State(state): State<AppState>,
    _auth: AuthContext,
    Json(new_category): Json<NewCategory>,
) -> ApiResult<Json<Category>> {
    validate::CATEGORY_NAME.check(&new_category.name)?;

    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (id, name) VALUES ($1, $2) RETURNING id, name",
    )
    .bind(Uuid::new_v4())
    .bind(new_category.name)
    .fetch_one(&state.db)
    .await
    .map_err(ApiError::internal)?;

    Ok(Json(category))
}

pub async fn list_categories(
    State(state): State<AppState>,
    _auth: AuthContext,
) -> ApiResult<Json<Vec<Category>>> {
    let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM categories")
        .fetch_all(&state.db)
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(categories))
}
