use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::warn;
use uuid::Uuid;

use common_auth::{AuthContext, TokenSubject};
use common_http_errors::{ApiError, ApiResult};

use crate::validate;
use crate::AppState;

#[derive(Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(new_user): Json<NewUser>,
) -> ApiResult<Json<User>> {
    let NewUser {
        name,
        email,
        password,
    } = new_user;

    validate::NAME.check(&name)?;
    validate::email(&email)?;
    validate::PASSWORD.check(&password)?;

    let existing = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::internal)?;

    if existing.is_some() {
        return Err(ApiError::conflict(
            "email_taken",
            format!(
                "A user with email {email} is already registered. Please choose a different email."
            ),
        ));
    }

    let password_hash = hash_password(&password)?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, name, email, password_hash)
         VALUES ($1, $2, $3, $4)
         RETURNING id, name, email",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .fetch_one(&state.db)
    .await
    .map_err(|e| match &e {
        // Lost the race against a concurrent registration of the same email.
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ApiError::conflict("email_taken", "This email is already registered.")
        }
        _ => ApiError::internal(e),
    })?;

    Ok(Json(user))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub token: String,
    pub expires_in: i64,
}

#[derive(FromRow)]
struct CredentialRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
}

pub async fn login_user(
    State(state): State<AppState>,
    Json(login): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let LoginRequest { email, password } = login;

    validate::email(&email)?;
    validate::PASSWORD.check(&password)?;

    let row = sqlx::query_as::<_, CredentialRow>(
        "SELECT id, name, email, password_hash FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(&state.db)
    .await
    .map_err(ApiError::internal)?;

    // Unknown email and wrong password fail identically so the response
    // does not leak which one it was.
    let Some(row) = row else {
        return Err(ApiError::unauthenticated());
    };

    let password_valid = bcrypt::verify(&password, &row.password_hash).unwrap_or(false);
    if !password_valid {
        warn!(user_id = %row.id, "rejected login with invalid password");
        return Err(ApiError::unauthenticated());
    }

    let subject = TokenSubject {
        user_id: row.id,
        username: row.name.clone(),
    };
    let issued = state.signer.issue(&subject).map_err(ApiError::internal)?;

    Ok(Json(LoginResponse {
        id: row.id,
        name: row.name,
        email: row.email,
        token: issued.token,
        expires_in: issued.expires_in,
    }))
}

/// Profile of the caller, resolved from the token subject.
pub async fn user_detail(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<User>> {
    let user = sqlx::query_as::<_, User>("SELECT id, name, email FROM users WHERE id = $1")
        .bind(auth.claims.subject)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("user_not_found", "User not found."))?;

    Ok(Json(user))
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(ApiError::internal)
}
