use axum::{
    extract::{Query, State},
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{jwt::AuthUser, password::hash_password},
    error::{ApiError, FieldError},
    state::AppState,
    users::{
        dto::{BulkQuery, BulkResponse, MessageResponse, UpdateProfileRequest, UserSummary},
        repo::User,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", put(update_profile))
        .route("/bulk", get(bulk))
}

fn validate_update(payload: &UpdateProfileRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let fields = [
        ("password", &payload.password),
        ("firstName", &payload.first_name),
        ("lastName", &payload.last_name),
    ];
    for (field, value) in fields {
        if let Some(v) = value {
            if v.trim().is_empty() {
                errors.push(FieldError::new(field, "must not be empty if present"));
            }
        }
    }
    errors
}

/// PUT / — authenticated partial profile mutation. Only reachable with
/// a verified identity; absent fields are left unchanged.
#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let errors = validate_update(&payload);
    if !errors.is_empty() {
        warn!(user_id = %user_id, "update invalid input");
        return Err(ApiError::InvalidInput(errors));
    }

    // Passwords are hashed at every write path, the update included.
    let password_hash = match payload.password.as_deref() {
        Some(plain) => Some(hash_password(plain)?),
        None => None,
    };

    User::update_profile(
        &state.db,
        user_id,
        password_hash.as_deref(),
        payload.first_name.as_deref(),
        payload.last_name.as_deref(),
    )
    .await?;

    info!(user_id = %user_id, "profile updated");
    Ok(Json(MessageResponse {
        message: "Updated successfully".into(),
    }))
}

/// GET /bulk?filter= — unauthenticated listing of user summaries.
#[instrument(skip(state))]
pub async fn bulk(
    State(state): State<AppState>,
    Query(q): Query<BulkQuery>,
) -> Result<Json<BulkResponse>, ApiError> {
    let users = User::search(&state.db, &q.filter).await?;
    let user = users.into_iter().map(UserSummary::from).collect();
    Ok(Json(BulkResponse { user }))
}
