use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    accounts::repo::{random_starting_balance, Account},
    auth::{
        dto::{SigninRequest, SignupRequest, SignupResponse, TokenResponse},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
    },
    error::{ApiError, FieldError},
    state::AppState,
    users::repo::{is_unique_violation, User},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn validate_signup(payload: &SignupRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if !is_valid_email(&payload.username) {
        errors.push(FieldError::new("username", "must be a valid email address"));
    }
    if payload.first_name.trim().is_empty() {
        errors.push(FieldError::new("firstName", "must not be empty"));
    }
    if payload.last_name.trim().is_empty() {
        errors.push(FieldError::new("lastName", "must not be empty"));
    }
    if payload.password.is_empty() {
        errors.push(FieldError::new("password", "must not be empty"));
    }
    errors
}

fn validate_signin(payload: &SigninRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if !is_valid_email(&payload.username) {
        errors.push(FieldError::new("username", "must be a valid email address"));
    }
    if payload.password.is_empty() {
        errors.push(FieldError::new("password", "must not be empty"));
    }
    errors
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(mut payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    payload.username = payload.username.trim().to_lowercase();

    let errors = validate_signup(&payload);
    if !errors.is_empty() {
        warn!(username = %payload.username, "signup invalid input");
        return Err(ApiError::InvalidInput(errors));
    }

    // Fast path; the UNIQUE constraint below is authoritative.
    if User::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already taken");
        return Err(ApiError::UsernameTaken);
    }

    let hash = hash_password(&payload.password)?;

    // User and ledger entry are created atomically; a user row never
    // exists without its account.
    let mut tx = state.db.begin().await?;
    let user = match User::create(
        &mut tx,
        &payload.username,
        &payload.first_name,
        &payload.last_name,
        &hash,
    )
    .await
    {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            // Lost a concurrent signup race for the same username
            warn!(username = %payload.username, "username taken at insert");
            return Err(ApiError::UsernameTaken);
        }
        Err(e) => return Err(e.into()),
    };
    let account = Account::provision(&mut tx, user.id, random_starting_balance()).await?;
    tx.commit().await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(
        user_id = %user.id,
        username = %user.username,
        balance = account.balance,
        "user signed up"
    );
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully".into(),
            token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    Json(mut payload): Json<SigninRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    payload.username = payload.username.trim().to_lowercase();

    let errors = validate_signin(&payload);
    if !errors.is_empty() {
        warn!(username = %payload.username, "signin invalid input");
        return Err(ApiError::InvalidInput(errors));
    }

    let user = match User::find_by_username(&state.db, &payload.username).await? {
        Some(u) => u,
        None => {
            warn!(username = %payload.username, "signin unknown username");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "signin invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, username = %user.username, "user signed in");
    Ok(Json(TokenResponse { token }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup_req(username: &str, first: &str, last: &str, password: &str) -> SignupRequest {
        SignupRequest {
            username: username.into(),
            first_name: first.into(),
            last_name: last.into(),
            password: password.into(),
        }
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("spaces in@addr.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn valid_signup_passes_validation() {
        let errors = validate_signup(&signup_req("a@b.com", "A", "B", "pw"));
        assert!(errors.is_empty());
    }

    #[test]
    fn signup_reports_each_bad_field() {
        let errors = validate_signup(&signup_req("bad", "", "", ""));
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["username", "firstName", "lastName", "password"]);
    }

    #[test]
    fn signin_requires_email_username_and_password() {
        let errors = validate_signin(&SigninRequest {
            username: "plain".into(),
            password: "".into(),
        });
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["username", "password"]);

        let errors = validate_signin(&SigninRequest {
            username: "a@b.com".into(),
            password: "pw".into(),
        });
        assert!(errors.is_empty());
    }
}
