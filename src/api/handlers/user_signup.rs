use super::{user_response, ErrorResponse, UserResponse};
use crate::accounts::{Accounts, Credentials};
use axum::{extract::Extension, response::Response, Json};
use tracing::instrument;

#[utoipa::path(
    post,
    path= "/api/user/signup",
    request_body = Credentials,
    responses (
        (status = 200, description = "Account created", body = UserResponse, content_type = "application/json"),
        (status = 400, description = "Missing fields, invalid email, weak password or email already in use", body = ErrorResponse),
    ),
    tag= "user"
)]
#[instrument(skip(accounts))]
pub async fn signup(accounts: Extension<Accounts>, payload: Option<Json<Credentials>>) -> Response {
    // a missing or malformed body counts as empty fields
    let credentials = payload.map(|Json(payload)| payload).unwrap_or_default();

    user_response(accounts.signup(&credentials).await)
}
