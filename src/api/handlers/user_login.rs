use super::{user_response, ErrorResponse, UserResponse};
use crate::accounts::{Accounts, Credentials};
use axum::{extract::Extension, response::Response, Json};
use tracing::instrument;

#[utoipa::path(
    post,
    path= "/api/user/login",
    request_body = Credentials,
    responses (
        (status = 200, description = "Login successful", body = UserResponse, content_type = "application/json"),
        (status = 400, description = "Missing fields, incorrect email or incorrect password", body = ErrorResponse),
    ),
    tag= "user"
)]
#[instrument(skip(accounts))]
pub async fn login(accounts: Extension<Accounts>, payload: Option<Json<Credentials>>) -> Response {
    let credentials = payload.map(|Json(payload)| payload).unwrap_or_default();

    user_response(accounts.login(&credentials).await)
}
