pub mod health;
pub use self::health::health;

pub mod user_signup;
pub use self::user_signup::signup;

pub mod user_login;
pub use self::user_login::login;

// common types for the user handlers
use crate::accounts::{Account, AccountError, ErrorKind};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserResponse {
    pub user: Account,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

/// Every outcome maps to 200 with the account or 400 with the message.
pub fn user_response(result: Result<Account, AccountError>) -> Response {
    match result {
        Ok(user) => (StatusCode::OK, Json(UserResponse { user })).into_response(),

        Err(e) => {
            if e.kind() == ErrorKind::Internal {
                error!("Request failed: {}", e);
            } else {
                debug!("Request rejected: {}", e);
            }

            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
