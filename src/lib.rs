//! # userauth
//!
//! `userauth` is a small account service exposing two endpoints:
//!
//! - `POST /api/user/signup` creates an account from an email and a strong password.
//! - `POST /api/user/login` checks an email and password against a stored account.
//!
//! ## Credentials
//!
//! Passwords are hashed with `bcrypt` (cost 10 by default) before they reach the
//! store. Hashing and verification run on the blocking thread pool so a slow hash
//! never holds up other requests.
//!
//! Every failure, from a missing field to an unreachable database, is answered with
//! `400 Bad Request` and a JSON body of the form `{"error": "<message>"}`.
//!
//! ## Storage
//!
//! Accounts live in PostgreSQL, one row per email. The `UNIQUE (email)` constraint is
//! what keeps two concurrent signups for the same address from both succeeding; the
//! lookup done before hashing only exists to answer early.

pub mod accounts;
pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
