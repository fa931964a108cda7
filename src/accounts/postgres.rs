use super::{Account, AccountError, AccountStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use sqlx::{postgres::PgPoolOptions, postgres::PgRow, Connection, PgPool, Row};
use std::time::Duration;
use tracing::{error, info_span, instrument, Instrument};
use uuid::Uuid;

pub const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a pool to `dsn`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be reached.
    pub async fn connect(dsn: &SecretString) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn.expose_secret())
            .await
            .context("Failed to connect to database")?;

        Ok(Self::new(pool))
    }

    /// Create the `users` table and its email constraint if missing.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be applied.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA_SQL)
            .execute(&self.pool)
            .await
            .context("Failed to apply database schema")?;

        Ok(())
    }
}

fn account_from_row(row: &PgRow) -> Result<Account, sqlx::Error> {
    Ok(Account {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password")?,
        created_at: row.try_get("created_at")?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountError> {
        let query_span = info_span!("db.query", db.system = "postgresql", db.operation = "SELECT");

        let row = sqlx::query("SELECT id, email, password, created_at FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(query_span)
            .await
            .map_err(|e| {
                error!("Error looking up user: {:?}", e);
                AccountError::Store(e.to_string())
            })?;

        row.as_ref()
            .map(account_from_row)
            .transpose()
            .map_err(|e| {
                error!("Error decoding user row: {:?}", e);
                AccountError::Store(e.to_string())
            })
    }

    #[instrument(skip(self, password_hash))]
    async fn create(&self, email: &str, password_hash: &str) -> Result<Account, AccountError> {
        let query_span = info_span!("db.query", db.system = "postgresql", db.operation = "INSERT");

        let row = sqlx::query(
            "INSERT INTO users (id, email, password) VALUES ($1, $2, $3) \
             RETURNING id, email, password, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .instrument(query_span)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return AccountError::EmailInUse;
            }
            error!("Error inserting user: {:?}", e);
            AccountError::Store(e.to_string())
        })?;

        account_from_row(&row).map_err(|e| {
            error!("Error decoding user row: {:?}", e);
            AccountError::Store(e.to_string())
        })
    }

    async fn ping(&self) -> Result<(), AccountError> {
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self
            .pool
            .acquire()
            .instrument(acquire_span)
            .await
            .map_err(|e| {
                error!("Failed to acquire database connection: {}", e);
                AccountError::Store(e.to_string())
            })?;

        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping().instrument(ping_span).await.map_err(|e| {
            error!("Failed to ping database: {}", e);
            AccountError::Store(e.to_string())
        })
    }
}
