use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

/// Ledger entry tied one-to-one with a user. Created once at signup;
/// no balance mutation operations are in scope.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub user_id: Uuid,
    pub balance: f64,
    pub created_at: OffsetDateTime,
}

/// Uniform random starting balance in [1, 10001).
pub fn random_starting_balance() -> f64 {
    rand::thread_rng().gen_range(1.0..10001.0)
}

impl Account {
    pub async fn provision(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        balance: f64,
    ) -> sqlx::Result<Account> {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (user_id, balance)
            VALUES ($1, $2)
            RETURNING user_id, balance, created_at
            "#,
        )
        .bind(user_id)
        .bind(balance)
        .fetch_one(&mut **tx)
        .await
    }
}
