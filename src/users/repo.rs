use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

impl User {
    pub async fn find_by_username(db: &PgPool, username: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, first_name, last_name, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
    }

    /// Insert a new user inside the signup transaction. Surfaces the
    /// store's unique-violation error unchanged so callers can map a
    /// lost signup race to a conflict.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        username: &str,
        first_name: &str,
        last_name: &str,
        password_hash: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, first_name, last_name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, first_name, last_name, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(first_name)
        .bind(last_name)
        .bind(password_hash)
        .fetch_one(&mut **tx)
        .await
    }

    /// Partial update: NULL arguments leave the column unchanged.
    pub async fn update_profile(
        db: &PgPool,
        user_id: Uuid,
        password_hash: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = COALESCE($2, password_hash),
                first_name    = COALESCE($3, first_name),
                last_name     = COALESCE($4, last_name)
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Case-sensitive "contains" match on first or last name; an empty
    /// filter matches everyone.
    pub async fn search(db: &PgPool, filter: &str) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, first_name, last_name, password_hash, created_at
            FROM users
            WHERE first_name LIKE '%' || $1 || '%'
               OR last_name  LIKE '%' || $1 || '%'
            ORDER BY created_at ASC
            "#,
        )
        .bind(filter)
        .fetch_all(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            username: "a@b.com".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
    }
}
