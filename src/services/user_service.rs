use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use crate::models::User;
use crate::update::FieldUpdateSet;

#[derive(Debug, thiserror::Error)]
pub enum UserStoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("user {0} not found")]
    NotFound(i64),
}

/// Persistence collaborator for panel accounts. Handlers treat every error
/// as opaque; the trait object lets tests substitute a deterministic store.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<User>, UserStoreError>;
    async fn create(&self, user: User) -> Result<(), UserStoreError>;
    async fn update_by_id(&self, id: i64, updates: &FieldUpdateSet)
        -> Result<(), UserStoreError>;
    async fn delete_by_id(&self, id: i64) -> Result<(), UserStoreError>;
    async fn ping(&self) -> Result<(), UserStoreError>;
}

pub struct SqlxUserStore {
    pool: PgPool,
}

impl SqlxUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for SqlxUserStore {
    async fn fetch_all(&self) -> Result<Vec<User>, UserStoreError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, password, role, remark FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn create(&self, user: User) -> Result<(), UserStoreError> {
        sqlx::query("INSERT INTO users (username, password, role, remark) VALUES ($1, $2, $3, $4)")
            .bind(&user.username)
            .bind(&user.password)
            .bind(&user.role)
            .bind(&user.remark)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_by_id(
        &self,
        id: i64,
        updates: &FieldUpdateSet,
    ) -> Result<(), UserStoreError> {
        // An empty set is a no-op update, not an error.
        if updates.is_empty() {
            return Ok(());
        }

        let assignments: Vec<String> = updates
            .iter()
            .enumerate()
            .map(|(position, (field, _))| {
                format!("\"{}\" = ${}", field.replace('"', "\"\""), position + 1)
            })
            .collect();
        let sql = format!(
            "UPDATE users SET {} WHERE id = ${}",
            assignments.join(", "),
            updates.len() + 1
        );

        let mut query = sqlx::query(&sql);
        for (_, value) in updates.iter() {
            query = bind_json_value(query, value);
        }

        let result = query.bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(UserStoreError::NotFound(id));
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), UserStoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(UserStoreError::NotFound(id));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), UserStoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

type PgQuery<'q> = sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>;

/// Binds one materialized field value by its JSON type. Arrays and objects
/// fall back to a jsonb bind.
fn bind_json_value<'q>(query: PgQuery<'q>, value: &'q Value) -> PgQuery<'q> {
    match value {
        Value::Null => query.bind(Option::<String>::None),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else {
                query.bind(n.as_f64())
            }
        }
        Value::String(s) => query.bind(s.as_str()),
        other => query.bind(other.clone()),
    }
}
