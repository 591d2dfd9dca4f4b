use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::auth::repo_types::{NewUser, SuspendedUser, User};
use crate::store::StoreResult;

/// Access to the `users` and `suspended_users` tables.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Insert a user. A taken email surfaces as `StoreError::UniqueViolation`.
    async fn insert_user(&self, user: &NewUser<'_>) -> StoreResult<User>;

    /// Open the transaction a suspension runs in.
    async fn begin_suspension(&self) -> StoreResult<Box<dyn SuspensionTx>>;
}

/// One open transaction spanning the copy and delete of a suspension.
///
/// Dropping the value without calling `commit` discards every change made
/// through it.
#[async_trait]
pub trait SuspensionTx: Send {
    /// Copy the `users` row into `suspended_users` in one statement.
    /// Returns `None` when no row matched `user_id`.
    async fn copy_to_suspended(&mut self, user_id: i64) -> StoreResult<Option<SuspendedUser>>;

    /// Delete the `users` row, returning the number of rows removed.
    async fn delete_user(&mut self, user_id: i64) -> StoreResult<u64>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;

    async fn rollback(self: Box<Self>) -> StoreResult<()>;
}

#[derive(Clone)]
pub struct PgAccountStore {
    db: PgPool,
}

impl PgAccountStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password, name, role
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: &NewUser<'_>) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password, name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password, name, role
            "#,
        )
        .bind(user.email)
        .bind(user.password)
        .bind(user.name)
        .bind(user.role)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn begin_suspension(&self) -> StoreResult<Box<dyn SuspensionTx>> {
        let tx = self.db.begin().await?;
        Ok(Box::new(PgSuspensionTx { tx }))
    }
}

struct PgSuspensionTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl SuspensionTx for PgSuspensionTx {
    async fn copy_to_suspended(&mut self, user_id: i64) -> StoreResult<Option<SuspendedUser>> {
        let row = sqlx::query_as::<_, SuspendedUser>(
            r#"
            INSERT INTO suspended_users (user_id, email, password, name, role, suspended_at)
            SELECT id, email, password, name, role, NOW()
              FROM users
             WHERE id = $1
            RETURNING id, user_id, email, password, name, role, suspended_at
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn delete_user(&mut self, user_id: i64) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
