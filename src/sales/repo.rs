use async_trait::async_trait;
use sqlx::PgPool;

use crate::sales::repo_types::{NewOrder, NewQuotation, Order, Quotation};
use crate::store::StoreResult;

/// Plain single-table access to `quotations` and `orders`.
#[async_trait]
pub trait SalesStore: Send + Sync {
    async fn insert_quotation(&self, quotation: &NewQuotation) -> StoreResult<Quotation>;
    async fn quotations_for_user(&self, user_id: i64) -> StoreResult<Vec<Quotation>>;
    async fn insert_order(&self, order: &NewOrder) -> StoreResult<Order>;
    async fn orders_for_user(&self, user_id: i64) -> StoreResult<Vec<Order>>;
}

#[derive(Clone)]
pub struct PgSalesStore {
    db: PgPool,
}

impl PgSalesStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SalesStore for PgSalesStore {
    async fn insert_quotation(&self, quotation: &NewQuotation) -> StoreResult<Quotation> {
        let row = sqlx::query_as::<_, Quotation>(
            r#"
            INSERT INTO quotations (user_id, client_name, material, product, quantity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, client_name, material, product, quantity, created_at
            "#,
        )
        .bind(quotation.user_id)
        .bind(&quotation.client_name)
        .bind(&quotation.material)
        .bind(&quotation.product)
        .bind(quotation.quantity)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn quotations_for_user(&self, user_id: i64) -> StoreResult<Vec<Quotation>> {
        let rows = sqlx::query_as::<_, Quotation>(
            r#"
            SELECT id, user_id, client_name, material, product, quantity, created_at
              FROM quotations
             WHERE user_id = $1
             ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn insert_order(&self, order: &NewOrder) -> StoreResult<Order> {
        let row = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (user_id, product, price, quantity)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, product, price, quantity, created_at
            "#,
        )
        .bind(order.user_id)
        .bind(&order.product)
        .bind(order.price)
        .bind(order.quantity)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn orders_for_user(&self, user_id: i64) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, product, price, quantity, created_at
              FROM orders
             WHERE user_id = $1
             ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
