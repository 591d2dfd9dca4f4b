use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::sales::repo::SalesStore;
use crate::sales::repo_types::{NewOrder, NewQuotation, Order, Quotation};
use crate::store::{StoreError, StoreResult};

#[derive(Debug, Default)]
struct Ledger {
    quotations: Vec<Quotation>,
    orders: Vec<Order>,
}

/// In-process `SalesStore`; `set_unavailable` makes every call fail.
#[derive(Debug, Clone, Default)]
pub struct MemorySalesStore {
    ledger: Arc<Mutex<Ledger>>,
    unavailable: Arc<AtomicBool>,
}

impl MemorySalesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("sales store unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl SalesStore for MemorySalesStore {
    async fn insert_quotation(&self, quotation: &NewQuotation) -> StoreResult<Quotation> {
        self.check()?;
        let mut ledger = self.ledger.lock().await;
        let row = Quotation {
            id: ledger.quotations.len() as i64 + 1,
            user_id: quotation.user_id,
            client_name: quotation.client_name.clone(),
            material: quotation.material.clone(),
            product: quotation.product.clone(),
            quantity: quotation.quantity,
            created_at: OffsetDateTime::now_utc(),
        };
        ledger.quotations.push(row.clone());
        Ok(row)
    }

    async fn quotations_for_user(&self, user_id: i64) -> StoreResult<Vec<Quotation>> {
        self.check()?;
        let ledger = self.ledger.lock().await;
        Ok(ledger
            .quotations
            .iter()
            .filter(|q| q.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_order(&self, order: &NewOrder) -> StoreResult<Order> {
        self.check()?;
        let mut ledger = self.ledger.lock().await;
        let row = Order {
            id: ledger.orders.len() as i64 + 1,
            user_id: order.user_id,
            product: order.product.clone(),
            price: order.price,
            quantity: order.quantity,
            created_at: OffsetDateTime::now_utc(),
        };
        ledger.orders.push(row.clone());
        Ok(row)
    }

    async fn orders_for_user(&self, user_id: i64) -> StoreResult<Vec<Order>> {
        self.check()?;
        let ledger = self.ledger.lock().await;
        Ok(ledger
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }
}
