use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::sales::{
    repo::SalesStore,
    repo_types::{NewOrder, NewQuotation, Order, Quotation},
};
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum SalesError {
    #[error("{0}")]
    Validation(String),
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
}

fn require(field: &str, value: &str) -> Result<(), SalesError> {
    if value.trim().is_empty() {
        return Err(SalesError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn require_positive(quantity: i32) -> Result<(), SalesError> {
    if quantity <= 0 {
        return Err(SalesError::Validation("quantity must be positive".into()));
    }
    Ok(())
}

/// Record keeping for quotations and orders.
pub struct SalesRecords {
    store: Arc<dyn SalesStore>,
}

impl SalesRecords {
    pub fn new(store: Arc<dyn SalesStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, quotation), fields(user_id = quotation.user_id))]
    pub async fn create_quotation(&self, quotation: NewQuotation) -> Result<Quotation, SalesError> {
        require("clientName", &quotation.client_name)
            .and_then(|_| require("material", &quotation.material))
            .and_then(|_| require("product", &quotation.product))
            .and_then(|_| require_positive(quotation.quantity))
            .inspect_err(|e| warn!(error = %e, "invalid quotation"))?;

        let row = self.store.insert_quotation(&quotation).await.map_err(|e| {
            error!(error = %e, "insert quotation failed");
            SalesError::from(e)
        })?;
        info!(quotation_id = row.id, "quotation saved");
        Ok(row)
    }

    #[instrument(skip(self))]
    pub async fn quotations_for_user(&self, user_id: i64) -> Result<Vec<Quotation>, SalesError> {
        self.store.quotations_for_user(user_id).await.map_err(|e| {
            error!(error = %e, "list quotations failed");
            SalesError::from(e)
        })
    }

    #[instrument(skip(self, order), fields(user_id = order.user_id))]
    pub async fn create_order(&self, order: NewOrder) -> Result<Order, SalesError> {
        require("product", &order.product)
            .and_then(|_| require_positive(order.quantity))
            .inspect_err(|e| warn!(error = %e, "invalid order"))?;
        if !order.price.is_finite() || order.price < 0.0 {
            warn!(price = order.price, "invalid order price");
            return Err(SalesError::Validation("price must be non-negative".into()));
        }

        let row = self.store.insert_order(&order).await.map_err(|e| {
            error!(error = %e, "insert order failed");
            SalesError::from(e)
        })?;
        info!(order_id = row.id, "order saved");
        Ok(row)
    }

    #[instrument(skip(self))]
    pub async fn orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, SalesError> {
        self.store.orders_for_user(user_id).await.map_err(|e| {
            error!(error = %e, "list orders failed");
            SalesError::from(e)
        })
    }
}
