use serde::Deserialize;

use crate::sales::repo_types::{NewOrder, NewQuotation};

/// Request body for `POST /api/quotations`.
#[derive(Debug, Deserialize)]
pub struct CreateQuotationRequest {
    pub user_id: i64,
    #[serde(rename = "clientName")]
    pub client_name: String,
    pub material: String,
    pub product: String,
    pub quantity: i32,
}

impl From<CreateQuotationRequest> for NewQuotation {
    fn from(r: CreateQuotationRequest) -> Self {
        Self {
            user_id: r.user_id,
            client_name: r.client_name,
            material: r.material,
            product: r.product,
            quantity: r.quantity,
        }
    }
}

/// Request body for `POST /api/orders`.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: i64,
    pub product: String,
    pub price: f64,
    pub quantity: i32,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(r: CreateOrderRequest) -> Self {
        Self {
            user_id: r.user_id,
            product: r.product,
            price: r.price,
            quantity: r.quantity,
        }
    }
}
