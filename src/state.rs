use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{
    error::AccountError,
    password::CredentialHasher,
    repo::{AccountStore, PgAccountStore},
    services::CredentialManager,
    suspension::SuspensionCoordinator,
};
use crate::config::HashingConfig;
use crate::sales::{
    repo::{PgSalesStore, SalesStore},
    services::SalesRecords,
};

/// Components shared by every request. Storage is injected, never global.
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<CredentialManager>,
    pub suspensions: Arc<SuspensionCoordinator>,
    pub sales: Arc<SalesRecords>,
}

impl AppState {
    pub fn from_pool(db: PgPool, hashing: &HashingConfig) -> Result<Self, AccountError> {
        Self::from_stores(
            Arc::new(PgAccountStore::new(db.clone())),
            Arc::new(PgSalesStore::new(db)),
            hashing,
        )
    }

    pub fn from_stores(
        accounts: Arc<dyn AccountStore>,
        sales: Arc<dyn SalesStore>,
        hashing: &HashingConfig,
    ) -> Result<Self, AccountError> {
        let hasher = CredentialHasher::new(hashing)?;
        Ok(Self {
            credentials: Arc::new(CredentialManager::new(accounts.clone(), hasher)),
            suspensions: Arc::new(SuspensionCoordinator::new(accounts)),
            sales: Arc::new(SalesRecords::new(sales)),
        })
    }
}
