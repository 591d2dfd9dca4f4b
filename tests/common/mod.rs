#![allow(dead_code)]

use std::sync::Arc;

use design_forge::{
    auth::{
        memory::MemoryAccountStore, password::CredentialHasher, services::CredentialManager,
        services::Registration, suspension::SuspensionCoordinator,
    },
    config::HashingConfig,
    sales::memory::MemorySalesStore,
    state::AppState,
};

/// Cheap Argon2 cost so tests do not spend seconds per hash.
pub fn test_hashing() -> HashingConfig {
    HashingConfig {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    }
}

pub struct Accounts {
    pub store: MemoryAccountStore,
    pub credentials: CredentialManager,
    pub suspensions: SuspensionCoordinator,
}

pub fn accounts() -> Accounts {
    let store = MemoryAccountStore::new();
    let hasher = CredentialHasher::new(&test_hashing()).unwrap();
    Accounts {
        credentials: CredentialManager::new(Arc::new(store.clone()), hasher),
        suspensions: SuspensionCoordinator::new(Arc::new(store.clone())),
        store,
    }
}

pub fn registration(email: &str, password: &str) -> Registration {
    Registration {
        email: email.to_string(),
        password: password.to_string(),
        name: "Ana Torres".to_string(),
        role: "client".to_string(),
    }
}

pub struct TestApp {
    pub state: AppState,
    pub accounts: MemoryAccountStore,
    pub sales: MemorySalesStore,
}

pub fn test_app() -> TestApp {
    let accounts = MemoryAccountStore::new();
    let sales = MemorySalesStore::new();
    let state = AppState::from_stores(
        Arc::new(accounts.clone()),
        Arc::new(sales.clone()),
        &test_hashing(),
    )
    .unwrap();
    TestApp {
        state,
        accounts,
        sales,
    }
}
