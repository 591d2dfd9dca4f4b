//! In-process `AccountStore` used by tests and local runs without Postgres.
//!
//! Mirrors the guarantees the Postgres schema gives: `email` is unique in
//! `users`, and a suspension transaction is isolated and all-or-nothing. Faults
//! can be armed per operation to exercise failure paths.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::auth::repo::{AccountStore, SuspensionTx};
use crate::auth::repo_types::{NewUser, SuspendedUser, User};
use crate::store::{StoreError, StoreResult};

/// Operation at which an injected failure fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    FindUser,
    InsertUser,
    CopyToSuspended,
    DeleteUser,
    Commit,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    suspended: Vec<SuspendedUser>,
    last_user_id: i64,
    last_suspended_id: i64,
}

#[derive(Debug, Default)]
struct Faults {
    armed: StdMutex<HashSet<FailPoint>>,
    blind_lookups: AtomicBool,
}

impl Faults {
    fn check(&self, point: FailPoint) -> StoreResult<()> {
        let armed = self.armed.lock().unwrap_or_else(|p| p.into_inner());
        if armed.contains(&point) {
            return Err(StoreError::Backend(format!("injected failure at {point:?}")));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryAccountStore {
    tables: Arc<Mutex<Tables>>,
    faults: Arc<Faults>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call at `point` fail until cleared.
    pub fn fail_on(&self, point: FailPoint) {
        self.faults
            .armed
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(point);
    }

    pub fn clear_faults(&self) {
        self.faults
            .armed
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clear();
        self.faults.blind_lookups.store(false, Ordering::SeqCst);
    }

    /// When set, `find_by_email` reports no match even if the row exists, as if
    /// a concurrent registration had not become visible yet.
    pub fn set_blind_lookups(&self, blind: bool) {
        self.faults.blind_lookups.store(blind, Ordering::SeqCst);
    }

    pub async fn users(&self) -> Vec<User> {
        self.tables.lock().await.users.values().cloned().collect()
    }

    pub async fn suspended_users(&self) -> Vec<SuspendedUser> {
        self.tables.lock().await.suspended.clone()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.faults.check(FailPoint::FindUser)?;
        if self.faults.blind_lookups.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let tables = self.tables.lock().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: &NewUser<'_>) -> StoreResult<User> {
        self.faults.check(FailPoint::InsertUser)?;
        let mut tables = self.tables.lock().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation("users_email_key".into()));
        }
        tables.last_user_id += 1;
        let row = User {
            id: tables.last_user_id,
            email: user.email.to_string(),
            password: user.password.to_string(),
            name: user.name.to_string(),
            role: user.role.to_string(),
        };
        tables.users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn begin_suspension(&self) -> StoreResult<Box<dyn SuspensionTx>> {
        let guard = self.tables.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemorySuspensionTx {
            guard,
            staged,
            faults: self.faults.clone(),
        }))
    }
}

/// Holds the table lock for its whole lifetime and works on a staged copy that
/// replaces the live tables only on commit.
struct MemorySuspensionTx {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
    faults: Arc<Faults>,
}

#[async_trait]
impl SuspensionTx for MemorySuspensionTx {
    async fn copy_to_suspended(&mut self, user_id: i64) -> StoreResult<Option<SuspendedUser>> {
        self.faults.check(FailPoint::CopyToSuspended)?;
        let Some(user) = self.staged.users.get(&user_id).cloned() else {
            return Ok(None);
        };
        self.staged.last_suspended_id += 1;
        let row = SuspendedUser::from_user(
            self.staged.last_suspended_id,
            &user,
            OffsetDateTime::now_utc(),
        );
        self.staged.suspended.push(row.clone());
        Ok(Some(row))
    }

    async fn delete_user(&mut self, user_id: i64) -> StoreResult<u64> {
        self.faults.check(FailPoint::DeleteUser)?;
        Ok(self.staged.users.remove(&user_id).map_or(0, |_| 1))
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.faults.check(FailPoint::Commit)?;
        let MemorySuspensionTx {
            mut guard, staged, ..
        } = *self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        Ok(())
    }
}
