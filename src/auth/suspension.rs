use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::auth::{
    error::AccountError,
    repo::{AccountStore, SuspensionTx},
    repo_types::SuspendedUser,
};

/// Moves a user from `users` to `suspended_users` as one unit of work.
///
/// After `suspend` returns, the user is in exactly one of the two tables (or
/// in neither if it never existed). Any failure before commit rolls the
/// transaction back.
pub struct SuspensionCoordinator {
    store: Arc<dyn AccountStore>,
}

impl SuspensionCoordinator {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn suspend(&self, user_id: i64) -> Result<SuspendedUser, AccountError> {
        let mut tx = self.store.begin_suspension().await.map_err(|e| {
            error!(error = %e, "begin suspension transaction failed");
            AccountError::from(e)
        })?;

        let snapshot = match tx.copy_to_suspended(user_id).await {
            Ok(Some(row)) => row,
            Ok(None) => {
                abort(tx).await;
                warn!("suspend unknown user");
                return Err(AccountError::NotFound);
            }
            Err(e) => {
                error!(error = %e, "copy to suspended_users failed");
                abort(tx).await;
                return Err(e.into());
            }
        };

        match tx.delete_user(user_id).await {
            Ok(0) => {
                // another suspension of this id committed after our copy read it
                abort(tx).await;
                warn!("user removed concurrently");
                return Err(AccountError::NotFound);
            }
            Ok(_) => {}
            Err(e) => {
                error!(error = %e, "delete from users failed");
                abort(tx).await;
                return Err(e.into());
            }
        }

        if let Err(e) = tx.commit().await {
            error!(error = %e, "commit suspension failed");
            return Err(e.into());
        }

        info!(suspended_id = snapshot.id, email = %snapshot.email, "account suspended");
        Ok(snapshot)
    }
}

/// Roll back and keep going; the caller reports the error that caused this.
async fn abort(tx: Box<dyn SuspensionTx>) {
    if let Err(e) = tx.rollback().await {
        error!(error = %e, "rollback failed");
    }
}
