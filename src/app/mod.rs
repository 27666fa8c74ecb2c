pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;

use crate::core::accounts::AccountService;
use crate::core::network::NetworkService;
use crate::core::password::PasswordPolicy;
use crate::core::Storage;
use crate::utils::error::Result;
use std::sync::Arc;

/// Services shared by every request handler.
pub struct AppState<S: Storage> {
    pub network: NetworkService<S>,
    pub accounts: AccountService<S>,
}

pub type SharedState<S> = Arc<AppState<S>>;

impl<S: Storage> AppState<S> {
    /// Loads both snapshots from `storage`.
    pub async fn open(storage: S, policy: PasswordPolicy) -> Result<SharedState<S>> {
        let network = NetworkService::open(storage.clone()).await?;
        let accounts = AccountService::open(storage, policy).await?;
        Ok(Arc::new(Self { network, accounts }))
    }
}
