pub mod compose;
pub mod config;
pub mod errors;
pub mod metrics_defs;
pub mod record;
pub mod resolver;
pub mod service;
pub mod store;

mod http;

#[cfg(test)]
pub(crate) mod testutils;

use crate::service::VanityService;
use crate::store::{HttpKeyStore, KeyStore};
use std::sync::Arc;

/// Builds the HTTP store client from the config and serves requests until
/// the listener fails.
pub async fn run(config: config::Config) -> Result<(), errors::VanityError> {
    let store: Arc<dyn KeyStore> = Arc::new(HttpKeyStore::new(
        &config.store.url,
        config.store.timeout(),
    ));
    let service = VanityService::new(store, &config.docs_host);

    http::serve(&config.listener, service).await
}
