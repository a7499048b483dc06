pub(crate) mod dashboard;
pub(crate) mod editor;
pub(crate) mod toast;

use crate::api::ApiClient;
use crate::cache::QueryCache;
use crate::config::EnvConfig;
use crate::session::{SessionStore, SharedStore};
use leptos::prelude::*;
use std::sync::Arc;

pub(crate) use toast::{Toast, ToastVariant, Toaster};

#[derive(Clone)]
pub(crate) struct AppState {
    /// Shares one session store (localStorage) with the auth context.
    pub api_client: ApiClient,

    /// Notes list and single-note entries.
    pub cache: RwSignal<QueryCache>,

    pub toaster: Toaster,
}

impl AppState {
    pub fn new(config: &EnvConfig) -> Self {
        let session = SessionStore::new(default_store());
        Self {
            api_client: ApiClient::new(config.api_url.clone(), session),
            cache: RwSignal::new(QueryCache::default()),
            toaster: Toaster::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&EnvConfig::new())
    }
}

#[cfg(target_arch = "wasm32")]
fn default_store() -> SharedStore {
    Arc::new(crate::storage::LocalStorage)
}

// No browser storage off wasm; the session lives for the process.
#[cfg(not(target_arch = "wasm32"))]
fn default_store() -> SharedStore {
    Arc::new(crate::storage::MemoryStorage::default())
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
