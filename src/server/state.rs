use axum::extract::FromRef;

use crate::catalog_store::CatalogStore;
use crate::user::AuthGate;
use std::sync::Arc;

pub type GuardedCatalogStore = Arc<dyn CatalogStore>;

#[derive(Clone)]
pub struct ServerState {
    pub catalog_store: GuardedCatalogStore,
    pub auth_gate: AuthGate,
}

impl ServerState {
    pub fn new(catalog_store: GuardedCatalogStore, auth_gate: AuthGate) -> ServerState {
        ServerState {
            catalog_store,
            auth_gate,
        }
    }
}

impl FromRef<ServerState> for GuardedCatalogStore {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog_store.clone()
    }
}

impl FromRef<ServerState> for AuthGate {
    fn from_ref(input: &ServerState) -> Self {
        input.auth_gate.clone()
    }
}
