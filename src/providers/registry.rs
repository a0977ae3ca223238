//! Registry of configured provider clients

use super::client::ProviderClient;
use crate::results::ProviderName;
use std::sync::Arc;

/// Provider clients in merge priority order
pub struct ProviderRegistry {
    clients: Vec<Arc<dyn ProviderClient>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            clients: Vec::new(),
        }
    }

    /// Register a client, keeping priority order. A client registered under
    /// an existing name replaces the previous one.
    pub fn register(&mut self, client: Arc<dyn ProviderClient>) {
        let name = client.name();
        self.clients.retain(|c| c.name() != name);
        self.clients.push(client);
        self.clients.sort_by_key(|c| c.name().priority());
    }

    pub fn get(&self, name: ProviderName) -> Option<&Arc<dyn ProviderClient>> {
        self.clients.iter().find(|c| c.name() == name)
    }

    /// All clients, highest priority first
    pub fn clients(&self) -> &[Arc<dyn ProviderClient>] {
        &self.clients
    }

    pub fn names(&self) -> Vec<ProviderName> {
        self.clients.iter().map(|c| c.name()).collect()
    }

    pub fn contains(&self, name: ProviderName) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
