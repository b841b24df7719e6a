//! Registry: service identifier -> URL creator. Dispatches resolution by service name.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::service_discovery::{Resolution, ServiceDiscovery, ServiceParams, ServiceUrlCreator};
use crate::CoreError;

/// Maps a service identifier (e.g. `WEBHDFS`) to the creator that builds its URLs.
#[derive(Clone, Default)]
pub struct UrlCreatorRegistry {
    creators: HashMap<String, Arc<dyn ServiceUrlCreator>>,
}

impl UrlCreatorRegistry {
    pub fn new() -> Self {
        Self {
            creators: HashMap::new(),
        }
    }

    /// Register under `creator.service()`. One creator per service.
    pub fn register(&mut self, creator: impl ServiceUrlCreator + 'static) -> Result<(), CoreError> {
        self.register_shared(Arc::new(creator))
    }

    pub fn register_shared(&mut self, creator: Arc<dyn ServiceUrlCreator>) -> Result<(), CoreError> {
        let service = creator.service().to_string();
        if self.creators.contains_key(&service) {
            return Err(CoreError::DuplicateService(service));
        }
        self.creators.insert(service, creator);
        Ok(())
    }

    /// Move every creator of `other` into this registry. All or nothing: on a collision
    /// nothing is inserted.
    pub fn merge(&mut self, other: UrlCreatorRegistry) -> Result<(), CoreError> {
        if let Some(service) = other
            .services()
            .into_iter()
            .find(|service| self.creators.contains_key(service))
        {
            return Err(CoreError::DuplicateService(service));
        }
        self.creators.extend(other.creators);
        Ok(())
    }

    pub fn get(&self, service: &str) -> Option<&Arc<dyn ServiceUrlCreator>> {
        self.creators.get(service)
    }

    /// Registered service identifiers, sorted.
    pub fn services(&self) -> Vec<String> {
        let mut names: Vec<String> = self.creators.keys().cloned().collect();
        names.sort();
        names
    }

    /// Resolve with the creator registered for `service`; empty when there is none.
    pub fn resolve_with(&self, service: &str, params: Option<&ServiceParams>) -> Resolution {
        match self.creators.get(service) {
            Some(creator) => creator.resolve(service, params),
            None => {
                tracing::debug!(service, "no URL creator registered");
                Resolution::empty()
            }
        }
    }
}

impl fmt::Debug for UrlCreatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlCreatorRegistry")
            .field("services", &self.services())
            .finish()
    }
}

impl ServiceDiscovery for UrlCreatorRegistry {
    fn resolve(&self, service_name: &str) -> Vec<String> {
        self.resolve_with(service_name, None).urls
    }
}
