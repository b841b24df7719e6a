//! Service discovery traits: resolve(service_name) -> URLs, and per-service URL creators.

use serde::Serialize;
use std::collections::HashMap;

use crate::diagnostics::Diagnostic;

/// Caller-supplied resolution parameters (e.g. `discovery-nameservice`).
pub type ServiceParams = HashMap<String, String>;

/// How to resolve services by name.
pub trait ServiceDiscovery: Send + Sync {
    /// Return list of URLs for the service.
    fn resolve(&self, service_name: &str) -> Vec<String>;
}

/// URLs produced for one service, plus the diagnostics raised while producing them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub urls: Vec<String>,
    pub warnings: Vec<Diagnostic>,
}

impl Resolution {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Builds the URLs of one service from cluster configuration. Never fails: incomplete
/// configuration yields fewer (or no) URLs.
pub trait ServiceUrlCreator: Send + Sync {
    /// Service identifier this creator answers for (e.g. `WEBHDFS`).
    fn service(&self) -> &str;

    fn resolve(&self, service: &str, params: Option<&ServiceParams>) -> Resolution;

    /// URLs only.
    fn create(&self, service: &str, params: Option<&ServiceParams>) -> Vec<String> {
        self.resolve(service, params).urls
    }
}
