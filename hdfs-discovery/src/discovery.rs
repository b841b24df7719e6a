//! Discovery: DiscoveryModule wires a cluster configuration and a diagnostic sink into URL creators.

use std::path::PathBuf;
use std::sync::Arc;

use hdfs_discovery_core::{
    ClusterConfiguration, ClusterSnapshot, CoreError, DiagnosticSink, ServiceUrlCreator,
    TracingSink, UrlCreatorRegistry, WebHdfsUrlCreator,
};

use crate::module::Module;

/// Discovery for one cluster. Registers `WEBHDFS` plus any custom creators.
/// Diagnostics are logged through `tracing` unless another sink is set.
pub struct DiscoveryModule {
    cluster: Option<Arc<dyn ClusterConfiguration>>,
    snapshot_path: Option<PathBuf>,
    diagnostics: Arc<dyn DiagnosticSink>,
    creators: Vec<Arc<dyn ServiceUrlCreator>>,
}

impl DiscoveryModule {
    pub fn new() -> Self {
        Self {
            cluster: None,
            snapshot_path: None,
            diagnostics: Arc::new(TracingSink),
            creators: Vec::new(),
        }
    }

    /// Cluster configuration to resolve against.
    pub fn cluster(mut self, cluster: impl ClusterConfiguration + 'static) -> Self {
        self.cluster = Some(Arc::new(cluster));
        self
    }

    /// Cluster configuration already shared with other owners.
    pub fn shared_cluster(mut self, cluster: Arc<dyn ClusterConfiguration>) -> Self {
        self.cluster = Some(cluster);
        self
    }

    /// Load a JSON cluster snapshot at registration time. Ignored when `cluster` is set.
    pub fn snapshot_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    pub fn diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    /// Extra creator for another service.
    pub fn creator(mut self, creator: impl ServiceUrlCreator + 'static) -> Self {
        self.creators.push(Arc::new(creator));
        self
    }

    /// Fresh registry with this module registered.
    pub fn build(mut self) -> Result<UrlCreatorRegistry, CoreError> {
        let mut registry = UrlCreatorRegistry::new();
        self.register_into(&mut registry)?;
        Ok(registry)
    }

    /// The configured cluster, or the snapshot file loaded now.
    fn load_cluster(&self) -> Result<Arc<dyn ClusterConfiguration>, CoreError> {
        if let Some(cluster) = &self.cluster {
            return Ok(Arc::clone(cluster));
        }
        let path = self
            .snapshot_path
            .as_ref()
            .ok_or_else(|| CoreError::Config("no cluster configuration or snapshot file".into()))?;
        let snapshot = ClusterSnapshot::from_path(path)?;
        tracing::debug!(path = %path.display(), cluster = %snapshot.name, "loaded cluster snapshot");
        Ok(Arc::new(snapshot))
    }
}

impl Default for DiscoveryModule {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for DiscoveryModule {
    fn register_into(&mut self, registry: &mut UrlCreatorRegistry) -> Result<(), CoreError> {
        // Collisions (among our creators or with the target) leave `registry` untouched.
        let mut module = UrlCreatorRegistry::new();
        let webhdfs = WebHdfsUrlCreator::new(self.load_cluster()?)
            .with_diagnostics(Arc::clone(&self.diagnostics));
        module.register(webhdfs)?;
        for creator in &self.creators {
            module.register_shared(Arc::clone(creator))?;
        }
        registry.merge(module)?;
        tracing::debug!(services = ?registry.services(), "discovery module registered");
        Ok(())
    }
}
