//! Module: register URL creators into a registry.

use hdfs_discovery_core::{CoreError, UrlCreatorRegistry};

/// Something that contributes URL creators to a registry.
pub trait Module {
    fn register_into(&mut self, registry: &mut UrlCreatorRegistry) -> Result<(), CoreError>;
}
