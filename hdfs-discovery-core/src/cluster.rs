//! Cluster configuration model: per-service config sections and per-component properties.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::CoreError;

/// Read-only view of a cluster's configuration. Implementations: [`ClusterSnapshot`], or an adapter
/// over a live management API. Must not change while a resolution is running.
pub trait ClusterConfiguration: Send + Sync {
    /// Configuration section `config_type` (e.g. `hdfs-site`) of `service` (e.g. `HDFS`).
    fn service_configuration(&self, service: &str, config_type: &str) -> Option<&ServiceConfiguration>;

    /// Component by type name (e.g. `NAMENODE`).
    fn component(&self, name: &str) -> Option<&Component>;
}

/// One configuration section: type, optional tag and the key/value properties.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfiguration {
    #[serde(default, rename = "type")]
    pub config_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl ServiceConfiguration {
    /// Build from a slice of (key, value) pairs.
    pub fn from_slice(config_type: &str, pairs: &[(&str, &str)]) -> Self {
        Self {
            config_type: config_type.to_string(),
            tag: None,
            properties: pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// A deployed component (e.g. the NameNode) with its hosts and its own configuration properties.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl Component {
    pub fn new(name: &str, service: &str) -> Self {
        Self {
            name: name.to_string(),
            service: service.to_string(),
            ..Self::default()
        }
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.hosts.push(host.to_string());
        self
    }

    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_string(), value.to_string());
        self
    }

    /// Property scoped to this component.
    pub fn config_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// In-memory cluster configuration, loadable from JSON:
///
/// ```json
/// {
///   "name": "Sandbox",
///   "services": { "HDFS": { "hdfs-site": { "properties": { "dfs.namenode.http-address": "h1:50070" } } } },
///   "components": { "NAMENODE": { "service": "HDFS", "hosts": ["h1"], "properties": {} } }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    #[serde(default)]
    pub name: String,
    /// service name -> config type -> section.
    #[serde(default)]
    pub services: HashMap<String, HashMap<String, ServiceConfiguration>>,
    /// component name -> component.
    #[serde(default)]
    pub components: HashMap<String, Component>,
}

impl ClusterSnapshot {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Parse a snapshot. Section types and component names missing from the document are
    /// filled in from their map keys.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let mut snapshot: ClusterSnapshot = serde_json::from_str(json)?;
        for sections in snapshot.services.values_mut() {
            for (config_type, section) in sections.iter_mut() {
                if section.config_type.is_empty() {
                    section.config_type = config_type.clone();
                }
            }
        }
        for (name, component) in snapshot.components.iter_mut() {
            if component.name.is_empty() {
                component.name = name.clone();
            }
        }
        Ok(snapshot)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Add (or replace) a section of `service`. The section is keyed by its `config_type`.
    pub fn with_service_configuration(mut self, service: &str, section: ServiceConfiguration) -> Self {
        self.services
            .entry(service.to_string())
            .or_default()
            .insert(section.config_type.clone(), section);
        self
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.components.insert(component.name.clone(), component);
        self
    }
}

impl ClusterConfiguration for ClusterSnapshot {
    fn service_configuration(&self, service: &str, config_type: &str) -> Option<&ServiceConfiguration> {
        self.services.get(service)?.get(config_type)
    }

    fn component(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }
}
