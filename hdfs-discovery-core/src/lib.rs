//! HDFS discovery core: cluster configuration model, WebHDFS URL resolution, registry, HTTP lookup.

pub mod cluster;
pub mod diagnostics;
pub mod http;
pub mod registry;
pub mod service_discovery;
pub mod webhdfs;

pub use cluster::{ClusterConfiguration, ClusterSnapshot, Component, ServiceConfiguration};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, NoopSink, TracingSink};
pub use registry::UrlCreatorRegistry;
pub use service_discovery::{Resolution, ServiceDiscovery, ServiceParams, ServiceUrlCreator};
pub use webhdfs::WebHdfsUrlCreator;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("URL creator already registered for service {0:?}")]
    DuplicateService(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
