//! HDFS discovery facade: DiscoveryModule wiring, logging setup; the CLI lives in `bin/`.

pub mod discovery;
pub mod logging;
pub mod module;

pub use discovery::DiscoveryModule;
pub use logging::{init_logging, LogFormat, LoggingError};
pub use module::Module;

pub use hdfs_discovery_core::webhdfs::NAMESERVICE_PARAM;
pub use hdfs_discovery_core::{
    http, ClusterConfiguration, ClusterSnapshot, CollectingSink, Component, CoreError, Diagnostic,
    DiagnosticSink, NoopSink, Resolution, ServiceConfiguration, ServiceDiscovery, ServiceParams,
    ServiceUrlCreator, TracingSink, UrlCreatorRegistry, WebHdfsUrlCreator,
};
