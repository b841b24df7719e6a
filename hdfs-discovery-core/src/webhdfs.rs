//! WEBHDFS URL creator: NameNode HTTP endpoints from HDFS configuration, HA or single-node.

use std::sync::Arc;

use crate::cluster::{ClusterConfiguration, ServiceConfiguration};
use crate::diagnostics::{Diagnostic, DiagnosticSink, NoopSink};
use crate::service_discovery::{Resolution, ServiceParams, ServiceUrlCreator};

pub const SERVICE: &str = "WEBHDFS";

/// Parameter naming the nameservice to use when several are configured.
pub const NAMESERVICE_PARAM: &str = "discovery-nameservice";

const HDFS: &str = "HDFS";
const HDFS_SITE: &str = "hdfs-site";
const CORE_SITE: &str = "core-site";
const NAMENODE: &str = "NAMENODE";

const NAMESERVICES: &str = "dfs.nameservices";
const DEFAULT_FS: &str = "fs.defaultFS";
const HA_NAMENODES: &str = "dfs.ha.namenodes";
const HTTP_ADDRESS: &str = "dfs.namenode.http-address";

/// Resolves `WEBHDFS` to `http://<namenode-http-address>/webhdfs` URLs.
///
/// HA is detected from the `NAMENODE` component's `dfs.nameservices`. Nodes of the selected
/// nameservice come from `dfs.ha.namenodes.<ns>` when present, otherwise from the indexed
/// `dfs.namenode.http-address.<ns>.nn<i>` properties.
pub struct WebHdfsUrlCreator {
    cluster: Arc<dyn ClusterConfiguration>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl WebHdfsUrlCreator {
    /// Creator reporting diagnostics nowhere (they still land in [`Resolution::warnings`]).
    pub fn new(cluster: Arc<dyn ClusterConfiguration>) -> Self {
        Self {
            cluster,
            diagnostics: Arc::new(NoopSink),
        }
    }

    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    fn report(&self, resolution: &mut Resolution, diagnostic: Diagnostic) {
        self.diagnostics.report(&diagnostic);
        resolution.warnings.push(diagnostic);
    }

    /// Explicit parameter, then `fs.defaultFS`, then the first candidate.
    /// The parameter and `fs.defaultFS` only count when there is more than one candidate.
    fn select_nameservice(
        &self,
        hdfs_site: &ServiceConfiguration,
        candidates: &[&str],
        params: Option<&ServiceParams>,
        resolution: &mut Resolution,
    ) -> Option<String> {
        let mut selected = None;
        if candidates.len() > 1 {
            if let Some(declared) = params.and_then(|p| p.get(NAMESERVICE_PARAM)) {
                if !is_declared_nameservice(hdfs_site, declared) {
                    self.report(
                        resolution,
                        Diagnostic::UndefinedNameService {
                            nameservice: declared.clone(),
                        },
                    );
                }
                selected = Some(declared.clone());
            } else {
                selected = self.default_fs_nameservice();
            }
        }
        selected.or_else(|| candidates.first().map(|ns| (*ns).to_string()))
    }

    /// `hdfs://ns1` -> `ns1`. Everything after the last `/`, even when that is empty.
    fn default_fs_nameservice(&self) -> Option<String> {
        let default_fs = self
            .cluster
            .service_configuration(HDFS, CORE_SITE)?
            .property(DEFAULT_FS)?;
        let ns = default_fs.rsplit('/').next().unwrap_or(default_fs);
        Some(ns.to_string())
    }
}

impl ServiceUrlCreator for WebHdfsUrlCreator {
    fn service(&self) -> &str {
        SERVICE
    }

    fn resolve(&self, service: &str, params: Option<&ServiceParams>) -> Resolution {
        let mut resolution = Resolution::empty();
        if service != SERVICE {
            return resolution;
        }
        let Some(hdfs_site) = self.cluster.service_configuration(HDFS, HDFS_SITE) else {
            return resolution;
        };

        let nameservices = self
            .cluster
            .component(NAMENODE)
            .and_then(|nn| nn.config_property(NAMESERVICES))
            .filter(|value| !value.is_empty());

        let Some(nameservices) = nameservices else {
            if let Some(address) = hdfs_site.property(HTTP_ADDRESS) {
                resolution.urls.push(create_url(address));
            }
            tracing::debug!(urls = resolution.urls.len(), "resolved single NameNode configuration");
            return resolution;
        };

        let candidates = split_list(nameservices);
        let Some(ns) = self.select_nameservice(hdfs_site, &candidates, params, &mut resolution)
        else {
            return resolution;
        };

        if let Some(nodes) = hdfs_site.property(&format!("{}.{}", HA_NAMENODES, ns)) {
            for node in split_list(nodes) {
                if let Some(address) = ha_http_address(hdfs_site, &ns, node) {
                    resolution.urls.push(create_url(address));
                }
            }
        } else {
            // No node list: nn1, nn2, ... until the first missing index.
            let mut index = 1;
            while let Some(address) = ha_http_address(hdfs_site, &ns, &format!("nn{}", index)) {
                resolution.urls.push(create_url(address));
                index += 1;
            }
        }
        tracing::debug!(
            nameservice = %ns,
            urls = resolution.urls.len(),
            "resolved HA NameNode configuration"
        );
        resolution
    }
}

/// Whether `declared` is listed in the `dfs.nameservices` of `hdfs-site` itself.
fn is_declared_nameservice(hdfs_site: &ServiceConfiguration, declared: &str) -> bool {
    hdfs_site
        .property(NAMESERVICES)
        .map(|value| split_list(value).contains(&declared))
        .unwrap_or(false)
}

fn ha_http_address<'a>(hdfs_site: &'a ServiceConfiguration, ns: &str, node: &str) -> Option<&'a str> {
    hdfs_site.property(&format!("{}.{}.{}", HTTP_ADDRESS, ns, node))
}

/// Split on `,` without trimming. Trailing empty items are dropped, inner ones kept.
pub fn split_list(value: &str) -> Vec<&str> {
    let mut items: Vec<&str> = value.split(',').collect();
    while items.last().is_some_and(|item| item.is_empty()) {
        items.pop();
    }
    items
}

/// `host:port` -> `http://host:port/webhdfs`. The address is not validated.
pub fn create_url(address: &str) -> String {
    format!("http://{}/webhdfs", address)
}
