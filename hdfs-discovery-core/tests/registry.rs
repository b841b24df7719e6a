//! Dispatch by service name.

use std::collections::HashMap;
use std::sync::Arc;

use hdfs_discovery_core::{
    ClusterSnapshot, CoreError, Resolution, ServiceConfiguration, ServiceDiscovery, ServiceParams,
    ServiceUrlCreator, UrlCreatorRegistry, WebHdfsUrlCreator,
};

/// Answers with one fixed URL, echoing the parameters it saw as a query string.
struct FixedCreator {
    service: &'static str,
    url: &'static str,
}

impl ServiceUrlCreator for FixedCreator {
    fn service(&self) -> &str {
        self.service
    }

    fn resolve(&self, service: &str, params: Option<&ServiceParams>) -> Resolution {
        let mut url = self.url.to_string();
        if let Some(zone) = params.and_then(|p| p.get("zone")) {
            url.push_str("?zone=");
            url.push_str(zone);
        }
        Resolution {
            urls: if service == self.service { vec![url] } else { Vec::new() },
            warnings: Vec::new(),
        }
    }
}

fn single_namenode() -> Arc<ClusterSnapshot> {
    Arc::new(ClusterSnapshot::new("single").with_service_configuration(
        "HDFS",
        ServiceConfiguration::from_slice("hdfs-site", &[("dfs.namenode.http-address", "host1:50070")]),
    ))
}

#[test]
fn dispatches_to_registered_creator() {
    let mut registry = UrlCreatorRegistry::new();
    registry.register(WebHdfsUrlCreator::new(single_namenode())).unwrap();
    registry
        .register(FixedCreator {
            service: "OOZIE",
            url: "http://oozie:11000/oozie",
        })
        .unwrap();

    assert_eq!(registry.services(), vec!["OOZIE", "WEBHDFS"]);
    assert_eq!(registry.resolve("WEBHDFS"), vec!["http://host1:50070/webhdfs"]);
    assert_eq!(registry.resolve("OOZIE"), vec!["http://oozie:11000/oozie"]);

    let params = HashMap::from([("zone".to_string(), "b".to_string())]);
    assert_eq!(
        registry.resolve_with("OOZIE", Some(&params)).urls,
        vec!["http://oozie:11000/oozie?zone=b"]
    );
}

#[test]
fn unknown_service_resolves_to_nothing() {
    let mut registry = UrlCreatorRegistry::new();
    registry.register(WebHdfsUrlCreator::new(single_namenode())).unwrap();
    assert!(registry.resolve("HIVE").is_empty());
    assert_eq!(registry.resolve_with("HIVE", None), Resolution::empty());
    assert!(registry.get("HIVE").is_none());
    assert!(registry.get("WEBHDFS").is_some());
}

#[test]
fn rejects_second_creator_for_same_service() {
    let mut registry = UrlCreatorRegistry::new();
    registry.register(WebHdfsUrlCreator::new(single_namenode())).unwrap();
    let err = registry
        .register(WebHdfsUrlCreator::new(Arc::new(ClusterSnapshot::new("other"))))
        .unwrap_err();
    match err {
        CoreError::DuplicateService(service) => assert_eq!(service, "WEBHDFS"),
        other => panic!("expected DuplicateService, got {:?}", other),
    }
    assert_eq!(registry.resolve("WEBHDFS"), vec!["http://host1:50070/webhdfs"]);
}

#[test]
fn shared_registry_resolves_from_many_threads() {
    let mut registry = UrlCreatorRegistry::new();
    registry.register(WebHdfsUrlCreator::new(single_namenode())).unwrap();
    let registry = Arc::new(registry);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || registry.resolve("WEBHDFS"))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), vec!["http://host1:50070/webhdfs"]);
    }
}

#[test]
fn merge_is_all_or_nothing() {
    let mut target = UrlCreatorRegistry::new();
    target
        .register(FixedCreator {
            service: "OOZIE",
            url: "http://oozie:11000/oozie",
        })
        .unwrap();

    let mut colliding = UrlCreatorRegistry::new();
    colliding.register(WebHdfsUrlCreator::new(single_namenode())).unwrap();
    colliding
        .register(FixedCreator {
            service: "OOZIE",
            url: "http://other:11000/oozie",
        })
        .unwrap();
    let err = target.merge(colliding).unwrap_err();
    assert!(matches!(err, CoreError::DuplicateService(ref s) if s == "OOZIE"));
    assert_eq!(target.services(), vec!["OOZIE"]);
    assert_eq!(target.resolve("OOZIE"), vec!["http://oozie:11000/oozie"]);

    let mut webhdfs = UrlCreatorRegistry::new();
    webhdfs.register(WebHdfsUrlCreator::new(single_namenode())).unwrap();
    target.merge(webhdfs).unwrap();
    assert_eq!(target.services(), vec!["OOZIE", "WEBHDFS"]);
}
