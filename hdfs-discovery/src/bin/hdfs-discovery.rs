//! CLI for hdfs-discovery: resolve service URLs from a cluster snapshot, or serve them over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use hdfs_discovery::{
    http, init_logging, DiscoveryModule, LogFormat, ServiceParams, NAMESERVICE_PARAM,
};

#[derive(Parser)]
#[command(name = "hdfs-discovery")]
#[command(about = "Resolve WebHDFS endpoints from cluster configuration")]
struct Cli {
    /// Log line format (level from RUST_LOG, default info)
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the URLs of a service, one per line.
    Resolve {
        /// Cluster snapshot (JSON)
        #[arg(long, env = "HDFS_DISCOVERY_CLUSTER")]
        cluster: PathBuf,
        /// Service identifier
        #[arg(long, default_value = "WEBHDFS")]
        service: String,
        /// Nameservice to use when several are configured
        #[arg(long)]
        nameservice: Option<String>,
        /// Extra resolution parameter as key=value (repeatable)
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
        /// Print URLs and warnings as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve GET /services/{service}/urls over HTTP.
    Serve {
        /// Cluster snapshot (JSON)
        #[arg(long, env = "HDFS_DISCOVERY_CLUSTER")]
        cluster: PathBuf,
        #[arg(long, env = "HOST", default_value = "127.0.0.1")]
        host: String,
        #[arg(long, env = "PORT", default_value_t = 8000)]
        port: u16,
    },
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {:?}", s))?;
    if key.is_empty() {
        return Err(format!("empty parameter name in {:?}", s));
    }
    Ok((key.to_string(), value.to_string()))
}

fn run_resolve(
    cluster: PathBuf,
    service: &str,
    nameservice: Option<String>,
    params: Vec<(String, String)>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let registry = DiscoveryModule::new().snapshot_file(cluster).build()?;
    let mut service_params: ServiceParams = params.into_iter().collect();
    if let Some(ns) = nameservice {
        service_params.insert(NAMESERVICE_PARAM.to_string(), ns);
    }
    let resolution = registry.resolve_with(service, Some(&service_params));
    if json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
    } else {
        for url in &resolution.urls {
            println!("{}", url);
        }
    }
    if resolution.is_empty() {
        tracing::info!(service, "no endpoint found");
    }
    Ok(())
}

fn run_serve(
    cluster: PathBuf,
    host: &str,
    port: u16,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let registry = DiscoveryModule::new().snapshot_file(cluster).build()?;
    http::run(Arc::new(registry), host, port)
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    init_logging(cli.log_format, "info")?;
    match cli.command {
        Commands::Resolve {
            cluster,
            service,
            nameservice,
            params,
            json,
        } => run_resolve(cluster, &service, nameservice, params, json),
        Commands::Serve { cluster, host, port } => run_serve(cluster, &host, port),
    }
}
