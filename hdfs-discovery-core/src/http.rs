//! HTTP lookup server: tokio + hyper. Serves resolved service URLs as JSON.
//!
//! `GET /services` lists registered services; `GET /services/{service}/urls` resolves one,
//! query parameters are passed to the creator (e.g. `?discovery-nameservice=ns2`).

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use url::form_urlencoded;

use crate::registry::UrlCreatorRegistry;
use crate::service_discovery::ServiceParams;

/// Status and JSON body of one lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct LookupResponse {
    pub status: u16,
    pub body: Value,
}

impl LookupResponse {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn error(status: u16, message: String) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
        }
    }

    fn into_hyper_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(Bytes::from(self.body.to_string())));
        *response.status_mut() =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}

/// Route one request against the registry. No I/O.
pub fn lookup(
    registry: &UrlCreatorRegistry,
    method: &str,
    path: &str,
    query: Option<&str>,
) -> LookupResponse {
    if !method.eq_ignore_ascii_case("GET") {
        return LookupResponse::error(405, format!("method not allowed: {}", method));
    }
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match segments.as_slice() {
        ["services"] => LookupResponse::ok(json!({ "services": registry.services() })),
        ["services", service, "urls"] if !service.is_empty() => {
            let params = query.map(parse_query).unwrap_or_default();
            let resolution = registry.resolve_with(service, Some(&params));
            LookupResponse::ok(json!({
                "service": service,
                "urls": resolution.urls,
                "warnings": resolution.warnings,
            }))
        }
        _ => LookupResponse::error(404, format!("not found: {}", path)),
    }
}

/// `a=1&b=2` -> map. Keys and values are form-decoded (`+` and `%XX`) but not trimmed;
/// a key without `=` maps to an empty value.
fn parse_query(query: &str) -> ServiceParams {
    form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// Run the lookup server (blocks until Ctrl-C).
pub fn run(
    registry: Arc<UrlCreatorRegistry>,
    host: &str,
    port: u16,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = format!("{}:{}", host, port);
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    rt.block_on(async move {
        let listener = TcpListener::bind(&addr).await?;
        tracing::info!(%addr, services = ?registry.services(), "discovery lookup server listening");
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("shutting down discovery lookup server");
                    break Ok(());
                }
                accept_result = listener.accept() => {
                    let (stream, peer) = match accept_result {
                        Ok(x) => x,
                        Err(e) => {
                            tracing::warn!(error = %e, "accept failed");
                            continue;
                        }
                    };
                    let io = TokioIo::new(stream);
                    let registry = Arc::clone(&registry);
                    tokio::task::spawn(async move {
                        let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                            let registry = Arc::clone(&registry);
                            async move {
                                let response = lookup(
                                    &registry,
                                    req.method().as_str(),
                                    req.uri().path(),
                                    req.uri().query(),
                                );
                                Ok::<_, std::convert::Infallible>(response.into_hyper_response())
                            }
                        });
                        if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                            tracing::debug!(%peer, error = %e, "connection closed with error");
                        }
                    });
                }
            }
        }
    })
}
