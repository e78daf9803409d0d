//! Gateway server: route matching, token relay, and streaming forwarding
//!
//! One forwarded call flows through: route-pattern match -> session
//! authentication -> backend URI rewrite -> bearer-token augmentation ->
//! outbound header sanitization -> streaming dispatch -> response header
//! sanitization -> streamed relay back to the caller. Both body legs are
//! hyper `Body` streams, so bytes are piped without full buffering and
//! backpressure propagates from the slower side to the faster one. Dropping
//! the caller's connection drops the in-flight backend future with it.

use crate::auth::{AuthorizedClientStore, Session, SessionAuthenticator};
use crate::config::GatewayConfig;
use crate::error::{Error, Result};
use crate::models::ForwardRecord;
use crate::proxy::augment::augment;
use crate::proxy::headers::{filter_inbound, filter_outbound};
use crate::proxy::http_client::BackendClient;
use crate::proxy::rewrite::{match_route, rewrite};
use crate::routes::RouteTable;
use crate::utils::{build_error_response, build_json_response};
use crate::{log_forward_record, log_info};
use hyper::server::conn::AddrStream;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};
use serde_json::json;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Minimal landing page, served at the gateway root
const INDEX_HTML: &str = include_str!("index.html");

/// Shared per-process gateway state, cheap to clone behind an `Arc`
pub struct Gateway {
    config: GatewayConfig,
    routes: RouteTable,
    authenticator: Arc<dyn SessionAuthenticator>,
    clients: Arc<dyn AuthorizedClientStore>,
    backend: BackendClient,
}

impl Gateway {
    pub fn new(
        config: GatewayConfig,
        routes: RouteTable,
        authenticator: Arc<dyn SessionAuthenticator>,
        clients: Arc<dyn AuthorizedClientStore>,
    ) -> Self {
        let backend = BackendClient::from_config(&config.http_client);
        Self {
            config,
            routes,
            authenticator,
            clients,
            backend,
        }
    }

    /// Handle one inbound request: local endpoints first, everything under
    /// the api prefix is forwarded.
    pub async fn handle(
        self: Arc<Self>,
        req: Request<Body>,
        remote_addr: SocketAddr,
    ) -> std::result::Result<Response<Body>, Infallible> {
        let path = req.uri().path().to_string();
        debug!("{} {} from {}", req.method(), path, remote_addr.ip());

        if path == "/health" {
            return Ok(handle_health_check(req.method().as_str()));
        }

        if path == "/" {
            return Ok(Response::builder()
                .status(StatusCode::OK)
                .header("content-type", "text/html; charset=utf-8")
                .body(Body::from(INDEX_HTML))
                .unwrap_or_else(|_| Response::new(Body::empty())));
        }

        if path == "/whoami" {
            return Ok(self.handle_whoami(&req).await);
        }

        match match_route(&path, &self.config.api_prefix) {
            Some((service, remainder)) => {
                let service = service.to_string();
                let remainder = remainder.to_string();
                Ok(self.forward(req, &service, &remainder, remote_addr).await)
            }
            None => Ok(build_error_response(StatusCode::NOT_FOUND, "Not Found")),
        }
    }

    /// Return the authenticated principal name, or 401 for anonymous callers
    async fn handle_whoami(&self, req: &Request<Body>) -> Response<Body> {
        match self.authenticator.authenticate(req.headers()).await {
            Some(session) => build_json_response(
                StatusCode::OK,
                json!({ "name": session.principal }).to_string(),
            ),
            None => build_error_response(StatusCode::UNAUTHORIZED, "Unauthorized"),
        }
    }

    /// Forward one matched request and stream the backend response back.
    /// Errors are resolved into a status here because no response bytes have
    /// been flushed yet; once the head is relayed, stream faults tear the
    /// connection down instead.
    async fn forward(
        &self,
        req: Request<Body>,
        service: &str,
        remainder: &str,
        remote_addr: SocketAddr,
    ) -> Response<Body> {
        let start_time = std::time::Instant::now();
        let method = req.method().to_string();

        match self.forward_inner(req, service, remainder, remote_addr).await {
            Ok((response, record)) => {
                let duration_ms = start_time.elapsed().as_millis() as u64;
                let record = record.completed(response.status().as_u16(), duration_ms);
                info!(
                    "{} {} -> {} ({}ms)",
                    method, record.backend_url, response.status(), duration_ms
                );
                log_forward_record!(&record);
                response
            }
            Err((err, record)) => {
                let duration_ms = start_time.elapsed().as_millis() as u64;
                let status = err.response_status();
                match &err {
                    Error::UnknownService(_) | Error::Unauthenticated => {
                        debug!("{} {} -> {}: {}", method, service, status, err)
                    }
                    _ => warn!("{} {} -> {}: {}", method, service, status, err),
                }
                if let Some(record) = record {
                    log_forward_record!(&record.failed(&err, duration_ms));
                }
                build_error_response(status, status.canonical_reason().unwrap_or("Error"))
            }
        }
    }

    async fn forward_inner(
        &self,
        req: Request<Body>,
        service: &str,
        remainder: &str,
        remote_addr: SocketAddr,
    ) -> std::result::Result<(Response<Body>, ForwardRecord), (Error, Option<ForwardRecord>)> {
        // Matched -> Authorizing: anonymous callers never reach augmentation
        let session = self
            .authenticator
            .authenticate(req.headers())
            .await
            .ok_or((Error::Unauthenticated, None))?;

        // Unknown service is terminal before any backend I/O
        let base = self
            .routes
            .resolve(service)
            .ok_or_else(|| (Error::UnknownService(service.to_string()), None))?;

        let target = rewrite(base, remainder, req.uri().query());

        let mut record = ForwardRecord::new(
            req.method().to_string(),
            service.to_string(),
            target.clone(),
            remote_addr.ip(),
        );
        record.principal = Some(session.principal.clone());

        match self.dispatch(req, &target, &session, &mut record).await {
            Ok(response) => Ok((response, record)),
            Err(err) => Err((err, Some(record))),
        }
    }

    /// HeadersPrepared -> Dispatched -> StreamingResponse
    async fn dispatch(
        &self,
        req: Request<Body>,
        target: &str,
        session: &Session,
        record: &mut ForwardRecord,
    ) -> Result<Response<Body>> {
        let (parts, body) = req.into_parts();

        let mut builder = Request::builder().method(parts.method).uri(target);
        if let Some(headers) = builder.headers_mut() {
            *headers = filter_outbound(&parts.headers);
        }

        let builder = augment(
            builder,
            session,
            self.clients.as_ref(),
            &self.config.auth.registration_id,
            self.config.auth.credential_policy,
        )
        .await?;

        record.bearer_attached = builder
            .headers_ref()
            .map(|h| h.contains_key(hyper::header::AUTHORIZATION))
            .unwrap_or(false);

        // The inbound body is handed to the client untouched: request bytes
        // are piped to the backend as the caller produces them.
        let outbound = builder.body(body)?;

        debug!("Dispatching {} {}", outbound.method(), target);

        // The timeout covers time-to-response-head only; a slow streamed
        // body is the caller's and backend's business.
        let response = tokio::time::timeout(
            Duration::from_secs(self.config.request_timeout),
            self.backend.request(outbound),
        )
        .await
        .map_err(|_| Error::BackendTimeout(self.config.request_timeout))?
        .map_err(|e| {
            if e.is_connect() {
                Error::BackendUnreachable(e.to_string())
            } else {
                Error::Http(e)
            }
        })?;

        // Relay status and sanitized headers, then pipe body bytes through
        // in arrival order.
        let (parts, body) = response.into_parts();
        let mut relayed = Response::new(body);
        *relayed.status_mut() = parts.status;
        *relayed.headers_mut() = filter_inbound(&parts.headers);

        Ok(relayed)
    }
}

/// Liveness endpoint, handled locally and never forwarded
fn handle_health_check(method: &str) -> Response<Body> {
    if method == "GET" {
        let health_data = json!({
            "status": "healthy",
            "service": "session-gateway",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "version": env!("CARGO_PKG_VERSION"),
        });
        build_json_response(StatusCode::OK, health_data.to_string())
    } else {
        Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header("allow", "GET")
            .body(Body::from("Method Not Allowed"))
            .unwrap_or_else(|_| Response::new(Body::empty()))
    }
}

/// The listening server wrapping a shared `Gateway`
pub struct GatewayServer {
    listen_addr: SocketAddr,
    gateway: Arc<Gateway>,
}

impl GatewayServer {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            listen_addr: gateway.config.listen_addr,
            gateway: Arc::new(gateway),
        }
    }

    /// Start the gateway server
    pub async fn start(self) -> Result<()> {
        info!("Starting gateway on {}", self.listen_addr);
        log_info!(
            "Routing {} service(s) under '{}'",
            self.gateway.routes.len(),
            self.gateway.config.api_prefix
        );
        for name in self.gateway.routes.service_names() {
            debug!("  route: {}", name);
        }

        let gateway = self.gateway;
        let make_svc = make_service_fn(move |conn: &AddrStream| {
            let remote_addr = conn.remote_addr();
            let gateway = Arc::clone(&gateway);

            async move {
                Ok::<_, Infallible>(service_fn(move |req| {
                    let gateway = Arc::clone(&gateway);
                    gateway.handle(req, remote_addr)
                }))
            }
        });

        let server = Server::try_bind(&self.listen_addr)?.serve(make_svc);
        log_info!("Gateway bound successfully, waiting for connections");

        if let Err(e) = server.await {
            error!("Server error: {}", e);
            return Err(Error::BackendUnreachable(e.to_string()));
        }

        Ok(())
    }
}
