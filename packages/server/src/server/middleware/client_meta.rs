use axum::{
    extract::{ConnectInfo, Request},
    http::header::USER_AGENT,
    middleware::Next,
    response::Response,
};
use std::net::{IpAddr, SocketAddr};

use crate::domains::auth::models::ClientMeta;

/// Middleware capturing client IP and device string for the audit trail.
///
/// IP priority:
/// 1. X-Forwarded-For header (for requests through proxies)
/// 2. X-Real-IP header (for Nginx)
/// 3. ConnectInfo socket address (direct connection)
pub async fn capture_client_meta(
    connect_info: Option<ConnectInfo<SocketAddr>>,
    mut request: Request,
    next: Next,
) -> Response {
    let ip = if let Some(forwarded) = request.headers().get("x-forwarded-for") {
        // Comma-separated list, take first
        forwarded
            .to_str()
            .ok()
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    } else if let Some(real_ip) = request.headers().get("x-real-ip") {
        real_ip.to_str().ok().and_then(|s| s.parse::<IpAddr>().ok())
    } else {
        connect_info.map(|ConnectInfo(addr)| addr.ip())
    };

    let device = request
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    request.extensions_mut().insert(ClientMeta { ip, device });

    next.run(request).await
}
