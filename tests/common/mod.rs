use std::net::SocketAddr;

use axum::body::to_bytes;
use axum::extract::Request;
use axum::http::{StatusCode, header::HeaderName};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{Map, Value, json};

use edgeguard::edgeguard_auth::{Claims, SigningKey, sign_claims};
use edgeguard::edgeguard_config::{GatewayConfig, InternalConfig, JwtConfig, PublicPaths};
use edgeguard::state::{GatewayState, ServiceState};

/// 32 bytes of `k`, base64.
pub const TEST_KEY: &str = "a2tra2tra2tra2tra2tra2tra2tra2tra2tra2tra2s=";
/// 32 bytes of `o`, base64.
#[allow(dead_code)]
pub const OTHER_KEY: &str = "b29vb29vb29vb29vb29vb29vb29vb29vb29vb29vb28=";
pub const INTERNAL_SECRET: &str = "test-internal-secret";

/// Echo upstream replies with this status when the request carries it.
#[allow(dead_code)]
pub const ECHO_STATUS: HeaderName = HeaderName::from_static("x-echo-status");

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret_key: TEST_KEY.to_string(),
    }
}

pub fn internal_config() -> InternalConfig {
    InternalConfig {
        shared_secret: INTERNAL_SECRET.to_string(),
    }
}

#[allow(dead_code)]
pub fn gateway_config(routes: &str) -> GatewayConfig {
    let routes = routes.to_string();
    GatewayConfig::from_lookup(move |key| match key {
        "GATEWAY_ROUTES" => Some(routes.clone()),
        "UPSTREAM_TIMEOUT_SECS" => Some("5".to_string()),
        _ => None,
    })
    .unwrap()
}

#[allow(dead_code)]
pub fn gateway_state(routes: &str, public_paths: PublicPaths) -> GatewayState {
    GatewayState::from_config(
        &jwt_config(),
        &internal_config(),
        public_paths,
        gateway_config(routes),
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn service_state() -> ServiceState {
    ServiceState::from_config(&jwt_config(), &internal_config()).unwrap()
}

fn sign_with(key: &str, sub: Option<&str>, authorities: Option<&str>, exp: i64) -> String {
    let key = SigningKey::from_base64(key).unwrap();
    let claims = Claims {
        sub: sub.map(str::to_string),
        exp,
        iat: Some(Utc::now().timestamp()),
        authorities: authorities.map(str::to_string),
    };
    sign_claims(&key, &claims).unwrap()
}

/// A token valid for an hour.
pub fn token_for(sub: &str, authorities: Option<&str>) -> String {
    sign_with(TEST_KEY, Some(sub), authorities, Utc::now().timestamp() + 3600)
}

#[allow(dead_code)]
pub fn token_without_subject(authorities: &str) -> String {
    sign_with(TEST_KEY, None, Some(authorities), Utc::now().timestamp() + 3600)
}

#[allow(dead_code)]
pub fn expired_token(sub: &str, authorities: Option<&str>) -> String {
    sign_with(TEST_KEY, Some(sub), authorities, Utc::now().timestamp() - 60)
}

#[allow(dead_code)]
pub fn foreign_token(sub: &str, authorities: Option<&str>) -> String {
    sign_with(OTHER_KEY, Some(sub), authorities, Utc::now().timestamp() + 3600)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Serves `app` on an ephemeral local port.
#[allow(dead_code)]
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Upstream that describes the request it received:
/// `{"method", "path", "query", "headers": {name: value}, "body_len"}`.
#[allow(dead_code)]
pub async fn spawn_echo_upstream() -> SocketAddr {
    async fn echo(req: Request) -> Response {
        let status = req
            .headers()
            .get(ECHO_STATUS)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u16>().ok())
            .and_then(|v| StatusCode::from_u16(v).ok())
            .unwrap_or(StatusCode::OK);

        let (parts, body) = req.into_parts();

        let mut headers = Map::new();
        for name in parts.headers.keys() {
            let values: Vec<&str> = parts
                .headers
                .get_all(name)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .collect();
            headers.insert(name.to_string(), Value::String(values.join(", ")));
        }

        let body = to_bytes(body, usize::MAX).await.unwrap();

        let payload = json!({
            "method": parts.method.as_str(),
            "path": parts.uri.path(),
            "query": parts.uri.query(),
            "headers": headers,
            "body_len": body.len(),
        });

        let mut response = (status, Json(payload)).into_response();
        response
            .headers_mut()
            .insert("x-upstream", "echo".parse().unwrap());
        response
    }

    spawn_server(Router::new().fallback(echo)).await
}
