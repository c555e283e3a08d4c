use axum::body::Bytes;
use axum::http::{
    HeaderMap, HeaderName, HeaderValue, Method, Uri,
    header::{
        CONNECTION, CONTENT_LENGTH, HOST, PROXY_AUTHENTICATE, PROXY_AUTHORIZATION, TE, TRAILER,
        TRANSFER_ENCODING, UPGRADE,
    },
};

use edgeguard_config::GatewayConfig;
use edgeguard_core::headers::X_INTERNAL_SECRET;

/// Largest request body the gateway buffers before forwarding.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const KEEP_ALIVE: HeaderName = HeaderName::from_static("keep-alive");
const PROXY_CONNECTION: HeaderName = HeaderName::from_static("proxy-connection");

/// Headers that describe a single connection and are never forwarded.
/// `Content-Length` is recomputed from the buffered body.
const HOP_BY_HOP: [HeaderName; 11] = [
    CONNECTION,
    KEEP_ALIVE,
    PROXY_CONNECTION,
    PROXY_AUTHENTICATE,
    PROXY_AUTHORIZATION,
    TE,
    TRAILER,
    TRANSFER_ENCODING,
    UPGRADE,
    CONTENT_LENGTH,
    HOST,
];

/// Where a gateway request goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    /// Prefix of the matched route, used as a metrics label.
    pub route: String,
    pub url: String,
}

pub struct ProxyService;

impl ProxyService {
    pub fn upstream_target(config: &GatewayConfig, uri: &Uri) -> Option<UpstreamTarget> {
        let (route, rest) = config.route_for(uri.path())?;

        let mut url = format!("{}{}", route.target, rest);
        if let Some(query) = uri.query() {
            url.push('?');
            url.push_str(query);
        }

        Some(UpstreamTarget {
            route: route.prefix.clone(),
            url,
        })
    }

    /// Incoming headers minus hop-by-hop ones, plus the internal secret.
    pub fn request_headers(incoming: &HeaderMap, internal_secret: &HeaderValue) -> HeaderMap {
        let mut headers = strip_hop_by_hop(incoming);
        headers.insert(X_INTERNAL_SECRET, internal_secret.clone());
        headers
    }

    pub fn response_headers(upstream: &HeaderMap) -> HeaderMap {
        strip_hop_by_hop(upstream)
    }

    pub async fn send(
        client: &reqwest::Client,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<reqwest::Response, reqwest::Error> {
        client
            .request(method, url)
            .headers(headers)
            .body(body)
            .send()
            .await
    }
}

fn strip_hop_by_hop(headers: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !HOP_BY_HOP.contains(name) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, SET_COOKIE};

    fn config() -> GatewayConfig {
        GatewayConfig::from_lookup(|key| {
            (key == "GATEWAY_ROUTES").then(|| {
                "/api/account=http://account:8081/api,/api/product=http://product:8082/api"
                    .to_string()
            })
        })
        .unwrap()
    }

    #[test]
    fn test_upstream_target_keeps_remainder_and_query() {
        let uri: Uri = "/api/product/v1/products?page=2&size=10".parse().unwrap();
        let target = ProxyService::upstream_target(&config(), &uri).unwrap();

        assert_eq!(target.route, "/api/product");
        assert_eq!(
            target.url,
            "http://product:8082/api/v1/products?page=2&size=10"
        );
    }

    #[test]
    fn test_upstream_target_unknown_path() {
        let uri: Uri = "/api/orders/1".parse().unwrap();
        assert!(ProxyService::upstream_target(&config(), &uri).is_none());
    }

    #[test]
    fn test_request_headers() {
        let mut incoming = HeaderMap::new();
        incoming.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        incoming.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        incoming.insert(HOST, HeaderValue::from_static("gateway:8080"));
        incoming.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        incoming.insert(KEEP_ALIVE, HeaderValue::from_static("timeout=5"));
        incoming.insert(X_INTERNAL_SECRET, HeaderValue::from_static("forged"));

        let headers =
            ProxyService::request_headers(&incoming, &HeaderValue::from_static("real-secret"));

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(headers.get(X_INTERNAL_SECRET).unwrap(), "real-secret");
        assert_eq!(headers.get_all(X_INTERNAL_SECRET).iter().count(), 1);
        assert!(headers.get(HOST).is_none());
        assert!(headers.get(CONNECTION).is_none());
        assert!(headers.get(KEEP_ALIVE).is_none());
    }

    #[test]
    fn test_response_headers_keep_repeated_values() {
        let mut upstream = HeaderMap::new();
        upstream.append(SET_COOKIE, HeaderValue::from_static("a=1"));
        upstream.append(SET_COOKIE, HeaderValue::from_static("b=2"));
        upstream.insert(TRANSFER_ENCODING, HeaderValue::from_static("chunked"));

        let headers = ProxyService::response_headers(&upstream);

        assert_eq!(headers.get_all(SET_COOKIE).iter().count(), 2);
        assert!(headers.get(TRANSFER_ENCODING).is_none());
    }
}
