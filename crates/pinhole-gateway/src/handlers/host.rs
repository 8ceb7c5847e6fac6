use axum::http::header::HOST;
use axum::http::HeaderMap;

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const FORWARDED_HOST: &str = "x-forwarded-host";

/// Scheme and host that short links are built on, e.g. `https://pin.hole`.
///
/// A configured `hostname` wins. Otherwise the scheme comes from
/// `X-Forwarded-Proto` (default `http`) and the host from
/// `X-Forwarded-Host`, falling back to `Host`.
pub fn base_url(headers: &HeaderMap, hostname: Option<&str>) -> String {
    if let Some(hostname) = hostname {
        return hostname.to_string();
    }

    let scheme = header(headers, FORWARDED_PROTO).unwrap_or("http");
    let host = header(headers, FORWARDED_HOST)
        .or_else(|| header(headers, HOST.as_str()))
        .unwrap_or_default();

    format!("{scheme}://{host}")
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}
