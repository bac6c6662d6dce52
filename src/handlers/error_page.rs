//! Error page endpoint handler.
//!
//! Renders the page for `/error`. Parameters are layered as: demo defaults,
//! then the `page` section of the config file, then query string overrides.

use axum::{
    extract::{ConnectInfo, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use cloudflare_error_page::params::{from_value, get_error_code};
use cloudflare_error_page::{render, ParameterBag};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use tracing::{debug, error, instrument};

use crate::state::SharedState;

/// Query parameters for the error page endpoint.
#[derive(Deserialize, Debug, Default)]
pub struct ErrorPageQuery {
    /// Overrides `error_code`
    pub code: Option<u16>,
    /// Overrides `title`
    pub title: Option<String>,
    /// Overrides `error_source`
    pub source: Option<String>,
}

/// Handler for the `/error` endpoint.
#[instrument(skip(state, headers))]
pub async fn error_page_handler(
    State(state): State<SharedState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Query(query): Query<ErrorPageQuery>,
) -> Response {
    debug!("Processing /error request");

    let host = headers.get(header::HOST).and_then(|v| v.to_str().ok());
    let params = build_page_params(
        &state.page_params,
        host,
        &peer.ip().to_string(),
        &query,
    );
    let status = status_code_for(&params);

    match render(&params, Some(&state.render_options)) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!("Failed to render error page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error rendering page").into_response()
        }
    }
}

/// Parameters for a request: Cloudflare failing between a healthy browser and host.
pub fn demo_params(host: Option<&str>, client_ip: &str) -> ParameterBag {
    let mut params = from_value(json!({
        "error_code": 500,
        "title": "Internal server error",
        "browser_status": { "status": "ok" },
        "cloudflare_status": { "status": "error", "status_text": "Error" },
        "host_status": { "status": "ok" },
        "error_source": "cloudflare",
        "what_happened": "<p>There is an internal server error on Cloudflare's network.</p>",
        "what_can_i_do": "<p>Please try again in a few minutes.</p>",
        "client_ip": client_ip,
    }));

    if let Some(host) = host {
        merge_params(
            &mut params,
            from_value(json!({ "host_status": { "location": host } })),
        );
    }
    params
}

/// Layers config and query overrides over [`demo_params`].
pub fn build_page_params(
    base: &ParameterBag,
    host: Option<&str>,
    client_ip: &str,
    query: &ErrorPageQuery,
) -> ParameterBag {
    let mut params = demo_params(host, client_ip);
    merge_params(&mut params, base.clone());

    if let Some(code) = query.code {
        params.insert("error_code".into(), json!(code));
    }
    if let Some(title) = &query.title {
        params.insert("title".into(), json!(title));
    }
    if let Some(source) = &query.source {
        params.insert("error_source".into(), json!(source));
    }
    params
}

/// Merges `overlay` into `target`. Groups present on both sides are merged
/// field by field, everything else is replaced.
pub fn merge_params(target: &mut ParameterBag, overlay: ParameterBag) {
    for (key, value) in overlay {
        match value {
            Value::Object(fields) => match target.get_mut(&key) {
                Some(Value::Object(existing)) => existing.extend(fields),
                _ => {
                    target.insert(key, Value::Object(fields));
                }
            },
            value => {
                target.insert(key, value);
            }
        }
    }
}

/// HTTP status matching the page's error code.
///
/// Only client and server errors are used; anything else becomes 500 so the
/// page body is never dropped or turned into a redirect.
pub fn status_code_for(params: &ParameterBag) -> StatusCode {
    get_error_code(params)
        .filter(|code| (400..=599).contains(code))
        .and_then(|code| u16::try_from(code).ok())
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudflare_error_page::params::{get_group, get_str};

    #[test]
    fn test_demo_params_host_location() {
        let params = demo_params(Some("example.com"), "10.0.0.1");
        let host = get_group(&params, "host_status").unwrap();

        assert_eq!(get_str(host, "location"), Some("example.com"));
        assert_eq!(get_str(host, "status"), Some("ok"));
        assert_eq!(get_str(&params, "client_ip"), Some("10.0.0.1"));
    }

    #[test]
    fn test_build_page_params_layering() {
        let base = from_value(json!({
            "title": "Maintenance",
            "host_status": { "status": "error" },
        }));
        let query = ErrorPageQuery {
            code: Some(503),
            title: None,
            source: Some("host".into()),
        };

        let params = build_page_params(&base, Some("example.com"), "10.0.0.1", &query);
        let host = get_group(&params, "host_status").unwrap();

        assert_eq!(get_str(&params, "title"), Some("Maintenance"));
        assert_eq!(get_error_code(&params), Some(503));
        assert_eq!(get_str(&params, "error_source"), Some("host"));
        assert_eq!(get_str(host, "status"), Some("error"));
        assert_eq!(get_str(host, "location"), Some("example.com"));
    }

    #[test]
    fn test_status_code_for() {
        let params = from_value(json!({ "error_code": 502 }));
        assert_eq!(status_code_for(&params), StatusCode::BAD_GATEWAY);

        let params = from_value(json!({ "error_code": 1234 }));
        assert_eq!(status_code_for(&params), StatusCode::INTERNAL_SERVER_ERROR);

        let params = from_value(json!({ "error_code": -1 }));
        assert_eq!(status_code_for(&params), StatusCode::INTERNAL_SERVER_ERROR);

        for code in [103, 204, 302, 304] {
            let params = from_value(json!({ "error_code": code }));
            assert_eq!(
                status_code_for(&params),
                StatusCode::INTERNAL_SERVER_ERROR,
                "code {} must not become the response status",
                code
            );
        }

        let params = from_value(json!({ "error_code": "404" }));
        assert_eq!(status_code_for(&params), StatusCode::NOT_FOUND);

        assert_eq!(
            status_code_for(&ParameterBag::new()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
