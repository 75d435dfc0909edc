//! Thin passthrough to the upstream identity service for non-admin trust
//! paths. The upstream stays a black box; this only forwards bytes.

use axum::{
    body::Bytes,
    extract::{Extension, Path},
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};
use reqwest::Client;
use std::sync::Arc;
use tracing::error;

use super::error_message;
use crate::api::state::AppState;
use crate::APP_USER_AGENT;

pub async fn proxy(
    Path(path): Path<String>,
    method: Method,
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
    body: Bytes,
) -> Response {
    // The admin namespace is served locally; unregistered admin paths must
    // never reach the upstream.
    if path == "admin" || path.starts_with("admin/") {
        return error_message(StatusCode::NOT_FOUND, "Not found");
    }

    let Some(base) = state.config.trust_api.as_deref() else {
        return error_message(StatusCode::NOT_FOUND, "Not found");
    };
    let target = format!("{}/{}", base.trim_end_matches('/'), path);

    let client = match Client::builder().user_agent(APP_USER_AGENT).build() {
        Ok(client) => client,
        Err(err) => {
            error!("failed to build identity proxy client: {err}");
            return error_message(StatusCode::SERVICE_UNAVAILABLE, "Identity service unavailable");
        }
    };

    let mut request = client.request(method, &target).body(body);
    if let Some(content_type) = headers.get(CONTENT_TYPE) {
        request = request.header(CONTENT_TYPE, content_type);
    }

    match request.send().await {
        Ok(upstream) => {
            let status = upstream.status();
            let content_type = upstream.headers().get(CONTENT_TYPE).cloned();
            match upstream.bytes().await {
                Ok(payload) => {
                    let mut response_headers = HeaderMap::new();
                    if let Some(content_type) = content_type {
                        response_headers.insert(CONTENT_TYPE, content_type);
                    }
                    (status, response_headers, payload).into_response()
                }
                Err(err) => {
                    error!("failed to read identity service response: {err}");
                    error_message(StatusCode::SERVICE_UNAVAILABLE, "Identity service unavailable")
                }
            }
        }
        Err(err) => {
            error!(target = %target, "identity service request failed: {err}");
            error_message(StatusCode::SERVICE_UNAVAILABLE, "Identity service unavailable")
        }
    }
}
