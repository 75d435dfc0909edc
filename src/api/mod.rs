use anyhow::{anyhow, Context, Result};
use axum::{
    body::Body,
    extract::{Extension, MatchedPath},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, Request,
    },
    routing::{any, get, patch, post},
    Router,
};
use secrecy::SecretString;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use url::Url;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod handlers;
mod openapi;
pub mod state;

pub use openapi::ApiDoc;
pub use state::{AppState, ServerConfig};

use handlers::{activity_log, dev, health, metrics, trust_proxy, users};

/// Build the full application router over the given state.
///
/// # Errors
///
/// Returns an error when the configured frontend URL cannot be turned into
/// a CORS origin.
pub fn router(state: Arc<AppState>) -> Result<Router> {
    let origin = frontend_origin(&state.config.frontend_url)?;
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_origin(AllowOrigin::exact(origin))
        .allow_credentials(true);

    let app = Router::new()
        .route("/health", get(health::health).options(health::health))
        .route("/api/trust/admin/users", get(users::list_users))
        .route("/api/trust/admin/users/:id", get(users::get_user))
        .route(
            "/api/trust/admin/users/:id/verify",
            patch(users::verify_user),
        )
        .route("/api/trust/admin/users/:id/ban", patch(users::ban_user))
        .route(
            "/api/trust/admin/activity-log",
            get(activity_log::activity_log),
        )
        .route("/api/trust/admin/metrics", get(metrics::metrics))
        .route("/api/dev/session", post(dev::session))
        .route("/api/dev/seed", post(dev::seed))
        .route("/api/trust/*path", any(trust_proxy::proxy))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(state)),
        );

    Ok(app)
}

/// Start the server
///
/// # Errors
///
/// Returns an error if the user store cannot be opened or the listener
/// fails to bind.
pub async fn new(port: u16, jwt_secret: SecretString, config: ServerConfig) -> Result<()> {
    let state = Arc::new(AppState::new(jwt_secret, config).context("failed to open user store")?);
    let app = router(state)?;

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

fn frontend_origin(frontend_base_url: &str) -> Result<HeaderValue> {
    let parsed = Url::parse(frontend_base_url)
        .with_context(|| format!("Invalid frontend base URL: {frontend_base_url}"))?;
    let host = parsed.host_str().ok_or_else(|| {
        anyhow!("Frontend base URL must include a valid host: {frontend_base_url}")
    })?;
    let port = parsed
        .port()
        .map_or_else(String::new, |port| format!(":{port}"));
    let origin = format!("{}://{}{}", parsed.scheme(), host, port);
    HeaderValue::from_str(&origin).context("Failed to build frontend origin header")
}
