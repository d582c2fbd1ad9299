use axum::extract::Request;
use axum::middleware::from_fn_with_state;
use axum::response::Html;
use axum::routing::get;
use axum::{Extension, Router, ServiceExt};
use driftavbrott_gate::config::AppConfig;
use driftavbrott_gate::http::middleware::driftavbrott::{enforce, BlockContext};
use driftavbrott_gate::source::rest::RestWindowSource;
use driftavbrott_gate::DriftavbrottGate;
use std::sync::Arc;
use tower::Layer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let source = Arc::new(RestWindowSource {
        base_url: cfg.service_url.clone(),
        timeout_ms: std::env::var("DRIFTAVBROTT_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(2500),
        client: reqwest::Client::new(),
    });
    let gate = DriftavbrottGate::new(source, cfg.gate.clone());

    let routes = Router::new()
        .route("/", get(start_page))
        .route("/avbrott", get(error_page))
        .route("/actuator/health", get(health));

    // The gate wraps the router so a blocking window can rewrite the URI and
    // have it re-routed to the error page.
    let app = from_fn_with_state(gate, enforce).layer(routes);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;
    Ok(())
}

async fn start_page() -> Html<&'static str> {
    Html("<html><head><title>Demo</title></head><body><h1>Välkommen</h1><p>Tjänsten är igång.</p></body></html>")
}

async fn error_page(context: Option<Extension<BlockContext>>) -> Html<String> {
    let body = match context {
        Some(Extension(ctx)) => format!(
            "<html><head><title>Driftavbrott</title></head><body>\
             <h1>Driftavbrott pågår</h1>\
             <p>Nyckel: {}</p><p>Period: {} - {}</p>\
             </body></html>",
            ctx.meddelande_key, ctx.start, ctx.slut
        ),
        None => "<html><head><title>Driftavbrott</title></head><body>\
                 <h1>Inget pågående driftavbrott</h1>\
                 </body></html>"
            .to_string(),
    };
    Html(body)
}

async fn health() -> (axum::http::StatusCode, &'static str) {
    (axum::http::StatusCode::OK, "ok")
}
