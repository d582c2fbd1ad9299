use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::middleware::from_fn_with_state;
use axum::response::{Html, Response};
use axum::routing::get;
use axum::{Extension, Router};
use driftavbrott_gate::config::GateConfig;
use driftavbrott_gate::domain::driftavbrott::Driftavbrott;
use driftavbrott_gate::http::middleware::driftavbrott::{enforce, BlockContext};
use driftavbrott_gate::messages::MessageCatalog;
use driftavbrott_gate::source::mock::MockWindowSource;
use driftavbrott_gate::DriftavbrottGate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower::{Layer, ServiceExt};

#[tokio::test]
async fn no_window_lets_requests_through() {
    let hits = Arc::new(AtomicBool::new(false));
    let source = Arc::new(MockWindowSource::returning(None));
    let gate = DriftavbrottGate::new(source, test_config());

    let response = send(&gate, demo_router(hits.clone()), get_request("/")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(hits.load(Ordering::SeqCst));
    let body = body_text(response).await;
    assert!(body.contains("<h1>start</h1>"));
    assert!(!body.contains("bg-warning"));
    assert!(!body.contains("bg-info"));
}

#[tokio::test]
async fn blocking_window_forwards_to_the_error_page() {
    let hits = Arc::new(AtomicBool::new(false));
    let source = Arc::new(MockWindowSource::returning(Some(window(
        "sys.produktionssattning",
    ))));
    let gate = DriftavbrottGate::new(source, test_config());

    let response = send(&gate, demo_router(hits.clone()), get_request("/")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!hits.load(Ordering::SeqCst), "protected handler must not run");
    let body = body_text(response).await;
    assert!(body.contains("sys.produktionssattning"));
    assert!(body.contains("2024-01-01 10:00:00"));
    assert!(body.contains("2024-01-01 12:00:00"));
}

#[tokio::test]
async fn announce_window_prepends_a_banner() {
    let hits = Arc::new(AtomicBool::new(false));
    let source = Arc::new(MockWindowSource::returning(Some(window(
        "sys.produktionssattning.info",
    ))));
    let gate = DriftavbrottGate::new(source, test_config());

    let response = send(&gate, demo_router(hits.clone()), get_request("/")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(hits.load(Ordering::SeqCst));

    let content_length: usize = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap();
    let body = body_text(response).await;
    assert_eq!(content_length, body.len());

    let banner_at = body
        .find("<div class=\"bg-info pt-2 pb-2 text-center\">")
        .unwrap();
    let heading_at = body.find("<h1>start</h1>").unwrap();
    assert!(banner_at < heading_at, "banner must lead the body");
    assert!(body.contains("Stängt för underhåll."));
}

#[tokio::test]
async fn warn_window_uses_the_warning_tone() {
    let source = Arc::new(MockWindowSource::returning(Some(window(
        "sys.produktionssattning.warn",
    ))));
    let gate = DriftavbrottGate::new(source, test_config());

    let response = send(
        &gate,
        demo_router(Arc::new(AtomicBool::new(false))),
        get_request("/"),
    )
    .await;

    let body = body_text(response).await;
    assert!(body.contains("<div class=\"bg-warning pt-2 pb-2 text-center\">"));
}

#[tokio::test]
async fn excluded_paths_bypass_a_blocking_window() {
    let source = Arc::new(MockWindowSource::returning(Some(window(
        "sys.produktionssattning",
    ))));
    let gate = DriftavbrottGate::new(source, test_config());

    let response = send(
        &gate,
        demo_router(Arc::new(AtomicBool::new(false))),
        get_request("/actuator/health"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn excluded_paths_skip_annotation_under_an_announce_window() {
    let source = Arc::new(MockWindowSource::returning(Some(window("sys.info"))));
    let gate = DriftavbrottGate::new(source, test_config());

    let response = send(
        &gate,
        demo_router(Arc::new(AtomicBool::new(false))),
        get_request("/actuator/health"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert_eq!(body, "ok", "excluded path must pass untouched");
    assert!(!body.contains("bg-info"));
}

#[tokio::test]
async fn accept_language_switches_the_banner_language() {
    let source = Arc::new(MockWindowSource::returning(Some(window("sys.info"))));
    let gate = DriftavbrottGate::new(source, test_config());

    let request = Request::builder()
        .uri("/")
        .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .body(Body::empty())
        .unwrap();
    let response = send(&gate, demo_router(Arc::new(AtomicBool::new(false))), request).await;

    let body = body_text(response).await;
    assert!(body.contains("Closed for maintenance."));
    assert!(!body.contains("Stängt"));
}

#[tokio::test]
async fn response_content_language_wins_over_accept_language() {
    let source = Arc::new(MockWindowSource::returning(Some(window("sys.info"))));
    let gate = DriftavbrottGate::new(source, test_config());

    let request = Request::builder()
        .uri("/en")
        .header(header::ACCEPT_LANGUAGE, "sv")
        .body(Body::empty())
        .unwrap();
    let response = send(&gate, demo_router(Arc::new(AtomicBool::new(false))), request).await;

    let body = body_text(response).await;
    assert!(body.contains("Closed for maintenance."));
}

#[tokio::test]
async fn catalog_template_beats_the_window_message() {
    let source = Arc::new(MockWindowSource::returning(Some(window("sys.info"))));
    let gate = DriftavbrottGate::new(source, test_config()).with_catalog(
        MessageCatalog::default().with_entry("sv", "sys.info", "Underhåll pågår till {1}."),
    );

    let response = send(
        &gate,
        demo_router(Arc::new(AtomicBool::new(false))),
        get_request("/"),
    )
    .await;

    let body = body_text(response).await;
    assert!(body.contains("Underhåll pågår till 2024-01-01 12:00:00."));
}

#[tokio::test]
async fn annotation_preserves_the_downstream_status() {
    let source = Arc::new(MockWindowSource::returning(Some(window("sys.info"))));
    let gate = DriftavbrottGate::new(source, test_config());

    let response = send(
        &gate,
        demo_router(Arc::new(AtomicBool::new(false))),
        get_request("/missing"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("bg-info"));
}

#[tokio::test]
async fn unreachable_source_fails_open() {
    let hits = Arc::new(AtomicBool::new(false));
    let source = Arc::new(MockWindowSource::unavailable());
    let gate = DriftavbrottGate::new(source, test_config());

    let response = send(&gate, demo_router(hits.clone()), get_request("/")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(hits.load(Ordering::SeqCst));
}

#[tokio::test]
async fn error_page_renders_without_a_window() {
    let source = Arc::new(MockWindowSource::returning(None));
    let gate = DriftavbrottGate::new(source, test_config());

    let response = send(
        &gate,
        demo_router(Arc::new(AtomicBool::new(false))),
        get_request("/avbrott"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("no window"));
}

#[tokio::test]
async fn requests_share_one_fetch_within_the_ttl() {
    let hits = Arc::new(AtomicBool::new(false));
    let source = Arc::new(MockWindowSource::returning(None));
    let gate = DriftavbrottGate::new(source.clone(), test_config());

    send(&gate, demo_router(hits.clone()), get_request("/")).await;
    send(&gate, demo_router(hits.clone()), get_request("/")).await;

    assert_eq!(source.calls(), 1);
}

fn demo_router(hits: Arc<AtomicBool>) -> Router {
    Router::new()
        .route(
            "/",
            get(move || {
                let hits = hits.clone();
                async move {
                    hits.store(true, Ordering::SeqCst);
                    Html("<html><head></head><body><h1>start</h1></body></html>")
                }
            }),
        )
        .route(
            "/en",
            get(|| async {
                (
                    [(header::CONTENT_LANGUAGE, "en")],
                    Html("<html><head></head><body><p>english page</p></body></html>"),
                )
            }),
        )
        .route(
            "/avbrott",
            get(|context: Option<Extension<BlockContext>>| async move {
                match context {
                    Some(Extension(ctx)) => Html(format!(
                        "<html><head></head><body><p>{} {} - {}</p></body></html>",
                        ctx.meddelande_key, ctx.start, ctx.slut
                    )),
                    None => {
                        Html("<html><head></head><body><p>no window</p></body></html>".to_string())
                    }
                }
            }),
        )
        .route("/actuator/health", get(|| async { "ok" }))
}

async fn send(gate: &DriftavbrottGate, router: Router, request: Request<Body>) -> Response {
    let app = from_fn_with_state(gate.clone(), enforce).layer(router);
    app.oneshot(request).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn test_config() -> GateConfig {
    GateConfig {
        excludes: vec!["/actuator".to_string()],
        kanaler: vec!["sys.produktionssattning".to_string()],
        sida: "/avbrott".to_string(),
        system: "demo".to_string(),
        marginal: 0,
        lang: None,
    }
}

fn window(kanal: &str) -> Driftavbrott {
    Driftavbrott {
        kanal: kanal.to_string(),
        start: "2024-01-01T10:00:00".parse().unwrap(),
        slut: "2024-01-01T12:00:00".parse().unwrap(),
        meddelande_sv: "Stängt för underhåll.".to_string(),
        meddelande_en: "Closed for maintenance.".to_string(),
    }
}
