use crate::annotate::annotate_html;
use crate::domain::driftavbrott::Driftavbrott;
use crate::evaluate::{evaluate, is_excluded, Outcome};
use crate::messages::{resolve_locale, resolve_message};
use crate::DriftavbrottGate;
use axum::body::{to_bytes, Body};
use axum::extract::State;
use axum::http::{header, HeaderValue, Request, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::Response;

/// Attributes the error page receives on an internal forward.
#[derive(Debug, Clone)]
pub struct BlockContext {
    pub meddelande_key: String,
    pub start: String,
    pub slut: String,
    pub driftavbrott: Driftavbrott,
}

/// Gate middleware. Apply it around the router (`from_fn_with_state(gate,
/// enforce).layer(router)`, not `Router::layer`) so the blocking branch can
/// rewrite the URI and have it re-routed to the error page.
pub async fn enforce(
    State(gate): State<DriftavbrottGate>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let window = gate.cache.maybe_refresh().await;
    let path = request.uri().path().to_string();

    match evaluate(window, Some(&path), &gate.config.excludes) {
        Outcome::Pass => {
            if is_excluded(&gate.config.excludes, Some(&path)) {
                tracing::debug!("path '{path}' is exempt from driftavbrott");
            } else {
                tracing::debug!("access to '{path}' is allowed");
            }
            next.run(request).await
        }
        Outcome::Block(avbrott) => {
            tracing::info!(
                "access to '{path}' is limited by a driftavbrott on kanal {} active {} - {} (marginal {} min)",
                avbrott.kanal,
                avbrott.start_text(),
                avbrott.slut_text(),
                gate.config.marginal
            );
            forward_to_error_page(&gate, avbrott, request, next).await
        }
        Outcome::Annotate(avbrott) => {
            let accept_language = request
                .headers()
                .get(header::ACCEPT_LANGUAGE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            let response = next.run(request).await;

            match annotate_response(&gate, &avbrott, accept_language.as_deref(), response).await {
                Ok(annotated) => annotated,
                Err(e) => {
                    tracing::error!("could not annotate response with driftavbrott message: {e}");
                    plain_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "driftavbrott annotation failed",
                    )
                }
            }
        }
    }
}

async fn forward_to_error_page(
    gate: &DriftavbrottGate,
    avbrott: Driftavbrott,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let sida: Uri = match gate.config.sida.parse() {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!("configured error page '{}' is not a valid uri: {e}", gate.config.sida);
            return plain_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "driftavbrott error page misconfigured",
            );
        }
    };

    request.extensions_mut().insert(BlockContext {
        meddelande_key: avbrott.kanal.clone(),
        start: avbrott.start_text(),
        slut: avbrott.slut_text(),
        driftavbrott: avbrott,
    });
    *request.uri_mut() = sida;

    next.run(request).await
}

async fn annotate_response(
    gate: &DriftavbrottGate,
    avbrott: &Driftavbrott,
    accept_language: Option<&str>,
    response: Response,
) -> anyhow::Result<Response> {
    let (mut parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX).await?;
    let text = String::from_utf8(bytes.to_vec())?;

    let content_language = parts
        .headers
        .get(header::CONTENT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let locale = resolve_locale(
        gate.config.lang.as_ref(),
        content_language.as_deref(),
        accept_language,
    );
    let message = resolve_message(&gate.catalog, avbrott, &locale);

    let annotated = annotate_html(&text, &message, avbrott.severity())?;

    parts.headers.remove(header::TRANSFER_ENCODING);
    parts
        .headers
        .insert(header::CONTENT_LENGTH, HeaderValue::from(annotated.len()));
    Ok(Response::from_parts(parts, Body::from(annotated)))
}

fn plain_response(status: StatusCode, text: &'static str) -> Response {
    Response::builder()
        .status(status)
        .body(Body::from(text))
        .unwrap_or_else(|_| Response::new(Body::from(text)))
}
