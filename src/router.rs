use axum::{
    http::{HeaderValue, Request, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use hyper::header::CONTENT_TYPE;
use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};
use tower::ServiceBuilder;
use tower_http::{
    normalize_path::NormalizePathLayer,
    request_id::{MakeRequestId, RequestId},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
    timeout::TimeoutLayer,
    trace::{
        DefaultOnBodyChunk, DefaultOnEos, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse,
        TraceLayer,
    },
    LatencyUnit, ServiceBuilderExt,
};
use tracing::Level;

use crate::{responses::ErrorMessage, state::AppState};

pub fn get_router(state: AppState, routes: Router<AppState>) -> Router {
    let sensitive_headers: Arc<[_]> = vec![http::header::AUTHORIZATION].into();
    let middleware = ServiceBuilder::new()
        .layer(NormalizePathLayer::trim_trailing_slash())
        // Bearer tokens must not show up in logs
        .layer(SetSensitiveRequestHeadersLayer::from_shared(
            sensitive_headers.clone(),
        ))
        .set_x_request_id(CountingRequestId::default())
        .layer(
            TraceLayer::new_for_http()
                .on_request(DefaultOnRequest::new())
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Micros),
                )
                .on_body_chunk(DefaultOnBodyChunk::new())
                .on_eos(DefaultOnEos::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::INFO)),
        )
        .sensitive_response_headers(sensitive_headers)
        .layer(TimeoutLayer::new(Duration::from_secs(10)))
        .compression()
        .propagate_x_request_id()
        .insert_response_header_if_not_present(
            CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        );

    Router::new()
        .merge(routes)
        .route("/metrics", get(render_metrics))
        .fallback(error_404)
        .layer(middleware)
        .with_state(state)
}

#[derive(Clone, Default)]
struct CountingRequestId {
    counter: Arc<AtomicU64>,
}

impl MakeRequestId for CountingRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        self.counter
            .fetch_add(1, Ordering::SeqCst)
            .to_string()
            .parse()
            .ok()
            .map(RequestId::new)
    }
}

async fn render_metrics(state: AppState) -> String {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

async fn error_404() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorMessage::new("Nothing to see here".to_owned())),
    )
        .into_response()
}
