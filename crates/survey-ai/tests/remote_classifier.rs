//! Exercises the remote classifier adapter against throwaway local servers:
//! success mapping, retry exhaustion into the keyword fallback, and the
//! short-text short circuit that must not touch the network at all.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use serde_json::json;

use survey_ai::workflows::surveys::submissions::analysis::{
    RemoteSentimentClassifier, RetryPolicy, SentimentClassifier, SentimentLabel, VerdictSource,
};

async fn spawn_stub<H, F>(handler: H) -> (SocketAddr, Arc<AtomicUsize>)
where
    H: Fn(usize) -> F + Clone + Send + Sync + 'static,
    F: IntoResponse + Send + 'static,
{
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();

    let app = Router::new().route(
        "/classify",
        post(move || {
            let handler = handler.clone();
            let seen = seen.clone();
            async move {
                let attempt = seen.fetch_add(1, Ordering::SeqCst);
                handler(attempt)
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub serves");
    });

    (addr, calls)
}

fn classifier_for(addr: SocketAddr, attempts: u32) -> RemoteSentimentClassifier {
    RemoteSentimentClassifier::new(
        format!("http://{addr}/classify"),
        "glm-4-flash".to_string(),
        Duration::from_secs(2),
        RetryPolicy::without_delay(attempts),
    )
    .expect("client builds")
}

#[tokio::test]
async fn successful_calls_map_the_remote_label_space() {
    let (addr, calls) = spawn_stub(|_| {
        (
            StatusCode::OK,
            axum::Json(json!({ "label": "NEGATIVE", "confidence": 0.91 })),
        )
    })
    .await;
    let classifier = classifier_for(addr, 3);

    let verdict = classifier
        .classify("O atendimento demorou demais")
        .await;

    assert_eq!(verdict.label, SentimentLabel::Negative);
    assert!((verdict.confidence - 0.91).abs() < 1e-9);
    assert_eq!(verdict.source, VerdictSource::RemoteModel);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unrecognized_labels_default_to_neutral() {
    let (addr, _) = spawn_stub(|_| {
        (
            StatusCode::OK,
            axum::Json(json!({ "label": "mixed", "confidence": 0.7 })),
        )
    })
    .await;
    let classifier = classifier_for(addr, 3);

    let verdict = classifier.classify("Comentário qualquer sobre o curso").await;

    assert_eq!(verdict.label, SentimentLabel::Neutral);
    assert_eq!(verdict.source, VerdictSource::RemoteModel);
}

#[tokio::test]
async fn persistent_failures_fall_back_after_exactly_three_attempts() {
    let (addr, calls) = spawn_stub(|_| (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(json!({}))))
        .await;
    let classifier = classifier_for(addr, 3);

    let verdict = classifier
        .classify("Achei tudo muito confuso e perdi tempo")
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(verdict.source, VerdictSource::LocalFallback);
    // two negative keywords put the fallback at Negative@0.8
    assert_eq!(verdict.label, SentimentLabel::Negative);
    assert!((verdict.confidence - 0.8).abs() < 1e-9);
}

#[tokio::test]
async fn malformed_payloads_are_treated_as_transient_failures() {
    let (addr, calls) = spawn_stub(|_| (StatusCode::OK, "not json at all")).await;
    let classifier = classifier_for(addr, 3);

    let verdict = classifier.classify("Comentário neutro sobre o curso").await;

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(verdict.source, VerdictSource::LocalFallback);
    assert_eq!(verdict.label, SentimentLabel::Neutral);
}

#[tokio::test]
async fn a_later_attempt_can_still_succeed() {
    let (addr, calls) = spawn_stub(|attempt| {
        if attempt < 2 {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                axum::Json(json!({ "error": "warming up" })),
            )
                .into_response()
        } else {
            (
                StatusCode::OK,
                axum::Json(json!({ "label": "positive", "confidence": 0.88 })),
            )
                .into_response()
        }
    })
    .await;
    let classifier = classifier_for(addr, 3);

    let verdict = classifier.classify("Gostei bastante do formato").await;

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(verdict.label, SentimentLabel::Positive);
    assert_eq!(verdict.source, VerdictSource::RemoteModel);
}

#[tokio::test]
async fn connection_refused_degrades_to_the_fallback() {
    // bind then drop the listener so the port is closed
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let classifier = classifier_for(addr, 3);
    let verdict = classifier.classify("excelente e didático, recomendo").await;

    assert_eq!(verdict.source, VerdictSource::LocalFallback);
    assert_eq!(verdict.label, SentimentLabel::Positive);
}

#[tokio::test]
async fn short_text_never_reaches_the_network() {
    let (addr, calls) = spawn_stub(|_| {
        (
            StatusCode::OK,
            axum::Json(json!({ "label": "positive", "confidence": 0.9 })),
        )
    })
    .await;
    let classifier = classifier_for(addr, 3);

    let verdict = classifier.classify("ok").await;

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(verdict.label, SentimentLabel::Neutral);
    assert!((verdict.confidence - 0.5).abs() < 1e-9);
    assert_eq!(verdict.source, VerdictSource::LocalFallback);
}
