use crate::cli::ServeArgs;
use crate::infra::{default_analysis_config, AppState, InMemorySurveyRepository, TracingAlertNotifier};
use crate::routes::with_submission_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use survey_ai::config::AppConfig;
use survey_ai::error::AppError;
use survey_ai::telemetry;
use survey_ai::workflows::surveys::submissions::{
    RemoteSentimentClassifier, SurveySubmissionService,
};
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemorySurveyRepository::default());
    let notifier = Arc::new(TracingAlertNotifier);
    let classifier = RemoteSentimentClassifier::from_config(&config.classifier)?;
    let submission_service = Arc::new(SurveySubmissionService::new(
        repository,
        notifier,
        classifier,
        default_analysis_config(),
    ));

    let app = with_submission_routes(submission_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        model = %config.classifier.model,
        "survey sentiment service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
