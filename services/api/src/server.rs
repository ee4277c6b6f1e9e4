use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryInterviewRepository, LoggingNotifier};
use crate::routes::with_interview_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hr_console::config::AppConfig;
use hr_console::error::AppError;
use hr_console::telemetry;
use hr_console::workflows::interviews::InterviewService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
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

    let rubric = config.rubric.load()?;
    info!(
        criteria = rubric.criterion_count(),
        max_total = rubric.max_total(),
        source = ?config.rubric.path,
        "scoring rubric loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryInterviewRepository::default());
    let notifier = Arc::new(LoggingNotifier::default());
    let interview_service = Arc::new(InterviewService::new(repository, notifier, rubric));

    let app = with_interview_routes(interview_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "interview console ready");

    axum::serve(listener, app).await?;
    Ok(())
}
