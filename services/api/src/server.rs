use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryDecisionStore};
use crate::routes::with_underwriting_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lendwise::config::AppConfig;
use lendwise::error::AppError;
use lendwise::telemetry;
use lendwise::workflows::underwriting::{UnderwritingService, UnderwritingTables};
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryDecisionStore::default());
    let underwriting_service = Arc::new(UnderwritingService::with_settings(
        store,
        UnderwritingTables::standard(),
        config.underwriting,
    ));

    let app = with_underwriting_routes(underwriting_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        record_decisions = config.underwriting.record_decisions,
        "underwriting service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
