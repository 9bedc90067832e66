use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};
use wheel_of_life::config::AppConfig;
use wheel_of_life::error::AppError;
use wheel_of_life::mail::{ResultsMailer, SmtpMailTransport};
use wheel_of_life::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if let Err(err) = config.mail.sender() {
        warn!(error = %err, "results email disabled until sender credentials are provided");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let transport = Arc::new(SmtpMailTransport::from_config(&config.mail));
    let smtp_host = config.mail.smtp_host.clone();
    let mailer = Arc::new(ResultsMailer::new(config.mail, transport));

    let app = with_assessment_routes(mailer)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, %smtp_host, "wheel of life service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
