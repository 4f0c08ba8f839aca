use crate::cli::ServeArgs;
use crate::infra::{build_service, load_criteria_file, load_profiles_file, ApiService, AppState};
use crate::routes::with_sadhana_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use sadhana::config::{AppConfig, ScoringConfig};
use sadhana::error::AppError;
use sadhana::telemetry;
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

    let profiles = match args.profiles.as_deref() {
        Some(path) => load_profiles_file(path)?,
        None => Vec::new(),
    };
    let service = Arc::new(build_service(profiles));
    seed_configuration(&service, &config.scoring)?;

    let app = with_sadhana_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        mode = config.scoring.default_mode.label(),
        "sadhana scoring service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Writes the startup scoring mode and any criteria file into the store.
pub(crate) fn seed_configuration(
    service: &ApiService,
    scoring: &ScoringConfig,
) -> Result<(), AppError> {
    service.set_scoring_mode(scoring.default_mode)?;

    if let Some(path) = scoring.criteria_file.as_deref() {
        let overrides = load_criteria_file(path)?;
        info!(
            path = %path.display(),
            batches = overrides.len(),
            "loading batch criteria overrides"
        );
        for (batch, criteria) in overrides {
            service.save_criteria(&batch, criteria)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sadhana::scoring::criteria::{CriteriaSource, ScoringMode};
    use std::io::Write;

    #[test]
    fn seeds_mode_and_overrides() {
        let path = std::env::temp_dir().join(format!("sadhana-seed-{}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).expect("temp file created");
        file.write_all(br#"{"Arjuna": {"name": "Arjuna", "readingMinimum": 75}}"#)
            .expect("temp file written");

        let service = build_service(Vec::new());
        let scoring = ScoringConfig {
            default_mode: ScoringMode::WeeklyConsolidated,
            criteria_file: Some(path.clone()),
        };
        seed_configuration(&service, &scoring).expect("configuration seeded");
        std::fs::remove_file(&path).ok();

        assert_eq!(service.scoring_mode(), ScoringMode::WeeklyConsolidated);
        let resolved = service.criteria("arjuna");
        assert_eq!(resolved.source, CriteriaSource::Override);
        assert_eq!(resolved.criteria.reading_minimum, 75);
    }

    #[test]
    fn missing_criteria_file_fails_startup() {
        let service = build_service(Vec::new());
        let scoring = ScoringConfig {
            default_mode: ScoringMode::PerEntry,
            criteria_file: Some("/nonexistent/sadhana/criteria.json".into()),
        };

        assert!(matches!(
            seed_configuration(&service, &scoring),
            Err(AppError::Io(_))
        ));
    }
}
