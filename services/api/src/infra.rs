use candidate_engine::config::ConfigError;
use candidate_engine::error::AppError;
use candidate_engine::workflows::screening::{
    BaselineSignalScorer, EvaluationEngine, ScreeningConfig, ScreeningService,
};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type BaselineService = ScreeningService<BaselineSignalScorer>;

/// Screening service backed by the deterministic baseline scorer.
pub(crate) fn baseline_service(config: ScreeningConfig) -> Result<Arc<BaselineService>, AppError> {
    let engine = EvaluationEngine::new(config).map_err(ConfigError::Screening)?;
    Ok(Arc::new(ScreeningService::new(
        engine,
        Arc::new(BaselineSignalScorer::new()),
    )))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Reads and deserializes a JSON document from disk.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|source| AppError::Input {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use candidate_engine::workflows::screening::JobPosting;

    #[test]
    fn parse_date_reports_the_bad_value() {
        let err = parse_date("01/06/2025").expect_err("non-ISO date");
        assert!(err.contains("'01/06/2025'"), "{err}");
        assert_eq!(
            parse_date(" 2025-06-01 ").expect("valid date"),
            NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
        );
    }

    #[test]
    fn read_json_names_the_offending_file() {
        let path = std::env::temp_dir().join(format!("screening-job-{}.json", std::process::id()));
        std::fs::write(&path, "{ \"job_id\": ").expect("write fixture");

        let result = read_json::<JobPosting>(&path);
        std::fs::remove_file(&path).ok();

        match result {
            Err(AppError::Input { path: reported, .. }) => {
                assert_eq!(reported, path.display().to_string());
            }
            other => panic!("expected input error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_configuration_is_a_config_error() {
        let mut config = ScreeningConfig::default();
        config.decision_thresholds.weak = 90;

        match baseline_service(config) {
            Err(AppError::Config(ConfigError::Screening(_))) => {}
            Err(other) => panic!("expected screening config error, got {other:?}"),
            Ok(_) => panic!("expected screening config error, got a service"),
        }
    }
}
