//! End-to-end screening scenarios driven through the public service facade and
//! HTTP router, using intake-shaped JSON payloads and the baseline scorer.

mod common {
    use std::sync::Arc;

    use candidate_engine::workflows::screening::{
        BaselineSignalScorer, EvaluationEngine, ScreeningConfig, ScreeningRequest,
        ScreeningService,
    };
    use serde_json::{json, Value};

    pub(super) fn job_payload() -> Value {
        json!({
            "job_id": "job-wh-204",
            "title": "Warehouse Operations Manager",
            "country": "Saudi Arabia",
            "industry": "Logistics",
            "sub_industry": "Warehousing",
            "description": "Lead warehouse operations, inventory control and fleet scheduling across regional hubs",
            "required_skills": ["WMS", "Inventory Control", "Fleet Management"],
            "preferred_skills": ["SAP"],
            "min_experience_years": 5,
            "max_experience_years": 10,
            "salary_min": 14000,
            "salary_max": 20000,
            "currency": "SAR",
            "required_education": "Bachelor's degree",
            "require_gcc_experience": true
        })
    }

    pub(super) fn candidate_payload() -> Value {
        json!({
            "candidate_id": "cand-7781",
            "nationality": "Egyptian",
            "current_country": "Saudi Arabia",
            "visa_status": "Work Visa",
            "visa_expiry": "2027-03-31",
            "expected_salary": 19000,
            "current_salary": 16500,
            "currency": "SAR",
            "total_experience_years": 7.5,
            "gcc_experience_years": 5.0,
            "skills": ["wms", "Inventory   Control", "Fleet Management", "SAP"],
            "education_level": "Bachelor of Commerce",
            "education_history": [
                { "level": "Bachelor of Commerce", "field_of_study": "Accounting", "graduation_year": 2015 }
            ],
            "employment_history": [
                { "title": "Warehouse Supervisor", "industry": "Logistics", "start": "2017-09", "end": "2021-02" },
                { "title": "Warehouse Manager", "industry": "Logistics", "start": "2021-03", "is_current": true }
            ],
            "employment_summary": "Warehousing operations lead for a third-party logistics provider",
            "cv_text": "Runs inventory control, WMS rollouts and fleet scheduling for regional warehouse hubs"
        })
    }

    pub(super) fn request_payload() -> Value {
        json!({
            "job": job_payload(),
            "candidate": candidate_payload(),
            "evaluated_on": "2025-06-01"
        })
    }

    pub(super) fn request() -> ScreeningRequest {
        serde_json::from_value(request_payload()).expect("valid screening request")
    }

    pub(super) fn service() -> Arc<ScreeningService<BaselineSignalScorer>> {
        let engine = EvaluationEngine::new(ScreeningConfig::default()).expect("valid config");
        Arc::new(ScreeningService::new(engine, Arc::new(BaselineSignalScorer::new())))
    }
}

use axum::http::StatusCode;
use candidate_engine::workflows::screening::{
    Decision, EvaluationEngine, ScreeningConfig, SectionName,
};
use common::*;
use tower::ServiceExt;

#[test]
fn baseline_scorer_screens_intake_payloads_end_to_end() {
    let result = service().evaluate(request()).expect("evaluation succeeds");

    assert!(!result.is_rejected);
    assert_eq!(result.weight_profile.as_deref(), Some("mid"));
    let section = |name: SectionName| {
        result
            .section_scores
            .iter()
            .find(|section| section.name == name)
            .expect("section present")
    };
    assert_eq!(section(SectionName::Skills).score, 100);
    assert_eq!(section(SectionName::Experience).score, 85);
    assert_eq!(section(SectionName::Domain).score, 95);

    let codes: Vec<&str> = result
        .adjustments
        .iter()
        .map(|adjustment| adjustment.rule_code.as_str())
        .collect();
    assert!(codes.contains(&"GCC_EXP_BONUS"), "{codes:?}");
    assert!(codes.contains(&"PERFECT_SKILLS"), "{codes:?}");
    assert!(codes.contains(&"CAREER_PROGRESSION"), "{codes:?}");
    assert!(codes.contains(&"INDUSTRY_CONTINUITY"), "{codes:?}");
    assert!(result.adjusted_score <= 100);
    assert!(matches!(
        result.decision,
        Decision::StrongMatch | Decision::PotentialMatch
    ));
    assert!(result.confidence.is_some());
}

#[test]
fn rejection_reasons_reach_callers() {
    let mut payload = request_payload();
    payload["candidate"]["visa_status"] = "Visit Visa".into();
    let request = serde_json::from_value(payload).expect("valid screening request");

    let result = service().evaluate(request).expect("rejection is a result");

    assert_eq!(result.decision, Decision::Rejected);
    assert_eq!(result.rejection_rule_code.as_deref(), Some("HR-001"));
    assert_eq!(
        result.rejection_reason.as_deref(),
        Some("Candidate does not have work authorization for Saudi Arabia. Current location: Saudi Arabia, Visa status: Visit Visa")
    );
}

#[test]
fn results_are_reproducible_for_a_fixed_date() {
    let first = service().evaluate(request()).expect("first evaluation");
    let second = service().evaluate(request()).expect("second evaluation");

    assert_eq!(
        serde_json::to_string(&first).expect("serialize"),
        serde_json::to_string(&second).expect("serialize")
    );
}

#[test]
fn partial_configuration_files_fill_in_defaults() {
    let config: ScreeningConfig = serde_json::from_str(
        r#"{
            "salary_tolerance_percent": 20,
            "decision_thresholds": { "strong": 80, "potential": 55, "weak": 35 },
            "hard_rules": { "enable_gcc_experience": false }
        }"#,
    )
    .expect("config parses");

    assert_eq!(config.max_experience_tolerance_years, 3.0);
    assert!(config.hard_rules.enable_salary);
    assert!(!config.hard_rules.enable_gcc_experience);
    EvaluationEngine::new(config).expect("config validates");

    let typo = serde_json::from_str::<ScreeningConfig>(r#"{ "salary_tolerence_percent": 20 }"#);
    assert!(typo.is_err());
}

#[tokio::test]
async fn http_surface_serves_evaluations() {
    let router = candidate_engine::workflows::screening::screening_router(service());

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/screening/evaluations")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&request_payload()).expect("serialize"),
                ))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("body");
    let payload: serde_json::Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(payload["candidate_id"], "cand-7781");
    assert_eq!(payload["is_rejected"], false);
    assert!(payload["rule_trace"]
        .as_array()
        .expect("trace array")
        .iter()
        .any(|entry| entry == "PASSED_ALL_HARD_RULES"));
}
