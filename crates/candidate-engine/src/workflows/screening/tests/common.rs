use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use axum::Router;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::screening::domain::{
    CandidateId, CandidateProfile, EducationRecord, EmploymentRecord, JobId, JobPosting,
};
use crate::workflows::screening::evaluation::{
    EvaluationEngine, EvaluationRequest, EvaluationResult, ScreeningConfig,
};
use crate::workflows::screening::signals::{
    SectionDetail, SectionName, SectionSignal, SignalError, SignalScorer, SignalScores,
};
use crate::workflows::screening::{screening_router, ScreeningService};

pub(super) fn evaluated_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

/// Mid-band GCC logistics role: 5-10 years, 12k-18k AED, bachelors required.
pub(super) fn job() -> JobPosting {
    JobPosting {
        job_id: JobId("job-ops-001".to_string()),
        title: "Warehouse Operations Manager".to_string(),
        country: "UAE".to_string(),
        industry: Some("Logistics".to_string()),
        sub_industry: Some("Warehousing".to_string()),
        description: Some("Run warehouse operations, inventory control and fleet planning".to_string()),
        desired_candidate_profile: Some("Hands-on operations leader with WMS exposure".to_string()),
        required_skills: vec![
            "WMS".to_string(),
            "Inventory Control".to_string(),
            "Fleet Management".to_string(),
        ],
        preferred_skills: vec!["SAP".to_string()],
        min_experience_years: 5,
        max_experience_years: Some(10),
        salary_min: 12_000,
        salary_max: 18_000,
        currency: Some("AED".to_string()),
        required_education: Some("Bachelors".to_string()),
        accepted_nationalities: Vec::new(),
        require_gcc_experience: true,
    }
}

pub(super) fn role(
    title: &str,
    industry: &str,
    start: &str,
    end: Option<&str>,
) -> EmploymentRecord {
    EmploymentRecord {
        title: title.to_string(),
        company: Some("Acme Distribution".to_string()),
        industry: Some(industry.to_string()),
        start: Some(start.to_string()),
        end: end.map(str::to_string),
        is_current: end.is_none(),
    }
}

/// Eligible candidate that triggers no contextual rule on its own.
pub(super) fn candidate() -> CandidateProfile {
    CandidateProfile {
        candidate_id: CandidateId("cand-001".to_string()),
        nationality: Some("Indian".to_string()),
        current_country: Some("UAE".to_string()),
        visa_status: Some("Work Visa".to_string()),
        visa_expiry: Some("2027-01-01".to_string()),
        expected_salary: Some(17_000),
        current_salary: Some(15_000),
        currency: Some("AED".to_string()),
        total_experience_years: 7.0,
        gcc_experience_years: Some(2.0),
        skills: vec!["WMS".to_string(), "Inventory Control".to_string()],
        education_level: Some("Bachelors".to_string()),
        education_history: vec![EducationRecord {
            level: "Bachelors".to_string(),
            field_of_study: Some("Mechanical Engineering".to_string()),
            institution: Some("Anna University".to_string()),
            graduation_year: Some(2016),
        }],
        employment_history: vec![
            role("Operations Supervisor", "Retail", "2018-01", Some("2021-12")),
            role("Operations Supervisor", "Retail", "2022-01", None),
        ],
        employment_summary: Some("Operations supervisor in retail distribution".to_string()),
        cv_text: Some("Seven years running retail distribution centres".to_string()),
    }
}

pub(super) fn signals(skills: u8, experience: u8, semantic: u8, domain: u8) -> SignalScores {
    SignalScores::new()
        .with(SectionName::Skills, SectionSignal::new(skills, "Skills assessed"))
        .with(
            SectionName::Experience,
            SectionSignal::new(experience, "Experience assessed"),
        )
        .with(SectionName::Semantic, SectionSignal::new(semantic, "Profile fit assessed"))
        .with(SectionName::Domain, SectionSignal::new(domain, "Domain assessed"))
}

pub(super) fn skills_detail(
    matched_required: &[&str],
    missing_required: &[&str],
    matched_preferred: &[&str],
    missing_preferred: &[&str],
) -> SectionDetail {
    let owned = |items: &[&str]| items.iter().map(|item| item.to_string()).collect();
    SectionDetail {
        matched_required: owned(matched_required),
        missing_required: owned(missing_required),
        matched_preferred: owned(matched_preferred),
        missing_preferred: owned(missing_preferred),
    }
}

pub(super) fn with_skills_detail(mut scores: SignalScores, detail: SectionDetail) -> SignalScores {
    let skills = scores
        .get(SectionName::Skills)
        .cloned()
        .expect("skills signal present");
    scores.insert(SectionName::Skills, skills.with_detail(detail));
    scores
}

pub(super) fn perfect_skills() -> SectionDetail {
    skills_detail(&["WMS", "Inventory Control", "Fleet Management"], &[], &["SAP"], &[])
}

pub(super) fn engine() -> EvaluationEngine {
    engine_with(ScreeningConfig::default())
}

pub(super) fn engine_with(config: ScreeningConfig) -> EvaluationEngine {
    EvaluationEngine::new(config).expect("valid screening config")
}

pub(super) fn request(job: JobPosting, candidate: CandidateProfile) -> EvaluationRequest {
    EvaluationRequest {
        job,
        candidate,
        evaluated_on: evaluated_on(),
    }
}

pub(super) fn evaluate(
    job: JobPosting,
    candidate: CandidateProfile,
    scores: &SignalScores,
) -> EvaluationResult {
    engine()
        .evaluate_with_signals(&request(job, candidate), scores)
        .expect("evaluation succeeds")
}

pub(super) fn adjustment_codes(result: &EvaluationResult) -> Vec<&str> {
    result
        .adjustments
        .iter()
        .map(|adjustment| adjustment.rule_code.as_str())
        .collect()
}

/// Scorer that counts invocations and returns fixed signals.
#[derive(Debug)]
pub(super) struct CountingScorer {
    calls: AtomicUsize,
    scores: SignalScores,
}

impl CountingScorer {
    pub(super) fn new(scores: SignalScores) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            scores,
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SignalScorer for CountingScorer {
    fn score(
        &self,
        _job: &JobPosting,
        _candidate: &CandidateProfile,
    ) -> Result<SignalScores, SignalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.scores.clone())
    }
}

/// Scorer standing in for an unreachable model service.
#[derive(Debug, Default)]
pub(super) struct OfflineScorer;

impl SignalScorer for OfflineScorer {
    fn score(
        &self,
        _job: &JobPosting,
        _candidate: &CandidateProfile,
    ) -> Result<SignalScores, SignalError> {
        Err(SignalError::Unavailable {
            scorer: "semantic".to_string(),
            reason: "embedding model offline".to_string(),
        })
    }
}

pub(super) fn service_with<S>(scorer: S) -> Arc<ScreeningService<S>>
where
    S: SignalScorer + 'static,
{
    Arc::new(ScreeningService::new(engine(), Arc::new(scorer)))
}

pub(super) fn router_with<S>(scorer: S) -> Router
where
    S: SignalScorer + 'static,
{
    screening_router(service_with(scorer))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
