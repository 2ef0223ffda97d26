use crate::infra::{baseline_service, read_json, BaselineService};
use candidate_engine::config::AppConfig;
use candidate_engine::error::AppError;
use candidate_engine::workflows::screening::{
    CandidateId, CandidateProfile, Decision, EducationRecord, EmploymentRecord, EvaluationResult,
    JobId, JobPosting, ProfilesView, ScreeningConfig, ScreeningRequest,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Job posting JSON file
    #[arg(long)]
    pub(crate) job: PathBuf,
    /// Candidate profile JSON file
    #[arg(long)]
    pub(crate) candidate: PathBuf,
    /// Optional precomputed section signals JSON file (skips the baseline scorer)
    #[arg(long)]
    pub(crate) signals: Option<PathBuf>,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long = "on", value_parser = crate::infra::parse_date)]
    pub(crate) evaluated_on: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long = "on", value_parser = crate::infra::parse_date)]
    pub(crate) evaluated_on: Option<NaiveDate>,
    /// Print the rule trace for every candidate.
    #[arg(long)]
    pub(crate) trace: bool,
    /// Emit the shortlist as JSON instead of the text summary.
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        job,
        candidate,
        signals,
        evaluated_on,
    } = args;

    let request = ScreeningRequest {
        job: read_json(&job)?,
        candidate: read_json(&candidate)?,
        evaluated_on,
        signals: signals.as_deref().map(read_json).transpose()?,
    };

    let service = baseline_service(AppConfig::load()?.screening)?;
    let result = service.evaluate(request)?;
    println!("{}", to_pretty_json(&result)?);
    Ok(())
}

pub(crate) fn run_profiles() -> Result<(), AppError> {
    let service = baseline_service(AppConfig::load()?.screening)?;
    let view = ProfilesView::from_service(&service);

    println!("Weight profiles (skills / experience / semantic / domain)");
    for (band, weights) in &view.profiles {
        println!(
            "- {:<10} {:.2} / {:.2} / {:.2} / {:.2}",
            band, weights.skills, weights.experience, weights.semantic, weights.domain
        );
    }
    let thresholds = view.decision_thresholds;
    println!(
        "Decision thresholds: strong >= {} | potential >= {} | weak >= {}",
        thresholds.strong, thresholds.potential, thresholds.weak
    );
    Ok(())
}

#[derive(Debug, Serialize)]
struct ShortlistEntry<'a> {
    label: &'a str,
    candidate_id: &'a str,
    decision: Decision,
    adjusted_score: u8,
    base_score: u8,
    rejection_reason: Option<&'a str>,
    confidence: Option<&'a str>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        evaluated_on,
        trace,
        json,
    } = args;
    let evaluated_on = evaluated_on.unwrap_or_else(|| Local::now().date_naive());

    let service = baseline_service(ScreeningConfig::default())?;
    let job = demo_job();
    let outcomes = screen_shortlist(&service, &job, evaluated_on)?;

    if json {
        let entries: Vec<ShortlistEntry<'_>> = outcomes
            .iter()
            .map(|(label, result)| ShortlistEntry {
                label,
                candidate_id: &result.candidate_id.0,
                decision: result.decision,
                adjusted_score: result.adjusted_score,
                base_score: result.base_score,
                rejection_reason: result.rejection_reason.as_deref(),
                confidence: result.confidence.as_ref().map(|metrics| metrics.level.label()),
            })
            .collect();
        println!("{}", to_pretty_json(&entries)?);
        return Ok(());
    }

    println!("Candidate screening demo");
    println!(
        "Role: {} ({}) | {}-{} years | {}-{} {}",
        job.title,
        job.country,
        job.min_experience_years,
        job.max_experience_years.unwrap_or(job.min_experience_years),
        job.salary_min,
        job.salary_max,
        job.currency.as_deref().unwrap_or("")
    );
    println!("Evaluated on: {evaluated_on}");

    for (label, result) in &outcomes {
        render_result(label, result, trace);
    }
    Ok(())
}

fn screen_shortlist(
    service: &BaselineService,
    job: &JobPosting,
    evaluated_on: NaiveDate,
) -> Result<Vec<(&'static str, EvaluationResult)>, AppError> {
    demo_candidates()
        .into_iter()
        .map(|(label, candidate)| {
            let result = service.evaluate(ScreeningRequest {
                job: job.clone(),
                candidate,
                evaluated_on: Some(evaluated_on),
                signals: None,
            })?;
            Ok((label, result))
        })
        .collect()
}

fn render_result(label: &str, result: &EvaluationResult, trace: bool) {
    println!("\n{label} ({})", result.candidate_id.0);
    println!("  Decision: {} - {}", result.decision, result.decision.summary());

    if let Some(reason) = result.rejection_reason.as_deref() {
        println!(
            "  Rejected by {}: {}",
            result.rejection_rule_code.as_deref().unwrap_or("-"),
            reason
        );
    } else {
        println!(
            "  Score: {} base -> {} adjusted ({} profile)",
            result.base_score,
            result.adjusted_score,
            result.weight_profile.as_deref().unwrap_or("-")
        );
        for section in &result.section_scores {
            println!("  - {:<10} {:>3}  {}", section.name, section.score, section.explanation);
        }
        for adjustment in &result.adjustments {
            println!(
                "  {:+} {} ({})",
                adjustment.impact, adjustment.rule_name, adjustment.reason
            );
        }
        for interaction in &result.interactions {
            println!(
                "  {:+.2} {} ({})",
                interaction.impact,
                interaction.interaction_type.code(),
                interaction.description
            );
        }
        if let Some(confidence) = &result.confidence {
            println!(
                "  Confidence: {} ({:.2})",
                confidence.level.label(),
                confidence.score
            );
            if !confidence.uncertainty_factors.is_empty() {
                println!("  Uncertainty: {}", confidence.uncertainty_factors.join(", "));
            }
        }
    }

    if trace {
        println!("  Trace: {}", result.rule_trace.join(" > "));
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|source| AppError::Input {
        path: "<stdout>".to_string(),
        source,
    })
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn demo_job() -> JobPosting {
    JobPosting {
        job_id: JobId("demo-wh-ops".to_string()),
        title: "Warehouse Operations Manager".to_string(),
        country: "UAE".to_string(),
        industry: Some("Logistics".to_string()),
        sub_industry: Some("Warehousing".to_string()),
        description: Some(
            "Lead warehouse operations across Jebel Ali hubs: inventory control, WMS, fleet scheduling and safety"
                .to_string(),
        ),
        desired_candidate_profile: Some(
            "Operations manager with GCC warehousing background and SAP exposure".to_string(),
        ),
        required_skills: strings(&["WMS", "Inventory Control", "Fleet Management"]),
        preferred_skills: strings(&["SAP", "Lean Six Sigma"]),
        min_experience_years: 5,
        max_experience_years: Some(10),
        salary_min: 15_000,
        salary_max: 22_000,
        currency: Some("AED".to_string()),
        required_education: Some("Bachelors".to_string()),
        accepted_nationalities: Vec::new(),
        require_gcc_experience: true,
    }
}

fn employment(title: &str, industry: &str, start: &str, end: Option<&str>) -> EmploymentRecord {
    EmploymentRecord {
        title: title.to_string(),
        company: None,
        industry: Some(industry.to_string()),
        start: Some(start.to_string()),
        end: end.map(str::to_string),
        is_current: end.is_none(),
    }
}

fn bachelors(field: &str) -> Vec<EducationRecord> {
    vec![EducationRecord {
        level: "Bachelors".to_string(),
        field_of_study: Some(field.to_string()),
        institution: None,
        graduation_year: None,
    }]
}

fn demo_candidates() -> Vec<(&'static str, CandidateProfile)> {
    let seasoned = CandidateProfile {
        candidate_id: CandidateId("demo-001".to_string()),
        nationality: Some("Jordanian".to_string()),
        current_country: Some("UAE".to_string()),
        visa_status: Some("Work Visa".to_string()),
        visa_expiry: None,
        expected_salary: Some(19_000),
        current_salary: Some(17_500),
        currency: Some("AED".to_string()),
        total_experience_years: 9.0,
        gcc_experience_years: Some(8.5),
        skills: strings(&["WMS", "Inventory Control", "Fleet Management", "SAP"]),
        education_level: Some("Bachelors".to_string()),
        education_history: bachelors("Supply Chain Management"),
        employment_history: vec![
            employment("Warehouse Supervisor", "Logistics", "2016-04", Some("2020-08")),
            employment("Warehouse Operations Manager", "Logistics", "2020-09", None),
        ],
        employment_summary: Some("Warehousing operations manager at a Jebel Ali 3PL".to_string()),
        cv_text: Some("Runs inventory control, WMS and fleet scheduling for three hubs".to_string()),
    };

    let expensive = CandidateProfile {
        candidate_id: CandidateId("demo-002".to_string()),
        expected_salary: Some(32_000),
        current_salary: Some(28_000),
        ..seasoned.clone()
    };

    let career_changer = CandidateProfile {
        candidate_id: CandidateId("demo-003".to_string()),
        nationality: Some("Indian".to_string()),
        expected_salary: Some(16_000),
        current_salary: Some(14_000),
        total_experience_years: 8.0,
        gcc_experience_years: Some(2.0),
        skills: strings(&["Inventory Control", "Budgeting"]),
        education_history: bachelors("Hospitality Management"),
        employment_history: vec![
            employment("Front Office Supervisor", "Hospitality", "2017-01", Some("2021-12")),
            employment("Hotel Operations Manager", "Hospitality", "2022-01", None),
        ],
        employment_summary: Some("Hotel operations manager moving into logistics".to_string()),
        cv_text: None,
        ..seasoned.clone()
    };

    let sparse = CandidateProfile {
        candidate_id: CandidateId("demo-004".to_string()),
        nationality: Some("Filipino".to_string()),
        visa_expiry: None,
        expected_salary: None,
        current_salary: None,
        total_experience_years: 6.0,
        gcc_experience_years: Some(1.0),
        skills: strings(&["WMS"]),
        education_history: Vec::new(),
        employment_history: Vec::new(),
        employment_summary: None,
        cv_text: Some("Warehouse coordinator".to_string()),
        ..seasoned.clone()
    };

    vec![
        ("Seasoned GCC operator", seasoned),
        ("Over-budget operator", expensive),
        ("Hospitality career changer", career_changer),
        ("Thin profile", sparse),
    ]
}
