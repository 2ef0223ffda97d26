use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::config::ScreeningConfig;
use crate::workflows::screening::domain::{
    same_text, CandidateProfile, EducationLevel, JobPosting, WorkAuthorization,
};
use crate::workflows::screening::timeline::parse_date;

pub(crate) const PASSED_ALL_HARD_RULES: &str = "PASSED_ALL_HARD_RULES";

/// Eligibility rules evaluated, in catalog order, before any scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardRule {
    LocationAuthorization,
    VisaExpiry,
    SalaryCeiling,
    MinimumExperience,
    MaximumExperience,
    Nationality,
    Education,
    GccExperience,
}

/// Result of one rule predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleVerdict {
    Passed,
    Failed(String),
    /// Input was missing or malformed; the rule neither passes nor rejects.
    Skipped { uncertainty: &'static str },
}

impl HardRule {
    pub const CATALOG: [HardRule; 8] = [
        HardRule::LocationAuthorization,
        HardRule::VisaExpiry,
        HardRule::SalaryCeiling,
        HardRule::MinimumExperience,
        HardRule::MaximumExperience,
        HardRule::Nationality,
        HardRule::Education,
        HardRule::GccExperience,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            HardRule::LocationAuthorization => "HR-001",
            HardRule::VisaExpiry => "HR-002",
            HardRule::SalaryCeiling => "HR-003",
            HardRule::MinimumExperience => "HR-004",
            HardRule::MaximumExperience => "HR-005",
            HardRule::Nationality => "HR-006",
            HardRule::Education => "HR-007",
            HardRule::GccExperience => "HR-008",
        }
    }

    pub const fn check_event(self) -> &'static str {
        match self {
            HardRule::LocationAuthorization => "CHECKING_LOCATION_AND_VISA",
            HardRule::VisaExpiry => "CHECKING_VISA_EXPIRY",
            HardRule::SalaryCeiling => "CHECKING_SALARY",
            HardRule::MinimumExperience => "CHECKING_MIN_EXPERIENCE",
            HardRule::MaximumExperience => "CHECKING_MAX_EXPERIENCE",
            HardRule::Nationality => "CHECKING_NATIONALITY",
            HardRule::Education => "CHECKING_EDUCATION",
            HardRule::GccExperience => "CHECKING_GCC_EXPERIENCE",
        }
    }

    /// Evaluates this rule in isolation. Total: never panics, never errors.
    pub fn check(
        self,
        job: &JobPosting,
        candidate: &CandidateProfile,
        config: &ScreeningConfig,
        evaluated_on: NaiveDate,
    ) -> RuleVerdict {
        match self {
            HardRule::LocationAuthorization => check_authorization(job, candidate),
            HardRule::VisaExpiry => check_visa_expiry(job, candidate, config, evaluated_on),
            HardRule::SalaryCeiling => check_salary(job, candidate, config),
            HardRule::MinimumExperience => check_minimum_experience(job, candidate),
            HardRule::MaximumExperience => check_maximum_experience(job, candidate, config),
            HardRule::Nationality => check_nationality(job, candidate),
            HardRule::Education => check_education(job, candidate),
            HardRule::GccExperience => check_gcc_experience(job, candidate),
        }
    }
}

fn or_unspecified(value: Option<&str>) -> &str {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or("Not specified")
}

fn money(amount: u32, currency: Option<&str>) -> String {
    match currency.map(str::trim).filter(|code| !code.is_empty()) {
        Some(code) => format!("{amount} {code}"),
        None => amount.to_string(),
    }
}

fn check_authorization(job: &JobPosting, candidate: &CandidateProfile) -> RuleVerdict {
    if WorkAuthorization::resolve(candidate, &job.country).is_accepted() {
        return RuleVerdict::Passed;
    }
    RuleVerdict::Failed(format!(
        "Candidate does not have work authorization for {}. Current location: {}, Visa status: {}",
        job.country,
        or_unspecified(candidate.current_country.as_deref()),
        or_unspecified(candidate.visa_status.as_deref()),
    ))
}

fn check_visa_expiry(
    job: &JobPosting,
    candidate: &CandidateProfile,
    config: &ScreeningConfig,
    evaluated_on: NaiveDate,
) -> RuleVerdict {
    let Some(raw) = candidate
        .visa_expiry
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
    else {
        // Only a visa-dependent right to work needs an expiry on file.
        return match WorkAuthorization::resolve(candidate, &job.country) {
            WorkAuthorization::WorkVisa => RuleVerdict::Skipped {
                uncertainty: "missing_visa_expiry",
            },
            _ => RuleVerdict::Passed,
        };
    };
    let Some(expiry) = parse_date(raw) else {
        return RuleVerdict::Skipped {
            uncertainty: "unparseable_visa_expiry",
        };
    };

    let days_remaining = (expiry - evaluated_on).num_days();
    if days_remaining < i64::from(config.visa_expiry_warning_days) {
        RuleVerdict::Failed(format!(
            "Candidate's visa expires within {} days (Expiry: {expiry})",
            config.visa_expiry_warning_days
        ))
    } else {
        RuleVerdict::Passed
    }
}

fn check_salary(
    job: &JobPosting,
    candidate: &CandidateProfile,
    config: &ScreeningConfig,
) -> RuleVerdict {
    let Some(expected) = candidate.expected_salary else {
        return RuleVerdict::Skipped {
            uncertainty: "missing_expected_salary",
        };
    };
    if !job.currency_matches(candidate) {
        return RuleVerdict::Skipped {
            uncertainty: "salary_currency_mismatch",
        };
    }

    let ceiling = f64::from(job.salary_max) * (1.0 + config.salary_tolerance_percent / 100.0);
    if f64::from(expected) > ceiling {
        RuleVerdict::Failed(format!(
            "Candidate expected salary ({}) exceeds job maximum ({}) by more than {}%",
            money(expected, candidate.currency.as_deref()),
            money(job.salary_max, job.currency.as_deref()),
            config.salary_tolerance_percent
        ))
    } else {
        RuleVerdict::Passed
    }
}

fn check_minimum_experience(job: &JobPosting, candidate: &CandidateProfile) -> RuleVerdict {
    if candidate.total_experience_years >= f64::from(job.min_experience_years) {
        return RuleVerdict::Passed;
    }
    RuleVerdict::Failed(format!(
        "Candidate experience ({} years) is below minimum requirement ({} years)",
        candidate.total_experience_years, job.min_experience_years
    ))
}

fn check_maximum_experience(
    job: &JobPosting,
    candidate: &CandidateProfile,
    config: &ScreeningConfig,
) -> RuleVerdict {
    let Some(max) = job.max_experience_years else {
        return RuleVerdict::Passed;
    };
    let limit = f64::from(max) + config.max_experience_tolerance_years;
    if candidate.total_experience_years <= limit {
        return RuleVerdict::Passed;
    }
    RuleVerdict::Failed(format!(
        "Candidate is overqualified ({} years exceeds maximum of {} years by more than {} years)",
        candidate.total_experience_years, max, config.max_experience_tolerance_years
    ))
}

fn check_nationality(job: &JobPosting, candidate: &CandidateProfile) -> RuleVerdict {
    if job.accepted_nationalities.is_empty() {
        return RuleVerdict::Passed;
    }
    let accepted = candidate.nationality.as_deref().is_some_and(|nationality| {
        job.accepted_nationalities
            .iter()
            .any(|allowed| same_text(allowed, nationality))
    });
    if accepted {
        return RuleVerdict::Passed;
    }
    RuleVerdict::Failed(format!(
        "Job requires specific nationality. Candidate nationality: {}, Required: {}",
        or_unspecified(candidate.nationality.as_deref()),
        job.accepted_nationalities.join(", ")
    ))
}

fn check_education(job: &JobPosting, candidate: &CandidateProfile) -> RuleVerdict {
    let Some(raw_required) = job
        .required_education
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
    else {
        return RuleVerdict::Passed;
    };
    let Some(required) = EducationLevel::parse(raw_required) else {
        return RuleVerdict::Skipped {
            uncertainty: "unrecognized_required_education",
        };
    };

    match candidate.highest_education() {
        Some(level) if level >= required => RuleVerdict::Passed,
        held => RuleVerdict::Failed(format!(
            "Candidate education ({}) does not meet minimum requirement ({})",
            held.map_or("Not specified", EducationLevel::label),
            required
        )),
    }
}

fn check_gcc_experience(job: &JobPosting, candidate: &CandidateProfile) -> RuleVerdict {
    if !job.require_gcc_experience || candidate.gcc_years() > 0.0 {
        return RuleVerdict::Passed;
    }
    RuleVerdict::Failed("Job requires prior GCC work experience, but candidate has none".to_string())
}

/// Rule that halted the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardRejection {
    pub rule: HardRule,
    pub reason: String,
}

impl HardRejection {
    pub fn rule_code(&self) -> &'static str {
        self.rule.code()
    }
}

/// Outcome of the hard rejection stage together with its audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RejectionReport {
    pub rejection: Option<HardRejection>,
    pub trace: Vec<String>,
    pub uncertainty_factors: Vec<String>,
}

impl RejectionReport {
    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }
}

/// Fail-fast evaluator over [`HardRule::CATALOG`].
#[derive(Debug, Clone, Copy)]
pub struct HardRejectionEngine<'a> {
    config: &'a ScreeningConfig,
}

impl<'a> HardRejectionEngine<'a> {
    pub fn new(config: &'a ScreeningConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(
        &self,
        job: &JobPosting,
        candidate: &CandidateProfile,
        evaluated_on: NaiveDate,
    ) -> RejectionReport {
        let mut report = RejectionReport::default();

        for rule in HardRule::CATALOG {
            let code = rule.code();
            if !self.config.hard_rules.is_enabled(rule) {
                report.trace.push(format!("{code}:DISABLED"));
                continue;
            }

            report.trace.push(format!("{code}:{}", rule.check_event()));
            match rule.check(job, candidate, self.config, evaluated_on) {
                RuleVerdict::Passed => {
                    debug!(rule = code, "hard rule passed");
                    report.trace.push(format!("{code}:PASSED"));
                }
                RuleVerdict::Skipped { uncertainty } => {
                    warn!(rule = code, uncertainty, "hard rule skipped");
                    report.trace.push(format!("{code}:SKIPPED"));
                    report.uncertainty_factors.push(uncertainty.to_string());
                }
                RuleVerdict::Failed(reason) => {
                    debug!(rule = code, %reason, "hard rule failed");
                    report.trace.push(format!("{code}:FAILED"));
                    report.rejection = Some(HardRejection { rule, reason });
                    return report;
                }
            }
        }

        report.trace.push(PASSED_ALL_HARD_RULES.to_string());
        report
    }
}
