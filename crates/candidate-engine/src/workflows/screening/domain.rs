use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

/// Identifier wrapper for candidate profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

/// Structured job posting consumed by the screening pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub job_id: JobId,
    pub title: String,
    /// Country the role is based in; drives work-authorization checks.
    pub country: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub sub_industry: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub desired_candidate_profile: Option<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    pub min_experience_years: u32,
    #[serde(default)]
    pub max_experience_years: Option<u32>,
    pub salary_min: u32,
    pub salary_max: u32,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub required_education: Option<String>,
    /// Empty means the posting carries no nationality restriction.
    #[serde(default)]
    pub accepted_nationalities: Vec<String>,
    #[serde(default)]
    pub require_gcc_experience: bool,
}

impl JobPosting {
    /// Midpoint of the advertised salary band, `None` for degenerate bands.
    pub fn salary_midpoint(&self) -> Option<f64> {
        if self.salary_max > self.salary_min {
            Some((self.salary_min as f64 + self.salary_max as f64) / 2.0)
        } else {
            None
        }
    }

    /// False only when both sides declare different currencies.
    pub fn currency_matches(&self, candidate: &CandidateProfile) -> bool {
        match (self.currency.as_deref(), candidate.currency.as_deref()) {
            (Some(offered), Some(asked)) => same_text(offered, asked),
            _ => true,
        }
    }

    /// Candidate's expected salary when it can be compared against this band.
    pub fn comparable_salary(&self, candidate: &CandidateProfile) -> Option<f64> {
        let expected = candidate.expected_salary?;
        self.currency_matches(candidate).then(|| f64::from(expected))
    }
}

/// Candidate profile as produced by upstream intake (CV parsing, forms).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub candidate_id: CandidateId,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub current_country: Option<String>,
    #[serde(default)]
    pub visa_status: Option<String>,
    /// Raw visa expiry as supplied; parsed lazily so malformed values can be reported.
    #[serde(default)]
    pub visa_expiry: Option<String>,
    #[serde(default)]
    pub expected_salary: Option<u32>,
    #[serde(default)]
    pub current_salary: Option<u32>,
    #[serde(default)]
    pub currency: Option<String>,
    pub total_experience_years: f64,
    #[serde(default)]
    pub gcc_experience_years: Option<f64>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub education_level: Option<String>,
    #[serde(default)]
    pub education_history: Vec<EducationRecord>,
    #[serde(default)]
    pub employment_history: Vec<EmploymentRecord>,
    #[serde(default)]
    pub employment_summary: Option<String>,
    #[serde(default)]
    pub cv_text: Option<String>,
}

impl CandidateProfile {
    pub fn gcc_years(&self) -> f64 {
        self.gcc_experience_years.unwrap_or(0.0).max(0.0)
    }

    /// Highest recognised education level across the headline level and the history.
    pub fn highest_education(&self) -> Option<EducationLevel> {
        let headline = self
            .education_level
            .as_deref()
            .and_then(EducationLevel::parse);
        let history = self
            .education_history
            .iter()
            .filter_map(|record| EducationLevel::parse(&record.level))
            .max();
        headline.max(history)
    }

    /// Education record carrying the highest recognised level.
    pub fn highest_education_record(&self) -> Option<&EducationRecord> {
        self.education_history
            .iter()
            .filter_map(|record| EducationLevel::parse(&record.level).map(|level| (level, record)))
            .max_by(|(left, _), (right, _)| left.cmp(right))
            .map(|(_, record)| record)
    }
}

/// One entry in the candidate's employment history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentRecord {
    pub title: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    /// `YYYY-MM`, `YYYY-MM-DD` or RFC 3339.
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationRecord {
    pub level: String,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub graduation_year: Option<u16>,
}

/// Ordinal education hierarchy; a higher level always satisfies a lower requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    HighSchool,
    Diploma,
    Bachelors,
    Masters,
    Doctorate,
}

impl EducationLevel {
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return None;
        }

        let words: Vec<&str> = normalized
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|word| !word.is_empty())
            .collect();
        let has_word = |candidates: &[&str]| words.iter().any(|word| candidates.contains(word));

        if normalized.contains("doctor") || has_word(&["phd", "dphil"]) {
            Some(Self::Doctorate)
        } else if normalized.contains("master") || has_word(&["mba", "msc", "ma", "mtech", "meng"]) {
            Some(Self::Masters)
        } else if normalized.contains("bachelor") || has_word(&["bsc", "ba", "btech", "beng", "bcom"]) {
            Some(Self::Bachelors)
        } else if normalized.contains("diploma") {
            Some(Self::Diploma)
        } else if normalized.contains("high school") || normalized.contains("secondary") {
            Some(Self::HighSchool)
        } else {
            None
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            EducationLevel::HighSchool => "High School",
            EducationLevel::Diploma => "Diploma",
            EducationLevel::Bachelors => "Bachelors",
            EducationLevel::Masters => "Masters",
            EducationLevel::Doctorate => "PhD",
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolved right-to-work of a candidate for a specific job country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkAuthorization {
    Citizen,
    PermanentResident,
    WorkVisa,
    /// A declared status that does not permit employment (visit visa, dependant, ...).
    Restricted(String),
    Unknown,
}

impl WorkAuthorization {
    pub fn resolve(candidate: &CandidateProfile, job_country: &str) -> Self {
        match candidate.visa_status.as_deref().map(str::trim) {
            Some(status) if !status.is_empty() => Self::from_status(status),
            _ => {
                let citizen = candidate
                    .nationality
                    .as_deref()
                    .is_some_and(|nationality| same_text(nationality, job_country));
                if citizen {
                    Self::Citizen
                } else {
                    Self::Unknown
                }
            }
        }
    }

    fn from_status(status: &str) -> Self {
        let normalized = status.to_ascii_lowercase();
        if normalized.contains("citizen") || normalized == "national" {
            Self::Citizen
        } else if normalized.contains("permanent resident") || normalized == "pr" {
            Self::PermanentResident
        } else if normalized.contains("work visa")
            || normalized.contains("work permit")
            || normalized.contains("employment visa")
        {
            Self::WorkVisa
        } else {
            Self::Restricted(status.to_string())
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(
            self,
            WorkAuthorization::Citizen
                | WorkAuthorization::PermanentResident
                | WorkAuthorization::WorkVisa
        )
    }
}

/// Case-insensitive, whitespace-trimmed comparison used by eligibility checks.
pub(crate) fn same_text(left: &str, right: &str) -> bool {
    left.trim().eq_ignore_ascii_case(right.trim())
}
