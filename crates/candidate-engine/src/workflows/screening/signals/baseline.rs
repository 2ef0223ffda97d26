use std::collections::BTreeSet;

use super::{SectionDetail, SectionName, SectionSignal, SignalError, SignalScorer, SignalScores};
use crate::workflows::screening::domain::{CandidateProfile, JobPosting};

const REQUIRED_SKILL_SHARE: f64 = 0.7;
const PREFERRED_SKILL_SHARE: f64 = 0.3;

const STOPWORDS: &[&str] = &[
    "and", "the", "for", "with", "from", "into", "our", "you", "your", "are", "will", "who",
    "have", "has", "this", "that", "all", "any", "can", "per", "etc", "role", "team", "work",
    "years", "year", "experience",
];

/// Deterministic keyword scorer covering every section.
///
/// Skills are matched case-insensitively, experience is graded against the
/// job's band, domain fit compares industries and semantic fit measures
/// vocabulary overlap between the posting and the candidate's narrative.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineSignalScorer;

impl BaselineSignalScorer {
    pub fn new() -> Self {
        Self
    }
}

impl SignalScorer for BaselineSignalScorer {
    fn score(
        &self,
        job: &JobPosting,
        candidate: &CandidateProfile,
    ) -> Result<SignalScores, SignalError> {
        Ok(SignalScores::new()
            .with(SectionName::Skills, score_skills(job, candidate))
            .with(SectionName::Experience, score_experience(job, candidate))
            .with(SectionName::Semantic, score_semantic(job, candidate))
            .with(SectionName::Domain, score_domain(job, candidate)))
    }
}

fn normalize(term: &str) -> String {
    term.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn partition(wanted: &[String], held: &BTreeSet<String>) -> (Vec<String>, Vec<String>) {
    wanted
        .iter()
        .filter(|skill| !skill.trim().is_empty())
        .cloned()
        .partition(|skill| held.contains(&normalize(skill)))
}

fn percentage(matched: usize, total: usize) -> Option<f64> {
    (total > 0).then(|| matched as f64 / total as f64 * 100.0)
}

fn to_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

fn score_skills(job: &JobPosting, candidate: &CandidateProfile) -> SectionSignal {
    let held: BTreeSet<String> = candidate.skills.iter().map(|skill| normalize(skill)).collect();
    let (matched_required, missing_required) = partition(&job.required_skills, &held);
    let (matched_preferred, missing_preferred) = partition(&job.preferred_skills, &held);

    let required = percentage(
        matched_required.len(),
        matched_required.len() + missing_required.len(),
    );
    let preferred = percentage(
        matched_preferred.len(),
        matched_preferred.len() + missing_preferred.len(),
    );

    let (score, explanation) = match (required, preferred) {
        (None, None) => (100.0, "Job lists no skills to match".to_string()),
        (Some(required), None) => (
            required,
            format!(
                "Matched {}/{} required skills",
                matched_required.len(),
                matched_required.len() + missing_required.len()
            ),
        ),
        (None, Some(preferred)) => (
            preferred,
            format!(
                "Matched {}/{} preferred skills",
                matched_preferred.len(),
                matched_preferred.len() + missing_preferred.len()
            ),
        ),
        (Some(required), Some(preferred)) => (
            REQUIRED_SKILL_SHARE * required + PREFERRED_SKILL_SHARE * preferred,
            format!(
                "Matched {}/{} required and {}/{} preferred skills",
                matched_required.len(),
                matched_required.len() + missing_required.len(),
                matched_preferred.len(),
                matched_preferred.len() + missing_preferred.len()
            ),
        ),
    };

    SectionSignal::new(to_score(score), explanation).with_detail(SectionDetail {
        matched_required,
        missing_required,
        matched_preferred,
        missing_preferred,
    })
}

fn score_experience(job: &JobPosting, candidate: &CandidateProfile) -> SectionSignal {
    let years = candidate.total_experience_years.max(0.0);
    let min = f64::from(job.min_experience_years);

    if years < min {
        let score = if min > 0.0 { years / min * 70.0 } else { 0.0 };
        return SectionSignal::new(
            to_score(score),
            format!("{years:.1} years is below the {min:.0} year minimum"),
        );
    }

    let Some(max) = job.max_experience_years.map(f64::from) else {
        return SectionSignal::new(100, format!("{years:.1} years meets the {min:.0} year minimum"));
    };

    if years > max {
        return SectionSignal::new(
            85,
            format!("{years:.1} years exceeds the {min:.0}-{max:.0} year range"),
        );
    }

    let span = max - min;
    let score = if span > 0.0 {
        70.0 + 30.0 * (years - min) / span
    } else {
        100.0
    };
    SectionSignal::new(
        to_score(score),
        format!("{years:.1} years within the {min:.0}-{max:.0} year range"),
    )
}

fn score_domain(job: &JobPosting, candidate: &CandidateProfile) -> SectionSignal {
    let Some(industry) = job.industry.as_deref().map(normalize).filter(|value| !value.is_empty())
    else {
        return SectionSignal::new(75, "Job does not specify an industry");
    };

    let mut background: Vec<String> = candidate
        .employment_history
        .iter()
        .filter_map(|record| record.industry.as_deref())
        .map(normalize)
        .collect();
    if let Some(summary) = candidate.employment_summary.as_deref() {
        background.push(normalize(summary));
    }
    let mentions = |needle: &str| background.iter().any(|entry| entry.contains(needle));

    let sub_industry = job
        .sub_industry
        .as_deref()
        .map(normalize)
        .filter(|value| !value.is_empty());

    let mut detail = SectionDetail::default();
    let industry_match = mentions(&industry);
    if industry_match {
        detail.matched_required.push(industry.clone());
    } else {
        detail.missing_required.push(industry.clone());
    }
    let sub_industry_match = match &sub_industry {
        Some(sub) if mentions(sub) => {
            detail.matched_preferred.push(sub.clone());
            true
        }
        Some(sub) => {
            detail.missing_preferred.push(sub.clone());
            false
        }
        None => false,
    };

    let (score, explanation) = match (industry_match, sub_industry_match) {
        (true, true) => (95, format!("Background in {industry} and its sub-sector")),
        (true, false) => (85, format!("Background in {industry}")),
        _ => (75, format!("No recorded background in {industry}")),
    };
    SectionSignal::new(score, explanation).with_detail(detail)
}

fn terms(texts: &[&str]) -> BTreeSet<String> {
    texts
        .iter()
        .copied()
        .flat_map(|text| text.split(|c: char| !c.is_alphanumeric()))
        .map(str::to_lowercase)
        .filter(|token| token.chars().count() >= 3 && !STOPWORDS.contains(&token.as_str()))
        .collect()
}

fn score_semantic(job: &JobPosting, candidate: &CandidateProfile) -> SectionSignal {
    let mut job_text: Vec<&str> = vec![job.title.as_str()];
    job_text.extend(job.description.as_deref());
    job_text.extend(job.desired_candidate_profile.as_deref());

    let mut candidate_text: Vec<&str> = candidate
        .employment_history
        .iter()
        .map(|record| record.title.as_str())
        .collect();
    candidate_text.extend(candidate.employment_summary.as_deref());
    candidate_text.extend(candidate.cv_text.as_deref());

    let job_terms = terms(&job_text);
    let candidate_terms = terms(&candidate_text);
    if job_terms.is_empty() || candidate_terms.is_empty() {
        return SectionSignal::new(50, "Not enough text for a semantic comparison");
    }

    let shared: Vec<String> = job_terms.intersection(&candidate_terms).cloned().collect();
    let coverage = shared.len() as f64 / job_terms.len() as f64;
    let score = to_score(30.0 + 70.0 * coverage);

    SectionSignal::new(
        score,
        format!(
            "Candidate narrative covers {}/{} posting terms",
            shared.len(),
            job_terms.len()
        ),
    )
    .with_detail(SectionDetail {
        matched_required: shared,
        ..SectionDetail::default()
    })
}
