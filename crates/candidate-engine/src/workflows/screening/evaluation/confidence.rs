use serde::{Deserialize, Serialize};

use super::aggregation::ScoreSheet;
use super::config::DecisionThresholds;
use super::round_to;
use crate::workflows::screening::domain::CandidateProfile;

pub const COMPLETENESS_WEIGHT: f64 = 0.40;
pub const AGREEMENT_WEIGHT: f64 = 0.35;
pub const BOUNDARY_WEIGHT: f64 = 0.25;

const COMPLETENESS_FLOOR: f64 = 0.8;
const AGREEMENT_FLOOR: f64 = 0.6;
const BOUNDARY_FLOOR: f64 = 0.3;

/// Coefficient of variation at which agreement reaches zero.
const MAX_TOLERATED_VARIATION: f64 = 0.5;
/// Points from a threshold at which a decision counts as fully clear of it.
const BOUNDARY_SPAN: f64 = 10.0;
/// Ceiling applied when a critical field is absent; sits below the `medium` cutoff.
const CRITICAL_GAP_CEILING: f64 = 0.5;

/// Fields without which no reading may rise above `low`.
const CRITICAL_FIELDS: [&str; 3] = ["skills", "expected_salary", "employment_history"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.85 {
            ConfidenceLevel::VeryHigh
        } else if score >= 0.70 {
            ConfidenceLevel::High
        } else if score >= 0.55 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
            ConfidenceLevel::VeryHigh => "very_high",
        }
    }
}

/// Certainty in a scored decision, independent of the score itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceMetrics {
    pub level: ConfidenceLevel,
    pub score: f64,
    pub uncertainty_factors: Vec<String>,
    pub completeness: f64,
    pub agreement: f64,
    pub boundary_distance: f64,
    pub missing_fields: Vec<String>,
}

fn filled(value: Option<&str>) -> bool {
    value.is_some_and(|value| !value.trim().is_empty())
}

/// Fraction of the informative-field checklist present on the profile, plus the missing names.
pub fn completeness(candidate: &CandidateProfile) -> (f64, Vec<&'static str>) {
    let checklist = [
        ("skills", !candidate.skills.is_empty()),
        ("expected_salary", candidate.expected_salary.is_some()),
        ("current_salary", candidate.current_salary.is_some()),
        ("current_country", filled(candidate.current_country.as_deref())),
        ("visa_status", filled(candidate.visa_status.as_deref())),
        ("nationality", filled(candidate.nationality.as_deref())),
        ("employment_history", !candidate.employment_history.is_empty()),
        (
            "education",
            filled(candidate.education_level.as_deref()) || !candidate.education_history.is_empty(),
        ),
        ("gcc_experience", candidate.gcc_experience_years.is_some()),
        (
            "profile_text",
            filled(candidate.employment_summary.as_deref()) || filled(candidate.cv_text.as_deref()),
        ),
    ];

    let missing: Vec<&'static str> = checklist
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();
    let ratio = (checklist.len() - missing.len()) as f64 / checklist.len() as f64;
    (ratio, missing)
}

/// Agreement from the coefficient of variation across section scores.
pub fn agreement(scores: &[u8]) -> f64 {
    if scores.len() < 2 {
        return 0.5;
    }
    let count = scores.len() as f64;
    let mean = scores.iter().map(|score| f64::from(*score)).sum::<f64>() / count;
    if mean == 0.0 {
        return 1.0;
    }
    let variance = scores
        .iter()
        .map(|score| (f64::from(*score) - mean).powi(2))
        .sum::<f64>()
        / count;
    let variation = variance.sqrt() / mean;
    (1.0 - variation / MAX_TOLERATED_VARIATION).clamp(0.0, 1.0)
}

/// Normalised distance from the nearest decision threshold.
pub fn boundary_distance(score: u8, thresholds: &DecisionThresholds) -> f64 {
    thresholds
        .boundaries()
        .iter()
        .map(|boundary| (i16::from(score) - i16::from(*boundary)).unsigned_abs())
        .min()
        .map_or(1.0, |distance| {
            (f64::from(distance) / BOUNDARY_SPAN).min(1.0)
        })
}

/// Combines completeness, agreement and boundary distance into a confidence reading.
///
/// `upstream_factors` carries tags raised by earlier stages (skipped rules,
/// unparseable dates); they are reported but do not move the score. A
/// missing critical field caps the score at [`CRITICAL_GAP_CEILING`] however
/// well the signals agree.
pub fn calculate_confidence(
    candidate: &CandidateProfile,
    sheet: &ScoreSheet,
    adjusted_score: u8,
    thresholds: &DecisionThresholds,
    upstream_factors: &[String],
) -> ConfidenceMetrics {
    let (completeness, missing) = completeness(candidate);
    let agreement = agreement(&sheet.values());
    let boundary = boundary_distance(adjusted_score, thresholds);

    let weighted = COMPLETENESS_WEIGHT * completeness
        + AGREEMENT_WEIGHT * agreement
        + BOUNDARY_WEIGHT * boundary;
    let critical_gap = missing
        .iter()
        .any(|field| CRITICAL_FIELDS.contains(field));
    let score = if critical_gap {
        round_to(weighted.min(CRITICAL_GAP_CEILING), 3)
    } else {
        round_to(weighted, 3)
    };

    let mut uncertainty_factors: Vec<String> = Vec::new();
    let mut tag = |factor: &str| {
        if !uncertainty_factors.iter().any(|existing| existing == factor) {
            uncertainty_factors.push(factor.to_string());
        }
    };
    for factor in upstream_factors {
        tag(factor.as_str());
    }
    if completeness < COMPLETENESS_FLOOR {
        tag("incomplete_profile");
    }
    if critical_gap {
        tag("missing_critical_field");
    }
    if agreement < AGREEMENT_FLOOR {
        tag("signal_disagreement");
    }
    if boundary < BOUNDARY_FLOOR {
        tag("boundary_proximity");
    }

    ConfidenceMetrics {
        level: ConfidenceLevel::from_score(score),
        score,
        uncertainty_factors,
        completeness: round_to(completeness, 3),
        agreement: round_to(agreement, 3),
        boundary_distance: round_to(boundary, 3),
        missing_fields: missing.into_iter().map(str::to_string).collect(),
    }
}
