mod adjustments;
mod aggregation;
mod config;
mod confidence;
mod interactions;
mod policy;
mod rejection;
mod weights;

pub use adjustments::{AdjustmentKind, AdjustmentRule, ContextualAdjustment};
pub use aggregation::{ScoreSheet, SectionScore};
pub use config::{
    DecisionThresholds, HardRuleToggles, ScreeningConfig, ScreeningConfigError, SectionWeights,
    WeightProfiles,
};
pub use confidence::{ConfidenceLevel, ConfidenceMetrics};
pub use interactions::{FeatureInteraction, InteractionPattern, InteractionType};
pub use policy::Decision;
pub use rejection::{HardRejection, HardRejectionEngine, HardRule, RejectionReport, RuleVerdict};
pub use weights::{select_profile, SeniorityBand, WeightProfile};

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::domain::{CandidateId, CandidateProfile, JobId, JobPosting};
use super::signals::{SectionName, SignalError, SignalScorer, SignalScores};
use super::timeline::CareerTimeline;
use adjustments::{apply_adjustments, AdjustmentContext};
use aggregation::aggregate;
use confidence::calculate_confidence;
use interactions::detect_interactions;
use policy::decide;

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// One job/candidate pair pinned to an explicit evaluation date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub job: JobPosting,
    pub candidate: CandidateProfile,
    pub evaluated_on: NaiveDate,
}

/// Fully explained outcome of one screening evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub job_id: JobId,
    pub candidate_id: CandidateId,
    pub decision: Decision,
    pub is_rejected: bool,
    pub rejection_rule_code: Option<String>,
    pub rejection_reason: Option<String>,
    pub base_score: u8,
    pub adjusted_score: u8,
    pub section_scores: Vec<SectionScore>,
    pub adjustments: Vec<ContextualAdjustment>,
    pub interactions: Vec<FeatureInteraction>,
    pub confidence: Option<ConfidenceMetrics>,
    pub weight_profile: Option<String>,
    pub weights_used: BTreeMap<SectionName, f64>,
    pub rule_trace: Vec<String>,
    pub evaluated_on: NaiveDate,
    pub engine_version: String,
}

impl EvaluationResult {
    fn rejected(request: &EvaluationRequest, rejection: HardRejection, trace: Vec<String>) -> Self {
        Self {
            job_id: request.job.job_id.clone(),
            candidate_id: request.candidate.candidate_id.clone(),
            decision: Decision::Rejected,
            is_rejected: true,
            rejection_rule_code: Some(rejection.rule_code().to_string()),
            rejection_reason: Some(rejection.reason),
            base_score: 0,
            adjusted_score: 0,
            section_scores: Vec::new(),
            adjustments: Vec::new(),
            interactions: Vec::new(),
            confidence: None,
            weight_profile: None,
            weights_used: BTreeMap::new(),
            rule_trace: trace,
            evaluated_on: request.evaluated_on,
            engine_version: ENGINE_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("signal scorers returned no {0} section")]
    MissingSection(SectionName),
    #[error("{section} score {score} is outside 0-100")]
    ScoreOutOfRange { section: SectionName, score: u8 },
    #[error(transparent)]
    Signals(#[from] SignalError),
}

/// Single final clamp over the summed deltas.
fn final_score(base: u8, adjustments: i32, interactions: f64) -> u8 {
    let raw = f64::from(base) + f64::from(adjustments) + interactions;
    raw.round().clamp(0.0, 100.0) as u8
}

/// Stateless pipeline over a validated, immutable configuration.
///
/// Stages run in a fixed order: hard rejection, weight selection,
/// aggregation, contextual adjustment, interaction detection, confidence and
/// decision mapping. A hard-rule failure ends the evaluation before any
/// signal scorer is consulted.
#[derive(Debug, Clone)]
pub struct EvaluationEngine {
    config: ScreeningConfig,
}

impl EvaluationEngine {
    pub fn new(config: ScreeningConfig) -> Result<Self, ScreeningConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScreeningConfig {
        &self.config
    }

    /// Evaluates a request, invoking `scorer` only once the hard rules pass.
    pub fn evaluate<S>(
        &self,
        request: &EvaluationRequest,
        scorer: &S,
    ) -> Result<EvaluationResult, EvaluationError>
    where
        S: SignalScorer + ?Sized,
    {
        self.run(request, || scorer.score(&request.job, &request.candidate))
    }

    /// Evaluates a request against section signals computed elsewhere.
    pub fn evaluate_with_signals(
        &self,
        request: &EvaluationRequest,
        signals: &SignalScores,
    ) -> Result<EvaluationResult, EvaluationError> {
        self.run(request, || Ok(signals.clone()))
    }

    fn run<F>(
        &self,
        request: &EvaluationRequest,
        signals: F,
    ) -> Result<EvaluationResult, EvaluationError>
    where
        F: FnOnce() -> Result<SignalScores, SignalError>,
    {
        let EvaluationRequest {
            job,
            candidate,
            evaluated_on,
        } = request;

        let RejectionReport {
            rejection,
            mut trace,
            uncertainty_factors: mut uncertainty,
        } = HardRejectionEngine::new(&self.config).evaluate(job, candidate, *evaluated_on);
        if let Some(rejection) = rejection {
            return Ok(EvaluationResult::rejected(request, rejection, trace));
        }

        let signals = signals()?;
        let profile = select_profile(job, &self.config.scoring_weights);
        trace.push(format!("WEIGHT_PROFILE:{}", profile.name()));

        let base = aggregate(&signals, &profile)?;
        trace.push(format!("BASE_SCORE:{}", base.score));

        let timeline = CareerTimeline::build(&candidate.employment_history, *evaluated_on);
        if timeline.has_malformed_dates() {
            uncertainty.push("unparseable_employment_date".to_string());
        }

        let adjustment = apply_adjustments(&AdjustmentContext {
            job,
            candidate,
            signals: &signals,
            timeline: &timeline,
        });
        trace.extend(
            adjustment
                .adjustments
                .iter()
                .map(|item| format!("ADJUSTMENT:{}:{:+}", item.rule_code, item.impact)),
        );

        let interaction = detect_interactions(&base.sheet, job, candidate);
        trace.extend(interaction.interactions.iter().map(|item| {
            format!(
                "INTERACTION:{}:{:+.2}",
                item.interaction_type.code(),
                item.impact
            )
        }));

        let adjusted_score =
            final_score(base.score, adjustment.total_impact, interaction.total_impact);
        trace.push(format!("ADJUSTED_SCORE:{adjusted_score}"));

        let thresholds = &self.config.decision_thresholds;
        let confidence =
            calculate_confidence(candidate, &base.sheet, adjusted_score, thresholds, &uncertainty);
        trace.push(format!("CONFIDENCE:{}", confidence.level.label()));

        let decision = decide(adjusted_score, thresholds);
        trace.push(format!("DECISION:{decision}"));

        Ok(EvaluationResult {
            job_id: job.job_id.clone(),
            candidate_id: candidate.candidate_id.clone(),
            decision,
            is_rejected: false,
            rejection_rule_code: None,
            rejection_reason: None,
            base_score: base.score,
            adjusted_score,
            section_scores: base.sections,
            adjustments: adjustment.adjustments,
            interactions: interaction.interactions,
            confidence: Some(confidence),
            weight_profile: Some(profile.name().to_string()),
            weights_used: profile.weights_used(),
            rule_trace: trace,
            evaluated_on: *evaluated_on,
            engine_version: ENGINE_VERSION.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_score_clamps_once_after_summing() {
        assert_eq!(final_score(95, 13, 7.5), 100);
        assert_eq!(final_score(95, 13, -20.0), 88);
        assert_eq!(final_score(5, -11, 0.0), 0);
        assert_eq!(final_score(60, 2, 0.49), 62);
    }

    #[test]
    fn round_to_keeps_requested_places() {
        assert_eq!(round_to(7.4999, 2), 7.5);
        assert_eq!(round_to(0.12345, 3), 0.123);
    }

    #[test]
    fn engine_refuses_invalid_configuration() {
        let mut config = ScreeningConfig::default();
        config.scoring_weights.entry.domain = 0.5;
        assert!(EvaluationEngine::new(config).is_err());
    }
}
