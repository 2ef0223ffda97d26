use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::domain::{CandidateProfile, JobPosting};
use super::evaluation::{
    EvaluationEngine, EvaluationError, EvaluationRequest, EvaluationResult, ScreeningConfig,
};
use super::signals::{SignalScorer, SignalScores};

/// Inbound screening request as accepted by the HTTP and CLI surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningRequest {
    pub job: JobPosting,
    pub candidate: CandidateProfile,
    /// Defaults to today when omitted.
    #[serde(default)]
    pub evaluated_on: Option<NaiveDate>,
    /// Precomputed section signals; the configured scorer runs when omitted.
    #[serde(default)]
    pub signals: Option<SignalScores>,
}

/// Service pairing the evaluation engine with a shared signal scorer.
pub struct ScreeningService<S> {
    engine: Arc<EvaluationEngine>,
    scorer: Arc<S>,
}

impl<S> ScreeningService<S>
where
    S: SignalScorer + 'static,
{
    pub fn new(engine: EvaluationEngine, scorer: Arc<S>) -> Self {
        Self {
            engine: Arc::new(engine),
            scorer,
        }
    }

    pub fn engine(&self) -> &EvaluationEngine {
        &self.engine
    }

    pub fn config(&self) -> &ScreeningConfig {
        self.engine.config()
    }

    /// Screen one candidate against one job.
    pub fn evaluate(
        &self,
        request: ScreeningRequest,
    ) -> Result<EvaluationResult, ScreeningServiceError> {
        let ScreeningRequest {
            job,
            candidate,
            evaluated_on,
            signals,
        } = request;
        let request = EvaluationRequest {
            job,
            candidate,
            evaluated_on: evaluated_on.unwrap_or_else(|| Local::now().date_naive()),
        };

        let result = match signals {
            Some(signals) => self.engine.evaluate_with_signals(&request, &signals)?,
            None => self.engine.evaluate(&request, self.scorer.as_ref())?,
        };

        info!(
            job_id = %result.job_id.0,
            candidate_id = %result.candidate_id.0,
            decision = %result.decision,
            base_score = result.base_score,
            adjusted_score = result.adjusted_score,
            rejection_rule = result.rejection_rule_code.as_deref().unwrap_or("-"),
            "candidate screened"
        );
        Ok(result)
    }
}

#[derive(Debug, Error)]
pub enum ScreeningServiceError {
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}
