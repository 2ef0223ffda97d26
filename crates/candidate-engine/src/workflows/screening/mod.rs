//! Candidate screening: eligibility rules, weighted scoring and explained decisions.
//!
//! A request flows through hard rejection, weight selection, aggregation,
//! contextual adjustment, interaction detection and confidence before a
//! decision is mapped. Every stage is a pure function of the request and the
//! process-wide [`ScreeningConfig`]; the only clock read happens in
//! [`ScreeningService`] when a request omits its evaluation date.

pub mod domain;
pub mod evaluation;
pub mod router;
pub mod service;
pub mod signals;
mod timeline;

#[cfg(test)]
mod tests;

pub use domain::{
    CandidateId, CandidateProfile, EducationLevel, EducationRecord, EmploymentRecord, JobId,
    JobPosting, WorkAuthorization,
};
pub use evaluation::{
    AdjustmentKind, AdjustmentRule, ConfidenceLevel, ConfidenceMetrics, ContextualAdjustment,
    Decision, DecisionThresholds, EvaluationEngine, EvaluationError, EvaluationRequest,
    EvaluationResult, FeatureInteraction, HardRule, HardRuleToggles, InteractionPattern,
    InteractionType, ScreeningConfig, ScreeningConfigError, SectionScore, SectionWeights,
    SeniorityBand, WeightProfiles,
};
pub use router::{screening_router, ProfilesView};
pub use service::{ScreeningRequest, ScreeningService, ScreeningServiceError};
pub use signals::{
    BaselineSignalScorer, SectionDetail, SectionName, SectionSignal, SignalError, SignalScorer,
    SignalScores,
};
