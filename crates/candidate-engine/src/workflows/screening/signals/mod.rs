//! Section signals consumed by the screening pipeline.
//!
//! Signal scorers turn a job and a candidate into one 0-100 score per
//! evaluation section. Model-backed scorers live outside this crate and plug in
//! through [`SignalScorer`]; [`BaselineSignalScorer`] is the deterministic
//! default used by the API and the CLI.

mod baseline;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::domain::{CandidateProfile, JobPosting};

pub use baseline::BaselineSignalScorer;

/// Evaluation dimension scored by an external or baseline signal scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionName {
    Skills,
    Experience,
    Semantic,
    Domain,
}

impl SectionName {
    pub const ALL: [SectionName; 4] = [
        SectionName::Skills,
        SectionName::Experience,
        SectionName::Semantic,
        SectionName::Domain,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            SectionName::Skills => "skills",
            SectionName::Experience => "experience",
            SectionName::Semantic => "semantic",
            SectionName::Domain => "domain",
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Supporting evidence behind a section score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionDetail {
    pub matched_required: Vec<String>,
    pub missing_required: Vec<String>,
    pub matched_preferred: Vec<String>,
    pub missing_preferred: Vec<String>,
}

impl SectionDetail {
    pub fn required_total(&self) -> usize {
        self.matched_required.len() + self.missing_required.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSignal {
    pub score: u8,
    pub explanation: String,
    #[serde(default)]
    pub detail: SectionDetail,
}

impl SectionSignal {
    pub fn new(score: u8, explanation: impl Into<String>) -> Self {
        Self {
            score,
            explanation: explanation.into(),
            detail: SectionDetail::default(),
        }
    }

    pub fn with_detail(mut self, detail: SectionDetail) -> Self {
        self.detail = detail;
        self
    }
}

/// Per-section output of a signal scorer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalScores(BTreeMap<SectionName, SectionSignal>);

impl SignalScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, section: SectionName, signal: SectionSignal) -> Self {
        self.insert(section, signal);
        self
    }

    pub fn insert(&mut self, section: SectionName, signal: SectionSignal) {
        self.0.insert(section, signal);
    }

    pub fn get(&self, section: SectionName) -> Option<&SectionSignal> {
        self.0.get(&section)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    #[error("{scorer} scorer unavailable: {reason}")]
    Unavailable { scorer: String, reason: String },
}

/// Produces section signals for a job/candidate pair.
///
/// Implementations must be stateless with respect to requests so a single
/// instance can be shared across concurrent evaluations.
pub trait SignalScorer: Send + Sync {
    fn score(
        &self,
        job: &JobPosting,
        candidate: &CandidateProfile,
    ) -> Result<SignalScores, SignalError>;
}
