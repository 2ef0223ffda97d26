//! Hybrid candidate screening engine.
//!
//! Hard eligibility rules run first and fail fast; eligible candidates are
//! scored with seniority-aware weights, contextual adjustments and feature
//! interactions, then assigned a decision with a quantified confidence and a
//! replayable audit trail.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
