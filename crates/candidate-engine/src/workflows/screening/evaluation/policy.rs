use std::fmt;

use serde::{Deserialize, Serialize};

use super::config::DecisionThresholds;

/// Screening outcome communicated to recruiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    StrongMatch,
    PotentialMatch,
    WeakMatch,
    NotRecommended,
    /// Reserved for hard-rule failures; never produced by [`decide`].
    Rejected,
}

impl Decision {
    pub const fn label(self) -> &'static str {
        match self {
            Decision::StrongMatch => "STRONG_MATCH",
            Decision::PotentialMatch => "POTENTIAL_MATCH",
            Decision::WeakMatch => "WEAK_MATCH",
            Decision::NotRecommended => "NOT_RECOMMENDED",
            Decision::Rejected => "REJECTED",
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Decision::StrongMatch => "strong match: advance to interview".to_string(),
            Decision::PotentialMatch => "potential match: recruiter review recommended".to_string(),
            Decision::WeakMatch => "weak match: keep on file".to_string(),
            Decision::NotRecommended => "not recommended for this role".to_string(),
            Decision::Rejected => "rejected by an eligibility rule".to_string(),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Maps a final score to its decision band.
pub(crate) fn decide(score: u8, thresholds: &DecisionThresholds) -> Decision {
    if score >= thresholds.strong {
        Decision::StrongMatch
    } else if score >= thresholds.potential {
        Decision::PotentialMatch
    } else if score >= thresholds.weak {
        Decision::WeakMatch
    } else {
        Decision::NotRecommended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_use_inclusive_lower_bounds() {
        let thresholds = DecisionThresholds::default();
        let cases = [
            (100, Decision::StrongMatch),
            (85, Decision::StrongMatch),
            (84, Decision::PotentialMatch),
            (60, Decision::PotentialMatch),
            (59, Decision::WeakMatch),
            (40, Decision::WeakMatch),
            (39, Decision::NotRecommended),
            (0, Decision::NotRecommended),
        ];
        for (score, expected) in cases {
            assert_eq!(decide(score, &thresholds), expected, "score {score}");
        }
    }

    #[test]
    fn decisions_serialize_in_screaming_case() {
        let json = serde_json::to_string(&Decision::PotentialMatch).expect("serializes");
        assert_eq!(json, "\"POTENTIAL_MATCH\"");
    }
}
