use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::config::{SectionWeights, WeightProfiles};
use crate::workflows::screening::domain::JobPosting;
use crate::workflows::screening::signals::SectionName;

/// Seniority band inferred from a posting's minimum experience requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeniorityBand {
    Entry,
    Mid,
    Senior,
    Executive,
}

impl SeniorityBand {
    pub const ALL: [SeniorityBand; 4] = [
        SeniorityBand::Entry,
        SeniorityBand::Mid,
        SeniorityBand::Senior,
        SeniorityBand::Executive,
    ];

    pub const fn from_min_experience(years: u32) -> Self {
        match years {
            0..=2 => SeniorityBand::Entry,
            3..=7 => SeniorityBand::Mid,
            8..=15 => SeniorityBand::Senior,
            _ => SeniorityBand::Executive,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SeniorityBand::Entry => "entry",
            SeniorityBand::Mid => "mid",
            SeniorityBand::Senior => "senior",
            SeniorityBand::Executive => "executive",
        }
    }
}

impl fmt::Display for SeniorityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Weight profile chosen for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightProfile {
    pub band: SeniorityBand,
    pub weights: SectionWeights,
}

impl WeightProfile {
    pub fn name(&self) -> &'static str {
        self.band.label()
    }

    pub fn weight(&self, section: SectionName) -> f64 {
        self.weights.weight(section)
    }

    /// Exact weights applied, recorded on the result for reproducibility.
    pub fn weights_used(&self) -> BTreeMap<SectionName, f64> {
        SectionName::ALL
            .into_iter()
            .map(|section| (section, self.weight(section)))
            .collect()
    }
}

pub fn select_profile(job: &JobPosting, profiles: &WeightProfiles) -> WeightProfile {
    let band = SeniorityBand::from_min_experience(job.min_experience_years);
    WeightProfile {
        band,
        weights: *profiles.for_band(band),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_follow_minimum_experience() {
        let cases = [
            (0, SeniorityBand::Entry),
            (2, SeniorityBand::Entry),
            (3, SeniorityBand::Mid),
            (7, SeniorityBand::Mid),
            (8, SeniorityBand::Senior),
            (15, SeniorityBand::Senior),
            (16, SeniorityBand::Executive),
        ];
        for (years, band) in cases {
            assert_eq!(SeniorityBand::from_min_experience(years), band, "{years} years");
        }
    }

    #[test]
    fn default_profiles_sum_to_one() {
        let profiles = WeightProfiles::default();
        for band in SeniorityBand::ALL {
            let sum = profiles.for_band(band).sum();
            assert!((sum - 1.0).abs() < 1e-6, "{band} sums to {sum}");
        }
    }

    #[test]
    fn skills_weight_falls_as_experience_weight_rises() {
        let profiles = WeightProfiles::default();
        for pair in SeniorityBand::ALL.windows(2) {
            let junior = profiles.for_band(pair[0]);
            let senior = profiles.for_band(pair[1]);
            assert!(senior.skills < junior.skills);
            assert!(senior.experience > junior.experience);
            assert_eq!(senior.semantic, junior.semantic);
            assert_eq!(senior.domain, junior.domain);
        }
    }
}
