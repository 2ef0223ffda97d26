use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::rejection::HardRule;
use super::weights::SeniorityBand;
use crate::workflows::screening::signals::SectionName;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Process-wide screening configuration, validated once and shared read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreeningConfig {
    pub salary_tolerance_percent: f64,
    pub max_experience_tolerance_years: f64,
    pub visa_expiry_warning_days: u32,
    pub hard_rules: HardRuleToggles,
    pub decision_thresholds: DecisionThresholds,
    pub scoring_weights: WeightProfiles,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            salary_tolerance_percent: 10.0,
            max_experience_tolerance_years: 3.0,
            visa_expiry_warning_days: 90,
            hard_rules: HardRuleToggles::default(),
            decision_thresholds: DecisionThresholds::default(),
            scoring_weights: WeightProfiles::default(),
        }
    }
}

impl ScreeningConfig {
    pub fn validate(&self) -> Result<(), ScreeningConfigError> {
        for (field, value) in [
            ("salary_tolerance_percent", self.salary_tolerance_percent),
            (
                "max_experience_tolerance_years",
                self.max_experience_tolerance_years,
            ),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScreeningConfigError::InvalidTolerance { field, value });
            }
        }

        self.decision_thresholds.validate()?;
        for band in SeniorityBand::ALL {
            self.scoring_weights.for_band(band).validate(band.label())?;
        }
        Ok(())
    }
}

/// Per-rule switches for the hard rejection catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HardRuleToggles {
    pub enable_location_authorization: bool,
    pub enable_visa_expiry: bool,
    pub enable_salary: bool,
    pub enable_minimum_experience: bool,
    pub enable_maximum_experience: bool,
    pub enable_nationality: bool,
    pub enable_education: bool,
    pub enable_gcc_experience: bool,
}

impl Default for HardRuleToggles {
    fn default() -> Self {
        Self {
            enable_location_authorization: true,
            enable_visa_expiry: true,
            enable_salary: true,
            enable_minimum_experience: true,
            enable_maximum_experience: true,
            enable_nationality: true,
            enable_education: true,
            enable_gcc_experience: true,
        }
    }
}

impl HardRuleToggles {
    pub fn is_enabled(&self, rule: HardRule) -> bool {
        match rule {
            HardRule::LocationAuthorization => self.enable_location_authorization,
            HardRule::VisaExpiry => self.enable_visa_expiry,
            HardRule::SalaryCeiling => self.enable_salary,
            HardRule::MinimumExperience => self.enable_minimum_experience,
            HardRule::MaximumExperience => self.enable_maximum_experience,
            HardRule::Nationality => self.enable_nationality,
            HardRule::Education => self.enable_education,
            HardRule::GccExperience => self.enable_gcc_experience,
        }
    }
}

/// Score cut-offs for the scored decision bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecisionThresholds {
    pub strong: u8,
    pub potential: u8,
    pub weak: u8,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            strong: 85,
            potential: 60,
            weak: 40,
        }
    }
}

impl DecisionThresholds {
    pub fn boundaries(&self) -> [u8; 3] {
        [self.weak, self.potential, self.strong]
    }

    fn validate(&self) -> Result<(), ScreeningConfigError> {
        let ordered = 0 < self.weak && self.weak < self.potential && self.potential < self.strong;
        if ordered && self.strong <= 100 {
            Ok(())
        } else {
            Err(ScreeningConfigError::InvalidThresholds {
                strong: self.strong,
                potential: self.potential,
                weak: self.weak,
            })
        }
    }
}

/// Section weights of one profile; must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionWeights {
    pub skills: f64,
    pub experience: f64,
    pub semantic: f64,
    pub domain: f64,
}

impl SectionWeights {
    pub const fn new(skills: f64, experience: f64, semantic: f64, domain: f64) -> Self {
        Self {
            skills,
            experience,
            semantic,
            domain,
        }
    }

    pub fn weight(&self, section: SectionName) -> f64 {
        match section {
            SectionName::Skills => self.skills,
            SectionName::Experience => self.experience,
            SectionName::Semantic => self.semantic,
            SectionName::Domain => self.domain,
        }
    }

    pub fn sum(&self) -> f64 {
        SectionName::ALL
            .iter()
            .map(|section| self.weight(*section))
            .sum()
    }

    fn validate(&self, profile: &'static str) -> Result<(), ScreeningConfigError> {
        for section in SectionName::ALL {
            let weight = self.weight(section);
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(ScreeningConfigError::InvalidWeight {
                    profile,
                    section,
                    weight,
                });
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ScreeningConfigError::WeightsDoNotSumToOne { profile, sum });
        }
        Ok(())
    }
}

/// Weight profile per seniority band.
///
/// Skills weight falls and experience weight rises with seniority while
/// semantic and domain weights stay constant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeightProfiles {
    pub entry: SectionWeights,
    pub mid: SectionWeights,
    pub senior: SectionWeights,
    pub executive: SectionWeights,
}

impl Default for WeightProfiles {
    fn default() -> Self {
        Self {
            entry: SectionWeights::new(0.45, 0.15, 0.25, 0.15),
            mid: SectionWeights::new(0.40, 0.20, 0.25, 0.15),
            senior: SectionWeights::new(0.35, 0.25, 0.25, 0.15),
            executive: SectionWeights::new(0.30, 0.30, 0.25, 0.15),
        }
    }
}

impl WeightProfiles {
    pub fn for_band(&self, band: SeniorityBand) -> &SectionWeights {
        match band {
            SeniorityBand::Entry => &self.entry,
            SeniorityBand::Mid => &self.mid,
            SeniorityBand::Senior => &self.senior,
            SeniorityBand::Executive => &self.executive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScreeningConfigError {
    #[error("weight profile '{profile}' sums to {sum:.6}, expected 1.0")]
    WeightsDoNotSumToOne { profile: &'static str, sum: f64 },
    #[error("weight profile '{profile}' has an invalid {section} weight of {weight}")]
    InvalidWeight {
        profile: &'static str,
        section: SectionName,
        weight: f64,
    },
    #[error(
        "decision thresholds must satisfy 0 < weak < potential < strong <= 100 \
         (weak {weak}, potential {potential}, strong {strong})"
    )]
    InvalidThresholds { strong: u8, potential: u8, weak: u8 },
    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidTolerance { field: &'static str, value: f64 },
}
