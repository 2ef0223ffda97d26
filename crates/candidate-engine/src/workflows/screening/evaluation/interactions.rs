use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::aggregation::ScoreSheet;
use super::round_to;
use crate::workflows::screening::domain::{CandidateProfile, JobPosting};
use crate::workflows::screening::signals::SectionName;

/// Non-linear section-score patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionType {
    SkillsCompExp,
    ExpCompSkills,
    SalarySkillsTradeoff,
    CareerChanger,
    PerfectCandidateAmp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionPattern {
    Compensation,
    Amplification,
    Risk,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureInteraction {
    pub interaction_type: InteractionType,
    pub pattern: InteractionPattern,
    pub features_involved: BTreeSet<SectionName>,
    pub impact: f64,
    pub description: String,
    pub strength: f64,
}

/// Linear interpolation across `[from, to]` with `t` clamped to `[0, 1]`.
fn scale(t: f64, from: f64, to: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    round_to(from + (to - from) * t, 2)
}

struct Detection {
    impact: f64,
    strength: f64,
    description: String,
}

impl InteractionType {
    pub const CATALOG: [InteractionType; 5] = [
        InteractionType::SkillsCompExp,
        InteractionType::ExpCompSkills,
        InteractionType::SalarySkillsTradeoff,
        InteractionType::CareerChanger,
        InteractionType::PerfectCandidateAmp,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            InteractionType::SkillsCompExp => "SKILLS_COMP_EXP",
            InteractionType::ExpCompSkills => "EXP_COMP_SKILLS",
            InteractionType::SalarySkillsTradeoff => "SALARY_SKILLS_TRADEOFF",
            InteractionType::CareerChanger => "CAREER_CHANGER",
            InteractionType::PerfectCandidateAmp => "PERFECT_CANDIDATE_AMP",
        }
    }

    pub const fn pattern(self) -> InteractionPattern {
        match self {
            InteractionType::SkillsCompExp
            | InteractionType::ExpCompSkills
            | InteractionType::SalarySkillsTradeoff => InteractionPattern::Compensation,
            InteractionType::CareerChanger => InteractionPattern::Risk,
            InteractionType::PerfectCandidateAmp => InteractionPattern::Amplification,
        }
    }

    pub fn features(self) -> BTreeSet<SectionName> {
        let sections: &[SectionName] = match self {
            InteractionType::SkillsCompExp | InteractionType::ExpCompSkills => {
                &[SectionName::Skills, SectionName::Experience]
            }
            InteractionType::SalarySkillsTradeoff => &[SectionName::Skills],
            InteractionType::CareerChanger => &[
                SectionName::Experience,
                SectionName::Semantic,
                SectionName::Domain,
            ],
            InteractionType::PerfectCandidateAmp => &[
                SectionName::Skills,
                SectionName::Experience,
                SectionName::Domain,
            ],
        };
        sections.iter().copied().collect()
    }

    fn detect(
        self,
        sheet: &ScoreSheet,
        job: &JobPosting,
        candidate: &CandidateProfile,
    ) -> Option<Detection> {
        let skills = f64::from(sheet.skills);
        let experience = f64::from(sheet.experience);

        match self {
            InteractionType::SkillsCompExp => {
                if skills <= 80.0 || experience >= 70.0 {
                    return None;
                }
                let gap = skills - experience;
                Some(Detection {
                    impact: scale((gap - 10.0) / 90.0, 5.0, 10.0),
                    strength: round_to(gap / 100.0, 2),
                    description: format!(
                        "Strong skills ({skills:.0}) offset limited experience ({experience:.0})"
                    ),
                })
            }
            InteractionType::ExpCompSkills => {
                if experience <= 80.0 || skills >= 70.0 {
                    return None;
                }
                let gap = experience - skills;
                Some(Detection {
                    impact: scale((gap - 10.0) / 90.0, 3.0, 7.0),
                    strength: round_to(gap / 100.0, 2),
                    description: format!(
                        "Deep experience ({experience:.0}) offsets skill gaps ({skills:.0})"
                    ),
                })
            }
            InteractionType::SalarySkillsTradeoff => {
                let expected = job.comparable_salary(candidate)?;
                let midpoint = job.salary_midpoint()?;
                if expected >= midpoint || skills >= 100.0 {
                    return None;
                }
                let t = ((midpoint - expected) / (midpoint - f64::from(job.salary_min))).clamp(0.0, 1.0);
                Some(Detection {
                    impact: scale(t, 2.0, 5.0),
                    strength: round_to(t, 2),
                    description: format!(
                        "Expected salary below the band midpoint with room to grow skills ({skills:.0})"
                    ),
                })
            }
            InteractionType::CareerChanger => {
                let fit = f64::from(sheet.domain.min(sheet.semantic));
                if experience < 75.0 || fit >= 50.0 {
                    return None;
                }
                let gap = experience - fit;
                Some(Detection {
                    impact: -scale((gap - 25.0) / 75.0, 3.0, 8.0),
                    strength: round_to(gap / 100.0, 2),
                    description: format!(
                        "Substantial experience ({experience:.0}) with weak domain fit ({fit:.0}) suggests a career change"
                    ),
                })
            }
            InteractionType::PerfectCandidateAmp => {
                let floor = sheet.skills.min(sheet.experience).min(sheet.domain);
                if floor <= 85 {
                    return None;
                }
                let t = (f64::from(floor) - 85.0) / 15.0;
                Some(Detection {
                    impact: scale(t, 3.0, 5.0),
                    strength: round_to(f64::from(floor) / 100.0, 2),
                    description: "Skills, experience and domain fit are all exceptional".to_string(),
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionOutcome {
    pub interactions: Vec<FeatureInteraction>,
    pub total_impact: f64,
}

/// Detects every interaction pattern present in the validated section scores.
pub fn detect_interactions(
    sheet: &ScoreSheet,
    job: &JobPosting,
    candidate: &CandidateProfile,
) -> InteractionOutcome {
    let interactions: Vec<FeatureInteraction> = InteractionType::CATALOG
        .into_iter()
        .filter_map(|interaction_type| {
            let detection = interaction_type.detect(sheet, job, candidate)?;
            debug!(
                interaction = interaction_type.code(),
                impact = detection.impact,
                "feature interaction detected"
            );
            Some(FeatureInteraction {
                interaction_type,
                pattern: interaction_type.pattern(),
                features_involved: interaction_type.features(),
                impact: detection.impact,
                description: detection.description,
                strength: detection.strength.clamp(0.0, 1.0),
            })
        })
        .collect();
    let total_impact = round_to(
        interactions.iter().map(|interaction| interaction.impact).sum(),
        2,
    );

    InteractionOutcome {
        interactions,
        total_impact,
    }
}
