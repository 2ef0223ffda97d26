use serde::{Deserialize, Serialize};

use super::weights::WeightProfile;
use super::{round_to, EvaluationError};
use crate::workflows::screening::signals::{SectionDetail, SectionName, SignalScores};

/// One weighted section as reported on the evaluation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionScore {
    pub name: SectionName,
    pub score: u8,
    pub weight: f64,
    pub contribution: f64,
    pub explanation: String,
    pub detail: SectionDetail,
}

/// Validated section scores in a fixed shape for the downstream stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSheet {
    pub skills: u8,
    pub experience: u8,
    pub semantic: u8,
    pub domain: u8,
}

impl ScoreSheet {
    pub fn values(&self) -> [u8; 4] {
        [self.skills, self.experience, self.semantic, self.domain]
    }

    fn set(&mut self, section: SectionName, score: u8) {
        match section {
            SectionName::Skills => self.skills = score,
            SectionName::Experience => self.experience = score,
            SectionName::Semantic => self.semantic = score,
            SectionName::Domain => self.domain = score,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BaseScore {
    pub score: u8,
    pub sheet: ScoreSheet,
    pub sections: Vec<SectionScore>,
}

/// Weighted sum of the section scores under the selected profile.
pub fn aggregate(
    signals: &SignalScores,
    profile: &WeightProfile,
) -> Result<BaseScore, EvaluationError> {
    let mut sheet = ScoreSheet {
        skills: 0,
        experience: 0,
        semantic: 0,
        domain: 0,
    };
    let mut sections = Vec::with_capacity(SectionName::ALL.len());
    let mut total = 0.0;

    for section in SectionName::ALL {
        let signal = signals
            .get(section)
            .ok_or(EvaluationError::MissingSection(section))?;
        if signal.score > 100 {
            return Err(EvaluationError::ScoreOutOfRange {
                section,
                score: signal.score,
            });
        }

        let weight = profile.weight(section);
        let contribution = f64::from(signal.score) * weight;
        total += contribution;
        sheet.set(section, signal.score);

        sections.push(SectionScore {
            name: section,
            score: signal.score,
            weight,
            contribution: round_to(contribution, 2),
            explanation: format!(
                "{} (contributed {:.0} points)",
                signal.explanation,
                contribution.round()
            ),
            detail: signal.detail.clone(),
        });
    }

    Ok(BaseScore {
        score: total.round().clamp(0.0, 100.0) as u8,
        sheet,
        sections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::screening::evaluation::config::WeightProfiles;
    use crate::workflows::screening::evaluation::weights::SeniorityBand;
    use crate::workflows::screening::signals::SectionSignal;

    fn mid_profile() -> WeightProfile {
        WeightProfile {
            band: SeniorityBand::Mid,
            weights: WeightProfiles::default().mid,
        }
    }

    fn signals(skills: u8, experience: u8, semantic: u8, domain: u8) -> SignalScores {
        SignalScores::new()
            .with(SectionName::Skills, SectionSignal::new(skills, "skills"))
            .with(SectionName::Experience, SectionSignal::new(experience, "experience"))
            .with(SectionName::Semantic, SectionSignal::new(semantic, "semantic"))
            .with(SectionName::Domain, SectionSignal::new(domain, "domain"))
    }

    #[test]
    fn weighted_sum_is_rounded() {
        // 0.40*90 + 0.20*70 + 0.25*65 + 0.15*81 = 78.4
        let base = aggregate(&signals(90, 70, 65, 81), &mid_profile()).expect("aggregates");

        assert_eq!(base.score, 78);
        assert_eq!(base.sections.len(), 4);
        assert_eq!(base.sections[0].contribution, 36.0);
        assert_eq!(base.sections[0].explanation, "skills (contributed 36 points)");
        assert_eq!(base.sheet.values(), [90, 70, 65, 81]);
    }

    #[test]
    fn missing_sections_are_reported() {
        let partial = SignalScores::new().with(SectionName::Skills, SectionSignal::new(80, "skills"));

        match aggregate(&partial, &mid_profile()) {
            Err(EvaluationError::MissingSection(SectionName::Experience)) => {}
            other => panic!("expected missing experience section, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_scores_are_rejected() {
        match aggregate(&signals(101, 70, 65, 81), &mid_profile()) {
            Err(EvaluationError::ScoreOutOfRange { section, score }) => {
                assert_eq!(section, SectionName::Skills);
                assert_eq!(score, 101);
            }
            other => panic!("expected out-of-range error, got {other:?}"),
        }
    }
}
