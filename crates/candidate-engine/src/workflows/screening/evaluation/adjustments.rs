use serde::{Deserialize, Serialize};
use tracing::debug;

use super::round_to;
use crate::workflows::screening::domain::{CandidateProfile, JobPosting};
use crate::workflows::screening::signals::{SectionName, SignalScores};
use crate::workflows::screening::timeline::CareerTimeline;

const GCC_BONUS_MIN_YEARS: f64 = 3.0;
const GCC_MAJOR_MIN_YEARS: f64 = 8.0;
const CRITICAL_GAP_RATIO: f64 = 0.4;
const SWEET_SPOT: (f64, f64) = (0.25, 0.75);
const FLIGHT_RISK_MULTIPLIER: f64 = 1.2;
const JOB_HOPPING_WINDOW_MONTHS: u32 = 60;
const JOB_HOPPING_MIN_ROLES: usize = 4;
const INDUSTRY_CONTINUITY_MONTHS: u32 = 60;
const UNEMPLOYMENT_GAP_MONTHS: u32 = 18;

const LOGISTICS_FIELDS: &[&str] = &[
    "logistics",
    "supply chain",
    "transport",
    "shipping",
    "freight",
    "procurement",
    "maritime",
    "operations management",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    Bonus,
    Penalty,
}

/// Signed point delta emitted by one contextual rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextualAdjustment {
    pub rule_code: String,
    pub rule_name: String,
    #[serde(rename = "type")]
    pub kind: AdjustmentKind,
    pub impact: i32,
    pub reason: String,
    pub confidence: f64,
}

/// Contextual bonus/penalty rules in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdjustmentRule {
    GccExperience,
    GccExperienceMajor,
    PerfectSkills,
    CriticalSkillGap,
    SlightOverqualified,
    SevereOverqualified,
    SalarySweetSpot,
    SalaryFlightRisk,
    JobHopping,
    IndustryContinuity,
    CareerProgression,
    RecentUnemployment,
    EducationBonus,
}

/// Everything a contextual rule may look at.
pub(crate) struct AdjustmentContext<'a> {
    pub job: &'a JobPosting,
    pub candidate: &'a CandidateProfile,
    pub signals: &'a SignalScores,
    pub timeline: &'a CareerTimeline<'a>,
}

struct Trigger {
    reason: String,
    confidence: f64,
}

impl Trigger {
    fn new(reason: String, confidence: f64) -> Option<Self> {
        Some(Self {
            reason,
            confidence: round_to(confidence.clamp(0.0, 1.0), 2),
        })
    }
}

impl AdjustmentRule {
    pub const CATALOG: [AdjustmentRule; 13] = [
        AdjustmentRule::GccExperience,
        AdjustmentRule::GccExperienceMajor,
        AdjustmentRule::PerfectSkills,
        AdjustmentRule::CriticalSkillGap,
        AdjustmentRule::SlightOverqualified,
        AdjustmentRule::SevereOverqualified,
        AdjustmentRule::SalarySweetSpot,
        AdjustmentRule::SalaryFlightRisk,
        AdjustmentRule::JobHopping,
        AdjustmentRule::IndustryContinuity,
        AdjustmentRule::CareerProgression,
        AdjustmentRule::RecentUnemployment,
        AdjustmentRule::EducationBonus,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            AdjustmentRule::GccExperience => "GCC_EXP_BONUS",
            AdjustmentRule::GccExperienceMajor => "GCC_EXP_MAJOR_BONUS",
            AdjustmentRule::PerfectSkills => "PERFECT_SKILLS",
            AdjustmentRule::CriticalSkillGap => "CRITICAL_SKILL_GAP",
            AdjustmentRule::SlightOverqualified => "SLIGHT_OVERQUALIFIED",
            AdjustmentRule::SevereOverqualified => "SEVERE_OVERQUALIFIED",
            AdjustmentRule::SalarySweetSpot => "SALARY_SWEET_SPOT",
            AdjustmentRule::SalaryFlightRisk => "SALARY_FLIGHT_RISK",
            AdjustmentRule::JobHopping => "JOB_HOPPING",
            AdjustmentRule::IndustryContinuity => "INDUSTRY_CONTINUITY",
            AdjustmentRule::CareerProgression => "CAREER_PROGRESSION",
            AdjustmentRule::RecentUnemployment => "RECENT_UNEMPLOYMENT",
            AdjustmentRule::EducationBonus => "EDUCATION_BONUS",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            AdjustmentRule::GccExperience => "GCC Experience Bonus",
            AdjustmentRule::GccExperienceMajor => "Major GCC Experience Bonus",
            AdjustmentRule::PerfectSkills => "Perfect Skills Match",
            AdjustmentRule::CriticalSkillGap => "Critical Skill Gap",
            AdjustmentRule::SlightOverqualified => "Slightly Overqualified",
            AdjustmentRule::SevereOverqualified => "Severely Overqualified",
            AdjustmentRule::SalarySweetSpot => "Salary Sweet Spot",
            AdjustmentRule::SalaryFlightRisk => "Salary Flight Risk",
            AdjustmentRule::JobHopping => "Job Hopping",
            AdjustmentRule::IndustryContinuity => "Industry Continuity",
            AdjustmentRule::CareerProgression => "Career Progression",
            AdjustmentRule::RecentUnemployment => "Recent Unemployment",
            AdjustmentRule::EducationBonus => "Relevant Education",
        }
    }

    pub const fn impact(self) -> i32 {
        match self {
            AdjustmentRule::GccExperience => 5,
            AdjustmentRule::GccExperienceMajor => 8,
            AdjustmentRule::PerfectSkills => 5,
            AdjustmentRule::CriticalSkillGap => -8,
            AdjustmentRule::SlightOverqualified => 2,
            AdjustmentRule::SevereOverqualified => -5,
            AdjustmentRule::SalarySweetSpot => 3,
            AdjustmentRule::SalaryFlightRisk => -6,
            AdjustmentRule::JobHopping => -4,
            AdjustmentRule::IndustryContinuity => 3,
            AdjustmentRule::CareerProgression => 4,
            AdjustmentRule::RecentUnemployment => -3,
            AdjustmentRule::EducationBonus => 2,
        }
    }

    pub const fn kind(self) -> AdjustmentKind {
        if self.impact() >= 0 {
            AdjustmentKind::Bonus
        } else {
            AdjustmentKind::Penalty
        }
    }

    pub(crate) fn evaluate(self, ctx: &AdjustmentContext<'_>) -> Option<ContextualAdjustment> {
        let trigger = match self {
            AdjustmentRule::GccExperience => {
                gcc_experience(ctx, GCC_BONUS_MIN_YEARS..GCC_MAJOR_MIN_YEARS)
            }
            AdjustmentRule::GccExperienceMajor => {
                gcc_experience(ctx, GCC_MAJOR_MIN_YEARS..f64::INFINITY)
            }
            AdjustmentRule::PerfectSkills => perfect_skills(ctx),
            AdjustmentRule::CriticalSkillGap => critical_skill_gap(ctx),
            AdjustmentRule::SlightOverqualified => overqualified(ctx, 2.0..=4.0),
            AdjustmentRule::SevereOverqualified => overqualified(ctx, 8.0..=f64::INFINITY),
            AdjustmentRule::SalarySweetSpot => salary_sweet_spot(ctx),
            AdjustmentRule::SalaryFlightRisk => salary_flight_risk(ctx),
            AdjustmentRule::JobHopping => job_hopping(ctx),
            AdjustmentRule::IndustryContinuity => industry_continuity(ctx),
            AdjustmentRule::CareerProgression => career_progression(ctx),
            AdjustmentRule::RecentUnemployment => recent_unemployment(ctx),
            AdjustmentRule::EducationBonus => education_bonus(ctx),
        }?;

        Some(ContextualAdjustment {
            rule_code: self.code().to_string(),
            rule_name: self.name().to_string(),
            kind: self.kind(),
            impact: self.impact(),
            reason: trigger.reason,
            confidence: trigger.confidence,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdjustmentOutcome {
    pub adjustments: Vec<ContextualAdjustment>,
    pub total_impact: i32,
}

/// Runs every rule in catalog order. Deltas are summed but never clamped here.
pub(crate) fn apply_adjustments(ctx: &AdjustmentContext<'_>) -> AdjustmentOutcome {
    let adjustments: Vec<ContextualAdjustment> = AdjustmentRule::CATALOG
        .into_iter()
        .filter_map(|rule| rule.evaluate(ctx))
        .inspect(|adjustment| {
            debug!(
                rule = %adjustment.rule_code,
                impact = adjustment.impact,
                "contextual adjustment fired"
            );
        })
        .collect();
    let total_impact = adjustments.iter().map(|adjustment| adjustment.impact).sum();

    AdjustmentOutcome {
        adjustments,
        total_impact,
    }
}

fn gcc_experience(
    ctx: &AdjustmentContext<'_>,
    range: std::ops::Range<f64>,
) -> Option<Trigger> {
    if !ctx.job.require_gcc_experience {
        return None;
    }
    let years = ctx.candidate.gcc_years();
    if !range.contains(&years) {
        return None;
    }
    Trigger::new(
        format!("{years} years of GCC experience on a GCC-focused role"),
        1.0,
    )
}

fn perfect_skills(ctx: &AdjustmentContext<'_>) -> Option<Trigger> {
    let detail = &ctx.signals.get(SectionName::Skills)?.detail;
    let matched = detail.matched_required.len() + detail.matched_preferred.len();
    let complete = detail.missing_required.is_empty() && detail.missing_preferred.is_empty();
    if !complete || matched == 0 {
        return None;
    }
    Trigger::new(
        format!("All {matched} required and preferred skills matched"),
        0.95,
    )
}

fn critical_skill_gap(ctx: &AdjustmentContext<'_>) -> Option<Trigger> {
    let detail = &ctx.signals.get(SectionName::Skills)?.detail;
    let total = detail.required_total();
    if total == 0 {
        return None;
    }
    let missing = detail.missing_required.len();
    let ratio = missing as f64 / total as f64;
    if ratio < CRITICAL_GAP_RATIO {
        return None;
    }
    Trigger::new(
        format!(
            "Missing {missing} of {total} required skills: {}",
            detail.missing_required.join(", ")
        ),
        0.7 + 0.3 * ratio,
    )
}

fn overqualified(
    ctx: &AdjustmentContext<'_>,
    range: std::ops::RangeInclusive<f64>,
) -> Option<Trigger> {
    let max = f64::from(ctx.job.max_experience_years?);
    let surplus = ctx.candidate.total_experience_years - max;
    if !range.contains(&surplus) {
        return None;
    }
    Trigger::new(
        format!("{surplus:.1} years beyond the {max} year maximum"),
        0.9,
    )
}

fn salary_sweet_spot(ctx: &AdjustmentContext<'_>) -> Option<Trigger> {
    let expected = ctx.job.comparable_salary(ctx.candidate)?;
    let (min, max) = (f64::from(ctx.job.salary_min), f64::from(ctx.job.salary_max));
    if max <= min {
        return None;
    }
    let position = (expected - min) / (max - min);
    if !(SWEET_SPOT.0..=SWEET_SPOT.1).contains(&position) {
        return None;
    }
    Trigger::new(
        format!(
            "Expected salary sits at {:.0}% of the advertised band",
            position * 100.0
        ),
        1.0 - (position - 0.5).abs(),
    )
}

fn salary_flight_risk(ctx: &AdjustmentContext<'_>) -> Option<Trigger> {
    let expected = ctx.job.comparable_salary(ctx.candidate)?;
    let max = f64::from(ctx.job.salary_max);
    if max <= 0.0 || expected < max * FLIGHT_RISK_MULTIPLIER {
        return None;
    }
    Trigger::new(
        format!(
            "Expected salary is {:.0}% above the advertised maximum",
            (expected / max - 1.0) * 100.0
        ),
        0.9,
    )
}

fn job_hopping(ctx: &AdjustmentContext<'_>) -> Option<Trigger> {
    let recent = ctx.timeline.roles_started_within(JOB_HOPPING_WINDOW_MONTHS);
    if recent < JOB_HOPPING_MIN_ROLES {
        return None;
    }
    Trigger::new(format!("{recent} roles started within the last 5 years"), 0.85)
}

fn industry_continuity(ctx: &AdjustmentContext<'_>) -> Option<Trigger> {
    let industry = ctx.job.industry.as_deref()?;
    let months = ctx.timeline.months_in_industry(industry);
    if months < INDUSTRY_CONTINUITY_MONTHS {
        return None;
    }
    Trigger::new(
        format!(
            "{:.1} years of cumulative experience in {industry}",
            f64::from(months) / 12.0
        ),
        0.8,
    )
}

/// Rough seniority rank inferred from title keywords.
fn seniority_rank(title: &str) -> u8 {
    let lowered = title.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();
    let has = |keywords: &[&str]| words.iter().any(|word| keywords.contains(word));

    if has(&["chief", "ceo", "coo", "cfo", "cto", "vp"]) || lowered.contains("vice president") {
        6
    } else if has(&["director", "head"]) {
        5
    } else if has(&["manager"]) {
        4
    } else if has(&["senior", "lead", "principal", "supervisor"]) {
        3
    } else if has(&["junior", "assistant", "trainee", "intern", "graduate"]) {
        1
    } else {
        2
    }
}

fn career_progression(ctx: &AdjustmentContext<'_>) -> Option<Trigger> {
    let ranks: Vec<u8> = ctx
        .timeline
        .spans()
        .iter()
        .map(|span| seniority_rank(&span.record.title))
        .collect();
    let (first, last) = (*ranks.first()?, *ranks.last()?);
    if last <= first || ranks.windows(2).any(|pair| pair[1] < pair[0]) {
        return None;
    }

    // One promotion earns 0.6; each further promotion adds 0.1.
    let promotions = ranks.windows(2).filter(|pair| pair[1] > pair[0]).count();
    let confidence = (0.6 + 0.1 * promotions.saturating_sub(1) as f64).min(0.9);
    let titles: Vec<&str> = ctx
        .timeline
        .spans()
        .iter()
        .map(|span| span.record.title.as_str())
        .collect();
    Trigger::new(
        format!("Upward trajectory: {}", titles.join(" -> ")),
        confidence,
    )
}

fn recent_unemployment(ctx: &AdjustmentContext<'_>) -> Option<Trigger> {
    let months = ctx.timeline.months_since_last_role()?;
    if months < UNEMPLOYMENT_GAP_MONTHS {
        return None;
    }
    Trigger::new(
        format!("No recorded employment for {months} months"),
        0.8,
    )
}

fn relevant_fields(job: &JobPosting) -> Vec<String> {
    let mut fields: Vec<String> = [job.industry.as_deref(), job.sub_industry.as_deref()]
        .into_iter()
        .flatten()
        .map(|value| value.trim().to_lowercase())
        .filter(|value| !value.is_empty())
        .collect();

    let title = job.title.to_lowercase();
    let logistics_role = LOGISTICS_FIELDS
        .iter()
        .any(|field| title.contains(field) || fields.iter().any(|value| value.contains(field)));
    if logistics_role {
        fields.extend(LOGISTICS_FIELDS.iter().map(|field| field.to_string()));
    }
    fields
}

fn mentions_mba(value: &str) -> bool {
    value
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word.eq_ignore_ascii_case("mba"))
}

fn education_bonus(ctx: &AdjustmentContext<'_>) -> Option<Trigger> {
    let candidate = ctx.candidate;
    let record = candidate.highest_education_record();

    let mba = candidate.education_level.as_deref().is_some_and(mentions_mba)
        || record.is_some_and(|record| mentions_mba(&record.level));
    if mba {
        return Trigger::new("Holds an MBA".to_string(), 0.9);
    }

    let field = record?.field_of_study.as_deref()?.to_lowercase();
    let matched = relevant_fields(ctx.job)
        .into_iter()
        .find(|relevant| field.contains(relevant.as_str()))?;
    Trigger::new(
        format!("Highest qualification is in a {matched}-related field"),
        0.75,
    )
}
