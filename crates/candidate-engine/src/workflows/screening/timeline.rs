use chrono::{DateTime, Datelike, Months, NaiveDate};

use super::domain::EmploymentRecord;

/// Parses the date shapes intake produces: `YYYY-MM-DD`, `YYYY-MM` and RFC 3339.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(moment) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(moment.date_naive());
    }
    NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d").ok()
}

fn is_open_ended(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "" | "present" | "current" | "now"
    )
}

/// Whole months elapsed between two dates, zero when `to` precedes `from`.
pub(crate) fn months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    if to <= from {
        return 0;
    }
    let mut months = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    if to.day() < from.day() {
        months -= 1;
    }
    months.max(0) as u32
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EmploymentSpan<'a> {
    pub record: &'a EmploymentRecord,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub ongoing: bool,
}

impl EmploymentSpan<'_> {
    pub fn months(&self) -> u32 {
        months_between(self.start, self.end)
    }
}

/// Dated view of an employment history, resolved against the evaluation date.
#[derive(Debug, Clone)]
pub(crate) struct CareerTimeline<'a> {
    spans: Vec<EmploymentSpan<'a>>,
    malformed: usize,
    evaluated_on: NaiveDate,
}

impl<'a> CareerTimeline<'a> {
    pub fn build(history: &'a [EmploymentRecord], evaluated_on: NaiveDate) -> Self {
        let mut spans = Vec::with_capacity(history.len());
        let mut malformed = 0;

        for record in history {
            let Some(raw_start) = record.start.as_deref() else {
                continue;
            };
            let Some(start) = parse_date(raw_start) else {
                malformed += 1;
                continue;
            };

            // A missing end on a non-current role is read as ongoing rather than guessed.
            let (end, ongoing) = match record.end.as_deref() {
                _ if record.is_current => (evaluated_on, true),
                None => (evaluated_on, true),
                Some(raw) if is_open_ended(raw) => (evaluated_on, true),
                Some(raw) => match parse_date(raw) {
                    Some(end) => (end.min(evaluated_on), false),
                    None => {
                        malformed += 1;
                        continue;
                    }
                },
            };

            spans.push(EmploymentSpan {
                record,
                start,
                end: end.max(start),
                ongoing,
            });
        }

        spans.sort_by_key(|span| span.start);
        Self {
            spans,
            malformed,
            evaluated_on,
        }
    }

    pub fn spans(&self) -> &[EmploymentSpan<'a>] {
        &self.spans
    }

    pub fn has_malformed_dates(&self) -> bool {
        self.malformed > 0
    }

    pub fn is_currently_employed(&self) -> bool {
        self.spans.iter().any(|span| span.ongoing)
    }

    /// Roles whose start date falls within the trailing window.
    pub fn roles_started_within(&self, months: u32) -> usize {
        let Some(cutoff) = self.evaluated_on.checked_sub_months(Months::new(months)) else {
            return self.spans.len();
        };
        self.spans
            .iter()
            .filter(|span| span.start >= cutoff)
            .count()
    }

    /// Months since the most recent role ended, `None` while employed or with no dated roles.
    pub fn months_since_last_role(&self) -> Option<u32> {
        if self.is_currently_employed() {
            return None;
        }
        self.spans
            .iter()
            .map(|span| span.end)
            .max()
            .map(|last_end| months_between(last_end, self.evaluated_on))
    }

    /// Total months spent in roles whose industry matches `industry`.
    pub fn months_in_industry(&self, industry: &str) -> u32 {
        let needle = industry.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return 0;
        }
        self.spans
            .iter()
            .filter(|span| {
                span.record.industry.as_deref().is_some_and(|value| {
                    let value = value.trim().to_ascii_lowercase();
                    !value.is_empty() && (value.contains(&needle) || needle.contains(&value))
                })
            })
            .map(EmploymentSpan::months)
            .sum()
    }
}
