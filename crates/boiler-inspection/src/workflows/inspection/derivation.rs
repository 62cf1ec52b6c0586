use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use super::domain::{ChecklistAnswer, ChecklistDecision, InspectionResult, InstalledProduct};
use super::reference::CHECKLIST_SIZE;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
const YEAR_MS: i64 = 365 * DAY_MS;
const MONTH_MS: i64 = 30 * DAY_MS;

/// Elapsed service time using 365-day years and 30-day months.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UsageDuration {
    pub years: u32,
    pub months: u32,
}

impl fmt::Display for UsageDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.years == 0 {
            write!(f, "{}개월", self.months)
        } else {
            write!(f, "{}년 {}개월", self.years, self.months)
        }
    }
}

/// Returns `None` without an installation date. Installation dates after
/// `now` clamp to zero.
pub fn usage_duration(
    installation_date: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> Option<UsageDuration> {
    let installed = installation_date?;
    let installed_at = Utc.from_utc_datetime(&installed.and_time(NaiveTime::MIN));
    let elapsed_ms = (now - installed_at).num_milliseconds().max(0);

    Some(UsageDuration {
        years: (elapsed_ms / YEAR_MS) as u32,
        months: ((elapsed_ms % YEAR_MS) / MONTH_MS) as u32,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecklistCompletion {
    pub answered_yes: usize,
    pub total_items: usize,
}

impl fmt::Display for ChecklistCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.answered_yes, self.total_items)
    }
}

/// Display-only progress figure; never used for validation.
pub fn checklist_completion(answers: &BTreeMap<String, ChecklistAnswer>) -> ChecklistCompletion {
    let answered_yes = answers
        .values()
        .filter(|answer| answer.decision == ChecklistDecision::Yes)
        .count();

    ChecklistCompletion {
        answered_yes,
        total_items: CHECKLIST_SIZE,
    }
}

pub fn total_installed_count(products: &[InstalledProduct]) -> u32 {
    products.iter().map(|product| product.count).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTag {
    Success,
    Warning,
    Danger,
    Neutral,
}

impl BadgeTag {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Neutral => "neutral",
        }
    }

    /// Classifies free-form result text, e.g. values read from older records.
    pub fn for_label(raw: &str) -> Self {
        classify_badge(InspectionResult::parse(raw))
    }
}

pub fn classify_badge(result: Option<InspectionResult>) -> BadgeTag {
    match result {
        Some(InspectionResult::Normal) => BadgeTag::Success,
        Some(InspectionResult::Caution) => BadgeTag::Warning,
        Some(InspectionResult::Defective) => BadgeTag::Danger,
        None => BadgeTag::Neutral,
    }
}
