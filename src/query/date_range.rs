//! Date range resolution for listings
//!
//! Turns request-level period parameters into a concrete inclusive
//! `[from, to]` interval. Named presets are computed relative to "today";
//! freeform bounds are parsed independently with parse failures swallowed.
//! Bounds still absent afterwards are defaulted from the earliest/latest
//! `spent_on` visible to the caller.
//!
//! The default lower bound is one day before the earliest visible entry.
//! This mirrors the sibling time reporting behavior and is intentional;
//! tests pin it.

use chrono::{Datelike, Duration, Months, NaiveDate};

/// How the period parameters should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodType {
    /// A named preset such as `current_week`
    Preset,
    /// Raw `from`/`to` date strings
    Freeform,
}

/// Request-level period parameters
#[derive(Debug, Clone, Default)]
pub struct PeriodParams {
    /// Explicit interpretation; when absent it is inferred from which of
    /// `period` / `from` / `to` are present
    pub period_type: Option<PeriodType>,
    /// Preset name, when applicable
    pub period: Option<String>,
    /// Raw lower bound (ISO-ish date string)
    pub from: Option<String>,
    /// Raw upper bound (ISO-ish date string)
    pub to: Option<String>,
}

/// A resolved inclusive date interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Whether the bounds came from freeform user input
    pub freeform: bool,
}

/// Earliest and latest `spent_on` among the entries visible to the caller
#[derive(Debug, Clone, Copy, Default)]
pub struct SpentOnBounds {
    pub min: Option<NaiveDate>,
    pub max: Option<NaiveDate>,
}

/// Resolve period parameters into a concrete date range.
///
/// Pure function of its inputs: the request parameters, "today", the
/// configured first day of week (0 = Sunday, 1 = Monday) and the
/// visibility-scoped `spent_on` bounds used for defaulting.
pub fn resolve(
    params: &PeriodParams,
    today: NaiveDate,
    first_day_of_week: u8,
    visible: SpentOnBounds,
) -> DateRange {
    let mut from: Option<NaiveDate> = None;
    let mut to: Option<NaiveDate> = None;
    let mut freeform = false;

    let preset_branch = params.period_type == Some(PeriodType::Preset)
        || (params.period_type.is_none() && params.period.is_some());
    let freeform_branch = params.period_type == Some(PeriodType::Freeform)
        || (params.period_type.is_none() && (params.from.is_some() || params.to.is_some()));

    if preset_branch {
        if let Some((f, t)) = preset_interval(
            params.period.as_deref().unwrap_or(""),
            today,
            first_day_of_week,
        ) {
            from = Some(f);
            to = Some(t);
        }
        // Unrecognized preset names set no bounds; defaults apply below.
    } else if freeform_branch {
        // Each side parsed independently; a parse failure leaves the
        // bound absent rather than failing the request.
        from = params.from.as_deref().filter(|s| !s.is_empty()).and_then(parse_date);
        to = params.to.as_deref().filter(|s| !s.is_empty()).and_then(parse_date);
        freeform = true;
    }

    if let (Some(f), Some(t)) = (from, to) {
        if f > t {
            from = Some(t);
            to = Some(f);
        }
    }

    // Default lower bound: one day before the earliest visible entry
    // (or today when none exist). The off-by-one is pinned behavior.
    let from = from.unwrap_or_else(|| visible.min.unwrap_or(today) - Duration::days(1));
    let to = to.unwrap_or_else(|| visible.max.unwrap_or(today));

    DateRange { from, to, freeform }
}

/// Map a preset name to its interval relative to `today`
fn preset_interval(
    name: &str,
    today: NaiveDate,
    first_day_of_week: u8,
) -> Option<(NaiveDate, NaiveDate)> {
    match name {
        "today" => Some((today, today)),
        "yesterday" => {
            let d = today - Duration::days(1);
            Some((d, d))
        }
        "current_week" => {
            let from = week_start(today, first_day_of_week);
            Some((from, from + Duration::days(6)))
        }
        "last_week" => {
            let from = week_start(today, first_day_of_week) - Duration::days(7);
            Some((from, from + Duration::days(6)))
        }
        "7_days" => Some((today - Duration::days(7), today)),
        "current_month" => {
            let from = first_of_month(today);
            Some((from, last_of_month(from)))
        }
        "last_month" => {
            let from = first_of_month(today) - Months::new(1);
            Some((from, last_of_month(from)))
        }
        "30_days" => Some((today - Duration::days(30), today)),
        "current_year" => Some((
            NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap(),
        )),
        _ => None,
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Start of the week containing `date` for the configured first weekday
fn week_start(date: NaiveDate, first_day_of_week: u8) -> NaiveDate {
    let days_back =
        (date.weekday().num_days_from_sunday() + 7 - u32::from(first_day_of_week) % 7) % 7;
    date - Duration::days(i64::from(days_back))
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()
}

fn last_of_month(first: NaiveDate) -> NaiveDate {
    first + Months::new(1) - Duration::days(1)
}
