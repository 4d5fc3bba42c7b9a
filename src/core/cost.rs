use chrono::{DateTime, NaiveDate, Utc};
use crate::models::{CoachCandidate, MatchingRequest, Timeline};

/// Coaching hours assumed per week of an engagement
pub const HOURS_PER_WEEK: f64 = 3.0;

const SECONDS_PER_WEEK: f64 = 7.0 * 24.0 * 60.0 * 60.0;

/// Estimate what engaging a coach for the request's timeline would cost
///
/// This is a planning estimate shown next to a proposal, not a billing
/// calculation: `weeks * 3 hours * hourly rate`, with weeks rounded up and at
/// least one.
pub fn estimate_cost(coach: &CoachCandidate, request: &MatchingRequest) -> f64 {
    engagement_weeks(&request.timeline) as f64 * HOURS_PER_WEEK * coach.hourly_rate
}

/// Whole weeks between start and end, rounded up, minimum 1
///
/// Missing, unparseable, or reversed dates count as a single week.
pub fn engagement_weeks(timeline: &Timeline) -> u32 {
    let (Some(start), Some(end)) = (
        parse_timeline_date(&timeline.start_date),
        parse_timeline_date(&timeline.end_date),
    ) else {
        return 1;
    };

    let elapsed_secs = end.signed_duration_since(start).num_milliseconds() as f64 / 1000.0;
    let weeks = (elapsed_secs / SECONDS_PER_WEEK).ceil();

    if weeks.is_finite() && weeks > 1.0 {
        weeks.min(u32::MAX as f64) as u32
    } else {
        1
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC)
pub fn parse_timeline_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
