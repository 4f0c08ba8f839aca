//! Table-driven point scorers. None of these fail: malformed input scores 0.

use super::criteria::{canonical_batch_key, BatchCriteria, DurationScore, TimeRangeScore};
use super::domain::SadhanaEntry;

/// Returned by [`time_to_minutes`] for anything that is not a valid "HH:MM".
pub const INVALID_TIME: i32 = -1;

/// Bonus for meeting the shloka minimum. Every current batch shares it.
pub const SHLOKA_BONUS: u32 = 10;

pub const MANGALA_ARATI_POINTS: u32 = 10;
pub const TULSI_ARATI_POINTS: u32 = 5;
pub const NARSIMHA_ARATI_POINTS: u32 = 5;
pub const GURU_PUJA_POINTS: u32 = 5;
pub const BHAGAVATAM_CLASS_POINTS: u32 = 10;

/// Minutes since midnight for a 24-hour "HH:MM" string.
pub fn parse_time_of_day(raw: &str) -> Option<u32> {
    let (hours, minutes) = raw.trim().split_once(':')?;
    let hours = parse_clock_field(hours)?;
    let minutes = parse_clock_field(minutes)?;

    if hours > 23 || minutes > 59 {
        return None;
    }

    Some(hours * 60 + minutes)
}

fn parse_clock_field(field: &str) -> Option<u32> {
    if field.is_empty() || field.len() > 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Minutes since midnight, or [`INVALID_TIME`].
pub fn time_to_minutes(raw: &str) -> i32 {
    parse_time_of_day(raw)
        .map(|minutes| minutes as i32)
        .unwrap_or(INVALID_TIME)
}

/// Points of the first range (in table order) with `start <= time < end`.
pub fn score_by_time_range(time: Option<&str>, ranges: &[TimeRangeScore]) -> u32 {
    if ranges.is_empty() {
        return 0;
    }
    let Some(minutes) = time.and_then(parse_time_of_day) else {
        return 0;
    };

    ranges
        .iter()
        .find(|range| {
            match (
                parse_time_of_day(&range.start_time),
                parse_time_of_day(&range.end_time),
            ) {
                (Some(start), Some(end)) => start <= minutes && minutes < end,
                _ => false,
            }
        })
        .map(|range| range.points)
        .unwrap_or(0)
}

/// Points of the smallest `max_duration` that `duration` fits under.
pub fn score_by_duration(duration: Option<u32>, ranges: &[DurationScore]) -> u32 {
    let Some(duration) = duration else {
        return 0;
    };
    if ranges.is_empty() {
        return 0;
    }

    let mut sorted = ranges.to_vec();
    sorted.sort_by_key(|range| range.max_duration);

    sorted
        .iter()
        .find(|range| duration <= range.max_duration)
        .map(|range| range.points)
        .unwrap_or(0)
}

/// Linear credit up to `minimum`, flat after it.
pub fn capped_minimum_score(value: u32, minimum: u32) -> u32 {
    value.min(minimum)
}

const SHLOKA_BONUSES: &[(&str, u32)] = &[
    ("sahadev", SHLOKA_BONUS),
    ("nakula", SHLOKA_BONUS),
    ("arjuna", SHLOKA_BONUS),
    ("bhima", SHLOKA_BONUS),
    ("yudhishthira", SHLOKA_BONUS),
];

/// Per-batch shloka bonus; batches missing from the table get [`SHLOKA_BONUS`].
pub fn shloka_bonus(batch: &str) -> u32 {
    let key = canonical_batch_key(batch);
    SHLOKA_BONUSES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, bonus)| *bonus)
        .unwrap_or(SHLOKA_BONUS)
}

/// All-or-nothing bonus; a batch without a shloka minimum never awards it.
pub fn shloka_score(count: u32, criteria: &BatchCriteria, batch: &str) -> u32 {
    if criteria.shloka_minimum > 0 && count >= criteria.shloka_minimum {
        shloka_bonus(batch)
    } else {
        0
    }
}

/// Morning program sub-activities only; evening arati, class and diet flags
/// are tracked but not scored here.
pub fn program_attendance_score(entry: &SadhanaEntry) -> u32 {
    [
        (entry.mangala_arati, MANGALA_ARATI_POINTS),
        (entry.tulsi_arati, TULSI_ARATI_POINTS),
        (entry.narsimha_arati, NARSIMHA_ARATI_POINTS),
        (entry.guru_puja, GURU_PUJA_POINTS),
        (entry.bhagavatam_class, BHAGAVATAM_CLASS_POINTS),
    ]
    .into_iter()
    .filter(|(attended, _)| *attended)
    .map(|(_, points)| points)
    .sum()
}
