mod stats;

pub use stats::{day_label, DayScore, WeeklyStats};

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use super::criteria::{ResolvedCriteria, ScoringMode};
use super::daily::{calculate_daily_score, round_to_tenth, DailyScore, ScoreBreakdown};
use super::domain::SadhanaEntry;

/// Sunday-to-Saturday window, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekWindow {
    /// Week starting on the most recent Sunday on or before `anchor`.
    pub fn containing(anchor: NaiveDate) -> Self {
        let offset = i64::from(anchor.weekday().num_days_from_sunday());
        let start = anchor - Duration::days(offset);
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    /// 00:00:00.000 on the first day.
    pub fn start_bound(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// 23:59:59.999 on the last day.
    pub fn end_bound(&self) -> NaiveDateTime {
        self.end.and_time(NaiveTime::MIN) + Duration::days(1) - Duration::milliseconds(1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(7)
    }

    /// Keeps entries inside the window, oldest first. A repeated date keeps
    /// the first record the store returned.
    pub fn select(&self, entries: Vec<SadhanaEntry>) -> Vec<SadhanaEntry> {
        let mut selected: Vec<SadhanaEntry> = entries
            .into_iter()
            .filter(|entry| self.contains(entry.date))
            .collect();
        selected.sort_by_key(|entry| entry.date);
        selected.dedup_by_key(|entry| entry.date);
        selected
    }
}

/// Aggregates entries already filtered to one week and sorted by date.
///
/// Per-entry mode trusts a cached score when both the score and its breakdown
/// are present. Weekly-consolidated mode always rescores and reports the
/// week's average against every day.
pub fn aggregate_week(
    entries: &[SadhanaEntry],
    resolved: &ResolvedCriteria,
    mode: ScoringMode,
) -> WeeklyStats {
    if entries.is_empty() {
        return WeeklyStats::empty(mode);
    }

    let count = entries.len();
    let scores: Vec<DailyScore> = entries
        .iter()
        .map(|entry| match mode {
            ScoringMode::PerEntry => cached_or_fresh(entry, resolved),
            ScoringMode::WeeklyConsolidated => calculate_daily_score(entry, resolved),
        })
        .collect();

    let mut breakdown = ScoreBreakdown::default();
    for score in &scores {
        breakdown.accumulate(&score.breakdown);
    }

    let total_score = saturating_sum(scores.iter().map(|score| score.total_score));
    let average_score = round_to_tenth(mean(total_score, count));

    let total_reading_minutes = saturating_sum(entries.iter().map(|entry| entry.reading_minutes));
    let total_hearing_minutes = saturating_sum(entries.iter().map(SadhanaEntry::hearing_minutes));
    let wake_hours = saturating_sum(entries.iter().map(wake_hour));

    let mangala_days = entries.iter().filter(|entry| entry.mangala_arati).count();
    let program_days = entries.iter().filter(|entry| entry.morning_program).count();

    let daily_scores = entries
        .iter()
        .zip(&scores)
        .map(|(entry, score)| DayScore {
            date: entry.date,
            day: day_label(entry.date.weekday()),
            score: match mode {
                ScoringMode::PerEntry => score.total_score,
                ScoringMode::WeeklyConsolidated => average_score.round() as u32,
            },
        })
        .collect();

    WeeklyStats {
        mode,
        entry_count: count,
        total_score,
        average_score,
        breakdown,
        total_reading_minutes,
        average_reading_minutes: mean(total_reading_minutes, count).round() as u32,
        total_hearing_minutes,
        average_hearing_minutes: mean(total_hearing_minutes, count).round() as u32,
        average_wake_up_hour: round_to_tenth(mean(wake_hours, count)),
        mangala_arati_attendance: attendance(mangala_days, count),
        morning_program_attendance: attendance(program_days, count),
        daily_scores,
        entries: entries.to_vec(),
    }
}

fn cached_or_fresh(entry: &SadhanaEntry, resolved: &ResolvedCriteria) -> DailyScore {
    match (entry.score, entry.score_breakdown) {
        (Some(total_score), Some(breakdown)) => DailyScore {
            total_score,
            breakdown,
        },
        _ => calculate_daily_score(entry, resolved),
    }
}

fn saturating_sum(values: impl Iterator<Item = u32>) -> u32 {
    values.fold(0, u32::saturating_add)
}

fn mean(total: u32, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    f64::from(total) / count as f64
}

fn attendance(days: usize, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    round_to_tenth(days as f64 / count as f64 * 100.0)
}

/// Leading integer of the wake-up hour; anything unreadable counts as 0.
fn wake_hour(entry: &SadhanaEntry) -> u32 {
    let Some(raw) = entry.wake_up_time.as_deref() else {
        return 0;
    };
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}
