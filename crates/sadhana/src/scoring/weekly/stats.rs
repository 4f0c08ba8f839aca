use chrono::{NaiveDate, Weekday};
use serde::Serialize;

use crate::scoring::criteria::ScoringMode;
use crate::scoring::daily::ScoreBreakdown;
use crate::scoring::domain::SadhanaEntry;

/// Aggregate over one week of entries. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    pub mode: ScoringMode,
    pub entry_count: usize,
    pub total_score: u32,
    pub average_score: f64,
    pub breakdown: ScoreBreakdown,
    pub total_reading_minutes: u32,
    pub average_reading_minutes: u32,
    pub total_hearing_minutes: u32,
    pub average_hearing_minutes: u32,
    pub average_wake_up_hour: f64,
    pub mangala_arati_attendance: f64,
    pub morning_program_attendance: f64,
    pub daily_scores: Vec<DayScore>,
    pub entries: Vec<SadhanaEntry>,
}

impl WeeklyStats {
    pub fn empty(mode: ScoringMode) -> Self {
        Self {
            mode,
            entry_count: 0,
            total_score: 0,
            average_score: 0.0,
            breakdown: ScoreBreakdown::default(),
            total_reading_minutes: 0,
            average_reading_minutes: 0,
            total_hearing_minutes: 0,
            average_hearing_minutes: 0,
            average_wake_up_hour: 0.0,
            mangala_arati_attendance: 0.0,
            morning_program_attendance: 0.0,
            daily_scores: Vec::new(),
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }
}

/// Score shown against one weekday label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayScore {
    pub date: NaiveDate,
    pub day: &'static str,
    pub score: u32,
}

pub fn day_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}
