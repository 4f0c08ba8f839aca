use serde::{Deserialize, Serialize};

use super::buckets::{
    capped_minimum_score, program_attendance_score, score_by_duration, score_by_time_range,
    shloka_score,
};
use super::criteria::{BatchCriteria, ResolvedCriteria};
use super::domain::SadhanaEntry;

/// Points per scoring category for one day (or summed over several).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    #[serde(default)]
    pub sleep_time: u32,
    #[serde(default)]
    pub wake_up_time: u32,
    #[serde(default)]
    pub reading: u32,
    #[serde(default)]
    pub day_sleep: u32,
    #[serde(default)]
    pub japa_completion: u32,
    #[serde(default)]
    pub program: u32,
    #[serde(default)]
    pub hearing: u32,
    #[serde(default)]
    pub shloka: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.body_score().saturating_add(self.soul_score())
    }

    /// Sleep time, wake-up time and day sleep.
    pub fn body_score(&self) -> u32 {
        [self.sleep_time, self.wake_up_time, self.day_sleep]
            .into_iter()
            .fold(0, u32::saturating_add)
    }

    /// Reading, hearing, japa completion, program attendance and shloka.
    pub fn soul_score(&self) -> u32 {
        [
            self.reading,
            self.hearing,
            self.japa_completion,
            self.program,
            self.shloka,
        ]
        .into_iter()
        .fold(0, u32::saturating_add)
    }

    pub(crate) fn accumulate(&mut self, other: &ScoreBreakdown) {
        self.sleep_time = self.sleep_time.saturating_add(other.sleep_time);
        self.wake_up_time = self.wake_up_time.saturating_add(other.wake_up_time);
        self.reading = self.reading.saturating_add(other.reading);
        self.day_sleep = self.day_sleep.saturating_add(other.day_sleep);
        self.japa_completion = self.japa_completion.saturating_add(other.japa_completion);
        self.program = self.program.saturating_add(other.program);
        self.hearing = self.hearing.saturating_add(other.hearing);
        self.shloka = self.shloka.saturating_add(other.shloka);
    }
}

/// Score for one daily entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyScore {
    pub total_score: u32,
    pub breakdown: ScoreBreakdown,
}

impl DailyScore {
    /// Share of `total_body_score`, one decimal. Not capped at 100.
    pub fn body_percentage(&self, criteria: &BatchCriteria) -> f64 {
        percentage(self.breakdown.body_score(), criteria.total_body_score)
    }

    /// Share of `total_soul_score`, one decimal. Not capped at 100.
    pub fn soul_percentage(&self, criteria: &BatchCriteria) -> f64 {
        percentage(self.breakdown.soul_score(), criteria.total_soul_score)
    }
}

fn percentage(value: u32, maximum: u32) -> f64 {
    if maximum == 0 {
        return 0.0;
    }
    round_to_tenth(f64::from(value) / f64::from(maximum) * 100.0)
}

pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Scores one entry against resolved criteria.
///
/// Hearing is the sum of all four lecture categories capped at the combined
/// `hearing_minimum`; per-category minimums and service minutes never enter
/// the total.
pub fn calculate_daily_score(entry: &SadhanaEntry, resolved: &ResolvedCriteria) -> DailyScore {
    let criteria = &resolved.criteria;

    let breakdown = ScoreBreakdown {
        sleep_time: score_by_time_range(entry.sleep_time.as_deref(), &criteria.sleep_time_scoring),
        wake_up_time: score_by_time_range(
            entry.wake_up_time.as_deref(),
            &criteria.wake_up_time_scoring,
        ),
        reading: capped_minimum_score(entry.reading_minutes, criteria.reading_minimum),
        day_sleep: score_by_duration(entry.day_sleep_duration, &criteria.day_sleep_scoring),
        japa_completion: score_by_time_range(
            entry.chanting_completion_time.as_deref(),
            &criteria.japa_completion_scoring,
        ),
        program: program_attendance_score(entry),
        hearing: capped_minimum_score(entry.hearing_minutes(), criteria.hearing_minimum),
        shloka: shloka_score(entry.shloka_count, criteria, &resolved.batch),
    };

    DailyScore {
        total_score: breakdown.total(),
        breakdown,
    }
}

/// Practice areas shown against their batch thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    Reading,
    Hearing,
    Service,
    Shloka,
    SpLecture,
    SmLecture,
    GsnsLecture,
    HgrspLecture,
}

impl Requirement {
    pub fn label(self) -> &'static str {
        match self {
            Requirement::Reading => "Reading",
            Requirement::Hearing => "Hearing",
            Requirement::Service => "Service",
            Requirement::Shloka => "Shloka",
            Requirement::SpLecture => "Srila Prabhupada lectures",
            Requirement::SmLecture => "SM lectures",
            Requirement::GsnsLecture => "GSNS lectures",
            Requirement::HgrspLecture => "HGRSP lectures",
        }
    }
}

/// Display-only threshold check; never feeds the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequirementCheck {
    pub requirement: Requirement,
    pub label: &'static str,
    pub actual: u32,
    pub minimum: u32,
    pub met: bool,
}

impl RequirementCheck {
    fn new(requirement: Requirement, actual: u32, minimum: u32) -> Self {
        Self {
            requirement,
            label: requirement.label(),
            actual,
            minimum,
            met: actual >= minimum,
        }
    }
}

/// Thresholds configured for the batch, in display order.
pub fn requirement_checks(entry: &SadhanaEntry, criteria: &BatchCriteria) -> Vec<RequirementCheck> {
    let mut checks = vec![
        RequirementCheck::new(
            Requirement::Reading,
            entry.reading_minutes,
            criteria.reading_minimum,
        ),
        RequirementCheck::new(
            Requirement::Hearing,
            entry.hearing_minutes(),
            criteria.hearing_minimum,
        ),
        RequirementCheck::new(
            Requirement::Service,
            entry.service_minutes,
            criteria.service_minimum,
        ),
    ];

    if criteria.shloka_minimum > 0 {
        checks.push(RequirementCheck::new(
            Requirement::Shloka,
            entry.shloka_count,
            criteria.shloka_minimum,
        ));
    }

    let lectures = [
        (
            Requirement::SpLecture,
            criteria.show_sp_lecture,
            criteria.sp_lecture_minimum,
            entry.sp_lecture_minutes,
        ),
        (
            Requirement::SmLecture,
            criteria.show_sm_lecture,
            criteria.sm_lecture_minimum,
            entry.sm_lecture_minutes,
        ),
        (
            Requirement::GsnsLecture,
            criteria.show_gsns_lecture,
            criteria.gsns_lecture_minimum,
            entry.gsns_lecture_minutes,
        ),
        (
            Requirement::HgrspLecture,
            criteria.show_hgrsp_lecture,
            criteria.hgrsp_lecture_minimum,
            entry.hgrsp_lecture_minutes,
        ),
    ];

    checks.extend(
        lectures
            .into_iter()
            .filter(|(_, shown, _, _)| *shown)
            .filter_map(|(requirement, _, minimum, actual)| {
                minimum.map(|minimum| RequirementCheck::new(requirement, actual, minimum))
            }),
    );

    checks
}
