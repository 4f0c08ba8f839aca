use chrono::NaiveDate;
use serde::Serialize;

use super::criteria::{CriteriaSource, ResolvedCriteria};
use super::daily::{requirement_checks, DailyScore, RequirementCheck};
use super::domain::{SadhanaEntry, UserId};
use super::weekly::{WeekWindow, WeeklyStats};

#[derive(Debug, Clone, Serialize)]
pub struct DailyScoreReport {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub batch: String,
    pub criteria_source: CriteriaSource,
    pub total_score: u32,
    pub score: DailyScore,
    pub body_score: u32,
    pub soul_score: u32,
    pub body_percentage: f64,
    pub soul_percentage: f64,
    pub requirements: Vec<RequirementCheck>,
}

impl DailyScoreReport {
    pub fn new(entry: &SadhanaEntry, resolved: &ResolvedCriteria, score: DailyScore) -> Self {
        Self {
            user_id: entry.user_id.clone(),
            date: entry.date,
            batch: resolved.batch.clone(),
            criteria_source: resolved.source,
            total_score: score.total_score,
            score,
            body_score: score.breakdown.body_score(),
            soul_score: score.breakdown.soul_score(),
            body_percentage: score.body_percentage(&resolved.criteria),
            soul_percentage: score.soul_percentage(&resolved.criteria),
            requirements: requirement_checks(entry, &resolved.criteria),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyReport {
    pub user_id: UserId,
    pub batch: String,
    pub criteria_source: CriteriaSource,
    pub window: WeekWindow,
    pub stats: WeeklyStats,
}
