use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use super::criteria::{
    BatchCriteria, BatchSelector, CriteriaProvider, ResolvedCriteria, ScoringMode,
    StoredConfiguration,
};
use super::daily::calculate_daily_score;
use super::domain::{SadhanaEntry, UserId};
use super::progress::{assemble_group_progress, GroupProgress};
use super::repository::{ConfigurationStore, EntryRepository, ProfileRepository, RepositoryError};
use super::views::{DailyScoreReport, WeeklyReport};
use super::weekly::{aggregate_week, WeekWindow};

/// Service composing the entry, profile and configuration stores with the
/// scoring engine.
pub struct SadhanaService<E, P, C> {
    entries: Arc<E>,
    profiles: Arc<P>,
    configuration: Arc<StoredConfiguration<C>>,
}

impl<E, P, C> SadhanaService<E, P, C>
where
    E: EntryRepository + 'static,
    P: ProfileRepository + 'static,
    C: ConfigurationStore + 'static,
{
    pub fn new(entries: Arc<E>, profiles: Arc<P>, store: Arc<C>) -> Self {
        Self {
            entries,
            profiles,
            configuration: Arc::new(StoredConfiguration::new(store)),
        }
    }

    /// Criteria for a user's profile; a missing profile resolves to the default batch.
    pub fn criteria_for_user(&self, user_id: &UserId) -> Result<ResolvedCriteria, ServiceError> {
        let selector = self.profiles.profile(user_id)?.map(BatchSelector::ByProfile);
        Ok(self.configuration.resolve(selector.as_ref()))
    }

    /// Scores the entry, caches the result on it, and upserts it by `(user, date)`.
    pub fn submit(&self, mut entry: SadhanaEntry) -> Result<DailyScoreReport, ServiceError> {
        let resolved = self.criteria_for_user(&entry.user_id)?;
        let score = calculate_daily_score(&entry, &resolved);

        entry.score = Some(score.total_score);
        entry.score_breakdown = Some(score.breakdown);
        let stored = self.entries.upsert(entry)?;

        info!(
            user = %stored.user_id,
            date = %stored.date,
            batch = %resolved.batch,
            score = score.total_score,
            "sadhana entry recorded"
        );

        Ok(DailyScoreReport::new(&stored, &resolved, score))
    }

    pub fn entry(
        &self,
        user_id: &UserId,
        date: NaiveDate,
    ) -> Result<Option<SadhanaEntry>, ServiceError> {
        Ok(self.entries.fetch(user_id, date)?)
    }

    /// Rescores a stored entry from its raw fields, ignoring any cached score.
    pub fn daily_score(
        &self,
        user_id: &UserId,
        date: NaiveDate,
    ) -> Result<DailyScoreReport, ServiceError> {
        let entry = self
            .entries
            .fetch(user_id, date)?
            .ok_or(RepositoryError::NotFound)?;
        let resolved = self.criteria_for_user(user_id)?;
        let score = calculate_daily_score(&entry, &resolved);
        Ok(DailyScoreReport::new(&entry, &resolved, score))
    }

    /// Aggregates the Sunday-to-Saturday week containing `anchor`.
    pub fn weekly_report(
        &self,
        user_id: &UserId,
        anchor: NaiveDate,
    ) -> Result<WeeklyReport, ServiceError> {
        let window = WeekWindow::containing(anchor);
        let mode = self.configuration.scoring_mode();
        let resolved = self.criteria_for_user(user_id)?;

        let week = window.select(self.entries.range(user_id, window.start, window.end)?);
        debug!(
            user = %user_id,
            start = %window.start,
            entries = week.len(),
            mode = mode.label(),
            "aggregating week"
        );
        let stats = aggregate_week(&week, &resolved, mode);

        Ok(WeeklyReport {
            user_id: user_id.clone(),
            batch: resolved.batch,
            criteria_source: resolved.source,
            window,
            stats,
        })
    }

    pub fn criteria(&self, batch: &str) -> ResolvedCriteria {
        self.configuration
            .resolve(Some(&BatchSelector::by_name(batch)))
    }

    /// Stores a full replacement for one batch and returns the new effective criteria.
    pub fn save_criteria(
        &self,
        batch: &str,
        criteria: BatchCriteria,
    ) -> Result<ResolvedCriteria, ServiceError> {
        self.configuration.set_override(batch, criteria)?;
        Ok(self.criteria(batch))
    }

    pub fn scoring_mode(&self) -> ScoringMode {
        self.configuration.scoring_mode()
    }

    pub fn set_scoring_mode(&self, mode: ScoringMode) -> Result<(), ServiceError> {
        self.configuration.set_scoring_mode(mode)?;
        Ok(())
    }

    /// Weekly stats for each member; one member's failure leaves the others intact.
    pub async fn group_progress(&self, members: Vec<UserId>, anchor: NaiveDate) -> GroupProgress {
        let report = assemble_group_progress(
            Arc::clone(&self.entries),
            Arc::clone(&self.profiles),
            self.configuration.as_ref(),
            members,
            anchor,
        )
        .await;

        info!(
            start = %report.window.start,
            succeeded = report.succeeded(),
            failed = report.failed(),
            "group progress assembled"
        );
        report
    }
}

/// Error raised by the sadhana service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
