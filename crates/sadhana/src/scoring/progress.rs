use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::criteria::{
    resolve_criteria, BatchCriteria, BatchSelector, CriteriaProvider, ScoringMode,
};
use super::domain::{UserId, UserProfile};
use super::repository::{EntryRepository, ProfileRepository, RepositoryError};
use super::weekly::{aggregate_week, WeekWindow, WeeklyStats};

/// One member's slice of a group report. `stats` is `None` when that member
/// could not be aggregated; `error` says why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberProgress {
    pub user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<WeeklyStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MemberProgress {
    fn incomplete(user_id: UserId) -> Self {
        Self {
            user_id,
            display_name: None,
            batch: None,
            stats: None,
            error: Some("aggregation did not complete".to_string()),
        }
    }
}

/// Weekly stats for a set of members, keyed by member id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupProgress {
    pub window: WeekWindow,
    pub mode: ScoringMode,
    pub members: BTreeMap<UserId, MemberProgress>,
}

impl GroupProgress {
    pub fn succeeded(&self) -> usize {
        self.members
            .values()
            .filter(|member| member.stats.is_some())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.members.len() - self.succeeded()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MemberProgressError {
    #[error("profile not found")]
    ProfileMissing,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

struct MemberOutcome {
    profile: UserProfile,
    batch: String,
    stats: WeeklyStats,
}

/// Aggregates the week containing `anchor` for every member concurrently.
///
/// The scoring mode and overrides are read once and shared by all members.
/// A failure for one member is recorded on that member only.
pub async fn assemble_group_progress<E, P, C>(
    entries: Arc<E>,
    profiles: Arc<P>,
    provider: &C,
    members: Vec<UserId>,
    anchor: NaiveDate,
) -> GroupProgress
where
    E: EntryRepository + 'static,
    P: ProfileRepository + 'static,
    C: CriteriaProvider + ?Sized,
{
    let window = WeekWindow::containing(anchor);
    let mode = provider.scoring_mode();
    let overrides = Arc::new(provider.overrides());

    let mut report: BTreeMap<UserId, MemberProgress> = members
        .into_iter()
        .map(|user_id| (user_id.clone(), MemberProgress::incomplete(user_id)))
        .collect();

    let mut tasks = JoinSet::new();
    for user_id in report.keys().cloned() {
        let entries = Arc::clone(&entries);
        let profiles = Arc::clone(&profiles);
        let overrides = Arc::clone(&overrides);
        tasks.spawn_blocking(move || {
            let outcome = member_progress(
                entries.as_ref(),
                profiles.as_ref(),
                &overrides,
                &user_id,
                window,
                mode,
            );
            (user_id, outcome)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (user_id, outcome) = match joined {
            Ok(result) => result,
            Err(error) => {
                warn!(%error, "member aggregation task failed");
                continue;
            }
        };

        let Some(member) = report.get_mut(&user_id) else {
            continue;
        };

        match outcome {
            Ok(outcome) => {
                debug!(user = %user_id, entries = outcome.stats.entry_count, "member aggregated");
                member.display_name = outcome.profile.display_name;
                member.batch = Some(outcome.batch);
                member.stats = Some(outcome.stats);
                member.error = None;
            }
            Err(error) => {
                warn!(user = %user_id, %error, "skipping member in group report");
                member.error = Some(error.to_string());
            }
        }
    }

    GroupProgress {
        window,
        mode,
        members: report,
    }
}

fn member_progress<E, P>(
    entries: &E,
    profiles: &P,
    overrides: &BTreeMap<String, BatchCriteria>,
    user_id: &UserId,
    window: WeekWindow,
    mode: ScoringMode,
) -> Result<MemberOutcome, MemberProgressError>
where
    E: EntryRepository + ?Sized,
    P: ProfileRepository + ?Sized,
{
    let profile = profiles
        .profile(user_id)?
        .ok_or(MemberProgressError::ProfileMissing)?;

    let week = window.select(entries.range(user_id, window.start, window.end)?);
    let resolved = resolve_criteria(Some(&BatchSelector::ByProfile(profile.clone())), overrides);
    let stats = aggregate_week(&week, &resolved, mode);

    Ok(MemberOutcome {
        profile,
        batch: resolved.batch,
        stats,
    })
}
