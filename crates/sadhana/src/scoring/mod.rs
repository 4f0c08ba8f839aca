//! Daily sadhana scoring, weekly aggregation, and the storage and HTTP seams
//! around them.
//!
//! Everything under `buckets`, `daily`, and `weekly` is pure: malformed input
//! degrades to a zero contribution instead of an error.

pub mod buckets;
pub mod criteria;
pub mod daily;
pub mod domain;
pub mod import;
pub mod progress;
pub mod repository;
pub mod router;
pub mod service;
pub mod views;
pub mod weekly;

#[cfg(test)]
mod tests;

pub use criteria::{
    builtin_criteria, resolve_criteria, BatchCriteria, BatchSelector, CriteriaProvider,
    CriteriaSource, DurationScore, ResolvedCriteria, ScoringMode, StaticConfiguration,
    StoredConfiguration, TimeRangeScore, DEFAULT_BATCH,
};
pub use daily::{calculate_daily_score, DailyScore, RequirementCheck, ScoreBreakdown};
pub use domain::{SadhanaEntry, UserId, UserProfile};
pub use import::{import_entries_csv, EntryImportError};
pub use progress::{GroupProgress, MemberProgress};
pub use repository::{ConfigurationStore, EntryRepository, ProfileRepository, RepositoryError};
pub use router::sadhana_router;
pub use service::{SadhanaService, ServiceError};
pub use views::{DailyScoreReport, WeeklyReport};
pub use weekly::{aggregate_week, DayScore, WeekWindow, WeeklyStats};
