use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::resolver::{canonical_batch_key, resolve_criteria, BatchSelector, ResolvedCriteria};
use super::BatchCriteria;
use crate::scoring::repository::{ConfigurationStore, RepositoryError};

/// Store key holding the JSON map of batch name to criteria.
pub const OVERRIDES_KEY: &str = "batchCriteriaOverrides";
/// Store key holding the JSON boolean that enables weekly-consolidated scoring.
pub const SCORING_MODE_KEY: &str = "weeklyScoringMode";

/// Global scoring mode; the two are mutually exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Every day is scored and shown on its own.
    #[default]
    PerEntry,
    /// A week is scored as one unit and its average is shown against every day.
    WeeklyConsolidated,
}

impl ScoringMode {
    pub fn from_weekly_flag(weekly: bool) -> Self {
        if weekly {
            Self::WeeklyConsolidated
        } else {
            Self::PerEntry
        }
    }

    pub fn is_weekly(self) -> bool {
        matches!(self, ScoringMode::WeeklyConsolidated)
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoringMode::PerEntry => "per-entry",
            ScoringMode::WeeklyConsolidated => "weekly consolidated",
        }
    }
}

/// Source of batch overrides and the scoring mode.
pub trait CriteriaProvider: Send + Sync {
    fn overrides(&self) -> BTreeMap<String, BatchCriteria>;
    fn scoring_mode(&self) -> ScoringMode;

    fn resolve(&self, selector: Option<&BatchSelector>) -> ResolvedCriteria {
        resolve_criteria(selector, &self.overrides())
    }

    fn effective_criteria(&self, name: &str) -> BatchCriteria {
        self.resolve(Some(&BatchSelector::by_name(name))).criteria
    }
}

/// Provider backed by a [`ConfigurationStore`]. Unreadable or corrupt values
/// are logged and treated as absent.
pub struct StoredConfiguration<S> {
    store: Arc<S>,
}

impl<S> StoredConfiguration<S>
where
    S: ConfigurationStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Replaces one batch entry and writes the whole map back; last writer wins.
    pub fn set_override(&self, name: &str, criteria: BatchCriteria) -> Result<(), RepositoryError> {
        let key = canonical_batch_key(name);
        let mut overrides = self.overrides();
        overrides.insert(key.clone(), criteria);

        let encoded = serde_json::to_string(&overrides)?;
        self.store.write(OVERRIDES_KEY, encoded)?;
        info!(batch = %key, total = overrides.len(), "saved batch criteria override");
        Ok(())
    }

    pub fn set_scoring_mode(&self, mode: ScoringMode) -> Result<(), RepositoryError> {
        let encoded = serde_json::to_string(&mode.is_weekly())?;
        self.store.write(SCORING_MODE_KEY, encoded)?;
        info!(mode = mode.label(), "saved scoring mode");
        Ok(())
    }

    fn read_key(&self, key: &str) -> Option<String> {
        match self.store.read(key) {
            Ok(value) => value.filter(|raw| !raw.trim().is_empty()),
            Err(error) => {
                warn!(key, %error, "configuration store unavailable, using defaults");
                None
            }
        }
    }
}

impl<S> CriteriaProvider for StoredConfiguration<S>
where
    S: ConfigurationStore,
{
    fn overrides(&self) -> BTreeMap<String, BatchCriteria> {
        let Some(raw) = self.read_key(OVERRIDES_KEY) else {
            return BTreeMap::new();
        };

        let batches = match serde_json::from_str::<BTreeMap<String, Value>>(&raw) {
            Ok(batches) => batches,
            Err(error) => {
                warn!(%error, "ignoring unparsable batch criteria overrides");
                return BTreeMap::new();
            }
        };

        batches
            .into_iter()
            .filter_map(|(name, value)| match serde_json::from_value::<BatchCriteria>(value) {
                Ok(criteria) => Some((canonical_batch_key(&name), criteria)),
                Err(error) => {
                    warn!(batch = %name, %error, "skipping unparsable batch criteria");
                    None
                }
            })
            .collect()
    }

    fn scoring_mode(&self) -> ScoringMode {
        let Some(raw) = self.read_key(SCORING_MODE_KEY) else {
            return ScoringMode::default();
        };

        match serde_json::from_str::<bool>(raw.trim()) {
            Ok(weekly) => ScoringMode::from_weekly_flag(weekly),
            Err(error) => {
                warn!(%error, value = %raw, "ignoring unparsable scoring mode flag");
                ScoringMode::default()
            }
        }
    }
}

/// Fixed in-memory provider.
#[derive(Debug, Clone, Default)]
pub struct StaticConfiguration {
    overrides: BTreeMap<String, BatchCriteria>,
    mode: ScoringMode,
}

impl StaticConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_override(mut self, name: &str, criteria: BatchCriteria) -> Self {
        self.overrides.insert(canonical_batch_key(name), criteria);
        self
    }

    pub fn with_mode(mut self, mode: ScoringMode) -> Self {
        self.mode = mode;
        self
    }
}

impl CriteriaProvider for StaticConfiguration {
    fn overrides(&self) -> BTreeMap<String, BatchCriteria> {
        self.overrides.clone()
    }

    fn scoring_mode(&self) -> ScoringMode {
        self.mode
    }
}
