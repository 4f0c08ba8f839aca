use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::builtin::{builtin_criteria, default_criteria, DEFAULT_BATCH};
use super::BatchCriteria;
use crate::scoring::domain::UserProfile;

/// Historical spellings mapped onto the key the registry uses.
const BATCH_ALIASES: &[(&str, &str)] = &[
    ("yudhisthira", "yudhishthira"),
    ("yudhistira", "yudhishthira"),
    ("sahadeva", "sahadev"),
];

/// What the caller knows about the batch to score against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchSelector {
    ByName(String),
    ByProfile(UserProfile),
}

impl BatchSelector {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self::ByName(name.into())
    }

    fn batch_key(&self) -> Option<String> {
        let raw = match self {
            BatchSelector::ByName(name) => Some(name.as_str()),
            BatchSelector::ByProfile(profile) => profile.batch_identifier(),
        }?;

        let key = canonical_batch_key(raw);
        (!key.is_empty()).then_some(key)
    }
}

impl From<UserProfile> for BatchSelector {
    fn from(value: UserProfile) -> Self {
        Self::ByProfile(value)
    }
}

/// Where the effective criteria came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CriteriaSource {
    Override,
    BuiltIn,
    Fallback,
}

impl CriteriaSource {
    pub fn label(self) -> &'static str {
        match self {
            CriteriaSource::Override => "override",
            CriteriaSource::BuiltIn => "built-in",
            CriteriaSource::Fallback => "default fallback",
        }
    }
}

/// Criteria snapshot plus the registry key it was found under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedCriteria {
    pub batch: String,
    pub source: CriteriaSource,
    pub criteria: BatchCriteria,
}

impl ResolvedCriteria {
    pub fn builtin(batch: &str) -> Self {
        resolve_criteria(Some(&BatchSelector::by_name(batch)), &BTreeMap::new())
    }
}

/// Lower-cases a batch name and folds known alternate spellings.
pub fn canonical_batch_key(raw: &str) -> String {
    let key = raw.trim().to_lowercase();
    BATCH_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(key)
}

/// Overrides win per key, then built-ins, then the default batch's built-in entry.
pub fn resolve_criteria(
    selector: Option<&BatchSelector>,
    overrides: &BTreeMap<String, BatchCriteria>,
) -> ResolvedCriteria {
    if let Some(key) = selector.and_then(BatchSelector::batch_key) {
        if let Some(criteria) = overrides.get(&key) {
            return ResolvedCriteria {
                batch: key,
                source: CriteriaSource::Override,
                criteria: criteria.clone(),
            };
        }

        if let Some(criteria) = builtin_criteria().get(&key) {
            return ResolvedCriteria {
                batch: key,
                source: CriteriaSource::BuiltIn,
                criteria: criteria.clone(),
            };
        }

        debug!(batch = %key, "unknown batch, using default criteria");
    }

    ResolvedCriteria {
        batch: DEFAULT_BATCH.to_string(),
        source: CriteriaSource::Fallback,
        criteria: default_criteria(),
    }
}
