mod builtin;
mod registry;
mod resolver;

pub use builtin::{builtin_criteria, DEFAULT_BATCH};
pub use registry::{
    CriteriaProvider, ScoringMode, StaticConfiguration, StoredConfiguration, OVERRIDES_KEY,
    SCORING_MODE_KEY,
};
pub use resolver::{
    canonical_batch_key, resolve_criteria, BatchSelector, CriteriaSource, ResolvedCriteria,
};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Half-open `[start_time, end_time)` window on the clock, in "HH:MM".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRangeScore {
    pub start_time: String,
    pub end_time: String,
    pub points: u32,
}

impl TimeRangeScore {
    pub fn new(start_time: &str, end_time: &str, points: u32) -> Self {
        Self {
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            points,
        }
    }
}

/// Awards `points` when a duration (minutes) is at most `max_duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationScore {
    pub max_duration: u32,
    pub points: u32,
}

/// Scoring tables and thresholds for one batch.
///
/// Minimums double as score caps and display thresholds. `total_body_score`
/// and `total_soul_score` only feed percentage displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCriteria {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_table")]
    pub sleep_time_scoring: Vec<TimeRangeScore>,
    #[serde(default, deserialize_with = "lenient_table")]
    pub wake_up_time_scoring: Vec<TimeRangeScore>,
    #[serde(default, deserialize_with = "lenient_table")]
    pub japa_completion_scoring: Vec<TimeRangeScore>,
    #[serde(default, deserialize_with = "lenient_table")]
    pub day_sleep_scoring: Vec<DurationScore>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub reading_minimum: u32,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub hearing_minimum: u32,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub service_minimum: u32,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub shloka_minimum: u32,
    #[serde(
        default,
        deserialize_with = "lenient_minimum",
        skip_serializing_if = "Option::is_none"
    )]
    pub sp_lecture_minimum: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_minimum",
        skip_serializing_if = "Option::is_none"
    )]
    pub sm_lecture_minimum: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_minimum",
        skip_serializing_if = "Option::is_none"
    )]
    pub gsns_lecture_minimum: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_minimum",
        skip_serializing_if = "Option::is_none"
    )]
    pub hgrsp_lecture_minimum: Option<u32>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub total_body_score: u32,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub total_soul_score: u32,
    #[serde(default, deserialize_with = "lenient_switch")]
    pub show_sp_lecture: bool,
    #[serde(default, deserialize_with = "lenient_switch")]
    pub show_sm_lecture: bool,
    #[serde(default, deserialize_with = "lenient_switch")]
    pub show_gsns_lecture: bool,
    #[serde(default, deserialize_with = "lenient_switch")]
    pub show_hgrsp_lecture: bool,
}

/// Accepts anything: a non-array becomes an empty table and malformed rows
/// are skipped, so one bad row cannot void a whole override map.
fn lenient_table<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let rows = match value {
        Value::Array(rows) => rows,
        _ => return Ok(Vec::new()),
    };

    Ok(rows
        .into_iter()
        .filter_map(|row| serde_json::from_value(row).ok())
        .collect())
}

/// Null, negative, fractional and non-numeric thresholds read as zero.
fn lenient_scalar<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_minimum(deserializer)?.unwrap_or(0))
}

fn lenient_minimum<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_u64().and_then(|n| u32::try_from(n).ok()))
}

fn lenient_switch<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_bool().unwrap_or(false))
}
