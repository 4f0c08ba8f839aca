use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use super::daily::ScoreBreakdown;

/// Identifier wrapper for devotees.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One day of practice for one devotee.
///
/// `score` and `score_breakdown` are a cache written back by the service after
/// scoring; the raw fields are always the source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SadhanaEntry {
    pub user_id: UserId,
    #[serde(deserialize_with = "deserialize_day")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub chanting_rounds: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub reading_minutes: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub sp_lecture_minutes: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub sm_lecture_minutes: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub gsns_lecture_minutes: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub hgrsp_lecture_minutes: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub service_minutes: u32,
    #[serde(default, alias = "shlokaMemorized", deserialize_with = "null_as_zero")]
    pub shloka_count: u32,
    #[serde(default)]
    pub day_sleep_duration: Option<u32>,
    #[serde(default)]
    pub wake_up_time: Option<String>,
    #[serde(default)]
    pub sleep_time: Option<String>,
    #[serde(default)]
    pub chanting_completion_time: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub mangala_arati: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub tulsi_arati: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub narsimha_arati: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub guru_puja: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub bhagavatam_class: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub morning_program: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub evening_arati: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub spiritual_class: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub maintained_diet: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_breakdown: Option<ScoreBreakdown>,
}

impl SadhanaEntry {
    /// Blank log for a day; every metric absent.
    pub fn new(user_id: UserId, date: NaiveDate) -> Self {
        Self {
            user_id,
            date,
            chanting_rounds: 0,
            reading_minutes: 0,
            sp_lecture_minutes: 0,
            sm_lecture_minutes: 0,
            gsns_lecture_minutes: 0,
            hgrsp_lecture_minutes: 0,
            service_minutes: 0,
            shloka_count: 0,
            day_sleep_duration: None,
            wake_up_time: None,
            sleep_time: None,
            chanting_completion_time: None,
            mangala_arati: false,
            tulsi_arati: false,
            narsimha_arati: false,
            guru_puja: false,
            bhagavatam_class: false,
            morning_program: false,
            evening_arati: false,
            spiritual_class: false,
            maintained_diet: false,
            notes: None,
            score: None,
            score_breakdown: None,
        }
    }

    /// Raw lecture minutes across all four hearing categories, uncapped.
    pub fn hearing_minutes(&self) -> u32 {
        self.sp_lecture_minutes
            .saturating_add(self.sm_lecture_minutes)
            .saturating_add(self.gsns_lecture_minutes)
            .saturating_add(self.hgrsp_lecture_minutes)
    }
}

/// Profile fields the engine reads; everything else belongs to the profile store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_name: Option<String>,
}

impl UserProfile {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }

    pub fn with_batch(mut self, batch: impl Into<String>) -> Self {
        self.batch = Some(batch.into());
        self
    }

    /// `batch` wins over the older `batchName` field; blank values count as unset.
    pub fn batch_identifier(&self) -> Option<&str> {
        [self.batch.as_deref(), self.batch_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty())
    }
}

pub(crate) fn parse_day(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

fn deserialize_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_day(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("failed to parse '{raw}' as a calendar day"))
    })
}

/// Stores write unset counters as `null`; those read as zero.
fn null_as_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(0))
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}
