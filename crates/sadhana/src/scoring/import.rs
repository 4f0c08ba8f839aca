use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::domain::{parse_day, SadhanaEntry, UserId};

/// Error raised while importing daily logs from CSV.
#[derive(Debug, thiserror::Error)]
pub enum EntryImportError {
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: '{value}' is not a calendar day")]
    InvalidDate { row: usize, value: String },
}

/// Reads one devotee's daily logs from a CSV export with a header row.
///
/// Unknown columns are ignored, missing columns and blank cells leave the
/// field absent. Only the date is mandatory.
pub fn import_entries_csv<R: Read>(
    reader: R,
    user_id: &UserId,
) -> Result<Vec<SadhanaEntry>, EntryImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut entries = Vec::new();

    for (index, record) in csv_reader.deserialize::<EntryRow>().enumerate() {
        let row = record?;
        // header is line 1
        let line = index + 2;
        let date = parse_day(&row.date).ok_or_else(|| EntryImportError::InvalidDate {
            row: line,
            value: row.date.clone(),
        })?;

        entries.push(row.into_entry(user_id.clone(), date));
    }

    Ok(entries)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryRow {
    date: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    wake_up_time: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    sleep_time: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    chanting_completion_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    chanting_rounds: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    reading_minutes: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    sp_lecture_minutes: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    sm_lecture_minutes: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    gsns_lecture_minutes: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    hgrsp_lecture_minutes: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    service_minutes: Option<u32>,
    #[serde(default, alias = "shlokaMemorized", deserialize_with = "lenient_count")]
    shloka_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    day_sleep_duration: Option<u32>,
    #[serde(default, deserialize_with = "lenient_flag")]
    mangala_arati: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    tulsi_arati: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    narsimha_arati: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    guru_puja: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    bhagavatam_class: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    morning_program: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    evening_arati: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    spiritual_class: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    maintained_diet: bool,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    notes: Option<String>,
}

impl EntryRow {
    fn into_entry(self, user_id: UserId, date: chrono::NaiveDate) -> SadhanaEntry {
        let mut entry = SadhanaEntry::new(user_id, date);
        entry.wake_up_time = self.wake_up_time;
        entry.sleep_time = self.sleep_time;
        entry.chanting_completion_time = self.chanting_completion_time;
        entry.chanting_rounds = self.chanting_rounds.unwrap_or_default();
        entry.reading_minutes = self.reading_minutes.unwrap_or_default();
        entry.sp_lecture_minutes = self.sp_lecture_minutes.unwrap_or_default();
        entry.sm_lecture_minutes = self.sm_lecture_minutes.unwrap_or_default();
        entry.gsns_lecture_minutes = self.gsns_lecture_minutes.unwrap_or_default();
        entry.hgrsp_lecture_minutes = self.hgrsp_lecture_minutes.unwrap_or_default();
        entry.service_minutes = self.service_minutes.unwrap_or_default();
        entry.shloka_count = self.shloka_count.unwrap_or_default();
        entry.day_sleep_duration = self.day_sleep_duration;
        entry.mangala_arati = self.mangala_arati;
        entry.tulsi_arati = self.tulsi_arati;
        entry.narsimha_arati = self.narsimha_arati;
        entry.guru_puja = self.guru_puja;
        entry.bhagavatam_class = self.bhagavatam_class;
        entry.morning_program = self.morning_program;
        entry.evening_arati = self.evening_arati;
        entry.spiritual_class = self.spiritual_class;
        entry.maintained_diet = self.maintained_diet;
        entry.notes = self.notes;
        entry
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = empty_string_as_none(deserializer)?;
    Ok(opt.and_then(|value| value.trim().parse().ok()))
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = empty_string_as_none(deserializer)?;
    Ok(opt
        .map(|value| {
            matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "y" | "1"
            )
        })
        .unwrap_or(false))
}
