use crate::infra::load_criteria_file;
use chrono::NaiveDate;
use clap::Args;
use sadhana::config::{AppConfig, ScoringConfig};
use sadhana::error::AppError;
use sadhana::scoring::criteria::{BatchSelector, CriteriaProvider, ScoringMode, StaticConfiguration};
use sadhana::scoring::{
    aggregate_week, calculate_daily_score, import_entries_csv, DailyScoreReport, SadhanaEntry,
    UserId, WeekWindow, WeeklyReport,
};
use sadhana::telemetry;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct DailyScoreArgs {
    /// JSON file holding one daily entry
    #[arg(long)]
    pub(crate) entry: PathBuf,
    /// Batch to score against (defaults to the built-in default batch)
    #[arg(long)]
    pub(crate) batch: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct WeekScoreArgs {
    /// JSON array of entries, or a CSV export when the file ends in .csv
    #[arg(long)]
    pub(crate) entries: PathBuf,
    /// Any date inside the week to aggregate (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) anchor: NaiveDate,
    /// Batch to score against (defaults to the built-in default batch)
    #[arg(long)]
    pub(crate) batch: Option<String>,
    /// Score the week as one unit regardless of SADHANA_DEFAULT_MODE
    #[arg(long)]
    pub(crate) weekly_mode: bool,
    /// User id assigned to CSV rows
    #[arg(long, default_value = "local")]
    pub(crate) user: String,
}

pub(crate) fn run_daily_score(args: DailyScoreArgs) -> Result<(), AppError> {
    let provider = prepare(&AppConfig::load()?)?;

    let raw = std::fs::read_to_string(&args.entry)?;
    let report = score_daily(&raw, args.batch.as_deref(), &provider)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) fn run_week_score(args: WeekScoreArgs) -> Result<(), AppError> {
    let provider = prepare(&AppConfig::load()?)?;
    let mode = if args.weekly_mode {
        ScoringMode::WeeklyConsolidated
    } else {
        provider.scoring_mode()
    };

    let user_id = UserId::new(args.user);
    let entries = read_entries(&args.entries, &user_id)?;
    let report = score_week(
        entries,
        user_id,
        args.anchor,
        args.batch.as_deref(),
        &provider,
        mode,
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Logs go to stderr so the JSON report on stdout stays clean.
fn prepare(config: &AppConfig) -> Result<StaticConfiguration, AppError> {
    telemetry::init(&config.telemetry)?;
    file_provider(&config.scoring)
}

fn file_provider(scoring: &ScoringConfig) -> Result<StaticConfiguration, AppError> {
    let mut provider = StaticConfiguration::new().with_mode(scoring.default_mode);
    if let Some(path) = scoring.criteria_file.as_deref() {
        for (batch, criteria) in load_criteria_file(path)? {
            provider = provider.with_override(&batch, criteria);
        }
    }
    Ok(provider)
}

fn read_entries(path: &Path, user_id: &UserId) -> Result<Vec<SadhanaEntry>, AppError> {
    let is_csv = path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("csv"));

    if is_csv {
        Ok(import_entries_csv(File::open(path)?, user_id)?)
    } else {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

fn selector(batch: Option<&str>) -> Option<BatchSelector> {
    batch.map(BatchSelector::by_name)
}

pub(crate) fn score_daily(
    raw: &str,
    batch: Option<&str>,
    provider: &StaticConfiguration,
) -> Result<DailyScoreReport, AppError> {
    let entry: SadhanaEntry = serde_json::from_str(raw)?;
    let resolved = provider.resolve(selector(batch).as_ref());
    let score = calculate_daily_score(&entry, &resolved);
    Ok(DailyScoreReport::new(&entry, &resolved, score))
}

pub(crate) fn score_week(
    entries: Vec<SadhanaEntry>,
    user_id: UserId,
    anchor: NaiveDate,
    batch: Option<&str>,
    provider: &StaticConfiguration,
    mode: ScoringMode,
) -> WeeklyReport {
    let window = WeekWindow::containing(anchor);
    let week = window.select(entries);
    let resolved = provider.resolve(selector(batch).as_ref());
    let user_id = week
        .first()
        .map(|entry| entry.user_id.clone())
        .unwrap_or(user_id);

    WeeklyReport {
        user_id,
        batch: resolved.batch.clone(),
        criteria_source: resolved.source,
        window,
        stats: aggregate_week(&week, &resolved, mode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAKULA_DAY: &str = r#"{
        "userId": "dev-108",
        "date": "2025-03-12",
        "wakeUpTime": "04:10",
        "sleepTime": "22:15",
        "readingMinutes": 200,
        "daySleepDuration": 50,
        "chantingCompletionTime": "08:30",
        "mangalaArati": true,
        "guruPuja": true
    }"#;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 12).expect("valid date")
    }

    #[test]
    fn scores_a_daily_entry_against_the_named_batch() {
        let report = score_daily(NAKULA_DAY, Some("Nakula"), &StaticConfiguration::new())
            .expect("entry scores");
        assert_eq!(report.total_score, 235);
        assert_eq!(report.batch, "nakula");
    }

    #[test]
    fn score_commands_install_logging_before_scoring() {
        let config = AppConfig::load().expect("configuration loads");
        let provider = prepare(&config).expect("telemetry and criteria ready");

        assert!(tracing::dispatcher::has_been_set());
        assert_eq!(provider.scoring_mode(), config.scoring.default_mode);
    }

    #[test]
    fn rejects_entries_that_are_not_json() {
        let result = score_daily("date=2025-03-12", None, &StaticConfiguration::new());
        assert!(matches!(result, Err(AppError::Payload(_))));
    }

    #[test]
    fn week_scoring_keeps_only_the_anchor_week() {
        let mut entries = Vec::new();
        for day in [8, 9, 12, 16] {
            let date = NaiveDate::from_ymd_opt(2025, 3, day).expect("valid date");
            let mut entry = SadhanaEntry::new(UserId::new("dev-108"), date);
            entry.reading_minutes = 30;
            entries.push(entry);
        }

        let report = score_week(
            entries,
            UserId::new("local"),
            anchor(),
            None,
            &StaticConfiguration::new(),
            ScoringMode::PerEntry,
        );

        assert_eq!(report.user_id, UserId::new("dev-108"));
        assert_eq!(report.stats.entry_count, 2);
        assert_eq!(report.stats.total_score, 60);
        assert_eq!(report.batch, "sahadev");
    }
}
