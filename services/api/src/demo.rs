use crate::infra::{build_service, ApiService};
use chrono::{Local, NaiveDate};
use clap::Args;
use sadhana::error::AppError;
use sadhana::scoring::criteria::ScoringMode;
use sadhana::scoring::{SadhanaEntry, UserId, UserProfile, WeekWindow, WeeklyReport};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Any date inside the demo week (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) anchor: Option<NaiveDate>,
    /// Report the week in weekly-consolidated mode.
    #[arg(long)]
    pub(crate) weekly_mode: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let anchor = args.anchor.unwrap_or_else(|| Local::now().date_naive());
    let service = build_service(demo_profiles());
    if args.weekly_mode {
        service.set_scoring_mode(ScoringMode::WeeklyConsolidated)?;
    }

    println!("Sadhana scoring demo");
    let members = seed_demo_week(&service, anchor)?;

    for user_id in &members {
        let report = service.weekly_report(user_id, anchor)?;
        render_weekly_report(&report);
    }

    let group = service.group_progress(members, anchor).await;
    println!(
        "\nGroup progress {} to {} ({} aggregated, {} failed)",
        group.window.start,
        group.window.end,
        group.succeeded(),
        group.failed()
    );
    for member in group.members.values() {
        match (&member.stats, &member.error) {
            (Some(stats), _) => println!(
                "  - {} [{}]: avg {:.1} over {} days",
                member.display_name.as_deref().unwrap_or(member.user_id.as_str()),
                member.batch.as_deref().unwrap_or("-"),
                stats.average_score,
                stats.entry_count
            ),
            (None, error) => println!(
                "  - {}: unavailable ({})",
                member.user_id,
                error.as_deref().unwrap_or("unknown error")
            ),
        }
    }

    Ok(())
}

fn demo_profiles() -> Vec<UserProfile> {
    vec![
        UserProfile {
            display_name: Some("Madhava".to_string()),
            ..UserProfile::new(UserId::new("madhava")).with_batch("Nakula")
        },
        UserProfile {
            display_name: Some("Govinda".to_string()),
            batch_name: Some("Sahadeva".to_string()),
            ..UserProfile::new(UserId::new("govinda"))
        },
    ]
}

/// Submits a synthetic Sunday-to-anchor week for each demo profile.
fn seed_demo_week(service: &ApiService, anchor: NaiveDate) -> Result<Vec<UserId>, AppError> {
    let window = WeekWindow::containing(anchor);
    let members = vec![UserId::new("madhava"), UserId::new("govinda")];

    for (offset, date) in window.days().take_while(|date| *date <= anchor).enumerate() {
        for (index, user_id) in members.iter().enumerate() {
            let entry = synthetic_entry(user_id.clone(), date, offset + index);
            let report = service.submit(entry)?;
            println!(
                "- {} {} -> {} (body {:.1}% / soul {:.1}%)",
                user_id, date, report.total_score, report.body_percentage, report.soul_percentage
            );
        }
    }

    Ok(members)
}

fn synthetic_entry(user_id: UserId, date: NaiveDate, variant: usize) -> SadhanaEntry {
    const WAKE: [&str; 4] = ["03:45", "04:10", "04:40", "05:30"];
    const SLEEP: [&str; 4] = ["21:15", "21:45", "22:20", "23:10"];
    const JAPA: [&str; 4] = ["06:30", "08:15", "11:00", "15:30"];

    let mut entry = SadhanaEntry::new(user_id, date);
    entry.wake_up_time = Some(WAKE[variant % WAKE.len()].to_string());
    entry.sleep_time = Some(SLEEP[variant % SLEEP.len()].to_string());
    entry.chanting_completion_time = Some(JAPA[variant % JAPA.len()].to_string());
    entry.chanting_rounds = 16;
    entry.reading_minutes = 40 + 25 * (variant % 5) as u32;
    entry.sp_lecture_minutes = 20 + 10 * (variant % 3) as u32;
    entry.sm_lecture_minutes = 15;
    entry.service_minutes = 45;
    entry.shloka_count = (variant % 2) as u32;
    entry.day_sleep_duration = Some(30 * (variant % 4) as u32);
    entry.mangala_arati = variant % 3 != 2;
    entry.tulsi_arati = variant % 2 == 0;
    entry.guru_puja = true;
    entry.bhagavatam_class = variant % 3 == 0;
    entry.morning_program = entry.mangala_arati && entry.bhagavatam_class;
    entry
}

fn render_weekly_report(report: &WeeklyReport) {
    let stats = &report.stats;
    println!(
        "\nWeek of {} for {} ({} criteria, {})",
        report.window.start,
        report.user_id,
        report.batch,
        report.criteria_source.label()
    );
    println!(
        "- {} entries | total {} | average {:.1} | mode {}",
        stats.entry_count,
        stats.total_score,
        stats.average_score,
        stats.mode.label()
    );
    println!(
        "- reading {} min (avg {}) | hearing {} min (avg {})",
        stats.total_reading_minutes,
        stats.average_reading_minutes,
        stats.total_hearing_minutes,
        stats.average_hearing_minutes
    );
    println!(
        "- wake-up hour avg {:.1} | mangala arati {:.1}% | morning program {:.1}%",
        stats.average_wake_up_hour, stats.mangala_arati_attendance, stats.morning_program_attendance
    );
    let days: Vec<String> = stats
        .daily_scores
        .iter()
        .map(|day| format!("{} {}", day.day, day.score))
        .collect();
    println!("- daily: {}", days.join(" | "));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 12).expect("valid date")
    }

    #[test]
    fn seeds_sunday_through_anchor_for_each_member() {
        let service = build_service(demo_profiles());
        let members = seed_demo_week(&service, wednesday()).expect("week seeded");

        for user_id in &members {
            let report = service
                .weekly_report(user_id, wednesday())
                .expect("report builds");
            assert_eq!(report.stats.entry_count, 4);
        }
    }

    #[test]
    fn legacy_batch_name_resolves_through_alias() {
        let service = build_service(demo_profiles());
        let resolved = service
            .criteria_for_user(&UserId::new("govinda"))
            .expect("profile readable");
        assert_eq!(resolved.batch, "sahadev");
    }

    #[tokio::test]
    async fn demo_runs_in_both_modes() {
        for weekly_mode in [false, true] {
            let args = DemoArgs {
                anchor: Some(wednesday()),
                weekly_mode,
            };
            run_demo(args).await.expect("demo completes");
        }
    }
}
