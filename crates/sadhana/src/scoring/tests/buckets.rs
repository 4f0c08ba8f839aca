use crate::scoring::buckets::{
    capped_minimum_score, parse_time_of_day, program_attendance_score, score_by_duration,
    score_by_time_range, shloka_bonus, shloka_score, time_to_minutes, INVALID_TIME, SHLOKA_BONUS,
};
use crate::scoring::criteria::{builtin_criteria, DurationScore, TimeRangeScore};
use crate::scoring::domain::SadhanaEntry;

use super::common::{day, devotee};

#[test]
fn time_to_minutes_parses_clock_strings() {
    assert_eq!(time_to_minutes("00:00"), 0);
    assert_eq!(time_to_minutes("04:10"), 250);
    assert_eq!(time_to_minutes("23:59"), 1439);
    assert_eq!(time_to_minutes(" 7:05 "), 425);
    assert_eq!(parse_time_of_day("22:15"), Some(1335));
}

#[test]
fn time_to_minutes_returns_sentinel_for_malformed_input() {
    for raw in ["", "4", "04:", ":30", "ab:cd", "04:60", "24:00", "04:10:00", "-1:30", "4.5:10"] {
        assert_eq!(time_to_minutes(raw), INVALID_TIME, "input {raw:?}");
    }
}

#[test]
fn time_range_takes_first_match_in_table_order() {
    let overlapping = vec![
        TimeRangeScore::new("04:00", "05:00", 10),
        TimeRangeScore::new("04:00", "04:30", 20),
    ];
    assert_eq!(score_by_time_range(Some("04:10"), &overlapping), 10);

    let reversed: Vec<_> = overlapping.iter().rev().cloned().collect();
    assert_eq!(score_by_time_range(Some("04:10"), &reversed), 20);
    assert_eq!(score_by_time_range(Some("04:45"), &reversed), 10);
}

#[test]
fn time_range_is_half_open_and_gaps_score_zero() {
    let gapped = vec![
        TimeRangeScore::new("04:00", "04:15", 15),
        TimeRangeScore::new("05:00", "06:00", 5),
    ];

    assert_eq!(score_by_time_range(Some("04:00"), &gapped), 15);
    assert_eq!(score_by_time_range(Some("04:14"), &gapped), 15);
    assert_eq!(score_by_time_range(Some("04:15"), &gapped), 0);
    assert_eq!(score_by_time_range(Some("04:30"), &gapped), 0);
    assert_eq!(score_by_time_range(Some("05:59"), &gapped), 5);
    assert_eq!(score_by_time_range(Some("06:00"), &gapped), 0);
}

#[test]
fn time_range_degrades_to_zero() {
    let table = vec![TimeRangeScore::new("00:00", "23:59", 7)];
    assert_eq!(score_by_time_range(None, &table), 0);
    assert_eq!(score_by_time_range(Some("late"), &table), 0);
    assert_eq!(score_by_time_range(Some("04:00"), &[]), 0);

    let broken_row = vec![
        TimeRangeScore::new("4am", "05:00", 30),
        TimeRangeScore::new("04:00", "05:00", 12),
    ];
    assert_eq!(score_by_time_range(Some("04:30"), &broken_row), 12);
}

#[test]
fn duration_sorts_a_copy_before_matching() {
    let unsorted = vec![
        DurationScore {
            max_duration: 120,
            points: 10,
        },
        DurationScore {
            max_duration: 60,
            points: 20,
        },
        DurationScore {
            max_duration: 180,
            points: 5,
        },
    ];

    assert_eq!(score_by_duration(Some(0), &unsorted), 20);
    assert_eq!(score_by_duration(Some(60), &unsorted), 20);
    assert_eq!(score_by_duration(Some(61), &unsorted), 10);
    assert_eq!(score_by_duration(Some(180), &unsorted), 5);
    assert_eq!(score_by_duration(Some(181), &unsorted), 0);
    assert_eq!(unsorted[0].max_duration, 120, "input table is untouched");
}

#[test]
fn duration_points_never_increase_with_longer_naps() {
    let table = &builtin_criteria()["nakula"].day_sleep_scoring;
    let mut previous = u32::MAX;
    for minutes in 0..=200 {
        let points = score_by_duration(Some(minutes), table);
        assert!(points <= previous, "{minutes} minutes scored {points} after {previous}");
        previous = points;
    }
    assert_eq!(previous, 0);
}

#[test]
fn duration_without_value_or_table_is_zero() {
    let table = vec![DurationScore {
        max_duration: 90,
        points: 20,
    }];
    assert_eq!(score_by_duration(None, &table), 0);
    assert_eq!(score_by_duration(Some(10), &[]), 0);
}

#[test]
fn capped_minimum_is_linear_then_flat() {
    let minimum = 150;
    assert_eq!(capped_minimum_score(0, minimum), 0);
    assert_eq!(capped_minimum_score(75, minimum), 75);
    assert_eq!(capped_minimum_score(minimum, minimum), minimum);
    for value in [151, 200, 10_000] {
        assert_eq!(capped_minimum_score(value, minimum), minimum);
    }
    assert_eq!(capped_minimum_score(40, 0), 0);
}

#[test]
fn shloka_is_all_or_nothing() {
    let mut criteria = builtin_criteria()["arjuna"].clone();
    assert_eq!(criteria.shloka_minimum, 2);

    assert_eq!(shloka_score(1, &criteria, "arjuna"), 0);
    assert_eq!(shloka_score(2, &criteria, "arjuna"), SHLOKA_BONUS);
    assert_eq!(shloka_score(9, &criteria, "arjuna"), SHLOKA_BONUS);

    criteria.shloka_minimum = 0;
    assert_eq!(shloka_score(9, &criteria, "arjuna"), 0);
}

#[test]
fn every_batch_shares_the_shloka_bonus() {
    for batch in ["sahadev", "Nakula", "yudhisthira", "unknown"] {
        assert_eq!(shloka_bonus(batch), SHLOKA_BONUS);
    }
}

#[test]
fn program_attendance_counts_morning_activities_only() {
    let mut entry = SadhanaEntry::new(devotee(), day(2025, 3, 9));
    entry.evening_arati = true;
    entry.spiritual_class = true;
    entry.maintained_diet = true;
    entry.morning_program = true;
    assert_eq!(program_attendance_score(&entry), 0);

    entry.mangala_arati = true;
    entry.guru_puja = true;
    assert_eq!(program_attendance_score(&entry), 15);

    entry.tulsi_arati = true;
    entry.narsimha_arati = true;
    entry.bhagavatam_class = true;
    assert_eq!(program_attendance_score(&entry), 35);
}
