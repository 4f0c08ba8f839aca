use std::collections::BTreeMap;
use std::sync::OnceLock;

use super::{BatchCriteria, DurationScore, TimeRangeScore};

/// Batch used whenever a selector cannot be resolved.
pub const DEFAULT_BATCH: &str = "sahadev";

/// Built-in criteria keyed by lower-case batch name.
pub fn builtin_criteria() -> &'static BTreeMap<String, BatchCriteria> {
    static BUILTIN: OnceLock<BTreeMap<String, BatchCriteria>> = OnceLock::new();
    BUILTIN.get_or_init(|| {
        [sahadev(), nakula(), arjuna(), bhima(), yudhishthira()]
            .into_iter()
            .map(|criteria| (criteria.name.to_ascii_lowercase(), criteria))
            .collect()
    })
}

pub(super) fn default_criteria() -> BatchCriteria {
    builtin_criteria()
        .get(DEFAULT_BATCH)
        .cloned()
        .unwrap_or_else(sahadev)
}

fn sahadev() -> BatchCriteria {
    BatchCriteria {
        name: "Sahadev".to_string(),
        sleep_time_scoring: vec![
            TimeRangeScore::new("20:00", "22:00", 20),
            TimeRangeScore::new("22:00", "23:00", 15),
            TimeRangeScore::new("23:00", "23:59", 5),
        ],
        wake_up_time_scoring: vec![
            TimeRangeScore::new("03:30", "05:00", 20),
            TimeRangeScore::new("05:00", "06:00", 15),
            TimeRangeScore::new("06:00", "07:00", 5),
        ],
        japa_completion_scoring: vec![
            TimeRangeScore::new("04:00", "10:00", 20),
            TimeRangeScore::new("10:00", "14:00", 10),
            TimeRangeScore::new("14:00", "20:00", 5),
        ],
        day_sleep_scoring: vec![
            DurationScore {
                max_duration: 60,
                points: 20,
            },
            DurationScore {
                max_duration: 120,
                points: 10,
            },
            DurationScore {
                max_duration: 180,
                points: 5,
            },
        ],
        reading_minimum: 30,
        hearing_minimum: 30,
        service_minimum: 30,
        shloka_minimum: 0,
        sp_lecture_minimum: None,
        sm_lecture_minimum: None,
        gsns_lecture_minimum: None,
        hgrsp_lecture_minimum: None,
        total_body_score: 60,
        total_soul_score: 115,
        show_sp_lecture: true,
        show_sm_lecture: false,
        show_gsns_lecture: false,
        show_hgrsp_lecture: false,
    }
}

fn nakula() -> BatchCriteria {
    BatchCriteria {
        name: "Nakula".to_string(),
        sleep_time_scoring: vec![
            TimeRangeScore::new("20:00", "21:30", 25),
            TimeRangeScore::new("21:30", "22:00", 20),
            TimeRangeScore::new("22:00", "22:30", 15),
            TimeRangeScore::new("22:30", "23:00", 10),
            TimeRangeScore::new("23:00", "23:30", 5),
        ],
        wake_up_time_scoring: vec![
            TimeRangeScore::new("03:00", "04:00", 20),
            TimeRangeScore::new("04:00", "04:15", 15),
            TimeRangeScore::new("04:15", "04:30", 10),
            TimeRangeScore::new("04:30", "05:00", 5),
        ],
        japa_completion_scoring: vec![
            TimeRangeScore::new("04:00", "07:00", 25),
            TimeRangeScore::new("07:00", "10:00", 20),
            TimeRangeScore::new("10:00", "13:00", 10),
            TimeRangeScore::new("13:00", "18:00", 5),
        ],
        day_sleep_scoring: vec![
            DurationScore {
                max_duration: 90,
                points: 20,
            },
            DurationScore {
                max_duration: 120,
                points: 10,
            },
            DurationScore {
                max_duration: 150,
                points: 5,
            },
        ],
        reading_minimum: 150,
        hearing_minimum: 60,
        service_minimum: 60,
        shloka_minimum: 1,
        sp_lecture_minimum: Some(30),
        sm_lecture_minimum: None,
        gsns_lecture_minimum: None,
        hgrsp_lecture_minimum: None,
        total_body_score: 65,
        total_soul_score: 280,
        show_sp_lecture: true,
        show_sm_lecture: true,
        show_gsns_lecture: false,
        show_hgrsp_lecture: false,
    }
}

fn arjuna() -> BatchCriteria {
    BatchCriteria {
        name: "Arjuna".to_string(),
        sleep_time_scoring: vec![
            TimeRangeScore::new("20:00", "21:30", 25),
            TimeRangeScore::new("21:30", "22:00", 15),
            TimeRangeScore::new("22:00", "22:30", 5),
        ],
        wake_up_time_scoring: vec![
            TimeRangeScore::new("03:00", "04:00", 25),
            TimeRangeScore::new("04:00", "04:30", 15),
            TimeRangeScore::new("04:30", "04:45", 5),
        ],
        japa_completion_scoring: vec![
            TimeRangeScore::new("04:00", "07:30", 25),
            TimeRangeScore::new("07:30", "09:00", 15),
            TimeRangeScore::new("09:00", "12:00", 5),
        ],
        day_sleep_scoring: vec![
            DurationScore {
                max_duration: 45,
                points: 25,
            },
            DurationScore {
                max_duration: 75,
                points: 15,
            },
            DurationScore {
                max_duration: 90,
                points: 5,
            },
        ],
        reading_minimum: 180,
        hearing_minimum: 90,
        service_minimum: 90,
        shloka_minimum: 2,
        sp_lecture_minimum: Some(45),
        sm_lecture_minimum: Some(15),
        gsns_lecture_minimum: None,
        hgrsp_lecture_minimum: None,
        total_body_score: 75,
        total_soul_score: 340,
        show_sp_lecture: true,
        show_sm_lecture: true,
        show_gsns_lecture: true,
        show_hgrsp_lecture: false,
    }
}

fn bhima() -> BatchCriteria {
    BatchCriteria {
        name: "Bhima".to_string(),
        sleep_time_scoring: vec![
            TimeRangeScore::new("20:00", "21:00", 25),
            TimeRangeScore::new("21:00", "21:30", 15),
            TimeRangeScore::new("21:30", "22:00", 5),
        ],
        wake_up_time_scoring: vec![
            TimeRangeScore::new("03:00", "03:45", 25),
            TimeRangeScore::new("03:45", "04:15", 15),
            TimeRangeScore::new("04:15", "04:30", 5),
        ],
        japa_completion_scoring: vec![
            TimeRangeScore::new("04:00", "07:00", 25),
            TimeRangeScore::new("07:00", "08:30", 15),
            TimeRangeScore::new("08:30", "10:00", 5),
        ],
        day_sleep_scoring: vec![
            DurationScore {
                max_duration: 30,
                points: 25,
            },
            DurationScore {
                max_duration: 60,
                points: 10,
            },
        ],
        reading_minimum: 210,
        hearing_minimum: 120,
        service_minimum: 120,
        shloka_minimum: 3,
        sp_lecture_minimum: Some(60),
        sm_lecture_minimum: Some(20),
        gsns_lecture_minimum: Some(20),
        hgrsp_lecture_minimum: None,
        total_body_score: 75,
        total_soul_score: 400,
        show_sp_lecture: true,
        show_sm_lecture: true,
        show_gsns_lecture: true,
        show_hgrsp_lecture: true,
    }
}

fn yudhishthira() -> BatchCriteria {
    BatchCriteria {
        name: "Yudhishthira".to_string(),
        sleep_time_scoring: vec![
            TimeRangeScore::new("20:00", "21:00", 25),
            TimeRangeScore::new("21:00", "21:30", 10),
        ],
        wake_up_time_scoring: vec![
            TimeRangeScore::new("02:30", "03:30", 25),
            TimeRangeScore::new("03:30", "04:00", 10),
        ],
        japa_completion_scoring: vec![
            TimeRangeScore::new("03:30", "06:30", 25),
            TimeRangeScore::new("06:30", "08:00", 10),
        ],
        day_sleep_scoring: vec![
            DurationScore {
                max_duration: 0,
                points: 25,
            },
            DurationScore {
                max_duration: 30,
                points: 10,
            },
        ],
        reading_minimum: 240,
        hearing_minimum: 150,
        service_minimum: 180,
        shloka_minimum: 5,
        sp_lecture_minimum: Some(60),
        sm_lecture_minimum: Some(30),
        gsns_lecture_minimum: Some(30),
        hgrsp_lecture_minimum: Some(30),
        total_body_score: 75,
        total_soul_score: 460,
        show_sp_lecture: true,
        show_sm_lecture: true,
        show_gsns_lecture: true,
        show_hgrsp_lecture: true,
    }
}
