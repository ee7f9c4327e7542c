//! Weekly payment schedule generation for loan releases.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// One generated schedule line, before persistence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleLine {
    pub week: u32,
    pub due_date: NaiveDate,
    pub paid: bool,
}

/// Derives one due date per week of the term, starting seven days after the
/// release date.
///
/// `weeks == 0` yields an empty sequence; callers reject a zero term before
/// reaching the engine.
pub fn generate_schedule(start: NaiveDate, weeks: u32) -> Vec<ScheduleLine> {
    (1..=weeks)
        .map(|week| ScheduleLine {
            week,
            due_date: start + Duration::days(7 * i64::from(week)),
            paid: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::generate_schedule;

    #[test]
    fn four_week_term_yields_four_weekly_dates() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let lines = generate_schedule(start, 4);

        assert_eq!(lines.len(), 4);
        for (i, line) in lines.iter().enumerate() {
            let week = i as u32 + 1;
            assert_eq!(line.week, week);
            assert_eq!(
                line.due_date,
                start + chrono::Duration::days(7 * i64::from(week))
            );
            assert!(!line.paid);
        }
    }

    #[test]
    fn zero_weeks_yields_empty_schedule() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert!(generate_schedule(start, 0).is_empty());
    }
}
