//! CSV export of per-day summaries.
//!
//! Each row shows what a day earned against its target, using the same
//! capping and rest/recovery rules as the streak analyzer.

use crate::streak::{aggregate_daily, effective_total};
use crate::target::{days_since_start, weekday_index};
use crate::{DailyAggregate, Error, GroupConfig, LogEntry, Mode, Result, TargetCurve};
use chrono::NaiveDate;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DailyReportRow {
    pub date: NaiveDate,
    pub weekday: u8,
    pub day_number: i64,
    pub regular: u32,
    pub recovery: u32,
    pub effective_total: u32,
    pub target: u32,
    pub met: bool,
}

/// Build one row per calendar day in `from..=to`
pub fn daily_report(
    history: &[LogEntry],
    group: &GroupConfig,
    curve: &TargetCurve,
    mode: Mode,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DailyReportRow>> {
    group.validate()?;
    if from > to {
        return Err(Error::InvalidArgument(format!(
            "report range starts {} after it ends {}",
            from, to
        )));
    }

    let days = aggregate_daily(history);
    let mut rows = Vec::new();

    for date in from.iter_days().take_while(|d| *d <= to) {
        let weekday = weekday_index(date);
        let target = group.target_on(date, mode, curve)?;
        let day = days
            .get(&date)
            .cloned()
            .unwrap_or_else(|| DailyAggregate::new(date));
        let total = effective_total(&day, target, group.is_recovery_day(weekday));

        rows.push(DailyReportRow {
            date,
            weekday,
            day_number: days_since_start(group.start_date, date),
            regular: day.regular,
            recovery: day.recovery_raw(),
            effective_total: total,
            target,
            met: total >= target,
        });
    }

    Ok(rows)
}

/// Write the daily report to a CSV file, replacing any existing file
pub fn export_daily_report(rows: &[DailyReportRow], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    for row in rows {
        writer.serialize(row)?;
    }

    writer.flush()?;
    tracing::info!("Wrote {} report rows to {:?}", rows.len(), path);
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExerciseCategory;

    // 2024-03-04 is a Monday
    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn group() -> GroupConfig {
        GroupConfig::new(date(4))
            .with_rest_days([0])
            .with_recovery_days([5])
    }

    #[test]
    fn test_report_covers_every_day() {
        let history = vec![
            LogEntry::points_only(date(4), ExerciseCategory::Regular, 120),
            LogEntry::points_only(date(8), ExerciseCategory::Recovery, 40),
        ];

        let rows = daily_report(
            &history,
            &group(),
            &TargetCurve::default(),
            Mode::Insane,
            date(4),
            date(10),
        )
        .unwrap();

        assert_eq!(rows.len(), 7);
        assert!(rows[0].met);
        assert_eq!(rows[0].day_number, 1);
        assert!(!rows[1].met);

        // Friday recovery day: 108 / 4 = 27, recovery uncapped
        assert_eq!(rows[4].target, 27);
        assert_eq!(rows[4].effective_total, 40);
        assert!(rows[4].met);

        // Sunday rest day
        assert_eq!(rows[6].target, 0);
        assert!(rows[6].met);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let result = daily_report(
            &[],
            &group(),
            &TargetCurve::default(),
            Mode::Sane,
            date(10),
            date(4),
        );
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_export_writes_csv() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("report.csv");

        let rows = daily_report(
            &[],
            &group(),
            &TargetCurve::default(),
            Mode::Sane,
            date(4),
            date(6),
        )
        .unwrap();
        let count = export_daily_report(&rows, &path).unwrap();
        assert_eq!(count, 3);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("date,weekday,day_number,regular,recovery,effective_total,target,met"));
        assert!(content.contains("2024-03-04,1,1,0,0,0,50,false"));

        let reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.into_records().count(), 3);
    }
}
