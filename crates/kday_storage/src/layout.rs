//! Day-file addressing.
//!
//! Day files are bucketed by ISO-8601 week:
//!
//! ```text
//! <root>/
//! └─ 2024/             # ISO week-numbering year
//!    └─ 11/            # ISO week
//!       ├─ 0.k         # Monday
//!       ├─ ...
//!       └─ 6.k         # Sunday
//! ```
//!
//! A week directory never holds more than seven day files.

use chrono::{DateTime, Datelike, TimeZone};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extension of day files.
pub const DAY_FILE_EXTENSION: &str = "k";

/// The on-disk address of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayAddress {
    /// ISO-8601 week-numbering year.
    pub iso_year: i32,
    /// ISO-8601 week number, 1 to 53.
    pub iso_week: u32,
    /// Day within the week, Monday = 0 through Sunday = 6.
    pub weekday: u32,
}

impl DayAddress {
    /// Computes the address of the day containing `time`, in its own offset.
    pub fn of<Tz: TimeZone>(time: &DateTime<Tz>) -> Self {
        let week = time.iso_week();
        Self {
            iso_year: week.year(),
            iso_week: week.week(),
            weekday: time.weekday().num_days_from_monday(),
        }
    }

    /// Returns `<root>/<iso_year>/<iso_week>`.
    #[must_use]
    pub fn dir_in(&self, root: &Path) -> PathBuf {
        root.join(self.iso_year.to_string())
            .join(self.iso_week.to_string())
    }

    /// Returns `<root>/<iso_year>/<iso_week>/<weekday>.k`.
    #[must_use]
    pub fn file_in(&self, root: &Path) -> PathBuf {
        self.dir_in(root)
            .join(format!("{}.{DAY_FILE_EXTENSION}", self.weekday))
    }

    /// Creates the week directory and any missing ancestors.
    ///
    /// Safe to call repeatedly.
    pub fn ensure_dir(&self, root: &Path) -> io::Result<PathBuf> {
        let dir = self.dir_in(root);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Prefix for snapshot file names, `<iso_year>-<iso_week>-<weekday>-`.
    #[must_use]
    pub fn snapshot_prefix(&self) -> String {
        format!("{}-{}-{}-", self.iso_year, self.iso_week, self.weekday)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, Utc};
    use proptest::prelude::*;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn monday_is_zero_sunday_is_six() {
        // 2024-03-11 is a Monday.
        let monday = DayAddress::of(&utc(2024, 3, 11, 9));
        assert_eq!(monday.weekday, 0);
        assert_eq!(monday.iso_week, 11);

        let sunday = DayAddress::of(&utc(2024, 3, 17, 23));
        assert_eq!(sunday.weekday, 6);
        assert_eq!(sunday.iso_week, 11);
    }

    #[test]
    fn year_boundary_uses_iso_year() {
        // 2024-12-30 belongs to ISO week 1 of 2025.
        let addr = DayAddress::of(&utc(2024, 12, 30, 12));
        assert_eq!(
            addr,
            DayAddress {
                iso_year: 2025,
                iso_week: 1,
                weekday: 0
            }
        );

        // 2021-01-03 is still in week 53 of 2020.
        let addr = DayAddress::of(&utc(2021, 1, 3, 12));
        assert_eq!(addr.iso_year, 2020);
        assert_eq!(addr.iso_week, 53);
        assert_eq!(addr.weekday, 6);
    }

    #[test]
    fn paths_are_unpadded() {
        let addr = DayAddress::of(&utc(2024, 1, 3, 12));
        let root = Path::new("/data");
        assert_eq!(addr.dir_in(root), PathBuf::from("/data/2024/1"));
        assert_eq!(addr.file_in(root), PathBuf::from("/data/2024/1/2.k"));
        assert_eq!(addr.snapshot_prefix(), "2024-1-2-");
    }

    #[test]
    fn offset_decides_the_day() {
        // 23:30 UTC on a Monday is already Tuesday at +02:00.
        let t = utc(2024, 3, 11, 23) + Duration::minutes(30);
        assert_eq!(DayAddress::of(&t).weekday, 0);

        let east = t.with_timezone(&FixedOffset::east_opt(2 * 3600).unwrap());
        assert_eq!(DayAddress::of(&east).weekday, 1);
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let addr = DayAddress::of(&utc(2024, 3, 11, 9));

        let first = addr.ensure_dir(temp.path()).unwrap();
        let second = addr.ensure_dir(temp.path()).unwrap();
        assert_eq!(first, second);
        assert!(first.is_dir());
    }

    #[test]
    fn ensure_dir_fails_on_file_collision() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("2024"), b"not a dir").unwrap();

        let addr = DayAddress::of(&utc(2024, 3, 11, 9));
        assert!(addr.ensure_dir(temp.path()).is_err());
    }

    proptest! {
        #[test]
        fn same_day_same_path(secs in 0i64..4_000_000_000, a in 0i64..86_400, b in 0i64..86_400) {
            let day_start = secs - secs.rem_euclid(86_400);
            let t1 = Utc.timestamp_opt(day_start + a, 0).unwrap();
            let t2 = Utc.timestamp_opt(day_start + b, 0).unwrap();
            let root = Path::new("/k");
            prop_assert_eq!(
                DayAddress::of(&t1).file_in(root),
                DayAddress::of(&t2).file_in(root)
            );
        }

        #[test]
        fn different_weeks_different_dirs(secs in 0i64..4_000_000_000, weeks in 1i64..600) {
            let t1 = Utc.timestamp_opt(secs, 0).unwrap();
            let t2 = t1 + Duration::weeks(weeks);
            let root = Path::new("/k");
            prop_assert_ne!(
                DayAddress::of(&t1).dir_in(root),
                DayAddress::of(&t2).dir_in(root)
            );
        }
    }
}
