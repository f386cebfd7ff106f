//! CLI command implementations.

pub mod edit;
pub mod path;
pub mod serve;
pub mod show;

use chrono::{Local, NaiveDate, TimeZone};
use kday_storage::{now, Timestamp};

/// Result type shared by the commands.
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Time used to address a day: local noon on `date`, or now.
pub fn day_time(date: Option<NaiveDate>) -> CliResult<Timestamp> {
    let Some(date) = date else {
        return Ok(now());
    };
    let noon = date
        .and_hms_opt(12, 0, 0)
        .ok_or_else(|| format!("{date}: no noon"))?;
    let local = Local
        .from_local_datetime(&noon)
        .earliest()
        .ok_or_else(|| format!("{date}: noon does not exist in the local zone"))?;
    Ok(local.with_timezone(local.offset()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn date_maps_to_local_noon() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let t = day_time(Some(date)).unwrap();
        assert_eq!(t.date_naive(), date);
        assert_eq!(t.hour(), 12);
        assert_eq!(t.day(), 29);
    }
}
