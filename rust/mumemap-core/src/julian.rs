use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Julian day number of 0001-01-01 minus one, the proleptic Gregorian epoch
/// used by `NaiveDate::from_num_days_from_ce_opt`.
const JULIAN_DAY_OF_CE_EPOCH: i64 = 1_721_425;

/// Calendar date of a Julian day number plus `msecs` past midnight.
/// Day 0 is the unset marker and yields `None`.
pub fn to_datetime(julian_day: u32, msecs: u32) -> Option<NaiveDateTime> {
    if julian_day == 0 {
        return None;
    }
    let days_from_ce = i32::try_from(i64::from(julian_day) - JULIAN_DAY_OF_CE_EPOCH).ok()?;
    let date = NaiveDate::from_num_days_from_ce_opt(days_from_ce)?;
    date.and_hms_opt(0, 0, 0)?.checked_add_signed(Duration::milliseconds(i64::from(msecs)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_epoch() {
        let dt = to_datetime(2_440_588, 0).unwrap();
        assert_eq!(dt, NaiveDate::from_ymd_opt(1970, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn milliseconds_are_added() {
        let dt = to_datetime(2_451_545, 45_296_789).unwrap();
        assert_eq!(dt.to_string(), "2000-01-01 12:34:56.789");
    }

    #[test]
    fn day_zero_is_unset() {
        assert!(to_datetime(0, 1000).is_none());
    }
}
