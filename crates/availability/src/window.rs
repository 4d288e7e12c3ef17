use chrono::{Local, NaiveDateTime, TimeDelta, Timelike};

use crate::prelude::AvailabilityError;

/// Format the inventory service expects for range bounds, in GMT.
pub const WIRE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// A minute granular `[start, end]` query range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, AvailabilityError> {
        if start > end {
            return Err(AvailabilityError::InvalidWindow {
                start: start.format(WIRE_FORMAT).to_string(),
                end: end.format(WIRE_FORMAT).to_string(),
            });
        }

        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn start_wire(&self) -> String {
        self.start.format(WIRE_FORMAT).to_string()
    }

    pub fn end_wire(&self) -> String {
        self.end.format(WIRE_FORMAT).to_string()
    }
}

/// Turns configured offsets into a GMT query window.
///
/// `timezone_offset` is in seconds west of UTC (positive in the Americas), the
/// same convention as POSIX `timezone`. Adding it to a local wall clock reading
/// gives the GMT reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCalculator {
    timezone_offset: i64,
}

impl WindowCalculator {
    pub fn new(timezone_offset: i64) -> Self {
        Self { timezone_offset }
    }

    /// Uses the host's current UTC offset.
    pub fn from_local() -> Self {
        Self::new(-i64::from(Local::now().offset().local_minus_utc()))
    }

    pub fn timezone_offset(&self) -> i64 {
        self.timezone_offset
    }

    /// Computes the window relative to the local wall clock reading `now`.
    ///
    /// # Errors
    /// [`AvailabilityError::InvalidWindow`] if the start lands after the end,
    /// [`AvailabilityError::WindowOutOfRange`] if an offset overflows the calendar.
    pub fn compute_at(
        &self,
        now: NaiveDateTime,
        start_offset: i64,
        end_offset: i64,
    ) -> Result<TimeWindow, AvailabilityError> {
        let start = self.shift(now, start_offset)?;
        let end = self.shift(now, end_offset)?;

        // compared before truncation so offsets inside the same minute still
        // have to be ordered
        if start > end {
            return Err(AvailabilityError::InvalidWindow {
                start: start.format(WIRE_FORMAT).to_string(),
                end: end.format(WIRE_FORMAT).to_string(),
            });
        }

        TimeWindow::new(
            truncate_to_minute(start, start_offset)?,
            truncate_to_minute(end, end_offset)?,
        )
    }

    pub fn compute(
        &self,
        start_offset: i64,
        end_offset: i64,
    ) -> Result<TimeWindow, AvailabilityError> {
        self.compute_at(Local::now().naive_local(), start_offset, end_offset)
    }

    fn shift(&self, now: NaiveDateTime, offset: i64) -> Result<NaiveDateTime, AvailabilityError> {
        let out_of_range = || AvailabilityError::WindowOutOfRange { offset };

        let total = offset
            .checked_add(self.timezone_offset)
            .ok_or_else(out_of_range)?;
        let delta = TimeDelta::try_seconds(total).ok_or_else(out_of_range)?;

        now.checked_add_signed(delta).ok_or_else(out_of_range)
    }
}

fn truncate_to_minute(
    instant: NaiveDateTime,
    offset: i64,
) -> Result<NaiveDateTime, AvailabilityError> {
    instant
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .ok_or(AvailabilityError::WindowOutOfRange { offset })
}

/// Window for `[now + start_offset, now + end_offset]` with `now` read from the
/// local clock.
pub fn compute_window(
    start_offset: i64,
    end_offset: i64,
    timezone_offset: i64,
) -> Result<TimeWindow, AvailabilityError> {
    WindowCalculator::new(timezone_offset).compute(start_offset, end_offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use testing_utils::{naive_datetime_strategy, offset_strategy};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_offsets_applied_and_truncated() {
        let calc = WindowCalculator::new(0);
        let window = calc
            .compute_at(at(2024, 3, 14, 9, 30, 45), -3600, 86_400)
            .unwrap();

        assert_eq!(window.start(), at(2024, 3, 14, 8, 30, 0));
        assert_eq!(window.end(), at(2024, 3, 15, 9, 30, 0));
    }

    #[test]
    fn test_timezone_offset_shifts_to_gmt() {
        // US Eastern standard time, five hours west of UTC
        let calc = WindowCalculator::new(5 * 3600);
        let window = calc.compute_at(at(2024, 1, 1, 22, 0, 0), 0, 60).unwrap();

        assert_eq!(window.start_wire(), "02/01/2024 03:00");
        assert_eq!(window.end_wire(), "02/01/2024 03:01");
    }

    #[test]
    fn test_wire_format_is_day_first() {
        let window = TimeWindow::new(at(2024, 3, 4, 5, 6, 0), at(2024, 12, 31, 23, 59, 0)).unwrap();
        assert_eq!(window.start_wire(), "04/03/2024 05:06");
        assert_eq!(window.end_wire(), "31/12/2024 23:59");
    }

    #[test]
    fn test_start_after_end_is_invalid() {
        let calc = WindowCalculator::new(0);
        let err = calc.compute_at(at(2024, 1, 1, 0, 0, 0), 120, 60).unwrap_err();

        assert!(matches!(err, AvailabilityError::InvalidWindow { .. }));
    }

    #[test]
    fn test_equal_offsets_give_empty_window() {
        let calc = WindowCalculator::new(0);
        let window = calc.compute_at(at(2024, 1, 1, 0, 0, 0), 60, 60).unwrap();
        assert_eq!(window.start(), window.end());
    }

    #[test]
    fn test_reversed_offsets_within_one_minute_are_invalid() {
        // both land on 00:00 once truncated
        let calc = WindowCalculator::new(0);
        let err = calc.compute_at(at(2024, 1, 1, 0, 0, 0), 30, 10).unwrap_err();
        assert!(matches!(err, AvailabilityError::InvalidWindow { .. }));
    }

    #[test]
    fn test_huge_offset_is_out_of_range() {
        let calc = WindowCalculator::new(0);
        let err = calc
            .compute_at(at(2024, 1, 1, 0, 0, 0), 0, i64::MAX)
            .unwrap_err();
        assert!(matches!(
            err,
            AvailabilityError::WindowOutOfRange { offset: i64::MAX }
        ));
    }

    #[test]
    fn test_compute_window_reads_the_local_clock() {
        let tz = WindowCalculator::from_local().timezone_offset();
        let before = chrono::Utc::now().naive_utc();
        let window = compute_window(0, 60, tz).unwrap();
        let after = chrono::Utc::now().naive_utc();

        assert!(window.start() >= before - TimeDelta::minutes(1));
        assert!(window.start() <= after);
        assert_eq!(window.end() - window.start(), TimeDelta::minutes(1));
    }

    #[test]
    fn test_compute_window_equal_and_reversed_offsets() {
        let window = compute_window(0, 0, 0).unwrap();
        assert_eq!(window.start(), window.end());

        let err = compute_window(60, 0, 0).unwrap_err();
        assert!(matches!(err, AvailabilityError::InvalidWindow { .. }));
    }

    proptest! {
        #[test]
        fn ordered_offsets_give_ordered_window(
            now in naive_datetime_strategy(),
            a in offset_strategy(),
            b in offset_strategy(),
            tz in -14 * 3600i64..=12 * 3600,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let window = WindowCalculator::new(tz).compute_at(now, lo, hi).unwrap();

            prop_assert!(window.start() <= window.end());
            prop_assert_eq!(window.start().second(), 0);
            prop_assert_eq!(window.end().second(), 0);
        }

        #[test]
        fn reversed_offsets_are_rejected(
            now in naive_datetime_strategy(),
            a in offset_strategy(),
            b in offset_strategy(),
        ) {
            prop_assume!(a > b);
            let err = WindowCalculator::new(0).compute_at(now, a, b).unwrap_err();
            let is_invalid = matches!(err, AvailabilityError::InvalidWindow { .. });
            prop_assert!(is_invalid);
        }
    }
}
