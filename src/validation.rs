//! Input validation for Witness.
//!
//! Validators for the incident logger's user-entered date and time fields.
//! All validators return WitnessError::Validation on failure, with the same
//! human-readable messages the entry screens show inline.

use chrono::{Datelike, NaiveDate, Utc};

use crate::error::{WitnessError, WitnessResult};

/// Earliest year accepted for an incident date
pub const MIN_INCIDENT_YEAR: i32 = 2020;

/// Length of a fully formatted date string (MM/DD/YYYY)
pub const DATE_INPUT_LENGTH: usize = 10;

/// Auto-format raw date keystrokes into MM/DD/YYYY.
///
/// Strips everything but digits, keeps at most eight of them, and inserts a
/// slash after the second and fourth digit so the field fills in as the user
/// types: "0", "06", "06/0", ..., "06/01/2024".
pub fn format_date_input(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).take(8).collect();

    match digits.len() {
        0..=2 => digits,
        3..=4 => format!("{}/{}", &digits[..2], &digits[2..]),
        _ => format!("{}/{}/{}", &digits[..2], &digits[2..4], &digits[4..]),
    }
}

/// Validate a fully entered MM/DD/YYYY date string.
///
/// Fires once all eight digits are present: month in [1, 12], year in
/// [2020, current year], day in [1, days in month] with leap-year handling.
pub fn validate_date(value: &str) -> WitnessResult<()> {
    validate_date_with_year(value, Utc::now().year())
}

/// Year-injected form of [`validate_date`], used directly by tests
pub fn validate_date_with_year(value: &str, current_year: i32) -> WitnessResult<()> {
    let parts: Vec<&str> = value.split('/').collect();
    if parts.len() != 3 {
        return Err(WitnessError::validation(
            "date",
            "Date must be in MM/DD/YYYY format",
        ));
    }

    let month: u32 = parts[0]
        .parse()
        .map_err(|_| WitnessError::validation("date", "Date must be in MM/DD/YYYY format"))?;
    let day: u32 = parts[1]
        .parse()
        .map_err(|_| WitnessError::validation("date", "Date must be in MM/DD/YYYY format"))?;
    let year: i32 = parts[2]
        .parse()
        .map_err(|_| WitnessError::validation("date", "Date must be in MM/DD/YYYY format"))?;

    if !(1..=12).contains(&month) {
        return Err(WitnessError::validation(
            "date",
            "Month must be between 01-12",
        ));
    }

    if year < MIN_INCIDENT_YEAR || year > current_year {
        return Err(WitnessError::validation(
            "date",
            format!("Year must be between {}-{}", MIN_INCIDENT_YEAR, current_year),
        ));
    }

    let max_day = days_in_month(year, month);
    if day < 1 || day > max_day {
        return Err(WitnessError::validation(
            "date",
            format!("Invalid day for this month (max: {})", max_day),
        ));
    }

    Ok(())
}

/// Check whether a date field is complete and valid, the save-enabled gate
pub fn is_date_complete(value: &str) -> bool {
    value.len() == DATE_INPUT_LENGTH && validate_date(value).is_ok()
}

/// Number of days in the given month, leap years included.
///
/// Computed as the day before the first of the following month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .map(|first| first.pred_opt().map(|last| last.day()).unwrap_or(31))
        .unwrap_or(31)
}

/// Format a 24-hour clock reading as zero-padded 12-hour `hh:mm AM/PM`
pub fn format_time_display(hour: u32, minute: u32) -> String {
    let meridiem = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{:02}:{:02} {}", display_hour, minute, meridiem)
}

/// Parse an `hh:mm AM/PM` display string back to a 24-hour (hour, minute).
///
/// Used by the edit flow to seed the time picker from a stored incident.
pub fn parse_time_display(value: &str) -> WitnessResult<(u32, u32)> {
    let invalid = || WitnessError::validation("time", "Time must be in hh:mm AM/PM format");

    let (clock, meridiem) = value.trim().rsplit_once(' ').ok_or_else(invalid)?;
    let (hour_str, minute_str) = clock.split_once(':').ok_or_else(invalid)?;

    let mut hour: u32 = hour_str.parse().map_err(|_| invalid())?;
    let minute: u32 = minute_str.parse().map_err(|_| invalid())?;

    if hour < 1 || hour > 12 || minute > 59 {
        return Err(invalid());
    }

    match meridiem {
        "AM" => {
            if hour == 12 {
                hour = 0;
            }
        }
        "PM" => {
            if hour != 12 {
                hour += 12;
            }
        }
        _ => return Err(invalid()),
    }

    Ok((hour, minute))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_input_progressive() {
        assert_eq!(format_date_input(""), "");
        assert_eq!(format_date_input("0"), "0");
        assert_eq!(format_date_input("06"), "06");
        assert_eq!(format_date_input("060"), "06/0");
        assert_eq!(format_date_input("0601"), "06/01");
        assert_eq!(format_date_input("06012"), "06/01/2");
        assert_eq!(format_date_input("06012024"), "06/01/2024");
    }

    #[test]
    fn test_format_date_input_strips_non_digits() {
        assert_eq!(format_date_input("06/01/2024"), "06/01/2024");
        assert_eq!(format_date_input("6a1b2024xx"), "61/20/24");
        assert_eq!(format_date_input("060120249999"), "06/01/2024");
    }

    #[test]
    fn test_validate_date_leap_year() {
        assert!(validate_date_with_year("02/29/2024", 2026).is_ok());
    }

    #[test]
    fn test_validate_date_non_leap_year() {
        let err = validate_date_with_year("02/29/2023", 2026).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error in date: Invalid day for this month (max: 28)"
        );
    }

    #[test]
    fn test_validate_date_month_range() {
        let err = validate_date_with_year("13/01/2024", 2026).unwrap_err();
        assert!(err.to_string().contains("Month must be between 01-12"));
        assert!(validate_date_with_year("00/15/2024", 2026).is_err());
    }

    #[test]
    fn test_validate_date_year_range() {
        let err = validate_date_with_year("01/01/2019", 2026).unwrap_err();
        assert!(err.to_string().contains("Year must be between 2020-2026"));
        assert!(validate_date_with_year("01/01/2027", 2026).is_err());
        assert!(validate_date_with_year("01/01/2020", 2026).is_ok());
        assert!(validate_date_with_year("01/01/2026", 2026).is_ok());
    }

    #[test]
    fn test_validate_date_day_range() {
        assert!(validate_date_with_year("04/31/2024", 2026).is_err());
        assert!(validate_date_with_year("04/30/2024", 2026).is_ok());
        assert!(validate_date_with_year("12/31/2024", 2026).is_ok());
        assert!(validate_date_with_year("06/00/2024", 2026).is_err());
    }

    #[test]
    fn test_validate_date_malformed() {
        assert!(validate_date_with_year("06-01-2024", 2026).is_err());
        assert!(validate_date_with_year("06/01", 2026).is_err());
        assert!(validate_date_with_year("", 2026).is_err());
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2100, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 4), 30);
    }

    #[test]
    fn test_is_date_complete() {
        assert!(is_date_complete("06/01/2024"));
        assert!(!is_date_complete("06/01/202"));
        assert!(!is_date_complete("13/01/2024"));
        assert!(!is_date_complete(""));
    }

    #[test]
    fn test_format_time_display() {
        assert_eq!(format_time_display(0, 5), "12:05 AM");
        assert_eq!(format_time_display(9, 30), "09:30 AM");
        assert_eq!(format_time_display(12, 0), "12:00 PM");
        assert_eq!(format_time_display(14, 30), "02:30 PM");
        assert_eq!(format_time_display(23, 59), "11:59 PM");
    }

    #[test]
    fn test_parse_time_display() {
        assert_eq!(parse_time_display("12:05 AM").unwrap(), (0, 5));
        assert_eq!(parse_time_display("09:30 AM").unwrap(), (9, 30));
        assert_eq!(parse_time_display("12:00 PM").unwrap(), (12, 0));
        assert_eq!(parse_time_display("02:30 PM").unwrap(), (14, 30));
        assert_eq!(parse_time_display("11:59 PM").unwrap(), (23, 59));
    }

    #[test]
    fn test_parse_time_display_invalid() {
        assert!(parse_time_display("14:30").is_err());
        assert!(parse_time_display("13:00 PM").is_err());
        assert!(parse_time_display("02:60 PM").is_err());
        assert!(parse_time_display("0230 PM").is_err());
        assert!(parse_time_display("").is_err());
    }

    #[test]
    fn test_time_display_round_trip_boundaries() {
        for (hour, minute) in [(0, 0), (11, 59), (12, 0), (23, 59)] {
            let display = format_time_display(hour, minute);
            assert_eq!(parse_time_display(&display).unwrap(), (hour, minute));
        }
    }
}
