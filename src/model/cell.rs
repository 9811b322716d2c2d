//! Cell values.

use serde::{Serialize, Serializer};
use std::fmt;

/// A single cell value.
///
/// Serializes untagged: `null`, a string, a number or a boolean. Dates are
/// serialized as ISO 8601 strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(ExcelDate),
    /// Spreadsheet error literal such as `#DIV/0!`.
    Error(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Text used when this value labels a column, `None` for blanks.
    pub fn as_label(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => f.write_str("NaN"),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Bool(true) => f.write_str("True"),
            CellValue::Bool(false) => f.write_str("False"),
            CellValue::Date(d) => write!(f, "{}", d),
            CellValue::Error(e) => f.write_str(e),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// Shortest round-trip form, switching to exponent notation outside
/// `1e-4..1e16` the way Python prints floats (`1e+21`, `1e-07`).
fn format_number(n: f64) -> String {
    let magnitude = n.abs();
    if n == 0.0 || !n.is_finite() || (1e-4..1e16).contains(&magnitude) {
        return n.to_string();
    }

    let formatted = format!("{:e}", n);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        }
        None => formatted,
    }
}

/// Days between 1899-12-31 and 1904-01-01 in the 1900 system, counting the
/// phantom 1900-02-29.
const DATE_1904_OFFSET_DAYS: i64 = 1462;

/// Serial of 9999-12-31 in the 1900 system, the last date Excel shows.
const MAX_SERIAL_DAYS: i64 = 2_958_465;

/// A date/time stored as a serial day number.
///
/// Serials count from 1900-01-01 (day 1) unless the workbook uses the 1904
/// date system, where day 0 is 1904-01-01.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExcelDate {
    serial: f64,
    date_1904: bool,
}

/// Broken-down date and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl ExcelDate {
    pub fn from_serial(serial: f64) -> Self {
        Self {
            serial,
            date_1904: false,
        }
    }

    /// A serial in the 1904 date system used by older Mac workbooks.
    pub fn from_serial_1904(serial: f64) -> Self {
        Self {
            serial,
            date_1904: true,
        }
    }

    pub fn is_1904(&self) -> bool {
        self.date_1904
    }

    pub fn serial(&self) -> f64 {
        self.serial
    }

    /// Split the serial into calendar parts.
    ///
    /// Serial 1 is 1900-01-01. Serial 60 is the nonexistent 1900-02-29 kept
    /// for Lotus 1-2-3 compatibility, so later serials are shifted by a day.
    /// Returns `None` for negative or non-finite serials and for serials past
    /// 9999-12-31.
    pub fn parts(&self) -> Option<DateParts> {
        if !self.serial.is_finite() || self.serial < 0.0 {
            return None;
        }
        if self.serial > (MAX_SERIAL_DAYS + 1) as f64 {
            return None;
        }

        let total_seconds = (self.serial * 86_400.0).round() as i64;
        let mut days = total_seconds / 86_400;
        let seconds = (total_seconds % 86_400) as u32;

        if self.date_1904 {
            days += DATE_1904_OFFSET_DAYS;
        }
        if days > MAX_SERIAL_DAYS {
            return None;
        }

        if days > 60 {
            days -= 1;
        }

        let (year, month, day) = if days == 0 {
            (1899, 12, 31)
        } else {
            days_to_ymd(days)
        };

        Some(DateParts {
            year,
            month,
            day,
            hour: seconds / 3600,
            minute: (seconds % 3600) / 60,
            second: seconds % 60,
        })
    }

    /// ISO 8601 rendering: date only at midnight, time only before day 1 of
    /// the 1900 system.
    pub fn to_iso(&self) -> Option<String> {
        let p = self.parts()?;
        let has_date = self.date_1904 || self.serial >= 1.0;
        let has_time = p.hour != 0 || p.minute != 0 || p.second != 0;

        Some(match (has_date, has_time) {
            (true, false) => format!("{:04}-{:02}-{:02}", p.year, p.month, p.day),
            (true, true) => format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                p.year, p.month, p.day, p.hour, p.minute, p.second
            ),
            (false, _) => format!("{:02}:{:02}:{:02}", p.hour, p.minute, p.second),
        })
    }
}

impl fmt::Display for ExcelDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_iso() {
            Some(iso) => f.write_str(&iso),
            None => f.write_str(&format_number(self.serial)),
        }
    }
}

impl Serialize for ExcelDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Convert days since 1899-12-31 (day 1 = 1900-01-01) to (year, month, day).
fn days_to_ymd(days: i64) -> (i32, u32, u32) {
    let mut year = 1900;
    let mut remaining_days = days;

    loop {
        let days_in_year = if is_leap_year(year) { 366 } else { 365 };
        if remaining_days <= days_in_year {
            break;
        }
        remaining_days -= days_in_year;
        year += 1;
    }

    let months_days = if is_leap_year(year) {
        [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    } else {
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    };

    let mut month = 1u32;
    for &days_in_month in &months_days {
        if remaining_days <= days_in_month {
            break;
        }
        remaining_days -= days_in_month;
        month += 1;
    }

    (year, month, remaining_days.max(1) as u32)
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
