//! Period keys: the `YYYY`, `YYYYQn` and `YYYY-MM` strings that metric series
//! are keyed by, parsed once into [`Period`] values.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Time resolution of a data point.
///
/// The derived ordering (monthly, quarterly, yearly) breaks ties between
/// periods that share an anchor date, e.g. `2024-12` and `2024Q4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Monthly,
    Quarterly,
    Yearly,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [
        Granularity::Yearly,
        Granularity::Quarterly,
        Granularity::Monthly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Monthly => "monthly",
            Granularity::Quarterly => "quarterly",
            Granularity::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("malformed period key {0:?}")]
    Malformed(String),
    #[error("year {0} is out of range (0-9999)")]
    YearOutOfRange(i32),
    #[error("quarter {0} is out of range (1-4)")]
    QuarterOutOfRange(u32),
    #[error("month {0} is out of range (1-12)")]
    MonthOutOfRange(u32),
}

/// Classifies a key by punctuation alone: `Q` means quarterly, `-` means
/// monthly, anything else is yearly. Does not validate the key.
pub fn classify(key: &str) -> Granularity {
    if key.contains('Q') {
        Granularity::Quarterly
    } else if key.contains('-') {
        Granularity::Monthly
    } else {
        Granularity::Yearly
    }
}

/// Result of [`classify_and_parse_key`]. `normalized_date` is `None` when the
/// key matches none of the three lexical forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedKey {
    pub granularity: Granularity,
    pub normalized_date: Option<NaiveDate>,
}

pub fn classify_and_parse_key(key: &str) -> ParsedKey {
    ParsedKey {
        granularity: classify(key),
        normalized_date: key.parse::<Period>().ok().map(|p| p.anchor_date()),
    }
}

/// A validated time bucket.
///
/// `index` holds the quarter (1-4) or month (1-12); it is zero for years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Period {
    year: i32,
    granularity: Granularity,
    index: u32,
}

impl Period {
    pub fn year(year: i32) -> Result<Self, PeriodError> {
        check_year(year)?;
        Ok(Period {
            year,
            granularity: Granularity::Yearly,
            index: 0,
        })
    }

    pub fn quarter(year: i32, quarter: u32) -> Result<Self, PeriodError> {
        check_year(year)?;
        if !(1..=4).contains(&quarter) {
            return Err(PeriodError::QuarterOutOfRange(quarter));
        }
        Ok(Period {
            year,
            granularity: Granularity::Quarterly,
            index: quarter,
        })
    }

    pub fn month(year: i32, month: u32) -> Result<Self, PeriodError> {
        check_year(year)?;
        if !(1..=12).contains(&month) {
            return Err(PeriodError::MonthOutOfRange(month));
        }
        Ok(Period {
            year,
            granularity: Granularity::Monthly,
            index: month,
        })
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn year_number(&self) -> i32 {
        self.year
    }

    pub fn quarter_number(&self) -> Option<u32> {
        (self.granularity == Granularity::Quarterly).then_some(self.index)
    }

    pub fn month_number(&self) -> Option<u32> {
        (self.granularity == Granularity::Monthly).then_some(self.index)
    }

    /// `(month, day)` the period is pinned to for ordering: quarters sit on
    /// the first day of their last month, years on December 31.
    fn anchor(&self) -> (u32, u32) {
        match self.granularity {
            Granularity::Monthly => (self.index, 1),
            Granularity::Quarterly => (self.index * 3, 1),
            Granularity::Yearly => (12, 31),
        }
    }

    pub fn anchor_date(&self) -> NaiveDate {
        let (month, day) = self.anchor();
        NaiveDate::from_ymd_opt(self.year, month, day)
            .expect("period fields are range-checked on construction")
    }

    /// Axis label: `2024`, `2024Q3` or `2024/08`.
    pub fn chart_label(&self) -> String {
        match self.granularity {
            Granularity::Yearly => format!("{:04}", self.year),
            Granularity::Quarterly => format!("{:04}Q{}", self.year, self.index),
            Granularity::Monthly => format!("{:04}/{:02}", self.year, self.index),
        }
    }

    fn sort_key(&self) -> (i32, u32, u32, Granularity) {
        let (month, day) = self.anchor();
        (self.year, month, day, self.granularity)
    }
}

fn check_year(year: i32) -> Result<(), PeriodError> {
    if (0..=9999).contains(&year) {
        Ok(())
    } else {
        Err(PeriodError::YearOutOfRange(year))
    }
}

fn fixed_digits(s: &str, width: usize) -> Option<u32> {
    if s.len() == width && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

impl Ord for Period {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let malformed = || PeriodError::Malformed(key.to_owned());
        match classify(key) {
            Granularity::Quarterly => {
                let (year, quarter) = key.split_once('Q').ok_or_else(malformed)?;
                let year = fixed_digits(year, 4).ok_or_else(malformed)?;
                let quarter = fixed_digits(quarter, 1).ok_or_else(malformed)?;
                Period::quarter(year as i32, quarter)
            }
            Granularity::Monthly => {
                let (year, month) = key.split_once('-').ok_or_else(malformed)?;
                let year = fixed_digits(year, 4).ok_or_else(malformed)?;
                let month = fixed_digits(month, 2).ok_or_else(malformed)?;
                Period::month(year as i32, month)
            }
            Granularity::Yearly => {
                let year = fixed_digits(key, 4).ok_or_else(malformed)?;
                Period::year(year as i32)
            }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.granularity {
            Granularity::Yearly => write!(f, "{:04}", self.year),
            Granularity::Quarterly => write!(f, "{:04}Q{}", self.year, self.index),
            Granularity::Monthly => write!(f, "{:04}-{:02}", self.year, self.index),
        }
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

impl TryFrom<String> for Period {
    type Error = PeriodError;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        key.parse()
    }
}

#[derive(Deserialize)]
struct RawMonthSelection {
    year: i32,
    month: u32,
}

/// A concrete calendar month picked by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMonthSelection")]
pub struct MonthSelection {
    year: i32,
    month: u32,
}

impl MonthSelection {
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=9999).contains(&year) {
            return Err(PeriodError::YearOutOfRange(year));
        }
        if !(1..=12).contains(&month) {
            return Err(PeriodError::MonthOutOfRange(month));
        }
        Ok(MonthSelection { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn period(&self) -> Period {
        Period {
            year: self.year,
            granularity: Granularity::Monthly,
            index: self.month,
        }
    }

    /// `YYYY-MM` with a zero-padded month.
    pub fn key(&self) -> String {
        self.period().to_string()
    }

    /// The month `n` months before this one, rolling back across years.
    pub fn months_back(&self, n: u32) -> Option<Period> {
        let total = i64::from(self.year) * 12 + i64::from(self.month) - 1 - i64::from(n);
        let year = i32::try_from(total.div_euclid(12)).ok()?;
        let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
        Period::month(year, month).ok()
    }

    pub fn previous(&self) -> Option<Period> {
        self.months_back(1)
    }
}

impl TryFrom<RawMonthSelection> for MonthSelection {
    type Error = PeriodError;

    fn try_from(raw: RawMonthSelection) -> Result<Self, Self::Error> {
        MonthSelection::new(raw.year, raw.month)
    }
}
