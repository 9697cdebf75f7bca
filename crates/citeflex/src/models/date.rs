//! Partial publication dates.
//!
//! Providers hand back dates in every shape imaginable: `2020`, `2020-03`,
//! `2020-03-05T10:00:00Z`, `March 5, 2020`, `5 Mar 2020`, `2020 Mar 5`.
//! [`PubDate`] keeps whatever precision was given.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(1[5-9]\d{2}|20\d{2})\b").expect("valid year regex"));

static ISO_PARTIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})(?:[-/](\d{1,2})(?:[-/](\d{1,2}))?)?").expect("valid iso regex")
});

/// PubMed `pubdate`: `2020 Mar`, `2020 Mar 5`, `2019 Nov-Dec`.
static YEAR_FIRST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{4})\s+([a-z]{3,9})\.?(?:\s+(\d{1,2}))?\b").expect("valid year-first regex")
});

static MONTH_FIRST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([a-z]{3,9})\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b")
        .expect("valid month-first regex")
});

static DAY_FIRST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+([a-z]{3,9})\.?,?\s+(\d{4})\b")
        .expect("valid day-first regex")
});

static MONTH_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([a-z]{3,9})\.?\s+(\d{4})\b").expect("valid month-year regex")
});

/// A publication date with optional month and day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PubDate {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl PubDate {
    /// A year-only date.
    #[must_use]
    pub const fn year_only(year: i32) -> Self {
        Self { year, month: None, day: None }
    }

    /// Build from parts, dropping components that are out of range.
    #[must_use]
    pub fn from_parts(year: i32, month: Option<u32>, day: Option<u32>) -> Self {
        let month = month.filter(|m| (1..=12).contains(m));
        let day = match month {
            Some(m) => day.filter(|d| NaiveDate::from_ymd_opt(year, m, *d).is_some()),
            None => None,
        };
        Self { year, month, day }
    }

    /// Parse a free-form date string.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self::from_parts(dt.year(), Some(dt.month()), Some(dt.day())));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Some(Self::from_parts(dt.year(), Some(dt.month()), Some(dt.day())));
        }

        if let Some(caps) = YEAR_FIRST_RE.captures(s) {
            if let Some(month) = month_from_name(&caps[2]) {
                let year = caps[1].parse().ok()?;
                let day = caps.get(3).and_then(|d| d.as_str().parse().ok());
                return Some(Self::from_parts(year, Some(month), day));
            }
        }

        if let Some(caps) = ISO_PARTIAL_RE.captures(s) {
            let year = caps[1].parse().ok()?;
            let month = caps.get(2).and_then(|m| m.as_str().parse().ok());
            let day = caps.get(3).and_then(|d| d.as_str().parse().ok());
            return Some(Self::from_parts(year, month, day));
        }

        if let Some(caps) = MONTH_FIRST_RE.captures(s) {
            if let Some(month) = month_from_name(&caps[1]) {
                let year = caps[3].parse().ok()?;
                return Some(Self::from_parts(year, Some(month), caps[2].parse().ok()));
            }
        }

        if let Some(caps) = DAY_FIRST_RE.captures(s) {
            if let Some(month) = month_from_name(&caps[2]) {
                let year = caps[3].parse().ok()?;
                return Some(Self::from_parts(year, Some(month), caps[1].parse().ok()));
            }
        }

        if let Some(caps) = MONTH_YEAR_RE.captures(s) {
            if let Some(month) = month_from_name(&caps[1]) {
                let year = caps[2].parse().ok()?;
                return Some(Self::from_parts(year, Some(month), None));
            }
        }

        YEAR_RE.captures(s).and_then(|c| c[1].parse().ok()).map(Self::year_only)
    }

    /// Full English month name.
    #[must_use]
    pub fn month_name(&self) -> Option<&'static str> {
        self.month.and_then(|m| MONTHS.get(m.checked_sub(1)? as usize).copied())
    }

    /// MLA month abbreviation (`Jan.`, `May`, `June`, `Sept.`).
    #[must_use]
    pub fn month_abbrev_mla(&self) -> Option<&'static str> {
        self.month.map(|m| match m {
            1 => "Jan.",
            2 => "Feb.",
            3 => "Mar.",
            4 => "Apr.",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "Aug.",
            9 => "Sept.",
            10 => "Oct.",
            11 => "Nov.",
            _ => "Dec.",
        })
    }

    /// `March 5, 2020` / `March 2020` / `2020`.
    #[must_use]
    pub fn long_us(&self) -> String {
        match (self.month_name(), self.day) {
            (Some(m), Some(d)) => format!("{m} {d}, {}", self.year),
            (Some(m), None) => format!("{m} {}", self.year),
            _ => self.year.to_string(),
        }
    }

    /// `2020, March 5` / `2020, March` / `2020` (APA).
    #[must_use]
    pub fn apa(&self) -> String {
        match (self.month_name(), self.day) {
            (Some(m), Some(d)) => format!("{}, {m} {d}", self.year),
            (Some(m), None) => format!("{}, {m}", self.year),
            _ => self.year.to_string(),
        }
    }

    /// `5 Mar. 2020` / `Mar. 2020` / `2020` (MLA).
    #[must_use]
    pub fn mla(&self) -> String {
        match (self.month_abbrev_mla(), self.day) {
            (Some(m), Some(d)) => format!("{d} {m} {}", self.year),
            (Some(m), None) => format!("{m} {}", self.year),
            _ => self.year.to_string(),
        }
    }
}

impl From<NaiveDate> for PubDate {
    fn from(d: NaiveDate) -> Self {
        Self { year: d.year(), month: Some(d.month()), day: Some(d.day()) }
    }
}

impl fmt::Display for PubDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.month, self.day) {
            (Some(m), Some(d)) => write!(f, "{:04}-{m:02}-{d:02}", self.year),
            (Some(m), None) => write!(f, "{:04}-{m:02}", self.year),
            _ => write!(f, "{:04}", self.year),
        }
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_ascii_lowercase();
    let prefix = lower.get(..3)?;
    MONTHS
        .iter()
        .position(|m| m.to_ascii_lowercase().starts_with(prefix))
        .map(|i| i as u32 + 1)
}

/// Today's date as a citation access date.
#[must_use]
pub fn today() -> PubDate {
    chrono::Local::now().date_naive().into()
}
