//! Date formats, parsing and limit resolution.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Local, NaiveDate};

use crate::core::{ConfigError, FieldValue, InputSource, resolve};

/// Separators accepted when a date rule is not given an explicit one.
const DEFAULT_SEPARATORS: [char; 4] = ['-', '.', '/', ' '];

// ============================================================================
// DATE FORMAT
// ============================================================================

/// The positions of the day, month and year components in a date string.
///
/// Formats are written in the compact `"d/m/Y"` pattern form, so
/// `"m/d/Y"` reads `10/20/2010` as October 20th. Use the constants for
/// the common orders or parse a pattern with [`FromStr`].
///
/// # Examples
///
/// ```rust,ignore
/// let format: DateFormat = "m/d/Y".parse()?;
/// assert!(format.parse_date("10/20/2010", None).is_some());
/// assert!(format.parse_date("2/30/2010", None).is_none()); // no Feb 30
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFormat {
    order: [DatePart; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatePart {
    Day,
    Month,
    Year,
}

impl DateFormat {
    /// Day, month, year — `20/10/2010`.
    pub const DMY: Self = Self {
        order: [DatePart::Day, DatePart::Month, DatePart::Year],
    };

    /// Month, day, year — `10/20/2010`.
    pub const MDY: Self = Self {
        order: [DatePart::Month, DatePart::Day, DatePart::Year],
    };

    /// Year, month, day — `2010/10/20`.
    pub const YMD: Self = Self {
        order: [DatePart::Year, DatePart::Month, DatePart::Day],
    };

    /// Splits `text` into three numeric components and maps them onto a
    /// calendar date.
    ///
    /// With an explicit `separator` the text is split on exactly that
    /// character; otherwise any of `-`, `.`, `/` and space is accepted.
    /// Returns `None` unless there are exactly three components, all
    /// numeric, naming a date that actually exists.
    #[must_use]
    pub fn parse_date(&self, text: &str, separator: Option<char>) -> Option<NaiveDate> {
        let parts: Vec<&str> = match separator {
            Some(sep) => text.split(sep).collect(),
            None => text.split(DEFAULT_SEPARATORS).collect(),
        };
        if parts.len() != 3 {
            return None;
        }

        let (mut day, mut month, mut year) = (0i32, 0i32, 0i32);
        for (part, component) in self.order.iter().zip(&parts) {
            let number: i32 = component.trim().parse().ok()?;
            match part {
                DatePart::Day => day = number,
                DatePart::Month => month = number,
                DatePart::Year => year = number,
            }
        }

        NaiveDate::from_ymd_opt(
            year,
            u32::try_from(month).ok()?,
            u32::try_from(day).ok()?,
        )
    }

    /// Renders `date` in this format with `/` separators, components
    /// zero-padded the way they are expected on input.
    #[must_use]
    pub fn render(&self, date: NaiveDate) -> String {
        let components: Vec<String> = self
            .order
            .iter()
            .map(|part| match part {
                DatePart::Day => format!("{:02}", date.day()),
                DatePart::Month => format!("{:02}", date.month()),
                DatePart::Year => format!("{:04}", date.year()),
            })
            .collect();
        components.join("/")
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self::MDY
    }
}

impl FromStr for DateFormat {
    type Err = ConfigError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        let bad = || ConfigError::BadDateFormat(pattern.to_string());

        let mut order = [DatePart::Day; 3];
        let mut seen = [false; 3];
        let mut count = 0;

        for component in pattern.split('/') {
            let (part, slot) = match component {
                "d" => (DatePart::Day, 0),
                "m" => (DatePart::Month, 1),
                "Y" => (DatePart::Year, 2),
                _ => return Err(bad()),
            };
            if count == 3 || seen[slot] {
                return Err(bad());
            }
            order[count] = part;
            seen[slot] = true;
            count += 1;
        }

        if count != 3 {
            return Err(bad());
        }
        Ok(Self { order })
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let components: Vec<&str> = self
            .order
            .iter()
            .map(|part| match part {
                DatePart::Day => "d",
                DatePart::Month => "m",
                DatePart::Year => "Y",
            })
            .collect();
        write!(f, "{}", components.join("/"))
    }
}

// ============================================================================
// DATE LIMIT
// ============================================================================

/// How a `min_date`/`max_date` bound is specified.
///
/// Limits resolve to a concrete calendar date when the rule is registered,
/// not when the field is validated — a [`DateLimit::Field`] reference reads
/// the other field's value at registration time, so register these rules
/// after the referenced field's value is final.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateLimit {
    /// An offset in days from today; negative offsets point into the past.
    Days(i64),
    /// Another field's value, read from the data source and parsed with
    /// the rule's format.
    Field(String),
    /// A literal date in the rule's format.
    Literal(String),
}

impl DateLimit {
    /// Resolves the limit to a calendar date against `data`.
    pub(crate) fn resolve_against<S>(
        &self,
        format: DateFormat,
        data: &S,
        rule: &'static str,
    ) -> Result<NaiveDate, ConfigError>
    where
        S: InputSource,
    {
        let unresolved = |detail: String| ConfigError::UnresolvedDateLimit { rule, detail };

        match self {
            DateLimit::Days(offset) => {
                let today = Local::now().date_naive();
                let date = if *offset >= 0 {
                    today.checked_add_days(Days::new(offset.unsigned_abs()))
                } else {
                    today.checked_sub_days(Days::new(offset.unsigned_abs()))
                };
                date.ok_or_else(|| unresolved(format!("day offset {offset} is out of range")))
            }
            DateLimit::Field(key) => {
                let node = resolve(data, key)
                    .ok_or_else(|| unresolved(format!("field `{key}` has no value")))?;
                let value = FieldValue::from_json(node);
                let text = value
                    .as_scalar()
                    .ok_or_else(|| unresolved(format!("field `{key}` is not a scalar")))?;
                format.parse_date(text, None).ok_or_else(|| {
                    unresolved(format!("field `{key}` does not hold a `{format}` date"))
                })
            }
            DateLimit::Literal(text) => format
                .parse_date(text, None)
                .ok_or_else(|| unresolved(format!("`{text}` is not a `{format}` date"))),
        }
    }
}

impl From<i64> for DateLimit {
    fn from(offset: i64) -> Self {
        DateLimit::Days(offset)
    }
}

// ============================================================================
// TESTS
// ============================================================================
