#![forbid(unsafe_code)]

//! Repetition units for scheduled deliveries.
//!
//! A schedule repeats every N units from a start time. The cron preview
//! expresses "once per unit" by filling cron fields from the start time and
//! starring the rest:
//!
//! | Unit | Cron |
//! |------|------|
//! | minutes | `* * * * *` |
//! | hours | `M * * * *` |
//! | days | `M H * * *` |
//! | weeks | `M H * * W` |
//! | months | `M H D * *` |
//! | years | `M H D Mo *` |
//!
//! The preview is a display string. Nothing here executes a schedule.

use std::fmt;
use std::str::FromStr;

use time::OffsetDateTime;

const MINUTE: usize = 0;
const HOUR: usize = 1;
const DAY_OF_MONTH: usize = 2;
const MONTH: usize = 3;
const DAY_OF_WEEK: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum RepetitionUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl RepetitionUnit {
    pub const ALL: [Self; 6] = [
        Self::Minutes,
        Self::Hours,
        Self::Days,
        Self::Weeks,
        Self::Months,
        Self::Years,
    ];

    /// Stored attribute value.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Minutes => "MINUTES",
            Self::Hours => "HOURS",
            Self::Days => "DAYS",
            Self::Weeks => "WEEKS",
            Self::Months => "MONTHS",
            Self::Years => "YEARS",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Minutes => "Minutes",
            Self::Hours => "Hours",
            Self::Days => "Days",
            Self::Weeks => "Weeks",
            Self::Months => "Months",
            Self::Years => "Years",
        }
    }

    const fn filled_fields(self) -> &'static [usize] {
        match self {
            Self::Minutes => &[],
            Self::Hours => &[MINUTE],
            Self::Days => &[MINUTE, HOUR],
            Self::Weeks => &[MINUTE, HOUR, DAY_OF_WEEK],
            Self::Months => &[MINUTE, HOUR, DAY_OF_MONTH],
            Self::Years => &[MINUTE, HOUR, DAY_OF_MONTH, MONTH],
        }
    }

    /// Whether cron field `index` (0 = minute .. 4 = weekday) takes its value
    /// from the start time.
    #[must_use]
    pub fn cron_field_filled(self, index: usize) -> bool {
        self.filled_fields().contains(&index)
    }

    /// Five-field cron string that fires once per unit, anchored at `start`.
    ///
    /// Fields are read in `start`'s own offset; convert first to preview in
    /// another zone. Weekdays are numbered 0-6 from Sunday.
    #[must_use]
    pub fn cron_for_start(self, start: OffsetDateTime) -> String {
        let values = [
            u32::from(start.minute()),
            u32::from(start.hour()),
            u32::from(start.day()),
            u32::from(u8::from(start.month())),
            u32::from(start.weekday().number_days_from_sunday()),
        ];
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                if self.cron_field_filled(i) {
                    v.to_string()
                } else {
                    "*".to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for RepetitionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A string that names no repetition unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRepetitionUnitError(pub String);

impl fmt::Display for ParseRepetitionUnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown repetition unit: {}", self.0)
    }
}

impl std::error::Error for ParseRepetitionUnitError {}

impl FromStr for RepetitionUnit {
    type Err = ParseRepetitionUnitError;

    /// Case-insensitive match on the stored name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|u| u.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseRepetitionUnitError(s.to_string()))
    }
}
